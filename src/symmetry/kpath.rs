//! # 高对称 k 点路径
//!
//! 按空间群号归入 Bravais 类型，给出固定的高对称点与路径。
//!
//! ## 坐标约定
//! 面心、体心立方与菱方的点表写在标准原胞的倒格子基下，其余类型写在标准惯用胞下。
//! `high_symmetry_kpath` 再把点换到实际写出的晶胞（即输入晶胞）的倒格子基：
//! 若 L 的列是表所在晶胞基矢在输入分数坐标下的分量，则 k_input = (L⁻¹)ᵀ · k_table。
//!
//! ## 依赖关系
//! - 被 `deck/` 使用
//! - 使用 `symmetry::analyze`, `parsers/kpoints.rs`, `nalgebra`

use super::analyze;
use crate::models::Crystal;
use crate::parsers::kpoints::{HighSymmetryPoint, KPath};
use nalgebra::{Matrix3, Vector3};

/// 每段插值点数
pub const DEFAULT_DIVISIONS: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BravaisClass {
    CubicP,
    CubicF,
    CubicI,
    TetragonalP,
    TetragonalI,
    Orthorhombic,
    HexagonalP,
    Rhombohedral,
    Monoclinic,
    Triclinic,
}

/// 空间群号 -> Bravais 类型
pub fn classify(space_group: i32) -> BravaisClass {
    use BravaisClass::*;
    match space_group {
        1..=2 => Triclinic,
        3..=15 => Monoclinic,
        16..=74 => Orthorhombic,
        75..=142 => {
            if is_body_centred_tetragonal(space_group) {
                TetragonalI
            } else {
                TetragonalP
            }
        }
        146 | 148 | 155 | 160 | 161 | 166 | 167 => Rhombohedral,
        143..=194 => HexagonalP,
        195..=206 => match space_group {
            196 | 202 | 203 => CubicF,
            197 | 199 | 204 | 206 => CubicI,
            _ => CubicP,
        },
        207..=230 => match space_group {
            209 | 210 | 216 | 219 | 225..=228 => CubicF,
            211 | 214 | 217 | 220 | 229 | 230 => CubicI,
            _ => CubicP,
        },
        _ => Triclinic,
    }
}

/// 点表是否写在原胞倒格子基下
fn uses_primitive_table(class: BravaisClass) -> bool {
    matches!(
        class,
        BravaisClass::CubicF | BravaisClass::CubicI | BravaisClass::Rhombohedral
    )
}

fn is_body_centred_tetragonal(sg: i32) -> bool {
    matches!(sg, 79 | 80 | 82 | 87 | 88 | 97 | 98 | 107..=110 | 119..=122 | 139..=142)
}

/// 高对称点表与分支（每个分支是一串连续的点标签）
fn path_for(class: BravaisClass) -> (Vec<(&'static str, [f64; 3])>, Vec<Vec<&'static str>>) {
    use BravaisClass::*;
    let g = ("\\Gamma", [0.0, 0.0, 0.0]);

    match class {
        CubicF => (
            vec![
                g,
                ("X", [0.5, 0.0, 0.5]),
                ("W", [0.5, 0.25, 0.75]),
                ("K", [0.375, 0.375, 0.75]),
                ("L", [0.5, 0.5, 0.5]),
                ("U", [0.625, 0.25, 0.625]),
            ],
            vec![
                vec!["\\Gamma", "X", "W", "K", "\\Gamma", "L", "U", "W", "L", "K"],
                vec!["U", "X"],
            ],
        ),
        CubicI => (
            vec![
                g,
                ("H", [0.5, -0.5, 0.5]),
                ("N", [0.0, 0.0, 0.5]),
                ("P", [0.25, 0.25, 0.25]),
            ],
            vec![vec!["\\Gamma", "H", "N", "\\Gamma", "P", "H"], vec!["P", "N"]],
        ),
        CubicP => (
            vec![
                g,
                ("X", [0.0, 0.5, 0.0]),
                ("M", [0.5, 0.5, 0.0]),
                ("R", [0.5, 0.5, 0.5]),
            ],
            vec![vec!["\\Gamma", "X", "M", "\\Gamma", "R", "X"], vec!["M", "R"]],
        ),
        TetragonalP | TetragonalI => (
            vec![
                g,
                ("X", [0.0, 0.5, 0.0]),
                ("M", [0.5, 0.5, 0.0]),
                ("Z", [0.0, 0.0, 0.5]),
                ("R", [0.0, 0.5, 0.5]),
                ("A", [0.5, 0.5, 0.5]),
            ],
            vec![
                vec!["\\Gamma", "X", "M", "\\Gamma", "Z", "R", "A", "Z"],
                vec!["X", "R"],
                vec!["M", "A"],
            ],
        ),
        Orthorhombic => (
            vec![
                g,
                ("X", [0.5, 0.0, 0.0]),
                ("Y", [0.0, 0.5, 0.0]),
                ("Z", [0.0, 0.0, 0.5]),
                ("S", [0.5, 0.5, 0.0]),
                ("U", [0.5, 0.0, 0.5]),
                ("T", [0.0, 0.5, 0.5]),
                ("R", [0.5, 0.5, 0.5]),
            ],
            vec![
                vec!["\\Gamma", "X", "S", "Y", "\\Gamma", "Z", "U", "R", "T", "Z"],
                vec!["Y", "T"],
                vec!["U", "X"],
                vec!["S", "R"],
            ],
        ),
        HexagonalP => (
            vec![
                g,
                ("M", [0.5, 0.0, 0.0]),
                ("K", [1.0 / 3.0, 1.0 / 3.0, 0.0]),
                ("A", [0.0, 0.0, 0.5]),
                ("L", [0.5, 0.0, 0.5]),
                ("H", [1.0 / 3.0, 1.0 / 3.0, 0.5]),
            ],
            vec![
                vec!["\\Gamma", "M", "K", "\\Gamma", "A", "L", "H", "A"],
                vec!["L", "M"],
                vec!["K", "H"],
            ],
        ),
        Rhombohedral => (
            vec![
                g,
                ("F", [0.5, 0.5, 0.0]),
                ("L", [0.5, 0.0, 0.0]),
                ("Z", [0.5, 0.5, 0.5]),
            ],
            vec![vec!["\\Gamma", "F", "L", "Z", "\\Gamma"]],
        ),
        Monoclinic => (
            vec![
                g,
                ("Y", [0.0, 0.0, 0.5]),
                ("D", [0.5, 0.0, 0.5]),
                ("Z", [0.5, 0.0, 0.0]),
                ("A", [0.5, 0.5, 0.0]),
                ("E", [0.5, 0.5, 0.5]),
                ("X", [0.0, 0.5, 0.0]),
            ],
            vec![
                vec!["\\Gamma", "Y", "D", "\\Gamma", "Z", "A", "\\Gamma", "E"],
                vec!["X", "\\Gamma"],
            ],
        ),
        Triclinic => (
            vec![
                g,
                ("X", [0.5, 0.0, 0.0]),
                ("Y", [0.0, 0.5, 0.0]),
                ("Z", [0.0, 0.0, 0.5]),
                ("L", [0.5, 0.5, 0.0]),
                ("M", [0.0, 0.5, 0.5]),
                ("N", [0.5, 0.0, 0.5]),
                ("R", [0.5, 0.5, 0.5]),
            ],
            vec![
                vec!["X", "\\Gamma", "Y"],
                vec!["L", "\\Gamma", "Z"],
                vec!["N", "\\Gamma", "M"],
                vec!["R", "\\Gamma"],
            ],
        ),
    }
}

/// 某一 Bravais 类型的 line-mode 路径
pub fn kpath_for_class(class: BravaisClass, divisions: u32) -> KPath {
    let (points, branches) = path_for(class);
    let lookup = |label: &str| {
        let coords = points
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, c)| *c)
            .unwrap_or([0.0; 3]);
        HighSymmetryPoint::new(label, coords)
    };

    let segments = branches
        .iter()
        .flat_map(|branch| branch.windows(2).map(|w| (lookup(w[0]), lookup(w[1]))).collect::<Vec<_>>())
        .collect();

    KPath {
        comment: "Line_mode KPOINTS file".to_string(),
        divisions,
        segments,
    }
}

/// 结构的能带路径，坐标为该结构自身倒格子的分数坐标；对称分析失败时退回三斜路径
pub fn high_symmetry_kpath(crystal: &Crystal, divisions: u32) -> KPath {
    let info = match analyze(crystal) {
        Ok(info) => info,
        Err(_) => return kpath_for_class(BravaisClass::Triclinic, divisions),
    };

    let class = classify(info.number);
    let linear = if uses_primitive_table(class) {
        info.prim_std_linear
    } else {
        info.std_linear
    };

    let mut path = kpath_for_class(class, divisions);
    to_cell_basis(&mut path, &linear);
    path
}

/// k_input = (L⁻¹)ᵀ · k_table；L 奇异时保持原样
fn to_cell_basis(path: &mut KPath, linear: &Matrix3<f64>) {
    let Some(inverse) = linear.try_inverse() else {
        return;
    };
    let transform = inverse.transpose();

    for (start, end) in path.segments.iter_mut() {
        for point in [start, end] {
            let k = transform * Vector3::from(point.coords);
            point.coords = [clean(k.x), clean(k.y), clean(k.z)];
        }
    }
}

/// 去掉浮点噪声，避免写出 -0.00000
fn clean(x: f64) -> f64 {
    if x.abs() < 1e-10 {
        0.0
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    #[test]
    fn test_classify() {
        assert_eq!(classify(225), BravaisClass::CubicF);
        assert_eq!(classify(229), BravaisClass::CubicI);
        assert_eq!(classify(221), BravaisClass::CubicP);
        assert_eq!(classify(166), BravaisClass::Rhombohedral);
        assert_eq!(classify(194), BravaisClass::HexagonalP);
        assert_eq!(classify(139), BravaisClass::TetragonalI);
        assert_eq!(classify(62), BravaisClass::Orthorhombic);
        assert_eq!(classify(14), BravaisClass::Monoclinic);
    }

    #[test]
    fn test_fcc_path_segments() {
        let path = kpath_for_class(BravaisClass::CubicF, DEFAULT_DIVISIONS);
        assert_eq!(path.divisions, 40);
        // 10 个点的分支 -> 9 段，加上 U-X
        assert_eq!(path.segments.len(), 10);
        assert_eq!(path.segments[0].0.label, "\\Gamma");
        assert_eq!(path.segments[0].1.coords, [0.5, 0.0, 0.5]);
        assert_eq!(path.segments[9].0.label, "U");
    }

    fn fcc_copper() -> Crystal {
        let atoms = [[0.0, 0.0, 0.0], [0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]]
            .into_iter()
            .map(|p| Atom::new("Cu", p))
            .collect();
        Crystal::new("Cu", Lattice::cubic(3.61), atoms)
    }

    /// 分数坐标 k 的笛卡尔长度（不含 2π）
    fn cartesian_length(lattice: &Lattice, k: [f64; 3]) -> f64 {
        let b = lattice.reciprocal();
        (0..3)
            .map(|j| (0..3).map(|i| k[i] * b[i][j]).sum::<f64>())
            .map(|x| x * x)
            .sum::<f64>()
            .sqrt()
    }

    fn point<'a>(path: &'a KPath, label: &str) -> &'a HighSymmetryPoint {
        path.segments
            .iter()
            .flat_map(|(a, b)| [a, b])
            .find(|p| p.label == label)
            .unwrap()
    }

    #[test]
    fn test_fcc_conventional_cell_points_on_zone_boundary() {
        let cu = fcc_copper();
        let a = 3.61;
        let path = high_symmetry_kpath(&cu, DEFAULT_DIVISIONS);

        assert_eq!(point(&path, "\\Gamma").coords, [0.0; 3]);

        // X 是 {100} 面心：惯用胞倒格子下为 (0, 1, 0) 及其等价点
        let x = point(&path, "X").coords;
        let mut magnitudes: Vec<f64> = x.iter().map(|v| v.abs()).collect();
        magnitudes.sort_by(|p, q| p.partial_cmp(q).unwrap());
        assert!(magnitudes[0].abs() < 1e-9 && magnitudes[1].abs() < 1e-9);
        assert!((magnitudes[2] - 1.0).abs() < 1e-9);
        assert!((cartesian_length(&cu.lattice, x) - 1.0 / a).abs() < 1e-9);

        // L = (1/2, 1/2, 1/2)，|k| = √3 / (2a)
        let l = point(&path, "L").coords;
        assert!(l.iter().all(|v| (v.abs() - 0.5).abs() < 1e-9));
        assert!((cartesian_length(&cu.lattice, l) - 3f64.sqrt() / (2.0 * a)).abs() < 1e-9);
    }

    #[test]
    fn test_fcc_primitive_and_conventional_agree() {
        let a = 3.61;
        let primitive = Crystal::new(
            "Cu",
            Lattice::from_vectors([[0.0, a / 2.0, a / 2.0], [a / 2.0, 0.0, a / 2.0], [a / 2.0, a / 2.0, 0.0]]),
            vec![Atom::new("Cu", [0.0; 3])],
        );
        let conventional = fcc_copper();

        let p = high_symmetry_kpath(&primitive, DEFAULT_DIVISIONS);
        let c = high_symmetry_kpath(&conventional, DEFAULT_DIVISIONS);
        for label in ["X", "W", "K", "L", "U"] {
            let kp = cartesian_length(&primitive.lattice, point(&p, label).coords);
            let kc = cartesian_length(&conventional.lattice, point(&c, label).coords);
            assert!((kp - kc).abs() < 1e-9, "{}: {} vs {}", label, kp, kc);
        }
    }

    #[test]
    fn test_every_label_has_coordinates() {
        use BravaisClass::*;
        for class in [
            CubicP, CubicF, CubicI, TetragonalP, TetragonalI, Orthorhombic, HexagonalP,
            Rhombohedral, Monoclinic, Triclinic,
        ] {
            let (points, branches) = path_for(class);
            for label in branches.iter().flatten() {
                assert!(points.iter().any(|(l, _)| l == label), "{:?} {}", class, label);
            }
        }
    }
}
