//! # Slab 生成
//!
//! ## 算法
//! 1. 由 Miller 指数求整数基 (u, v, w)：h·u = h·v = 0，h·w = 1，行列式为 1
//! 2. 构造取向晶胞：原子分数坐标 = M⁻¹·x 后取模
//! 3. 沿法向聚类原子层（容差 0.1 Å），相邻层中点作为候选终止面
//! 4. 每个终止面：堆叠 n 层，加真空，c 轴垂直于表面
//! 5. 去掉层序列相同的重复 slab，可选只保留上下对称的 slab
//!
//! 输出晶格：a 沿 x，b 在 xy 平面内，c 沿 z；slab 位于晶胞底部。
//!
//! ## 依赖关系
//! - 被 `commands/slab.rs` 使用
//! - 使用 `symmetry::operations`, `transform/freeze.rs`, `nalgebra`

use super::freeze::freeze;
use crate::error::{AutoVaspError, Result};
use crate::models::structure::{cross, dot, norm};
use crate::models::{Atom, Crystal, Lattice};
use crate::symmetry;
use crate::utils::output::print_info;
use nalgebra::{Matrix3, Vector3};

/// 层聚类容差 (Å)
const LAYER_TOLERANCE: f64 = 0.1;

/// slab 对称性判定容差
const SLAB_SYMPREC: f64 = 0.1;

const TOLERANCE: f64 = 1e-8;

/// slab 生成参数
#[derive(Debug, Clone)]
pub struct SlabParameters {
    pub miller: [i32; 3],
    pub min_slab_size: f64,
    pub min_vacuum_size: f64,
    /// 厚度以晶面数而不是 Å 计
    pub in_unit_planes: bool,
    pub require_symmetric: bool,
    /// 冻结阈值 (Å)
    pub min_z: f64,
}

impl Default for SlabParameters {
    fn default() -> Self {
        SlabParameters {
            miller: [0, 0, 1],
            min_slab_size: 15.0,
            min_vacuum_size: 15.0,
            in_unit_planes: false,
            require_symmetric: true,
            min_z: 5.0,
        }
    }
}

/// 生成全部终止面的 slab，冻结底部原子
pub fn generate_slabs(crystal: &Crystal, params: &SlabParameters) -> Result<Vec<Crystal>> {
    let mut slabs = enumerate_slabs(crystal, params)?;

    if params.require_symmetric {
        slabs.retain(is_symmetric);
    }

    if slabs.is_empty() {
        return Err(AutoVaspError::NoSlabsGenerated {
            miller: params.miller,
            min_slab_size: params.min_slab_size,
            min_vacuum_size: params.min_vacuum_size,
            require_symmetric: params.require_symmetric,
        });
    }

    print_info(&format!("Generated {} slabs", slabs.len()));

    Ok(slabs.iter().map(|s| freeze(s, params.min_z)).collect())
}

/// 是否存在把表面法向翻转的对称操作（反演、水平镜面或水平二次轴）
pub fn is_symmetric(slab: &Crystal) -> bool {
    symmetry::operations(slab, SLAB_SYMPREC)
        .map(|ops| ops.iter().any(|op| op.rotation[2][2] == -1))
        .unwrap_or(false)
}

/// 每个不同终止面一个 slab（未冻结、未做对称筛选）
pub fn enumerate_slabs(crystal: &Crystal, params: &SlabParameters) -> Result<Vec<Crystal>> {
    validate(crystal, params)?;

    let miller = reduce_miller(params.miller);
    let (u, v, w) = find_basis(miller)?;
    let oriented = oriented_cell(crystal, u, v, w)?;

    // 晶面间距 d = 1/|G|，G = h a* + k b* + l c*
    let rec = crystal.lattice.reciprocal();
    let mut g = [0.0; 3];
    for (i, &m) in miller.iter().enumerate() {
        for j in 0..3 {
            g[j] += m as f64 * rec[i][j];
        }
    }
    let d = 1.0 / norm(g);

    let n_layers = layer_count(params.min_slab_size, d, params.in_unit_planes).max(1);
    let n_vacuum = layer_count(params.min_vacuum_size, d, params.in_unit_planes);

    let heights: Vec<f64> = oriented.atoms.iter().map(|a| a.position[2]).collect();
    let shifts = termination_shifts(&heights, LAYER_TOLERANCE / d);

    let name = format!(
        "{} ({}{}{}) slab",
        crystal.reduced_formula(),
        miller[0],
        miller[1],
        miller[2]
    );

    let mut slabs: Vec<Crystal> = Vec::new();
    let mut signatures: Vec<Vec<(String, i64)>> = Vec::new();

    for shift in shifts {
        let slab = build_slab(&oriented, shift, n_layers, n_vacuum, d, &name);
        let signature = layer_signature(&slab);
        if !signatures.contains(&signature) {
            signatures.push(signature);
            slabs.push(slab);
        }
    }

    Ok(slabs)
}

fn validate(crystal: &Crystal, params: &SlabParameters) -> Result<()> {
    if params.miller == [0, 0, 0] {
        return Err(AutoVaspError::InvalidArgument(
            "Miller indices (0,0,0) are invalid".to_string(),
        ));
    }
    if params.min_slab_size <= 0.0 {
        return Err(AutoVaspError::InvalidArgument(
            "min_slab_size must be positive".to_string(),
        ));
    }
    if params.min_vacuum_size < 0.0 {
        return Err(AutoVaspError::InvalidArgument(
            "min_vacuum_size cannot be negative".to_string(),
        ));
    }
    if crystal.atoms.is_empty() {
        return Err(AutoVaspError::InvalidArgument(
            "Input structure has no atoms".to_string(),
        ));
    }
    if crystal.lattice.volume().abs() < TOLERANCE {
        return Err(AutoVaspError::InvalidArgument(
            "Input lattice is singular".to_string(),
        ));
    }
    Ok(())
}

fn layer_count(size: f64, d: f64, in_unit_planes: bool) -> usize {
    if in_unit_planes {
        size.ceil() as usize
    } else {
        (size / d - 1e-8).ceil() as usize
    }
}

fn gcd(a: i32, b: i32) -> i32 {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}

/// 约去公因子
pub fn reduce_miller(miller: [i32; 3]) -> [i32; 3] {
    let g = gcd(gcd(miller[0], miller[1]), miller[2]).max(1);
    [miller[0] / g, miller[1] / g, miller[2] / g]
}

/// 整数基：u, v 为面内最短的两个不平行向量，w 为 h·w = 1 的最短向量，右手系
pub fn find_basis(miller: [i32; 3]) -> Result<(Vector3<i32>, Vector3<i32>, Vector3<i32>)> {
    let h = Vector3::new(miller[0], miller[1], miller[2]);
    let limit = 10;

    let mut in_plane = Vec::new();
    let mut stacking = Vec::new();
    // 降序遍历，同长度时优先正方向
    for x in (-limit..=limit).rev() {
        for y in (-limit..=limit).rev() {
            for z in (-limit..=limit).rev() {
                let cand = Vector3::new(x, y, z);
                match h.dot(&cand) {
                    0 if cand != Vector3::zeros() => in_plane.push(cand),
                    1 => stacking.push(cand),
                    _ => {}
                }
            }
        }
    }

    in_plane.sort_by_key(|c| c.dot(c));
    stacking.sort_by_key(|c| c.dot(c));

    let unsupported = || {
        AutoVaspError::InvalidArgument(format!(
            "Miller index ({},{},{}) is too high to build a surface cell",
            miller[0], miller[1], miller[2]
        ))
    };

    let u = *in_plane.first().ok_or_else(unsupported)?;
    let v = *in_plane
        .iter()
        .skip(1)
        .find(|c| u.cross(c) != Vector3::zeros())
        .ok_or_else(unsupported)?;
    let w = *stacking.first().ok_or_else(unsupported)?;

    let det = Matrix3::from_columns(&[u, v, w]).map(|x| x as f64).determinant();
    if det.abs() < 0.5 {
        return Err(unsupported());
    }
    if det < 0.0 {
        Ok((v, u, w))
    } else {
        Ok((u, v, w))
    }
}

/// 以 (u, v, w) 为基的取向晶胞
fn oriented_cell(
    crystal: &Crystal,
    u: Vector3<i32>,
    v: Vector3<i32>,
    w: Vector3<i32>,
) -> Result<Crystal> {
    let m = Matrix3::from_columns(&[u, v, w]).map(|x| x as f64);
    let m_inv = m
        .try_inverse()
        .ok_or_else(|| AutoVaspError::InvalidArgument("singular surface basis".to_string()))?;

    let rows = crystal.lattice.matrix;
    let combine = |c: Vector3<i32>| {
        let mut out = [0.0; 3];
        for (i, row) in rows.iter().enumerate() {
            for j in 0..3 {
                out[j] += c[i] as f64 * row[j];
            }
        }
        out
    };
    let lattice = Lattice::from_vectors([combine(u), combine(v), combine(w)]);

    let atoms = crystal
        .atoms
        .iter()
        .map(|atom| {
            let p = atom.position;
            let f = m_inv * Vector3::new(p[0], p[1], p[2]);
            Atom::new(atom.element.clone(), [wrap(f.x), wrap(f.y), wrap(f.z)])
        })
        .collect();

    Ok(Crystal::new(crystal.name.clone(), lattice, atoms))
}

fn wrap(x: f64) -> f64 {
    let y = x - x.floor();
    if y > 1.0 - 1e-8 {
        0.0
    } else {
        y
    }
}

/// 周期性一维聚类后，取相邻层中点为终止面位置
fn termination_shifts(heights: &[f64], tol: f64) -> Vec<f64> {
    let mut sorted: Vec<f64> = heights.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut layers: Vec<Vec<f64>> = Vec::new();
    for h in sorted {
        match layers.last_mut() {
            Some(layer) if h - layer[layer.len() - 1] < tol => layer.push(h),
            _ => layers.push(vec![h]),
        }
    }
    // 跨越 1 → 0 边界的层合并
    if layers.len() > 1 {
        let first = layers[0][0];
        let last_layer = &layers[layers.len() - 1];
        if first + 1.0 - last_layer[last_layer.len() - 1] < tol {
            let tail = layers.pop().unwrap_or_default();
            layers[0].extend(tail.into_iter().map(|h| h - 1.0));
        }
    }

    let centres: Vec<f64> = layers
        .iter()
        .map(|l| l.iter().sum::<f64>() / l.len() as f64)
        .collect();

    let n = centres.len();
    (0..n)
        .map(|i| {
            let next = if i + 1 < n { centres[i + 1] } else { centres[0] + 1.0 };
            wrap((centres[i] + next) / 2.0)
        })
        .collect()
}

fn build_slab(
    oriented: &Crystal,
    shift: f64,
    n_layers: usize,
    n_vacuum: usize,
    d: f64,
    name: &str,
) -> Crystal {
    let [u, v, w] = oriented.lattice.matrix;
    let normal = {
        let n = cross(u, v);
        let len = norm(n);
        [n[0] / len, n[1] / len, n[2] / len]
    };
    let total = (n_layers + n_vacuum) as f64 * d;
    let c_perp = [normal[0] * total, normal[1] * total, normal[2] * total];
    let frame = Lattice::from_vectors([u, v, c_perp]);

    let mut atoms = Vec::with_capacity(oriented.atoms.len() * n_layers);
    for atom in &oriented.atoms {
        let z0 = wrap(atom.position[2] - shift);
        for layer in 0..n_layers {
            let z = z0 + layer as f64;
            let cart = [
                atom.position[0] * u[0] + atom.position[1] * v[0] + z * w[0],
                atom.position[0] * u[1] + atom.position[1] * v[1] + z * w[1],
                atom.position[0] * u[2] + atom.position[1] * v[2] + z * w[2],
            ];
            let f = frame.cart_to_frac(cart);
            atoms.push(Atom::new(atom.element.clone(), [wrap(f[0]), wrap(f[1]), f[2]]));
        }
    }

    // 旋转到标准取向：分数坐标不变
    let [a, b, _] = oriented.lattice.lengths();
    let gamma = (dot(u, v) / (a * b)).clamp(-1.0, 1.0).acos().to_degrees();
    let lattice = Lattice::from_parameters(a, b, total, 90.0, 90.0, gamma);

    Crystal::new(name, lattice, atoms).sorted()
}

/// 按高度排序的 (元素, 高度/0.01 Å) 序列，用于识别相同的终止面
fn layer_signature(slab: &Crystal) -> Vec<(String, i64)> {
    let c = slab.lattice.lengths()[2];
    let mut sig: Vec<(String, i64)> = slab
        .atoms
        .iter()
        .map(|a| (a.element.clone(), (a.position[2] * c * 100.0).round() as i64))
        .collect();
    sig.sort_by(|x, y| x.1.cmp(&y.1).then_with(|| x.0.cmp(&y.0)));
    sig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::freeze::count_frozen;

    fn simple_cubic(a: f64) -> Crystal {
        Crystal::new("Po", Lattice::cubic(a), vec![Atom::new("Po", [0.0; 3])])
    }

    fn rocksalt() -> Crystal {
        let mut atoms = Vec::new();
        for p in [[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [0.5, 0.0, 0.5], [0.0, 0.5, 0.5]] {
            atoms.push(Atom::new("Na", p));
            atoms.push(Atom::new("Cl", [(p[0] + 0.5) % 1.0, p[1], p[2]]));
        }
        Crystal::new("NaCl", Lattice::cubic(5.64), atoms)
    }

    /// 沿 z 的极性堆叠 A-B-A-B，没有翻转 z 的对称操作
    fn polar_stack() -> Crystal {
        Crystal::new(
            "ZnS",
            Lattice::cubic(4.0),
            vec![Atom::new("Zn", [0.0, 0.0, 0.0]), Atom::new("S", [0.0, 0.0, 0.25])],
        )
    }

    #[test]
    fn test_find_basis_is_unimodular() {
        for miller in [[0, 0, 1], [1, 1, 0], [1, 1, 1], [2, 1, 0]] {
            let (u, v, w) = find_basis(miller).unwrap();
            let h = Vector3::new(miller[0], miller[1], miller[2]);
            assert_eq!(h.dot(&u), 0);
            assert_eq!(h.dot(&v), 0);
            assert_eq!(h.dot(&w), 1);
            let det = Matrix3::from_columns(&[u, v, w]).map(|x| x as f64).determinant();
            assert!((det - 1.0).abs() < 1e-9, "{:?}", miller);
        }
        assert_eq!(reduce_miller([2, 2, 0]), [1, 1, 0]);
    }

    #[test]
    fn test_simple_cubic_001_slab() {
        let params = SlabParameters {
            miller: [0, 0, 1],
            min_slab_size: 10.0,
            min_vacuum_size: 10.0,
            ..SlabParameters::default()
        };
        let slabs = generate_slabs(&simple_cubic(3.0), &params).unwrap();
        assert_eq!(slabs.len(), 1);

        let slab = &slabs[0];
        // ceil(10/3) = 4 层原子 + 4 层真空
        assert_eq!(slab.num_sites(), 4);
        let [a, b, c] = slab.lattice.lengths();
        assert!((a - 3.0).abs() < 1e-9 && (b - 3.0).abs() < 1e-9);
        assert!((c - 24.0).abs() < 1e-9);

        let m = slab.lattice.matrix;
        assert!(m[2][0].abs() < 1e-9 && m[2][1].abs() < 1e-9);

        // z = 1.5, 4.5, 7.5, 10.5 Å；min_z = 5 冻结两层
        assert_eq!(count_frozen(slab), 2);
    }

    #[test]
    fn test_in_unit_planes() {
        let params = SlabParameters {
            miller: [0, 0, 1],
            min_slab_size: 3.0,
            min_vacuum_size: 2.0,
            in_unit_planes: true,
            ..SlabParameters::default()
        };
        let slabs = enumerate_slabs(&simple_cubic(3.0), &params).unwrap();
        assert_eq!(slabs[0].num_sites(), 3);
        assert!((slabs[0].lattice.lengths()[2] - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_rocksalt_terminations_deduplicated() {
        let params = SlabParameters {
            miller: [0, 0, 1],
            min_slab_size: 10.0,
            min_vacuum_size: 10.0,
            ..SlabParameters::default()
        };
        let slabs = generate_slabs(&rocksalt(), &params).unwrap();
        assert_eq!(slabs.len(), 1);
        assert_eq!(slabs[0].reduced_formula(), "NaCl");
        assert!(is_symmetric(&slabs[0]));
    }

    #[test]
    fn test_symmetric_filter_and_no_slabs_error() {
        let mut params = SlabParameters {
            miller: [0, 0, 1],
            min_slab_size: 10.0,
            min_vacuum_size: 10.0,
            require_symmetric: false,
            ..SlabParameters::default()
        };

        let slabs = generate_slabs(&polar_stack(), &params).unwrap();
        assert_eq!(slabs.len(), 2);
        assert!(slabs.iter().all(|s| !is_symmetric(s)));

        params.require_symmetric = true;
        match generate_slabs(&polar_stack(), &params) {
            Err(AutoVaspError::NoSlabsGenerated {
                miller,
                require_symmetric,
                ..
            }) => {
                assert_eq!(miller, [0, 0, 1]);
                assert!(require_symmetric);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_parameters() {
        let params = SlabParameters {
            miller: [0, 0, 0],
            ..SlabParameters::default()
        };
        assert!(matches!(
            generate_slabs(&simple_cubic(3.0), &params),
            Err(AutoVaspError::InvalidArgument(_))
        ));
    }
}
