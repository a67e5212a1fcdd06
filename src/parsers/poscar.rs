//! # VASP POSCAR 格式解析器
//!
//! 解析和生成 VASP POSCAR/CONTCAR 文件格式。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor (负值表示目标体积)
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1 [T T T]       # atom positions (+ flags)
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `acquire/`, `deck/`, `output/` 使用
//! - 使用 `models/structure.rs`

use crate::error::{AutoVaspError, Result};
use crate::models::{Atom, Crystal, Lattice};
use std::fs;
use std::path::Path;

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Crystal> {
    let content = fs::read_to_string(path).map_err(|e| AutoVaspError::read(path, e))?;

    parse_poscar_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
    .map_err(|e| match e {
        AutoVaspError::ParseError { format, reason, .. } => AutoVaspError::ParseError {
            format,
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

/// 从字符串内容解析 POSCAR 格式
pub fn parse_poscar_content(content: &str, default_name: &str) -> Result<Crystal> {
    let lines: Vec<&str> = content.lines().collect();
    let fail = |reason: String| AutoVaspError::parse("poscar", default_name, reason);

    if lines.len() < 8 {
        return Err(fail("File too short".to_string()));
    }

    // Line 0: Comment/name
    let name = lines[0].trim().to_string();
    let name = if name.is_empty() {
        default_name.to_string()
    } else {
        name
    };

    // Line 1: Scaling factor
    let scale: f64 = lines[1]
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| fail(format!("Invalid scaling factor '{}'", lines[1].trim())))?;

    // Lines 2-4: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for i in 0..3 {
        let parts: Vec<f64> = lines[2 + i]
            .split_whitespace()
            .take(3)
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.len() < 3 {
            return Err(fail(format!("Invalid lattice vector at line {}", 3 + i)));
        }
        matrix[i] = [parts[0], parts[1], parts[2]];
    }

    // 负的缩放因子表示目标体积
    let factor = if scale < 0.0 {
        let raw_volume = Lattice::from_vectors(matrix).volume().abs();
        (scale.abs() / raw_volume).cbrt()
    } else {
        scale
    };
    for row in matrix.iter_mut() {
        for x in row.iter_mut() {
            *x *= factor;
        }
    }
    let lattice = Lattice::from_vectors(matrix);

    // Line 5: Element symbols (VASP 5+) or atom counts (VASP 4)
    let line5_parts: Vec<&str> = lines[5].split_whitespace().collect();
    if line5_parts.is_empty() {
        return Err(fail("Missing element/count line".to_string()));
    }
    let (elements, counts, atom_line_start) = if line5_parts[0].parse::<usize>().is_ok() {
        // VASP 4 format: 用注释行中的元素符号，否则用占位名
        let counts: Vec<usize> = line5_parts.iter().filter_map(|s| s.parse().ok()).collect();
        let from_comment: Vec<String> = name.split_whitespace().map(|s| s.to_string()).collect();
        let elements: Vec<String> = if from_comment.len() == counts.len()
            && from_comment.iter().all(|s| crate::models::element::is_known(s))
        {
            from_comment
        } else {
            (0..counts.len()).map(|i| format!("X{}", i + 1)).collect()
        };
        (elements, counts, 6)
    } else {
        // VASP 5+ format: element symbols on line 5, counts on line 6
        let elements: Vec<String> = line5_parts
            .iter()
            .map(|s| crate::models::element::bare_symbol(s))
            .collect();
        let counts: Vec<usize> = lines[6]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        (elements, counts, 7)
    };

    if elements.len() != counts.len() {
        return Err(fail(format!(
            "{} element symbols but {} counts",
            elements.len(),
            counts.len()
        )));
    }

    // Check for "Selective dynamics" line
    let mut coord_line = atom_line_start;
    let mut selective = false;
    if lines.len() > coord_line
        && lines[coord_line]
            .trim()
            .to_lowercase()
            .starts_with('s')
    {
        selective = true;
        coord_line += 1;
    }

    // Coordinate type line
    if lines.len() <= coord_line {
        return Err(fail("Missing coordinate type line".to_string()));
    }

    let coord_type = lines[coord_line].trim().to_lowercase();
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');

    // Parse atom positions
    let mut atoms: Vec<Atom> = Vec::new();
    let mut line_idx = coord_line + 1;

    for (elem, &count) in elements.iter().zip(counts.iter()) {
        for _ in 0..count {
            let line = lines
                .get(line_idx)
                .ok_or_else(|| fail(format!("Expected {} atom positions", counts.iter().sum::<usize>())))?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let parts: Vec<f64> = tokens
                .iter()
                .take(3)
                .filter_map(|s| s.parse().ok())
                .collect();

            if parts.len() < 3 {
                return Err(fail(format!("Invalid atom position at line {}", line_idx + 1)));
            }

            let position = if is_cartesian {
                lattice.cart_to_frac([parts[0] * factor, parts[1] * factor, parts[2] * factor])
            } else {
                [parts[0], parts[1], parts[2]]
            };
            let mut atom = Atom::new(elem.clone(), position);

            if selective {
                let flags: Vec<bool> = tokens
                    .iter()
                    .skip(3)
                    .take(3)
                    .map(|t| t.to_uppercase().starts_with('T'))
                    .collect();
                if flags.len() == 3 {
                    atom.selective_dynamics = Some([flags[0], flags[1], flags[2]]);
                }
            }

            atoms.push(atom);
            line_idx += 1;
        }
    }

    Ok(Crystal::new(name, lattice, atoms))
}

/// 将 Crystal 转换为 POSCAR 格式字符串
///
/// 原子按元素首次出现顺序分组；任一原子带选择性动力学标记时写出
/// `Selective dynamics` 段，未标记的原子按 `T T T` 写出。
pub fn to_poscar_string(crystal: &Crystal) -> String {
    let elem_order = crystal.elements();
    let selective = crystal.atoms.iter().any(|a| a.selective_dynamics.is_some());

    let mut result = String::new();

    // Line 0: Comment
    let comment = if crystal.name.trim().is_empty() {
        crystal.formula()
    } else {
        crystal.name.clone()
    };
    result.push_str(&format!("{}\n", comment));

    // Line 1: Scale
    result.push_str("1.0\n");

    // Lines 2-4: Lattice
    for row in &crystal.lattice.matrix {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }

    // Line 5: Elements
    result.push_str(&format!("   {}\n", elem_order.join("   ")));

    // Line 6: Counts
    let counts: Vec<String> = elem_order
        .iter()
        .map(|e| crystal.atoms.iter().filter(|a| &a.element == e).count().to_string())
        .collect();
    result.push_str(&format!("   {}\n", counts.join("   ")));

    if selective {
        result.push_str("Selective dynamics\n");
    }

    // Coordinate type
    result.push_str("Direct\n");

    // Atom positions
    for elem in &elem_order {
        for atom in crystal.atoms.iter().filter(|a| &a.element == elem) {
            let pos = atom.position;
            result.push_str(&format!(
                "  {:16.10}  {:16.10}  {:16.10}",
                pos[0], pos[1], pos[2]
            ));
            if selective {
                let flags = atom.selective_dynamics.unwrap_or([true; 3]);
                let letter = |b: bool| if b { "T" } else { "F" };
                result.push_str(&format!(
                    " {} {} {}",
                    letter(flags[0]),
                    letter(flags[1]),
                    letter(flags[2])
                ));
            }
            result.push_str(&format!(" {}\n", atom.element));
        }
    }

    result
}

/// 写出 POSCAR 文件
pub fn write_poscar_file(crystal: &Crystal, path: &Path) -> Result<()> {
    fs::write(path, to_poscar_string(crystal)).map_err(|e| AutoVaspError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_poscar_vasp5() {
        let content = r#"NaCl
1.0
5.64 0.0 0.0
0.0 5.64 0.0
0.0 0.0 5.64
Na Cl
4 4
Direct
0.0 0.0 0.0
0.5 0.5 0.0
0.5 0.0 0.5
0.0 0.5 0.5
0.5 0.0 0.0
0.0 0.5 0.0
0.0 0.0 0.5
0.5 0.5 0.5
"#;
        let crystal = parse_poscar_content(content, "NaCl").unwrap();
        assert_eq!(crystal.name, "NaCl");
        assert_eq!(crystal.atoms.len(), 8);

        let na_count = crystal.atoms.iter().filter(|a| a.element == "Na").count();
        let cl_count = crystal.atoms.iter().filter(|a| a.element == "Cl").count();
        assert_eq!(na_count, 4);
        assert_eq!(cl_count, 4);
        assert!(!crystal.has_selective_dynamics());
    }

    #[test]
    fn test_parse_poscar_with_scale() {
        let content = r#"Si
2.0
2.0 0.0 0.0
0.0 2.0 0.0
0.0 0.0 2.0
Si
2
Direct
0.0 0.0 0.0
0.5 0.5 0.5
"#;
        let crystal = parse_poscar_content(content, "Si").unwrap();
        let (a, _, _, _, _, _) = crystal.lattice.parameters();

        // 2.0 * 2.0 = 4.0
        assert!((a - 4.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_poscar_negative_scale_is_volume() {
        let content = r#"Cu
-64.0
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 1.0
Cu
1
Direct
0.0 0.0 0.0
"#;
        let crystal = parse_poscar_content(content, "Cu").unwrap();
        assert!((crystal.volume() - 64.0).abs() < 1e-8);
    }

    #[test]
    fn test_parse_poscar_selective_dynamics() {
        let content = r#"Fe with selective
1.0
2.87 0.0 0.0
0.0 2.87 0.0
0.0 0.0 2.87
Fe
2
Selective dynamics
Direct
0.0 0.0 0.0 T T T
0.5 0.5 0.5 F F F
"#;
        let crystal = parse_poscar_content(content, "Fe").unwrap();
        assert_eq!(crystal.atoms.len(), 2);
        assert_eq!(crystal.atoms[0].selective_dynamics, Some([true; 3]));
        assert!(crystal.atoms[1].is_frozen());
    }

    #[test]
    fn test_parse_poscar_cartesian() {
        let content = r#"Po
1.0
4.0 0.0 0.0
0.0 4.0 0.0
0.0 0.0 4.0
Po
1
Cartesian
2.0 1.0 3.0
"#;
        let crystal = parse_poscar_content(content, "Po").unwrap();
        let p = crystal.atoms[0].position;
        assert!((p[0] - 0.5).abs() < 1e-10);
        assert!((p[1] - 0.25).abs() < 1e-10);
        assert!((p[2] - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_truncated_positions_is_error() {
        let content = "X\n1.0\n1 0 0\n0 1 0\n0 0 1\nH\n3\nDirect\n0 0 0\n";
        assert!(parse_poscar_content(content, "X").is_err());
    }

    #[test]
    fn test_poscar_round_trip_keeps_flags() {
        let lattice = Lattice::cubic(4.0);
        let atoms = vec![
            Atom::new("Ti", [0.0, 0.0, 0.0]).with_selective_dynamics([false; 3]),
            Atom::new("O", [0.5, 0.5, 0.0]).with_selective_dynamics([true; 3]),
            Atom::new("O", [0.5, 0.0, 0.5]).with_selective_dynamics([true; 3]),
        ];
        let crystal = Crystal::new("TiO2", lattice, atoms);

        let poscar_str = to_poscar_string(&crystal);
        assert!(poscar_str.contains("Selective dynamics"));

        let parsed = parse_poscar_content(&poscar_str, "round_trip").unwrap();
        assert_eq!(parsed.atoms.len(), 3);
        assert!(parsed.atoms[0].is_frozen());
        assert_eq!(parsed.atoms[2].selective_dynamics, Some([true; 3]));
        assert_eq!(parsed.reduced_formula(), "TiO2");
    }
}
