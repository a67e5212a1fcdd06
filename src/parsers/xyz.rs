//! # XYZ 分子文件解析器
//!
//! ## XYZ 格式说明
//! ```text
//! 3                      # number of atoms
//! water                  # comment line
//! O  0.000  0.000  0.119
//! H  0.000  0.763 -0.477
//! H  0.000 -0.763 -0.477
//! ```
//!
//! ## 依赖关系
//! - 被 `acquire/` 使用
//! - 使用 `models/molecule.rs`

use crate::error::{AutoVaspError, Result};
use crate::models::{Molecule, MoleculeSite};
use std::fs;
use std::path::Path;

/// 解析 XYZ 文件；分子名取文件名
pub fn parse_xyz_file(path: &Path) -> Result<Molecule> {
    let content = fs::read_to_string(path).map_err(|e| AutoVaspError::read(path, e))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("molecule");
    parse_xyz_content(&content, name).map_err(|e| match e {
        AutoVaspError::ParseError { format, reason, .. } => AutoVaspError::ParseError {
            format,
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

/// 解析 XYZ 文本
pub fn parse_xyz_content(content: &str, name: &str) -> Result<Molecule> {
    let mut lines = content.lines();
    let fail = |reason: String| AutoVaspError::parse("xyz", name, reason);

    let count: usize = lines
        .next()
        .and_then(|l| l.trim().parse().ok())
        .ok_or_else(|| fail("First line must be the atom count".to_string()))?;

    // 注释行
    lines.next();

    let mut sites = Vec::with_capacity(count);
    for (i, line) in lines.filter(|l| !l.trim().is_empty()).take(count).enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let coords: Vec<f64> = parts
            .iter()
            .skip(1)
            .take(3)
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.is_empty() || coords.len() < 3 {
            return Err(fail(format!("Invalid atom line {}", i + 3)));
        }
        sites.push(MoleculeSite {
            element: crate::models::element::bare_symbol(parts[0]),
            coords: [coords[0], coords[1], coords[2]],
        });
    }

    if sites.len() != count {
        return Err(fail(format!("Expected {} atoms, found {}", count, sites.len())));
    }

    Ok(Molecule::new(name, sites))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_water() {
        let content = "3\nwater\nO 0.0 0.0 0.119\nH 0.0 0.763 -0.477\nH 0.0 -0.763 -0.477\n";
        let mol = parse_xyz_content(content, "H2O").unwrap();
        assert_eq!(mol.len(), 3);
        assert_eq!(mol.sites[1].element, "H");
        assert!((mol.sites[2].coords[1] + 0.763).abs() < 1e-12);
    }

    #[test]
    fn test_count_mismatch() {
        let content = "2\n\nO 0 0 0\n";
        assert!(parse_xyz_content(content, "O").is_err());
    }
}
