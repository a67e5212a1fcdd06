//! # VASP EIGENVAL 头部读取
//!
//! ```text
//!     5     5     1     1        # NIONS NIONS NBLOCK ISPIN
//! ...
//!    48    20    24              # NELECT NKPTS NBANDS (第 6 行)
//! ```
//!
//! ## 依赖关系
//! - 被 `output/` 使用

use crate::error::{AutoVaspError, Result};
use std::fs;
use std::path::Path;

/// EIGENVAL 摘要
#[derive(Debug, Clone, PartialEq)]
pub struct EigenvalHeader {
    pub num_ions: usize,
    pub spin_polarized: bool,
    pub num_electrons: f64,
    pub num_kpoints: usize,
    pub num_bands: usize,
}

pub fn parse_eigenval_file(path: &Path) -> Result<EigenvalHeader> {
    let content = fs::read_to_string(path).map_err(|e| AutoVaspError::read(path, e))?;
    parse_eigenval_content(&content, &path.display().to_string())
}

pub fn parse_eigenval_content(content: &str, source: &str) -> Result<EigenvalHeader> {
    let lines: Vec<&str> = content.lines().collect();
    let fail = |reason: &str| AutoVaspError::parse("eigenval", source, reason);

    let first: Vec<usize> = lines
        .first()
        .ok_or_else(|| fail("Empty file"))?
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    if first.len() < 4 {
        return Err(fail("Invalid first line"));
    }

    let sixth: Vec<f64> = lines
        .get(5)
        .ok_or_else(|| fail("File too short"))?
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    if sixth.len() < 3 {
        return Err(fail("Invalid NELECT/NKPTS/NBANDS line"));
    }

    Ok(EigenvalHeader {
        num_ions: first[0],
        spin_polarized: first[3] == 2,
        num_electrons: sixth[0],
        num_kpoints: sixth[1] as usize,
        num_bands: sixth[2] as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header() {
        let content = "    5    5    1    2\n  0.41E+03  0.44E-09  0.44E-09  0.44E-09  0.50E-15\n  1.0E-004\n  CAR\n Bi2Se3\n   48   20   24\n";
        let header = parse_eigenval_content(content, "EIGENVAL").unwrap();
        assert_eq!(header.num_ions, 5);
        assert!(header.spin_polarized);
        assert_eq!(header.num_kpoints, 20);
        assert_eq!(header.num_bands, 24);
    }
}
