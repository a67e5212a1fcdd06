//! # VASP CHGCAR 头部读取
//!
//! CHGCAR = POSCAR 头 + 空行 + 网格维度 + 电荷密度 (ρ·V)。
//! 只读取结构、网格维度，以及第一块数据的平均值（即总电子数）。
//!
//! ## 依赖关系
//! - 被 `output/` 使用
//! - 使用 `parsers/poscar.rs`

use super::poscar::parse_poscar_content;
use crate::error::{AutoVaspError, Result};
use crate::models::Crystal;
use std::fs;
use std::path::Path;

/// CHGCAR 摘要
#[derive(Debug, Clone, PartialEq)]
pub struct ChgcarHeader {
    pub structure: Crystal,
    pub grid: [usize; 3],
    /// 总电子数（网格数据的平均值）
    pub total_charge: Option<f64>,
}

pub fn parse_chgcar_file(path: &Path) -> Result<ChgcarHeader> {
    let content = fs::read_to_string(path).map_err(|e| AutoVaspError::read(path, e))?;
    parse_chgcar_content(&content, &path.display().to_string())
}

pub fn parse_chgcar_content(content: &str, source: &str) -> Result<ChgcarHeader> {
    let lines: Vec<&str> = content.lines().collect();
    let fail = |reason: &str| AutoVaspError::parse("chgcar", source, reason);

    let blank = lines
        .iter()
        .enumerate()
        .skip(7)
        .find(|(_, l)| l.trim().is_empty())
        .map(|(i, _)| i)
        .ok_or_else(|| fail("Missing blank line after the structure block"))?;

    let structure = parse_poscar_content(&lines[..blank].join("\n"), "CHGCAR")?;

    let dims: Vec<usize> = lines
        .get(blank + 1)
        .ok_or_else(|| fail("Missing grid line"))?
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    if dims.len() < 3 {
        return Err(fail("Invalid grid line"));
    }
    let grid = [dims[0], dims[1], dims[2]];

    let n_points = grid[0] * grid[1] * grid[2];
    let mut sum = 0.0;
    let mut read = 0usize;
    'outer: for line in &lines[blank + 2..] {
        for token in line.split_whitespace() {
            if read == n_points {
                break 'outer;
            }
            match token.parse::<f64>() {
                Ok(v) => {
                    sum += v;
                    read += 1;
                }
                Err(_) => break 'outer,
            }
        }
    }

    let total_charge = if n_points > 0 && read == n_points {
        Some(sum / n_points as f64)
    } else {
        None
    };

    Ok(ChgcarHeader {
        structure,
        grid,
        total_charge,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_small_chgcar() {
        let content = "H\n1.0\n2 0 0\n0 2 0\n0 0 2\nH\n1\nDirect\n0 0 0\n\n 2 1 1\n 1.5 2.5\n";
        let header = parse_chgcar_content(content, "CHGCAR").unwrap();
        assert_eq!(header.grid, [2, 1, 1]);
        assert_eq!(header.structure.num_sites(), 1);
        assert!((header.total_charge.unwrap() - 2.0).abs() < 1e-12);
    }
}
