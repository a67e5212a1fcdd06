//! # 解析器模块
//!
//! VASP 输入/输出文件与分子文件的读写。
//!
//! ## 依赖关系
//! - 被 `acquire/`, `deck/`, `output/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, xyz, incar, kpoints, potcar, outcar, chgcar, eigenval, procar, vasprun

pub mod chgcar;
pub mod eigenval;
pub mod incar;
pub mod kpoints;
pub mod outcar;
pub mod poscar;
pub mod potcar;
pub mod procar;
pub mod vasprun;
pub mod xyz;

use crate::error::{AutoVaspError, Result};
use crate::models::Crystal;
use std::path::Path;

/// 判断文件名是否为 VASP 结构文件 (POSCAR*, CONTCAR*, *.vasp, *.poscar)
pub fn is_structure_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    if ext == "vasp" || ext == "poscar" {
        return true;
    }
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.starts_with("POSCAR") || name.starts_with("CONTCAR"))
        .unwrap_or(false)
}

/// 从文件路径推断格式并解析结构
pub fn parse_structure_file(path: &Path) -> Result<Crystal> {
    if !path.exists() {
        return Err(AutoVaspError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    if is_structure_file(path) {
        return poscar::parse_poscar_file(path);
    }
    Err(AutoVaspError::parse(
        "structure",
        path.display().to_string(),
        "Cannot determine format (expected POSCAR, CONTCAR, *.vasp or *.poscar)",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_is_structure_file() {
        assert!(is_structure_file(&PathBuf::from("run/POSCAR")));
        assert!(is_structure_file(&PathBuf::from("CONTCAR_frozen")));
        assert!(is_structure_file(&PathBuf::from("Bi2Se3.vasp")));
        assert!(is_structure_file(&PathBuf::from("H2O.poscar")));
        assert!(!is_structure_file(&PathBuf::from("INCAR")));
    }
}
