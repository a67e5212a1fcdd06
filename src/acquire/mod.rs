//! # 结构获取模块
//!
//! 从本地文件或材料数据库得到 `Crystal`，从 XYZ 得到吸附物 `Molecule`。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `parsers/`, `symmetry/`
//! - 子模块: database

pub mod database;

pub use database::{normalize_material_id, MaterialsDatabase, MpRester};

use crate::error::Result;
use crate::models::{Crystal, Molecule};
use crate::parsers;
use crate::symmetry;
use std::path::Path;

/// 读取结构文件；位点按电负性稳定排序，不做原胞约化
pub fn load_from_file(path: &Path) -> Result<Crystal> {
    Ok(parsers::parse_structure_file(path)?.sorted())
}

/// 读取 XYZ 分子
pub fn molecule_from_file(path: &Path) -> Result<Molecule> {
    parsers::xyz::parse_xyz_file(path)
}

/// 从数据库获取结构并返回惯用标准晶胞
pub fn load_from_source(db: &dyn MaterialsDatabase, id: &str) -> Result<Crystal> {
    let material_id = normalize_material_id(id);
    let raw = db.fetch_structure(&material_id)?;
    let mut conventional = symmetry::conventional_cell(&raw)?;
    conventional.name = material_id;
    Ok(conventional)
}

/// 使用 Materials Project 获取结构
pub fn load_from_database(id: &str, api_key: &str, endpoint: Option<&str>) -> Result<Crystal> {
    let rester = match endpoint {
        Some(url) => MpRester::with_endpoint(api_key, url)?,
        None => MpRester::new(api_key)?,
    };
    load_from_source(&rester, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutoVaspError;
    use crate::models::{Atom, Lattice};
    use std::cell::RefCell;
    use std::fs;

    /// 记录请求 ID 的内存数据库
    struct FakeDatabase {
        requested: RefCell<Vec<String>>,
    }

    impl MaterialsDatabase for FakeDatabase {
        fn fetch_structure(&self, material_id: &str) -> Result<Crystal> {
            self.requested.borrow_mut().push(material_id.to_string());
            if material_id != "mp-22862" {
                return Err(AutoVaspError::MaterialNotFound(material_id.to_string()));
            }
            let mut atoms = Vec::new();
            for p in [[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [0.5, 0.0, 0.5], [0.0, 0.5, 0.5]] {
                atoms.push(Atom::new("Cl", [(p[0] + 0.5) % 1.0, p[1], p[2]]));
                atoms.push(Atom::new("Na", p));
            }
            Ok(Crystal::new("raw", Lattice::cubic(5.64), atoms))
        }
    }

    #[test]
    fn test_load_from_source_prefixes_id_and_standardises() {
        let db = FakeDatabase {
            requested: RefCell::new(Vec::new()),
        };
        let crystal = load_from_source(&db, "22862").unwrap();

        assert_eq!(db.requested.borrow().as_slice(), ["mp-22862".to_string()]);
        assert_eq!(crystal.name, "mp-22862");
        assert_eq!(crystal.reduced_formula(), "NaCl");
        assert_eq!(crystal.num_sites(), 8);

        assert!(matches!(
            load_from_source(&db, "mp-1"),
            Err(AutoVaspError::MaterialNotFound(_))
        ));
    }

    #[test]
    fn test_load_from_file_sorts_sites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("POSCAR");
        fs::write(
            &path,
            "ClNa\n1.0\n5.6 0 0\n0 5.6 0\n0 0 5.6\nCl Na\n1 1\nDirect\n0.5 0.5 0.5\n0 0 0\n",
        )
        .unwrap();

        let crystal = load_from_file(&path).unwrap();
        assert_eq!(crystal.atoms[0].element, "Na");
        assert_eq!(crystal.atoms[1].element, "Cl");
    }

    #[test]
    fn test_load_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_from_file(&dir.path().join("POSCAR")),
            Err(AutoVaspError::FileNotFound { .. })
        ));

        let bad = dir.path().join("CONTCAR");
        fs::write(&bad, "garbage\n").unwrap();
        assert!(matches!(load_from_file(&bad), Err(AutoVaspError::ParseError { .. })));
    }
}
