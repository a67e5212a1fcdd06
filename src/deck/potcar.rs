//! # POTCAR 选择与拼接
//!
//! 部分元素使用带半芯态的推荐赝势（`_sv`, `_pv`, `_d`），其余直接使用元素符号。
//! POTCAR 文本在写出时从赝势库 `<psp_dir>/<functional_dir>/<symbol>/POTCAR` 拼接。
//!
//! ## 依赖关系
//! - 被 `deck/mod.rs` 使用

use crate::error::{AutoVaspError, Result};
use crate::models::Crystal;
use std::fs;
use std::path::Path;

/// 默认泛函目录
pub const DEFAULT_FUNCTIONAL_DIR: &str = "POT_GGA_PAW_PBE";

/// 元素 -> 推荐赝势
pub static RECOMMENDED_POTENTIALS: &[(&str, &str)] = &[
    ("Bi", "Bi_d"),
    ("Ba", "Ba_sv"),
    ("Ca", "Ca_sv"),
    ("Li", "Li_sv"),
    ("K", "K_sv"),
    ("Cr", "Cr_pv"),
    ("Cu", "Cu_pv"),
    ("Cs", "Cs_sv"),
    ("Hf", "Hf_pv"),
    ("Mn", "Mn_pv"),
    ("Mo", "Mo_pv"),
    ("Nb", "Nb_pv"),
    ("Ni", "Ni_pv"),
    ("Os", "Os_pv"),
    ("Pd", "Pd_pv"),
    ("Rb", "Rb_sv"),
    ("Re", "Re_pv"),
    ("Rh", "Rh_pv"),
    ("Ru", "Ru_pv"),
    ("Ta", "Ta_pv"),
    ("Tc", "Tc_pv"),
    ("Ti", "Ti_pv"),
    ("V", "V_pv"),
    ("W", "W_pv"),
];

/// 元素对应的赝势符号
pub fn potential_symbol(element: &str) -> &str {
    RECOMMENDED_POTENTIALS
        .iter()
        .find(|(el, _)| *el == element)
        .map(|(_, sym)| *sym)
        .unwrap_or(element)
}

/// POTCAR 描述：按 POSCAR 元素顺序的赝势符号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotcarSpec {
    pub symbols: Vec<String>,
}

impl PotcarSpec {
    pub fn for_structure(crystal: &Crystal) -> Self {
        PotcarSpec {
            symbols: crystal
                .elements()
                .iter()
                .map(|el| potential_symbol(el).to_string())
                .collect(),
        }
    }

    /// 拼接赝势库中的 POTCAR 文件
    pub fn concatenate(&self, psp_dir: &Path, functional_dir: &str) -> Result<String> {
        let mut out = String::new();
        for symbol in &self.symbols {
            let path = psp_dir.join(functional_dir).join(symbol).join("POTCAR");
            if !path.is_file() {
                return Err(AutoVaspError::PseudopotentialNotFound {
                    symbol: symbol.clone(),
                    path: path.display().to_string(),
                });
            }
            let text = fs::read_to_string(&path).map_err(|e| AutoVaspError::read(&path, e))?;
            out.push_str(&text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    #[test]
    fn test_recommended_symbols() {
        assert_eq!(RECOMMENDED_POTENTIALS.len(), 24);
        assert_eq!(potential_symbol("Bi"), "Bi_d");
        assert_eq!(potential_symbol("Ti"), "Ti_pv");
        assert_eq!(potential_symbol("Se"), "Se");

        let crystal = Crystal::new(
            "BaTiO3",
            Lattice::cubic(4.0),
            vec![
                Atom::new("Ba", [0.0; 3]),
                Atom::new("Ti", [0.5; 3]),
                Atom::new("O", [0.5, 0.5, 0.0]),
            ],
        );
        let spec = PotcarSpec::for_structure(&crystal);
        assert_eq!(spec.symbols, vec!["Ba_sv", "Ti_pv", "O"]);
    }

    #[test]
    fn test_concatenate_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join(DEFAULT_FUNCTIONAL_DIR);
        for sym in ["Bi_d", "Se"] {
            fs::create_dir_all(lib.join(sym)).unwrap();
            fs::write(lib.join(sym).join("POTCAR"), format!("  PAW_PBE {} 06Sep2000\nEnd of Dataset\n", sym)).unwrap();
        }

        let spec = PotcarSpec { symbols: vec!["Bi_d".into(), "Se".into()] };
        let text = spec.concatenate(dir.path(), DEFAULT_FUNCTIONAL_DIR).unwrap();
        assert_eq!(text.matches("End of Dataset").count(), 2);
        assert!(text.find("Bi_d").unwrap() < text.find(" Se ").unwrap());

        let missing = PotcarSpec { symbols: vec!["Te".into()] };
        assert!(matches!(
            missing.concatenate(dir.path(), DEFAULT_FUNCTIONAL_DIR),
            Err(AutoVaspError::PseudopotentialNotFound { .. })
        ));
    }
}
