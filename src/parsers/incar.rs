//! # VASP INCAR 读写
//!
//! ## INCAR 格式
//! ```text
//! TAG = VALUE          # comment
//! TAG = VALUE ; TAG2 = VALUE2
//! ```
//! `#` 或 `!` 之后的内容为注释；每个赋值只在第一个 `=` 处切分。
//!
//! ## 依赖关系
//! - 被 `deck/`, `output/` 使用
//! - 使用 `models/parameters.rs`

use crate::error::{AutoVaspError, Result};
use crate::models::ParameterMap;
use std::fs;
use std::path::Path;

/// 读取 INCAR 文件为参数表（保持行顺序）
pub fn parse_incar_file(path: &Path) -> Result<ParameterMap> {
    let content = fs::read_to_string(path).map_err(|e| AutoVaspError::read(path, e))?;
    Ok(parse_incar_content(&content))
}

/// 解析 INCAR 文本；没有 `=` 的行被忽略
pub fn parse_incar_content(content: &str) -> ParameterMap {
    let mut map = ParameterMap::new();

    for line in content.lines() {
        let code = line.split(['#', '!']).next().unwrap_or("");
        for statement in code.split(';') {
            if let Some((tag, value)) = statement.split_once('=') {
                let tag = tag.trim();
                if tag.is_empty() {
                    continue;
                }
                map.insert(tag, value.trim());
            }
        }
    }

    map
}

/// 参数表转 INCAR 文本，每行 `TAG = VALUE`
pub fn to_incar_string(map: &ParameterMap) -> String {
    map.iter()
        .map(|(tag, value)| format!("{} = {}\n", tag, value))
        .collect()
}

/// 写出 INCAR 文件
pub fn write_incar_file(map: &ParameterMap, path: &Path) -> Result<()> {
    fs::write(path, to_incar_string(map)).map_err(|e| AutoVaspError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_comments_and_splits_on_first_equals() {
        let content = "\
SYSTEM = Bi2Se3 slab   # comment
ENCUT = 520 ! also a comment
MAGMOM = 2*1.0 3*0.0
# full line comment

ISMEAR = 0; SIGMA = 0.05
WEIRD = a=b
";
        let map = parse_incar_content(content);
        let keys: Vec<&str> = map.keys().collect();

        assert_eq!(
            keys,
            vec!["SYSTEM", "ENCUT", "MAGMOM", "ISMEAR", "SIGMA", "WEIRD"]
        );
        assert_eq!(map.get("SYSTEM"), Some("Bi2Se3 slab"));
        assert_eq!(map.get("ENCUT"), Some("520"));
        assert_eq!(map.get("SIGMA"), Some("0.05"));
        assert_eq!(map.get("WEIRD"), Some("a=b"));
    }

    #[test]
    fn test_write_then_parse_keeps_order() {
        let map: ParameterMap = [("PREC", "Accurate"), ("EDIFF", "1e-6"), ("LWAVE", ".FALSE.")]
            .into_iter()
            .collect();
        let text = to_incar_string(&map);
        assert_eq!(text, "PREC = Accurate\nEDIFF = 1e-6\nLWAVE = .FALSE.\n");
        assert_eq!(parse_incar_content(&text), map);
    }
}
