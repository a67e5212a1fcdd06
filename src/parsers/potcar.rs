//! # VASP POTCAR 读取
//!
//! 只读取每个赝势块的 `TITEL` 行中的符号，例如
//! `   TITEL  = PAW_PBE Bi_d 06Sep2000` -> `Bi_d`。
//!
//! ## 依赖关系
//! - 被 `output/` 使用

use crate::error::{AutoVaspError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static TITEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TITEL\s*=\s*\S+\s+(\S+)").unwrap());

/// 读取 POTCAR 中的赝势符号（按文件顺序）
pub fn parse_potcar_symbols(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| AutoVaspError::read(path, e))?;
    let symbols = potcar_symbols(&content);
    if symbols.is_empty() {
        return Err(AutoVaspError::parse(
            "potcar",
            path.display().to_string(),
            "No TITEL lines found",
        ));
    }
    Ok(symbols)
}

/// 从 POTCAR 文本提取符号
pub fn potcar_symbols(content: &str) -> Vec<String> {
    TITEL_RE
        .captures_iter(content)
        .map(|cap| cap[1].to_string())
        .collect()
}
