//! # VASP PROCAR 头部读取
//!
//! 第二行形如 `# of k-points:   20         # of bands:   24         # of ions:    5`。
//!
//! ## 依赖关系
//! - 被 `output/` 使用

use crate::error::{AutoVaspError, Result};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"# of k-points:\s*(\d+)\s+# of bands:\s*(\d+)\s+# of ions:\s*(\d+)").unwrap()
});

/// PROCAR 摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcarHeader {
    pub num_kpoints: usize,
    pub num_bands: usize,
    pub num_ions: usize,
}

/// 只读取文件开头，PROCAR 往往很大
pub fn parse_procar_file(path: &Path) -> Result<ProcarHeader> {
    let file = File::open(path).map_err(|e| AutoVaspError::read(path, e))?;
    let head: Vec<String> = BufReader::new(file)
        .lines()
        .take(5)
        .map_while(|l| l.ok())
        .collect();
    parse_procar_header(&head.join("\n"))
        .ok_or_else(|| AutoVaspError::parse("procar", path.display().to_string(), "Missing header line"))
}

pub fn parse_procar_header(content: &str) -> Option<ProcarHeader> {
    let cap = HEADER_RE.captures(content)?;
    Some(ProcarHeader {
        num_kpoints: cap[1].parse().ok()?,
        num_bands: cap[2].parse().ok()?,
        num_ions: cap[3].parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header() {
        let content = "PROCAR lm decomposed\n# of k-points:   20         # of bands:   24         # of ions:    5\n";
        let header = parse_procar_header(content).unwrap();
        assert_eq!(
            header,
            ProcarHeader {
                num_kpoints: 20,
                num_bands: 24,
                num_ions: 5
            }
        );
        assert!(parse_procar_header("garbage").is_none());
    }
}
