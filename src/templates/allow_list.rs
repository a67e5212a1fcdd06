//! # INCAR tag 白名单
//!
//! 换行分隔的 tag 列表，逐行去除首尾空白，空行忽略。比较区分大小写。
//!
//! ## 依赖关系
//! - 被 `templates/mod.rs` 使用

use crate::error::{AutoVaspError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// 合法 INCAR tag 集合
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    tags: HashSet<String>,
}

impl AllowList {
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AutoVaspError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path).map_err(|e| AutoVaspError::read(path, e))?;
        Ok(Self::from_lines(&content))
    }

    pub fn from_lines(content: &str) -> Self {
        AllowList {
            tags: content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_trimmed_and_case_sensitive() {
        let allow = AllowList::from_lines("ENCUT\n  ISMEAR  \n\nSYSTEM\n");
        assert_eq!(allow.len(), 3);
        assert!(allow.contains("ISMEAR"));
        assert!(allow.contains("SYSTEM"));
        assert!(!allow.contains("System"));
    }
}
