//! # 分子数据模型
//!
//! 吸附物分子：元素 + 笛卡尔坐标，无晶格。
//!
//! ## 依赖关系
//! - 被 `parsers/xyz.rs`, `transform/adsorption.rs` 使用

use serde::{Deserialize, Serialize};

/// 分子中的一个原子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeSite {
    pub element: String,
    /// 笛卡尔坐标 (Å)
    pub coords: [f64; 3],
}

/// 分子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub name: String,
    pub sites: Vec<MoleculeSite>,
}

impl Molecule {
    pub fn new(name: impl Into<String>, sites: Vec<MoleculeSite>) -> Self {
        Molecule {
            name: name.into(),
            sites,
        }
    }

    /// 单原子吸附物 (e.g. "O" 位于原点)
    pub fn single_atom(element: &str) -> Self {
        Molecule::new(
            element,
            vec![MoleculeSite {
                element: element.to_string(),
                coords: [0.0; 3],
            }],
        )
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// 化学式（按出现顺序）
    pub fn formula(&self) -> String {
        let mut order: Vec<(&str, usize)> = Vec::new();
        for site in &self.sites {
            match order.iter_mut().find(|(el, _)| *el == site.element) {
                Some((_, n)) => *n += 1,
                None => order.push((&site.element, 1)),
            }
        }
        order
            .into_iter()
            .map(|(el, n)| if n == 1 { el.to_string() } else { format!("{}{}", el, n) })
            .collect()
    }

    /// 最低原子（z 最小）的坐标
    pub fn lowest_point(&self) -> Option<[f64; 3]> {
        self.sites
            .iter()
            .map(|s| s.coords)
            .min_by(|a, b| a[2].partial_cmp(&b[2]).unwrap_or(std::cmp::Ordering::Equal))
    }
}
