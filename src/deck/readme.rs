//! # README.txt 生成
//!
//! ## 依赖关系
//! - 被 `deck/mod.rs` 使用
//! - 使用 `chrono`

use crate::models::Crystal;
use chrono::{DateTime, Local};

/// README 全文
pub fn readme_text(crystal: &Crystal, space_group: &str, created: DateTime<Local>) -> String {
    let [a, b, c] = crystal.lattice.lengths();
    let [alpha, beta, gamma] = crystal.lattice.angles();
    format!(
        "This directory contains the input files for a VASP calculation created by autovasp\n\
         The date and time of creation is {}\n\
         The structure is {}\n\
         The space group is {}\n\
         The lattice parameters are ({:.6}, {:.6}, {:.6}) and angles are ({:.4}, {:.4}, {:.4})\n",
        created.format("%Y-%m-%d %H:%M:%S"),
        crystal.reduced_formula(),
        space_group,
        a,
        b,
        c,
        alpha,
        beta,
        gamma
    )
}
