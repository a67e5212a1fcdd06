//! # 底层原子冻结
//!
//! 笛卡尔 z < min_z 的原子标记为 `F F F`，其余为 `T T T`。
//!
//! ## 依赖关系
//! - 被 `transform/slab.rs`, `transform/adsorption.rs`, `commands/structure.rs` 使用

use crate::models::Crystal;

pub fn freeze(crystal: &Crystal, min_z: f64) -> Crystal {
    let mut frozen = crystal.clone();
    for (i, atom) in frozen.atoms.iter_mut().enumerate() {
        let z = crystal.cart_coords(i)[2];
        atom.selective_dynamics = Some(if z < min_z { [false; 3] } else { [true; 3] });
    }
    frozen
}

/// 三个方向都被固定的原子数
pub fn count_frozen(crystal: &Crystal) -> usize {
    crystal.atoms.iter().filter(|a| a.is_frozen()).count()
}
