//! # 结构变换模块
//!
//! 所有函数接收 `&Crystal` 并返回新结构，不修改输入。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`, `symmetry/`
//! - 子模块: supercell, freeze, slab, adsorption, boxing

pub mod adsorption;
pub mod boxing;
pub mod freeze;
pub mod slab;
pub mod supercell;

pub use adsorption::{find_adsorption_sites, generate_adsorbed_structures, AdsorptionSite, SiteKind};
pub use boxing::box_molecule;
pub use freeze::{count_frozen, freeze};
pub use slab::{generate_slabs, is_symmetric, SlabParameters};
pub use supercell::extend_supercell;
