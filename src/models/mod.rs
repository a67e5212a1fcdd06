//! # 数据模型模块
//!
//! 定义晶体结构、分子、INCAR 参数表等统一数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `transform/`, `deck/`, `output/` 使用
//! - 子模块: element, structure, molecule, parameters, calculation

pub mod calculation;
pub mod element;
pub mod molecule;
pub mod parameters;
pub mod structure;

pub use calculation::{OutcarSummary, VasprunSummary};
pub use molecule::{Molecule, MoleculeSite};
pub use parameters::ParameterMap;
pub use structure::{Atom, Crystal, Lattice};
