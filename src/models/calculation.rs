//! # VASP 计算结果数据模型
//!
//! 存储从 OUTCAR / vasprun.xml 中提取的计算摘要。
//!
//! ## 依赖关系
//! - 被 `parsers/outcar.rs`, `parsers/vasprun.rs` 使用
//! - 被 `output/` 使用

use serde::{Deserialize, Serialize};

/// OUTCAR 摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcarSummary {
    /// 计算是否正常结束
    pub is_finished: bool,

    /// 最后一个离子步的 energy(sigma->0) (eV)
    pub energy_ev: Option<f64>,

    /// 焓 (eV) - 仅在恒压计算中出现
    pub enthalpy_ev: Option<f64>,

    /// 费米能级 (eV)
    pub efermi_ev: Option<f64>,

    /// 体积 (Å³)
    pub volume: Option<f64>,

    /// 原子数
    pub num_atoms: Option<usize>,

    /// 离子步数
    pub ionic_steps: usize,
}

impl OutcarSummary {
    /// 计算每原子能量
    pub fn energy_per_atom(&self) -> Option<f64> {
        match (self.energy_ev, self.num_atoms) {
            (Some(e), Some(n)) if n > 0 => Some(e / n as f64),
            _ => None,
        }
    }
}

/// vasprun.xml 摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VasprunSummary {
    /// 最终能量 e_0_energy (eV)
    pub final_energy: Option<f64>,

    /// 自动 k 网格划分
    pub kpoint_mesh: Option<[u32; 3]>,

    /// 不可约 k 点数
    pub kpoint_count: usize,

    /// 最终结构
    pub final_structure: Option<crate::models::Crystal>,

    /// 带隙 (eV)，由本征值与占据数推出
    pub band_gap: Option<f64>,
}
