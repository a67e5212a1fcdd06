//! # analyze 子命令 CLI 定义
//!
//! 分析功能统一入口：
//! - `adsorption`: 由三张能量表计算吸附能
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/analyze.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// analyze 主命令参数
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(subcommand)]
    pub command: AnalyzeCommands,
}

/// analyze 子命令
#[derive(Subcommand, Debug)]
pub enum AnalyzeCommands {
    /// Compute adsorption energies from slab, adsorbate and adsorbed-slab energies
    Adsorption(AdsorptionArgs),
}

/// adsorption 参数
#[derive(Args, Debug)]
pub struct AdsorptionArgs {
    /// CSV with columns System, Energy
    #[arg(long, default_value = "slabs.csv")]
    pub slabs: PathBuf,

    /// CSV with columns Adsorbate, Energy
    #[arg(long, default_value = "adsorbates.csv")]
    pub adsorbates: PathBuf,

    /// CSV with columns Directory, Adsorbate, Energy
    #[arg(long, default_value = "slabs_adsorbates.csv")]
    pub adsorbed: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = "adsorption_energies.csv")]
    pub output: PathBuf,

    /// Scatter plot of the adsorption energies (PNG)
    #[arg(long, default_value = "adsorption_energies.png")]
    pub output_plot: PathBuf,

    /// Skip plot generation
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,
}
