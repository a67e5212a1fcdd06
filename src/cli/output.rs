//! # output 子命令 CLI 定义
//!
//! - `summarize`: 读取计算目录并写出 `output.csv`
//! - `prepare`: 建立 DOS / DOS_lobster / BAND 后续目录
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/output.rs`

use crate::output::FollowupKind;
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

/// output 主命令参数
#[derive(Args, Debug)]
pub struct OutputArgs {
    #[command(subcommand)]
    pub command: OutputCommands,
}

/// output 子命令
#[derive(Subcommand, Debug)]
pub enum OutputCommands {
    /// Read finished calculations and write output.csv in each directory
    Summarize(SummarizeArgs),

    /// Create a follow-up calculation directory
    Prepare(PrepareArgs),
}

/// summarize 参数
#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Calculation directories
    #[arg(required = true)]
    pub directories: Vec<PathBuf>,

    /// Also collect all rows into this CSV file
    #[arg(long, value_name = "FILE")]
    pub combined: Option<PathBuf>,
}

/// 后续计算类型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FollowupType {
    /// Density of states (DOS/)
    Dos,
    /// Density of states for LOBSTER (DOS_lobster/)
    DosLobster,
    /// Band structure (BAND/)
    Band,
}

impl From<FollowupType> for FollowupKind {
    fn from(t: FollowupType) -> Self {
        match t {
            FollowupType::Dos => FollowupKind::Dos,
            FollowupType::DosLobster => FollowupKind::DosLobster,
            FollowupType::Band => FollowupKind::Band,
        }
    }
}

/// prepare 参数
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Finished calculation directory
    pub directory: PathBuf,

    /// Follow-up calculation type
    #[arg(short, long, value_enum)]
    pub kind: FollowupType,

    /// Write an INCAR merged from the parent INCAR and the dos/band template
    #[arg(long, default_value_t = false)]
    pub incar: bool,
}
