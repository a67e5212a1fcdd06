//! # tabulate 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/tabulate.rs`

use super::TemplateArgs;
use clap::Args;
use std::path::PathBuf;

/// tabulate 子命令参数
#[derive(Args, Debug)]
pub struct TabulateArgs {
    /// Directory containing structure files
    pub input: PathBuf,

    /// Glob patterns for structure files, comma separated
    #[arg(long, default_value = "POSCAR*,CONTCAR*,*.vasp,*.poscar")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Tabulate the input decks of this job type instead of bare structures
    #[arg(short, long)]
    pub job_type: Option<String>,

    /// CSV output file
    #[arg(short, long, default_value = "structures.csv")]
    pub output: PathBuf,

    /// Do not print the table
    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    #[command(flatten)]
    pub templates: TemplateArgs,
}
