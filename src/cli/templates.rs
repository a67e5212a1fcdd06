//! # templates 子命令 CLI 定义
//!
//! - `list`: 列出作业类型
//! - `show`: 以 INCAR 格式打印一个模板
//! - `check`: 用 tag 白名单校验模板或 JSON 参数表
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/templates.rs`

use super::TemplateArgs;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// templates 主命令参数
#[derive(Args, Debug)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub command: TemplatesCommands,
}

/// templates 子命令
#[derive(Subcommand, Debug)]
pub enum TemplatesCommands {
    /// List the available job types
    List(ListArgs),

    /// Print the INCAR of one job type
    Show(ShowArgs),

    /// Check templates or a JSON parameter file against the tag allow-list
    Check(CheckArgs),
}

/// list 参数
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub templates: TemplateArgs,
}

/// show 参数
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Job type
    pub job_type: String,

    #[command(flatten)]
    pub templates: TemplateArgs,
}

/// check 参数
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Job type to check (all job types if omitted)
    #[arg(conflicts_with = "file")]
    pub job_type: Option<String>,

    /// JSON file holding a single tag -> value map
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub templates: TemplateArgs,
}
