//! # generate 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/generate.rs`

use super::{parse_tag, PseudopotentialArgs, TemplateArgs};
use clap::Args;
use std::path::PathBuf;

/// generate 子命令参数
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Structure files (POSCAR, CONTCAR, *.vasp)
    pub inputs: Vec<PathBuf>,

    /// Materials Project IDs, with or without the "mp-" prefix
    #[arg(long = "mp-id", value_name = "ID")]
    pub mp_ids: Vec<String>,

    /// Materials Project API key
    #[arg(long, env = "MP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Materials Project API endpoint
    #[arg(long, env = "MP_API_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Job type used to pick the INCAR template
    #[arg(short, long, default_value = "bulk_relaxation_med_prec")]
    pub job_type: String,

    /// JSON file with INCAR tags merged over the template
    #[arg(long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Extra INCAR tag merged over the template (repeatable)
    #[arg(long = "set", value_name = "TAG=VALUE", value_parser = parse_tag)]
    pub set: Vec<(String, String)>,

    /// Reject templates containing tags missing from the allow-list
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Directory in which the job directories are created
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Also write README.txt and initial_parameters.csv
    #[arg(long, default_value_t = false)]
    pub readme: bool,

    /// Pack the generated job directories into this .tar.gz file
    #[arg(long, value_name = "FILE")]
    pub archive: Option<PathBuf>,

    #[command(flatten)]
    pub psp: PseudopotentialArgs,

    #[command(flatten)]
    pub templates: TemplateArgs,
}
