//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。外部配置（API key、赝势库路径、
//! tag 白名单、模板文件）只在这里从环境变量读取。
//!
//! ## 命令结构
//! - `generate`: 由结构文件或 MP ID 写出输入组
//! - `slab` / `adsorb` / `extend` / `freeze` / `box`: 结构变换
//! - `tabulate`: 目录下结构的表格汇总
//! - `templates`: 模板查看与校验（嵌套子命令）
//! - `output`: 计算结果汇总与后续目录（嵌套子命令）
//! - `analyze`: 吸附能分析（嵌套子命令）
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: generate, structure, tabulate, templates, output, analyze

pub mod analyze;
pub mod generate;
pub mod output;
pub mod structure;
pub mod tabulate;
pub mod templates;

use crate::deck::{DeckConfig, DEFAULT_FUNCTIONAL_DIR};
use crate::error::{AutoVaspError, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// autovasp - VASP 输入组生成工具
#[derive(Parser)]
#[command(name = "autovasp")]
#[command(version)]
#[command(about = "Generate VASP input decks and collect their results", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Write input decks for structure files or Materials Project IDs
    Generate(generate::GenerateArgs),

    /// Cut slabs from a bulk structure
    Slab(structure::SlabArgs),

    /// Place molecules on the adsorption sites of a slab
    Adsorb(structure::AdsorbArgs),

    /// Build a supercell (<file>_extended)
    Extend(structure::ExtendArgs),

    /// Freeze atoms below a height (<file>_frozen)
    Freeze(structure::FreezeArgs),

    /// Put XYZ molecules in a vacuum box
    Box(structure::BoxArgs),

    /// Summarize structures in a directory as a table and CSV
    Tabulate(tabulate::TabulateArgs),

    /// Inspect and validate job templates
    Templates(templates::TemplatesArgs),

    /// Summarize finished calculations or prepare follow-up runs
    Output(output::OutputArgs),

    /// Analyze calculation results
    Analyze(analyze::AnalyzeArgs),
}

// ─────────────────────────────────────────────────────────────
// 共享参数
// ─────────────────────────────────────────────────────────────

/// 赝势库位置
#[derive(Args, Debug, Clone)]
pub struct PseudopotentialArgs {
    /// Root directory of the POTCAR library
    #[arg(long, env = "VASP_PSP_DIR")]
    pub psp_dir: Option<PathBuf>,

    /// Functional subdirectory inside the POTCAR library
    #[arg(long, default_value = DEFAULT_FUNCTIONAL_DIR)]
    pub functional_dir: String,
}

impl PseudopotentialArgs {
    /// 写 POTCAR 需要赝势库；未给出时报错
    pub fn deck_config(&self) -> Result<DeckConfig> {
        let psp_dir = self.psp_dir.clone().ok_or_else(|| {
            AutoVaspError::InvalidArgument(
                "POTCAR library not set (use --psp-dir or VASP_PSP_DIR)".to_string(),
            )
        })?;
        Ok(DeckConfig {
            psp_dir,
            functional_dir: self.functional_dir.clone(),
        })
    }
}

/// 模板与 tag 白名单来源
#[derive(Args, Debug, Clone)]
pub struct TemplateArgs {
    /// JSON file with job templates (built-in table if omitted)
    #[arg(long, env = "AUTOVASP_TEMPLATES")]
    pub templates: Option<PathBuf>,

    /// File listing valid INCAR tags, one per line
    #[arg(long, env = "AUTOVASP_TAGS", default_value = "resources/INCAR_TAGS.txt")]
    pub tags: PathBuf,
}

/// 解析 `TAG=VALUE`
pub fn parse_tag(s: &str) -> std::result::Result<(String, String), String> {
    let (tag, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid tag '{}', expected TAG=VALUE", s))?;
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(format!("Invalid tag '{}', empty tag name", s));
    }
    Ok((tag.to_string(), value.trim().to_string()))
}

/// 解析 `a,b,c` 形式的三元组
pub fn parse_triple<T: std::str::FromStr>(s: &str) -> std::result::Result<[T; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("Expected three comma-separated values, got '{}'", s));
    }
    let mut out = Vec::with_capacity(3);
    for p in parts {
        out.push(p.parse::<T>().map_err(|_| format!("Invalid value '{}' in '{}'", p, s))?);
    }
    out.try_into()
        .map_err(|_| format!("Expected three comma-separated values, got '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_tag("ENCUT = 600").unwrap(), ("ENCUT".into(), "600".into()));
        assert_eq!(parse_tag("MAGMOM=2*1.0").unwrap().1, "2*1.0");
        assert!(parse_tag("ENCUT").is_err());
        assert!(parse_tag("=1").is_err());
    }

    #[test]
    fn test_parse_triple() {
        assert_eq!(parse_triple::<i32>("1,-1,0").unwrap(), [1, -1, 0]);
        assert_eq!(parse_triple::<f64>("15, 15, 20").unwrap(), [15.0, 15.0, 20.0]);
        assert!(parse_triple::<i32>("1,1").is_err());
        assert!(parse_triple::<u32>("1,x,1").is_err());
    }

    #[test]
    fn test_generate_args() {
        let cli = Cli::try_parse_from([
            "autovasp",
            "generate",
            "POSCAR",
            "--mp-id",
            "149",
            "--set",
            "ENCUT=600",
            "--job-type",
            "dos",
            "--psp-dir",
            "/opt/psp",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.inputs, vec![PathBuf::from("POSCAR")]);
                assert_eq!(args.mp_ids, vec!["149".to_string()]);
                assert_eq!(args.set, vec![("ENCUT".to_string(), "600".to_string())]);
                assert_eq!(args.job_type, "dos");
                assert_eq!(args.psp.functional_dir, DEFAULT_FUNCTIONAL_DIR);
                assert!(args.psp.deck_config().is_ok());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_slab_args() {
        let cli = Cli::try_parse_from(["autovasp", "slab", "POSCAR", "--miller", "1,1,1"]).unwrap();
        match cli.command {
            Commands::Slab(args) => {
                assert_eq!(args.miller, [1, 1, 1]);
                assert!(!args.allow_asymmetric);
                assert_eq!(args.min_slab_size, 15.0);
            }
            _ => panic!("expected slab"),
        }
    }
}
