//! # 结构变换子命令 CLI 定义
//!
//! `slab`, `adsorb`, `extend`, `freeze`, `box` 的参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/slab.rs`, `commands/adsorb.rs`, `commands/structure.rs`

use super::{parse_triple, PseudopotentialArgs, TemplateArgs};
use clap::Args;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
// slab
// ─────────────────────────────────────────────────────────────

/// slab 子命令参数
#[derive(Args, Debug)]
pub struct SlabArgs {
    /// Bulk structure file
    #[arg(required_unless_present = "mp_id")]
    pub input: Option<PathBuf>,

    /// Fetch the bulk structure from Materials Project instead
    #[arg(long, value_name = "ID", conflicts_with = "input")]
    pub mp_id: Option<String>,

    /// Materials Project API key
    #[arg(long, env = "MP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Materials Project API endpoint
    #[arg(long, env = "MP_API_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Miller index of the surface (e.g., "1,1,1")
    #[arg(short, long, value_parser = parse_triple::<i32>, default_value = "0,0,1", allow_hyphen_values = true)]
    pub miller: [i32; 3],

    /// Minimum slab thickness (Å, or planes with --in-unit-planes)
    #[arg(long, default_value_t = 15.0)]
    pub min_slab_size: f64,

    /// Minimum vacuum thickness (Å, or planes with --in-unit-planes)
    #[arg(long, default_value_t = 15.0)]
    pub min_vacuum_size: f64,

    /// Measure slab and vacuum sizes in lattice planes
    #[arg(long, default_value_t = false)]
    pub in_unit_planes: bool,

    /// Keep slabs whose two surfaces differ
    #[arg(long, default_value_t = false)]
    pub allow_asymmetric: bool,

    /// Atoms below this height (Å) are frozen
    #[arg(long, default_value_t = 5.0)]
    pub min_z: f64,

    /// Write a full input deck per slab with this job type (POSCAR only if omitted)
    #[arg(short, long)]
    pub job_type: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Also write README.txt and initial_parameters.csv
    #[arg(long, default_value_t = false)]
    pub readme: bool,

    #[command(flatten)]
    pub psp: PseudopotentialArgs,

    #[command(flatten)]
    pub templates: TemplateArgs,
}

// ─────────────────────────────────────────────────────────────
// adsorb
// ─────────────────────────────────────────────────────────────

/// adsorb 子命令参数
#[derive(Args, Debug)]
pub struct AdsorbArgs {
    /// Slab structure file
    pub slab: PathBuf,

    /// Adsorbate molecule in XYZ format (repeatable)
    #[arg(short, long = "molecule", value_name = "XYZ")]
    pub molecules: Vec<PathBuf>,

    /// Single-atom adsorbate by element symbol (repeatable)
    #[arg(short, long = "atom", value_name = "ELEMENT")]
    pub atoms: Vec<String>,

    /// Atoms below this height (Å) are frozen
    #[arg(long, default_value_t = 5.0)]
    pub min_z: f64,

    /// Supercell repeats used to lower coverage (e.g., "2,2,1")
    #[arg(long, value_parser = parse_triple::<u32>, default_value = "1,1,1")]
    pub coverage: [u32; 3],

    /// Write a full input deck per structure with this job type (POSCAR only if omitted)
    #[arg(short, long)]
    pub job_type: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Also write README.txt and initial_parameters.csv
    #[arg(long, default_value_t = false)]
    pub readme: bool,

    #[command(flatten)]
    pub psp: PseudopotentialArgs,

    #[command(flatten)]
    pub templates: TemplateArgs,
}

// ─────────────────────────────────────────────────────────────
// extend / freeze / box
// ─────────────────────────────────────────────────────────────

/// extend 子命令参数
#[derive(Args, Debug)]
pub struct ExtendArgs {
    /// Structure file
    pub input: PathBuf,

    /// Repeats along a, b and c (e.g., "2,2,1")
    #[arg(short, long, value_parser = parse_triple::<u32>)]
    pub scale: [u32; 3],

    /// Output file (default: <input>_extended)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// freeze 子命令参数
#[derive(Args, Debug)]
pub struct FreezeArgs {
    /// Structure file
    pub input: PathBuf,

    /// Atoms below this height (Å) are frozen
    #[arg(long)]
    pub min_z: f64,

    /// Output file (default: <input>_frozen)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// box 子命令参数
#[derive(Args, Debug)]
pub struct BoxArgs {
    /// Molecules in XYZ format
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Box edge lengths in Å (e.g., "15,15,15")
    #[arg(long, value_parser = parse_triple::<f64>, default_value = "15,15,15")]
    pub size: [f64; 3],

    /// Output directory; each molecule is written as <formula>.poscar
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}
