//! # VASP 输出读取模块
//!
//! 两阶段读取：
//! 1. `VaspOutput::open`：读取轻量文件（INCAR, POSCAR, POTCAR, KPOINTS, KPATH, CONTCAR）
//! 2. `load_heavy_artifacts`：读取 OUTCAR, CHGCAR, EIGENVAL, vasprun.xml, PROCAR，
//!    记录 DOSCAR 路径
//!
//! 汇总记录需要第二阶段；结构变化只依赖 POSCAR 与 CONTCAR。
//!
//! ## 依赖关系
//! - 被 `commands/output.rs` 使用
//! - 使用 `parsers/`, `symmetry/`, `tabulate.rs`
//! - 子模块: followup

pub mod followup;

pub use followup::FollowupKind;

use crate::error::{AutoVaspError, Result};
use crate::models::{Crystal, OutcarSummary, ParameterMap, VasprunSummary};
use crate::parsers::chgcar::{self, ChgcarHeader};
use crate::parsers::eigenval::{self, EigenvalHeader};
use crate::parsers::kpoints::{self, Kpoints};
use crate::parsers::procar::{self, ProcarHeader};
use crate::parsers::{incar, outcar, poscar, potcar, vasprun};
use crate::symmetry;
use crate::tabulate;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 始终读取的轻量文件
#[derive(Debug, Clone)]
pub struct LightArtifacts {
    pub incar: ParameterMap,
    pub potcar_symbols: Vec<String>,
    pub kpoints: Kpoints,
    /// 目录中没有 KPATH 时为 None
    pub kpath: Option<Kpoints>,
    pub initial_structure: Crystal,
    pub final_structure: Crystal,
}

/// 按需读取的重型文件
#[derive(Debug, Clone)]
pub struct HeavyArtifacts {
    pub outcar: OutcarSummary,
    pub chgcar: ChgcarHeader,
    pub eigenval: EigenvalHeader,
    pub vasprun: VasprunSummary,
    pub procar: ProcarHeader,
    /// 只记录路径，不打开
    pub doscar: PathBuf,
}

/// 一次计算的输出目录
#[derive(Debug, Clone)]
pub struct VaspOutput {
    directory: PathBuf,
    light: LightArtifacts,
    heavy: Option<HeavyArtifacts>,
}

/// 计算结果汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub formula: String,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub volume: f64,
    pub num_species: usize,
    pub sym_symbol: String,
    pub intl_number: i32,
    pub k_x: Option<u32>,
    pub k_y: Option<u32>,
    pub k_z: Option<u32>,
    pub n_kpoints: usize,
    pub energy: Option<f64>,
    pub energy_per_atom: Option<f64>,
}

/// 结构变化（终态 - 初态）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StructuralDelta {
    pub d_a: f64,
    pub d_b: f64,
    pub d_c: f64,
    pub d_alpha: f64,
    pub d_beta: f64,
    pub d_gamma: f64,
    #[serde(rename = "dV")]
    pub d_volume: f64,
}

/// `output.csv` 的一行：汇总 + 结构变化
#[derive(Debug, Clone, PartialEq, Serialize)]
struct OutputRow<'a> {
    formula: &'a str,
    a: f64,
    b: f64,
    c: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
    volume: f64,
    num_species: usize,
    sym_symbol: &'a str,
    intl_number: i32,
    k_x: Option<u32>,
    k_y: Option<u32>,
    k_z: Option<u32>,
    n_kpoints: usize,
    energy: Option<f64>,
    energy_per_atom: Option<f64>,
    d_a: f64,
    d_b: f64,
    d_c: f64,
    d_alpha: f64,
    d_beta: f64,
    d_gamma: f64,
    #[serde(rename = "dV")]
    d_volume: f64,
}

impl VaspOutput {
    /// 读取轻量文件
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(AutoVaspError::DirectoryNotFound {
                path: dir.display().to_string(),
            });
        }

        let kpath_path = dir.join("KPATH");
        let kpath = if kpath_path.is_file() {
            Some(kpoints::parse_kpoints_file(&kpath_path)?)
        } else {
            None
        };

        let light = LightArtifacts {
            incar: incar::parse_incar_file(&dir.join("INCAR"))?,
            potcar_symbols: potcar::parse_potcar_symbols(&dir.join("POTCAR"))?,
            kpoints: kpoints::parse_kpoints_file(&dir.join("KPOINTS"))?,
            kpath,
            initial_structure: poscar::parse_poscar_file(&dir.join("POSCAR"))?,
            final_structure: poscar::parse_poscar_file(&dir.join("CONTCAR"))?,
        };

        Ok(VaspOutput {
            directory: dir.to_path_buf(),
            light,
            heavy: None,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn light(&self) -> &LightArtifacts {
        &self.light
    }

    /// 已加载时返回重型文件
    pub fn heavy(&self) -> Option<&HeavyArtifacts> {
        self.heavy.as_ref()
    }

    pub fn is_full(&self) -> bool {
        self.heavy.is_some()
    }

    /// 读取重型文件，进入完整阶段
    pub fn load_heavy_artifacts(&mut self) -> Result<&HeavyArtifacts> {
        let dir = &self.directory;
        let heavy = HeavyArtifacts {
            outcar: outcar::parse_outcar(&dir.join("OUTCAR"))?,
            chgcar: chgcar::parse_chgcar_file(&dir.join("CHGCAR"))?,
            eigenval: eigenval::parse_eigenval_file(&dir.join("EIGENVAL"))?,
            vasprun: vasprun::parse_vasprun_file(&dir.join("vasprun.xml"))?,
            procar: procar::parse_procar_file(&dir.join("PROCAR"))?,
            doscar: dir.join("DOSCAR"),
        };
        Ok(self.heavy.insert(heavy))
    }

    fn require_heavy(&self) -> Result<&HeavyArtifacts> {
        self.heavy
            .as_ref()
            .ok_or_else(|| AutoVaspError::HeavyArtifactsNotLoaded {
                directory: self.directory.display().to_string(),
            })
    }

    /// 以 vasprun.xml 的终态结构为准；缺失时用 CONTCAR
    pub fn summary_record(&self) -> Result<SummaryRecord> {
        let heavy = self.require_heavy()?;
        let run = &heavy.vasprun;
        let structure = run
            .final_structure
            .as_ref()
            .unwrap_or(&self.light.final_structure);

        let (a, b, c, alpha, beta, gamma) = structure.lattice.parameters();
        let (sym_symbol, intl_number) = symmetry::space_group_label(structure);
        let mesh = run.kpoint_mesh;
        let energy = run.final_energy;

        Ok(SummaryRecord {
            formula: structure.reduced_formula(),
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
            volume: structure.volume(),
            num_species: structure.composition().len(),
            sym_symbol,
            intl_number,
            k_x: mesh.map(|m| m[0]),
            k_y: mesh.map(|m| m[1]),
            k_z: mesh.map(|m| m[2]),
            n_kpoints: run.kpoint_count,
            energy,
            energy_per_atom: energy
                .filter(|_| structure.num_sites() > 0)
                .map(|e| e / structure.num_sites() as f64),
        })
    }

    pub fn structural_delta(&self) -> StructuralDelta {
        compare_structures(&self.light.initial_structure, &self.light.final_structure)
    }

    /// 写出 `<dir>/output.csv`
    pub fn export_csv(&self) -> Result<PathBuf> {
        let s = self.summary_record()?;
        let d = self.structural_delta();
        let row = OutputRow {
            formula: &s.formula,
            a: s.a,
            b: s.b,
            c: s.c,
            alpha: s.alpha,
            beta: s.beta,
            gamma: s.gamma,
            volume: s.volume,
            num_species: s.num_species,
            sym_symbol: &s.sym_symbol,
            intl_number: s.intl_number,
            k_x: s.k_x,
            k_y: s.k_y,
            k_z: s.k_z,
            n_kpoints: s.n_kpoints,
            energy: s.energy,
            energy_per_atom: s.energy_per_atom,
            d_a: d.d_a,
            d_b: d.d_b,
            d_c: d.d_c,
            d_alpha: d.d_alpha,
            d_beta: d.d_beta,
            d_gamma: d.d_gamma,
            d_volume: d.d_volume,
        };
        let path = self.directory.join("output.csv");
        tabulate::write_csv(&path, &[row])?;
        Ok(path)
    }

    /// 准备 DOS / DOS_lobster / BAND 后续计算目录
    pub fn prepare_followup_directory(&self, kind: FollowupKind, write_incar: bool) -> Result<PathBuf> {
        followup::prepare_followup_directory(&self.directory, kind, write_incar)
    }
}

/// 晶格参数与体积之差，终态减初态
pub fn compare_structures(initial: &Crystal, final_structure: &Crystal) -> StructuralDelta {
    let (a1, b1, c1, al1, be1, ga1) = initial.lattice.parameters();
    let (a2, b2, c2, al2, be2, ga2) = final_structure.lattice.parameters();
    StructuralDelta {
        d_a: a2 - a1,
        d_b: b2 - b1,
        d_c: c2 - c1,
        d_alpha: al2 - al1,
        d_beta: be2 - be1,
        d_gamma: ga2 - ga1,
        d_volume: final_structure.volume() - initial.volume(),
    }
}
