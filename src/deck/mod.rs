//! # VASP 输入文件组装模块
//!
//! `InputDeck` 持有一个结构与一组 INCAR 参数，在构造时（不做任何 I/O）计算：
//! - POSCAR 文本（按电负性排序）
//! - POTCAR 赝势符号
//! - 自动 k 点网格
//! - 能带用 line-mode 路径 (KPATH)
//!
//! 写出目录布局：`POSCAR`, `INCAR`, `POTCAR`, `KPOINTS`, `KPATH`，
//! 可选 `README.txt` 与 `initial_parameters.csv`。
//!
//! ## 依赖关系
//! - 被 `commands/`, `tabulate.rs` 使用
//! - 使用 `parsers/`, `symmetry/`, `templates/`
//! - 子模块: potcar, kpoints, readme

pub mod kpoints;
pub mod potcar;
pub mod readme;

pub use potcar::{PotcarSpec, DEFAULT_FUNCTIONAL_DIR};

use crate::error::{AutoVaspError, Result};
use crate::models::{Crystal, ParameterMap};
use crate::parsers::kpoints::{KPath, KpointMesh};
use crate::parsers::{incar, poscar};
use crate::symmetry::{self, kpath};
use crate::tabulate;
use crate::templates;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 写出时需要的外部配置
#[derive(Debug, Clone)]
pub struct DeckConfig {
    /// 赝势库根目录
    pub psp_dir: PathBuf,
    /// 泛函子目录 (e.g. "POT_GGA_PAW_PBE")
    pub functional_dir: String,
}

impl DeckConfig {
    pub fn new(psp_dir: impl Into<PathBuf>) -> Self {
        DeckConfig {
            psp_dir: psp_dir.into(),
            functional_dir: DEFAULT_FUNCTIONAL_DIR.to_string(),
        }
    }
}

/// 一次组装得到的全部输入
#[derive(Debug, Clone, PartialEq)]
pub struct InputFiles {
    pub poscar: String,
    pub potcar: PotcarSpec,
    pub kpoints: KpointMesh,
    pub kpath: KPath,
    pub incar: ParameterMap,
}

/// VASP 输入组
#[derive(Debug, Clone)]
pub struct InputDeck {
    structure: Crystal,
    parameters: ParameterMap,
    poscar: String,
    potcar: PotcarSpec,
    kpoints: KpointMesh,
    kpath: KPath,
    space_group: (String, i32),
}

impl InputDeck {
    pub fn new(structure: &Crystal, parameters: ParameterMap) -> Self {
        let structure = structure.sorted();
        let space_group = symmetry::space_group_label(&structure);
        InputDeck {
            poscar: poscar::to_poscar_string(&structure),
            potcar: PotcarSpec::for_structure(&structure),
            kpoints: kpoints::automatic_mesh(&structure, &space_group.0, true),
            kpath: kpath::high_symmetry_kpath(&structure, kpath::DEFAULT_DIVISIONS),
            space_group,
            structure,
            parameters,
        }
    }

    /// 从已有输入目录读取 (POSCAR + INCAR)
    pub fn from_directory(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(AutoVaspError::DirectoryNotFound {
                path: dir.display().to_string(),
            });
        }
        let structure = poscar::parse_poscar_file(&dir.join("POSCAR"))?;
        let parameters = incar::parse_incar_file(&dir.join("INCAR"))?;
        Ok(InputDeck::new(&structure, parameters))
    }

    pub fn structure(&self) -> &Crystal {
        &self.structure
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    pub fn potcar(&self) -> &PotcarSpec {
        &self.potcar
    }

    pub fn kpoints(&self) -> &KpointMesh {
        &self.kpoints
    }

    pub fn kpath(&self) -> &KPath {
        &self.kpath
    }

    /// (空间群符号, 空间群号)；分析失败时为 ("Unknown", 0)
    pub fn space_group(&self) -> (&str, i32) {
        (&self.space_group.0, self.space_group.1)
    }

    /// 组装输入；给出 `overrides` 时 INCAR 完全由它构成
    pub fn assemble(&self, overrides: Option<&ParameterMap>) -> InputFiles {
        InputFiles {
            poscar: self.poscar.clone(),
            potcar: self.potcar.clone(),
            kpoints: self.kpoints.clone(),
            kpath: self.kpath.clone(),
            incar: overrides.unwrap_or(&self.parameters).clone(),
        }
    }

    /// 写出五个输入文件；目录不存在时创建，已存在的文件被覆盖
    pub fn write(&self, dir: &Path, config: &DeckConfig, with_readme: bool) -> Result<()> {
        if dir.exists() && !dir.is_dir() {
            return Err(AutoVaspError::write(
                dir,
                io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
            ));
        }
        fs::create_dir_all(dir).map_err(|e| AutoVaspError::write(dir, e))?;

        let potcar = self.potcar.concatenate(&config.psp_dir, &config.functional_dir)?;
        let files = self.assemble(None);

        write_text(&dir.join("POSCAR"), &files.poscar)?;
        incar::write_incar_file(&files.incar, &dir.join("INCAR"))?;
        write_text(&dir.join("POTCAR"), &potcar)?;
        write_text(&dir.join("KPOINTS"), &files.kpoints.to_kpoints_string())?;
        write_text(&dir.join("KPATH"), &files.kpath.to_kpoints_string())?;

        if with_readme {
            let text = readme::readme_text(&self.structure, &self.space_group.0, chrono::Local::now());
            write_text(&dir.join("README.txt"), &text)?;
            tabulate::write_csv(&dir.join("initial_parameters.csv"), &[tabulate::deck_record(self)])?;
        }

        Ok(())
    }
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| AutoVaspError::write(path, e))
}

/// 作业目录名：约化化学式（仅字母数字）+ `_` + 作业类型
pub fn directory_name(crystal: &Crystal, job_type: &str) -> String {
    let formula: String = crystal
        .reduced_formula()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("{}_{}", formula, job_type)
}

/// 用内置模板写出一个作业目录
pub fn write_job_files(
    crystal: &Crystal,
    job_type: &str,
    dir: &Path,
    config: &DeckConfig,
    readme: bool,
) -> Result<()> {
    let parameters = templates::lookup(job_type)?;
    InputDeck::new(crystal, parameters).write(dir, config, readme)
}
