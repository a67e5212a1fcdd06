//! # 后续计算目录
//!
//! 在计算目录下建立 `DOS`, `DOS_lobster` 或 `BAND` 子目录：
//! - CONTCAR 复制为 POSCAR
//! - 复制 vasprun.xml, KPOINTS, CHGCAR, WAVECAR, POTCAR
//! - 可选：父目录 INCAR 与 `dos` / `band` 预设合并后写出 INCAR
//! - BAND：父目录存在 KPATH 时，用它覆盖 KPOINTS
//!
//! ## 依赖关系
//! - 被 `output/mod.rs`, `commands/output.rs` 使用
//! - 使用 `templates/`, `parsers/incar.rs`

use crate::error::{AutoVaspError, Result};
use crate::models::ParameterMap;
use crate::parsers::incar;
use crate::templates;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// 原样复制的文件
pub const COPIED_FILES: [&str; 5] = ["vasprun.xml", "KPOINTS", "CHGCAR", "WAVECAR", "POTCAR"];

/// 后续计算类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowupKind {
    Dos,
    DosLobster,
    Band,
}

impl FollowupKind {
    /// 子目录名
    pub fn directory_name(&self) -> &'static str {
        match self {
            FollowupKind::Dos => "DOS",
            FollowupKind::DosLobster => "DOS_lobster",
            FollowupKind::Band => "BAND",
        }
    }

    /// 合并 INCAR 使用的预设
    pub fn job_type(&self) -> &'static str {
        match self {
            FollowupKind::Dos | FollowupKind::DosLobster => "dos",
            FollowupKind::Band => "band",
        }
    }
}

impl fmt::Display for FollowupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.directory_name())
    }
}

/// 建立后续计算目录并返回其路径；任一文件复制失败即返回错误
pub fn prepare_followup_directory(parent: &Path, kind: FollowupKind, write_incar: bool) -> Result<PathBuf> {
    if !parent.is_dir() {
        return Err(AutoVaspError::DirectoryNotFound {
            path: parent.display().to_string(),
        });
    }

    let target = parent.join(kind.directory_name());
    fs::create_dir_all(&target).map_err(|e| AutoVaspError::write(&target, e))?;

    copy(&parent.join("CONTCAR"), &target.join("POSCAR"))?;
    for name in COPIED_FILES {
        copy(&parent.join(name), &target.join(name))?;
    }

    if kind == FollowupKind::Band {
        let kpath = parent.join("KPATH");
        if kpath.is_file() {
            copy(&kpath, &target.join("KPOINTS"))?;
        }
    }

    if write_incar {
        let base = incar::parse_incar_file(&parent.join("INCAR"))?;
        let preset = templates::lookup(kind.job_type())?;
        let merged = templates::merge(&upper_case_tags(&base), &upper_case_tags(&preset));
        incar::write_incar_file(&merged, &target.join("INCAR"))?;
    }

    Ok(target)
}

/// INCAR 标签不区分大小写，合并前统一为大写
fn upper_case_tags(params: &ParameterMap) -> ParameterMap {
    params
        .iter()
        .map(|(tag, value)| (tag.to_ascii_uppercase(), value.to_string()))
        .collect()
}

fn copy(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| AutoVaspError::read(from, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::write_calculation;
    use crate::output::VaspOutput;

    #[test]
    fn test_prepare_dos_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_calculation(dir.path());

        let output = VaspOutput::open(dir.path()).unwrap();
        let target = output.prepare_followup_directory(FollowupKind::Dos, false).unwrap();
        assert_eq!(target, dir.path().join("DOS"));

        let contcar = fs::read_to_string(dir.path().join("CONTCAR")).unwrap();
        assert_eq!(fs::read_to_string(target.join("POSCAR")).unwrap(), contcar);
        for name in COPIED_FILES {
            assert!(target.join(name).is_file(), "{} missing", name);
        }
        assert!(!target.join("INCAR").exists());

        let lobster = prepare_followup_directory(dir.path(), FollowupKind::DosLobster, false).unwrap();
        assert!(lobster.ends_with("DOS_lobster"));
    }

    #[test]
    fn test_prepare_band_directory_with_incar() {
        let dir = tempfile::tempdir().unwrap();
        write_calculation(dir.path());

        let target = prepare_followup_directory(dir.path(), FollowupKind::Band, true).unwrap();

        let kpoints = fs::read_to_string(target.join("KPOINTS")).unwrap();
        assert!(kpoints.contains("Line_mode"));

        let merged = incar::parse_incar_file(&target.join("INCAR")).unwrap();
        let band = templates::lookup("band").unwrap();
        for (tag, value) in band.iter() {
            assert_eq!(merged.get(&tag.to_ascii_uppercase()), Some(value));
        }
        assert_eq!(merged.keys().next(), Some("SYSTEM"));
    }

    #[test]
    fn test_merged_incar_has_single_system_tag() {
        let dir = tempfile::tempdir().unwrap();
        write_calculation(dir.path());
        fs::write(dir.path().join("INCAR"), "System = parent\nENCUT = 520\n").unwrap();

        let target = prepare_followup_directory(dir.path(), FollowupKind::Dos, true).unwrap();
        let merged = incar::parse_incar_file(&target.join("INCAR")).unwrap();

        let system: Vec<_> = merged.iter().filter(|(tag, _)| tag.eq_ignore_ascii_case("SYSTEM")).collect();
        assert_eq!(system.len(), 1);
        let preset = templates::lookup("dos").unwrap();
        let expected = preset.iter().find(|(tag, _)| tag.eq_ignore_ascii_case("SYSTEM")).map(|(_, v)| v);
        assert_eq!(Some(system[0].1), expected);
        assert_eq!(merged.get("ENCUT"), Some("520"));
    }

    #[test]
    fn test_missing_file_propagates() {
        let dir = tempfile::tempdir().unwrap();
        write_calculation(dir.path());
        fs::remove_file(dir.path().join("WAVECAR")).unwrap();

        assert!(matches!(
            prepare_followup_directory(dir.path(), FollowupKind::Dos, false),
            Err(AutoVaspError::FileReadError { .. })
        ));
    }
}
