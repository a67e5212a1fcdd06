//! # output 命令实现
//!
//! - `summarize`: 逐个读取计算目录（含重文件），写出各自的 `output.csv`，
//!   打印汇总表；失败的目录报告后跳过
//! - `prepare`: 建立后续计算子目录
//!
//! ## 依赖关系
//! - 使用 `cli/output.rs` 定义的参数
//! - 使用 `output/`, `tabulate.rs`, `utils/`

use crate::cli::output::{OutputArgs, OutputCommands, PrepareArgs, SummarizeArgs};
use crate::error::Result;
use crate::output::{FollowupKind, SummaryRecord, VaspOutput};
use crate::tabulate;
use crate::utils::{output, progress};
use std::path::Path;
use tabled::Tabled;

/// 执行 output 命令
pub fn execute(args: OutputArgs) -> Result<()> {
    match args.command {
        OutputCommands::Summarize(args) => summarize(args),
        OutputCommands::Prepare(args) => prepare(args),
    }
}

/// 终端显示用的汇总行
#[derive(Debug, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Directory")]
    directory: String,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "Space group")]
    space_group: String,
    #[tabled(rename = "k-points")]
    n_kpoints: usize,
    #[tabled(rename = "Energy (eV)")]
    energy: String,
    #[tabled(rename = "E/atom (eV)")]
    energy_per_atom: String,
    #[tabled(rename = "ΔV (Å³)")]
    d_volume: String,
}

fn format_energy(value: Option<f64>) -> String {
    value.map(|e| format!("{:.6}", e)).unwrap_or_else(|| "-".to_string())
}

/// 读取单个目录并写出其 `output.csv`
fn summarize_directory(dir: &Path) -> Result<(SummaryRecord, SummaryRow)> {
    let mut calculation = VaspOutput::open(dir)?;
    calculation.load_heavy_artifacts()?;
    calculation.export_csv()?;

    let record = calculation.summary_record()?;
    let delta = calculation.structural_delta();
    let row = SummaryRow {
        directory: dir.display().to_string(),
        formula: record.formula.clone(),
        space_group: format!("{} ({})", record.sym_symbol, record.intl_number),
        n_kpoints: record.n_kpoints,
        energy: format_energy(record.energy),
        energy_per_atom: format_energy(record.energy_per_atom),
        d_volume: format!("{:+.3}", delta.d_volume),
    };
    Ok((record, row))
}

fn summarize(args: SummarizeArgs) -> Result<()> {
    output::print_header("Summarizing VASP Calculations");

    let pb = progress::create_progress_bar(args.directories.len() as u64, "Reading");
    let mut records = Vec::new();
    let mut rows = Vec::new();

    for dir in &args.directories {
        pb.set_message(dir.display().to_string());
        match summarize_directory(dir) {
            Ok((record, row)) => {
                records.push(record);
                rows.push(row);
            }
            Err(e) => pb.suspend(|| output::print_error(&format!("{}: {}", dir.display(), e))),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if !rows.is_empty() {
        output::print_table(&rows);
    }

    if let Some(path) = &args.combined {
        tabulate::write_csv(path, &records)?;
        output::print_written("combined summary", path);
    }

    let failed = args.directories.len() - records.len();
    if failed > 0 {
        output::print_warning(&format!("{} of {} directories could not be read", failed, args.directories.len()));
    }
    output::print_done(&format!(
        "Wrote output.csv in {} directories",
        records.len()
    ));

    Ok(())
}

fn prepare(args: PrepareArgs) -> Result<()> {
    let kind: FollowupKind = args.kind.into();
    let calculation = VaspOutput::open(&args.directory)?;
    let target = calculation.prepare_followup_directory(kind, args.incar)?;
    output::print_written(&format!("{} follow-up", kind), &target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::FollowupType;
    use crate::output::tests::write_calculation;

    #[test]
    fn test_summarize_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_calculation(dir.path());

        let (record, row) = summarize_directory(dir.path()).unwrap();
        assert_eq!(row.formula, record.formula);
        assert!(dir.path().join("output.csv").is_file());
        assert_eq!(row.energy, format_energy(record.energy));
    }

    #[test]
    fn test_summarize_skips_bad_directories() {
        let good = tempfile::tempdir().unwrap();
        write_calculation(good.path());
        let combined = good.path().join("all.csv");

        summarize(SummarizeArgs {
            directories: vec![good.path().to_path_buf(), good.path().join("missing")],
            combined: Some(combined.clone()),
        })
        .unwrap();

        let text = std::fs::read_to_string(&combined).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_prepare_band() {
        let dir = tempfile::tempdir().unwrap();
        write_calculation(dir.path());

        prepare(PrepareArgs {
            directory: dir.path().to_path_buf(),
            kind: FollowupType::Band,
            incar: false,
        })
        .unwrap();
        assert!(dir.path().join("BAND").join("POSCAR").is_file());
    }
}
