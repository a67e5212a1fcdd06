//! # tabulate 命令实现
//!
//! 收集目录下匹配的结构文件，每个结构一行写入 CSV 并在终端显示表格。
//! 给出作业类型时改为输入组记录（空间群、k 网格、k 点数）。
//!
//! ## 依赖关系
//! - 使用 `cli/tabulate.rs` 定义的参数
//! - 使用 `acquire/`, `tabulate.rs`, `utils/`
//! - 使用 `walkdir`, `glob` 收集文件

use crate::acquire;
use crate::cli::tabulate::TabulateArgs;
use crate::error::{AutoVaspError, Result};
use crate::models::Crystal;
use crate::tabulate;
use crate::utils::{output, progress};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 执行 tabulate 命令
pub fn execute(args: TabulateArgs) -> Result<()> {
    output::print_header("Tabulating Structures");

    if !args.input.is_dir() {
        return Err(AutoVaspError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    let files = collect_input_files(&args.input, &args.pattern, args.recursive)?;
    if files.is_empty() {
        return Err(AutoVaspError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }
    output::print_info(&format!("Found {} structure file(s)", files.len()));

    let pb = progress::create_progress_bar(files.len() as u64, "Reading");
    let mut structures: Vec<Crystal> = Vec::with_capacity(files.len());
    for path in &files {
        match acquire::load_from_file(path) {
            Ok(crystal) => structures.push(crystal),
            Err(e) => pb.suspend(|| output::print_error(&format!("{}: {}", path.display(), e))),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    match &args.job_type {
        Some(job_type) => {
            let job_templates = super::load_templates(&args.templates)?;
            let records = tabulate::job_array_with(&structures, &job_templates, job_type)?;
            tabulate::write_csv(&args.output, &records)?;
            if !args.quiet {
                output::print_table(&records);
            }
        }
        None => {
            let records: Vec<_> = structures.iter().map(tabulate::structure_record).collect();
            tabulate::write_csv(&args.output, &records)?;
            if !args.quiet {
                output::print_table(&records);
            }
        }
    }

    output::print_done(&format!(
        "Tabulated {} structure(s) to '{}' ({} unreadable)",
        structures.len(),
        args.output.display(),
        files.len() - structures.len()
    ));

    Ok(())
}

/// 收集文件名匹配任一 glob 模式（逗号分隔）的文件
fn collect_input_files(input_dir: &Path, pattern: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let patterns = pattern
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            glob::Pattern::new(p).map_err(|e| {
                AutoVaspError::InvalidArgument(format!("Invalid pattern '{}': {}", p, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let walker = if recursive {
        WalkDir::new(input_dir)
    } else {
        WalkDir::new(input_dir).max_depth(1)
    };

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            if let Some(name) = entry.file_name().to_str() {
                if patterns.iter().any(|p| p.matches(name)) {
                    files.push(entry.path().to_path_buf());
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_input_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        for name in ["POSCAR", "CONTCAR", "Si.vasp", "INCAR", "sub/POSCAR_2"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let flat = collect_input_files(dir.path(), "POSCAR*,CONTCAR*,*.vasp", false).unwrap();
        assert_eq!(flat.len(), 3);

        let deep = collect_input_files(dir.path(), "POSCAR*", true).unwrap();
        assert_eq!(deep.len(), 2);

        assert!(matches!(
            collect_input_files(dir.path(), "[", false),
            Err(AutoVaspError::InvalidArgument(_))
        ));
    }
}
