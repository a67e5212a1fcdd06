//! # generate 命令实现
//!
//! 结构来自本地文件和/或 Materials Project。每个结构写一个作业目录
//! `<约化化学式>_<作业类型>`，INCAR 由模板、`--overrides` JSON、`--set`
//! 依次右偏合并。可选用系统 `tar` 打包全部作业目录。
//!
//! ## 依赖关系
//! - 使用 `cli/generate.rs` 定义的参数
//! - 使用 `acquire/`, `deck/`, `templates/`, `utils/`

use crate::acquire;
use crate::cli::generate::GenerateArgs;
use crate::deck::{self, InputDeck};
use crate::error::{AutoVaspError, Result};
use crate::models::ParameterMap;
use crate::templates::{self, AllowList, JobTemplates};
use crate::utils::{output, progress};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

/// 执行 generate 命令
pub fn execute(args: GenerateArgs) -> Result<()> {
    output::print_header("Generating VASP Input Decks");

    if args.inputs.is_empty() && args.mp_ids.is_empty() {
        return Err(AutoVaspError::InvalidArgument(
            "No structures given (pass structure files or --mp-id)".to_string(),
        ));
    }

    let config = args.psp.deck_config()?;
    let job_templates = super::load_templates(&args.templates)?;
    let parameters = build_parameters(&args, &job_templates)?;

    output::print_info(&format!("Job type: {}", args.job_type));
    output::print_info(&format!("POTCAR library: {}", config.psp_dir.display()));

    let mut structures = Vec::new();
    for path in &args.inputs {
        structures.push(acquire::load_from_file(path)?);
    }
    for id in &args.mp_ids {
        structures.push(super::fetch_structure(
            id,
            args.api_key.as_deref(),
            args.endpoint.as_deref(),
        )?);
    }

    fs::create_dir_all(&args.output).map_err(|e| AutoVaspError::write(&args.output, e))?;

    let pb = progress::create_progress_bar(structures.len() as u64, "Writing decks");
    let mut used = HashSet::new();
    let mut written = Vec::new();

    for crystal in &structures {
        let name = super::unique_name(&mut used, deck::directory_name(crystal, &args.job_type));
        let dir = args.output.join(&name);
        pb.set_message(name.clone());

        let input_deck = InputDeck::new(crystal, parameters.clone());
        input_deck.write(&dir, &config, args.readme)?;

        let (symbol, number) = input_deck.space_group();
        pb.suspend(|| {
            output::print_written(
                &format!("{} [{} ({})]", crystal.reduced_formula(), symbol, number),
                &dir,
            )
        });
        written.push(name);
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    if let Some(archive) = &args.archive {
        create_archive(archive, &args.output, &written)?;
        output::print_written("archive", archive);
    }

    output::print_done(&format!(
        "Wrote {} input deck(s) for '{}' in '{}'",
        written.len(),
        args.job_type,
        args.output.display()
    ));

    Ok(())
}

/// 模板 + JSON 覆盖 + `--set` 覆盖
///
/// `--strict` 必须有 tag 列表；否则 tag 列表缺失时只警告，覆盖照常生效
fn build_parameters(args: &GenerateArgs, job_templates: &JobTemplates) -> Result<ParameterMap> {
    let tags = &args.templates.tags;
    let allow = if args.strict || (args.overrides.is_some() && tags.is_file()) {
        Some(AllowList::from_file(tags)?)
    } else {
        None
    };

    let mut parameters = match &allow {
        Some(allow) if args.strict => job_templates.lookup_strict(&args.job_type, allow)?,
        _ => job_templates.lookup(&args.job_type)?,
    };

    if let Some(path) = &args.overrides {
        let overrides = match &allow {
            Some(allow) => templates::load_and_check(path, allow)?,
            None => {
                output::print_warning(&format!(
                    "INCAR tag list {} not found, overrides are not validated",
                    tags.display()
                ));
                templates::load_parameters(path)?
            }
        };
        parameters = templates::merge(&parameters, &overrides);
    }

    if !args.set.is_empty() {
        let extra: ParameterMap = args.set.iter().cloned().collect();
        parameters = templates::merge(&parameters, &extra);
    }

    Ok(parameters)
}

/// `tar -czf <archive> -C <base> <dirs...>`
fn create_archive(archive: &Path, base: &Path, dirs: &[String]) -> Result<()> {
    let out = Command::new("tar")
        .arg("-czf")
        .arg(archive)
        .arg("-C")
        .arg(base)
        .args(dirs)
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AutoVaspError::CommandNotFound {
                command: "tar".to_string(),
            },
            _ => AutoVaspError::CommandFailed {
                command: "tar".to_string(),
                stderr: e.to_string(),
            },
        })?;

    if !out.status.success() {
        return Err(AutoVaspError::CommandFailed {
            command: "tar".to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }

    Ok(())
}
