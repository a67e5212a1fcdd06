//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑，并提供子命令共用的模板加载、
//! 数据库获取与批量写出。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `acquire/`, `deck/`, `templates/`, `utils/`
//! - 子模块: generate, slab, adsorb, structure, tabulate, templates, output, analyze

pub mod adsorb;
pub mod analyze;
pub mod generate;
pub mod output;
pub mod slab;
pub mod structure;
pub mod tabulate;
pub mod templates;

use crate::acquire;
use crate::cli::{Commands, PseudopotentialArgs, TemplateArgs};
use crate::deck::InputDeck;
use crate::error::{AutoVaspError, Result};
use crate::models::Crystal;
use crate::parsers::poscar::write_poscar_file;
use crate::templates::JobTemplates;
use crate::utils::{output as out, progress};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Generate(args) => generate::execute(args),
        Commands::Slab(args) => slab::execute(args),
        Commands::Adsorb(args) => adsorb::execute(args),
        Commands::Extend(args) => structure::execute_extend(args),
        Commands::Freeze(args) => structure::execute_freeze(args),
        Commands::Box(args) => structure::execute_box(args),
        Commands::Tabulate(args) => tabulate::execute(args),
        Commands::Templates(args) => templates::execute(args),
        Commands::Output(args) => output::execute(args),
        Commands::Analyze(args) => analyze::execute(args),
    }
}

/// 模板表：给出 JSON 文件时读取它，否则使用内置表
pub(crate) fn load_templates(args: &TemplateArgs) -> Result<JobTemplates> {
    match &args.templates {
        Some(path) => JobTemplates::load_from_file(path),
        None => Ok(JobTemplates::builtin()),
    }
}

/// 从 Materials Project 获取结构
pub(crate) fn fetch_structure(id: &str, api_key: Option<&str>, endpoint: Option<&str>) -> Result<Crystal> {
    let api_key = api_key.ok_or_else(|| {
        AutoVaspError::InvalidArgument(
            "Materials Project API key not set (use --api-key or MP_API_KEY)".to_string(),
        )
    })?;
    let spinner = progress::create_spinner(&format!("Fetching {} from Materials Project", id));
    let result = acquire::load_from_database(id, api_key, endpoint);
    spinner.finish_and_clear();
    let crystal = result?;
    out::print_info(&format!(
        "{}: {} ({} sites)",
        crystal.name,
        crystal.reduced_formula(),
        crystal.num_sites()
    ));
    Ok(crystal)
}

/// 只保留字母数字，用于目录名与文件名
pub(crate) fn file_stem_for(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// 重名时追加 `_2`, `_3`, ...
pub(crate) fn unique_name(used: &mut HashSet<String>, name: String) -> String {
    if used.insert(name.clone()) {
        return name;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", name, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// 批量写出结构
///
/// 给出作业类型时每个结构写一个输入组目录 `<stem>_<i>_<job>`，
/// 否则只写 `POSCAR_<stem>_<i>`。
pub(crate) fn write_structures(
    structures: &[Crystal],
    stem: &str,
    output_dir: &Path,
    job_type: Option<&str>,
    psp: &PseudopotentialArgs,
    template_args: &TemplateArgs,
    readme: bool,
) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|e| AutoVaspError::write(output_dir, e))?;

    let deck = match job_type {
        Some(job) => {
            let parameters = load_templates(template_args)?.lookup(job)?;
            Some((job, parameters, psp.deck_config()?))
        }
        None => None,
    };

    let pb = progress::create_progress_bar(structures.len() as u64, stem);
    for (i, crystal) in structures.iter().enumerate() {
        match &deck {
            Some((job, parameters, config)) => {
                let dir = output_dir.join(format!("{}_{}_{}", stem, i, job));
                InputDeck::new(crystal, parameters.clone()).write(&dir, config, readme)?;
                pb.suspend(|| out::print_written(&crystal.name, &dir));
            }
            None => {
                let path = output_dir.join(format!("POSCAR_{}_{}", stem, i));
                write_poscar_file(crystal, &path)?;
                pb.suspend(|| out::print_written(&crystal.name, &path));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DEFAULT_FUNCTIONAL_DIR;
    use crate::models::{Atom, Lattice};
    use crate::parsers::poscar::parse_poscar_file;

    #[test]
    fn test_unique_name() {
        let mut used = HashSet::new();
        assert_eq!(unique_name(&mut used, "Si_dos".into()), "Si_dos");
        assert_eq!(unique_name(&mut used, "Si_dos".into()), "Si_dos_2");
        assert_eq!(unique_name(&mut used, "Si_dos".into()), "Si_dos_3");
        assert_eq!(file_stem_for("Bi2Se3 (111) slab"), "Bi2Se3111slab");
    }

    #[test]
    fn test_write_structures_poscar_only() {
        let dir = tempfile::tempdir().unwrap();
        let crystal = Crystal::new("Po", Lattice::cubic(3.3), vec![Atom::new("Po", [0.0, 0.0, 0.0])]);
        let psp = PseudopotentialArgs {
            psp_dir: None,
            functional_dir: DEFAULT_FUNCTIONAL_DIR.to_string(),
        };
        let templates = TemplateArgs {
            templates: None,
            tags: "resources/INCAR_TAGS.txt".into(),
        };

        write_structures(&[crystal.clone(), crystal], "Po_001", dir.path(), None, &psp, &templates, false)
            .unwrap();
        assert!(parse_poscar_file(&dir.path().join("POSCAR_Po_001_0")).is_ok());
        assert!(dir.path().join("POSCAR_Po_001_1").is_file());

        // 需要赝势库才能写完整输入组
        assert!(matches!(
            write_structures(&[], "x", dir.path(), Some("dos"), &psp, &templates, false),
            Err(AutoVaspError::InvalidArgument(_))
        ));
    }
}
