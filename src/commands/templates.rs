//! # templates 命令实现
//!
//! - `list`: 作业类型一览表
//! - `show`: 按 INCAR 格式打印模板
//! - `check`: 对模板或 JSON 参数表逐个检查 tag；存在非法 tag 时以错误结束
//!
//! ## 依赖关系
//! - 使用 `cli/templates.rs` 定义的参数
//! - 使用 `templates/`, `parsers/incar.rs`, `utils/`

use crate::cli::templates::{CheckArgs, ListArgs, ShowArgs, TemplatesArgs, TemplatesCommands};
use crate::error::{AutoVaspError, Result};
use crate::models::ParameterMap;
use crate::parsers::incar::to_incar_string;
use crate::templates::{self, AllowList};
use crate::utils::output;
use tabled::Tabled;

/// 执行 templates 命令
pub fn execute(args: TemplatesArgs) -> Result<()> {
    match args.command {
        TemplatesCommands::List(args) => list(args),
        TemplatesCommands::Show(args) => show(args),
        TemplatesCommands::Check(args) => check(args),
    }
}

#[derive(Debug, Tabled)]
struct TemplateRow {
    #[tabled(rename = "Job type")]
    job_type: String,
    #[tabled(rename = "Tags")]
    tags: usize,
    #[tabled(rename = "Description")]
    description: String,
}

/// 模板的描述取自 SYSTEM tag（大小写不敏感）
fn description(parameters: &ParameterMap) -> String {
    parameters
        .iter()
        .find(|(tag, _)| tag.eq_ignore_ascii_case("SYSTEM"))
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

fn list(args: ListArgs) -> Result<()> {
    let job_templates = super::load_templates(&args.templates)?;
    let rows: Vec<TemplateRow> = job_templates
        .iter()
        .map(|(job_type, parameters)| TemplateRow {
            job_type: job_type.to_string(),
            tags: parameters.len(),
            description: description(parameters),
        })
        .collect();

    output::print_table(&rows);
    output::print_info(&format!("{} job type(s)", rows.len()));
    Ok(())
}

fn show(args: ShowArgs) -> Result<()> {
    let parameters = super::load_templates(&args.templates)?.lookup(&args.job_type)?;
    output::print_header(&args.job_type);
    print!("{}", to_incar_string(&parameters));
    Ok(())
}

/// 报告一个参数表的非法 tag，返回其个数
fn report(name: &str, parameters: &ParameterMap, allow: &AllowList) -> usize {
    let invalid = templates::invalid_tags(parameters, allow);
    if invalid.is_empty() {
        output::print_success(&format!("{}: {} tag(s) valid", name, parameters.len()));
    } else {
        output::print_warning(&format!(
            "{}: invalid tag(s) {}",
            name,
            invalid.join(", ")
        ));
    }
    invalid.len()
}

fn check(args: CheckArgs) -> Result<()> {
    let allow = AllowList::from_file(&args.templates.tags)?;
    output::print_info(&format!(
        "{} valid tags in '{}'",
        allow.len(),
        args.templates.tags.display()
    ));

    let mut invalid = 0;
    let mut checked = 0;

    if let Some(path) = &args.file {
        let parameters = templates::load_and_check(path, &allow)?;
        invalid += report(&path.display().to_string(), &parameters, &allow);
        checked += 1;
    } else {
        let job_templates = super::load_templates(&args.templates)?;
        match &args.job_type {
            Some(job_type) => {
                let parameters = job_templates.lookup(job_type)?;
                invalid += report(job_type, &parameters, &allow);
                checked += 1;
            }
            None => {
                for (job_type, parameters) in job_templates.iter() {
                    invalid += report(job_type, parameters, &allow);
                    checked += 1;
                }
            }
        }
    }

    output::print_separator();
    if invalid > 0 {
        return Err(AutoVaspError::InvalidTag(format!(
            "{} invalid tag(s) in {} parameter set(s)",
            invalid, checked
        )));
    }
    output::print_done(&format!("Checked {} parameter set(s)", checked));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TemplateArgs;
    use std::fs;
    use std::path::Path;

    fn template_args(tags: &Path) -> TemplateArgs {
        TemplateArgs {
            templates: None,
            tags: tags.to_path_buf(),
        }
    }

    #[test]
    fn test_description() {
        let map: ParameterMap = [("System", "Band structure"), ("ICHARG", "11")].into_iter().collect();
        assert_eq!(description(&map), "Band structure");
        assert_eq!(description(&ParameterMap::new()), "");
    }

    #[test]
    fn test_check_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let tags = dir.path().join("tags.txt");
        fs::write(&tags, "ENCUT\nISMEAR\n").unwrap();
        let good = dir.path().join("good.json");
        fs::write(&good, r#"{"ENCUT": 500, "ISMEAR": 0}"#).unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"ENCUT": 500, "NOT_A_TAG": 1}"#).unwrap();

        assert!(check(CheckArgs {
            job_type: None,
            file: Some(good),
            templates: template_args(&tags),
        })
        .is_ok());

        // 第一个 tag 合法也不能掩盖后面的非法 tag
        assert!(matches!(
            check(CheckArgs {
                job_type: None,
                file: Some(bad),
                templates: template_args(&tags),
            }),
            Err(AutoVaspError::InvalidTag(_))
        ));
    }

    #[test]
    fn test_check_builtin_templates_against_shipped_tags() {
        let tags = Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/INCAR_TAGS.txt");
        let result = check(CheckArgs {
            job_type: Some("dos".to_string()),
            file: None,
            templates: template_args(&tags),
        });
        // "System" 不在 VASP tag 表中（大小写敏感）
        assert!(matches!(result, Err(AutoVaspError::InvalidTag(_))));
    }
}
