//! # 作业参数模板
//!
//! 按作业类型索引的 INCAR 预设表，以及 tag 校验与参数合并。
//!
//! ## 校验语义
//! `validate` 只判定迭代顺序中的**第一个** tag：第一个 tag 合法即返回 `true`，
//! 其余 tag 不再检查。需要完整检查时使用 `invalid_tags` 或 `lookup_strict`。
//!
//! ## 依赖关系
//! - 被 `deck/`, `output/followup.rs`, `commands/` 使用
//! - 使用 `models/parameters.rs`
//! - 子模块: builtin (静态表), allow_list

pub mod allow_list;
pub mod builtin;

pub use allow_list::AllowList;

use crate::error::{AutoVaspError, Result};
use crate::models::ParameterMap;
use crate::utils::output::print_warning;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;

/// 作业类型 -> 参数表（保持文档顺序）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobTemplates {
    templates: Vec<(String, ParameterMap)>,
}

impl JobTemplates {
    /// 内置的十一种预设
    pub fn builtin() -> Self {
        JobTemplates {
            templates: builtin::BUILTIN_TEMPLATES
                .iter()
                .map(|(name, params)| (name.to_string(), params.iter().copied().collect()))
                .collect(),
        }
    }

    /// 从 JSON 文件读取模板表；只检查 JSON 格式
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AutoVaspError::read(path, e))?;
        serde_json::from_str(&content).map_err(|e| AutoVaspError::JsonError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 查找作业类型；未知类型报错，不做默认回退
    pub fn lookup(&self, job_type: &str) -> Result<ParameterMap> {
        self.templates
            .iter()
            .find(|(name, _)| name == job_type)
            .map(|(_, params)| params.clone())
            .ok_or_else(|| AutoVaspError::UnknownJobType(job_type.to_string()))
    }

    /// 查找并逐个检查 tag，遇到第一个非法 tag 即报错
    pub fn lookup_strict(&self, job_type: &str, allow: &AllowList) -> Result<ParameterMap> {
        let params = self.lookup(job_type)?;
        if let Some(tag) = params.keys().find(|k| !allow.contains(k)) {
            return Err(AutoVaspError::InvalidTag(tag.to_string()));
        }
        Ok(params)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterMap)> {
        self.templates.iter().map(|(name, params)| (name.as_str(), params))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// 使用内置表查找
pub fn lookup(job_type: &str) -> Result<ParameterMap> {
    JobTemplates::builtin().lookup(job_type)
}

/// 第一个 tag 的校验结果；空表视为合法
///
/// 第一个 tag 非法时打印一条警告。其余 tag 不参与判定。
pub fn validate(map: &ParameterMap, allow: &AllowList) -> bool {
    match map.keys().next() {
        None => true,
        Some(tag) if allow.contains(tag) => true,
        Some(tag) => {
            print_warning(&format!("{} is not a valid tag", tag));
            false
        }
    }
}

/// 全部非法 tag（按出现顺序）
pub fn invalid_tags(map: &ParameterMap, allow: &AllowList) -> Vec<String> {
    map.keys()
        .filter(|k| !allow.contains(k))
        .map(str::to_string)
        .collect()
}

/// 从 JSON 读取单个参数表，不做校验
pub fn load_parameters(path: &Path) -> Result<ParameterMap> {
    let content = fs::read_to_string(path).map_err(|e| AutoVaspError::read(path, e))?;
    serde_json::from_str(&content).map_err(|e| AutoVaspError::JsonError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 从 JSON 读取单个参数表并校验；校验失败只警告，仍返回数据
pub fn load_and_check(path: &Path, allow: &AllowList) -> Result<ParameterMap> {
    let map = load_parameters(path)?;

    if !validate(&map, allow) {
        print_warning("INCAR dictionary has invalid tags");
        print_warning("A dictionary is still returned, but it may not be valid");
    }

    Ok(map)
}

/// 右偏浅合并：`overrides` 覆盖 `base`，新 tag 追加在末尾
pub fn merge(base: &ParameterMap, overrides: &ParameterMap) -> ParameterMap {
    base.merged(overrides)
}

impl Serialize for JobTemplates {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.templates.len()))?;
        for (name, params) in &self.templates {
            map.serialize_entry(name, params)?;
        }
        map.end()
    }
}

struct JobTemplatesVisitor;

impl<'de> Visitor<'de> for JobTemplatesVisitor {
    type Value = JobTemplates;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of job types to INCAR parameter maps")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut templates: Vec<(String, ParameterMap)> = Vec::new();
        while let Some((name, params)) = access.next_entry::<String, ParameterMap>()? {
            match templates.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => *existing = params,
                None => templates.push((name, params)),
            }
        }
        Ok(JobTemplates { templates })
    }
}

impl<'de> Deserialize<'de> for JobTemplates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(JobTemplatesVisitor)
    }
}
