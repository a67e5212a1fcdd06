//! # INCAR 参数表
//!
//! `ParameterMap`：保持插入顺序的 tag -> value 映射，值统一为字符串。
//! 顺序是有意义的：JSON 文档顺序、INCAR 行顺序在读写中保留。
//!
//! JSON 中的非字符串值会转成 INCAR 文本：
//! `true` -> `.TRUE.`，`false` -> `.FALSE.`，整数原样，
//! 绝对值小于 1e-3 的浮点数用指数形式 (1e-6)。
//!
//! ## 依赖关系
//! - 被 `templates/`, `deck/`, `parsers/incar.rs` 使用
//! - 使用 `serde` 自定义序列化

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// INCAR 参数映射（tag 区分大小写）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    entries: Vec<(String, String)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        ParameterMap::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == tag)
            .map(|(_, v)| v.as_str())
    }

    /// 插入或原位替换；返回旧值
    pub fn insert(&mut self, tag: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let tag = tag.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == tag) {
            Some((_, v)) => Some(std::mem::replace(v, value)),
            None => {
                self.entries.push((tag, value));
                None
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 右偏浅合并：`overrides` 的键覆盖本表同名键，新键追加在末尾
    pub fn merged(&self, overrides: &ParameterMap) -> ParameterMap {
        let mut out = self.clone();
        for (k, v) in overrides.iter() {
            out.insert(k, v);
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParameterMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<'a> IntoIterator for &'a ParameterMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for ParameterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// JSON 中允许的标量值
#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    fn into_incar_text(self) -> String {
        match self {
            ScalarValue::Bool(true) => ".TRUE.".to_string(),
            ScalarValue::Bool(false) => ".FALSE.".to_string(),
            ScalarValue::Int(i) => i.to_string(),
            ScalarValue::Float(f) => format_float(f),
            ScalarValue::Text(s) => s,
        }
    }
}

/// 浮点数的 INCAR 文本形式
pub fn format_float(f: f64) -> String {
    if f != 0.0 && f.abs() < 1e-3 {
        format!("{:e}", f)
    } else {
        format!("{}", f)
    }
}

struct ParameterMapVisitor;

impl<'de> Visitor<'de> for ParameterMapVisitor {
    type Value = ParameterMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of INCAR tags to scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = ParameterMap::new();
        while let Some((tag, value)) = access.next_entry::<String, ScalarValue>()? {
            map.insert(tag, value.into_incar_text());
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for ParameterMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ParameterMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order_and_replaces_in_place() {
        let mut map = ParameterMap::new();
        map.insert("ENCUT", "520");
        map.insert("ISMEAR", "0");
        assert_eq!(map.insert("ENCUT", "400"), Some("520".to_string()));

        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["ENCUT", "ISMEAR"]);
        assert_eq!(map.get("ENCUT"), Some("400"));
    }

    #[test]
    fn test_deserialize_mixed_scalars_in_document_order() {
        let json = r#"{"SYSTEM": "test", "ISTART": 0, "ENCUT": 500, "EDIFF": 1e-6,
                       "LWAVE": ".TRUE.", "LELF": true}"#;
        let map: ParameterMap = serde_json::from_str(json).unwrap();

        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["SYSTEM", "ISTART", "ENCUT", "EDIFF", "LWAVE", "LELF"]);
        assert_eq!(map.get("ISTART"), Some("0"));
        assert_eq!(map.get("EDIFF"), Some("1e-6"));
        assert_eq!(map.get("LELF"), Some(".TRUE."));
    }

    #[test]
    fn test_serialize_round_trip() {
        let map: ParameterMap = [("PREC", "Accurate"), ("NSW", "25")].into_iter().collect();
        let text = serde_json::to_string(&map).unwrap();
        assert_eq!(text, r#"{"PREC":"Accurate","NSW":"25"}"#);
        let back: ParameterMap = serde_json::from_str(&text).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(1e-7), "1e-7");
        assert_eq!(format_float(0.0), "0");
    }
}
