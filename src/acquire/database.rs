//! # 材料数据库客户端
//!
//! `MaterialsDatabase` trait 抽象"按 ID 取结构"这一次同步查询；
//! `MpRester` 是 Materials Project REST API 的阻塞实现。
//!
//! ## 请求
//! `GET {endpoint}/materials/summary/?material_ids=mp-XXX&_fields=structure`，
//! 请求头 `X-API-KEY`。API key 与 endpoint 都由调用方提供。
//!
//! ## 依赖关系
//! - 被 `acquire/mod.rs` 使用
//! - 使用 `reqwest` (blocking), `serde`

use crate::error::{AutoVaspError, Result};
use crate::models::{Atom, Crystal, Lattice};
use serde::Deserialize;
use std::time::Duration;

/// 默认 API 地址
pub const DEFAULT_ENDPOINT: &str = "https://api.materialsproject.org";

/// 结构来源
pub trait MaterialsDatabase {
    /// 按材料 ID 获取结构（原样，不做标准化）
    fn fetch_structure(&self, material_id: &str) -> Result<Crystal>;
}

/// 补全 `mp-` 前缀
pub fn normalize_material_id(id: &str) -> String {
    let id = id.trim();
    if id.starts_with("mp-") {
        id.to_string()
    } else {
        format!("mp-{}", id)
    }
}

/// Materials Project REST 客户端
pub struct MpRester {
    api_key: String,
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl MpRester {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AutoVaspError::DatabaseError(e.to_string()))?;
        Ok(MpRester {
            api_key: api_key.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl MaterialsDatabase for MpRester {
    fn fetch_structure(&self, material_id: &str) -> Result<Crystal> {
        let url = format!("{}/materials/summary/", self.endpoint);
        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .query(&[("material_ids", material_id), ("_fields", "structure")])
            .send()
            .map_err(|e| AutoVaspError::DatabaseError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AutoVaspError::DatabaseError(format!(
                "HTTP {} for {}: {}",
                status, material_id, body
            )));
        }

        let payload: SummaryResponse = response
            .json()
            .map_err(|e| AutoVaspError::DatabaseError(e.to_string()))?;

        payload
            .data
            .into_iter()
            .next()
            .map(|doc| doc.structure.into_crystal(material_id))
            .ok_or_else(|| AutoVaspError::MaterialNotFound(material_id.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────
// 响应结构（pymatgen Structure 的 JSON 形式）
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    data: Vec<SummaryDoc>,
}

#[derive(Debug, Deserialize)]
struct SummaryDoc {
    structure: StructureDoc,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StructureDoc {
    lattice: LatticeDoc,
    sites: Vec<SiteDoc>,
}

#[derive(Debug, Deserialize)]
struct LatticeDoc {
    matrix: [[f64; 3]; 3],
}

#[derive(Debug, Deserialize)]
struct SiteDoc {
    species: Vec<SpeciesDoc>,
    abc: [f64; 3],
}

#[derive(Debug, Deserialize)]
struct SpeciesDoc {
    element: String,
    #[serde(default = "full_occupancy")]
    occu: f64,
}

fn full_occupancy() -> f64 {
    1.0
}

impl StructureDoc {
    /// 部分占据位点取占据数最大的元素
    pub(crate) fn into_crystal(self, name: &str) -> Crystal {
        let atoms = self
            .sites
            .into_iter()
            .filter_map(|site| {
                let element = site
                    .species
                    .into_iter()
                    .max_by(|a, b| a.occu.partial_cmp(&b.occu).unwrap_or(std::cmp::Ordering::Equal))?
                    .element;
                Some(Atom::new(element, site.abc))
            })
            .collect();
        Crystal::new(name, Lattice::from_vectors(self.lattice.matrix), atoms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_material_id() {
        assert_eq!(normalize_material_id("149"), "mp-149");
        assert_eq!(normalize_material_id("mp-149"), "mp-149");
        assert_eq!(normalize_material_id(" 541837 "), "mp-541837");
    }

    #[test]
    fn test_structure_doc_to_crystal() {
        let json = r#"{
            "data": [{
                "structure": {
                    "@module": "pymatgen.core.structure",
                    "lattice": {"matrix": [[5.43, 0, 0], [0, 5.43, 0], [0, 0, 5.43]], "a": 5.43},
                    "sites": [
                        {"species": [{"element": "Si", "occu": 1}], "abc": [0, 0, 0], "xyz": [0, 0, 0], "label": "Si"},
                        {"species": [{"element": "Si", "occu": 1}], "abc": [0.25, 0.25, 0.25], "xyz": [1.3575, 1.3575, 1.3575], "label": "Si"}
                    ]
                }
            }],
            "meta": {"total_doc": 1}
        }"#;
        let response: SummaryResponse = serde_json::from_str(json).unwrap();
        let crystal = response
            .data
            .into_iter()
            .next()
            .unwrap()
            .structure
            .into_crystal("mp-149");

        assert_eq!(crystal.name, "mp-149");
        assert_eq!(crystal.num_sites(), 2);
        assert_eq!(crystal.atoms[1].position, [0.25, 0.25, 0.25]);
    }
}
