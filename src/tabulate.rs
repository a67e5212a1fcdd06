//! # 结构与输入组的表格化
//!
//! 每个结构或输入组对应一行记录，可直接写 CSV 或在终端用表格显示。
//!
//! ## 依赖关系
//! - 被 `deck/mod.rs`, `output/mod.rs`, `commands/tabulate.rs` 使用
//! - 使用 `csv`, `serde`, `tabled`

use crate::deck::{self, InputDeck};
use crate::error::{AutoVaspError, Result};
use crate::models::Crystal;
use crate::templates::JobTemplates;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

/// 单个结构的概要
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct StructureRecord {
    pub formula: String,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub volume: f64,
    pub num_species: usize,
    pub num_sites: usize,
    pub frozen: bool,
    pub k_x: f64,
    pub k_y: f64,
    pub k_z: f64,
}

/// 单个输入组的概要
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DeckRecord {
    pub formula: String,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub volume: f64,
    pub num_species: usize,
    pub sym_symbol: String,
    pub intl_number: i32,
    pub k_x: u32,
    pub k_y: u32,
    pub k_z: u32,
    pub n_kpoints: usize,
}

pub fn structure_record(crystal: &Crystal) -> StructureRecord {
    let (a, b, c, alpha, beta, gamma) = crystal.lattice.parameters();
    let [k_x, k_y, k_z] = deck::kpoints::recommended_kpoints(crystal);
    StructureRecord {
        formula: crystal.reduced_formula(),
        a,
        b,
        c,
        alpha,
        beta,
        gamma,
        volume: crystal.volume(),
        num_species: crystal.composition().len(),
        num_sites: crystal.num_sites(),
        frozen: crystal.has_selective_dynamics(),
        k_x,
        k_y,
        k_z,
    }
}

pub fn deck_record(deck: &InputDeck) -> DeckRecord {
    let crystal = deck.structure();
    let (a, b, c, alpha, beta, gamma) = crystal.lattice.parameters();
    let (symbol, number) = deck.space_group();
    let [k_x, k_y, k_z] = deck.kpoints().divisions;
    DeckRecord {
        formula: crystal.reduced_formula(),
        a,
        b,
        c,
        alpha,
        beta,
        gamma,
        volume: crystal.volume(),
        num_species: crystal.composition().len(),
        sym_symbol: symbol.to_string(),
        intl_number: number,
        k_x,
        k_y,
        k_z,
        n_kpoints: deck.kpoints().num_kpoints(),
    }
}

/// 每个结构用同一作业类型（内置模板）组装输入组后的记录
pub fn job_array(structures: &[Crystal], job_type: &str) -> Result<Vec<DeckRecord>> {
    job_array_with(structures, &JobTemplates::builtin(), job_type)
}

/// 同 `job_array`，模板来自给定的表
pub fn job_array_with(
    structures: &[Crystal],
    templates: &JobTemplates,
    job_type: &str,
) -> Result<Vec<DeckRecord>> {
    let parameters = templates.lookup(job_type)?;
    Ok(structures
        .iter()
        .map(|s| deck_record(&InputDeck::new(s, parameters.clone())))
        .collect())
}

/// 记录写成 CSV（带表头）
pub fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|e| AutoVaspError::write(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};
    use crate::transform::freeze;
    use std::fs;

    fn rocksalt() -> Crystal {
        let mut atoms = Vec::new();
        for p in [[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [0.5, 0.0, 0.5], [0.0, 0.5, 0.5]] {
            atoms.push(Atom::new("Na", p));
            atoms.push(Atom::new("Cl", [(p[0] + 0.5) % 1.0, p[1], p[2]]));
        }
        Crystal::new("NaCl", Lattice::cubic(5.0), atoms)
    }

    #[test]
    fn test_structure_record() {
        let record = structure_record(&rocksalt());
        assert_eq!(record.formula, "NaCl");
        assert_eq!(record.num_species, 2);
        assert_eq!(record.num_sites, 8);
        assert!(!record.frozen);
        assert!((record.volume - 125.0).abs() < 1e-9);
        assert!((record.k_x - 10.0).abs() < 1e-12);

        assert!(structure_record(&freeze(&rocksalt(), 1.0)).frozen);
    }

    #[test]
    fn test_job_array_and_csv() {
        let records = job_array(&[rocksalt(), rocksalt()], "bulk_relaxation_med_prec").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sym_symbol, "Fm-3m");
        assert_eq!(records[0].intl_number, 225);
        assert_eq!([records[0].k_x, records[0].k_y, records[0].k_z], [10, 10, 10]);
        assert_eq!(records[0].n_kpoints, 1000);

        assert!(matches!(
            job_array(&[rocksalt()], "nope"),
            Err(AutoVaspError::UnknownJobType(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        write_csv(&path, &records).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "formula,a,b,c,alpha,beta,gamma,volume,num_species,sym_symbol,intl_number,k_x,k_y,k_z,n_kpoints"
        );
    }
}
