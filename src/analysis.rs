//! # 吸附能分析
//!
//! 输入三张 CSV：
//! - slab 能量：`System`, `Energy`
//! - 吸附物能量：`Adsorbate`, `Energy`
//! - 吸附后 slab 能量：`Directory`, `Adsorbate`, `Energy`
//!
//! 体系由目录名中的元素子串判定（Bi/Sb × Se/Te），
//! E_ads = -(E_system - E_adsorbate - E_slab)。
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 使用
//! - 使用 `csv`, `serde`, `tabled`, `plotters`

use crate::error::{AutoVaspError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tabled::Tabled;

/// 已知体系：(元素 1, 元素 2, 名称)，按顺序匹配
const SYSTEMS: [(&str, &str, &str); 4] = [
    ("Bi", "Se", "Bi2Se3"),
    ("Bi", "Te", "Bi2Te3"),
    ("Sb", "Se", "Sb2Se3"),
    ("Sb", "Te", "Sb2Te3"),
];

#[derive(Debug, Deserialize)]
struct SlabRow {
    #[serde(rename = "System")]
    system: String,
    #[serde(rename = "Energy")]
    energy: f64,
}

#[derive(Debug, Deserialize)]
struct AdsorbateRow {
    #[serde(rename = "Adsorbate")]
    adsorbate: String,
    #[serde(rename = "Energy")]
    energy: f64,
}

/// 吸附后 slab 的一行
#[derive(Debug, Clone, Deserialize)]
pub struct AdsorbedRow {
    #[serde(rename = "Directory")]
    pub directory: String,
    #[serde(rename = "Adsorbate")]
    pub adsorbate: String,
    #[serde(rename = "Energy")]
    pub energy: f64,
}

/// 吸附能结果
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct AdsorptionRecord {
    #[serde(rename = "Directory")]
    #[tabled(rename = "Directory")]
    pub directory: String,
    #[serde(rename = "System")]
    #[tabled(rename = "System")]
    pub system: String,
    #[serde(rename = "Adsorbate")]
    #[tabled(rename = "Adsorbate")]
    pub adsorbate: String,
    #[serde(rename = "Adsorption Energy")]
    #[tabled(rename = "Adsorption Energy (eV)")]
    pub adsorption_energy: f64,
}

/// 由目录名判断体系
pub fn find_system(directory: &str) -> Result<&'static str> {
    SYSTEMS
        .iter()
        .find(|(x, y, _)| directory.contains(x) && directory.contains(y))
        .map(|(_, _, name)| *name)
        .ok_or_else(|| AutoVaspError::UnknownSystem(directory.to_string()))
}

pub fn adsorption_energy(e_system: f64, e_adsorbate: f64, e_slab: f64) -> f64 {
    -(e_system - e_adsorbate - e_slab)
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    if !path.is_file() {
        return Err(AutoVaspError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let mut rdr = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// 体系 -> slab 能量（重复时取第一行）
pub fn read_slab_energies(path: &Path) -> Result<HashMap<String, f64>> {
    let mut map = HashMap::new();
    for row in read_rows::<SlabRow>(path)? {
        map.entry(row.system).or_insert(row.energy);
    }
    Ok(map)
}

/// 吸附物 -> 孤立分子能量（重复时取最后一行）
pub fn read_adsorbate_energies(path: &Path) -> Result<HashMap<String, f64>> {
    Ok(read_rows::<AdsorbateRow>(path)?
        .into_iter()
        .map(|row| (row.adsorbate, row.energy))
        .collect())
}

pub fn read_adsorbed_rows(path: &Path) -> Result<Vec<AdsorbedRow>> {
    read_rows(path)
}

/// 每个吸附结构一条记录
pub fn compute_adsorption_energies(
    slabs: &HashMap<String, f64>,
    adsorbates: &HashMap<String, f64>,
    adsorbed: &[AdsorbedRow],
) -> Result<Vec<AdsorptionRecord>> {
    adsorbed
        .iter()
        .map(|row| {
            let system = find_system(&row.directory)?;
            let e_slab = slabs.get(system).ok_or_else(|| {
                AutoVaspError::Other(format!("No slab energy for system {}", system))
            })?;
            let e_adsorbate = adsorbates.get(&row.adsorbate).ok_or_else(|| {
                AutoVaspError::Other(format!("No energy for adsorbate {}", row.adsorbate))
            })?;
            Ok(AdsorptionRecord {
                directory: row.directory.clone(),
                system: system.to_string(),
                adsorbate: row.adsorbate.clone(),
                adsorption_energy: adsorption_energy(row.energy, *e_adsorbate, *e_slab),
            })
        })
        .collect()
}

/// 散点图：横轴为吸附物，每个体系一种颜色
pub fn plot_adsorption_energies(records: &[AdsorptionRecord], output_path: &Path) -> Result<()> {
    use plotters::prelude::*;

    if records.is_empty() {
        return Err(AutoVaspError::Other("No data to plot".to_string()));
    }

    let mut adsorbates: Vec<&str> = Vec::new();
    let mut systems: Vec<&str> = Vec::new();
    for r in records {
        if !adsorbates.contains(&r.adsorbate.as_str()) {
            adsorbates.push(&r.adsorbate);
        }
        if !systems.contains(&r.system.as_str()) {
            systems.push(&r.system);
        }
    }

    let y_min = records.iter().map(|r| r.adsorption_energy).fold(f64::INFINITY, f64::min);
    let y_max = records.iter().map(|r| r.adsorption_energy).fold(f64::NEG_INFINITY, f64::max);
    let y_margin = ((y_max - y_min).abs() * 0.1).max(0.1);

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| AutoVaspError::Other(e.to_string()))?;

    let labels = adsorbates.clone();
    let mut chart = ChartBuilder::on(&root)
        .caption("Adsorption Energy", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            -0.5..(adsorbates.len() as f64 - 0.5),
            (y_min - y_margin)..(y_max + y_margin),
        )
        .map_err(|e| AutoVaspError::Other(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Adsorbate")
        .y_desc("Adsorption Energy (eV)")
        .x_labels(adsorbates.len())
        .x_label_formatter(&|x| {
            let i = x.round();
            if (x - i).abs() < 1e-6 && i >= 0.0 {
                labels.get(i as usize).map(|s| s.to_string()).unwrap_or_default()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(|e| AutoVaspError::Other(e.to_string()))?;

    for (i, system) in systems.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let points: Vec<(f64, f64)> = records
            .iter()
            .filter(|r| r.system == *system)
            .filter_map(|r| {
                adsorbates
                    .iter()
                    .position(|a| *a == r.adsorbate)
                    .map(|x| (x as f64, r.adsorption_energy))
            })
            .collect();

        chart
            .draw_series(points.iter().map(|(x, y)| Circle::new((*x, *y), 5, color.filled())))
            .map_err(|e| AutoVaspError::Other(e.to_string()))?
            .label(*system)
            .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| AutoVaspError::Other(e.to_string()))?;

    root.present()
        .map_err(|e| AutoVaspError::Other(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_system() {
        assert_eq!(find_system("Bi2Se3_111_H2O_ontop").unwrap(), "Bi2Se3");
        assert_eq!(find_system("runs/SbTe_slab_CO").unwrap(), "Sb2Te3");
        // Bi 优先于 Sb
        assert_eq!(find_system("BiSbTe").unwrap(), "Bi2Te3");
        assert!(matches!(find_system("GaAs_slab"), Err(AutoVaspError::UnknownSystem(_))));
    }

    #[test]
    fn test_adsorption_energy_is_negated_binding_energy() {
        // E_ads = -(E_sys - E_adsorbate - E_slab)
        assert!((adsorption_energy(-105.0, -14.0, -90.0) - 1.0).abs() < 1e-12);
        assert!((adsorption_energy(-105.0, -10.0, -90.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_energies_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let slabs = dir.path().join("slabs.csv");
        let adsorbates = dir.path().join("adsorbates.csv");
        let adsorbed = dir.path().join("slabs_adsorbates.csv");
        fs::write(&slabs, "System,Energy\nBi2Se3,-100.0\nSb2Te3,-80.0\n").unwrap();
        fs::write(&adsorbates, "Adsorbate,Energy\nH2O,-14.2\nCO,-14.8\n").unwrap();
        fs::write(
            &adsorbed,
            "Directory,Adsorbate,Energy\nBi2Se3_H2O,H2O,-114.5\nSb2Te3_CO,CO,-95.0\n",
        )
        .unwrap();

        let records = compute_adsorption_energies(
            &read_slab_energies(&slabs).unwrap(),
            &read_adsorbate_energies(&adsorbates).unwrap(),
            &read_adsorbed_rows(&adsorbed).unwrap(),
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].system, "Bi2Se3");
        assert!((records[0].adsorption_energy - 0.3).abs() < 1e-9);
        assert!((records[1].adsorption_energy - 0.2).abs() < 1e-9);

        let missing = vec![AdsorbedRow {
            directory: "Bi2Te3_O".into(),
            adsorbate: "O".into(),
            energy: -1.0,
        }];
        assert!(compute_adsorption_energies(&HashMap::new(), &HashMap::new(), &missing).is_err());
    }
}
