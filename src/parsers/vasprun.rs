//! # vasprun.xml 摘要读取
//!
//! 不构建完整 XML 树，只逐行扫描以下内容：
//! - 最后一个 `e_0_energy`（最终能量）
//! - `<generation>` 中的 `divisions`（自动 k 网格）
//! - `kpointlist` 的行数（不可约 k 点数）
//! - `<atominfo>` 元素列表 + `finalpos` 结构
//! - 第一个 `<eigenvalues>` 块，用占据数推出带隙
//!
//! ## 依赖关系
//! - 被 `output/` 使用
//! - 使用 `models/calculation.rs`

use crate::error::{AutoVaspError, Result};
use crate::models::{Atom, Crystal, Lattice, VasprunSummary};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static ENERGY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<i name="e_0_energy">\s*(\S+)\s*</i>"#).unwrap());
static DIVISIONS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<v type="int" name="divisions">([^<]*)</v>"#).unwrap());
static ATOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<rc><c>\s*([A-Z][a-z]?)\S*\s*</c><c>\s*\d+\s*</c></rc>").unwrap());
static VECTOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<v[^>]*>([^<]*)</v>").unwrap());
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<r>([^<]*)</r>").unwrap());

/// 占据数阈值
const OCCUPIED: f64 = 0.5;

pub fn parse_vasprun_file(path: &Path) -> Result<VasprunSummary> {
    let content = fs::read_to_string(path).map_err(|e| AutoVaspError::read(path, e))?;
    parse_vasprun_content(&content, &path.display().to_string())
}

pub fn parse_vasprun_content(content: &str, source: &str) -> Result<VasprunSummary> {
    if !content.contains("<modeling>") {
        return Err(AutoVaspError::parse(
            "vasprun",
            source,
            "Missing <modeling> root element",
        ));
    }

    let final_energy = ENERGY_RE
        .captures_iter(content)
        .last()
        .and_then(|cap| cap[1].parse().ok());

    let kpoint_mesh = DIVISIONS_RE.captures(content).and_then(|cap| {
        let v: Vec<u32> = cap[1]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        (v.len() == 3).then(|| [v[0], v[1], v[2]])
    });

    let lines: Vec<&str> = content.lines().collect();
    let kpoint_count = varray_rows(&lines, "kpointlist", 0).len();

    let elements: Vec<String> = content
        .find("<atominfo>")
        .map(|start| {
            let end = content[start..]
                .find("</atominfo>")
                .map(|e| start + e)
                .unwrap_or(content.len());
            ATOM_RE
                .captures_iter(&content[start..end])
                .map(|cap| cap[1].to_string())
                .collect()
        })
        .unwrap_or_default();

    let final_structure = final_structure(&lines, &elements);
    let band_gap = band_gap(&lines);

    Ok(VasprunSummary {
        final_energy,
        kpoint_mesh,
        kpoint_count,
        final_structure,
        band_gap,
    })
}

/// 从 `from` 行开始，读取第一个名为 `name` 的 varray 中的行向量
fn varray_rows(lines: &[&str], name: &str, from: usize) -> Vec<Vec<f64>> {
    let marker = format!("<varray name=\"{}\"", name);
    let Some(start) = lines
        .iter()
        .skip(from)
        .position(|l| l.contains(&marker))
        .map(|p| p + from)
    else {
        return Vec::new();
    };

    lines[start + 1..]
        .iter()
        .take_while(|l| !l.contains("</varray>"))
        .filter_map(|l| VECTOR_RE.captures(l))
        .map(|cap| {
            cap[1]
                .split_whitespace()
                .filter_map(|s| s.parse().ok())
                .collect()
        })
        .collect()
}

fn final_structure(lines: &[&str], elements: &[String]) -> Option<Crystal> {
    let start = lines
        .iter()
        .position(|l| l.contains("<structure name=\"finalpos\""))?;

    let basis = varray_rows(lines, "basis", start);
    let positions = varray_rows(lines, "positions", start);
    if basis.len() != 3 || basis.iter().any(|v| v.len() < 3) || positions.len() != elements.len() {
        return None;
    }

    let lattice = Lattice::from_vectors([
        [basis[0][0], basis[0][1], basis[0][2]],
        [basis[1][0], basis[1][1], basis[1][2]],
        [basis[2][0], basis[2][1], basis[2][2]],
    ]);
    let atoms = elements
        .iter()
        .zip(positions.iter())
        .filter(|(_, p)| p.len() >= 3)
        .map(|(el, p)| Atom::new(el.clone(), [p[0], p[1], p[2]]))
        .collect();

    Some(Crystal::new("finalpos", lattice, atoms))
}

/// 带隙 = max(0, CBM - VBM)，金属或没有本征值时为 None/0
fn band_gap(lines: &[&str]) -> Option<f64> {
    let start = lines.iter().position(|l| l.contains("<eigenvalues>"))?;

    let mut vbm = f64::NEG_INFINITY;
    let mut cbm = f64::INFINITY;
    for line in lines[start + 1..]
        .iter()
        .take_while(|l| !l.contains("</eigenvalues>"))
    {
        let Some(cap) = ROW_RE.captures(line) else {
            continue;
        };
        let v: Vec<f64> = cap[1]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if v.len() < 2 {
            continue;
        }
        if v[1] > OCCUPIED {
            vbm = vbm.max(v[0]);
        } else {
            cbm = cbm.min(v[0]);
        }
    }

    if vbm.is_finite() && cbm.is_finite() {
        Some((cbm - vbm).max(0.0))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<modeling>
 <kpoints>
  <generation param="Gamma">
   <v type="int" name="divisions">       4        4        1 </v>
  </generation>
  <varray name="kpointlist" >
   <v>       0.00000000       0.00000000       0.00000000 </v>
   <v>       0.25000000       0.00000000       0.00000000 </v>
   <v>       0.50000000       0.00000000       0.00000000 </v>
  </varray>
 </kpoints>
 <atominfo>
  <atoms>       2 </atoms>
  <array name="atoms" >
   <set>
    <rc><c>Na</c><c>   1</c></rc>
    <rc><c>Cl</c><c>   2</c></rc>
   </set>
  </array>
  <array name="atomtypes" >
   <set>
    <rc><c>   1</c><c>Na </c><c>     22.99</c></rc>
   </set>
  </array>
 </atominfo>
 <calculation>
  <energy>
   <i name="e_0_energy">    -10.00000000 </i>
  </energy>
 </calculation>
 <calculation>
  <energy>
   <i name="e_0_energy">    -11.50000000 </i>
  </energy>
  <eigenvalues>
   <array>
    <set>
     <set comment="spin 1">
      <set comment="kpoint 1">
       <r>   -1.0000    1.0000 </r>
       <r>    0.5000    1.0000 </r>
       <r>    2.0000    0.0000 </r>
      </set>
     </set>
    </set>
   </array>
  </eigenvalues>
 </calculation>
 <structure name="finalpos" >
  <crystal>
   <varray name="basis" >
    <v>       5.60000000       0.00000000       0.00000000 </v>
    <v>       0.00000000       5.60000000       0.00000000 </v>
    <v>       0.00000000       0.00000000       5.60000000 </v>
   </varray>
  </crystal>
  <varray name="positions" >
   <v>       0.00000000       0.00000000       0.00000000 </v>
   <v>       0.50000000       0.50000000       0.50000000 </v>
  </varray>
 </structure>
</modeling>
"#;

    #[test]
    fn test_summary_fields() {
        let summary = parse_vasprun_content(SAMPLE, "vasprun.xml").unwrap();

        assert_eq!(summary.final_energy, Some(-11.5));
        assert_eq!(summary.kpoint_mesh, Some([4, 4, 1]));
        assert_eq!(summary.kpoint_count, 3);
        assert!((summary.band_gap.unwrap() - 1.5).abs() < 1e-12);

        let structure = summary.final_structure.unwrap();
        assert_eq!(structure.num_sites(), 2);
        assert_eq!(structure.atoms[1].element, "Cl");
        assert!((structure.volume() - 5.6f64.powi(3)).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_non_vasprun() {
        assert!(parse_vasprun_content("<html></html>", "x").is_err());
    }
}
