//! # VASP OUTCAR 解析器
//!
//! 逐行扫描 OUTCAR，提取能量、焓、费米能级、体积、原子数与完成标记。
//!
//! ## 依赖关系
//! - 被 `output/` 使用
//! - 使用 `models/calculation.rs`

use crate::error::{AutoVaspError, Result};
use crate::models::OutcarSummary;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// 解析 VASP OUTCAR 文件
pub fn parse_outcar(path: &Path) -> Result<OutcarSummary> {
    let file = File::open(path).map_err(|e| AutoVaspError::read(path, e))?;
    let reader = BufReader::new(file);
    Ok(parse_outcar_lines(reader.lines().map_while(|l| l.ok())))
}

/// 从行迭代器解析 OUTCAR 内容
pub fn parse_outcar_lines<I, S>(lines: I) -> OutcarSummary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut summary = OutcarSummary::default();

    for line in lines {
        let line = line.as_ref();

        // 检查是否完成
        if line.contains("General timing and accounting informations for this job") {
            summary.is_finished = true;
        }

        // "enthalpy is  TOTEN    =      -123.456789 eV"
        if line.contains("enthalpy is  TOTEN") {
            if let Some(val) = extract_number_before(line, "eV") {
                summary.enthalpy_ev = Some(val);
            }
        }

        // "energy  without entropy=     -123.456789  energy(sigma->0) =     -123.456789"
        if line.contains("energy  without entropy") {
            if let Some(pos) = line.find("energy(sigma->0)") {
                if let Some(val) = extract_number_after(&line[pos..], "=") {
                    summary.energy_ev = Some(val);
                    summary.ionic_steps += 1;
                }
            }
        }

        // " E-fermi :   2.3456     XC(G=0): ..."
        if line.contains("E-fermi :") {
            if let Some(val) = extract_number_after(line, "E-fermi :") {
                summary.efermi_ev = Some(val);
            }
        }

        // "  volume of cell :      123.456789"
        if line.contains("volume of cell") {
            if let Some(val) = extract_last_number(line) {
                summary.volume = Some(val);
            }
        }

        // "   NIONS =       8"
        if line.contains("NIONS =") {
            if let Some(val) = extract_last_number(line) {
                summary.num_atoms = Some(val as usize);
            }
        }
    }

    summary
}

/// 从字符串中提取指定标记之前的数字
fn extract_number_before(s: &str, marker: &str) -> Option<f64> {
    let pos = s.find(marker)?;
    s[..pos].split_whitespace().last()?.parse().ok()
}

/// 从字符串中提取指定标记之后的数字
fn extract_number_after(s: &str, marker: &str) -> Option<f64> {
    let pos = s.find(marker)?;
    s[pos + marker.len()..].split_whitespace().next()?.parse().ok()
}

/// 提取字符串中最后一个数字
fn extract_last_number(s: &str) -> Option<f64> {
    s.split_whitespace()
        .filter_map(|w| w.parse::<f64>().ok())
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
   number of dos      NEDOS =    301   number of ions     NIONS =      5
  volume of cell :      415.12
  energy  without entropy=     -21.10000000  energy(sigma->0) =     -21.10500000
 E-fermi :   1.2345     XC(G=0):  -9.8
  volume of cell :      410.50
  energy  without entropy=     -21.20000000  energy(sigma->0) =     -21.20500000
  enthalpy is  TOTEN    =       -20.90000000 eV
 General timing and accounting informations for this job:
"#;

    #[test]
    fn test_parse_outcar_takes_last_values() {
        let summary = parse_outcar_lines(SAMPLE.lines());

        assert!(summary.is_finished);
        assert_eq!(summary.num_atoms, Some(5));
        assert_eq!(summary.ionic_steps, 2);
        assert!((summary.energy_ev.unwrap() + 21.205).abs() < 1e-9);
        assert!((summary.volume.unwrap() - 410.5).abs() < 1e-9);
        assert!((summary.enthalpy_ev.unwrap() + 20.9).abs() < 1e-9);
        assert!((summary.efermi_ev.unwrap() - 1.2345).abs() < 1e-9);
        assert!((summary.energy_per_atom().unwrap() + 4.241).abs() < 1e-9);
    }

    #[test]
    fn test_unfinished_outcar() {
        let summary = parse_outcar_lines(["   NIONS =       2"]);
        assert!(!summary.is_finished);
        assert_eq!(summary.energy_ev, None);
        assert_eq!(summary.energy_per_atom(), None);
    }
}
