//! # 对称性分析模块
//!
//! 基于 `moyo` 的空间群识别、惯用晶胞标准化与对称操作。
//!
//! ## 坐标约定
//! `models::Lattice` 以行向量存储 a, b, c；`moyo::base::Lattice::new` 同样接收行向量，
//! 内部 `basis` 以列向量存储，因此回读时取 `basis.column(i)`。
//!
//! ## 依赖关系
//! - 被 `acquire/`, `deck/`, `transform/`, `output/`, `tabulate.rs` 使用
//! - 使用 `moyo`, `nalgebra`
//! - 子模块: kpath

pub mod kpath;

use crate::error::{AutoVaspError, Result};
use crate::models::{Atom, Crystal, Lattice};
use moyo::base::{AngleTolerance, Cell, Lattice as MoyoLattice};
use moyo::data::Setting;
use moyo::MoyoDataset;
use nalgebra::{Matrix3, Vector3};

/// 默认对称容差 (Å)
pub const SYMPREC: f64 = 1e-2;

/// 空间群信息
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryInfo {
    pub number: i32,
    pub symbol: String,
    pub crystal_system: &'static str,
    pub hall_number: i32,
    /// 输入晶胞 -> 标准惯用胞的基变换，列为新基矢在输入分数坐标下的分量
    pub std_linear: Matrix3<f64>,
    /// 输入晶胞 -> 标准原胞的基变换
    pub prim_std_linear: Matrix3<f64>,
}

/// 分数坐标下的对称操作 x' = R·x + t
#[derive(Debug, Clone, PartialEq)]
pub struct SymOp {
    pub rotation: [[i32; 3]; 3],
    pub translation: [f64; 3],
}

impl SymOp {
    pub fn apply(&self, frac: [f64; 3]) -> [f64; 3] {
        let r = self.rotation;
        let mut out = self.translation;
        for (i, o) in out.iter_mut().enumerate() {
            *o += r[i][0] as f64 * frac[0] + r[i][1] as f64 * frac[1] + r[i][2] as f64 * frac[2];
        }
        out
    }
}

/// 空间群识别
pub fn analyze(crystal: &Crystal) -> Result<SymmetryInfo> {
    let (dataset, _) = run_moyo(crystal, SYMPREC)?;
    Ok(SymmetryInfo {
        number: dataset.number,
        symbol: space_group_symbol(dataset.number).to_string(),
        crystal_system: crystal_system(dataset.number),
        hall_number: dataset.hall_number,
        std_linear: dataset.std_linear,
        prim_std_linear: dataset.prim_std_linear,
    })
}

/// 空间群符号；分析失败时返回 "Unknown"
pub fn space_group_label(crystal: &Crystal) -> (String, i32) {
    match analyze(crystal) {
        Ok(info) => (info.symbol, info.number),
        Err(_) => ("Unknown".to_string(), 0),
    }
}

/// 惯用标准晶胞（不保留选择性动力学标记）
pub fn conventional_cell(crystal: &Crystal) -> Result<Crystal> {
    let (dataset, species) = run_moyo(crystal, SYMPREC)?;
    let std_cell = &dataset.std_cell;

    let basis = std_cell.lattice.basis;
    let mut matrix = [[0.0; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        let col = basis.column(i);
        *row = [col[0], col[1], col[2]];
    }

    let atoms = std_cell
        .positions
        .iter()
        .zip(std_cell.numbers.iter())
        .map(|(pos, &id)| {
            let element = species
                .get((id - 1) as usize)
                .cloned()
                .unwrap_or_else(|| "X".to_string());
            Atom::new(element, [pos.x, pos.y, pos.z])
        })
        .collect();

    Ok(Crystal::new(crystal.name.clone(), Lattice::from_vectors(matrix), atoms).sorted())
}

/// 对称操作（作用于输入晶胞的分数坐标）
pub fn operations(crystal: &Crystal, symprec: f64) -> Result<Vec<SymOp>> {
    let (dataset, _) = run_moyo(crystal, symprec)?;
    Ok(dataset
        .operations
        .iter()
        .map(|op| {
            let r = op.rotation;
            let t = op.translation;
            SymOp {
                rotation: [
                    [r[(0, 0)], r[(0, 1)], r[(0, 2)]],
                    [r[(1, 0)], r[(1, 1)], r[(1, 2)]],
                    [r[(2, 0)], r[(2, 1)], r[(2, 2)]],
                ],
                translation: [t.x, t.y, t.z],
            }
        })
        .collect())
}

/// 运行 moyo；返回数据集与 (物种编号 - 1) -> 元素 的映射
fn run_moyo(crystal: &Crystal, symprec: f64) -> Result<(MoyoDataset, Vec<String>)> {
    if crystal.atoms.is_empty() {
        return Err(AutoVaspError::SymmetryError("structure has no atoms".to_string()));
    }
    if crystal.lattice.volume().abs() < 1e-10 {
        return Err(AutoVaspError::SymmetryError("degenerate lattice".to_string()));
    }

    let m = crystal.lattice.matrix;
    let rows = Matrix3::new(
        m[0][0], m[0][1], m[0][2],
        m[1][0], m[1][1], m[1][2],
        m[2][0], m[2][1], m[2][2],
    );

    let species = crystal.elements();
    let mut positions = Vec::with_capacity(crystal.atoms.len());
    let mut numbers = Vec::with_capacity(crystal.atoms.len());
    for atom in &crystal.atoms {
        let p = atom.position;
        positions.push(Vector3::new(p[0], p[1], p[2]));
        let id = species
            .iter()
            .position(|e| *e == atom.element)
            .unwrap_or(0) as i32;
        numbers.push(id + 1);
    }

    let cell = Cell::new(MoyoLattice::new(rows), positions, numbers);
    let dataset = MoyoDataset::new(&cell, symprec, AngleTolerance::Default, Setting::Spglib, true)
        .map_err(|e| AutoVaspError::SymmetryError(format!("{:?}", e)))?;

    Ok((dataset, species))
}

/// 晶系名称
pub fn crystal_system(number: i32) -> &'static str {
    match number {
        1..=2 => "triclinic",
        3..=15 => "monoclinic",
        16..=74 => "orthorhombic",
        75..=142 => "tetragonal",
        143..=167 => "trigonal",
        168..=194 => "hexagonal",
        195..=230 => "cubic",
        _ => "unknown",
    }
}

/// 国际短符号
pub fn space_group_symbol(number: i32) -> &'static str {
    if (1..=230).contains(&number) {
        SG_SYMBOLS[number as usize]
    } else {
        "Unknown"
    }
}

/// 空间群国际短符号，下标即空间群号
#[rustfmt::skip]
const SG_SYMBOLS: [&str; 231] = [
    "",
    "P1", "P-1", "P2", "P2_1", "C2", "Pm",
    "Pc", "Cm", "Cc", "P2/m", "P2_1/m", "C2/m",
    "P2/c", "P2_1/c", "C2/c", "P222", "P222_1", "P2_12_12",
    "P2_12_12_1", "C222_1", "C222", "F222", "I222", "I2_12_12_1",
    "Pmm2", "Pmc2_1", "Pcc2", "Pma2", "Pca2_1", "Pnc2",
    "Pmn2_1", "Pba2", "Pna2_1", "Pnn2", "Cmm2", "Cmc2_1",
    "Ccc2", "Amm2", "Aem2", "Ama2", "Aea2", "Fmm2",
    "Fdd2", "Imm2", "Iba2", "Ima2", "Pmmm", "Pnnn",
    "Pccm", "Pban", "Pmma", "Pnna", "Pmna", "Pcca",
    "Pbam", "Pccn", "Pbcm", "Pnnm", "Pmmn", "Pbcn",
    "Pbca", "Pnma", "Cmcm", "Cmce", "Cmmm", "Cccm",
    "Cmme", "Ccce", "Fmmm", "Fddd", "Immm", "Ibam",
    "Ibca", "Imma", "P4", "P4_1", "P4_2", "P4_3",
    "I4", "I4_1", "P-4", "I-4", "P4/m", "P4_2/m",
    "P4/n", "P4_2/n", "I4/m", "I4_1/a", "P422", "P42_12",
    "P4_122", "P4_12_12", "P4_222", "P4_22_12", "P4_322", "P4_32_12",
    "I422", "I4_122", "P4mm", "P4bm", "P4_2cm", "P4_2nm",
    "P4cc", "P4nc", "P4_2mc", "P4_2bc", "I4mm", "I4cm",
    "I4_1md", "I4_1cd", "P-42m", "P-42c", "P-42_1m", "P-42_1c",
    "P-4m2", "P-4c2", "P-4b2", "P-4n2", "I-4m2", "I-4c2",
    "I-42m", "I-42d", "P4/mmm", "P4/mcc", "P4/nbm", "P4/nnc",
    "P4/mbm", "P4/mnc", "P4/nmm", "P4/ncc", "P4_2/mmc", "P4_2/mcm",
    "P4_2/nbc", "P4_2/nnm", "P4_2/mbc", "P4_2/mnm", "P4_2/nmc", "P4_2/ncm",
    "I4/mmm", "I4/mcm", "I4_1/amd", "I4_1/acd", "P3", "P3_1",
    "P3_2", "R3", "P-3", "R-3", "P312", "P321",
    "P3_112", "P3_121", "P3_212", "P3_221", "R32", "P3m1",
    "P31m", "P3c1", "P31c", "R3m", "R3c", "P-31m",
    "P-31c", "P-3m1", "P-3c1", "R-3m", "R-3c", "P6",
    "P6_1", "P6_5", "P6_2", "P6_4", "P6_3", "P-6",
    "P6/m", "P6_3/m", "P622", "P6_122", "P6_522", "P6_222",
    "P6_422", "P6_322", "P6mm", "P6cc", "P6_3cm", "P6_3mc",
    "P-6m2", "P-6c2", "P-62m", "P-62c", "P6/mmm", "P6/mcc",
    "P6_3/mcm", "P6_3/mmc", "P23", "F23", "I23", "P2_13",
    "I2_13", "Pm-3", "Pn-3", "Fm-3", "Fd-3", "Im-3",
    "Pa-3", "Ia-3", "P432", "P4_232", "F432", "F4_132",
    "I432", "P4_332", "P4_132", "I4_132", "P-43m", "F-43m",
    "I-43m", "P-43n", "F-43c", "I-43d", "Pm-3m", "Pn-3n",
    "Pm-3n", "Pn-3m", "Fm-3m", "Fm-3c", "Fd-3m", "Fd-3c",
    "Im-3m", "Ia-3d",];

#[cfg(test)]
mod tests {
    use super::*;

    fn rocksalt() -> Crystal {
        let fcc = [
            [0.0, 0.0, 0.0],
            [0.5, 0.5, 0.0],
            [0.5, 0.0, 0.5],
            [0.0, 0.5, 0.5],
        ];
        let mut atoms = Vec::new();
        for p in fcc {
            atoms.push(Atom::new("Na", p));
        }
        for p in fcc {
            atoms.push(Atom::new("Cl", [(p[0] + 0.5) % 1.0, p[1], p[2]]));
        }
        Crystal::new("NaCl", Lattice::cubic(5.64), atoms)
    }

    #[test]
    fn test_symbol_table() {
        assert_eq!(space_group_symbol(14), "P2_1/c");
        assert_eq!(space_group_symbol(166), "R-3m");
        assert_eq!(space_group_symbol(194), "P6_3/mmc");
        assert_eq!(space_group_symbol(225), "Fm-3m");
        assert_eq!(space_group_symbol(230), "Ia-3d");
        assert_eq!(space_group_symbol(0), "Unknown");
        assert_eq!(crystal_system(166), "trigonal");
    }

    #[test]
    fn test_rocksalt_space_group() {
        let info = analyze(&rocksalt()).unwrap();
        assert_eq!(info.number, 225);
        assert_eq!(info.symbol, "Fm-3m");
        assert_eq!(info.crystal_system, "cubic");
    }

    #[test]
    fn test_conventional_cell_keeps_composition() {
        let std = conventional_cell(&rocksalt()).unwrap();
        assert_eq!(std.num_sites(), 8);
        assert_eq!(std.reduced_formula(), "NaCl");
        assert!((std.volume() - 5.64f64.powi(3)).abs() < 1e-3);
    }

    #[test]
    fn test_operations_include_identity() {
        let ops = operations(&rocksalt(), SYMPREC).unwrap();
        // 惯用晶胞：48 个点群操作 × 4 个面心平移
        assert_eq!(ops.len(), 192);
        let identity = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];
        assert!(ops
            .iter()
            .any(|op| op.rotation == identity && op.translation.iter().all(|t| t.abs() < 1e-8)));
    }

    #[test]
    fn test_empty_structure_is_error() {
        let empty = Crystal::new("empty", Lattice::cubic(3.0), Vec::new());
        assert!(matches!(analyze(&empty), Err(AutoVaspError::SymmetryError(_))));
    }
}
