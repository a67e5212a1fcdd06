//! # 晶体结构数据模型
//!
//! 定义统一的晶体结构表示：晶格、原子（分数坐标 + 选择性动力学标记）与晶体。
//! 所有结构变换都返回新值，不修改输入。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `transform/`, `deck/`, `symmetry/` 使用
//! - 使用 `models/element.rs`

use super::element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 晶格参数表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let cos_gamma = gamma.to_radians().cos();
        let sin_gamma = gamma.to_radians().sin();

        let a_vec = [a, 0.0, 0.0];
        let b_vec = [b * cos_gamma, b * sin_gamma, 0.0];

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();

        Lattice {
            matrix: [a_vec, b_vec, [c1, c2, c3]],
        }
    }

    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 立方晶格
    pub fn cubic(a: f64) -> Self {
        Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    /// 晶格常数 (a, b, c)
    pub fn lengths(&self) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (i, v) in self.matrix.iter().enumerate() {
            out[i] = norm(*v);
        }
        out
    }

    /// 晶格角 (alpha, beta, gamma)，单位：度
    pub fn angles(&self) -> [f64; 3] {
        let [a, b, c] = self.lengths();
        let [a_vec, b_vec, c_vec] = self.matrix;
        let angle = |u: [f64; 3], v: [f64; 3], lu: f64, lv: f64| {
            (dot(u, v) / (lu * lv)).clamp(-1.0, 1.0).acos().to_degrees()
        };
        [
            angle(b_vec, c_vec, b, c),
            angle(a_vec, c_vec, a, c),
            angle(a_vec, b_vec, a, b),
        ]
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a, b, c] = self.lengths();
        let [alpha, beta, gamma] = self.angles();
        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（带符号的行列式）
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        dot(a, cross(b, c))
    }

    /// 分数坐标转笛卡尔坐标
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }

    /// 笛卡尔坐标转分数坐标；晶格奇异时原样返回
    pub fn cart_to_frac(&self, cart: [f64; 3]) -> [f64; 3] {
        let [a, b, c] = self.matrix;
        let det = self.volume();
        if det.abs() < 1e-10 {
            return cart;
        }
        // 分数坐标 = cart · (倒格子向量 / 2π)
        let ra = cross(b, c);
        let rb = cross(c, a);
        let rc = cross(a, b);
        [
            dot(cart, ra) / det,
            dot(cart, rb) / det,
            dot(cart, rc) / det,
        ]
    }

    /// 倒格子向量（不含 2π 因子），行向量
    pub fn reciprocal(&self) -> [[f64; 3]; 3] {
        let [a, b, c] = self.matrix;
        let det = self.volume();
        let scale = |v: [f64; 3]| [v[0] / det, v[1] / det, v[2] / det];
        [scale(cross(b, c)), scale(cross(c, a)), scale(cross(a, b))]
    }

    /// 是否为六方晶格（两边相等、夹角 120°、其余 90°）
    pub fn is_hexagonal(&self) -> bool {
        let [a, b, c] = self.lengths();
        let [alpha, beta, gamma] = self.angles();
        let close = |x: f64, y: f64, tol: f64| (x - y).abs() < tol;
        let right = |x: f64| close(x, 90.0, 1e-2);
        let hex = |x: f64| close(x, 120.0, 1e-2) || close(x, 60.0, 1e-2);

        (close(a, b, 1e-4) && right(alpha) && right(beta) && hex(gamma))
            || (close(b, c, 1e-4) && hex(alpha) && right(beta) && right(gamma))
            || (close(a, c, 1e-4) && right(alpha) && hex(beta) && right(gamma))
    }

    /// 按 (nx, ny, nz) 放大晶格
    pub fn scaled(&self, factors: [u32; 3]) -> Self {
        let mut matrix = self.matrix;
        for (row, &n) in matrix.iter_mut().zip(factors.iter()) {
            for x in row.iter_mut() {
                *x *= n as f64;
            }
        }
        Lattice { matrix }
    }
}

/// 原子信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],

    /// 选择性动力学标记（x, y, z 是否允许弛豫）
    pub selective_dynamics: Option<[bool; 3]>,
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
            selective_dynamics: None,
        }
    }

    pub fn with_selective_dynamics(mut self, flags: [bool; 3]) -> Self {
        self.selective_dynamics = Some(flags);
        self
    }

    /// 三个方向均被固定
    pub fn is_frozen(&self) -> bool {
        matches!(self.selective_dynamics, Some([false, false, false]))
    }
}

/// 晶体结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crystal {
    /// 结构名称（POSCAR 注释行）
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子列表
    pub atoms: Vec<Atom>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            atoms,
        }
    }

    /// 位点数
    pub fn num_sites(&self) -> usize {
        self.atoms.len()
    }

    /// 晶胞体积 (Å³)
    pub fn volume(&self) -> f64 {
        self.lattice.volume().abs()
    }

    /// 第 i 个原子的笛卡尔坐标
    pub fn cart_coords(&self, i: usize) -> [f64; 3] {
        self.lattice.frac_to_cart(self.atoms[i].position)
    }

    /// 全部笛卡尔坐标
    pub fn cartesian_positions(&self) -> Vec<[f64; 3]> {
        self.atoms
            .iter()
            .map(|a| self.lattice.frac_to_cart(a.position))
            .collect()
    }

    /// 按首次出现顺序列出的元素
    pub fn elements(&self) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        for atom in &self.atoms {
            if !order.contains(&atom.element) {
                order.push(atom.element.clone());
            }
        }
        order
    }

    /// 元素 -> 原子数
    pub fn composition(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.element.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// 完整化学式，元素按电负性排序 (e.g. "Bi6Se9")
    pub fn formula(&self) -> String {
        format_formula(&self.sorted_composition(), 1)
    }

    /// 约化化学式 (e.g. "Bi2Se3")
    pub fn reduced_formula(&self) -> String {
        let counts = self.sorted_composition();
        let divisor = counts.iter().map(|(_, n)| *n).fold(0, gcd);
        format_formula(&counts, divisor.max(1))
    }

    fn sorted_composition(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self.composition().into_iter().collect();
        counts.sort_by(|a, b| element::compare(&a.0, &b.0));
        counts
    }

    /// 是否带有选择性动力学标记（以第一个位点为准）
    pub fn has_selective_dynamics(&self) -> bool {
        self.atoms
            .first()
            .map(|a| a.selective_dynamics.is_some())
            .unwrap_or(false)
    }

    /// 按元素电负性稳定排序位点
    pub fn sorted(&self) -> Crystal {
        let mut atoms = self.atoms.clone();
        atoms.sort_by(|a, b| element::compare(&a.element, &b.element));
        Crystal {
            name: self.name.clone(),
            lattice: self.lattice.clone(),
            atoms,
        }
    }
}

/// 化学式格式化，计数为 1 时省略
fn format_formula(counts: &[(String, usize)], divisor: usize) -> String {
    counts
        .iter()
        .map(|(el, n)| {
            let n = n / divisor;
            if n == 1 {
                el.clone()
            } else {
                format!("{}{}", el, n)
            }
        })
        .collect::<Vec<_>>()
        .join("")
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

pub(crate) fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}
