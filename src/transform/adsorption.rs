//! # 吸附位点与吸附结构
//!
//! ## 位点搜索
//! - 表面原子：笛卡尔 z 不低于最高原子 0.9 Å 以内
//! - 表面原子连同面内周期镜像投影到 xy 平面做 Delaunay 三角剖分
//! - ontop：表面原子正上方
//! - bridge：Delaunay 边的中点（共圆多边形内部的对角线除外）
//! - hollow：Delaunay 多边形的外心，外心重合的三角形合并为一个
//!
//! bridge 与 hollow 只取落在中心晶胞内的点。位点高度取构成原子平均 z + 1.6 Å，
//! 再用保持表面法向的对称操作去重。
//!
//! ## 依赖关系
//! - 被 `commands/adsorb.rs` 使用
//! - 使用 `symmetry::operations`, `transform/supercell.rs`, `transform/freeze.rs`

use super::freeze::freeze;
use super::supercell::extend_supercell;
use crate::error::Result;
use crate::models::{Atom, Crystal, Molecule};
use crate::symmetry::{self, SymOp};
use std::collections::HashMap;
use std::fmt;

/// 吸附物最低原子距表面的高度 (Å)
pub const ADSORPTION_HEIGHT: f64 = 1.6;

const SURFACE_DEPTH: f64 = 0.9;
/// 三角剖分用的镜像范围（每个方向 ±2 个晶胞）
const IMAGE_RANGE: i32 = 2;
const SITE_SYMPREC: f64 = 0.1;
const POSITION_TOLERANCE: f64 = 1e-3;

/// 位点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    Ontop,
    Bridge,
    Hollow,
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SiteKind::Ontop => write!(f, "ontop"),
            SiteKind::Bridge => write!(f, "bridge"),
            SiteKind::Hollow => write!(f, "hollow"),
        }
    }
}

/// 吸附位点
#[derive(Debug, Clone, PartialEq)]
pub struct AdsorptionSite {
    pub kind: SiteKind,
    /// 分数坐标，a/b 已折回 [0, 1)
    pub frac: [f64; 3],
    /// 笛卡尔坐标 (Å)
    pub cart: [f64; 3],
}

/// 生成全部吸附结构：每个位点一个，覆盖度超胞，冻结 z < min_z 的原子
pub fn generate_adsorbed_structures(
    slab: &Crystal,
    molecule: &Molecule,
    min_z: f64,
    coverage: [u32; 3],
) -> Result<Vec<Crystal>> {
    let sites = find_adsorption_sites(slab, ADSORPTION_HEIGHT, true);
    if sites.is_empty() || molecule.is_empty() {
        return Ok(Vec::new());
    }

    let supercell = extend_supercell(slab, coverage[0], coverage[1], coverage[2])?;
    let anchor = molecule.lowest_point().unwrap_or([0.0; 3]);

    let structures = sites
        .iter()
        .map(|site| {
            let mut adsorbed = supercell.clone();
            adsorbed.name = format!("{} + {} {}", slab.name, molecule.formula(), site.kind);
            for s in &molecule.sites {
                let cart = [
                    s.coords[0] - anchor[0] + site.cart[0],
                    s.coords[1] - anchor[1] + site.cart[1],
                    s.coords[2] - anchor[2] + site.cart[2],
                ];
                let frac = adsorbed.lattice.cart_to_frac(cart);
                adsorbed.atoms.push(Atom::new(s.element.clone(), frac));
            }
            freeze(&adsorbed, min_z)
        })
        .collect();

    Ok(structures)
}

/// 按 ontop, bridge, hollow 顺序返回位点
pub fn find_adsorption_sites(slab: &Crystal, height: f64, symmetry_reduce: bool) -> Vec<AdsorptionSite> {
    let surface = surface_points(slab);
    if surface.is_empty() {
        return Vec::new();
    }

    let images = periodic_images(slab, &surface, IMAGE_RANGE);
    let plane: Vec<[f64; 2]> = images.iter().map(|p| [p[0], p[1]]).collect();
    let triangles = delaunay(&plane);

    // 外接圆心重合的三角形同属一个 Delaunay 多边形（如正方格子的四边形）
    let mut centres: Vec<[f64; 2]> = Vec::new();
    let mut polygon_of = Vec::with_capacity(triangles.len());
    for t in &triangles {
        let id = match centres.iter().position(|c| dist_2d(*c, t.centre) < POSITION_TOLERANCE) {
            Some(id) => id,
            None => {
                centres.push(t.centre);
                centres.len() - 1
            }
        };
        polygon_of.push(id);
    }

    let mut owners: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (i, t) in triangles.iter().enumerate() {
        for e in t.edges() {
            owners.entry(e).or_default().push(polygon_of[i]);
        }
    }

    let mut candidates: Vec<(SiteKind, [f64; 3])> = Vec::new();

    for p in &surface {
        candidates.push((SiteKind::Ontop, *p));
    }

    for t in &triangles {
        for e in t.edges() {
            // 同一多边形内部的对角线不是 bridge
            let internal = owners
                .get(&e)
                .is_some_and(|ids| ids.len() == 2 && ids[0] == ids[1]);
            let midpoint = mean(&[images[e.0], images[e.1]]);
            if !internal && in_cell(slab, midpoint) {
                candidates.push((SiteKind::Bridge, midpoint));
            }
        }
    }

    for (id, centre) in centres.iter().enumerate() {
        let Some(i) = polygon_of.iter().position(|&p| p == id) else {
            continue;
        };
        let z = triangles[i].vertices.iter().map(|&v| images[v][2]).sum::<f64>() / 3.0;
        let point = [centre[0], centre[1], z];
        if in_cell(slab, point) {
            candidates.push((SiteKind::Hollow, point));
        }
    }

    let ops: Vec<SymOp> = if symmetry_reduce {
        symmetry::operations(slab, SITE_SYMPREC)
            .map(|ops| ops.into_iter().filter(preserves_normal).collect())
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    let c = slab.lattice.lengths()[2];
    let mut sites: Vec<AdsorptionSite> = Vec::new();
    for (kind, p) in candidates {
        let cart = [p[0], p[1], p[2] + height];
        let mut frac = slab.lattice.cart_to_frac(cart);
        frac[0] = wrap(frac[0]);
        frac[1] = wrap(frac[1]);

        let duplicate = sites.iter().any(|s| {
            s.kind == kind
                && (same_site(s.frac, frac, c)
                    || ops.iter().any(|op| same_site(s.frac, op.apply(frac), c)))
        });
        if !duplicate {
            sites.push(AdsorptionSite {
                kind,
                frac,
                cart: slab.lattice.frac_to_cart(frac),
            });
        }
    }
    sites
}

/// 表面原子的笛卡尔坐标
fn surface_points(slab: &Crystal) -> Vec<[f64; 3]> {
    let carts = slab.cartesian_positions();
    let zmax = carts.iter().map(|p| p[2]).fold(f64::NEG_INFINITY, f64::max);
    carts
        .into_iter()
        .filter(|p| p[2] >= zmax - SURFACE_DEPTH)
        .collect()
}

/// 面内 [-range, range] 的全部周期镜像
fn periodic_images(slab: &Crystal, points: &[[f64; 3]], range: i32) -> Vec<[f64; 3]> {
    let [a, b, _] = slab.lattice.matrix;
    let mut out = Vec::with_capacity(points.len() * ((2 * range + 1) * (2 * range + 1)) as usize);
    for i in -range..=range {
        for j in -range..=range {
            for p in points {
                out.push([
                    p[0] + i as f64 * a[0] + j as f64 * b[0],
                    p[1] + i as f64 * a[1] + j as f64 * b[1],
                    p[2] + i as f64 * a[2] + j as f64 * b[2],
                ]);
            }
        }
    }
    out
}

/// 面内分数坐标落在 [0, 1) 的点；只保留中心晶胞，其四周都有完整镜像
fn in_cell(slab: &Crystal, cart: [f64; 3]) -> bool {
    let frac = slab.lattice.cart_to_frac(cart);
    let inside = |x: f64| x >= -POSITION_TOLERANCE && x < 1.0 - POSITION_TOLERANCE;
    inside(frac[0]) && inside(frac[1])
}

/// 面内三角形，缓存外接圆
#[derive(Debug, Clone, Copy)]
struct Triangle {
    vertices: [usize; 3],
    centre: [f64; 2],
    radius_sq: f64,
}

impl Triangle {
    /// 共线时为 None
    fn new(vertices: [usize; 3], points: &[[f64; 2]]) -> Option<Self> {
        let [p, q, r] = vertices.map(|i| points[i]);
        let (centre, radius_sq) = circumcircle(p, q, r)?;
        Some(Triangle {
            vertices,
            centre,
            radius_sq,
        })
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [edge(a, b), edge(b, c), edge(c, a)]
    }

    /// 点严格位于外接圆内；圆上的点不算
    fn encloses(&self, p: [f64; 2]) -> bool {
        let d = (p[0] - self.centre[0]).powi(2) + (p[1] - self.centre[1]).powi(2);
        d < self.radius_sq * (1.0 - 1e-9)
    }
}

fn edge(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Bowyer-Watson 逐点插入的 Delaunay 三角剖分
fn delaunay(points: &[[f64; 2]]) -> Vec<Triangle> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut lo = [f64::INFINITY; 2];
    let mut hi = [f64::NEG_INFINITY; 2];
    for p in points {
        for i in 0..2 {
            lo[i] = lo[i].min(p[i]);
            hi[i] = hi[i].max(p[i]);
        }
    }
    let span = (hi[0] - lo[0]).max(hi[1] - lo[1]).max(1.0);
    let mid = [(lo[0] + hi[0]) / 2.0, (lo[1] + hi[1]) / 2.0];

    // 包住全部点的超级三角形，最后连同其顶点一起删掉
    let mut all = points.to_vec();
    all.push([mid[0] - 20.0 * span, mid[1] - span]);
    all.push([mid[0], mid[1] + 20.0 * span]);
    all.push([mid[0] + 20.0 * span, mid[1] - span]);

    let mut triangles: Vec<Triangle> = Triangle::new([n, n + 1, n + 2], &all).into_iter().collect();
    for (i, p) in points.iter().enumerate() {
        let (bad, good): (Vec<Triangle>, Vec<Triangle>) =
            triangles.into_iter().partition(|t| t.encloses(*p));

        // 空腔边界：只属于一个被删三角形的边
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        for t in &bad {
            for e in t.edges() {
                match boundary.iter().position(|b| *b == e) {
                    Some(k) => {
                        boundary.swap_remove(k);
                    }
                    None => boundary.push(e),
                }
            }
        }

        triangles = good;
        triangles.extend(
            boundary
                .into_iter()
                .filter_map(|(a, b)| Triangle::new([a, b, i], &all)),
        );
    }

    triangles.retain(|t| t.vertices.iter().all(|&v| v < n));
    triangles
}

fn dist_2d(p: [f64; 2], q: [f64; 2]) -> f64 {
    ((p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2)).sqrt()
}

fn mean(points: &[[f64; 3]]) -> [f64; 3] {
    let n = points.len() as f64;
    let mut m = [0.0; 3];
    for p in points {
        for i in 0..3 {
            m[i] += p[i] / n;
        }
    }
    m
}

/// 外接圆 (圆心, 半径平方)；共线时为 None
fn circumcircle(p: [f64; 2], q: [f64; 2], r: [f64; 2]) -> Option<([f64; 2], f64)> {
    let (bx, by) = (q[0] - p[0], q[1] - p[1]);
    let (cx, cy) = (r[0] - p[0], r[1] - p[1]);
    let d = 2.0 * (bx * cy - by * cx);
    if d.abs() < 1e-8 {
        return None;
    }
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    Some(([p[0] + ux, p[1] + uy], ux * ux + uy * uy))
}

/// 不改变 z 方向的操作
fn preserves_normal(op: &SymOp) -> bool {
    let r = op.rotation;
    r[2] == [0, 0, 1] && r[0][2] == 0 && r[1][2] == 0
}

fn wrap(x: f64) -> f64 {
    let y = x - x.floor();
    if y > 1.0 - POSITION_TOLERANCE {
        0.0
    } else {
        y
    }
}

/// a/b 周期，z 直接比较（笛卡尔容差 0.05 Å）
fn same_site(a: [f64; 3], b: [f64; 3], c: f64) -> bool {
    let periodic = |x: f64, y: f64| {
        let d = x - y;
        (d - d.round()).abs() < POSITION_TOLERANCE * 10.0
    };
    periodic(a[0], b[0]) && periodic(a[1], b[1]) && ((a[2] - b[2]) * c).abs() < 0.05
}
