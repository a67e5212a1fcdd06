//! # VASP KPOINTS 读写
//!
//! 支持三种形式：
//! - 自动网格 (`Gamma` / `Monkhorst-Pack`)
//! - 能带用的 line mode（倒空间坐标，成对的高对称点）
//! - 显式 k 点列表（只读取数量）
//!
//! ## 依赖关系
//! - 被 `deck/`, `symmetry/kpath.rs`, `output/` 使用

use crate::error::{AutoVaspError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// 自动网格类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshStyle {
    Gamma,
    MonkhorstPack,
}

impl fmt::Display for MeshStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshStyle::Gamma => write!(f, "Gamma"),
            MeshStyle::MonkhorstPack => write!(f, "Monkhorst-Pack"),
        }
    }
}

/// 自动 k 点网格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpointMesh {
    pub comment: String,
    pub style: MeshStyle,
    pub divisions: [u32; 3],
    pub shift: [f64; 3],
}

impl KpointMesh {
    pub fn new(comment: impl Into<String>, style: MeshStyle, divisions: [u32; 3]) -> Self {
        KpointMesh {
            comment: comment.into(),
            style,
            divisions,
            shift: [0.0; 3],
        }
    }

    /// 网格点总数（未做对称约化）
    pub fn num_kpoints(&self) -> usize {
        self.divisions.iter().map(|&n| n as usize).product()
    }

    pub fn to_kpoints_string(&self) -> String {
        format!(
            "{}\n0\n{}\n{} {} {}\n{} {} {}\n",
            self.comment,
            self.style,
            self.divisions[0],
            self.divisions[1],
            self.divisions[2],
            self.shift[0],
            self.shift[1],
            self.shift[2]
        )
    }
}

/// 高对称点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighSymmetryPoint {
    pub label: String,
    /// 倒格子分数坐标
    pub coords: [f64; 3],
}

impl HighSymmetryPoint {
    pub fn new(label: impl Into<String>, coords: [f64; 3]) -> Self {
        HighSymmetryPoint {
            label: label.into(),
            coords,
        }
    }
}

/// line mode 能带路径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KPath {
    pub comment: String,
    /// 每段的插值点数
    pub divisions: u32,
    pub segments: Vec<(HighSymmetryPoint, HighSymmetryPoint)>,
}

impl KPath {
    /// 路径上的总 k 点数
    pub fn num_kpoints(&self) -> usize {
        self.divisions as usize * self.segments.len()
    }

    pub fn to_kpoints_string(&self) -> String {
        let mut out = format!("{}\n{}\nLine_mode\nReciprocal\n", self.comment, self.divisions);
        let point = |p: &HighSymmetryPoint| {
            format!(
                "{:.5} {:.5} {:.5} ! {}\n",
                p.coords[0], p.coords[1], p.coords[2], p.label
            )
        };
        for (i, (start, end)) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&point(start));
            out.push_str(&point(end));
        }
        out
    }
}

/// KPOINTS 文件内容
#[derive(Debug, Clone, PartialEq)]
pub enum Kpoints {
    Mesh(KpointMesh),
    Line(KPath),
    Explicit { comment: String, count: usize },
}

impl Kpoints {
    pub fn num_kpoints(&self) -> usize {
        match self {
            Kpoints::Mesh(mesh) => mesh.num_kpoints(),
            Kpoints::Line(path) => path.num_kpoints(),
            Kpoints::Explicit { count, .. } => *count,
        }
    }

    /// 自动网格划分（仅 Mesh）
    pub fn divisions(&self) -> Option<[u32; 3]> {
        match self {
            Kpoints::Mesh(mesh) => Some(mesh.divisions),
            _ => None,
        }
    }

    pub fn to_kpoints_string(&self) -> String {
        match self {
            Kpoints::Mesh(mesh) => mesh.to_kpoints_string(),
            Kpoints::Line(path) => path.to_kpoints_string(),
            Kpoints::Explicit { comment, count } => format!("{}\n{}\nReciprocal\n", comment, count),
        }
    }
}

/// 读取 KPOINTS 文件
pub fn parse_kpoints_file(path: &Path) -> Result<Kpoints> {
    let content = fs::read_to_string(path).map_err(|e| AutoVaspError::read(path, e))?;
    parse_kpoints_content(&content, &path.display().to_string())
}

/// 解析 KPOINTS 文本
pub fn parse_kpoints_content(content: &str, source: &str) -> Result<Kpoints> {
    let lines: Vec<&str> = content.lines().collect();
    let fail = |reason: &str| AutoVaspError::parse("kpoints", source, reason);

    if lines.len() < 3 {
        return Err(fail("File too short"));
    }

    let comment = lines[0].trim().to_string();
    let count: usize = lines[1]
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| fail("Invalid k-point count on line 2"))?;
    let mode = lines[2].trim().to_lowercase();

    if mode.starts_with('l') {
        let points: Vec<HighSymmetryPoint> = lines
            .iter()
            .skip(4)
            .filter(|l| !l.trim().is_empty())
            .map(|l| parse_labelled_point(l))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| fail("Invalid high-symmetry point"))?;
        if points.len() % 2 != 0 {
            return Err(fail("Line mode needs an even number of points"));
        }
        let segments = points
            .chunks(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();
        return Ok(Kpoints::Line(KPath {
            comment,
            divisions: count as u32,
            segments,
        }));
    }

    if count == 0 {
        let style = if mode.starts_with('g') {
            MeshStyle::Gamma
        } else if mode.starts_with('m') {
            MeshStyle::MonkhorstPack
        } else {
            return Err(fail("Unsupported automatic mode"));
        };
        let divisions: Vec<u32> = lines
            .get(3)
            .ok_or_else(|| fail("Missing subdivision line"))?
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if divisions.len() < 3 {
            return Err(fail("Invalid subdivision line"));
        }
        let shift: Vec<f64> = lines
            .get(4)
            .map(|l| l.split_whitespace().filter_map(|s| s.parse().ok()).collect())
            .unwrap_or_default();
        let mut mesh = KpointMesh::new(comment, style, [divisions[0], divisions[1], divisions[2]]);
        if shift.len() >= 3 {
            mesh.shift = [shift[0], shift[1], shift[2]];
        }
        return Ok(Kpoints::Mesh(mesh));
    }

    Ok(Kpoints::Explicit { comment, count })
}

/// 解析 "x y z ! label" 行
fn parse_labelled_point(line: &str) -> Option<HighSymmetryPoint> {
    let (coords, label) = match line.split_once('!') {
        Some((c, l)) => (c, l.trim()),
        None => (line, ""),
    };
    let values: Vec<f64> = coords
        .split_whitespace()
        .take(3)
        .filter_map(|s| s.parse().ok())
        .collect();
    if values.len() < 3 {
        return None;
    }
    Some(HighSymmetryPoint::new(label, [values[0], values[1], values[2]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_string_and_parse() {
        let mesh = KpointMesh::new("k-point density", MeshStyle::Gamma, [12, 12, 2]);
        let text = mesh.to_kpoints_string();
        assert!(text.starts_with("k-point density\n0\nGamma\n12 12 2\n"));

        let parsed = parse_kpoints_content(&text, "KPOINTS").unwrap();
        assert_eq!(parsed.divisions(), Some([12, 12, 2]));
        assert_eq!(parsed.num_kpoints(), 288);
    }

    #[test]
    fn test_monkhorst_pack_keyword() {
        let text = "auto\n0\nMonkhorst-Pack\n4 4 4\n0 0 0\n";
        match parse_kpoints_content(text, "KPOINTS").unwrap() {
            Kpoints::Mesh(mesh) => assert_eq!(mesh.style, MeshStyle::MonkhorstPack),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_line_mode() {
        let path = KPath {
            comment: "Line_mode KPOINTS file".to_string(),
            divisions: 40,
            segments: vec![
                (
                    HighSymmetryPoint::new("\\Gamma", [0.0, 0.0, 0.0]),
                    HighSymmetryPoint::new("X", [0.0, 0.5, 0.0]),
                ),
                (
                    HighSymmetryPoint::new("X", [0.0, 0.5, 0.0]),
                    HighSymmetryPoint::new("M", [0.5, 0.5, 0.0]),
                ),
            ],
        };
        let text = path.to_kpoints_string();
        assert!(text.contains("Line_mode\nReciprocal\n"));

        match parse_kpoints_content(&text, "KPATH").unwrap() {
            Kpoints::Line(parsed) => {
                assert_eq!(parsed.divisions, 40);
                assert_eq!(parsed.segments.len(), 2);
                assert_eq!(parsed.segments[1].1.label, "M");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_explicit_list_counts() {
        let text = "explicit\n2\nReciprocal\n0 0 0 1\n0.5 0 0 1\n";
        assert_eq!(parse_kpoints_content(text, "KPOINTS").unwrap().num_kpoints(), 2);
    }
}
