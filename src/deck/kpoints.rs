//! # 自动 k 点网格
//!
//! 按晶格长度取密度：N_i = ceil(50 / |a_i|)。
//! 默认 Γ 中心；关闭 `force_gamma` 后，奇数网格、六方与面心晶格仍用 Γ，其余用 Monkhorst-Pack。
//!
//! ## 依赖关系
//! - 被 `deck/mod.rs`, `tabulate.rs` 使用
//! - 使用 `parsers/kpoints.rs`

use crate::models::Crystal;
use crate::parsers::kpoints::{KpointMesh, MeshStyle};

/// 每个方向的长度密度 (Å)
pub const LENGTH_DENSITY: [f64; 3] = [50.0, 50.0, 50.0];

/// 推荐的 (50/a, 50/b, 50/c)，未取整
pub fn recommended_kpoints(crystal: &Crystal) -> [f64; 3] {
    let lengths = crystal.lattice.lengths();
    let mut k = [0.0; 3];
    for i in 0..3 {
        k[i] = LENGTH_DENSITY[i] / lengths[i];
    }
    k
}

/// 自动网格；`space_group_symbol` 以 `F` 开头视为面心
pub fn automatic_mesh(crystal: &Crystal, space_group_symbol: &str, force_gamma: bool) -> KpointMesh {
    let divisions = recommended_kpoints(crystal).map(|k| (k.ceil() as u32).max(1));

    let has_odd = divisions.iter().any(|n| n % 2 == 1);
    let face_centred = space_group_symbol.starts_with('F');
    let style = if force_gamma || has_odd || crystal.lattice.is_hexagonal() || face_centred {
        MeshStyle::Gamma
    } else {
        MeshStyle::MonkhorstPack
    };

    let comment = format!(
        "k-point density of [{}, {}, {}]/[a, b, c]",
        LENGTH_DENSITY[0], LENGTH_DENSITY[1], LENGTH_DENSITY[2]
    );
    KpointMesh::new(comment, style, divisions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    fn cell(a: f64, c: f64) -> Crystal {
        Crystal::new(
            "X",
            Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, c]]),
            vec![Atom::new("Si", [0.0; 3])],
        )
    }

    #[test]
    fn test_divisions_from_lengths() {
        let mesh = automatic_mesh(&cell(5.43, 5.43), "Fd-3m", true);
        assert_eq!(mesh.divisions, [10, 10, 10]);
        assert_eq!(mesh.style, MeshStyle::Gamma);
        assert_eq!(mesh.num_kpoints(), 1000);
        assert_eq!(mesh.comment, "k-point density of [50, 50, 50]/[a, b, c]");

        // 50 / 5 = 10 恰好整除
        assert_eq!(automatic_mesh(&cell(5.0, 40.0), "P4/mmm", true).divisions, [10, 10, 2]);
    }

    #[test]
    fn test_mesh_style_rules() {
        // 偶数网格、四方 P 格子
        assert_eq!(
            automatic_mesh(&cell(5.0, 5.0), "P4/mmm", false).style,
            MeshStyle::MonkhorstPack
        );
        // 奇数网格
        assert_eq!(automatic_mesh(&cell(6.0, 6.0), "P4/mmm", false).style, MeshStyle::Gamma);
        // 面心
        assert_eq!(automatic_mesh(&cell(5.0, 5.0), "Fm-3m", false).style, MeshStyle::Gamma);
        // 六方
        let hex = Crystal::new(
            "C",
            Lattice::from_parameters(2.5, 2.5, 6.25, 90.0, 90.0, 120.0),
            vec![Atom::new("C", [0.0; 3])],
        );
        assert_eq!(automatic_mesh(&hex, "P6_3/mmc", false).style, MeshStyle::Gamma);
    }
}
