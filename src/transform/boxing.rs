//! # 分子装箱
//!
//! 把孤立分子放进正交盒子中央，用于计算吸附物的参考能量。
//!
//! ## 依赖关系
//! - 被 `commands/structure.rs` 使用

use crate::error::{AutoVaspError, Result};
use crate::models::{Atom, Crystal, Lattice, Molecule};

/// 默认盒子边长 (Å)
pub const DEFAULT_BOX_SIZE: f64 = 15.0;

/// 分子包围盒中心对齐盒子中心；盒子必须严格大于分子尺寸
pub fn box_molecule(molecule: &Molecule, size: [f64; 3]) -> Result<Crystal> {
    if molecule.is_empty() {
        return Err(AutoVaspError::InvalidArgument(format!(
            "molecule {} has no atoms",
            molecule.name
        )));
    }

    let mut lo = [f64::INFINITY; 3];
    let mut hi = [f64::NEG_INFINITY; 3];
    for site in &molecule.sites {
        for i in 0..3 {
            lo[i] = lo[i].min(site.coords[i]);
            hi[i] = hi[i].max(site.coords[i]);
        }
    }

    for i in 0..3 {
        if hi[i] - lo[i] >= size[i] {
            return Err(AutoVaspError::InvalidArgument(format!(
                "box of {:.2} x {:.2} x {:.2} A is too small for {}",
                size[0], size[1], size[2], molecule.name
            )));
        }
    }

    let atoms = molecule
        .sites
        .iter()
        .map(|site| {
            let mut frac = [0.0; 3];
            for i in 0..3 {
                let centred = site.coords[i] - (lo[i] + hi[i]) / 2.0 + size[i] / 2.0;
                frac[i] = centred / size[i];
            }
            Atom::new(site.element.clone(), frac)
        })
        .collect();

    let lattice = Lattice::from_vectors([
        [size[0], 0.0, 0.0],
        [0.0, size[1], 0.0],
        [0.0, 0.0, size[2]],
    ]);
    Ok(Crystal::new(molecule.formula(), lattice, atoms).sorted())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MoleculeSite;

    #[test]
    fn test_box_water() {
        let water = Molecule::new(
            "water",
            vec![
                MoleculeSite { element: "O".into(), coords: [0.0, 0.0, 0.12] },
                MoleculeSite { element: "H".into(), coords: [0.0, 0.76, -0.47] },
                MoleculeSite { element: "H".into(), coords: [0.0, -0.76, -0.47] },
            ],
        );
        let boxed = box_molecule(&water, [DEFAULT_BOX_SIZE; 3]).unwrap();

        assert_eq!(boxed.num_sites(), 3);
        assert!((boxed.volume() - 3375.0).abs() < 1e-6);
        assert_eq!(boxed.atoms[2].element, "O");

        // 包围盒中心落在盒子中心
        let o = boxed.cart_coords(2);
        assert!((o[0] - 7.5).abs() < 1e-9);
        assert!((o[2] - (7.5 + 0.295)).abs() < 1e-9);

        assert!(matches!(
            box_molecule(&water, [15.0, 1.0, 15.0]),
            Err(AutoVaspError::InvalidArgument(_))
        ));
    }
}
