//! # 超胞扩展
//!
//! 沿晶格向量复制 (nx, ny, nz) 次。位点按原顺序依次展开其全部镜像，
//! 因此同种元素仍然连续；选择性动力学标记随镜像复制。
//!
//! ## 依赖关系
//! - 被 `transform/adsorption.rs`, `commands/structure.rs` 使用

use crate::error::{AutoVaspError, Result};
use crate::models::{Atom, Crystal};

pub fn extend_supercell(crystal: &Crystal, nx: u32, ny: u32, nz: u32) -> Result<Crystal> {
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(AutoVaspError::InvalidArgument(format!(
            "supercell factors must be positive, got {}x{}x{}",
            nx, ny, nz
        )));
    }

    let capacity = [nx, ny, nz]
        .iter()
        .try_fold(crystal.atoms.len(), |acc, &n| acc.checked_mul(n as usize))
        .ok_or_else(|| {
            AutoVaspError::InvalidArgument(format!(
                "supercell {}x{}x{} of {} sites is too large",
                nx,
                ny,
                nz,
                crystal.num_sites()
            ))
        })?;

    let factors = [nx as f64, ny as f64, nz as f64];
    let mut atoms = Vec::with_capacity(capacity);

    for atom in &crystal.atoms {
        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    let offset = [x as f64, y as f64, z as f64];
                    let mut position = [0.0; 3];
                    for i in 0..3 {
                        position[i] = (atom.position[i] + offset[i]) / factors[i];
                    }
                    atoms.push(Atom {
                        element: atom.element.clone(),
                        position,
                        selective_dynamics: atom.selective_dynamics,
                    });
                }
            }
        }
    }

    Ok(Crystal::new(
        crystal.name.clone(),
        crystal.lattice.scaled([nx, ny, nz]),
        atoms,
    ))
}
