//! # slab 命令实现
//!
//! 由体相结构切出给定晶面的全部 slab，打印概要表后逐个写出
//! POSCAR 或完整输入组。
//!
//! ## 依赖关系
//! - 使用 `cli/structure.rs` 定义的参数
//! - 使用 `acquire/`, `transform/slab.rs`, `utils/`

use crate::acquire;
use crate::cli::structure::SlabArgs;
use crate::error::{AutoVaspError, Result};
use crate::models::Crystal;
use crate::transform::{self, SlabParameters};
use crate::utils::output;
use tabled::Tabled;

/// slab 概要表的一行
#[derive(Debug, Tabled)]
struct SlabRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "Sites")]
    sites: usize,
    #[tabled(rename = "Frozen")]
    frozen: usize,
    #[tabled(rename = "c (Å)")]
    c: String,
    #[tabled(rename = "Symmetric")]
    symmetric: bool,
}

fn slab_row(index: usize, slab: &Crystal) -> SlabRow {
    SlabRow {
        index,
        formula: slab.formula(),
        sites: slab.num_sites(),
        frozen: transform::count_frozen(slab),
        c: format!("{:.3}", slab.lattice.lengths()[2]),
        symmetric: transform::is_symmetric(slab),
    }
}

/// 执行 slab 命令
pub fn execute(args: SlabArgs) -> Result<()> {
    let [h, k, l] = args.miller;
    output::print_header(&format!("Generating ({}{}{}) Slabs", h, k, l));

    let bulk = match (&args.input, &args.mp_id) {
        (Some(path), _) => acquire::load_from_file(path)?,
        (None, Some(id)) => {
            super::fetch_structure(id, args.api_key.as_deref(), args.endpoint.as_deref())?
        }
        (None, None) => {
            return Err(AutoVaspError::InvalidArgument(
                "No bulk structure given (pass a file or --mp-id)".to_string(),
            ))
        }
    };

    let params = SlabParameters {
        miller: args.miller,
        min_slab_size: args.min_slab_size,
        min_vacuum_size: args.min_vacuum_size,
        in_unit_planes: args.in_unit_planes,
        require_symmetric: !args.allow_asymmetric,
        min_z: args.min_z,
    };
    let slabs = transform::generate_slabs(&bulk, &params)?;

    let rows: Vec<SlabRow> = slabs.iter().enumerate().map(|(i, s)| slab_row(i, s)).collect();
    output::print_table(&rows);

    let stem = format!(
        "{}_{}{}{}",
        super::file_stem_for(&bulk.reduced_formula()),
        h,
        k,
        l
    );
    super::write_structures(
        &slabs,
        &stem,
        &args.output,
        args.job_type.as_deref(),
        &args.psp,
        &args.templates,
        args.readme,
    )?;

    output::print_done(&format!(
        "Wrote {} slab(s) to '{}'",
        slabs.len(),
        args.output.display()
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    #[test]
    fn test_slab_row() {
        let slab = Crystal::new(
            "Po slab",
            Lattice::from_parameters(3.0, 3.0, 20.0, 90.0, 90.0, 90.0),
            vec![
                Atom::new("Po", [0.0, 0.0, 0.05]).with_selective_dynamics([false; 3]),
                Atom::new("Po", [0.0, 0.0, 0.2]).with_selective_dynamics([true; 3]),
            ],
        );
        let row = slab_row(3, &slab);
        assert_eq!(row.index, 3);
        assert_eq!(row.sites, 2);
        assert_eq!(row.frozen, 1);
        assert_eq!(row.c, "20.000");
    }
}
