//! # adsorb 命令实现
//!
//! 读取 slab 与吸附物（XYZ 分子或单原子），在每个吸附位点放置吸附物，
//! 逐个写出 POSCAR 或完整输入组。
//!
//! ## 依赖关系
//! - 使用 `cli/structure.rs` 定义的参数
//! - 使用 `acquire/`, `transform/adsorption.rs`, `utils/`

use crate::acquire;
use crate::cli::structure::AdsorbArgs;
use crate::error::{AutoVaspError, Result};
use crate::models::Molecule;
use crate::transform::{self, adsorption::ADSORPTION_HEIGHT, SiteKind};
use crate::utils::output;

/// 执行 adsorb 命令
pub fn execute(args: AdsorbArgs) -> Result<()> {
    output::print_header("Generating Adsorbed Structures");

    let slab = acquire::load_from_file(&args.slab)?;

    let mut molecules: Vec<Molecule> = Vec::new();
    for path in &args.molecules {
        molecules.push(acquire::molecule_from_file(path)?);
    }
    for element in &args.atoms {
        molecules.push(Molecule::single_atom(element));
    }
    if molecules.is_empty() {
        return Err(AutoVaspError::InvalidArgument(
            "No adsorbates given (use --molecule or --atom)".to_string(),
        ));
    }

    let sites = transform::find_adsorption_sites(&slab, ADSORPTION_HEIGHT, true);
    let count = |kind: SiteKind| sites.iter().filter(|s| s.kind == kind).count();
    output::print_info(&format!(
        "{}: {} site(s) ({} ontop, {} bridge, {} hollow)",
        slab.reduced_formula(),
        sites.len(),
        count(SiteKind::Ontop),
        count(SiteKind::Bridge),
        count(SiteKind::Hollow)
    ));

    let slab_stem = super::file_stem_for(&slab.reduced_formula());
    let mut total = 0;

    for molecule in &molecules {
        let structures =
            transform::generate_adsorbed_structures(&slab, molecule, args.min_z, args.coverage)?;
        if structures.is_empty() {
            output::print_skip(&format!("{}: no adsorption sites found", molecule.formula()));
            continue;
        }

        let stem = format!("{}_{}", slab_stem, super::file_stem_for(&molecule.formula()));
        super::write_structures(
            &structures,
            &stem,
            &args.output,
            args.job_type.as_deref(),
            &args.psp,
            &args.templates,
            args.readme,
        )?;
        output::print_success(&format!(
            "{}: {} structure(s)",
            molecule.formula(),
            structures.len()
        ));
        total += structures.len();
    }

    output::print_done(&format!(
        "Wrote {} adsorbed structure(s) to '{}'",
        total,
        args.output.display()
    ));

    Ok(())
}
