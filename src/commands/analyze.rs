//! # analyze 命令实现
//!
//! - `adsorption`: 读取三张能量表，计算吸附能，写 CSV、打印表格并可选绘图
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的参数
//! - 使用 `analysis.rs`, `tabulate.rs`, `utils/`

use crate::analysis;
use crate::cli::analyze::{AdsorptionArgs, AnalyzeArgs, AnalyzeCommands};
use crate::error::Result;
use crate::tabulate;
use crate::utils::output;

/// 执行 analyze 命令
pub fn execute(args: AnalyzeArgs) -> Result<()> {
    match args.command {
        AnalyzeCommands::Adsorption(args) => adsorption(args),
    }
}

fn adsorption(args: AdsorptionArgs) -> Result<()> {
    output::print_header("Adsorption Energy Analysis");

    let slabs = analysis::read_slab_energies(&args.slabs)?;
    let adsorbates = analysis::read_adsorbate_energies(&args.adsorbates)?;
    let adsorbed = analysis::read_adsorbed_rows(&args.adsorbed)?;
    output::print_info(&format!(
        "{} slab(s), {} adsorbate(s), {} adsorbed structure(s)",
        slabs.len(),
        adsorbates.len(),
        adsorbed.len()
    ));

    let records = analysis::compute_adsorption_energies(&slabs, &adsorbates, &adsorbed)?;
    output::print_table(&records);

    tabulate::write_csv(&args.output, &records)?;
    output::print_written("adsorption energies", &args.output);

    if !args.no_plot && !records.is_empty() {
        analysis::plot_adsorption_energies(&records, &args.output_plot)?;
        output::print_written("plot", &args.output_plot);
    }

    output::print_done(&format!("Computed {} adsorption energies", records.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_adsorption_command_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let p = |name: &str| dir.path().join(name);
        fs::write(p("slabs.csv"), "System,Energy\nBi2Te3,-90.0\n").unwrap();
        fs::write(p("adsorbates.csv"), "Adsorbate,Energy\nO,-4.5\n").unwrap();
        fs::write(p("adsorbed.csv"), "Directory,Adsorbate,Energy\nBi2Te3_O_0,O,-96.0\n").unwrap();

        adsorption(AdsorptionArgs {
            slabs: p("slabs.csv"),
            adsorbates: p("adsorbates.csv"),
            adsorbed: p("adsorbed.csv"),
            output: p("out.csv"),
            output_plot: p("out.png"),
            no_plot: true,
        })
        .unwrap();

        let text = fs::read_to_string(p("out.csv")).unwrap();
        assert!(text.starts_with("Directory,System,Adsorbate,Adsorption Energy"));
        assert!(text.contains("Bi2Te3_O_0,Bi2Te3,O,1.5\n"));
        assert!(!p("out.png").exists());
    }
}
