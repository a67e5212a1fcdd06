//! # extend / freeze / box 命令实现
//!
//! 单个结构的小变换，结果写成 POSCAR：
//! - `extend`: 超胞，默认输出 `<input>_extended`
//! - `freeze`: 冻结底层原子，默认输出 `<input>_frozen`
//! - `box`: XYZ 分子装箱，输出 `<formula>.poscar`
//!
//! ## 依赖关系
//! - 使用 `cli/structure.rs` 定义的参数
//! - 使用 `acquire/`, `transform/`, `parsers/poscar.rs`, `utils/`

use crate::acquire;
use crate::cli::structure::{BoxArgs, ExtendArgs, FreezeArgs};
use crate::error::{AutoVaspError, Result};
use crate::parsers::poscar::write_poscar_file;
use crate::transform;
use crate::utils::{output, progress};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// 在文件名后追加后缀：`POSCAR` -> `POSCAR_frozen`
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// 执行 extend 命令
pub fn execute_extend(args: ExtendArgs) -> Result<()> {
    let crystal = acquire::load_from_file(&args.input)?;
    let [nx, ny, nz] = args.scale;
    let extended = transform::extend_supercell(&crystal, nx, ny, nz)?;

    let path = args
        .output
        .unwrap_or_else(|| with_suffix(&args.input, "_extended"));
    write_poscar_file(&extended, &path)?;

    output::print_written(
        &format!(
            "{} {}x{}x{} ({} -> {} sites)",
            crystal.reduced_formula(),
            nx,
            ny,
            nz,
            crystal.num_sites(),
            extended.num_sites()
        ),
        &path,
    );
    Ok(())
}

/// 执行 freeze 命令
pub fn execute_freeze(args: FreezeArgs) -> Result<()> {
    let crystal = acquire::load_from_file(&args.input)?;
    let frozen = transform::freeze(&crystal, args.min_z);

    let path = args
        .output
        .unwrap_or_else(|| with_suffix(&args.input, "_frozen"));
    write_poscar_file(&frozen, &path)?;

    output::print_written(
        &format!(
            "{}: {}/{} atoms frozen below z = {} Å",
            crystal.reduced_formula(),
            transform::count_frozen(&frozen),
            frozen.num_sites(),
            args.min_z
        ),
        &path,
    );
    Ok(())
}

/// 执行 box 命令
pub fn execute_box(args: BoxArgs) -> Result<()> {
    output::print_header("Boxing Molecules");

    fs::create_dir_all(&args.output).map_err(|e| AutoVaspError::write(&args.output, e))?;

    let pb = progress::create_progress_bar(args.inputs.len() as u64, "Boxing");
    let mut written = 0;

    for input in &args.inputs {
        let result = acquire::molecule_from_file(input)
            .and_then(|m| transform::box_molecule(&m, args.size))
            .and_then(|boxed| {
                let path = args.output.join(format!("{}.poscar", boxed.name));
                write_poscar_file(&boxed, &path).map(|_| path)
            });

        match result {
            Ok(path) => {
                pb.suspend(|| output::print_written(&input.display().to_string(), &path));
                written += 1;
            }
            Err(e) => {
                pb.suspend(|| output::print_error(&format!("{}: {}", input.display(), e)));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    output::print_done(&format!(
        "Boxed {} of {} molecule(s) in {} x {} x {} Å",
        written,
        args.inputs.len(),
        args.size[0],
        args.size[1],
        args.size[2]
    ));
    Ok(())
}
