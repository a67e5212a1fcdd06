//! # autovasp - VASP 输入组生成与结果整理
//!
//! 由结构文件或 Materials Project ID 生成 VASP 输入组（POSCAR、INCAR、
//! POTCAR、KPOINTS、KPATH），切 slab、放置吸附物，并汇总计算结果。
//!
//! ## 子命令
//! - `generate` - 写出输入组
//! - `slab` / `adsorb` / `extend` / `freeze` / `box` - 结构变换
//! - `tabulate` - 结构表格汇总
//! - `templates` - 作业模板查看与校验
//! - `output` - 计算结果汇总与后续目录
//! - `analyze` - 吸附能分析
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── acquire/    (结构获取：文件 / Materials Project)
//!   │     ├── transform/  (超胞、冻结、slab、吸附、装箱)
//!   │     ├── deck/       (输入组组装与写出)
//!   │     ├── output/     (计算结果读取)
//!   │     ├── analysis.rs (吸附能)
//!   │     └── tabulate.rs (表格记录)
//!   ├── templates/  (作业参数模板)
//!   ├── symmetry/   (空间群与高对称路径)
//!   ├── parsers/    (VASP 文件解析)
//!   ├── models/     (数据模型)
//!   ├── utils/      (终端输出)
//!   └── error.rs    (错误处理)
//! ```

mod acquire;
mod analysis;
mod cli;
mod commands;
mod deck;
mod error;
mod models;
mod output;
mod parsers;
mod symmetry;
mod tabulate;
mod templates;
mod transform;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
