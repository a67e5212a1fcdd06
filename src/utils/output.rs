//! # 终端输出
//!
//! 统一的状态前缀 (`[OK]`, `[ERR]`, `[WARN]`, `[*]`, `[SKIP]`, `[DONE]`)、
//! 标题栏与表格打印。库代码的警告（例如非法 INCAR tag）也经由这里输出。
//!
//! ## 依赖关系
//! - 被 `commands/`, `templates/`, `transform/` 使用
//! - 使用 `colored`, `tabled`

use colored::Colorize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 警告走 stderr，不打断 stdout 上的表格与 INCAR 文本
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "[WARN]".yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印写出的文件或目录：`[OK] <what> -> <path>`
pub fn print_written(what: &str, path: &Path) {
    println!(
        "{} {} {} {}",
        "[OK]".green().bold(),
        what,
        "->".cyan(),
        path.display().to_string().dimmed()
    );
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

/// 以圆角表格打印记录
pub fn print_table<T: Tabled>(rows: &[T]) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}
