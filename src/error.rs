//! # 统一错误处理模块
//!
//! 定义 autovasp 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - 用户输入错误：文件读写、解析、未知作业类型、非法参数
//! - 领域约束错误：无法生成 slab、未知体系、赝势缺失
//! - 外部服务错误：数据库查询、外部命令
//! - 阶段错误：输出目录尚未加载重型文件
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// autovasp 统一错误类型
#[derive(Error, Debug)]
pub enum AutoVaspError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid JSON in {path}: {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 作业模板错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown job type '{0}' (run `autovasp templates list` for the available presets)")]
    UnknownJobType(String),

    #[error("Invalid INCAR tag: {0}")]
    InvalidTag(String),

    // ─────────────────────────────────────────────────────────────
    // 领域约束错误
    // ─────────────────────────────────────────────────────────────
    #[error(
        "No slabs generated for miller index {miller:?} (min_slab_size = {min_slab_size}, \
         min_vacuum_size = {min_vacuum_size}, symmetric only = {require_symmetric}); \
         consider changing the slab parameters or allowing asymmetric slabs"
    )]
    NoSlabsGenerated {
        miller: [i32; 3],
        min_slab_size: f64,
        min_vacuum_size: f64,
        require_symmetric: bool,
    },

    #[error("Symmetry analysis failed: {0}")]
    SymmetryError(String),

    #[error("Pseudopotential '{symbol}' not found at {path}")]
    PseudopotentialNotFound { symbol: String, path: String },

    #[error("System not found for directory '{0}'")]
    UnknownSystem(String),

    // ─────────────────────────────────────────────────────────────
    // 外部服务错误
    // ─────────────────────────────────────────────────────────────
    #[error("Materials database request failed: {0}")]
    DatabaseError(String),

    #[error("Material '{0}' not found in the database")]
    MaterialNotFound(String),

    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    // ─────────────────────────────────────────────────────────────
    // 输出读取阶段错误
    // ─────────────────────────────────────────────────────────────
    #[error("Output files in {directory} are not loaded yet; call load_heavy_artifacts first")]
    HeavyArtifactsNotLoaded { directory: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },

    #[error("{0}")]
    Other(String),
}

impl AutoVaspError {
    /// 构造读文件错误
    pub fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        AutoVaspError::FileReadError {
            path: path.display().to_string(),
            source,
        }
    }

    /// 构造写文件错误
    pub fn write(path: &std::path::Path, source: std::io::Error) -> Self {
        AutoVaspError::FileWriteError {
            path: path.display().to_string(),
            source,
        }
    }

    /// 构造解析错误
    pub fn parse(format: &str, path: impl Into<String>, reason: impl Into<String>) -> Self {
        AutoVaspError::ParseError {
            format: format.to_string(),
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, AutoVaspError>;
