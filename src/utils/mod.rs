//! # 工具函数模块
//!
//! 终端输出与进度条。
//!
//! ## 依赖关系
//! - 被 `commands/` 及库模块的警告输出使用
//! - 子模块: output, progress

pub mod output;
pub mod progress;
