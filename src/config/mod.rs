//! 配置管理
//!
//! 加载顺序：config.toml → config.{APP_ENV}.toml → ASSIGNCHECK_* 环境变量。

mod r#impl;
mod structs;

pub use structs::*;
