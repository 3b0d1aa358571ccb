//! 应用配置
//!
//! 配置来源（后者覆盖前者）：内置默认值、`config.toml`、`config.{APP_ENV}.toml`、
//! `MUSIC_SCHOOL_*` 环境变量，以及少量常用的独立环境变量。

mod r#impl;
mod structs;

pub use structs::*;
