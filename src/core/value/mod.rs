//! Value 模块 - 结果集与语句中使用的值类型
//!
//! - 核心类型定义 (`types.rs`)
//! - 日期时间类型 (`date_time.rs`)
//! - 数据集类型 (`dataset.rs`)
//! - 字面量渲染与字符串转义 (`literal.rs`)

pub mod dataset;
pub mod date_time;
pub mod literal;
pub mod types;

pub use dataset::*;
pub use date_time::*;
pub use literal::{escape_string, quote, unescape_string};
pub use types::*;
