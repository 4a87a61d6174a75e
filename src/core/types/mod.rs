// 核心类型系统模块
//
// 列类型注册表与字段值种类

pub mod basic_type;

pub use basic_type::{BasicType, ValueKind};
