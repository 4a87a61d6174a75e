//! 基础列类型注册表
//!
//! `BasicType` 只用于渲染列类型文本和索引表达式；`ValueKind` 是字段在 Rust 侧的
//! 值种类，派生 schema 时一次性解析为 `BasicType`，渲染语句时决定默认值字面量。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 数据库可识别的列类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BasicType {
    pub name: &'static str,
    pub fixed_length: usize,
    pub index_length: usize,
}

impl BasicType {
    const fn plain(name: &'static str) -> Self {
        BasicType {
            name,
            fixed_length: 0,
            index_length: 0,
        }
    }

    pub const BOOL: BasicType = BasicType::plain("BOOL");
    pub const INT8: BasicType = BasicType::plain("INT8");
    pub const INT16: BasicType = BasicType::plain("INT16");
    pub const INT32: BasicType = BasicType::plain("INT32");
    pub const INT64: BasicType = BasicType::plain("INT64");
    pub const FLOAT: BasicType = BasicType::plain("FLOAT");
    pub const DOUBLE: BasicType = BasicType::plain("DOUBLE");
    pub const DATE: BasicType = BasicType::plain("DATE");
    pub const TIME: BasicType = BasicType::plain("TIME");
    pub const DATETIME: BasicType = BasicType::plain("DATETIME");
    pub const DURATION: BasicType = BasicType::plain("DURATION");
    /// 未声明类型时的默认值，索引长度 100
    pub const STRING: BasicType = BasicType {
        name: "STRING",
        fixed_length: 0,
        index_length: 100,
    };

    /// 定长字符串 `FIXED_STRING(n)`
    pub const fn fixed_string(length: usize) -> Self {
        BasicType {
            name: "FIXED_STRING",
            fixed_length: length,
            index_length: 0,
        }
    }

    /// 自定义索引长度的变长字符串
    pub const fn string_with_index_length(index_length: usize) -> Self {
        BasicType {
            name: "STRING",
            fixed_length: 0,
            index_length,
        }
    }

    /// 根据字段值种类解析列类型，未知种类回退为 STRING
    pub fn for_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Bool => BasicType::BOOL,
            ValueKind::Int8 => BasicType::INT8,
            ValueKind::Int16 => BasicType::INT16,
            ValueKind::Int32 => BasicType::INT32,
            ValueKind::Int64 => BasicType::INT64,
            ValueKind::Float => BasicType::FLOAT,
            ValueKind::Double => BasicType::DOUBLE,
            ValueKind::Date => BasicType::DATE,
            ValueKind::Time => BasicType::TIME,
            ValueKind::DateTime => BasicType::DATETIME,
            ValueKind::Duration => BasicType::DURATION,
            ValueKind::String | ValueKind::Other => BasicType::STRING,
        }
    }

    /// 建索引时是否需要指定前缀长度
    pub fn is_variable_string(&self) -> bool {
        self.name == "STRING"
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == "FIXED_STRING" {
            write!(f, "FIXED_STRING({})", self.fixed_length)
        } else {
            f.write_str(self.name)
        }
    }
}

/// 字段在 Rust 侧的值种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    String,
    Date,
    Time,
    DateTime,
    Duration,
    /// 注册表不认识的种类，列类型按 STRING 处理
    Other,
}
