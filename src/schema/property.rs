//! 属性 schema
//!
//! 标签与边共用同一套属性定义，负责渲染列定义与索引表达式。

use super::descriptor::{Nullability, PropertyField};
use crate::core::types::{BasicType, ValueKind};
use crate::core::value::Value;

/// 标签/边上的一个属性
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    pub name: String,
    pub basic_type: BasicType,
    /// 派生时解析出的值种类，决定默认值字面量
    pub kind: ValueKind,
    pub nullable: Nullability,
    pub default: Option<Value>,
    pub comment: Option<String>,
    pub is_ttl_column: bool,
}

impl PropertySchema {
    pub fn new(name: impl Into<String>, basic_type: BasicType) -> Self {
        Self {
            name: name.into(),
            basic_type,
            kind: ValueKind::Other,
            nullable: Nullability::Unspecified,
            default: None,
            comment: None,
            is_ttl_column: false,
        }
    }

    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_nullable(mut self, nullable: Nullability) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_ttl_column(mut self, is_ttl_column: bool) -> Self {
        self.is_ttl_column = is_ttl_column;
        self
    }

    /// 列定义：`name TYPE [NULL|NOT NULL] [DEFAULT v] [COMMENT 'c']`
    pub fn definition(&self) -> String {
        let mut def = format!("{} {}", self.name, self.basic_type);
        match self.nullable {
            Nullability::Null => def.push_str(" NULL"),
            Nullability::NotNull => def.push_str(" NOT NULL"),
            Nullability::Unspecified => {}
        }
        if let Some(default) = &self.default {
            def.push_str(" DEFAULT ");
            def.push_str(&default.to_literal());
        }
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            def.push_str(&format!(" COMMENT '{}'", comment.replace('\'', "\\'")));
        }
        def
    }

    /// 索引表达式：变长字符串需要指定索引长度
    pub fn index_expression(&self) -> String {
        if self.basic_type.is_variable_string() {
            format!("{}({})", self.name, self.basic_type.index_length)
        } else {
            self.name.clone()
        }
    }
}

impl<T> From<&PropertyField<T>> for PropertySchema {
    fn from(field: &PropertyField<T>) -> Self {
        let marker = &field.marker;
        let mut schema = PropertySchema::new(marker.name.clone(), field.resolved_type())
            .with_kind(field.access.kind())
            .with_nullable(marker.nullable)
            .with_ttl_column(marker.ttl_column);
        if let Some(default) = &marker.default {
            schema = schema.with_default(default.clone());
        }
        if let Some(comment) = &marker.comment {
            schema = schema.with_comment(comment.clone());
        }
        schema
    }
}
