//! 索引 schema
//!
//! 索引名由实体名与属性名确定性地拼出，同一实体类型重复派生得到同样的名字，
//! 因此可以按名字幂等地查找与删除。

use super::property::PropertySchema;
use std::fmt;

/// schema 所属的实体种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Tag,
    Edge,
}

impl SchemaKind {
    /// 语句关键字
    pub fn keyword(&self) -> &'static str {
        match self {
            SchemaKind::Tag => "TAG",
            SchemaKind::Edge => "EDGE",
        }
    }

    pub fn index_prefix(&self) -> &'static str {
        match self {
            SchemaKind::Tag => "tag_index",
            SchemaKind::Edge => "edge_index",
        }
    }

    /// 实体的默认整体索引名，也是其所有派生索引名的前缀
    pub fn default_index_name(&self, owner: &str) -> String {
        format!("{}_{}", self.index_prefix(), owner)
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// 标签或边上的索引
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSchema {
    pub name: String,
    pub kind: SchemaKind,
    pub owner: String,
    pub properties: Vec<PropertySchema>,
}

impl IndexSchema {
    pub fn new(kind: SchemaKind, owner: impl Into<String>, properties: Vec<PropertySchema>) -> Self {
        let owner = owner.into();
        let mut name = kind.default_index_name(&owner);
        for p in &properties {
            name.push('_');
            name.push_str(&p.name);
        }
        Self {
            name,
            kind,
            owner,
            properties,
        }
    }

    /// 是否为不带属性的整体索引
    pub fn is_default(&self) -> bool {
        self.properties.is_empty()
    }

    /// `CREATE TAG|EDGE INDEX IF NOT EXISTS <name> ON <owner>(<exprs>)`
    pub fn create_statement(&self) -> String {
        let exprs: Vec<String> = self
            .properties
            .iter()
            .map(PropertySchema::index_expression)
            .collect();
        format!(
            "CREATE {} INDEX IF NOT EXISTS {} ON {}({})",
            self.kind,
            self.name,
            self.owner,
            exprs.join(", ")
        )
    }

    pub fn drop_statement(&self) -> String {
        format!("DROP {} INDEX IF EXISTS {}", self.kind, self.name)
    }

    pub fn rebuild_statement(&self) -> String {
        format!("REBUILD {} INDEX {}", self.kind, self.name)
    }
}
