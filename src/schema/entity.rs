//! 标签/边 schema 与 DDL 渲染

use super::index::{IndexSchema, SchemaKind};
use super::property::PropertySchema;
use crate::core::error::{MapperError, MapperResult};
use crate::core::value::quote;

/// 标签或边的 schema
///
/// 属性按声明顺序保存，名字在同一 schema 内唯一；
/// 索引引用的每个属性都必须存在于 `properties` 中。
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    pub kind: SchemaKind,
    pub name: String,
    pub properties: Vec<PropertySchema>,
    pub indexes: Vec<IndexSchema>,
    /// TTL 时长（秒）
    pub ttl_duration: Option<i64>,
    pub comment: Option<String>,
}

impl EntitySchema {
    pub fn new(kind: SchemaKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            properties: Vec::new(),
            indexes: Vec::new(),
            ttl_duration: None,
            comment: None,
        }
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Tag, name)
    }

    pub fn edge(name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Edge, name)
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_ttl_duration(mut self, seconds: i64) -> Self {
        self.ttl_duration = Some(seconds);
        self
    }

    /// 添加属性，同名属性被替换
    pub fn add_property(&mut self, property: PropertySchema) {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }

    /// 按属性名添加索引；空列表表示整体索引。同名索引被替换
    pub fn add_index(&mut self, property_names: &[&str]) -> MapperResult<&IndexSchema> {
        let mut properties = Vec::with_capacity(property_names.len());
        for name in property_names {
            let property = self.property(name).ok_or_else(|| {
                MapperError::InvalidParameter(format!(
                    "索引引用了不存在的属性 {}.{}",
                    self.name, name
                ))
            })?;
            properties.push(property.clone());
        }
        let index = IndexSchema::new(self.kind, self.name.clone(), properties);
        let position = match self.indexes.iter().position(|i| i.name == index.name) {
            Some(pos) => {
                self.indexes[pos] = index;
                pos
            }
            None => {
                self.indexes.push(index);
                self.indexes.len() - 1
            }
        };
        Ok(&self.indexes[position])
    }

    pub fn index(&self, name: &str) -> Option<&IndexSchema> {
        self.indexes.iter().find(|i| i.name == name)
    }

    pub fn index_names(&self) -> Vec<&str> {
        self.indexes.iter().map(|i| i.name.as_str()).collect()
    }

    /// 默认整体索引名
    pub fn default_index_name(&self) -> String {
        self.kind.default_index_name(&self.name)
    }

    pub fn ttl_column(&self) -> Option<&PropertySchema> {
        self.properties.iter().find(|p| p.is_ttl_column)
    }

    /// `CREATE TAG|EDGE IF NOT EXISTS <name>(<defs>) [TTL_DURATION = n][, TTL_COL = "c"][, COMMENT = "c"]`
    pub fn create_statement(&self) -> String {
        let defs: Vec<String> = self.properties.iter().map(|p| p.definition()).collect();
        let mut statement = format!(
            "CREATE {} IF NOT EXISTS {}({})",
            self.kind,
            self.name,
            defs.join(", ")
        );

        let mut options = Vec::new();
        if let Some(ttl) = self.ttl_duration.filter(|ttl| *ttl > 0) {
            options.push(format!("TTL_DURATION = {}", ttl));
        }
        if let Some(column) = self.ttl_column() {
            options.push(format!("TTL_COL = {}", quote(&column.name)));
        }
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            options.push(format!("COMMENT = {}", quote(comment)));
        }
        if !options.is_empty() {
            statement.push(' ');
            statement.push_str(&options.join(", "));
        }
        statement
    }

    pub fn drop_statement(&self) -> String {
        format!("DROP {} IF EXISTS {}", self.kind, self.name)
    }

    pub fn describe_statement(&self) -> String {
        format!("DESCRIBE {} {}", self.kind, self.name)
    }

    pub fn create_index_statements(&self) -> Vec<String> {
        self.indexes.iter().map(IndexSchema::create_statement).collect()
    }

    /// `ALTER TAG|EDGE <name> ADD (<defs>)`
    pub fn add_properties_statement(&self, properties: &[PropertySchema]) -> String {
        let defs: Vec<String> = properties.iter().map(|p| p.definition()).collect();
        format!("ALTER {} {} ADD ({})", self.kind, self.name, defs.join(", "))
    }

    /// `ALTER TAG|EDGE <name> CHANGE (<defs>)`
    pub fn change_properties_statement(&self, properties: &[PropertySchema]) -> String {
        let defs: Vec<String> = properties.iter().map(|p| p.definition()).collect();
        format!("ALTER {} {} CHANGE ({})", self.kind, self.name, defs.join(", "))
    }

    /// `ALTER TAG|EDGE <name> DROP (<names>)`
    pub fn drop_properties_statement(&self, names: &[&str]) -> String {
        format!("ALTER {} {} DROP ({})", self.kind, self.name, names.join(", "))
    }
}
