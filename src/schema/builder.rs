//! Schema 派生
//!
//! 从实体描述符派生标签/边 schema。没有实体名标记的类型返回 None，这不是错误，
//! 调用方可以用任意类型探测。

use super::descriptor::{Entity, EntityDescriptor, EntityName};
use super::entity::EntitySchema;
use super::index::{IndexSchema, SchemaKind};
use super::property::PropertySchema;

/// 派生 schema：整体索引在前，其后每个不同的分组一个联合索引，按首次出现顺序
pub fn schema_from_descriptor<T>(descriptor: &EntityDescriptor<T>) -> Option<EntitySchema> {
    let (kind, name) = match descriptor.name()? {
        EntityName::Tag(name) => (SchemaKind::Tag, name.clone()),
        EntityName::Edge(name) => (SchemaKind::Edge, name.clone()),
    };

    let mut schema = EntitySchema::new(kind, name.clone());
    if let Some(comment) = descriptor.entity_comment() {
        schema.comment = Some(comment.to_string());
    }
    schema.ttl_duration = descriptor.ttl_duration();

    // 分组 id -> 成员属性，保持首次出现顺序
    let mut groups: Vec<(String, Vec<PropertySchema>)> = Vec::new();
    for field in descriptor.properties() {
        let property = PropertySchema::from(field);
        for group in &field.marker.index_groups {
            match groups.iter_mut().find(|(id, _)| id == group) {
                Some((_, members)) => members.push(property.clone()),
                None => groups.push((group.clone(), vec![property.clone()])),
            }
        }
        schema.add_property(property);
    }

    schema.indexes.push(IndexSchema::new(kind, name.clone(), Vec::new()));
    for (_, members) in groups {
        let index = IndexSchema::new(kind, name.clone(), members);
        if schema.index(&index.name).is_none() {
            schema.indexes.push(index);
        }
    }

    Some(schema)
}

/// 派生实体类型的 schema，标签或边皆可
pub fn derive_schema<T: Entity>() -> Option<EntitySchema> {
    schema_from_descriptor(&T::describe())
}

/// 只在类型声明了标签名时返回 schema
pub fn build_tag_schema<T: Entity>() -> Option<EntitySchema> {
    derive_schema::<T>().filter(|s| s.kind == SchemaKind::Tag)
}

/// 只在类型声明了边名时返回 schema
pub fn build_edge_schema<T: Entity>() -> Option<EntitySchema> {
    derive_schema::<T>().filter(|s| s.kind == SchemaKind::Edge)
}
