//! 实体 schema 模块
//!
//! - 实体描述符与字段访问器 (`descriptor.rs`)
//! - 字段类型转换 (`field_value.rs`)
//! - 属性/索引/实体 schema 与 DDL 渲染 (`property.rs`, `index.rs`, `entity.rs`)
//! - schema 派生 (`builder.rs`)

pub mod builder;
pub mod descriptor;
pub mod entity;
pub mod field_value;
pub mod index;
pub mod property;

pub use builder::{build_edge_schema, build_tag_schema, derive_schema, schema_from_descriptor};
pub use descriptor::{
    EndpointAccess, EndpointCache, Entity, EntityDescriptor, EntityName, Nullability, Property,
    PropertyField, ScalarAccess,
};
pub use entity::EntitySchema;
pub use field_value::FieldValue;
pub use index::{IndexSchema, SchemaKind};
pub use property::PropertySchema;
