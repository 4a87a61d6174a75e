//! 实体描述符
//!
//! 每个实体类型通过 `Entity::describe` 显式声明自己的图元数据：
//! 标签名或边名、vid 字段、属性字段、rank 字段以及边的起止端点。
//! 字段通过普通 `fn` 访问器读写，不依赖运行时反射。
//!
//! ```
//! use graphdb_mapper::schema::{Entity, EntityDescriptor, Property};
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Player {
//!     vid: String,
//!     name: String,
//!     age: i64,
//! }
//!
//! impl Entity for Player {
//!     fn describe() -> EntityDescriptor<Self> {
//!         EntityDescriptor::<Self>::new()
//!             .tag("player")
//!             .vid(|p| &p.vid, |p| &mut p.vid)
//!             .property(Property::new("name").indexes("1"), |p| &p.name, |p| &mut p.name)
//!             .property(Property::new("age"), |p| &p.age, |p| &mut p.age)
//!     }
//! }
//! ```

use super::field_value::{field_literal, FieldValue};
use crate::core::error::MapperResult;
use crate::core::types::{BasicType, ValueKind};
use crate::core::value::{DataSet, Value};
use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// 可以映射为顶点或边的实体类型
pub trait Entity: Default + Send + Sync + 'static {
    fn describe() -> EntityDescriptor<Self>;
}

/// 实体名标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityName {
    Tag(String),
    Edge(String),
}

impl EntityName {
    pub fn as_str(&self) -> &str {
        match self {
            EntityName::Tag(name) | EntityName::Edge(name) => name,
        }
    }
}

/// 属性可空性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nullability {
    #[default]
    Unspecified,
    Null,
    NotNull,
}

/// 字段上的属性标记
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub basic_type: Option<BasicType>,
    pub comment: Option<String>,
    /// 所属的联合索引分组标识，按声明顺序
    pub index_groups: Vec<String>,
    pub nullable: Nullability,
    pub default: Option<Value>,
    pub ttl_column: bool,
}

impl Property {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            basic_type: None,
            comment: None,
            index_groups: Vec::new(),
            nullable: Nullability::Unspecified,
            default: None,
            ttl_column: false,
        }
    }

    /// 显式指定列类型，优先于字段种类推导
    pub fn basic_type(mut self, basic_type: BasicType) -> Self {
        self.basic_type = Some(basic_type);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// 以逗号分隔的索引分组，例如 `"1,2"`；空白分组被忽略
    pub fn indexes(mut self, groups: &str) -> Self {
        self.index_groups = groups
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = Nullability::Null;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = Nullability::NotNull;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// 标记为 TTL 列
    pub fn ttl_column(mut self) -> Self {
        self.ttl_column = true;
        self
    }
}

/// 类型擦除后的标量字段访问
pub trait ScalarAccess<T>: Send + Sync {
    fn kind(&self) -> ValueKind;
    fn read(&self, entity: &T) -> Value;
    /// 值与字段类型不兼容时忽略，返回是否写入
    fn write(&self, entity: &mut T, value: &Value) -> bool;
    fn is_default(&self, entity: &T) -> bool;
    fn equals(&self, left: &T, right: &T) -> bool;
    /// 语句中的字面量，无法表示的值返回 `InvalidParameter`
    fn literal(&self, entity: &T) -> MapperResult<String>;
}

/// 字段读写访问器
pub struct Lens<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T, F> Lens<T, F> {
    pub fn new(get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self {
        Self { get, get_mut }
    }

    pub fn get<'a>(&self, entity: &'a T) -> &'a F {
        (self.get)(entity)
    }

    pub fn get_mut<'a>(&self, entity: &'a mut T) -> &'a mut F {
        (self.get_mut)(entity)
    }
}

impl<T, F> ScalarAccess<T> for Lens<T, F>
where
    T: Send + Sync,
    F: FieldValue,
{
    fn kind(&self) -> ValueKind {
        F::KIND
    }

    fn read(&self, entity: &T) -> Value {
        self.get(entity).to_value()
    }

    fn write(&self, entity: &mut T, value: &Value) -> bool {
        match F::from_value(value) {
            Some(v) => {
                *self.get_mut(entity) = v;
                true
            }
            None => false,
        }
    }

    fn is_default(&self, entity: &T) -> bool {
        self.get(entity).is_default()
    }

    fn equals(&self, left: &T, right: &T) -> bool {
        self.get(left) == self.get(right)
    }

    fn literal(&self, entity: &T) -> MapperResult<String> {
        field_literal(self.get(entity))
    }
}

/// 属性字段：标记 + 访问器
pub struct PropertyField<T> {
    pub marker: Property,
    pub access: Box<dyn ScalarAccess<T>>,
}

impl<T> PropertyField<T> {
    pub fn name(&self) -> &str {
        &self.marker.name
    }

    /// 显式类型优先，否则由字段种类解析
    pub fn resolved_type(&self) -> BasicType {
        self.marker
            .basic_type
            .unwrap_or_else(|| BasicType::for_kind(self.access.kind()))
    }
}

/// 边端点的同一次解码内缓存
///
/// 以端点 vid 为键，同一个 vid 只保留一个顶点实例，多条边共享它。
#[derive(Default)]
pub struct EndpointCache {
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl EndpointCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<V: Any + Send + Sync>(&mut self, vid: impl Into<String>, vertex: Arc<V>) {
        self.entries.insert(vid.into(), vertex);
    }

    /// 取出缓存的顶点，类型不符时视为未命中
    pub fn get<V: Any + Send + Sync>(&self, vid: &str) -> Option<Arc<V>> {
        self.entries
            .get(vid)
            .and_then(|entry| Arc::clone(entry).downcast::<V>().ok())
    }

    pub fn contains(&self, vid: &str) -> bool {
        self.entries.contains_key(vid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for EndpointCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointCache")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// 边端点字段的类型擦除访问
pub trait EndpointAccess<T>: Send + Sync {
    /// 递归解析端点顶点自己的 vid
    fn vid(&self, entity: &T) -> String;

    /// 按 vid 赋值端点：缓存命中则共享实例，否则构造只有 vid 的顶点并写入缓存
    fn assign(&self, entity: &mut T, vid: &str, cache: &mut EndpointCache);

    /// 端点顶点的标签名
    fn vertex_tag(&self) -> Option<&str>;

    /// 端点顶点声明的属性名，按声明顺序
    fn vertex_property_names(&self) -> Vec<&str>;

    /// 用预取到的顶点结果集填充缓存，返回新增条目数
    fn seed(&self, data: &DataSet, cache: &mut EndpointCache) -> usize;
}

/// 端点字段访问器，字段类型为 `Arc<V>`
pub struct EndpointLens<T, V: Entity> {
    lens: Lens<T, Arc<V>>,
    vertex: EntityDescriptor<V>,
    _marker: PhantomData<fn() -> V>,
}

impl<T, V: Entity> EndpointLens<T, V> {
    pub fn new(get: fn(&T) -> &Arc<V>, get_mut: fn(&mut T) -> &mut Arc<V>) -> Self {
        Self {
            lens: Lens::new(get, get_mut),
            vertex: V::describe(),
            _marker: PhantomData,
        }
    }
}

impl<T, V> EndpointAccess<T> for EndpointLens<T, V>
where
    T: Send + Sync,
    V: Entity,
{
    fn vid(&self, entity: &T) -> String {
        self.vertex.vid_of(self.lens.get(entity).as_ref())
    }

    fn assign(&self, entity: &mut T, vid: &str, cache: &mut EndpointCache) {
        let vertex = match cache.get::<V>(vid) {
            Some(cached) => cached,
            None => {
                let mut fresh = V::default();
                self.vertex.set_vid(&mut fresh, vid);
                let fresh = Arc::new(fresh);
                cache.insert(vid, Arc::clone(&fresh));
                fresh
            }
        };
        *self.lens.get_mut(entity) = vertex;
    }

    fn vertex_tag(&self) -> Option<&str> {
        self.vertex.tag_name()
    }

    fn vertex_property_names(&self) -> Vec<&str> {
        self.vertex.property_names()
    }

    fn seed(&self, data: &DataSet, cache: &mut EndpointCache) -> usize {
        let mut added = 0;
        for row in data.iter_rows() {
            let vertex = crate::query::decode::decode_vertex_row(&self.vertex, &row);
            let vid = self.vertex.vid_of(&vertex);
            if vid.is_empty() || cache.contains(&vid) {
                continue;
            }
            cache.insert(vid, Arc::new(vertex));
            added += 1;
        }
        added
    }
}

/// vid 字段访问器
pub type VidLens<T> = Lens<T, String>;

/// rank 字段访问器
pub type RankLens<T> = Lens<T, i64>;

/// 实体类型的完整描述
pub struct EntityDescriptor<T> {
    name: Option<EntityName>,
    comment: Option<String>,
    ttl_duration: Option<i64>,
    vid: Option<VidLens<T>>,
    rank: Option<RankLens<T>>,
    from: Option<Box<dyn EndpointAccess<T>>>,
    to: Option<Box<dyn EndpointAccess<T>>>,
    properties: Vec<PropertyField<T>>,
}

impl<T> Default for EntityDescriptor<T> {
    fn default() -> Self {
        Self {
            name: None,
            comment: None,
            ttl_duration: None,
            vid: None,
            rank: None,
            from: None,
            to: None,
            properties: Vec::new(),
        }
    }
}

impl<T: Send + Sync + 'static> EntityDescriptor<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.name = Some(EntityName::Tag(name.into()));
        self
    }

    pub fn edge(mut self, name: impl Into<String>) -> Self {
        self.name = Some(EntityName::Edge(name.into()));
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// TTL 时长（秒）；TTL 列通过 `Property::ttl_column` 标记
    pub fn ttl(mut self, seconds: i64) -> Self {
        self.ttl_duration = Some(seconds);
        self
    }

    pub fn vid(mut self, get: fn(&T) -> &String, get_mut: fn(&mut T) -> &mut String) -> Self {
        self.vid = Some(Lens::new(get, get_mut));
        self
    }

    pub fn rank(mut self, get: fn(&T) -> &i64, get_mut: fn(&mut T) -> &mut i64) -> Self {
        self.rank = Some(Lens::new(get, get_mut));
        self
    }

    pub fn property<F: FieldValue>(
        mut self,
        marker: Property,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.properties.push(PropertyField {
            marker,
            access: Box::new(Lens::new(get, get_mut)),
        });
        self
    }

    pub fn edge_from<V: Entity>(
        mut self,
        get: fn(&T) -> &Arc<V>,
        get_mut: fn(&mut T) -> &mut Arc<V>,
    ) -> Self {
        self.from = Some(Box::new(EndpointLens::new(get, get_mut)));
        self
    }

    pub fn edge_to<V: Entity>(
        mut self,
        get: fn(&T) -> &Arc<V>,
        get_mut: fn(&mut T) -> &mut Arc<V>,
    ) -> Self {
        self.to = Some(Box::new(EndpointLens::new(get, get_mut)));
        self
    }
}

impl<T> EntityDescriptor<T> {
    pub fn name(&self) -> Option<&EntityName> {
        self.name.as_ref()
    }

    pub fn tag_name(&self) -> Option<&str> {
        match &self.name {
            Some(EntityName::Tag(name)) => Some(name),
            _ => None,
        }
    }

    pub fn edge_name(&self) -> Option<&str> {
        match &self.name {
            Some(EntityName::Edge(name)) => Some(name),
            _ => None,
        }
    }

    pub fn entity_comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn ttl_duration(&self) -> Option<i64> {
        self.ttl_duration
    }

    pub fn properties(&self) -> &[PropertyField<T>] {
        &self.properties
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name()).collect()
    }

    pub fn property_field(&self, name: &str) -> Option<&PropertyField<T>> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn has_vid(&self) -> bool {
        self.vid.is_some()
    }

    pub fn has_rank(&self) -> bool {
        self.rank.is_some()
    }

    pub fn has_from(&self) -> bool {
        self.from.is_some()
    }

    pub fn has_to(&self) -> bool {
        self.to.is_some()
    }

    pub fn from_endpoint(&self) -> Option<&dyn EndpointAccess<T>> {
        self.from.as_deref()
    }

    pub fn to_endpoint(&self) -> Option<&dyn EndpointAccess<T>> {
        self.to.as_deref()
    }

    /// vid 字段的文本值，没有 vid 字段或未赋值时为空串
    pub fn vid_of(&self, entity: &T) -> String {
        self.vid
            .as_ref()
            .map(|lens| lens.get(entity).clone())
            .unwrap_or_default()
    }

    pub fn set_vid(&self, entity: &mut T, vid: &str) {
        if let Some(lens) = &self.vid {
            *lens.get_mut(entity) = vid.to_string();
        }
    }

    pub fn rank_of(&self, entity: &T) -> Option<i64> {
        self.rank.as_ref().map(|lens| *lens.get(entity))
    }

    pub fn set_rank(&self, entity: &mut T, rank: i64) {
        if let Some(lens) = &self.rank {
            *lens.get_mut(entity) = rank;
        }
    }

    pub fn from_vid(&self, entity: &T) -> String {
        self.from
            .as_ref()
            .map(|access| access.vid(entity))
            .unwrap_or_default()
    }

    pub fn to_vid(&self, entity: &T) -> String {
        self.to
            .as_ref()
            .map(|access| access.vid(entity))
            .unwrap_or_default()
    }

    /// 各属性的插入字面量，按声明顺序
    pub fn insert_values(&self, entity: &T) -> MapperResult<Vec<String>> {
        self.properties
            .iter()
            .map(|p| p.access.literal(entity))
            .collect()
    }
}
