//! 实体身份解析
//!
//! 顶点身份是 vid 文本；边身份是 (起点 vid, 终点 vid, 边名, 可选 rank)，
//! 其中起止 vid 需要递归解析端点顶点自己的 vid 字段。

use crate::core::error::{MapperError, MapperResult};
use crate::core::value::quote;
use crate::schema::{Entity, EntityDescriptor};
use std::fmt;

/// 边身份
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Eid {
    pub from: String,
    pub to: String,
    pub edge_name: String,
    pub rank: Option<i64>,
}

impl Eid {
    pub fn new(from: impl Into<String>, to: impl Into<String>, edge_name: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            edge_name: edge_name.into(),
            rank: None,
        }
    }

    pub fn with_rank(mut self, rank: i64) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn has_rank(&self) -> bool {
        self.rank.is_some()
    }
}

/// `"from"->"to"[@rank]`
impl fmt::Display for Eid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", quote(&self.from), quote(&self.to))?;
        if let Some(rank) = self.rank {
            write!(f, "@{}", rank)?;
        }
        Ok(())
    }
}

/// 实体的结构分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityClass {
    Vertex,
    Edge,
}

/// 顶点 vid，未赋值时为空串，调用方不能把空串当作合法 vid
pub fn get_vid<T: Entity>(entity: &T) -> String {
    T::describe().vid_of(entity)
}

/// 边身份
pub fn get_eid<T: Entity>(entity: &T) -> Eid {
    eid_with(&T::describe(), entity)
}

/// 使用已有描述符解析边身份，批量场景避免重复构造描述符
pub fn eid_with<T>(descriptor: &EntityDescriptor<T>, entity: &T) -> Eid {
    Eid {
        from: descriptor.from_vid(entity),
        to: descriptor.to_vid(entity),
        edge_name: descriptor.edge_name().unwrap_or_default().to_string(),
        rank: descriptor.rank_of(entity),
    }
}

/// 顶点要求 {标签名, vid 字段}，缺失项逐一列出
pub fn check_vertex_descriptor<T>(descriptor: &EntityDescriptor<T>) -> MapperResult<()> {
    let mut missing = Vec::new();
    if descriptor.tag_name().is_none() {
        missing.push("no tag name");
    }
    if !descriptor.has_vid() {
        missing.push("no vid field");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MapperError::Classification(missing.join(", ")))
    }
}

/// 边要求 {边名, from 字段, to 字段}，缺失项逐一列出
pub fn check_edge_descriptor<T>(descriptor: &EntityDescriptor<T>) -> MapperResult<()> {
    let mut missing = Vec::new();
    if descriptor.edge_name().is_none() {
        missing.push("no edge name");
    }
    if !descriptor.has_from() {
        missing.push("no edge from field");
    }
    if !descriptor.has_to() {
        missing.push("no edge to field");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MapperError::Classification(missing.join(", ")))
    }
}

pub fn check_vertex<T: Entity>() -> MapperResult<()> {
    check_vertex_descriptor(&T::describe())
}

pub fn check_edge<T: Entity>() -> MapperResult<()> {
    check_edge_descriptor(&T::describe())
}

pub fn is_vertex<T: Entity>() -> bool {
    check_vertex::<T>().is_ok()
}

pub fn is_edge<T: Entity>() -> bool {
    check_edge::<T>().is_ok()
}

/// 判断描述符是顶点还是边，两者都不满足时报告两边的缺失项
pub fn classify<T>(descriptor: &EntityDescriptor<T>) -> MapperResult<EntityClass> {
    let vertex = check_vertex_descriptor(descriptor);
    if vertex.is_ok() {
        return Ok(EntityClass::Vertex);
    }
    let edge = check_edge_descriptor(descriptor);
    if edge.is_ok() {
        return Ok(EntityClass::Edge);
    }
    let reasons: Vec<String> = [vertex, edge]
        .into_iter()
        .filter_map(|r| match r {
            Err(MapperError::Classification(msg)) => Some(msg),
            _ => None,
        })
        .collect();
    Err(MapperError::Classification(format!(
        "neither vertex nor edge: {}",
        reasons.join("; ")
    )))
}

/// 比较与建索引用的身份键：顶点为 vid，边为 eid 文本
pub fn identity_key<T>(descriptor: &EntityDescriptor<T>, entity: &T) -> String {
    if descriptor.tag_name().is_some() {
        descriptor.vid_of(entity)
    } else {
        eid_with(descriptor, entity).to_string()
    }
}
