//! 顶点语句

use super::{pipeline, select_update_fields, set_and_yield, UpdateFields};
use crate::core::error::{MapperError, MapperResult};
use crate::core::value::quote;
use crate::schema::EntityDescriptor;

pub const PIPELINE_DELETE_VERTEX: &str = "DELETE VERTEX $-.vid";
pub const PIPELINE_DELETE_VERTEX_WITH_EDGE: &str = "DELETE VERTEX $-.vid WITH EDGE";

pub(crate) fn require_tag<T>(descriptor: &EntityDescriptor<T>) -> MapperResult<&str> {
    descriptor
        .tag_name()
        .ok_or_else(|| MapperError::Classification("no tag name".to_string()))
}

/// `INSERT VERTEX IF NOT EXISTS <tag>(<props>) VALUES "<vid>":(<values>), ...`
///
/// 同一类型的多个顶点共享一个属性名头部，渲染为一条语句
pub fn insert_statement<T>(descriptor: &EntityDescriptor<T>, vertices: &[T]) -> MapperResult<String> {
    let tag = require_tag(descriptor)?;
    if vertices.is_empty() {
        return Err(MapperError::InvalidParameter("没有需要插入的顶点".to_string()));
    }
    let values = vertices
        .iter()
        .map(|v| -> MapperResult<String> {
            Ok(format!(
                "{}:({})",
                quote(&descriptor.vid_of(v)),
                descriptor.insert_values(v)?.join(", ")
            ))
        })
        .collect::<MapperResult<Vec<String>>>()?;
    Ok(format!(
        "INSERT VERTEX IF NOT EXISTS {}({}) VALUES {}",
        tag,
        descriptor.property_names().join(", "),
        values.join(", ")
    ))
}

fn modify_statement<T>(
    verb: &str,
    descriptor: &EntityDescriptor<T>,
    vertex: &T,
    fields: &UpdateFields,
) -> MapperResult<String> {
    let tag = require_tag(descriptor)?;
    let selected = select_update_fields(descriptor, vertex, fields)?;
    let (sets, yields) = set_and_yield(&selected, vertex)?;
    Ok(format!(
        "{} VERTEX ON {} {} SET {} YIELD {}",
        verb,
        tag,
        quote(&descriptor.vid_of(vertex)),
        sets,
        yields
    ))
}

/// `UPDATE VERTEX ON <tag> "<vid>" SET ... YIELD ...`
pub fn update_statement<T>(
    descriptor: &EntityDescriptor<T>,
    vertex: &T,
    fields: &UpdateFields,
) -> MapperResult<String> {
    modify_statement("UPDATE", descriptor, vertex, fields)
}

/// `UPSERT VERTEX ON <tag> "<vid>" SET ... YIELD ...`
pub fn upsert_statement<T>(
    descriptor: &EntityDescriptor<T>,
    vertex: &T,
    fields: &UpdateFields,
) -> MapperResult<String> {
    modify_statement("UPSERT", descriptor, vertex, fields)
}

/// `DELETE VERTEX "a", "b" [WITH EDGE]`
pub fn delete_by_vids_statement<S: AsRef<str>>(vids: &[S], with_edge: bool) -> MapperResult<String> {
    if vids.is_empty() {
        return Err(MapperError::InvalidParameter("没有需要删除的顶点".to_string()));
    }
    let quoted: Vec<String> = vids.iter().map(|v| quote(v.as_ref())).collect();
    let mut statement = format!("DELETE VERTEX {}", quoted.join(", "));
    if with_edge {
        statement.push_str(" WITH EDGE");
    }
    Ok(statement)
}

pub fn delete_statement<T>(
    descriptor: &EntityDescriptor<T>,
    vertices: &[T],
    with_edge: bool,
) -> MapperResult<String> {
    let vids: Vec<String> = vertices.iter().map(|v| descriptor.vid_of(v)).collect();
    delete_by_vids_statement(&vids, with_edge)
}

/// `<query> | DELETE VERTEX $-.vid [WITH EDGE]`，查询须产出 vid 列
pub fn delete_by_query_statement(query: &str, with_edge: bool) -> String {
    let tail = if with_edge {
        PIPELINE_DELETE_VERTEX_WITH_EDGE
    } else {
        PIPELINE_DELETE_VERTEX
    };
    pipeline(&[query, tail])
}
