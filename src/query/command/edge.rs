//! 边语句

use super::{pipeline, select_update_fields, set_and_yield, UpdateFields};
use crate::core::error::{MapperError, MapperResult};
use crate::query::identity::{eid_with, Eid};
use crate::schema::EntityDescriptor;

pub(crate) fn require_edge<T>(descriptor: &EntityDescriptor<T>) -> MapperResult<&str> {
    descriptor
        .edge_name()
        .ok_or_else(|| MapperError::Classification("no edge name".to_string()))
}

/// `INSERT EDGE IF NOT EXISTS <edge>(<props>) VALUES "a"->"b"[@r]:(<values>), ...`
pub fn insert_statement<T>(descriptor: &EntityDescriptor<T>, edges: &[T]) -> MapperResult<String> {
    let name = require_edge(descriptor)?;
    if edges.is_empty() {
        return Err(MapperError::InvalidParameter("没有需要插入的边".to_string()));
    }
    let values = edges
        .iter()
        .map(|e| -> MapperResult<String> {
            Ok(format!(
                "{}:({})",
                eid_with(descriptor, e),
                descriptor.insert_values(e)?.join(", ")
            ))
        })
        .collect::<MapperResult<Vec<String>>>()?;
    Ok(format!(
        "INSERT EDGE IF NOT EXISTS {}({}) VALUES {}",
        name,
        descriptor.property_names().join(", "),
        values.join(", ")
    ))
}

fn modify_statement<T>(
    verb: &str,
    descriptor: &EntityDescriptor<T>,
    edge: &T,
    fields: &UpdateFields,
) -> MapperResult<String> {
    let name = require_edge(descriptor)?;
    let selected = select_update_fields(descriptor, edge, fields)?;
    let (sets, yields) = set_and_yield(&selected, edge)?;
    Ok(format!(
        "{} EDGE ON {} {} SET {} YIELD {}",
        verb,
        name,
        eid_with(descriptor, edge),
        sets,
        yields
    ))
}

/// `UPDATE EDGE ON <edge> "a"->"b"[@r] SET ... YIELD ...`
pub fn update_statement<T>(
    descriptor: &EntityDescriptor<T>,
    edge: &T,
    fields: &UpdateFields,
) -> MapperResult<String> {
    modify_statement("UPDATE", descriptor, edge, fields)
}

/// `UPSERT EDGE ON <edge> "a"->"b"[@r] SET ... YIELD ...`
pub fn upsert_statement<T>(
    descriptor: &EntityDescriptor<T>,
    edge: &T,
    fields: &UpdateFields,
) -> MapperResult<String> {
    modify_statement("UPSERT", descriptor, edge, fields)
}

/// `DELETE EDGE <edge> "a"->"b", ...`，所有身份必须属于同一种边
pub fn delete_by_eids_statement(eids: &[Eid]) -> MapperResult<String> {
    let first = eids
        .first()
        .ok_or_else(|| MapperError::InvalidParameter("没有需要删除的边".to_string()))?;
    if let Some(other) = eids.iter().find(|e| e.edge_name != first.edge_name) {
        return Err(MapperError::InvalidParameter(format!(
            "一条删除语句不能混合多种边: {} 与 {}",
            first.edge_name, other.edge_name
        )));
    }
    let rendered: Vec<String> = eids.iter().map(Eid::to_string).collect();
    Ok(format!("DELETE EDGE {} {}", first.edge_name, rendered.join(", ")))
}

pub fn delete_statement<T>(descriptor: &EntityDescriptor<T>, edges: &[T]) -> MapperResult<String> {
    require_edge(descriptor)?;
    let eids: Vec<Eid> = edges.iter().map(|e| eid_with(descriptor, e)).collect();
    delete_by_eids_statement(&eids)
}

/// 管道删除子句：`DELETE EDGE <edge> $-.src -> $-.dst [@ $-.edgerank]`
pub fn pipeline_delete_clause(edge_name: &str, has_rank: bool) -> String {
    if has_rank {
        format!("DELETE EDGE {} $-.src -> $-.dst @ $-.edgerank", edge_name)
    } else {
        format!("DELETE EDGE {} $-.src -> $-.dst", edge_name)
    }
}

/// `<query> | DELETE EDGE ...`，查询须产出 src/dst（及 edgerank）列
pub fn delete_by_query_statement<T>(descriptor: &EntityDescriptor<T>, query: &str) -> MapperResult<String> {
    let name = require_edge(descriptor)?;
    Ok(pipeline(&[
        query,
        &pipeline_delete_clause(name, descriptor.has_rank()),
    ]))
}
