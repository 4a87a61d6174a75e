//! 结果解码
//!
//! 把表格结果按列名映射回实体。缺少的列保持字段零值而不报错，
//! 空身份由调用方在下游校验。边的端点通过 `EndpointCache` 解析，
//! 同一次解码中相同的端点 vid 只对应一个顶点实例。

use super::command::{COUNT_COLUMN, DST_COLUMN, RANK_COLUMN, SRC_COLUMN, VID_COLUMN};
use super::identity::Eid;
use crate::core::error::{MapperError, MapperResult};
use crate::core::value::{DataSet, Row, Value};
use crate::schema::{EndpointCache, EntityDescriptor};

fn text(value: Option<&Value>) -> String {
    value.and_then(Value::to_text).unwrap_or_default()
}

fn decode_properties<T>(descriptor: &EntityDescriptor<T>, row: &Row<'_>, entity: &mut T) {
    for field in descriptor.properties() {
        if let Some(value) = row.get_present(field.name()) {
            if !field.access.write(entity, value) {
                log::debug!(
                    "列 {} 的值 {:?} 与字段类型不兼容，保留零值",
                    field.name(),
                    value
                );
            }
        }
    }
}

/// 把一行顶点数据写入已有实例，vid 取自保留列 `vid`
pub fn load_vertex_row<T>(descriptor: &EntityDescriptor<T>, row: &Row<'_>, vertex: &mut T) {
    decode_properties(descriptor, row, vertex);
    descriptor.set_vid(vertex, &text(row.get(VID_COLUMN)));
}

pub fn decode_vertex_row<T: Default>(descriptor: &EntityDescriptor<T>, row: &Row<'_>) -> T {
    let mut vertex = T::default();
    load_vertex_row(descriptor, row, &mut vertex);
    vertex
}

pub fn decode_vertices<T: Default>(descriptor: &EntityDescriptor<T>, data: &DataSet) -> Vec<T> {
    data.iter_rows()
        .map(|row| decode_vertex_row(descriptor, &row))
        .collect()
}

/// 把一行边数据写入已有实例
///
/// `src`/`dst` 列先查端点缓存，命中则共享实例；未命中时构造只有 vid 的顶点并写入缓存
pub fn load_edge_row<T>(
    descriptor: &EntityDescriptor<T>,
    row: &Row<'_>,
    from_cache: &mut EndpointCache,
    to_cache: &mut EndpointCache,
    edge: &mut T,
) {
    decode_properties(descriptor, row, edge);

    if let Some(from) = descriptor.from_endpoint() {
        from.assign(edge, &text(row.get(SRC_COLUMN)), from_cache);
    }
    if let Some(to) = descriptor.to_endpoint() {
        to.assign(edge, &text(row.get(DST_COLUMN)), to_cache);
    }
    if let Some(rank) = row.get(RANK_COLUMN).and_then(Value::as_int) {
        descriptor.set_rank(edge, rank);
    }
}

pub fn decode_edge_row<T: Default>(
    descriptor: &EntityDescriptor<T>,
    row: &Row<'_>,
    from_cache: &mut EndpointCache,
    to_cache: &mut EndpointCache,
) -> T {
    let mut edge = T::default();
    load_edge_row(descriptor, row, from_cache, to_cache, &mut edge);
    edge
}

pub fn decode_edges<T: Default>(
    descriptor: &EntityDescriptor<T>,
    data: &DataSet,
    from_cache: &mut EndpointCache,
    to_cache: &mut EndpointCache,
) -> Vec<T> {
    data.iter_rows()
        .map(|row| decode_edge_row(descriptor, &row, from_cache, to_cache))
        .collect()
}

fn require_column(data: &DataSet, column: &str) -> MapperResult<()> {
    if data.get_col_index(column).is_none() && !data.is_empty() {
        return Err(MapperError::Decode(format!("结果中缺少列 {}", column)));
    }
    Ok(())
}

/// 读取 `vid` 列
pub fn vids_from(data: &DataSet) -> MapperResult<Vec<String>> {
    require_column(data, VID_COLUMN)?;
    Ok(data.iter_rows().map(|row| text(row.get(VID_COLUMN))).collect())
}

/// 读取 `src`/`dst`（及 `edgerank`）列组装边身份
pub fn eids_from(data: &DataSet, edge_name: &str, has_rank: bool) -> MapperResult<Vec<Eid>> {
    require_column(data, SRC_COLUMN)?;
    require_column(data, DST_COLUMN)?;
    if has_rank {
        require_column(data, RANK_COLUMN)?;
    }
    Ok(data
        .iter_rows()
        .map(|row| {
            let eid = Eid::new(
                text(row.get(SRC_COLUMN)),
                text(row.get(DST_COLUMN)),
                edge_name,
            );
            match row.get(RANK_COLUMN).and_then(Value::as_int) {
                Some(rank) if has_rank => eid.with_rank(rank),
                _ => eid,
            }
        })
        .collect())
}

/// 读取某一列的全部非空文本值
pub fn texts_from(data: &DataSet, column: &str) -> MapperResult<Vec<String>> {
    require_column(data, column)?;
    Ok(data
        .iter_rows()
        .filter_map(|row| row.get_present(column).and_then(Value::to_text))
        .collect())
}

/// 读取 `count` 列的第一行，结果为空时返回 `NoData`
pub fn count_from(data: &DataSet) -> MapperResult<i64> {
    let row = data
        .row(0)
        .ok_or_else(|| MapperError::NoData("计数结果为空".to_string()))?;
    row.get(COUNT_COLUMN)
        .and_then(Value::as_int)
        .ok_or_else(|| MapperError::Decode(format!("结果中缺少整数列 {}", COUNT_COLUMN)))
}
