//! 语句构造
//!
//! 只负责把 schema、实体与身份渲染成查询语言文本，从不执行。
//! 查询与投影、删除之间统一用管道 ` | ` 连接。

pub mod edge;
pub mod search;
pub mod vertex;

use crate::core::error::{MapperError, MapperResult};
use crate::schema::{EntityDescriptor, PropertyField};

/// 顶点 vid 投影
pub const YIELD_VERTEX_VID: &str = "YIELD id($-.v) AS vid";
/// 边端点投影
pub const YIELD_EDGE_SRC_DST: &str = "YIELD src($-.e) AS src, dst($-.e) AS dst";
/// 带 rank 的边端点投影
pub const YIELD_EDGE_SRC_DST_RANK: &str =
    "YIELD src($-.e) AS src, dst($-.e) AS dst, rank($-.e) AS edgerank";

/// 结果集保留列名
pub const VID_COLUMN: &str = "vid";
pub const SRC_COLUMN: &str = "src";
pub const DST_COLUMN: &str = "dst";
pub const RANK_COLUMN: &str = "edgerank";
pub const COUNT_COLUMN: &str = "count";

/// 用管道连接多段语句，空段被跳过
pub fn pipeline(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// 更新语句中参与 `SET` 的属性
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UpdateFields {
    /// 兼容约定：非零值的属性参与，bool 属性总是参与。无法把属性重置为零值
    #[default]
    NonDefault,
    /// 显式指定参与的属性，零值也会写入
    Only(Vec<String>),
}

impl UpdateFields {
    pub fn only<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        UpdateFields::Only(names.into_iter().map(Into::into).collect())
    }
}

/// 按声明顺序挑选参与更新的属性；选择为空时拒绝，避免渲染空的 `SET`
pub(crate) fn select_update_fields<'d, T>(
    descriptor: &'d EntityDescriptor<T>,
    entity: &T,
    fields: &UpdateFields,
) -> MapperResult<Vec<&'d PropertyField<T>>> {
    let selected: Vec<&PropertyField<T>> = match fields {
        UpdateFields::NonDefault => descriptor
            .properties()
            .iter()
            .filter(|p| {
                p.access.kind() == crate::core::types::ValueKind::Bool
                    || !p.access.is_default(entity)
            })
            .collect(),
        UpdateFields::Only(names) => {
            if let Some(unknown) = names
                .iter()
                .find(|n| descriptor.property_field(n).is_none())
            {
                return Err(MapperError::InvalidParameter(format!(
                    "未声明的属性: {}",
                    unknown
                )));
            }
            descriptor
                .properties()
                .iter()
                .filter(|p| names.iter().any(|n| n == p.name()))
                .collect()
        }
    };

    if selected.is_empty() {
        return Err(MapperError::InvalidParameter(
            "没有需要更新的属性".to_string(),
        ));
    }
    Ok(selected)
}

/// `SET p = v, ... YIELD p AS p, ...` 两段
pub(crate) fn set_and_yield<T>(
    fields: &[&PropertyField<T>],
    entity: &T,
) -> MapperResult<(String, String)> {
    let sets = fields
        .iter()
        .map(|p| -> MapperResult<String> {
            Ok(format!("{} = {}", p.name(), p.access.literal(entity)?))
        })
        .collect::<MapperResult<Vec<String>>>()?;
    let yields: Vec<String> = fields
        .iter()
        .map(|p| format!("{} AS {}", p.name(), p.name()))
        .collect();
    Ok((sets.join(", "), yields.join(", ")))
}
