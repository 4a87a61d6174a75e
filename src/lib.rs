//! graphdb-mapper - 图数据库的客户端映射与对账层
//!
//! 把普通的 Rust 结构体映射为图数据库中的顶点与边：
//! 由实体描述派生标签/边 schema，渲染插入、更新、删除与查询语句，
//! 把表格结果解码回实体，并比较期望集合与库中现有数据后分批执行变更。
//!
//! 连接、会话与重试由实现 `api::GraphClient` 的传输层负责。

pub mod api;
pub mod config;
pub mod core;
pub mod query;
pub mod reconcile;
pub mod schema;
pub mod utils;

pub use crate::api::{DataResult, ExecutionResult, GraphClient, Space};
pub use crate::config::Config;
pub use crate::core::error::{MapperError, MapperResult};
pub use crate::reconcile::{CompareCounts, CompareResult};
pub use crate::schema::{Entity, EntityDescriptor, Property};
