//! 映射层对外接口
//!
//! - 传输层接缝 (`client.rs`)
//! - 图空间会话与结果信封 (`space.rs`, `result.rs`)
//! - 顺序批量执行 (`batch.rs`)
//! - Schema 管理、顶点/边操作、比较更新 (`schema_api.rs`, `vertex_api.rs`, `edge_api.rs`, `reconcile_api.rs`)
//! - 测试用 Mock 客户端 (`test_mock.rs`)

pub mod batch;
pub mod client;
pub mod edge_api;
pub mod reconcile_api;
pub mod result;
pub mod schema_api;
pub mod space;
pub mod test_mock;
pub mod vertex_api;

pub use batch::BatchExecutor;
pub use client::{ClientError, GraphClient};
pub use edge_api::{edge_query_command, lookup_edges_command};
pub use result::{DataResult, ExecutionResult};
pub use schema_api::{is_owned_index, INDEX_NAME_COLUMN};
pub use space::{create_space, describe_space, show_spaces, Space};
pub use test_mock::MockClient;
pub use vertex_api::{lookup_vertices_command, vertex_query_command};
