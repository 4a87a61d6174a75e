//! 查询模块
//!
//! - 身份解析 (`identity.rs`)
//! - 语句构造 (`command/`)
//! - 结果解码 (`decode.rs`)

pub mod command;
pub mod decode;
pub mod identity;

pub use command::{pipeline, UpdateFields};
pub use identity::{
    check_edge, check_vertex, classify, get_eid, get_vid, identity_key, is_edge, is_vertex, Eid,
    EntityClass,
};
