//! 传输层接缝
//!
//! 映射层只依赖一个操作：执行一段语句文本并返回表格结果或失败。
//! 连接、会话池、超时与重试都属于实现方。

use crate::core::value::DataSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// 传输层错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// 无法获取会话
    #[error("会话错误: {0}")]
    Session(String),

    /// 服务端返回的执行失败
    #[error("{0}")]
    Execution(String),
}

/// 图数据库客户端
pub trait GraphClient: Send + Sync + fmt::Debug {
    /// 执行以 `;` 分隔的一段或多段语句，返回最后一段的结果
    fn execute(&self, statement: &str) -> Result<DataSet, ClientError>;
}

impl<C: GraphClient + ?Sized> GraphClient for Arc<C> {
    fn execute(&self, statement: &str) -> Result<DataSet, ClientError> {
        (**self).execute(statement)
    }
}

impl<C: GraphClient + ?Sized> GraphClient for &C {
    fn execute(&self, statement: &str) -> Result<DataSet, ClientError> {
        (**self).execute(statement)
    }
}
