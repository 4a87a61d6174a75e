//! 顺序批量执行
//!
//! 实体按固定大小分块，每块渲染出的语句在一次调用中执行。
//! 批次严格按顺序执行，第一个失败的批次终止整个操作，
//! 已经成功的批次不会回滚。调用方重新比较并执行即可只补做剩余的变更。

use super::client::GraphClient;
use super::result::ExecutionResult;
use super::space::Space;
use crate::core::error::{MapperError, MapperResult};

/// 批量执行器
///
/// # 示例
///
/// ```rust
/// use graphdb_mapper::api::{BatchExecutor, MockClient, Space};
///
/// let client = MockClient::new();
/// let space = Space::new(&client, "demo").with_batch_size(2);
/// let ids = ["a", "b", "c"];
/// let result = BatchExecutor::new(&space, "delete")
///     .run(&ids, |chunk| Ok(vec![format!("DELETE VERTEX \"{}\"", chunk.join("\", \""))]));
/// assert!(result.ok());
/// assert_eq!(client.statements().len(), 2);
/// ```
pub struct BatchExecutor<'s, 'a, C: GraphClient> {
    space: &'s Space<'a, C>,
    operation: String,
    batch_size: usize,
}

impl<'s, 'a, C: GraphClient> BatchExecutor<'s, 'a, C> {
    /// 创建执行器，批大小取自空间会话
    ///
    /// # 参数
    /// - `space` - 执行语句的空间会话
    /// - `operation` - 操作名，出现在批量失败的错误信息中
    pub fn new(space: &'s Space<'a, C>, operation: impl Into<String>) -> Self {
        Self {
            space,
            operation: operation.into(),
            batch_size: space.batch_size(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 依次渲染并执行每个批次
    ///
    /// # 返回
    /// - 成功时 `commands` 为所有批次提交的语句片段
    /// - 失败时额外包含失败批次的语句，错误为 `MapperError::BatchFailed`
    pub fn run<T, F>(&self, items: &[T], mut render: F) -> ExecutionResult
    where
        F: FnMut(&[T]) -> MapperResult<Vec<String>>,
    {
        let mut commands = Vec::new();
        if items.is_empty() {
            log::debug!("批量{}: 没有需要处理的实体", self.operation);
            return ExecutionResult::success(commands, None);
        }

        for (batch, chunk) in items.chunks(self.batch_size).enumerate() {
            let from = batch * self.batch_size;
            let to = from + chunk.len() - 1;

            let statements = match render(chunk) {
                Ok(statements) => statements,
                Err(e) => return self.abort(commands, batch, from, to, e),
            };

            let mut result = self.space.execute(&statements);
            commands.append(&mut result.commands);
            if let Some(e) = result.error {
                return self.abort(commands, batch, from, to, e);
            }
            log::debug!("批量{} 第 {} 批完成 ({}..={})", self.operation, batch, from, to);
        }

        ExecutionResult::success(commands, None)
    }

    fn abort(
        &self,
        commands: Vec<String>,
        batch: usize,
        from: usize,
        to: usize,
        source: MapperError,
    ) -> ExecutionResult {
        log::warn!(
            "批量{} 第 {} 批失败 ({}..={}): {}",
            self.operation,
            batch,
            from,
            to,
            source
        );
        ExecutionResult::failure(
            commands,
            MapperError::BatchFailed {
                operation: self.operation.clone(),
                batch,
                from,
                to,
                source: Box::new(source),
            },
        )
    }
}
