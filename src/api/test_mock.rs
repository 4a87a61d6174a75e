//! 测试用 Mock 客户端
//!
//! 记录每一次提交的语句，按子串规则返回预设结果或失败，
//! 供单元测试与集成测试共用。

use super::client::{ClientError, GraphClient};
use crate::core::value::DataSet;
use parking_lot::Mutex;

/// 可编排的内存客户端
#[derive(Debug, Default)]
pub struct MockClient {
    statements: Mutex<Vec<String>>,
    responses: Mutex<Vec<(String, DataSet)>>,
    failures: Mutex<Vec<(String, String)>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 语句包含 `pattern` 时返回 `data`，后注册的规则优先
    pub fn respond_when(&self, pattern: impl Into<String>, data: DataSet) -> &Self {
        self.responses.lock().push((pattern.into(), data));
        self
    }

    /// 语句包含 `pattern` 时返回执行失败
    pub fn fail_when(&self, pattern: impl Into<String>, message: impl Into<String>) -> &Self {
        self.failures.lock().push((pattern.into(), message.into()));
        self
    }

    /// 已提交的完整语句，按提交顺序
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().clone()
    }

    pub fn execute_count(&self) -> usize {
        self.statements.lock().len()
    }

    /// 包含 `pattern` 的已提交语句数
    pub fn count_matching(&self, pattern: &str) -> usize {
        self.statements
            .lock()
            .iter()
            .filter(|s| s.contains(pattern))
            .count()
    }

    pub fn clear_statements(&self) {
        self.statements.lock().clear();
    }

    /// 清空记录与全部规则
    pub fn reset(&self) {
        self.statements.lock().clear();
        self.responses.lock().clear();
        self.failures.lock().clear();
    }
}

impl GraphClient for MockClient {
    fn execute(&self, statement: &str) -> Result<DataSet, ClientError> {
        self.statements.lock().push(statement.to_string());

        if let Some((_, message)) = self
            .failures
            .lock()
            .iter()
            .rev()
            .find(|(pattern, _)| statement.contains(pattern.as_str()))
        {
            return Err(ClientError::Execution(message.clone()));
        }

        Ok(self
            .responses
            .lock()
            .iter()
            .rev()
            .find(|(pattern, _)| statement.contains(pattern.as_str()))
            .map(|(_, data)| data.clone())
            .unwrap_or_default())
    }
}
