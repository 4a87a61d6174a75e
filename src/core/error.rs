//! 统一错误处理 for graphdb-mapper
//!
//! ## 设计理念
//!
//! 1. **按来源分类**：实体分类错误、无数据错误、执行错误、批量部分失败错误
//! 2. **不跨边界抛出**：所有预期内的错误都通过结果信封交给直接调用者，不 panic
//! 3. **统一接口**：`MapperResult<T>` 提供统一的返回类型，简化错误传播

use thiserror::Error;

/// 统一的映射层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapperError {
    /// 类型不满足顶点/边的结构要求，消息列出缺失的标记
    #[error("实体分类错误: {0}")]
    Classification(String),

    /// 查询期望至少一行数据，实际为空
    #[error("未找到数据: {0}")]
    NoData(String),

    /// 外部执行方返回的失败，附带出错的语句
    #[error("throw error: \"{message}\" when execute the statement: \"{statement}\"")]
    Execution { statement: String, message: String },

    /// 多批次操作在第 `batch` 批失败
    #[error("batch {operation} {batch} from {from} to {to} failed: {source}")]
    BatchFailed {
        operation: String,
        batch: usize,
        from: usize,
        to: usize,
        source: Box<MapperError>,
    },

    #[error("无效的参数: {0}")]
    InvalidParameter(String),

    #[error("结果解析错误: {0}")]
    Decode(String),

    #[error("配置错误: {0}")]
    Config(String),
}

/// 统一的结果类型
pub type MapperResult<T> = Result<T, MapperError>;

impl MapperError {
    /// 创建执行错误
    pub fn execution(statement: impl Into<String>, message: impl Into<String>) -> Self {
        MapperError::Execution {
            statement: statement.into(),
            message: message.into(),
        }
    }

    /// 创建无数据错误
    pub fn no_data(commands: &[String]) -> Self {
        MapperError::NoData(format!("Not found data by command: {}", commands.join("")))
    }

    /// 是否为“未找到”类错误，调用方可以把它当作正常结果处理
    pub fn is_no_data(&self) -> bool {
        match self {
            MapperError::NoData(_) => true,
            MapperError::BatchFailed { source, .. } => source.is_no_data(),
            _ => false,
        }
    }

    /// 是否为分类错误
    pub fn is_classification(&self) -> bool {
        matches!(self, MapperError::Classification(_))
    }

    /// 批量失败时返回失败批次序号
    pub fn failed_batch(&self) -> Option<usize> {
        match self {
            MapperError::BatchFailed { batch, .. } => Some(*batch),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for MapperError {
    fn from(err: toml::de::Error) -> Self {
        MapperError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MapperError {
    fn from(err: toml::ser::Error) -> Self {
        MapperError::Config(err.to_string())
    }
}

impl From<std::io::Error> for MapperError {
    fn from(err: std::io::Error) -> Self {
        MapperError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_carries_statement() {
        let err = MapperError::execution("USE s;INSERT VERTEX x", "SyntaxError");
        let text = err.to_string();
        assert!(text.contains("SyntaxError"));
        assert!(text.contains("USE s;INSERT VERTEX x"));
    }

    #[test]
    fn test_batch_failed_reports_range() {
        let err = MapperError::BatchFailed {
            operation: "insert vertexes".to_string(),
            batch: 1,
            from: 2,
            to: 3,
            source: Box::new(MapperError::execution("stmt", "boom")),
        };
        assert_eq!(err.failed_batch(), Some(1));
        assert!(err.to_string().starts_with("batch insert vertexes 1 from 2 to 3 failed"));
    }

    #[test]
    fn test_no_data_detection() {
        let err = MapperError::no_data(&["USE s;".to_string(), "FETCH".to_string()]);
        assert!(err.is_no_data());
        assert!(!MapperError::InvalidParameter("x".into()).is_no_data());
    }
}
