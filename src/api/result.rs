//! 结果信封
//!
//! 所有操作都返回已渲染的语句、结果行（如果有）与错误，
//! 预期内的错误不会以 panic 的形式越过库边界。

use crate::core::error::{MapperError, MapperResult};
use crate::core::value::DataSet;
use serde::{Serialize, Serializer};

fn serialize_error<S: Serializer>(error: &Option<MapperError>, serializer: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// 一次执行的结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionResult {
    /// 已渲染并提交的语句片段，含 `USE` 前缀
    pub commands: Vec<String>,
    pub data_set: Option<DataSet>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<MapperError>,
}

impl ExecutionResult {
    pub fn success(commands: Vec<String>, data_set: Option<DataSet>) -> Self {
        Self {
            commands,
            data_set,
            error: None,
        }
    }

    pub fn failure(commands: Vec<String>, error: MapperError) -> Self {
        Self {
            commands,
            data_set: None,
            error: Some(error),
        }
    }

    /// 尚未渲染出任何语句就失败
    pub fn from_error(error: MapperError) -> Self {
        Self::failure(Vec::new(), error)
    }

    pub fn ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn err(&self) -> Option<&MapperError> {
        self.error.as_ref()
    }

    /// 结果行数，失败或无结果时为 0
    pub fn row_count(&self) -> usize {
        self.data_set.as_ref().map_or(0, DataSet::row_count)
    }

    pub fn into_result(self) -> MapperResult<Option<DataSet>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.data_set),
        }
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> MapperResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MapperError::Decode(format!("JSON序列化失败: {}", e)))
    }
}

/// 带类型化数据的结果
#[derive(Debug, Clone)]
pub struct DataResult<T> {
    pub result: ExecutionResult,
    pub data: Option<T>,
}

impl<T> DataResult<T> {
    pub fn with_data(result: ExecutionResult, data: T) -> Self {
        Self {
            result,
            data: Some(data),
        }
    }

    pub fn without_data(result: ExecutionResult) -> Self {
        Self { result, data: None }
    }

    pub fn from_error(error: MapperError) -> Self {
        Self::without_data(ExecutionResult::from_error(error))
    }

    /// 保留已提交的语句，替换为新的错误
    pub fn failed(mut result: ExecutionResult, error: MapperError) -> Self {
        result.error = Some(error);
        result.data_set = None;
        Self::without_data(result)
    }

    pub fn ok(&self) -> bool {
        self.result.ok() && self.data.is_some()
    }

    pub fn err(&self) -> Option<&MapperError> {
        self.result.err()
    }

    pub fn commands(&self) -> &[String] {
        &self.result.commands
    }

    pub fn into_result(self) -> MapperResult<T> {
        if let Some(e) = self.result.error {
            return Err(e);
        }
        self.data
            .ok_or_else(|| MapperError::no_data(&self.result.commands))
    }
}
