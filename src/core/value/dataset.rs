//! 数据集类型模块
//!
//! 外部执行方返回的表格结果：列名 + 行。解码器通过列名读取单元格。

use super::types::Value;
use serde::{Deserialize, Serialize};

/// 简单数据集表示
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DataSet {
    pub col_names: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建带列名的数据集
    pub fn with_columns<S: Into<String>>(col_names: impl IntoIterator<Item = S>) -> Self {
        Self {
            col_names: col_names.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// 添加行
    pub fn add_row(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    /// 链式添加行，方便构造测试数据
    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.rows.push(row);
        self
    }

    /// 获取行数
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 获取列数
    pub fn col_count(&self) -> usize {
        self.col_names.len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 获取指定列的索引
    pub fn get_col_index(&self, col_name: &str) -> Option<usize> {
        self.col_names.iter().position(|name| name == col_name)
    }

    /// 获取指定列的所有值
    pub fn get_column(&self, col_name: &str) -> Option<Vec<Value>> {
        let index = self.get_col_index(col_name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(index).cloned())
                .collect(),
        )
    }

    /// 按行迭代，每行可按列名取值
    pub fn iter_rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            col_names: &self.col_names,
            values,
        })
    }

    /// 取第 `index` 行
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            col_names: &self.col_names,
            values,
        })
    }

    /// 把另一个数据集的行追加进来，列名以第一次出现的为准
    pub fn append(&mut self, other: DataSet) {
        if self.col_names.is_empty() {
            self.col_names = other.col_names;
        }
        self.rows.extend(other.rows);
    }
}

/// 数据集中一行的只读视图
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    col_names: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// 按列名取值，列不存在时返回 None
    pub fn get(&self, col_name: &str) -> Option<&'a Value> {
        let index = self.col_names.iter().position(|name| name == col_name)?;
        self.values.get(index)
    }

    /// 取非空值，null/empty 视为缺失
    pub fn get_present(&self, col_name: &str) -> Option<&'a Value> {
        self.get(col_name).filter(|v| !v.is_null() && !v.is_empty())
    }

    pub fn columns(&self) -> &'a [String] {
        self.col_names
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}
