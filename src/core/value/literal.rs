//! 值的查询语言字面量渲染
//!
//! 字符串转义规则与 `unescape_string` 互为逆运算，解码时可以还原出原值。

use super::types::Value;
use crate::core::error::{MapperError, MapperResult};

/// 转义字符串中的反斜杠、换行、制表符与双引号
pub fn escape_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}

/// `escape_string` 的逆运算，未知转义序列原样保留
pub fn unescape_string(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// 加双引号的字符串字面量
pub fn quote(raw: &str) -> String {
    format!("\"{}\"", escape_string(raw))
}

fn float_literal(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl Value {
    /// 渲染为可以直接嵌入语句的字面量
    ///
    /// 不做检查：非有限浮点数渲染为 `NaN`/`inf`，语句中需要用 `try_literal`
    pub fn to_literal(&self) -> String {
        match self {
            Value::Empty | Value::Null(_) => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => float_literal(*f),
            Value::String(s) => quote(s),
            Value::Date(d) => format!("DATE(\"{}\")", d),
            Value::Time(t) => format!("TIME(\"{}\")", t),
            Value::DateTime(dt) => format!("DATETIME(\"{}\")", dt),
            Value::Duration(d) => format!(
                "duration({{months: {}, seconds: {}, microseconds: {}}})",
                d.months, d.seconds, d.microseconds
            ),
        }
    }

    /// 同 `to_literal`，但拒绝查询语言无法表示的非有限浮点数
    pub fn try_literal(&self) -> MapperResult<String> {
        match self {
            Value::Float(f) if !f.is_finite() => Err(MapperError::InvalidParameter(format!(
                "无法渲染的浮点数: {}",
                f
            ))),
            other => Ok(other.to_literal()),
        }
    }
}
