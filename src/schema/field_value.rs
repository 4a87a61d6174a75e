//! 字段类型与 `Value` 之间的双向转换
//!
//! 每个可以被标记为属性的字段类型都实现 `FieldValue`，
//! 其 `KIND` 在派生 schema 时解析为列类型与默认值字面量。

use crate::core::error::MapperResult;
use crate::core::types::ValueKind;
use crate::core::value::{DateTimeValue, DateValue, DurationValue, TimeValue, Value};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// 可映射为图属性的字段类型
pub trait FieldValue: Default + Clone + PartialEq + Send + Sync + 'static {
    const KIND: ValueKind;

    fn to_value(&self) -> Value;

    /// 类型不兼容时返回 None，调用方保留字段原值
    fn from_value(value: &Value) -> Option<Self>;

    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl FieldValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FieldValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

macro_rules! impl_int_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const KIND: ValueKind = ValueKind::$kind;

                fn to_value(&self) -> Value {
                    Value::Int(*self as i64)
                }

                fn from_value(value: &Value) -> Option<Self> {
                    value.as_int().and_then(|i| <$ty>::try_from(i).ok())
                }
            }
        )*
    };
}

impl_int_field!(i8 => Int8, i16 => Int16, i32 => Int32, i64 => Int64);

impl FieldValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(*self as f64)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float().map(|f| f as f32)
    }
}

impl FieldValue for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl FieldValue for NaiveDate {
    const KIND: ValueKind = ValueKind::Date;

    fn to_value(&self) -> Value {
        Value::Date(DateValue::from(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Date(d) => d.to_naive(),
            Value::DateTime(dt) => dt.date().to_naive(),
            Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
            _ => None,
        }
    }
}

impl FieldValue for NaiveDateTime {
    const KIND: ValueKind = ValueKind::DateTime;

    fn to_value(&self) -> Value {
        Value::DateTime(DateTimeValue::from(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::DateTime(dt) => dt.to_naive(),
            Value::Date(d) => d.to_naive().and_then(|d| d.and_hms_opt(0, 0, 0)),
            Value::String(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").ok(),
            _ => None,
        }
    }
}

impl FieldValue for NaiveTime {
    const KIND: ValueKind = ValueKind::Time;

    fn to_value(&self) -> Value {
        Value::Time(TimeValue::from(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Time(t) => t.to_naive(),
            Value::String(s) => NaiveTime::parse_from_str(s, "%H:%M:%S%.f").ok(),
            _ => None,
        }
    }
}

impl FieldValue for DurationValue {
    const KIND: ValueKind = ValueKind::Duration;

    fn to_value(&self) -> Value {
        Value::Duration(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_duration().copied()
    }
}

/// 渲染语句中的字段值，零值也按实际取值渲染
pub(crate) fn field_literal<F: FieldValue>(field: &F) -> MapperResult<String> {
    field.to_value().try_literal()
}
