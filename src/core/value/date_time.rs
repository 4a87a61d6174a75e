//! 日期时间类型模块
//!
//! 结果集中的 DATE/TIME/DATETIME/DURATION 值，以及它们与 chrono 类型之间的转换。

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// 简单日期表示
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateValue {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateValue {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        DateValue { year, month, day }
    }

    /// 转为 chrono 日期，非法日期返回 None
    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl Default for DateValue {
    fn default() -> Self {
        DateValue {
            year: 1970,
            month: 1,
            day: 1,
        }
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        DateValue {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// 简单时间表示
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct TimeValue {
    pub hour: u32,
    pub minute: u32,
    pub sec: u32,
    pub microsec: u32,
}

impl TimeValue {
    pub fn new(hour: u32, minute: u32, sec: u32, microsec: u32) -> Self {
        TimeValue {
            hour,
            minute,
            sec,
            microsec,
        }
    }

    pub fn to_naive(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_micro_opt(self.hour, self.minute, self.sec, self.microsec)
    }
}

impl From<NaiveTime> for TimeValue {
    fn from(time: NaiveTime) -> Self {
        TimeValue {
            hour: time.hour(),
            minute: time.minute(),
            sec: time.second(),
            microsec: time.nanosecond() / 1_000,
        }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.sec)?;
        if self.microsec != 0 {
            write!(f, ".{:06}", self.microsec)?;
        }
        Ok(())
    }
}

/// 日期时间表示
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateTimeValue {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub sec: u32,
    pub microsec: u32,
}

impl DateTimeValue {
    pub fn date(&self) -> DateValue {
        DateValue::new(self.year, self.month, self.day)
    }

    pub fn time(&self) -> TimeValue {
        TimeValue::new(self.hour, self.minute, self.sec, self.microsec)
    }

    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        Some(NaiveDateTime::new(self.date().to_naive()?, self.time().to_naive()?))
    }
}

impl Default for DateTimeValue {
    fn default() -> Self {
        DateTimeValue {
            year: 1970,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            sec: 0,
            microsec: 0,
        }
    }
}

impl From<NaiveDateTime> for DateTimeValue {
    fn from(dt: NaiveDateTime) -> Self {
        DateTimeValue {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            sec: dt.second(),
            microsec: dt.nanosecond() / 1_000,
        }
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date(), self.time())
    }
}

/// 持续时间表示
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct DurationValue {
    pub seconds: i64,
    pub microseconds: i32,
    pub months: i32,
}

impl DurationValue {
    pub fn new(seconds: i64, microseconds: i32, months: i32) -> Self {
        DurationValue {
            seconds,
            microseconds,
            months,
        }
    }

    pub fn from_seconds(seconds: i64) -> Self {
        DurationValue {
            seconds,
            microseconds: 0,
            months: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0 && self.microseconds == 0 && self.months == 0
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P")?;
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        write!(f, "T{}", self.seconds)?;
        if self.microseconds != 0 {
            write!(f, ".{:06}", self.microseconds.unsigned_abs())?;
        }
        write!(f, "S")
    }
}
