//! 测试实体与结果行
//!
//! 顶点 `Person`/`Company`/`Event`，带 rank 的边 `Employ`，不带 rank 的边 `Knows`，
//! 以及没有任何实体标记的 `Memo`。

use chrono::{NaiveDate, NaiveDateTime};
use graphdb_mapper::core::value::{DataSet, DateTimeValue, DateValue, Value};
use graphdb_mapper::schema::{Entity, EntityDescriptor, Property};
use std::sync::Arc;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub vid: String,
    pub name: String,
    pub age: i32,
}

impl Entity for Person {
    fn describe() -> EntityDescriptor<Self> {
        EntityDescriptor::<Self>::new()
            .tag("person")
            .comment("人员")
            .vid(|p| &p.vid, |p| &mut p.vid)
            .property(
                Property::new("name").indexes("1").comment("姓名"),
                |p| &p.name,
                |p| &mut p.name,
            )
            .property(Property::new("age").indexes("1,2"), |p| &p.age, |p| &mut p.age)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Company {
    pub vid: String,
    pub name: String,
    pub founded: NaiveDate,
}

impl Entity for Company {
    fn describe() -> EntityDescriptor<Self> {
        EntityDescriptor::<Self>::new()
            .tag("company")
            .vid(|c| &c.vid, |c| &mut c.vid)
            .property(Property::new("name"), |c| &c.name, |c| &mut c.name)
            .property(Property::new("founded"), |c| &c.founded, |c| &mut c.founded)
    }
}

/// 日期与日期时间属性
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Event {
    pub vid: String,
    pub day: NaiveDate,
    pub at: NaiveDateTime,
}

impl Entity for Event {
    fn describe() -> EntityDescriptor<Self> {
        EntityDescriptor::<Self>::new()
            .tag("event")
            .vid(|e| &e.vid, |e| &mut e.vid)
            .property(Property::new("day"), |e| &e.day, |e| &mut e.day)
            .property(Property::new("at"), |e| &e.at, |e| &mut e.at)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Employ {
    pub from: Arc<Person>,
    pub to: Arc<Company>,
    pub rank: i64,
    pub title: String,
    pub salary: f64,
}

impl Entity for Employ {
    fn describe() -> EntityDescriptor<Self> {
        EntityDescriptor::<Self>::new()
            .edge("employ")
            .edge_from(|e| &e.from, |e| &mut e.from)
            .edge_to(|e| &e.to, |e| &mut e.to)
            .rank(|e| &e.rank, |e| &mut e.rank)
            .property(Property::new("title").indexes("1"), |e| &e.title, |e| &mut e.title)
            .property(Property::new("salary"), |e| &e.salary, |e| &mut e.salary)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Knows {
    pub from: Arc<Person>,
    pub to: Arc<Person>,
    pub degree: i32,
}

impl Entity for Knows {
    fn describe() -> EntityDescriptor<Self> {
        EntityDescriptor::<Self>::new()
            .edge("knows")
            .ttl(3600)
            .edge_from(|k| &k.from, |k| &mut k.from)
            .edge_to(|k| &k.to, |k| &mut k.to)
            .property(Property::new("degree"), |k| &k.degree, |k| &mut k.degree)
    }
}

/// 没有实体名与身份字段的普通类型
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Memo {
    pub text: String,
}

impl Entity for Memo {
    fn describe() -> EntityDescriptor<Self> {
        EntityDescriptor::<Self>::new().property(Property::new("text"), |m| &m.text, |m| &mut m.text)
    }
}

pub fn person(vid: &str, name: &str, age: i32) -> Person {
    Person {
        vid: vid.to_string(),
        name: name.to_string(),
        age,
    }
}

pub fn company(vid: &str, name: &str) -> Company {
    Company {
        vid: vid.to_string(),
        name: name.to_string(),
        founded: NaiveDate::default(),
    }
}

pub fn event(vid: &str, day: NaiveDate, at: NaiveDateTime) -> Event {
    Event {
        vid: vid.to_string(),
        day,
        at,
    }
}

/// `vid, day, at` 三列的顶点结果，日期列为库返回的日期类型
pub fn event_rows(events: &[Event]) -> DataSet {
    events.iter().fold(
        DataSet::with_columns(["vid", "day", "at"]),
        |data, e| {
            data.with_row(vec![
                Value::from(e.vid.as_str()),
                Value::Date(DateValue::from(e.day)),
                Value::DateTime(DateTimeValue::from(e.at)),
            ])
        },
    )
}

/// 端点只带 vid 的边
pub fn knows(from: &str, to: &str, degree: i32) -> Knows {
    Knows {
        from: Arc::new(Person {
            vid: from.to_string(),
            ..Person::default()
        }),
        to: Arc::new(Person {
            vid: to.to_string(),
            ..Person::default()
        }),
        degree,
    }
}

pub fn employ(from: &Person, to: &Company, rank: i64, title: &str) -> Employ {
    Employ {
        from: Arc::new(from.clone()),
        to: Arc::new(to.clone()),
        rank,
        title: title.to_string(),
        salary: 0.0,
    }
}

/// `vid, name, age` 三列的顶点结果
pub fn person_rows(people: &[Person]) -> DataSet {
    people.iter().fold(
        DataSet::with_columns(["vid", "name", "age"]),
        |data, p| {
            data.with_row(vec![
                Value::from(p.vid.as_str()),
                Value::from(p.name.as_str()),
                Value::Int(i64::from(p.age)),
            ])
        },
    )
}

/// `src, dst, degree` 三列的边结果
pub fn knows_rows(edges: &[Knows]) -> DataSet {
    edges.iter().fold(
        DataSet::with_columns(["src", "dst", "degree"]),
        |data, k| {
            data.with_row(vec![
                Value::from(k.from.vid.as_str()),
                Value::from(k.to.vid.as_str()),
                Value::Int(i64::from(k.degree)),
            ])
        },
    )
}
