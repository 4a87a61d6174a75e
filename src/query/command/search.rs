//! 查询语句：LOOKUP / FETCH / GO、属性投影与计数

use super::{pipeline, YIELD_EDGE_SRC_DST, YIELD_EDGE_SRC_DST_RANK, YIELD_VERTEX_VID};
use crate::core::error::{MapperError, MapperResult};
use crate::core::value::{quote, Value};
use crate::query::identity::Eid;
use crate::schema::{Entity, EntityName};

fn with_predicate(head: String, predicate: Option<&str>, tail: &str) -> String {
    match predicate.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => format!("{} WHERE {} {}", head, p, tail),
        None => format!("{} {}", head, tail),
    }
}

/// `LOOKUP ON <tag> [WHERE <q>] YIELD VERTEX AS v`
pub fn lookup_vertex(tag: &str, predicate: Option<&str>) -> String {
    with_predicate(format!("LOOKUP ON {}", tag), predicate, "YIELD VERTEX AS v")
}

/// `LOOKUP ON <edge> [WHERE <q>] YIELD EDGE AS e`
pub fn lookup_edge(edge: &str, predicate: Option<&str>) -> String {
    with_predicate(format!("LOOKUP ON {}", edge), predicate, "YIELD EDGE AS e")
}

/// `FETCH PROP ON <tag> "<vid>" YIELD VERTEX AS v`
pub fn fetch_vertex(tag: &str, vid: &str) -> String {
    format!("FETCH PROP ON {} {} YIELD VERTEX AS v", tag, quote(vid))
}

/// `FETCH PROP ON <tag> $-.<column> YIELD DISTINCT VERTEX AS v`，用于管道预取
pub fn fetch_vertices_piped(tag: &str, column: &str) -> String {
    format!("FETCH PROP ON {} $-.{} YIELD DISTINCT VERTEX AS v", tag, column)
}

/// `FETCH PROP ON <edge> "a"->"b"[@r] YIELD EDGE AS e`
pub fn fetch_edge(eid: &Eid) -> String {
    format!("FETCH PROP ON {} {} YIELD EDGE AS e", eid.edge_name, eid)
}

/// `GO FROM "<vid>" OVER <edge> [WHERE <q>] YIELD EDGE AS e`
pub fn go_from(edge: &str, vid: &str, predicate: Option<&str>) -> String {
    with_predicate(
        format!("GO FROM {} OVER {}", quote(vid), edge),
        predicate,
        "YIELD EDGE AS e",
    )
}

/// `YIELD id($-.v) AS vid, properties($-.v).p AS p, ...`
pub fn vertex_projection(property_names: &[&str]) -> String {
    let mut parts = vec![YIELD_VERTEX_VID.to_string()];
    parts.extend(
        property_names
            .iter()
            .map(|p| format!("properties($-.v).{} AS {}", p, p)),
    );
    parts.join(", ")
}

/// 只投影端点与 rank
pub fn edge_identity_projection(has_rank: bool) -> &'static str {
    if has_rank {
        YIELD_EDGE_SRC_DST_RANK
    } else {
        YIELD_EDGE_SRC_DST
    }
}

/// `YIELD src($-.e) AS src, dst($-.e) AS dst[, rank($-.e) AS edgerank], properties($-.e).p AS p, ...`
pub fn edge_projection(property_names: &[&str], has_rank: bool) -> String {
    let mut parts = vec![edge_identity_projection(has_rank).to_string()];
    parts.extend(
        property_names
            .iter()
            .map(|p| format!("properties($-.e).{} AS {}", p, p)),
    );
    parts.join(", ")
}

/// `YIELD DISTINCT properties($-.v).<prop> AS <alias>`
pub fn vertex_property_projection(property: &str, alias: &str) -> String {
    format!("YIELD DISTINCT properties($-.v).{} AS {}", property, alias)
}

/// `<query> | YIELD count(1) AS count`
pub fn count(query: &str) -> String {
    pipeline(&[query, "YIELD count(1) AS count"])
}

/// 等值谓词：`<entity>.<prop>==<literal>`，按给定顺序用 ` AND ` 连接
pub fn where_equals<T: Entity>(conditions: &[(&str, Value)]) -> MapperResult<String> {
    let descriptor = T::describe();
    let entity = match descriptor.name() {
        Some(EntityName::Tag(name)) | Some(EntityName::Edge(name)) => name.clone(),
        None => {
            return Err(MapperError::Classification(
                "no tag name, no edge name".to_string(),
            ))
        }
    };
    if let Some((unknown, _)) = conditions
        .iter()
        .find(|(p, _)| descriptor.property_field(p).is_none())
    {
        return Err(MapperError::InvalidParameter(format!(
            "未声明的属性: {}",
            unknown
        )));
    }
    let clauses = conditions
        .iter()
        .map(|(p, v)| -> MapperResult<String> {
            Ok(format!("{}.{}=={}", entity, p, v.try_literal()?))
        })
        .collect::<MapperResult<Vec<String>>>()?;
    Ok(clauses.join(" AND "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EntityDescriptor, Property};

    #[derive(Debug, Default)]
    struct Team {
        vid: String,
        name: String,
        size: i64,
    }

    impl Entity for Team {
        fn describe() -> EntityDescriptor<Self> {
            EntityDescriptor::<Self>::new()
                .tag("team")
                .vid(|t| &t.vid, |t| &mut t.vid)
                .property(Property::new("name"), |t| &t.name, |t| &mut t.name)
                .property(Property::new("size"), |t| &t.size, |t| &mut t.size)
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup_vertex("team", None), "LOOKUP ON team YIELD VERTEX AS v");
        assert_eq!(
            lookup_vertex("team", Some("team.size > 3")),
            "LOOKUP ON team WHERE team.size > 3 YIELD VERTEX AS v"
        );
        assert_eq!(lookup_edge("serve", Some("  ")), "LOOKUP ON serve YIELD EDGE AS e");
    }

    #[test]
    fn test_projections() {
        assert_eq!(
            pipeline(&[&lookup_vertex("team", None), &vertex_projection(&["name", "size"])]),
            "LOOKUP ON team YIELD VERTEX AS v | YIELD id($-.v) AS vid, \
             properties($-.v).name AS name, properties($-.v).size AS size"
        );
        assert_eq!(
            edge_projection(&["since"], true),
            "YIELD src($-.e) AS src, dst($-.e) AS dst, rank($-.e) AS edgerank, properties($-.e).since AS since"
        );
    }

    #[test]
    fn test_fetch_and_go() {
        assert_eq!(fetch_vertex("team", "t1"), "FETCH PROP ON team \"t1\" YIELD VERTEX AS v");
        assert_eq!(
            fetch_edge(&Eid::new("a", "b", "serve").with_rank(1)),
            "FETCH PROP ON serve \"a\"->\"b\"@1 YIELD EDGE AS e"
        );
        assert_eq!(
            go_from("serve", "p1", None),
            "GO FROM \"p1\" OVER serve YIELD EDGE AS e"
        );
        assert_eq!(
            fetch_vertices_piped("team", "dst"),
            "FETCH PROP ON team $-.dst YIELD DISTINCT VERTEX AS v"
        );
    }

    #[test]
    fn test_count() {
        assert_eq!(
            count("LOOKUP ON team YIELD VERTEX AS v"),
            "LOOKUP ON team YIELD VERTEX AS v | YIELD count(1) AS count"
        );
    }

    #[test]
    fn test_where_equals() {
        let predicate = where_equals::<Team>(&[("name", Value::from("Bulls")), ("size", Value::Int(15))])
            .expect("渲染谓词");
        assert_eq!(predicate, "team.name==\"Bulls\" AND team.size==15");
        assert!(where_equals::<Team>(&[("coach", Value::from("x"))]).is_err());
    }
}
