//! 边操作
//!
//! 边查询会额外预取两端的顶点：
//! `<edge query> | FETCH PROP ON <tag> $-.src YIELD DISTINCT VERTEX AS v | <投影>`，
//! 结果填入起点、终点两个端点缓存后再解码边，端点因此带有完整属性，
//! 同一个 vid 在本次解码中只对应一个顶点实例。

use super::batch::BatchExecutor;
use super::client::GraphClient;
use super::result::{DataResult, ExecutionResult};
use super::space::Space;
use super::vertex_api::{render_each, try_data, try_result};
use crate::core::error::{MapperError, MapperResult};
use crate::core::value::DataSet;
use crate::query::command::edge as edge_cmd;
use crate::query::command::search::{
    count, edge_identity_projection, edge_projection, fetch_edge, fetch_vertices_piped, go_from,
    lookup_edge, vertex_projection,
};
use crate::query::command::{pipeline, UpdateFields, DST_COLUMN, SRC_COLUMN};
use crate::query::decode::{count_from, eids_from, load_edge_row};
use crate::query::identity::{check_edge_descriptor, eid_with, Eid};
use crate::schema::{EndpointAccess, EndpointCache, Entity, EntityDescriptor};
use std::collections::HashMap;

/// 描述符并校验边结构
pub(crate) fn edge_descriptor<T: Entity>() -> MapperResult<EntityDescriptor<T>> {
    let descriptor = T::describe();
    check_edge_descriptor(&descriptor)?;
    Ok(descriptor)
}

/// `<edge query> | YIELD src($-.e) AS src, dst($-.e) AS dst[, rank], properties($-.e).p AS p, ...`
pub fn edge_query_command<T>(descriptor: &EntityDescriptor<T>, edge_query: &str) -> String {
    pipeline(&[
        edge_query,
        &edge_projection(&descriptor.property_names(), descriptor.has_rank()),
    ])
}

/// `LOOKUP ON <edge> [WHERE <q>] YIELD EDGE AS e`，类型须为边
pub fn lookup_edges_command<T: Entity>(predicate: Option<&str>) -> MapperResult<String> {
    let descriptor = edge_descriptor::<T>()?;
    let name = edge_cmd::require_edge(&descriptor)?;
    Ok(lookup_edge(name, predicate))
}

/// 端点预取语句；端点类型没有标签名时无法预取
fn endpoint_prefetch_command<T>(endpoint: &dyn EndpointAccess<T>, edge_command: &str, column: &str) -> Option<String> {
    let tag = endpoint.vertex_tag()?;
    let fetch = fetch_vertices_piped(tag, column);
    let projection = vertex_projection(&endpoint.vertex_property_names());
    Some(pipeline(&[edge_command, &fetch, &projection]))
}

/// 预取结果与边结果合并后的提交语句
fn merge_commands(result: &mut ExecutionResult, mut other: ExecutionResult) -> Option<ExecutionResult> {
    result.commands.append(&mut other.commands);
    if other.ok() {
        return None;
    }
    other.commands = std::mem::take(&mut result.commands);
    Some(other)
}

impl<'a, C: GraphClient> Space<'a, C> {
    pub fn insert_edge<T: Entity>(&self, edge: &T) -> ExecutionResult {
        self.insert_edges(std::slice::from_ref(edge))
    }

    /// 所有边渲染为一条插入语句
    pub fn insert_edges<T: Entity>(&self, edges: &[T]) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        self.execute_rendered(edge_cmd::insert_statement(&descriptor, edges))
    }

    pub fn batch_insert_edges<T: Entity>(&self, edges: &[T]) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        BatchExecutor::new(self, "insert edges").run(edges, |chunk| {
            Ok(vec![edge_cmd::insert_statement(&descriptor, chunk)?])
        })
    }

    pub fn update_edge<T: Entity>(&self, edge: &T) -> ExecutionResult {
        self.update_edge_fields(edge, &UpdateFields::NonDefault)
    }

    pub fn update_edge_fields<T: Entity>(&self, edge: &T, fields: &UpdateFields) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        self.execute_rendered(edge_cmd::update_statement(&descriptor, edge, fields))
    }

    /// 每条边一条更新语句，在一次调用中执行
    pub fn update_edges<T: Entity>(&self, edges: &[T]) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        self.execute_all_rendered(render_each(edges, |e| {
            edge_cmd::update_statement(&descriptor, e, &UpdateFields::NonDefault)
        }))
    }

    pub fn batch_update_edges<T: Entity>(&self, edges: &[T]) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        BatchExecutor::new(self, "update edges").run(edges, |chunk| {
            render_each(chunk, |e| {
                edge_cmd::update_statement(&descriptor, e, &UpdateFields::NonDefault)
            })
        })
    }

    pub fn upsert_edge<T: Entity>(&self, edge: &T) -> ExecutionResult {
        self.upsert_edge_fields(edge, &UpdateFields::NonDefault)
    }

    pub fn upsert_edge_fields<T: Entity>(&self, edge: &T, fields: &UpdateFields) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        self.execute_rendered(edge_cmd::upsert_statement(&descriptor, edge, fields))
    }

    pub fn upsert_edges<T: Entity>(&self, edges: &[T]) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        self.execute_all_rendered(render_each(edges, |e| {
            edge_cmd::upsert_statement(&descriptor, e, &UpdateFields::NonDefault)
        }))
    }

    pub fn batch_upsert_edges<T: Entity>(&self, edges: &[T]) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        BatchExecutor::new(self, "upsert edges").run(edges, |chunk| {
            render_each(chunk, |e| {
                edge_cmd::upsert_statement(&descriptor, e, &UpdateFields::NonDefault)
            })
        })
    }

    pub fn delete_edges<T: Entity>(&self, edges: &[T]) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        self.execute_rendered(edge_cmd::delete_statement(&descriptor, edges))
    }

    pub fn batch_delete_edges<T: Entity>(&self, edges: &[T]) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        BatchExecutor::new(self, "delete edges").run(edges, |chunk| {
            Ok(vec![edge_cmd::delete_statement(&descriptor, chunk)?])
        })
    }

    pub fn delete_edges_by_eids(&self, eids: &[Eid]) -> ExecutionResult {
        self.execute_rendered(edge_cmd::delete_by_eids_statement(eids))
    }

    /// 删除两个顶点之间 rank 为 0 的该类型边
    pub fn delete_edges_between<T: Entity>(&self, from: &str, to: &str) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        let name = try_result!(edge_cmd::require_edge(&descriptor));
        self.delete_edges_by_eids(&[Eid::new(from, to, name)])
    }

    /// 删除满足谓词的全部该类型边，谓词为空时删除全部
    pub fn delete_all_edges<T: Entity>(&self, predicate: Option<&str>) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        let lookup = try_result!(lookup_edges_command::<T>(predicate));
        let query = pipeline(&[&lookup, edge_identity_projection(descriptor.has_rank())]);
        self.delete_edges_by_query::<T>(&query)
    }

    /// 查询须产出 `src`/`dst` 列，带 rank 的边还须产出 `edgerank`
    pub fn delete_edges_by_query<T: Entity>(&self, query: &str) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        self.execute_rendered(edge_cmd::delete_by_query_statement(&descriptor, query))
    }

    /// 对任意产出 `e` 的边查询追加投影，预取端点后解码
    pub fn query_edges<T: Entity>(&self, edge_query: &str) -> DataResult<Vec<T>> {
        let descriptor = try_data!(edge_descriptor::<T>());
        let (result, rows) = self.fetch_edge_rows(&descriptor, edge_query);
        let Some((data, mut from_cache, mut to_cache)) = rows else {
            return DataResult::without_data(result);
        };
        let edges = data
            .iter_rows()
            .map(|row| {
                let mut edge = T::default();
                load_edge_row(&descriptor, &row, &mut from_cache, &mut to_cache, &mut edge);
                edge
            })
            .collect();
        DataResult::with_data(result, edges)
    }

    /// 以 eid 文本为键
    pub fn query_edge_map<T: Entity>(&self, edge_query: &str) -> DataResult<HashMap<String, T>> {
        let descriptor = try_data!(edge_descriptor::<T>());
        let DataResult { result, data } = self.query_edges::<T>(edge_query);
        match data {
            Some(edges) => {
                let map = edges
                    .into_iter()
                    .map(|e| (eid_with(&descriptor, &e).to_string(), e))
                    .collect();
                DataResult::with_data(result, map)
            }
            None => DataResult::without_data(result),
        }
    }

    pub fn get_all_edges<T: Entity>(&self, predicate: Option<&str>) -> DataResult<HashMap<String, T>> {
        let lookup = try_data!(lookup_edges_command::<T>(predicate));
        self.query_edge_map(&lookup)
    }

    /// 按 eid 读取单条边，不存在时返回无数据错误
    pub fn get_edge<T: Entity>(&self, eid: &Eid) -> DataResult<T> {
        let DataResult { result, data } = self.query_edges::<T>(&fetch_edge(eid));
        match data.and_then(|edges| edges.into_iter().next()) {
            Some(edge) => DataResult::with_data(result, edge),
            None if result.ok() => {
                let error = MapperError::no_data(&result.commands);
                DataResult::failed(result, error)
            }
            None => DataResult::without_data(result),
        }
    }

    /// 按实例自身的 eid 读取并覆盖其属性与端点
    pub fn load_edge<T: Entity>(&self, edge: &mut T) -> ExecutionResult {
        let descriptor = try_result!(edge_descriptor::<T>());
        let eid = eid_with(&descriptor, edge);
        let (mut result, rows) = self.fetch_edge_rows(&descriptor, &fetch_edge(&eid));
        let Some((data, mut from_cache, mut to_cache)) = rows else {
            return result;
        };
        match data.row(0) {
            Some(row) => load_edge_row(&descriptor, &row, &mut from_cache, &mut to_cache, edge),
            None => {
                let error = MapperError::no_data(&result.commands);
                result.error = Some(error);
                result.data_set = None;
            }
        }
        result
    }

    /// 满足谓词的全部该类型边的身份
    pub fn edge_ids<T: Entity>(&self, predicate: Option<&str>) -> DataResult<Vec<Eid>> {
        let descriptor = try_data!(edge_descriptor::<T>());
        let name = try_data!(edge_cmd::require_edge(&descriptor)).to_string();
        let lookup = try_data!(lookup_edges_command::<T>(predicate));
        let has_rank = descriptor.has_rank();
        let command = pipeline(&[&lookup, edge_identity_projection(has_rank)]);
        self.extract(&command, |data| eids_from(data, &name, has_rank))
    }

    /// `GO FROM "<vid>" OVER <edge> [WHERE ...] YIELD EDGE AS e` 的出边
    pub fn edges_from<T: Entity>(&self, vid: &str, predicate: Option<&str>) -> DataResult<Vec<T>> {
        let descriptor = try_data!(edge_descriptor::<T>());
        let name = try_data!(edge_cmd::require_edge(&descriptor));
        self.query_edges(&go_from(name, vid, predicate))
    }

    pub fn count_edges<T: Entity>(&self, predicate: Option<&str>) -> DataResult<i64> {
        let lookup = try_data!(lookup_edges_command::<T>(predicate));
        self.extract(&count(&lookup), count_from)
    }

    pub fn edge_exists<T: Entity>(&self, eid: &Eid) -> DataResult<bool> {
        let descriptor = try_data!(edge_descriptor::<T>());
        let command = pipeline(&[&fetch_edge(eid), edge_identity_projection(descriptor.has_rank())]);
        let result = self.execute_one(&command);
        if !result.ok() {
            return DataResult::without_data(result);
        }
        let exists = result.row_count() > 0;
        DataResult::with_data(result, exists)
    }

    /// 执行边查询并预取两端顶点
    ///
    /// # 返回
    /// - 合并后的执行结果，`commands` 含边查询与两次预取
    /// - 成功时附带边结果集与已填充的两个端点缓存
    fn fetch_edge_rows<T>(
        &self,
        descriptor: &EntityDescriptor<T>,
        edge_query: &str,
    ) -> (ExecutionResult, Option<(DataSet, EndpointCache, EndpointCache)>) {
        let command = edge_query_command(descriptor, edge_query);
        let mut result = self.execute_one(&command);
        if !result.ok() {
            return (result, None);
        }
        let data = result.data_set.clone().unwrap_or_default();

        let mut from_cache = EndpointCache::new();
        let mut to_cache = EndpointCache::new();
        if !data.is_empty() {
            let endpoints = [
                (descriptor.from_endpoint(), SRC_COLUMN, &mut from_cache),
                (descriptor.to_endpoint(), DST_COLUMN, &mut to_cache),
            ];
            for (endpoint, column, cache) in endpoints {
                let Some(endpoint) = endpoint else { continue };
                let Some(prefetch) = endpoint_prefetch_command(endpoint, &command, column) else {
                    continue;
                };
                let fetched = self.execute_one(&prefetch);
                if let Some(vertices) = fetched.data_set.as_ref() {
                    let seeded = endpoint.seed(vertices, cache);
                    log::debug!("端点 {} 预取 {} 个顶点", column, seeded);
                }
                if let Some(failed) = merge_commands(&mut result, fetched) {
                    return (failed, None);
                }
            }
        }
        (result, Some((data, from_cache, to_cache)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_mock::MockClient;
    use crate::core::value::Value;
    use crate::schema::Property;
    use std::sync::Arc;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Team {
        vid: String,
        name: String,
    }

    impl Entity for Team {
        fn describe() -> EntityDescriptor<Self> {
            EntityDescriptor::<Self>::new()
                .tag("team")
                .vid(|t| &t.vid, |t| &mut t.vid)
                .property(Property::new("name"), |t| &t.name, |t| &mut t.name)
        }
    }

    #[derive(Debug, Default, Clone)]
    struct Serve {
        from: Arc<Team>,
        to: Arc<Team>,
        rank: i64,
        since: i64,
    }

    impl Entity for Serve {
        fn describe() -> EntityDescriptor<Self> {
            EntityDescriptor::<Self>::new()
                .edge("serve")
                .edge_from(|s| &s.from, |s| &mut s.from)
                .edge_to(|s| &s.to, |s| &mut s.to)
                .rank(|s| &s.rank, |s| &mut s.rank)
                .property(Property::new("since"), |s| &s.since, |s| &mut s.since)
        }
    }

    fn serve_rows() -> DataSet {
        DataSet::with_columns(["src", "dst", "edgerank", "since"])
            .with_row(vec![Value::from("a"), Value::from("b"), Value::Int(0), Value::Int(2001)])
            .with_row(vec![Value::from("a"), Value::from("c"), Value::Int(1), Value::Int(2010)])
    }

    fn team_rows(ids: &[(&str, &str)]) -> DataSet {
        let mut data = DataSet::with_columns(["vid", "name"]);
        for (vid, name) in ids {
            data.add_row(vec![Value::from(*vid), Value::from(*name)]);
        }
        data
    }

    #[test]
    fn test_query_prefetches_endpoints() {
        let client = MockClient::new();
        client
            .respond_when("LOOKUP ON serve", serve_rows())
            .respond_when("$-.src YIELD DISTINCT", team_rows(&[("a", "Alpha")]))
            .respond_when("$-.dst YIELD DISTINCT", team_rows(&[("b", "Beta")]));
        let space = Space::new(&client, "nba");

        let edges = space
            .get_all_edges::<Serve>(None)
            .into_result()
            .expect("查询成功");
        assert_eq!(client.execute_count(), 3);
        assert_eq!(
            client.statements()[1],
            "USE nba;LOOKUP ON serve YIELD EDGE AS e | \
             YIELD src($-.e) AS src, dst($-.e) AS dst, rank($-.e) AS edgerank, properties($-.e).since AS since | \
             FETCH PROP ON team $-.src YIELD DISTINCT VERTEX AS v | \
             YIELD id($-.v) AS vid, properties($-.v).name AS name;"
        );

        let ab = edges.get("\"a\"->\"b\"@0").expect("a->b 存在");
        let ac = edges.get("\"a\"->\"c\"@1").expect("a->c 存在");
        assert!(Arc::ptr_eq(&ab.from, &ac.from));
        assert_eq!(ab.from.name, "Alpha");
        assert_eq!(ab.to.name, "Beta");
        // c 不在预取结果中，只有 vid
        assert_eq!(ac.to.vid, "c");
        assert_eq!(ac.to.name, "");
        assert_eq!(ac.since, 2010);
    }

    #[test]
    fn test_prefetch_failure_aborts() {
        let client = MockClient::new();
        client
            .respond_when("LOOKUP ON serve", serve_rows())
            .fail_when("$-.dst YIELD DISTINCT", "storage error");
        let space = Space::new(&client, "nba");
        let result = space.query_edges::<Serve>("LOOKUP ON serve YIELD EDGE AS e");
        assert!(!result.ok());
        assert_eq!(result.commands().len(), 6);
    }

    #[test]
    fn test_get_edge_not_found() {
        let client = MockClient::new();
        let space = Space::new(&client, "nba");
        let eid = Eid::new("a", "z", "serve").with_rank(0);
        let missing = space.get_edge::<Serve>(&eid);
        assert!(missing.err().map_or(false, MapperError::is_no_data));
        assert_eq!(client.execute_count(), 1);
    }

    #[test]
    fn test_load_edge() {
        let client = MockClient::new();
        client.respond_when(
            "FETCH PROP ON serve",
            DataSet::with_columns(["src", "dst", "edgerank", "since"])
                .with_row(vec![Value::from("a"), Value::from("b"), Value::Int(3), Value::Int(1999)]),
        );
        let space = Space::new(&client, "nba");
        let mut serve = Serve {
            from: Arc::new(Team { vid: "a".into(), name: String::new() }),
            to: Arc::new(Team { vid: "b".into(), name: String::new() }),
            rank: 3,
            since: 0,
        };
        assert!(space.load_edge(&mut serve).ok());
        assert_eq!(serve.since, 1999);
        assert!(client.statements()[0].contains("FETCH PROP ON serve \"a\"->\"b\"@3 YIELD EDGE AS e"));
    }

    #[test]
    fn test_delete_all_ranked_edges() {
        let client = MockClient::new();
        let space = Space::new(&client, "nba");
        assert!(space.delete_all_edges::<Serve>(Some("serve.since < 2000")).ok());
        assert_eq!(
            client.statements(),
            vec!["USE nba;LOOKUP ON serve WHERE serve.since < 2000 YIELD EDGE AS e | \
                  YIELD src($-.e) AS src, dst($-.e) AS dst, rank($-.e) AS edgerank | \
                  DELETE EDGE serve $-.src -> $-.dst @ $-.edgerank;"]
        );
    }

    #[test]
    fn test_edge_ids_and_go_from() {
        let client = MockClient::new();
        client.respond_when(
            "rank($-.e) AS edgerank",
            DataSet::with_columns(["src", "dst", "edgerank"])
                .with_row(vec![Value::from("a"), Value::from("b"), Value::Int(2)]),
        );
        let space = Space::new(&client, "nba");
        assert_eq!(
            space.edge_ids::<Serve>(None).into_result(),
            Ok(vec![Eid::new("a", "b", "serve").with_rank(2)])
        );

        let out = space.edges_from::<Serve>("a", None).into_result().expect("查询成功");
        assert_eq!(out.len(), 1);
        assert!(client.count_matching("GO FROM \"a\" OVER serve YIELD EDGE AS e") >= 1);
    }

    #[test]
    fn test_vertex_type_rejected() {
        let client = MockClient::new();
        let space = Space::new(&client, "nba");
        let result = space.insert_edge(&Team::default());
        assert!(result.err().map_or(false, MapperError::is_classification));
    }
}
