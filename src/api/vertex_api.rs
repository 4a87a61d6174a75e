//! 顶点操作
//!
//! 插入、更新、删除与查询，全部以实体类型为参数。
//! 带 `batch_` 前缀的操作按空间批大小分块顺序执行，首个失败批次终止。

use super::batch::BatchExecutor;
use super::client::GraphClient;
use super::result::{DataResult, ExecutionResult};
use super::space::Space;
use crate::core::error::{MapperError, MapperResult};
use crate::query::command::search::{
    count, fetch_vertex, lookup_vertex, vertex_projection, vertex_property_projection,
};
use crate::query::command::vertex as vertex_cmd;
use crate::query::command::{pipeline, UpdateFields, YIELD_VERTEX_VID};
use crate::query::decode::{count_from, decode_vertices, load_vertex_row, texts_from, vids_from};
use crate::query::identity::check_vertex_descriptor;
use crate::schema::{Entity, EntityDescriptor};
use std::collections::HashMap;

/// 描述符并校验顶点结构
pub(crate) fn vertex_descriptor<T: Entity>() -> MapperResult<EntityDescriptor<T>> {
    let descriptor = T::describe();
    check_vertex_descriptor(&descriptor)?;
    Ok(descriptor)
}

/// `<vertex query> | YIELD id($-.v) AS vid, properties($-.v).p AS p, ...`
pub fn vertex_query_command<T>(descriptor: &EntityDescriptor<T>, vertex_query: &str) -> String {
    pipeline(&[vertex_query, &vertex_projection(&descriptor.property_names())])
}

/// `LOOKUP ON <tag> [WHERE <q>] YIELD VERTEX AS v`，类型须为顶点
pub fn lookup_vertices_command<T: Entity>(predicate: Option<&str>) -> MapperResult<String> {
    let descriptor = vertex_descriptor::<T>()?;
    let tag = vertex_cmd::require_tag(&descriptor)?;
    Ok(lookup_vertex(tag, predicate))
}

macro_rules! try_result {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(e) => return ExecutionResult::from_error(e),
        }
    };
}

macro_rules! try_data {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(e) => return DataResult::from_error(e),
        }
    };
}

pub(crate) use try_data;
pub(crate) use try_result;

impl<'a, C: GraphClient> Space<'a, C> {
    pub fn insert_vertex<T: Entity>(&self, vertex: &T) -> ExecutionResult {
        self.insert_vertices(std::slice::from_ref(vertex))
    }

    /// 所有顶点渲染为一条插入语句
    pub fn insert_vertices<T: Entity>(&self, vertices: &[T]) -> ExecutionResult {
        let descriptor = try_result!(vertex_descriptor::<T>());
        self.execute_rendered(vertex_cmd::insert_statement(&descriptor, vertices))
    }

    /// 每批一条插入语句
    pub fn batch_insert_vertices<T: Entity>(&self, vertices: &[T]) -> ExecutionResult {
        let descriptor = try_result!(vertex_descriptor::<T>());
        BatchExecutor::new(self, "insert vertexes").run(vertices, |chunk| {
            Ok(vec![vertex_cmd::insert_statement(&descriptor, chunk)?])
        })
    }

    pub fn update_vertex<T: Entity>(&self, vertex: &T) -> ExecutionResult {
        self.update_vertex_fields(vertex, &UpdateFields::NonDefault)
    }

    /// 按给定的属性选择更新单个顶点
    pub fn update_vertex_fields<T: Entity>(&self, vertex: &T, fields: &UpdateFields) -> ExecutionResult {
        let descriptor = try_result!(vertex_descriptor::<T>());
        self.execute_rendered(vertex_cmd::update_statement(&descriptor, vertex, fields))
    }

    /// 每个顶点一条更新语句，在一次调用中执行
    pub fn update_vertices<T: Entity>(&self, vertices: &[T]) -> ExecutionResult {
        let descriptor = try_result!(vertex_descriptor::<T>());
        self.execute_all_rendered(render_each(vertices, |v| {
            vertex_cmd::update_statement(&descriptor, v, &UpdateFields::NonDefault)
        }))
    }

    pub fn batch_update_vertices<T: Entity>(&self, vertices: &[T]) -> ExecutionResult {
        let descriptor = try_result!(vertex_descriptor::<T>());
        BatchExecutor::new(self, "update vertexes").run(vertices, |chunk| {
            render_each(chunk, |v| {
                vertex_cmd::update_statement(&descriptor, v, &UpdateFields::NonDefault)
            })
        })
    }

    pub fn upsert_vertex<T: Entity>(&self, vertex: &T) -> ExecutionResult {
        self.upsert_vertex_fields(vertex, &UpdateFields::NonDefault)
    }

    pub fn upsert_vertex_fields<T: Entity>(&self, vertex: &T, fields: &UpdateFields) -> ExecutionResult {
        let descriptor = try_result!(vertex_descriptor::<T>());
        self.execute_rendered(vertex_cmd::upsert_statement(&descriptor, vertex, fields))
    }

    pub fn upsert_vertices<T: Entity>(&self, vertices: &[T]) -> ExecutionResult {
        let descriptor = try_result!(vertex_descriptor::<T>());
        self.execute_all_rendered(render_each(vertices, |v| {
            vertex_cmd::upsert_statement(&descriptor, v, &UpdateFields::NonDefault)
        }))
    }

    pub fn batch_upsert_vertices<T: Entity>(&self, vertices: &[T]) -> ExecutionResult {
        let descriptor = try_result!(vertex_descriptor::<T>());
        BatchExecutor::new(self, "upsert vertexes").run(vertices, |chunk| {
            render_each(chunk, |v| {
                vertex_cmd::upsert_statement(&descriptor, v, &UpdateFields::NonDefault)
            })
        })
    }

    pub fn delete_vertices<T: Entity>(&self, vertices: &[T]) -> ExecutionResult {
        let descriptor = try_result!(vertex_descriptor::<T>());
        self.execute_rendered(vertex_cmd::delete_statement(&descriptor, vertices, false))
    }

    /// 删除顶点及其所有出入边
    pub fn delete_vertices_with_edges<T: Entity>(&self, vertices: &[T]) -> ExecutionResult {
        let descriptor = try_result!(vertex_descriptor::<T>());
        self.execute_rendered(vertex_cmd::delete_statement(&descriptor, vertices, true))
    }

    pub fn batch_delete_vertices<T: Entity>(&self, vertices: &[T]) -> ExecutionResult {
        let descriptor = try_result!(vertex_descriptor::<T>());
        BatchExecutor::new(self, "delete vertexes").run(vertices, |chunk| {
            Ok(vec![vertex_cmd::delete_statement(&descriptor, chunk, false)?])
        })
    }

    pub fn delete_vertices_by_vids<S: AsRef<str>>(&self, vids: &[S], with_edge: bool) -> ExecutionResult {
        self.execute_rendered(vertex_cmd::delete_by_vids_statement(vids, with_edge))
    }

    /// 删除标签下满足谓词的全部顶点，谓词为空时删除全部
    pub fn delete_all_vertices<T: Entity>(&self, predicate: Option<&str>, with_edge: bool) -> ExecutionResult {
        let lookup = try_result!(lookup_vertices_command::<T>(predicate));
        self.delete_vertices_by_query(&pipeline(&[&lookup, YIELD_VERTEX_VID]), with_edge)
    }

    /// 查询须产出 `vid` 列
    pub fn delete_vertices_by_query(&self, query: &str, with_edge: bool) -> ExecutionResult {
        self.execute_one(&vertex_cmd::delete_by_query_statement(query, with_edge))
    }

    /// 按实例自身的 vid 读取并覆盖其属性
    pub fn load_vertex<T: Entity>(&self, vertex: &mut T) -> ExecutionResult {
        let descriptor = try_result!(vertex_descriptor::<T>());
        let vid = descriptor.vid_of(vertex);
        let command = try_result!(fetch_vertex_command(&descriptor, &vid));
        let fetched = self.query(&command);
        if let Some(row) = fetched.data.as_ref().and_then(|data| data.row(0)) {
            load_vertex_row(&descriptor, &row, vertex);
        }
        fetched.result
    }

    /// 按 vid 读取单个顶点，不存在时返回无数据错误
    pub fn get_vertex<T: Entity>(&self, vid: &str) -> DataResult<T> {
        let descriptor = try_data!(vertex_descriptor::<T>());
        let command = try_data!(fetch_vertex_command(&descriptor, vid));
        let fetched = self.query(&command);
        match fetched.data {
            Some(data) => {
                let vertex = decode_vertices(&descriptor, &data).into_iter().next();
                match vertex {
                    Some(vertex) => DataResult::with_data(fetched.result, vertex),
                    None => DataResult::without_data(fetched.result),
                }
            }
            None => DataResult::without_data(fetched.result),
        }
    }

    /// 满足谓词的全部顶点，以 vid 为键
    pub fn get_all_vertices<T: Entity>(&self, predicate: Option<&str>) -> DataResult<HashMap<String, T>> {
        let lookup = try_data!(lookup_vertices_command::<T>(predicate));
        self.query_vertex_map(&lookup)
    }

    /// 对任意产出 `v` 的顶点查询追加投影并解码
    pub fn query_vertices<T: Entity>(&self, vertex_query: &str) -> DataResult<Vec<T>> {
        let descriptor = try_data!(vertex_descriptor::<T>());
        let result = self.execute_one(&vertex_query_command(&descriptor, vertex_query));
        if !result.ok() {
            return DataResult::without_data(result);
        }
        let vertices = result
            .data_set
            .as_ref()
            .map(|data| decode_vertices(&descriptor, data))
            .unwrap_or_default();
        DataResult::with_data(result, vertices)
    }

    pub fn query_vertex_map<T: Entity>(&self, vertex_query: &str) -> DataResult<HashMap<String, T>> {
        let descriptor = try_data!(vertex_descriptor::<T>());
        let listed = self.query_vertices::<T>(vertex_query);
        let DataResult { result, data } = listed;
        match data {
            Some(vertices) => {
                let map = vertices
                    .into_iter()
                    .map(|v| (descriptor.vid_of(&v), v))
                    .collect();
                DataResult::with_data(result, map)
            }
            None => DataResult::without_data(result),
        }
    }

    /// 满足谓词的全部顶点 vid
    pub fn vertex_ids<T: Entity>(&self, predicate: Option<&str>) -> DataResult<Vec<String>> {
        let lookup = try_data!(lookup_vertices_command::<T>(predicate));
        self.extract(&pipeline(&[&lookup, YIELD_VERTEX_VID]), vids_from)
    }

    /// 满足谓词的顶点上某个属性的去重取值
    ///
    /// # 参数
    /// - `property` - 属性名，必须在实体上声明
    /// - `alias` - 结果列名，缺省为属性名
    pub fn vertex_property_values<T: Entity>(
        &self,
        predicate: Option<&str>,
        property: &str,
        alias: Option<&str>,
    ) -> DataResult<Vec<String>> {
        let descriptor = try_data!(vertex_descriptor::<T>());
        if descriptor.property_field(property).is_none() {
            return DataResult::from_error(MapperError::InvalidParameter(format!(
                "未声明的属性: {}",
                property
            )));
        }
        let lookup = try_data!(lookup_vertices_command::<T>(predicate));
        let alias = alias.filter(|a| !a.is_empty()).unwrap_or(property);
        let command = pipeline(&[&lookup, &vertex_property_projection(property, alias)]);
        self.extract(&command, |data| texts_from(data, alias))
    }

    pub fn count_vertices<T: Entity>(&self, predicate: Option<&str>) -> DataResult<i64> {
        let lookup = try_data!(lookup_vertices_command::<T>(predicate));
        self.count_by_query(&lookup)
    }

    /// `<query> | YIELD count(1) AS count`
    pub fn count_by_query(&self, query: &str) -> DataResult<i64> {
        self.extract(&count(query), count_from)
    }

    pub fn vertex_exists<T: Entity>(&self, vid: &str) -> DataResult<bool> {
        let descriptor = try_data!(vertex_descriptor::<T>());
        let tag = try_data!(vertex_cmd::require_tag(&descriptor));
        let command = pipeline(&[&fetch_vertex(tag, vid), YIELD_VERTEX_VID]);
        let result = self.execute_one(&command);
        if !result.ok() {
            return DataResult::without_data(result);
        }
        let exists = result.row_count() > 0;
        DataResult::with_data(result, exists)
    }

    pub fn vertex_exists_by_query<T: Entity>(&self, predicate: Option<&str>) -> DataResult<bool> {
        let DataResult { result, data } = self.count_vertices::<T>(predicate);
        match data {
            Some(n) => DataResult::with_data(result, n > 0),
            None => DataResult::without_data(result),
        }
    }

    /// 执行并用 `extract` 从结果集中取数据
    pub(crate) fn extract<R>(
        &self,
        command: &str,
        extract: impl FnOnce(&crate::core::value::DataSet) -> MapperResult<R>,
    ) -> DataResult<R> {
        let result = self.execute_one(command);
        if !result.ok() {
            return DataResult::without_data(result);
        }
        let extracted = match result.data_set.as_ref() {
            Some(data) => extract(data),
            None => extract(&crate::core::value::DataSet::new()),
        };
        match extracted {
            Ok(value) => DataResult::with_data(result, value),
            Err(e) => DataResult::failed(result, e),
        }
    }
}

fn fetch_vertex_command<T>(descriptor: &EntityDescriptor<T>, vid: &str) -> MapperResult<String> {
    if vid.is_empty() {
        return Err(MapperError::InvalidParameter("vid 不能为空".to_string()));
    }
    let tag = vertex_cmd::require_tag(descriptor)?;
    Ok(vertex_query_command(descriptor, &fetch_vertex(tag, vid)))
}

/// 逐个渲染，任一失败则整体失败
pub(crate) fn render_each<T>(
    items: &[T],
    render: impl Fn(&T) -> MapperResult<String>,
) -> MapperResult<Vec<String>> {
    if items.is_empty() {
        return Err(MapperError::InvalidParameter("没有需要处理的实体".to_string()));
    }
    items.iter().map(render).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_mock::MockClient;
    use crate::core::value::{DataSet, Value};
    use crate::schema::Property;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Player {
        vid: String,
        name: String,
        age: i64,
    }

    impl Entity for Player {
        fn describe() -> EntityDescriptor<Self> {
            EntityDescriptor::<Self>::new()
                .tag("player")
                .vid(|p| &p.vid, |p| &mut p.vid)
                .property(Property::new("name"), |p| &p.name, |p| &mut p.name)
                .property(Property::new("age"), |p| &p.age, |p| &mut p.age)
        }
    }

    #[derive(Debug, Default)]
    struct NotAVertex {
        note: String,
    }

    impl Entity for NotAVertex {
        fn describe() -> EntityDescriptor<Self> {
            EntityDescriptor::<Self>::new()
                .tag("note")
                .property(Property::new("note"), |n| &n.note, |n| &mut n.note)
        }
    }

    fn player(vid: &str, name: &str, age: i64) -> Player {
        Player {
            vid: vid.into(),
            name: name.into(),
            age,
        }
    }

    fn player_rows() -> DataSet {
        DataSet::with_columns(["vid", "name", "age"])
            .with_row(vec![Value::from("p1"), Value::from("Tim"), Value::Int(42)])
    }

    #[test]
    fn test_insert_requires_vertex_structure() {
        let client = MockClient::new();
        let space = Space::new(&client, "nba");
        let result = space.insert_vertex(&NotAVertex::default());
        assert_eq!(
            result.err(),
            Some(&MapperError::Classification("no vid field".into()))
        );
        assert_eq!(client.execute_count(), 0);
    }

    #[test]
    fn test_update_vertices_single_call() {
        let client = MockClient::new();
        let space = Space::new(&client, "nba");
        let result = space.update_vertices(&[player("p1", "Tim", 0), player("p2", "", 30)]);
        assert!(result.ok());
        assert_eq!(
            client.statements(),
            vec![
                "USE nba;UPDATE VERTEX ON player \"p1\" SET name = \"Tim\" YIELD name AS name;\
                 UPDATE VERTEX ON player \"p2\" SET age = 30 YIELD age AS age;"
            ]
        );
    }

    #[test]
    fn test_delete_all_by_tag() {
        let client = MockClient::new();
        let space = Space::new(&client, "nba");
        assert!(space.delete_all_vertices::<Player>(None, true).ok());
        assert_eq!(
            client.statements(),
            vec!["USE nba;LOOKUP ON player YIELD VERTEX AS v | YIELD id($-.v) AS vid | DELETE VERTEX $-.vid WITH EDGE;"]
        );
    }

    #[test]
    fn test_get_vertex() {
        let client = MockClient::new();
        client.respond_when("FETCH PROP ON player \"p1\"", player_rows());
        let space = Space::new(&client, "nba");

        let found = space.get_vertex::<Player>("p1").into_result().expect("p1 存在");
        assert_eq!(found, player("p1", "Tim", 42));
        assert_eq!(
            client.statements()[0],
            "USE nba;FETCH PROP ON player \"p1\" YIELD VERTEX AS v | \
             YIELD id($-.v) AS vid, properties($-.v).name AS name, properties($-.v).age AS age;"
        );

        let missing = space.get_vertex::<Player>("p9");
        assert!(missing.err().map_or(false, MapperError::is_no_data));
    }

    #[test]
    fn test_load_vertex_overwrites_properties() {
        let client = MockClient::new();
        client.respond_when("FETCH PROP ON player", player_rows());
        let space = Space::new(&client, "nba");
        let mut target = player("p1", "", 0);
        assert!(space.load_vertex(&mut target).ok());
        assert_eq!(target, player("p1", "Tim", 42));
    }

    #[test]
    fn test_get_all_vertices_keyed_by_vid() {
        let client = MockClient::new();
        client.respond_when(
            "LOOKUP ON player WHERE player.age>40",
            player_rows().with_row(vec![Value::from("p2"), Value::from("Tony"), Value::Int(41)]),
        );
        let space = Space::new(&client, "nba");
        let all = space
            .get_all_vertices::<Player>(Some("player.age>40"))
            .into_result()
            .expect("查询成功");
        assert_eq!(all.len(), 2);
        assert_eq!(all.get("p2").map(|p| p.age), Some(41));
    }

    #[test]
    fn test_ids_values_count_exists() {
        let client = MockClient::new();
        client
            .respond_when(
                "YIELD id($-.v) AS vid",
                DataSet::with_columns(["vid"]).with_row(vec![Value::from("p1")]),
            )
            .respond_when(
                "YIELD DISTINCT properties($-.v).name AS who",
                DataSet::with_columns(["who"]).with_row(vec![Value::from("Tim")]),
            )
            .respond_when(
                "count(1)",
                DataSet::with_columns(["count"]).with_row(vec![Value::Int(3)]),
            );
        let space = Space::new(&client, "nba");

        assert_eq!(space.vertex_ids::<Player>(None).into_result(), Ok(vec!["p1".to_string()]));
        assert_eq!(
            space
                .vertex_property_values::<Player>(None, "name", Some("who"))
                .into_result(),
            Ok(vec!["Tim".to_string()])
        );
        assert!(space
            .vertex_property_values::<Player>(None, "height", None)
            .err()
            .is_some());
        assert_eq!(space.count_vertices::<Player>(None).into_result(), Ok(3));
        assert_eq!(space.vertex_exists::<Player>("p1").into_result(), Ok(true));
        assert_eq!(space.vertex_exists_by_query::<Player>(None).into_result(), Ok(true));
    }
}
