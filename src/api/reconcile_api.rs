//! 比较并更新
//!
//! 读取现有实体，与期望集合比较后依次执行插入、更新、删除，每类都分批顺序执行。
//! 任一批次失败立即终止并返回已提交的语句，已完成的批次不回滚；
//! 失败后重新调用即可，新一轮比较只会补做剩余的差异。

use super::batch::BatchExecutor;
use super::client::GraphClient;
use super::result::{DataResult, ExecutionResult};
use super::space::Space;
use super::vertex_api::{render_each, try_data};
use crate::core::error::MapperResult;
use crate::query::command::{edge as edge_cmd, vertex as vertex_cmd, UpdateFields};
use crate::query::identity::{classify, identity_key, EntityClass};
use crate::reconcile::{compare_entries, CompareResult};
use crate::schema::{Entity, EntityDescriptor};
use std::collections::HashMap;

impl<'a, C: GraphClient> Space<'a, C> {
    /// 以切片给出期望集合；同一身份重复出现时后者覆盖前者
    ///
    /// # 参数
    /// - `desired` - 期望的实体集合
    /// - `predicate` - 读取现有实体时的 LOOKUP 条件，为空时读取该类型的全部实体
    /// - `keep_detail` - 为 false 时结果只保留各分类的计数
    pub fn compare_and_update<T: Entity>(
        &self,
        desired: Vec<T>,
        predicate: Option<&str>,
        keep_detail: bool,
    ) -> DataResult<CompareResult<T>> {
        let descriptor = T::describe();
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(desired.len());
        let mut entries: Vec<(String, T)> = Vec::with_capacity(desired.len());
        for entity in desired {
            let key = identity_key(&descriptor, &entity);
            match positions.get(&key) {
                Some(&pos) => entries[pos].1 = entity,
                None => {
                    positions.insert(key.clone(), entries.len());
                    entries.push((key, entity));
                }
            }
        }
        self.reconcile(&descriptor, entries, predicate, keep_detail)
    }

    /// 以身份键（顶点 vid，边 eid 文本）为键给出期望集合
    pub fn compare_and_update_map<T: Entity>(
        &self,
        desired: HashMap<String, T>,
        predicate: Option<&str>,
        keep_detail: bool,
    ) -> DataResult<CompareResult<T>> {
        let descriptor = T::describe();
        self.reconcile(&descriptor, desired.into_iter().collect(), predicate, keep_detail)
    }

    fn reconcile<T: Entity>(
        &self,
        descriptor: &EntityDescriptor<T>,
        desired: Vec<(String, T)>,
        predicate: Option<&str>,
        keep_detail: bool,
    ) -> DataResult<CompareResult<T>> {
        let class = try_data!(classify(descriptor));

        let current = match class {
            EntityClass::Vertex => self.get_all_vertices::<T>(predicate),
            EntityClass::Edge => self.get_all_edges::<T>(predicate),
        };
        let DataResult { result, data } = current;
        let Some(current) = data else {
            return DataResult::without_data(result);
        };
        let mut commands = result.commands;

        let compared = compare_entries(descriptor, current.into_iter().collect(), desired);
        let entity_name = descriptor
            .name()
            .map(|n| n.as_str().to_string())
            .unwrap_or_default();
        log::info!("比较 {}: {}", entity_name, compared.summary());

        // 插入、更新、删除依次执行，任一步失败即终止
        for step in ["insert", "update", "delete"] {
            let mut applied = match step {
                "insert" => self.insert_added(class, &compared),
                "update" => self.update_changed(class, descriptor, &compared),
                _ => self.delete_removed(class, &compared),
            };
            commands.append(&mut applied.commands);
            if let Some(error) = applied.error {
                log::warn!("{} 比较更新在 {} 阶段中止: {}", entity_name, step, error);
                return DataResult::without_data(ExecutionResult::failure(commands, error));
            }
        }

        let compared = if keep_detail {
            compared
        } else {
            compared.into_counts_only()
        };
        DataResult::with_data(ExecutionResult::success(commands, None), compared)
    }

    fn insert_added<T: Entity>(&self, class: EntityClass, compared: &CompareResult<T>) -> ExecutionResult {
        if compared.added.is_empty() {
            return ExecutionResult::success(Vec::new(), None);
        }
        match class {
            EntityClass::Vertex => self.batch_insert_vertices(&compared.added),
            EntityClass::Edge => self.batch_insert_edges(&compared.added),
        }
    }

    /// 每个实体只更新取值不同的属性，零值同样会被写入
    fn update_changed<T: Entity>(
        &self,
        class: EntityClass,
        descriptor: &EntityDescriptor<T>,
        compared: &CompareResult<T>,
    ) -> ExecutionResult {
        if compared.updated.is_empty() {
            return ExecutionResult::success(Vec::new(), None);
        }
        let operation = match class {
            EntityClass::Vertex => "update vertexes",
            EntityClass::Edge => "update edges",
        };
        let render = |entity: &T| -> MapperResult<String> {
            let fields = match compared.changed_properties.get(&identity_key(descriptor, entity)) {
                Some(names) => UpdateFields::Only(names.clone()),
                None => UpdateFields::only(descriptor.property_names()),
            };
            match class {
                EntityClass::Vertex => vertex_cmd::update_statement(descriptor, entity, &fields),
                EntityClass::Edge => edge_cmd::update_statement(descriptor, entity, &fields),
            }
        };
        BatchExecutor::new(self, operation).run(&compared.updated, |chunk| render_each(chunk, &render))
    }

    fn delete_removed<T: Entity>(&self, class: EntityClass, compared: &CompareResult<T>) -> ExecutionResult {
        if compared.deleted.is_empty() {
            return ExecutionResult::success(Vec::new(), None);
        }
        match class {
            EntityClass::Vertex => self.batch_delete_vertices(&compared.deleted),
            EntityClass::Edge => self.batch_delete_edges(&compared.deleted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_mock::MockClient;
    use crate::core::error::MapperError;
    use crate::core::value::{DataSet, Value};
    use crate::schema::Property;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Sensor {
        vid: String,
        level: i64,
    }

    impl Entity for Sensor {
        fn describe() -> EntityDescriptor<Self> {
            EntityDescriptor::<Self>::new()
                .tag("sensor")
                .vid(|s| &s.vid, |s| &mut s.vid)
                .property(Property::new("level"), |s| &s.level, |s| &mut s.level)
        }
    }

    #[derive(Debug, Default)]
    struct Loose {
        level: i64,
    }

    impl Entity for Loose {
        fn describe() -> EntityDescriptor<Self> {
            EntityDescriptor::<Self>::new().property(
                Property::new("level"),
                |l| &l.level,
                |l| &mut l.level,
            )
        }
    }

    fn sensor(vid: &str, level: i64) -> Sensor {
        Sensor {
            vid: vid.into(),
            level,
        }
    }

    #[test]
    fn test_neither_vertex_nor_edge_fails_before_query() {
        let client = MockClient::new();
        let space = Space::new(&client, "iot");
        let result = space.compare_and_update(vec![Loose::default()], None, true);
        assert!(result.err().map_or(false, MapperError::is_classification));
        assert_eq!(client.execute_count(), 0);
    }

    #[test]
    fn test_update_can_reset_to_zero() {
        let client = MockClient::new();
        client.respond_when(
            "LOOKUP ON sensor",
            DataSet::with_columns(["vid", "level"]).with_row(vec![Value::from("s1"), Value::Int(7)]),
        );
        let space = Space::new(&client, "iot");
        let compared = space
            .compare_and_update(vec![sensor("s1", 0)], None, false)
            .into_result()
            .expect("比较更新成功");
        assert_eq!(compared.counts.updated, 1);
        assert!(compared.updated.is_empty());
        assert_eq!(
            client.statements()[1],
            "USE iot;UPDATE VERTEX ON sensor \"s1\" SET level = 0 YIELD level AS level;"
        );
    }

    #[test]
    fn test_delete_failure_keeps_earlier_commands() {
        let client = MockClient::new();
        client
            .respond_when(
                "LOOKUP ON sensor",
                DataSet::with_columns(["vid", "level"]).with_row(vec![Value::from("old"), Value::Int(1)]),
            )
            .fail_when("DELETE VERTEX", "permission denied");
        let space = Space::new(&client, "iot");
        let result = space.compare_and_update(vec![sensor("new", 1)], None, true);
        assert_eq!(result.err().and_then(MapperError::failed_batch), Some(0));
        // 查询 + 插入 + 删除
        assert_eq!(client.execute_count(), 3);
        assert_eq!(result.commands().len(), 6);
    }
}
