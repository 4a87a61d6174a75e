//! Schema 管理
//!
//! 标签、边及其索引的创建、删除、重建与修改。删除实体前先删除它名下的索引，
//! 索引归属按名字判断：等于默认整体索引名，或以它加 `_` 开头。

use super::client::GraphClient;
use super::result::{DataResult, ExecutionResult};
use super::space::Space;
use crate::core::error::MapperError;
use crate::query::decode::texts_from;
use crate::schema::{
    build_edge_schema, build_tag_schema, Entity, EntitySchema, IndexSchema, PropertySchema,
    SchemaKind,
};

/// `SHOW TAG|EDGE INDEXES` 结果中的索引名列
pub const INDEX_NAME_COLUMN: &str = "Index Name";

/// 索引是否属于默认索引名为 `default_index` 的实体
pub fn is_owned_index(index_name: &str, default_index: &str) -> bool {
    index_name == default_index
        || index_name
            .strip_prefix(default_index)
            .map_or(false, |rest| rest.starts_with('_'))
}

/// 先执行 `first`，成功后再执行 `then`，合并两者提交的语句
fn chain(mut first: ExecutionResult, then: impl FnOnce() -> ExecutionResult) -> ExecutionResult {
    if !first.ok() {
        return first;
    }
    let mut second = then();
    first.commands.append(&mut second.commands);
    second.commands = first.commands;
    second
}

impl<'a, C: GraphClient> Space<'a, C> {
    pub fn show_tags(&self) -> ExecutionResult {
        self.show_schemas(SchemaKind::Tag)
    }

    pub fn show_edges(&self) -> ExecutionResult {
        self.show_schemas(SchemaKind::Edge)
    }

    /// `SHOW TAGS` / `SHOW EDGES`
    pub fn show_schemas(&self, kind: SchemaKind) -> ExecutionResult {
        self.execute_one(&format!("SHOW {}S", kind))
    }

    /// 只创建标签或边本身
    pub fn create_schema(&self, schema: &EntitySchema) -> ExecutionResult {
        log::info!("创建{}: {}", schema.kind, schema.name);
        self.execute_one(&schema.create_statement())
    }

    /// 创建标签或边以及它的全部索引
    pub fn create_schema_with_indexes(&self, schema: &EntitySchema) -> ExecutionResult {
        log::info!(
            "创建{}及索引: {} ({} 个索引)",
            schema.kind,
            schema.name,
            schema.indexes.len()
        );
        let mut statements = vec![schema.create_statement()];
        statements.extend(schema.create_index_statements());
        self.execute(&statements)
    }

    pub fn drop_schema(&self, schema: &EntitySchema) -> ExecutionResult {
        log::info!("删除{}: {}", schema.kind, schema.name);
        self.execute_one(&schema.drop_statement())
    }

    /// 删除实体名下的所有索引，再删除实体
    pub fn drop_schema_with_indexes(&self, schema: &EntitySchema) -> ExecutionResult {
        let listed = self.index_names(schema);
        let names = match listed.data {
            Some(names) => names,
            None if listed.err().map_or(false, MapperError::is_no_data) => Vec::new(),
            None => return listed.result,
        };

        log::info!("删除{}及索引: {} {:?}", schema.kind, schema.name, names);
        let mut statements: Vec<String> = names
            .iter()
            .map(|name| format!("DROP {} INDEX IF EXISTS {}", schema.kind, name))
            .collect();
        statements.push(schema.drop_statement());

        let mut dropped = self.execute(&statements);
        let mut commands = listed.result.commands;
        commands.append(&mut dropped.commands);
        dropped.commands = commands;
        dropped
    }

    /// 删除后重新创建实体及其索引，已有数据随之清除
    pub fn rebuild_schema_with_indexes(&self, schema: &EntitySchema) -> ExecutionResult {
        chain(self.drop_schema_with_indexes(schema), || {
            self.create_schema_with_indexes(schema)
        })
    }

    /// `ALTER TAG|EDGE <name> ADD (...)`
    pub fn add_properties(&self, schema: &EntitySchema, properties: &[PropertySchema]) -> ExecutionResult {
        if properties.is_empty() {
            return ExecutionResult::from_error(MapperError::InvalidParameter(
                "没有需要添加的属性".to_string(),
            ));
        }
        self.execute_one(&schema.add_properties_statement(properties))
    }

    /// `ALTER TAG|EDGE <name> CHANGE (...)`
    pub fn change_properties(&self, schema: &EntitySchema, properties: &[PropertySchema]) -> ExecutionResult {
        if properties.is_empty() {
            return ExecutionResult::from_error(MapperError::InvalidParameter(
                "没有需要修改的属性".to_string(),
            ));
        }
        self.execute_one(&schema.change_properties_statement(properties))
    }

    /// `ALTER TAG|EDGE <name> DROP (...)`
    pub fn drop_properties(&self, schema: &EntitySchema, names: &[&str]) -> ExecutionResult {
        if names.is_empty() {
            return ExecutionResult::from_error(MapperError::InvalidParameter(
                "没有需要删除的属性".to_string(),
            ));
        }
        self.execute_one(&schema.drop_properties_statement(names))
    }

    pub fn describe_schema(&self, schema: &EntitySchema) -> ExecutionResult {
        self.execute_one(&schema.describe_statement())
    }

    /// `SHOW TAG|EDGE INDEXES`
    pub fn show_indexes(&self, kind: SchemaKind) -> ExecutionResult {
        self.execute_one(&format!("SHOW {} INDEXES", kind))
    }

    /// 库中属于该实体的索引名
    pub fn index_names(&self, schema: &EntitySchema) -> DataResult<Vec<String>> {
        let result = self.show_indexes(schema.kind);
        if !result.ok() {
            return DataResult::without_data(result);
        }
        let default_index = schema.default_index_name();
        let listed = match result.data_set.as_ref() {
            Some(data) => texts_from(data, INDEX_NAME_COLUMN),
            None => Ok(Vec::new()),
        };
        match listed {
            Ok(names) => {
                let owned: Vec<String> = names
                    .into_iter()
                    .filter(|n| is_owned_index(n, &default_index))
                    .collect();
                if owned.is_empty() {
                    let error = MapperError::no_data(&result.commands);
                    DataResult::failed(result, error)
                } else {
                    DataResult::with_data(result, owned)
                }
            }
            Err(e) => DataResult::failed(result, e),
        }
    }

    pub fn create_index(&self, index: &IndexSchema) -> ExecutionResult {
        log::info!("创建索引: {}", index.name);
        self.execute_one(&index.create_statement())
    }

    /// 按名字删除一组索引
    pub fn drop_indexes<S: AsRef<str>>(&self, kind: SchemaKind, names: &[S]) -> ExecutionResult {
        if names.is_empty() {
            return ExecutionResult::from_error(MapperError::InvalidParameter(
                "没有需要删除的索引".to_string(),
            ));
        }
        let statements: Vec<String> = names
            .iter()
            .map(|n| format!("DROP {} INDEX IF EXISTS {}", kind, n.as_ref()))
            .collect();
        self.execute(&statements)
    }

    /// `DESCRIBE TAG|EDGE INDEX <name>`
    pub fn describe_index(&self, kind: SchemaKind, name: &str) -> ExecutionResult {
        self.execute_one(&format!("DESCRIBE {} INDEX {}", kind, name))
    }

    pub fn rebuild_index(&self, index: &IndexSchema) -> ExecutionResult {
        log::info!("重建索引: {}", index.name);
        self.execute_one(&index.rebuild_statement())
    }

    /// `SHOW TAG|EDGE INDEX STATUS`
    pub fn show_index_status(&self, kind: SchemaKind) -> ExecutionResult {
        self.execute_one(&format!("SHOW {} INDEX STATUS", kind))
    }

    /// 派生标签 schema 并创建标签及索引
    pub fn create_tag_for<T: Entity>(&self) -> ExecutionResult {
        match build_tag_schema::<T>() {
            Some(schema) => self.create_schema_with_indexes(&schema),
            None => ExecutionResult::from_error(MapperError::Classification(format!(
                "no tag name: {}",
                std::any::type_name::<T>()
            ))),
        }
    }

    pub fn rebuild_tag_for<T: Entity>(&self) -> ExecutionResult {
        match build_tag_schema::<T>() {
            Some(schema) => self.rebuild_schema_with_indexes(&schema),
            None => ExecutionResult::from_error(MapperError::Classification(format!(
                "no tag name: {}",
                std::any::type_name::<T>()
            ))),
        }
    }

    /// 派生边 schema 并创建边及索引
    pub fn create_edge_for<T: Entity>(&self) -> ExecutionResult {
        match build_edge_schema::<T>() {
            Some(schema) => self.create_schema_with_indexes(&schema),
            None => ExecutionResult::from_error(MapperError::Classification(format!(
                "no edge name: {}",
                std::any::type_name::<T>()
            ))),
        }
    }

    pub fn rebuild_edge_for<T: Entity>(&self) -> ExecutionResult {
        match build_edge_schema::<T>() {
            Some(schema) => self.rebuild_schema_with_indexes(&schema),
            None => ExecutionResult::from_error(MapperError::Classification(format!(
                "no edge name: {}",
                std::any::type_name::<T>()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_mock::MockClient;
    use crate::core::types::BasicType;
    use crate::core::value::{DataSet, Value};
    use crate::schema::{EntityDescriptor, Property};

    #[derive(Debug, Default)]
    struct Shop {
        vid: String,
        name: String,
    }

    impl Entity for Shop {
        fn describe() -> EntityDescriptor<Self> {
            EntityDescriptor::<Self>::new()
                .tag("shop")
                .vid(|s| &s.vid, |s| &mut s.vid)
                .property(Property::new("name").indexes("1"), |s| &s.name, |s| &mut s.name)
        }
    }

    fn index_listing() -> DataSet {
        DataSet::with_columns(["Index Name", "By Tag", "Columns"])
            .with_row(vec![Value::from("tag_index_shop"), Value::from("shop"), Value::from("")])
            .with_row(vec![Value::from("tag_index_shop_name"), Value::from("shop"), Value::from("name")])
            .with_row(vec![Value::from("tag_index_shopping"), Value::from("shopping"), Value::from("")])
    }

    #[test]
    fn test_owned_index_matching() {
        assert!(is_owned_index("tag_index_shop", "tag_index_shop"));
        assert!(is_owned_index("tag_index_shop_name", "tag_index_shop"));
        assert!(!is_owned_index("tag_index_shopping", "tag_index_shop"));
    }

    #[test]
    fn test_create_tag_for() {
        let client = MockClient::new();
        let space = Space::new(&client, "mall");
        assert!(space.create_tag_for::<Shop>().ok());
        assert_eq!(
            client.statements(),
            vec![
                "USE mall;CREATE TAG IF NOT EXISTS shop(name STRING);\
                 CREATE TAG INDEX IF NOT EXISTS tag_index_shop ON shop();\
                 CREATE TAG INDEX IF NOT EXISTS tag_index_shop_name ON shop(name(100));"
            ]
        );
    }

    #[test]
    fn test_edge_helper_rejects_tag_type() {
        let client = MockClient::new();
        let space = Space::new(&client, "mall");
        let result = space.create_edge_for::<Shop>();
        assert!(result.err().map_or(false, MapperError::is_classification));
        assert_eq!(client.execute_count(), 0);
    }

    #[test]
    fn test_drop_with_indexes_only_touches_owned() {
        let client = MockClient::new();
        client.respond_when("SHOW TAG INDEXES", index_listing());
        let space = Space::new(&client, "mall");
        let schema = build_tag_schema::<Shop>().expect("shop 是标签");
        let result = space.drop_schema_with_indexes(&schema);
        assert!(result.ok());
        assert_eq!(
            client.statements()[1],
            "USE mall;DROP TAG INDEX IF EXISTS tag_index_shop;\
             DROP TAG INDEX IF EXISTS tag_index_shop_name;DROP TAG IF EXISTS shop;"
        );
    }

    #[test]
    fn test_rebuild_stops_after_failed_drop() {
        let client = MockClient::new();
        client.fail_when("SHOW TAG INDEXES", "meta unavailable");
        let space = Space::new(&client, "mall");
        let result = space.rebuild_tag_for::<Shop>();
        assert!(!result.ok());
        assert_eq!(client.execute_count(), 1);
    }

    #[test]
    fn test_alter_properties() {
        let client = MockClient::new();
        let space = Space::new(&client, "mall");
        let schema = build_tag_schema::<Shop>().expect("shop 是标签");
        let added = PropertySchema::new("rating", BasicType::DOUBLE);
        assert!(space.add_properties(&schema, &[added]).ok());
        assert!(space.drop_properties(&schema, &["rating"]).ok());
        assert!(!space.drop_properties(&schema, &[]).ok());
        assert_eq!(
            client.statements(),
            vec![
                "USE mall;ALTER TAG shop ADD (rating DOUBLE);",
                "USE mall;ALTER TAG shop DROP (rating);"
            ]
        );
    }
}
