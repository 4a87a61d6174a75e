//! 图空间会话门面
//!
//! 每次执行都以 `USE <space>;` 开头，各语句片段追加 `;` 后直接拼接，
//! 作为一次调用交给客户端。

use super::client::GraphClient;
use super::result::{DataResult, ExecutionResult};
use crate::config::{Config, DEFAULT_BATCH_SIZE};
use crate::core::error::{MapperError, MapperResult};
use crate::core::value::DataSet;

/// 绑定到一个图空间的会话
#[derive(Debug, Clone)]
pub struct Space<'a, C: GraphClient> {
    name: String,
    client: &'a C,
    batch_size: usize,
}

impl<'a, C: GraphClient> Space<'a, C> {
    pub fn new(client: &'a C, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// 使用配置中的空间名与批大小
    pub fn from_config(client: &'a C, config: &Config) -> Self {
        Self::new(client, config.space.clone()).with_batch_size(config.batch_size)
    }

    /// 设置每条批量语句包含的实体数，至少为 1
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn client(&self) -> &'a C {
        self.client
    }

    pub fn use_command(&self) -> String {
        format!("USE {}", self.name)
    }

    /// 在本空间内执行一组语句
    pub fn execute<S: AsRef<str>>(&self, statements: &[S]) -> ExecutionResult {
        let mut commands = Vec::with_capacity(statements.len() + 1);
        commands.push(format!("{};", self.use_command()));
        commands.extend(statements.iter().map(|s| format!("{};", s.as_ref())));
        run(self.client, commands)
    }

    pub fn execute_one(&self, statement: &str) -> ExecutionResult {
        self.execute(&[statement])
    }

    /// 执行查询并要求至少一行结果
    pub fn query(&self, statement: &str) -> DataResult<DataSet> {
        let result = self.execute_one(statement);
        if !result.ok() {
            return DataResult::without_data(result);
        }
        match result.data_set.clone() {
            Some(data) if !data.is_empty() => DataResult::with_data(result, data),
            _ => {
                let error = MapperError::no_data(&result.commands);
                DataResult::failed(result, error)
            }
        }
    }

    /// 执行渲染结果；渲染失败时不发出任何语句
    pub(crate) fn execute_rendered(&self, rendered: MapperResult<String>) -> ExecutionResult {
        match rendered {
            Ok(statement) => self.execute_one(&statement),
            Err(e) => ExecutionResult::from_error(e),
        }
    }

    pub(crate) fn execute_all_rendered(&self, rendered: MapperResult<Vec<String>>) -> ExecutionResult {
        match rendered {
            Ok(statements) => self.execute(&statements),
            Err(e) => ExecutionResult::from_error(e),
        }
    }

    /// `DESCRIBE SPACE <name>`
    pub fn describe(&self) -> ExecutionResult {
        self.execute_one(&format!("DESCRIBE SPACE {}", self.name))
    }
}

pub(crate) fn run(client: &impl GraphClient, commands: Vec<String>) -> ExecutionResult {
    let statement = commands.concat();
    log::debug!("执行语句: {}", statement);
    match client.execute(&statement) {
        Ok(data) => ExecutionResult::success(commands, Some(data)),
        Err(e) => {
            log::warn!("语句执行失败: {} ({})", statement, e);
            ExecutionResult::failure(commands, MapperError::execution(statement, e.to_string()))
        }
    }
}

/// 不依赖当前空间的语句，不加 `USE` 前缀
fn run_global(client: &impl GraphClient, statement: String) -> ExecutionResult {
    run(client, vec![format!("{};", statement)])
}

/// `CREATE SPACE IF NOT EXISTS <name>(partition_num = p, replica_factor = r, vid_type = t)`
pub fn create_space(
    client: &impl GraphClient,
    name: &str,
    vid_type: &str,
    partition_num: u32,
    replica_factor: u32,
) -> MapperResult<ExecutionResult> {
    if name.trim().is_empty() {
        return Err(MapperError::InvalidParameter("空间名不能为空".to_string()));
    }
    if partition_num == 0 || replica_factor == 0 {
        return Err(MapperError::InvalidParameter(
            "partition_num 与 replica_factor 必须大于 0".to_string(),
        ));
    }
    log::info!("创建图空间: {}", name);
    Ok(run_global(
        client,
        format!(
            "CREATE SPACE IF NOT EXISTS {}(partition_num = {}, replica_factor = {}, vid_type = {})",
            name, partition_num, replica_factor, vid_type
        ),
    ))
}

pub fn show_spaces(client: &impl GraphClient) -> ExecutionResult {
    run_global(client, "SHOW SPACES".to_string())
}

pub fn describe_space(client: &impl GraphClient, name: &str) -> ExecutionResult {
    run_global(client, format!("DESCRIBE SPACE {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_mock::MockClient;
    use crate::core::value::Value;

    #[test]
    fn test_execute_prefixes_use() {
        let client = MockClient::new();
        let space = Space::new(&client, "nba");
        let result = space.execute(&["SHOW TAGS", "SHOW EDGES"]);
        assert!(result.ok());
        assert_eq!(result.commands, vec!["USE nba;", "SHOW TAGS;", "SHOW EDGES;"]);
        assert_eq!(client.statements(), vec!["USE nba;SHOW TAGS;SHOW EDGES;"]);
    }

    #[test]
    fn test_failure_wraps_statement() {
        let client = MockClient::new();
        client.fail_when("BROKEN", "SyntaxError: near BROKEN");
        let space = Space::new(&client, "nba");
        let result = space.execute_one("BROKEN");
        match result.err() {
            Some(MapperError::Execution { statement, message }) => {
                assert_eq!(statement, "USE nba;BROKEN;");
                assert!(message.contains("SyntaxError"));
            }
            other => panic!("期望执行错误, 实际 {:?}", other),
        }
    }

    #[test]
    fn test_query_requires_rows() {
        let client = MockClient::new();
        let space = Space::new(&client, "nba");
        let empty = space.query("FETCH PROP ON player \"x\" YIELD VERTEX AS v");
        assert!(empty.err().map_or(false, MapperError::is_no_data));

        client.respond_when(
            "SHOW TAGS",
            DataSet::with_columns(["Name"]).with_row(vec![Value::from("player")]),
        );
        let tags = space.query("SHOW TAGS").into_result().expect("有结果");
        assert_eq!(tags.row_count(), 1);
    }

    #[test]
    fn test_create_space() {
        let client = MockClient::new();
        let result = create_space(&client, "demo", "FIXED_STRING(32)", 10, 1).expect("参数合法");
        assert!(result.ok());
        assert_eq!(
            client.statements(),
            vec!["CREATE SPACE IF NOT EXISTS demo(partition_num = 10, replica_factor = 1, vid_type = FIXED_STRING(32));"]
        );
        assert!(create_space(&client, "demo", "INT64", 0, 1).is_err());
    }

    #[test]
    fn test_batch_size_from_config() {
        let client = MockClient::new();
        let config = Config {
            space: "sns".to_string(),
            batch_size: 2,
            ..Config::default()
        };
        let space = Space::from_config(&client, &config);
        assert_eq!(space.name(), "sns");
        assert_eq!(space.batch_size(), 2);
    }
}
