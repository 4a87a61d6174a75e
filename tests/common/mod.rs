//! 集成测试共享工具模块
//!
//! 提供测试实体、结果行构造与断言辅助函数，供所有集成测试使用

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

use graphdb_mapper::api::MockClient;
use graphdb_mapper::Space;

/// 测试空间名
pub const TEST_SPACE: &str = "test_space";

/// 测试上下文，持有 Mock 客户端，按需借出空间句柄
pub struct TestContext {
    pub client: MockClient,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            client: MockClient::new(),
        }
    }

    /// 默认批大小的空间句柄
    pub fn space(&self) -> Space<'_, MockClient> {
        Space::new(&self.client, TEST_SPACE)
    }

    /// 指定批大小的空间句柄
    pub fn space_with_batch(&self, batch_size: usize) -> Space<'_, MockClient> {
        Space::new(&self.client, TEST_SPACE).with_batch_size(batch_size)
    }

    /// 带 `USE` 前缀的完整语句，与客户端收到的文本一致
    pub fn in_space(statement: &str) -> String {
        format!("USE {};{};", TEST_SPACE, statement)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
