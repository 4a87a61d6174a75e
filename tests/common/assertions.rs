//! 自定义断言辅助模块
//!
//! 提供测试中的常用断言函数

use graphdb_mapper::{DataResult, ExecutionResult, MapperError};

/// 断言结果成功，返回内部值
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
    result.expect("操作应该成功")
}

/// 断言结果失败并匹配错误消息
pub fn assert_err_with<T: std::fmt::Debug, E: std::fmt::Display>(result: Result<T, E>, expected_msg: &str) {
    let err = result.expect_err("操作应该失败");
    let err_str = err.to_string();
    assert!(
        err_str.contains(expected_msg),
        "错误消息应包含 '{}', 实际是 '{}'",
        expected_msg,
        err_str
    );
}

/// 断言集合包含指定数量的元素
pub fn assert_count<T>(collection: &[T], expected: usize, item_name: &str) {
    assert_eq!(
        collection.len(),
        expected,
        "{}数量不匹配: 期望 {}, 实际 {}",
        item_name,
        expected,
        collection.len()
    );
}

/// 断言执行成功
pub fn assert_executed(result: &ExecutionResult) {
    assert!(
        result.ok(),
        "执行应该成功, 实际错误: {:?}, 语句: {:?}",
        result.err(),
        result.commands
    );
}

/// 断言执行失败，返回错误
pub fn assert_failed(result: &ExecutionResult) -> &MapperError {
    result.err().expect("执行应该失败")
}

/// 断言带数据的结果成功，返回数据
pub fn assert_data<T: std::fmt::Debug>(result: DataResult<T>) -> T {
    let DataResult { result, data } = result;
    assert!(
        result.ok(),
        "查询应该成功, 实际错误: {:?}, 语句: {:?}",
        result.err(),
        result.commands
    );
    data.expect("成功的查询应该带有数据")
}

/// 断言某条语句被提交过
pub fn assert_submitted(statements: &[String], expected: &str) {
    assert!(
        statements.iter().any(|s| s == expected),
        "未提交语句 '{}', 实际提交: {:#?}",
        expected,
        statements
    );
}

/// 断言 Option 是 Some 并返回内部值
pub fn assert_some<T>(opt: &Option<T>) -> &T {
    opt.as_ref().expect("值应该是 Some")
}

/// 断言 Option 是 None
pub fn assert_none<T>(opt: &Option<T>) {
    assert!(opt.is_none(), "值应该是 None");
}
