//! 映射层日志
//!
//! 映射层只通过 `log` 门面输出；是否落盘由使用方调用 `init` 决定。
//! 文件输出由 flexi_logger 异步写入，进程内只保留一个句柄。

use crate::config::LogConfig;
use crate::core::error::{MapperError, MapperResult};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use parking_lot::Mutex;

static HANDLE: Mutex<Option<LoggerHandle>> = parking_lot::const_mutex(None);

/// 按配置构造文件日志，不启动
fn file_logger(config: &LogConfig) -> MapperResult<Logger> {
    if config.file.trim().is_empty() {
        return Err(MapperError::Config("日志文件名不能为空".to_string()));
    }
    let logger = Logger::try_with_str(&config.level)
        .map_err(|e| MapperError::Config(format!("日志级别无效 {}: {}", config.level, e)))?;
    Ok(logger
        .log_to_file(
            FileSpec::default()
                .directory(&config.dir)
                .basename(&config.file),
        )
        .rotate(
            Criterion::Size(config.max_file_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.max_files),
        )
        .write_mode(WriteMode::Async)
        .append())
}

/// 启动文件日志
///
/// 已经初始化过时返回 `MapperError::Config`，需要先 `shutdown`。
///
/// ```no_run
/// use graphdb_mapper::config::Config;
/// use graphdb_mapper::utils::logging;
///
/// # fn main() -> graphdb_mapper::MapperResult<()> {
/// let config = Config::load("mapper.toml")?;
/// logging::init(&config.log)?;
/// # Ok(())
/// # }
/// ```
pub fn init(config: &LogConfig) -> MapperResult<()> {
    let mut guard = HANDLE.lock();
    if guard.is_some() {
        return Err(MapperError::Config("日志系统已经初始化".to_string()));
    }
    let handle = file_logger(config)?
        .start()
        .map_err(|e| MapperError::Config(format!("日志系统启动失败: {}", e)))?;
    *guard = Some(handle);
    drop(guard);

    log::info!("日志写入 {}/{} (级别 {})", config.dir, config.file, config.level);
    Ok(())
}

/// 写完缓冲的日志并释放句柄，返回之前是否已初始化
pub fn shutdown() -> bool {
    match HANDLE.lock().take() {
        Some(handle) => {
            handle.flush();
            true
        }
        None => false,
    }
}

pub fn is_initialized() -> bool {
    HANDLE.lock().is_some()
}
