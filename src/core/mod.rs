pub mod error;
pub mod types;
pub mod value;

// 错误和结果类型
pub use error::{MapperError, MapperResult};

// 核心数据类型
pub use types::{BasicType, ValueKind};
pub use value::*;
