use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

// 配置错误在进入调度循环之前即为致命错误，其余错误都在尽可能小的范围内被隔离

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // 缺少必需的变量
    #[error("missing required variable: {0}")]
    MissingVar(&'static str),
    // 变量值无效
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidVar {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    // 目标目录不存在
    #[error("target directory does not exist: {}", .0.display())]
    TargetNotFound(PathBuf),
    // 目标路径不是目录
    #[error("target path is not a directory: {}", .0.display())]
    TargetNotDirectory(PathBuf),
    // 内部通用错误
    #[error("internal error: {0}")]
    Internal(String),
    // 包装 tokio 的 JoinError
    #[error("task join error: {0}")]
    TokioTaskJoin(#[from] tokio::task::JoinError),
    // 包装 std::io::Error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    // 包装 serde_json::Error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    // 包装 minreq::Error
    #[error("HTTP error: {0}")]
    Http(#[from] minreq::Error),
}

#[macro_export]
macro_rules! fail {
    ($msg:expr) => {
        $crate::errors::Error::Internal(format!($msg))
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::Error::Internal(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! err {
    ($msg:expr) => {
        Err($crate::fail!($msg))
    };
    ($fmt:expr, $($arg:tt)*) => {
        Err($crate::fail!($fmt, $($arg)*))
    };
}
