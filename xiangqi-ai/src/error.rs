//! 错误类型定义

use thiserror::Error;

/// 外部顾问错误
///
/// 都可以在本地恢复：仲裁器记录日志后回退到启发式走法。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    /// 未配置、网络或服务端错误
    #[error("Advisor unavailable: {0}")]
    Unavailable(String),

    /// 超过等待时间
    #[error("Advisor timed out after {0} ms")]
    Timeout(u64),

    /// 回答格式错误、越界或落入回避列表
    #[error("Invalid advisor response: {0}")]
    InvalidResponse(String),
}
