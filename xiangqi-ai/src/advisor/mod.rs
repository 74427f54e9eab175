//! 外部走法顾问
//!
//! 顾问只给建议，仲裁器负责校验与回退。

mod client;
mod parser;
mod prompt;

use async_trait::async_trait;
use xiangqi_core::{AdvisorRequest, AdvisorResponse};

use crate::error::AdvisorError;

pub use client::{AdvisorConfig, ChatAdvisor};
pub use parser::ResponseParser;
pub use prompt::{ChatMessage, PromptTemplate};

/// 走法顾问
#[async_trait]
pub trait MoveAdvisor: Send + Sync {
    /// 用于日志的名字
    fn name(&self) -> &str;

    /// 从候选中挑一个走法
    async fn advise(&self, request: &AdvisorRequest) -> Result<AdvisorResponse, AdvisorError>;
}
