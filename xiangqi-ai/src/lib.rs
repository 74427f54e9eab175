//! 中国象棋 AI
//!
//! 包含:
//! - 子力评估
//! - 启发式打分（含反重复惩罚）
//! - Negamax + Alpha-Beta 浅层搜索
//! - 按难度仲裁走法
//! - 外部走法顾问（chat-completions，`llm` feature）

pub mod advisor;
mod arbiter;
mod error;
mod evaluate;
mod heuristic;
mod search;

pub use advisor::{AdvisorConfig, ChatAdvisor, MoveAdvisor};
pub use arbiter::{ArbiterConfig, Decision, DecisionSource, MoveArbiter};
pub use error::AdvisorError;
pub use evaluate::Evaluator;
pub use heuristic::{HeuristicScorer, ScoredMove, AVOID_PENALTY, CHECK_STREAK_PENALTY, PING_PONG_PENALTY};
pub use search::{SearchConfig, SearchResult, Searcher, MATE_SCORE};
pub use xiangqi_core::Difficulty;
