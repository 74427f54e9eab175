//! 中国象棋规则引擎
//!
//! 包含:
//! - 棋子、坐标、棋盘与局面键
//! - 伪合法走法生成、攻击判定与合法性过滤
//! - 终局判定（将死/困毙）
//! - 重复局面、来回对走与长将统计
//! - 对局状态（提交、撤销、联机回放）
//! - 走法顾问的请求/响应格式

mod attack;
mod board;
mod constants;
mod error;
mod game;
mod legality;
mod message;
mod moves;
mod piece;
mod record;
mod repetition;
mod status;

pub use attack::AttackOracle;
pub use board::{Board, PositionKey};
pub use constants::*;
pub use error::{Result, RulesError};
pub use game::{GameState, MoveOutcome, Snapshot};
pub use legality::{all_legal_moves, has_any_legal_move, is_legal, legal_moves};
pub use message::{AdvisorRequest, AdvisorResponse, Candidate, Difficulty};
pub use moves::{Move, MoveGenerator};
pub use piece::{Color, Piece, PieceKind, Square, CROSSED_SOLDIER_BONUS};
pub use record::MoveLogEntry;
pub use repetition::{CheckStreak, RepetitionHints, RepetitionTracker, RepetitionWarning};
pub use status::GameStatus;
