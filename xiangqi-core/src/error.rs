//! 错误类型定义

use thiserror::Error;

use crate::piece::Square;

/// 象棋规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// 棋盘文本格式错误
    #[error("Malformed board: {reason}")]
    MalformedBoard { reason: String },

    /// 坐标越界
    #[error("Invalid square: ({row}, {col})")]
    InvalidSquare { row: i32, col: i32 },

    /// 非法走法（不在合法走法列表中）
    #[error("Illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    /// 起点没有棋子
    #[error("No piece at {square}")]
    NoPiece { square: Square },

    /// 不是该方回合
    #[error("Not your turn")]
    NotYourTurn,

    /// 对局已结束
    #[error("Game is already over")]
    GameOver,

    /// 联机走法记录的步数不连续
    #[error("Ply out of order: expected {expected}, got {got}")]
    PlyOutOfOrder { expected: u32, got: u32 },
}

impl RulesError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        RulesError::MalformedBoard {
            reason: reason.into(),
        }
    }
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, RulesError>;
