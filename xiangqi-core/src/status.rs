//! 终局判定

use serde::{Deserialize, Serialize};

use crate::attack::AttackOracle;
use crate::board::Board;
use crate::legality::has_any_legal_move;
use crate::piece::Color;

/// 对局状态（相对于轮到走子的一方）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// 对局进行中
    Ongoing,
    /// 被将死
    Checkmate,
    /// 困毙：未被将军但无子可动
    Stalemate,
}

impl GameStatus {
    /// 判定 `side_to_move` 一方的状态
    pub fn classify(board: &Board, side_to_move: Color) -> GameStatus {
        if has_any_legal_move(board, side_to_move) {
            GameStatus::Ongoing
        } else if AttackOracle::is_in_check(board, side_to_move) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    }

    /// 对局是否结束
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    /// 胜方：将死时为对方；困毙按和棋处理，没有胜方
    pub fn winner(&self, side_to_move: Color) -> Option<Color> {
        match self {
            GameStatus::Checkmate => Some(side_to_move.opponent()),
            GameStatus::Ongoing | GameStatus::Stalemate => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "ongoing"),
            GameStatus::Checkmate => write!(f, "checkmate"),
            GameStatus::Stalemate => write!(f, "stalemate"),
        }
    }
}
