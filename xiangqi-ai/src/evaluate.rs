//! 子力评估

use xiangqi_core::{Board, Color};

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 评估棋局（红方视角，正值对红方有利）
    ///
    /// 只计子力，过河兵按 `Piece::value_at` 额外加分。
    pub fn evaluate(board: &Board) -> i32 {
        board
            .occupied()
            .map(|(square, piece)| {
                let value = piece.value_at(square);
                match piece.color {
                    Color::Red => value,
                    Color::Black => -value,
                }
            })
            .sum()
    }

    /// 从指定方视角评估
    pub fn evaluate_for(board: &Board, color: Color) -> i32 {
        match color {
            Color::Red => Self::evaluate(board),
            Color::Black => -Self::evaluate(board),
        }
    }
}
