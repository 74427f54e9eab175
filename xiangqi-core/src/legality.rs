//! 合法性过滤：伪合法走法中去掉走后己方被将军的走法

use crate::attack::AttackOracle;
use crate::board::Board;
use crate::moves::{Move, MoveGenerator};
use crate::piece::{Color, Square};

/// 指定格子上 `color` 方棋子的合法目标格
///
/// 格子为空或棋子不属于 `color` 时返回空列表。
pub fn legal_moves(board: &Board, from: Square, color: Color) -> Vec<Square> {
    match board.get(from) {
        Some(piece) if piece.color == color => MoveGenerator::pseudo_legal_targets(board, from)
            .into_iter()
            .filter(|&to| is_safe_after(board, from, to, color))
            .collect(),
        _ => Vec::new(),
    }
}

/// `color` 方全部合法走法（按棋子行优先顺序）
pub fn all_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    MoveGenerator::pseudo_legal_moves(board, color)
        .into_iter()
        .filter(|mv| is_safe_after(board, mv.from, mv.to, color))
        .collect()
}

/// `color` 方是否至少有一个合法走法（找到即停）
pub fn has_any_legal_move(board: &Board, color: Color) -> bool {
    board.pieces(color).into_iter().any(|(from, _)| {
        MoveGenerator::pseudo_legal_targets(board, from)
            .into_iter()
            .any(|to| is_safe_after(board, from, to, color))
    })
}

/// 指定走法是否合法
pub fn is_legal(board: &Board, mv: Move, color: Color) -> bool {
    legal_moves(board, mv.from, color).contains(&mv.to)
}

fn is_safe_after(board: &Board, from: Square, to: Square, color: Color) -> bool {
    let next = board.with_move(from, to);
    !AttackOracle::is_in_check(&next, color)
}
