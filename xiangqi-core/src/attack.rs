//! 攻击判定
//!
//! 从目标格向外反查：沿直线数遮挡、检查反向马腿、象眼、九宫相邻与兵的来向。
//! 不依赖完整的走法生成，供合法性过滤与终局判定使用。

use crate::board::Board;
use crate::moves::HORSE_JUMPS;
use crate::piece::{Color, Piece, PieceKind, Square};

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// 攻击判定器
pub struct AttackOracle;

impl AttackOracle {
    /// `target` 是否被 `attacker` 方的任一棋子攻击
    ///
    /// 目标格为守方将帅、且与攻方将帅同列无遮挡时视为攻击（飞将）。
    pub fn is_square_attacked(board: &Board, target: Square, attacker: Color) -> bool {
        Self::attacked_along_lines(board, target, attacker)
            || Self::attacked_by_horse(board, target, attacker)
            || Self::attacked_by_elephant(board, target, attacker)
            || Self::attacked_by_advisor(board, target, attacker)
            || Self::attacked_by_general_step(board, target, attacker)
            || Self::attacked_by_soldier(board, target, attacker)
    }

    /// `color` 方是否被将军；没有将帅时视为被将军
    pub fn is_in_check(board: &Board, color: Color) -> bool {
        match board.find_general(color) {
            Some(general) => Self::is_square_attacked(board, general, color.opponent()),
            None => true,
        }
    }

    fn is_piece(piece: Option<Piece>, attacker: Color, kind: PieceKind) -> bool {
        matches!(piece, Some(p) if p.color == attacker && p.kind == kind)
    }

    fn holds_general(board: &Board, square: Square, color: Color) -> bool {
        Self::is_piece(board.get(square), color, PieceKind::General)
    }

    /// 车（无遮挡）、炮（恰好一个炮架）、飞将（同列无遮挡）
    fn attacked_along_lines(board: &Board, target: Square, attacker: Color) -> bool {
        for (dr, dc) in ORTHOGONAL {
            let mut blockers = 0;
            let mut current = target;

            while let Some(square) = current.offset(dr, dc) {
                current = square;
                let Some(piece) = board.get(square) else {
                    continue;
                };

                if piece.color == attacker {
                    let hit = match piece.kind {
                        PieceKind::Rook => blockers == 0,
                        PieceKind::Cannon => blockers == 1,
                        PieceKind::General => {
                            blockers == 0 && dc == 0 && Self::holds_general(board, target, attacker.opponent())
                        }
                        _ => false,
                    };
                    if hit {
                        return true;
                    }
                }

                blockers += 1;
                if blockers > 1 {
                    break;
                }
            }
        }
        false
    }

    /// 马：从可能的马位反推，马腿是马位向目标方向沿长轴的第一格
    fn attacked_by_horse(board: &Board, target: Square, attacker: Color) -> bool {
        HORSE_JUMPS.iter().any(|&((dr, dc), _)| {
            let Some(source) = target.offset(dr, dc) else {
                return false;
            };
            if !Self::is_piece(board.get(source), attacker, PieceKind::Horse) {
                return false;
            }
            let leg = if dr.abs() == 2 {
                source.offset(-dr.signum(), 0)
            } else {
                source.offset(0, -dc.signum())
            };
            leg.is_some_and(|leg| board.get(leg).is_none())
        })
    }

    /// 象：目标须在象方一侧，且象眼为空
    fn attacked_by_elephant(board: &Board, target: Square, attacker: Color) -> bool {
        if !target.on_own_side(attacker) {
            return false;
        }
        DIAGONAL.iter().any(|&(dr, dc)| {
            let (Some(source), Some(eye)) = (target.offset(dr * 2, dc * 2), target.offset(dr, dc)) else {
                return false;
            };
            Self::is_piece(board.get(source), attacker, PieceKind::Elephant) && board.get(eye).is_none()
        })
    }

    /// 士：目标须在士方九宫内，斜向相邻
    fn attacked_by_advisor(board: &Board, target: Square, attacker: Color) -> bool {
        if !target.in_palace(attacker) {
            return false;
        }
        DIAGONAL.iter().any(|&(dr, dc)| {
            target
                .offset(dr, dc)
                .is_some_and(|source| Self::is_piece(board.get(source), attacker, PieceKind::Advisor))
        })
    }

    /// 将：目标须在将方九宫内，正交相邻
    fn attacked_by_general_step(board: &Board, target: Square, attacker: Color) -> bool {
        if !target.in_palace(attacker) {
            return false;
        }
        ORTHOGONAL.iter().any(|&(dr, dc)| {
            target
                .offset(dr, dc)
                .is_some_and(|source| Self::is_piece(board.get(source), attacker, PieceKind::General))
        })
    }

    /// 兵：正面来自目标的后方一格（相对兵的前进方向）；过河兵还可从左右攻击
    fn attacked_by_soldier(board: &Board, target: Square, attacker: Color) -> bool {
        if let Some(source) = target.offset(-attacker.forward(), 0) {
            if Self::is_piece(board.get(source), attacker, PieceKind::Soldier) {
                return true;
            }
        }

        [-1i8, 1i8].iter().any(|&dc| {
            target.offset(0, dc).is_some_and(|source| {
                !source.on_own_side(attacker) && Self::is_piece(board.get(source), attacker, PieceKind::Soldier)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveGenerator;

    fn sq(row: u8, col: u8) -> Square {
        Square::new_unchecked(row, col)
    }

    fn place(board: &mut Board, row: u8, col: u8, kind: PieceKind, color: Color) {
        board.set(sq(row, col), Some(Piece::new(kind, color)));
    }

    #[test]
    fn test_initial_not_in_check() {
        let board = Board::initial();
        assert!(!AttackOracle::is_in_check(&board, Color::Red));
        assert!(!AttackOracle::is_in_check(&board, Color::Black));
    }

    #[test]
    fn test_missing_general_counts_as_check() {
        let board = Board::empty();
        assert!(AttackOracle::is_in_check(&board, Color::Red));
    }

    #[test]
    fn test_rook_attack_blocked() {
        let mut board = Board::empty();
        place(&mut board, 0, 4, PieceKind::General, Color::Black);
        place(&mut board, 9, 4, PieceKind::Rook, Color::Red);
        assert!(AttackOracle::is_square_attacked(&board, sq(0, 4), Color::Red));

        place(&mut board, 5, 4, PieceKind::Soldier, Color::Black);
        assert!(!AttackOracle::is_square_attacked(&board, sq(0, 4), Color::Red));
    }

    #[test]
    fn test_cannon_attack_needs_screen() {
        let mut board = Board::empty();
        place(&mut board, 0, 4, PieceKind::General, Color::Black);
        place(&mut board, 7, 4, PieceKind::Cannon, Color::Red);
        assert!(!AttackOracle::is_in_check(&board, Color::Black));

        place(&mut board, 3, 4, PieceKind::Soldier, Color::Black);
        assert!(AttackOracle::is_in_check(&board, Color::Black));

        place(&mut board, 2, 4, PieceKind::Advisor, Color::Black);
        assert!(!AttackOracle::is_in_check(&board, Color::Black));
    }

    #[test]
    fn test_flying_general() {
        let mut board = Board::empty();
        place(&mut board, 0, 4, PieceKind::General, Color::Black);
        place(&mut board, 9, 4, PieceKind::General, Color::Red);
        assert!(AttackOracle::is_in_check(&board, Color::Black));
        assert!(AttackOracle::is_in_check(&board, Color::Red));

        place(&mut board, 4, 4, PieceKind::Horse, Color::Red);
        assert!(!AttackOracle::is_in_check(&board, Color::Black));
        assert!(!AttackOracle::is_in_check(&board, Color::Red));
    }

    #[test]
    fn test_general_does_not_fly_along_rank() {
        let mut board = Board::empty();
        place(&mut board, 1, 3, PieceKind::General, Color::Red);
        assert!(!AttackOracle::is_square_attacked(&board, sq(1, 8), Color::Red));
    }

    #[test]
    fn test_horse_attack_and_leg() {
        let mut board = Board::empty();
        place(&mut board, 0, 4, PieceKind::General, Color::Black);
        place(&mut board, 2, 3, PieceKind::Horse, Color::Red);
        assert!(AttackOracle::is_in_check(&board, Color::Black));

        // 马腿在马与目标之间沿长轴的第一格 (1,3)
        place(&mut board, 1, 3, PieceKind::Advisor, Color::Black);
        assert!(!AttackOracle::is_in_check(&board, Color::Black));

        // 另一侧的格子不是马腿
        let mut board = Board::empty();
        place(&mut board, 0, 4, PieceKind::General, Color::Black);
        place(&mut board, 2, 3, PieceKind::Horse, Color::Red);
        place(&mut board, 1, 4, PieceKind::Advisor, Color::Black);
        assert!(AttackOracle::is_in_check(&board, Color::Black));
    }

    #[test]
    fn test_horse_horizontal_leg() {
        let mut board = Board::empty();
        place(&mut board, 0, 4, PieceKind::General, Color::Black);
        place(&mut board, 1, 6, PieceKind::Horse, Color::Red);
        assert!(AttackOracle::is_in_check(&board, Color::Black));

        place(&mut board, 1, 5, PieceKind::Advisor, Color::Black);
        assert!(!AttackOracle::is_in_check(&board, Color::Black));
    }

    #[test]
    fn test_elephant_attack_own_side_only() {
        let mut board = Board::empty();
        place(&mut board, 9, 2, PieceKind::Elephant, Color::Red);
        assert!(AttackOracle::is_square_attacked(&board, sq(7, 4), Color::Red));

        place(&mut board, 8, 3, PieceKind::Soldier, Color::Black);
        assert!(!AttackOracle::is_square_attacked(&board, sq(7, 4), Color::Red));

        let mut board = Board::empty();
        place(&mut board, 5, 2, PieceKind::Elephant, Color::Red);
        assert!(!AttackOracle::is_square_attacked(&board, sq(3, 4), Color::Red));
    }

    #[test]
    fn test_advisor_attack_in_palace() {
        let mut board = Board::empty();
        place(&mut board, 8, 4, PieceKind::Advisor, Color::Red);
        assert!(AttackOracle::is_square_attacked(&board, sq(9, 3), Color::Red));
        assert!(AttackOracle::is_square_attacked(&board, sq(7, 5), Color::Red));
        assert!(!AttackOracle::is_square_attacked(&board, sq(8, 5), Color::Red));
    }

    #[test]
    fn test_soldier_attack_direction() {
        // 红兵在 (5,4) 攻击 (4,4)，不攻击身后的 (6,4)
        let mut board = Board::empty();
        place(&mut board, 5, 4, PieceKind::Soldier, Color::Red);
        assert!(AttackOracle::is_square_attacked(&board, sq(4, 4), Color::Red));
        assert!(!AttackOracle::is_square_attacked(&board, sq(6, 4), Color::Red));
        // 未过河不能横向攻击
        assert!(!AttackOracle::is_square_attacked(&board, sq(5, 3), Color::Red));

        // 黑卒在 (4,4) 攻击 (5,4)
        let mut board = Board::empty();
        place(&mut board, 4, 4, PieceKind::Soldier, Color::Black);
        assert!(AttackOracle::is_square_attacked(&board, sq(5, 4), Color::Black));
        assert!(!AttackOracle::is_square_attacked(&board, sq(3, 4), Color::Black));
    }

    #[test]
    fn test_crossed_soldier_attacks_sideways() {
        let mut board = Board::empty();
        place(&mut board, 1, 4, PieceKind::Soldier, Color::Red);
        place(&mut board, 1, 3, PieceKind::General, Color::Black);
        assert!(AttackOracle::is_in_check(&board, Color::Black));

        let mut board = Board::empty();
        place(&mut board, 8, 5, PieceKind::Soldier, Color::Black);
        place(&mut board, 8, 4, PieceKind::General, Color::Red);
        assert!(AttackOracle::is_in_check(&board, Color::Red));
    }

    #[test]
    fn test_oracle_matches_generator() {
        // 守方棋子所在格上，攻击判定与伪合法目标格一致
        let boards = [
            Board::initial(),
            Board::from_text(
                "r.bakab.r/........./.cn..n.c./p.p.C.p.p/........./..P...P../P...p...P/.......C./........./RNBAKABNR",
            )
            .unwrap(),
            Board::from_text(
                "...k...../....a..../....b..../..R.n..../...P.c.../....p..../........./....B..../....A..../....K....",
            )
            .unwrap(),
        ];

        for board in &boards {
            for attacker in [Color::Red, Color::Black] {
                for target in Square::all() {
                    if !board.get(target).is_some_and(|p| p.color != attacker) {
                        continue;
                    }
                    let generated = board
                        .pieces(attacker)
                        .into_iter()
                        .any(|(from, _)| MoveGenerator::pseudo_legal_targets(board, from).contains(&target));
                    assert_eq!(
                        AttackOracle::is_square_attacked(board, target, attacker),
                        generated,
                        "mismatch at {target} for {attacker} on {board}"
                    );
                }
            }
        }
    }
}
