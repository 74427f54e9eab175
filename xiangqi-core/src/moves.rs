//! 伪合法走法生成（不考虑走后被将军）

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{Color, PieceKind, Square};

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始位置
    pub from: Square,
    /// 目标位置
    pub to: Square,
}

impl Move {
    /// 创建新走法
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// 反向走法
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// 四个正交方向
const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 四个斜向一步
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// 马的八个跳法及对应马腿（先走长轴方向的一格）
pub(crate) const HORSE_JUMPS: [((i8, i8), (i8, i8)); 8] = [
    ((-2, -1), (-1, 0)),
    ((-2, 1), (-1, 0)),
    ((2, -1), (1, 0)),
    ((2, 1), (1, 0)),
    ((-1, -2), (0, -1)),
    ((1, -2), (0, -1)),
    ((-1, 2), (0, 1)),
    ((1, 2), (0, 1)),
];

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成指定格子上棋子的所有伪合法目标格
    ///
    /// 空格返回空列表。己方棋子所在格永远不会出现在结果中。
    pub fn pseudo_legal_targets(board: &Board, from: Square) -> Vec<Square> {
        let mut targets = Vec::with_capacity(17);
        let Some(piece) = board.get(from) else {
            return targets;
        };

        let color = piece.color;
        match piece.kind {
            PieceKind::Rook => Self::generate_rook_targets(board, from, color, &mut targets),
            PieceKind::Cannon => Self::generate_cannon_targets(board, from, color, &mut targets),
            PieceKind::Horse => Self::generate_horse_targets(board, from, color, &mut targets),
            PieceKind::Elephant => Self::generate_elephant_targets(board, from, color, &mut targets),
            PieceKind::Advisor => Self::generate_advisor_targets(board, from, color, &mut targets),
            PieceKind::General => Self::generate_general_targets(board, from, color, &mut targets),
            PieceKind::Soldier => Self::generate_soldier_targets(board, from, color, &mut targets),
        }
        targets
    }

    /// 生成指定阵营的所有伪合法走法
    pub fn pseudo_legal_moves(board: &Board, color: Color) -> Vec<Move> {
        board
            .pieces(color)
            .into_iter()
            .flat_map(|(from, _)| {
                Self::pseudo_legal_targets(board, from)
                    .into_iter()
                    .map(move |to| Move::new(from, to))
            })
            .collect()
    }

    /// 车：沿四个方向滑行，遇子停止，敌子可吃
    fn generate_rook_targets(board: &Board, from: Square, color: Color, targets: &mut Vec<Square>) {
        for (dr, dc) in ORTHOGONAL {
            let mut current = from;
            while let Some(to) = current.offset(dr, dc) {
                if let Some(target) = board.get(to) {
                    if target.color != color {
                        targets.push(to);
                    }
                    break;
                }
                targets.push(to);
                current = to;
            }
        }
    }

    /// 炮：空位可平移；隔一个炮架后只能吃遇到的第一个子（且须为敌子）
    fn generate_cannon_targets(board: &Board, from: Square, color: Color, targets: &mut Vec<Square>) {
        for (dr, dc) in ORTHOGONAL {
            let mut current = from;
            let mut screened = false;

            while let Some(to) = current.offset(dr, dc) {
                match (board.get(to), screened) {
                    (None, false) => targets.push(to),
                    (None, true) => {}
                    (Some(_), false) => screened = true,
                    (Some(target), true) => {
                        if target.color != color {
                            targets.push(to);
                        }
                        break;
                    }
                }
                current = to;
            }
        }
    }

    /// 马：日字跳，马腿有子则该方向不可走
    fn generate_horse_targets(board: &Board, from: Square, color: Color, targets: &mut Vec<Square>) {
        for ((dr, dc), (lr, lc)) in HORSE_JUMPS {
            let Some(to) = from.offset(dr, dc) else {
                continue;
            };
            let Some(leg) = from.offset(lr, lc) else {
                continue;
            };
            if board.get(leg).is_some() {
                continue;
            }
            Self::try_add_target(board, to, color, targets);
        }
    }

    /// 象：田字跳，塞象眼不可走，不能过河
    fn generate_elephant_targets(board: &Board, from: Square, color: Color, targets: &mut Vec<Square>) {
        for (dr, dc) in DIAGONAL {
            let Some(to) = from.offset(dr * 2, dc * 2) else {
                continue;
            };
            if !to.on_own_side(color) {
                continue;
            }
            let Some(eye) = from.offset(dr, dc) else {
                continue;
            };
            if board.get(eye).is_some() {
                continue;
            }
            Self::try_add_target(board, to, color, targets);
        }
    }

    /// 士：九宫内斜走一步
    fn generate_advisor_targets(board: &Board, from: Square, color: Color, targets: &mut Vec<Square>) {
        for (dr, dc) in DIAGONAL {
            if let Some(to) = from.offset(dr, dc) {
                if to.in_palace(color) {
                    Self::try_add_target(board, to, color, targets);
                }
            }
        }
    }

    /// 将：九宫内直走一步；同列无遮挡时可直接吃对方将（飞将）
    fn generate_general_targets(board: &Board, from: Square, color: Color, targets: &mut Vec<Square>) {
        for (dr, dc) in ORTHOGONAL {
            if let Some(to) = from.offset(dr, dc) {
                if to.in_palace(color) {
                    Self::try_add_target(board, to, color, targets);
                }
            }
        }

        if let Some(enemy) = board.find_general(color.opponent()) {
            if enemy.col == from.col && Self::file_clear(board, from, enemy) && !targets.contains(&enemy) {
                targets.push(enemy);
            }
        }
    }

    /// 兵：过河前只能前进；过河后可左右平移，永不后退
    fn generate_soldier_targets(board: &Board, from: Square, color: Color, targets: &mut Vec<Square>) {
        if let Some(to) = from.offset(color.forward(), 0) {
            Self::try_add_target(board, to, color, targets);
        }

        if !from.on_own_side(color) {
            for dc in [-1i8, 1i8] {
                if let Some(to) = from.offset(0, dc) {
                    Self::try_add_target(board, to, color, targets);
                }
            }
        }
    }

    /// 目标格为空或为敌子时加入
    fn try_add_target(board: &Board, to: Square, color: Color, targets: &mut Vec<Square>) {
        match board.get(to) {
            Some(target) if target.color == color => {}
            _ => targets.push(to),
        }
    }

    /// 同列两点之间（不含端点）是否全空
    fn file_clear(board: &Board, a: Square, b: Square) -> bool {
        let (low, high) = if a.row < b.row { (a.row, b.row) } else { (b.row, a.row) };
        ((low + 1)..high).all(|row| board.get(Square::new_unchecked(row, a.col)).is_none())
    }
}
