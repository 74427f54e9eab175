//! 棋盘与局面键
//!
//! 文本格式：十行以 `/` 连接，每行九个字符；
//! 大写为红方，小写为黑方，`.` 为空位。
//! 字母对应：R=车 N=马 B=象 A=士 K=将 C=炮 P=兵。

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::error::RulesError;
use crate::piece::{Color, Piece, PieceKind, Square};

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// 10x9 棋盘，`squares[row][col]`
    squares: [[Option<Piece>; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: [[None; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// 创建初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Horse,
            PieceKind::Elephant,
            PieceKind::Advisor,
            PieceKind::General,
            PieceKind::Advisor,
            PieceKind::Elephant,
            PieceKind::Horse,
            PieceKind::Rook,
        ];

        for (color, home, cannon_row, soldier_row) in [(Color::Black, 0, 2, 3), (Color::Red, 9, 7, 6)] {
            // 底线：车马象士将士象马车
            for (col, kind) in back_rank.iter().enumerate() {
                board.put(home, col as u8, *kind, color);
            }
            // 炮
            board.put(cannon_row, 1, PieceKind::Cannon, color);
            board.put(cannon_row, 7, PieceKind::Cannon, color);
            // 兵/卒
            for col in (0..9).step_by(2) {
                board.put(soldier_row, col, PieceKind::Soldier, color);
            }
        }

        board
    }

    fn put(&mut self, row: u8, col: u8, kind: PieceKind, color: Color) {
        self.set(Square::new_unchecked(row, col), Some(Piece::new(kind, color)));
    }

    /// 获取指定位置的棋子
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares
            .get(square.row as usize)
            .and_then(|row| row.get(square.col as usize))
            .copied()
            .flatten()
    }

    /// 设置指定位置的棋子
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if let Some(cell) = self
            .squares
            .get_mut(square.row as usize)
            .and_then(|row| row.get_mut(square.col as usize))
        {
            *cell = piece;
        }
    }

    /// 移动棋子（不检查规则），返回被吃的棋子
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, piece);
        captured
    }

    /// 在副本上走一步（用于模拟）
    pub fn with_move(&self, from: Square, to: Square) -> Board {
        let mut next = self.clone();
        next.move_piece(from, to);
        next
    }

    /// 查找指定阵营的将/帅位置
    pub fn find_general(&self, color: Color) -> Option<Square> {
        self.occupied()
            .find(|(_, piece)| piece.kind == PieceKind::General && piece.color == color)
            .map(|(square, _)| square)
    }

    /// 遍历所有有子的格子（按行优先）
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |square| self.get(square).map(|piece| (square, piece)))
    }

    /// 获取指定阵营的所有棋子位置
    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        self.occupied()
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    /// 转换为文本格式
    pub fn to_text(&self) -> String {
        self.squares
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or('.', |piece| piece.to_char()))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// 从文本格式解析，格式错误时返回 `MalformedBoard`
    pub fn from_text(text: &str) -> Result<Board, RulesError> {
        let rows: Vec<&str> = text.split('/').collect();
        if rows.len() != BOARD_HEIGHT {
            return Err(RulesError::malformed(format!(
                "expected {} rows, got {}",
                BOARD_HEIGHT,
                rows.len()
            )));
        }

        let mut board = Board::empty();
        for (row_idx, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width != BOARD_WIDTH {
                return Err(RulesError::malformed(format!(
                    "row {} has {} columns, expected {}",
                    row_idx, width, BOARD_WIDTH
                )));
            }

            for (col_idx, c) in row.chars().enumerate() {
                if c == '.' {
                    continue;
                }
                let piece = Piece::from_char(c).ok_or_else(|| {
                    RulesError::malformed(format!("invalid piece character {c:?} in row {row_idx}"))
                })?;
                board.set(Square::new_unchecked(row_idx as u8, col_idx as u8), Some(piece));
            }
        }

        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Board {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_text(s)
    }
}

/// 局面键：`<棋盘文本>|<下一步走子方>`
///
/// 摆法相同且轮到同一方时键必然相同，用于重复局面检测。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionKey(String);

impl PositionKey {
    /// 计算局面键
    pub fn new(board: &Board, side_to_move: Color) -> Self {
        let mut key = board.to_text();
        key.push('|');
        key.push(side_to_move.to_char());
        Self(key)
    }

    /// 模拟一步后（轮到对方）的局面键
    pub fn after_move(board: &Board, from: Square, to: Square, mover: Color) -> Self {
        Self::new(&board.with_move(from, to), mover.opponent())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PositionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
