//! 棋子、阵营与坐标定义

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::error::RulesError;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// 将/帅
    General,
    /// 士/仕
    Advisor,
    /// 象/相
    Elephant,
    /// 马/傌
    Horse,
    /// 车/俥
    Rook,
    /// 炮/砲
    Cannon,
    /// 兵/卒
    Soldier,
}

impl PieceKind {
    /// 获取棋子的基础分值（用于 AI 评估）
    pub fn value(&self) -> i32 {
        match self {
            PieceKind::General => 10000,
            PieceKind::Rook => 900,
            PieceKind::Cannon => 450,
            PieceKind::Horse => 400,
            PieceKind::Elephant => 200,
            PieceKind::Advisor => 200,
            PieceKind::Soldier => 100,
        }
    }

    /// 获取文本字符（红方大写，黑方小写）
    pub fn to_char(&self, color: Color) -> char {
        let c = match self {
            PieceKind::General => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Rook => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        };
        match color {
            Color::Red => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// 从文本字符解析
    pub fn from_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::Red
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::General,
            'a' => PieceKind::Advisor,
            'b' => PieceKind::Elephant,
            'n' => PieceKind::Horse,
            'r' => PieceKind::Rook,
            'c' => PieceKind::Cannon,
            'p' => PieceKind::Soldier,
            _ => return None,
        };
        Some((kind, color))
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// 红方（先手，在下方）
    Red,
    /// 黑方（后手，在上方）
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opponent(&self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// 兵/卒前进方向（行号增量）
    pub fn forward(&self) -> i8 {
        match self {
            Color::Red => -1,
            Color::Black => 1,
        }
    }

    /// 局面键中使用的字符
    pub fn to_char(&self) -> char {
        match self {
            Color::Red => 'r',
            Color::Black => 'b',
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    /// 创建新棋子
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// 获取文本字符
    pub fn to_char(&self) -> char {
        self.kind.to_char(self.color)
    }

    /// 从文本字符解析
    pub fn from_char(c: char) -> Option<Piece> {
        PieceKind::from_char(c).map(|(kind, color)| Piece { kind, color })
    }

    /// 棋子在指定位置的子力价值（过河兵额外加分）
    pub fn value_at(&self, square: Square) -> i32 {
        let bonus = if self.kind == PieceKind::Soldier && !square.on_own_side(self.color) {
            CROSSED_SOLDIER_BONUS
        } else {
            0
        };
        self.kind.value() + bonus
    }
}

/// 过河兵的额外分值
pub const CROSSED_SOLDIER_BONUS: i32 = 40;

/// 棋盘坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    /// 行 (0-9)，0 为黑方底线
    pub row: u8,
    /// 列 (0-8)
    pub col: u8,
}

impl Square {
    /// 创建新坐标
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_HEIGHT && (col as usize) < BOARD_WIDTH {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// 创建新坐标（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 从任意整数坐标创建（越界返回错误）
    pub fn try_from_coords(row: i64, col: i64) -> Result<Self, RulesError> {
        let invalid = || RulesError::InvalidSquare {
            row: row.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            col: col.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        };
        let row = u8::try_from(row).map_err(|_| invalid())?;
        let col = u8::try_from(col).map_err(|_| invalid())?;
        Self::new(row, col).ok_or_else(invalid)
    }

    /// 获取偏移后的坐标
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if row >= 0 && (row as usize) < BOARD_HEIGHT && col >= 0 && (col as usize) < BOARD_WIDTH {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// 是否在指定方的九宫内（列 3-5；黑方行 0-2，红方行 7-9）
    pub fn in_palace(&self, color: Color) -> bool {
        let in_col = (3..=5).contains(&self.col);
        let in_row = match color {
            Color::Black => self.row <= 2,
            Color::Red => (7..=9).contains(&self.row),
        };
        in_col && in_row
    }

    /// 是否在指定方的河界一侧（黑方行 ≤4，红方行 ≥5）
    pub fn on_own_side(&self, color: Color) -> bool {
        match color {
            Color::Black => self.row <= 4,
            Color::Red => self.row >= 5,
        }
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_WIDTH * BOARD_HEIGHT {
            Some(Square {
                row: (index / BOARD_WIDTH) as u8,
                col: (index % BOARD_WIDTH) as u8,
            })
        } else {
            None
        }
    }

    /// 以 `[row, col]` 形式输出
    pub fn to_pair(&self) -> [u8; 2] {
        [self.row, self.col]
    }

    /// 遍历全部 90 个坐标（按行优先）
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_WIDTH * BOARD_HEIGHT).filter_map(Square::from_index)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 解析联机走法记录中的 `"row,col"` 格式
impl FromStr for Square {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(|p| p.trim().parse::<i64>());
        match (parts.next(), parts.next(), parts.next()) {
            (Some(Ok(row)), Some(Ok(col)), None) => Square::try_from_coords(row, col),
            _ => Err(RulesError::malformed(format!("invalid square literal: {s:?}"))),
        }
    }
}
