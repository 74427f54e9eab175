//! 重复局面、来回对走与长将统计

use std::collections::{BTreeSet, HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, PositionKey};
use crate::constants::{
    AVOID_THRESHOLD, CHECK_STREAK_LIMIT, HINT_RECENT_KEYS, PINGPONG_LIMIT, RECENT_KEYS_CAPACITY,
};
use crate::moves::Move;
use crate::piece::Color;

/// 双方连续将军次数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckStreak {
    pub red: u32,
    pub black: u32,
}

impl CheckStreak {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::Red => self.red,
            Color::Black => self.black,
        }
    }

    fn update(&mut self, color: Color, gave_check: bool) {
        let streak = match color {
            Color::Red => &mut self.red,
            Color::Black => &mut self.black,
        };
        *streak = if gave_check { *streak + 1 } else { 0 };
    }
}

/// 提供给外部顾问的重复提示
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepetitionHints {
    /// 需回避的局面键（已排序）
    pub avoid_keys: Vec<PositionKey>,
    /// 最近的局面键（旧在前）
    pub recent_keys: Vec<PositionKey>,
    pub ping_pong_count: u32,
    pub check_streak: CheckStreak,
}

/// 磨棋/长将警告
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepetitionWarning {
    /// 某局面出现次数达到回避阈值
    RepeatedPosition { occurrences: u32 },
    /// 来回对走
    PingPong { count: u32 },
    /// 长将
    PerpetualCheck { side: Color, streak: u32 },
}

impl std::fmt::Display for RepetitionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepetitionWarning::RepeatedPosition { occurrences } => {
                write!(f, "position repeated {occurrences} times, vary the move")
            }
            RepetitionWarning::PingPong { count } => {
                write!(f, "pieces shuffled back and forth {count} times, vary the move")
            }
            RepetitionWarning::PerpetualCheck { side, streak } => {
                write!(f, "{side} has checked {streak} times in a row, vary the move")
            }
        }
    }
}

/// 重复局面跟踪器（每局一份）
#[derive(Debug, Clone, Default)]
pub struct RepetitionTracker {
    counts: HashMap<PositionKey, u32>,
    recent_keys: VecDeque<PositionKey>,
    ping_pong_count: u32,
    check_streak: CheckStreak,
    /// 最近一步（对方刚走）
    last_move: Option<Move>,
    /// 再前一步（己方上一步）
    prev_move: Option<Move>,
}

impl RepetitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空统计并记录开局局面
    pub fn start(&mut self, board: &Board, side_to_move: Color) {
        self.reset();
        self.touch(PositionKey::new(board, side_to_move));
    }

    /// 清空全部统计
    pub fn reset(&mut self) {
        self.counts.clear();
        self.recent_keys.clear();
        self.ping_pong_count = 0;
        self.check_streak = CheckStreak::default();
        self.last_move = None;
        self.prev_move = None;
    }

    /// 记录一步已提交的走法，返回走后局面键
    ///
    /// `board_after` 为走后棋盘，`gave_check` 表示这一步是否将军对方。
    pub fn record_move(&mut self, mv: Move, board_after: &Board, mover: Color, gave_check: bool) -> PositionKey {
        if self.reverses_own_previous(mv) {
            self.ping_pong_count += 1;
        } else {
            self.ping_pong_count = 0;
        }

        self.check_streak.update(mover, gave_check);

        self.prev_move = self.last_move.replace(mv);

        let key = PositionKey::new(board_after, mover.opponent());
        self.touch(key.clone());

        debug!(
            "Recorded {} {}: ping_pong={}, check_streak={}, occurrences={}",
            mover,
            mv,
            self.ping_pong_count,
            self.check_streak.get(mover),
            self.count(&key)
        );
        key
    }

    fn touch(&mut self, key: PositionKey) {
        *self.counts.entry(key.clone()).or_insert(0) += 1;
        self.recent_keys.push_back(key);
        while self.recent_keys.len() > RECENT_KEYS_CAPACITY {
            self.recent_keys.pop_front();
        }
    }

    /// 即将走子的一方走 `mv` 是否会延续来回对走（撤回己方上一步）
    pub fn reverses_own_previous(&self, mv: Move) -> bool {
        self.prev_move.is_some_and(|prev| prev.reversed() == mv)
    }

    /// 局面出现次数
    pub fn count(&self, key: &PositionKey) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// 出现次数达到回避阈值的所有局面
    pub fn avoid_set(&self) -> BTreeSet<PositionKey> {
        self.counts
            .iter()
            .filter(|(_, count)| **count >= AVOID_THRESHOLD)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// 指定局面是否需回避
    pub fn is_avoided(&self, key: &PositionKey) -> bool {
        self.count(key) >= AVOID_THRESHOLD
    }

    pub fn ping_pong_count(&self) -> u32 {
        self.ping_pong_count
    }

    /// 来回对走是否已达上限
    pub fn ping_pong_exceeded(&self) -> bool {
        self.ping_pong_count >= PINGPONG_LIMIT
    }

    pub fn check_streak(&self) -> CheckStreak {
        self.check_streak
    }

    /// 指定方连续将军是否已达上限
    pub fn check_streak_exceeded(&self, color: Color) -> bool {
        self.check_streak.get(color) >= CHECK_STREAK_LIMIT
    }

    /// 最近局面键（旧在前，最多 40 个）
    pub fn recent_keys(&self) -> impl Iterator<Item = &PositionKey> {
        self.recent_keys.iter()
    }

    /// 组装发给顾问的提示
    pub fn hints(&self) -> RepetitionHints {
        let skip = self.recent_keys.len().saturating_sub(HINT_RECENT_KEYS);
        RepetitionHints {
            avoid_keys: self.avoid_set().into_iter().collect(),
            recent_keys: self.recent_keys.iter().skip(skip).cloned().collect(),
            ping_pong_count: self.ping_pong_count,
            check_streak: self.check_streak,
        }
    }

    /// 当前最需要提示的警告（重复局面优先，其次来回对走，再次长将）
    pub fn warning(&self) -> Option<RepetitionWarning> {
        if let Some(occurrences) = self.counts.values().copied().filter(|&c| c >= AVOID_THRESHOLD).max() {
            return Some(RepetitionWarning::RepeatedPosition { occurrences });
        }
        if self.ping_pong_exceeded() {
            return Some(RepetitionWarning::PingPong {
                count: self.ping_pong_count,
            });
        }
        [Color::Red, Color::Black]
            .into_iter()
            .find(|&side| self.check_streak_exceeded(side))
            .map(|side| RepetitionWarning::PerpetualCheck {
                side,
                streak: self.check_streak.get(side),
            })
    }
}
