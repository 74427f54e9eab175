//! 规则与反重复常量定义

/// 棋盘宽度（列数）
pub const BOARD_WIDTH: usize = 9;

/// 棋盘高度（行数）
pub const BOARD_HEIGHT: usize = 10;

/// 初始局面的文本表示（第 0 行为黑方底线，第 9 行为红方底线）
pub const INITIAL_BOARD_TEXT: &str =
    "rnbakabnr/........./.c.....c./p.p.p.p.p/........./........./P.P.P.P.P/.C.....C./........./RNBAKABNR";

/// 同一局面出现次数达到此值时，AI 必须强烈回避
pub const AVOID_THRESHOLD: u32 = 4;

/// 来回对走次数达到此值时施加惩罚
pub const PINGPONG_LIMIT: u32 = 5;

/// 同一方连续将军次数达到此值时施加惩罚
pub const CHECK_STREAK_LIMIT: u32 = 5;

/// 同一局面出现次数的提示上限（仅用于展示）
pub const REPETITION_LIMIT: u32 = 5;

/// 最近局面队列容量
pub const RECENT_KEYS_CAPACITY: usize = 40;

/// 发送给外部顾问的最近局面数量
pub const HINT_RECENT_KEYS: usize = 20;
