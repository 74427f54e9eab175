//! 启发式打分
//!
//! 吃子价值 + 中心活跃度 + 兵前进奖励，再叠加反重复惩罚。

use serde::Serialize;
use xiangqi_core::{AttackOracle, Board, Color, Move, PieceKind, PositionKey, RepetitionTracker};

/// 走后局面在回避列表中的惩罚，压过其他所有项
pub const AVOID_PENALTY: f64 = 100_000.0;

/// 来回对走达到上限后，继续撤回己方上一步的惩罚
///
/// 只扣在撤回己方上一步的走法上，不是对全部候选一律扣分；连将惩罚同理，只扣将军的走法。
pub const PING_PONG_PENALTY: f64 = 500.0;

/// 连续将军达到上限后，继续将军的惩罚
pub const CHECK_STREAK_PENALTY: f64 = 800.0;

const SOLDIER_PUSH_BONUS: f64 = 6.0;
const CENTER_WEIGHT: f64 = 0.8;

/// 打过分的候选走法
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMove {
    /// 在原候选列表中的下标
    pub index: usize,
    pub mv: Move,
    pub score: f64,
    /// 走后局面键
    pub key: PositionKey,
    /// 走后局面是否在回避列表中
    pub avoided: bool,
}

/// 启发式打分器
pub struct HeuristicScorer;

impl HeuristicScorer {
    /// 给单个走法打分，`index` 为它在候选列表中的下标
    pub fn score_move(board: &Board, side: Color, index: usize, mv: Move, tracker: &RepetitionTracker) -> ScoredMove {
        let mut score = 0.0;

        if let Some(target) = board.get(mv.to) {
            if target.color != side {
                score += target.value_at(mv.to) as f64;
            }
        }

        let center_distance = (4.0 - mv.to.col as f64).abs() + (4.5 - mv.to.row as f64).abs();
        score += (8.0 - center_distance) * CENTER_WEIGHT;

        if let Some(mover) = board.get(mv.from) {
            let advance = mv.to.row as i8 - mv.from.row as i8;
            if mover.kind == PieceKind::Soldier && advance == side.forward() {
                score += SOLDIER_PUSH_BONUS;
            }
        }

        let next = board.with_move(mv.from, mv.to);
        let key = PositionKey::new(&next, side.opponent());
        let avoided = tracker.is_avoided(&key);
        if avoided {
            score -= AVOID_PENALTY;
        }
        if tracker.ping_pong_exceeded() && tracker.reverses_own_previous(mv) {
            score -= PING_PONG_PENALTY;
        }
        if tracker.check_streak_exceeded(side) && AttackOracle::is_in_check(&next, side.opponent()) {
            score -= CHECK_STREAK_PENALTY;
        }

        ScoredMove {
            index,
            mv,
            score,
            key,
            avoided,
        }
    }

    /// 给全部候选打分并按分数从高到低排序（同分保持原顺序）
    pub fn rank(board: &Board, side: Color, moves: &[Move], tracker: &RepetitionTracker) -> Vec<ScoredMove> {
        let mut ranked: Vec<ScoredMove> = moves
            .iter()
            .enumerate()
            .map(|(index, &mv)| Self::score_move(board, side, index, mv, tracker))
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// 排名最高且不在回避列表中的走法；全部被回避时取第一名
    pub fn best_unavoided(ranked: &[ScoredMove]) -> Option<&ScoredMove> {
        ranked.iter().find(|m| !m.avoided).or_else(|| ranked.first())
    }
}
