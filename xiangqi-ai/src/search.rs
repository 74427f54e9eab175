//! 浅层搜索
//!
//! Negamax + Alpha-Beta 剪枝，固定深度，叶子节点只计子力。

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use xiangqi_core::{all_legal_moves, AttackOracle, Board, Color, Move, PositionKey};

use crate::evaluate::Evaluator;

/// 被将死的分值（再按剩余深度修正，越晚被将死越好）
pub const MATE_SCORE: i32 = 100_000;

/// 搜索配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub depth: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { depth: 2 }
    }
}

/// 搜索结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    /// 走子方视角的分值
    pub score: i32,
    pub nodes: u64,
}

/// 搜索器
pub struct Searcher {
    config: SearchConfig,
    nodes_searched: u64,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            nodes_searched: 0,
        }
    }

    /// 搜索最佳走法
    ///
    /// 走后局面在 `avoid` 中的根节点走法被跳过，除非全部根走法都在其中。
    pub fn search(&mut self, board: &Board, side: Color, avoid: &BTreeSet<PositionKey>) -> Option<SearchResult> {
        self.nodes_searched = 0;

        let moves = all_legal_moves(board, side);
        let allowed: Vec<Move> = moves
            .iter()
            .copied()
            .filter(|mv| !avoid.contains(&PositionKey::after_move(board, mv.from, mv.to, side)))
            .collect();
        let root_moves = if allowed.is_empty() { moves } else { allowed };

        let depth = self.config.depth.max(1);
        let mut best: Option<(Move, i32)> = None;
        let mut alpha = -MATE_SCORE - 1;
        let beta = MATE_SCORE + 1;

        for mv in root_moves {
            let next = board.with_move(mv.from, mv.to);
            let score = -self.alpha_beta(&next, side.opponent(), depth - 1, 1, -beta, -alpha);

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
            if score > alpha {
                alpha = score;
            }
        }

        best.map(|(best_move, score)| SearchResult {
            best_move,
            score,
            nodes: self.nodes_searched,
        })
    }

    /// Alpha-Beta 搜索（`side` 为当前走子方）
    fn alpha_beta(&mut self, board: &Board, side: Color, depth: u8, ply: i32, mut alpha: i32, beta: i32) -> i32 {
        self.nodes_searched += 1;

        let moves = all_legal_moves(board, side);

        // 无子可动
        if moves.is_empty() {
            return if AttackOracle::is_in_check(board, side) {
                -MATE_SCORE + ply
            } else {
                0
            };
        }

        if depth == 0 {
            return Evaluator::evaluate_for(board, side);
        }

        for mv in moves {
            let next = board.with_move(mv.from, mv.to);
            let score = -self.alpha_beta(&next, side.opponent(), depth - 1, ply + 1, -beta, -alpha);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}
