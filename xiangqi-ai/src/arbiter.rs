//! 走法仲裁
//!
//! 按难度从启发式排名中选走法；配置了顾问时先问顾问，校验不过就回退。

use std::time::Duration;

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use xiangqi_core::{AdvisorRequest, AdvisorResponse, Difficulty, GameState, Move};

use crate::advisor::MoveAdvisor;
use crate::error::AdvisorError;
use crate::heuristic::{HeuristicScorer, ScoredMove};
use crate::search::{SearchConfig, Searcher};

/// 仲裁配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbiterConfig {
    pub difficulty: Difficulty,
    /// 简单难度：只在排名前这一比例的走法中随机
    pub keep_fraction: f64,
    /// 中等难度：softmax 温度
    pub temperature: f64,
    /// 困难难度：用浅层搜索代替直接取第一名
    pub use_search: bool,
    pub search_depth: u8,
    /// 等待顾问的上限（毫秒）
    pub advisor_timeout_ms: u64,
}

impl ArbiterConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            keep_fraction: 0.6,
            temperature: 1.2,
            use_search: difficulty == Difficulty::Hard,
            search_depth: 2,
            advisor_timeout_ms: 8000,
        }
    }
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// 走法来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionSource {
    Heuristic,
    Search,
    Advisor,
    /// 顾问失败或回答被拒绝
    Fallback,
}

/// 仲裁结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    pub mv: Move,
    /// 在合法走法列表中的下标
    pub index: usize,
    /// 该走法的启发式分数
    pub score: f64,
    pub source: DecisionSource,
}

impl Decision {
    fn from_scored(scored: &ScoredMove, source: DecisionSource) -> Self {
        Self {
            mv: scored.mv,
            index: scored.index,
            score: scored.score,
            source,
        }
    }
}

/// 走法仲裁器
pub struct MoveArbiter {
    config: ArbiterConfig,
    rng: ChaCha8Rng,
}

impl MoveArbiter {
    pub fn new(config: ArbiterConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// 固定随机种子，便于复现
    pub fn with_seed(config: ArbiterConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(ArbiterConfig::from_difficulty(difficulty))
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// 只用本地启发式/搜索选走法；无子可动时返回 `None`
    pub fn choose(&mut self, game: &GameState) -> Option<Decision> {
        let moves = game.legal_moves();
        if moves.is_empty() {
            return None;
        }
        let ranked = HeuristicScorer::rank(game.board(), game.side_to_move(), &moves, game.repetition());
        let decision = self.local_pick(game, &ranked)?;

        info!(
            "{} {} picks {} via {:?} (score {:.1})",
            game.side_to_move(),
            self.config.difficulty,
            decision.mv,
            decision.source,
            decision.score
        );
        Some(decision)
    }

    /// 先问顾问，校验失败、出错或超时都回退到最高分的非回避走法
    pub async fn choose_with_advisor(&mut self, game: &GameState, advisor: &dyn MoveAdvisor) -> Option<Decision> {
        let moves = game.legal_moves();
        if moves.is_empty() {
            return None;
        }
        let side = game.side_to_move();
        let ranked = HeuristicScorer::rank(game.board(), side, &moves, game.repetition());
        let suggestion = self.local_pick(game, &ranked)?;

        let request = AdvisorRequest::new(
            game.board(),
            side,
            &moves,
            game.repetition().hints(),
            self.config.difficulty,
            Some(suggestion.index),
        );

        let timeout_ms = self.config.advisor_timeout_ms;
        let answer = match tokio::time::timeout(Duration::from_millis(timeout_ms), advisor.advise(&request)).await {
            Ok(answer) => answer,
            Err(_) => Err(AdvisorError::Timeout(timeout_ms)),
        };

        let decision = match answer.and_then(|response| Self::validate(&response, &moves, &ranked)) {
            Ok(scored) => Decision::from_scored(scored, DecisionSource::Advisor),
            Err(e) => {
                warn!("Advisor {} rejected: {}", advisor.name(), e);
                let fallback = HeuristicScorer::best_unavoided(&ranked)?;
                Decision::from_scored(fallback, DecisionSource::Fallback)
            }
        };

        info!(
            "{} {} picks {} via {:?} (suggested #{}, score {:.1})",
            side, self.config.difficulty, decision.mv, decision.source, suggestion.index, decision.score
        );
        Some(decision)
    }

    /// 顾问的回答必须落在候选范围内，且走后局面不在回避列表中
    fn validate<'a>(
        response: &AdvisorResponse,
        moves: &[Move],
        ranked: &'a [ScoredMove],
    ) -> Result<&'a ScoredMove, AdvisorError> {
        let index = response
            .resolve(moves)
            .ok_or_else(|| AdvisorError::InvalidResponse(format!("{:?} is not one of {} candidates", response, moves.len())))?;

        let scored = ranked
            .iter()
            .find(|m| m.index == index)
            .ok_or_else(|| AdvisorError::InvalidResponse(format!("candidate #{} was not scored", index)))?;

        if scored.avoided {
            return Err(AdvisorError::InvalidResponse(format!(
                "{} repeats an avoid-listed position",
                scored.mv
            )));
        }
        Ok(scored)
    }

    /// 按难度从排名中选
    fn local_pick(&mut self, game: &GameState, ranked: &[ScoredMove]) -> Option<Decision> {
        if ranked.is_empty() {
            return None;
        }

        let decision = match self.config.difficulty {
            Difficulty::Easy => {
                let keep = ((ranked.len() as f64 * self.config.keep_fraction).floor() as usize).clamp(1, ranked.len());
                let pick = self.rng.gen_range(0..keep);
                debug!("Easy pick {} of top {}", pick, keep);
                Decision::from_scored(&ranked[pick], DecisionSource::Heuristic)
            }
            Difficulty::Medium => {
                let pick = self.softmax_pick(ranked);
                Decision::from_scored(&ranked[pick], DecisionSource::Heuristic)
            }
            Difficulty::Hard if self.config.use_search => {
                let mut searcher = Searcher::new(SearchConfig {
                    depth: self.config.search_depth,
                });
                let avoid = game.repetition().avoid_set();
                match searcher.search(game.board(), game.side_to_move(), &avoid) {
                    Some(result) => {
                        debug!(
                            "Search depth {} visited {} nodes, score {}",
                            self.config.search_depth, result.nodes, result.score
                        );
                        match ranked.iter().find(|m| m.mv == result.best_move) {
                            Some(scored) => Decision::from_scored(scored, DecisionSource::Search),
                            None => Decision::from_scored(HeuristicScorer::best_unavoided(ranked)?, DecisionSource::Heuristic),
                        }
                    }
                    None => Decision::from_scored(HeuristicScorer::best_unavoided(ranked)?, DecisionSource::Heuristic),
                }
            }
            Difficulty::Hard => Decision::from_scored(HeuristicScorer::best_unavoided(ranked)?, DecisionSource::Heuristic),
        };

        Some(decision)
    }

    /// softmax 抽样（先减去最大分，防止溢出）
    fn softmax_pick(&mut self, ranked: &[ScoredMove]) -> usize {
        let temperature = self.config.temperature.max(f64::EPSILON);
        let max = ranked.iter().map(|m| m.score).fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = ranked.iter().map(|m| ((m.score - max) / temperature).exp()).collect();

        match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(e) => {
                warn!("Softmax weights rejected ({}), taking top move", e);
                0
            }
        }
    }
}

impl Default for MoveArbiter {
    fn default() -> Self {
        Self::new(ArbiterConfig::default())
    }
}
