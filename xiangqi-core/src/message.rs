//! 走法顾问的请求/响应格式

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::moves::Move;
use crate::piece::{Color, Square};
use crate::repetition::RepetitionHints;

/// AI 难度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 简单：从排名靠前的一部分走法中随机选
    Easy,
    /// 中等：按分数做 softmax 抽样
    #[default]
    Medium,
    /// 困难：取最高分或浅层搜索结果
    Hard,
}

impl Difficulty {
    /// 请求外部顾问时使用的采样温度
    pub fn advisor_temperature(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 0.7,
            Difficulty::Hard => 0.2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// 候选走法（`[row, col]` 坐标对）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub from: [u8; 2],
    pub to: [u8; 2],
}

impl From<Move> for Candidate {
    fn from(mv: Move) -> Self {
        Self {
            from: mv.from.to_pair(),
            to: mv.to.to_pair(),
        }
    }
}

impl Candidate {
    pub fn to_move(&self) -> Move {
        Move::new(
            Square::new_unchecked(self.from[0], self.from[1]),
            Square::new_unchecked(self.to[0], self.to[1]),
        )
    }
}

/// 发给顾问的请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorRequest {
    pub side: Color,
    /// 棋盘文本
    pub board: String,
    /// 全部合法走法，顾问返回其中一个下标
    pub candidates: Vec<Candidate>,
    pub repetition: RepetitionHints,
    pub difficulty: Difficulty,
    /// 本地启发式建议的下标（顾问可以不采纳）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_index: Option<usize>,
    pub temperature: f32,
}

impl AdvisorRequest {
    pub fn new(
        board: &Board,
        side: Color,
        moves: &[Move],
        repetition: RepetitionHints,
        difficulty: Difficulty,
        suggested_index: Option<usize>,
    ) -> Self {
        Self {
            side,
            board: board.to_text(),
            candidates: moves.iter().copied().map(Candidate::from).collect(),
            repetition,
            difficulty,
            suggested_index,
            temperature: difficulty.advisor_temperature(),
        }
    }
}

/// 顾问的回答：候选下标，或显式的起止坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdvisorResponse {
    Index { index: i64 },
    Squares { from: [i64; 2], to: [i64; 2] },
}

impl AdvisorResponse {
    /// 在候选列表中定位回答；越界或不在列表中返回 `None`
    pub fn resolve(&self, candidates: &[Move]) -> Option<usize> {
        match *self {
            AdvisorResponse::Index { index } => usize::try_from(index).ok().filter(|&i| i < candidates.len()),
            AdvisorResponse::Squares { from, to } => {
                let from = Square::try_from_coords(from[0], from[1]).ok()?;
                let to = Square::try_from_coords(to[0], to[1]).ok()?;
                candidates.iter().position(|mv| *mv == Move::new(from, to))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legality::all_legal_moves;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(" HARD ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Medium);
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), r#""medium""#);
    }

    #[test]
    fn test_request_contents() {
        let board = Board::initial();
        let moves = all_legal_moves(&board, Color::Red);
        let request = AdvisorRequest::new(
            &board,
            Color::Red,
            &moves,
            RepetitionHints::default(),
            Difficulty::Hard,
            Some(3),
        );

        assert_eq!(request.candidates.len(), 44);
        assert_eq!(request.candidates[0].to_move(), moves[0]);
        assert_eq!(request.temperature, 0.2);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["difficulty"], "hard");
        assert_eq!(json["suggested_index"], 3);
        assert_eq!(json["board"], board.to_text());
    }

    #[test]
    fn test_response_shapes() {
        let index: AdvisorResponse = serde_json::from_str(r#"{"index": 2}"#).unwrap();
        assert_eq!(index, AdvisorResponse::Index { index: 2 });

        let squares: AdvisorResponse = serde_json::from_str(r#"{"from":[9,1],"to":[7,2]}"#).unwrap();
        assert_eq!(
            squares,
            AdvisorResponse::Squares {
                from: [9, 1],
                to: [7, 2]
            }
        );

        assert!(serde_json::from_str::<AdvisorResponse>(r#"{"move":"h2e2"}"#).is_err());
        assert!(serde_json::from_str::<AdvisorResponse>(r#"{"index":"2"}"#).is_err());
        assert!(serde_json::from_str::<AdvisorResponse>(r#"{"index":1.5}"#).is_err());
    }

    #[test]
    fn test_response_resolve() {
        let board = Board::initial();
        let moves = all_legal_moves(&board, Color::Red);

        assert_eq!(AdvisorResponse::Index { index: 0 }.resolve(&moves), Some(0));
        assert_eq!(AdvisorResponse::Index { index: 44 }.resolve(&moves), None);
        assert_eq!(AdvisorResponse::Index { index: -1 }.resolve(&moves), None);

        let horse = Move::new(Square::new_unchecked(9, 1), Square::new_unchecked(7, 2));
        let expected = moves.iter().position(|m| *m == horse);
        assert!(expected.is_some());
        assert_eq!(
            AdvisorResponse::Squares {
                from: [9, 1],
                to: [7, 2]
            }
            .resolve(&moves),
            expected
        );
        assert_eq!(
            AdvisorResponse::Squares {
                from: [9, 1],
                to: [5, 1]
            }
            .resolve(&moves),
            None
        );
        assert_eq!(
            AdvisorResponse::Squares {
                from: [-3, 1],
                to: [7, 2]
            }
            .resolve(&moves),
            None
        );
    }
}
