//! 对局状态
//!
//! `GameState` 是一局棋唯一的可变聚合：棋盘、走子方、快照历史与重复统计。
//! 所有落子都经过 `commit_move`，联机回放与撤销也不例外。

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::attack::AttackOracle;
use crate::board::{Board, PositionKey};
use crate::error::{Result, RulesError};
use crate::legality::{all_legal_moves, legal_moves};
use crate::moves::Move;
use crate::piece::{Color, Piece, Square};
use crate::record::MoveLogEntry;
use crate::repetition::RepetitionTracker;
use crate::status::GameStatus;

/// 局面快照（棋盘 + 轮到谁走）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub side_to_move: Color,
}

/// 一步棋的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub mv: Move,
    /// 走完后的步数
    pub ply: u32,
    pub captured: Option<Piece>,
    /// 是否将军对方
    pub gives_check: bool,
    /// 走后轮到对方时的状态
    pub status: GameStatus,
    pub key: PositionKey,
}

/// 对局状态
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    status: GameStatus,
    /// `snapshots[i]` 为第 i 步之前的局面，末尾即当前局面
    snapshots: Vec<Snapshot>,
    moves: Vec<Move>,
    repetition: RepetitionTracker,
}

impl GameState {
    /// 从初始局面开始，红方先走
    pub fn new() -> Self {
        Self::from_position(Board::initial(), Color::Red)
    }

    /// 从任意局面开始
    pub fn from_position(board: Board, side_to_move: Color) -> Self {
        let mut repetition = RepetitionTracker::new();
        repetition.start(&board, side_to_move);
        let status = GameStatus::classify(&board, side_to_move);

        Self {
            snapshots: vec![Snapshot {
                board: board.clone(),
                side_to_move,
            }],
            board,
            side_to_move,
            status,
            moves: Vec::new(),
            repetition,
        }
    }

    /// 从棋盘文本开始
    pub fn from_text(text: &str, side_to_move: Color) -> Result<Self> {
        Ok(Self::from_position(Board::from_text(text)?, side_to_move))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// 胜方（困毙为和棋，无胜方）
    pub fn winner(&self) -> Option<Color> {
        self.status.winner(self.side_to_move)
    }

    /// 已走步数
    pub fn ply(&self) -> u32 {
        self.moves.len() as u32
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<Move> {
        self.moves.last().copied()
    }

    /// 全部快照，第一个为开局，最后一个为当前局面
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn repetition(&self) -> &RepetitionTracker {
        &self.repetition
    }

    /// 当前局面键
    pub fn position_key(&self) -> PositionKey {
        PositionKey::new(&self.board, self.side_to_move)
    }

    /// 走子方是否被将军
    pub fn is_in_check(&self) -> bool {
        AttackOracle::is_in_check(&self.board, self.side_to_move)
    }

    /// 走子方在指定格子上的合法目标格
    pub fn legal_moves_at(&self, square: Square) -> Vec<Square> {
        legal_moves(&self.board, square, self.side_to_move)
    }

    /// 走子方全部合法走法
    pub fn legal_moves(&self) -> Vec<Move> {
        all_legal_moves(&self.board, self.side_to_move)
    }

    /// 提交一步棋
    ///
    /// 校验失败时不修改任何状态。
    pub fn commit_move(&mut self, mv: Move) -> Result<MoveOutcome> {
        if self.status.is_terminal() {
            return Err(RulesError::GameOver);
        }

        let piece = self.board.get(mv.from).ok_or(RulesError::NoPiece { square: mv.from })?;
        if piece.color != self.side_to_move {
            return Err(RulesError::NotYourTurn);
        }
        if !self.legal_moves_at(mv.from).contains(&mv.to) {
            warn!("Rejected illegal move {} for {}", mv, self.side_to_move);
            return Err(RulesError::IllegalMove {
                from: mv.from,
                to: mv.to,
            });
        }

        let mover = self.side_to_move;
        let captured = self.board.move_piece(mv.from, mv.to);
        let opponent = mover.opponent();
        let gives_check = AttackOracle::is_in_check(&self.board, opponent);
        let key = self.repetition.record_move(mv, &self.board, mover, gives_check);

        self.side_to_move = opponent;
        self.status = GameStatus::classify(&self.board, opponent);
        self.moves.push(mv);
        self.snapshots.push(Snapshot {
            board: self.board.clone(),
            side_to_move: opponent,
        });

        debug!(
            "Ply {}: {} played {}, captured={:?}, check={}",
            self.ply(),
            mover,
            mv,
            captured.map(|p| p.kind),
            gives_check
        );
        if self.status.is_terminal() {
            info!("Game over after ply {}: {} ({} to move)", self.ply(), self.status, opponent);
        }

        Ok(MoveOutcome {
            mv,
            ply: self.ply(),
            captured,
            gives_check,
            status: self.status,
            key,
        })
    }

    /// 撤销一步，返回被撤销的走法
    pub fn undo(&mut self) -> Option<Move> {
        let last = self.last_move()?;
        self.rewind(self.moves.len() - 1);
        Some(last)
    }

    /// 撤销到指定步数（0 为开局），返回撤销的步数
    pub fn undo_to(&mut self, ply: u32) -> Result<usize> {
        let current = self.ply();
        if ply > current {
            return Err(RulesError::PlyOutOfOrder {
                expected: current,
                got: ply,
            });
        }
        let undone = (current - ply) as usize;
        if undone > 0 {
            self.rewind(ply as usize);
        }
        Ok(undone)
    }

    /// 截断到 `ply` 步，并按剩余历史重放重复统计
    fn rewind(&mut self, ply: usize) {
        self.moves.truncate(ply);
        self.snapshots.truncate(ply + 1);

        let Some(current) = self.snapshots.last() else {
            return;
        };
        self.board = current.board.clone();
        self.side_to_move = current.side_to_move;
        self.status = GameStatus::classify(&self.board, self.side_to_move);

        self.repetition.start(&self.snapshots[0].board, self.snapshots[0].side_to_move);
        for (mv, pair) in self.moves.iter().zip(self.snapshots.windows(2)) {
            let (before, after) = (&pair[0], &pair[1]);
            let gives_check = AttackOracle::is_in_check(&after.board, after.side_to_move);
            self.repetition.record_move(*mv, &after.board, before.side_to_move, gives_check);
        }

        debug!("Rewound to ply {}", ply);
    }

    /// 应用联机走法记录
    ///
    /// 已应用过的步（`ply` 不大于当前步数）被跳过并返回 `None`；跳步返回 `PlyOutOfOrder`。
    pub fn apply_log_entry(&mut self, entry: &MoveLogEntry) -> Result<Option<MoveOutcome>> {
        let current = self.ply();
        if entry.ply <= current {
            debug!("Skipping already applied ply {}", entry.ply);
            return Ok(None);
        }
        if entry.ply != current + 1 {
            return Err(RulesError::PlyOutOfOrder {
                expected: current + 1,
                got: entry.ply,
            });
        }
        self.commit_move(entry.mv()).map(Some)
    }

    /// 按顺序应用一批走法记录，返回新应用的结果
    pub fn apply_log<'a>(&mut self, entries: impl IntoIterator<Item = &'a MoveLogEntry>) -> Result<Vec<MoveOutcome>> {
        let mut applied = Vec::new();
        for entry in entries {
            if let Some(outcome) = self.apply_log_entry(entry)? {
                applied.push(outcome);
            }
        }
        Ok(applied)
    }

    /// 为下一步生成走法记录
    pub fn log_entry_for(&self, mv: Move) -> MoveLogEntry {
        MoveLogEntry::new(self.ply() + 1, mv)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;

    fn sq(row: u8, col: u8) -> Square {
        Square::new_unchecked(row, col)
    }

    fn mv(fr: u8, fc: u8, tr: u8, tc: u8) -> Move {
        Move::new(sq(fr, fc), sq(tr, tc))
    }

    #[test]
    fn test_new_game() {
        let game = GameState::new();
        assert_eq!(game.side_to_move(), Color::Red);
        assert_eq!(game.status(), GameStatus::Ongoing);
        assert_eq!(game.ply(), 0);
        assert_eq!(game.snapshots().len(), 1);
        assert_eq!(game.legal_moves().len(), 44);
        assert_eq!(game.repetition().count(&game.position_key()), 1);
    }

    #[test]
    fn test_commit_move() {
        let mut game = GameState::new();
        let outcome = game.commit_move(mv(7, 1, 7, 4)).unwrap();

        assert_eq!(outcome.ply, 1);
        assert!(outcome.captured.is_none());
        assert!(!outcome.gives_check);
        assert_eq!(outcome.status, GameStatus::Ongoing);
        assert_eq!(outcome.key, game.position_key());
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.snapshots().len(), 2);
    }

    #[test]
    fn test_capture_outcome() {
        // 当头炮打中卒
        let mut game = GameState::new();
        game.commit_move(mv(7, 7, 7, 4)).unwrap();
        game.commit_move(mv(0, 1, 2, 2)).unwrap();
        let outcome = game.commit_move(mv(7, 4, 3, 4)).unwrap();
        assert_eq!(outcome.captured.map(|p| p.kind), Some(PieceKind::Soldier));
        assert!(!outcome.gives_check);
    }

    #[test]
    fn test_check_outcome() {
        let board = Board::from_text(
            "....k..../........./........./........./........./...R...../........./........./........./...K.....",
        )
        .unwrap();
        let mut game = GameState::from_position(board, Color::Red);
        let outcome = game.commit_move(mv(5, 3, 5, 4)).unwrap();
        assert!(outcome.gives_check);
        assert_eq!(outcome.status, GameStatus::Ongoing);
        assert!(game.is_in_check());
        assert_eq!(game.repetition().check_streak().red, 1);
    }

    #[test]
    fn test_undo_rebuilds_check_streak() {
        let board = Board::from_text(
            "....k..../........./........./........./........./...R...../........./........./........./...K.....",
        )
        .unwrap();
        let mut game = GameState::from_position(board, Color::Red);
        for m in [
            mv(5, 3, 5, 4),
            mv(0, 4, 0, 5),
            mv(5, 4, 5, 5),
            mv(0, 5, 0, 4),
            mv(5, 5, 5, 4),
        ] {
            game.commit_move(m).unwrap();
        }
        let before = game.repetition().check_streak();
        assert_eq!(before.red, 3);

        game.commit_move(mv(0, 4, 0, 5)).unwrap();
        assert_eq!(game.undo(), Some(mv(0, 4, 0, 5)));
        assert_eq!(game.repetition().check_streak(), before);

        // 撤回最后一次将军，连将数回到 2
        assert_eq!(game.undo(), Some(mv(5, 5, 5, 4)));
        assert_eq!(game.repetition().check_streak().red, 2);
    }

    #[test]
    fn test_rejections_leave_state_unchanged() {
        let mut game = GameState::new();
        let before = game.snapshots().to_vec();

        assert_eq!(
            game.commit_move(mv(4, 4, 3, 4)),
            Err(RulesError::NoPiece { square: sq(4, 4) })
        );
        assert_eq!(game.commit_move(mv(3, 0, 4, 0)), Err(RulesError::NotYourTurn));
        assert_eq!(
            game.commit_move(mv(9, 0, 5, 0)),
            Err(RulesError::IllegalMove {
                from: sq(9, 0),
                to: sq(5, 0)
            })
        );

        assert_eq!(game.snapshots(), before.as_slice());
        assert_eq!(game.ply(), 0);
        assert_eq!(game.side_to_move(), Color::Red);
    }

    #[test]
    fn test_checkmate_ends_game() {
        let board = Board::from_text(
            "R...k..../........R/........./........./........./........./........./........./........./...K.....",
        )
        .unwrap();
        let mut game = GameState::from_position(board, Color::Black);
        assert_eq!(game.status(), GameStatus::Checkmate);
        assert_eq!(game.winner(), Some(Color::Red));
        assert_eq!(game.commit_move(mv(0, 4, 1, 4)), Err(RulesError::GameOver));
    }

    #[test]
    fn test_mating_move_reports_status() {
        // 红车从 (5,0) 沉底将死
        let board = Board::from_text(
            "....k..../........R/........./........./........./R......../........./........./........./...K.....",
        )
        .unwrap();
        let mut game = GameState::from_position(board, Color::Red);
        let outcome = game.commit_move(mv(5, 0, 0, 0)).unwrap();
        assert!(outcome.gives_check);
        assert_eq!(outcome.status, GameStatus::Checkmate);
        assert_eq!(game.winner(), Some(Color::Red));
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut game = GameState::new();
        let start = game.board().clone();
        game.commit_move(mv(9, 1, 7, 2)).unwrap();
        game.commit_move(mv(0, 1, 2, 2)).unwrap();

        assert_eq!(game.undo(), Some(mv(0, 1, 2, 2)));
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.ply(), 1);

        assert_eq!(game.undo(), Some(mv(9, 1, 7, 2)));
        assert_eq!(game.board(), &start);
        assert_eq!(game.side_to_move(), Color::Red);
        assert_eq!(game.undo(), None);
    }

    #[test]
    fn test_undo_replays_repetition_exactly() {
        let shuffle = [mv(9, 1, 7, 2), mv(0, 1, 2, 2), mv(7, 2, 9, 1), mv(2, 2, 0, 1)];

        let mut game = GameState::new();
        for _ in 0..3 {
            for m in shuffle {
                game.commit_move(m).unwrap();
            }
        }
        let mut reference = GameState::new();
        for _ in 0..2 {
            for m in shuffle {
                reference.commit_move(m).unwrap();
            }
        }
        for m in &shuffle[..3] {
            reference.commit_move(*m).unwrap();
        }

        let key = GameState::new().position_key();
        assert_eq!(game.repetition().count(&key), 4);

        game.undo();
        assert_eq!(game.repetition().count(&key), 3);
        assert_eq!(game.repetition().ping_pong_count(), reference.repetition().ping_pong_count());
        assert_eq!(game.repetition().hints(), reference.repetition().hints());
    }

    #[test]
    fn test_undo_to() {
        let mut game = GameState::new();
        game.commit_move(mv(6, 4, 5, 4)).unwrap();
        game.commit_move(mv(3, 4, 4, 4)).unwrap();
        game.commit_move(mv(9, 1, 7, 2)).unwrap();

        assert!(matches!(game.undo_to(5), Err(RulesError::PlyOutOfOrder { .. })));
        assert_eq!(game.undo_to(3), Ok(0));
        assert_eq!(game.undo_to(1), Ok(2));
        assert_eq!(game.moves(), &[mv(6, 4, 5, 4)]);
        assert_eq!(game.undo_to(0), Ok(1));
        assert_eq!(game.board(), &Board::initial());
    }

    #[test]
    fn test_apply_log() {
        let entries = [
            MoveLogEntry::new(1, mv(7, 1, 7, 4)),
            MoveLogEntry::new(2, mv(0, 1, 2, 2)),
            MoveLogEntry::new(3, mv(9, 1, 7, 2)),
        ];

        let mut game = GameState::new();
        game.apply_log_entry(&entries[0]).unwrap();

        // 重复拉取到的旧步被跳过
        let applied = game.apply_log(&entries).unwrap();
        assert_eq!(applied.len(), 2);
        assert_eq!(game.ply(), 3);
        assert_eq!(game.apply_log_entry(&entries[1]), Ok(None));

        // 跳步
        let gap = MoveLogEntry::new(5, mv(2, 2, 4, 3));
        assert_eq!(
            game.apply_log_entry(&gap),
            Err(RulesError::PlyOutOfOrder { expected: 4, got: 5 })
        );
    }

    #[test]
    fn test_log_entry_for_next_ply() {
        let mut game = GameState::new();
        game.commit_move(mv(7, 1, 7, 4)).unwrap();
        let entry = game.log_entry_for(mv(0, 1, 2, 2));
        assert_eq!(entry.ply, 2);
        assert_eq!(game.apply_log_entry(&entry).unwrap().map(|o| o.ply), Some(2));
    }
}
