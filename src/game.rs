//! 对局控制
//!
//! 维护棋盘、走子方与对局状态。每步走完后检查对方是否还有解围走法，
//! 没有则走子方获胜（将死与困毙同样判负）。

use crate::board::Board;
use crate::config::RuleConfig;
use crate::error::{MoveError, MoveGenError};
use crate::fen::{board_to_fen, parse_fen};
use crate::notation::parse_square;
use crate::rules;
use crate::types::{Color, GameState, Piece, Position};
use log::{debug, info};

/// 一局象棋
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: Color,
    state: GameState,
    rules: RuleConfig,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// 标准开局，红方先走
    pub fn new() -> Game {
        Game::with_rules(RuleConfig::default())
    }

    pub fn with_rules(rules: RuleConfig) -> Game {
        Game {
            board: Board::standard(),
            turn: Color::Red,
            state: GameState::Unfinished,
            rules,
        }
    }

    /// 从 FEN 局面开始
    ///
    /// 若走子方已无解围走法，对局直接结束。
    pub fn from_fen(fen: &str, rules: RuleConfig) -> Result<Game, String> {
        let state = parse_fen(fen)?;
        let mut game = Game {
            board: state.board,
            turn: state.turn,
            state: GameState::Unfinished,
            rules,
        };
        game.adjudicate();
        Ok(game)
    }

    /// 导出当前局面的 FEN
    pub fn to_fen(&self) -> String {
        board_to_fen(&self.board, self.turn)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn current_turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn game_state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.board.piece_at(pos)
    }

    /// 检查某方是否被将军
    pub fn is_in_check(&self, color: Color) -> bool {
        rules::is_in_check(&self.board, color, &self.rules)
    }

    /// 某格棋子的合法落点（在棋盘副本上试走）
    pub fn legal_moves(&self, from: Position) -> Result<Vec<Position>, MoveGenError> {
        let mut scratch = self.board.clone();
        rules::legal_moves(&mut scratch, from, &self.rules)
    }

    /// 走子方的所有合法走法
    pub fn all_legal_moves(&self) -> Vec<(Position, Position)> {
        let mut scratch = self.board.clone();
        rules::all_legal_moves(&mut scratch, self.turn, &self.rules)
    }

    /// 走子，成功返回被吃的棋子
    ///
    /// 被拒绝时棋盘、走子方和状态都不变。
    pub fn try_move(&mut self, from: Position, to: Position) -> Result<Option<Piece>, MoveError> {
        if self.state.is_finished() {
            return Err(MoveError::GameOver(self.state));
        }
        for pos in [from, to] {
            if !pos.is_valid() {
                return Err(MoveError::OutOfBounds(pos));
            }
        }

        let piece = *self.board.piece_at(from).ok_or(MoveError::EmptySource(from))?;
        if piece.color != self.turn {
            return Err(MoveError::WrongTurn {
                expected: self.turn,
                found: piece.color,
            });
        }

        let legal = rules::legal_moves(&mut self.board, from, &self.rules)?;
        if !legal.contains(&to) {
            return Err(MoveError::NotInLegalSet { from, to });
        }

        let captured = self.board.relocate(from, to);
        debug!("{} {} -> {}", piece, from, to);
        if let Some(captured) = &captured {
            debug!("captured {}", captured);
        }

        self.turn = self.turn.opposite();
        self.adjudicate();

        Ok(captured)
    }

    /// 走子，返回是否成功
    pub fn make_move(&mut self, from: Position, to: Position) -> bool {
        match self.try_move(from, to) {
            Ok(_) => true,
            Err(err) => {
                debug!("move {} -> {} rejected: {}", from, to, err);
                false
            }
        }
    }

    /// 使用代数记谱走子，如 `make_move_notation("b1", "c3")`
    pub fn make_move_notation(&mut self, from: &str, to: &str) -> bool {
        match (parse_square(from), parse_square(to)) {
            (Ok(from), Ok(to)) => self.make_move(from, to),
            (Err(err), _) | (_, Err(err)) => {
                debug!("move {} -> {} rejected: {}", from, to, err);
                false
            }
        }
    }

    /// 走子方没有解围走法时，对方获胜
    fn adjudicate(&mut self) {
        if rules::has_escape(&mut self.board, self.turn, &self.rules) {
            return;
        }
        self.state = GameState::won_by(self.turn.opposite());
        info!("{} has no escape, game over: {}", self.turn, self.state);
    }
}
