//! 错误类型
//!
//! 对外边界 `Game::make_move` 只返回 bool，这里的细分类型用于内部与测试。

use crate::types::{Color, GameState, Position};

/// 棋盘操作错误
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("Position out of bounds: {0}")]
    OutOfBounds(Position),

    /// 棋盘上找不到某方的将，说明局面已损坏
    #[error("General not found for {0}")]
    GeneralNotFound(Color),
}

/// 走法生成错误
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveGenError {
    #[error("No piece at {0}")]
    NoPiece(Position),

    #[error("Position out of bounds: {0}")]
    OutOfBounds(Position),
}

/// 走子被拒绝的原因
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("Game is already over: {0}")]
    GameOver(GameState),

    #[error("Position out of bounds: {0}")]
    OutOfBounds(Position),

    #[error("No piece at {0}")]
    EmptySource(Position),

    #[error("Wrong turn: expected {expected}, found {found}")]
    WrongTurn { expected: Color, found: Color },

    #[error("Illegal move: {from} -> {to}")]
    NotInLegalSet { from: Position, to: Position },
}

impl From<MoveGenError> for MoveError {
    fn from(err: MoveGenError) -> Self {
        match err {
            MoveGenError::NoPiece(pos) => MoveError::EmptySource(pos),
            MoveGenError::OutOfBounds(pos) => MoveError::OutOfBounds(pos),
        }
    }
}
