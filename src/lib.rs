//! Xiangqi Rules Engine
//!
//! 象棋规则引擎 - 走法生成、将军检测、胜负判定

pub mod board;
pub mod config;
pub mod error;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod pieces;
pub mod rules;
pub mod test_positions;
pub mod types;

pub use board::{Board, TrialMove};
pub use config::{GeneralMovement, RuleConfig, SelfCheckPolicy};
pub use error::{BoardError, MoveError, MoveGenError};
pub use fen::{board_to_fen, parse_fen, FenState};
pub use game::Game;
pub use movegen::{all_pseudo_legal_moves, generals_facing, pseudo_legal_moves};
pub use notation::{format_square, parse_move, parse_square};
pub use pieces::movement_pattern;
pub use rules::{all_legal_moves, has_escape, is_in_check, is_checkmated, leaves_in_check, legal_moves};
pub use types::{Color, GameState, Piece, PieceType, Position};
