//! 将军检测与合法性判定
//!
//! 所有试走都经由 `Board::with_trial_move`，求值后棋盘逐位还原。

use crate::board::Board;
use crate::config::{RuleConfig, SelfCheckPolicy};
use crate::error::MoveGenError;
use crate::movegen::{all_pseudo_legal_moves, pseudo_legal_moves};
use crate::types::{Color, Position};
use log::{trace, warn};

/// 检查是否被将军
///
/// 对方任一棋子的伪合法落点包含己方将的位置即为被将军。
/// 棋盘上没有己方的将视为被将军（已经输了）。
pub fn is_in_check(board: &Board, color: Color, rules: &RuleConfig) -> bool {
    let general = match board.general_location(color) {
        Ok(pos) => pos,
        Err(err) => {
            warn!("{}", err);
            return true;
        }
    };

    all_pseudo_legal_moves(board, color.opposite(), rules)
        .iter()
        .any(|&(_, to)| to == general)
}

/// 走 `from` -> `to` 后，走子方是否被将军
///
/// `from` 为空时返回 false。
pub fn leaves_in_check(board: &mut Board, from: Position, to: Position, rules: &RuleConfig) -> bool {
    let color = match board.piece_at(from) {
        Some(piece) => piece.color,
        None => return false,
    };
    board
        .with_trial_move(from, to, |after| is_in_check(after, color, rules))
        .unwrap_or(false)
}

/// 某格棋子的合法落点
///
/// `SelfCheckPolicy::Always` 时每个落点都试走检查；
/// `SelfCheckPolicy::WhenInCheck` 时只有走子方已被将军才检查。
pub fn legal_moves(
    board: &mut Board,
    from: Position,
    rules: &RuleConfig,
) -> Result<Vec<Position>, MoveGenError> {
    let mut moves = pseudo_legal_moves(board, from, rules)?;
    let color = board.piece_at(from).ok_or(MoveGenError::NoPiece(from))?.color;

    let simulate = match rules.self_check {
        SelfCheckPolicy::Always => true,
        SelfCheckPolicy::WhenInCheck => is_in_check(board, color, rules),
    };
    if simulate {
        let before = moves.len();
        moves.retain(|&to| !leaves_in_check(board, from, to, rules));
        trace!("{}: {} of {} moves leave the general in check", from, before - moves.len(), before);
    }

    Ok(moves)
}

/// 某方所有合法走法 (from, to)
pub fn all_legal_moves(board: &mut Board, color: Color, rules: &RuleConfig) -> Vec<(Position, Position)> {
    let mut moves = Vec::with_capacity(64);
    for piece in board.pieces(color) {
        if let Ok(destinations) = legal_moves(board, piece.position, rules) {
            moves.extend(destinations.into_iter().map(|to| (piece.position, to)));
        }
    }
    moves
}

/// 某方是否存在一步走完后不被将军的走法
///
/// 与自将策略无关，总是逐步试走；找到第一个解围走法即返回。
pub fn has_escape(board: &mut Board, color: Color, rules: &RuleConfig) -> bool {
    for piece in board.pieces(color) {
        let Ok(destinations) = pseudo_legal_moves(board, piece.position, rules) else {
            continue;
        };
        for to in destinations {
            if !leaves_in_check(board, piece.position, to, rules) {
                trace!("{} escapes with {} -> {}", color, piece.position, to);
                return true;
            }
        }
    }
    false
}

/// 将死或困毙：没有任何解围走法
pub fn is_checkmated(board: &mut Board, color: Color, rules: &RuleConfig) -> bool {
    !has_escape(board, color, rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, PieceType};

    fn board_with(pieces: &[(PieceType, Color, i8, i8)]) -> Board {
        let mut board = Board::empty();
        for &(kind, color, row, col) in pieces {
            let pos = Position::new(row, col);
            board.place(Piece::new(kind, color, pos), pos).unwrap();
        }
        board
    }

    #[test]
    fn test_initial_position_not_in_check() {
        let board = Board::standard();
        let rules = RuleConfig::default();
        assert!(!is_in_check(&board, Color::Red, &rules));
        assert!(!is_in_check(&board, Color::Black, &rules));
    }

    #[test]
    fn test_initial_legal_moves() {
        let mut board = Board::standard();
        let before = board.clone();
        let rules = RuleConfig::default();
        assert_eq!(all_legal_moves(&mut board, Color::Red, &rules).len(), 44);
        assert_eq!(board, before);
    }

    #[test]
    fn test_chariot_check() {
        let board = board_with(&[
            (PieceType::General, Color::Red, 0, 3),
            (PieceType::General, Color::Black, 9, 4),
            (PieceType::Chariot, Color::Red, 8, 4),
        ]);
        let rules = RuleConfig::default();
        assert!(is_in_check(&board, Color::Black, &rules));
        assert!(!is_in_check(&board, Color::Red, &rules));
    }

    #[test]
    fn test_cannon_check_needs_screen() {
        let mut board = board_with(&[
            (PieceType::General, Color::Red, 0, 3),
            (PieceType::General, Color::Black, 9, 4),
            (PieceType::Cannon, Color::Red, 5, 4),
        ]);
        let rules = RuleConfig::default();
        assert!(!is_in_check(&board, Color::Black, &rules));

        let screen = Position::new(7, 4);
        board
            .place(Piece::new(PieceType::Soldier, Color::Black, screen), screen)
            .unwrap();
        assert!(is_in_check(&board, Color::Black, &rules));
    }

    #[test]
    fn test_horse_check_and_leg() {
        let mut board = board_with(&[
            (PieceType::General, Color::Red, 0, 3),
            (PieceType::General, Color::Black, 9, 4),
            (PieceType::Horse, Color::Red, 7, 3),
        ]);
        let rules = RuleConfig::default();
        assert!(is_in_check(&board, Color::Black, &rules));

        let leg = Position::new(8, 3);
        board
            .place(Piece::new(PieceType::Advisor, Color::Black, leg), leg)
            .unwrap();
        assert!(!is_in_check(&board, Color::Black, &rules));
    }

    #[test]
    fn test_missing_general_counts_as_check() {
        let board = board_with(&[(PieceType::General, Color::Red, 0, 4)]);
        assert!(is_in_check(&board, Color::Black, &RuleConfig::default()));
    }

    #[test]
    fn test_pinned_piece_cannot_expose_general() {
        // 红车挡在黑车与红帅之间
        let mut board = board_with(&[
            (PieceType::General, Color::Red, 0, 4),
            (PieceType::General, Color::Black, 9, 3),
            (PieceType::Chariot, Color::Red, 2, 4),
            (PieceType::Chariot, Color::Black, 7, 4),
        ]);
        let before = board.clone();

        let rules = RuleConfig::default();
        let moves = legal_moves(&mut board, Position::new(2, 4), &rules).unwrap();
        assert!(moves.iter().all(|p| p.col == 4));
        assert!(moves.contains(&Position::new(7, 4)));
        assert_eq!(board, before);

        // 兼容模式下未被将军时不检查自将
        let reference = RuleConfig::reference();
        let moves = legal_moves(&mut board, Position::new(2, 4), &reference).unwrap();
        assert!(moves.contains(&Position::new(2, 0)));
        assert_eq!(board, before);
    }

    #[test]
    fn test_must_answer_check() {
        let mut board = board_with(&[
            (PieceType::General, Color::Red, 0, 4),
            (PieceType::General, Color::Black, 9, 3),
            (PieceType::Chariot, Color::Black, 5, 4),
            (PieceType::Horse, Color::Red, 0, 1),
        ]);
        let rules = RuleConfig::reference();
        assert!(is_in_check(&board, Color::Red, &rules));
        // 马无法解围
        let moves = legal_moves(&mut board, Position::new(0, 1), &rules).unwrap();
        assert!(moves.is_empty());
        // 帅可以横走避开
        let moves = legal_moves(&mut board, Position::new(0, 4), &rules).unwrap();
        assert!(moves.contains(&Position::new(0, 5)));
        assert!(!moves.contains(&Position::new(1, 4)));
    }

    #[test]
    fn test_checkmate_detection() {
        // 双车错杀
        let mut board = board_with(&[
            (PieceType::General, Color::Red, 0, 3),
            (PieceType::General, Color::Black, 9, 4),
            (PieceType::Chariot, Color::Red, 9, 0),
            (PieceType::Chariot, Color::Red, 8, 8),
        ]);
        let before = board.clone();
        let rules = RuleConfig::default();
        assert!(is_in_check(&board, Color::Black, &rules));
        assert!(is_checkmated(&mut board, Color::Black, &rules));
        assert!(has_escape(&mut board, Color::Red, &rules));
        assert_eq!(board, before);
    }

    #[test]
    fn test_stalemate_counts_as_no_escape() {
        // 黑将不被将军，但无路可走
        let mut board = board_with(&[
            (PieceType::General, Color::Red, 0, 5),
            (PieceType::General, Color::Black, 9, 3),
            (PieceType::Chariot, Color::Red, 8, 0),
            (PieceType::Chariot, Color::Red, 1, 4),
        ]);
        let rules = RuleConfig::default();
        assert!(!is_in_check(&board, Color::Black, &rules));
        assert!(!has_escape(&mut board, Color::Black, &rules));
    }
}
