//! 走法生成
//!
//! 结合棋子的走法模式与棋盘占用，生成伪合法走法：
//! 处理阻挡、吃子、炮架，并过滤会造成将帅照面的落点。
//! 不检查走后己方是否被将军，那是 `rules` 的工作。

use crate::board::Board;
use crate::config::{GeneralMovement, RuleConfig};
use crate::error::MoveGenError;
use crate::pieces::{blocking_point, movement_pattern, ORTHOGONAL};
use crate::types::{Color, Piece, PieceType, Position};
use log::trace;

/// 某格棋子的伪合法落点
pub fn pseudo_legal_moves(
    board: &Board,
    from: Position,
    rules: &RuleConfig,
) -> Result<Vec<Position>, MoveGenError> {
    if !from.is_valid() {
        return Err(MoveGenError::OutOfBounds(from));
    }
    let piece = *board.piece_at(from).ok_or(MoveGenError::NoPiece(from))?;

    let mut moves = raw_destinations(board, &piece, rules.general_movement);
    let generals = GeneralPair::locate(board);
    moves.retain(|&to| !generals.face_after(board, &piece, to));

    trace!("{} at {}: {} pseudo-legal moves", piece, from, moves.len());
    Ok(moves)
}

/// 某方所有棋子的伪合法走法 (from, to)
pub fn all_pseudo_legal_moves(
    board: &Board,
    color: Color,
    rules: &RuleConfig,
) -> Vec<(Position, Position)> {
    let generals = GeneralPair::locate(board);
    let mut moves = Vec::with_capacity(64);
    for piece in board.pieces(color) {
        for to in raw_destinations(board, &piece, rules.general_movement) {
            if !generals.face_after(board, &piece, to) {
                moves.push((piece.position, to));
            }
        }
    }
    moves
}

/// 未经照面过滤的落点
fn raw_destinations(board: &Board, piece: &Piece, general_movement: GeneralMovement) -> Vec<Position> {
    match piece.kind {
        PieceType::Chariot => chariot_moves(board, piece),
        PieceType::Cannon => cannon_moves(board, piece),
        _ => movement_pattern(piece, general_movement)
            .into_iter()
            .filter(|&to| {
                blocking_point(piece.kind, piece.position, to)
                    .map_or(true, |block| !board.is_occupied(block))
            })
            .filter(|&to| can_land(board, piece, to))
            .collect(),
    }
}

/// 落点为空或为敌子
#[inline]
fn can_land(board: &Board, piece: &Piece, to: Position) -> bool {
    match board.piece_at(to) {
        None => true,
        Some(target) => target.color != piece.color,
    }
}

fn chariot_moves(board: &Board, piece: &Piece) -> Vec<Position> {
    let mut moves = Vec::with_capacity(17);

    for (dr, dc) in ORTHOGONAL {
        let mut pos = piece.position.offset(dr, dc);
        while pos.is_valid() {
            match board.piece_at(pos) {
                None => moves.push(pos),
                Some(target) => {
                    if target.color != piece.color {
                        moves.push(pos);
                    }
                    break;
                }
            }
            pos = pos.offset(dr, dc);
        }
    }

    moves
}

fn cannon_moves(board: &Board, piece: &Piece) -> Vec<Position> {
    let mut moves = Vec::with_capacity(17);

    for (dr, dc) in ORTHOGONAL {
        let mut pos = piece.position.offset(dr, dc);
        let mut found_screen = false;

        while pos.is_valid() {
            match board.piece_at(pos) {
                None => {
                    if !found_screen {
                        moves.push(pos);
                    }
                }
                Some(target) => {
                    if !found_screen {
                        found_screen = true;
                    } else {
                        if target.color != piece.color {
                            moves.push(pos);
                        }
                        break;
                    }
                }
            }
            pos = pos.offset(dr, dc);
        }
    }

    moves
}

/// 双方将的位置，走法生成期间只扫描一次棋盘
#[derive(Debug, Clone, Copy)]
struct GeneralPair {
    red: Option<Position>,
    black: Option<Position>,
}

impl GeneralPair {
    fn locate(board: &Board) -> Self {
        GeneralPair {
            red: board.find_general(Color::Red),
            black: board.find_general(Color::Black),
        }
    }

    /// `piece` 走到 `to` 后，两将是否在同一直线上且中间无子
    fn face_after(&self, board: &Board, piece: &Piece, to: Position) -> bool {
        let from = piece.position;
        let after = |color: Color, current: Option<Position>| -> Option<Position> {
            if piece.kind == PieceType::General && piece.color == color {
                return Some(to);
            }
            // 被吃掉的将不再参与照面
            current.filter(|&pos| pos != to)
        };

        let (red, black) = match (after(Color::Red, self.red), after(Color::Black, self.black)) {
            (Some(red), Some(black)) => (red, black),
            _ => return false,
        };

        let occupied = |pos: Position| pos == to || (pos != from && board.is_occupied(pos));
        clear_line(red, black, occupied)
    }
}

/// 两点在同一行或同一列，且中间没有棋子
fn clear_line<F>(a: Position, b: Position, occupied: F) -> bool
where
    F: Fn(Position) -> bool,
{
    if a.col == b.col {
        let (lo, hi) = (a.row.min(b.row), a.row.max(b.row));
        ((lo + 1)..hi).all(|row| !occupied(Position::new(row, a.col)))
    } else if a.row == b.row {
        let (lo, hi) = (a.col.min(b.col), a.col.max(b.col));
        ((lo + 1)..hi).all(|col| !occupied(Position::new(a.row, col)))
    } else {
        false
    }
}

/// 当前局面两将是否照面
pub fn generals_facing(board: &Board) -> bool {
    match (board.find_general(Color::Red), board.find_general(Color::Black)) {
        (Some(red), Some(black)) => clear_line(red, black, |pos| board.is_occupied(pos)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<Position>) -> Vec<Position> {
        v.sort();
        v
    }

    /// 两将错开列放置，避免照面过滤干扰
    fn board_with(pieces: &[(PieceType, Color, i8, i8)]) -> Board {
        let mut board = Board::empty();
        let generals = [
            (PieceType::General, Color::Red, 0, 3),
            (PieceType::General, Color::Black, 9, 5),
        ];
        for &(kind, color, row, col) in generals.iter().chain(pieces) {
            let pos = Position::new(row, col);
            board.place(Piece::new(kind, color, pos), pos).unwrap();
        }
        board
    }

    fn moves(board: &Board, row: i8, col: i8) -> Vec<Position> {
        sorted(pseudo_legal_moves(board, Position::new(row, col), &RuleConfig::default()).unwrap())
    }

    #[test]
    fn test_empty_square() {
        let board = Board::standard();
        assert_eq!(
            pseudo_legal_moves(&board, Position::new(4, 4), &RuleConfig::default()),
            Err(MoveGenError::NoPiece(Position::new(4, 4)))
        );
        assert_eq!(
            pseudo_legal_moves(&board, Position::new(10, 4), &RuleConfig::default()),
            Err(MoveGenError::OutOfBounds(Position::new(10, 4)))
        );
    }

    #[test]
    fn test_initial_move_count() {
        let board = Board::standard();
        let rules = RuleConfig::default();
        assert_eq!(all_pseudo_legal_moves(&board, Color::Red, &rules).len(), 44);
        assert_eq!(all_pseudo_legal_moves(&board, Color::Black, &rules).len(), 44);

        let reference = RuleConfig::reference();
        assert_eq!(all_pseudo_legal_moves(&board, Color::Red, &reference).len(), 46);
    }

    #[test]
    fn test_chariot_stops_at_friendly() {
        let board = board_with(&[
            (PieceType::Chariot, Color::Red, 4, 0),
            (PieceType::Soldier, Color::Red, 7, 0),
        ]);
        let forward: Vec<Position> = moves(&board, 4, 0)
            .into_iter()
            .filter(|p| p.col == 0 && p.row > 4)
            .collect();
        assert_eq!(forward, vec![Position::new(5, 0), Position::new(6, 0)]);
    }

    #[test]
    fn test_chariot_captures_enemy() {
        let board = board_with(&[
            (PieceType::Chariot, Color::Red, 4, 0),
            (PieceType::Soldier, Color::Black, 7, 0),
        ]);
        let forward: Vec<Position> = moves(&board, 4, 0)
            .into_iter()
            .filter(|p| p.col == 0 && p.row > 4)
            .collect();
        assert_eq!(
            forward,
            vec![Position::new(5, 0), Position::new(6, 0), Position::new(7, 0)]
        );
    }

    #[test]
    fn test_cannon_without_screen() {
        let board = board_with(&[(PieceType::Cannon, Color::Red, 4, 0)]);
        let forward: Vec<Position> = moves(&board, 4, 0)
            .into_iter()
            .filter(|p| p.col == 0 && p.row > 4)
            .collect();
        assert_eq!(forward.len(), 5);
        assert_eq!(moves(&board, 4, 0).len(), 9 + 8);
    }

    #[test]
    fn test_cannon_screen_capture() {
        let board = board_with(&[
            (PieceType::Cannon, Color::Red, 4, 0),
            (PieceType::Soldier, Color::Red, 6, 0),
            (PieceType::Horse, Color::Black, 8, 0),
        ]);
        let forward: Vec<Position> = moves(&board, 4, 0)
            .into_iter()
            .filter(|p| p.col == 0 && p.row > 4)
            .collect();
        // 炮架前可走空格，炮架后只能吃子
        assert_eq!(forward, vec![Position::new(5, 0), Position::new(8, 0)]);
    }

    #[test]
    fn test_cannon_cannot_capture_friendly_beyond_screen() {
        let board = board_with(&[
            (PieceType::Cannon, Color::Red, 4, 0),
            (PieceType::Soldier, Color::Black, 6, 0),
            (PieceType::Horse, Color::Red, 8, 0),
            (PieceType::Chariot, Color::Black, 9, 0),
        ]);
        let forward: Vec<Position> = moves(&board, 4, 0)
            .into_iter()
            .filter(|p| p.col == 0 && p.row > 4)
            .collect();
        assert_eq!(forward, vec![Position::new(5, 0)]);
    }

    #[test]
    fn test_elephant_eye_blocked_by_either_color() {
        for color in [Color::Red, Color::Black] {
            let board = board_with(&[
                (PieceType::Elephant, Color::Red, 2, 4),
                (PieceType::Soldier, color, 3, 5),
            ]);
            let result = moves(&board, 2, 4);
            assert!(!result.contains(&Position::new(4, 6)));
            assert_eq!(
                result,
                vec![Position::new(0, 2), Position::new(0, 6), Position::new(4, 2)]
            );
        }
    }

    #[test]
    fn test_horse_leg_blocked() {
        let board = board_with(&[
            (PieceType::Horse, Color::Red, 4, 4),
            (PieceType::Soldier, Color::Black, 5, 4),
        ]);
        let result = moves(&board, 4, 4);
        assert!(!result.contains(&Position::new(6, 3)));
        assert!(!result.contains(&Position::new(6, 5)));
        assert_eq!(result.len(), 6);
    }

    #[test]
    fn test_friendly_destination_excluded() {
        let board = board_with(&[
            (PieceType::Horse, Color::Red, 4, 4),
            (PieceType::Soldier, Color::Red, 6, 5),
            (PieceType::Soldier, Color::Black, 6, 3),
        ]);
        let result = moves(&board, 4, 4);
        assert!(!result.contains(&Position::new(6, 5)));
        assert!(result.contains(&Position::new(6, 3)));
    }

    #[test]
    fn test_soldier_moves() {
        let board = board_with(&[
            (PieceType::Soldier, Color::Red, 3, 0),
            (PieceType::Soldier, Color::Red, 5, 4),
            (PieceType::Soldier, Color::Black, 4, 8),
        ]);
        assert_eq!(moves(&board, 3, 0), vec![Position::new(4, 0)]);
        assert_eq!(
            moves(&board, 5, 4),
            vec![Position::new(5, 3), Position::new(5, 5), Position::new(6, 4)]
        );
        assert_eq!(
            moves(&board, 4, 8),
            vec![Position::new(3, 8), Position::new(4, 7)]
        );
    }

    #[test]
    fn test_flying_general_blocks_unscreening() {
        let mut board = Board::empty();
        for (kind, color, row, col) in [
            (PieceType::General, Color::Red, 0, 4),
            (PieceType::General, Color::Black, 9, 4),
            (PieceType::Chariot, Color::Red, 4, 4),
        ] {
            let pos = Position::new(row, col);
            board.place(Piece::new(kind, color, pos), pos).unwrap();
        }
        let result = moves(&board, 4, 4);
        assert!(result.iter().all(|p| p.col == 4));
        assert!(result.contains(&Position::new(8, 4)));
        assert!(result.contains(&Position::new(9, 4)));
        assert!(!generals_facing(&board));
    }

    #[test]
    fn test_general_cannot_step_onto_open_file() {
        let mut board = Board::empty();
        for (kind, color, row, col) in [
            (PieceType::General, Color::Red, 0, 3),
            (PieceType::General, Color::Black, 9, 4),
        ] {
            let pos = Position::new(row, col);
            board.place(Piece::new(kind, color, pos), pos).unwrap();
        }
        assert_eq!(moves(&board, 0, 3), vec![Position::new(1, 3)]);

        let reference = RuleConfig::reference();
        let result = sorted(pseudo_legal_moves(&board, Position::new(0, 3), &reference).unwrap());
        assert_eq!(result, vec![Position::new(1, 3)]);
    }

    #[test]
    fn test_generals_facing() {
        let mut board = Board::empty();
        for (kind, color, row, col) in [
            (PieceType::General, Color::Red, 1, 4),
            (PieceType::General, Color::Black, 8, 4),
        ] {
            let pos = Position::new(row, col);
            board.place(Piece::new(kind, color, pos), pos).unwrap();
        }
        assert!(generals_facing(&board));
        assert!(!generals_facing(&Board::standard()));
    }
}
