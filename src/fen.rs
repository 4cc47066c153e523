//! FEN 解析和生成
//!
//! 格式: `<棋盘> [<走子方>] [...]`，走子方之后的字段忽略
//!
//! 棋盘符号（从黑方底线 row 9 写到红方底线 row 0）：
//! - 红方：K(帅) A(仕) E/B(相) H/N(马) R(车) C(炮) P(兵)
//! - 黑方：k a e/b h/n r c p
//! - 空格：数字 (1-9)
//!
//! 走子方：`w` 或 `r` 为红方，`b` 为黑方，省略时为红方。
//!
//! 双方必须各有且只有一个将，且位于己方九宫内。

use crate::board::Board;
use crate::types::{Color, Piece, PieceType, Position, COLS, ROWS};

/// FEN 解析后的状态
#[derive(Debug, Clone)]
pub struct FenState {
    pub board: Board,
    pub turn: Color,
}

/// 解析 FEN 字符串
pub fn parse_fen(fen: &str) -> Result<FenState, String> {
    let mut parts = fen.split_whitespace();
    let board_str = parts
        .next()
        .ok_or_else(|| "Invalid FEN: empty string".to_string())?;

    let board = parse_board(board_str)?;
    let turn = match parts.next() {
        None => Color::Red,
        Some(turn_str) => {
            let mut chars = turn_str.chars();
            match (chars.next().and_then(Color::from_fen_char), chars.next()) {
                (Some(color), None) => color,
                _ => return Err(format!("Invalid turn: {}", turn_str)),
            }
        }
    };

    Ok(FenState { board, turn })
}

/// 解析棋盘字符串
fn parse_board(board_str: &str) -> Result<Board, String> {
    let rows: Vec<&str> = board_str.split('/').collect();
    if rows.len() != ROWS as usize {
        return Err(format!(
            "Invalid board: expected {} rows, got {}",
            ROWS,
            rows.len()
        ));
    }

    let mut board = Board::empty();

    for (row_idx, row_str) in rows.iter().enumerate() {
        // FEN 从上往下是 row 9 到 row 0
        let row = ROWS - 1 - row_idx as i8;
        let mut col: i8 = 0;

        for ch in row_str.chars() {
            if col >= COLS {
                return Err(format!("Row {} has more than {} columns", row, COLS));
            }

            if let Some(skip) = ch.to_digit(10) {
                if skip == 0 {
                    return Err(format!("Invalid empty count in row {}", row));
                }
                col += skip as i8;
                continue;
            }

            let kind = PieceType::from_fen_char(ch)
                .ok_or_else(|| format!("Invalid piece char: {}", ch))?;
            let color = if ch.is_ascii_uppercase() {
                Color::Red
            } else {
                Color::Black
            };
            let pos = Position::new(row, col);
            board
                .place(Piece::new(kind, color, pos), pos)
                .map_err(|e| e.to_string())?;
            col += 1;
        }

        if col != COLS {
            return Err(format!("Row {} has {} columns, expected {}", row, col, COLS));
        }
    }

    validate_generals(&board)?;
    Ok(board)
}

/// 每方恰好一个将，且在九宫内
fn validate_generals(board: &Board) -> Result<(), String> {
    for color in [Color::Red, Color::Black] {
        let generals: Vec<Position> = board
            .all_pieces()
            .filter(|p| p.kind == PieceType::General && p.color == color)
            .map(|p| p.position)
            .collect();

        match generals.as_slice() {
            [pos] if pos.is_in_palace(color) => {}
            [pos] => {
                return Err(format!(
                    "Invalid board: {} general outside palace at {}",
                    color, pos
                ))
            }
            _ => {
                return Err(format!(
                    "Invalid board: expected one {} general, found {}",
                    color,
                    generals.len()
                ))
            }
        }
    }
    Ok(())
}

/// 从棋盘生成 FEN 字符串
pub fn board_to_fen(board: &Board, turn: Color) -> String {
    let mut rows = Vec::with_capacity(ROWS as usize);

    // 从 row 9 到 row 0
    for row in (0..ROWS).rev() {
        let mut row_str = String::new();
        let mut empty_count = 0;

        for col in 0..COLS {
            match board.piece_at(Position::new(row, col)) {
                Some(piece) => {
                    if empty_count > 0 {
                        row_str.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row_str.push(piece.to_fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            row_str.push_str(&empty_count.to_string());
        }

        rows.push(row_str);
    }

    format!("{} {}", rows.join("/"), turn.to_fen_char())
}
