//! 棋子走法模式
//!
//! 只描述几何上可到达的位置，不考虑棋盘占用。
//! 蹩马腿、塞象眼、吃子和炮架由 `movegen` 处理。

use crate::config::GeneralMovement;
use crate::types::{Color, Piece, PieceType, Position, COLS, ROWS};

/// 直线方向：上下左右
pub const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// 斜线方向
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// 象：田字形 (落点偏移, 象眼偏移)
const ELEPHANT_STEPS: [((i8, i8), (i8, i8)); 4] = [
    ((2, 2), (1, 1)),
    ((2, -2), (1, -1)),
    ((-2, 2), (-1, 1)),
    ((-2, -2), (-1, -1)),
];

/// 马：日字形 (落点偏移, 马腿偏移)
const HORSE_STEPS: [((i8, i8), (i8, i8)); 8] = [
    ((2, 1), (1, 0)),
    ((2, -1), (1, 0)),
    ((-2, 1), (-1, 0)),
    ((-2, -1), (-1, 0)),
    ((1, 2), (0, 1)),
    ((1, -2), (0, -1)),
    ((-1, 2), (0, 1)),
    ((-1, -2), (0, -1)),
];

/// 棋子一步内几何上可到达的所有位置
///
/// 车、炮返回同行同列的全部位置，真正的滑行由走法生成器逐格处理。
pub fn movement_pattern(piece: &Piece, general_movement: GeneralMovement) -> Vec<Position> {
    let pos = piece.position;
    let color = piece.color;

    match piece.kind {
        PieceType::General => general_pattern(pos, color, general_movement),
        PieceType::Advisor => steps_within(pos, &DIAGONAL, |p| p.is_in_palace(color)),
        PieceType::Elephant => ELEPHANT_STEPS
            .iter()
            .map(|&((dr, dc), _)| pos.offset(dr, dc))
            .filter(|p| p.is_valid() && p.is_on_own_side(color))
            .collect(),
        PieceType::Horse => HORSE_STEPS
            .iter()
            .map(|&((dr, dc), _)| pos.offset(dr, dc))
            .filter(|p| p.is_valid())
            .collect(),
        PieceType::Chariot | PieceType::Cannon => lines_through(pos),
        PieceType::Soldier => soldier_pattern(piece),
    }
}

fn general_pattern(pos: Position, color: Color, movement: GeneralMovement) -> Vec<Position> {
    let mut moves = steps_within(pos, &ORTHOGONAL, |p| p.is_in_palace(color));
    if movement == GeneralMovement::EightWay {
        moves.extend(steps_within(pos, &DIAGONAL, |p| p.is_in_palace(color)));
    }
    moves
}

fn soldier_pattern(piece: &Piece) -> Vec<Position> {
    let pos = piece.position;
    let mut moves = Vec::with_capacity(3);

    let forward = pos.offset(piece.color.forward(), 0);
    if forward.is_valid() {
        moves.push(forward);
    }

    // 过河后可以左右走
    if piece.has_crossed_river() {
        for dc in [-1, 1] {
            let side = pos.offset(0, dc);
            if side.is_valid() {
                moves.push(side);
            }
        }
    }

    moves
}

fn steps_within<F>(pos: Position, directions: &[(i8, i8)], allowed: F) -> Vec<Position>
where
    F: Fn(&Position) -> bool,
{
    directions
        .iter()
        .map(|&(dr, dc)| pos.offset(dr, dc))
        .filter(|p| p.is_valid() && allowed(p))
        .collect()
}

fn lines_through(pos: Position) -> Vec<Position> {
    let column = (0..ROWS)
        .filter(|&row| row != pos.row)
        .map(|row| Position::new(row, pos.col));
    let row = (0..COLS)
        .filter(|&col| col != pos.col)
        .map(|col| Position::new(pos.row, col));
    column.chain(row).collect()
}

/// 从 `from` 走到 `to` 途中必须为空的位置
///
/// 象为象眼，马为马腿；其余棋子没有固定的阻挡点。
pub fn blocking_point(kind: PieceType, from: Position, to: Position) -> Option<Position> {
    let dr = to.row - from.row;
    let dc = to.col - from.col;
    let table: &[((i8, i8), (i8, i8))] = match kind {
        PieceType::Elephant => &ELEPHANT_STEPS,
        PieceType::Horse => &HORSE_STEPS,
        _ => return None,
    };
    table
        .iter()
        .find(|&&(step, _)| step == (dr, dc))
        .map(|&(_, (br, bc))| from.offset(br, bc))
}
