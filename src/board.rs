//! 象棋棋盘
//!
//! 使用 90 格数组存储棋子，空格为 `None`。
//! 试走通过 `TrialMove` 守卫完成：守卫释放时无条件还原两个格子。

use crate::error::BoardError;
use crate::fen::parse_fen;
use crate::types::{Color, Piece, PieceType, Position, COLS, ROWS, SQUARES};
use lazy_static::lazy_static;
use std::fmt;
use std::ops::Deref;

/// 底线棋子排列（从 a 列到 i 列）
const BACK_RANK: [PieceType; 9] = [
    PieceType::Chariot,
    PieceType::Horse,
    PieceType::Elephant,
    PieceType::Advisor,
    PieceType::General,
    PieceType::Advisor,
    PieceType::Elephant,
    PieceType::Horse,
    PieceType::Chariot,
];

lazy_static! {
    static ref STARTING_BOARD: Board = Board::build_standard();
}

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// 90 个格子 (10行 x 9列)，行优先
    squares: [Option<Piece>; SQUARES],
}

impl Default for Board {
    fn default() -> Self {
        Board::standard()
    }
}

impl Board {
    /// 空棋盘
    pub fn empty() -> Board {
        Board {
            squares: [None; SQUARES],
        }
    }

    /// 标准开局
    pub fn standard() -> Board {
        STARTING_BOARD.clone()
    }

    fn build_standard() -> Board {
        let mut board = Board::empty();
        for (color, back, cannon, soldier) in [(Color::Red, 0, 2, 3), (Color::Black, 9, 7, 6)] {
            for (col, kind) in BACK_RANK.iter().enumerate() {
                board.put(*kind, color, Position::new(back, col as i8));
            }
            for col in [1, 7] {
                board.put(PieceType::Cannon, color, Position::new(cannon, col));
            }
            for col in (0..COLS).step_by(2) {
                board.put(PieceType::Soldier, color, Position::new(soldier, col));
            }
        }
        board
    }

    #[inline]
    fn put(&mut self, kind: PieceType, color: Color, pos: Position) {
        self.squares[pos.to_index()] = Some(Piece::new(kind, color, pos));
    }

    /// 从 FEN 字符串创建棋盘（忽略走子方）
    pub fn from_fen(fen: &str) -> Result<Board, String> {
        Ok(parse_fen(fen)?.board)
    }

    /// 放置棋子，返回原来在该格的棋子
    pub fn place(&mut self, mut piece: Piece, pos: Position) -> Result<Option<Piece>, BoardError> {
        if !pos.is_valid() {
            return Err(BoardError::OutOfBounds(pos));
        }
        piece.position = pos;
        Ok(self.squares[pos.to_index()].replace(piece))
    }

    /// 移除某格的棋子
    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.to_index()].take()
    }

    /// 把 `from` 的棋子移到 `to`，返回被吃的棋子
    ///
    /// 不做任何规则检查；`from` 为空时棋盘不变。
    pub fn relocate(&mut self, from: Position, to: Position) -> Option<Piece> {
        if !from.is_valid() || !to.is_valid() {
            return None;
        }
        let mut piece = self.squares[from.to_index()].take()?;
        piece.position = to;
        self.squares[to.to_index()].replace(piece)
    }

    /// 检查位置是否有棋子
    #[inline]
    pub fn is_occupied(&self, pos: Position) -> bool {
        pos.is_valid() && self.squares[pos.to_index()].is_some()
    }

    /// 获取某位置的棋子
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.to_index()].as_ref()
    }

    /// 找到将的位置（线性扫描 90 格）
    pub fn general_location(&self, color: Color) -> Result<Position, BoardError> {
        self.find_general(color)
            .ok_or(BoardError::GeneralNotFound(color))
    }

    pub(crate) fn find_general(&self, color: Color) -> Option<Position> {
        self.squares
            .iter()
            .flatten()
            .find(|p| p.kind == PieceType::General && p.color == color)
            .map(|p| p.position)
    }

    /// 获取某方所有棋子（按位置顺序的副本）
    pub fn pieces(&self, color: Color) -> Vec<Piece> {
        self.squares
            .iter()
            .flatten()
            .filter(|p| p.color == color)
            .copied()
            .collect()
    }

    /// 所有棋子
    pub fn all_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten()
    }

    /// 试走：把 `from` 的棋子放到 `to`，返回的守卫释放时还原
    ///
    /// `from` 为空或越界时返回 `None`。
    pub fn trial_move(&mut self, from: Position, to: Position) -> Option<TrialMove<'_>> {
        if !from.is_valid() || !to.is_valid() || from == to {
            return None;
        }
        let moved = self.squares[from.to_index()].take()?;
        let captured = self.squares[to.to_index()].take();

        let mut placed = moved;
        placed.position = to;
        self.squares[to.to_index()] = Some(placed);

        Some(TrialMove {
            board: self,
            from,
            to,
            moved,
            captured,
        })
    }

    /// 在试走后的局面上求值，求值结束后棋盘恢复原样
    pub fn with_trial_move<R, F>(&mut self, from: Position, to: Position, f: F) -> Option<R>
    where
        F: FnOnce(&Board) -> R,
    {
        let trial = self.trial_move(from, to)?;
        Some(f(&*trial))
    }

    /// 红黑互换并上下翻转
    pub fn mirrored(&self) -> Board {
        let mut board = Board::empty();
        for piece in self.all_pieces() {
            let pos = piece.position.mirror();
            board.squares[pos.to_index()] =
                Some(Piece::new(piece.kind, piece.color.opposite(), pos));
        }
        board
    }
}

/// 试走守卫
///
/// 持有棋盘的可变借用，释放时把 `from`、`to` 两格恢复为试走前的内容。
pub struct TrialMove<'a> {
    board: &'a mut Board,
    from: Position,
    to: Position,
    moved: Piece,
    captured: Option<Piece>,
}

impl TrialMove<'_> {
    /// 被试走的棋子（原位置）
    pub fn moved(&self) -> &Piece {
        &self.moved
    }

    /// 试走吃掉的棋子
    pub fn captured(&self) -> Option<&Piece> {
        self.captured.as_ref()
    }
}

impl Deref for TrialMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl Drop for TrialMove<'_> {
    fn drop(&mut self) {
        self.board.squares[self.to.to_index()] = self.captured.take();
        self.board.squares[self.from.to_index()] = Some(self.moved);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            write!(f, "{:>2} ", row + 1)?;
            for col in 0..COLS {
                match self.piece_at(Position::new(row, col)) {
                    Some(piece) => write!(f, " {}", piece.to_fen_char())?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for file in 'a'..='i' {
            write!(f, " {}", file)?;
        }
        writeln!(f)
    }
}
