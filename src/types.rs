//! 象棋核心类型定义
//!
//! 定义规则引擎中所有基础数据类型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 棋盘行数
pub const ROWS: i8 = 10;
/// 棋盘列数
pub const COLS: i8 = 9;
/// 格子总数
pub const SQUARES: usize = (ROWS as usize) * (COLS as usize);

/// 棋子颜色/阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opposite(&self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// 前进方向（行增量）
    #[inline]
    pub fn forward(&self) -> i8 {
        match self {
            Color::Red => 1,
            Color::Black => -1,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Color> {
        match c {
            'w' | 'r' => Some(Color::Red),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// 转换为 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Color::Red => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    /// 将/帅
    General,
    /// 士/仕
    Advisor,
    /// 象/相
    Elephant,
    /// 马
    Horse,
    /// 车
    Chariot,
    /// 炮
    Cannon,
    /// 卒/兵
    Soldier,
}

impl PieceType {
    /// 从 FEN 字符解析（大小写均可）
    pub fn from_fen_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceType::General),
            'a' => Some(PieceType::Advisor),
            'e' | 'b' => Some(PieceType::Elephant),
            'h' | 'n' => Some(PieceType::Horse),
            'r' => Some(PieceType::Chariot),
            'c' => Some(PieceType::Cannon),
            'p' => Some(PieceType::Soldier),
            _ => None,
        }
    }

    /// 转换为 FEN 字符（小写）
    pub fn to_fen_char(&self) -> char {
        match self {
            PieceType::General => 'k',
            PieceType::Advisor => 'a',
            PieceType::Elephant => 'e',
            PieceType::Horse => 'h',
            PieceType::Chariot => 'r',
            PieceType::Cannon => 'c',
            PieceType::Soldier => 'p',
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::General => "General",
            PieceType::Advisor => "Advisor",
            PieceType::Elephant => "Elephant",
            PieceType::Horse => "Horse",
            PieceType::Chariot => "Chariot",
            PieceType::Cannon => "Cannon",
            PieceType::Soldier => "Soldier",
        };
        write!(f, "{}", name)
    }
}

/// 棋盘位置 (row, col)
///
/// row: 0-9 (0 是红方底线，9 是黑方底线)
/// col: 0-8 (从左到右)
///
/// 河界位于第 4 行和第 5 行之间。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..ROWS).contains(&self.row) && (0..COLS).contains(&self.col)
    }

    /// 检查位置是否在九宫格内
    pub fn is_in_palace(&self, color: Color) -> bool {
        if !(3..=5).contains(&self.col) {
            return false;
        }
        match color {
            Color::Red => (0..=2).contains(&self.row),
            Color::Black => (7..=9).contains(&self.row),
        }
    }

    /// 检查位置是否在己方半场
    pub fn is_on_own_side(&self, color: Color) -> bool {
        match color {
            Color::Red => (0..=4).contains(&self.row),
            Color::Black => (5..=9).contains(&self.row),
        }
    }

    /// 位置加偏移量（不检查边界）
    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 上下翻转棋盘（row -> 9 - row）
    #[inline]
    pub fn mirror(&self) -> Position {
        Position {
            row: ROWS - 1 - self.row,
            col: self.col,
        }
    }

    /// 转换为数组下标，调用方保证位置合法
    #[inline]
    pub fn to_index(&self) -> usize {
        self.row as usize * COLS as usize + self.col as usize
    }

    pub fn from_index(index: usize) -> Position {
        Position {
            row: (index / COLS as usize) as i8,
            col: (index % COLS as usize) as i8,
        }
    }

    /// 所有 90 个位置（按行优先）
    pub fn all() -> impl Iterator<Item = Position> {
        (0..SQUARES).map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 棋子
///
/// 类型与颜色不可变，位置随走子更新。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
    pub position: Position,
}

impl Piece {
    pub fn new(kind: PieceType, color: Color, position: Position) -> Self {
        Piece {
            kind,
            color,
            position,
        }
    }

    /// 棋盘字符：红方大写，黑方小写
    pub fn to_fen_char(&self) -> char {
        let ch = self.kind.to_fen_char();
        match self.color {
            Color::Red => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    /// 是否已过河
    pub fn has_crossed_river(&self) -> bool {
        !self.position.is_on_own_side(self.color)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

/// 对局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    Unfinished,
    RedWon,
    BlackWon,
}

impl GameState {
    /// 某方获胜对应的状态
    pub fn won_by(color: Color) -> GameState {
        match color {
            Color::Red => GameState::RedWon,
            Color::Black => GameState::BlackWon,
        }
    }

    pub fn is_finished(&self) -> bool {
        *self != GameState::Unfinished
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Unfinished => write!(f, "UNFINISHED"),
            GameState::RedWon => write!(f, "RED_WON"),
            GameState::BlackWon => write!(f, "BLACK_WON"),
        }
    }
}
