//! 代数记谱
//!
//! 列为 `a`-`i`（不区分大小写），行为 `1`-`10`：`a1` 即 (0, 0)，`i10` 即 (9, 8)。

use crate::types::{Position, ROWS};

/// 解析格子，如 `e1`、`E10`
pub fn parse_square(s: &str) -> Result<Position, String> {
    let s = s.trim();
    let mut chars = s.chars();
    let file = chars
        .next()
        .ok_or_else(|| "Empty square".to_string())?
        .to_ascii_lowercase();

    if !('a'..='i').contains(&file) {
        return Err(format!("Invalid column in square: {}", s));
    }
    let col = (file as u8 - b'a') as i8;

    let rank = chars.as_str();
    // 只接受不带符号和前导零的数字
    if rank.is_empty() || rank.starts_with('0') || !rank.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("Invalid row in square: {}", s));
    }
    let row = rank
        .parse::<i8>()
        .ok()
        .filter(|r| (1..=ROWS).contains(r))
        .ok_or_else(|| format!("Row out of range in square: {}", s))?;

    Ok(Position::new(row - 1, col))
}

/// 格式化为记谱，如 (0, 4) -> `e1`
pub fn format_square(pos: Position) -> String {
    debug_assert!(pos.is_valid());
    let file = (b'a' + pos.col as u8) as char;
    format!("{}{}", file, pos.row + 1)
}

/// 解析一步走法：`b1c3`、`b1-c3` 或 `b1 c3`
pub fn parse_move(s: &str) -> Result<(Position, Position), String> {
    let s = s.trim();
    let parts: Vec<&str> = s
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [from, to] => Ok((parse_square(from)?, parse_square(to)?)),
        [joined] => {
            // 第二个字母的位置即目标格起点
            let split = joined
                .char_indices()
                .skip(1)
                .find(|(_, c)| c.is_ascii_alphabetic())
                .map(|(i, _)| i)
                .ok_or_else(|| format!("Invalid move: {}", s))?;
            let (from, to) = joined.split_at(split);
            Ok((parse_square(from)?, parse_square(to)?))
        }
        _ => Err(format!("Invalid move: {}", s)),
    }
}
