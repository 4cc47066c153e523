//! 测试局面库
//!
//! 提供命名的 FEN 测试局面，方便测试和调试
//!
//! 命名规范:
//! - START: 初始局面
//! - CHECK_n: 将军局面
//! - MATE_n: 杀棋局面（走子方已无解）
//! - SPECIAL_n: 特殊规则（照面、困毙等）

// =============================================================================
// 开局 (START)
// =============================================================================

/// 初始局面，红方先走
pub const START: &str = "rheakaehr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RHEAKAEHR w";

/// 红方中炮后，黑方走
pub const CENTRAL_CANNON: &str = "rheakaehr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C2C4/9/RHEAKAEHR b";

// =============================================================================
// 将军 (CHECK_n)
// =============================================================================

/// 红车照将，黑将可以横走
pub const CHECK_1: &str = "4k4/4R4/9/9/9/9/9/9/9/3K5 b";

/// 红炮隔黑卒将军
pub const CHECK_2: &str = "4k4/9/4p4/9/4C4/9/9/9/9/3K5 b";

/// 红马将军
pub const CHECK_3: &str = "4k4/9/3H5/9/9/9/9/9/9/3K5 b";

// =============================================================================
// 杀棋 (MATE_n)
// =============================================================================

/// 双车错杀
pub const MATE_1: &str = "R3k4/8R/9/9/9/9/9/9/9/3K5 b";

/// 重炮杀：两炮同列，前炮作炮架
pub const MATE_2: &str = "1heakaehr/r8/1c5c1/p1p1C1p1p/4C4/9/P1P1P1P1P/9/9/RHEAKAEHR b";

// =============================================================================
// 特殊规则 (SPECIAL_n)
// =============================================================================

/// 将帅同列，中间只有红马
pub const SPECIAL_1: &str = "4k4/9/9/9/9/4H4/9/9/9/4K4 w";

/// 困毙：黑将未被将军但无路可走
pub const SPECIAL_2: &str = "3k5/R8/9/9/9/9/9/9/4R4/5K3 b";

/// 所有命名局面 (名称, FEN)
pub const ALL: [(&str, &str); 9] = [
    ("START", START),
    ("CENTRAL_CANNON", CENTRAL_CANNON),
    ("CHECK_1", CHECK_1),
    ("CHECK_2", CHECK_2),
    ("CHECK_3", CHECK_3),
    ("MATE_1", MATE_1),
    ("MATE_2", MATE_2),
    ("SPECIAL_1", SPECIAL_1),
    ("SPECIAL_2", SPECIAL_2),
];

/// 按名称查找局面（不区分大小写）
pub fn by_name(name: &str) -> Option<&'static str> {
    ALL.iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, fen)| *fen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::game::Game;
    use crate::types::{Color, GameState};

    #[test]
    fn test_all_positions_parse() {
        for (name, fen) in ALL {
            assert!(Game::from_fen(fen, RuleConfig::default()).is_ok(), "{} failed", name);
        }
    }

    #[test]
    fn test_checks() {
        for fen in [CHECK_1, CHECK_2, CHECK_3] {
            let game = Game::from_fen(fen, RuleConfig::default()).unwrap();
            assert!(game.is_in_check(Color::Black), "{}", fen);
            assert!(!game.is_in_check(Color::Red), "{}", fen);
            assert_eq!(game.game_state(), GameState::Unfinished, "{}", fen);
        }
    }

    #[test]
    fn test_mates() {
        for fen in [MATE_1, MATE_2, SPECIAL_2] {
            let game = Game::from_fen(fen, RuleConfig::default()).unwrap();
            assert_eq!(game.game_state(), GameState::RedWon, "{}", fen);
        }
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("mate_1"), Some(MATE_1));
        assert_eq!(by_name("nope"), None);
    }
}
