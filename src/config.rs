//! 规则配置
//!
//! 两处规则可切换：将的走法，以及自将检查的时机。
//! 默认使用标准规则；`RuleConfig::reference()` 为兼容模式。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 将/帅的一步走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneralMovement {
    /// 标准规则：九宫内上下左右一步
    #[default]
    Orthogonal,
    /// 兼容模式：九宫内八个方向一步（含斜走）
    EightWay,
}

/// 何时过滤会导致己方被将军的走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfCheckPolicy {
    /// 每一步都模拟检查
    #[default]
    Always,
    /// 仅在走子方已被将军时检查
    WhenInCheck,
}

/// 规则配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub general_movement: GeneralMovement,
    pub self_check: SelfCheckPolicy,
}

impl RuleConfig {
    /// 兼容模式：将可斜走，且仅在被将军时检查自将
    pub fn reference() -> Self {
        RuleConfig {
            general_movement: GeneralMovement::EightWay,
            self_check: SelfCheckPolicy::WhenInCheck,
        }
    }

    /// 从 JSON 字符串解析，缺省字段取默认值
    pub fn from_json_str(s: &str) -> Result<RuleConfig, String> {
        serde_json::from_str(s).map_err(|e| format!("Invalid rules JSON: {}", e))
    }

    /// 从 JSON 文件加载
    pub fn from_file(path: impl AsRef<Path>) -> Result<RuleConfig, String> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read rules file {}: {}", path.display(), e))?;
        Self::from_json_str(&text)
    }
}
