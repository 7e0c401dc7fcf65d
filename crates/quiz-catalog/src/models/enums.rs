//! 题库枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化，
//! 两端均以单字符编码存储（"1".."4"、"a".."d"）

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// 测验难度等级
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    sqlx::Type,
)]
#[sqlx(type_name = "varchar")]
pub enum QuizLevel {
    #[default]
    #[serde(rename = "1")]
    #[sqlx(rename = "1")]
    One,
    #[serde(rename = "2")]
    #[sqlx(rename = "2")]
    Two,
    #[serde(rename = "3")]
    #[sqlx(rename = "3")]
    Three,
    #[serde(rename = "4")]
    #[sqlx(rename = "4")]
    Four,
}

impl QuizLevel {
    pub const ALL: [QuizLevel; 4] = [Self::One, Self::Two, Self::Three, Self::Four];

    /// 存储编码
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
        }
    }
}

impl fmt::Display for QuizLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizLevel {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| CatalogError::Validation(format!("无效的测验等级: {s}")))
    }
}

/// 选项位置
///
/// 派生的 Ord 即字母序，选项列表按此排序
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ChoicePosition {
    A,
    B,
    C,
    D,
}

impl ChoicePosition {
    pub const ALL: [ChoicePosition; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// 存储编码
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
        }
    }
}

impl fmt::Display for ChoicePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoicePosition {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|position| position.as_str() == s)
            .ok_or_else(|| CatalogError::Validation(format!("无效的选项位置: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_level_codes() {
        let codes: Vec<&str> = QuizLevel::ALL.iter().map(|l| l.as_str()).collect();
        assert_eq!(codes, vec!["1", "2", "3", "4"]);
        assert_eq!("3".parse::<QuizLevel>().unwrap(), QuizLevel::Three);
        assert!("5".parse::<QuizLevel>().is_err());
        assert!("".parse::<QuizLevel>().is_err());
    }

    #[test]
    fn test_quiz_level_serde() {
        assert_eq!(serde_json::to_string(&QuizLevel::Two).unwrap(), "\"2\"");
        let level: QuizLevel = serde_json::from_str("\"4\"").unwrap();
        assert_eq!(level, QuizLevel::Four);
        assert!(serde_json::from_str::<QuizLevel>("\"0\"").is_err());
    }

    #[test]
    fn test_choice_position_order_and_codes() {
        let mut positions = vec![ChoicePosition::D, ChoicePosition::A, ChoicePosition::C];
        positions.sort();
        assert_eq!(
            positions,
            vec![ChoicePosition::A, ChoicePosition::C, ChoicePosition::D]
        );
        assert_eq!("b".parse::<ChoicePosition>().unwrap(), ChoicePosition::B);
        assert!("B".parse::<ChoicePosition>().is_err());
        assert!("e".parse::<ChoicePosition>().is_err());
    }

    #[test]
    fn test_choice_position_serde() {
        assert_eq!(serde_json::to_string(&ChoicePosition::C).unwrap(), "\"c\"");
        assert!(serde_json::from_str::<ChoicePosition>("\"z\"").is_err());
    }
}
