//! 题目与选项实体定义

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::ChoicePosition;

/// 题目
///
/// 题干在全部题目范围内唯一
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    pub question_text: String,
    /// 提示，可为空串
    pub hint: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.question_text)
    }
}

/// 选项
///
/// 同一题目下选项内容、位置各自唯一
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub position: ChoicePosition,
    pub choice: String,
    pub is_correct: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Choice {
    /// 选项列表的统一排序：按位置升序
    pub fn sort_by_position(choices: &mut [Choice]) {
        choices.sort_by_key(|c| (c.position, c.id));
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.choice)
    }
}

/// 题目及其有序选项
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionWithChoices {
    pub question: Question,
    pub choices: Vec<Choice>,
    /// 查询时的选项数量
    pub no_choices: i64,
}

impl QuestionWithChoices {
    /// 正确选项
    pub fn correct_choices(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter().filter(|c| c.is_correct)
    }
}

/// 待写入的题目字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub quiz_id: i64,
    pub question_text: String,
    pub hint: String,
}

/// 待写入的选项字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChoice {
    pub question_id: i64,
    pub position: ChoicePosition,
    pub choice: String,
    pub is_correct: bool,
}
