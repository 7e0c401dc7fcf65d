//! 测验实体定义

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::slug::slugify;

use super::badge::Badge;
use super::enums::QuizLevel;
use super::question::QuestionWithChoices;

/// 及格分上限（百分制）
pub const MAX_PASS_MARK: i16 = 100;

/// 默认测验时长（分钟）
pub const DEFAULT_DURATION_MINUTES: i64 = 40;

/// 通过时默认展示文案
pub const DEFAULT_SUCCESS_TEXT: &str = "Hurray you have passed";

/// 未通过时默认展示文案
pub const DEFAULT_FAIL_TEXT: &str = "Hurray you have failed";

/// 测验
///
/// slug 由标题派生，每次保存前重新计算
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,
    pub level: QuizLevel,
    pub title: String,
    pub slug: String,
    /// 是否只允许作答一次
    pub single_attempt: bool,
    /// 通过所需分数（百分制）
    pub pass_mark: i16,
    /// 通过时展示
    pub success_text: String,
    /// 未通过时展示
    pub fail_text: String,
    pub draft: bool,
    /// 作答时长（秒）
    pub duration_seconds: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    /// 作答时长
    pub fn duration(&self) -> Duration {
        Duration::seconds(self.duration_seconds)
    }

    /// 给定得分（百分制）是否通过
    pub fn passed(&self, score_percent: i32) -> bool {
        score_percent >= i32::from(self.pass_mark)
    }

    /// 给定得分对应的结果文案
    pub fn result_text(&self, score_percent: i32) -> &str {
        if self.passed(score_percent) {
            &self.success_text
        } else {
            &self.fail_text
        }
    }
}

impl fmt::Display for Quiz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// 待写入的测验字段
///
/// 不含 slug：仓储在每次写入前以 [`NewQuiz::slug`] 重新计算
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuiz {
    pub level: QuizLevel,
    pub title: String,
    pub single_attempt: bool,
    pub pass_mark: i16,
    pub success_text: String,
    pub fail_text: String,
    pub draft: bool,
    pub duration_seconds: i64,
}

impl NewQuiz {
    /// 以默认值构造
    pub fn new(level: QuizLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            single_attempt: false,
            pass_mark: 0,
            success_text: DEFAULT_SUCCESS_TEXT.to_string(),
            fail_text: DEFAULT_FAIL_TEXT.to_string(),
            draft: false,
            duration_seconds: DEFAULT_DURATION_MINUTES * 60,
        }
    }

    /// 由标题派生的 slug
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    /// 写入前的存储层校验
    pub fn check_pass_mark(&self) -> Result<(), CatalogError> {
        if self.pass_mark > MAX_PASS_MARK {
            return Err(CatalogError::Validation(format!(
                "pass_mark 不能大于 {MAX_PASS_MARK}: {}",
                self.pass_mark
            )));
        }
        Ok(())
    }
}

impl From<&Quiz> for NewQuiz {
    fn from(quiz: &Quiz) -> Self {
        Self {
            level: quiz.level,
            title: quiz.title.clone(),
            single_attempt: quiz.single_attempt,
            pass_mark: quiz.pass_mark,
            success_text: quiz.success_text.clone(),
            fail_text: quiz.fail_text.clone(),
            draft: quiz.draft,
            duration_seconds: quiz.duration_seconds,
        }
    }
}

/// 测验详情
///
/// 聚合徽章、题目及各题目的有序选项
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDetail {
    pub quiz: Quiz,
    pub badge: Option<Badge>,
    pub questions: Vec<QuestionWithChoices>,
}

impl QuizDetail {
    /// 全部题目的选项总数
    pub fn total_choices(&self) -> i64 {
        self.questions.iter().map(|q| q.no_choices).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_quiz(pass_mark: i16) -> Quiz {
        Quiz {
            id: 1,
            level: QuizLevel::Two,
            title: "Rust Basics".to_string(),
            slug: "rust-basics".to_string(),
            single_attempt: false,
            pass_mark,
            success_text: DEFAULT_SUCCESS_TEXT.to_string(),
            fail_text: DEFAULT_FAIL_TEXT.to_string(),
            draft: false,
            duration_seconds: DEFAULT_DURATION_MINUTES * 60,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_default_duration_is_forty_minutes() {
        let quiz = create_test_quiz(50);
        assert_eq!(quiz.duration(), Duration::minutes(40));
    }

    #[test]
    fn test_passed_boundary() {
        let quiz = create_test_quiz(60);
        assert!(!quiz.passed(59));
        assert!(quiz.passed(60));
        assert!(quiz.passed(100));
    }

    #[test]
    fn test_zero_pass_mark_always_passes() {
        let quiz = create_test_quiz(0);
        assert!(quiz.passed(0));
    }

    #[test]
    fn test_result_text() {
        let quiz = create_test_quiz(70);
        assert_eq!(quiz.result_text(90), DEFAULT_SUCCESS_TEXT);
        assert_eq!(quiz.result_text(10), DEFAULT_FAIL_TEXT);
    }

    #[test]
    fn test_new_quiz_defaults_and_slug() {
        let new = NewQuiz::new(QuizLevel::One, "Rust: The Basics!");
        assert_eq!(new.slug(), "rust-the-basics");
        assert_eq!(new.pass_mark, 0);
        assert_eq!(new.duration_seconds, 2400);
        assert_eq!(new.success_text, DEFAULT_SUCCESS_TEXT);
        assert!(!new.single_attempt);
        assert!(!new.draft);
    }

    #[test]
    fn test_check_pass_mark() {
        let mut new = NewQuiz::new(QuizLevel::One, "Bounds");
        new.pass_mark = 100;
        assert!(new.check_pass_mark().is_ok());
        new.pass_mark = 101;
        assert!(new.check_pass_mark().is_err());
    }

    #[test]
    fn test_new_quiz_from_quiz() {
        let quiz = create_test_quiz(55);
        let new = NewQuiz::from(&quiz);
        assert_eq!(new.title, quiz.title);
        assert_eq!(new.pass_mark, 55);
        assert_eq!(new.slug(), quiz.slug);
    }

    #[test]
    fn test_display_and_serialization() {
        let quiz = create_test_quiz(70);
        assert_eq!(quiz.to_string(), "Rust Basics");

        let json = serde_json::to_value(&quiz).unwrap();
        assert_eq!(json["level"], "2");
        assert_eq!(json["passMark"], 70);
        assert_eq!(json["singleAttempt"], false);
    }
}
