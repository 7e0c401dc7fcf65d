//! 服务层请求 DTO
//!
//! 字段长度等约束由 validator 在进入仓储前校验；
//! 更新请求的字段均为可选，缺省字段保留原值

use serde::Deserialize;
use validator::Validate;

use crate::models::{
    ChoicePosition, DEFAULT_DURATION_MINUTES, DEFAULT_FAIL_TEXT, DEFAULT_SUCCESS_TEXT,
    QuizLevel,
};

fn default_success_text() -> String {
    DEFAULT_SUCCESS_TEXT.to_string()
}

fn default_fail_text() -> String {
    DEFAULT_FAIL_TEXT.to_string()
}

fn default_duration_seconds() -> i64 {
    DEFAULT_DURATION_MINUTES * 60
}

// ==================== 学科 / 课程 ====================

/// 创建学科请求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 200, message = "学科标题长度必须在1-200个字符之间"))]
    pub title: String,
    #[validate(
        length(min = 1, max = 200, message = "slug 长度必须在1-200个字符之间"),
        custom(function = "crate::slug::validate_slug")
    )]
    pub slug: String,
}

/// 更新学科请求
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 200, message = "学科标题长度必须在1-200个字符之间"))]
    pub title: Option<String>,
    #[validate(
        length(min = 1, max = 200, message = "slug 长度必须在1-200个字符之间"),
        custom(function = "crate::slug::validate_slug")
    )]
    pub slug: Option<String>,
}

/// 创建课程请求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub subject_id: i64,
    #[validate(length(min = 1, max = 200, message = "课程标题长度必须在1-200个字符之间"))]
    pub title: String,
    #[validate(
        length(min = 1, max = 200, message = "slug 长度必须在1-200个字符之间"),
        custom(function = "crate::slug::validate_slug")
    )]
    pub slug: String,
    #[serde(default)]
    pub overview: String,
}

/// 更新课程请求
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub subject_id: Option<i64>,
    #[validate(length(min = 1, max = 200, message = "课程标题长度必须在1-200个字符之间"))]
    pub title: Option<String>,
    #[validate(
        length(min = 1, max = 200, message = "slug 长度必须在1-200个字符之间"),
        custom(function = "crate::slug::validate_slug")
    )]
    pub slug: Option<String>,
    pub overview: Option<String>,
}

// ==================== 测验 / 徽章 ====================

/// 创建测验请求
///
/// 不接受 slug，保存时由标题生成
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[serde(default)]
    pub level: QuizLevel,
    #[validate(length(min = 1, max = 200, message = "测验标题长度必须在1-200个字符之间"))]
    pub title: String,
    #[serde(default)]
    pub single_attempt: bool,
    #[serde(default)]
    #[validate(range(max = 100, message = "及格分不能大于100"))]
    pub pass_mark: i16,
    #[serde(default = "default_success_text")]
    pub success_text: String,
    #[serde(default = "default_fail_text")]
    pub fail_text: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: i64,
}

impl CreateQuizRequest {
    /// 以默认值构造
    pub fn new(level: QuizLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            single_attempt: false,
            pass_mark: 0,
            success_text: default_success_text(),
            fail_text: default_fail_text(),
            draft: false,
            duration_seconds: default_duration_seconds(),
        }
    }
}

/// 更新测验请求
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    pub level: Option<QuizLevel>,
    #[validate(length(min = 1, max = 200, message = "测验标题长度必须在1-200个字符之间"))]
    pub title: Option<String>,
    pub single_attempt: Option<bool>,
    #[validate(range(max = 100, message = "及格分不能大于100"))]
    pub pass_mark: Option<i16>,
    pub success_text: Option<String>,
    pub fail_text: Option<String>,
    pub draft: Option<bool>,
    pub duration_seconds: Option<i64>,
}

/// 绑定徽章请求
///
/// image 为文件名或 images/ 下的相对路径
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttachBadgeRequest {
    #[validate(length(min = 1, max = 100, message = "图片路径长度必须在1-100个字符之间"))]
    pub image: String,
}

// ==================== 题目 / 选项 ====================

/// 创建题目请求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1024, message = "题干长度必须在1-1024个字符之间"))]
    pub question_text: String,
    #[serde(default)]
    #[validate(length(max = 1024, message = "提示不能超过1024个字符"))]
    pub hint: String,
}

/// 更新题目请求
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 1024, message = "题干长度必须在1-1024个字符之间"))]
    pub question_text: Option<String>,
    #[validate(length(max = 1024, message = "提示不能超过1024个字符"))]
    pub hint: Option<String>,
}

/// 创建选项请求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChoiceRequest {
    pub position: ChoicePosition,
    #[validate(length(min = 1, max = 50, message = "选项内容长度必须在1-50个字符之间"))]
    pub choice: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// 更新选项请求
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChoiceRequest {
    pub position: Option<ChoicePosition>,
    #[validate(length(min = 1, max = 50, message = "选项内容长度必须在1-50个字符之间"))]
    pub choice: Option<String>,
    pub is_correct: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_quiz_request_defaults() {
        let req: CreateQuizRequest =
            serde_json::from_value(serde_json::json!({ "title": "Rust Basics" })).unwrap();
        assert_eq!(req.level, QuizLevel::One);
        assert_eq!(req.pass_mark, 0);
        assert_eq!(req.duration_seconds, 2400);
        assert_eq!(req.success_text, DEFAULT_SUCCESS_TEXT);
        assert_eq!(req.fail_text, DEFAULT_FAIL_TEXT);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_caller_slug_is_ignored() {
        let req: CreateQuizRequest = serde_json::from_value(serde_json::json!({
            "title": "Rust Basics",
            "slug": "custom-slug",
            "level": "3"
        }))
        .unwrap();
        assert_eq!(req.level, QuizLevel::Three);
    }

    #[test]
    fn test_pass_mark_range() {
        let mut req = CreateQuizRequest::new(QuizLevel::One, "Bounds");
        req.pass_mark = 100;
        assert!(req.validate().is_ok());
        req.pass_mark = 101;
        assert!(req.validate().is_err());

        let update = UpdateQuizRequest {
            pass_mark: Some(150),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_slug_alphabet() {
        let ok = CreateSubjectRequest {
            title: "Maths".into(),
            slug: "maths_101-a".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = CreateSubjectRequest {
            title: "Maths".into(),
            slug: "maths 101".into(),
        };
        assert!(bad.validate().is_err());

        let empty = UpdateSubjectRequest {
            slug: Some(String::new()),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
        assert!(UpdateSubjectRequest::default().validate().is_ok());
    }

    #[test]
    fn test_choice_length() {
        let req = CreateChoiceRequest {
            position: ChoicePosition::A,
            choice: "x".repeat(51),
            is_correct: false,
        };
        assert!(req.validate().is_err());

        let req = CreateChoiceRequest {
            position: ChoicePosition::A,
            choice: "x".repeat(50),
            is_correct: true,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_question_hint_may_be_empty() {
        let req: CreateQuestionRequest =
            serde_json::from_value(serde_json::json!({ "questionText": "What is a lifetime?" }))
                .unwrap();
        assert!(req.hint.is_empty());
        assert!(req.validate().is_ok());

        let req = CreateQuestionRequest {
            question_text: String::new(),
            hint: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
