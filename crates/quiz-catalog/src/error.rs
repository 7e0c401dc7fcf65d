//! 题库服务错误类型
//!
//! 约束冲突和参数校验失败统一视为数据校验错误返回给调用方，不做内部重试

use thiserror::Error;

use crate::models::ChoicePosition;

/// 题库服务错误类型
#[derive(Debug, Error)]
pub enum CatalogError {
    // === 记录不存在 ===
    #[error("学科不存在: {0}")]
    SubjectNotFound(i64),

    #[error("课程不存在: {0}")]
    CourseNotFound(i64),

    #[error("测验不存在: {0}")]
    QuizNotFound(i64),

    #[error("题目不存在: {0}")]
    QuestionNotFound(i64),

    #[error("选项不存在: {0}")]
    ChoiceNotFound(i64),

    #[error("测验徽章不存在: quiz_id={0}")]
    BadgeNotFound(i64),

    #[error("记录不存在: {entity} slug={slug}")]
    SlugNotFound { entity: &'static str, slug: String },

    // === 约束冲突 ===
    #[error("slug 已存在: {entity} slug={slug}")]
    DuplicateSlug { entity: &'static str, slug: String },

    #[error("题干已存在: {0}")]
    DuplicateQuestionText(String),

    #[error("同一题目下选项内容重复: question_id={question_id}, choice={choice}")]
    DuplicateChoiceText { question_id: i64, choice: String },

    #[error("同一题目下选项位置重复: question_id={question_id}, position={position}")]
    DuplicateChoicePosition {
        question_id: i64,
        position: ChoicePosition,
    },

    #[error("测验已绑定徽章: quiz_id={0}")]
    BadgeAlreadyAssigned(i64),

    // === 参数校验 ===
    #[error("参数校验失败: {0}")]
    Validation(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
}

/// 题库服务 Result 类型别名
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// 是否为数据校验错误（约束冲突 + 参数校验）
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateSlug { .. }
                | Self::DuplicateQuestionText(_)
                | Self::DuplicateChoiceText { .. }
                | Self::DuplicateChoicePosition { .. }
                | Self::BadgeAlreadyAssigned(_)
                | Self::Validation(_)
        )
    }

    /// 是否为记录不存在
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SubjectNotFound(_)
                | Self::CourseNotFound(_)
                | Self::QuizNotFound(_)
                | Self::QuestionNotFound(_)
                | Self::ChoiceNotFound(_)
                | Self::BadgeNotFound(_)
                | Self::SlugNotFound { .. }
        )
    }

    /// 检查是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Database(sqlx::Error::PoolTimedOut) | Self::Database(sqlx::Error::Io(_))
        )
    }

    /// 获取错误码
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SubjectNotFound(_) => "SUBJECT_NOT_FOUND",
            Self::CourseNotFound(_) => "COURSE_NOT_FOUND",
            Self::QuizNotFound(_) => "QUIZ_NOT_FOUND",
            Self::QuestionNotFound(_) => "QUESTION_NOT_FOUND",
            Self::ChoiceNotFound(_) => "CHOICE_NOT_FOUND",
            Self::BadgeNotFound(_) => "BADGE_NOT_FOUND",
            Self::SlugNotFound { .. } => "NOT_FOUND",
            Self::DuplicateSlug { .. } => "DUPLICATE_SLUG",
            Self::DuplicateQuestionText(_) => "DUPLICATE_QUESTION_TEXT",
            Self::DuplicateChoiceText { .. } => "DUPLICATE_CHOICE_TEXT",
            Self::DuplicateChoicePosition { .. } => "DUPLICATE_CHOICE_POSITION",
            Self::BadgeAlreadyAssigned(_) => "BADGE_ALREADY_ASSIGNED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for CatalogError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_error_variants() -> Vec<(CatalogError, &'static str, bool)> {
        vec![
            (CatalogError::SubjectNotFound(1), "SUBJECT_NOT_FOUND", false),
            (CatalogError::CourseNotFound(2), "COURSE_NOT_FOUND", false),
            (CatalogError::QuizNotFound(3), "QUIZ_NOT_FOUND", false),
            (CatalogError::QuestionNotFound(4), "QUESTION_NOT_FOUND", false),
            (CatalogError::ChoiceNotFound(5), "CHOICE_NOT_FOUND", false),
            (CatalogError::BadgeNotFound(6), "BADGE_NOT_FOUND", false),
            (
                CatalogError::SlugNotFound {
                    entity: "subject",
                    slug: "algebra".into(),
                },
                "NOT_FOUND",
                false,
            ),
            (
                CatalogError::DuplicateSlug {
                    entity: "quiz",
                    slug: "algebra".into(),
                },
                "DUPLICATE_SLUG",
                true,
            ),
            (
                CatalogError::DuplicateQuestionText("2 + 2 = ?".into()),
                "DUPLICATE_QUESTION_TEXT",
                true,
            ),
            (
                CatalogError::DuplicateChoiceText {
                    question_id: 1,
                    choice: "4".into(),
                },
                "DUPLICATE_CHOICE_TEXT",
                true,
            ),
            (
                CatalogError::DuplicateChoicePosition {
                    question_id: 1,
                    position: ChoicePosition::B,
                },
                "DUPLICATE_CHOICE_POSITION",
                true,
            ),
            (CatalogError::BadgeAlreadyAssigned(9), "BADGE_ALREADY_ASSIGNED", true),
            (CatalogError::Validation("pass_mark".into()), "VALIDATION_ERROR", true),
            (
                CatalogError::Database(sqlx::Error::PoolTimedOut),
                "DATABASE_ERROR",
                false,
            ),
        ]
    }

    #[test]
    fn test_all_variants_error_code() {
        for (error, expected_code, _) in all_error_variants() {
            assert_eq!(error.error_code(), expected_code);
        }
    }

    #[test]
    fn test_all_variants_validation_classification() {
        for (error, _, is_validation) in all_error_variants() {
            assert_eq!(
                error.is_validation_error(),
                is_validation,
                "分类不匹配: {}",
                error.error_code()
            );
        }
    }

    #[test]
    fn test_not_found_and_retryable() {
        assert!(CatalogError::QuizNotFound(1).is_not_found());
        assert!(!CatalogError::Validation("x".into()).is_not_found());
        assert!(CatalogError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!CatalogError::DuplicateQuestionText("x".into()).is_retryable());
    }

    #[test]
    fn test_display_contains_context() {
        let err = CatalogError::DuplicateChoicePosition {
            question_id: 42,
            position: ChoicePosition::C,
        };
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("c"));

        let err = CatalogError::DuplicateSlug {
            entity: "course",
            slug: "intro-to-rust".into(),
        };
        assert!(err.to_string().contains("intro-to-rust"));
    }
}
