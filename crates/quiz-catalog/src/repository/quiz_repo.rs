//! 测验仓储
//!
//! 提供测验和测验徽章的数据访问

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::traits::QuizRepositoryTrait;
use super::translate_db_error;
use crate::error::{CatalogError, Result};
use crate::models::{Badge, NewBadge, NewQuiz, Quiz};

/// 测验仓储
///
/// slug 在每次 INSERT/UPDATE 时由标题重新计算，调用方无法指定
pub struct QuizRepository {
    pool: PgPool,
}

fn quiz_conflict(constraint: &str, slug: &str) -> Option<CatalogError> {
    match constraint {
        "quizzes_slug_key" => Some(CatalogError::DuplicateSlug {
            entity: "quiz",
            slug: slug.to_string(),
        }),
        _ => None,
    }
}

fn badge_conflict(constraint: &str, quiz_id: i64) -> Option<CatalogError> {
    match constraint {
        "badges_quiz_id_key" => Some(CatalogError::BadgeAlreadyAssigned(quiz_id)),
        "badges_quiz_id_fkey" => Some(CatalogError::QuizNotFound(quiz_id)),
        _ => None,
    }
}

impl QuizRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 测验 ====================

    /// 创建测验
    pub async fn create_quiz(&self, quiz: &NewQuiz) -> Result<Quiz> {
        quiz.check_pass_mark()?;
        let slug = quiz.slug();
        debug!(slug = %slug, "Saving quiz");

        sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (level, title, slug, single_attempt, pass_mark,
                                 success_text, fail_text, draft, duration_seconds)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, level, title, slug, single_attempt, pass_mark, success_text,
                      fail_text, draft, duration_seconds, created_at, updated_at
            "#,
        )
        .bind(quiz.level)
        .bind(&quiz.title)
        .bind(&slug)
        .bind(quiz.single_attempt)
        .bind(quiz.pass_mark)
        .bind(&quiz.success_text)
        .bind(&quiz.fail_text)
        .bind(quiz.draft)
        .bind(quiz.duration_seconds)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate_db_error(e, |c| quiz_conflict(c, &slug)))
    }

    /// 获取单个测验
    pub async fn get_quiz(&self, id: i64) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, level, title, slug, single_attempt, pass_mark, success_text,
                   fail_text, draft, duration_seconds, created_at, updated_at
            FROM quizzes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    /// 按 slug 获取测验
    pub async fn get_quiz_by_slug(&self, slug: &str) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, level, title, slug, single_attempt, pass_mark, success_text,
                   fail_text, draft, duration_seconds, created_at, updated_at
            FROM quizzes
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    /// 列出测验
    ///
    /// include_drafts 为 false 时排除草稿
    pub async fn list_quizzes(&self, include_drafts: bool) -> Result<Vec<Quiz>> {
        let quizzes = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, level, title, slug, single_attempt, pass_mark, success_text,
                   fail_text, draft, duration_seconds, created_at, updated_at
            FROM quizzes
            WHERE $1 OR draft = false
            ORDER BY id ASC
            "#,
        )
        .bind(include_drafts)
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    /// 保存测验（slug 随标题重新计算）
    pub async fn update_quiz(&self, id: i64, quiz: &NewQuiz) -> Result<Quiz> {
        quiz.check_pass_mark()?;
        let slug = quiz.slug();
        debug!(quiz_id = id, slug = %slug, "Saving quiz");

        sqlx::query_as::<_, Quiz>(
            r#"
            UPDATE quizzes
            SET level = $2, title = $3, slug = $4, single_attempt = $5, pass_mark = $6,
                success_text = $7, fail_text = $8, draft = $9, duration_seconds = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, level, title, slug, single_attempt, pass_mark, success_text,
                      fail_text, draft, duration_seconds, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(quiz.level)
        .bind(&quiz.title)
        .bind(&slug)
        .bind(quiz.single_attempt)
        .bind(quiz.pass_mark)
        .bind(&quiz.success_text)
        .bind(&quiz.fail_text)
        .bind(quiz.draft)
        .bind(quiz.duration_seconds)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| translate_db_error(e, |c| quiz_conflict(c, &slug)))?
        .ok_or(CatalogError::QuizNotFound(id))
    }

    /// 删除测验（题目、选项、徽章由外键级联删除）
    pub async fn delete_quiz(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::QuizNotFound(id));
        }
        Ok(())
    }

    // ==================== 徽章 ====================

    /// 为测验绑定徽章
    pub async fn create_badge(&self, badge: &NewBadge) -> Result<Badge> {
        sqlx::query_as::<_, Badge>(
            r#"
            INSERT INTO badges (quiz_id, image)
            VALUES ($1, $2)
            RETURNING id, quiz_id, image, created_at, updated_at
            "#,
        )
        .bind(badge.quiz_id)
        .bind(&badge.image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate_db_error(e, |c| badge_conflict(c, badge.quiz_id)))
    }

    /// 获取测验的徽章
    pub async fn get_badge_by_quiz(&self, quiz_id: i64) -> Result<Option<Badge>> {
        let badge = sqlx::query_as::<_, Badge>(
            r#"
            SELECT id, quiz_id, image, created_at, updated_at
            FROM badges
            WHERE quiz_id = $1
            "#,
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(badge)
    }

    /// 解绑测验徽章
    pub async fn delete_badge_by_quiz(&self, quiz_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM badges WHERE quiz_id = $1")
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::BadgeNotFound(quiz_id));
        }
        Ok(())
    }
}

#[async_trait]
impl QuizRepositoryTrait for QuizRepository {
    async fn create_quiz(&self, quiz: &NewQuiz) -> Result<Quiz> {
        self.create_quiz(quiz).await
    }

    async fn get_quiz(&self, id: i64) -> Result<Option<Quiz>> {
        self.get_quiz(id).await
    }

    async fn get_quiz_by_slug(&self, slug: &str) -> Result<Option<Quiz>> {
        self.get_quiz_by_slug(slug).await
    }

    async fn list_quizzes(&self, include_drafts: bool) -> Result<Vec<Quiz>> {
        self.list_quizzes(include_drafts).await
    }

    async fn update_quiz(&self, id: i64, quiz: &NewQuiz) -> Result<Quiz> {
        self.update_quiz(id, quiz).await
    }

    async fn delete_quiz(&self, id: i64) -> Result<()> {
        self.delete_quiz(id).await
    }

    async fn create_badge(&self, badge: &NewBadge) -> Result<Badge> {
        self.create_badge(badge).await
    }

    async fn get_badge_by_quiz(&self, quiz_id: i64) -> Result<Option<Badge>> {
        self.get_badge_by_quiz(quiz_id).await
    }

    async fn delete_badge_by_quiz(&self, quiz_id: i64) -> Result<()> {
        self.delete_badge_by_quiz(quiz_id).await
    }
}
