//! 题目仓储
//!
//! 提供题目、选项的数据访问以及选项计数

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::traits::QuestionRepositoryTrait;
use super::translate_db_error;
use crate::error::{CatalogError, Result};
use crate::models::{Choice, NewChoice, NewQuestion, Question};

/// 题目仓储
pub struct QuestionRepository {
    pool: PgPool,
}

fn question_conflict(constraint: &str, question: &NewQuestion) -> Option<CatalogError> {
    match constraint {
        "questions_question_text_key" => Some(CatalogError::DuplicateQuestionText(
            question.question_text.clone(),
        )),
        "questions_quiz_id_fkey" => Some(CatalogError::QuizNotFound(question.quiz_id)),
        _ => None,
    }
}

fn choice_conflict(constraint: &str, choice: &NewChoice) -> Option<CatalogError> {
    match constraint {
        "choices_question_choice_key" => Some(CatalogError::DuplicateChoiceText {
            question_id: choice.question_id,
            choice: choice.choice.clone(),
        }),
        "choices_question_position_key" => Some(CatalogError::DuplicateChoicePosition {
            question_id: choice.question_id,
            position: choice.position,
        }),
        "choices_question_id_fkey" => Some(CatalogError::QuestionNotFound(choice.question_id)),
        _ => None,
    }
}

impl QuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 题目 ====================

    /// 创建题目
    pub async fn create_question(&self, question: &NewQuestion) -> Result<Question> {
        sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (quiz_id, question_text, hint)
            VALUES ($1, $2, $3)
            RETURNING id, quiz_id, question_text, hint, created_at, updated_at
            "#,
        )
        .bind(question.quiz_id)
        .bind(&question.question_text)
        .bind(&question.hint)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate_db_error(e, |c| question_conflict(c, question)))
    }

    /// 获取单个题目
    pub async fn get_question(&self, id: i64) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, question_text, hint, created_at, updated_at
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    /// 按测验列出题目
    pub async fn list_questions_by_quiz(&self, quiz_id: i64) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, question_text, hint, created_at, updated_at
            FROM questions
            WHERE quiz_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    /// 更新题目
    pub async fn update_question(&self, id: i64, question: &NewQuestion) -> Result<Question> {
        sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET quiz_id = $2, question_text = $3, hint = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, quiz_id, question_text, hint, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(question.quiz_id)
        .bind(&question.question_text)
        .bind(&question.hint)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| translate_db_error(e, |c| question_conflict(c, question)))?
        .ok_or(CatalogError::QuestionNotFound(id))
    }

    /// 删除题目（选项由外键级联删除）
    pub async fn delete_question(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::QuestionNotFound(id));
        }
        Ok(())
    }

    /// 统计题目的选项数量
    ///
    /// 每次调用都查询数据库
    pub async fn count_choices(&self, question_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM choices WHERE question_id = $1")
            .bind(question_id)
            .fetch_one(&self.pool)
            .await?;

        debug!(question_id, count, "Counted choices");
        Ok(count)
    }

    // ==================== 选项 ====================

    /// 创建选项
    pub async fn create_choice(&self, choice: &NewChoice) -> Result<Choice> {
        sqlx::query_as::<_, Choice>(
            r#"
            INSERT INTO choices (question_id, position, choice, is_correct)
            VALUES ($1, $2, $3, $4)
            RETURNING id, question_id, position, choice, is_correct, created_at, updated_at
            "#,
        )
        .bind(choice.question_id)
        .bind(choice.position)
        .bind(&choice.choice)
        .bind(choice.is_correct)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate_db_error(e, |c| choice_conflict(c, choice)))
    }

    /// 获取单个选项
    pub async fn get_choice(&self, id: i64) -> Result<Option<Choice>> {
        let choice = sqlx::query_as::<_, Choice>(
            r#"
            SELECT id, question_id, position, choice, is_correct, created_at, updated_at
            FROM choices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(choice)
    }

    /// 按题目列出选项，位置升序
    pub async fn list_choices_by_question(&self, question_id: i64) -> Result<Vec<Choice>> {
        let choices = sqlx::query_as::<_, Choice>(
            r#"
            SELECT id, question_id, position, choice, is_correct, created_at, updated_at
            FROM choices
            WHERE question_id = $1
            ORDER BY position ASC, id ASC
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(choices)
    }

    /// 更新选项
    pub async fn update_choice(&self, id: i64, choice: &NewChoice) -> Result<Choice> {
        sqlx::query_as::<_, Choice>(
            r#"
            UPDATE choices
            SET question_id = $2, position = $3, choice = $4, is_correct = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, question_id, position, choice, is_correct, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(choice.question_id)
        .bind(choice.position)
        .bind(&choice.choice)
        .bind(choice.is_correct)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| translate_db_error(e, |c| choice_conflict(c, choice)))?
        .ok_or(CatalogError::ChoiceNotFound(id))
    }

    /// 删除选项
    pub async fn delete_choice(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM choices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ChoiceNotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl QuestionRepositoryTrait for QuestionRepository {
    async fn create_question(&self, question: &NewQuestion) -> Result<Question> {
        self.create_question(question).await
    }

    async fn get_question(&self, id: i64) -> Result<Option<Question>> {
        self.get_question(id).await
    }

    async fn list_questions_by_quiz(&self, quiz_id: i64) -> Result<Vec<Question>> {
        self.list_questions_by_quiz(quiz_id).await
    }

    async fn update_question(&self, id: i64, question: &NewQuestion) -> Result<Question> {
        self.update_question(id, question).await
    }

    async fn delete_question(&self, id: i64) -> Result<()> {
        self.delete_question(id).await
    }

    async fn count_choices(&self, question_id: i64) -> Result<i64> {
        self.count_choices(question_id).await
    }

    async fn create_choice(&self, choice: &NewChoice) -> Result<Choice> {
        self.create_choice(choice).await
    }

    async fn get_choice(&self, id: i64) -> Result<Option<Choice>> {
        self.get_choice(id).await
    }

    async fn list_choices_by_question(&self, question_id: i64) -> Result<Vec<Choice>> {
        self.list_choices_by_question(question_id).await
    }

    async fn update_choice(&self, id: i64, choice: &NewChoice) -> Result<Choice> {
        self.update_choice(id, choice).await
    }

    async fn delete_choice(&self, id: i64) -> Result<()> {
        self.delete_choice(id).await
    }
}
