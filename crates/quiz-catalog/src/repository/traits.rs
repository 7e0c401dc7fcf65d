//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Badge, Choice, Course, NewBadge, NewChoice, NewCourse, NewQuestion, NewQuiz, NewSubject,
    Question, Quiz, Subject,
};

/// 学科/课程仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubjectRepositoryTrait: Send + Sync {
    // 学科
    async fn create_subject(&self, subject: &NewSubject) -> Result<Subject>;
    async fn get_subject(&self, id: i64) -> Result<Option<Subject>>;
    async fn get_subject_by_slug(&self, slug: &str) -> Result<Option<Subject>>;
    async fn list_subjects(&self) -> Result<Vec<Subject>>;
    async fn update_subject(&self, id: i64, subject: &NewSubject) -> Result<Subject>;
    /// 级联删除所属课程
    async fn delete_subject(&self, id: i64) -> Result<()>;

    // 课程
    async fn create_course(&self, course: &NewCourse) -> Result<Course>;
    async fn get_course(&self, id: i64) -> Result<Option<Course>>;
    async fn get_course_by_slug(&self, slug: &str) -> Result<Option<Course>>;
    async fn list_courses_by_subject(&self, subject_id: i64) -> Result<Vec<Course>>;
    async fn update_course(&self, id: i64, course: &NewCourse) -> Result<Course>;
    async fn delete_course(&self, id: i64) -> Result<()>;
}

/// 测验/徽章仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepositoryTrait: Send + Sync {
    // 测验（slug 由 NewQuiz::slug 在写入时计算）
    async fn create_quiz(&self, quiz: &NewQuiz) -> Result<Quiz>;
    async fn get_quiz(&self, id: i64) -> Result<Option<Quiz>>;
    async fn get_quiz_by_slug(&self, slug: &str) -> Result<Option<Quiz>>;
    async fn list_quizzes(&self, include_drafts: bool) -> Result<Vec<Quiz>>;
    async fn update_quiz(&self, id: i64, quiz: &NewQuiz) -> Result<Quiz>;
    /// 级联删除题目、选项和徽章
    async fn delete_quiz(&self, id: i64) -> Result<()>;

    // 徽章
    async fn create_badge(&self, badge: &NewBadge) -> Result<Badge>;
    async fn get_badge_by_quiz(&self, quiz_id: i64) -> Result<Option<Badge>>;
    async fn delete_badge_by_quiz(&self, quiz_id: i64) -> Result<()>;
}

/// 题目/选项仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepositoryTrait: Send + Sync {
    // 题目
    async fn create_question(&self, question: &NewQuestion) -> Result<Question>;
    async fn get_question(&self, id: i64) -> Result<Option<Question>>;
    async fn list_questions_by_quiz(&self, quiz_id: i64) -> Result<Vec<Question>>;
    async fn update_question(&self, id: i64, question: &NewQuestion) -> Result<Question>;
    /// 级联删除选项
    async fn delete_question(&self, id: i64) -> Result<()>;
    /// 实时统计选项数量，不缓存
    async fn count_choices(&self, question_id: i64) -> Result<i64>;

    // 选项
    async fn create_choice(&self, choice: &NewChoice) -> Result<Choice>;
    async fn get_choice(&self, id: i64) -> Result<Option<Choice>>;
    /// 按位置升序返回
    async fn list_choices_by_question(&self, question_id: i64) -> Result<Vec<Choice>>;
    async fn update_choice(&self, id: i64, choice: &NewChoice) -> Result<Choice>;
    async fn delete_choice(&self, id: i64) -> Result<()>;
}
