//! 题库服务
//!
//! 校验请求、合并更新字段后转发给仓储。测验 slug 不由调用方决定，
//! 每次保存都由仓储按标题重新计算。

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::error::{CatalogError, Result};
use crate::models::{
    Badge, Choice, Course, NewBadge, NewChoice, NewCourse, NewQuestion, NewQuiz, NewSubject,
    Question, QuestionWithChoices, Quiz, QuizDetail, Subject,
};
use crate::repository::{
    InMemoryCatalog, QuestionRepository, QuestionRepositoryTrait, QuizRepository,
    QuizRepositoryTrait, SubjectRepository, SubjectRepositoryTrait,
};
use crate::service::dto::{
    AttachBadgeRequest, CreateChoiceRequest, CreateCourseRequest, CreateQuestionRequest,
    CreateQuizRequest, CreateSubjectRequest, UpdateChoiceRequest, UpdateCourseRequest,
    UpdateQuestionRequest, UpdateQuizRequest, UpdateSubjectRequest,
};

/// 徽章图片引用的最大长度（含上传目录前缀）
const MAX_BADGE_IMAGE_LEN: usize = 100;

/// 基于 PostgreSQL 的题库服务
pub type PgCatalogService = CatalogService<SubjectRepository, QuizRepository, QuestionRepository>;

/// 基于内存存储的题库服务
pub type InMemoryCatalogService = CatalogService<InMemoryCatalog, InMemoryCatalog, InMemoryCatalog>;

/// 题库服务
///
/// 按所有权树聚合三个仓储：学科/课程、测验/徽章、题目/选项
pub struct CatalogService<S, Q, Qn>
where
    S: SubjectRepositoryTrait,
    Q: QuizRepositoryTrait,
    Qn: QuestionRepositoryTrait,
{
    subject_repo: Arc<S>,
    quiz_repo: Arc<Q>,
    question_repo: Arc<Qn>,
}

impl PgCatalogService {
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(
            Arc::new(SubjectRepository::new(pool.clone())),
            Arc::new(QuizRepository::new(pool.clone())),
            Arc::new(QuestionRepository::new(pool)),
        )
    }
}

impl InMemoryCatalogService {
    /// 三个仓储共享同一份内存数据
    pub fn in_memory(catalog: InMemoryCatalog) -> Self {
        let catalog = Arc::new(catalog);
        Self::new(catalog.clone(), catalog.clone(), catalog)
    }
}

impl<S, Q, Qn> CatalogService<S, Q, Qn>
where
    S: SubjectRepositoryTrait,
    Q: QuizRepositoryTrait,
    Qn: QuestionRepositoryTrait,
{
    pub fn new(subject_repo: Arc<S>, quiz_repo: Arc<Q>, question_repo: Arc<Qn>) -> Self {
        Self {
            subject_repo,
            quiz_repo,
            question_repo,
        }
    }

    // ==================== 学科 ====================

    #[instrument(skip(self, request), fields(slug = %request.slug))]
    pub async fn create_subject(&self, request: CreateSubjectRequest) -> Result<Subject> {
        request.validate()?;

        let subject = self
            .subject_repo
            .create_subject(&NewSubject {
                title: request.title,
                slug: request.slug,
            })
            .await?;

        info!(subject_id = subject.id, "Subject created");
        Ok(subject)
    }

    pub async fn get_subject(&self, id: i64) -> Result<Subject> {
        self.subject_repo
            .get_subject(id)
            .await?
            .ok_or(CatalogError::SubjectNotFound(id))
    }

    pub async fn get_subject_by_slug(&self, slug: &str) -> Result<Subject> {
        self.subject_repo
            .get_subject_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::SlugNotFound {
                entity: "subject",
                slug: slug.to_string(),
            })
    }

    pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.subject_repo.list_subjects().await
    }

    #[instrument(skip(self, request))]
    pub async fn update_subject(&self, id: i64, request: UpdateSubjectRequest) -> Result<Subject> {
        request.validate()?;

        let existing = self.get_subject(id).await?;
        let subject = self
            .subject_repo
            .update_subject(
                id,
                &NewSubject {
                    title: request.title.unwrap_or(existing.title),
                    slug: request.slug.unwrap_or(existing.slug),
                },
            )
            .await?;

        info!(subject_id = id, "Subject updated");
        Ok(subject)
    }

    /// 删除学科及其全部课程
    #[instrument(skip(self))]
    pub async fn delete_subject(&self, id: i64) -> Result<()> {
        self.subject_repo.delete_subject(id).await?;
        info!(subject_id = id, "Subject deleted");
        Ok(())
    }

    // ==================== 课程 ====================

    #[instrument(skip(self, request), fields(subject_id = request.subject_id, slug = %request.slug))]
    pub async fn create_course(&self, request: CreateCourseRequest) -> Result<Course> {
        request.validate()?;

        let course = self
            .subject_repo
            .create_course(&NewCourse {
                subject_id: request.subject_id,
                title: request.title,
                slug: request.slug,
                overview: request.overview,
            })
            .await?;

        info!(course_id = course.id, "Course created");
        Ok(course)
    }

    pub async fn get_course(&self, id: i64) -> Result<Course> {
        self.subject_repo
            .get_course(id)
            .await?
            .ok_or(CatalogError::CourseNotFound(id))
    }

    pub async fn get_course_by_slug(&self, slug: &str) -> Result<Course> {
        self.subject_repo
            .get_course_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::SlugNotFound {
                entity: "course",
                slug: slug.to_string(),
            })
    }

    pub async fn list_courses_for_subject(&self, subject_id: i64) -> Result<Vec<Course>> {
        self.get_subject(subject_id).await?;
        self.subject_repo.list_courses_by_subject(subject_id).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_course(&self, id: i64, request: UpdateCourseRequest) -> Result<Course> {
        request.validate()?;

        let existing = self.get_course(id).await?;
        let course = self
            .subject_repo
            .update_course(
                id,
                &NewCourse {
                    subject_id: request.subject_id.unwrap_or(existing.subject_id),
                    title: request.title.unwrap_or(existing.title),
                    slug: request.slug.unwrap_or(existing.slug),
                    overview: request.overview.unwrap_or(existing.overview),
                },
            )
            .await?;

        info!(course_id = id, "Course updated");
        Ok(course)
    }

    #[instrument(skip(self))]
    pub async fn delete_course(&self, id: i64) -> Result<()> {
        self.subject_repo.delete_course(id).await?;
        info!(course_id = id, "Course deleted");
        Ok(())
    }

    // ==================== 测验 ====================

    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_quiz(&self, request: CreateQuizRequest) -> Result<Quiz> {
        request.validate()?;

        let new_quiz = NewQuiz {
            level: request.level,
            title: request.title,
            single_attempt: request.single_attempt,
            pass_mark: request.pass_mark,
            success_text: request.success_text,
            fail_text: request.fail_text,
            draft: request.draft,
            duration_seconds: request.duration_seconds,
        };
        new_quiz.check_pass_mark()?;

        let quiz = self.quiz_repo.create_quiz(&new_quiz).await?;
        info!(quiz_id = quiz.id, slug = %quiz.slug, "Quiz created");
        Ok(quiz)
    }

    pub async fn get_quiz(&self, id: i64) -> Result<Quiz> {
        self.quiz_repo
            .get_quiz(id)
            .await?
            .ok_or(CatalogError::QuizNotFound(id))
    }

    pub async fn get_quiz_by_slug(&self, slug: &str) -> Result<Quiz> {
        self.quiz_repo
            .get_quiz_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::SlugNotFound {
                entity: "quiz",
                slug: slug.to_string(),
            })
    }

    /// 列出测验，include_drafts 为 false 时隐藏草稿
    pub async fn list_quizzes(&self, include_drafts: bool) -> Result<Vec<Quiz>> {
        self.quiz_repo.list_quizzes(include_drafts).await
    }

    /// 保存测验
    ///
    /// 未提供的字段沿用当前值；即使请求为空，slug 也会按当前标题重新生成
    #[instrument(skip(self, request))]
    pub async fn update_quiz(&self, id: i64, request: UpdateQuizRequest) -> Result<Quiz> {
        request.validate()?;

        let existing = self.get_quiz(id).await?;
        let mut new_quiz = NewQuiz::from(&existing);
        if let Some(level) = request.level {
            new_quiz.level = level;
        }
        if let Some(title) = request.title {
            new_quiz.title = title;
        }
        if let Some(single_attempt) = request.single_attempt {
            new_quiz.single_attempt = single_attempt;
        }
        if let Some(pass_mark) = request.pass_mark {
            new_quiz.pass_mark = pass_mark;
        }
        if let Some(success_text) = request.success_text {
            new_quiz.success_text = success_text;
        }
        if let Some(fail_text) = request.fail_text {
            new_quiz.fail_text = fail_text;
        }
        if let Some(draft) = request.draft {
            new_quiz.draft = draft;
        }
        if let Some(duration_seconds) = request.duration_seconds {
            new_quiz.duration_seconds = duration_seconds;
        }
        new_quiz.check_pass_mark()?;

        let quiz = self.quiz_repo.update_quiz(id, &new_quiz).await?;
        if quiz.slug != existing.slug {
            info!(quiz_id = id, old_slug = %existing.slug, new_slug = %quiz.slug, "Quiz slug changed");
        }
        info!(quiz_id = id, "Quiz saved");
        Ok(quiz)
    }

    /// 删除测验，题目、选项和徽章一并删除
    #[instrument(skip(self))]
    pub async fn delete_quiz(&self, id: i64) -> Result<()> {
        self.quiz_repo.delete_quiz(id).await?;
        info!(quiz_id = id, "Quiz deleted");
        Ok(())
    }

    // ==================== 徽章 ====================

    /// 为测验绑定徽章，图片引用统一放在上传目录下
    #[instrument(skip(self, request))]
    pub async fn attach_badge(&self, quiz_id: i64, request: AttachBadgeRequest) -> Result<Badge> {
        request.validate()?;

        let image = Badge::upload_path(&request.image);
        if image.chars().count() > MAX_BADGE_IMAGE_LEN {
            return Err(CatalogError::Validation(format!(
                "图片路径不能超过{MAX_BADGE_IMAGE_LEN}个字符: {image}"
            )));
        }

        let badge = self
            .quiz_repo
            .create_badge(&NewBadge { quiz_id, image })
            .await?;

        info!(quiz_id, badge_id = badge.id, image = %badge.image, "Badge attached");
        Ok(badge)
    }

    pub async fn get_badge(&self, quiz_id: i64) -> Result<Badge> {
        self.quiz_repo
            .get_badge_by_quiz(quiz_id)
            .await?
            .ok_or(CatalogError::BadgeNotFound(quiz_id))
    }

    #[instrument(skip(self))]
    pub async fn remove_badge(&self, quiz_id: i64) -> Result<()> {
        self.quiz_repo.delete_badge_by_quiz(quiz_id).await?;
        info!(quiz_id, "Badge removed");
        Ok(())
    }

    // ==================== 题目 ====================

    #[instrument(skip(self, request))]
    pub async fn add_question(
        &self,
        quiz_id: i64,
        request: CreateQuestionRequest,
    ) -> Result<Question> {
        request.validate()?;

        let question = self
            .question_repo
            .create_question(&NewQuestion {
                quiz_id,
                question_text: request.question_text,
                hint: request.hint,
            })
            .await?;

        info!(quiz_id, question_id = question.id, "Question added");
        Ok(question)
    }

    pub async fn get_question(&self, id: i64) -> Result<Question> {
        self.question_repo
            .get_question(id)
            .await?
            .ok_or(CatalogError::QuestionNotFound(id))
    }

    pub async fn list_questions(&self, quiz_id: i64) -> Result<Vec<Question>> {
        self.get_quiz(quiz_id).await?;
        self.question_repo.list_questions_by_quiz(quiz_id).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_question(
        &self,
        id: i64,
        request: UpdateQuestionRequest,
    ) -> Result<Question> {
        request.validate()?;

        let existing = self.get_question(id).await?;
        let question = self
            .question_repo
            .update_question(
                id,
                &NewQuestion {
                    quiz_id: existing.quiz_id,
                    question_text: request.question_text.unwrap_or(existing.question_text),
                    hint: request.hint.unwrap_or(existing.hint),
                },
            )
            .await?;

        info!(question_id = id, "Question updated");
        Ok(question)
    }

    /// 删除题目及其选项
    #[instrument(skip(self))]
    pub async fn delete_question(&self, id: i64) -> Result<()> {
        self.question_repo.delete_question(id).await?;
        info!(question_id = id, "Question deleted");
        Ok(())
    }

    /// 题目当前的选项数量
    pub async fn no_choices(&self, question_id: i64) -> Result<i64> {
        self.get_question(question_id).await?;
        self.question_repo.count_choices(question_id).await
    }

    // ==================== 选项 ====================

    #[instrument(skip(self, request), fields(position = %request.position))]
    pub async fn add_choice(&self, question_id: i64, request: CreateChoiceRequest) -> Result<Choice> {
        request.validate()?;

        let choice = self
            .question_repo
            .create_choice(&NewChoice {
                question_id,
                position: request.position,
                choice: request.choice,
                is_correct: request.is_correct,
            })
            .await?;

        info!(question_id, choice_id = choice.id, "Choice added");
        Ok(choice)
    }

    /// 题目的选项，按位置升序
    pub async fn list_choices(&self, question_id: i64) -> Result<Vec<Choice>> {
        self.get_question(question_id).await?;
        self.question_repo.list_choices_by_question(question_id).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_choice(&self, id: i64, request: UpdateChoiceRequest) -> Result<Choice> {
        request.validate()?;

        let existing = self
            .question_repo
            .get_choice(id)
            .await?
            .ok_or(CatalogError::ChoiceNotFound(id))?;
        let choice = self
            .question_repo
            .update_choice(
                id,
                &NewChoice {
                    question_id: existing.question_id,
                    position: request.position.unwrap_or(existing.position),
                    choice: request.choice.unwrap_or(existing.choice),
                    is_correct: request.is_correct.unwrap_or(existing.is_correct),
                },
            )
            .await?;

        info!(choice_id = id, "Choice updated");
        Ok(choice)
    }

    #[instrument(skip(self))]
    pub async fn delete_choice(&self, id: i64) -> Result<()> {
        self.question_repo.delete_choice(id).await?;
        info!(choice_id = id, "Choice deleted");
        Ok(())
    }

    // ==================== 聚合查询 ====================

    /// 测验详情：徽章、题目以及每道题的有序选项
    #[instrument(skip(self))]
    pub async fn quiz_detail(&self, quiz_id: i64) -> Result<QuizDetail> {
        let quiz = self.get_quiz(quiz_id).await?;
        let badge = self.quiz_repo.get_badge_by_quiz(quiz_id).await?;
        let questions = self.question_repo.list_questions_by_quiz(quiz_id).await?;

        let mut detailed = Vec::with_capacity(questions.len());
        for question in questions {
            let choices = self
                .question_repo
                .list_choices_by_question(question.id)
                .await?;
            let no_choices = self.question_repo.count_choices(question.id).await?;
            detailed.push(QuestionWithChoices {
                question,
                choices,
                no_choices,
            });
        }

        debug!(quiz_id, questions = detailed.len(), "Assembled quiz detail");
        Ok(QuizDetail {
            quiz,
            badge,
            questions: detailed,
        })
    }
}
