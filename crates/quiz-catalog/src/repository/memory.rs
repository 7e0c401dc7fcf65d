//! 内存仓储
//!
//! 单把读写锁保护全部表，复刻数据库的唯一约束、外键存在性和级联删除语义，
//! 适用于测试和本地开发。

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use super::traits::{QuestionRepositoryTrait, QuizRepositoryTrait, SubjectRepositoryTrait};
use crate::error::{CatalogError, Result};
use crate::models::{
    Badge, Choice, Course, NewBadge, NewChoice, NewCourse, NewQuestion, NewQuiz, NewSubject,
    Question, Quiz, Subject,
};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    subjects: BTreeMap<i64, Subject>,
    courses: BTreeMap<i64, Course>,
    quizzes: BTreeMap<i64, Quiz>,
    badges: BTreeMap<i64, Badge>,
    questions: BTreeMap<i64, Question>,
    choices: BTreeMap<i64, Choice>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_subject_slug(&self, slug: &str, exclude: Option<i64>) -> Result<()> {
        if self
            .subjects
            .values()
            .any(|s| s.slug == slug && Some(s.id) != exclude)
        {
            return Err(CatalogError::DuplicateSlug {
                entity: "subject",
                slug: slug.to_string(),
            });
        }
        Ok(())
    }

    fn check_course(&self, course: &NewCourse, exclude: Option<i64>) -> Result<()> {
        if !self.subjects.contains_key(&course.subject_id) {
            return Err(CatalogError::SubjectNotFound(course.subject_id));
        }
        if self
            .courses
            .values()
            .any(|c| c.slug == course.slug && Some(c.id) != exclude)
        {
            return Err(CatalogError::DuplicateSlug {
                entity: "course",
                slug: course.slug.clone(),
            });
        }
        Ok(())
    }

    fn check_quiz_slug(&self, slug: &str, exclude: Option<i64>) -> Result<()> {
        if self
            .quizzes
            .values()
            .any(|q| q.slug == slug && Some(q.id) != exclude)
        {
            return Err(CatalogError::DuplicateSlug {
                entity: "quiz",
                slug: slug.to_string(),
            });
        }
        Ok(())
    }

    fn check_question(&self, question: &NewQuestion, exclude: Option<i64>) -> Result<()> {
        if !self.quizzes.contains_key(&question.quiz_id) {
            return Err(CatalogError::QuizNotFound(question.quiz_id));
        }
        if self
            .questions
            .values()
            .any(|q| q.question_text == question.question_text && Some(q.id) != exclude)
        {
            return Err(CatalogError::DuplicateQuestionText(
                question.question_text.clone(),
            ));
        }
        Ok(())
    }

    fn check_choice(&self, choice: &NewChoice, exclude: Option<i64>) -> Result<()> {
        if !self.questions.contains_key(&choice.question_id) {
            return Err(CatalogError::QuestionNotFound(choice.question_id));
        }
        let siblings = self
            .choices
            .values()
            .filter(|c| c.question_id == choice.question_id && Some(c.id) != exclude);
        for sibling in siblings {
            if sibling.choice == choice.choice {
                return Err(CatalogError::DuplicateChoiceText {
                    question_id: choice.question_id,
                    choice: choice.choice.clone(),
                });
            }
            if sibling.position == choice.position {
                return Err(CatalogError::DuplicateChoicePosition {
                    question_id: choice.question_id,
                    position: choice.position,
                });
            }
        }
        Ok(())
    }

    fn cascade_question(&mut self, question_id: i64) {
        self.choices.retain(|_, c| c.question_id != question_id);
    }

    fn cascade_quiz(&mut self, quiz_id: i64) {
        let question_ids: Vec<i64> = self
            .questions
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .map(|q| q.id)
            .collect();
        for question_id in question_ids {
            self.questions.remove(&question_id);
            self.cascade_question(question_id);
        }
        self.badges.retain(|_, b| b.quiz_id != quiz_id);
    }
}

/// 内存题库
///
/// 同时实现三个仓储 trait；clone 后共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject_count(&self) -> usize {
        self.tables.read().subjects.len()
    }

    pub fn course_count(&self) -> usize {
        self.tables.read().courses.len()
    }

    pub fn quiz_count(&self) -> usize {
        self.tables.read().quizzes.len()
    }

    pub fn badge_count(&self) -> usize {
        self.tables.read().badges.len()
    }

    pub fn question_count(&self) -> usize {
        self.tables.read().questions.len()
    }

    pub fn choice_count(&self) -> usize {
        self.tables.read().choices.len()
    }
}

#[async_trait]
impl SubjectRepositoryTrait for InMemoryCatalog {
    async fn create_subject(&self, subject: &NewSubject) -> Result<Subject> {
        let mut tables = self.tables.write();
        tables.check_subject_slug(&subject.slug, None)?;

        let now = Utc::now();
        let created = Subject {
            id: tables.allocate_id(),
            title: subject.title.clone(),
            slug: subject.slug.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.subjects.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_subject(&self, id: i64) -> Result<Option<Subject>> {
        Ok(self.tables.read().subjects.get(&id).cloned())
    }

    async fn get_subject_by_slug(&self, slug: &str) -> Result<Option<Subject>> {
        let tables = self.tables.read();
        Ok(tables.subjects.values().find(|s| s.slug == slug).cloned())
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        Ok(self.tables.read().subjects.values().cloned().collect())
    }

    async fn update_subject(&self, id: i64, subject: &NewSubject) -> Result<Subject> {
        let mut tables = self.tables.write();
        if !tables.subjects.contains_key(&id) {
            return Err(CatalogError::SubjectNotFound(id));
        }
        tables.check_subject_slug(&subject.slug, Some(id))?;

        let existing = tables
            .subjects
            .get_mut(&id)
            .ok_or(CatalogError::SubjectNotFound(id))?;
        existing.title = subject.title.clone();
        existing.slug = subject.slug.clone();
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_subject(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.subjects.remove(&id).is_none() {
            return Err(CatalogError::SubjectNotFound(id));
        }
        tables.courses.retain(|_, c| c.subject_id != id);
        Ok(())
    }

    async fn create_course(&self, course: &NewCourse) -> Result<Course> {
        let mut tables = self.tables.write();
        tables.check_course(course, None)?;

        let now = Utc::now();
        let created = Course {
            id: tables.allocate_id(),
            subject_id: course.subject_id,
            title: course.title.clone(),
            slug: course.slug.clone(),
            overview: course.overview.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.courses.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_course(&self, id: i64) -> Result<Option<Course>> {
        Ok(self.tables.read().courses.get(&id).cloned())
    }

    async fn get_course_by_slug(&self, slug: &str) -> Result<Option<Course>> {
        let tables = self.tables.read();
        Ok(tables.courses.values().find(|c| c.slug == slug).cloned())
    }

    async fn list_courses_by_subject(&self, subject_id: i64) -> Result<Vec<Course>> {
        let tables = self.tables.read();
        Ok(tables
            .courses
            .values()
            .filter(|c| c.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn update_course(&self, id: i64, course: &NewCourse) -> Result<Course> {
        let mut tables = self.tables.write();
        if !tables.courses.contains_key(&id) {
            return Err(CatalogError::CourseNotFound(id));
        }
        tables.check_course(course, Some(id))?;

        let existing = tables
            .courses
            .get_mut(&id)
            .ok_or(CatalogError::CourseNotFound(id))?;
        existing.subject_id = course.subject_id;
        existing.title = course.title.clone();
        existing.slug = course.slug.clone();
        existing.overview = course.overview.clone();
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_course(&self, id: i64) -> Result<()> {
        if self.tables.write().courses.remove(&id).is_none() {
            return Err(CatalogError::CourseNotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl QuizRepositoryTrait for InMemoryCatalog {
    async fn create_quiz(&self, quiz: &NewQuiz) -> Result<Quiz> {
        quiz.check_pass_mark()?;
        let slug = quiz.slug();

        let mut tables = self.tables.write();
        tables.check_quiz_slug(&slug, None)?;

        let now = Utc::now();
        let created = Quiz {
            id: tables.allocate_id(),
            level: quiz.level,
            title: quiz.title.clone(),
            slug,
            single_attempt: quiz.single_attempt,
            pass_mark: quiz.pass_mark,
            success_text: quiz.success_text.clone(),
            fail_text: quiz.fail_text.clone(),
            draft: quiz.draft,
            duration_seconds: quiz.duration_seconds,
            created_at: now,
            updated_at: now,
        };
        tables.quizzes.insert(created.id, created.clone());
        debug!(quiz_id = created.id, slug = %created.slug, "Saved quiz");
        Ok(created)
    }

    async fn get_quiz(&self, id: i64) -> Result<Option<Quiz>> {
        Ok(self.tables.read().quizzes.get(&id).cloned())
    }

    async fn get_quiz_by_slug(&self, slug: &str) -> Result<Option<Quiz>> {
        let tables = self.tables.read();
        Ok(tables.quizzes.values().find(|q| q.slug == slug).cloned())
    }

    async fn list_quizzes(&self, include_drafts: bool) -> Result<Vec<Quiz>> {
        let tables = self.tables.read();
        Ok(tables
            .quizzes
            .values()
            .filter(|q| include_drafts || !q.draft)
            .cloned()
            .collect())
    }

    async fn update_quiz(&self, id: i64, quiz: &NewQuiz) -> Result<Quiz> {
        quiz.check_pass_mark()?;
        let slug = quiz.slug();

        let mut tables = self.tables.write();
        if !tables.quizzes.contains_key(&id) {
            return Err(CatalogError::QuizNotFound(id));
        }
        tables.check_quiz_slug(&slug, Some(id))?;

        let existing = tables
            .quizzes
            .get_mut(&id)
            .ok_or(CatalogError::QuizNotFound(id))?;
        existing.level = quiz.level;
        existing.title = quiz.title.clone();
        existing.slug = slug;
        existing.single_attempt = quiz.single_attempt;
        existing.pass_mark = quiz.pass_mark;
        existing.success_text = quiz.success_text.clone();
        existing.fail_text = quiz.fail_text.clone();
        existing.draft = quiz.draft;
        existing.duration_seconds = quiz.duration_seconds;
        existing.updated_at = Utc::now();
        debug!(quiz_id = id, slug = %existing.slug, "Saved quiz");
        Ok(existing.clone())
    }

    async fn delete_quiz(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.quizzes.remove(&id).is_none() {
            return Err(CatalogError::QuizNotFound(id));
        }
        tables.cascade_quiz(id);
        Ok(())
    }

    async fn create_badge(&self, badge: &NewBadge) -> Result<Badge> {
        let mut tables = self.tables.write();
        if !tables.quizzes.contains_key(&badge.quiz_id) {
            return Err(CatalogError::QuizNotFound(badge.quiz_id));
        }
        if tables.badges.values().any(|b| b.quiz_id == badge.quiz_id) {
            return Err(CatalogError::BadgeAlreadyAssigned(badge.quiz_id));
        }

        let now = Utc::now();
        let created = Badge {
            id: tables.allocate_id(),
            quiz_id: badge.quiz_id,
            image: badge.image.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.badges.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_badge_by_quiz(&self, quiz_id: i64) -> Result<Option<Badge>> {
        let tables = self.tables.read();
        Ok(tables.badges.values().find(|b| b.quiz_id == quiz_id).cloned())
    }

    async fn delete_badge_by_quiz(&self, quiz_id: i64) -> Result<()> {
        let mut tables = self.tables.write();
        let before = tables.badges.len();
        tables.badges.retain(|_, b| b.quiz_id != quiz_id);
        if tables.badges.len() == before {
            return Err(CatalogError::BadgeNotFound(quiz_id));
        }
        Ok(())
    }
}

#[async_trait]
impl QuestionRepositoryTrait for InMemoryCatalog {
    async fn create_question(&self, question: &NewQuestion) -> Result<Question> {
        let mut tables = self.tables.write();
        tables.check_question(question, None)?;

        let now = Utc::now();
        let created = Question {
            id: tables.allocate_id(),
            quiz_id: question.quiz_id,
            question_text: question.question_text.clone(),
            hint: question.hint.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.questions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_question(&self, id: i64) -> Result<Option<Question>> {
        Ok(self.tables.read().questions.get(&id).cloned())
    }

    async fn list_questions_by_quiz(&self, quiz_id: i64) -> Result<Vec<Question>> {
        let tables = self.tables.read();
        Ok(tables
            .questions
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn update_question(&self, id: i64, question: &NewQuestion) -> Result<Question> {
        let mut tables = self.tables.write();
        if !tables.questions.contains_key(&id) {
            return Err(CatalogError::QuestionNotFound(id));
        }
        tables.check_question(question, Some(id))?;

        let existing = tables
            .questions
            .get_mut(&id)
            .ok_or(CatalogError::QuestionNotFound(id))?;
        existing.quiz_id = question.quiz_id;
        existing.question_text = question.question_text.clone();
        existing.hint = question.hint.clone();
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_question(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.questions.remove(&id).is_none() {
            return Err(CatalogError::QuestionNotFound(id));
        }
        tables.cascade_question(id);
        Ok(())
    }

    async fn count_choices(&self, question_id: i64) -> Result<i64> {
        let tables = self.tables.read();
        let count = tables
            .choices
            .values()
            .filter(|c| c.question_id == question_id)
            .count() as i64;
        debug!(question_id, count, "Counted choices");
        Ok(count)
    }

    async fn create_choice(&self, choice: &NewChoice) -> Result<Choice> {
        let mut tables = self.tables.write();
        tables.check_choice(choice, None)?;

        let now = Utc::now();
        let created = Choice {
            id: tables.allocate_id(),
            question_id: choice.question_id,
            position: choice.position,
            choice: choice.choice.clone(),
            is_correct: choice.is_correct,
            created_at: now,
            updated_at: now,
        };
        tables.choices.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_choice(&self, id: i64) -> Result<Option<Choice>> {
        Ok(self.tables.read().choices.get(&id).cloned())
    }

    async fn list_choices_by_question(&self, question_id: i64) -> Result<Vec<Choice>> {
        let mut choices: Vec<Choice> = {
            let tables = self.tables.read();
            tables
                .choices
                .values()
                .filter(|c| c.question_id == question_id)
                .cloned()
                .collect()
        };
        Choice::sort_by_position(&mut choices);
        Ok(choices)
    }

    async fn update_choice(&self, id: i64, choice: &NewChoice) -> Result<Choice> {
        let mut tables = self.tables.write();
        if !tables.choices.contains_key(&id) {
            return Err(CatalogError::ChoiceNotFound(id));
        }
        tables.check_choice(choice, Some(id))?;

        let existing = tables
            .choices
            .get_mut(&id)
            .ok_or(CatalogError::ChoiceNotFound(id))?;
        existing.question_id = choice.question_id;
        existing.position = choice.position;
        existing.choice = choice.choice.clone();
        existing.is_correct = choice.is_correct;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_choice(&self, id: i64) -> Result<()> {
        if self.tables.write().choices.remove(&id).is_none() {
            return Err(CatalogError::ChoiceNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChoicePosition, QuizLevel};

    async fn seed_question(catalog: &InMemoryCatalog) -> (Quiz, Question) {
        let quiz = catalog
            .create_quiz(&NewQuiz::new(QuizLevel::One, "Ownership"))
            .await
            .unwrap();
        let question = catalog
            .create_question(&NewQuestion {
                quiz_id: quiz.id,
                question_text: "Who owns a moved value?".to_string(),
                hint: String::new(),
            })
            .await
            .unwrap();
        (quiz, question)
    }

    fn new_choice(question_id: i64, position: ChoicePosition, text: &str) -> NewChoice {
        NewChoice {
            question_id,
            position,
            choice: text.to_string(),
            is_correct: false,
        }
    }

    #[tokio::test]
    async fn test_ids_are_unique_across_tables() {
        let catalog = InMemoryCatalog::new();
        let (quiz, question) = seed_question(&catalog).await;
        assert_ne!(quiz.id, question.id);
    }

    #[tokio::test]
    async fn test_subject_slug_unique_on_update() {
        let catalog = InMemoryCatalog::new();
        let a = catalog
            .create_subject(&NewSubject {
                title: "Algebra".into(),
                slug: "algebra".into(),
            })
            .await
            .unwrap();
        catalog
            .create_subject(&NewSubject {
                title: "Geometry".into(),
                slug: "geometry".into(),
            })
            .await
            .unwrap();

        // 保留自身 slug 不算冲突
        let same = catalog
            .update_subject(
                a.id,
                &NewSubject {
                    title: "Algebra II".into(),
                    slug: "algebra".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(same.title, "Algebra II");
        assert!(same.updated_at >= same.created_at);

        let err = catalog
            .update_subject(
                a.id,
                &NewSubject {
                    title: "Algebra".into(),
                    slug: "geometry".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSlug { entity: "subject", .. }));
    }

    #[tokio::test]
    async fn test_choice_checks_text_before_position() {
        let catalog = InMemoryCatalog::new();
        let (_, question) = seed_question(&catalog).await;
        catalog
            .create_choice(&new_choice(question.id, ChoicePosition::A, "The new binding"))
            .await
            .unwrap();

        let err = catalog
            .create_choice(&new_choice(question.id, ChoicePosition::A, "The new binding"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateChoiceText { .. }));

        let err = catalog
            .create_choice(&new_choice(question.id, ChoicePosition::A, "Nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateChoicePosition { .. }));
    }

    #[tokio::test]
    async fn test_update_choice_may_keep_own_position() {
        let catalog = InMemoryCatalog::new();
        let (_, question) = seed_question(&catalog).await;
        let choice = catalog
            .create_choice(&new_choice(question.id, ChoicePosition::B, "Nobody"))
            .await
            .unwrap();

        let mut changed = new_choice(question.id, ChoicePosition::B, "The new binding");
        changed.is_correct = true;
        let updated = catalog.update_choice(choice.id, &changed).await.unwrap();
        assert_eq!(updated.position, ChoicePosition::B);
        assert!(updated.is_correct);
        assert_eq!(updated.created_at, choice.created_at);
    }

    #[tokio::test]
    async fn test_delete_quiz_cascades() {
        let catalog = InMemoryCatalog::new();
        let (quiz, question) = seed_question(&catalog).await;
        catalog
            .create_choice(&new_choice(question.id, ChoicePosition::A, "x"))
            .await
            .unwrap();
        catalog
            .create_badge(&NewBadge {
                quiz_id: quiz.id,
                image: "images/gold.png".into(),
            })
            .await
            .unwrap();

        catalog.delete_quiz(quiz.id).await.unwrap();
        assert_eq!(catalog.quiz_count(), 0);
        assert_eq!(catalog.question_count(), 0);
        assert_eq!(catalog.choice_count(), 0);
        assert_eq!(catalog.badge_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_rows() {
        let catalog = InMemoryCatalog::new();
        assert!(matches!(
            catalog.delete_subject(99).await,
            Err(CatalogError::SubjectNotFound(99))
        ));
        assert!(matches!(
            catalog.delete_badge_by_quiz(99).await,
            Err(CatalogError::BadgeNotFound(99))
        ));
        assert!(matches!(
            catalog.delete_choice(99).await,
            Err(CatalogError::ChoiceNotFound(99))
        ));
    }
}
