//! 学科仓储
//!
//! 提供学科、课程的数据访问

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::SubjectRepositoryTrait;
use super::translate_db_error;
use crate::error::{CatalogError, Result};
use crate::models::{Course, NewCourse, NewSubject, Subject};

/// 学科仓储
///
/// 负责学科 -> 课程两层结构的数据访问
pub struct SubjectRepository {
    pool: PgPool,
}

/// 唯一约束冲突映射
fn subject_conflict(constraint: &str, slug: &str) -> Option<CatalogError> {
    match constraint {
        "subjects_slug_key" => Some(CatalogError::DuplicateSlug {
            entity: "subject",
            slug: slug.to_string(),
        }),
        _ => None,
    }
}

fn course_conflict(constraint: &str, course: &NewCourse) -> Option<CatalogError> {
    match constraint {
        "courses_slug_key" => Some(CatalogError::DuplicateSlug {
            entity: "course",
            slug: course.slug.clone(),
        }),
        "courses_subject_id_fkey" => Some(CatalogError::SubjectNotFound(course.subject_id)),
        _ => None,
    }
}

impl SubjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 学科 ====================

    /// 创建学科
    pub async fn create_subject(&self, subject: &NewSubject) -> Result<Subject> {
        sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (title, slug)
            VALUES ($1, $2)
            RETURNING id, title, slug, created_at, updated_at
            "#,
        )
        .bind(&subject.title)
        .bind(&subject.slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate_db_error(e, |c| subject_conflict(c, &subject.slug)))
    }

    /// 获取单个学科
    pub async fn get_subject(&self, id: i64) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, title, slug, created_at, updated_at
            FROM subjects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }

    /// 按 slug 获取学科
    pub async fn get_subject_by_slug(&self, slug: &str) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, title, slug, created_at, updated_at
            FROM subjects
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }

    /// 列出所有学科
    pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, title, slug, created_at, updated_at
            FROM subjects
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    /// 更新学科
    pub async fn update_subject(&self, id: i64, subject: &NewSubject) -> Result<Subject> {
        sqlx::query_as::<_, Subject>(
            r#"
            UPDATE subjects
            SET title = $2, slug = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, slug, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&subject.title)
        .bind(&subject.slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| translate_db_error(e, |c| subject_conflict(c, &subject.slug)))?
        .ok_or(CatalogError::SubjectNotFound(id))
    }

    /// 删除学科（课程由外键级联删除）
    pub async fn delete_subject(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::SubjectNotFound(id));
        }
        Ok(())
    }

    // ==================== 课程 ====================

    /// 创建课程
    pub async fn create_course(&self, course: &NewCourse) -> Result<Course> {
        sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (subject_id, title, slug, overview)
            VALUES ($1, $2, $3, $4)
            RETURNING id, subject_id, title, slug, overview, created_at, updated_at
            "#,
        )
        .bind(course.subject_id)
        .bind(&course.title)
        .bind(&course.slug)
        .bind(&course.overview)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate_db_error(e, |c| course_conflict(c, course)))
    }

    /// 获取单个课程
    pub async fn get_course(&self, id: i64) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, subject_id, title, slug, overview, created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    /// 按 slug 获取课程
    pub async fn get_course_by_slug(&self, slug: &str) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, subject_id, title, slug, overview, created_at, updated_at
            FROM courses
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    /// 按学科列出课程
    pub async fn list_courses_by_subject(&self, subject_id: i64) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, subject_id, title, slug, overview, created_at, updated_at
            FROM courses
            WHERE subject_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    /// 更新课程
    pub async fn update_course(&self, id: i64, course: &NewCourse) -> Result<Course> {
        sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET subject_id = $2, title = $3, slug = $4, overview = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, subject_id, title, slug, overview, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(course.subject_id)
        .bind(&course.title)
        .bind(&course.slug)
        .bind(&course.overview)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| translate_db_error(e, |c| course_conflict(c, course)))?
        .ok_or(CatalogError::CourseNotFound(id))
    }

    /// 删除课程
    pub async fn delete_course(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::CourseNotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl SubjectRepositoryTrait for SubjectRepository {
    async fn create_subject(&self, subject: &NewSubject) -> Result<Subject> {
        self.create_subject(subject).await
    }

    async fn get_subject(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject(id).await
    }

    async fn get_subject_by_slug(&self, slug: &str) -> Result<Option<Subject>> {
        self.get_subject_by_slug(slug).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.list_subjects().await
    }

    async fn update_subject(&self, id: i64, subject: &NewSubject) -> Result<Subject> {
        self.update_subject(id, subject).await
    }

    async fn delete_subject(&self, id: i64) -> Result<()> {
        self.delete_subject(id).await
    }

    async fn create_course(&self, course: &NewCourse) -> Result<Course> {
        self.create_course(course).await
    }

    async fn get_course(&self, id: i64) -> Result<Option<Course>> {
        self.get_course(id).await
    }

    async fn get_course_by_slug(&self, slug: &str) -> Result<Option<Course>> {
        self.get_course_by_slug(slug).await
    }

    async fn list_courses_by_subject(&self, subject_id: i64) -> Result<Vec<Course>> {
        self.list_courses_by_subject(subject_id).await
    }

    async fn update_course(&self, id: i64, course: &NewCourse) -> Result<Course> {
        self.update_course(id, course).await
    }

    async fn delete_course(&self, id: i64) -> Result<()> {
        self.delete_course(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_mapping() {
        let err = subject_conflict("subjects_slug_key", "algebra").unwrap();
        assert!(matches!(err, CatalogError::DuplicateSlug { entity: "subject", .. }));
        assert!(subject_conflict("other", "algebra").is_none());

        let course = NewCourse {
            subject_id: 7,
            title: "Algebra I".to_string(),
            slug: "algebra-i".to_string(),
            overview: String::new(),
        };
        assert!(matches!(
            course_conflict("courses_subject_id_fkey", &course),
            Some(CatalogError::SubjectNotFound(7))
        ));
        assert!(matches!(
            course_conflict("courses_slug_key", &course),
            Some(CatalogError::DuplicateSlug { entity: "course", .. })
        ));
    }
}
