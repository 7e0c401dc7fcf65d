//! 学科与课程实体定义

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 学科
///
/// 课程的顶层归属，slug 全局唯一
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// 课程
///
/// 隶属于唯一学科，学科删除时级联删除
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub subject_id: i64,
    pub title: String,
    pub slug: String,
    /// 课程简介（自由文本）
    pub overview: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// 待写入的学科字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubject {
    pub title: String,
    pub slug: String,
}

/// 待写入的课程字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub subject_id: i64,
    pub title: String,
    pub slug: String,
    pub overview: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_title() {
        let now = Utc::now();
        let subject = Subject {
            id: 1,
            title: "Mathematics".to_string(),
            slug: "mathematics".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(subject.to_string(), "Mathematics");

        let course = Course {
            id: 2,
            subject_id: 1,
            title: "Linear Algebra".to_string(),
            slug: "linear-algebra".to_string(),
            overview: String::new(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(course.to_string(), "Linear Algebra");
    }

    #[test]
    fn test_course_serialization_is_camel_case() {
        let now = Utc::now();
        let course = Course {
            id: 2,
            subject_id: 1,
            title: "Linear Algebra".to_string(),
            slug: "linear-algebra".to_string(),
            overview: "Vectors and matrices".to_string(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&course).unwrap();
        assert_eq!(json["subjectId"], 1);
        assert!(json.get("createdAt").is_some());
    }
}
