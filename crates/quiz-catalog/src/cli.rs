//! 运维命令行定义
//!
//! ```bash
//! # 应用数据库迁移
//! quiz-catalog migrate
//!
//! # 检查数据库连通性并输出各表行数
//! quiz-catalog check --include-drafts
//! ```

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::error::Result;
use crate::repository::{QuestionRepositoryTrait, QuizRepositoryTrait, SubjectRepositoryTrait};
use crate::service::CatalogService;

/// 题库运维工具
#[derive(Parser, Debug)]
#[command(name = "quiz-catalog")]
#[command(version, about = "题库数据库运维工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 覆盖配置中的日志级别 (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// 应用 migrations/ 下尚未执行的迁移
    Migrate,

    /// 检查数据库连通性并统计各实体数量
    Check {
        /// 统计测验时包含草稿
        #[arg(long)]
        include_drafts: bool,
    },
}

/// 题库数据统计
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub subjects: usize,
    pub courses: usize,
    pub quizzes: usize,
    pub badges: usize,
    pub questions: usize,
    pub choices: usize,
}

impl CatalogStats {
    /// 遍历题库统计数量
    pub async fn collect<S, Q, Qn>(
        service: &CatalogService<S, Q, Qn>,
        include_drafts: bool,
    ) -> Result<Self>
    where
        S: SubjectRepositoryTrait,
        Q: QuizRepositoryTrait,
        Qn: QuestionRepositoryTrait,
    {
        let mut stats = Self::default();

        for subject in service.list_subjects().await? {
            stats.subjects += 1;
            stats.courses += service.list_courses_for_subject(subject.id).await?.len();
        }

        for quiz in service.list_quizzes(include_drafts).await? {
            let detail = service.quiz_detail(quiz.id).await?;
            stats.quizzes += 1;
            stats.badges += usize::from(detail.badge.is_some());
            stats.questions += detail.questions.len();
            // COUNT(*) 不会为负
            stats.choices += usize::try_from(detail.total_choices()).unwrap_or_default();
        }

        Ok(stats)
    }
}
