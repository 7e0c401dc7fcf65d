//! 题库运维入口
//!
//! 加载配置、初始化日志和数据库连接后执行子命令。

use anyhow::Result;
use clap::Parser;
use quiz_shared::{config::AppConfig, database::Database, observability};
use tracing::info;

use quiz_catalog::PgCatalogService;
use quiz_catalog::cli::{CatalogStats, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. 加载配置，命令行日志级别优先
    let mut config = AppConfig::load("quiz-catalog")?;
    if let Some(level) = cli.log_level.clone() {
        config.observability.log_level = level;
    }

    // 2. 初始化日志
    observability::init(&config.service_name, &config.observability)?;
    info!(environment = %config.environment, "Configuration loaded");

    // 3. 连接数据库
    let db = Database::connect(&config.database).await?;

    match cli.command {
        Commands::Migrate => {
            db.run_migrations().await?;
        }
        Commands::Check { include_drafts } => {
            db.health_check().await?;
            info!("Database connection healthy");

            let service = PgCatalogService::from_pool(db.pool().clone());
            let stats = CatalogStats::collect(&service, include_drafts).await?;
            info!(
                subjects = stats.subjects,
                courses = stats.courses,
                quizzes = stats.quizzes,
                badges = stats.badges,
                questions = stats.questions,
                choices = stats.choices,
                "Catalog statistics"
            );
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    db.close().await;
    Ok(())
}
