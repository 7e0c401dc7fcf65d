//! 题库服务
//!
//! 管理学科、课程、测验、题目、选项和测验徽章。
//!
//! ## 核心功能
//!
//! - **唯一 slug**：学科、课程、测验的 slug 全局唯一；测验 slug 在每次保存时由标题生成
//! - **约束校验**：及格分不超过 100，同一题目下选项内容和位置各自唯一
//! - **级联删除**：删除测验会删除其题目、选项和徽章；删除学科会删除其课程
//! - **有序选项**：选项总是按位置 a..d 返回，选项数量实时统计
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `slug`: slug 生成与校验
//! - `repository`: 数据库仓储层（PostgreSQL + 内存实现）
//! - `service`: 业务服务层
//! - `cli`: 运维命令行定义

pub mod cli;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod slug;

pub use error::{CatalogError, Result};
pub use repository::InMemoryCatalog;
pub use service::{CatalogService, InMemoryCatalogService, PgCatalogService};
pub use slug::{is_valid_slug, slugify};
