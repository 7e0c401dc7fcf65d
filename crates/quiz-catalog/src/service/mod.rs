//! 服务层
//!
//! - `dto`: 请求参数及校验规则
//! - `catalog_service`: 题库增删改查与测验详情聚合

pub mod catalog_service;
pub mod dto;

pub use catalog_service::{CatalogService, InMemoryCatalogService, PgCatalogService};
pub use dto::*;
