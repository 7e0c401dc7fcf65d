//! 数据库仓储层
//!
//! 提供所有实体的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化和约束翻译，不包含业务逻辑
//! - 唯一、外键、级联删除由存储层保证；内存实现复刻同样的语义
//! - 按所有权树拆分 trait，支持 mock 测试

mod memory;
mod question_repo;
mod quiz_repo;
mod subject_repo;
mod traits;

pub use memory::InMemoryCatalog;
pub use question_repo::QuestionRepository;
pub use quiz_repo::QuizRepository;
pub use subject_repo::SubjectRepository;
pub use traits::*;

use crate::error::CatalogError;

/// 将数据库错误翻译为业务错误
///
/// `on_constraint` 按约束名返回对应的业务错误；未识别的检查约束视为参数校验失败，
/// 其余错误原样包装为 Database
pub(crate) fn translate_db_error<F>(err: sqlx::Error, on_constraint: F) -> CatalogError
where
    F: FnOnce(&str) -> Option<CatalogError>,
{
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(mapped) = db_err.constraint().and_then(on_constraint) {
            return mapped;
        }
        if db_err.is_check_violation() {
            return CatalogError::Validation(db_err.message().to_string());
        }
    }
    CatalogError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_passes_through() {
        let err = translate_db_error(sqlx::Error::RowNotFound, |_| {
            Some(CatalogError::Validation("unreachable".into()))
        });
        assert!(matches!(err, CatalogError::Database(sqlx::Error::RowNotFound)));
    }
}
