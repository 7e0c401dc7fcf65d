//! 测验徽章实体定义

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 徽章图片上传目录
pub const BADGE_UPLOAD_DIR: &str = "images";

/// 测验徽章
///
/// 与测验一对一绑定，测验删除时级联删除
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: i64,
    pub quiz_id: i64,
    /// 图片引用（相对存储根目录，如 images/gold.png）
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Badge {
    /// 将文件名规范化为上传目录下的图片引用
    ///
    /// 已带上传目录前缀的引用原样返回
    pub fn upload_path(file_name: &str) -> String {
        let file_name = file_name.trim_start_matches('/');
        if file_name.starts_with(&format!("{BADGE_UPLOAD_DIR}/")) {
            file_name.to_string()
        } else {
            format!("{BADGE_UPLOAD_DIR}/{file_name}")
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.image)
    }
}

/// 待写入的徽章字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBadge {
    pub quiz_id: i64,
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_path() {
        assert_eq!(Badge::upload_path("gold.png"), "images/gold.png");
        assert_eq!(Badge::upload_path("/gold.png"), "images/gold.png");
        assert_eq!(Badge::upload_path("images/gold.png"), "images/gold.png");
        assert_eq!(Badge::upload_path("imagesx.png"), "images/imagesx.png");
    }
}
