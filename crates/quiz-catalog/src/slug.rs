//! slug 生成与校验
//!
//! slug 只包含 ASCII 字母、数字、下划线和连字符，用作 URL 中的唯一标识

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// 非单词、非空白、非连字符的字符
static STRIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());

/// 连续的空白或连字符
static DASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());

/// 合法 slug
static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap());

/// 由标题生成 slug
///
/// 先做 NFKD 分解再丢弃非 ASCII 字符，`é` 变为 `e`，汉字等无法分解的字符被丢弃。
/// 随后转小写，去掉标点，空白与连字符折叠为单个 `-`，首尾的 `-` 和 `_` 被去掉。
/// 结果可能为空串。
pub fn slugify(title: &str) -> String {
    let ascii: String = title.nfkd().filter(char::is_ascii).collect();
    let lowered = ascii.to_ascii_lowercase();
    let stripped = STRIP_RE.replace_all(&lowered, "");
    let dashed = DASH_RE.replace_all(&stripped, "-");
    dashed.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// 是否为合法 slug
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// validator 自定义校验函数
pub fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("slug");
        err.message = Some("slug 只能包含字母、数字、下划线和连字符".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Rust 101: Ownership & Borrowing!"), "rust-101-ownership-borrowing");
    }

    #[test]
    fn test_slugify_collapses_and_trims() {
        assert_eq!(slugify("  --Spaced   -- out--  "), "spaced-out");
        assert_eq!(slugify("_private_"), "private");
        assert_eq!(slugify("snake_case title"), "snake_case-title");
    }

    #[test]
    fn test_slugify_folds_accents() {
        assert_eq!(slugify("Café Crème Brûlée"), "cafe-creme-brulee");
        assert_eq!(slugify("Ångström Über"), "angstrom-uber");
        assert_ne!(slugify("Café"), slugify("Caf"));
        // 兼容分解: 全角字母和连字
        assert_eq!(slugify("Ｒｕｓｔ ﬁle"), "rust-file");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("数学 Quiz"), "quiz");
        assert_eq!(slugify("数学"), "");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        let once = slugify("Intro to Algebra, Part 2");
        assert_eq!(slugify(&once), once);
        assert!(is_valid_slug(&once));
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("intro-to-rust_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("has space"));
        assert!(!is_valid_slug("ünïcode"));
        assert!(validate_slug("ok-slug").is_ok());
        assert!(validate_slug("not ok").is_err());
    }
}
