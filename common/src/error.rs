//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("画像は最大{max}枚までです（現在{current}枚、追加{adding}枚）")]
    CapacityExceeded {
        current: usize,
        adding: usize,
        max: usize,
    },

    #[error("インデックスが範囲外です: {index}（画像数 {len}）")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("入力値が不正です: {field} - {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_capacity() {
        let error = Error::CapacityExceeded { current: 10, adding: 1, max: 10 };
        let display = format!("{}", error);
        assert!(display.contains("10"));
        assert!(display.contains("追加1枚"));
    }

    #[test]
    fn test_error_display_index() {
        let error = Error::IndexOutOfRange { index: 3, len: 2 };
        assert_eq!(format!("{}", error), "インデックスが範囲外です: 3（画像数 2）");
    }

    #[test]
    fn test_error_display_invalid_field() {
        let error = Error::InvalidField { field: "price", reason: "0より大きい値".into() };
        let display = format!("{}", error);
        assert!(display.contains("price"));
        assert!(display.contains("0より大きい値"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
