//! 認証情報
//!
//! トークンはグローバルに持たず、呼び出し側から明示的に渡す。

use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// 空白のみのトークンはNone
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(Self { token })
        }
    }

    /// `Authorization` ヘッダの値
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

// トークンはログに出さない
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
