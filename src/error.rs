use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubletError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ログインしていません。`sublet-images config --set-token YOUR_TOKEN` または SUBLET_API_TOKEN を設定してください")]
    Unauthenticated,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像ファイルではありません: {0}")]
    UnsupportedImage(String),

    #[error("見つかりません: {0}")]
    NotFound(String),

    #[error("APIエラー ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("通信エラー: {0}")]
    Network(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] sublet_images_common::Error),
}

impl SubletError {
    /// 401/403（トークン切れ・権限なし）
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SubletError::Api { status: 401 | 403, .. })
    }
}

impl From<reqwest::Error> for SubletError {
    fn from(err: reqwest::Error) -> Self {
        SubletError::Network(err.to_string())
    }
}

impl From<dialoguer::Error> for SubletError {
    fn from(err: dialoguer::Error) -> Self {
        SubletError::Prompt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SubletError>;
