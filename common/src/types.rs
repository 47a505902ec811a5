//! 画像の型定義
//!
//! CLIとクライアントで共有される型:
//! - RemoteImage: バックエンドが保持している画像
//! - LocalFile: ユーザーが添付した未保存のファイル
//! - StagedImage: 編集中バッファの1要素

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1リスティングに登録できる画像の最大数
pub const MAX_IMAGES: usize = 10;

/// バックエンド上の画像
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteImage {
    pub id: String,

    /// バックエンドのJSONでは `image_url`
    #[serde(rename = "image_url", alias = "url")]
    pub url: String,
}

impl RemoteImage {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// 添付されたローカルファイル（アップロード前）
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

// バイト列はログに出さない
impl fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// PreviewRegistry内のファイルを指すハンドル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalHandle(pub u64);

/// 表示用のプレビューURL（revokeされるまで有効）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewUrl(String);

impl PreviewUrl {
    pub(crate) fn issue(handle: LocalHandle, file_name: &str) -> Self {
        Self(format!("preview://{}/{}", handle.0, file_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 編集中の画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedImage {
    /// バックエンドに存在し、残す画像
    Existing { id: String, url: String },
    /// 追加されたが未保存の画像
    New {
        local_handle: LocalHandle,
        preview_url: PreviewUrl,
    },
}

impl StagedImage {
    pub fn is_new(&self) -> bool {
        matches!(self, StagedImage::New { .. })
    }

    /// 表示に使うURL
    pub fn display_url(&self) -> &str {
        match self {
            StagedImage::Existing { url, .. } => url,
            StagedImage::New { preview_url, .. } => preview_url.as_str(),
        }
    }

    pub fn remote_id(&self) -> Option<&str> {
        match self {
            StagedImage::Existing { id, .. } => Some(id),
            StagedImage::New { .. } => None,
        }
    }
}

impl From<RemoteImage> for StagedImage {
    fn from(image: RemoteImage) -> Self {
        StagedImage::Existing {
            id: image.id,
            url: image.url,
        }
    }
}
