//! 保存処理（削除キューと追加画像をバックエンドへ反映）
//!
//! 1. 削除キューのIDを1件ずつ削除（失敗しても次へ進む）
//! 2. 追加画像があれば1回のリクエストでまとめてアップロード
//! 3. 結果に関わらずリスティングを取得し直して編集バッファを初期化
//!    （取得に失敗した場合は、確定済みの削除とアップロードだけを編集バッファから外す）
//!
//! 成功した操作は巻き戻さない。通信・サーバーエラーは `Err` にせず
//! `ReconcileOutcome::failures` に集める。

use crate::api::ListingApi;
use crate::auth::Credential;
use crate::error::{Result, SubletError};
use std::fmt;
use sublet_images_common::{ImageStaging, LocalFile};
use tracing::{info, warn};

/// 失敗した操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Delete { image_id: String },
    Upload { files: usize },
    Refetch,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Delete { image_id } => write!(f, "画像削除 {}", image_id),
            Operation::Upload { files } => write!(f, "画像アップロード（{}枚）", files),
            Operation::Refetch => write!(f, "リスティング再取得"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NetworkOrServer,
    /// 保存中にトークンが失効した
    Unauthorized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileFailure {
    pub operation: Operation,
    pub kind: FailureKind,
    pub message: String,
}

impl ReconcileFailure {
    fn new(operation: Operation, err: &SubletError) -> Self {
        let kind = if err.is_unauthorized() {
            FailureKind::Unauthorized
        } else {
            FailureKind::NetworkOrServer
        };
        Self {
            operation,
            kind,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// 削除できたID（既に存在しなかったものを含む）
    pub deleted: Vec<String>,
    /// 404だったID
    pub already_gone: Vec<String>,
    pub uploaded: usize,
    /// 再取得して編集バッファを初期化できたか
    pub refreshed: bool,
    pub failures: Vec<ReconcileFailure>,
}

impl ReconcileOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_deletes(&self) -> Vec<&str> {
        self.failures
            .iter()
            .filter_map(|f| match &f.operation {
                Operation::Delete { image_id } => Some(image_id.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// 編集バッファの変更をバックエンドへ反映する
///
/// 認証情報が無い場合は通信前に `Unauthenticated` を返す。
pub async fn reconcile<A>(
    api: &A,
    listing_id: &str,
    staging: &mut ImageStaging,
    credential: Option<&Credential>,
) -> Result<ReconcileOutcome>
where
    A: ListingApi + ?Sized,
{
    let credential = credential.ok_or(SubletError::Unauthenticated)?;

    let queued: Vec<String> = staging.deletion_queue().ids().to_vec();
    let new_files: Vec<LocalFile> = staging.new_files().into_iter().cloned().collect();
    info!(
        "reconcile listing {}: {} deletes, {} uploads",
        listing_id,
        queued.len(),
        new_files.len()
    );

    let mut outcome = ReconcileOutcome::default();

    for image_id in queued {
        match api.delete_image(listing_id, &image_id, credential).await {
            Ok(()) => outcome.deleted.push(image_id),
            Err(SubletError::NotFound(_)) => {
                warn!("image {} was already deleted", image_id);
                outcome.already_gone.push(image_id.clone());
                outcome.deleted.push(image_id);
            }
            Err(err) => {
                warn!("delete {} failed: {}", image_id, err);
                outcome
                    .failures
                    .push(ReconcileFailure::new(Operation::Delete { image_id }, &err));
            }
        }
    }

    if !new_files.is_empty() {
        let refs: Vec<&LocalFile> = new_files.iter().collect();
        match api.upload_images(listing_id, &refs, credential).await {
            Ok(created) => {
                // レスポンスとローカルファイルの対応付けはせず、再取得結果を正とする
                outcome.uploaded = new_files.len();
                info!("uploaded {} files ({} records returned)", new_files.len(), created.len());
            }
            Err(err) => {
                warn!("upload failed: {}", err);
                outcome.failures.push(ReconcileFailure::new(
                    Operation::Upload {
                        files: new_files.len(),
                    },
                    &err,
                ));
            }
        }
    }

    match api.get_listing(listing_id, credential).await {
        Ok(listing) => {
            staging.initialize(listing.images);
            outcome.refreshed = true;
        }
        Err(err) => {
            warn!("refetch of listing {} failed: {}", listing_id, err);
            // 確定した操作は外し、未反映の分だけ残す
            staging.forget_deleted(&outcome.deleted);
            if outcome.uploaded > 0 {
                staging.discard_new();
            }
            outcome
                .failures
                .push(ReconcileFailure::new(Operation::Refetch, &err));
        }
    }

    Ok(outcome)
}

/// 保存結果の通知内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveSummary {
    AllSaved,
    SavedWithFailures(Vec<String>),
    Blocked(String),
}

impl SaveSummary {
    pub fn from_result(result: &Result<ReconcileOutcome>) -> Self {
        match result {
            Ok(outcome) if outcome.is_success() => SaveSummary::AllSaved,
            Ok(outcome) => SaveSummary::SavedWithFailures(
                outcome
                    .failures
                    .iter()
                    .map(|f| format!("{}: {}", f.operation, f.message))
                    .collect(),
            ),
            Err(err) => SaveSummary::Blocked(err.to_string()),
        }
    }

    /// 保存前に追加などがブロックされた場合
    pub fn blocked(err: &SubletError) -> Self {
        SaveSummary::Blocked(err.to_string())
    }
}

impl fmt::Display for SaveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveSummary::AllSaved => write!(f, "✅ すべての変更を保存しました"),
            SaveSummary::SavedWithFailures(details) => {
                writeln!(f, "⚠ 保存しましたが、一部失敗しました（{}件）", details.len())?;
                for detail in details {
                    writeln!(f, "  - {}", detail)?;
                }
                Ok(())
            }
            SaveSummary::Blocked(reason) => write!(f, "✖ 保存できません: {}", reason),
        }
    }
}
