//! 画像編集バッファ
//!
//! リスティング編集中の画像セットを保持する:
//! - 表示セット（既存画像と追加画像、挿入順＝表示順）
//! - 削除キュー（保存時に削除する既存画像のID）
//! - 選択インデックス（カルーセルで表示中の画像）
//!
//! 永続化は行わない。保存後はバックエンドの最新状態で `initialize` し直す。

use crate::error::{Error, Result};
use crate::preview::PreviewRegistry;
use crate::types::{LocalFile, LocalHandle, RemoteImage, StagedImage, MAX_IMAGES};
use std::collections::HashSet;

/// 削除予定のリモート画像ID（重複なし、追加順）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionQueue {
    ids: Vec<String>,
}

impl DeletionQueue {
    /// 追加済みなら何もしない。追加した場合のみtrue
    pub fn push(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|queued| queued == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|queued| queued != id);
        self.ids.len() != before
    }
}

/// カルーセルの選択位置。表示セットが空のときのみ `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection(Option<usize>);

impl Selection {
    fn reset(len: usize) -> Self {
        if len == 0 {
            Self(None)
        } else {
            Self(Some(0))
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.0
    }

    fn next(&mut self, len: usize) {
        if let Some(i) = self.0 {
            if len > 0 {
                self.0 = Some((i + 1) % len);
            }
        }
    }

    fn prev(&mut self, len: usize) {
        if let Some(i) = self.0 {
            if len > 0 {
                self.0 = Some((i + len - 1) % len);
            }
        }
    }

    /// `removed` を削除した後の長さ `len` に合わせて補正
    fn after_remove(&mut self, removed: usize, len: usize) {
        if len == 0 {
            self.0 = None;
            return;
        }
        if let Some(i) = self.0 {
            if removed <= i {
                // 詰めて入ってきた要素を優先、末尾を越えたら新しい末尾へ
                self.0 = Some(i.min(len - 1));
            }
        }
    }
}

/// 削除操作の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removed {
    /// 追加画像を破棄（プレビューは解放済み）
    New(Option<LocalFile>),
    /// 既存画像を削除キューへ
    Existing { id: String, newly_queued: bool },
}

/// 編集中の画像セット
#[derive(Debug, Default)]
pub struct ImageStaging {
    display: Vec<StagedImage>,
    deletion_queue: DeletionQueue,
    selection: Selection,
    previews: PreviewRegistry,
}

impl ImageStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// バックエンドの画像一覧から初期化
    pub fn from_remote(remote_images: Vec<RemoteImage>) -> Self {
        let mut staging = Self::new();
        staging.initialize(remote_images);
        staging
    }

    /// バックエンドの画像一覧で表示セットを作り直す
    ///
    /// 未保存の追加画像はプレビューを解放して破棄する。
    /// 同じIDが重複して返ってきた場合は最初の1件だけ残す。
    pub fn initialize(&mut self, remote_images: Vec<RemoteImage>) {
        self.previews.revoke_all();

        let mut seen = HashSet::new();
        self.display = remote_images
            .into_iter()
            .filter(|image| seen.insert(image.id.clone()))
            .map(StagedImage::from)
            .collect();

        self.deletion_queue.clear();
        self.selection = Selection::reset(self.display.len());
    }

    /// ファイルを追加。上限を超える場合は何も変更せずエラー
    pub fn add_files(&mut self, files: Vec<LocalFile>) -> Result<Vec<LocalHandle>> {
        let current = self.display.len();
        if current + files.len() > MAX_IMAGES {
            return Err(Error::CapacityExceeded {
                current,
                adding: files.len(),
                max: MAX_IMAGES,
            });
        }

        let mut handles = Vec::with_capacity(files.len());
        for file in files {
            let (local_handle, preview_url) = self.previews.issue(file);
            self.display.push(StagedImage::New {
                local_handle,
                preview_url,
            });
            handles.push(local_handle);
        }

        if self.selection.index().is_none() && !self.display.is_empty() {
            self.selection = Selection::reset(self.display.len());
        }

        Ok(handles)
    }

    /// 指定位置の画像を表示セットから外す
    pub fn remove_at(&mut self, index: usize) -> Result<Removed> {
        let len = self.display.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        let removed = match self.display.remove(index) {
            StagedImage::New { local_handle, .. } => {
                Removed::New(self.previews.revoke(local_handle))
            }
            StagedImage::Existing { id, .. } => {
                let newly_queued = self.deletion_queue.push(&id);
                Removed::Existing { id, newly_queued }
            }
        };

        self.selection.after_remove(index, self.display.len());
        Ok(removed)
    }

    /// 既存画像をIDで削除キューへ入れる
    ///
    /// 表示セットに無いID（古い参照）でも削除キューには高々1回しか入らない。
    /// 表示セットに無く、キューにも無いIDは無視してfalseを返す。
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        let position = self
            .display
            .iter()
            .position(|image| image.remote_id() == Some(id));

        match position {
            Some(index) => self.remove_at(index).is_ok(),
            None => self.deletion_queue.contains(id),
        }
    }

    pub fn next(&mut self) {
        self.selection.next(self.display.len());
    }

    pub fn prev(&mut self) {
        self.selection.prev(self.display.len());
    }

    /// 選択位置を直接指定。範囲外なら変更せずfalse
    pub fn select_at(&mut self, index: usize) -> bool {
        if index >= self.display.len() {
            return false;
        }
        self.selection = Selection(Some(index));
        true
    }

    /// バックエンドで削除済みになったIDをキューから外す
    pub fn forget_deleted(&mut self, ids: &[String]) {
        for id in ids {
            self.deletion_queue.remove(id);
        }
    }

    /// 追加画像をすべて外してプレビューを解放（アップロード済みになった場合）
    pub fn discard_new(&mut self) -> usize {
        let released = self.previews.revoke_all();
        self.display.retain(|image| !image.is_new());
        self.selection = Selection::reset(self.display.len());
        released
    }

    /// セッション終了。未解放のプレビューをすべて解放する
    pub fn teardown(&mut self) -> usize {
        self.discard_new()
    }

    pub fn images(&self) -> &[StagedImage] {
        &self.display
    }

    pub fn len(&self) -> usize {
        self.display.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }

    pub fn remaining_capacity(&self) -> usize {
        MAX_IMAGES.saturating_sub(self.display.len())
    }

    pub fn deletion_queue(&self) -> &DeletionQueue {
        &self.deletion_queue
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection.index()
    }

    pub fn selected(&self) -> Option<&StagedImage> {
        self.selection.index().and_then(|i| self.display.get(i))
    }

    /// 追加画像のファイル（表示順）
    pub fn new_files(&self) -> Vec<&LocalFile> {
        self.display
            .iter()
            .filter_map(|image| match image {
                StagedImage::New { local_handle, .. } => self.previews.get(*local_handle),
                StagedImage::Existing { .. } => None,
            })
            .collect()
    }

    pub fn has_changes(&self) -> bool {
        !self.deletion_queue.is_empty() || self.display.iter().any(StagedImage::is_new)
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }
}
