//! プレビューハンドル管理
//!
//! 追加されたファイルの実体とプレビューURLを保持する。
//! 発行したハンドルは画像の削除・再初期化・セッション終了時に必ずrevokeする。

use crate::types::{LocalFile, LocalHandle, PreviewUrl};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next_handle: u64,
    entries: BTreeMap<LocalHandle, (PreviewUrl, LocalFile)>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// ファイルを登録してハンドルとプレビューURLを発行
    pub fn issue(&mut self, file: LocalFile) -> (LocalHandle, PreviewUrl) {
        let handle = LocalHandle(self.next_handle);
        self.next_handle += 1;

        let url = PreviewUrl::issue(handle, &file.file_name);
        self.entries.insert(handle, (url.clone(), file));
        (handle, url)
    }

    /// ハンドルを解放し、保持していたファイルを返す
    pub fn revoke(&mut self, handle: LocalHandle) -> Option<LocalFile> {
        self.entries.remove(&handle).map(|(_, file)| file)
    }

    /// すべて解放
    pub fn revoke_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn get(&self, handle: LocalHandle) -> Option<&LocalFile> {
        self.entries.get(&handle).map(|(_, file)| file)
    }

    /// 未解放のハンドル数
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}
