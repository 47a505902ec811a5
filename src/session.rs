//! リスティング画像の編集セッション
//!
//! 編集バッファを1つのリスティングに紐づけて保持する。
//! セッション終了（drop）時に未解放のプレビューをすべて解放する。

use crate::api::ListingApi;
use crate::auth::Credential;
use crate::error::Result;
use crate::reconciler::{self, ReconcileOutcome};
use crate::scanner;
use std::path::PathBuf;
use sublet_images_common::{
    ImageStaging, ListingDetail, LocalFile, LocalHandle, RemoteImage, Removed, StagedImage,
};
use tracing::debug;

pub struct EditSession {
    listing: ListingDetail,
    staging: ImageStaging,
}

impl EditSession {
    /// 取得済みのリスティングから開始
    pub fn new(listing: ListingDetail) -> Self {
        let staging = ImageStaging::from_remote(listing.images.clone());
        Self { listing, staging }
    }

    /// バックエンドから取得して開始
    pub async fn open<A>(api: &A, listing_id: &str, credential: &Credential) -> Result<Self>
    where
        A: ListingApi + ?Sized,
    {
        let mut listing = api.get_listing(listing_id, credential).await?;
        if listing.id.is_empty() {
            listing.id = listing_id.to_string();
        }
        debug!("opened listing {} with {} images", listing_id, listing.images.len());
        Ok(Self::new(listing))
    }

    pub fn listing_id(&self) -> &str {
        &self.listing.id
    }

    pub fn listing(&self) -> &ListingDetail {
        &self.listing
    }

    pub fn staging(&self) -> &ImageStaging {
        &self.staging
    }

    pub fn staging_mut(&mut self) -> &mut ImageStaging {
        &mut self.staging
    }

    pub fn add_files(&mut self, files: Vec<LocalFile>) -> Result<Vec<LocalHandle>> {
        Ok(self.staging.add_files(files)?)
    }

    /// ディスク上の画像を読み込んで追加
    pub fn add_paths(&mut self, paths: &[PathBuf]) -> Result<Vec<LocalHandle>> {
        let files = scanner::load_files(paths)?;
        self.add_files(files)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Removed> {
        Ok(self.staging.remove_at(index)?)
    }

    /// 変更を保存し、バックエンドの最新状態で編集バッファを作り直す
    pub async fn save<A>(&mut self, api: &A, credential: Option<&Credential>) -> Result<ReconcileOutcome>
    where
        A: ListingApi + ?Sized,
    {
        let listing_id = self.listing.id.clone();
        let outcome = reconciler::reconcile(api, &listing_id, &mut self.staging, credential).await?;

        if outcome.refreshed {
            self.listing.images = self
                .staging
                .images()
                .iter()
                .filter_map(|image| match image {
                    StagedImage::Existing { id, url } => Some(RemoteImage::new(id.clone(), url.clone())),
                    StagedImage::New { .. } => None,
                })
                .collect();
        }
        Ok(outcome)
    }
}

impl Drop for EditSession {
    fn drop(&mut self) {
        let released = self.staging.teardown();
        if released > 0 {
            debug!("released {} preview handles", released);
        }
    }
}
