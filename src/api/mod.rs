//! バックエンドREST API
//!
//! テストでは `ListingApi` を実装したフェイクを差し込む。

mod http;

pub use http::HttpListingApi;

use crate::auth::Credential;
use crate::error::Result;
use async_trait::async_trait;
use sublet_images_common::{ListingDetail, ListingUpdate, LocalFile, UploadedImage};

#[async_trait]
pub trait ListingApi: Send + Sync {
    /// `GET /listings/my`（ログイン中のユーザーのリスティング）
    async fn my_listings(&self, credential: &Credential) -> Result<Vec<ListingDetail>>;

    /// `GET /listings/{id}`
    async fn get_listing(&self, listing_id: &str, credential: &Credential) -> Result<ListingDetail>;

    /// `POST /listings/{id}/images`（multipart、フィールド名 `images`）
    async fn upload_images(
        &self,
        listing_id: &str,
        files: &[&LocalFile],
        credential: &Credential,
    ) -> Result<Vec<UploadedImage>>;

    /// `DELETE /listings/{id}/images/{imageId}`
    async fn delete_image(&self, listing_id: &str, image_id: &str, credential: &Credential) -> Result<()>;

    /// `PUT /listings/{id}`
    async fn update_listing(
        &self,
        listing_id: &str,
        update: &ListingUpdate,
        credential: &Credential,
    ) -> Result<ListingDetail>;
}
