use super::ListingApi;
use crate::auth::Credential;
use crate::config::Config;
use crate::error::{Result, SubletError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode, Url};
use std::time::Duration;
use sublet_images_common::{ListingDetail, ListingUpdate, LocalFile, UploadedImage};
use tracing::{debug, error, info, warn};

/// エラー本文は先頭だけ残す
const ERROR_BODY_LIMIT: usize = 100;

pub struct HttpListingApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpListingApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SubletError::Config(format!("APIのURLが不正です: {} ({})", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SubletError::Config(format!("APIのURLが不正です: {}", base_url)));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base_url(), Duration::from_secs(config.timeout_seconds))
    }

    /// ベースURLにパスを追加（各要素はパーセントエンコードされる）
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` でbaseになれるURLか確認済み
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// 失敗レスポンスをエラーに変換
///
/// 本文がJSONなら `detail` を、そうでなければ本文の先頭を使う。
async fn error_from_response(response: Response, what: &str) -> SubletError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error!("{} failed: {} - {}", what, status, body);

    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| json.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            let snippet: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            format!("{} - {}", status.canonical_reason().unwrap_or(""), snippet)
        });

    if status == StatusCode::NOT_FOUND {
        SubletError::NotFound(detail)
    } else {
        SubletError::Api {
            status: status.as_u16(),
            detail,
        }
    }
}

#[async_trait]
impl ListingApi for HttpListingApi {
    async fn my_listings(&self, credential: &Credential) -> Result<Vec<ListingDetail>> {
        debug!("my_listings");
        let response = self
            .client
            .get(self.endpoint(&["listings", "my"]))
            .header("Authorization", credential.bearer())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "my_listings").await);
        }

        Ok(response.json().await?)
    }

    async fn get_listing(&self, listing_id: &str, credential: &Credential) -> Result<ListingDetail> {
        debug!("get_listing: {}", listing_id);
        let response = self
            .client
            .get(self.endpoint(&["listings", listing_id]))
            .header("Authorization", credential.bearer())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "get_listing").await);
        }

        let listing: ListingDetail = response.json().await?;
        debug!("get_listing: {} images", listing.images.len());
        Ok(listing)
    }

    async fn upload_images(
        &self,
        listing_id: &str,
        files: &[&LocalFile],
        credential: &Credential,
    ) -> Result<Vec<UploadedImage>> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type)?;
            form = form.part("images", part);
        }

        info!("upload_images: {} files to listing {}", files.len(), listing_id);
        let response = self
            .client
            .post(self.endpoint(&["listings", listing_id, "images"]))
            .header("Authorization", credential.bearer())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "upload_images").await);
        }

        Ok(response.json().await?)
    }

    async fn delete_image(&self, listing_id: &str, image_id: &str, credential: &Credential) -> Result<()> {
        info!("delete_image: {} from listing {}", image_id, listing_id);
        let response = self
            .client
            .delete(self.endpoint(&["listings", listing_id, "images", image_id]))
            .header("Authorization", credential.bearer())
            .send()
            .await?;

        if !response.status().is_success() {
            let err = error_from_response(response, "delete_image").await;
            if matches!(err, SubletError::NotFound(_)) {
                warn!("delete_image: {} already gone", image_id);
            }
            return Err(err);
        }
        Ok(())
    }

    async fn update_listing(
        &self,
        listing_id: &str,
        update: &ListingUpdate,
        credential: &Credential,
    ) -> Result<ListingDetail> {
        let body = update.to_json()?;

        info!("update_listing: {}", listing_id);
        let response = self
            .client
            .put(self.endpoint(&["listings", listing_id]))
            .header("Authorization", credential.bearer())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "update_listing").await);
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpListingApi {
        HttpListingApi::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let url = api("http://localhost:8000/api/v1/").endpoint(&["listings", "abc"]);
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/listings/abc");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = api("http://localhost:8000/api/v1").endpoint(&["listings", "a b", "images", "x/../y?z"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/listings/a%20b/images/x%2F..%2Fy%3Fz"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpListingApi::new("not a url", Duration::from_secs(1)),
            Err(SubletError::Config(_))
        ));
        assert!(HttpListingApi::new("mailto:someone@example.com", Duration::from_secs(1)).is_err());
    }
}
