//! テスト用のフェイクAPI

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use sublet_images::api::ListingApi;
use sublet_images::auth::Credential;
use sublet_images::error::{Result, SubletError};
use sublet_images_common::{ListingDetail, ListingUpdate, LocalFile, RemoteImage, UploadedImage};

#[derive(Default)]
pub struct FakeState {
    pub images: Vec<RemoteImage>,
    pub next_id: u32,
    /// 通信エラーにするID
    pub failing_deletes: HashSet<String>,
    /// 401を返すID
    pub expired_deletes: HashSet<String>,
    pub fail_upload: bool,
    pub fail_get: bool,
    pub calls: Vec<String>,
    pub uploaded_names: Vec<String>,
    pub last_update: Option<ListingUpdate>,
}

pub struct FakeApi {
    pub listing_id: String,
    pub state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn with_images(ids: &[&str]) -> Self {
        let images = ids
            .iter()
            .map(|id| RemoteImage::new(*id, format!("https://cdn/{}.jpg", id)))
            .collect();
        Self {
            listing_id: "listing-1".into(),
            state: Mutex::new(FakeState {
                images,
                ..Default::default()
            }),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn image_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().images.iter().map(|i| i.id.clone()).collect()
    }

    fn detail(&self, state: &FakeState) -> ListingDetail {
        ListingDetail {
            id: self.listing_id.clone(),
            title: "Sunny room".into(),
            images: state.images.clone(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ListingApi for FakeApi {
    async fn my_listings(&self, _credential: &Credential) -> Result<Vec<ListingDetail>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("my".into());
        Ok(vec![self.detail(&state)])
    }

    async fn get_listing(&self, listing_id: &str, _credential: &Credential) -> Result<ListingDetail> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("get {}", listing_id));
        if state.fail_get {
            return Err(SubletError::Network("connection reset".into()));
        }
        Ok(self.detail(&state))
    }

    async fn upload_images(
        &self,
        listing_id: &str,
        files: &[&LocalFile],
        _credential: &Credential,
    ) -> Result<Vec<UploadedImage>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("upload {} x{}", listing_id, files.len()));
        if state.fail_upload {
            return Err(SubletError::Api {
                status: 500,
                detail: "storage unavailable".into(),
            });
        }

        let mut created = Vec::new();
        for file in files {
            state.next_id += 1;
            let id = format!("new-{}", state.next_id);
            let url = format!("https://cdn/{}", file.file_name);
            state.images.push(RemoteImage::new(id.clone(), url.clone()));
            state.uploaded_names.push(file.file_name.clone());
            created.push(UploadedImage {
                id,
                listing_id: listing_id.to_string(),
                image_url: url,
            });
        }
        Ok(created)
    }

    async fn delete_image(&self, listing_id: &str, image_id: &str, _credential: &Credential) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete {} {}", listing_id, image_id));
        if state.failing_deletes.contains(image_id) {
            return Err(SubletError::Network("timeout".into()));
        }
        if state.expired_deletes.contains(image_id) {
            return Err(SubletError::Api {
                status: 401,
                detail: "Could not validate credentials".into(),
            });
        }
        let before = state.images.len();
        state.images.retain(|i| i.id != image_id);
        if state.images.len() == before {
            return Err(SubletError::NotFound("Image not found".into()));
        }
        Ok(())
    }

    async fn update_listing(
        &self,
        listing_id: &str,
        update: &ListingUpdate,
        _credential: &Credential,
    ) -> Result<ListingDetail> {
        update.validate()?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update {}", listing_id));
        state.last_update = Some(update.clone());
        Ok(self.detail(&state))
    }
}

pub fn credential() -> Credential {
    Credential::new("test-token").expect("non-empty token")
}

pub fn jpeg(name: &str) -> LocalFile {
    LocalFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}
