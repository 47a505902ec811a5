//! Sublet Images Common Library
//!
//! リスティング画像の編集バッファとリスティング型。I/Oは持たない。

pub mod types;
pub mod preview;
pub mod staging;
pub mod listing;
pub mod error;

pub use types::{LocalFile, LocalHandle, PreviewUrl, RemoteImage, StagedImage, MAX_IMAGES};
pub use preview::PreviewRegistry;
pub use staging::{DeletionQueue, ImageStaging, Removed, Selection};
pub use listing::{ListingDetail, ListingUpdate, PropertyType, UploadedImage};
pub use error::{Error, Result};
