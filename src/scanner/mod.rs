use crate::error::{Result, SubletError};
use std::path::{Path, PathBuf};
use sublet_images_common::LocalFile;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// フォルダ直下の画像ファイルを列挙（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(SubletError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file() && has_image_extension(path))
        .collect();

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(images)
}

/// 画像ファイルを読み込む。中身が画像でなければエラー
pub fn load_file(path: &Path) -> Result<LocalFile> {
    if !path.is_file() {
        return Err(SubletError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let format = image::guess_format(&bytes)
        .map_err(|_| SubletError::UnsupportedImage(path.display().to_string()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(LocalFile::new(file_name, format.to_mime_type(), bytes))
}

/// 複数ファイルを読み込む。1件でも失敗したら何も返さない
pub fn load_files(paths: &[PathBuf]) -> Result<Vec<LocalFile>> {
    paths.iter().map(|p| load_file(p)).collect()
}
