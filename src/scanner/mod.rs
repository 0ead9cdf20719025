mod exif;

pub use self::exif::extract_exif_summary;

use crate::error::{PhotoCritiqueError, Result};
use photo_critique_common::ExifSummary;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct PhotoInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: &'static str,
    pub file_size: u64,
    pub exif: Option<ExifSummary>,
}

/// 送信用に読み込んだ写真
#[derive(Debug, Clone)]
pub struct PhotoData {
    pub info: PhotoInfo,
    pub bytes: Vec<u8>,
    /// (幅, 高さ)。デコードできなければNone
    pub dimensions: Option<(u32, u32)>,
}

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// 拡張子からMIMEタイプを判定（大文字小文字不問）
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// 写真1枚の情報を取得（EXIFを含む）
pub fn inspect_photo(path: &Path) -> Result<PhotoInfo> {
    if !path.is_file() {
        return Err(PhotoCritiqueError::FileNotFound(path.display().to_string()));
    }

    let mime_type = mime_type_for(path)
        .ok_or_else(|| PhotoCritiqueError::UnsupportedImage(path.display().to_string()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let file_size = std::fs::metadata(path)?.len();

    Ok(PhotoInfo {
        path: path.to_path_buf(),
        file_name,
        mime_type,
        file_size,
        exif: extract_exif_summary(path),
    })
}

/// 写真を読み込む（サイズ上限チェック付き）
pub fn load_photo(info: &PhotoInfo, max_bytes: u64) -> Result<PhotoData> {
    if info.file_size > max_bytes {
        return Err(PhotoCritiqueError::ImageTooLarge {
            path: info.path.display().to_string(),
            limit_mb: max_bytes / (1024 * 1024),
        });
    }

    let bytes = std::fs::read(&info.path)?;
    let dimensions = match image::image_dimensions(&info.path) {
        Ok(dims) => Some(dims),
        Err(e) => {
            tracing::warn!(path = %info.path.display(), error = %e, "画像サイズを取得できません");
            None
        }
    };

    Ok(PhotoData {
        info: info.clone(),
        bytes,
        dimensions,
    })
}

pub fn scan_folder(folder: &Path) -> Result<Vec<PhotoInfo>> {
    if !folder.is_dir() {
        return Err(PhotoCritiqueError::FolderNotFound(folder.display().to_string()));
    }

    let paths: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && mime_type_for(p).is_some())
        .collect();

    // EXIF読み取りは並列
    let mut photos = paths
        .par_iter()
        .map(|p| inspect_photo(p))
        .collect::<Result<Vec<_>>>()?;

    // ファイル名でソート
    photos.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(photos)
}

/// ファイルならその1枚、フォルダなら直下の写真すべて
pub fn collect_photos(path: &Path) -> Result<Vec<PhotoInfo>> {
    if path.is_dir() {
        scan_folder(path)
    } else {
        Ok(vec![inspect_photo(path)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("a.jpg")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("a.JPEG")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("a.png")), Some("image/png"));
        assert_eq!(mime_type_for(Path::new("a.gif")), Some("image/gif"));
        assert_eq!(mime_type_for(Path::new("a.WebP")), Some("image/webp"));
        assert_eq!(mime_type_for(Path::new("a.txt")), None);
        assert_eq!(mime_type_for(Path::new("a.heic")), None);
        assert_eq!(mime_type_for(Path::new("noext")), None);
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(PhotoCritiqueError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_with_images() {
        let temp_dir = tempfile::tempdir().unwrap();

        File::create(temp_dir.path().join("test1.jpg")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.path().join("test2.JPG")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.path().join("test3.webp")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.path().join("readme.txt")).unwrap().write_all(b"text").unwrap();
        fs::create_dir(temp_dir.path().join("sub.jpg")).unwrap();

        let result = scan_folder(temp_dir.path()).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].file_name, "test1.jpg");
        assert_eq!(result[1].file_name, "test2.JPG");
        assert_eq!(result[2].file_name, "test3.webp");
        assert_eq!(result[2].mime_type, "image/webp");
        assert!(result[0].exif.is_none());
    }

    #[test]
    fn test_inspect_unsupported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let result = inspect_photo(&path);
        assert!(matches!(result, Err(PhotoCritiqueError::UnsupportedImage(_))));
    }

    #[test]
    fn test_inspect_missing_file() {
        let result = inspect_photo(Path::new("/nonexistent/photo.jpg"));
        assert!(matches!(result, Err(PhotoCritiqueError::FileNotFound(_))));
    }

    #[test]
    fn test_load_photo_too_large() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("big.png");
        fs::write(&path, vec![0u8; 2048]).unwrap();

        let info = inspect_photo(&path).unwrap();
        let result = load_photo(&info, 1024);
        assert!(matches!(result, Err(PhotoCritiqueError::ImageTooLarge { .. })));
    }

    #[test]
    fn test_load_photo_reads_bytes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("small.png");
        fs::write(&path, b"not really a png").unwrap();

        let info = inspect_photo(&path).unwrap();
        let photo = load_photo(&info, 1024).unwrap();
        assert_eq!(photo.bytes, b"not really a png");
        assert_eq!(photo.info.file_size, 16);
        assert!(photo.dimensions.is_none());
    }

    #[test]
    fn test_collect_photos_single_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("one.jpg");
        fs::write(&path, b"x").unwrap();

        let photos = collect_photos(&path).unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].file_name, "one.jpg");
    }
}
