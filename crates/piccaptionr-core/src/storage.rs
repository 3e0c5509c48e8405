//! Filesystem access: image discovery and result persistence.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{PipelineError, PipelineResult};
use crate::types::ResultItem;

/// Extensions (case-insensitive) treated as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

/// Storage operations the pipeline needs.
pub trait Storage: Send + Sync {
    /// Recursively list image files under `folder`.
    fn list_images(&self, folder: &Path) -> PipelineResult<Vec<PathBuf>>;

    /// Write `items` as an indented JSON array, replacing any existing file.
    fn persist(&self, output_path: &Path, items: &[ResultItem]) -> PipelineResult<()>;

    /// Create `path` (and parents) if it does not exist.
    fn ensure_directory(&self, path: &Path) -> PipelineResult<()>;

    fn directory_exists(&self, path: &Path) -> PipelineResult<bool>;
}

/// Local-filesystem [`Storage`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FileStorage;

impl Storage for FileStorage {
    fn list_images(&self, folder: &Path) -> PipelineResult<Vec<PathBuf>> {
        require_path("folder", folder)?;
        if !folder.is_dir() {
            return Err(PipelineError::DirectoryNotFound(folder.to_path_buf()));
        }

        let mut files = Vec::new();

        // A folder's own files by name, then its subfolders by name
        let walker = WalkDir::new(folder).follow_links(true).sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        });
        for entry in walker {
            let entry = entry.map_err(|e| walk_error(folder, e))?;
            if entry.file_type().is_file() && is_supported(entry.path()) {
                files.push(entry.into_path());
            }
        }

        tracing::debug!("Found {} image(s) under {:?}", files.len(), folder);
        Ok(files)
    }

    fn persist(&self, output_path: &Path, items: &[ResultItem]) -> PipelineResult<()> {
        require_path("output_path", output_path)?;
        if items.is_empty() {
            return Err(PipelineError::invalid_argument(
                "items",
                "no result items to write",
            ));
        }

        let json = serde_json::to_string_pretty(items).map_err(|e| PipelineError::Io {
            path: output_path.to_path_buf(),
            message: "Failed to serialize results".to_string(),
            source: std::io::Error::other(e),
        })?;

        std::fs::write(output_path, json).map_err(|e| PipelineError::Io {
            path: output_path.to_path_buf(),
            message: "An error occurred while writing data to the file".to_string(),
            source: e,
        })?;

        tracing::info!("Wrote {} result(s) to {:?}", items.len(), output_path);
        Ok(())
    }

    fn ensure_directory(&self, path: &Path) -> PipelineResult<()> {
        require_path("path", path)?;
        std::fs::create_dir_all(path).map_err(|e| PipelineError::Io {
            path: path.to_path_buf(),
            message: "Cannot create directory".to_string(),
            source: e,
        })
    }

    fn directory_exists(&self, path: &Path) -> PipelineResult<bool> {
        require_path("path", path)?;
        Ok(path.is_dir())
    }
}

/// Output file name: `<prefix>-<yyyy-MM-dd-HH-mm-ss>.txt`.
pub fn output_file_name(prefix: &str, timestamp: NaiveDateTime) -> String {
    format!("{}-{}.txt", prefix, timestamp.format("%Y-%m-%d-%H-%M-%S"))
}

/// Check if a file has a supported image extension.
fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn require_path(name: &'static str, path: &Path) -> PipelineResult<()> {
    if path.as_os_str().is_empty() || path.to_string_lossy().trim().is_empty() {
        Err(PipelineError::invalid_argument(name, "path must not be empty"))
    } else {
        Ok(())
    }
}

fn walk_error(folder: &Path, e: walkdir::Error) -> PipelineError {
    let path = e.path().unwrap_or(folder).to_path_buf();
    let denied = e
        .io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::PermissionDenied);
    let message = if denied {
        "Access to one or more directories was denied".to_string()
    } else {
        "An error occurred while retrieving image files".to_string()
    };
    PipelineError::Io {
        path,
        message,
        source: e.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CaptionResult, ImageMetadata};
    use chrono::NaiveDate;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"x").unwrap();
    }

    fn item(name: &str) -> ResultItem {
        ResultItem {
            image_name: name.to_string(),
            metadata: ImageMetadata::default(),
            caption: CaptionResult {
                raw_text: "raw".to_string(),
                sanitized_text: "clean".to_string(),
                input_tokens: 10,
                output_tokens: 5,
            },
        }
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("test.jpg")));
        assert!(is_supported(Path::new("test.JPG")));
        assert!(is_supported(Path::new("test.jpeg")));
        assert!(is_supported(Path::new("test.Png")));
        assert!(is_supported(Path::new("test.gif")));
        assert!(is_supported(Path::new("test.BMP")));
        assert!(!is_supported(Path::new("test.webp")));
        assert!(!is_supported(Path::new("test.txt")));
        assert!(!is_supported(Path::new("jpg")));
    }

    #[test]
    fn test_list_images_filters_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.JPG", "b.txt", "c.png", "d.PNG"] {
            touch(&dir.path().join(name));
        }

        let files = FileStorage.list_images(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "c.png", "d.PNG"]);
    }

    #[test]
    fn test_list_images_recurses() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("top.jpg"));
        touch(&dir.path().join("2024/rome/colosseum.jpeg"));
        touch(&dir.path().join("2024/notes.md"));

        let files = FileStorage.list_images(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("2024/rome/colosseum.jpeg")));
    }

    #[test]
    fn test_list_images_lists_files_before_subfolders() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a/x.jpg"));
        touch(&dir.path().join("a/b/y.jpg"));
        touch(&dir.path().join("a/z.jpg"));
        touch(&dir.path().join("b.jpg"));
        touch(&dir.path().join("c/w.png"));

        let files = FileStorage.list_images(dir.path()).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("b.jpg"),
                PathBuf::from("a/x.jpg"),
                PathBuf::from("a/z.jpg"),
                PathBuf::from("a/b/y.jpg"),
                PathBuf::from("c/w.png"),
            ]
        );
    }

    #[test]
    fn test_list_images_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileStorage.list_images(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_list_images_missing_folder() {
        let err = FileStorage
            .list_images(Path::new("/nonexistent/photos"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_list_images_empty_path() {
        let err = FileStorage.list_images(Path::new("")).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidArgument { .. }));
    }

    #[test]
    fn test_persist_writes_indented_array_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old contents").unwrap();

        FileStorage
            .persist(&path, &[item("a.jpg"), item("b.jpg")])
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {"));
        let parsed: Vec<ResultItem> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].image_name, "a.jpg");
        assert_eq!(parsed[1].image_name, "b.jpg");
    }

    #[test]
    fn test_persist_rejects_empty_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let err = FileStorage.persist(&path, &[]).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidArgument { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_persist_into_missing_directory_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/out.txt");
        let err = FileStorage.persist(&path, &[item("a.jpg")]).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }

    #[test]
    fn test_ensure_directory_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        assert!(!FileStorage.directory_exists(&nested).unwrap());
        FileStorage.ensure_directory(&nested).unwrap();
        assert!(FileStorage.directory_exists(&nested).unwrap());
        // Already present is fine
        FileStorage.ensure_directory(&nested).unwrap();
    }

    #[test]
    fn test_directory_exists_rejects_empty_path() {
        assert!(FileStorage.directory_exists(Path::new("")).is_err());
    }

    #[test]
    fn test_output_file_name() {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(7, 8, 9)
            .unwrap();
        assert_eq!(
            output_file_name("piccaptionr", ts),
            "piccaptionr-2024-05-01-07-08-09.txt"
        );
    }
}
