//! Input resolution: normalise a user-supplied path or URL to a local file.
//!
//! ## Why download to a temp file?
//!
//! Every format reader takes a file-system path, and the dispatcher picks the
//! reader from the file extension. Downloading to a `TempDir` under the URL's
//! own file name gives the readers a real path with the right extension,
//! while cleanup happens automatically when [`ResolvedInput`] is dropped.

use crate::error::ReportError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The resolved input — either a local path or a downloaded temp file.
#[derive(Debug)]
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; the body was saved in a temp directory that lives
    /// as long as this value.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Get the path to the file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local file path.
///
/// URLs are downloaded; local paths are checked for existence and read
/// permission. The format itself is judged later by the reader dispatcher.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, ReportError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

fn resolve_local(path_str: &str) -> Result<ResolvedInput, ReportError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(ReportError::FileNotFound { path });
    }

    // Directories are only readable as files on some platforms.
    if path.is_file() {
        match std::fs::File::open(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(ReportError::PermissionDenied { path });
            }
            Err(_) => return Err(ReportError::FileNotFound { path }),
        }
    }

    debug!("Resolved local input: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, ReportError> {
    info!("Downloading document from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ReportError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ReportError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ReportError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ReportError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let filename = filename_from_url(url);
    let temp_dir = TempDir::new().map_err(|e| ReportError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            ReportError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ReportError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| ReportError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded {} bytes to: {}", bytes.len(), file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Last path segment of `url` when it carries an extension, else a name
/// without one (which the dispatcher will then reject).
fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "download".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/q3.xlsx"));
        assert!(is_url("http://example.com/q3.csv"));
        assert!(!is_url("/tmp/q3.csv"));
        assert!(!is_url("q3.csv"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_filename_from_url_keeps_extension() {
        assert_eq!(
            filename_from_url("https://example.com/reports/q3-results.pdf?dl=1"),
            "q3-results.pdf"
        );
        assert_eq!(filename_from_url("https://example.com/files/"), "download");
        assert_eq!(filename_from_url("https://example.com/latest"), "download");
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let err = resolve_input("/definitely/not/here.csv", 5).await.unwrap_err();
        assert!(matches!(err, ReportError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_existing_local_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("q3.txt");
        std::fs::write(&path, "revenue 120").unwrap();
        let resolved = resolve_input(path.to_str().unwrap(), 5).await.unwrap();
        assert_eq!(resolved.path(), path.as_path());
    }
}
