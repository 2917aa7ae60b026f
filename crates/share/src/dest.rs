//! Destination path resolution for received files.
//!
//! Received files land in the platform downloads directory, never
//! overwriting anything already there: name collisions get a counted
//! ` (n)` suffix after the requested name, the same scheme desktop
//! browsers use.

use std::io;
use std::path::{Path, PathBuf};

/// Directory name appended to `$HOME` when no usable downloads
/// directory is configured.
pub const FALLBACK_DOWNLOADS_DIR: &str = "Downloads";

/// Resolves the directory received files are written into.
pub fn download_dir() -> PathBuf {
    downloads_base(dirs::download_dir(), &home_dir())
}

/// Applies the fallback policy: an unset downloads directory, or one
/// that points at the home directory itself, becomes `<home>/Downloads`.
fn downloads_base(configured: Option<PathBuf>, home: &Path) -> PathBuf {
    match configured {
        Some(dir) if dir != home => dir,
        _ => home.join(FALLBACK_DOWNLOADS_DIR),
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"))
}

fn candidate(dir: &Path, filename: &str, n: u32) -> PathBuf {
    if n == 0 {
        dir.join(filename)
    } else {
        dir.join(format!("{filename} ({n})"))
    }
}

/// Returns the first path under `dir` derived from `filename` that does
/// not exist: `name`, then `name (1)`, `name (2)`, …
///
/// Existence is probed, not reserved; use [`create_unique`] when the
/// file is about to be created.
pub fn resolve_unique(dir: &Path, filename: &str) -> PathBuf {
    let mut n = 0;
    loop {
        let path = candidate(dir, filename, n);
        if !path.exists() {
            return path;
        }
        n += 1;
    }
}

/// Atomically creates the first non-colliding destination file.
///
/// Each candidate is opened with `create_new`, so two concurrent
/// receives of the same filename cannot race each other onto one path;
/// a lost race moves on to the next suffix.
pub async fn create_unique(
    dir: &Path,
    filename: &str,
) -> io::Result<(tokio::fs::File, PathBuf)> {
    if filename.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "empty destination filename",
        ));
    }

    let mut n = 0;
    loop {
        let path = candidate(dir, filename, n);
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_when_unset() {
        let home = Path::new("/home/user");
        assert_eq!(
            downloads_base(None, home),
            PathBuf::from("/home/user/Downloads")
        );
    }

    #[test]
    fn fallback_when_equal_to_home() {
        let home = Path::new("/home/user");
        assert_eq!(
            downloads_base(Some(home.to_path_buf()), home),
            PathBuf::from("/home/user/Downloads")
        );
    }

    #[test]
    fn configured_dir_used_when_distinct() {
        let home = Path::new("/home/user");
        assert_eq!(
            downloads_base(Some(PathBuf::from("/data/dl")), home),
            PathBuf::from("/data/dl")
        );
    }

    #[test]
    fn resolve_unique_without_collision() {
        let dir = tempfile::tempdir().unwrap();
        let path = resolve_unique(dir.path(), "photo.jpg");
        assert_eq!(path, dir.path().join("photo.jpg"));
    }

    #[test]
    fn resolve_unique_counts_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"1").unwrap();
        std::fs::write(dir.path().join("photo.jpg (1)"), b"2").unwrap();

        let path = resolve_unique(dir.path(), "photo.jpg");
        assert_eq!(path, dir.path().join("photo.jpg (2)"));
    }

    #[tokio::test]
    async fn create_unique_yields_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();

        // Repeated receives of the same filename each get a fresh path,
        // the k-th suffixed with " (k-1)".
        let mut paths = Vec::new();
        for _ in 0..4 {
            let (_file, path) = create_unique(dir.path(), "report.pdf").await.unwrap();
            paths.push(path);
        }

        assert_eq!(paths[0], dir.path().join("report.pdf"));
        assert_eq!(paths[1], dir.path().join("report.pdf (1)"));
        assert_eq!(paths[2], dir.path().join("report.pdf (2)"));
        assert_eq!(paths[3], dir.path().join("report.pdf (3)"));
        for path in &paths {
            assert!(path.exists());
        }
    }

    #[tokio::test]
    async fn create_unique_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let err = create_unique(dir.path(), "").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn create_unique_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(create_unique(&missing, "a.txt").await.is_err());
    }
}
