//! Local-disk storage for uploaded files.
//!
//! Files are written to a single flat directory as `<unix-millis>_<original>`.
//! The timestamp prefix keeps uploads that share a name apart; two uploads of
//! the same name within one millisecond overwrite each other.

use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::{Path, PathBuf};

/// Public URL prefix under which the upload directory is served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Name used when the client sends no usable filename.
const FALLBACK_NAME: &str = "file";

/// Bytes left as-is in a URL path segment: RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under a fresh timestamped name and return that name.
    ///
    /// The directory is created (recursively) if it does not exist yet. An
    /// existing file with the same generated name is replaced.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = stored_filename(Utc::now().timestamp_millis(), original_name);
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(
            path = %path.display(),
            bytes = bytes.len(),
            "Stored upload"
        );
        Ok(filename)
    }

    /// Public URL for a stored filename.
    ///
    /// The name is percent-encoded as a single path segment; the file on disk
    /// keeps the raw name, which the static handler decodes back to.
    pub fn url_for(filename: &str) -> String {
        format!(
            "{}/{}",
            PUBLIC_PREFIX,
            utf8_percent_encode(filename, PATH_SEGMENT)
        )
    }
}

/// Build the on-disk name: `<millis>_<final path component of original>`.
///
/// Directory parts (either separator) are dropped so the file always lands
/// inside the upload directory.
pub fn stored_filename(millis: i64, original_name: Option<&str>) -> String {
    let base = original_name
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_NAME);

    format!("{}_{}", millis, base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pocketwriter_upload_test_{}", name));
        std::fs::remove_dir_all(&dir).ok();
        dir
    }

    #[test]
    fn test_stored_filename_prefixes_timestamp() {
        assert_eq!(
            stored_filename(1700000000123, Some("photo.png")),
            "1700000000123_photo.png"
        );
    }

    #[test]
    fn test_stored_filename_strips_directories() {
        assert_eq!(stored_filename(1, Some("../../etc/passwd")), "1_passwd");
        assert_eq!(stored_filename(1, Some("C:\\Users\\me\\pic.jpg")), "1_pic.jpg");
    }

    #[test]
    fn test_stored_filename_fallbacks() {
        assert_eq!(stored_filename(5, None), "5_file");
        assert_eq!(stored_filename(5, Some("")), "5_file");
        assert_eq!(stored_filename(5, Some("dir/")), "5_file");
        assert_eq!(stored_filename(5, Some("..")), "5_file");
    }

    #[test]
    fn test_url_for() {
        assert_eq!(UploadStore::url_for("1_a.png"), "/uploads/1_a.png");
        assert_eq!(UploadStore::url_for("1_my-pic~v2.jpeg"), "/uploads/1_my-pic~v2.jpeg");
    }

    #[test]
    fn test_url_for_encodes_reserved_characters() {
        assert_eq!(UploadStore::url_for("1_50%.png"), "/uploads/1_50%25.png");
        assert_eq!(
            UploadStore::url_for("1_a b#c?d.png"),
            "/uploads/1_a%20b%23c%3Fd.png"
        );
        assert_eq!(UploadStore::url_for("1_é.png"), "/uploads/1_%C3%A9.png");
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_writes() {
        let dir = test_dir("creates_dir");
        let store = UploadStore::new(dir.join("nested"));

        let name = store.save(Some("hello.txt"), b"hi there").await.unwrap();
        assert!(name.ends_with("_hello.txt"));

        let written = std::fs::read(store.dir().join(&name)).unwrap();
        assert_eq!(written, b"hi there");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_distinct_names_never_collide() {
        let dir = test_dir("distinct");
        let store = UploadStore::new(&dir);

        let a = store.save(Some("a.png"), b"A").await.unwrap();
        let b = store.save(Some("b.png"), b"B").await.unwrap();
        assert_ne!(a, b);

        assert_eq!(std::fs::read(dir.join(&a)).unwrap(), b"A");
        assert_eq!(std::fs::read(dir.join(&b)).unwrap(), b"B");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_save_fails_when_dir_is_a_file() {
        let dir = test_dir("dir_is_file");
        std::fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let store = UploadStore::new(&blocker);
        assert!(store.save(Some("x.png"), b"x").await.is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
