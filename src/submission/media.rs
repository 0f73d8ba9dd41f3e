use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw media handed in with a submission. Bytes never reach the record
/// store; only the reference returned by [`MediaStore::store`] does.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Upload collaborator: takes raw media plus a path key and returns an
/// opaque, resolvable reference string. The core never interprets the
/// reference.
pub trait MediaStore {
    fn store(&self, owner_id: &str, upload: &MediaUpload) -> Result<String, MediaError>;
}

/// Local-filesystem media store under `<root>/<owner>/`.
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl MediaStore for LocalMediaStore {
    fn store(&self, owner_id: &str, upload: &MediaUpload) -> Result<String, MediaError> {
        let owner_dir = self.root.join(sanitize(owner_id));
        std::fs::create_dir_all(&owner_dir)?;

        // Millisecond prefix keeps names unique per owner.
        let name = format!(
            "{}-{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize(&upload.file_name)
        );
        std::fs::write(owner_dir.join(&name), &upload.bytes)?;

        Ok(format!("uploads/{}/{}", sanitize(owner_id), name))
    }
}

/// Strip path separators and anything else that could escape the root.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.replace("..", "__").trim_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> MediaUpload {
        MediaUpload {
            file_name: name.to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn store_writes_file_and_returns_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path().to_path_buf());

        let reference = store.store("user-1", &upload("rash.jpg")).unwrap();
        assert!(reference.starts_with("uploads/user-1/"));
        assert!(reference.ends_with("-rash.jpg"));

        let name = reference.rsplit('/').next().unwrap();
        let on_disk = dir.path().join("user-1").join(name);
        assert_eq!(std::fs::read(on_disk).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn file_names_cannot_escape_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path().to_path_buf());

        let reference = store.store("../evil", &upload("../../etc/passwd")).unwrap();
        assert!(!reference.contains(".."));
        // All writes stayed under the root.
        assert!(dir.path().join(sanitize("../evil")).is_dir());
    }

    #[test]
    fn repeated_uploads_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path().to_path_buf());

        let a = store.store("u", &upload("a.png")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = store.store("u", &upload("a.png")).unwrap();
        assert_ne!(a, b);
    }
}
