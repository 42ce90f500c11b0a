use std::path::Path;

/// True when `path` is an existing regular file whose extension is in `allowed`.
///
/// `allowed` holds lowercase extensions without the dot. Only the name is
/// checked here, the content is looked at when the image is probed.
pub fn is_valid_image_path(path: &Path, allowed: &[String]) -> bool {
    if !path.is_file() {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .map(|ext| allowed.iter().any(|a| *a == ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::DEFAULT_EXTENSIONS;
    use std::fs;
    use tempfile::TempDir;

    fn defaults() -> Vec<String> {
        DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        for name in ["a.JPG", "b.jpeg", "c.Png", "d.gif"] {
            let path = dir.path().join(name);
            fs::write(&path, b"x").unwrap();
            assert!(is_valid_image_path(&path, &defaults()), "{}", name);
        }
    }

    #[test]
    fn test_rejects_other_extensions_and_missing_files() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("notes.txt");
        let bare = dir.path().join("README");
        fs::write(&txt, b"x").unwrap();
        fs::write(&bare, b"x").unwrap();

        assert!(!is_valid_image_path(&txt, &defaults()));
        assert!(!is_valid_image_path(&bare, &defaults()));
        assert!(!is_valid_image_path(&dir.path().join("ghost.png"), &defaults()));
    }

    #[test]
    fn test_directory_named_like_an_image_is_rejected() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("album.png");
        fs::create_dir(&sub).unwrap();
        assert!(!is_valid_image_path(&sub, &defaults()));
    }
}
