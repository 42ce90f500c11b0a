use std::fs::File;
use std::io::{Read, BufReader};
use std::path::Path;
use sha2::{Sha256, Digest};
use memmap2::MmapOptions;
use anyhow::{Result, Context};

const MMAP_THRESHOLD: u64 = 500 * 1024 * 1024; // 500 MB

/// Lowercase hex SHA-256 of the whole file.
pub fn content_digest(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let len = file
        .metadata()
        .with_context(|| format!("Failed to read metadata: {:?}", path))?
        .len();

    if len > MMAP_THRESHOLD {
        // The file is only read; a concurrent truncation would SIGBUS, which we accept.
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        return Ok(hex::encode(Sha256::digest(&mmap[..])));
    }

    digest_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read file: {:?}", path))
}

fn digest_reader<R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];
    loop {
        let count = reader.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_known_digest() -> Result<()> {
        let digest = digest_reader(&b"abc"[..])?;
        assert_eq!(digest, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        Ok(())
    }

    #[test]
    fn test_identical_content_same_digest() -> Result<()> {
        let dir = TempDir::new()?;
        let a = dir.path().join("a.png");
        let b = dir.path().join("copy_of_a.png");
        let c = dir.path().join("c.png");
        let payload = vec![7u8; 20_000];
        fs::write(&a, &payload)?;
        fs::write(&b, &payload)?;
        fs::write(&c, b"different")?;

        assert_eq!(content_digest(&a)?, content_digest(&b)?);
        assert_ne!(content_digest(&a)?, content_digest(&c)?);
        Ok(())
    }

    #[test]
    fn test_errors_name_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.png");
        let message = format!("{:#}", content_digest(&path).unwrap_err());
        assert!(message.contains("nope.png"), "{}", message);
    }
}
