use std::path::Path;
use anyhow::{Result, Context};
use image::ImageReader;

/// Pixel size of an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Reads the image header and returns its size.
///
/// The format is sniffed from the content rather than trusted from the
/// extension, so a PNG saved as `.jpg` still probes fine while a text file
/// renamed to `.jpg` fails.
pub fn probe_dimensions(path: &Path) -> Result<Dimensions> {
    let reader = ImageReader::open(path)
        .with_context(|| format!("Failed to open image: {:?}", path))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read image header: {:?}", path))?;

    if reader.format().is_none() {
        anyhow::bail!("Unrecognized image format: {:?}", path);
    }

    let (width, height) = reader
        .into_dimensions()
        .with_context(|| format!("Failed to decode image: {:?}", path))?;

    Ok(Dimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_png_dimensions() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("sample.png");
        RgbImage::new(10, 20).save(&path)?;

        let dims = probe_dimensions(&path)?;
        assert_eq!(dims, Dimensions { width: 10, height: 20 });
        Ok(())
    }

    #[test]
    fn test_garbage_with_image_extension_fails() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"this is not a jpeg at all")?;

        assert!(probe_dimensions(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_truncated_png_header_fails() -> Result<()> {
        let dir = TempDir::new()?;
        let full = dir.path().join("full.png");
        RgbImage::new(4, 4).save(&full)?;
        let bytes = fs::read(&full)?;

        let truncated = dir.path().join("truncated.png");
        fs::write(&truncated, &bytes[..12])?;
        assert!(probe_dimensions(&truncated).is_err());
        Ok(())
    }
}
