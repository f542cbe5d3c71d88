// Where source photos come from: a file on disk, or whatever bitmap is on the clipboard.
// Either way the editor gets an RGBA buffer at the photo's native resolution.

use std::path::Path;

use image::RgbaImage;

use crate::error::Error;

/// Decode any format the `image` crate understands.
pub fn load_from_file(path: &Path) -> Result<RgbaImage, Error> {
    log::info!("Opening {}", path.display());
    let img = image::open(path)
        .map_err(|e| Error::ImageLoad(format!("{}: {e}", path.display())))?;
    Ok(img.to_rgba8())
}

/// Grab the clipboard bitmap. arboard hands it over as tightly packed RGBA rows.
pub fn paste_from_clipboard() -> Result<RgbaImage, Error> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
    let data = clipboard
        .get_image()
        .map_err(|e| Error::Clipboard(format!("no image on the clipboard: {e}")))?;
    log::info!("Pasted {}x{} image from the clipboard", data.width, data.height);
    rgba_from_raw(data.width, data.height, data.bytes.into_owned())
}

/// Wrap raw RGBA bytes, checking the length matches the claimed size.
pub fn rgba_from_raw(width: usize, height: usize, bytes: Vec<u8>) -> Result<RgbaImage, Error> {
    let w = u32::try_from(width).map_err(|_| Error::Clipboard("image too wide".into()))?;
    let h = u32::try_from(height).map_err(|_| Error::Clipboard("image too tall".into()))?;
    let len = bytes.len();
    RgbaImage::from_raw(w, h, bytes).ok_or_else(|| {
        Error::Clipboard(format!("{len} bytes do not make a {width}x{height} RGBA image"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn raw_rgba_must_match_size() {
        assert!(rgba_from_raw(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(rgba_from_raw(2, 2, vec![0; 15]), Err(Error::Clipboard(_))));
    }

    #[test]
    fn decodes_png_at_native_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.png");
        let mut img = RgbaImage::new(7, 3);
        img.put_pixel(6, 2, Rgba([1, 2, 3, 255]));
        img.save(&path).unwrap();

        let back = load_from_file(&path).unwrap();
        assert_eq!(back.dimensions(), (7, 3));
        assert_eq!(back.get_pixel(6, 2), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn garbage_is_an_image_load_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(load_from_file(&path), Err(Error::ImageLoad(_))));
    }

    #[test]
    fn missing_file_is_an_image_load_error() {
        let err = load_from_file(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, Error::ImageLoad(_)));
    }
}
