use std::path::Path;

use crate::error::AssetError;

/// Pixel format of a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8,
    Rgb8,
}

impl TextureFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            TextureFormat::Rgba8 => 4,
            TextureFormat::Rgb8 => 3,
        }
    }
}

/// A loaded texture asset with raw pixel data.
#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: TextureFormat,
}

/// Decode an encoded image (PNG, JPEG, ...). Images without an alpha channel
/// stay RGB8; everything else is expanded to RGBA8.
pub fn decode_texture(bytes: &[u8], path: &Path) -> Result<TextureAsset, AssetError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| AssetError::ImageLoadFailed(path.to_path_buf(), e.to_string()))?;

    let (width, height) = (img.width(), img.height());
    let (data, format) = if img.color().has_alpha() {
        (img.to_rgba8().into_raw(), TextureFormat::Rgba8)
    } else {
        (img.to_rgb8().into_raw(), TextureFormat::Rgb8)
    };

    Ok(TextureAsset {
        width,
        height,
        data,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(img: image::DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_rgba_png() {
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 40]));
        let bytes = encode_png(image::DynamicImage::ImageRgba8(img));
        let tex = decode_texture(&bytes, Path::new("mem.png")).unwrap();
        assert_eq!((tex.width, tex.height), (2, 3));
        assert_eq!(tex.format, TextureFormat::Rgba8);
        assert_eq!(tex.data.len(), 2 * 3 * tex.format.bytes_per_pixel());
        assert_eq!(&tex.data[..4], &[10, 20, 30, 40]);
    }

    #[test]
    fn rgb_png_stays_rgb() {
        let img = image::RgbImage::from_pixel(1, 1, image::Rgb([1, 2, 3]));
        let bytes = encode_png(image::DynamicImage::ImageRgb8(img));
        let tex = decode_texture(&bytes, Path::new("mem.png")).unwrap();
        assert_eq!(tex.format, TextureFormat::Rgb8);
        assert_eq!(tex.data, vec![1, 2, 3]);
    }

    #[test]
    fn garbage_bytes_fail() {
        let result = decode_texture(b"not an image", Path::new("bad.png"));
        assert!(matches!(result, Err(AssetError::ImageLoadFailed(_, _))));
    }
}
