use anyhow::{Context, Result};
use image_hasher::{HashAlg, HasherConfig, ImageHash};

/// Hamming distance at or below which two photos count as the same shot.
const DUPLICATE_THRESHOLD: u32 = 4;

/// Perceptual hash of an uploaded photo, used to flag re-uploads of the same
/// shot. Accepts any format the `image` crate can sniff.
pub fn compute_phash(bytes: &[u8]) -> Result<String> {
    let img = image::load_from_memory(bytes).context("failed to decode image for hashing")?;
    let hasher = HasherConfig::new()
        .hash_alg(HashAlg::DoubleGradient)
        .hash_size(8, 8)
        .to_hasher();

    Ok(hasher.hash_image(&img).to_base64())
}

pub fn is_duplicate(lhs: &str, rhs: &str) -> bool {
    hamming_distance(lhs, rhs) <= DUPLICATE_THRESHOLD
}

fn hamming_distance(lhs: &str, rhs: &str) -> u32 {
    let Ok(h1) = ImageHash::<Vec<u8>>::from_base64(lhs) else {
        return u32::MAX;
    };
    let Ok(h2) = ImageHash::<Vec<u8>>::from_base64(rhs) else {
        return u32::MAX;
    };
    h1.dist(&h2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(image: RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn identical_images_hash_identically() {
        let image = RgbImage::from_fn(32, 32, |x, y| image::Rgb([(x * 8) as u8, (y * 8) as u8, 0]));
        let a = compute_phash(&png_bytes(image.clone())).unwrap();
        let b = compute_phash(&png_bytes(image)).unwrap();

        assert_eq!(a, b);
        assert!(is_duplicate(&a, &b));
    }

    #[test]
    fn unparseable_hashes_never_match() {
        assert!(!is_duplicate("???", "???"));
    }

    #[test]
    fn rejects_bytes_that_are_not_an_image() {
        assert!(compute_phash(b"definitely not an image").is_err());
    }
}
