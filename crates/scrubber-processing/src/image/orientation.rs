use exif::{In, Reader, Tag};
use image::{imageops, DynamicImage};
use std::io::Cursor;

/// Image orientation operations (rotation and flipping)
pub struct ImageOrientation;

impl ImageOrientation {
    /// Rotate/flip decoded pixels the way a browser honours the EXIF `Orientation` tag.
    pub fn apply_exif_orientation(mut img: DynamicImage, data: &[u8]) -> DynamicImage {
        let orientation = Self::read_exif_orientation(data);
        let (rotate, flip_h) = Self::orientation_transforms(orientation);

        if orientation != 1 {
            tracing::debug!(
                orientation = orientation,
                rotate = ?rotate,
                flip_horizontal = flip_h,
                "Applying EXIF orientation"
            );
        }

        // Rotate first, then mirror
        if let Some(angle) = rotate {
            img = Self::rotate_by_angle(img, angle);
        }
        if flip_h {
            img = DynamicImage::ImageRgba8(imageops::flip_horizontal(&img.to_rgba8()));
        }

        img
    }

    /// Orientation value (1-8), or 1 when the tag is absent or unreadable.
    pub fn read_exif_orientation(data: &[u8]) -> u8 {
        let mut cursor = Cursor::new(data);
        Reader::new()
            .read_from_container(&mut cursor)
            .ok()
            .and_then(|exif| {
                exif.get_field(Tag::Orientation, In::PRIMARY)
                    .and_then(|field| field.value.get_uint(0))
            })
            .and_then(|value| u8::try_from(value).ok())
            .filter(|value| (1..=8).contains(value))
            .unwrap_or(1)
    }

    /// Clockwise rotation and horizontal mirror for an orientation value.
    pub fn orientation_transforms(orientation: u8) -> (Option<u16>, bool) {
        match orientation {
            2 => (None, true),
            3 => (Some(180), false),
            4 => (Some(180), true),
            5 => (Some(90), true),
            6 => (Some(90), false),
            7 => (Some(270), true),
            8 => (Some(270), false),
            _ => (None, false),
        }
    }

    /// Rotate image by specified angle (90, 180, or 270 degrees clockwise)
    pub fn rotate_by_angle(img: DynamicImage, angle: u16) -> DynamicImage {
        match angle {
            90 => DynamicImage::ImageRgba8(imageops::rotate90(&img.to_rgba8())),
            180 => DynamicImage::ImageRgba8(imageops::rotate180(&img.to_rgba8())),
            270 => DynamicImage::ImageRgba8(imageops::rotate270(&img.to_rgba8())),
            _ => img,
        }
    }
}
