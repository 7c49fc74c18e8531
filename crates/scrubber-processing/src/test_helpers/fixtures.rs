//! In-memory image fixtures carrying real EXIF segments.
//!
//! Pixels come from `image`, the EXIF block from kamadak's experimental writer, and
//! `img-parts` splices the block into the encoded container.

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::{ImageFormat, Rgb, RgbImage};
use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::{Bytes, ImageEXIF};
use std::io::Cursor;

pub const CAMERA_MAKE: &str = "Canon";
pub const CAMERA_MODEL: &str = "Canon EOS R5";
pub const DATE_TIME_ORIGINAL: &str = "2024:05:01 10:30:00";
pub const LATITUDE: f64 = 40.7128;
pub const LONGITUDE: f64 = -74.0060;

/// Encoded pixels without any metadata segment.
pub fn plain_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

pub fn plain_png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

/// JPEG with camera tags and a New York GPS fix.
pub fn jpeg_with_exif(width: u32, height: u32) -> Vec<u8> {
    with_jpeg_exif(
        plain_jpeg(width, height),
        exif_block(true, Some((LATITUDE, LONGITUDE)), None),
    )
}

pub fn jpeg_with_camera_only(width: u32, height: u32) -> Vec<u8> {
    with_jpeg_exif(plain_jpeg(width, height), exif_block(true, None, None))
}

pub fn jpeg_with_gps(width: u32, height: u32, latitude: f64, longitude: f64) -> Vec<u8> {
    with_jpeg_exif(
        plain_jpeg(width, height),
        exif_block(false, Some((latitude, longitude)), None),
    )
}

pub fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    with_jpeg_exif(
        plain_jpeg(width, height),
        exif_block(true, None, Some(orientation)),
    )
}

/// PNG with camera tags and GPS in an `eXIf` chunk.
pub fn png_with_exif(width: u32, height: u32) -> Vec<u8> {
    let mut png = Png::from_bytes(Bytes::from(plain_png(width, height)))
        .expect("encoded PNG should parse");
    png.set_exif(Some(Bytes::from(exif_block(
        true,
        Some((LATITUDE, LONGITUDE)),
        None,
    ))));
    png.encoder().bytes().to_vec()
}

/// JPEG whose IFD0 holds a readable `Make` and a `Model` pointing past the end of the block.
pub fn jpeg_with_broken_field(width: u32, height: u32) -> Vec<u8> {
    let make = format!("{}\0", CAMERA_MAKE);
    // header (8) + entry count (2) + two entries (24) + next IFD offset (4)
    let data_offset: u32 = 38;

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\0\x2a");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&2u16.to_be_bytes());
    push_ascii_entry(&mut tiff, 0x010f, make.len() as u32, data_offset);
    push_ascii_entry(&mut tiff, 0x0110, 20, 0xffff);
    tiff.extend_from_slice(&0u32.to_be_bytes());
    tiff.extend_from_slice(make.as_bytes());

    with_jpeg_exif(plain_jpeg(width, height), tiff)
}

fn push_ascii_entry(tiff: &mut Vec<u8>, tag: u16, count: u32, offset: u32) {
    tiff.extend_from_slice(&tag.to_be_bytes());
    tiff.extend_from_slice(&2u16.to_be_bytes());
    tiff.extend_from_slice(&count.to_be_bytes());
    tiff.extend_from_slice(&offset.to_be_bytes());
}

/// JPEG whose APP1 segment announces EXIF but holds a broken TIFF header.
pub fn corrupt_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x10];
    data.extend_from_slice(b"Exif\0\0");
    data.extend_from_slice(b"garbage!");
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    });
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format)
        .expect("in-memory encode should succeed");
    buffer.into_inner()
}

fn with_jpeg_exif(data: Vec<u8>, exif: Vec<u8>) -> Vec<u8> {
    let mut jpeg = Jpeg::from_bytes(Bytes::from(data)).expect("encoded JPEG should parse");
    jpeg.set_exif(Some(Bytes::from(exif)));
    jpeg.encoder().bytes().to_vec()
}

fn exif_block(camera: bool, gps: Option<(f64, f64)>, orientation: Option<u16>) -> Vec<u8> {
    let mut fields = Vec::new();

    if camera {
        fields.push(ascii_field(Tag::Make, CAMERA_MAKE));
        fields.push(ascii_field(Tag::Model, CAMERA_MODEL));
        fields.push(ascii_field(Tag::DateTimeOriginal, DATE_TIME_ORIGINAL));
        fields.push(Field {
            tag: Tag::PhotographicSensitivity,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![200]),
        });
        fields.push(Field {
            tag: Tag::FNumber,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![Rational { num: 28, denom: 10 }]),
        });
    }

    if let Some(orientation) = orientation {
        fields.push(Field {
            tag: Tag::Orientation,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![orientation]),
        });
    }

    if let Some((latitude, longitude)) = gps {
        let lat_ref = if latitude < 0.0 { "S" } else { "N" };
        let lon_ref = if longitude < 0.0 { "W" } else { "E" };
        fields.push(ascii_field(Tag::GPSLatitudeRef, lat_ref));
        fields.push(Field {
            tag: Tag::GPSLatitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(to_dms(latitude)),
        });
        fields.push(ascii_field(Tag::GPSLongitudeRef, lon_ref));
        fields.push(Field {
            tag: Tag::GPSLongitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(to_dms(longitude)),
        });
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buffer = Cursor::new(Vec::new());
    writer
        .write(&mut buffer, false)
        .expect("EXIF block should serialize");
    buffer.into_inner()
}

fn ascii_field(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

fn to_dms(decimal: f64) -> Vec<Rational> {
    let abs = decimal.abs();
    let degrees = abs.trunc();
    let minutes_full = (abs - degrees) * 60.0;
    let minutes = minutes_full.trunc();
    let seconds = (minutes_full - minutes) * 60.0;
    vec![
        Rational {
            num: degrees as u32,
            denom: 1,
        },
        Rational {
            num: minutes as u32,
            denom: 1,
        },
        Rational {
            num: (seconds * 10_000.0).round() as u32,
            denom: 10_000,
        },
    ]
}
