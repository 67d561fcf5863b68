use crate::pad::model::{Color, CLASSIFIER_SIZE};
use crate::pad::raster::Raster;
use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, ImageEncoder, RgbaImage};

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Resamples `source` to `size`x`size` and flattens it over opaque white.
pub fn downsample(source: &Raster, size: u32) -> Result<Raster> {
    let image = RgbaImage::from_raw(source.width, source.height, source.pixels.clone())
        .ok_or_else(|| anyhow!("raster buffer does not match {}x{}", source.width, source.height))?;
    let resized = image::imageops::resize(&image, size, size, FilterType::Triangle);
    let mut output = Raster::from_pixels(size, size, resized.into_raw())
        .ok_or_else(|| anyhow!("resized buffer does not match {size}x{size}"))?;
    flatten_over(&mut output, Color::WHITE);
    Ok(output)
}

fn flatten_over(raster: &mut Raster, background: Color) {
    for px in raster.pixels.chunks_exact_mut(4) {
        let alpha = px[3] as u32;
        let blend = |src: u8, dst: u8| -> u8 {
            ((src as u32 * alpha + dst as u32 * (255 - alpha) + 127) / 255) as u8
        };
        px[0] = blend(px[0], background.r);
        px[1] = blend(px[1], background.g);
        px[2] = blend(px[2], background.b);
        px[3] = 255;
    }
}

pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(&raster.pixels, raster.width, raster.height, ColorType::Rgba8)
        .context("encode capture as png")?;
    Ok(bytes)
}

pub fn png_data_uri(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URI_PREFIX, general_purpose::STANDARD.encode(png))
}

/// Full capture pipeline: classifier-sized PNG wrapped as a data URI.
pub fn capture_payload(source: &Raster) -> Result<String> {
    let small = downsample(source, CLASSIFIER_SIZE)?;
    let png = encode_png(&small)?;
    Ok(png_data_uri(&png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pad::model::Point;

    fn decode_uri(uri: &str) -> image::DynamicImage {
        let encoded = uri.strip_prefix(PNG_DATA_URI_PREFIX).expect("png data uri");
        let bytes = general_purpose::STANDARD.decode(encoded).expect("base64");
        image::load_from_memory(&bytes).expect("decodable png")
    }

    #[test]
    fn payload_decodes_to_classifier_resolution() {
        for (w, h) in [(280, 280), (100, 40), (28, 28), (7, 300)] {
            let raster = Raster::new(w, h, Color::WHITE);
            let decoded = decode_uri(&capture_payload(&raster).expect("payload"));
            assert_eq!((decoded.width(), decoded.height()), (28, 28));
        }
    }

    #[test]
    fn transparent_regions_become_white() {
        let raster = Raster::new(56, 56, Color::rgba(0, 0, 0, 0));
        let small = downsample(&raster, 28).expect("downsample");
        assert!(small.is_uniform(Color::WHITE));
    }

    #[test]
    fn ink_survives_downsampling() {
        let mut raster = Raster::new(280, 280, Color::WHITE);
        raster.draw_segment(Point::new(140.0, 40.0), Point::new(140.0, 240.0), Color::BLACK, 20);
        let small = downsample(&raster, 28).expect("downsample");
        assert!(small.pixel(14, 14).r < 64);
        assert_eq!(small.pixel(2, 2), Color::WHITE);
    }
}
