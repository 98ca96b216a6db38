use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, Pixel, Rgba, RgbaImage};
use sketchboard_core::DataUrl;

use crate::error::CanvasError;
use crate::pointer::Point;

/// An RGBA bitmap that strokes are rendered onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = color;
        }
    }

    pub(crate) fn replace(&mut self, pixels: RgbaImage) {
        self.pixels = pixels;
    }

    /// Fills with `background`, then draws `image` at the origin. Parts of
    /// `image` beyond the surface are cropped.
    pub fn draw_image(&mut self, image: &RgbaImage, background: Rgba<u8>) {
        self.fill(background);
        for (x, y, source) in image.enumerate_pixels() {
            let Some(target) = self.pixels.get_pixel_mut_checked(x, y) else {
                continue;
            };
            match source[3] {
                0 => {}
                0xff => *target = *source,
                _ => target.blend(source),
            }
        }
    }

    /// Renders the segment between `from` and `to` with round caps, so consecutive
    /// segments of one stroke join smoothly.
    pub fn stroke_segment(&mut self, from: Point, to: Point, width: u32, color: Rgba<u8>) {
        let radius = (width.max(1) as f32) / 2.0;
        let (surface_w, surface_h) = (self.width(), self.height());
        if surface_w == 0 || surface_h == 0 {
            return;
        }

        let min_x = (from.x.min(to.x) - radius).floor().max(0.0) as u32;
        let min_y = (from.y.min(to.y) - radius).floor().max(0.0) as u32;
        let max_x = ((from.x.max(to.x) + radius).ceil().max(0.0) as u32).min(surface_w - 1);
        let max_y = ((from.y.max(to.y) + radius).ceil().max(0.0) as u32).min(surface_h - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_to_segment(center, from, to) <= radius {
                    self.pixels.put_pixel(x, y, color);
                }
            }
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, CanvasError> {
        let mut bytes = Vec::new();
        self.pixels
            .write_with_encoder(PngEncoder::new(&mut bytes))
            .map_err(CanvasError::Encode)?;
        Ok(bytes)
    }

    /// JPEG has no alpha channel; the surface is flattened to RGB first.
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, CanvasError> {
        let rgb = DynamicImage::ImageRgba8(self.pixels.clone()).to_rgb8();
        let mut bytes = Vec::new();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))
            .map_err(CanvasError::Encode)?;
        Ok(bytes)
    }
}

/// Decodes a data URL holding any supported raster format into RGBA pixels.
pub fn decode_data_url(data_url: &str) -> Result<RgbaImage, CanvasError> {
    let decoded = DataUrl::parse(data_url)?;
    let image = image::load_from_memory(decoded.bytes()).map_err(CanvasError::Decode)?;
    Ok(image.to_rgba8())
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0)
    };
    let (nearest_x, nearest_y) = (a.x + t * dx, a.y + t * dy);
    ((p.x - nearest_x).powi(2) + (p.y - nearest_y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::BACKGROUND;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn horizontal_stroke_covers_its_width() {
        let mut surface = Surface::new(20, 20, BACKGROUND);
        surface.stroke_segment(Point::new(2.0, 10.0), Point::new(17.0, 10.0), 4, RED);

        assert_eq!(surface.pixel(10, 8), Some(RED));
        assert_eq!(surface.pixel(10, 11), Some(RED));
        assert_eq!(surface.pixel(10, 5), Some(BACKGROUND));
        assert_eq!(surface.pixel(10, 14), Some(BACKGROUND));
    }

    #[test]
    fn stroke_partially_outside_is_clipped() {
        let mut surface = Surface::new(10, 10, BACKGROUND);
        surface.stroke_segment(Point::new(-5.0, -5.0), Point::new(30.0, 30.0), 2, RED);

        assert_eq!(surface.pixel(0, 0), Some(RED));
        assert_eq!(surface.pixel(9, 9), Some(RED));
        assert_eq!(surface.pixel(9, 0), Some(BACKGROUND));
    }

    #[test]
    fn draw_image_replaces_contents_from_origin() {
        let mut surface = Surface::new(4, 4, BACKGROUND);
        surface.fill(RED);
        let image = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));

        surface.draw_image(&image, BACKGROUND);

        assert_eq!(surface.pixel(1, 1), Some(Rgba([0, 0, 255, 255])));
        assert_eq!(surface.pixel(3, 3), Some(BACKGROUND));
    }

    #[test]
    fn png_encoding_is_lossless() {
        let mut surface = Surface::new(16, 8, BACKGROUND);
        surface.stroke_segment(Point::new(1.0, 1.0), Point::new(14.0, 6.0), 3, RED);

        let bytes = surface.encode_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();

        assert_eq!(&decoded, surface.pixels());
    }

    #[test]
    fn jpeg_encoding_produces_jpeg() {
        let surface = Surface::new(16, 8, BACKGROUND);
        let bytes = surface.encode_jpeg(30).unwrap();
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);
    }
}
