//! Drawing surface for the creative module.
//!
//! `RasterCanvas` keeps an RGBA bitmap and stamps a round brush along each
//! stroke segment. Export is PNG, either as bytes, a data URL or a file.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Rgba, RgbaImage};
use maximus_shared::palette::{Color, DEFAULT_BRUSH_SIZE};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name used when saving artwork
pub const ARTWORK_FILE_NAME: &str = "maximus-art.png";

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write artwork: {0}")]
    Io(#[from] std::io::Error),
}

/// Canvas coordinate in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Anything the drawing module can paint on
pub trait DrawingSurface {
    fn begin_stroke(&mut self, at: Point);

    fn extend_stroke(&mut self, to: Point);

    /// Finish the current stroke. Returns false when no stroke was open.
    fn end_stroke(&mut self) -> bool;

    fn set_color(&mut self, color: Color);

    fn set_brush_size(&mut self, size: u32);

    /// Fill the whole surface with white
    fn clear(&mut self);

    fn export_png(&self) -> Result<Vec<u8>, CanvasError>;

    fn to_data_url(&self) -> Result<String, CanvasError> {
        let png = self.export_png()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }

    /// Write the artwork as `maximus-art.png` inside `dir`
    fn save_to_dir(&self, dir: &Path) -> Result<PathBuf, CanvasError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(ARTWORK_FILE_NAME);
        std::fs::write(&path, self.export_png()?)?;
        Ok(path)
    }
}

/// In-memory RGBA canvas
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    image: RgbaImage,
    color: Color,
    brush_size: u32,
    last_point: Option<Point>,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(Color::WHITE.rgba())),
            color: Color::default(),
            brush_size: DEFAULT_BRUSH_SIZE,
            last_point: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn is_drawing(&self) -> bool {
        self.last_point.is_some()
    }

    /// RGBA value at a pixel, `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// True when every pixel is white
    pub fn is_blank(&self) -> bool {
        let white = Color::WHITE.rgba();
        self.image.pixels().all(|p| p.0 == white)
    }

    fn stamp(&mut self, cx: f32, cy: f32) {
        let radius = (self.brush_size as f32 / 2.0).max(0.5);
        let (width, height) = (self.image.width() as i64, self.image.height() as i64);

        let min_x = ((cx - radius).floor() as i64).max(0);
        let max_x = ((cx + radius).ceil() as i64).min(width - 1);
        let min_y = ((cy - radius).floor() as i64).max(0);
        let max_y = ((cy + radius).ceil() as i64).min(height - 1);

        let paint = Rgba(self.color.rgba());
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.image.put_pixel(x as u32, y as u32, paint);
                }
            }
        }
    }

    fn line(&mut self, from: Point, to: Point) {
        let dx = (to.x - from.x) as f32;
        let dy = (to.y - from.y) as f32;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp(
                from.x as f32 + 0.5 + dx * t,
                from.y as f32 + 0.5 + dy * t,
            );
        }
    }
}

impl DrawingSurface for RasterCanvas {
    fn begin_stroke(&mut self, at: Point) {
        self.line(at, at);
        self.last_point = Some(at);
    }

    fn extend_stroke(&mut self, to: Point) {
        if let Some(from) = self.last_point {
            self.line(from, to);
            self.last_point = Some(to);
        }
    }

    fn end_stroke(&mut self) -> bool {
        self.last_point.take().is_some()
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size;
    }

    fn clear(&mut self) {
        let white = Rgba(Color::WHITE.rgba());
        for pixel in self.image.pixels_mut() {
            *pixel = white;
        }
        self.last_point = None;
    }

    fn export_png(&self) -> Result<Vec<u8>, CanvasError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}
