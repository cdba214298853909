use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::prelude::*;

use crate::chart::Chart;
use crate::error::ChartError;
use crate::render::draw::{draw_chart, RASTER_LAYOUT};
use crate::render::ChartWriter;

/// Directory where images are written by default.
pub const DATA_DIR: &str = "data";
/// Width, in pixels, of the images.
pub const IMAGE_WIDTH: u32 = 1024;
/// Height, in pixels, of the images.
pub const IMAGE_HEIGHT: u32 = 768;

/// Writes every chart as a PNG image named after the chart, inside a
/// directory (created if needed).  Existing files are overwritten.
#[derive(Debug)]
pub struct ImageWriter {
    dir: PathBuf,
}

impl ImageWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> ImageWriter {
        ImageWriter {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Where `chart` will be written.
    pub fn path_for(&self, chart: &Chart) -> PathBuf {
        self.dir.join(format!("{}.png", chart.name()))
    }
}

impl Default for ImageWriter {
    fn default() -> Self {
        ImageWriter::new(DATA_DIR)
    }
}

impl ChartWriter for ImageWriter {
    fn write(&mut self, chart: &Chart) -> Result<(), ChartError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| ChartError::io(self.dir.display().to_string(), e))?;
        let path = self.path_for(chart);

        let mut buffer = vec![0_u8; (IMAGE_WIDTH * IMAGE_HEIGHT * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (IMAGE_WIDTH, IMAGE_HEIGHT))
                .into_drawing_area();
            draw_chart(chart, &root, &RASTER_LAYOUT)
                .map_err(|e| ChartError::Drawing(format!("{:?}", e)))?;
            root.present()
                .map_err(|e| ChartError::Drawing(format!("{:?}", e)))?;
        }

        let file = File::create(&path).map_err(|e| ChartError::io(path.display().to_string(), e))?;
        let mut writer = BufWriter::new(file);
        PngEncoder::new(&mut writer).write_image(
            &buffer,
            IMAGE_WIDTH,
            IMAGE_HEIGHT,
            ColorType::Rgb8,
        )?;
        writer
            .flush()
            .map_err(|e| ChartError::io(path.display().to_string(), e))?;
        info!("Chart '{}' written to {}", chart.title(), path.display());
        Ok(())
    }
}
