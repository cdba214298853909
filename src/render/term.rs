use std::io::{self, Write};

use plotters::prelude::*;
use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};
use yansi::Color;

use crate::chart::{Chart, ChartBody};
use crate::error::ChartError;
use crate::render::draw::{draw_chart, palette_rgb, TEXT_LAYOUT};
use crate::render::ChartWriter;

/// Columns of the text grid charts are drawn on.
pub const TERM_WIDTH: usize = 100;
/// Rows of the text grid charts are drawn on.
pub const TERM_HEIGHT: usize = 40;

const SERIES_GLYPHS: &[char] = &['●', '+', '~', 'o', 'x', '#'];
const SLICE_GLYPHS: &[char] = &['#', '%', '@', '=', '+', ':', 'o', '*', 'x', '$', '&', '~'];
const WHITE_RGB: (u8, u8, u8) = (255, 255, 255);
const BLACK_RGB: (u8, u8, u8) = (0, 0, 0);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Option<(u8, u8, u8)>,
}

const EMPTY: Cell = Cell {
    glyph: ' ',
    color: None,
};

/// A fixed size grid of characters.
#[derive(Debug)]
pub(crate) struct TextCanvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl TextCanvas {
    pub(crate) fn new(width: usize, height: usize) -> TextCanvas {
        TextCanvas {
            width,
            height,
            cells: vec![EMPTY; width * height],
        }
    }

    fn put(&mut self, (x, y): BackendCoord, cell: Cell) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.cells[y as usize * self.width + x as usize] = cell;
    }

    /// Text block with one line per row (every line being exactly as wide as
    /// the canvas), painted with the cell colors.
    pub(crate) fn render(&self) -> String {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|cell| match cell.color {
                        Some((r, g, b)) => Color::RGB(r, g, b).paint(cell.glyph).to_string(),
                        None => cell.glyph.to_string(),
                    })
                    .collect::<String>()
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

/// A plotters backend where every pixel is a character cell.
///
/// Colors are mapped back to glyphs: white clears a cell, black is used for
/// axes and frames, and every other color is looked up in `glyphs`.
pub(crate) struct TextBackend<'a> {
    canvas: &'a mut TextCanvas,
    glyphs: &'a [((u8, u8, u8), char)],
}

impl<'a> TextBackend<'a> {
    pub(crate) fn new(canvas: &'a mut TextCanvas, glyphs: &'a [((u8, u8, u8), char)]) -> Self {
        TextBackend { canvas, glyphs }
    }

    fn cell_for(&self, rgb: (u8, u8, u8)) -> Cell {
        match rgb {
            WHITE_RGB => EMPTY,
            BLACK_RGB => Cell {
                glyph: '.',
                color: None,
            },
            _ => match self.glyphs.iter().find(|(color, _)| *color == rgb) {
                Some((color, glyph)) => Cell {
                    glyph: *glyph,
                    color: Some(*color),
                },
                None => Cell {
                    glyph: '.',
                    color: None,
                },
            },
        }
    }
}

impl<'a> DrawingBackend for TextBackend<'a> {
    type ErrorType = io::Error;

    fn get_size(&self) -> (u32, u32) {
        (self.canvas.width as u32, self.canvas.height as u32)
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        Ok(())
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if color.alpha > 0.3 {
            let cell = self.cell_for(color.rgb);
            self.canvas.put(point, cell);
        }
        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let color = style.color();
        if color.alpha <= 0.3 {
            return Ok(());
        }
        let mut cell = self.cell_for(color.rgb);
        if color.rgb == BLACK_RGB {
            if from.0 == to.0 {
                cell.glyph = '|';
            } else if from.1 == to.1 {
                cell.glyph = '-';
            }
        }
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).max(1);
        for step in 0..=steps {
            let x = from.0 + (dx * step + steps / 2 * dx.signum()) / steps;
            let y = from.1 + (dy * step + steps / 2 * dy.signum()) / steps;
            self.canvas.put((x, y), cell);
        }
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let len = text.chars().count() as i32;
        let vertical = matches!(
            style.transform(),
            FontTransform::Rotate90 | FontTransform::Rotate270
        );
        let anchor = style.anchor();
        let offset = match anchor.h_pos {
            HPos::Left => 0,
            HPos::Center => -len / 2,
            HPos::Right => -len,
        };
        let shift = match anchor.v_pos {
            VPos::Top | VPos::Center => 0,
            VPos::Bottom => -1,
        };
        for (i, glyph) in (0..).zip(text.chars()) {
            let coord = if vertical {
                (pos.0 + shift, pos.1 + offset + i)
            } else {
                (pos.0 + offset + i, pos.1 + shift)
            };
            self.canvas.put(coord, Cell { glyph, color: None });
        }
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<io::Error>> {
        let len = text.chars().count() as u32;
        match style.transform() {
            FontTransform::Rotate90 | FontTransform::Rotate270 => Ok((1, len)),
            _ => Ok((len, 1)),
        }
    }
}

/// Glyph for every color a chart will be drawn with.
fn glyphs(chart: &Chart) -> Vec<((u8, u8, u8), char)> {
    match chart.body() {
        ChartBody::TimeSeries(data) => data
            .series
            .iter()
            .zip(SERIES_GLYPHS.iter().cycle())
            .map(|(series, glyph)| (palette_rgb(series.style.palette), *glyph))
            .collect(),
        ChartBody::Pie(data) => (0..data.buckets.len())
            .zip(SLICE_GLYPHS.iter().cycle())
            .map(|(index, glyph)| (palette_rgb(index), *glyph))
            .collect(),
    }
}

/// Draws `chart` on a text grid of `TERM_WIDTH` x `TERM_HEIGHT` characters.
pub fn render_text(chart: &Chart) -> Result<String, ChartError> {
    let glyphs = glyphs(chart);
    let mut canvas = TextCanvas::new(TERM_WIDTH, TERM_HEIGHT);
    {
        let root = TextBackend::new(&mut canvas, &glyphs).into_drawing_area();
        draw_chart(chart, &root, &TEXT_LAYOUT)
            .map_err(|e| ChartError::Drawing(format!("{:?}", e)))?;
        root.present()
            .map_err(|e| ChartError::Drawing(format!("{:?}", e)))?;
    }
    Ok(canvas.render())
}

/// Writes charts as text, one after another, separated by two blank lines.
pub struct TermWriter<W: Write> {
    out: W,
}

impl TermWriter<io::Stdout> {
    pub fn stdout() -> Self {
        TermWriter::new(io::stdout())
    }
}

impl<W: Write> TermWriter<W> {
    pub fn new(out: W) -> Self {
        TermWriter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartWriter for TermWriter<W> {
    fn write(&mut self, chart: &Chart) -> Result<(), ChartError> {
        let text = render_text(chart)?;
        write!(self.out, "{}\n\n\n", text)
            .and_then(|_| self.out.flush())
            .map_err(|e| ChartError::io("standard output", e))?;
        debug!("Chart '{}' written to terminal", chart.title());
        Ok(())
    }
}
