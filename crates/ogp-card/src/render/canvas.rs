//! Drawing contexts.
//!
//! [`DrawingContext`] is the only thing the line breaker and the composer
//! know about the canvas: measure a string, draw a string. [`SvgCanvas`] is
//! the real implementation.
//!
//! Text goes through an XML document on its way to resvg, so characters XML
//! 1.0 cannot carry (most C0 controls, U+FFFE, U+FFFF) are drawn and
//! measured as U+FFFD. Layout lines keep the original text.

use std::fmt::Write as _;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;
use ttf_parser::{Face, GlyphId};

use super::RenderedImage;
use super::assets::Assets;
use crate::error::OgpError;

/// Card font size in pixels.
pub const FONT_SIZE: f32 = 20.0;

/// Card text color.
pub const TEXT_COLOR: &str = "#424242";

/// Text measurement and drawing.
///
/// `fill_text` draws `text` horizontally centered on `x` with its middle on
/// `y`.
pub trait DrawingContext {
    /// Rendered width of `text` in pixels.
    fn measure_text(&self, text: &str) -> f32;

    fn fill_text(&mut self, text: &str, x: f32, y: f32);
}

/// A text draw queued on an [`SvgCanvas`].
#[derive(Debug, Clone, PartialEq)]
struct TextRun {
    text: String,
    x: f32,
    y: f32,
}

/// Canvas that measures with the card font and rasterizes with resvg.
///
/// Draws are queued and painted over a copy of the background in
/// [`SvgCanvas::finish`].
pub struct SvgCanvas<'a> {
    assets: &'a Assets,
    face: Face<'a>,
    scale: f32,
    runs: Vec<TextRun>,
}

impl<'a> SvgCanvas<'a> {
    /// Start a fresh canvas for one render.
    pub fn new(assets: &'a Assets) -> Result<Self, OgpError> {
        let face = Face::parse(assets.font_data(), 0)
            .map_err(|e| OgpError::Render(format!("font parse error: {e}")))?;
        let scale = FONT_SIZE / f32::from(face.units_per_em());

        Ok(Self {
            assets,
            face,
            scale,
            runs: Vec::new(),
        })
    }

    /// Paint the queued text over the background and encode a PNG.
    pub fn finish(self) -> Result<RenderedImage, OgpError> {
        let mut pixmap: Pixmap = self.assets.background().clone();

        if !self.runs.is_empty() {
            let svg = self.to_svg()?;

            let options = usvg::Options {
                fontdb: self.assets.fontdb(),
                font_family: self.assets.family().to_string(),
                ..usvg::Options::default()
            };

            let tree = usvg::Tree::from_str(&svg, &options)
                .map_err(|e| OgpError::Render(format!("SVG parse error: {e}")))?;
            resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
        }

        let bytes = pixmap
            .encode_png()
            .map_err(|e| OgpError::Render(format!("PNG encode error: {e}")))?;

        Ok(RenderedImage {
            bytes,
            width: pixmap.width(),
            height: pixmap.height(),
        })
    }

    /// Transparent SVG overlay holding every queued text run.
    fn to_svg(&self) -> Result<String, OgpError> {
        let width = self.assets.background().width();
        let height = self.assets.background().height();

        let mut svg = String::with_capacity(256 + self.runs.len() * 256);
        write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        )
        .map_err(fmt_error)?;

        let family = maud::html! { (self.assets.family()) }.into_string();
        for run in &self.runs {
            let drawn: String = run.text.chars().map(drawable).collect();
            let text = maud::html! { (drawn) }.into_string();
            write!(
                svg,
                r#"<text x="{x}" y="{y}" xml:space="preserve" text-anchor="middle" dominant-baseline="central" font-family="{family}" font-size="{FONT_SIZE}" fill="{TEXT_COLOR}">{text}</text>"#,
                x = run.x,
                y = run.y,
            )
            .map_err(fmt_error)?;
        }

        svg.push_str("</svg>");
        Ok(svg)
    }
}

impl DrawingContext for SvgCanvas<'_> {
    fn measure_text(&self, text: &str) -> f32 {
        let units: f32 = text
            .chars()
            .map(|ch| {
                let glyph = self.face.glyph_index(drawable(ch)).unwrap_or(GlyphId(0));
                f32::from(self.face.glyph_hor_advance(glyph).unwrap_or(0))
            })
            .sum();
        units * self.scale
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.runs.push(TextRun {
            text: text.to_string(),
            x,
            y,
        });
    }
}

/// `ch` if XML 1.0 allows it in character data, otherwise U+FFFD.
fn drawable(ch: char) -> char {
    match ch {
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'.. => ch,
        _ => char::REPLACEMENT_CHARACTER,
    }
}

fn fmt_error(err: std::fmt::Error) -> OgpError {
    OgpError::Render(format!("SVG build error: {err}"))
}

/// Context with fixed per-character widths that records every draw.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingContext {
    narrow: f32,
    wide: f32,
    /// Every `fill_text` call, in order.
    pub(crate) draws: Vec<(String, f32, f32)>,
}

#[cfg(test)]
impl RecordingContext {
    /// ASCII characters measure `narrow`, everything else `wide`, roughly
    /// like half-width and full-width glyphs.
    pub(crate) fn half_and_full_width(narrow: f32, wide: f32) -> Self {
        Self {
            narrow,
            wide,
            draws: Vec::new(),
        }
    }
}

#[cfg(test)]
impl DrawingContext for RecordingContext {
    fn measure_text(&self, text: &str) -> f32 {
        text.chars()
            .map(|ch| if ch.is_ascii() { self.narrow } else { self.wide })
            .sum()
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.draws.push((text.to_string(), x, y));
    }
}
