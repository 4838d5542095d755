//! Card image composition.
//!
//! A card is the background template with the body text wrapped to
//! [`MAX_LINE_WIDTH`](crate::layout::MAX_LINE_WIDTH) and centered as a block
//! around a fixed anchor. Composition only talks to a [`DrawingContext`], so
//! placement can be checked without rasterizing anything.

pub mod assets;
pub mod canvas;

use crate::error::OgpError;
use crate::layout::{self, RenderPlan};
use crate::resolve::TextContent;

use self::assets::Assets;
use self::canvas::{DrawingContext, SvgCanvas};

/// An encoded card image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// PNG bytes.
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RenderedImage {
    pub const CONTENT_TYPE: &'static str = "image/png";
}

/// Draw every planned line at its anchored position.
///
/// A plan with no lines draws nothing.
pub fn compose<C: DrawingContext + ?Sized>(ctx: &mut C, plan: &RenderPlan) {
    for (line, x, y) in plan.positioned() {
        ctx.fill_text(&line.text, x, y);
    }
}

/// Render the card for `content`.
///
/// CPU-bound; call from a blocking context.
pub fn render_card(assets: &Assets, content: &TextContent) -> Result<RenderedImage, OgpError> {
    let mut canvas = SvgCanvas::new(assets)?;

    let lines = layout::break_lines(&canvas, &content.body, layout::MAX_LINE_WIDTH);
    let plan = RenderPlan::new(lines);
    tracing::debug!(id = %content.id, lines = plan.lines.len(), "card laid out");

    compose(&mut canvas, &plan);
    canvas.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ANCHOR_X, ANCHOR_Y, LINE_HEIGHT, break_lines};
    use crate::test_support;
    use super::canvas::RecordingContext;

    fn content(body: &str) -> TextContent {
        TextContent {
            id: "q1".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn compose_short_text_on_anchor() {
        let mut ctx = RecordingContext::half_and_full_width(10.0, 20.0);
        let plan = RenderPlan::new(break_lines(&ctx, "こんにちは", 400.0));
        compose(&mut ctx, &plan);
        assert_eq!(
            ctx.draws,
            vec![("こんにちは".to_string(), ANCHOR_X, ANCHOR_Y)]
        );
    }

    #[test]
    fn compose_three_lines_symmetric() {
        let mut ctx = RecordingContext::half_and_full_width(10.0, 20.0);
        let body = "吾輩は猫である。名前はまだ無い。どこで生れたかとんと見当がつかぬ。何でも薄暗いじめじめした所で";
        let plan = RenderPlan::new(break_lines(&ctx, body, 400.0));
        compose(&mut ctx, &plan);

        assert_eq!(ctx.draws.len(), 3);
        let ys: Vec<f32> = ctx.draws.iter().map(|(_, _, y)| *y).collect();
        assert_eq!(
            ys,
            vec![ANCHOR_Y - LINE_HEIGHT, ANCHOR_Y, ANCHOR_Y + LINE_HEIGHT]
        );
        let joined: String = ctx.draws.iter().map(|(t, _, _)| t.as_str()).collect();
        assert_eq!(joined, body);
    }

    #[test]
    fn compose_empty_plan_draws_nothing() {
        let mut ctx = RecordingContext::default();
        compose(&mut ctx, &RenderPlan::new(Vec::new()));
        assert!(ctx.draws.is_empty());
    }

    #[test]
    fn render_empty_body_is_background_only() {
        let assets = test_support::assets();
        let image = render_card(assets, &content("")).unwrap();
        assert_eq!(image.bytes, assets.background().encode_png().unwrap());
        assert_eq!((image.width, image.height), (600, 315));
    }

    #[test]
    fn render_is_deterministic() {
        let assets = test_support::assets();
        let body = "Deterministic output for the same text, every single time.";
        let first = render_card(assets, &content(body)).unwrap();
        let second = render_card(assets, &content(body)).unwrap();
        assert_eq!(first, second);
        assert!(first.bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn render_differs_by_text() {
        let assets = test_support::assets();
        let a = render_card(assets, &content("first")).unwrap();
        let b = render_card(assets, &content("second")).unwrap();
        assert_ne!(a.bytes, b.bytes);
    }

    #[test]
    fn render_control_characters_succeeds() {
        let assets = test_support::assets();
        for body in ["line\u{0B}tab", "bell\u{07}", "nul\0byte", "\u{FFFF}\u{1B}[0m"] {
            let image = render_card(assets, &content(body)).unwrap();
            assert!(image.bytes.starts_with(b"\x89PNG"), "{body:?}");
            assert_eq!((image.width, image.height), (600, 315));
        }
    }

    #[test]
    fn real_font_lines_respect_width_bound() {
        let assets = test_support::assets();
        let canvas = SvgCanvas::new(assets).unwrap();
        let body = "The quick brown fox jumps over the lazy dog. ".repeat(6);
        let lines = break_lines(&canvas, &body, layout::MAX_LINE_WIDTH);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(canvas.measure_text(&line.text) <= layout::MAX_LINE_WIDTH);
        }
        let joined: String = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(joined, body);
    }
}
