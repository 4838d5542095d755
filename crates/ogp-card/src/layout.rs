//! Line breaking and vertical placement.
//!
//! Card text is often Japanese, which has no spaces to break on, and mixes
//! half-width and full-width glyphs. Lines are therefore filled greedily one
//! character at a time, measuring the rendered width of the whole candidate
//! line with the card font rather than counting characters.
//!
//! Each line restarts measurement from its first character, so finding one
//! line boundary costs O(n²) glyph lookups in the line length. Card bodies are
//! a few hundred characters at most; if that changes, keep a running width
//! per prefix or binary-search the longest fitting prefix instead.

use crate::render::canvas::DrawingContext;

/// Maximum rendered width of one line, in pixels.
pub const MAX_LINE_WIDTH: f32 = 400.0;

/// Distance between consecutive line centers, in pixels.
pub const LINE_HEIGHT: f32 = 40.0;

/// Horizontal center of every line.
pub const ANCHOR_X: f32 = 300.0;

/// Vertical center of the text block.
pub const ANCHOR_Y: f32 = 157.0;

/// One wrapped line of card text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutLine {
    pub text: String,
    /// Position in the block, top to bottom.
    pub index: usize,
}

/// Everything needed to place lines on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub lines: Vec<LayoutLine>,
    pub line_height: f32,
    pub anchor_x: f32,
    pub anchor_y: f32,
}

impl RenderPlan {
    /// Plan with the card's fixed anchors and line height.
    pub fn new(lines: Vec<LayoutLine>) -> Self {
        Self {
            lines,
            line_height: LINE_HEIGHT,
            anchor_x: ANCHOR_X,
            anchor_y: ANCHOR_Y,
        }
    }

    /// Vertical center of line `index`.
    ///
    /// The block of `N` lines is symmetric around `anchor_y`:
    /// `y = anchor_y + line_height * (index - (N - 1) / 2)`.
    pub fn line_y(&self, index: usize) -> f32 {
        let count = self.lines.len() as f32;
        self.anchor_y + self.line_height * (index as f32 - (count - 1.0) / 2.0)
    }

    /// Lines with their draw positions, in index order.
    pub fn positioned(&self) -> impl Iterator<Item = (&LayoutLine, f32, f32)> + '_ {
        self.lines
            .iter()
            .map(|line| (line, self.anchor_x, self.line_y(line.index)))
    }

    /// Concatenation of all line texts.
    pub fn text(&self) -> String {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }
}

/// Break `body` into lines no wider than `max_width` as measured by `ctx`.
///
/// Concatenating the returned lines gives back `body` exactly. A character
/// that is wider than `max_width` on its own becomes a one-character line.
/// An empty body yields no lines.
pub fn break_lines<C: DrawingContext + ?Sized>(
    ctx: &C,
    body: &str,
    max_width: f32,
) -> Vec<LayoutLine> {
    let mut lines = Vec::new();
    let mut rest = body;

    while !rest.is_empty() {
        let (line, tail) = rest.split_at(fitting_prefix_len(ctx, rest, max_width));
        lines.push(LayoutLine {
            text: line.to_string(),
            index: lines.len(),
        });
        rest = tail;
    }

    lines
}

/// Byte length of the longest prefix of `text` that fits, never less than one
/// character. `text` must be non-empty.
fn fitting_prefix_len<C: DrawingContext + ?Sized>(ctx: &C, text: &str, max_width: f32) -> usize {
    let mut end = 0;

    for (offset, ch) in text.char_indices() {
        let candidate = offset + ch.len_utf8();
        if ctx.measure_text(&text[..candidate]) > max_width {
            break;
        }
        end = candidate;
    }

    if end == 0 {
        // Overflowing first character: it still gets its own line.
        text.chars().next().map_or(text.len(), char::len_utf8)
    } else {
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::RecordingContext;

    /// 10px for ASCII, 20px for everything else.
    fn ctx() -> RecordingContext {
        RecordingContext::half_and_full_width(10.0, 20.0)
    }

    fn texts(lines: &[LayoutLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    fn assert_round_trip(body: &str, max_width: f32) {
        let ctx = ctx();
        let lines = break_lines(&ctx, body, max_width);
        let joined: String = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(joined, body, "round trip failed at width {max_width}");

        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.index, i);
            let width = ctx.measure_text(&line.text);
            assert!(
                width <= max_width || line.text.chars().count() == 1,
                "line {:?} is {width}px wide, limit {max_width}",
                line.text
            );
        }
    }

    #[test]
    fn empty_body_has_no_lines() {
        assert!(break_lines(&ctx(), "", MAX_LINE_WIDTH).is_empty());
    }

    #[test]
    fn short_text_fits_one_line() {
        let lines = break_lines(&ctx(), "こんにちは", MAX_LINE_WIDTH);
        assert_eq!(
            lines,
            vec![LayoutLine {
                text: "こんにちは".to_string(),
                index: 0,
            }]
        );
    }

    #[test]
    fn exact_fit_stays_on_one_line() {
        // 20 full-width chars at 20px = 400px exactly.
        let body = "あ".repeat(20);
        let lines = break_lines(&ctx(), &body, 400.0);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn overflowing_character_starts_next_line() {
        let body = "あ".repeat(21);
        let lines = break_lines(&ctx(), &body, 400.0);
        assert_eq!(texts(&lines), vec!["あ".repeat(20).as_str(), "あ"]);
    }

    #[test]
    fn cjk_without_spaces_breaks_into_three_lines() {
        let body = "今日はとても良い天気ですね。".repeat(4);
        let lines = break_lines(&ctx(), &body, 400.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text.chars().count(), 20);
        assert_eq!(lines[1].text.chars().count(), 20);
        assert_eq!(lines[2].text.chars().count(), 16);
        assert_round_trip(&body, 400.0);
    }

    #[test]
    fn mixed_width_uses_measured_width() {
        // 10 ASCII (100px) + 15 full-width (300px) = 400px on line one.
        let body = format!("{}{}{}", "a".repeat(10), "い".repeat(15), "bc");
        let lines = break_lines(&ctx(), &body, 400.0);
        assert_eq!(texts(&lines), vec![&body[..10 + 15 * 3], "bc"]);
    }

    #[test]
    fn spaces_are_ordinary_characters() {
        let body = "hello world ".repeat(5);
        let lines = break_lines(&ctx(), &body, 100.0);
        assert!(lines.iter().all(|l| l.text.len() <= 10));
        assert_round_trip(&body, 100.0);
    }

    #[test]
    fn oversized_character_gets_its_own_line() {
        let lines = break_lines(&ctx(), "aあb", 15.0);
        assert_eq!(texts(&lines), vec!["a", "あ", "b"]);
    }

    #[test]
    fn zero_width_limit_still_terminates() {
        let body = "abcあいう";
        let lines = break_lines(&ctx(), body, 0.0);
        assert_eq!(lines.len(), body.chars().count());
        assert_round_trip(body, 0.0);
    }

    #[test]
    fn round_trip_across_widths() {
        let bodies = [
            "",
            "a",
            "質問箱へようこそ！What's your favourite 食べ物?",
            "🍣🍣🍣 multi-byte emoji and combining e\u{301} marks",
            "改行も\nそのまま\n保持される",
        ];
        for body in bodies {
            for width in [0.0, 10.0, 25.0, 55.0, 400.0, 10_000.0] {
                assert_round_trip(body, width);
            }
        }
    }

    #[test]
    fn centering_single_line_sits_on_anchor() {
        let plan = RenderPlan::new(break_lines(&ctx(), "こんにちは", MAX_LINE_WIDTH));
        assert_eq!(plan.line_y(0), ANCHOR_Y);
    }

    #[test]
    fn centering_two_lines_straddle_anchor() {
        let plan = RenderPlan::new(break_lines(&ctx(), "ab", 10.0));
        assert_eq!(plan.line_y(0), ANCHOR_Y - LINE_HEIGHT / 2.0);
        assert_eq!(plan.line_y(1), ANCHOR_Y + LINE_HEIGHT / 2.0);
    }

    #[test]
    fn centering_law_holds_for_many_lines() {
        for count in 1..=7usize {
            let body = "x".repeat(count);
            let plan = RenderPlan::new(break_lines(&ctx(), &body, 10.0));
            assert_eq!(plan.lines.len(), count);
            for i in 0..count {
                let expected =
                    ANCHOR_Y + LINE_HEIGHT * (i as f32 - (count as f32 - 1.0) / 2.0);
                assert_eq!(plan.line_y(i), expected);
            }
        }
    }

    #[test]
    fn positioned_lines_use_anchor_x() {
        let plan = RenderPlan::new(break_lines(&ctx(), "abc", 10.0));
        let ys: Vec<f32> = plan
            .positioned()
            .map(|(_, x, y)| {
                assert_eq!(x, ANCHOR_X);
                y
            })
            .collect();
        assert_eq!(ys, vec![ANCHOR_Y - LINE_HEIGHT, ANCHOR_Y, ANCHOR_Y + LINE_HEIGHT]);
        assert_eq!(plan.text(), "abc");
    }
}
