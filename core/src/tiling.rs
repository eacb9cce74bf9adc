//! Text tiling geometry for the watermark overlay.
//!
//! The overlay is a single long line of self-repeated text drawn many times
//! along a 45°-rotated axis. [`tile_text`] grows the source text until one
//! line spans the rotated diagonal without gaps, and [`LinePlan`] places the
//! lines, rotating each one's starting offset so repetitions never align
//! into a readable grid.

use crate::config::DEFAULT_FONT_PX;

/// Delimiter inserted between repetitions of the watermark text.
pub const TEXT_DELIMITER: &str = "    ";

/// Shuffle drift per line, in characters.
const SHUFFLE_STEP: i64 = 20;

/// Grows `text` by self-concatenation until its character count reaches
/// `width + height`, joining repetitions with [`TEXT_DELIMITER`].
///
/// The rotated diagonal of a `width × height` surface is shorter than
/// `width + height`, so the result is guaranteed to tile a full line with
/// no gap. Empty text stays empty.
#[must_use]
pub fn tile_text(text: &str, width: u32, height: u32) -> String {
    if text.is_empty() {
        return String::new();
    }
    let target = width as usize + height as usize;
    let mut tiled = text.to_owned();
    let mut count = tiled.chars().count();
    while count < target {
        let repetition = tiled.clone();
        tiled.push_str(TEXT_DELIMITER);
        tiled.push_str(&repetition);
        count = count * 2 + TEXT_DELIMITER.len();
    }
    tiled
}

/// A single placed line of the tiled overlay text.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Text drawn for this line, starting at a rotated offset into the
    /// tiled text.
    pub text: String,
    /// Horizontal baseline coordinate, relative to the rotated surface
    /// center.
    pub x: f64,
    /// Vertical baseline coordinate.
    pub y: f64,
}

/// Iterator over the diagonal line placements covering a `width × height`
/// surface.
///
/// Lines start far above the visible band at `-2 * (width + height)` and
/// step by the line height up to `(width + height) / 2`, so the rotated
/// text overshoots the surface on both ends. Each line begins
/// 20 characters further into the tiled text than the previous one; the
/// drift breaks the visual periodicity of the repeated text.
#[derive(Debug, Clone)]
pub struct LinePlan<'a> {
    text: &'a str,
    char_offsets: Vec<usize>,
    span: f64,
    line_height: f64,
    pos: f64,
}

impl<'a> LinePlan<'a> {
    /// Plans lines for a tiled `text` over a `width × height` surface.
    ///
    /// `line_height` is the vertical step between lines; non-positive or
    /// non-finite steps fall back to the default font's step, keeping the
    /// plan finite.
    #[must_use]
    pub fn new(text: &'a str, width: u32, height: u32, line_height: f64) -> Self {
        let span = f64::from(width) + f64::from(height);
        let line_height = if line_height.is_finite() && line_height > 0.0 {
            line_height
        } else {
            DEFAULT_FONT_PX * 2.5
        };
        Self {
            text,
            char_offsets: text.char_indices().map(|(index, _)| index).collect(),
            span,
            line_height,
            pos: -2.0 * span,
        }
    }

    /// The tiled text shifted by the line's shuffle offset, with the full
    /// text appended after the delimiter so the line never runs short.
    fn shuffled(&self, iteration: i64) -> String {
        let len = i64::try_from(self.char_offsets.len()).unwrap_or(i64::MAX);
        if len == 0 {
            return String::new();
        }
        let shuffle = (iteration * SHUFFLE_STEP).rem_euclid(len);
        let start = self.char_offsets[usize::try_from(shuffle).unwrap_or(0)];
        format!("{}{TEXT_DELIMITER}{}", &self.text[start..], self.text)
    }
}

impl Iterator for LinePlan<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        if self.text.is_empty() || self.pos > self.span / 2.0 {
            return None;
        }
        let pos = self.pos;
        self.pos += self.line_height;
        #[allow(clippy::cast_possible_truncation)]
        let iteration = (pos / self.line_height) as i64;
        Some(Line {
            text: self.shuffled(iteration),
            x: pos - self.span / 2.0,
            y: pos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_text_covers_span() {
        let tiled = tile_text("x", 100, 100);
        assert!(tiled.chars().count() >= 200);

        let tiled = tile_text("dave@acme.com", 1920, 1080);
        assert!(tiled.chars().count() >= 3000);
    }

    #[test]
    fn test_tile_text_empty_stays_empty() {
        assert_eq!(tile_text("", 100, 100), "");
    }

    #[test]
    fn test_tile_text_short_span_keeps_text() {
        // Already long enough: no repetition happens.
        assert_eq!(tile_text("watermark", 4, 4), "watermark");
    }

    #[test]
    fn test_tile_text_is_deterministic() {
        assert_eq!(tile_text("abc", 50, 50), tile_text("abc", 50, 50));
    }

    #[test]
    fn test_tile_text_joins_with_delimiter() {
        let tiled = tile_text("ab", 3, 3);
        assert_eq!(tiled, format!("ab{TEXT_DELIMITER}ab"));
    }

    #[test]
    fn test_line_plan_bounds() {
        let tiled = tile_text("secret", 100, 100);
        let span = 200.0;
        let lines: Vec<Line> = LinePlan::new(&tiled, 100, 100, 40.0).collect();
        assert!(!lines.is_empty());
        assert!((lines[0].y - (-2.0 * span)).abs() < f64::EPSILON);
        for line in &lines {
            assert!(line.y <= span / 2.0);
            assert!((line.x - (line.y - span / 2.0)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_line_plan_shuffle_varies_across_lines() {
        let tiled = tile_text("watermark", 200, 200);
        let lines: Vec<Line> = LinePlan::new(&tiled, 200, 200, 40.0).collect();
        assert!(lines.len() > 2);
        // Consecutive lines start at different offsets into the tiled text.
        assert_ne!(lines[0].text, lines[1].text);
    }

    #[test]
    fn test_line_plan_is_deterministic() {
        let tiled = tile_text("secret", 120, 80);
        let first: Vec<Line> = LinePlan::new(&tiled, 120, 80, 40.0).collect();
        let second: Vec<Line> = LinePlan::new(&tiled, 120, 80, 40.0).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_line_plan_multibyte_shuffle_is_char_aligned() {
        let tiled = tile_text("日本語テキスト", 100, 100);
        for line in LinePlan::new(&tiled, 100, 100, 40.0) {
            // Building the line would panic on a non-boundary slice.
            assert!(line.text.contains('日'));
        }
    }

    #[test]
    fn test_line_plan_empty_text_yields_nothing() {
        assert_eq!(LinePlan::new("", 100, 100, 40.0).count(), 0);
    }

    #[test]
    fn test_line_plan_negative_iterations_stay_in_range() {
        // The first iterations are negative; offsets must still index the
        // tiled text.
        let tiled = tile_text("abcde", 60, 60);
        let lines: Vec<Line> = LinePlan::new(&tiled, 60, 60, 40.0).collect();
        for line in lines {
            assert!(line.text.chars().count() >= tiled.chars().count());
        }
    }

    #[test]
    fn test_line_plan_guards_against_degenerate_step() {
        let tiled = tile_text("x", 40, 40);
        let lines: Vec<Line> = LinePlan::new(&tiled, 40, 40, 0.0).collect();
        assert!(!lines.is_empty());
    }
}
