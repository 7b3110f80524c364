//! Text extraction and styled-segment detection.

use figbridge_core::{FontName, Prop, StyledSegment, TextNode, TextProps, TextRangeError};
use figbridge_paint::serialize_paints;
use tracing::warn;

const DEFAULT_FONT_SIZE: f64 = 14.0;
const DEFAULT_FONT_WEIGHT: f64 = 400.0;

/// Read typography of a text node.
///
/// Mixed top-level properties resolve to their defaults. Styled segments are
/// attached only when the text has more than one run; a failing range query
/// drops them and keeps the top-level fields.
pub fn extract_text(text: &dyn TextNode) -> TextProps {
    let styled_segments = match StyledSegmentScanner::new(text).scan() {
        Ok(segments) if segments.len() > 1 => Some(segments),
        Ok(_) => None,
        Err(err) => {
            warn!(error = %err, "styled segment scan failed, keeping top-level text style");
            None
        }
    };

    TextProps {
        characters: text.characters().to_string(),
        font_size: text.font_size().unwrap_or(DEFAULT_FONT_SIZE),
        font_name: text.font_name().unwrap_or_default(),
        font_weight: text.font_weight().unwrap_or(DEFAULT_FONT_WEIGHT),
        text_decoration: text.text_decoration().unwrap_or_default(),
        text_case: text.text_case().unwrap_or_default(),
        line_height: text.line_height().unwrap_or_default(),
        letter_spacing: text.letter_spacing().unwrap_or_default(),
        text_align_horizontal: text.text_align_horizontal(),
        text_align_vertical: text.text_align_vertical(),
        paragraph_spacing: text.paragraph_spacing().into_value(),
        paragraph_indent: text.paragraph_indent().into_value(),
        styled_segments,
    }
}

/// Font size, name and weight of one character.
#[derive(Debug, PartialEq)]
struct RunKey {
    font_size: Prop<f64>,
    font_name: Prop<FontName>,
    font_weight: Prop<f64>,
}

/// Splits text into maximal runs of identical font size, name and weight.
///
/// Each character position is queried once, so a scan costs O(n) range
/// queries.
pub struct StyledSegmentScanner<'a> {
    text: &'a dyn TextNode,
}

impl<'a> StyledSegmentScanner<'a> {
    pub fn new(text: &'a dyn TextNode) -> Self {
        Self { text }
    }

    /// Collect every run whose seed character has a uniform size, name and
    /// weight. Runs seeded on a mixed value are skipped.
    pub fn scan(&self) -> Result<Vec<StyledSegment>, TextRangeError> {
        let chars: Vec<char> = self.text.characters().chars().collect();
        let keys = chars
            .iter()
            .enumerate()
            .map(|(i, _)| self.key_at(i))
            .collect::<Result<Vec<_>, _>>()?;

        let mut segments = Vec::new();
        let mut start = 0;
        while start < keys.len() {
            let seed = &keys[start];
            let mut end = start + 1;
            while end < keys.len() && keys[end] == *seed {
                end += 1;
            }

            if let (Prop::Value(font_size), Prop::Value(font_name), Prop::Value(font_weight)) =
                (&seed.font_size, &seed.font_name, &seed.font_weight)
            {
                let fills = self
                    .text
                    .range_fills(start, start + 1)?
                    .into_value()
                    .map(|paints| serialize_paints(&paints));
                segments.push(StyledSegment {
                    characters: chars[start..end].iter().collect(),
                    start,
                    end,
                    font_size: *font_size,
                    font_name: font_name.clone(),
                    font_weight: *font_weight,
                    fills,
                });
            }
            start = end;
        }
        Ok(segments)
    }

    fn key_at(&self, index: usize) -> Result<RunKey, TextRangeError> {
        Ok(RunKey {
            font_size: self.text.range_font_size(index, index + 1)?,
            font_name: self.text.range_font_name(index, index + 1)?,
            font_weight: self.text.range_font_weight(index, index + 1)?,
        })
    }
}
