//! Hierarchical OCR result types.
//!
//! The pretrained model reports recognised text as a nested structure —
//! one [`PageLayout`] per page image, containing blocks, lines within each
//! block, and words within each line, in reading order. Each word carries
//! the recogniser's confidence in `[0.0, 1.0]`.
//!
//! These types are owned transiently: produced by an [`crate::model::OcrModel`]
//! implementation, walked once by [`crate::pipeline::flatten`], then dropped.
//! The traversal order page → block → line → word is canonical; backends must
//! emit blocks, lines, and words already sorted in reading order.

use serde::{Deserialize, Serialize};

/// The OCR model's result for a single page image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    /// Text blocks in reading order.
    pub blocks: Vec<TextBlock>,
}

/// A contiguous region of text on the page (a paragraph or column segment).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextBlock {
    /// Lines in reading order.
    pub lines: Vec<TextLine>,
}

/// A single line of text within a block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextLine {
    /// Words in reading order.
    pub words: Vec<Word>,
}

/// One recognised word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// The recognised string.
    pub value: String,
    /// Recognition confidence in `[0.0, 1.0]`.
    pub confidence: f32,
}

impl Word {
    pub fn new(value: impl Into<String>, confidence: f32) -> Self {
        Self {
            value: value.into(),
            confidence,
        }
    }
}

impl PageLayout {
    /// Total number of words on the page.
    pub fn word_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|b| &b.lines)
            .map(|l| l.words.len())
            .sum()
    }

    /// Mean word confidence, or `None` for a page with no words.
    pub fn mean_confidence(&self) -> Option<f32> {
        let mut sum = 0.0f32;
        let mut n = 0usize;
        for block in &self.blocks {
            for line in &block.lines {
                for word in &line.words {
                    sum += word.confidence;
                    n += 1;
                }
            }
        }
        if n == 0 {
            None
        } else {
            Some(sum / n as f32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(words: &[(&str, f32)]) -> TextLine {
        TextLine {
            words: words.iter().map(|(w, c)| Word::new(*w, *c)).collect(),
        }
    }

    #[test]
    fn word_count_spans_blocks_and_lines() {
        let page = PageLayout {
            blocks: vec![
                TextBlock {
                    lines: vec![line(&[("a", 0.9), ("b", 0.8)])],
                },
                TextBlock {
                    lines: vec![line(&[("c", 0.7)]), line(&[])],
                },
            ],
        };
        assert_eq!(page.word_count(), 3);
    }

    #[test]
    fn mean_confidence_empty_page_is_none() {
        assert_eq!(PageLayout::default().mean_confidence(), None);
    }

    #[test]
    fn mean_confidence_averages_all_words() {
        let page = PageLayout {
            blocks: vec![TextBlock {
                lines: vec![line(&[("x", 0.5), ("y", 1.0)])],
            }],
        };
        let mean = page.mean_confidence().unwrap();
        assert!((mean - 0.75).abs() < 1e-6);
    }

    #[test]
    fn layout_round_trips_through_serde() {
        let page = PageLayout {
            blocks: vec![TextBlock {
                lines: vec![line(&[("Hello", 0.99), ("World", 0.97)])],
            }],
        };
        let json = serde_json::to_string(&page).unwrap();
        let back: PageLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back.word_count(), 2);
        assert_eq!(back.blocks[0].lines[0].words[0].value, "Hello");
    }
}
