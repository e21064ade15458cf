//! Tesseract-backed [`OcrModel`] implementation.
//!
//! The engine's TSV report already carries the page → block → paragraph →
//! line → word hierarchy, so this adapter only has to regroup rows into
//! [`PageLayout`] and apply the configured confidence thresholds. No
//! detection or recognition logic lives here.
//!
//! ## Threshold mapping
//!
//! Tesseract reports one confidence per word (0–100). The recognition
//! threshold discards individual words below it; the detection threshold
//! discards whole lines whose mean word confidence falls below it, which is
//! where false text regions (rulings, specks, photo texture) show up.
//!
//! ## Why a fresh engine per call?
//!
//! The `tesseract` crate's builder consumes `self` on every setter and the
//! underlying handle is not `Sync`. [`TesseractModel`] therefore holds only
//! the init parameters and constructs a short-lived engine inside each
//! `analyze` call; `load` runs a probe init up front so a missing language
//! pack fails at resolution time, not on page 1.

use crate::config::ModelVariant;
use crate::error::ProcessingError;
use crate::layout::{PageLayout, TextBlock, TextLine, Word};
use crate::model::{ModelOptions, OcrModel};
use image::DynamicImage;
use std::io::Cursor;
use std::path::Path;
use tesseract::{OcrEngineMode, Tesseract};
use tracing::debug;

const DEFAULT_LANGUAGE: &str = "eng";

/// Pretrained tesseract engine, selectable between the LSTM recogniser
/// (`accurate`) and the legacy shape-classifier (`fast`).
pub struct TesseractModel {
    datapath: Option<String>,
    language: String,
    variant: ModelVariant,
}

impl TesseractModel {
    /// Validate the language pack and return a reusable model handle.
    ///
    /// `datapath` overrides the engine's model-data directory; when `None`,
    /// tesseract falls back to `TESSDATA_PREFIX` and its compiled-in default.
    pub fn load(
        variant: ModelVariant,
        language: Option<&str>,
        datapath: Option<&Path>,
    ) -> Result<Self, ProcessingError> {
        let model = Self {
            datapath: datapath.map(|p| p.to_string_lossy().into_owned()),
            language: language.unwrap_or(DEFAULT_LANGUAGE).to_string(),
            variant,
        };
        // Probe init: surface a missing traineddata file now rather than
        // mid-document.
        model.init()?;
        debug!(
            "Loaded tesseract model: language={}, variant={}",
            model.language, model.variant
        );
        Ok(model)
    }

    fn init(&self) -> Result<Tesseract, ProcessingError> {
        let oem = match self.variant {
            ModelVariant::Accurate => OcrEngineMode::LstmOnly,
            ModelVariant::Fast => OcrEngineMode::TesseractOnly,
        };
        Tesseract::new_with_oem(self.datapath.as_deref(), Some(&self.language), oem).map_err(
            |e| ProcessingError::ModelLoad {
                detail: e.to_string(),
                hint: format!(
                    "Check that '{}.traineddata' is present in the tessdata directory \
                     (set --tessdata or TESSDATA_PREFIX).",
                    self.language
                ),
            },
        )
    }
}

impl OcrModel for TesseractModel {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn analyze(
        &self,
        image: &DynamicImage,
        options: &ModelOptions,
    ) -> Result<PageLayout, ProcessingError> {
        let backend = |detail: String| ProcessingError::Backend(detail);

        // Tesseract ingests encoded bytes via leptonica; PNG keeps glyph
        // edges lossless.
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| backend(format!("image encoding failed: {e}")))?;

        // PSM 1 = automatic segmentation with orientation/script detection,
        // PSM 3 = automatic segmentation only.
        let psm = if options.rotate_pages { "1" } else { "3" };

        let mut engine = self
            .init()?
            .set_variable("tessedit_pageseg_mode", psm)
            .map_err(|e| backend(e.to_string()))?
            .set_image_from_mem(&png)
            .map_err(|e| backend(e.to_string()))?
            .recognize()
            .map_err(|e| backend(e.to_string()))?;

        let tsv = engine
            .get_tsv_text(0)
            .map_err(|e| backend(e.to_string()))?;

        let page = parse_tsv(&tsv, options.det_threshold, options.rec_threshold);
        debug!(
            "tesseract: {} blocks, {} words",
            page.blocks.len(),
            page.word_count()
        );
        Ok(page)
    }
}

/// One word row of the TSV report, before grouping.
struct TsvWord {
    block: u32,
    paragraph: u32,
    line: u32,
    confidence: f32,
    value: String,
}

/// Regroup tesseract's flat TSV rows into the block → line → word hierarchy.
///
/// Rows: `level page block par line word left top width height conf text`,
/// tab-separated, one header line. Only level-5 (word) rows carry text; the
/// grouping keys are the block / paragraph / line ordinals, which tesseract
/// emits in reading order. Paragraph and line ordinals combine into one line
/// key because the hierarchical result has no paragraph tier.
fn parse_tsv(tsv: &str, det_threshold: f32, rec_threshold: f32) -> PageLayout {
    let mut words = Vec::new();

    for row in tsv.lines() {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() != 12 || cols[0] != "5" {
            continue;
        }
        let value = cols[11].trim();
        if value.is_empty() {
            continue;
        }
        let (Ok(block), Ok(paragraph), Ok(line), Ok(confidence)) = (
            cols[2].parse::<u32>(),
            cols[3].parse::<u32>(),
            cols[4].parse::<u32>(),
            cols[10].parse::<f32>(),
        ) else {
            continue;
        };
        words.push(TsvWord {
            block,
            paragraph,
            line,
            confidence,
            value: value.to_string(),
        });
    }

    group_words(&words, det_threshold, rec_threshold)
}

fn group_words(words: &[TsvWord], det_threshold: f32, rec_threshold: f32) -> PageLayout {
    let mut page = PageLayout::default();
    let mut current_block: Option<u32> = None;
    let mut current_line: Option<(u32, u32, u32)> = None;
    let mut pending: Vec<&TsvWord> = Vec::new();

    let mut flush_line = |page: &mut PageLayout, pending: &mut Vec<&TsvWord>| {
        if pending.is_empty() {
            return;
        }
        let mean = pending.iter().map(|w| w.confidence).sum::<f32>() / pending.len() as f32;
        // A low mean over the whole line marks a false detection, not a
        // badly-printed word.
        if mean / 100.0 >= det_threshold {
            let kept: Vec<Word> = pending
                .iter()
                .filter(|w| w.confidence / 100.0 >= rec_threshold)
                .map(|w| Word::new(w.value.clone(), w.confidence / 100.0))
                .collect();
            if !kept.is_empty() {
                if let Some(block) = page.blocks.last_mut() {
                    block.lines.push(TextLine { words: kept });
                }
            }
        }
        pending.clear();
    };

    for word in words {
        if current_block != Some(word.block) {
            flush_line(&mut page, &mut pending);
            page.blocks.push(TextBlock::default());
            current_block = Some(word.block);
            current_line = None;
        }
        let line_key = (word.block, word.paragraph, word.line);
        if current_line != Some(line_key) {
            flush_line(&mut page, &mut pending);
            current_line = Some(line_key);
        }
        pending.push(word);
    }
    flush_line(&mut page, &mut pending);

    page.blocks.retain(|b| !b.lines.is_empty());
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn word_row(block: u32, par: u32, line: u32, word: u32, conf: f32, text: &str) -> String {
        format!("5\t1\t{block}\t{par}\t{line}\t{word}\t0\t0\t10\t10\t{conf}\t{text}")
    }

    #[test]
    fn parses_words_into_hierarchy() {
        let tsv = [
            HEADER.to_string(),
            "1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t".to_string(),
            word_row(1, 1, 1, 1, 96.0, "Hello"),
            word_row(1, 1, 1, 2, 93.0, "World"),
            word_row(1, 1, 2, 1, 91.0, "again"),
            word_row(2, 1, 1, 1, 90.0, "Footer"),
        ]
        .join("\n");

        let page = parse_tsv(&tsv, 0.5, 0.3);
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].lines.len(), 2);
        assert_eq!(page.blocks[0].lines[0].words.len(), 2);
        assert_eq!(page.blocks[0].lines[0].words[0].value, "Hello");
        assert_eq!(page.blocks[1].lines[0].words[0].value, "Footer");
    }

    #[test]
    fn word_confidence_is_normalised() {
        let tsv = [HEADER.to_string(), word_row(1, 1, 1, 1, 87.5, "x")].join("\n");
        let page = parse_tsv(&tsv, 0.1, 0.1);
        let conf = page.blocks[0].lines[0].words[0].confidence;
        assert!((conf - 0.875).abs() < 1e-6);
    }

    #[test]
    fn rec_threshold_drops_individual_words() {
        let tsv = [
            HEADER.to_string(),
            word_row(1, 1, 1, 1, 95.0, "keep"),
            word_row(1, 1, 1, 2, 12.0, "drop"),
        ]
        .join("\n");
        let page = parse_tsv(&tsv, 0.1, 0.3);
        assert_eq!(page.blocks[0].lines[0].words.len(), 1);
        assert_eq!(page.blocks[0].lines[0].words[0].value, "keep");
    }

    #[test]
    fn det_threshold_drops_whole_low_confidence_lines() {
        let tsv = [
            HEADER.to_string(),
            word_row(1, 1, 1, 1, 20.0, "noise"),
            word_row(1, 1, 1, 2, 25.0, "specks"),
            word_row(1, 1, 2, 1, 95.0, "real"),
        ]
        .join("\n");
        let page = parse_tsv(&tsv, 0.5, 0.1);
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].lines.len(), 1);
        assert_eq!(page.blocks[0].lines[0].words[0].value, "real");
    }

    #[test]
    fn non_word_rows_and_blanks_are_ignored() {
        let tsv = [
            HEADER.to_string(),
            "2\t1\t1\t0\t0\t0\t0\t0\t50\t50\t-1\t".to_string(),
            "4\t1\t1\t1\t1\t0\t0\t0\t50\t10\t-1\t".to_string(),
            "5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t95.0\t   ".to_string(),
        ]
        .join("\n");
        let page = parse_tsv(&tsv, 0.1, 0.1);
        assert!(page.blocks.is_empty());
    }

    #[test]
    fn empty_tsv_yields_empty_page() {
        let page = parse_tsv(HEADER, 0.5, 0.3);
        assert_eq!(page.word_count(), 0);
        assert!(page.blocks.is_empty());
    }
}
