//! Text flattening: hierarchical OCR results → plain text.
//!
//! The traversal order is canonical: blocks in the order the model returned
//! them, lines within a block in order, words within a line in order. Words
//! join with a single space, lines with a newline, pages with a blank line.
//! A page with no recognised words contributes an empty string; a document
//! where every page is empty flattens to the empty string.

use crate::layout::PageLayout;

/// Flatten one page's block → line → word hierarchy into text.
pub fn flatten_page(page: &PageLayout) -> String {
    let lines: Vec<String> = page
        .blocks
        .iter()
        .flat_map(|block| &block.lines)
        .map(|line| {
            line.words
                .iter()
                .map(|w| w.value.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    lines.join("\n")
}

/// Join page texts into the final document string.
///
/// Pages are separated by a blank line. When no page produced any text the
/// result is the empty string, not a run of separators.
pub fn join_pages(pages: &[String]) -> String {
    if pages.iter().all(|p| p.is_empty()) {
        return String::new();
    }
    pages.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{TextBlock, TextLine, Word};

    fn line(words: &[&str]) -> TextLine {
        TextLine {
            words: words.iter().map(|w| Word::new(*w, 0.9)).collect(),
        }
    }

    fn page(blocks: Vec<Vec<Vec<&str>>>) -> PageLayout {
        PageLayout {
            blocks: blocks
                .into_iter()
                .map(|lines| TextBlock {
                    lines: lines.iter().map(|ws| line(ws)).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn words_join_with_single_space() {
        let p = page(vec![vec![vec!["Hello", "World"]]]);
        assert_eq!(flatten_page(&p), "Hello World");
    }

    #[test]
    fn lines_join_with_newline() {
        let p = page(vec![vec![vec!["A"], vec!["B"]]]);
        assert_eq!(flatten_page(&p), "A\nB");
    }

    #[test]
    fn blocks_continue_the_line_sequence() {
        let p = page(vec![vec![vec!["first", "block"]], vec![vec!["second"]]]);
        assert_eq!(flatten_page(&p), "first block\nsecond");
    }

    #[test]
    fn empty_page_flattens_to_empty_string() {
        assert_eq!(flatten_page(&PageLayout::default()), "");
    }

    #[test]
    fn pages_join_with_blank_line() {
        let pages = vec!["page one".to_string(), "page two".to_string()];
        assert_eq!(join_pages(&pages), "page one\n\npage two");
    }

    #[test]
    fn all_empty_pages_yield_empty_document() {
        let pages = vec![String::new(), String::new(), String::new()];
        assert_eq!(join_pages(&pages), "");
    }

    #[test]
    fn empty_middle_page_keeps_segment_positions() {
        let pages = vec!["a".to_string(), String::new(), "b".to_string()];
        let joined = join_pages(&pages);
        let segments: Vec<&str> = joined.split("\n\n").collect();
        assert_eq!(segments, vec!["a", "", "b"]);
    }

    #[test]
    fn permuting_words_in_one_line_is_local() {
        let original = page(vec![vec![vec!["x", "y"], vec!["stable"]]]);
        let permuted = page(vec![vec![vec!["y", "x"], vec!["stable"]]]);

        let a = flatten_page(&original);
        let b = flatten_page(&permuted);
        assert_ne!(a.lines().next(), b.lines().next());
        assert_eq!(a.lines().nth(1), b.lines().nth(1));
    }
}
