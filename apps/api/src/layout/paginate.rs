//! Pagination — places the lines of a rewritten CV onto A4 pages.
//!
//! Rules:
//! - blank lines, `---` rules, and lines starting with `**` are dropped
//! - a line is a section header if it is all caps (and has letters) or ends with `:`
//! - headers get two line heights of space before and one after
//! - every line is word-wrapped to the text width; a new page starts whenever
//!   the cursor has passed `break_after_mm`

use serde::Serialize;

use crate::layout::font_metrics::{get_metrics, FontFamily, PageConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    SectionHeader,
    Body,
}

/// One printed line with its baseline position on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub text: String,
    pub kind: LineKind,
    pub x_mm: f32,
    pub y_mm: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPage {
    pub number: usize,
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CvLayout {
    pub font: FontFamily,
    pub pages: Vec<LayoutPage>,
    pub section_headers: Vec<String>,
}

/// Formatting residue from the model's markdown that is not printed.
pub fn is_skipped_line(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed == "---" || trimmed.starts_with("**")
}

pub fn is_section_header(trimmed: &str) -> bool {
    let all_caps =
        trimmed.chars().any(char::is_alphabetic) && trimmed.to_uppercase() == trimmed;
    all_caps || trimmed.ends_with(':')
}

/// Lays out `text` on as many pages as it needs. Always returns at least one page.
pub fn layout_cv(text: &str, config: &PageConfig) -> CvLayout {
    let metrics = get_metrics(config.font);
    let width_em = config.text_width_em();
    let line_height = config.line_height_mm;

    let mut pages = vec![LayoutPage {
        number: 1,
        lines: Vec::new(),
    }];
    let mut section_headers = Vec::new();
    let mut y = config.first_baseline_mm;

    for raw in text.lines() {
        let trimmed = raw.trim();
        if is_skipped_line(trimmed) {
            continue;
        }

        let kind = if is_section_header(trimmed) {
            section_headers.push(trimmed.to_string());
            y += line_height * 2.0;
            LineKind::SectionHeader
        } else {
            LineKind::Body
        };

        for segment in metrics.wrap(trimmed, width_em) {
            if y > config.break_after_mm {
                pages.push(LayoutPage {
                    number: pages.len() + 1,
                    lines: Vec::new(),
                });
                y = config.first_baseline_mm;
            }
            if let Some(page) = pages.last_mut() {
                page.lines.push(PlacedLine {
                    text: segment,
                    kind,
                    x_mm: config.margin_left_mm,
                    y_mm: y,
                });
            }
            y += line_height;
        }

        if kind == LineKind::SectionHeader {
            y += line_height;
        }
    }

    CvLayout {
        font: config.font,
        pages,
        section_headers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::default_page_config;

    fn config() -> PageConfig {
        default_page_config(FontFamily::Inter)
    }

    #[test]
    fn test_section_header_detection() {
        assert!(is_section_header("EXPERIENCE"));
        assert!(is_section_header("WORK HISTORY (2019-2024)"));
        assert!(is_section_header("Skills:"));
        assert!(!is_section_header("Jane Doe"));
        assert!(!is_section_header("2019 - 2021"));
    }

    #[test]
    fn test_skipped_lines() {
        assert!(is_skipped_line(""));
        assert!(is_skipped_line("---"));
        assert!(is_skipped_line("**Optimized CV**"));
        assert!(!is_skipped_line("- Built APIs in Go"));
    }

    #[test]
    fn test_layout_positions_body_and_header_lines() {
        let layout = layout_cv("Jane Doe\n\nEXPERIENCE\nBackend developer\n---\n", &config());

        assert_eq!(layout.pages.len(), 1);
        assert_eq!(layout.section_headers, vec!["EXPERIENCE".to_string()]);

        let lines = &layout.pages[0].lines;
        assert_eq!(lines.len(), 3);
        assert_eq!((lines[0].text.as_str(), lines[0].kind, lines[0].y_mm), ("Jane Doe", LineKind::Body, 20.0));
        // 27 + 14 before the header
        assert_eq!((lines[1].kind, lines[1].y_mm), (LineKind::SectionHeader, 41.0));
        // 48 + 7 after the header
        assert_eq!((lines[2].kind, lines[2].y_mm), (LineKind::Body, 55.0));
        assert!(lines.iter().all(|l| l.x_mm == 20.0));
    }

    #[test]
    fn test_layout_breaks_page_after_limit() {
        let text = (1..=39).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let layout = layout_cv(&text, &config());

        // Baselines 20, 27, ..., 279 fit on page one (38 lines).
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(layout.pages[0].lines.len(), 38);
        assert_eq!(layout.pages[0].lines[37].y_mm, 279.0);
        assert_eq!(layout.pages[1].number, 2);
        assert_eq!(layout.pages[1].lines[0].text, "line 39");
        assert_eq!(layout.pages[1].lines[0].y_mm, 20.0);
    }

    #[test]
    fn test_layout_wraps_long_lines() {
        let long = "Delivered reliable backend services in Go and PostgreSQL for payments ".repeat(4);
        let layout = layout_cv(&long, &config());

        let lines = &layout.pages[0].lines;
        assert!(lines.len() > 1);
        assert_eq!(lines[1].y_mm - lines[0].y_mm, 7.0);
        assert!(lines.iter().all(|l| l.kind == LineKind::Body));
    }

    #[test]
    fn test_layout_empty_text_is_single_empty_page() {
        let layout = layout_cv("\n---\n", &config());
        assert_eq!(layout.pages.len(), 1);
        assert!(layout.pages[0].lines.is_empty());
        assert!(layout.section_headers.is_empty());
    }
}
