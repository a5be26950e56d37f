//! Line-wrapping and pagination
//!
//! Two wrap rules apply in sequence: a greedy fill against an estimated glyph
//! width, then a per-line character-count fallback that guarantees no drawn
//! line exceeds the threshold even when the width estimate under-counts.
//! Word-wrap never merges across an explicit line break, and words are never
//! split mid-token.

/// A4 page size in points.
pub const PAGE_WIDTH_PT: f32 = 595.28;
pub const PAGE_HEIGHT_PT: f32 = 841.89;

/// Uniform page margin.
pub const MARGIN_PT: f32 = 50.0;

/// Body font size and line advance.
pub const FONT_SIZE_PT: f32 = 10.0;
pub const LINE_HEIGHT_PT: f32 = 15.0;

/// Hard cap on characters per drawn line.
pub const WRAP_THRESHOLD_CHARS: usize = 80;

/// Average glyph width as a fraction of the font size (Helvetica estimate).
const WIDTH_ESTIMATE_FACTOR: f32 = 0.6;

const PRINTABLE_WIDTH_PT: f32 = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;

/// One positioned line of output text.
#[derive(Debug, Clone, PartialEq)]
pub struct TypesetLine {
    pub content: String,
    /// Baseline y-offset in points, measured from the page bottom.
    pub y: f32,
}

/// One fixed-size output page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub lines: Vec<TypesetLine>,
}

/// Lay out `text` as a sequence of pages.
///
/// Always produces at least one page; an empty input yields exactly one page
/// with zero lines.
pub fn layout(text: &str) -> Vec<Page> {
    if text.is_empty() {
        return vec![Page::default()];
    }

    let wrapped = wrap_to_width(text);
    let capped = enforce_char_limit(wrapped);
    paginate(capped)
}

/// Estimated rendered width of a candidate line, in points.
fn estimated_width(candidate_chars: usize) -> f32 {
    candidate_chars as f32 * FONT_SIZE_PT * WIDTH_ESTIMATE_FACTOR
}

/// Greedy line-filling against the estimated glyph width.
///
/// Explicit line breaks are hard breaks: each source line wraps
/// independently, and an empty source line yields an empty output line so
/// vertical spacing survives.
fn wrap_to_width(text: &str) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let tokens: Vec<&str> = paragraph.split_whitespace().collect();
        if tokens.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut buffer = String::new();
        for token in tokens {
            let candidate_chars = if buffer.is_empty() {
                token.chars().count()
            } else {
                buffer.chars().count() + 1 + token.chars().count()
            };

            if !buffer.is_empty() && estimated_width(candidate_chars) > PRINTABLE_WIDTH_PT {
                lines.push(std::mem::take(&mut buffer));
                buffer.push_str(token);
            } else {
                if !buffer.is_empty() {
                    buffer.push(' ');
                }
                buffer.push_str(token);
            }
        }

        if !buffer.is_empty() {
            lines.push(buffer);
        }
    }

    lines
}

/// Per-line fallback: any physical line longer than the character threshold
/// is re-wrapped by the same greedy token rule using the threshold directly.
///
/// A single token longer than the threshold stays on its own line; tokens are
/// never hyphenated.
fn enforce_char_limit(lines: Vec<String>) -> Vec<String> {
    let mut capped = Vec::with_capacity(lines.len());

    for line in lines {
        if line.chars().count() <= WRAP_THRESHOLD_CHARS {
            capped.push(line);
            continue;
        }

        let mut buffer = String::new();
        for token in line.split_whitespace() {
            let candidate_chars = if buffer.is_empty() {
                token.chars().count()
            } else {
                buffer.chars().count() + 1 + token.chars().count()
            };

            if !buffer.is_empty() && candidate_chars > WRAP_THRESHOLD_CHARS {
                capped.push(std::mem::take(&mut buffer));
                buffer.push_str(token);
            } else {
                if !buffer.is_empty() {
                    buffer.push(' ');
                }
                buffer.push_str(token);
            }
        }

        if !buffer.is_empty() {
            capped.push(buffer);
        }
    }

    capped
}

/// Flow wrapped lines onto fixed-size pages.
///
/// The cursor starts at the top margin and advances down by the line height;
/// when the next line would fall below the bottom margin a fresh page is
/// allocated and all subsequent lines land on it.
fn paginate(lines: Vec<String>) -> Vec<Page> {
    let mut pages = vec![Page::default()];
    let mut cursor = PAGE_HEIGHT_PT - MARGIN_PT;

    for content in lines {
        if cursor < MARGIN_PT {
            pages.push(Page::default());
            cursor = PAGE_HEIGHT_PT - MARGIN_PT;
        }

        pages
            .last_mut()
            .expect("pages is never empty")
            .lines
            .push(TypesetLine { content, y: cursor });

        cursor -= LINE_HEIGHT_PT;
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_lines(pages: &[Page]) -> Vec<&TypesetLine> {
        pages.iter().flat_map(|p| p.lines.iter()).collect()
    }

    #[test]
    fn test_empty_text_yields_one_page_zero_lines() {
        let pages = layout("");
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }

    #[test]
    fn test_always_at_least_one_page() {
        assert_eq!(layout("a").len(), 1);
        assert!(!layout("hello world").is_empty());
    }

    #[test]
    fn test_no_line_exceeds_wrap_threshold() {
        let word = "facture";
        let text = std::iter::repeat(word)
            .take(500)
            .collect::<Vec<_>>()
            .join(" ");

        let pages = layout(&text);
        for line in all_lines(&pages) {
            assert!(
                line.content.chars().count() <= WRAP_THRESHOLD_CHARS,
                "line too long: {:?}",
                line.content
            );
        }
    }

    #[test]
    fn test_hard_break_never_merged() {
        let pages = layout("alpha beta\ngamma delta");
        let lines = all_lines(&pages);

        // Both sides of the break fit on one line each; they must stay apart.
        assert_eq!(lines[0].content, "alpha beta");
        assert_eq!(lines[1].content, "gamma delta");
    }

    #[test]
    fn test_blank_source_line_preserved() {
        let pages = layout("first\n\nsecond");
        let lines = all_lines(&pages);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].content, "");
        // The blank line still consumes vertical space
        assert!((lines[0].y - lines[2].y - 2.0 * LINE_HEIGHT_PT).abs() < 1e-3);
    }

    #[test]
    fn test_oversized_token_kept_whole() {
        let token = "x".repeat(200);
        let text = format!("before {} after", token);
        let pages = layout(&text);
        let lines = all_lines(&pages);

        // The monster token sits alone on its line, unhyphenated.
        assert!(lines.iter().any(|l| l.content == token));
    }

    #[test]
    fn test_long_input_paginates() {
        // Each source line is a hard break; 50 lines fit per page.
        let text = (0..120).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let pages = layout(&text);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].lines.len(), 50);
        assert_eq!(pages[1].lines.len(), 50);
        assert_eq!(pages[2].lines.len(), 20);

        // First line of every page starts back at the top margin.
        for page in &pages {
            assert!((page.lines[0].y - (PAGE_HEIGHT_PT - MARGIN_PT)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_lines_never_fall_below_bottom_margin() {
        let text = (0..500).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        for page in layout(&text) {
            for line in &page.lines {
                assert!(line.y >= MARGIN_PT);
            }
        }
    }

    #[test]
    fn test_greedy_fill_is_deterministic() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let first = layout(&text);
        let second = layout(&text);
        assert_eq!(
            all_lines(&first)
                .iter()
                .map(|l| l.content.as_str())
                .collect::<Vec<_>>(),
            all_lines(&second)
                .iter()
                .map(|l| l.content.as_str())
                .collect::<Vec<_>>()
        );
    }
}
