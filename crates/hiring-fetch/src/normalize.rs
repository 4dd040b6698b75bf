//! Markup to plain text.
//!
//! Comment bodies arrive as HTML fragments (`<p>` separated paragraphs,
//! `<a>` links, escaped entities). The output keeps paragraph and line
//! breaks as newlines so postings stay readable.

use html2text::render::TrivialDecorator;
use tracing::warn;

/// Render width handed to html2text. Wide enough that bodies are not re-wrapped.
const RENDER_WIDTH: usize = 10_000;

/// Convert marked-up text into plain text.
///
/// Strips tags, decodes entities and turns block boundaries into line
/// breaks. Links keep only their text, and no footnotes, emphasis markers
/// or code backticks are added. Input with no tags or entities is returned
/// trimmed, so the function is idempotent on its own output.
pub fn normalize(markup: &str) -> String {
    if !looks_like_markup(markup) {
        return tidy(markup);
    }

    let rendered = html2text::config::with_decorator(TrivialDecorator::new())
        .string_from_read(markup.as_bytes(), RENDER_WIDTH);
    match rendered {
        Ok(text) => tidy(&text),
        Err(e) => {
            warn!(error = %e, "Failed to render markup, keeping raw text");
            tidy(markup)
        }
    }
}

/// Trim line ends, collapse blank-line runs to one, trim the whole.
fn tidy(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = false;

    for line in text.lines().map(str::trim_end) {
        if line.is_empty() {
            blank_run = true;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run {
                out.push('\n');
            }
        }
        blank_run = false;
        out.push_str(line);
    }

    out.trim().to_string()
}

/// A tag (`<p`, `</a`, `<!--`) or an entity (`&amp;`, `&#39;`, `&#x2F;`).
fn looks_like_markup(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| match b {
        b'<' => bytes
            .get(i + 1)
            .is_some_and(|&next| next.is_ascii_alphabetic() || next == b'/' || next == b'!'),
        b'&' => is_entity(&bytes[i + 1..]),
        _ => false,
    })
}

fn is_entity(rest: &[u8]) -> bool {
    let body = match rest.first() {
        Some(b'#') => &rest[1..],
        _ => rest,
    };
    let len = body
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    len > 0 && body.get(len) == Some(&b';')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_empty_lines(text: &str) -> Vec<&str> {
        text.lines().filter(|l| !l.trim().is_empty()).collect()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let markup = "Acme Corp | Remote<p>We use Rust &amp; Go.<p>Email: jobs&#x40;acme.com";
        let text = normalize(markup);

        assert_eq!(
            non_empty_lines(&text),
            vec!["Acme Corp | Remote", "We use Rust & Go.", "Email: jobs@acme.com"]
        );
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_line_breaks_survive() {
        let text = normalize("line one<br>line two");
        assert_eq!(non_empty_lines(&text), vec!["line one", "line two"]);
    }

    #[test]
    fn test_entities_decoded() {
        let text = normalize("Salary &gt; 100k &#x2F; year");
        assert_eq!(text, "Salary > 100k / year");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(normalize("  Python developer - Remote \n"), "Python developer - Remote");
        assert_eq!(normalize("a < b & c"), "a < b & c");
    }

    #[test]
    fn test_idempotent() {
        let markup = "Senior Engineer<p>Onsite in Boston &amp; NYC<p>Apply: <a href=\"https://x.test\">here</a>";
        let once = normalize(markup);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_links_and_code_carry_no_decoration() {
        let text = normalize(
            "Acme | <i>Remote</i> | <b>Senior Rust</b><p>Apply: <a href=\"https://acme.test/jobs\">https://acme.test/jobs</a>",
        );
        assert_eq!(text, "Acme | Remote | Senior Rust\n\nApply: https://acme.test/jobs");

        let text = normalize("Use <code>cargo</code> daily<p>We&#x27;re hiring");
        assert_eq!(text, "Use cargo daily\n\nWe're hiring");

        let text = normalize("See <a href=\"https://x.test/careers\">our careers page</a>");
        assert_eq!(text, "See our careers page");
        assert!(!text.contains("[1]"));
        assert!(!text.contains("https://x.test"));
    }

    #[test]
    fn test_tidy_collapses_blank_runs() {
        assert_eq!(tidy("a  \n\n\n\nb\n"), "a\n\nb");
        assert_eq!(tidy("\n\n"), "");
    }

    #[test]
    fn test_markup_detection() {
        assert!(looks_like_markup("<p>hi"));
        assert!(looks_like_markup("x</i>"));
        assert!(looks_like_markup("Tom &amp; Jerry"));
        assert!(looks_like_markup("it&#x27;s"));
        assert!(!looks_like_markup("1 < 2"));
        assert!(!looks_like_markup("R&D team"));
        assert!(!looks_like_markup("plain"));
    }
}
