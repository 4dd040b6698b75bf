//! Terminal rendering of search results.
//!
//! The `format_*` functions build the text; the `print_*` wrappers write
//! it to stdout.

use chrono::{DateTime, Utc};

use hiring_types::Posting;

/// Shown when a search matches nothing.
pub const NO_RESULTS: &str = "No results found for your search query.";

const PREVIEW_CHARS: usize = 75;
const ELLIPSIS: &str = "...";

/// One-line preview: newlines folded to spaces, trimmed, at most
/// [`PREVIEW_CHARS`] characters including the ellipsis.
pub fn format_preview(text: &str) -> String {
    let folded = text.replace('\n', " ");
    let folded = folded.trim();

    if folded.chars().count() <= PREVIEW_CHARS {
        return folded.to_string();
    }

    let kept: String = folded
        .chars()
        .take(PREVIEW_CHARS - ELLIPSIS.len())
        .collect();
    format!("{}{}", kept, ELLIPSIS)
}

pub fn format_search_query_info(query: &str, count: usize) -> String {
    format!(
        "Search Results\n  Query:   \"{}\"\n  Results: {} postings\n",
        query, count
    )
}

/// One block per posting: link, optional age, preview.
pub fn format_posting(posting: &Posting, now: DateTime<Utc>, show_age: bool) -> String {
    let mut block = format!("{}\n", posting.item_url());
    if show_age {
        block.push_str(&format!("  {}\n", posting.age_text(now)));
    }
    block.push_str(&format!("  {}\n", format_preview(&posting.text)));
    block
}

pub fn format_search_results(postings: &[Posting], now: DateTime<Utc>, show_age: bool) -> String {
    if postings.is_empty() {
        return format!("{}\n", NO_RESULTS);
    }

    postings
        .iter()
        .map(|p| format_posting(p, now, show_age))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_search_query_info(query: &str, count: usize) {
    println!("{}", format_search_query_info(query, count));
}

pub fn print_search_results(postings: &[Posting], show_age: bool) {
    print!("{}", format_search_results(postings, Utc::now(), show_age));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_preview_short_text_is_kept() {
        assert_eq!(format_preview("  Rust\nRemote  "), "Rust Remote");
    }

    #[test]
    fn test_preview_is_truncated() {
        let text = "a".repeat(100);
        let preview = format_preview(&text);
        assert_eq!(preview.chars().count(), 75);
        assert!(preview.ends_with("..."));
        assert_eq!(&preview[..72], &text[..72]);
    }

    #[test]
    fn test_preview_exactly_at_limit() {
        let text = "b".repeat(75);
        assert_eq!(format_preview(&text), text);
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let text = "é".repeat(80);
        let preview = format_preview(&text);
        assert_eq!(preview.chars().count(), 75);
        assert!(preview.starts_with("ééé"));
    }

    #[test]
    fn test_query_info() {
        let info = format_search_query_info("python AND remote", 2);
        assert!(info.contains("\"python AND remote\""));
        assert!(info.contains("2 postings"));
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(
            format_search_results(&[], now(), true),
            "No results found for your search query.\n"
        );
    }

    #[test]
    fn test_results_block() {
        let posted = now().timestamp() - 3 * 86_400;
        let posting = Posting::new("42", "Acme | Rust\nRemote", "alice", posted);

        let rendered = format_search_results(&[posting.clone()], now(), true);
        assert_eq!(
            rendered,
            "https://news.ycombinator.com/item?id=42\n  3 days ago\n  Acme | Rust Remote\n"
        );

        let without_age = format_posting(&posting, now(), false);
        assert!(!without_age.contains("days ago"));
    }
}
