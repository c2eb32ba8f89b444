//! Substring and keyword matching over log text. Matching is always
//! case-insensitive; nothing here understands log formats.

pub fn contains_term(line: &str, term: &str) -> bool {
    line.to_lowercase().contains(&term.to_lowercase())
}

pub fn contains_any(line: &str, keywords: &[&str]) -> bool {
    let line = line.to_lowercase();
    keywords.iter().any(|k| line.contains(&k.to_lowercase()))
}

pub fn count_matching<'a>(lines: impl IntoIterator<Item = &'a str>, keywords: &[&str]) -> usize {
    lines
        .into_iter()
        .filter(|line| contains_any(line, keywords))
        .count()
}

/// Lines of `text` containing `term`, or every line when `term` is `None`.
pub fn filter_lines<'a>(text: &'a str, term: Option<&str>) -> Vec<&'a str> {
    text.lines()
        .filter(|line| term.map_or(true, |t| contains_term(line, t)))
        .collect()
}

pub fn filter_any<'a>(text: &'a str, keywords: &[&str]) -> Vec<&'a str> {
    text.lines()
        .filter(|line| contains_any(line, keywords))
        .collect()
}

/// The final `n` lines, in order.
pub fn last_lines<'a>(lines: &[&'a str], n: usize) -> Vec<&'a str> {
    let start = lines.len().saturating_sub(n);
    lines[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_ignores_case() {
        assert!(contains_term("Oct 1 vsftpd[1]: FAIL LOGIN", "fail login"));
        assert!(contains_any("Connection REFUSED", &["denied", "refused"]));
        assert!(!contains_any("OK LOGIN", &["denied", "refused"]));
    }

    #[test]
    fn counts_lines_not_occurrences() {
        let text = "error error\nfine\nfailed twice: error";
        assert_eq!(count_matching(text.lines(), &["error", "fail"]), 2);
    }

    #[test]
    fn last_lines_handles_short_input() {
        let lines = vec!["a", "b", "c"];
        assert_eq!(last_lines(&lines, 2), vec!["b", "c"]);
        assert_eq!(last_lines(&lines, 10), vec!["a", "b", "c"]);
    }

    #[test]
    fn filter_without_term_keeps_everything() {
        assert_eq!(filter_lines("a\nb", None), vec!["a", "b"]);
        assert_eq!(filter_lines("alice in\nbob in", Some("ALICE")), vec!["alice in"]);
    }
}
