//! Line-list extraction from generated text.

/// Split `raw` into trimmed, non-empty lines, in order, keeping at most
/// `limit` of them.
///
/// Handles both `\n` and `\r\n` line endings.
pub fn parse_lines(raw: &str, limit: usize) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_line_endings() {
        assert_eq!(parse_lines("a\n\nb\r\nc", 2), vec!["a", "b"]);
        assert_eq!(parse_lines("a\n\nb\r\nc", 10), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_trims_and_drops_blank_lines() {
        let raw = "  Epic Run  \n\t\n   \r\n\tChill Vibes\r\n";
        assert_eq!(parse_lines(raw, 5), vec!["Epic Run", "Chill Vibes"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_lines("", 10).is_empty());
        assert!(parse_lines("\n\r\n  \n", 10).is_empty());
        assert!(parse_lines("one\ntwo", 0).is_empty());
    }

    #[test]
    fn test_never_exceeds_limit() {
        let raw: String = (0..50).map(|i| format!("line {i}\n\n")).collect();
        for limit in [0, 1, 5, 15, 49, 50, 51] {
            let lines = parse_lines(&raw, limit);
            assert_eq!(lines.len(), limit.min(50));
            assert!(lines.iter().all(|l| !l.trim().is_empty() && l.trim() == l));
            // Order is preserved.
            for (i, line) in lines.iter().enumerate() {
                assert_eq!(line, &format!("line {i}"));
            }
        }
    }
}
