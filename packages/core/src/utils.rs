// ABOUTME: Shared utility functions for Tally
// ABOUTME: Time-ordered ID generation and string helpers

use uuid::Uuid;

/// Generate a time-ordered UUID.
///
/// Rows created later sort after rows created earlier, which keeps primary key
/// indexes append-mostly.
pub fn new_uuidt() -> Uuid {
    Uuid::now_v7()
}

/// Truncate a string to at most `max_chars` characters, respecting char boundaries
pub fn truncate(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uuidt_is_time_ordered() {
        let first = new_uuidt();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = new_uuidt();

        assert_ne!(first, second);
        assert!(first < second);
        assert_eq!(first.get_version_num(), 7);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("", 3), "");
    }
}
