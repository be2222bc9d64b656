//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate affinity mask words (1 to 8 groups of 32 bits)
    pub fn affinity_words() -> impl Strategy<Value = Vec<u32>> {
        prop::collection::vec(any::<u32>(), 1..=8)
    }

    /// Generate a make progress line together with its percentage
    pub fn progress_line() -> impl Strategy<Value = (String, u8)> {
        (0u8..=100, 0usize..=2, "( [A-Za-z][A-Za-z0-9 ./_-]{0,40})?").prop_map(
            |(percent, spaces, suffix)| {
                (
                    format!("[{}{percent}%]{suffix}", " ".repeat(spaces)),
                    percent,
                )
            },
        )
    }

    /// Generate a non-blank line that is not a progress marker
    pub fn plain_line() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ./:_'-]{0,60}"
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::core::progress::parse_progress;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_progress_line_generator(line in progress_line()) {
            let (text, percent) = line;
            prop_assert!(text.starts_with('['));
            prop_assert_eq!(parse_progress(&text), Some(percent));
        }

        #[test]
        fn test_plain_line_generator(line in plain_line()) {
            prop_assert!(!line.trim().is_empty());
            prop_assert!(parse_progress(&line).is_none());
        }

        #[test]
        fn test_affinity_words_generator(words in affinity_words()) {
            prop_assert!(!words.is_empty());
            prop_assert!(words.len() <= 8);
        }
    }
}
