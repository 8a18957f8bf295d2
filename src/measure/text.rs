//! Raw measure text cleanup
//!
//! Helpers that prepare a free-text measure for tokenization.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// Separator punctuation plus any whitespace run that follows it
    static ref SEPARATOR_PATTERN: Regex = Regex::new(r"[+,.;@#?!&$-]+ *").unwrap();
}

/// Insert a space wherever a digit run meets a letter run
///
/// Examples:
/// - "1oz" -> "1 oz"
/// - "cl2" -> "cl 2"
/// - "1 3/4 shot" -> unchanged
pub fn split_numeric_alpha(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut boundaries = Vec::new();

    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let curr = chars[i];
        if (curr.is_alphabetic() && prev.is_ascii_digit())
            || (curr.is_ascii_digit() && prev.is_alphabetic())
        {
            boundaries.push(i);
        }
    }

    // Right to left so earlier positions stay valid
    let mut out = chars;
    for &i in boundaries.iter().rev() {
        out.insert(i, ' ');
    }

    out.into_iter().collect()
}

/// Replace separator punctuation (and trailing spaces) with a single space
///
/// A lone `.` sitting between two digits is a decimal point and is kept.
pub fn strip_punctuation(input: &str) -> String {
    SEPARATOR_PATTERN
        .replace_all(input, |caps: &Captures| {
            let m = caps.get(0).map(|m| (m.start(), m.end(), m.as_str()));
            match m {
                Some((start, end, text)) if text == "." && is_decimal_point(input, start, end) => {
                    ".".to_string()
                }
                _ => " ".to_string(),
            }
        })
        .into_owned()
}

fn is_decimal_point(input: &str, start: usize, end: usize) -> bool {
    let before = input[..start].chars().next_back();
    let after = input[end..].chars().next();
    matches!((before, after), (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit())
}

/// Remove every space from a unit phrase
pub fn remove_spaces(input: &str) -> String {
    input.replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_numeric_alpha() {
        assert_eq!(split_numeric_alpha("1oz"), "1 oz");
        assert_eq!(split_numeric_alpha("cl2"), "cl 2");
        assert_eq!(split_numeric_alpha("1-2tsp"), "1-2 tsp");
        assert_eq!(split_numeric_alpha("a1b2"), "a 1 b 2");
        assert_eq!(split_numeric_alpha("1 3/4 shot"), "1 3/4 shot");
    }

    #[test]
    fn test_split_numeric_alpha_empty() {
        assert_eq!(split_numeric_alpha(""), "");
        assert_eq!(split_numeric_alpha("x"), "x");
    }

    #[test]
    fn test_strip_punctuation_separators() {
        assert_eq!(strip_punctuation("1-2 oz"), "1 2 oz");
        assert_eq!(strip_punctuation("juice of 1, fresh"), "juice of 1 fresh");
        assert_eq!(strip_punctuation("top up!"), "top up ");
        assert_eq!(strip_punctuation("a&  b"), "a b");
    }

    #[test]
    fn test_strip_punctuation_keeps_decimal_point() {
        assert_eq!(strip_punctuation("1.5 oz"), "1.5 oz");
        assert_eq!(strip_punctuation("oz."), "oz ");
        assert_eq!(strip_punctuation("1. oz"), "1 oz");
        assert_eq!(strip_punctuation(".5 oz"), " 5 oz");
    }

    #[test]
    fn test_remove_spaces() {
        assert_eq!(remove_spaces("fill to top"), "filltotop");
    }
}
