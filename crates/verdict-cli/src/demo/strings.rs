//! Text helpers exercised by the unit suite

pub fn reverse(s: &str) -> String {
    s.chars().rev().collect()
}

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Palindrome check ignoring case and anything that is not an ASCII letter or digit.
pub fn is_palindrome(s: &str) -> bool {
    let cleaned: Vec<char> = s
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(char::is_ascii_alphanumeric)
        .collect();
    cleaned.iter().eq(cleaned.iter().rev())
}

pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}
