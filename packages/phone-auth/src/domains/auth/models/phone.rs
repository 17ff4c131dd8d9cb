use serde::{Deserialize, Serialize};

/// Digit groups used when displaying a phone number (`90 123 45 67` style
/// after the leading group). Digits past the pattern are shown in threes.
const DISPLAY_GROUPS: [usize; 4] = [3, 2, 2, 2];
const TRAILING_GROUP: usize = 3;

/// Which digit strings count as a phone number and how they are dialed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonePolicy {
    /// Minimum digit count for a valid number.
    pub min_length: usize,
    /// Prefix applied when the code is sent. Empty disables prefixing.
    pub country_code: String,
}

impl PhonePolicy {
    pub fn is_valid(&self, digits: &str) -> bool {
        is_valid_phone(digits, self.min_length)
    }

    /// Prefix the country code. An empty number stays empty.
    pub fn with_country_code(&self, digits: &str) -> String {
        if digits.is_empty() {
            String::new()
        } else {
            format!("{}{}", self.country_code, digits)
        }
    }
}

/// Strip everything that is not an ASCII digit.
///
/// No length cap: limiting how much the user may type is a presentation concern.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_valid_phone(digits: &str, min_length: usize) -> bool {
    digits.len() >= min_length
}

/// Group digits for display. Only spaces are inserted, so
/// `normalize_phone(&format_phone(d)) == d` for any digit string.
pub fn format_phone(digits: &str) -> String {
    let digits: Vec<char> = normalize_phone(digits).chars().collect();
    let mut groups: Vec<String> = Vec::new();
    let mut rest = digits.as_slice();

    let sizes = DISPLAY_GROUPS
        .iter()
        .copied()
        .chain(std::iter::repeat(TRAILING_GROUP));
    for size in sizes {
        if rest.is_empty() {
            break;
        }
        let take = size.min(rest.len());
        groups.push(rest[..take].iter().collect());
        rest = &rest[take..];
    }

    groups.join(" ")
}

/// Hide all but the last four digits, for logs.
pub fn mask_phone(phone: &str) -> String {
    let digit_count = phone.chars().filter(char::is_ascii_digit).count();
    let visible_from = digit_count.saturating_sub(4);
    let mut seen = 0;

    phone
        .chars()
        .map(|c| {
            if !c.is_ascii_digit() {
                return c;
            }
            seen += 1;
            if seen > visible_from {
                c
            } else {
                '*'
            }
        })
        .collect()
}
