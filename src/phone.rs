//! Phone number generation and formatting.
//!
//! Numbers are stored as raw digit strings without any prefix. A prefix
//! notation is chosen independently every time a number is written into a
//! record, so the same subscriber shows up as `+49…`, `0…` or `0049…`
//! across a log.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// German mobile network prefixes, without the trunk zero
pub const MOBILE_PREFIXES: [&str; 8] = ["151", "160", "170", "171", "162", "172", "157", "177"];

/// Prefix notations used when rendering a raw number.
///
/// Ordered so that stripping the first match is unambiguous.
pub const NUMBER_PREFIXES: [&str; 3] = ["0049", "+49", "0"];

/// Canonical subscriber number: mobile prefix plus 7 or 8 digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawNumber(String);

impl RawNumber {
    /// Wrap a digit string, rejecting empty input and non-digits
    pub fn parse(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self(digits.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate a fresh raw mobile number
pub fn generate_raw_number<R: Rng + ?Sized>(rng: &mut R) -> RawNumber {
    let prefix = MOBILE_PREFIXES[rng.gen_range(0..MOBILE_PREFIXES.len())];
    let rest_len = if rng.gen_bool(0.5) { 7 } else { 8 };

    let mut digits = String::with_capacity(prefix.len() + rest_len);
    digits.push_str(prefix);
    for _ in 0..rest_len {
        let digit = rng.gen_range(0..10u8);
        digits.push(char::from(b'0' + digit));
    }
    RawNumber(digits)
}

/// Render a raw number with a randomly chosen prefix notation
pub fn format_number<R: Rng + ?Sized>(rng: &mut R, raw: &RawNumber) -> String {
    let prefix = NUMBER_PREFIXES.choose(rng).copied().unwrap_or("+49");
    format!("{}{}", prefix, raw.as_str())
}

/// Recover the raw number from any rendered notation
///
/// Returns `None` when the input carries none of the known prefixes or
/// anything but digits after it.
pub fn normalize(formatted: &str) -> Option<RawNumber> {
    let formatted = formatted.trim();
    NUMBER_PREFIXES
        .iter()
        .find_map(|prefix| formatted.strip_prefix(prefix))
        .and_then(RawNumber::parse)
}
