//! Call duration rendering.
//!
//! Durations in records are written as `MM:SS` with two-digit,
//! zero-padded fields and no hour component.

/// Render whole seconds as `MM:SS`
///
/// # Examples
/// ```
/// use cdrsim::utils::duration::format_mm_ss;
///
/// assert_eq!(format_mm_ss(5), "00:05");
/// assert_eq!(format_mm_ss(155), "02:35");
/// assert_eq!(format_mm_ss(3599), "59:59");
/// ```
pub fn format_mm_ss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Parse an `MM:SS` field back into seconds
///
/// Both fields must be exactly two digits and seconds must be below 60.
///
/// # Examples
/// ```
/// use cdrsim::utils::duration::parse_mm_ss;
///
/// assert_eq!(parse_mm_ss("02:35"), Some(155));
/// assert_eq!(parse_mm_ss("2:35"), None);
/// assert_eq!(parse_mm_ss("02:60"), None);
/// ```
pub fn parse_mm_ss(field: &str) -> Option<u32> {
    let (minutes, seconds) = field.split_once(':')?;
    if minutes.len() != 2 || seconds.len() != 2 {
        return None;
    }
    let minutes = parse_two_digits(minutes)?;
    let seconds = parse_two_digits(seconds)?;
    if seconds >= 60 {
        return None;
    }
    Some(minutes * 60 + seconds)
}

fn parse_two_digits(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
