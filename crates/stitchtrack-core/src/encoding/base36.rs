//! Fixed-width uppercase base-36.

pub const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of distinct values `width` digits can hold.
pub fn capacity(width: usize) -> u64 {
    36u64.pow(width as u32)
}

/// Render `value` as exactly `width` digits, zero padded.
/// Returns `None` if it does not fit.
pub fn encode_fixed(value: u64, width: usize) -> Option<String> {
    if value >= capacity(width) {
        return None;
    }
    let mut digits = vec![b'0'; width];
    let mut rest = value;
    for slot in digits.iter_mut().rev() {
        *slot = ALPHABET[(rest % 36) as usize];
        rest /= 36;
    }
    // Every byte comes from ALPHABET.
    Some(digits.into_iter().map(char::from).collect())
}

/// Parse uppercase base-36 digits. On failure returns the first
/// character outside the alphabet.
pub fn decode_digits(s: &str) -> Result<u64, char> {
    s.chars().try_fold(0u64, |acc, c| {
        let digit = match c {
            '0'..='9' => c as u64 - '0' as u64,
            'A'..='Z' => c as u64 - 'A' as u64 + 10,
            _ => return Err(c),
        };
        Ok(acc * 36 + digit)
    })
}
