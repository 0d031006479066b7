//! Display masks for numeric form fields.
//!
//! Every function here is total: any input, including empty or overlong strings, yields a
//! mask over the leading digits. Re-applying a mask to its own output is a no-op.

pub const DOCUMENT_DIGITS: usize = 11;
pub const PHONE_MAX_DIGITS: usize = 11;

/// Strips everything except ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Applies `###.###.###-##` over the first eleven digits of `raw`.
pub fn format_document(raw: &str) -> String {
    let mut masked = String::with_capacity(14);
    for (index, digit) in raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(DOCUMENT_DIGITS)
        .enumerate()
    {
        match index {
            3 | 6 => masked.push('.'),
            9 => masked.push('-'),
            _ => {}
        }
        masked.push(digit);
    }
    masked
}

/// Applies `(##) ####-####` for landlines and `(##) #####-####` for eleven digit mobiles.
pub fn format_phone(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_MAX_DIGITS)
        .collect();
    let hyphen_at = if digits.len() == PHONE_MAX_DIGITS { 7 } else { 6 };

    let mut masked = String::with_capacity(15);
    for (index, digit) in digits.into_iter().enumerate() {
        if index == 0 {
            masked.push('(');
        } else if index == 2 {
            masked.push_str(") ");
        } else if index == hyphen_at {
            masked.push('-');
        }
        masked.push(digit);
    }
    masked
}
