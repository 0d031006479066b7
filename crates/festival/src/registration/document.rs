//! CPF (Cadastro de Pessoas Físicas) checksum validation.

use super::format::{digits_only, DOCUMENT_DIGITS};

/// Reduces a CPF to its bare digits.
pub fn normalize_document(raw: &str) -> String {
    digits_only(raw)
}

/// Computes both check digits for the nine leading digits of a CPF.
///
/// Each entry of `base` must be in `0..=9`.
pub fn check_digits(base: &[u8; 9]) -> (u8, u8) {
    let mut first_sum = 0u32;
    let mut second_sum = 0u32;
    for (index, digit) in base.iter().enumerate() {
        let digit = u32::from(*digit);
        let index = index as u32;
        first_sum += digit * (10 - index);
        second_sum += digit * (11 - index);
    }

    let first = fold_remainder(first_sum);
    let second = fold_remainder(second_sum + 2 * first);
    (first as u8, second as u8)
}

fn fold_remainder(sum: u32) -> u32 {
    match (sum * 10) % 11 {
        10 => 0,
        remainder => remainder,
    }
}

/// Returns `true` when `raw` carries eleven digits with matching check digits.
///
/// Punctuation is ignored. Repeated-digit numbers such as `111.111.111-11` satisfy the
/// arithmetic but are never issued, so they are rejected.
pub fn is_valid_document(raw: &str) -> bool {
    let digits: Vec<u8> = raw
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as u8)
        .collect();

    if digits.len() != DOCUMENT_DIGITS {
        return false;
    }
    if digits.iter().all(|digit| *digit == digits[0]) {
        return false;
    }

    let mut base = [0u8; 9];
    base.copy_from_slice(&digits[..9]);
    let (first, second) = check_digits(&base);
    first == digits[9] && second == digits[10]
}
