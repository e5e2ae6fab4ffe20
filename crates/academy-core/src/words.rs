//! Amounts in words, using the Indian numbering system (lakh, crore).
//!
//! Invoices print the total both as a figure and as words, e.g.
//! `1,25,000` becomes "One lakh twenty five thousand".

use crate::error::AcademyError;

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;
const HUNDRED: u64 = 100;

const ONES: [&str; 20] = [
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Convert a non-negative integer to lower-case English words.
///
/// No "and" connective is inserted anywhere. Counts above 99 crore recurse,
/// so one billion reads "one hundred crore".
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return "zero".to_string();
    }
    in_words(n)
}

fn in_words(n: u64) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        20..=99 => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                unit => format!("{tens} {}", ONES[unit as usize]),
            }
        }
        100..=999 => scaled(n, HUNDRED, "hundred"),
        1_000..=99_999 => scaled(n, THOUSAND, "thousand"),
        100_000..=9_999_999 => scaled(n, LAKH, "lakh"),
        _ => scaled(n, CRORE, "crore"),
    }
}

/// `<count> <scale>` followed by the remainder, if any.
fn scaled(n: u64, unit: u64, scale: &str) -> String {
    let head = format!("{} {scale}", in_words(n / unit));
    match n % unit {
        0 => head,
        rest => format!("{head} {}", in_words(rest)),
    }
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Words for an invoice amount, capitalised for display.
///
/// Fractional paise are truncated. Negative, non-finite and out-of-range
/// amounts are rejected.
pub fn amount_in_words(amount: f64) -> Result<String, AcademyError> {
    if !amount.is_finite() {
        return Err(AcademyError::NonFiniteAmount);
    }
    if amount < 0.0 {
        return Err(AcademyError::NegativeAmount(amount));
    }
    // `u64::MAX as f64` rounds up to 2^64, which is already out of range.
    if amount >= u64::MAX as f64 {
        return Err(AcademyError::AmountTooLarge(amount));
    }
    let whole = amount.trunc() as u64;
    Ok(capitalize_first(&number_to_words(whole)))
}
