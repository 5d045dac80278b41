//! Formatted numeric inputs.
//!
//! Form state keeps the canonical string (`-1234.5`); the input shows the
//! grouped one (`-1,234.5`). Half-typed values such as `-` or `12.` must
//! survive both directions so the user can keep typing.

use crate::error::ValidationError;
use crate::line_items::LineItem;

/// `-?\d*\.?\d*`
pub fn is_numeric_shape(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let mut seen_point = false;
    digits.chars().all(|c| match c {
        '0'..='9' => true,
        '.' if !seen_point => {
            seen_point = true;
            true
        }
        _ => false,
    })
}

fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().rev().collect();
    let mut out = Vec::with_capacity(chars.len() + chars.len() / 3);
    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

/// Canonical → display. Only the integer part is grouped.
pub fn to_display(raw: &str) -> String {
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    if integer.is_empty() || !integer.chars().all(|c| c.is_ascii_digit()) {
        return raw.to_string();
    }

    let mut out = format!("{}{}", sign, group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Display → canonical. Anything that is not number-shaped once the
/// separators are gone is rejected; callers keep their previous value.
pub fn to_canonical(display: &str) -> Result<String, ValidationError> {
    let raw: String = display.chars().filter(|c| *c != ',').collect();
    if is_numeric_shape(&raw) {
        Ok(raw)
    } else {
        Err(ValidationError::MalformedNumber(display.to_string()))
    }
}

/// Splits a clipboard block (one value per line or per tab-separated cell)
/// into canonical values. Pieces that are not number-shaped are skipped.
pub fn parse_clipboard(text: &str) -> Vec<String> {
    text.split("\r\n")
        .flat_map(|line| line.split(['\n', '\r', '\t']))
        .map(|piece| piece.trim().replace(',', ""))
        .filter(|piece| is_numeric_shape(piece))
        .collect()
}

/// Writes pasted values into consecutive rows starting at `start`. Values
/// past the last row are dropped; rows before `start` are never touched.
/// Returns how many rows were written.
pub fn distribute_paste(text: &str, start: usize, fields: &mut [LineItem]) -> usize {
    let values = parse_clipboard(text);
    if values.is_empty() {
        if !text.trim().is_empty() {
            log::debug!("clipboard held no numeric values");
        }
        return 0;
    }

    let mut written = 0;
    for (field, value) in fields.iter_mut().skip(start).zip(values) {
        field.raw_value = value;
        written += 1;
    }
    written
}
