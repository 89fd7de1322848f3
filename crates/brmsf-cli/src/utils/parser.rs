use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Residue range cannot be empty.")]
    EmptyRange,

    #[error("Invalid residue number '{value}' in range '{range}'.")]
    InvalidResidueNumber { value: String, range: String },

    #[error("Residue range '{0}' is reversed; the start must not exceed the end.")]
    ReversedRange(String),
}

/// Parses an inclusive residue range: `START-END`, or a single `RESID`.
///
/// Negative residue numbers are accepted (`-5-10`, `-10--5`).
pub fn parse_residue_range(input: &str) -> Result<RangeInclusive<isize>, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyRange);
    }

    // A separator is a '-' whose preceding non-blank character is a digit.
    let separator = trimmed
        .char_indices()
        .skip(1)
        .find(|&(i, c)| {
            c == '-' && trimmed[..i].trim_end().ends_with(|p: char| p.is_ascii_digit())
        })
        .map(|(i, _)| i);

    let (start_str, end_str) = match separator {
        Some(i) => (&trimmed[..i], &trimmed[i + 1..]),
        None => (trimmed, trimmed),
    };

    let parse = |value: &str| {
        value
            .trim()
            .parse::<isize>()
            .map_err(|_| ParseError::InvalidResidueNumber {
                value: value.trim().to_string(),
                range: trimmed.to_string(),
            })
    };
    let start = parse(start_str)?;
    let end = parse(end_str)?;

    if start > end {
        return Err(ParseError::ReversedRange(trimmed.to_string()));
    }
    Ok(start..=end)
}
