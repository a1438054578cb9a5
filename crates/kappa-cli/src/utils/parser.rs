use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid atom type '{0}' in type list. Expected non-negative integers (e.g., '1,2').")]
    InvalidType(String),

    #[error("Type list cannot be empty.")]
    EmptyTypeList,

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),
}

/// Parses a comma-separated list of particle types, e.g. `"1, 2,5"`.
///
/// A TOML-style array (`"[1, 2]"`) is accepted too, so `-S selection.atom-types=[1,2]`
/// works like the file syntax.
pub fn parse_type_list(list: &str) -> Result<Vec<u32>, ParseError> {
    let inner = list
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();
    if inner.is_empty() {
        return Err(ParseError::EmptyTypeList);
    }
    inner
        .split(',')
        .map(str::trim)
        .map(|item| {
            item.parse::<u32>()
                .map_err(|_| ParseError::InvalidType(item.to_string()))
        })
        .collect()
}

/// Splits `key=value` at the first `=`.
pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidKeyValue(pair.to_string())),
    }
}
