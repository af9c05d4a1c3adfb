use crate::note::Letter;

/// A root key that is not a letter A-G with an optional `#` or `b`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid key = {0}")]
pub struct ParseKeyError(pub String);

/// Validate a root key against `^[A-Ga-g](#|b)?$`.
///
/// Returns the key with its letter upper-cased, e.g. "c#" -> "C#".
pub fn parse_key(s: &str) -> Result<String, ParseKeyError> {
    let mut chars = s.chars();
    let letter = chars
        .next()
        .and_then(Letter::from_char)
        .ok_or_else(|| ParseKeyError(s.to_string()))?;

    let mut key = String::with_capacity(2);
    key.push(letter.as_char());
    match (chars.next(), chars.next()) {
        (None, _) => {}
        (Some(c @ ('#' | 'b')), None) => key.push(c),
        _ => return Err(ParseKeyError(s.to_string())),
    }
    Ok(key)
}

/// Parse an output volume as a fraction of full scale (0.0..=1.0)
pub fn parse_volume(s: &str) -> Result<f64, String> {
    let volume: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid volume: {}", s))?;
    if !(0.0..=1.0).contains(&volume) {
        return Err(format!("volume must be between 0.0 and 1.0, got {}", volume));
    }
    Ok(volume)
}
