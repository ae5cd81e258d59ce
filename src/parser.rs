//! Text line parser.
//!
//! The device prints one reading per line, e.g.
//!
//! ```text
//! Rotation X: 1.0, Y: -2.5, Z: 0.25 rad/s
//! Acceleration X: 0.1, Y: 9.81, Z: -0.3 m/s^2
//! Temperature: 24.5 C
//! ```
//!
//! Lines are classified by the first keyword found, in the order
//! `Rotation`, `Temperature`, `Acceleration`. Anything else is not a reading.

use crate::error::ParseError;
use crate::types::Sample;

const ROTATION: &str = "Rotation";
const TEMPERATURE: &str = "Temperature";
const ACCELERATION: &str = "Acceleration";

/// Parse one device line.
///
/// Returns `Ok(None)` for lines that carry no reading and `Err` for lines that
/// name a channel but whose values cannot be read.
pub fn parse_line(line: &str) -> Result<Option<Sample>, ParseError> {
    if let Some(rest) = after_keyword(line, ROTATION) {
        let [x, y, z] = parse_triplet(ROTATION, rest)?;
        Ok(Some(Sample::rotation(x, y, z)))
    } else if line.contains(TEMPERATURE) {
        let value = match line.split_once(':') {
            Some((_, rest)) => parse_number(TEMPERATURE, rest)?,
            None => {
                return Err(ParseError::MissingSeparator {
                    channel: TEMPERATURE,
                    field: line.trim().to_string(),
                })
            }
        };
        Ok(Some(Sample::temperature(value)))
    } else if let Some(rest) = after_keyword(line, ACCELERATION) {
        let [x, y, z] = parse_triplet(ACCELERATION, rest)?;
        Ok(Some(Sample::acceleration(x, y, z)))
    } else {
        Ok(None)
    }
}

fn after_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    line.find(keyword).map(|pos| &line[pos + keyword.len()..])
}

/// `X: 1.0, Y: 2.0, Z: 3.0 unit` -> `[1.0, 2.0, 3.0]`
fn parse_triplet(channel: &'static str, text: &str) -> Result<[f64; 3], ParseError> {
    let fields: Vec<&str> = text.split(',').collect();
    if fields.len() != 3 {
        return Err(ParseError::FieldCount {
            channel,
            found: fields.len(),
        });
    }

    let mut values = [0.0; 3];
    for (slot, field) in values.iter_mut().zip(fields) {
        // the label may itself be preceded by a colon ("Rotation: X: 1.0")
        let (_, value) = field.rsplit_once(':').ok_or_else(|| ParseError::MissingSeparator {
            channel,
            field: field.trim().to_string(),
        })?;
        *slot = parse_number(channel, value)?;
    }
    Ok(values)
}

/// Parse the first token of `text`, ignoring a trailing unit suffix.
fn parse_number(channel: &'static str, text: &str) -> Result<f64, ParseError> {
    let token = text.split_whitespace().next().unwrap_or("");
    let end = token
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')))
        .unwrap_or(token.len());
    let numeric = token[..end].trim_end_matches(['e', 'E', '+', '-']);

    numeric
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            channel,
            value: token.to_string(),
        })
}
