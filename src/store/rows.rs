use anyhow::{anyhow, bail, Context, Result};

use crate::models::Reading;

pub const HEADER: &str = "timestamp,temperature,humidity";

/// One log line, newline included. Fields never contain commas, so no quoting.
pub fn encode(reading: &Reading) -> String {
    format!(
        "{},{:.1},{:.1}\n",
        reading.timestamp, reading.temperature, reading.humidity
    )
}

pub fn decode(line: &str, line_no: usize) -> Result<Reading> {
    let mut fields = line.trim_end_matches('\r').split(',');
    let (Some(timestamp), Some(temperature), Some(humidity), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        bail!("line {line_no}: expected 3 fields");
    };

    let temperature = temperature
        .trim()
        .parse::<f64>()
        .with_context(|| format!("line {line_no}: bad temperature '{temperature}'"))?;
    let humidity = humidity
        .trim()
        .parse::<f64>()
        .with_context(|| format!("line {line_no}: bad humidity '{humidity}'"))?;

    Ok(Reading::new(timestamp.trim(), temperature, humidity))
}

/// Parses a whole log file, header first, returning rows in file order.
/// A zero-length file has no rows.
pub fn decode_all(contents: &str) -> Result<Vec<Reading>> {
    if contents.is_empty() {
        return Ok(Vec::new());
    }

    let mut lines = contents.lines().enumerate();

    match lines.next() {
        Some((_, header)) if header.trim_end_matches('\r') == HEADER => {}
        Some((_, other)) => return Err(anyhow!("unexpected header '{other}'")),
        None => return Err(anyhow!("log file has no header")),
    }

    lines
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| decode(line, idx + 1))
        .collect()
}
