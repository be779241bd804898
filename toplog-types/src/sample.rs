//! Observed metric values.

use core::fmt;

/// A single observed value together with the text it was read from.
///
/// Exported tables write [`Sample::as_str`], so a value logged as `5.0`
/// round-trips to the output unchanged. Numeric work (maxima, averages,
/// chart points) uses [`Sample::value`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    value: f64,
    text: String,
}

impl Sample {
    /// Create a sample from a value and its display text.
    pub fn new(value: f64, text: impl Into<String>) -> Self {
        Self {
            value,
            text: text.into(),
        }
    }

    /// Parse a decimal field. Returns `None` for anything that is not a
    /// finite number.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let value: f64 = text.parse().ok()?;
        value.is_finite().then(|| Self::new(value, text))
    }

    /// Create a sample from an integer quantity such as a KiB count.
    pub fn from_count(count: u64) -> Self {
        Self::new(count as f64, count.to_string())
    }

    /// Numeric value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Original text of the value.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_text() {
        let sample = Sample::parse("5.0").unwrap();
        assert_eq!(sample.value(), 5.0);
        assert_eq!(sample.as_str(), "5.0");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Sample::parse("S").is_none());
        assert!(Sample::parse("").is_none());
        assert!(Sample::parse("NaN").is_none());
    }

    #[test]
    fn test_from_count() {
        let sample = Sample::from_count(2048);
        assert_eq!(sample.value(), 2048.0);
        assert_eq!(sample.to_string(), "2048");
    }
}
