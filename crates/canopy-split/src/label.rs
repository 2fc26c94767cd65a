use std::fmt;

/// A discrete class label read from a target column.
///
/// Integer labels order numerically and sort before categorical labels,
/// which order lexically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClassLabel {
    /// An integral class value such as `0`, `1` or `-3`.
    Integer(i64),
    /// A named class such as `"setosa"`.
    Category(String),
}

impl ClassLabel {
    /// Convert a numeric cell into a label if it is integral.
    ///
    /// Returns `None` for NaN, infinities, fractional values, and values
    /// outside the `i64` range.
    #[must_use]
    pub fn from_numeric(value: f64) -> Option<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return None;
        }
        if value < i64::MIN as f64 || value >= i64::MAX as f64 {
            return None;
        }
        Some(ClassLabel::Integer(value as i64))
    }

    /// Parse a raw cell: integral numbers become [`ClassLabel::Integer`],
    /// anything else is kept verbatim as [`ClassLabel::Category`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return ClassLabel::Integer(i);
        }
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(Self::from_numeric)
            .unwrap_or_else(|| ClassLabel::Category(trimmed.to_string()))
    }
}

impl From<i64> for ClassLabel {
    fn from(value: i64) -> Self {
        ClassLabel::Integer(value)
    }
}

impl From<&str> for ClassLabel {
    fn from(value: &str) -> Self {
        ClassLabel::Category(value.to_string())
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Integer(i) => write!(f, "{i}"),
            ClassLabel::Category(name) => f.write_str(name),
        }
    }
}

// Serialized as text so labels can key JSON objects.
impl serde::Serialize for ClassLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
