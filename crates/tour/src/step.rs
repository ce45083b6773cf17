use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Zero-based column, one-based line (CodeTour convention)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

/// Highlighted range inside the step's file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    /// Lines forced to >= 1, end never before start
    #[must_use]
    pub fn normalized(self) -> Self {
        let start_line = self.start.line.max(1);
        let end_line = self.end.line.max(start_line);
        Self {
            start: Position {
                line: start_line,
                character: self.start.character,
            },
            end: Position {
                line: end_line,
                character: self.end.character,
            },
        }
    }
}

/// A step as produced by the generation service; nothing here is trusted.
///
/// Deserialization is lenient: missing fields default, `line` accepts
/// numbers, numeric strings and floats, and an unreadable `selection` is
/// dropped instead of failing the whole step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedTourStep {
    pub title: String,
    #[serde(alias = "path")]
    pub file: String,
    #[serde(deserialize_with = "lenient_line")]
    pub line: Option<i64>,
    pub description: String,
    #[serde(deserialize_with = "lenient_selection")]
    pub selection: Option<Selection>,
}

impl GeneratedTourStep {
    pub fn new(title: impl Into<String>, file: impl Into<String>, line: Option<i64>) -> Self {
        Self {
            title: title.into(),
            file: file.into(),
            line,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A validated step: `file` is known (or the welcome exception) and `line` is positive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourStep {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

fn lenient_line<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_line(&value))
}

fn lenient_selection<'de, D>(deserializer: D) -> Result<Option<Selection>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn coerce_line(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    }
}
