//! Recording events and their labels

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Event type marking a discontinuity in the recording
pub const BOUNDARY_EVENT: &str = "boundary";

/// Event type as found in a recording's event table
///
/// Event types arrive either as numeric trigger codes or as text. Anything
/// else is kept as `Unknown` and contributes no label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventLabel {
    /// Numeric trigger code
    Numeric(i64),
    /// Free-text event type
    Text(String),
    /// Unsupported event type
    Unknown,
}

impl EventLabel {
    /// String form used as a sample label
    pub fn as_label(&self) -> Option<String> {
        match self {
            EventLabel::Numeric(code) => Some(code.to_string()),
            EventLabel::Text(text) => Some(text.clone()),
            EventLabel::Unknown => None,
        }
    }

    /// True for the reserved `"boundary"` event type
    pub fn is_boundary(&self) -> bool {
        matches!(self, EventLabel::Text(text) if text == BOUNDARY_EVENT)
    }
}

impl From<i64> for EventLabel {
    fn from(value: i64) -> Self {
        EventLabel::Numeric(value)
    }
}

impl From<&str> for EventLabel {
    fn from(value: &str) -> Self {
        EventLabel::Text(value.to_string())
    }
}

impl From<String> for EventLabel {
    fn from(value: String) -> Self {
        EventLabel::Text(value)
    }
}

impl std::fmt::Display for EventLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventLabel::Numeric(code) => write!(f, "{}", code),
            EventLabel::Text(text) => write!(f, "{}", text),
            EventLabel::Unknown => write!(f, "<unknown>"),
        }
    }
}

impl Serialize for EventLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EventLabel::Numeric(code) => serializer.serialize_i64(*code),
            EventLabel::Text(text) => serializer.serialize_str(text),
            EventLabel::Unknown => serializer.serialize_none(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEventLabel {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for EventLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = match RawEventLabel::deserialize(deserializer)? {
            RawEventLabel::Integer(code) => EventLabel::Numeric(code),
            // Trigger codes exported as doubles
            RawEventLabel::Float(value)
                if value.is_finite()
                    && value.fract() == 0.0
                    && value.abs() < i64::MAX as f64 =>
            {
                EventLabel::Numeric(value as i64)
            }
            RawEventLabel::Text(text) => EventLabel::Text(text),
            RawEventLabel::Float(_) | RawEventLabel::Other(_) => EventLabel::Unknown,
        };
        Ok(label)
    }
}

/// Single annotated event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event type
    #[serde(rename = "type")]
    pub kind: EventLabel,
    /// Onset latency in samples
    pub latency: f64,
    /// Duration in samples
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Event {
    /// Create an instantaneous event
    pub fn new(kind: impl Into<EventLabel>, latency: f64) -> Self {
        Self {
            kind: kind.into(),
            latency,
            duration: None,
        }
    }

    /// Create a boundary event spanning `duration` samples
    pub fn boundary(latency: f64, duration: f64) -> Self {
        Self::new(BOUNDARY_EVENT, latency).with_duration(duration)
    }

    /// Set the event duration in samples
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Onset in seconds
    pub fn onset_seconds(&self, sampling_rate: f64) -> f64 {
        self.latency / sampling_rate
    }

    /// End of the event in seconds; instantaneous events end at onset
    pub fn offset_seconds(&self, sampling_rate: f64) -> f64 {
        (self.latency + self.duration.unwrap_or(0.0)) / sampling_rate
    }
}
