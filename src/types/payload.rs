//! Structured divination payloads produced by the computation engines.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::persona::Category;
use crate::error::GenerationError;

/// One hexagram of a cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hexagram {
    /// King Wen sequence number (1..=64).
    pub number: u8,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub upper_trigram: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lower_trigram: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub judgment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HexagramReading {
    pub primary: Hexagram,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed: Option<Hexagram>,
    /// Line positions counted from the bottom (1..=6).
    #[serde(default)]
    pub moving_lines: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

/// A heavenly stem and earthly branch pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pillar {
    pub stem: String,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeChartReading {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    /// Unknown birth hours leave the hour pillar out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<Pillar>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub day_master: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub element_counts: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamReading {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

/// Palm readings carry the photo separately as an [`crate::types::ImageInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalmReading {
    pub hand: Hand,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

/// Tagged union keyed by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "kebab-case")]
pub enum DivinationPayload {
    Hexagram(HexagramReading),
    TimeChart(TimeChartReading),
    Dream(DreamReading),
    PalmImage(PalmReading),
}

impl DivinationPayload {
    pub fn category(&self) -> Category {
        match self {
            Self::Hexagram(_) => Category::Hexagram,
            Self::TimeChart(_) => Category::TimeChart,
            Self::Dream(_) => Category::Dream,
            Self::PalmImage(_) => Category::PalmImage,
        }
    }

    /// The user question, if present and non-blank.
    pub fn question(&self) -> Option<&str> {
        let q = match self {
            Self::Hexagram(r) => r.question.as_deref(),
            Self::TimeChart(r) => r.question.as_deref(),
            Self::Dream(r) => r.question.as_deref(),
            Self::PalmImage(r) => r.question.as_deref(),
        };
        q.map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        match self {
            Self::Hexagram(r) => {
                check_hexagram(&r.primary)?;
                if let Some(changed) = &r.changed {
                    check_hexagram(changed)?;
                }
                let mut seen = BTreeSet::new();
                for line in &r.moving_lines {
                    if !(1..=6).contains(line) {
                        return Err(invalid(format!("Moving line {line} is outside 1..=6.")));
                    }
                    if !seen.insert(*line) {
                        return Err(invalid(format!("Moving line {line} is listed twice.")));
                    }
                }
                Ok(())
            }
            Self::TimeChart(r) => {
                for (name, pillar) in [("year", &r.year), ("month", &r.month), ("day", &r.day)] {
                    check_pillar(name, pillar)?;
                }
                if let Some(hour) = &r.hour {
                    check_pillar("hour", hour)?;
                }
                Ok(())
            }
            Self::Dream(r) => {
                if r.text.trim().is_empty() {
                    return Err(invalid("The dream description is empty.".to_string()));
                }
                Ok(())
            }
            Self::PalmImage(_) => Ok(()),
        }
    }

    /// Pretty-printed JSON of the payload without the question, which the
    /// prompt carries under its own heading. Keys are sorted, so the output
    /// is deterministic.
    pub fn render_data(&self) -> Result<String, GenerationError> {
        let mut value = serde_json::to_value(self).map_err(|e| {
            GenerationError::InvalidInput(format!("The reading data could not be serialized: {e}"))
        })?;
        if let Value::Object(map) = &mut value {
            map.remove("question");
        }
        serde_json::to_string_pretty(&value).map_err(|e| {
            GenerationError::InvalidInput(format!("The reading data could not be serialized: {e}"))
        })
    }
}

fn check_hexagram(h: &Hexagram) -> Result<(), GenerationError> {
    if !(1..=64).contains(&h.number) {
        return Err(invalid(format!(
            "Hexagram number {} is outside 1..=64.",
            h.number
        )));
    }
    if h.name.trim().is_empty() {
        return Err(invalid(format!("Hexagram {} has no name.", h.number)));
    }
    Ok(())
}

fn check_pillar(name: &str, p: &Pillar) -> Result<(), GenerationError> {
    if p.stem.trim().is_empty() || p.branch.trim().is_empty() {
        return Err(invalid(format!("The {name} pillar is incomplete.")));
    }
    Ok(())
}

fn invalid(message: String) -> GenerationError {
    GenerationError::InvalidInput(message)
}
