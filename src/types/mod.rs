//! Core data types

pub mod attempt;
pub mod image;
pub mod payload;
pub mod persona;
pub mod request;
pub mod settings;

pub use attempt::{AttemptOutcome, TierKind, TransportAttempt};
pub use image::ImageInput;
pub use payload::{
    DivinationPayload, DreamReading, Hand, Hexagram, HexagramReading, PalmReading, Pillar,
    TimeChartReading,
};
pub use persona::{Category, CategoryOverride, Persona, PersonaCatalog};
pub use request::GenerationRequest;
pub use settings::{GenerationSettings, SettingsStore};
