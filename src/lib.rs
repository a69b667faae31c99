//! # Augury - generation pipeline for divination readings
//!
//! Augury turns structured divination results into model-written
//! interpretations. It assembles the prompt, picks a transport tier (an
//! optional self-hosted proxy or the provider directly, each streaming or
//! whole-body), decodes streamed output and classifies failures into a small
//! closed set of error kinds.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use augury::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = PersonaCatalog::builtin()?;
//!     let persona = catalog.get("master")?;
//!     let payload = DivinationPayload::Dream(DreamReading {
//!         text: "I crossed a river on a white horse".into(),
//!         keywords: vec!["river".into(), "horse".into()],
//!         themes: vec![],
//!         question: Some("Is this a good time to change jobs?".into()),
//!     });
//!
//!     let settings = GenerationSettings::from_env();
//!     let prompt = PromptAssembler::new(persona)
//!         .category(Category::Dream)
//!         .word_limit(settings.word_limit)
//!         .assemble(&payload)?;
//!
//!     let orchestrator = Orchestrator::new(OrchestratorConfig::default())?;
//!     let print = |so_far: &str| println!("{} chars", so_far.chars().count());
//!     let text = orchestrator
//!         .generate(&settings, &GenerationRequest::new(prompt), Some(&print))
//!         .await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```
//!
//! ## Streams
//!
//! [`Orchestrator::stream`] exposes the same pipeline as a cancellable
//! stream of [`GenerationEvent`]s; simulated and real streaming look the same
//! to the consumer.

#![deny(unsafe_code)]

pub mod defaults;
pub mod error;
pub mod observability;
pub mod orchestrator;
pub mod prompt;
pub mod streaming;
pub mod transport;
pub mod types;
pub mod utils;

pub use error::{ErrorKind, GenerationError};
pub use orchestrator::{GenerationReport, Orchestrator, OrchestratorConfig};
pub use streaming::{GenerationEvent, GenerationStreamHandle, UpdateSink};

pub mod prelude {
    pub use crate::error::{ErrorKind, GenerationError, RawFailure, classify};
    pub use crate::observability::{OutputFormat, TracingConfig, init_tracing};
    pub use crate::orchestrator::{
        GenerationReport, Orchestrator, OrchestratorConfig, TierTimeouts, check_api_key,
    };
    pub use crate::prompt::PromptAssembler;
    pub use crate::streaming::{
        GenerationEvent, GenerationStream, GenerationStreamHandle, Typewriter, UpdateSink,
    };
    pub use crate::types::*;
    pub use crate::utils::cancel::CancelHandle;
}
