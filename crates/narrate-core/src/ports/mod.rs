//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No engine-specific types in any signature
//! - Engines are injected as `Arc<dyn SpeechGateway>`, never reached through
//!   process-wide state

pub mod speech;

pub use speech::{SpeechError, SpeechGateway, UtteranceEndCallback, VoicesChangedCallback};
