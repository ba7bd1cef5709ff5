//! Speech engine adapters implementing [`SpeechGateway`](narrate_core::SpeechGateway).
//!
//! The controller operates on `Arc<dyn SpeechGateway>`, so engines can be
//! swapped without touching the transport logic.
//!
//! ## Backend implementations
//!
//! | Feature    | Module          | Engine                                        |
//! |------------|-----------------|-----------------------------------------------|
//! | (always)   | [`simulated`]   | In-process timer engine, records commands     |
//! | `platform` | `platform`      | OS speech service via the `tts` crate         |

#[cfg(feature = "platform")]
pub mod platform;
pub mod simulated;

#[cfg(feature = "platform")]
pub use platform::PlatformGateway;
pub use simulated::{GatewayCommand, SimulatedGateway, SimulatedGatewayConfig};
