//! Narration for a single text: the transport state machine, the event loop
//! that drives it, the control-surface view model, and speech engine
//! adapters.
//!
//! ```text
//!   control surface ──Intent──▶ NarrationSession ──▶ NarrationController ──▶ SpeechGateway
//!         ▲                                                  │      ▲              │
//!         └────────── NarrationSnapshot / NarrationEvent ────┘      └─GatewaySignal┘
//! ```

#![deny(unused_crate_dependencies)]

pub mod backend;
pub mod controller;
pub mod error;
pub mod session;
pub mod surface;

// Re-export key types for convenience
pub use backend::{GatewayCommand, SimulatedGateway, SimulatedGatewayConfig};
#[cfg(feature = "platform")]
pub use backend::PlatformGateway;
pub use controller::{GatewaySignal, NarrationController, NarrationEvent, NarrationSnapshot};
pub use error::NarrationError;
pub use session::{NarrationSession, SessionCommand, SessionHandle};
pub use surface::{Button, Intent, Slider, SurfaceView, VoiceOption};
