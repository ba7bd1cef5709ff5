//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: it turns view models into text and
//! never talks to the session.

pub mod surface;
pub mod tables;

pub use surface::{format_surface, format_voices, slider_bar};
pub use tables::{print_separator, truncate_string};
