//! Terminal output.
//!
//! # Modules
//!
//! - [`display`]: final recovery / exhaustion report
//! - [`progress`]: live candidate counter and health-check lines

pub mod display;
pub mod progress;

pub use display::show_report;
pub use progress::Spinner;
