//! Common utilities for the Vellum converter.
//!
//! This crate provides shared infrastructure used by all converter components:
//! - **Warning System** - deduplicated, colored reporting of recoverable problems
//! - **Errors** - the fatal error taxonomy
//! - **Numbers** - compact SVG number formatting
//! - **Images** - raster recoding collaborators

pub mod error;
pub mod image;
pub mod number;
pub mod warning;

pub use error::{ConvertError, NamespaceError};
pub use warning::{Diagnostics, Warning, WarningKind};
