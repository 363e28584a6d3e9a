//! Output formats.

/// Semicolon-separated memory listing.
pub mod listing;

/// Human-readable validation reports.
pub mod validation;

pub use listing::{render_listing, write_listing, ListingOptions, HEADER};
pub use validation::write_reports;
