//! Shared primitive types used across the crate.

/// A stable customer identifier, e.g. `C00017`.
pub type CustomerId = String;

/// Identifier of one portfolio scoring run.
pub type RunId = String;

/// Report identifier, e.g. `R-1024`.
pub type ReportId = String;
