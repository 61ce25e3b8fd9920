//! Requirement parsing and reconciliation.
//!
//! # Modules
//!
//! - [`requirement`] - Requirement lines, bare names and name normalization
//! - [`reconcile`] - Deciding which requirements still need installing

pub mod reconcile;
pub mod requirement;

pub use reconcile::{reconcile, InstalledSnapshot};
pub use requirement::{
    bare_name, normalize_name, parse_requirements, read_requirements, VERSION_OPERATORS,
};
