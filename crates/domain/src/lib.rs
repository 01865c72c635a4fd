//! Domain model for the impermanent loss tracker.
//!
//! Holds the value types shared by every other crate and the pure math:
//! - Token positions and pairs
//! - Price points and loss samples
//! - Constant-product rebalancing
//! - Impermanent loss calculation

/// Entities with identity (positions, pairs, samples).
pub mod entities;
/// Enumerations.
pub mod enums;
/// Domain errors.
pub mod error;
/// Pool math.
pub mod math;
/// Loss metrics.
pub mod metrics;
/// Known networks and their tokens.
pub mod networks;
/// Value objects.
pub mod value_objects;

pub use error::{CalculationError, DomainError};
