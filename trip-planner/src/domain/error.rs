//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from provider/IO errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,

    /// A leg starts before the previous leg started
    #[error("leg {0} starts before the previous leg")]
    UnorderedLegs(usize),

    /// A leg ends before it starts
    #[error("leg {0} ends before it starts")]
    NegativeLeg(usize),
}
