//! Aggregate root trait for domain models that own a consistency boundary.

/// Aggregate root marker + minimal interface.
///
/// Kept small so domain modules decide how they model state transitions
/// (pure decision functions, event application, etc.) without pulling in
/// storage concerns.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// For aggregates with an append-only history this is the number of
    /// entries applied so far.
    fn version(&self) -> u64;
}
