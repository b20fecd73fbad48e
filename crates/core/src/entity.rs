//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Persisted records (vendors, users, product listings) implement this so
/// storage backends can key them generically.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
