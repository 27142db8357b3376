//! Entity definitions shared by the service and server crates.
//!
//! Records are plain serde structs persisted as JSON arrays; validation
//! helpers live next to the entity they guard.

pub mod errors;
pub mod post;
pub mod user;

/// Allocate the next integer id for a collection: `max + 1`, or 1 when empty.
pub fn next_id<I>(ids: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    ids.into_iter().max().map_or(1, |max| max + 1)
}
