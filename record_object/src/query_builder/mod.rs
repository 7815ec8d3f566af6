//! Backend-agnostic query model
//!
//! Conditions, ordering, projection and aggregation for a pending read. Adapters
//! translate a [`Query`] into their native calls.

pub mod aggregation;
pub mod builder;
pub mod filter;
pub mod ordering;
pub mod pagination;

#[cfg(test)]
mod tests;

pub use aggregation::Aggregation;
pub use builder::Query;
pub use filter::{Condition, LogicalOperator, RelationalOperator};
pub use ordering::{OrderBy, SortOrder};
pub use pagination::{ListCursor, ListOptions};
