//! Active record core
//!
//! Binds a [`Model`](crate::traits::Model) value to a backend adapter and a
//! pending query. Save, find and delete go straight to the adapter; the
//! fluent builder collects a query that `run` hands to the adapter's search.

pub mod core;


pub use self::core::{ActiveRecord, Promote};
