//! Traits for records and storage backends
//!
//! `Model` is implemented by every entity type, `Store` by every backend
//! adapter. Hooks are optional capabilities a model can expose.

pub mod capabilities;
pub mod hooks;
pub mod model;
pub mod store;

pub use capabilities::{Capabilities, Capability};
pub use hooks::{AfterSave, BeforeSave};
pub use model::{new_id, Model, Timestamps, WriteKind, ID_FIELD};
pub use store::{Persisted, Store};
