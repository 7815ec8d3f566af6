//! Lifecycle hooks
//!
//! A model opts into a hook by implementing the trait and returning itself from
//! the matching [`Model`](super::Model) capability query.

/// Runs before validation on every save. An error aborts the save.
pub trait BeforeSave {
    fn before_save(&mut self) -> anyhow::Result<()>;
}

/// Runs after a successful write. Errors are logged, never returned.
pub trait AfterSave {
    fn after_save(&mut self) -> anyhow::Result<()>;
}
