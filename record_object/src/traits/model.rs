//! Record model trait and timestamps

use super::hooks::{AfterSave, BeforeSave};
use crate::validation::Validation;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// JSON key every backend stores the record identifier under
pub const ID_FIELD: &str = "id";

/// A fresh random identifier for records that do not bring their own
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Whether a save inserts a new record or updates a persisted one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
}

/// Creation and update times.
///
/// `created_at` is set once on the first save; `updated_at` stays empty until
/// the record is saved again. Adapters read this pair to choose insert or
/// update semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Timestamps {
    pub fn is_persisted(&self) -> bool {
        self.created_at.is_some()
    }

    pub fn write_kind(&self) -> WriteKind {
        if self.updated_at.is_some() {
            WriteKind::Update
        } else {
            WriteKind::Insert
        }
    }

    /// Stamp `now` as the creation time of a new record or the update time of
    /// a persisted one
    pub fn touch(&mut self, now: DateTime<Utc>) -> WriteKind {
        if self.created_at.is_none() {
            self.created_at = Some(now);
            WriteKind::Insert
        } else {
            self.updated_at = Some(now);
            WriteKind::Update
        }
    }
}

/// An entity that can be promoted to an active record.
///
/// Usually derived with `#[derive(Record)]`. The serialized form must keep the
/// identifier under [`ID_FIELD`] and flatten [`Timestamps`] into the document.
pub trait Model: Clone + Send + Sync + Debug + Serialize + DeserializeOwned + 'static {
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn timestamps(&self) -> &Timestamps;

    fn timestamps_mut(&mut self) -> &mut Timestamps;

    /// Register rule failures for the current field values
    fn validate(&self, validation: &mut Validation);

    /// Overrides the collection name derived from the type name
    fn custom_model_name() -> Option<&'static str>
    where
        Self: Sized,
    {
        None
    }

    fn before_save_hook(&mut self) -> Option<&mut dyn BeforeSave> {
        None
    }

    fn after_save_hook(&mut self) -> Option<&mut dyn AfterSave> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_touch_sets_created_then_updated() {
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let mut timestamps = Timestamps::default();

        assert_eq!(timestamps.touch(first), WriteKind::Insert);
        assert_eq!(timestamps.created_at, Some(first));
        assert_eq!(timestamps.updated_at, None);
        assert_eq!(timestamps.write_kind(), WriteKind::Insert);

        assert_eq!(timestamps.touch(second), WriteKind::Update);
        assert_eq!(timestamps.created_at, Some(first));
        assert_eq!(timestamps.updated_at, Some(second));
        assert_eq!(timestamps.write_kind(), WriteKind::Update);
    }

    #[test]
    fn test_empty_timestamps_are_not_serialized() {
        let json = serde_json::to_value(Timestamps::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));

        let parsed: Timestamps =
            serde_json::from_value(serde_json::json!({"created_at": "2024-01-01T00:00:00Z"})).unwrap();
        assert!(parsed.is_persisted());
        assert!(parsed.updated_at.is_none());
    }
}
