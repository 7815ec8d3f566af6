//! Document collection setup

use crate::core::ActiveHaus;
use crate::errors::ActiveHausError;
use record_object::Model;
use record_object::naming::model_name;
use tracing::debug;

impl ActiveHaus {
    /// Create the document store collection for `M`
    /// If recreate is true, drops the existing collection first
    pub async fn ensure_collection<M: Model>(&self, recreate: bool) -> Result<(), ActiveHausError> {
        let collection = model_name::<M>();
        debug!("[MIGRATE] {} (recreate: {})", collection, recreate);
        self.document_client()?
            .create_collection(collection, recreate)
            .await?;
        Ok(())
    }
}
