use tracing::{instrument, warn};

use super::MissingDocumentPolicy;
use crate::errors::IngestError;
use typesense_indexer_repository::SearchIndexClient;
use typesense_indexer_shared::Record;

/// Fetches one document by id.
pub struct DocumentGet {
    client: SearchIndexClient,
    policy: MissingDocumentPolicy,
}

impl DocumentGet {
    pub fn new(client: SearchIndexClient, policy: MissingDocumentPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> MissingDocumentPolicy {
        self.policy
    }

    /// Fetch `document_id` from `collection`.
    ///
    /// Returns `Ok(None)` only under [`MissingDocumentPolicy::Warn`] when the
    /// document does not exist.
    #[instrument(skip(self), fields(policy = %self.policy))]
    pub async fn run(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<Record>, IngestError> {
        match self.client.get(collection, document_id).await {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.is_not_found() => match self.policy {
                MissingDocumentPolicy::Fail => Err(IngestError::NotFound(e.to_string())),
                MissingDocumentPolicy::Warn => {
                    warn!(collection, document_id, "Document not found");
                    Ok(None)
                }
            },
            Err(e) => Err(e.into()),
        }
    }
}
