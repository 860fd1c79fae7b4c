use std::sync::Arc;

use ember_content::PostContent;
use ember_storage::{StorageError, StorageReader};
use ember_types::ContentAddress;

use crate::error::FetchError;

/// Resolves content addresses to parsed post content.
///
/// No retry policy is imposed here; callers decide. When an address carries
/// an embedded digest, the fetched bytes are verified against it before
/// parsing — opaque addresses from external networks are trusted as-is,
/// since there is nothing to check them against.
pub struct ContentFetcher<R> {
    reader: Arc<R>,
    verify_digests: bool,
}

impl<R: StorageReader> ContentFetcher<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            reader,
            verify_digests: true,
        }
    }

    /// Disable digest verification, trusting the read path unconditionally.
    pub fn trusting(reader: Arc<R>) -> Self {
        Self {
            reader,
            verify_digests: false,
        }
    }

    /// Fetch and parse the content behind an address.
    pub async fn fetch(&self, address: &ContentAddress) -> Result<PostContent, FetchError> {
        let bytes = self.reader.get(address).await.map_err(|e| match e {
            StorageError::NotFound => FetchError::NotFound,
            other => FetchError::Transport(other.to_string()),
        })?;

        if self.verify_digests {
            if let Some(expected) = address.digest() {
                if *blake3::hash(&bytes).as_bytes() != expected {
                    return Err(FetchError::IntegrityMismatch);
                }
            }
        }

        PostContent::from_bytes(&bytes).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use ember_storage::StorageResult;

    use super::*;

    /// Reader that serves fixed bytes for every address.
    struct FixedReader {
        response: StorageResult<Vec<u8>>,
    }

    #[async_trait]
    impl StorageReader for FixedReader {
        async fn get(&self, _address: &ContentAddress) -> StorageResult<Vec<u8>> {
            self.response.clone()
        }
    }

    fn fetcher(response: StorageResult<Vec<u8>>) -> ContentFetcher<FixedReader> {
        ContentFetcher::new(Arc::new(FixedReader { response }))
    }

    const GOOD_JSON: &[u8] = br#"{"title":"t","content":"c"}"#;

    #[tokio::test]
    async fn valid_content_parses() {
        let address = ContentAddress::from_bytes(GOOD_JSON);
        let content = fetcher(Ok(GOOD_JSON.to_vec())).fetch(&address).await.unwrap();
        assert_eq!(content.title, "t");
    }

    #[tokio::test]
    async fn expired_content_is_not_found_not_transport() {
        let address = ContentAddress::from_bytes(GOOD_JSON);
        let err = fetcher(Err(StorageError::NotFound)).fetch(&address).await.unwrap_err();
        assert_eq!(err, FetchError::NotFound);
    }

    #[tokio::test]
    async fn transport_failure_is_distinct_from_not_found() {
        let address = ContentAddress::from_bytes(GOOD_JSON);
        let err = fetcher(Err(StorageError::Transport("timeout".into())))
            .fetch(&address)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn unparseable_bytes_are_malformed_not_a_fetch_failure() {
        let bytes = b"not json at all".to_vec();
        let address = ContentAddress::from_bytes(&bytes);
        let err = fetcher(Ok(bytes)).fetch(&address).await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn digest_mismatch_is_caught() {
        // Address derived from different bytes than the reader serves.
        let address = ContentAddress::from_bytes(b"what was certified");
        let err = fetcher(Ok(GOOD_JSON.to_vec())).fetch(&address).await.unwrap_err();
        assert_eq!(err, FetchError::IntegrityMismatch);
    }

    #[tokio::test]
    async fn opaque_addresses_skip_verification() {
        let address = ContentAddress::new("opaque-external-token").unwrap();
        let content = fetcher(Ok(GOOD_JSON.to_vec())).fetch(&address).await.unwrap();
        assert_eq!(content.content, "c");
    }

    #[tokio::test]
    async fn trusting_mode_skips_verification_entirely() {
        let address = ContentAddress::from_bytes(b"something else");
        let fetcher = ContentFetcher::trusting(Arc::new(FixedReader {
            response: Ok(GOOD_JSON.to_vec()),
        }));
        assert!(fetcher.fetch(&address).await.is_ok());
    }
}
