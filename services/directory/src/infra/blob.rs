//! S3-backed [`BlobStore`].

use std::future::Future;
use std::time::Duration;

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};

use crate::domain::repository::BlobStore;
use crate::domain::types::{BlobRef, StoredBlob};
use crate::error::DirectoryError;

#[derive(Clone)]
pub struct S3BlobStore {
    pub client: aws_sdk_s3::Client,
    pub bucket: String,
    /// Upper bound for every single S3 request; paginated listings bound each page.
    pub timeout: Duration,
}

impl S3BlobStore {
    /// Build a client from the default AWS credential chain for `region`.
    pub async fn connect(bucket: String, region: String, timeout: Duration) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region))
            .load()
            .await;
        Self {
            client: aws_sdk_s3::Client::new(&config),
            bucket,
            timeout,
        }
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T, DirectoryError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(DirectoryError::Storage(e.context(op))),
            Err(_) => Err(DirectoryError::Storage(anyhow::anyhow!(
                "{op} timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

fn sdk_error(e: impl std::error::Error) -> anyhow::Error {
    anyhow::anyhow!("{}", DisplayErrorContext(e))
}

impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        key: &BlobRef,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobRef, DirectoryError> {
        self.bounded("put object", async {
            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(key.as_str())
                .body(ByteStream::from(bytes))
                .content_type(content_type)
                // Conditional write: an existing key fails with 412 instead of being replaced.
                .if_none_match("*")
                .send()
                .await
                .map_err(sdk_error)?;
            Ok(())
        })
        .await?;
        tracing::debug!(blob_ref = %key, "blob stored");
        Ok(key.clone())
    }

    async fn delete(&self, key: &BlobRef) -> Result<(), DirectoryError> {
        self.bounded("delete object", async {
            self.client
                .delete_object()
                .bucket(&self.bucket)
                .key(key.as_str())
                .send()
                .await
                .map_err(sdk_error)?;
            Ok(())
        })
        .await
    }

    async fn presigned_url(&self, key: &BlobRef, ttl: Duration) -> Result<String, DirectoryError> {
        self.bounded("presign object", async {
            let presigning = PresigningConfig::expires_in(ttl)?;
            let request = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key.as_str())
                .presigned(presigning)
                .await
                .map_err(sdk_error)?;
            Ok(request.uri().to_string())
        })
        .await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredBlob>, DirectoryError> {
        let mut blobs = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take());
            // One bound per page; a large bucket only needs each page to be timely.
            let output = self
                .bounded("list objects", async {
                    request.send().await.map_err(sdk_error)
                })
                .await?;
            for object in output.contents() {
                let Some(key) = object.key() else { continue };
                // Objects without a timestamp count as fresh so the sweep leaves them alone.
                let last_modified = object
                    .last_modified()
                    .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()))
                    .unwrap_or_else(Utc::now);
                blobs.push(StoredBlob {
                    key: BlobRef(key.to_owned()),
                    last_modified,
                });
            }
            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_owned());
                }
                _ => break,
            }
        }
        Ok(blobs)
    }
}
