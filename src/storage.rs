//! Profile picture storage on an S3-compatible bucket.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    presigning::PresigningConfig,
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use crate::config::S3Config;

const PICTURE_PREFIX: &str = "profilePictures";

/// One picture per user, overwritten on every upload.
pub fn picture_key(user_id: Uuid) -> String {
    format!("{PICTURE_PREFIX}/{user_id}")
}

/// Where profile pictures live. Keys come from [`picture_key`].
#[async_trait]
pub trait PictureStore: Send + Sync {
    /// Stores the user's picture and returns its object key.
    async fn save(
        &self,
        user_id: Uuid,
        body: Bytes,
        content_type: &str,
    ) -> anyhow::Result<String>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
    /// A time-limited download link for `key`.
    async fn link(&self, key: &str, valid_for: Duration) -> anyhow::Result<String>;
}

#[derive(Clone)]
pub struct S3Pictures {
    client: Client,
    bucket: String,
}

impl S3Pictures {
    pub async fn connect(cfg: &S3Config) -> anyhow::Result<Self> {
        let credentials = Credentials::new(
            &cfg.access_key,
            &cfg.secret_key,
            None,
            None,
            "gymify-env",
        );
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        // MinIO needs path-style addressing
        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        debug!(endpoint = %cfg.endpoint, bucket = %cfg.bucket, "picture bucket configured");
        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
        })
    }
}

#[async_trait]
impl PictureStore for S3Pictures {
    async fn save(
        &self,
        user_id: Uuid,
        body: Bytes,
        content_type: &str,
    ) -> anyhow::Result<String> {
        let key = picture_key(user_id);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .with_context(|| format!("upload {key}"))?;
        Ok(key)
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("delete {key}"))?;
        Ok(())
    }

    async fn link(&self, key: &str, valid_for: Duration) -> anyhow::Result<String> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(PresigningConfig::expires_in(valid_for)?)
            .await
            .with_context(|| format!("presign {key}"))?;
        Ok(presigned.uri().to_string())
    }
}
