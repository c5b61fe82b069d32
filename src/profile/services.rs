use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use crate::state::AppState;

/// Presigned picture links stay valid for half an hour.
pub const PICTURE_LINK_TTL: Duration = Duration::from_secs(30 * 60);

pub struct UploadItem<'a> {
    pub body: Bytes,
    pub content_type: &'a str,
}

/// Any `image/*` type. Parameters such as `; charset=..` are ignored.
pub fn is_supported_image(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    match essence.split_once('/') {
        Some((kind, subtype)) => kind.eq_ignore_ascii_case("image") && !subtype.is_empty(),
        None => false,
    }
}

/// Stores the picture and returns its object key.
pub async fn upload_picture(
    st: &AppState,
    user_id: Uuid,
    image: UploadItem<'_>,
) -> anyhow::Result<String> {
    anyhow::ensure!(!image.body.is_empty(), "empty picture");
    st.pictures
        .save(user_id, image.body, image.content_type)
        .await
        .with_context(|| format!("save picture of {user_id}"))
}

pub async fn presign_picture(st: &AppState, key: &str) -> anyhow::Result<String> {
    st.pictures
        .link(key, PICTURE_LINK_TTL)
        .await
        .with_context(|| format!("presign url for key {}", key))
}

#[cfg(test)]
mod picture_tests {
    use super::*;

    #[test]
    fn supported_image_types() {
        assert!(is_supported_image("image/jpeg"));
        assert!(is_supported_image("image/jpg"));
        assert!(is_supported_image("image/png"));
        assert!(is_supported_image("image/webp"));
        assert!(is_supported_image("image/heic"));
        assert!(is_supported_image("image/gif"));
        assert!(is_supported_image("image/heif"));
        assert!(is_supported_image("Image/BMP; name=x.bmp"));
        assert!(!is_supported_image("image/"));
        assert!(!is_supported_image("image"));
        assert!(!is_supported_image("application/octet-stream"));
        assert!(!is_supported_image("text/html"));
    }

    #[tokio::test]
    async fn upload_and_presign_use_the_same_key() {
        let state = AppState::fake();
        let user = Uuid::new_v4();
        let key = upload_picture(
            &state,
            user,
            UploadItem {
                body: Bytes::from_static(b"\x89PNG"),
                content_type: "image/png",
            },
        )
        .await
        .unwrap();
        assert_eq!(key, crate::storage::picture_key(user));

        let url = presign_picture(&state, &key).await.unwrap();
        assert!(url.ends_with(&key));
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let state = AppState::fake();
        let err = upload_picture(
            &state,
            Uuid::new_v4(),
            UploadItem {
                body: Bytes::new(),
                content_type: "image/png",
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("empty picture"));
    }
}
