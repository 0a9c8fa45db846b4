use super::retry::write_error;
use crate::error::AppError;
use crate::models::{AccountKind, ProfileUpdate};
use crate::transport::Transport;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use validator::Validate;

pub const UPDATE_FALLBACK: &str = "Failed to update profile";
pub const UPLOAD_FALLBACK: &str = "Failed to upload photo";
pub const DELETE_FALLBACK: &str = "Failed to delete account";

pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";
pub const IMAGE_FILE_NAME: &str = "profile.jpg";

/// Sends the set fields of `update` and returns the updated profile.
pub async fn update_profile(
    transport: &Transport,
    kind: AccountKind,
    update: &ProfileUpdate,
) -> Result<Value, AppError> {
    update.validate()?;
    transport
        .put(&kind.profile_path(), update)
        .await
        .map(|r| r.into_data())
        .map_err(|e| write_error(e, UPDATE_FALLBACK))
}

/// Uploads the image at `file_uri` as the account's photo (customer) or logo
/// (mechanic) and returns the URL the server stored it under.
///
/// `file_uri` may be a plain path or a `file://` URI.
pub async fn upload_profile_image(
    transport: &Transport,
    kind: AccountKind,
    file_uri: &str,
) -> Result<String, AppError> {
    let path = local_path(file_uri);
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        log::warn!("Could not read image {}: {}", path, e);
        AppError::Request(format!("Could not read image: {}", e))
    })?;

    let field = kind.profile_image_field();
    let part = Part::bytes(bytes)
        .file_name(IMAGE_FILE_NAME)
        .mime_str(IMAGE_CONTENT_TYPE)?;
    let form = Form::new().part(field, part);

    let data = transport
        .patch_multipart(&kind.profile_image_path(), form)
        .await
        .map_err(|e| write_error(e, UPLOAD_FALLBACK))?
        .into_data();

    [field, "url"]
        .iter()
        .find_map(|key| data.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| AppError::Decode("Upload response did not include an image URL".into()))
}

/// Permanently deletes the signed-in account.
pub async fn delete_profile(transport: &Transport, kind: AccountKind) -> Result<(), AppError> {
    transport
        .delete(&kind.profile_path())
        .await
        .map(|_| ())
        .map_err(|e| write_error(e, DELETE_FALLBACK))
}

fn local_path(file_uri: &str) -> &str {
    file_uri.strip_prefix("file://").unwrap_or(file_uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_strips_file_scheme() {
        assert_eq!(local_path("file:///tmp/photo.jpg"), "/tmp/photo.jpg");
        assert_eq!(local_path("/tmp/photo.jpg"), "/tmp/photo.jpg");
    }
}
