//! # User Endpoints
//!
//! User service client: registration, profile lookup, avatar upload.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use shared::{RegistrationRequest, UserProfile};

use super::client::ApiClient;
use crate::core::error::ApiError;
use crate::core::service::UserService;

/// Client for `/users/*`
#[derive(Clone)]
pub struct UserClient {
    api: ApiClient,
}

impl UserClient {
    pub fn new(root: &ApiClient) -> Self {
        Self {
            api: root.scoped("users"),
        }
    }
}

/// Guess an image MIME type from the file extension.
fn image_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl UserService for UserClient {
    #[tracing::instrument(skip(self, request), fields(username = %request.username))]
    async fn register(&self, request: &RegistrationRequest) -> Result<UserProfile, ApiError> {
        self.api
            .send_json(self.api.request(Method::POST, "register").json(request))
            .await
    }

    async fn get_user(&self, user_id: i64) -> Result<UserProfile, ApiError> {
        self.api
            .send_json(self.api.request(Method::GET, &user_id.to_string()))
            .await
    }

    async fn upload_avatar(&self, file_name: String, bytes: Vec<u8>) -> Result<UserProfile, ApiError> {
        let mime = image_mime(&file_name);
        tracing::info!(file_name = %file_name, size = bytes.len(), mime, "Uploading avatar");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| ApiError::Validation(format!("Invalid file type: {}", e)))?;
        let form = Form::new().part("file", part);

        self.api
            .send_json(self.api.request(Method::POST, "me/avatar").multipart(form))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime("me.PNG"), "image/png");
        assert_eq!(image_mime("photo.jpeg"), "image/jpeg");
        assert_eq!(image_mime("noext"), "application/octet-stream");
    }
}
