use anyhow::{Context as _, bail};
use tracing::info;
use uuid::Uuid;

use crate::client::{ServiceClient, Session, service_error};

pub const AVATAR_BUCKET: &str = "avatars";
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Content type for a supported image file name, keyed by its extension.
pub fn image_content_type(file_name: &str) -> Option<(&'static str, &'static str)> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some(("png", "image/png")),
        "jpg" | "jpeg" => Some(("jpg", "image/jpeg")),
        "webp" => Some(("webp", "image/webp")),
        "gif" => Some(("gif", "image/gif")),
        _ => None,
    }
}

/// Each user owns exactly one avatar object, overwritten on upload.
pub fn avatar_object_path(user_id: Uuid, extension: &str) -> String {
    format!("{user_id}/avatar.{extension}")
}

impl ServiceClient {
    pub fn public_object_url(&self, bucket: &str, path: &str) -> String {
        self.config
            .endpoint(&format!("storage/v1/object/public/{bucket}/{path}"))
    }

    /// Upload a profile image for the signed-in user and return its public URL.
    pub async fn upload_avatar(
        &self,
        session: &Session,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<String> {
        let Some((extension, content_type)) = image_content_type(file_name) else {
            bail!("unsupported image type for `{file_name}` (use png, jpg, webp or gif)");
        };
        if bytes.is_empty() {
            bail!("image file `{file_name}` is empty");
        }
        if bytes.len() > MAX_AVATAR_BYTES {
            bail!(
                "image file `{file_name}` is {} bytes; the limit is {MAX_AVATAR_BYTES}",
                bytes.len()
            );
        }

        let path = avatar_object_path(session.user_id(), extension);
        let size = bytes.len();
        let response = self
            .with_key(self.http.post(
                self.config
                    .endpoint(&format!("storage/v1/object/{AVATAR_BUCKET}/{path}")),
            ))
            .bearer_auth(&session.access_token)
            .header("content-type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .context("avatar upload request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(service_error(status, response).await.into());
        }

        info!(user_id = %session.user_id(), size, "avatar uploaded");
        Ok(self.public_object_url(AVATAR_BUCKET, &path))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{AVATAR_BUCKET, avatar_object_path, image_content_type};
    use crate::{ServiceClient, ServiceConfig};

    #[test]
    fn supported_image_types() {
        assert_eq!(image_content_type("me.PNG"), Some(("png", "image/png")));
        assert_eq!(image_content_type("a.b.jpeg"), Some(("jpg", "image/jpeg")));
        assert_eq!(image_content_type("face.webp"), Some(("webp", "image/webp")));
        assert_eq!(image_content_type("notes.txt"), None);
        assert_eq!(image_content_type("noextension"), None);
    }

    #[test]
    fn public_urls_point_at_the_bucket() {
        let client =
            ServiceClient::new(ServiceConfig::new("https://example.test", "anon").unwrap())
                .unwrap();
        let user_id = Uuid::nil();
        let path = avatar_object_path(user_id, "png");

        assert_eq!(
            client.public_object_url(AVATAR_BUCKET, &path),
            format!("https://example.test/storage/v1/object/public/avatars/{user_id}/avatar.png")
        );
    }
}
