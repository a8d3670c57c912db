use mime::Mime;

use crate::remote::{Remote, RemoteError};

const BUCKET: &str = "project-images";

/// Storage key for an uploaded file: `<upload-timestamp>_<original-filename>`.
pub fn object_key(timestamp_ms: i64, filename: &str) -> String {
    format!("{}_{}", timestamp_ms, filename)
}

fn content_type_for(filename: &str) -> Mime {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "svg" => mime::IMAGE_SVG,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

impl Remote {
    /// Upload a file into the project-images bucket under `key`.
    pub async fn upload_image(&self, key: &str, bytes: Vec<u8>) -> Result<(), RemoteError> {
        let response = self
            .http
            .post(format!(
                "{}/storage/v1/object/{}/{}",
                self.base_url, BUCKET, key
            ))
            .header("apikey", &self.anon_key)
            .header("Content-Type", content_type_for(key).as_ref())
            .bearer_auth(self.bearer())
            .body(bytes)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    /// Public URL of an uploaded object. Derived locally, no round-trip.
    pub fn public_image_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, BUCKET, key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_joins_timestamp_and_filename() {
        assert_eq!(object_key(1764418760000, "photo.png"), "1764418760000_photo.png");
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(content_type_for("1_photo.png"), mime::IMAGE_PNG);
        assert_eq!(content_type_for("shot.JPG"), mime::IMAGE_JPEG);
        assert_eq!(content_type_for("anim.gif"), mime::IMAGE_GIF);
        assert_eq!(content_type_for("noextension"), mime::APPLICATION_OCTET_STREAM);
        assert_eq!(content_type_for("weird.webp"), mime::APPLICATION_OCTET_STREAM);
    }
}
