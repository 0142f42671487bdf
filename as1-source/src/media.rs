use as1_model::Object;
use async_trait::async_trait;
use log::info;

use crate::SourceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// One piece of media to upload before a post is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaRef {
    pub url: String,
    pub alt_text: Option<String>,
    pub kind: MediaKind,
}

/// Images first, then videos, each in object order. Entries without a url
/// are skipped.
pub fn media_refs(object: &Object) -> Vec<MediaRef> {
    let images = object.image.iter().map(|image| (image, MediaKind::Image));
    let videos = object.stream.iter().map(|stream| (stream, MediaKind::Video));
    images
        .chain(videos)
        .filter_map(|(media, kind)| {
            Some(MediaRef {
                url: media.url.clone()?,
                alt_text: media.display_name.clone(),
                kind,
            })
        })
        .collect()
}

#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Uploads the media at `url` and returns the platform's media id.
    async fn upload(&self, url: &str, alt_text: Option<&str>) -> Result<String, SourceError>;
}

/// Uploads each ref in turn. Ids come back in the same order as `media`.
pub async fn upload_all(
    uploader: &dyn MediaUploader,
    media: &[MediaRef],
) -> Result<Vec<String>, SourceError> {
    let mut ids = Vec::with_capacity(media.len());
    for item in media {
        let id = uploader.upload(&item.url, item.alt_text.as_deref()).await?;
        info!("uploaded {} as media {}", item.url, id);
        ids.push(id);
    }
    Ok(ids)
}
