use as1_model::{Object, Verb};
use as1_source::{
    base_object, content_for_create, media_refs, truncate, Adapter, CreateOptions,
    CreationResult, IncludeLink, MediaKind, PublishKind, ResolvedTarget, Source, SourceError,
    TruncateOptions,
};
use as1_splice::{escape, linkify};
use log::info;
use serde_json::{json, Value};

use crate::convert::facebook_url;
use crate::{Facebook, API_COMMENTS, API_FEED, API_LIKES, API_PHOTOS};

const SITE: &str = "Facebook";

/// Graph API endpoint for an RSVP verb.
fn rsvp_endpoint(verb: &Verb) -> Option<&'static str> {
    match verb {
        Verb::RsvpYes => Some("attending"),
        Verb::RsvpNo => Some("declined"),
        Verb::RsvpMaybe => Some("maybe"),
        _ => None,
    }
}

fn fb_post_embed(url: &str) -> String {
    format!("<div class=\"fb-post\" data-href=\"{}\"></div>", escape(url))
}

/// Numeric owners make `<owner>_<id>` object ids; user names do not.
fn numeric_owner(target: &ResolvedTarget) -> Option<&str> {
    target
        .owner
        .as_deref()
        .filter(|owner| !owner.is_empty() && owner.chars().all(|c| c.is_ascii_digit()))
}

impl Facebook {
    fn truncate_options() -> TruncateOptions {
        TruncateOptions {
            link_prefix: "\n\n(Originally published at: ".to_string(),
            link_suffix: ")".to_string(),
            ..TruncateOptions::default()
        }
    }

    async fn find_target(
        &self,
        object: &Object,
        noun: &str,
        action: &str,
    ) -> Result<(ResolvedTarget, String), SourceError> {
        let resolver = self.resolver().describe(noun, action);
        let base = base_object(object, self.domain()).ok_or_else(|| resolver.not_found())?;
        let target = resolver.resolve(&base, self).await?;
        let url = base.url.clone().unwrap_or_else(|| facebook_url(&target.id));
        Ok((target, url))
    }

    pub(crate) async fn publish(
        &self,
        object: &Object,
        options: &CreateOptions,
        preview: bool,
    ) -> Result<CreationResult, SourceError> {
        match self.try_publish(object, options, preview).await {
            Ok(result) => Ok(result),
            Err(err) => CreationResult::from_error(err),
        }
    }

    async fn try_publish(
        &self,
        object: &Object,
        options: &CreateOptions,
        preview: bool,
    ) -> Result<CreationResult, SourceError> {
        let kind =
            PublishKind::classify(object).ok_or_else(|| SourceError::unsupported(object, SITE))?;

        match kind {
            PublishKind::Share => Err(SourceError::Refused(
                "Cannot publish shares to Facebook".to_string(),
            )),
            PublishKind::Like => {
                let (target, url) = self.find_target(object, "a Facebook status", "like").await?;
                if preview {
                    return Ok(CreationResult {
                        description: Some(format!(
                            "<span class=\"verb\">like</span> <a href=\"{}\">this post</a>:\n{}",
                            escape(&url),
                            fb_post_embed(&url)
                        )),
                        ..CreationResult::default()
                    });
                }
                let id = match numeric_owner(&target) {
                    Some(owner) => format!("{}_{}", owner, target.id),
                    None => target.id.clone(),
                };
                self.api_post(&API_LIKES.replace("{}", &id), Vec::new()).await?;
                info!("liked {}", id);
                Ok(CreationResult::created(json!({"url": url, "type": "like"})))
            }
            PublishKind::Rsvp(verb) => {
                let endpoint =
                    rsvp_endpoint(&verb).ok_or_else(|| SourceError::unsupported(object, SITE))?;
                let (target, url) = self
                    .find_target(object, "a Facebook event", "RSVP to")
                    .await?;
                if preview {
                    return Ok(CreationResult {
                        description: Some(format!(
                            "<span class=\"verb\">RSVP {}</span> to <a href=\"{}\">this event</a>.",
                            verb.rsvp_value().unwrap_or_default(),
                            escape(&url)
                        )),
                        ..CreationResult::default()
                    });
                }
                self.api_post(&format!("{}/{}", target.id, endpoint), Vec::new())
                    .await?;
                info!("RSVPed {} to event {}", endpoint, target.id);
                Ok(CreationResult::created(json!({"url": url, "type": "rsvp"})))
            }
            PublishKind::Reply => self.publish_comment(object, options, preview).await,
            PublishKind::Post | PublishKind::MediaPost => {
                self.publish_post(object, options, kind, preview).await
            }
        }
    }

    fn message(object: &Object, options: &CreateOptions, content: &str) -> String {
        let include_link = if object.url.is_some() {
            options.include_link
        } else {
            IncludeLink::Omit
        };
        truncate(
            content,
            object.url.as_deref(),
            include_link,
            &Self::truncate_options(),
        )
    }

    async fn publish_comment(
        &self,
        object: &Object,
        options: &CreateOptions,
        preview: bool,
    ) -> Result<CreationResult, SourceError> {
        let content = content_for_create(object, options).ok_or(SourceError::NoContent)?;
        let (target, url) = self
            .find_target(object, "a Facebook status", "reply to")
            .await?;
        let message = Self::message(object, options, &content);

        if preview {
            return Ok(CreationResult::preview(
                linkify(&message),
                format!(
                    "<span class=\"verb\">comment</span> on <a href=\"{}\">this post</a>:\n{}",
                    escape(&url),
                    fb_post_embed(&url)
                ),
            ));
        }

        let created = self
            .api_post(
                &API_COMMENTS.replace("{}", &target.id),
                vec![("message".to_string(), message)],
            )
            .await?;
        let comment_id = created
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let owner_path = target
            .owner
            .as_deref()
            .map(|owner| format!("{}/posts/", owner))
            .unwrap_or_default();
        info!("commented {} on {}", comment_id, target.id);
        Ok(CreationResult::created(json!({
            "id": comment_id,
            "url": facebook_url(&format!("{}{}?comment_id={}", owner_path, target.id, comment_id)),
            "type": "comment",
        })))
    }

    async fn publish_post(
        &self,
        object: &Object,
        options: &CreateOptions,
        kind: PublishKind,
        preview: bool,
    ) -> Result<CreationResult, SourceError> {
        let content = match content_for_create(object, options) {
            Some(content) => content,
            None if kind == PublishKind::MediaPost => String::new(),
            None => return Err(SourceError::NoContent),
        };
        let message = Self::message(object, options, &content);
        let image = media_refs(object)
            .into_iter()
            .find(|media| media.kind == MediaKind::Image);
        if kind == PublishKind::MediaPost && image.is_none() {
            return Err(SourceError::unsupported(object, SITE));
        }

        if preview {
            let mut html = linkify(&message);
            if let Some(image) = &image {
                html.push_str(&format!("<br /><br /><img src=\"{}\" />", escape(&image.url)));
            }
            return Ok(CreationResult::preview(
                html,
                "<span class=\"verb\">post</span>:",
            ));
        }

        let created = match &image {
            Some(image) => {
                self.api_post(
                    API_PHOTOS,
                    vec![
                        ("url".to_string(), image.url.clone()),
                        ("message".to_string(), message),
                    ],
                )
                .await?
            }
            None => {
                self.api_post(API_FEED, vec![("message".to_string(), message)])
                    .await?
            }
        };
        let id = created
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| SourceError::Invalid("created post has no id".to_string()))?;
        info!("created post {}", id);
        Ok(CreationResult::created(json!({
            "id": id,
            "url": facebook_url(id),
            "type": "post",
        })))
    }
}
