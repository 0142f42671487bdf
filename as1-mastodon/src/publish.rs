use as1_model::Object;
use as1_source::{
    base_object, content_for_create, media_refs, truncate, upload_all, Adapter, CreateOptions,
    CreationResult, IncludeLink, MediaKind, PublishKind, RequestBody, ResolvedTarget, Source,
    SourceError, TruncateOptions,
};
use as1_splice::{escape, linkify};
use log::info;
use serde_json::{json, Map, Value};

use crate::{Mastodon, API_FAVORITE, API_REBLOG, API_STATUSES};

/// Toot length limit.
pub const MAX_STATUS_LENGTH: usize = 500;
/// Every link counts as this many characters, however long it is.
pub const LINK_LENGTH: usize = 23;

const SITE: &str = "Mastodon";

impl Mastodon {
    fn truncate_options() -> TruncateOptions {
        TruncateOptions {
            limit: Some(MAX_STATUS_LENGTH),
            link_length: Some(LINK_LENGTH),
            ..TruncateOptions::default()
        }
    }

    /// Native id and url of the toot `object` acts on, for `action`.
    async fn find_target(
        &self,
        object: &Object,
        action: &str,
    ) -> Result<(ResolvedTarget, String), SourceError> {
        let resolver = self
            .resolver()
            .describe(format!("a toot on {}", self.domain()), action);
        let base = base_object(object, self.domain()).ok_or_else(|| resolver.not_found())?;
        let target = resolver.resolve(&base, self).await?;
        let url = base
            .url
            .clone()
            .or_else(|| {
                target
                    .object
                    .as_ref()
                    .and_then(|found| found.get("url"))
                    .and_then(Value::as_str)
                    .map(String::from)
            })
            .unwrap_or_else(|| self.join(&format!("/web/statuses/{}", target.id)));
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
            PublishKind::Like => {
                let (target, url) = self.find_target(object, "favorite").await?;
                if preview {
                    return Ok(reaction_preview("favorite", &url));
                }
                let created = self
                    .api_post(&API_FAVORITE.replace("{}", &target.id), RequestBody::Empty)
                    .await?;
                info!("favorited toot {}", target.id);
                Ok(CreationResult::created(with_defaults(created, "like", &url)))
            }
            PublishKind::Share => {
                let (target, url) = self.find_target(object, "boost").await?;
                if preview {
                    return Ok(reaction_preview("boost", &url));
                }
                let created = self
                    .api_post(&API_REBLOG.replace("{}", &target.id), RequestBody::Empty)
                    .await?;
                info!("boosted toot {}", target.id);
                Ok(CreationResult::created(with_defaults(created, "repost", &url)))
            }
            PublishKind::Post
            | PublishKind::MediaPost
            | PublishKind::Reply
            | PublishKind::Rsvp(_) => self.publish_status(object, options, kind, preview).await,
        }
    }

    async fn publish_status(
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

        let reply_to = if kind == PublishKind::Reply {
            Some(self.find_target(object, "reply to").await?)
        } else {
            None
        };

        let include_link = if object.url.is_some() {
            options.include_link
        } else {
            IncludeLink::Omit
        };
        let content = truncate(
            &content,
            object.url.as_deref(),
            include_link,
            &Self::truncate_options(),
        );

        if preview {
            let description = match &reply_to {
                Some((_, url)) => format!(
                    "<span class=\"verb\">reply</span> to <a href=\"{}\">this toot</a>:",
                    escape(url)
                ),
                None => "<span class=\"verb\">toot</span>:".to_string(),
            };
            return Ok(CreationResult::preview(
                status_preview(&content, object),
                description,
            ));
        }

        let mut data = Map::new();
        data.insert("status".to_string(), Value::String(content));
        if let Some((target, _)) = &reply_to {
            data.insert("in_reply_to_id".to_string(), Value::String(target.id.clone()));
        }
        let media_ids = upload_all(self, &media_refs(object)).await?;
        if !media_ids.is_empty() {
            data.insert("media_ids".to_string(), json!(media_ids));
        }

        let created = self
            .api_post(API_STATUSES, RequestBody::Json(Value::Object(data)))
            .await?;
        info!(
            "created toot {}",
            created.get("id").and_then(Value::as_str).unwrap_or_default()
        );
        let base_url = reply_to.map(|(_, url)| url).unwrap_or_default();
        Ok(CreationResult::created(with_defaults(created, "post", &base_url)))
    }
}

fn reaction_preview(verb: &str, url: &str) -> CreationResult {
    CreationResult {
        description: Some(format!(
            "<span class=\"verb\">{}</span> <a href=\"{}\">this toot</a>.",
            verb,
            escape(url)
        )),
        ..CreationResult::default()
    }
}

/// Linkified text, then videos and images.
fn status_preview(content: &str, object: &Object) -> String {
    let media = media_refs(object);
    let videos = media
        .iter()
        .filter(|media| media.kind == MediaKind::Video)
        .map(|video| {
            format!(
                "<video controls src=\"{url}\"><a href=\"{url}\">this video</a></video>",
                url = escape(&video.url)
            )
        });
    let images = media
        .iter()
        .filter(|media| media.kind == MediaKind::Image)
        .map(|image| {
            format!(
                "<img src=\"{}\" alt=\"{}\" />",
                escape(&image.url),
                escape(image.alt_text.as_deref().unwrap_or_default())
            )
        });
    let previews: Vec<String> = videos.chain(images).collect();

    let mut html = linkify(content);
    if !previews.is_empty() {
        html.push_str("<br /><br />");
        html.push_str(&previews.join(" &nbsp; "));
    }
    html
}

/// Adds `type`, and `url` when the instance left it out.
fn with_defaults(created: Value, kind: &str, url: &str) -> Value {
    let mut created = match created {
        Value::Object(created) => created,
        _ => Map::new(),
    };
    created.insert("type".to_string(), Value::String(kind.to_string()));
    let has_url = created
        .get("url")
        .and_then(Value::as_str)
        .map_or(false, |url| !url.is_empty());
    if !has_url && !url.is_empty() {
        created.insert("url".to_string(), Value::String(url.to_string()));
    }
    Value::Object(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mastodon;
    use as1_source::testing::MockTransport;
    use as1_source::{HttpResponse, Method};

    fn object(value: Value) -> Object {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_toot() {
        let transport = MockTransport::new().with_post(
            "http://foo.com/api/v1/statuses",
            200,
            json!({"id": "123", "url": "http://foo.com/@snarfed/123"}),
        );
        let mastodon = mastodon(&transport);
        let note = object(json!({"objectType": "note", "content": "foo ☕ bar"}));

        let result = mastodon
            .create(&note, &CreateOptions::default())
            .await
            .unwrap();
        assert_eq!(
            result.content,
            Some(json!({"id": "123", "url": "http://foo.com/@snarfed/123", "type": "post"}))
        );
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].body, RequestBody::Json(json!({"status": "foo ☕ bar"})));

        let preview = mastodon
            .preview_create(&note, &CreateOptions::default())
            .await
            .unwrap();
        assert_eq!(preview.content_str(), Some("foo ☕ bar"));
        assert_eq!(
            preview.description.as_deref(),
            Some("<span class=\"verb\">toot</span>:")
        );
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_create_reply() {
        let transport = MockTransport::new().with_post(
            "http://foo.com/api/v1/statuses",
            200,
            json!({"id": "456", "url": "http://foo.com/@snarfed/456"}),
        );
        let mastodon = mastodon(&transport);
        let reply = object(json!({
            "objectType": "comment",
            "content": "i agree",
            "inReplyTo": [{"url": "http://foo.com/@alice/123"}],
        }));

        let preview = mastodon
            .preview_create(&reply, &CreateOptions::default())
            .await
            .unwrap();
        assert_eq!(
            preview.description.as_deref(),
            Some("<span class=\"verb\">reply</span> to <a href=\"http://foo.com/@alice/123\">this toot</a>:")
        );

        mastodon
            .create(&reply, &CreateOptions::default())
            .await
            .unwrap();
        assert_eq!(
            transport.calls()[0].body,
            RequestBody::Json(json!({"status": "i agree", "in_reply_to_id": "123"}))
        );
    }

    #[tokio::test]
    async fn test_create_invite_is_a_toot() {
        let transport = MockTransport::new().with_post(
            "http://foo.com/api/v1/statuses",
            200,
            json!({"id": "789", "url": "http://foo.com/@snarfed/789"}),
        );
        let mastodon = mastodon(&transport);
        let invite = object(json!({
            "objectType": "activity",
            "verb": "invite",
            "content": "come to the party",
            "object": [{"objectType": "person", "displayName": "Alice"}],
        }));
        assert_eq!(
            PublishKind::classify(&invite),
            Some(PublishKind::Rsvp(as1_model::Verb::Invite))
        );

        let result = mastodon
            .create(&invite, &CreateOptions::default())
            .await
            .unwrap();
        assert!(!result.abort);
        assert_eq!(
            result.content,
            Some(json!({"id": "789", "url": "http://foo.com/@snarfed/789", "type": "post"}))
        );
        assert_eq!(
            transport.calls()[0].body,
            RequestBody::Json(json!({"status": "come to the party"}))
        );
    }

    #[tokio::test]
    async fn test_reply_to_other_instance_aborts() {
        let transport = MockTransport::new();
        let reply = object(json!({
            "objectType": "comment",
            "content": "i agree",
            "inReplyTo": [{"url": "http://bar.com/@alice/123"}],
        }));
        let result = mastodon(&transport)
            .create(&reply, &CreateOptions::default())
            .await
            .unwrap();
        assert!(result.abort);
        assert_eq!(
            result.error_plain.as_deref(),
            Some("Could not find a toot on foo.com to reply to.")
        );
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_favorite_and_boost() {
        let transport = MockTransport::new()
            .with_post("http://foo.com/api/v1/statuses/123/favourite", 200, json!({"id": "123"}))
            .with_post(
                "http://foo.com/api/v1/statuses/123/reblog",
                200,
                json!({"id": "999", "url": "http://foo.com/@snarfed/999"}),
            );
        let mastodon = mastodon(&transport);
        let like = object(json!({
            "objectType": "activity",
            "verb": "like",
            "object": {"url": "http://foo.com/@alice/123"},
        }));
        let share = object(json!({
            "objectType": "activity",
            "verb": "share",
            "object": {"url": "http://foo.com/@alice/123"},
        }));

        let preview = mastodon
            .preview_create(&like, &CreateOptions::default())
            .await
            .unwrap();
        assert_eq!(
            preview.description.as_deref(),
            Some("<span class=\"verb\">favorite</span> <a href=\"http://foo.com/@alice/123\">this toot</a>.")
        );
        assert_eq!(preview.content, None);

        let liked = mastodon.create(&like, &CreateOptions::default()).await.unwrap();
        assert_eq!(
            liked.content,
            Some(json!({"id": "123", "type": "like", "url": "http://foo.com/@alice/123"}))
        );
        let boosted = mastodon.create(&share, &CreateOptions::default()).await.unwrap();
        assert_eq!(
            boosted.content,
            Some(json!({"id": "999", "type": "repost", "url": "http://foo.com/@snarfed/999"}))
        );
        assert_eq!(
            transport.urls(),
            vec![
                "http://foo.com/api/v1/statuses/123/favourite",
                "http://foo.com/api/v1/statuses/123/reblog",
            ]
        );
    }

    #[tokio::test]
    async fn test_favorite_by_id_looks_up_status() {
        let transport = MockTransport::new()
            .with_get(
                "http://foo.com/api/v1/statuses/123",
                200,
                json!({"id": "123", "url": "http://foo.com/@alice/123"}),
            )
            .with_post("http://foo.com/api/v1/statuses/123/favourite", 200, json!({"id": "123"}));
        let like = object(json!({
            "objectType": "activity",
            "verb": "like",
            "object": {"id": "tag:foo.com,2013:123"},
        }));
        let result = mastodon(&transport)
            .create(&like, &CreateOptions::default())
            .await
            .unwrap();
        assert_eq!(
            result.content,
            Some(json!({"id": "123", "type": "like", "url": "http://foo.com/@alice/123"}))
        );
    }

    #[tokio::test]
    async fn test_boost_missing_target_aborts() {
        let share = object(json!({
            "objectType": "activity",
            "verb": "share",
            "object": {"url": "http://elsewhere.com/post"},
        }));
        let result = mastodon(&MockTransport::new())
            .preview_create(&share, &CreateOptions::default())
            .await
            .unwrap();
        assert!(result.abort);
        assert_eq!(
            result.error_plain.as_deref(),
            Some("Could not find a toot on foo.com to boost.")
        );
    }

    #[tokio::test]
    async fn test_media_post() {
        let transport = MockTransport::new()
            .with_response(Method::Get, "http://pics/a.jpg", HttpResponse::new(200, "a"))
            .with_response(Method::Get, "http://pics/b.mp4", HttpResponse::new(200, "b"))
            .with_response(
                Method::Post,
                "http://foo.com/api/v1/media",
                HttpResponse::from_json(200, &json!({"id": "img"})),
            )
            .with_response(
                Method::Post,
                "http://foo.com/api/v1/media",
                HttpResponse::from_json(200, &json!({"id": "vid"})),
            )
            .with_post("http://foo.com/api/v1/statuses", 200, json!({"id": "1"}));
        let mastodon = mastodon(&transport);
        let note = object(json!({
            "objectType": "note",
            "stream": {"url": "http://pics/b.mp4"},
            "image": {"url": "http://pics/a.jpg", "displayName": "a cat"},
        }));

        let preview = mastodon
            .preview_create(&note, &CreateOptions::default())
            .await
            .unwrap();
        assert_eq!(
            preview.content_str(),
            Some("<br /><br /><video controls src=\"http://pics/b.mp4\"><a href=\"http://pics/b.mp4\">this video</a></video> &nbsp; <img src=\"http://pics/a.jpg\" alt=\"a cat\" />")
        );

        mastodon.create(&note, &CreateOptions::default()).await.unwrap();
        let calls = transport.calls();
        assert_eq!(
            calls.iter().map(|call| call.url.as_str()).collect::<Vec<_>>(),
            vec![
                "http://pics/a.jpg",
                "http://foo.com/api/v1/media",
                "http://pics/b.mp4",
                "http://foo.com/api/v1/media",
                "http://foo.com/api/v1/statuses",
            ]
        );
        assert_eq!(
            calls[4].body,
            RequestBody::Json(json!({"status": "", "media_ids": ["img", "vid"]}))
        );
    }

    #[tokio::test]
    async fn test_truncate_with_link() {
        let transport = MockTransport::new()
            .with_post("http://foo.com/api/v1/statuses", 200, json!({"id": "1"}));
        let note = object(json!({
            "objectType": "note",
            "url": "http://my.blog/a/very/long/permalink/that/counts/as/twenty/three",
            "content": "word ".repeat(120),
        }));
        let options = CreateOptions {
            include_link: IncludeLink::IfTruncated,
            ..CreateOptions::default()
        };
        mastodon(&transport).create(&note, &options).await.unwrap();

        let status = match &transport.calls()[0].body {
            RequestBody::Json(data) => data["status"].as_str().unwrap().to_string(),
            other => panic!("expected json, got {:?}", other),
        };
        assert!(status.ends_with("… (http://my.blog/a/very/long/permalink/that/counts/as/twenty/three)"), "{}", status);
        let text = status.split(" (http").next().unwrap();
        assert!(text.chars().count() <= MAX_STATUS_LENGTH - LINK_LENGTH - 3);
    }

    #[tokio::test]
    async fn test_no_content_and_unsupported() {
        let mastodon = mastodon(&MockTransport::new());
        let empty = mastodon
            .create(&object(json!({"objectType": "note"})), &CreateOptions::default())
            .await
            .unwrap();
        assert!(!empty.abort);
        assert_eq!(empty.error_plain.as_deref(), Some("No content text found."));

        let event = mastodon
            .create(&object(json!({"objectType": "event", "content": "party"})), &CreateOptions::default())
            .await
            .unwrap();
        assert!(!event.abort);
        assert_eq!(
            event.error_plain.as_deref(),
            Some("Cannot publish type=event, verb=None to Mastodon")
        );
    }
}
