use as1_model::{Object, ObjectType, Ref, Verb};
use as1_ref::{domain_from_link, TagUri};
use as1_splice::{html_to_text, linkify};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SourceError;

/// What a create call should do, derived from `(objectType, verb)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublishKind {
    Post,
    MediaPost,
    Reply,
    Like,
    Share,
    Rsvp(Verb),
}

impl PublishKind {
    /// `None` when no platform could publish this object.
    pub fn classify(object: &Object) -> Option<PublishKind> {
        let is_reply = !object.in_reply_to.is_empty();
        let has_media = !object.image.is_empty() || !object.stream.is_empty();
        let is_post_verb = matches!(object.verb, None | Some(Verb::Post));

        match (object.object_type.as_ref(), object.verb.as_ref()) {
            (Some(ObjectType::Activity), Some(Verb::Like)) => Some(PublishKind::Like),
            (Some(ObjectType::Activity), Some(Verb::Share)) => Some(PublishKind::Share),
            (_, Some(verb)) if verb.is_rsvp() || *verb == Verb::Invite => {
                Some(PublishKind::Rsvp(verb.clone()))
            }
            (Some(ObjectType::Comment), _) if is_post_verb => Some(PublishKind::Reply),
            (Some(ObjectType::Note | ObjectType::Article) | None, _) if is_post_verb && is_reply => {
                Some(PublishKind::Reply)
            }
            (Some(ObjectType::Note | ObjectType::Article), _) if is_post_verb && has_media => {
                Some(PublishKind::MediaPost)
            }
            (Some(ObjectType::Note | ObjectType::Article), _) if is_post_verb => {
                Some(PublishKind::Post)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeLink {
    #[default]
    Omit,
    Include,
    IfTruncated,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateOptions {
    pub include_link: IncludeLink,
    /// Publish plain text only, with whitespace collapsed.
    pub ignore_formatting: bool,
}

/// Outcome of `create` or `preview_create`.
///
/// For a create, `content` is the platform's answer (at least `id`, `url`
/// and `type`). For a preview, `content` is an HTML rendering and
/// `description` says what would happen.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CreationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub abort: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_plain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_html: Option<String>,
}

impl CreationResult {
    pub fn created(content: Value) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn preview(content: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            content: Some(Value::String(content.into())),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn error(abort: bool, plain: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            abort,
            error_plain: Some(plain.into()),
            error_html: Some(html.into()),
            ..Self::default()
        }
    }

    /// User-facing failures become results; anything else stays an error.
    ///
    /// Missing targets and refused kinds abort, so the caller does not try
    /// again elsewhere. Unsupported kinds and missing content do not.
    pub fn from_error(err: SourceError) -> Result<Self, SourceError> {
        let abort = match &err {
            SourceError::TargetNotFound { .. } | SourceError::Refused(_) => true,
            SourceError::UnsupportedPublishType { .. } | SourceError::NoContent => false,
            _ => return Err(err),
        };
        let plain = err.to_string();
        let html = linkify(&plain);
        Ok(Self::error(abort, plain, html))
    }

    pub fn is_error(&self) -> bool {
        self.error_plain.is_some()
    }

    pub fn content_str(&self) -> Option<&str> {
        self.content.as_ref().and_then(Value::as_str)
    }
}

/// The object a reply, like, share or RSVP acts on, when it lives on
/// `domain`. Reply targets are checked before `object`.
pub fn base_object(object: &Object, domain: &str) -> Option<Ref> {
    object
        .in_reply_to
        .iter()
        .cloned()
        .chain(object.object.iter().map(Object::to_ref))
        .find(|target| !target.is_empty() && is_on_domain(target, domain))
}

fn is_on_domain(target: &Ref, domain: &str) -> bool {
    let domain = domain.to_lowercase();
    let by_id = target
        .id
        .as_deref()
        .and_then(|id| TagUri::from_string(id.to_string()).ok())
        .map(|tag| tag.domain().to_lowercase());
    let by_url = target.url.as_deref().and_then(domain_from_link);
    by_id
        .into_iter()
        .chain(by_url)
        .any(|candidate| candidate == domain || candidate.ends_with(&format!(".{}", domain)))
}

/// Text to publish for `object`: `summary`, else `content`, else
/// `displayName`. HTML content is flattened to text.
pub fn content_for_create(object: &Object, options: &CreateOptions) -> Option<String> {
    let content = object.content.as_deref().map(|content| {
        if object.content_is_html {
            html_to_text(content)
        } else {
            content.to_string()
        }
    });
    let text = object
        .summary
        .clone()
        .filter(|summary| !summary.trim().is_empty())
        .or(content.filter(|content| !content.trim().is_empty()))
        .or_else(|| object.display_name.clone())?;

    let text = if options.ignore_formatting {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        text.trim().to_string()
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
