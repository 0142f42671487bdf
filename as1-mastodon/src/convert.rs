use as1_model::{
    Activity, Actor, Audience, Context as ActivityContext, Image, Object, ObjectType, Ref, Tag,
    Verb,
};
use as1_source::Adapter;
use lazy_static::lazy_static;
use log::trace;
use scraper::{Html, Selector};

use crate::{Account, Field, MediaAttachment, Mastodon, Status};

const WEB_SITE_FIELD: &str = "Web site";

fn anchor_selector() -> &'static Selector {
    lazy_static! {
        static ref SELECTOR: Selector = Selector::parse("a[href]").unwrap();
    }
    &SELECTOR
}

/// First link target in a profile field's HTML value.
fn field_link(field: &Field) -> Option<String> {
    let value = field.value.as_deref()?;
    let fragment = Html::parse_fragment(value);
    let href = fragment
        .select(anchor_selector())
        .next()?
        .value()
        .attr("href")?
        .trim()
        .to_string();
    Some(href).filter(|href| !href.is_empty())
}

fn media_type(kind: Option<&str>) -> Option<ObjectType> {
    match kind? {
        "image" => Some(ObjectType::Image),
        "video" | "gifv" => Some(ObjectType::Video),
        _ => None,
    }
}

impl Mastodon {
    fn media_to_attachment(&self, media: &MediaAttachment) -> Object {
        let mut attachment = Object {
            object_type: media_type(media.kind.as_deref()),
            id: media.id.as_deref().map(|id| self.tag_uri(id)),
            display_name: media.description.clone(),
            ..Object::default()
        };
        match attachment.object_type {
            Some(ObjectType::Image) => {
                attachment.image = media.url.iter().map(Image::new).collect();
            }
            Some(ObjectType::Video) => {
                attachment.stream = media.url.iter().map(Image::new).collect();
                attachment.image = media.preview_url.iter().map(Image::new).collect();
            }
            _ => {}
        }
        attachment
    }
}

impl Adapter for Mastodon {
    type Post = Status;
    type Actor = Account;

    fn domain(&self) -> &str {
        &self.domain
    }

    /// A status as a note. Boosts carry the boosted toot's content, with a
    /// "Boosted @user:" prefix.
    fn to_object(&self, status: &Status) -> Object {
        let id = match status.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => return Object::default(),
        };
        trace!("converting status {}", id);

        let base = status.reblog.as_deref().unwrap_or(status);
        let mut object = Object {
            object_type: Some(ObjectType::Note),
            id: Some(self.tag_uri(id)),
            url: status.url.clone(),
            published: status.created_at.clone(),
            author: status
                .account
                .as_ref()
                .map(|account| self.to_actor(account))
                .filter(|author| !author.is_empty()),
            ..Object::default()
        };

        object.attachments = base
            .media_attachments
            .iter()
            .map(|media| self.media_to_attachment(media))
            .collect();
        if let Some(first) = object.attachments.first() {
            if first.is_type(ObjectType::Video) {
                object.stream = first.stream.clone();
            } else {
                object.image = first.image.clone();
            }
        }

        let mentions = base.mentions.iter().map(|mention| Tag {
            id: mention.id.as_deref().map(|id| self.tag_uri(id)),
            url: mention.url.clone(),
            display_name: mention.username.clone(),
            ..Tag::new(ObjectType::Mention)
        });
        let hashtags = base.tags.iter().map(|hashtag| Tag {
            url: hashtag.url.clone(),
            display_name: hashtag.name.clone(),
            ..Tag::new(ObjectType::Hashtag)
        });
        object.tags = mentions.chain(hashtags).collect();

        let mut content = base.content.clone().unwrap_or_default();
        if let Some(reblog) = status.reblog.as_deref() {
            if !content.is_empty() {
                let account = reblog.account.clone().unwrap_or_default();
                content = format!(
                    "Boosted <a href=\"{}\">@{}</a>: {}",
                    account.url.unwrap_or_default(),
                    account.username.unwrap_or_default(),
                    content
                );
            }
        }
        if !content.is_empty() {
            object.content = Some(content);
            object.content_is_html = true;
        }

        if let Some(reply_to) = status.in_reply_to_id.as_deref().filter(|id| !id.is_empty()) {
            object.in_reply_to.push(Ref {
                id: Some(self.tag_uri(reply_to)),
                url: Some(self.join(&format!("/web/statuses/{}", reply_to))),
            });
        }

        if let Some(visibility) = status.visibility.as_deref().filter(|v| !v.is_empty()) {
            object.to.push(Audience::group(format!("@{}", visibility)));
        }
        object
    }

    fn to_activity(&self, status: &Status) -> Activity {
        let object = self.to_object(status);
        let mut activity = Activity {
            verb: Verb::Post,
            published: object.published.clone(),
            id: object.id.clone(),
            url: object.url.clone(),
            actor: object.author.clone(),
            context: Some(ActivityContext {
                in_reply_to: object.in_reply_to.clone(),
            })
            .filter(|context| !context.in_reply_to.is_empty()),
            object,
            ..Activity::default()
        };

        if let Some(reblog) = status.reblog.as_deref() {
            activity.object_type = Some(ObjectType::Activity);
            activity.verb = Verb::Share;
            activity.object = self.to_object(reblog);
        }

        if let Some(app) = &status.application {
            activity.generator = Some(Actor {
                display_name: app.name.clone(),
                url: app.website.clone(),
                ..Actor::default()
            })
            .filter(|generator| !generator.is_empty());
        }
        activity
    }

    fn to_actor(&self, account: &Account) -> Actor {
        let username = match account.username.as_deref().filter(|name| !name.is_empty()) {
            Some(username) => username,
            None => return Actor::default(),
        };

        let web_sites: Vec<String> = account
            .fields
            .iter()
            .filter(|field| field.name.as_deref() == Some(WEB_SITE_FIELD))
            .filter_map(field_link)
            .collect();

        let mut actor = Actor {
            id: Some(self.tag_uri(username)),
            numeric_id: account.id.clone(),
            username: Some(username.to_string()),
            display_name: account
                .display_name
                .clone()
                .filter(|name| !name.is_empty())
                .or_else(|| Some(username.to_string())),
            image: account.avatar.clone().map(Image::new),
            published: account.created_at.clone(),
            description: account.note.clone(),
            ..Actor::person()
        };
        actor.set_urls(account.url.clone(), web_sites);
        actor
    }
}
