use as1_model::{
    Activity, Actor, Audience, Image, Location, Object, ObjectType, Ref, Replies, Tag, Verb,
};
use as1_source::Adapter;
use as1_splice::utf16_span;
use chrono::DateTime;
use log::trace;

use crate::{Action, Comment, Event, Facebook, MessageTag, Post, Privacy, Rsvp, User, DOMAIN};

const FACEBOOK_URL: &str = "https://facebook.com/";

pub(crate) fn facebook_url(path: &str) -> String {
    format!("{}{}", FACEBOOK_URL, path)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// `2012-03-04T18:20:37+0000` as RFC 3339. Unparseable times pass through.
pub(crate) fn normalize_time(time: &str) -> String {
    DateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S%z")
        .map(|parsed| parsed.to_rfc3339())
        .unwrap_or_else(|_| time.to_string())
}

fn normalized(time: &Option<String>) -> Option<String> {
    non_empty(time).map(normalize_time)
}

/// Whitespace-separated tokens that look like http(s) urls.
fn url_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| token.starts_with("http://") || token.starts_with("https://"))
        .map(String::from)
        .collect()
}

fn message_tag_type(kind: Option<&str>) -> ObjectType {
    match kind {
        Some("event") => ObjectType::Event,
        Some("group") => ObjectType::Group,
        _ => ObjectType::Person,
    }
}

/// `actions` links, such as "See Original", as article tags.
fn action_tags(actions: &[Action]) -> impl Iterator<Item = Tag> + '_ {
    actions.iter().map(|action| Tag {
        display_name: action.name.clone(),
        url: action.link.clone(),
        ..Tag::new(ObjectType::Article)
    })
}

fn audience(privacy: Option<&Privacy>) -> Vec<Audience> {
    privacy
        .map(|privacy| Audience::from_privacy(privacy.value.as_deref()))
        .into_iter()
        .collect()
}

fn named_location(id: Option<String>, name: Option<String>) -> Location {
    let mut location = Location::new();
    location.id = id;
    location.display_name = name;
    location
}

/// Verb and wording for an RSVP status.
fn rsvp_verb(status: Option<&str>) -> Option<(Verb, &'static str)> {
    match status? {
        "attending" => Some((Verb::RsvpYes, "is attending.")),
        "declined" => Some((Verb::RsvpNo, "is not attending.")),
        "unsure" => Some((Verb::RsvpMaybe, "might attend.")),
        "not_replied" => Some((Verb::Invite, "is invited.")),
        _ => None,
    }
}

impl Facebook {
    fn person_tag(&self, user: &User) -> Option<Tag> {
        let id = non_empty(&user.id)?;
        Some(Tag {
            id: Some(self.tag_uri(id)),
            url: Some(facebook_url(id)),
            display_name: user.name.clone(),
            ..Tag::new(ObjectType::Person)
        })
    }

    /// A message tag, spanned over `text` in code points.
    fn message_tag(&self, tag: &MessageTag, text: &str) -> Tag {
        let mut converted = Tag {
            id: non_empty(&tag.id).map(|id| self.tag_uri(id)),
            url: non_empty(&tag.id).map(facebook_url),
            display_name: tag.name.clone(),
            ..Tag::new(message_tag_type(tag.kind.as_deref()))
        };
        if let (Some(offset), Some(length)) = (tag.offset, tag.length) {
            let (start, length) = utf16_span(text, offset, length);
            converted = converted.with_span(start, length);
        }
        converted
    }

    fn like_tag(&self, post_id: &str, post_url: &str, user: &User) -> Option<Tag> {
        let user_id = non_empty(&user.id)?;
        let name = user.name.clone().unwrap_or_default();
        Some(Tag {
            id: Some(self.tag_uri(&format!("{}_liked_by_{}", post_id, user_id))),
            url: Some(post_url.to_string()),
            verb: Some(Verb::Like),
            object: vec![Ref::from_url(post_url)],
            author: Some(self.to_actor(user)).filter(|author| !author.is_empty()),
            display_name: Some(format!("{} likes this.", name).trim_start().to_string()),
            content: Some("likes this.".to_string()),
            ..Tag::new(ObjectType::Activity)
        })
    }

    /// A comment on a post or event. Ids are `<parent>_<comment>`; the url
    /// names `post_author_id` when given.
    pub fn comment_to_object(&self, comment: &Comment, post_author_id: Option<&str>) -> Object {
        let id = match non_empty(&comment.id) {
            Some(id) => id,
            None => return Object::default(),
        };
        trace!("converting comment {}", id);
        let (post_id, comment_part) = id.split_once('_').unwrap_or((id, id));
        let author_path = post_author_id
            .filter(|author| !author.is_empty())
            .map(|author| format!("{}/posts/", author))
            .unwrap_or_default();

        let text = comment.message.clone().unwrap_or_default();
        let tags = comment
            .message_tags
            .0
            .iter()
            .map(|tag| self.message_tag(tag, &text))
            .chain(action_tags(&comment.actions))
            .collect();

        Object {
            object_type: Some(ObjectType::Comment),
            id: Some(self.tag_uri(id)),
            url: Some(facebook_url(&format!(
                "{}{}?comment_id={}",
                author_path, post_id, comment_part
            ))),
            in_reply_to: vec![Ref::from_id(self.tag_uri(post_id))],
            author: comment
                .from
                .as_ref()
                .map(|user| self.to_actor(user))
                .filter(|author| !author.is_empty()),
            content: comment.message.clone().filter(|message| !message.is_empty()),
            published: normalized(&comment.created_time),
            to: audience(comment.privacy.as_ref()),
            tags,
            ..Object::default()
        }
    }

    /// An RSVP row as an activity object. With `event`, the RSVP gets an id
    /// and url, and invites get the event owner as actor.
    pub fn rsvp_to_object(&self, rsvp: &Rsvp, event: Option<&Event>) -> Object {
        let (verb, text) = match rsvp_verb(rsvp.rsvp_status.as_deref()) {
            Some(found) => found,
            None => return Object::default(),
        };
        let user = User {
            id: rsvp.id.clone(),
            name: rsvp.name.clone(),
            ..User::default()
        };
        let person = self.to_actor(&user);

        let rsvp_value = verb.rsvp_value();
        let mut object = Object {
            object_type: Some(ObjectType::Activity),
            verb: Some(verb),
            display_name: Some(
                format!("{} {}", rsvp.name.as_deref().unwrap_or_default(), text)
                    .trim_start()
                    .to_string(),
            ),
            ..Object::default()
        };
        match rsvp_value {
            Some(value) => {
                object.content = Some(format!(
                    "<data class=\"p-rsvp\" value=\"{}\">{}</data>",
                    value, text
                ));
                object.content_is_html = true;
                object.actor = Some(person).filter(|actor| !actor.is_empty());
            }
            None => {
                object.content = Some(text.to_string());
                object.object = vec![Object {
                    object_type: Some(ObjectType::Person),
                    id: person.id.clone(),
                    url: person.url.clone(),
                    display_name: person.display_name.clone(),
                    image: person.image.clone().into_iter().collect(),
                    ..Object::default()
                }];
                object.actor = event
                    .and_then(|event| event.owner.as_ref())
                    .map(|owner| self.to_actor(owner))
                    .filter(|actor| !actor.is_empty());
            }
        }

        if let (Some(event_id), Some(user_id)) =
            (event.and_then(|event| non_empty(&event.id)), non_empty(&rsvp.id))
        {
            object.id = Some(self.tag_uri(&format!("{}_rsvp_{}", event_id, user_id)));
            object.url = Some(facebook_url(&format!("{}#{}", event_id, user_id)));
        }
        object
    }

    /// An event, with its comments as replies and, given `rsvps`, its guest
    /// lists.
    pub fn event_to_object(&self, event: &Event, rsvps: &[Rsvp]) -> Object {
        let mut object = Object {
            object_type: Some(ObjectType::Event),
            id: non_empty(&event.id).map(|id| self.tag_uri(id)),
            url: non_empty(&event.id).map(facebook_url),
            display_name: event.name.clone(),
            author: event
                .owner
                .as_ref()
                .map(|owner| self.to_actor(owner))
                .filter(|author| !author.is_empty()),
            image: event
                .picture
                .as_ref()
                .and_then(|picture| picture.data.as_ref())
                .and_then(|data| data.url.clone())
                .map(Image::new)
                .into_iter()
                .collect(),
            content: event.description.clone(),
            location: non_empty(&event.location)
                .map(|name| named_location(None, Some(name.to_string()))),
            start_time: event.start_time.clone(),
            end_time: event.end_time.clone(),
            updated: normalized(&event.updated_time),
            ..Object::default()
        };
        if let Some(privacy) = &event.privacy {
            object.to.push(Audience::from_privacy(Some(privacy)));
        }

        if let Some(comments) = &event.comments {
            let event_id = event.id.as_deref().unwrap_or_default();
            let items: Vec<Activity> = comments
                .data
                .iter()
                .map(|comment| {
                    let mut comment = comment.clone();
                    let prefixed = non_empty(&comment.id)
                        .filter(|id| !id.contains('_'))
                        .map(|id| format!("{}_{}", event_id, id));
                    if prefixed.is_some() {
                        comment.id = prefixed;
                    }
                    Activity::from_object(self.comment_to_object(&comment, None))
                })
                .collect();
            if !items.is_empty() {
                object.replies = Some(Replies {
                    total_items: Some(items.len() as u64),
                    items,
                });
            }
        }

        for rsvp in rsvps {
            let converted = self.rsvp_to_object(rsvp, Some(event));
            match converted.verb {
                Some(Verb::RsvpYes) => object.attending.extend(converted.actor),
                Some(Verb::RsvpNo) => object.not_attending.extend(converted.actor),
                Some(Verb::RsvpMaybe) => object.maybe_attending.extend(converted.actor),
                Some(Verb::Invite) => {
                    let user = User {
                        id: rsvp.id.clone(),
                        name: rsvp.name.clone(),
                        ..User::default()
                    };
                    object.invited.push(Actor {
                        object_type: Some(ObjectType::Person),
                        ..self.to_actor(&user)
                    });
                }
                _ => {}
            }
        }
        object
    }

    pub fn event_to_activity(&self, event: &Event, rsvps: &[Rsvp]) -> Activity {
        let object = self.event_to_object(event, rsvps);
        Activity {
            id: object.id.clone(),
            url: object.url.clone(),
            object,
            ..Activity::default()
        }
    }
}

impl Adapter for Facebook {
    type Post = Post;
    type Actor = User;

    fn domain(&self) -> &str {
        DOMAIN
    }

    /// A post as a note, or an image for photo posts. Message text stays
    /// plain; message tags carry code point spans into it.
    fn to_object(&self, post: &Post) -> Object {
        let id = match non_empty(&post.id) {
            Some(id) => id,
            None => return Object::default(),
        };
        trace!("converting post {}", id);
        let post_id = id.split_once('_').map_or(id, |(_, post_id)| post_id);
        let author_id = post.from.as_ref().and_then(|from| non_empty(&from.id));
        let url = match author_id {
            Some(author_id) => facebook_url(&format!("{}/posts/{}", author_id, post_id)),
            None => facebook_url(post_id),
        };

        let is_photo = post.kind.as_deref() == Some("photo");
        let content = non_empty(&post.message)
            .or_else(|| non_empty(&post.story))
            .or_else(|| {
                non_empty(&post.name).filter(|_| non_empty(&post.link).is_none())
            })
            .map(String::from);
        let object_type = if is_photo || (content.is_none() && non_empty(&post.picture).is_some()) {
            ObjectType::Image
        } else {
            ObjectType::Note
        };

        let mut object = Object {
            object_type: Some(object_type),
            id: Some(self.tag_uri(post_id)),
            url: Some(url.clone()),
            author: post
                .from
                .as_ref()
                .map(|user| self.to_actor(user))
                .filter(|author| !author.is_empty()),
            content,
            image: non_empty(&post.picture).map(Image::new).into_iter().collect(),
            published: normalized(&post.created_time),
            updated: normalized(&post.updated_time),
            to: audience(post.privacy.as_ref()),
            ..Object::default()
        };

        if let Some(link) = non_empty(&post.link) {
            object.attachments.push(Object {
                object_type: Some(if is_photo {
                    ObjectType::Image
                } else {
                    ObjectType::Article
                }),
                url: Some(link.to_string()),
                display_name: post.name.clone(),
                summary: post.caption.clone(),
                content: post.description.clone(),
                image: non_empty(&post.picture)
                    .map(|picture| Image::new(picture.replace("_s.", "_o.")))
                    .into_iter()
                    .collect(),
                ..Object::default()
            });
        }

        if let Some(place) = &post.place {
            let mut location = named_location(place.id.clone(), place.name.clone());
            location.url = non_empty(&place.id).map(facebook_url);
            if let Some(coordinates) = &place.location {
                if let (Some(latitude), Some(longitude)) =
                    (coordinates.latitude, coordinates.longitude)
                {
                    location.set_coordinates(latitude, longitude);
                }
            }
            object.location = Some(location).filter(|location| !location.is_empty());
        }

        let text = post.message.clone().unwrap_or_default();
        let people = post
            .to
            .iter()
            .chain(post.with_tags.iter())
            .flat_map(|page| page.data.iter())
            .filter_map(|user| self.person_tag(user));
        let mentions = post
            .message_tags
            .0
            .iter()
            .map(|tag| self.message_tag(tag, &text));
        let likes = post
            .likes
            .iter()
            .flat_map(|page| page.data.iter())
            .filter_map(|user| self.like_tag(post_id, &url, user));
        object.tags = people
            .chain(mentions)
            .chain(action_tags(&post.actions))
            .chain(likes)
            .collect();

        if let Some(comments) = &post.comments {
            let items: Vec<Activity> = comments
                .data
                .iter()
                .map(|comment| Activity::from_object(self.comment_to_object(comment, None)))
                .collect();
            if !items.is_empty() {
                object.replies = Some(Replies {
                    total_items: comments.count.or(Some(items.len() as u64)),
                    items,
                });
            }
        }
        object
    }

    fn to_activity(&self, post: &Post) -> Activity {
        let object = self.to_object(post);
        Activity {
            verb: Verb::Post,
            id: object.id.clone(),
            url: object.url.clone(),
            published: object.published.clone(),
            updated: object.updated.clone(),
            actor: object.author.clone(),
            generator: post.application.as_ref().and_then(|app| {
                Some(Actor {
                    display_name: app.name.clone(),
                    id: non_empty(&app.id).map(|id| self.tag_uri(id)),
                    ..Actor::default()
                })
                .filter(|generator| !generator.is_empty())
            }),
            object,
            ..Activity::default()
        }
    }

    /// Website urls win over the profile link; the profile page is the last
    /// resort.
    fn to_actor(&self, user: &User) -> Actor {
        let handle = match non_empty(&user.username).or_else(|| non_empty(&user.id)) {
            Some(handle) => handle,
            None => return Actor::default(),
        };

        let mut urls: Vec<String> = user
            .website
            .as_deref()
            .map(url_tokens)
            .unwrap_or_default()
            .into_iter()
            .map(|url| url.trim_end_matches('/').to_string())
            .collect();
        if urls.is_empty() {
            urls = user.link.as_deref().map(url_tokens).unwrap_or_default();
        }
        if urls.is_empty() {
            urls.push(facebook_url(handle));
        }

        let mut actor = Actor {
            id: Some(self.tag_uri(handle)),
            numeric_id: user.id.clone(),
            username: user.username.clone(),
            display_name: user.name.clone(),
            image: Some(Image::new(format!(
                "http://graph.facebook.com/{}/picture?type=large",
                handle
            ))),
            description: user.bio.clone(),
            updated: normalized(&user.updated_time),
            location: user
                .location
                .as_ref()
                .map(|location| named_location(location.id.clone(), location.name.clone()))
                .filter(|location| !location.is_empty()),
            ..Actor::default()
        };
        let mut urls = urls.into_iter();
        let primary = urls.next();
        actor.set_urls(primary, urls);
        actor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{comment, event, facebook, post, rsvps, tag_uri};
    use as1_source::parse_native;
    use as1_source::testing::MockTransport;
    use serde_json::{json, Value};

    fn rsvp_list() -> Vec<Rsvp> {
        parse_native::<Vec<Rsvp>>(&rsvps())
    }

    fn actor_json(id: &str, name: &str) -> Value {
        json!({
            "id": tag_uri(id),
            "numeric_id": id,
            "displayName": name,
            "url": format!("https://facebook.com/{}", id),
            "image": {"url": format!("http://graph.facebook.com/{}/picture?type=large", id)},
        })
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(
            normalize_time("2012-03-04T18:20:37+0000"),
            "2012-03-04T18:20:37+00:00"
        );
        assert_eq!(
            normalize_time("2014-01-29T18:30:00-0800"),
            "2014-01-29T18:30:00-08:00"
        );
        assert_eq!(normalize_time("yesterday"), "yesterday");
    }

    #[test]
    fn test_user_to_actor() {
        let facebook = facebook(&MockTransport::new());
        let actor = facebook.actor_from_json(&json!({
            "id": "212038",
            "name": "Ryan Barrett",
            "link": "http://www.facebook.com/snarfed.org",
            "username": "snarfed.org",
            "location": {"id": "123", "name": "San Francisco, California"},
            "updated_time": "2012-01-06T02:11:04+0000",
            "bio": "something about me",
            "website": "https://snarfed.org/",
        }));
        assert_eq!(
            serde_json::to_value(&actor).unwrap(),
            json!({
                "displayName": "Ryan Barrett",
                "image": {"url": "http://graph.facebook.com/snarfed.org/picture?type=large"},
                "id": tag_uri("snarfed.org"),
                "numeric_id": "212038",
                "updated": "2012-01-06T02:11:04+00:00",
                "url": "https://snarfed.org",
                "username": "snarfed.org",
                "description": "something about me",
                "location": {"id": "123", "displayName": "San Francisco, California"},
            })
        );
    }

    #[test]
    fn test_user_url_fallbacks() {
        let facebook = facebook(&MockTransport::new());
        let actor = facebook.actor_from_json(&json!({
            "username": "snarfed.org",
            "link": "http://www.facebook.com/snarfed.org",
        }));
        assert_eq!(actor.url.as_deref(), Some("http://www.facebook.com/snarfed.org"));

        let actor = facebook.actor_from_json(&json!({"username": "snarfed.org"}));
        assert_eq!(actor.url.as_deref(), Some("https://facebook.com/snarfed.org"));
        assert!(facebook.actor_from_json(&json!({"name": "nobody"})).is_empty());
    }

    #[test]
    fn test_user_multiple_urls() {
        let facebook = facebook(&MockTransport::new());
        let actor = facebook.actor_from_json(&json!({
            "id": "123",
            "website": "\nx\nhttp://a\ny.com\nhttp://b http://c",
            "link": "http://x",
        }));
        assert_eq!(actor.url.as_deref(), Some("http://a"));
        assert_eq!(actor.all_urls(), vec!["http://a", "http://b", "http://c"]);

        let actor = facebook.actor_from_json(&json!({
            "id": "123",
            "link": "http://b http://c\thttp://a",
        }));
        assert_eq!(actor.all_urls(), vec!["http://b", "http://c", "http://a"]);
    }

    #[test]
    fn test_post_to_activity() {
        let facebook = facebook(&MockTransport::new());
        let activity = facebook.activity_from_json(&post());
        let author = actor_json("212038", "Ryan Barrett");
        let post_url = "https://facebook.com/212038/posts/10100176064482163";

        let activity = serde_json::to_value(&activity).unwrap();
        assert_eq!(activity["verb"], "post");
        assert_eq!(activity["id"], json!(tag_uri("10100176064482163")));
        assert_eq!(activity["url"], post_url);
        assert_eq!(activity["published"], "2012-03-04T18:20:37+00:00");
        assert_eq!(activity["updated"], "2012-03-04T19:08:16+00:00");
        assert_eq!(activity["actor"], author);
        assert_eq!(
            activity["generator"],
            json!({"displayName": "Facebook for Android", "id": tag_uri("350685531728")})
        );

        let object = &activity["object"];
        assert_eq!(object["objectType"], "image");
        assert_eq!(object["author"], author);
        assert_eq!(
            object["image"],
            json!([{"url": "https://fbcdn-photos-a.akamaihd.net/abc_xyz_s.jpg"}])
        );
        assert_eq!(
            object["attachments"],
            json!([{
                "objectType": "image",
                "url": "http://my.link/",
                "displayName": "my link name",
                "summary": "my link caption",
                "content": "my link description",
                "image": [{"url": "https://fbcdn-photos-a.akamaihd.net/abc_xyz_o.jpg"}],
            }])
        );
        assert_eq!(object["to"], json!([{"objectType": "group", "alias": "@public"}]));
        assert_eq!(object["location"]["displayName"], "Lake Merced");
        assert_eq!(object["location"]["url"], "https://facebook.com/113785468632283");
        assert_eq!(object["location"]["position"], "+37.728194-122.493364/");
        assert_eq!(object["replies"]["totalItems"], 1);
        assert_eq!(
            object["replies"]["items"][0]["object"]["url"],
            "https://facebook.com/547822715231468?comment_id=6796480"
        );
    }

    #[test]
    fn test_post_tags() {
        let facebook = facebook(&MockTransport::new());
        let object = facebook.object_from_json(&post());
        let tags = serde_json::to_value(&object.tags).unwrap();
        let person = |id: &str, name: &str| {
            json!({
                "objectType": "person",
                "id": tag_uri(id),
                "url": format!("https://facebook.com/{}", id),
                "displayName": name,
            })
        };
        // Friend 2 is both addressed and tagged, and stays twice
        assert_eq!(tags[0], person("234", "Friend 1"));
        assert_eq!(tags[1], person("345", "Friend 2"));
        assert_eq!(tags[2], person("345", "Friend 2"));
        assert_eq!(tags[3], person("456", "Friend 3"));
        assert_eq!(
            tags[4],
            json!({
                "objectType": "event",
                "id": tag_uri("283938455011303"),
                "url": "https://facebook.com/283938455011303",
                "displayName": "Super Happy Block Party Hackathon",
                "startIndex": 83,
                "length": 33,
            })
        );
        assert_eq!(tags[5]["startIndex"], 124);
        assert_eq!(
            tags[6],
            json!({
                "objectType": "activity",
                "id": tag_uri("10100176064482163_liked_by_100004"),
                "url": "https://facebook.com/212038/posts/10100176064482163",
                "verb": "like",
                "object": [{"url": "https://facebook.com/212038/posts/10100176064482163"}],
                "author": actor_json("100004", "Alice X"),
                "displayName": "Alice X likes this.",
                "content": "likes this.",
            })
        );
        assert_eq!(object.tags.len(), 8);
    }

    #[test]
    fn test_message_tag_offsets_are_utf16() {
        let facebook = facebook(&MockTransport::new());
        let object = facebook.object_from_json(&json!({
            "id": "1",
            "message": "😀 cc Sam G",
            "message_tags": [{"id": "221330", "name": "Sam G", "offset": 6, "length": 5}],
        }));
        assert_eq!(object.tags[0].span(), Some((5, 5)));
    }

    #[test]
    fn test_content_fallbacks() {
        let facebook = facebook(&MockTransport::new());
        let story = facebook.object_from_json(&json!({"id": "101", "story": "Once upon a time."}));
        assert_eq!(story.content.as_deref(), Some("Once upon a time."));
        assert_eq!(story.object_type, Some(ObjectType::Note));

        let name = facebook.object_from_json(&json!({"id": "101", "name": "Once upon a time."}));
        assert_eq!(name.content.as_deref(), Some("Once upon a time."));

        let picture = facebook.object_from_json(&json!({
            "id": "445566",
            "picture": "http://its/a/picture",
        }));
        assert_eq!(
            serde_json::to_value(&picture).unwrap(),
            json!({
                "objectType": "image",
                "id": tag_uri("445566"),
                "url": "https://facebook.com/445566",
                "image": [{"url": "http://its/a/picture"}],
            })
        );
        assert!(facebook.object_from_json(&json!({})).is_empty());
    }

    #[test]
    fn test_comment_to_object() {
        let facebook = facebook(&MockTransport::new());
        let object = facebook.comment_to_object(&parse_native(&comment()), None);
        assert_eq!(
            serde_json::to_value(&object).unwrap(),
            json!({
                "objectType": "comment",
                "author": actor_json("212038", "Ryan Barrett"),
                "content": "cc Sam G, Michael M",
                "id": tag_uri("547822715231468_6796480"),
                "published": "2012-12-05T00:58:26+00:00",
                "url": "https://facebook.com/547822715231468?comment_id=6796480",
                "inReplyTo": [{"id": tag_uri("547822715231468")}],
                "to": [{"objectType": "group", "alias": "@private", "displayName": "FRIENDS"}],
                "tags": [{
                    "objectType": "person",
                    "id": tag_uri("221330"),
                    "url": "https://facebook.com/221330",
                    "displayName": "Sam G",
                    "startIndex": 3,
                    "length": 5,
                }, {
                    "objectType": "person",
                    "id": tag_uri("695687650"),
                    "url": "https://facebook.com/695687650",
                    "displayName": "Michael Mandel",
                    "startIndex": 10,
                    "length": 9,
                }],
            })
        );

        let object = facebook.comment_to_object(
            &parse_native(&json!({
                "id": "124561947600007_672819",
                "message": "Foo bar!",
                "privacy": {"value": ""},
                "actions": [{"name": "See Original", "link": "http://ald.com/foobar"}],
            })),
            Some("my-author"),
        );
        assert_eq!(
            object.url.as_deref(),
            Some("https://facebook.com/my-author/posts/124561947600007?comment_id=672819")
        );
        assert_eq!(object.to, vec![Audience::public()]);
        assert_eq!(object.tags[0].object_type, Some(ObjectType::Article));
        assert_eq!(object.tags[0].url.as_deref(), Some("http://ald.com/foobar"));
        assert!(facebook.comment_to_object(&Comment::default(), None).is_empty());
    }

    #[test]
    fn test_rsvp_to_object() {
        let facebook = facebook(&MockTransport::new());
        let rsvps = rsvp_list();
        let objects: Vec<Object> = rsvps
            .iter()
            .map(|rsvp| facebook.rsvp_to_object(rsvp, None))
            .collect();
        assert_eq!(objects[0].verb, Some(Verb::RsvpYes));
        assert_eq!(
            objects[0].content.as_deref(),
            Some("<data class=\"p-rsvp\" value=\"yes\">is attending.</data>")
        );
        assert_eq!(objects[1].display_name.as_deref(), Some("Ryan B is not attending."));
        assert_eq!(objects[2].verb, Some(Verb::RsvpMaybe));
        assert_eq!(objects[3].verb, Some(Verb::Invite));
        assert_eq!(objects[3].content.as_deref(), Some("is invited."));
        assert_eq!(objects[3].actor, None);
        assert_eq!(objects[3].object[0].display_name.as_deref(), Some("Bar"));
        assert!(objects.iter().all(|object| object.id.is_none()));

        let event: Event = parse_native(&event());
        let invite = facebook.rsvp_to_object(&rsvps[3], Some(&event));
        assert_eq!(invite.id, Some(tag_uri("145304994_rsvp_654")));
        assert_eq!(invite.url.as_deref(), Some("https://facebook.com/145304994#654"));
        assert_eq!(
            serde_json::to_value(&invite.actor).unwrap(),
            actor_json("11500", "Aaron P")
        );
    }

    #[test]
    fn test_event_to_activity() {
        let facebook = facebook(&MockTransport::new());
        let event: Event = parse_native(&event());
        let activity = facebook.event_to_activity(&event, &rsvp_list());
        assert_eq!(activity.id, Some(tag_uri("145304994")));
        assert_eq!(activity.url.as_deref(), Some("https://facebook.com/145304994"));

        let object = serde_json::to_value(&activity.object).unwrap();
        assert_eq!(object["objectType"], "event");
        assert_eq!(object["displayName"], "Homebrew Website Club");
        assert_eq!(object["author"], actor_json("11500", "Aaron P"));
        assert_eq!(object["location"], json!({"displayName": "PDX"}));
        assert_eq!(object["startTime"], "2014-01-29T18:30:00-0800");
        assert_eq!(object["updated"], "2014-01-22T01:29:15+00:00");
        assert_eq!(object["to"], json!([{"objectType": "group", "alias": "@public"}]));
        assert_eq!(
            object["image"],
            json!([{"url": "https://fbcdn-sphotos-a-a.akamaihd.net/abc/pic_n.jpg?xyz"}])
        );
        let reply = &object["replies"]["items"][0]["object"];
        assert_eq!(reply["id"], json!(tag_uri("145304994_777")));
        assert_eq!(reply["url"], "https://facebook.com/145304994?comment_id=777");
        assert_eq!(reply["inReplyTo"], json!([{"id": tag_uri("145304994")}]));

        assert_eq!(object["attending"], json!([actor_json("11500", "Aaron P")]));
        assert_eq!(object["notAttending"], json!([actor_json("212038", "Ryan B")]));
        assert_eq!(object["maybeAttending"], json!([actor_json("987", "Foo")]));
        let mut invited = actor_json("654", "Bar");
        invited["objectType"] = json!("person");
        assert_eq!(object["invited"], json!([invited]));

        let empty = facebook.event_to_object(&Event::default(), &[]);
        assert_eq!(empty, Object::new(ObjectType::Event));
    }
}
