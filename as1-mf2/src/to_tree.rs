use as1_model::{Activity, Actor, Location, Object, ObjectType, Verb};
use as1_splice::{has_markup, html_to_text, unescape};

use crate::{render_content, Item, PropertyValue, RenderOptions};

/// The object's urls, primary first, without repeats.
pub fn object_urls(object: &Object) -> Vec<String> {
    object.all_urls()
}

/// Converts an activity into one mf2 item.
///
/// Posts become their object's item, with the activity's actor as a
/// fallback author. Other verbs keep the activity and point at the object
/// through `like-of`, `repost-of`, `in-reply-to` and friends.
pub fn activity_to_json(activity: &Activity) -> Item {
    object_to_json(&activity_as_object(activity))
}

/// Folds an activity into the object that represents it in mf2.
pub(crate) fn activity_as_object(activity: &Activity) -> Object {
    if activity.verb == Verb::Post {
        let mut object = activity.object.clone();
        if object.author.is_none() {
            object.author = activity.actor.clone();
        }
        for target in activity.in_reply_to() {
            if !object.in_reply_to.contains(target) {
                object.in_reply_to.push(target.clone());
            }
        }
        return object;
    }

    Object {
        object_type: Some(ObjectType::Activity),
        verb: Some(activity.verb.clone()),
        id: activity.id.clone(),
        url: activity.url.clone(),
        published: activity.published.clone(),
        updated: activity.updated.clone(),
        display_name: activity.display_name.clone(),
        content: activity.content.clone(),
        author: activity.actor.clone(),
        in_reply_to: activity
            .context
            .iter()
            .flat_map(|context| context.in_reply_to.iter().cloned())
            .collect(),
        object: Some(activity.object.clone())
            .filter(|object| !object.is_empty())
            .into_iter()
            .collect(),
        ..Object::default()
    }
}

fn item_type(object_type: Option<&ObjectType>) -> &'static str {
    match object_type {
        Some(ObjectType::Person | ObjectType::Place) => "h-card",
        Some(ObjectType::Event) => "h-event",
        _ => "h-entry",
    }
}

/// Converts an object into an mf2 item. Content is rendered with its tags,
/// so plain text comes out as a string and markup as `{html, value}`.
pub fn object_to_json(object: &Object) -> Item {
    let mut item = Item::new([item_type(object.object_type.as_ref())]);
    item.extend("uid", object.id.clone());
    item.extend("name", object.display_name.clone());
    item.extend("summary", object.summary.clone());
    item.extend("url", object_urls(object));
    item.extend("published", object.published.clone());
    item.extend("updated", object.updated.clone());
    item.extend("start", object.start_time.clone());
    item.extend("end", object.end_time.clone());

    match plain_content(object) {
        Some(content) => item.push("content", content),
        None => {
            let html = render_content(
                object,
                &RenderOptions {
                    include_location: false,
                    render_attachments: false,
                    render_image: false,
                    synthesize_content: false,
                    white_space_pre: true,
                },
            );
            if !html.trim().is_empty() {
                item.push("content", content_value(&html));
            }
        }
    }

    if let Some(author) = object.author.as_ref().filter(|author| !author.is_empty()) {
        item.push("author", actor_to_json(author));
    }
    item.extend(
        "photo",
        object.image.iter().filter_map(|image| image.url.clone()),
    );
    item.extend(
        "video",
        object.stream.iter().filter_map(|stream| stream.url.clone()),
    );
    if let Some(location) = object.location.as_ref().filter(|location| !location.is_empty()) {
        item.push("location", location_to_json(location));
    }

    let mut replied_to: Vec<String> = object
        .in_reply_to
        .iter()
        .filter_map(|target| target.url.clone())
        .collect();
    let verb = object.verb.clone().unwrap_or_default();
    match verb {
        Verb::Like => push_targets(&mut item, "like-of", &object.object),
        Verb::Share => push_targets(&mut item, "repost-of", &object.object),
        Verb::Tag => item.extend("tag-of", target_urls(&object.object)),
        Verb::Invite => {
            for invitee in &object.object {
                item.push("invitee", invitee_to_json(invitee));
            }
        }
        Verb::React => replied_to.extend(target_urls(&object.object)),
        verb if verb.is_rsvp() => {
            item.extend("rsvp", verb.rsvp_value());
            replied_to.extend(target_urls(&object.object));
        }
        _ => {}
    }
    let mut in_reply_to: Vec<String> = Vec::new();
    for url in replied_to {
        if !in_reply_to.contains(&url) {
            in_reply_to.push(url);
        }
    }
    item.extend("in-reply-to", in_reply_to);

    for tag in object.tags.iter().filter(|tag| !tag.is_inline()) {
        match tag.object_type {
            Some(ObjectType::Person) => {
                let mut card = Item::new(["h-card"]);
                card.extend("name", tag.display_name.clone());
                card.extend("url", tag.all_urls());
                item.push("category", card);
            }
            Some(ObjectType::Hashtag) => item.extend("category", tag.display_name.clone()),
            _ => {}
        }
    }

    for attachment in &object.attachments {
        let types: &[&str] = match attachment.object_type {
            Some(ObjectType::Note) => &["u-quotation-of", "h-cite"],
            Some(ObjectType::Article) => &["h-cite"],
            _ => continue,
        };
        let mut child = object_to_json(attachment);
        child.types = types.iter().map(|t| t.to_string()).collect();
        item.children.push(child);
    }

    if let Some(replies) = &object.replies {
        for reply in &replies.items {
            let mut comment = object_to_json(&activity_as_object(reply));
            comment.types = vec!["h-cite".to_string()];
            item.push("comment", comment);
        }
    }
    item
}

/// Plain text content that renders to nothing more than itself: no inline
/// tags to splice and no out-of-line tags that would follow it.
fn plain_content(object: &Object) -> Option<&str> {
    let content = object.content.as_deref().filter(|content| !content.trim().is_empty())?;
    let only_categories = object.tags.iter().all(|tag| {
        !tag.is_inline() && matches!(tag.object_type, Some(ObjectType::Person | ObjectType::Hashtag))
    });
    if object.content_is_html || !only_categories || object.verb == Some(Verb::Share) {
        return None;
    }
    Some(content)
}

fn content_value(html: &str) -> PropertyValue {
    if !has_markup(html) {
        return PropertyValue::Text(unescape(html));
    }
    let value = html_to_text(html);
    PropertyValue::Embedded {
        value: Some(value).filter(|value| !value.is_empty()),
        html: Some(html.trim().to_string()),
    }
}

fn target_urls(targets: &[Object]) -> Vec<String> {
    targets.iter().flat_map(object_urls).collect()
}

/// Targets with content travel as h-cites, bare ones as their urls.
fn push_targets(item: &mut Item, name: &str, targets: &[Object]) {
    for target in targets {
        if target.content.is_some() {
            let mut cite = object_to_json(target);
            cite.types = vec!["h-cite".to_string()];
            item.push(name, cite);
        } else {
            item.extend(name, object_urls(target));
        }
    }
}

fn invitee_to_json(invitee: &Object) -> Item {
    let mut card = Item::new(["h-card"]);
    card.extend("name", invitee.display_name.clone());
    card.extend("url", object_urls(invitee));
    card.extend("photo", invitee.first_image_url().map(String::from));
    card
}

fn actor_to_json(actor: &Actor) -> Item {
    let mut card = Item::new(["h-card"]);
    card.extend("uid", actor.id.clone());
    card.extend("name", actor.display_name.clone());
    card.extend("nickname", actor.username.clone());
    card.extend("url", actor.all_urls());
    card.extend(
        "photo",
        actor.image.as_ref().and_then(|image| image.url.clone()),
    );
    card.extend("note", actor.description.clone());
    card
}

fn location_to_json(location: &Location) -> Item {
    let mut card = Item::new(["h-card"]);
    card.extend("uid", location.id.clone());
    card.extend("name", location.display_name.clone());
    card.extend("url", location.url.clone());
    card.extend("latitude", location.latitude().map(|lat| lat.to_string()));
    card.extend("longitude", location.longitude().map(|long| long.to_string()));
    card
}
