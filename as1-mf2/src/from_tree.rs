use as1_model::{Activity, Actor, Image, Location, Object, ObjectType, Ref, Replies, Tag, Verb};
use as1_ref::{is_web_url, GeoUri};
use as1_source::Transport;
use as1_splice::{has_markup, unescape};
use log::trace;

use crate::{get_string_urls, html_to_tree, Document, Item, Mf2Error, PropertyValue};

/// Properties whose targets become the object's `object`.
const TARGET_PROPERTIES: [&str; 6] = [
    "follow-of",
    "like",
    "like-of",
    "repost",
    "repost-of",
    "invitee",
];

/// Converts one mf2 item into a canonical object.
///
/// The object type and verb come from post type discovery: `like-of`,
/// `repost-of`, `tag-of`, `rsvp` and `invitee` make activities,
/// `in-reply-to` makes a comment, and a `name` that is not just the start
/// of the content makes an article.
pub fn json_to_object(item: &Item) -> Result<Object, Mf2Error> {
    let (object_type, verb) = post_type(item)?;
    trace!("mf2 {:?} is {:?}/{:?}", item.types, object_type, verb);

    let mut object = Object {
        object_type,
        verb,
        id: text(item, "uid"),
        display_name: text(item, "name"),
        summary: text(item, "summary"),
        published: text(item, "published"),
        updated: text(item, "updated"),
        start_time: text(item, "start"),
        end_time: text(item, "end"),
        location: location(item),
        ..Object::default()
    };

    if let Some((content, is_html)) = item.first("content").and_then(content) {
        object.content = Some(content);
        object.content_is_html = is_html;
    }
    object.set_urls(None, get_string_urls(item.get("url")));

    let photos: Vec<PropertyValue> = item
        .get("photo")
        .iter()
        .chain(item.get("featured"))
        .cloned()
        .collect();
    object.image = web_urls(&photos)
        .into_iter()
        .map(Image::new)
        .collect();
    object.stream = web_urls(item.get("video")).into_iter().map(Image::new).collect();

    object.tags = item
        .get("category")
        .iter()
        .map(category_tag)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flatten()
        .collect();

    object.attachments = item
        .children
        .iter()
        .chain(item.get("quotation-of").iter().filter_map(PropertyValue::as_item))
        .filter(|child| child.has_type("h-cite"))
        .map(json_to_object)
        .collect::<Result<_, _>>()?;

    let replies = item
        .get("comment")
        .iter()
        .filter_map(PropertyValue::as_item)
        .map(|comment| json_to_object(comment).map(Activity::from_object))
        .collect::<Result<Vec<_>, _>>()?;
    if !replies.is_empty() {
        object.replies = Some(Replies {
            total_items: Some(replies.len() as u64),
            items: replies,
        });
    }

    object.in_reply_to = get_string_urls(item.get("in-reply-to"))
        .into_iter()
        .map(Ref::from_url)
        .collect();

    // an RSVP acts on the event it replies to
    let rsvp_targets: &[PropertyValue] = if object.verb.as_ref().map_or(false, Verb::is_rsvp) {
        item.get("in-reply-to")
    } else {
        &[]
    };
    let mut targets: Vec<Object> = Vec::new();
    let target_values = TARGET_PROPERTIES
        .iter()
        .flat_map(|name| item.get(name))
        .chain(rsvp_targets);
    for value in target_values {
        let target = target_object(value)?;
        if !target.is_empty() && !targets.contains(&target) {
            targets.push(target);
        }
    }
    object.object = targets;

    if object.verb == Some(Verb::Tag) {
        object.object = get_string_urls(item.get("tag-of"))
            .into_iter()
            .map(|url| Object {
                url: Some(url),
                ..Object::default()
            })
            .collect();
    }

    let author = author(item)?;
    if object.is_type(ObjectType::Activity) {
        object.actor = author.clone();
    }
    object.author = author;
    object.sort_tags();
    Ok(object)
}

/// Wraps the converted object in an activity. Reactions (likes, shares,
/// RSVPs, ...) keep their verb and act on their first target.
pub fn json_to_activity(item: &Item) -> Result<Activity, Mf2Error> {
    let mut object = json_to_object(item)?;
    let is_reaction = object.is_type(ObjectType::Activity)
        && matches!(&object.verb, Some(verb) if *verb != Verb::Post);
    if !is_reaction {
        return Ok(Activity::from_object(object));
    }
    let verb = object.verb.take().unwrap_or_default();
    let target = if object.object.is_empty() {
        Object::default()
    } else {
        object.object.remove(0)
    };
    Ok(Activity {
        verb,
        object_type: Some(ObjectType::Activity),
        id: object.id,
        url: object.url,
        published: object.published,
        updated: object.updated,
        actor: object.author,
        content: object.content,
        display_name: object.display_name,
        object: target,
        ..Activity::default()
    })
}

/// Author card of the first entry in `document`.
pub fn find_author(document: &Document) -> Option<Actor> {
    let entry = first_entry(&document.items)?;
    author(entry).ok().flatten()
}

/// Like `json_to_object`, but when the author is only a URL, fetches that
/// page and takes its representative h-card.
pub async fn json_to_object_fetching(
    item: &Item,
    transport: &dyn Transport,
) -> Result<Object, Mf2Error> {
    let mut object = json_to_object(item)?;
    let url = match item.first("author") {
        Some(PropertyValue::Text(url)) if is_web_url(url) => url.trim().to_string(),
        _ => return Ok(object),
    };

    let response = transport.get(&url, &[], &[]).await?.error_for_status()?;
    let document = html_to_tree(&response.text(), Some(&url));
    if let Some(card) = representative_hcard(&document, &url) {
        let actor = card_to_actor(card)?;
        if object.is_type(ObjectType::Activity) {
            object.actor = Some(actor.clone());
        }
        object.author = Some(actor);
    }
    Ok(object)
}

fn post_type(item: &Item) -> Result<(Option<ObjectType>, Option<Verb>), Mf2Error> {
    if item.has("tag-of") && item.has("in-reply-to") {
        return Err(Mf2Error::AmbiguousRelation);
    }
    let activity = |verb| Ok((Some(ObjectType::Activity), Some(verb)));

    if item.has_type("h-geo") || item.has_type("p-location") {
        return Ok((Some(ObjectType::Place), None));
    }
    if item.has_type("h-event") {
        return Ok((Some(ObjectType::Event), None));
    }
    if item.has_type("h-card") {
        return Ok((Some(ObjectType::Person), None));
    }
    if let Some(verb) = item
        .first_text("rsvp")
        .and_then(Verb::from_rsvp_value)
    {
        return activity(verb);
    }
    if item.has("invitee") {
        return activity(Verb::Invite);
    }
    if item.has("repost-of") {
        return activity(Verb::Share);
    }
    if item.has("like-of") {
        return activity(Verb::Like);
    }
    if item.has("in-reply-to") {
        return Ok((Some(ObjectType::Comment), None));
    }
    if item.has("tag-of") {
        return activity(Verb::Tag);
    }
    if is_article(item) {
        Ok((Some(ObjectType::Article), None))
    } else {
        Ok((Some(ObjectType::Note), None))
    }
}

/// A name that is not just the beginning of the content marks an article.
fn is_article(item: &Item) -> bool {
    let name = match item.first_text("name") {
        Some(name) => collapse(name),
        None => return false,
    };
    let content = item
        .first("content")
        .and_then(|value| value.text().map(String::from).or_else(|| value.html().map(unescape)))
        .or_else(|| item.first_text("summary").map(String::from))
        .map(|content| collapse(&content))
        .unwrap_or_default();
    !content.starts_with(&name)
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn text(item: &Item, name: &str) -> Option<String> {
    item.first_text(name).map(String::from)
}

/// Content and whether it is HTML. HTML without any markup is unescaped
/// into plain text.
fn content(value: &PropertyValue) -> Option<(String, bool)> {
    match value.html().filter(|html| !html.trim().is_empty()) {
        Some(html) if has_markup(html) => Some((html.trim().to_string(), true)),
        Some(html) => Some((unescape(html), false)),
        None => value
            .text()
            .filter(|text| !text.is_empty())
            .map(|text| (text.to_string(), false)),
    }
}

/// URL strings in `values` that look like web URLs, without repeats.
/// Captions marked up as url properties are skipped.
fn web_urls(values: &[PropertyValue]) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for url in get_string_urls(values) {
        let url = url.trim().to_string();
        if is_web_url(&url) && !urls.contains(&url) {
            urls.push(url);
        }
    }
    urls
}

fn target_object(value: &PropertyValue) -> Result<Object, Mf2Error> {
    match value {
        PropertyValue::Item(item) => json_to_object(item),
        other => Ok(Object {
            url: other.text().map(|url| url.trim().to_string()).filter(|url| !url.is_empty()),
            ..Object::default()
        }),
    }
}

fn category_tag(value: &PropertyValue) -> Result<Option<Tag>, Mf2Error> {
    if let Some(card) = value.as_item() {
        let object = json_to_object(card)?;
        return Ok(Some(Tag {
            object_type: object.object_type,
            id: object.id,
            url: object.url,
            urls: object.urls,
            display_name: object.display_name,
            ..Tag::default()
        }));
    }
    Ok(value
        .text()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| Tag {
            display_name: Some(name.to_string()),
            ..Tag::new(ObjectType::Hashtag)
        }))
}

fn author(item: &Item) -> Result<Option<Actor>, Mf2Error> {
    let value = match item.first("author") {
        Some(value) => value,
        None => return Ok(None),
    };
    if let Some(card) = value.as_item() {
        return card_to_actor(card).map(Some);
    }
    let text = match value.text().map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => text.to_string(),
        None => return Ok(None),
    };
    let mut actor = Actor::person();
    if is_web_url(&text) {
        actor.url = Some(text);
    } else {
        actor.display_name = Some(text);
    }
    Ok(Some(actor))
}

fn card_to_actor(card: &Item) -> Result<Actor, Mf2Error> {
    let object = json_to_object(card)?;
    Ok(Actor {
        object_type: Some(ObjectType::Person),
        id: object.id,
        username: text(card, "nickname"),
        display_name: object.display_name.or_else(|| card.value.clone()),
        url: object.url,
        urls: object.urls,
        image: object.image.into_iter().next(),
        description: text(card, "note").or(object.summary),
        published: object.published,
        updated: object.updated,
        location: object.location,
        ..Actor::default()
    })
}

fn coordinates(item: &Item) -> Option<(f64, f64)> {
    let latitude = item.first_text("latitude")?.trim().parse().ok()?;
    let longitude = item.first_text("longitude")?.trim().parse().ok()?;
    Some((latitude, longitude))
}

fn place(coordinates: Option<(f64, f64)>) -> Location {
    let mut location = Location::place();
    if let Some((latitude, longitude)) = coordinates {
        location.set_coordinates(latitude, longitude);
    }
    location
}

/// First match wins: a card-like nested `location`, a geo-like nested
/// `location` or `geo`, a `geo:` URI, then top-level coordinates.
fn location(item: &Item) -> Option<Location> {
    let nested = item.get("location").iter().filter_map(PropertyValue::as_item);
    for card in nested.clone() {
        if !card.has_type("h-geo") && (card.is_h() || card.has("name")) {
            let mut location = place(coordinates(card));
            location.id = text(card, "uid");
            location.display_name = text(card, "name").or_else(|| card.value.clone());
            location.url = get_string_urls(card.get("url")).into_iter().next();
            return Some(location);
        }
    }

    let geo = nested.chain(item.get("geo").iter().filter_map(PropertyValue::as_item));
    for geo in geo {
        if let Some(coordinates) = coordinates(geo) {
            return Some(place(Some(coordinates)));
        }
    }

    for uri in item.get("geo").iter().filter_map(PropertyValue::text) {
        if let Ok(geo) = uri.trim().parse::<GeoUri>() {
            return Some(place(Some((geo.latitude, geo.longitude))));
        }
    }

    if let Some(coordinates) = coordinates(item) {
        return Some(place(Some(coordinates)));
    }

    item.get("location")
        .iter()
        .filter(|value| value.as_item().is_none())
        .filter_map(PropertyValue::text)
        .map(str::trim)
        .find(|name| !name.is_empty() && !is_web_url(name))
        .map(|name| {
            let mut location = Location::place();
            location.display_name = Some(name.to_string());
            location
        })
}

fn first_entry(items: &[Item]) -> Option<&Item> {
    items.iter().find_map(|item| {
        if item.has_type("h-entry") {
            Some(item)
        } else {
            first_entry(&item.children)
        }
    })
}

/// The h-card whose url is the page itself, else the first top-level one.
fn representative_hcard<'a>(document: &'a Document, page_url: &str) -> Option<&'a Item> {
    let normalize = |url: &str| url.trim().trim_end_matches('/').to_lowercase();
    let page = normalize(page_url);
    let cards: Vec<&Item> = document
        .items
        .iter()
        .filter(|item| item.has_type("h-card"))
        .collect();
    cards
        .iter()
        .copied()
        .find(|card| {
            get_string_urls(card.get("url"))
                .iter()
                .any(|url| normalize(url) == page)
        })
        .or_else(|| cards.first().copied())
}
