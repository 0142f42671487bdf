use as1_model::{Activity, Actor, Object, ObjectType, Verb};
use as1_splice::escape;
use axohtml::{dom::DOMTree, html, unsafe_text};

use crate::{object_urls, render_content, to_tree::activity_as_object, RenderOptions};

/// A whole page of h-entries, one per activity.
pub fn activities_to_html(activities: &[Activity]) -> String {
    let entries: Vec<String> = activities
        .iter()
        .map(|activity| object_to_html(&activity_as_object(activity)))
        .collect();
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n{}\n</body>\n</html>\n",
        entries.join("\n")
    )
}

/// An h-card for `actor`, or nothing when the actor is empty. With
/// `as_author` the card is also the `p-author` of its parent.
pub fn hcard_to_html(actor: &Actor, as_author: bool) -> String {
    if actor.is_empty() {
        return String::new();
    }

    let mut inner = String::new();
    if let Some(id) = &actor.id {
        inner.push_str(&format!("<data class=\"p-uid\" value=\"{}\"></data>", escape(id)));
    }
    if let Some(photo) = actor.image.as_ref().and_then(|image| image.url.as_deref()) {
        inner.push_str(&format!(
            "<img class=\"u-photo\" src=\"{}\" alt=\"\" />",
            escape(photo)
        ));
    }
    let urls = actor.all_urls();
    let name = actor
        .display_name
        .as_deref()
        .or(actor.username.as_deref())
        .map(escape);
    match (urls.first(), name) {
        (Some(url), Some(name)) => inner.push_str(&format!(
            "<a class=\"p-name u-url\" href=\"{}\">{}</a>",
            escape(url),
            name
        )),
        (Some(url), None) => inner.push_str(&format!(
            "<a class=\"u-url\" href=\"{url}\">{url}</a>",
            url = escape(url)
        )),
        (None, Some(name)) => inner.push_str(&format!("<span class=\"p-name\">{}</span>", name)),
        (None, None) => {}
    }
    for url in urls.iter().skip(1) {
        inner.push_str(&format!("<a class=\"u-url\" href=\"{}\"></a>", escape(url)));
    }

    let card: DOMTree<String> = if as_author {
        html!(<span class="p-author h-card">{unsafe_text!(inner)}</span>)
    } else {
        html!(<span class="h-card">{unsafe_text!(inner)}</span>)
    };
    card.to_string()
}

/// One h-entry (or h-event) article for `object`.
pub fn object_to_html(object: &Object) -> String {
    let mut body = String::new();
    if let Some(id) = &object.id {
        body.push_str(&format!("\n<data class=\"p-uid\" value=\"{}\"></data>", escape(id)));
    }
    if let Some(author) = &object.author {
        let card = hcard_to_html(author, true);
        if !card.is_empty() {
            body.push('\n');
            body.push_str(&card);
        }
    }

    let urls = object_urls(object);
    let name = object.display_name.as_deref().filter(|name| !name.trim().is_empty());
    match (name, urls.first()) {
        (Some(name), Some(url)) => body.push_str(&format!(
            "\n<a class=\"p-name u-url\" href=\"{}\">{}</a>",
            escape(url),
            escape(name)
        )),
        (Some(name), None) => {
            body.push_str(&format!("\n<div class=\"p-name\">{}</div>", escape(name)))
        }
        (None, Some(url)) => {
            body.push_str(&format!("\n<a class=\"u-url\" href=\"{}\"></a>", escape(url)))
        }
        (None, None) => {}
    }
    for url in urls.iter().skip(1) {
        body.push_str(&format!("\n<a class=\"u-url\" href=\"{}\"></a>", escape(url)));
    }
    for (class, time) in [
        ("dt-published", &object.published),
        ("dt-updated", &object.updated),
        ("dt-start", &object.start_time),
        ("dt-end", &object.end_time),
    ] {
        if let Some(time) = time {
            body.push_str(&format!(
                "\n<time class=\"{}\" datetime=\"{time}\">{time}</time>",
                class,
                time = escape(time)
            ));
        }
    }
    if let Some(summary) = &object.summary {
        body.push_str(&format!("\n<div class=\"p-summary\">{}</div>", escape(summary)));
    }

    let content = render_content(
        object,
        &RenderOptions {
            render_attachments: true,
            render_image: true,
            ..RenderOptions::default()
        },
    );
    let content_class = if name.is_some() {
        "e-content"
    } else {
        "e-content p-name"
    };
    body.push_str(&format!("\n<div class=\"{}\">\n{}\n</div>", content_class, content));

    for tag in object.tags.iter().filter(|tag| !tag.is_inline()) {
        match tag.object_type {
            Some(ObjectType::Person) => {
                let card = Actor {
                    display_name: tag.display_name.clone(),
                    url: tag.url.clone(),
                    urls: tag.urls.clone(),
                    ..Actor::default()
                };
                let card = hcard_to_html(&card, false);
                if !card.is_empty() {
                    body.push_str(&format!(
                        "\n<span class=\"p-category\">{}</span>",
                        card
                    ));
                }
            }
            Some(ObjectType::Hashtag) => {
                if let Some(name) = &tag.display_name {
                    body.push_str(&format!("\n<span class=\"p-category\">{}</span>", escape(name)));
                }
            }
            _ => {}
        }
    }

    let mut relations: Vec<(&str, String)> = object
        .in_reply_to
        .iter()
        .filter_map(|target| target.url.clone())
        .map(|url| ("u-in-reply-to", url))
        .collect();
    let target_class = match &object.verb {
        Some(Verb::Like) => Some("u-like-of"),
        Some(Verb::Share) => Some("u-repost-of"),
        Some(Verb::Tag) => Some("u-tag-of"),
        Some(verb) if verb.is_rsvp() || *verb == Verb::React => Some("u-in-reply-to"),
        _ => None,
    };
    if let Some(class) = target_class {
        for target in &object.object {
            for url in object_urls(target) {
                relations.push((class, url));
            }
        }
    }
    relations.dedup();
    for (class, url) in relations {
        body.push_str(&format!("\n<a class=\"{}\" href=\"{}\"></a>", class, escape(&url)));
    }

    if let Some(replies) = &object.replies {
        for reply in &replies.items {
            let comment = object_to_html(&activity_as_object(reply));
            body.push_str(&format!("\n<div class=\"u-comment\">\n{}\n</div>", comment));
        }
    }
    body.push('\n');

    let article: DOMTree<String> = match object.object_type {
        Some(ObjectType::Event) => html!(<article class="h-event">{unsafe_text!(body)}</article>),
        _ => html!(<article class="h-entry">{unsafe_text!(body)}</article>),
    };
    article.to_string()
}
