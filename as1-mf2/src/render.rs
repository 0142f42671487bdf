use as1_model::{Location, Object, ObjectType, Tag, Verb};
use as1_splice::{escape, Flavor, Splicer};
use serde::Deserialize;

use crate::hcard_to_html;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub include_location: bool,
    /// Render attachments and image-bearing link tags after the content.
    pub render_attachments: bool,
    /// Render the object's own images, linked to the object.
    pub render_image: bool,
    /// Write "likes this." and friends when a reaction has no content.
    pub synthesize_content: bool,
    /// Keep newlines in plain text with `white-space: pre` instead of `<br />`.
    pub white_space_pre: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_location: true,
            render_attachments: false,
            render_image: false,
            synthesize_content: true,
            white_space_pre: true,
        }
    }
}

/// `<img class="u-photo" src="..." alt="" />`
pub fn img(src: &str) -> String {
    img_with_alt(src, "")
}

fn img_with_alt(src: &str, alt: &str) -> String {
    format!(
        "<img class=\"u-photo\" src=\"{}\" alt=\"{}\" />",
        escape(src),
        escape(alt)
    )
}

fn link(url: Option<&str>, text: &str) -> String {
    match url {
        Some(url) => format!("<a href=\"{}\">{}</a>", escape(url), text),
        None => text.to_string(),
    }
}

/// Renders an object's content as HTML.
///
/// Inline tags are spliced into the text. Out-of-line tags follow it,
/// except people and hashtags, which belong in categories.
pub fn render_content(object: &Object, options: &RenderOptions) -> String {
    if let Some(shared) = shared_post(object) {
        return render_share(shared, options);
    }

    let content = object.content.as_deref().unwrap_or_default();
    let mut html = if content.trim().is_empty() {
        if options.synthesize_content {
            synthesize(object).unwrap_or_default()
        } else {
            String::new()
        }
    } else {
        let text = Splicer::new(content)
            .flavor(Flavor::from_is_html(object.content_is_html))
            .tags(object.tags.iter().filter(|tag| tag.is_inline()))
            .render();
        match (object.content_is_html, content.contains('\n')) {
            (false, true) if options.white_space_pre => {
                format!("<div style=\"white-space: pre\">{}</div>", text)
            }
            (false, true) => text.replace('\n', "<br />\n"),
            _ => text,
        }
    };

    let link_cards: Vec<&Tag> = object
        .tags
        .iter()
        .filter(|tag| options.render_attachments && is_link_card(tag))
        .collect();
    let out_of_line: Vec<&Tag> = object
        .tags
        .iter()
        .filter(|tag| !tag.is_inline())
        .filter(|tag| !matches!(tag.object_type, Some(ObjectType::Person | ObjectType::Hashtag)))
        .filter(|tag| !link_cards.contains(tag))
        .collect();
    if !out_of_line.is_empty() {
        html.push_str(&Splicer::new("").tags(out_of_line).render());
    }

    if options.render_attachments {
        for attachment in &object.attachments {
            html.push_str(&render_attachment(attachment, options));
        }
        for tag in link_cards {
            html.push_str(&render_link_card(tag));
        }
    }

    if options.render_image {
        let attached: Vec<&str> = object
            .attachments
            .iter()
            .flat_map(|attachment| attachment.image.iter())
            .filter_map(|image| image.url.as_deref())
            .collect();
        for url in object.image.iter().filter_map(|image| image.url.as_deref()) {
            if attached.contains(&url) {
                continue;
            }
            let image = img(url);
            html.push_str(&match &object.url {
                Some(href) => format!("\n<p><a class=\"link\" href=\"{}\">{}</a></p>", escape(href), image),
                None => format!("\n<p>{}</p>", image),
            });
        }
    }

    if options.include_location {
        if let Some(location) = object.location.as_ref().filter(|location| !location.is_empty()) {
            html.push_str(&render_location(location));
        }
    }
    html
}

/// The post a share carries, when it has anything worth showing.
fn shared_post(object: &Object) -> Option<&Object> {
    if object.verb != Some(Verb::Share) {
        return None;
    }
    object.object.first().filter(|shared| {
        shared.content.as_deref().map_or(false, |content| !content.trim().is_empty())
            || !shared.attachments.is_empty()
    })
}

fn render_share(shared: &Object, options: &RenderOptions) -> String {
    let url = shared.url.as_deref().unwrap_or("#");
    let by = shared
        .author
        .as_ref()
        .map(|author| hcard_to_html(author, false))
        .filter(|card| !card.is_empty())
        .map(|card| format!(" by {}", card))
        .unwrap_or_default();
    format!(
        "Shared <a href=\"{}\">a post</a>{}\n{}",
        escape(url),
        by,
        render_content(shared, options)
    )
}

fn synthesize(object: &Object) -> Option<String> {
    let verb = object.verb.as_ref()?;
    let target_url = object
        .object
        .first()
        .and_then(|target| target.url.as_deref())
        .or_else(|| object.in_reply_to.iter().find_map(|target| target.url.as_deref()));
    match verb {
        Verb::Like => Some(link(target_url, "likes this.")),
        Verb::Share => Some(link(target_url, "shared this.")),
        verb if verb.is_rsvp() => {
            let phrase = match verb {
                Verb::RsvpYes => "is attending.",
                Verb::RsvpNo => "is not attending.",
                Verb::RsvpMaybe => "might attend.",
                _ => "is interested.",
            };
            Some(format!(
                "<data class=\"p-rsvp\" value=\"{}\">{}</data>",
                verb.rsvp_value().unwrap_or_default(),
                phrase
            ))
        }
        _ => None,
    }
}

fn is_link_card(tag: &Tag) -> bool {
    tag.object_type == Some(ObjectType::Article)
        && tag.image.as_ref().and_then(|image| image.url.as_ref()).is_some()
        && tag.url.is_some()
}

fn render_link_card(tag: &Tag) -> String {
    let url = tag.url.as_deref().unwrap_or_default();
    let image = tag
        .image
        .as_ref()
        .and_then(|image| image.url.as_deref())
        .map(img)
        .unwrap_or_default();
    let name = tag
        .display_name
        .as_deref()
        .map(|name| format!("\n<span class=\"name\">{}</span>", escape(name)))
        .unwrap_or_default();
    format!(
        "\n<p>\n<a class=\"link\" href=\"{}\">\n{}{}\n</a>\n</p>",
        escape(url),
        image,
        name
    )
}

fn render_attachment(attachment: &Object, options: &RenderOptions) -> String {
    let name = attachment.display_name.as_deref().unwrap_or_default();
    let name_span = if name.is_empty() {
        String::new()
    } else {
        format!("\n<span class=\"name\">{}</span>", escape(name))
    };
    match attachment.object_type {
        Some(ObjectType::Image) => attachment
            .image
            .iter()
            .filter_map(|image| image.url.as_deref())
            .chain(attachment.url.as_deref().filter(|_| attachment.image.is_empty()))
            .map(|url| format!("\n<p>\n{}{}\n</p>", img_with_alt(url, name), name_span))
            .collect(),
        Some(ObjectType::Video) => match attachment.first_stream_url() {
            Some(stream) => {
                let poster = attachment
                    .first_image_url()
                    .map(|poster| format!(" poster=\"{}\"", escape(poster)))
                    .unwrap_or_default();
                format!(
                    "\n<p><video class=\"u-video\" src=\"{src}\" controls=\"controls\"{poster}>Your browser does not support the video tag. <a href=\"{src}\">Click here to view directly.</a></video>{name}\n</p>",
                    src = escape(stream),
                    poster = poster,
                    name = name_span,
                )
            }
            None => String::new(),
        },
        Some(ObjectType::Audio) => match attachment.first_stream_url() {
            Some(stream) => format!(
                "\n<p><audio class=\"u-audio\" src=\"{src}\" controls=\"controls\">Your browser does not support the audio tag. <a href=\"{src}\">Click here to listen directly.</a></audio>{name}\n</p>",
                src = escape(stream),
                name = name_span,
            ),
            None => String::new(),
        },
        Some(ObjectType::Note | ObjectType::Article | ObjectType::Comment) => {
            let author = attachment
                .author
                .as_ref()
                .map(|author| hcard_to_html(author, true))
                .unwrap_or_default();
            let title = match (attachment.url.as_deref(), name.is_empty()) {
                (Some(url), false) => format!("<a class=\"p-name u-url\" href=\"{}\">{}</a>\n", escape(url), escape(name)),
                (Some(url), true) => format!("<a class=\"u-url\" href=\"{}\"></a>\n", escape(url)),
                (None, false) => format!("<span class=\"p-name\">{}</span>\n", escape(name)),
                (None, true) => String::new(),
            };
            let nested = RenderOptions {
                render_attachments: false,
                ..*options
            };
            format!(
                "\n<blockquote class=\"h-cite\">\n{}{}<div class=\"e-content\">{}</div>\n</blockquote>",
                author,
                title,
                render_content(attachment, &nested)
            )
        }
        _ => String::new(),
    }
}

fn render_location(location: &Location) -> String {
    let name = location
        .display_name
        .as_deref()
        .or(location.url.as_deref())
        .map(escape)
        .unwrap_or_default();
    let inner = match &location.url {
        Some(url) => format!("<a class=\"p-name u-url\" href=\"{}\">{}</a>", escape(url), name),
        None => format!("<span class=\"p-name\">{}</span>", name),
    };
    format!("\n<p><span class=\"p-location h-card\">{}</span></p>", inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn render(object: Value, options: &RenderOptions) -> String {
        render_content(&serde_json::from_value(object).unwrap(), options)
    }

    #[test]
    fn test_img() {
        assert_eq!(img("foo"), r#"<img class="u-photo" src="foo" alt="" />"#);
    }

    #[test]
    fn test_plain_multiline_content() {
        let object = json!({"content": "one\ntwo < three"});
        assert_eq!(
            render(object.clone(), &RenderOptions::default()),
            "<div style=\"white-space: pre\">one\ntwo &lt; three</div>"
        );
        let options = RenderOptions {
            white_space_pre: false,
            ..RenderOptions::default()
        };
        assert_eq!(render(object, &options), "one<br />\ntwo &lt; three");
    }

    #[test]
    fn test_html_content_is_not_wrapped() {
        assert_eq!(
            render(
                json!({"content": "<p>one</p>\n<p>two</p>", "content_is_html": true}),
                &RenderOptions::default()
            ),
            "<p>one</p>\n<p>two</p>"
        );
    }

    #[test]
    fn test_out_of_line_tags_follow_wrapped_text() {
        let html = render(
            json!({
                "content": "a\nb",
                "tags": [
                    {"objectType": "article", "url": "http://link", "displayName": "Link"},
                    {"objectType": "person", "url": "http://person", "displayName": "Person"},
                    {"objectType": "hashtag", "displayName": "cats"},
                ],
            }),
            &RenderOptions::default(),
        );
        assert_eq!(
            html,
            "<div style=\"white-space: pre\">a\nb</div>\n<a class=\"tag\" href=\"http://link\">Link</a>"
        );
    }

    #[test]
    fn test_synthesized_reactions() {
        assert_eq!(
            render(
                json!({"objectType": "activity", "verb": "like", "object": {"url": "http://orig"}}),
                &RenderOptions::default()
            ),
            "<a href=\"http://orig\">likes this.</a>"
        );
        assert_eq!(
            render(
                json!({"objectType": "activity", "verb": "share", "object": {"url": "http://orig"}}),
                &RenderOptions::default()
            ),
            "<a href=\"http://orig\">shared this.</a>"
        );
        assert_eq!(
            render(
                json!({"objectType": "activity", "verb": "rsvp-yes"}),
                &RenderOptions::default()
            ),
            "<data class=\"p-rsvp\" value=\"yes\">is attending.</data>"
        );
        let options = RenderOptions {
            synthesize_content: false,
            ..RenderOptions::default()
        };
        assert_eq!(
            render(json!({"objectType": "activity", "verb": "like"}), &options),
            ""
        );
    }

    #[test]
    fn test_share_with_content() {
        let html = render(
            json!({
                "objectType": "activity",
                "verb": "share",
                "object": {
                    "url": "http://orig",
                    "content": "the original",
                    "author": {"displayName": "Orig", "url": "http://author"},
                },
            }),
            &RenderOptions::default(),
        );
        assert!(html.starts_with("Shared <a href=\"http://orig\">a post</a> by "), "{}", html);
        assert!(html.contains("h-card"), "{}", html);
        assert!(html.contains("http://author"), "{}", html);
        assert!(html.ends_with("\nthe original"), "{}", html);
    }

    #[test]
    fn test_attachments() {
        let options = RenderOptions {
            render_attachments: true,
            ..RenderOptions::default()
        };
        let html = render(
            json!({
                "content": "look",
                "attachments": [
                    {"objectType": "image", "image": {"url": "http://pic"}, "displayName": "a pic"},
                    {"objectType": "video", "stream": {"url": "http://vid"}, "image": {"url": "http://thumb"}},
                    {"objectType": "note", "url": "http://quoted", "content": "quoted"},
                ],
                "tags": [{
                    "objectType": "article",
                    "url": "http://card",
                    "displayName": "Card",
                    "image": {"url": "http://card/pic"},
                }],
            }),
            &options,
        );
        assert!(html.starts_with("look\n<p>\n<img class=\"u-photo\" src=\"http://pic\" alt=\"a pic\" />\n<span class=\"name\">a pic</span>\n</p>"), "{}", html);
        assert!(html.contains("<video class=\"u-video\" src=\"http://vid\" controls=\"controls\" poster=\"http://thumb\">"), "{}", html);
        assert!(html.contains("<a class=\"u-url\" href=\"http://quoted\"></a>\n<div class=\"e-content\">quoted</div>"), "{}", html);
        assert!(html.contains("<a class=\"link\" href=\"http://card\">\n<img class=\"u-photo\" src=\"http://card/pic\" alt=\"\" />\n<span class=\"name\">Card</span>\n</a>"), "{}", html);
        // the link card replaces the plain tag link
        assert!(!html.contains("class=\"tag\""), "{}", html);
    }

    #[test]
    fn test_render_image_skips_attached() {
        let options = RenderOptions {
            render_image: true,
            ..RenderOptions::default()
        };
        let html = render(
            json!({
                "url": "http://post",
                "image": [{"url": "http://a"}, {"url": "http://b"}],
                "attachments": [{"objectType": "image", "image": {"url": "http://b"}}],
            }),
            &options,
        );
        assert_eq!(
            html,
            "\n<p><a class=\"link\" href=\"http://post\"><img class=\"u-photo\" src=\"http://a\" alt=\"\" /></a></p>"
        );
    }

    #[test]
    fn test_location() {
        let html = render(
            json!({"content": "here", "location": {"displayName": "Cafe", "url": "http://cafe"}}),
            &RenderOptions::default(),
        );
        assert_eq!(
            html,
            "here\n<p><span class=\"p-location h-card\"><a class=\"p-name u-url\" href=\"http://cafe\">Cafe</a></span></p>"
        );
    }
}
