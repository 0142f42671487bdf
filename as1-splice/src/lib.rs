use as1_model::{Object, ObjectType, Tag};
use lazy_static::lazy_static;
use pulldown_cmark::{html, CowStr, Event, LinkType, Tag as HtmlTag};
use regex::Regex;
use std::collections::BTreeSet;

mod offsets;
mod text;
pub use offsets::{utf16_span, utf16_to_code_points};
pub use text::{has_markup, html_to_text, unescape};

/// How the content string is to be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flavor {
    /// Plain text, escaped on output.
    #[default]
    Text,
    /// Already HTML, emitted verbatim.
    Html,
}

impl Flavor {
    pub fn from_is_html(is_html: bool) -> Self {
        if is_html {
            Flavor::Html
        } else {
            Flavor::Text
        }
    }
}

/// Overlays tags onto content by code point offsets and renders HTML.
///
/// Inline tags (with `startIndex` and `length`) wrap their span in an
/// anchor. Out-of-line tags, then any appended fragments, follow the text.
#[derive(Clone, Debug, Default)]
pub struct Splicer<'a> {
    content: &'a str,
    flavor: Flavor,
    linkify: bool,
    tags: Vec<&'a Tag>,
    appended: Vec<String>,
}

struct Span<'a> {
    start: usize,
    end: usize,
    tag: &'a Tag,
}

impl<'a> Splicer<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// Content, flavor and tags of `object`.
    pub fn for_object(object: &'a Object) -> Self {
        Self::new(object.content.as_deref().unwrap_or_default())
            .flavor(Flavor::from_is_html(object.content_is_html))
            .tags(&object.tags)
    }

    pub fn flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Wrap bare urls in plain-text runs that are not already inside a tag.
    pub fn linkify(mut self, linkify: bool) -> Self {
        self.linkify = linkify;
        self
    }

    pub fn tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = &'a Tag>,
    {
        self.tags.extend(tags);
        self
    }

    /// Raw HTML to place after the out-of-line tags.
    pub fn append(mut self, fragment: impl Into<String>) -> Self {
        self.appended.push(fragment.into());
        self
    }

    pub fn render(&self) -> String {
        let mut html_buf = String::new();
        html::push_html(&mut html_buf, self.events().into_iter());
        html_buf
    }

    pub fn events(&self) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        self.inline_events(&mut events);
        self.out_of_line_events(&mut events);
        for fragment in &self.appended {
            events.push(Event::Html(CowStr::from(fragment.clone())));
        }
        events
    }

    fn spans(&self, len: usize) -> Vec<Span<'a>> {
        let mut spans: Vec<Span<'a>> = self
            .tags
            .iter()
            .copied()
            .filter(|tag| tag.url.is_some() || has_display_name(tag))
            .filter_map(|tag| {
                let (start, length) = tag.span()?;
                let start = start.min(len);
                Some(Span {
                    start,
                    end: start.saturating_add(length).min(len),
                    tag,
                })
            })
            .collect();
        spans.sort_by_key(|span| span.start);
        spans
    }

    fn inline_events(&self, events: &mut Vec<Event<'a>>) {
        let content = self.content;
        let bounds = offsets::boundaries(content);
        let spans = self.spans(bounds.len() - 1);
        let points: BTreeSet<usize> = spans
            .iter()
            .flat_map(|span| [span.start, span.end])
            .collect();

        let mut cursor = 0;
        let mut depth = 0usize;
        for point in points {
            self.text_events(&content[bounds[cursor]..bounds[point]], depth == 0, events);
            cursor = point;

            // close before open so that touching spans do not nest
            for span in spans
                .iter()
                .rev()
                .filter(|span| span.end == point && span.start < point)
            {
                events.push(close_anchor(span.tag));
                depth -= 1;
            }
            for span in spans.iter().filter(|span| span.start == point) {
                events.push(open_anchor(span.tag));
                if span.end == point {
                    events.push(close_anchor(span.tag));
                } else {
                    depth += 1;
                }
            }
        }
        self.text_events(&content[bounds[cursor]..], depth == 0, events);
    }

    fn text_events(&self, text: &'a str, outside_anchor: bool, events: &mut Vec<Event<'a>>) {
        if text.is_empty() {
            return;
        }
        match self.flavor {
            Flavor::Html => events.push(Event::Html(text.into())),
            Flavor::Text if self.linkify && outside_anchor => linkify_events(text, events),
            Flavor::Text => events.push(Event::Text(text.into())),
        }
    }

    fn out_of_line_events(&self, events: &mut Vec<Event<'a>>) {
        let mut tags: Vec<&'a Tag> = self
            .tags
            .iter()
            .copied()
            .filter(|tag| !tag.is_inline())
            .collect();
        tags.sort_by_key(|tag| match tag.object_type {
            Some(ObjectType::Hashtag) => 0,
            Some(ObjectType::Mention) => 1,
            _ => 2,
        });

        for tag in tags {
            let class = tag_class(tag);
            let name = tag.display_name.as_deref().filter(|name| !name.is_empty());
            let urls = tag.all_urls();
            match (urls.is_empty(), name) {
                (true, None) => {}
                (true, Some(_)) => events.push(Event::Html(
                    format!("\n<a class=\"{}\" aria-hidden=\"true\"></a>", class).into(),
                )),
                (false, _) => {
                    for url in urls {
                        events.extend(out_of_line_anchor(class, url, name));
                    }
                }
            }
        }
    }
}

fn has_display_name(tag: &Tag) -> bool {
    tag.display_name.as_deref().map_or(false, |name| !name.is_empty())
}

fn tag_class(tag: &Tag) -> &'static str {
    match tag.object_type {
        Some(ObjectType::Mention) => "u-mention",
        Some(ObjectType::Hashtag) => "p-category",
        _ => "tag",
    }
}

fn open_anchor(tag: &Tag) -> Event<'static> {
    match &tag.url {
        Some(url) => Event::Start(HtmlTag::Link(
            LinkType::Inline,
            url.clone().into(),
            "".into(),
        )),
        None => Event::Html(r#"<a class="tag" aria-hidden="true">"#.into()),
    }
}

fn close_anchor(tag: &Tag) -> Event<'static> {
    match &tag.url {
        Some(url) => Event::End(HtmlTag::Link(LinkType::Inline, url.clone().into(), "".into())),
        None => Event::Html("</a>".into()),
    }
}

fn out_of_line_anchor<'a>(class: &'static str, url: String, name: Option<&'a str>) -> Vec<Event<'a>> {
    let mut events = Vec::with_capacity(5);
    match name {
        Some(_) => events.push(Event::Html(format!("\n<a class=\"{}\" href=\"", class).into())),
        None => events.push(Event::Html(
            format!("\n<a class=\"{}\" aria-hidden=\"true\" href=\"", class).into(),
        )),
    }
    events.push(Event::Text(url.into()));
    events.push(Event::Html("\">".into()));
    if let Some(name) = name {
        events.push(Event::Text(name.into()));
    }
    events.push(Event::Html("</a>".into()));
    events
}

/// `&`, `<`, `>` and `"` as entities.
pub fn escape(text: &str) -> String {
    let mut html_buf = String::new();
    html::push_html(&mut html_buf, std::iter::once(Event::Text(text.into())));
    html_buf
}

/// Escapes `text` and wraps every bare http(s) url in an anchor.
pub fn linkify(text: &str) -> String {
    let mut events = Vec::new();
    linkify_events(text, &mut events);
    let mut html_buf = String::new();
    html::push_html(&mut html_buf, events.into_iter());
    html_buf
}

fn linkify_events<'a>(text: &'a str, events: &mut Vec<Event<'a>>) {
    let mut last_match_end = 0;
    for mat in url_many_regex().find_iter(text) {
        if mat.start() > last_match_end {
            events.push(Event::Text(text[last_match_end..mat.start()].into()));
        }
        let link_tag = HtmlTag::Link(LinkType::Autolink, mat.as_str().into(), "".into());
        events.push(Event::Start(link_tag.clone()));
        events.push(Event::Text(mat.as_str().into()));
        events.push(Event::End(link_tag));
        last_match_end = mat.end();
    }
    if last_match_end < text.len() {
        events.push(Event::Text(text[last_match_end..].into()));
    }
}

pub fn url_many_regex() -> &'static Regex {
    lazy_static! {
        // trailing punctuation belongs to the sentence, not the url
        static ref RE: Regex =
            Regex::new(r#"https?://[^\s<>"']*[^\s<>"'.,;:!?)\]]"#).unwrap();
    }
    &RE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(url: &str, start: usize, length: usize) -> Tag {
        Tag {
            url: Some(url.to_string()),
            ..Tag::new(ObjectType::Person).with_span(start, length)
        }
    }

    #[test]
    fn test_wraps_exact_spans() {
        let tags = vec![
            tag("https://www.facebook.com/221330", 3, 5),
            tag("https://www.facebook.com/695687650", 10, 9),
        ];
        let html = Splicer::new("cc Sam G, Michael M").tags(&tags).render();
        assert_eq!(
            html,
            "cc <a href=\"https://www.facebook.com/221330\">Sam G</a>, \
             <a href=\"https://www.facebook.com/695687650\">Michael M</a>"
        );
    }

    #[test]
    fn test_tag_order_does_not_matter() {
        let tags = vec![tag("http://b", 4, 1), tag("http://a", 0, 1)];
        let html = Splicer::new("a & b").tags(&tags).render();
        assert_eq!(html, "<a href=\"http://a\">a</a> &amp; <a href=\"http://b\">b</a>");
    }

    #[test]
    fn test_no_tags_escapes_only() {
        let content = "x < y & \"z\"";
        let html = Splicer::new(content).render();
        assert_eq!(html, "x &lt; y &amp; &quot;z&quot;");
        assert_eq!(html, escape(content));
        assert_eq!(Splicer::new(content).render(), html);
    }

    #[test]
    fn test_html_flavor_is_not_reescaped() {
        let tags = vec![tag("http://my/link", 12, 8)];
        let html = Splicer::new("Entity &lt; link too")
            .flavor(Flavor::Html)
            .tags(&tags)
            .render();
        assert_eq!(html, "Entity &lt; <a href=\"http://my/link\">link too</a>");
    }

    #[test]
    fn test_clamps_past_end() {
        let tags = vec![tag("http://x", 2, 100), tag("http://y", 50, 2)];
        let html = Splicer::new("abcd").tags(&tags).render();
        assert_eq!(
            html,
            "ab<a href=\"http://x\">cd</a><a href=\"http://y\"></a>"
        );
    }

    #[test]
    fn test_zero_length_marker() {
        let tags = vec![tag("http://x", 1, 0)];
        let html = Splicer::new("ab").tags(&tags).render();
        assert_eq!(html, "a<a href=\"http://x\"></a>b");
    }

    #[test]
    fn test_overlapping_spans_nest() {
        let tags = vec![tag("http://outer", 0, 5), tag("http://inner", 2, 5)];
        let html = Splicer::new("abcdefg").tags(&tags).render();
        assert_eq!(
            html,
            "<a href=\"http://outer\">ab<a href=\"http://inner\">cde</a>fg</a>"
        );
    }

    #[test]
    fn test_high_code_points() {
        let tags = vec![tag("https://twitter.com/itsmaeril", 8, 10)];
        let html = Splicer::new("💯💯💯 (by @itsmaeril)").tags(&tags).render();
        assert_eq!(
            html,
            "💯💯💯 (by <a href=\"https://twitter.com/itsmaeril\">@itsmaeril</a>)"
        );
    }

    #[test]
    fn test_inline_tag_without_url() {
        let tags = vec![Tag {
            display_name: Some("a".into()),
            ..Tag::new(ObjectType::Person).with_span(0, 1)
        }];
        let html = Splicer::new("ab").tags(&tags).render();
        assert_eq!(html, "<a class=\"tag\" aria-hidden=\"true\">a</a>b");
    }

    #[test]
    fn test_inline_tag_without_url_or_name_is_dropped() {
        let tags = vec![
            Tag::new(ObjectType::Person).with_span(0, 1),
            Tag {
                display_name: Some(String::new()),
                ..Tag::new(ObjectType::Person).with_span(1, 1)
            },
        ];
        assert_eq!(Splicer::new("a<b").tags(&tags).render(), "a&lt;b");
    }

    #[test]
    fn test_out_of_line_tags() {
        let tags = vec![
            Tag {
                display_name: Some("bar".into()),
                ..Tag::default()
            },
            Tag {
                url: Some("http://baz".into()),
                display_name: Some("baz".into()),
                ..Tag::default()
            },
            Tag {
                url: Some("http://baj".into()),
                ..Tag::default()
            },
            Tag::default(),
            Tag {
                url: Some("http://m".into()),
                display_name: Some("m".into()),
                ..Tag::new(ObjectType::Mention)
            },
            Tag {
                url: Some("http://c".into()),
                display_name: Some("c".into()),
                ..Tag::new(ObjectType::Hashtag)
            },
        ];
        let html = Splicer::new("foo").tags(&tags).render();
        assert_eq!(
            html,
            "foo\
             \n<a class=\"p-category\" href=\"http://c\">c</a>\
             \n<a class=\"u-mention\" href=\"http://m\">m</a>\
             \n<a class=\"tag\" aria-hidden=\"true\"></a>\
             \n<a class=\"tag\" href=\"http://baz\">baz</a>\
             \n<a class=\"tag\" aria-hidden=\"true\" href=\"http://baj\"></a>"
        );
    }

    #[test]
    fn test_out_of_line_tag_with_several_urls() {
        let tags = vec![Tag {
            url: Some("http://1".into()),
            urls: vec![
                as1_model::UrlValue::new("http://1"),
                as1_model::UrlValue::new("https://2"),
            ],
            ..Tag::default()
        }];
        assert_eq!(
            Splicer::new("").tags(&tags).render(),
            "\n<a class=\"tag\" aria-hidden=\"true\" href=\"http://1\"></a>\
             \n<a class=\"tag\" aria-hidden=\"true\" href=\"https://2\"></a>"
        );
    }

    #[test]
    fn test_appended_fragments_follow_tags() {
        let tags = vec![Tag {
            url: Some("http://x".into()),
            display_name: Some("x".into()),
            ..Tag::default()
        }];
        let html = Splicer::new("foo")
            .tags(&tags)
            .append("\n<p><img src=\"http://pic\" /></p>")
            .render();
        assert_eq!(
            html,
            "foo\n<a class=\"tag\" href=\"http://x\">x</a>\n<p><img src=\"http://pic\" /></p>"
        );
    }

    #[test]
    fn test_for_object_uses_html_flag() {
        let object = Object {
            content: Some("<b>hi</b>".into()),
            content_is_html: true,
            ..Object::default()
        };
        assert_eq!(Splicer::for_object(&object).render(), "<b>hi</b>");

        let object = Object {
            content_is_html: false,
            ..object
        };
        assert_eq!(Splicer::for_object(&object).render(), "&lt;b&gt;hi&lt;/b&gt;");
    }

    #[test]
    fn test_linkify() {
        assert_eq!(
            linkify("see http://foo.com/bar, & <more>"),
            "see <a href=\"http://foo.com/bar\">http://foo.com/bar</a>, &amp; &lt;more&gt;"
        );
        assert_eq!(linkify("no links"), "no links");
    }

    #[test]
    fn test_linkify_skips_tagged_spans() {
        let tags = vec![tag("http://tagged", 0, 8)];
        let html = Splicer::new("http://a http://b")
            .linkify(true)
            .tags(&tags)
            .render();
        assert_eq!(
            html,
            "<a href=\"http://tagged\">http://a</a> <a href=\"http://b\">http://b</a>"
        );
    }
}
