use as1_model::Activity;
use lazy_static::lazy_static;
use log::trace;
use regex::Regex;
use scraper::{node::Node, ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{json_to_activity, Item, Mf2Error, PropertyValue};

/// Parsed microformats2 document: the top-level items in source order.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Document {
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Document {
    /// Top-level items of `item_type`, plus those directly inside an h-feed.
    pub fn find(&self, item_type: &str) -> Vec<&Item> {
        let mut found = Vec::new();
        for item in &self.items {
            if item.has_type(item_type) {
                found.push(item);
            } else if item.has_type("h-feed") {
                found.extend(item.children.iter().filter(|child| child.has_type(item_type)));
            }
        }
        found
    }
}

fn h_class() -> &'static Regex {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^h(?:-[a-z0-9]+)+$").unwrap();
    }
    &RE
}

fn property_class() -> &'static Regex {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^(?P<prefix>p|u|dt|e)-(?P<name>[a-z0-9]+(?:-[a-z0-9]+)*)$").unwrap();
    }
    &RE
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Prefix {
    Plain,
    Url,
    Date,
    Embedded,
}

struct Parser {
    base: Option<Url>,
}

/// Parses microformats2 items out of an HTML page. Relative URLs are
/// resolved against `<base href>`, else `base_url`.
pub fn html_to_tree(html: &str, base_url: Option<&str>) -> Document {
    let document = Html::parse_document(html);
    let page_base = base_url.and_then(|base| Url::parse(base).ok());
    let base = Selector::parse("base[href]")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|element| element.value().attr("href"))
                .and_then(|href| match &page_base {
                    Some(page) => page.join(href).ok(),
                    None => Url::parse(href).ok(),
                })
        })
        .or(page_base);

    let parser = Parser { base };
    let mut items = Vec::new();
    parser.roots(document.root_element(), &mut items);
    trace!("parsed {} top-level mf2 items", items.len());
    Document { items }
}

/// The h-entries on a page, top-level or inside an h-feed, as activities.
pub fn html_to_activities(html: &str, base_url: Option<&str>) -> Result<Vec<Activity>, Mf2Error> {
    html_to_tree(html, base_url)
        .find("h-entry")
        .into_iter()
        .map(json_to_activity)
        .collect()
}

fn h_types(element: ElementRef) -> Vec<String> {
    let mut types: Vec<String> = element
        .value()
        .classes()
        .filter(|class| h_class().is_match(class))
        .map(String::from)
        .collect();
    types.sort();
    types.dedup();
    types
}

fn properties(element: ElementRef) -> Vec<(Prefix, String)> {
    let mut properties: Vec<(Prefix, String)> = Vec::new();
    for class in element.value().classes() {
        let caps = match property_class().captures(class) {
            Some(caps) => caps,
            None => continue,
        };
        let prefix = match &caps["prefix"] {
            "p" => Prefix::Plain,
            "u" => Prefix::Url,
            "dt" => Prefix::Date,
            _ => Prefix::Embedded,
        };
        let property = (prefix, caps["name"].to_string());
        if !properties.contains(&property) {
            properties.push(property);
        }
    }
    properties
}

/// Text content with `<br>` as a newline and `<img>` as its alt text.
fn text_of(element: ElementRef) -> String {
    fn push_text(element: ElementRef, out: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) if el.name() == "br" => out.push('\n'),
                Node::Element(el) if el.name() == "img" => {
                    out.push_str(el.attr("alt").unwrap_or_default())
                }
                Node::Element(el) if matches!(el.name(), "script" | "style" | "template") => {}
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        push_text(child, out);
                    }
                }
                _ => {}
            }
        }
    }
    let mut out = String::new();
    push_text(element, &mut out);
    out.trim().to_string()
}

impl Parser {
    fn resolve(&self, url: &str) -> String {
        let url = url.trim();
        self.base
            .as_ref()
            .and_then(|base| base.join(url).ok())
            .map(String::from)
            .unwrap_or_else(|| url.to_string())
    }

    fn roots(&self, element: ElementRef, items: &mut Vec<Item>) {
        if !h_types(element).is_empty() {
            items.push(self.item(element));
            return;
        }
        for child in element.children().filter_map(ElementRef::wrap) {
            self.roots(child, items);
        }
    }

    fn item(&self, element: ElementRef) -> Item {
        let mut item = Item::new(h_types(element));
        self.properties(element, &mut item);

        let has_name_source = item
            .properties
            .keys()
            .any(|name| name == "name")
            || !item.children.is_empty()
            || self.has_text_properties(element);
        if !has_name_source {
            let name = match element.value().name() {
                "img" | "area" => element.value().attr("alt").unwrap_or_default().to_string(),
                "abbr" => element
                    .value()
                    .attr("title")
                    .map(String::from)
                    .unwrap_or_else(|| text_of(element)),
                _ => text_of(element),
            };
            item.extend("name", vec![name]);
        }
        if !item.has("url") && matches!(element.value().name(), "a" | "area") {
            if let Some(href) = element.value().attr("href") {
                item.push("url", self.resolve(href));
            }
        }
        if !item.has("photo") && element.value().name() == "img" {
            if let Some(src) = element.value().attr("src") {
                item.push("photo", self.resolve(src));
            }
        }
        item
    }

    /// Whether any p- or e- property sits under `element` outside nested items.
    fn has_text_properties(&self, element: ElementRef) -> bool {
        element.children().filter_map(ElementRef::wrap).any(|child| {
            properties(child)
                .iter()
                .any(|(prefix, _)| matches!(prefix, Prefix::Plain | Prefix::Embedded))
                || (h_types(child).is_empty() && self.has_text_properties(child))
        })
    }

    fn properties(&self, element: ElementRef, item: &mut Item) {
        for child in element.children().filter_map(ElementRef::wrap) {
            let properties = properties(child);
            if !h_types(child).is_empty() {
                let nested = self.item(child);
                if properties.is_empty() {
                    item.children.push(nested.clone());
                }
                for (prefix, name) in properties {
                    let mut nested = nested.clone();
                    nested.value = Some(match prefix {
                        Prefix::Url => nested
                            .first_text("url")
                            .map(String::from)
                            .unwrap_or_else(|| self.value(child, prefix)),
                        Prefix::Plain => nested
                            .first_text("name")
                            .map(String::from)
                            .unwrap_or_else(|| text_of(child)),
                        _ => text_of(child),
                    });
                    item.push(&name, nested);
                }
                continue;
            }

            for (prefix, name) in &properties {
                let value = match prefix {
                    Prefix::Embedded => PropertyValue::Embedded {
                        value: Some(text_of(child)),
                        html: Some(child.inner_html().trim().to_string()),
                    },
                    _ => PropertyValue::Text(self.value(child, *prefix)),
                };
                item.push(name, value);
            }
            self.properties(child, item);
        }
    }

    fn value(&self, element: ElementRef, prefix: Prefix) -> String {
        let el = element.value();
        let attr = |name: &str| el.attr(name).map(String::from);
        match prefix {
            Prefix::Url => match el.name() {
                "a" | "area" | "link" => attr("href"),
                "img" | "audio" | "source" | "iframe" => attr("src"),
                "video" => attr("src").or_else(|| attr("poster")),
                "object" => attr("data"),
                _ => attr("value"),
            }
            .map(|url| self.resolve(&url))
            .unwrap_or_else(|| text_of(element)),
            Prefix::Date => match el.name() {
                "time" | "ins" | "del" => attr("datetime"),
                "abbr" => attr("title"),
                "data" | "input" => attr("value"),
                _ => None,
            }
            .unwrap_or_else(|| text_of(element)),
            _ => match el.name() {
                "img" | "area" => attr("alt"),
                "abbr" | "link" => attr("title"),
                "data" | "input" => attr("value"),
                _ => None,
            }
            .unwrap_or_else(|| text_of(element)),
        }
    }
}
