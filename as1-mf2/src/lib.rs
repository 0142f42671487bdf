// https://microformats.org/wiki/microformats2

use as1_source::SourceError;
use thiserror::Error as ThisError;

mod from_tree;
mod html;
mod item;
mod parse;
mod render;
mod to_tree;

pub use from_tree::{find_author, json_to_activity, json_to_object, json_to_object_fetching};
pub use html::{activities_to_html, hcard_to_html, object_to_html};
pub use item::{get_string_urls, Item, PropertyValue};
pub use parse::{html_to_activities, html_to_tree, Document};
pub use render::{img, render_content, RenderOptions};
pub use to_tree::{activity_to_json, object_to_json, object_urls};

#[derive(Debug, ThisError)]
pub enum Mf2Error {
    #[error("in-reply-to and tag-of together are ambiguous")]
    AmbiguousRelation,
    #[error("Failed to fetch author, cause: {0}")]
    Fetch(#[from] SourceError),
}
