use serde::Deserialize;

use crate::IncludeLink;

const ELLIPSIS: char = '…';

/// Character budget for a platform. All lengths count code points.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TruncateOptions {
    /// Unlimited when absent.
    pub limit: Option<usize>,
    /// Length every link counts as when the platform shortens links itself.
    pub link_length: Option<usize>,
    pub link_prefix: String,
    pub link_suffix: String,
}

impl Default for TruncateOptions {
    fn default() -> Self {
        Self {
            limit: None,
            link_length: None,
            link_prefix: " (".to_string(),
            link_suffix: ")".to_string(),
        }
    }
}

impl TruncateOptions {
    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    fn link_cost(&self, url: &str) -> usize {
        self.link_prefix.chars().count()
            + self.link_length.unwrap_or_else(|| url.chars().count())
            + self.link_suffix.chars().count()
    }

    fn with_link(&self, text: &str, url: &str) -> String {
        format!("{}{}{}{}", text, self.link_prefix, url, self.link_suffix)
    }
}

/// Shortens `content` to fit the budget in `options`, optionally followed by
/// a link to `url`.
///
/// Text is cut at a word boundary when there is one and ends in `…`. With
/// `IncludeLink::IfTruncated` the link only appears when text was cut.
pub fn truncate(
    content: &str,
    url: Option<&str>,
    include_link: IncludeLink,
    options: &TruncateOptions,
) -> String {
    let link = match include_link {
        IncludeLink::Omit => None,
        IncludeLink::Include | IncludeLink::IfTruncated => url,
    };
    let link_cost = link.map_or(0, |url| options.link_cost(url));
    let always_link = include_link == IncludeLink::Include && link.is_some();

    let length = content.chars().count();
    let fits = match options.limit {
        None => true,
        Some(limit) if always_link => length + link_cost <= limit,
        Some(limit) => length <= limit,
    };
    if fits {
        return match link {
            Some(url) if always_link => options.with_link(content, url),
            _ => content.to_string(),
        };
    }

    let limit = options.limit.unwrap_or(length);
    let budget = limit.saturating_sub(link_cost).saturating_sub(1);
    let shortened = format!("{}{}", cut_at_word(content, budget), ELLIPSIS);
    match link {
        Some(url) => options.with_link(&shortened, url),
        None => shortened,
    }
}

/// At most `max_chars` code points of `text`, backing up to the last
/// whitespace when the cut lands inside a word.
fn cut_at_word(text: &str, max_chars: usize) -> &str {
    let end = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(index, _)| index);
    let head = &text[..end];
    let mid_word = text[end..]
        .chars()
        .next()
        .map_or(false, |next| !next.is_whitespace());
    if mid_word {
        if let Some(space) = head.rfind(char::is_whitespace) {
            return head[..space].trim_end();
        }
    }
    head.trim_end()
}

/// Cuts `text` to `max_chars` code points, the last one being `…`.
pub fn ellipsize(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}{}", head, ELLIPSIS)
}
