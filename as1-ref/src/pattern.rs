use regex::Regex;

use crate::RefError;

/// Native id pulled out of a platform URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeTarget {
    pub id: String,
    /// Owner segment (user name or numeric user id) when the URL carries one.
    pub owner: Option<String>,
    pub pattern: &'static str,
}

/// One known native URL shape. Must capture `id`, may capture `owner`.
#[derive(Clone, Debug)]
pub struct UrlPattern {
    name: &'static str,
    regex: Regex,
}

impl UrlPattern {
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, RefError> {
        let regex = Regex::new(pattern).map_err(|source| RefError::Pattern { name, source })?;
        if !regex.capture_names().any(|group| group == Some("id")) {
            return Err(RefError::BadFormat {
                ref_type: "UrlPattern",
                input: pattern.to_string(),
            });
        }
        Ok(Self { name, regex })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn extract(&self, url: &str) -> Option<NativeTarget> {
        let caps = self.regex.captures(url)?;
        let id = caps.name("id")?.as_str();
        if id.is_empty() {
            return None;
        }
        Some(NativeTarget {
            id: id.to_string(),
            owner: caps.name("owner").map(|owner| owner.as_str().to_string()),
            pattern: self.name,
        })
    }
}

/// Ordered, versioned list of URL patterns owned by one adapter.
///
/// Patterns are tried in order, so the most specific must come first.
#[derive(Clone, Debug, Default)]
pub struct UrlPatternTable {
    version: u32,
    patterns: Vec<UrlPattern>,
}

impl UrlPatternTable {
    pub fn new(version: u32, patterns: Vec<UrlPattern>) -> Self {
        Self { version, patterns }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn patterns(&self) -> &[UrlPattern] {
        &self.patterns
    }

    pub fn extract(&self, url: &str) -> Option<NativeTarget> {
        self.patterns.iter().find_map(|pattern| pattern.extract(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> UrlPatternTable {
        UrlPatternTable::new(
            1,
            vec![
                UrlPattern::new("post", r"^https?://example\.com/(?P<owner>[^/]+)/posts/(?P<id>\d+)")
                    .unwrap(),
                UrlPattern::new("object", r"^https?://example\.com/(?P<id>\d+)/?$").unwrap(),
            ],
        )
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let target = table().extract("https://example.com/alice/posts/333").unwrap();
        assert_eq!(target.id, "333");
        assert_eq!(target.owner.as_deref(), Some("alice"));
        assert_eq!(target.pattern, "post");

        let target = table().extract("https://example.com/234/").unwrap();
        assert_eq!(target.id, "234");
        assert_eq!(target.owner, None);
        assert_eq!(target.pattern, "object");
    }

    #[test]
    fn test_no_match() {
        assert_eq!(table().extract("https://other.com/234"), None);
        assert_eq!(UrlPatternTable::default().extract("https://example.com/1"), None);
    }

    #[test]
    fn test_pattern_requires_id_group() {
        assert!(matches!(
            UrlPattern::new("bad", r"^https?://example\.com/(\d+)"),
            Err(RefError::BadFormat { .. })
        ));
        assert!(matches!(
            UrlPattern::new("broken", r"(?P<id>"),
            Err(RefError::Pattern { .. })
        ));
    }
}
