use as1_model::Ref;
use as1_ref::{TagUri, UrlPatternTable};
use async_trait::async_trait;
use log::{trace, warn};
use serde_json::Value;

use crate::SourceError;

/// At most this many lookups per resolution.
const MAX_ATTEMPTS: usize = 3;

/// Checks whether one candidate native id exists on the platform.
#[async_trait]
pub trait TargetLookup: Send + Sync {
    /// The platform's object for `id`. `SourceError::Http` means this
    /// candidate failed; any other error aborts the resolution.
    async fn lookup(&self, id: &str) -> Result<Value, SourceError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Read straight from a known URL shape.
    Pattern(&'static str),
    /// Found by the n-th lookup, counting from 1.
    Lookup(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTarget {
    pub id: String,
    pub owner: Option<String>,
    pub resolution: Resolution,
    /// The looked up object, when a lookup happened.
    pub object: Option<Value>,
}

/// Turns a weak `Ref` into a native id for one platform.
///
/// A URL that matches the pattern table resolves without touching the
/// network. Otherwise the id runs through a short chain of lookups:
/// for `A_B`, first `B`, then `A_B`, then `<owner hint>_B`; for a simple
/// id, first the id, then `<owner hint>_<id>`.
pub struct TargetResolver<'a> {
    domain: &'a str,
    patterns: &'a UrlPatternTable,
    owner_hint: Option<String>,
    noun: String,
    action: String,
}

impl<'a> TargetResolver<'a> {
    pub fn new(domain: &'a str, patterns: &'a UrlPatternTable) -> Self {
        Self {
            domain,
            patterns,
            owner_hint: None,
            noun: "a post".to_string(),
            action: "react to".to_string(),
        }
    }

    pub fn owner_hint(mut self, hint: Option<&str>) -> Self {
        self.owner_hint = hint.filter(|hint| !hint.is_empty()).map(String::from);
        self
    }

    /// Wording for the not-found error: "Could not find {noun} to {action}."
    pub fn describe(mut self, noun: impl Into<String>, action: impl Into<String>) -> Self {
        self.noun = noun.into();
        self.action = action.into();
        self
    }

    pub fn not_found(&self) -> SourceError {
        SourceError::target_not_found(self.noun.clone(), self.action.clone())
    }

    /// Pattern match on the target's url only.
    pub fn extract(&self, target: &Ref) -> Option<ResolvedTarget> {
        let url = target.url.as_deref()?;
        let native = self.patterns.extract(url)?;
        trace!("{} matched url pattern {}", url, native.pattern);
        Some(ResolvedTarget {
            id: native.id,
            owner: native.owner,
            resolution: Resolution::Pattern(native.pattern),
            object: None,
        })
    }

    /// Ids to look up for `id`, in order, without repeats.
    pub fn candidates(&self, id: &str) -> Vec<String> {
        let native = TagUri::native_id(id, self.domain).unwrap_or_else(|| id.to_string());
        let mut candidates = Vec::with_capacity(MAX_ATTEMPTS);
        match native.split_once('_') {
            Some((_, suffix)) if !suffix.is_empty() => {
                candidates.push(suffix.to_string());
                candidates.push(native.clone());
                if let Some(hint) = &self.owner_hint {
                    candidates.push(format!("{}_{}", hint, suffix));
                }
            }
            _ => {
                candidates.push(native.clone());
                if let Some(hint) = &self.owner_hint {
                    candidates.push(format!("{}_{}", hint, native));
                }
            }
        }
        let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !unique.contains(&candidate) {
                unique.push(candidate);
            }
        }
        unique.truncate(MAX_ATTEMPTS);
        unique
    }

    /// Runs the lookup chain for `id` and stops at the first hit.
    pub async fn lookup_id(
        &self,
        id: &str,
        lookup: &dyn TargetLookup,
    ) -> Result<Option<ResolvedTarget>, SourceError> {
        for (attempt, candidate) in self.candidates(id).into_iter().enumerate() {
            trace!("looking up {} (attempt {})", candidate, attempt + 1);
            match lookup.lookup(&candidate).await {
                Ok(Value::Null) | Ok(Value::Bool(false)) => {
                    warn!("lookup of {} came back empty", candidate);
                }
                Ok(object) => {
                    return Ok(Some(ResolvedTarget {
                        id: candidate,
                        owner: None,
                        resolution: Resolution::Lookup(attempt + 1),
                        object: Some(object),
                    }))
                }
                Err(err) if err.is_http() => {
                    warn!("lookup of {} failed: {}", candidate, err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }

    /// Pattern first, then the lookup chain. Exhaustion is
    /// `SourceError::TargetNotFound`.
    pub async fn resolve(
        &self,
        target: &Ref,
        lookup: &dyn TargetLookup,
    ) -> Result<ResolvedTarget, SourceError> {
        if let Some(resolved) = self.extract(target) {
            return Ok(resolved);
        }
        let id = match target.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => return Err(self.not_found()),
        };
        self.lookup_id(id, lookup)
            .await?
            .ok_or_else(|| self.not_found())
    }
}
