//! Remote URL canonicalization.
//!
//! Remotes are sometimes cloned with decorated URLs such as
//! `git+https://github.com/org/repo.git` or a proxy-prefixed form.
//! Canonicalization cuts everything before a known hosting prefix.

/// Extracts the canonical form given the URL and the byte offset where the
/// rule's prefix was found.
pub type Extractor = fn(url: &str, at: usize) -> String;

/// One known hosting provider.
#[derive(Debug, Clone, Copy)]
pub struct HostingRule {
    pub prefix: &'static str,
    pub extract: Extractor,
}

/// Keeps the URL from the prefix onwards.
pub fn from_prefix(url: &str, at: usize) -> String {
    url[at..].to_string()
}

/// Built-in providers, in priority order.
pub const DEFAULT_RULES: &[HostingRule] = &[
    HostingRule {
        prefix: "https://github.com/",
        extract: from_prefix,
    },
    HostingRule {
        prefix: "https://gitlab.com/",
        extract: from_prefix,
    },
];

/// Canonicalizes `url` using [`DEFAULT_RULES`].
#[must_use]
pub fn canonicalize(url: &str) -> String {
    canonicalize_with(DEFAULT_RULES, url)
}

/// Applies the first rule whose prefix occurs anywhere in `url`.
/// Returns `url` unchanged when no rule matches.
#[must_use]
pub fn canonicalize_with(rules: &[HostingRule], url: &str) -> String {
    rules
        .iter()
        .find_map(|rule| url.find(rule.prefix).map(|at| (rule.extract)(url, at)))
        .unwrap_or_else(|| url.to_string())
}
