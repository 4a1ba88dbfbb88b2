// src/crawl/scope.rs
// =============================================================================
// Decides whether a discovered href belongs to the domain being crawled.
//
// Rules, in order:
// 1. Surrounding whitespace is trimmed (the fetcher hands hrefs over
//    untouched, so this is the only place it happens), then empty hrefs
//    are rejected
// 2. Everything from the first '?' onward is dropped
// 3. Root-relative hrefs ("/about") are made absolute with https
//    Protocol-relative hrefs ("//example.com/x") get "https:" in front
// 4. Hrefs that already carry an http(s) scheme are kept as they are
// 5. Anything else is rejected ("about", "#top", "mailto:...")
// 6. The result must contain the domain somewhere in it
//
// Running the filter on its own output gives the same string back.
// =============================================================================

#[derive(Debug, Clone)]
pub struct Scope {
    domain: String,
}

impl Scope {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    // Returns the normalized absolute URL if `raw_href` should be crawled
    //
    // Examples with domain "example.com":
    //   "/about"                     -> Some("https://example.com/about")
    //   "https://example.com/x?y=1"  -> Some("https://example.com/x")
    //   "https://other.com/"         -> None
    //   "#top"                       -> None
    pub fn in_scope(&self, raw_href: &str) -> Option<String> {
        let href = raw_href.trim();
        if href.is_empty() {
            return None;
        }

        // For now, we don't care about query params
        let href = match href.find('?') {
            Some(idx) => &href[..idx],
            None => href,
        };

        let absolute = if href.starts_with("//") {
            format!("https:{}", href)
        } else if href.starts_with('/') {
            format!("https://{}{}", self.domain, href)
        } else if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            return None;
        };

        if absolute.contains(&self.domain) {
            Some(absolute)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Scope {
        Scope::new("example.com")
    }

    #[test]
    fn test_root_relative_is_resolved_with_https() {
        assert_eq!(
            scope().in_scope("/about"),
            Some("https://example.com/about".to_string())
        );
    }

    #[test]
    fn test_query_string_is_stripped() {
        assert_eq!(
            scope().in_scope("https://example.com/x?y=1"),
            Some("https://example.com/x".to_string())
        );
        assert_eq!(
            scope().in_scope("/search?q=rust&page=2"),
            Some("https://example.com/search".to_string())
        );
    }

    #[test]
    fn test_other_domain_is_rejected() {
        assert_eq!(scope().in_scope("https://other.com/"), None);
        assert_eq!(scope().in_scope("//cdn.other.com/lib.js"), None);
    }

    #[test]
    fn test_fragment_and_relative_are_rejected() {
        assert_eq!(scope().in_scope("#top"), None);
        assert_eq!(scope().in_scope("about.html"), None);
        assert_eq!(scope().in_scope("mailto:me@example.com"), None);
        assert_eq!(scope().in_scope("javascript:void(0)"), None);
    }

    #[test]
    fn test_padded_href_is_trimmed() {
        assert_eq!(
            scope().in_scope(" /padded "),
            Some("https://example.com/padded".to_string())
        );
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(scope().in_scope(""), None);
        assert_eq!(scope().in_scope("   "), None);
        // Nothing left once the query string is gone
        assert_eq!(scope().in_scope("?page=2"), None);
    }

    #[test]
    fn test_absolute_urls_are_kept() {
        assert_eq!(
            scope().in_scope("http://example.com/plain"),
            Some("http://example.com/plain".to_string())
        );
        assert_eq!(
            scope().in_scope("https://blog.example.com/post"),
            Some("https://blog.example.com/post".to_string())
        );
    }

    #[test]
    fn test_protocol_relative() {
        assert_eq!(
            scope().in_scope("//example.com/docs"),
            Some("https://example.com/docs".to_string())
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let scope = scope();
        for raw in [
            "/about",
            "/a/b/c?x=1",
            "https://example.com/x?y=1",
            "//example.com/docs",
            "http://example.com/",
        ] {
            let once = scope.in_scope(raw).unwrap();
            let twice = scope.in_scope(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {}", raw);
        }
    }

    #[test]
    fn test_accepted_urls_contain_domain() {
        let scope = scope();
        for raw in ["/x", "https://example.com", "https://evil.com/?r=example.com"] {
            if let Some(url) = scope.in_scope(raw) {
                assert!(url.contains("example.com"), "{} escaped the scope", url);
            }
        }
    }
}
