// src/fetch/http.rs
// =============================================================================
// This module fetches pages over HTTP.
//
// Key functionality:
// - Makes one GET request per page (no retries)
// - Treats any non-2xx status as a failure carrying the status code
// - Only follows redirects that stay inside the crawled domain
// - Sorts reqwest errors into network errors and body decode errors
// - Hands the body to html::extract_hrefs
//
// Rust concepts:
// - async/await: For network I/O that doesn't block other workers
// - map_err: Converting one error type into another
// =============================================================================

use async_trait::async_trait;
use reqwest::redirect::{Attempt, Policy};
use reqwest::Client;
use std::time::Duration;

use super::{extract_hrefs, FetchError, PageFetcher};
use crate::crawl::CrawlError;

// The production fetcher
//
// The reqwest Client is cheap to clone (it's a reference counter internally)
// and pools connections, so all workers share a single one.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds a fetcher for `domain` whose requests give up after `timeout`
    pub fn new(domain: &str, timeout: Duration, user_agent: &str) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(same_domain_redirects(domain.to_string()))
            .build()
            .map_err(|e| CrawlError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_and_extract(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(categorize_error)?;

        extract_hrefs(&body)
    }
}

const MAX_REDIRECTS: usize = 5;

// Follows up to MAX_REDIRECTS redirects, but only while the target host still
// contains the domain. A redirect that leaves the domain is not followed; the
// 3xx response itself comes back and ends up as FetchError::Status.
fn same_domain_redirects(domain: String) -> Policy {
    Policy::custom(move |attempt: Attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }

        let in_domain = attempt
            .url()
            .host_str()
            .map_or(false, |host| host.contains(&domain));

        if in_domain {
            attempt.follow()
        } else {
            attempt.stop()
        }
    })
}

// Sorts a reqwest error into our error taxonomy
//
// A decode error means the bytes arrived but could not be turned into text;
// everything else happened on the wire.
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_decode() {
        FetchError::Parse(error.to_string())
    } else {
        FetchError::Network(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        // wiremock listens on 127.0.0.1, so that is the crawled "domain"
        HttpFetcher::new("127.0.0.1", Duration::from_secs(5), "domain-crawler-test").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_hrefs() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body>
                    <a href="/about">About</a>
                    <a href="https://example.com/blog?page=2">Blog</a>
                </body></html>"#,
            ))
            .mount(&mock_server)
            .await;

        let hrefs = fetcher()
            .fetch_and_extract(&format!("{}/", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(hrefs, vec!["/about", "https://example.com/blog?page=2"]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let result = fetcher()
            .fetch_and_extract(&format!("{}/missing", mock_server.uri()))
            .await;

        assert_eq!(result, Err(FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_server_error_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let result = fetcher().fetch_and_extract(&mock_server.uri()).await;

        assert_eq!(result, Err(FetchError::Status(503)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Grab a free port, then close it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = fetcher()
            .fetch_and_extract(&format!("http://{}/", addr))
            .await;

        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    #[tokio::test]
    async fn test_follows_redirect_inside_domain() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("Location", format!("{}/new", mock_server.uri()).as_str()),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/moved">m</a>"#))
            .mount(&mock_server)
            .await;

        let hrefs = fetcher()
            .fetch_and_extract(&format!("{}/old", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(hrefs, vec!["/moved"]);
    }

    #[tokio::test]
    async fn test_does_not_follow_redirect_off_domain() {
        let mock_server = MockServer::start().await;
        let port = mock_server.address().port();

        // Same server, but reached as "localhost", which is outside the
        // "127.0.0.1" domain
        Mock::given(method("GET"))
            .and(path("/leave"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("http://localhost:{}/elsewhere", port).as_str()),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/elsewhere"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/x">x</a>"#))
            .expect(0)
            .mount(&mock_server)
            .await;

        let result = fetcher()
            .fetch_and_extract(&format!("{}/leave", mock_server.uri()))
            .await;

        assert_eq!(result, Err(FetchError::Status(302)));
    }
}
