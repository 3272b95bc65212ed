//! Proxy HTTP server.
//!
//! Exposes the browser UI at `/` and the JSON rewrite API at `POST /fetch`:
//! the request names a URL, the upstream body is fetched, rewritten, and
//! returned together with the rewritten title.

mod lifecycle;
mod response;

use crate::{
    config::ProxyConfig,
    debug,
    fetch::PageFetcher,
    log, rewrite,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Method, Request, Server};

/// Request body for `POST /fetch`.
#[derive(Debug, Deserialize)]
struct FetchRequest {
    #[serde(default)]
    url: String,
}

/// Success payload for `POST /fetch`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchResponse {
    success: bool,
    content: String,
    title: String,
    original_url: String,
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    fetcher: Arc<PageFetcher>,
}

/// Bind the HTTP server without starting the request loop
///
/// Separating bind from run lets tests (and the signal handler) observe the
/// bound address before the blocking loop starts.
pub fn bind_server(config: Arc<ProxyConfig>) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    crate::core::register_server(Arc::clone(&server));

    let fetcher = Arc::new(PageFetcher::new(&config.fetch)?);

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        addr,
        fetcher,
    })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the request loop (blocking). Returns once shutdown unblocks
    /// the listener.
    pub fn run(self) -> Result<()> {
        // Thread pool keeps one slow upstream from blocking other requests
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .expect("failed to create thread pool");

        for request in self.server.incoming_requests() {
            let fetcher = Arc::clone(&self.fetcher);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &fetcher) {
                    log!("serve"; "request error: {e}");
                }
            });
        }
        Ok(())
    }
}

/// Handle a single HTTP request
fn handle_request(mut request: Request, fetcher: &PageFetcher) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let method = request.method().clone();
    let url = request.url().to_string();

    match (method, url.as_str()) {
        (Method::Get, "/") => response::respond_index(request),
        (Method::Post, "/fetch") => {
            let body = read_fetch_request(&mut request);
            handle_fetch(request, body, fetcher)
        }
        _ => response::respond_not_found(request),
    }
}

/// Parse the JSON request body; `None` when missing or malformed.
fn read_fetch_request(request: &mut Request) -> Option<FetchRequest> {
    serde_json::from_reader(request.as_reader()).ok()
}

fn handle_fetch(
    request: Request,
    body: Option<FetchRequest>,
    fetcher: &PageFetcher,
) -> Result<()> {
    let url = match body {
        Some(FetchRequest { url }) if !url.trim().is_empty() => url,
        _ => return response::respond_error(request, 400, "URL is required"),
    };

    debug!("fetch"; "{url}");
    let html = match fetcher.fetch(&url) {
        Ok(html) => html,
        Err(e) => {
            log!("fetch"; "{url}: {e}");
            return response::respond_error(
                request,
                500,
                &format!("Failed to fetch content: {e}"),
            );
        }
    };

    let rewritten = rewrite::rewrite_document(&html);
    response::respond_json(
        request,
        200,
        &FetchResponse {
            success: true,
            content: rewritten.html,
            title: rewritten.title,
            original_url: url,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use std::net::{IpAddr, Ipv4Addr};
    use std::thread;

    const UPSTREAM_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Yale University Test Page</title></head>
<body>
  <h1>Welcome to Yale University</h1>
  <a href="https://yale.edu/about">About Yale</a>
</body>
</html>"#;

    /// Serve a fixed body on an ephemeral localhost port.
    fn spawn_upstream(body: &'static str) -> SocketAddr {
        let server = Server::http("127.0.0.1:0").expect("upstream should bind");
        let addr = server.server_addr().to_ip().expect("ip address");
        thread::spawn(move || {
            for request in server.incoming_requests() {
                let response = tiny_http::Response::from_string(body).with_header(
                    tiny_http::Header::from_bytes("Content-Type", "text/html").unwrap(),
                );
                let _ = request.respond(response);
            }
        });
        addr
    }

    /// Bind a proxy on an ephemeral port and run it in the background.
    fn spawn_proxy() -> SocketAddr {
        let mut config = ProxyConfig::default();
        config.serve.interface = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
        config.serve.port = 0;

        let bound = bind_server(Arc::new(config)).expect("proxy should bind");
        let addr = bound.addr();
        thread::spawn(move || {
            let _ = bound.run();
        });
        addr
    }

    fn post_fetch(proxy: SocketAddr, body: &str) -> (u16, serde_json::Value) {
        let client = reqwest::blocking::Client::new();
        let response = client
            .post(format!("http://{proxy}/fetch"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .expect("request should reach the proxy");
        let status = response.status().as_u16();
        let value = serde_json::from_str(&response.text().expect("body"))
            .expect("proxy always answers with JSON");
        (status, value)
    }

    #[test]
    fn test_fetch_rewrites_upstream_content() {
        let upstream = spawn_upstream(UPSTREAM_HTML);
        let proxy = spawn_proxy();

        let url = format!("http://{upstream}/");
        let (status, body) = post_fetch(proxy, &format!(r#"{{"url": "{url}"}}"#));

        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["title"], "Fale University Test Page");
        assert_eq!(body["originalUrl"], url);

        let content = body["content"].as_str().expect("content is a string");
        assert!(content.contains("Welcome to Fale University"));
        assert!(content.contains("About Fale"));
        // URLs keep the original word
        assert!(content.contains(r#"href="https://yale.edu/about""#));
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let proxy = spawn_proxy();

        let (status, body) = post_fetch(proxy, "{}");
        assert_eq!(status, 400);
        assert_eq!(body["error"], "URL is required");

        // Malformed JSON body gets the same treatment
        let (status, body) = post_fetch(proxy, "not json");
        assert_eq!(status, 400);
        assert_eq!(body["error"], "URL is required");
    }

    #[test]
    fn test_invalid_url_surfaces_fetch_failure() {
        let proxy = spawn_proxy();

        let (status, body) = post_fetch(proxy, r#"{"url": "not-a-valid-url"}"#);
        assert_eq!(status, 500);
        let message = body["error"].as_str().expect("error is a string");
        assert!(message.starts_with("Failed to fetch content:"));
    }

    #[test]
    fn test_index_page_is_served() {
        let proxy = spawn_proxy();

        let response = reqwest::blocking::get(format!("http://{proxy}/"))
            .expect("request should reach the proxy");
        assert_eq!(response.status().as_u16(), 200);
        assert!(response.text().expect("body").contains("Faleproxy"));
    }

    #[test]
    fn test_unknown_route_is_404() {
        let proxy = spawn_proxy();

        let response = reqwest::blocking::get(format!("http://{proxy}/nope"))
            .expect("request should reach the proxy");
        assert_eq!(response.status().as_u16(), 404);
    }

    #[test]
    fn test_fetch_response_field_names_match_the_api() {
        let payload = FetchResponse {
            success: true,
            content: "<html></html>".to_string(),
            title: "t".to_string(),
            original_url: "http://example.com/".to_string(),
        };
        let value = serde_json::to_value(&payload).expect("serializes");

        assert!(value.get("success").is_some());
        assert!(value.get("content").is_some());
        assert!(value.get("title").is_some());
        assert!(value.get("originalUrl").is_some());
        assert!(value.get("original_url").is_none());
    }
}
