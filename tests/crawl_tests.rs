//! Integration tests for the crawl engine
//!
//! These tests run real BFS crawls against a wiremock site through the
//! catch-all handler, end to end: HEAD probe, GET fetch, HTML link
//! extraction, frontier traversal, and artifact persistence.

use driftnet::config::FetchConfig;
use driftnet::crawler::{probe_links, run_task, CrawlMode, CrawlTask, PersistContext};
use driftnet::fetch::build_http_client;
use driftnet::handlers::{DefaultHandler, HandlerRegistry, RegistryBuilder};
use driftnet::sink::MemorySink;
use driftnet::summarize::NoopSummarizer;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_registry() -> HandlerRegistry {
    let fetch_config = FetchConfig {
        user_agent: "driftnet-test/0.1".to_string(),
        request_timeout_secs: 5,
        probe_timeout_secs: 2,
    };
    let client = build_http_client(&fetch_config).expect("client builds");

    RegistryBuilder::new()
        .default_handler(Arc::new(DefaultHandler::new(
            client,
            Arc::new(NoopSummarizer),
            Duration::from_secs(2),
        )))
        .build()
        .expect("registry builds")
}

fn bfs_task(seed: String, max_results: usize) -> CrawlTask {
    CrawlTask {
        seed,
        mode: CrawlMode::Bfs,
        confine_to_seed_domain: false,
        max_results,
    }
}

/// Mounts an HTML page at `page_path` whose body links to `hrefs`
async fn mount_page(server: &MockServer, page_path: &str, hrefs: &[String]) {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    let body = format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        page_path, links
    );

    Mock::given(method("HEAD"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_bfs_crawl_visits_levels_in_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    // / -> page1, page2; page1 -> page3
    mount_page(
        &server,
        "/",
        &[format!("{}/page1", base), format!("{}/page2", base)],
    )
    .await;
    mount_page(&server, "/page1", &[format!("{}/page3", base)]).await;
    mount_page(&server, "/page2", &[]).await;
    mount_page(&server, "/page3", &[]).await;

    let registry = test_registry();

    // Bound 2: seed plus the first level-1 page, nothing deeper
    let task = bfs_task(format!("{}/", base), 2);
    let results = run_task(&task, &registry, None).await.expect("task runs");

    assert_eq!(results.len(), 2);
    assert!(results.contains_key(&format!("{}/", base)));
    assert!(results.contains_key(&format!("{}/page1", base)));
    assert!(!results.contains_key(&format!("{}/page3", base)));

    // Bound 3: all of level 1 before any level-2 page
    let task = bfs_task(format!("{}/", base), 3);
    let results = run_task(&task, &registry, None).await.expect("task runs");

    assert_eq!(results.len(), 3);
    assert!(results.contains_key(&format!("{}/page2", base)));
    assert!(!results.contains_key(&format!("{}/page3", base)));
}

#[tokio::test]
async fn test_bfs_extracts_page_content() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &[]).await;

    let registry = test_registry();
    let task = bfs_task(format!("{}/", base), 5);
    let results = run_task(&task, &registry, None).await.expect("task runs");

    let record = &results[&format!("{}/", base)];
    // Page text includes the title we mounted
    assert!(record.content.as_deref().unwrap_or("").contains('/'));
    assert!(record.raw_source.as_deref().unwrap_or("").contains("<html>"));
}

#[tokio::test]
async fn test_mode_none_ignores_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &[format!("{}/page1", base)]).await;

    // page1 must never be requested
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let registry = test_registry();
    let task = CrawlTask {
        seed: format!("{}/", base),
        mode: CrawlMode::None,
        confine_to_seed_domain: false,
        max_results: 50,
    };
    let results = run_task(&task, &registry, None).await.expect("task runs");

    assert_eq!(results.len(), 1);
    assert!(results.contains_key(&format!("{}/", base)));
}

#[tokio::test]
async fn test_dedup_fetches_shared_target_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Both level-1 pages link to the same target
    mount_page(
        &server,
        "/",
        &[format!("{}/left", base), format!("{}/right", base)],
    )
    .await;
    mount_page(&server, "/left", &[format!("{}/shared", base)]).await;
    mount_page(&server, "/right", &[format!("{}/shared", base)]).await;

    Mock::given(method("HEAD"))
        .and(path("/shared"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>shared</body></html>")
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let registry = test_registry();
    let task = bfs_task(format!("{}/", base), 50);
    let results = run_task(&task, &registry, None).await.expect("task runs");

    assert_eq!(results.len(), 4);
    // Wiremock verifies the expect(1) on drop
}

#[tokio::test]
async fn test_domain_confinement_skips_external_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &[
            format!("{}/local", base),
            "https://external.test/far-away".to_string(),
        ],
    )
    .await;
    mount_page(&server, "/local", &[]).await;

    let registry = test_registry();
    let task = CrawlTask {
        seed: format!("{}/", base),
        mode: CrawlMode::Bfs,
        confine_to_seed_domain: true,
        max_results: 50,
    };
    let results = run_task(&task, &registry, None).await.expect("task runs");

    assert_eq!(results.len(), 2);
    assert!(results.contains_key(&format!("{}/local", base)));
    assert!(!results.contains_key("https://external.test/far-away"));
}

#[tokio::test]
async fn test_non_html_pages_get_records_but_no_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &[format!("{}/report.pdf", base)]).await;

    Mock::given(method("HEAD"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/pdf"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46])
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;

    let registry = test_registry();
    let task = bfs_task(format!("{}/", base), 50);
    let results = run_task(&task, &registry, None).await.expect("task runs");

    assert_eq!(results.len(), 2);
    let pdf_record = &results[&format!("{}/report.pdf", base)];
    assert!(pdf_record
        .content
        .as_deref()
        .unwrap_or("")
        .contains("not supported"));
}

#[tokio::test]
async fn test_failed_page_degrades_to_empty_record() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &[format!("{}/broken", base)]).await;

    // HEAD says HTML, GET refuses: extraction fails, traversal survives
    Mock::given(method("HEAD"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let registry = test_registry();
    let task = bfs_task(format!("{}/", base), 50);
    let results = run_task(&task, &registry, None).await.expect("task runs");

    assert_eq!(results.len(), 2);
    assert!(results[&format!("{}/broken", base)].is_empty());
}

#[tokio::test]
async fn test_persisted_artifacts_follow_naming_convention() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &[format!("{}/page1", base)]).await;
    mount_page(&server, "/page1", &[]).await;

    let sink = Arc::new(MemorySink::new());
    let ctx = PersistContext {
        sink: sink.clone(),
        container: "crawls".to_string(),
        run_id: "2024-01-01_00:00:00.000000".to_string(),
    };

    let registry = test_registry();
    let task = bfs_task(format!("{}/", base), 50);
    run_task(&task, &registry, Some(&ctx)).await.expect("task runs");

    let artifacts = sink.entries_under("2024-01-01_00:00:00.000000/successes");
    assert_eq!(artifacts.len(), 2);
    for artifact in &artifacts {
        assert_eq!(artifact.container, "crawls");
        // <normalized_host>_<uuid>.json
        assert!(artifact.name.starts_with("127.0.0.1_"));
        assert!(artifact.name.ends_with(".json"));

        let payload: serde_json::Value = serde_json::from_slice(&artifact.payload).unwrap();
        assert_eq!(payload.as_object().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_probe_links_returns_raw_discovery_output() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &[
            format!("{}/page1", base),
            "https://external.test/elsewhere".to_string(),
        ],
    )
    .await;

    let registry = test_registry();
    let links = probe_links(&format!("{}/", base), &registry)
        .await
        .expect("probe runs");

    // The probe bypasses the frontier: external links come back untouched
    assert_eq!(links.len(), 2);
    assert!(links.contains(&format!("{}/page1", base)));
    assert!(links.contains(&"https://external.test/elsewhere".to_string()));
}
