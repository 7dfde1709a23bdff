use aem_docs_search::DocsMatcher;
use aem_docs_search::SearchConfig;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn config_for(server: &MockServer) -> SearchConfig {
    SearchConfig {
        index_url: format!("{}/docpages-index.json", server.uri()),
        site_base_url: "https://www.aem.live".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn index_is_fetched_once_and_searched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docpages-index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "data": [
                {"path": "/docs/go-live-checklist", "title": "Go Live Checklist", "content": "steps to launch", "description": ""},
                {"path": "/developer/intro", "title": "Intro", "content": "go live basics", "description": ""}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let matcher = DocsMatcher::new(config_for(&server)).unwrap();
    let first = matcher.find_relevant_docs("go live", 2).await.unwrap();
    let second = matcher.find_relevant_docs("launch steps", 2).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first[0].url, "https://www.aem.live/docs/go-live-checklist");
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].title, "Go Live Checklist");
}

#[tokio::test]
async fn error_payload_means_no_corpus() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docpages-index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "index offline"})))
        .mount(&server)
        .await;

    let matcher = DocsMatcher::new(config_for(&server)).unwrap();
    assert!(matcher.corpus().await.is_none());
    assert!(matcher.find_relevant_docs("go live", 2).await.is_none());
}

#[tokio::test]
async fn failed_fetch_is_retried_on_next_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docpages-index.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docpages-index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"path": "/docs/sidekick", "title": "Sidekick"}]
        })))
        .mount(&server)
        .await;

    let matcher = DocsMatcher::new(config_for(&server)).unwrap();
    assert!(matcher.find_relevant_docs("sidekick", 2).await.is_none());

    let pages = matcher.find_relevant_docs("sidekick", 2).await.unwrap();
    assert_eq!(pages[0].path, "/docs/sidekick");
}
