use aem_core::AemConfig;
use aem_core::ChatParticipant;
use aem_core::ChatRequest;
use aem_core::RecordingSink;
use aem_core::prompts::NOT_FOUND_MESSAGE;
use aem_lm_client::ModelRegistry;
use aem_lm_client::OpenAiChatModel;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_string_contains;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn sse_body(fragments: &[&str]) -> String {
    let mut body = String::new();
    for fragment in fragments {
        let chunk = json!({"choices": [{"delta": {"content": fragment}}]});
        let _ = write!(body, "data: {chunk}\n\n");
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn config_for(server: &MockServer) -> AemConfig {
    let uri = server.uri();
    AemConfig::from_toml(&format!(
        r#"
[model]
base_url = "{uri}/v1"

[docs]
index_url = "{uri}/docpages-index.json"
site_base_url = "https://www.aem.live"

[blocks]
base_url = "{uri}/gh/adobe/aem-block-collection@main/"

[github]
api_base_url = "{uri}"
repository = "adobe/site"
"#
    ))
    .unwrap()
}

fn participant_for(server: &MockServer) -> ChatParticipant {
    let config = config_for(server);
    let model = OpenAiChatModel::with_api_key(&config.model, None);
    let models = ModelRegistry::new().with_model(Arc::new(model));
    ChatParticipant::new(config, models, None).unwrap()
}

async fn ask(participant: &ChatParticipant, line: &str) -> RecordingSink {
    let mut sink = RecordingSink::new();
    let result = participant
        .handle(&ChatRequest::parse(line), &mut sink, CancellationToken::new())
        .await;
    assert_eq!(result.error, None);
    sink
}

#[tokio::test]
async fn docs_answers_stream_from_the_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docpages-index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"path": "/docs/go-live-checklist", "title": "Go Live Checklist", "content": "Before you go live, check redirects"},
                {"path": "/docs/cdn", "title": "CDN Setup", "content": "Point your CDN at the origin"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("go-live-checklist"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["Review ", "the checklist."]), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let participant = participant_for(&server);
    let sink = ask(&participant, "/docs what redirects before go live").await;
    assert_eq!(sink.markdown_text(), "Review the checklist.");

    let sink = ask(&participant, "configure kubernetes").await;
    assert_eq!(sink.markdown_text(), NOT_FOUND_MESSAGE);
}

#[tokio::test]
async fn collection_lists_blocks_from_the_cdn() {
    let server = MockServer::start().await;
    let root = "/gh/adobe/aem-block-collection@main";
    Mock::given(method("GET"))
        .and(path(format!("{root}/blocks/")))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<div class=\"listing\"><a href=\"{root}/blocks/cards/\">cards</a>\
             <a href=\"{root}/blocks/tabs/\">tabs</a></div>"
        )))
        .mount(&server)
        .await;

    let participant = participant_for(&server);
    let sink = ask(&participant, "/collection ls").await;
    assert_eq!(
        sink.markdown_text(),
        "List of available blocks:\n\n- cards\n- tabs\n"
    );
}

#[tokio::test]
async fn issues_use_the_configured_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/adobe/site/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"number": 4, "title": "Broken footer", "html_url": "https://github.com/adobe/site/issues/4", "state": "open"}
        ])))
        .mount(&server)
        .await;

    let participant = participant_for(&server);
    let sink = ask(&participant, "/issues list open issues").await;
    let buttons = sink.buttons();
    assert_eq!(buttons.len(), 1);
    assert_eq!(buttons[0].title, "4:    Broken footer");
}
