//! SummaryService tests against a mock OpenAI-compatible endpoint
//!
//! The provider chain is built from configuration exactly as the server does,
//! then pointed at a mockito server.

use mockito::{Matcher, Server, ServerGuard};
use openhub::config::AppConfig;
use openhub::llm::provider::test_utils::{
    ensure_crypto_provider, test_network_config_no_retry, test_provider_config,
};
use openhub::summary::heuristics;
use openhub::summary::types::SummaryRequest;
use openhub::summary::{ChildItem, SummaryService};
use serde_json::json;

const CHAT_PATH: &str = "/v1/chat/completions";

fn service_for(server: &ServerGuard) -> SummaryService {
    ensure_crypto_provider();
    let mut config = AppConfig {
        network: test_network_config_no_retry(),
        ..Default::default()
    };
    config.llm.providers.insert(
        "openrouter".to_string(),
        test_provider_config(
            server.url(),
            Some("sk-or-test".to_string()),
            "openai/gpt-4o".to_string(),
        ),
    );
    SummaryService::from_config(&config)
}

fn chat_body(content: &str) -> String {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}

fn file_request(path: &str, content: &str) -> SummaryRequest {
    SummaryRequest {
        kind: Some("file".to_string()),
        path: Some(path.to_string()),
        content: Some(content.to_string()),
        repo_name: Some("octo/hub".to_string()),
        children: None,
    }
}

// ========== Files ==========

#[tokio::test]
async fn test_file_summary_uses_model_answer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", CHAT_PATH)
        .match_header("authorization", "Bearer sk-or-test")
        .match_body(Matcher::PartialJson(json!({ "model": "openai/gpt-4o" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body(
            "  - Starts the web server\n- Registers the login route  ",
        ))
        .create_async()
        .await;

    let service = service_for(&server);
    assert!(service.ai_enabled());

    let summary = service
        .summarize(&file_request("src/server.js", "app.listen(3000)"))
        .await;

    assert_eq!(
        summary,
        "- Starts the web server\n- Registers the login route"
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_file_summary_falls_back_on_server_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", CHAT_PATH)
        .with_status(500)
        .with_body(r#"{"error":{"message":"upstream exploded"}}"#)
        .create_async()
        .await;

    let service = service_for(&server);
    let content = "router.post('/login', handler)";
    let summary = service
        .summarize(&file_request("routes/auth.js", content))
        .await;

    assert_eq!(summary, heuristics::file_bullets("auth.js", content));
}

#[tokio::test]
async fn test_file_summary_rejects_short_answer() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_body(chat_body("ok"))
        .create_async()
        .await;

    let service = service_for(&server);
    let summary = service
        .summarize(&file_request("package.json", "{\"name\":\"hub\"}"))
        .await;

    assert!(summary.starts_with("- Lists tools and libraries used by this project"));
}

#[tokio::test]
async fn test_empty_file_skips_model() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", CHAT_PATH)
        .expect(0)
        .create_async()
        .await;

    let service = service_for(&server);
    let summary = service.summarize(&file_request("src/empty.rs", "")).await;

    assert_eq!(summary, heuristics::empty_file_summary());
    mock.assert_async().await;
}

// ========== Folders ==========

#[tokio::test]
async fn test_folder_summary_appends_listing() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_body(chat_body("- Holds the API routes"))
        .create_async()
        .await;

    let service = service_for(&server);
    let request = SummaryRequest {
        kind: Some("folder".to_string()),
        path: Some("backend/routes".to_string()),
        content: None,
        repo_name: Some("octo/hub".to_string()),
        children: Some(vec![
            ChildItem {
                name: "auth.js".to_string(),
            },
            ChildItem {
                name: "github.js".to_string(),
            },
        ]),
    };
    let summary = service.summarize(&request).await;

    assert!(summary.starts_with("- Holds the API routes"));
    assert!(summary.ends_with(
        "Files and subfolders in this directory:\n• auth.js\n• github.js"
    ));
}

// ========== Issues ==========

#[tokio::test]
async fn test_issue_analysis_parses_fenced_json() {
    let mut server = Server::new_async().await;
    let answer = format!(
        "```json\n{}\n```",
        json!({
            "issueSummary": "Login button does nothing",
            "affectedFiles": ["src/Login.jsx"],
            "solutionSteps": ["Wire the click handler"],
            "difficulty": "easy"
        })
    );
    let _mock = server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_body(chat_body(&answer))
        .create_async()
        .await;

    let service = service_for(&server);
    let analysis = service
        .analyze_issue("12", "Login broken", Some("Clicking login fails"), "octo/hub")
        .await;

    assert_eq!(analysis.issue_summary, "Login button does nothing");
    assert_eq!(analysis.affected_files, vec!["src/Login.jsx"]);
    assert_eq!(analysis.difficulty, "easy");
    // Missing fields get defaults
    assert_eq!(analysis.branch_name, "fix-issue-12");
    assert_eq!(analysis.estimated_time, "2-4 hours");
    assert_eq!(analysis.git_commands[0], "git checkout -b fix-issue-12");
}

#[tokio::test]
async fn test_issue_analysis_plain_text_answer() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_body(chat_body("You should look at the login handler first."))
        .create_async()
        .await;

    let service = service_for(&server);
    let analysis = service
        .analyze_issue("12", "Login broken", None, "octo/hub")
        .await;

    assert_eq!(
        analysis,
        heuristics::structured_issue_fallback(
            "12",
            "Login broken",
            "You should look at the login handler first."
        )
    );
}

#[tokio::test]
async fn test_issue_analysis_without_provider() {
    let service = SummaryService::new(None);
    assert!(!service.ai_enabled());

    let analysis = service
        .analyze_issue("3", "Typo in README", None, "octo/hub")
        .await;

    assert_eq!(analysis.issue_summary, "Issue #3: Typo in README");
    assert_eq!(
        analysis.commit_message,
        "fix: resolve issue #3 - Typo in README"
    );
}
