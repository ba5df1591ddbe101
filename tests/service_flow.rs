//! End-to-end flow: login, prompt submission against a mock provider,
//! persisted conversation records, and aggregated usage statistics.

use promptdesk::{
    ChatConfig, ChatService, ErrorHint, ExportDocument, KeyRing, PromptOptions, Role,
};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn service(base_url: String, dir: &TempDir, keys: &[&str]) -> ChatService {
    let config = ChatConfig {
        base_url,
        ..ChatConfig::with_data_dir(dir.path())
    };
    let ring = KeyRing::new(keys.iter().map(|k| k.to_string()).collect());
    ChatService::with_key_ring(config, ring).unwrap()
}

#[tokio::test]
async fn full_exchange_flow_updates_context_records_and_statistics() {
    init_tracing();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"the answer"}}]}"#)
        .expect(2)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let service = service(server.url(), &dir, &["sk-or-v1-one", "sk-or-v1-two"]);

    // login against the built-in demo accounts
    let session = service.authenticator().login("demo", "demo123").unwrap();
    assert_eq!(session.session_id.len(), 8);

    let mut ctx = service.new_context();
    let options = PromptOptions::with_credential("sk-or-v1-one");

    let first = service
        .send_prompt(&mut ctx, "demo", "what is the answer?", options.clone())
        .await
        .unwrap();
    assert_eq!(first.content, "the answer");
    assert_eq!(first.model, "deepseek/deepseek-chat");
    assert!(first.record_path.is_some());

    let second = service
        .send_prompt(&mut ctx, "demo", "and again?", options)
        .await
        .unwrap();
    assert_eq!(second.content, "the answer");

    mock.assert_async().await;

    // context holds both turns of both exchanges
    assert_eq!(ctx.len(), 4);
    assert_eq!(ctx.messages()[0].role, Role::User);
    assert_eq!(ctx.messages()[3].role, Role::Assistant);

    // per-exchange records landed on disk
    let records = service.conversations().list_for_user("demo");
    assert_eq!(records.len(), 2);

    // statistics reflect both exchanges
    let stats = service.aggregator().snapshot();
    assert_eq!(stats.total_conversations, 2);
    assert_eq!(stats.model_usage.get("deepseek/deepseek-chat"), Some(&2));
    assert_eq!(stats.user_activity.get("demo"), Some(&2));

    let summary = service.aggregator().summary(5);
    assert_eq!(summary.top_models[0].0, "deepseek/deepseek-chat");
    assert_eq!(summary.top_users[0], ("demo".to_string(), 2));

    // export combines the user's records
    let export = service.conversations().export_user("demo").unwrap();
    assert_eq!(export.conversation_count, 2);
    let parsed: ExportDocument =
        serde_json::from_slice(&export.to_json_bytes().unwrap()).unwrap();
    assert_eq!(parsed.username, "demo");
}

#[tokio::test]
async fn provider_failure_surfaces_hint_and_leaves_statistics_untouched() {
    init_tracing();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(402)
        .with_body("Payment Required: insufficient credits")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let service = service(server.url(), &dir, &["sk-or-v1-one"]);

    let mut ctx = service.new_context();
    let err = service
        .send_prompt(&mut ctx, "demo", "hello?", PromptOptions::default())
        .await
        .unwrap_err();

    assert_eq!(ErrorHint::for_error(&err), ErrorHint::PaymentRequired);

    // the user turn stays in the context; no assistant turn was appended
    assert_eq!(ctx.len(), 1);
    assert_eq!(ctx.messages()[0].role, Role::User);

    // nothing was recorded
    assert_eq!(service.aggregator().snapshot().total_conversations, 0);
    assert!(service.conversations().list_for_user("demo").is_empty());
}

#[tokio::test]
async fn compare_models_runs_every_credential_without_history() {
    init_tracing();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}]}"#)
        .expect(3)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let service = service(
        server.url(),
        &dir,
        &["sk-or-v1-one", "sk-or-v1-two", "sk-or-v1-three"],
    );

    let runs = service.compare_models("same prompt for everyone").await;
    mock.assert_async().await;

    assert_eq!(runs.len(), 3);
    let models: Vec<&str> = runs.iter().map(|r| r.model.as_str()).collect();
    assert_eq!(
        models,
        vec![
            "deepseek/deepseek-chat",
            "google/gemini-2.0-flash-exp:free",
            "01-ai/yi-large"
        ]
    );
    assert!(runs.iter().all(|r| r.outcome.is_ok()));

    // comparison runs never touch the shared statistics
    assert_eq!(service.aggregator().snapshot().total_conversations, 0);
}

#[tokio::test]
async fn test_connection_reports_reachability() {
    init_tracing();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"API connection successful"}}]}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let service = service(server.url(), &dir, &["sk-or-v1-one"]);

    assert!(service.test_connection("sk-or-v1-one").await);
}
