//! End-to-end tests against fake `claude` scripts.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use claude_code_llm::llm::TOTAL_COST_USD_KEY;
use claude_code_llm::{CallOptions, ClaudeCodeError, ClaudeCodeLlm, ClaudeCodeOptions, Message};

/// Write an executable shell script named `claude` into `dir`.
fn fake_cli(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("claude");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn llm_for(script: &Path) -> ClaudeCodeLlm {
    ClaudeCodeLlm::new(ClaudeCodeOptions::default().cli_path(script)).unwrap()
}

const HELLO_STREAM: &str = r#"cat <<'EOF'
{"type":"system","subtype":"init"}
{"type":"assistant","message":{"content":[{"type":"text","text":"Hello"}]}}
{"type":"result","total_cost_usd":0.01,"result":"Hello"}
EOF"#;

#[tokio::test]
async fn successful_call_returns_text_and_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let llm = llm_for(&fake_cli(dir.path(), HELLO_STREAM));

    let response = llm
        .generate_content(&[Message::human("hi")], CallOptions::new())
        .await
        .unwrap();
    assert_eq!(response.text, "Hello");
    assert_eq!(response.total_cost_usd(), Some(0.01));
    assert!(response.generation_info.contains_key(TOTAL_COST_USD_KEY));
}

#[tokio::test]
async fn prompt_is_passed_after_double_dash() {
    let dir = tempfile::tempdir().unwrap();
    // Echo the last argument back as assistant text.
    let script = r#"for last; do :; done
printf '{"type":"assistant","message":{"content":"%s"}}\n' "$last""#;
    let llm = llm_for(&fake_cli(dir.path(), script));

    let text = llm.call("ping", CallOptions::new()).await.unwrap();
    assert_eq!(text, "User: ping");
}

#[tokio::test]
async fn non_zero_exit_reports_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let llm = llm_for(&fake_cli(dir.path(), "echo 'invalid api key' >&2\nexit 3"));

    let err = llm.call("hi", CallOptions::new()).await.unwrap_err();
    match err {
        ClaudeCodeError::CliFailed { status, stderr } => {
            assert_eq!(status.code(), Some(3));
            assert_eq!(stderr, "invalid api key");
        }
        other => panic!("expected CliFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn non_zero_exit_without_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let llm = llm_for(&fake_cli(dir.path(), "exit 1"));

    let err = llm.call("hi", CallOptions::new()).await.unwrap_err();
    assert!(matches!(err, ClaudeCodeError::CliFailed { ref stderr, .. } if stderr.is_empty()));
}

#[tokio::test]
async fn parse_error_kills_process_on_repeated_calls() {
    let dir = tempfile::tempdir().unwrap();
    let script = "echo 'not json'\necho 'still running' >&2\nexec sleep 30";
    let llm = llm_for(&fake_cli(dir.path(), script));

    for _ in 0..3 {
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            llm.call("hi", CallOptions::new()),
        )
        .await
        .expect("call should not wait for the process to exit");
        assert!(matches!(result, Err(ClaudeCodeError::ParseJson { .. })));
    }
}

#[tokio::test]
async fn cli_reported_error_line() {
    let dir = tempfile::tempdir().unwrap();
    let script = r#"echo '{"type":"","error":"overloaded"}'
exec sleep 30"#;
    let llm = llm_for(&fake_cli(dir.path(), script));

    let result = tokio::time::timeout(Duration::from_secs(10), llm.call("hi", CallOptions::new()))
        .await
        .unwrap();
    assert!(matches!(result, Err(ClaudeCodeError::CliReported(_))));
}

#[tokio::test]
async fn env_overrides_reach_the_process() {
    let dir = tempfile::tempdir().unwrap();
    let script =
        r#"printf '{"type":"assistant","message":{"content":"%s"}}\n' "$CLAUDE_TEST_VALUE""#;
    let options = ClaudeCodeOptions::default()
        .cli_path(fake_cli(dir.path(), script))
        .env([("CLAUDE_TEST_VALUE", "from-override")]);
    let llm = ClaudeCodeLlm::new(options).unwrap();

    let text = llm.call("hi", CallOptions::new()).await.unwrap();
    assert_eq!(text, "from-override");
}

#[tokio::test]
async fn runs_in_configured_directory() {
    let dir = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    std::fs::write(work.path().join("marker.txt"), "").unwrap();
    let script = r#"if [ -f marker.txt ]; then found=yes; else found=no; fi
printf '{"type":"assistant","message":{"content":"%s"}}\n' "$found""#;
    let options = ClaudeCodeOptions::default()
        .cli_path(fake_cli(dir.path(), script))
        .cwd(work.path());
    let llm = ClaudeCodeLlm::new(options).unwrap();

    let text = llm.call("hi", CallOptions::new()).await.unwrap();
    assert_eq!(text, "yes");
}

#[tokio::test]
async fn cancellation_kills_running_process() {
    let dir = tempfile::tempdir().unwrap();
    let script = r#"echo '{"type":"assistant","message":{"content":"partial"}}'
exec sleep 30"#;
    let llm = llm_for(&fake_cli(dir.path(), script));

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        llm.call("hi", CallOptions::new().with_cancellation(cancel)),
    )
    .await
    .unwrap();
    assert!(matches!(result, Err(ClaudeCodeError::Cancelled)));
}

#[tokio::test]
async fn streaming_callback_sees_text() {
    use std::sync::{Arc, Mutex};

    let dir = tempfile::tempdir().unwrap();
    let llm = llm_for(&fake_cli(dir.path(), HELLO_STREAM));

    let chunks = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&chunks);
    let options = CallOptions::new().with_streaming_func(move |chunk| {
        sink.lock().unwrap().push(chunk.to_string());
        Ok(())
    });

    llm.call("hi", options).await.unwrap();
    assert_eq!(*chunks.lock().unwrap(), ["Hello".to_string()]);
}
