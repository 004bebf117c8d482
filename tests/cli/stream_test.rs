//! Tests for stream parsing over synthetic CLI output.

use std::sync::{Arc, Mutex};

use serde_json::json;
use tokio::io::AsyncWriteExt;

use claude_code_llm::cli::{StreamOutput, StreamParser};
use claude_code_llm::llm::{BoxError, StreamingFunc, TOTAL_COST_USD_KEY, USAGE_KEY};
use claude_code_llm::{ClaudeCodeError, OutputMode, ToolEvent, ToolEventHook};

async fn read_lines(
    parser: StreamParser<'_>,
    lines: &[String],
) -> Result<StreamOutput, claude_code_llm::cli::StreamFailure> {
    let mut body = lines.join("\n");
    body.push('\n');
    let (mut writer, reader) = tokio::io::duplex(body.len() + 1);
    writer.write_all(body.as_bytes()).await.unwrap();
    drop(writer);
    parser.read(reader).await
}

fn assistant(content: serde_json::Value) -> String {
    json!({"type": "assistant", "message": {"content": content}}).to_string()
}

fn recording_hook() -> (ToolEventHook, Arc<Mutex<Vec<ToolEvent>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let hook: ToolEventHook = Arc::new(move |event: &ToolEvent| {
        sink.lock().unwrap().push(event.clone());
    });
    (hook, seen)
}

#[tokio::test]
async fn text_then_result_metadata() {
    let lines = [
        assistant(json!([{"type": "text", "text": "hi"}])),
        json!({"type": "result", "total_cost_usd": 0.01}).to_string(),
    ];
    let output = read_lines(StreamParser::new(), &lines).await.unwrap();

    assert_eq!(output.text, "hi");
    assert_eq!(output.generation_info[TOTAL_COST_USD_KEY], json!(0.01));
    assert!(!output.generation_info.contains_key(USAGE_KEY));
}

#[tokio::test]
async fn empty_type_is_terminal_error() {
    let lines = [
        assistant(json!("before")),
        json!({"type": "", "result": "ignored", "is_error": true}).to_string(),
        assistant(json!("after")),
    ];
    let failure = read_lines(StreamParser::new(), &lines).await.unwrap_err();

    assert!(matches!(failure.error, ClaudeCodeError::CliReported(_)));
    assert_eq!(failure.partial.text, "before");
}

#[tokio::test]
async fn invalid_json_keeps_partial_output() {
    let lines = [assistant(json!("part")), "{not json".to_string()];
    let failure = read_lines(StreamParser::new(), &lines).await.unwrap_err();

    assert!(matches!(failure.error, ClaudeCodeError::ParseJson { .. }));
    assert_eq!(failure.partial.text, "part");
}

#[tokio::test]
async fn text_mode_calls_hook_once_without_altering_output() {
    let (hook, seen) = recording_hook();
    let parser = StreamParser::new().hook(Some(&hook));
    let lines = [assistant(json!([
        {"type": "text", "text": "Looking."},
        {"type": "tool_use", "id": "toolu_1", "name": "Read", "input": {"file_path": "/etc/hosts"}}
    ]))];

    let output = read_lines(parser, &lines).await.unwrap();
    assert_eq!(output.text, "Looking.");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].tool_name(), Some("Read"));
    assert_eq!(seen[0].tool_id(), "toolu_1");
}

#[tokio::test]
async fn verbose_summaries_interleave_with_text() {
    let chunks = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&chunks);
    let streaming: StreamingFunc = Arc::new(move |chunk: &str| -> Result<(), BoxError> {
        sink.lock().unwrap().push(chunk.to_string());
        Ok(())
    });
    let parser = StreamParser::new()
        .output_mode(OutputMode::Verbose)
        .streaming(Some(&streaming));
    let lines = [
        assistant(json!([
            {"type": "text", "text": "A"},
            {"type": "tool_use", "id": "t1", "name": "Bash", "input": {"command": "ls"}},
            {"type": "text", "text": "B"}
        ])),
        json!({"type": "tool_result", "tool_use_id": "t1", "content": "file.txt"}).to_string(),
    ];

    let output = read_lines(parser, &lines).await.unwrap();
    assert_eq!(output.text, "A\n🔧 Bash: ls\nB");
    assert_eq!(
        *chunks.lock().unwrap(),
        ["A".to_string(), "\n🔧 Bash: ls\n".to_string(), "B".to_string()]
    );
}

#[tokio::test]
async fn full_mode_includes_results() {
    let parser = StreamParser::new().output_mode(OutputMode::Full);
    let lines = [
        assistant(json!([
            {"type": "tool_use", "id": "t1", "name": "Glob", "input": {"pattern": "*.rs"}}
        ])),
        json!({"type": "tool_result", "tool_use_id": "t1", "content": "main.rs"}).to_string(),
    ];

    let output = read_lines(parser, &lines).await.unwrap();
    assert_eq!(
        output.text,
        "\n🔧 [Glob] t1\n{\n  \"pattern\": \"*.rs\"\n}\n  └─ 📤 main.rs\n"
    );
}

#[tokio::test]
async fn unknown_types_and_blank_lines_are_ignored() {
    let lines = [
        json!({"type": "system", "subtype": "init", "session_id": "abc"}).to_string(),
        String::new(),
        "   ".to_string(),
        json!({"type": "stream_event", "event": {}}).to_string(),
        assistant(json!("ok")),
    ];
    let output = read_lines(StreamParser::new(), &lines).await.unwrap();
    assert_eq!(output.text, "ok");
    assert!(output.generation_info.is_empty());
}

#[tokio::test]
async fn later_result_lines_overwrite_earlier_values() {
    let lines = [
        json!({"type": "result", "total_cost_usd": 0.01, "usage": {"output_tokens": 1}})
            .to_string(),
        json!({"type": "result", "total_cost_usd": 0.02}).to_string(),
    ];
    let output = read_lines(StreamParser::new(), &lines).await.unwrap();
    assert_eq!(output.generation_info[TOTAL_COST_USD_KEY], json!(0.02));
    assert_eq!(output.generation_info[USAGE_KEY], json!({"output_tokens": 1}));
}

#[tokio::test]
async fn over_long_line_is_read_error() {
    let parser = StreamParser::new().max_line_length(32);
    let lines = [assistant(json!("x".repeat(64)))];
    let failure = read_lines(parser, &lines).await.unwrap_err();
    assert!(matches!(failure.error, ClaudeCodeError::StreamRead(_)));
}

#[tokio::test]
async fn bad_assistant_shape_is_error() {
    let lines = [json!({"type": "assistant", "message": {"content": 7}}).to_string()];
    let failure = read_lines(StreamParser::new(), &lines).await.unwrap_err();
    assert!(matches!(failure.error, ClaudeCodeError::AssistantContent(_)));
}
