//! Tests for Claude Code argument construction.

use claude_code_llm::cli::CommandBuilder;
use claude_code_llm::ClaudeCodeOptions;

fn args_for(options: &ClaudeCodeOptions, system: &str, prompt: &str) -> Vec<String> {
    CommandBuilder::new(options, system, prompt).build_args()
}

fn count(args: &[String], flag: &str) -> usize {
    args.iter().filter(|a| *a == flag).count()
}

fn position(args: &[String], flag: &str) -> usize {
    args.iter()
        .position(|a| a == flag)
        .unwrap_or_else(|| panic!("{flag} missing from {args:?}"))
}

#[test]
fn defaults_produce_minimal_command() {
    let args = args_for(&ClaudeCodeOptions::default(), "", "Fix the bug");
    assert_eq!(
        args,
        [
            "--output-format",
            "stream-json",
            "--verbose",
            "--permission-mode",
            "bypassPermissions",
            "--print",
            "--",
            "Fix the bug",
        ]
    );
}

#[test]
fn tool_lists_and_model_in_order_once_each() {
    let options = ClaudeCodeOptions::default()
        .tools(["a", "b"])
        .allowed_tools(["x"])
        .model("m");
    let args = args_for(&options, "", "task");

    for flag in ["--tools", "--allowedTools", "--model"] {
        assert_eq!(count(&args, flag), 1, "{flag}");
    }
    assert_eq!(count(&args, "--disallowedTools"), 0);

    let tools = position(&args, "--tools");
    let allowed = position(&args, "--allowedTools");
    let model = position(&args, "--model");
    assert!(tools < allowed && allowed < model);
    assert_eq!(args[tools + 1], "a,b");
    assert_eq!(args[allowed + 1], "x");
    assert_eq!(args[model + 1], "m");
}

#[test]
fn system_prompt_follows_output_flags() {
    let args = args_for(&ClaudeCodeOptions::default(), "Be terse", "task");
    assert_eq!(args[3], "--system-prompt");
    assert_eq!(args[4], "Be terse");
}

#[test]
fn extra_args_sorted_with_bare_flags() {
    let options = ClaudeCodeOptions::default().extra_args([("z", "1"), ("a", "")]);
    let args = args_for(&options, "", "task");

    let start = position(&args, "--a");
    assert_eq!(&args[start..start + 3], ["--a", "--z", "1"]);
    assert_eq!(args[start + 3], "--print");
}

#[test]
fn prompt_is_last_even_when_it_looks_like_a_flag() {
    let options = ClaudeCodeOptions::default().extra_args([("max-turns", "3")]);
    let args = args_for(&options, "", "--help");

    let n = args.len();
    assert_eq!(&args[n - 3..], ["--print", "--", "--help"]);
}

#[test]
fn resume_with_session_id() {
    let id = "0b9c8c4e-6f1e-4a55-9a7c-3f7d0c1e2b3a";
    let options = ClaudeCodeOptions::default()
        .session_id(id)
        .resume(true)
        .fork_session(true);
    let args = args_for(&options, "", "go on");

    let resume = position(&args, "--resume");
    assert_eq!(args[resume + 1], id);
    assert_eq!(args[resume + 2], "--fork-session");
    assert!(resume > position(&args, "--permission-mode"));
    assert_eq!(count(&args, "--session-id"), 0);
}

#[test]
fn resume_without_session_id_continues() {
    let options = ClaudeCodeOptions::default().resume(true);
    let args = args_for(&options, "", "go on");
    assert_eq!(count(&args, "--continue"), 1);
    assert_eq!(count(&args, "--resume"), 0);
}

#[test]
fn new_session_id_and_no_persistence() {
    let id = "0b9c8c4e-6f1e-4a55-9a7c-3f7d0c1e2b3a";
    let options = ClaudeCodeOptions::default()
        .session_id(id)
        .fork_session(true)
        .no_session_persistence(true)
        .extra_args([("debug", "")]);
    let args = args_for(&options, "", "hi");

    let session = position(&args, "--session-id");
    assert_eq!(args[session + 1], id);
    assert_eq!(count(&args, "--fork-session"), 0);
    let no_persist = position(&args, "--no-session-persistence");
    assert!(session < no_persist && no_persist < position(&args, "--debug"));
}

#[test]
fn empty_permission_mode_falls_back_to_default() {
    let options = ClaudeCodeOptions::default().permission_mode("");
    let args = args_for(&options, "", "task");
    let mode = position(&args, "--permission-mode");
    assert_eq!(args[mode + 1], "bypassPermissions");
}
