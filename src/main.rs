//! Claude Code LLM - run one prompt through the Claude Code CLI.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use claude_code_llm::config::{ConfigError, ConfigLoader};
use claude_code_llm::display;
use claude_code_llm::{
    CallOptions, ClaudeCodeError, ClaudeCodeLlm, ClaudeCodeOptions, Message, OutputMode,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputArg {
    Text,
    Verbose,
    Full,
}

impl From<OutputArg> for OutputMode {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Text => OutputMode::Text,
            OutputArg::Verbose => OutputMode::Verbose,
            OutputArg::Full => OutputMode::Full,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "claude-code-llm",
    about = "Send a prompt to Claude Code and print the response",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Model name passed to the CLI.
    #[arg(short, long)]
    model: Option<String>,

    /// System prompt.
    #[arg(short, long)]
    system: Option<String>,

    /// Path to the claude binary.
    #[arg(long)]
    cli: Option<PathBuf>,

    /// Permission mode (default: bypassPermissions).
    #[arg(long)]
    permission_mode: Option<String>,

    /// Working directory for the CLI.
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// How tool activity is folded into the response.
    #[arg(short, long, value_enum)]
    output_mode: Option<OutputArg>,

    /// Config file to use instead of the default search.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print text as it arrives.
    #[arg(long)]
    stream: bool,

    /// Print tool events to stderr.
    #[arg(long)]
    show_tools: bool,

    /// The prompt. Read from stdin when omitted.
    prompt: Vec<String>,
}

#[derive(thiserror::Error, Debug)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Llm(#[from] ClaudeCodeError),
    #[error("failed to read prompt from stdin: {0}")]
    Stdin(#[source] std::io::Error),
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build_options(cli: &Cli) -> Result<ClaudeCodeOptions, ConfigError> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    let mut options = loader.load()?.apply(ClaudeCodeOptions::default());

    if let Some(model) = &cli.model {
        options = options.model(model.clone());
    }
    if let Some(system) = &cli.system {
        options = options.system_prompt(system.clone());
    }
    if let Some(path) = &cli.cli {
        options = options.cli_path(path.clone());
    }
    if let Some(mode) = &cli.permission_mode {
        options = options.permission_mode(mode.clone());
    }
    if let Some(dir) = &cli.cwd {
        options = options.cwd(dir.clone());
    }
    if let Some(mode) = cli.output_mode {
        options = options.output_mode(mode.into());
    }
    if cli.show_tools {
        options = options.tool_event_hook(display::print_tool_event);
    }
    Ok(options)
}

async fn read_prompt(cli: &Cli) -> Result<String, RunError> {
    if !cli.prompt.is_empty() {
        return Ok(cli.prompt.join(" "));
    }
    let mut prompt = String::new();
    tokio::io::stdin()
        .read_to_string(&mut prompt)
        .await
        .map_err(RunError::Stdin)?;
    Ok(prompt)
}

async fn run(cli: Cli, cancel: CancellationToken) -> Result<(), RunError> {
    let options = build_options(&cli)?;
    tracing::debug!(?options, "Resolved options");

    let llm = ClaudeCodeLlm::new(options)?;
    let prompt = read_prompt(&cli).await?;

    let mut call = CallOptions::new().with_cancellation(cancel);
    if cli.stream {
        call = call.with_streaming_func(|chunk| {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(chunk.as_bytes())?;
            stdout.flush()?;
            Ok(())
        });
    }

    let response = llm.generate_content(&[Message::human(prompt)], call).await?;
    if let Some(cost) = response.total_cost_usd() {
        tracing::info!(cost_usd = cost, "Call finished");
    }

    if cli.stream {
        println!();
    } else {
        println!("{}", response.text);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping claude");
            on_signal.cancel();
        }
    });

    match run(cli, cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
