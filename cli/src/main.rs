//! CLI entrypoint for noa
//!
//! This is the main binary that wires together all layers using
//! dependency injection. Each subcommand runs one participant (or the hub)
//! in its own process.

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser};
use noa_application::{
    AssistantUseCase, ConversationLogger, ModerateUseCase, UserProxyUseCase,
};
use noa_domain::{MODERATOR, ParticipantId, USER_PROXY};
use noa_infrastructure::{
    ChatClient, ConfigLoader, DirectoryRosterSource, FileConfig, HubServer, HubTransport,
    JsonlConversationLogger, LlmDecisionEngine, LlmResponder, Severity,
};
use noa_presentation::{Cli, Command, ConsoleFormatter, ConsoleOperator};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    for issue in config.validate() {
        match issue.severity {
            Severity::Error => error!("{}", issue.message),
            Severity::Warning => warn!("{}", issue.message),
        }
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Hub { listen } => run_hub(&config, listen).await,
        Command::Moderator {
            endpoint,
            agents_dir,
            model,
        } => run_moderator(&config, endpoint, agents_dir, model).await,
        Command::Assistant {
            assistant_id,
            description,
            endpoint,
            model,
        } => run_assistant(&config, assistant_id, description, endpoint, model).await,
        Command::UserProxy { endpoint } => {
            let interrupted = run_user_proxy(&config, endpoint).await?;
            if interrupted {
                // A pending stdin read cannot be cancelled; exit without waiting for it
                drop(guard);
                std::process::exit(130);
            }
            Ok(())
        }
    }
}

/// Initialize logging based on verbosity level; `RUST_LOG` wins when set.
///
/// With `--log-file` diagnostics go to that file so they do not interleave
/// with the operator prompt. The returned guard flushes it on drop.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();

    Ok(Some(guard))
}

/// Cancelled on Ctrl-C.
fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, shutting down");
        }
        trigger.cancel();
    });
    token
}

fn transcript(config: &FileConfig) -> Option<Arc<dyn ConversationLogger>> {
    let path = config.logging.transcript.as_ref()?;
    let logger = JsonlConversationLogger::open(path)?;
    info!("Writing transcript to {}", logger.path().display());
    Some(Arc::new(logger))
}

async fn run_hub(config: &FileConfig, listen: Option<String>) -> Result<()> {
    let listen = listen.unwrap_or_else(|| config.transport.endpoint.clone());
    let server = HubServer::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind hub on {}", listen))?;

    server.serve(shutdown_token()).await?;
    Ok(())
}

async fn run_moderator(
    config: &FileConfig,
    endpoint: Option<String>,
    agents_dir: Option<PathBuf>,
    model: Option<String>,
) -> Result<()> {
    let endpoint = endpoint.unwrap_or_else(|| config.transport.endpoint.clone());
    let agents_dir = agents_dir.unwrap_or_else(|| PathBuf::from(&config.moderator.agents_dir));
    let model = model.or_else(|| {
        config
            .moderator
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
    });

    // === Dependency Injection ===
    let client = ChatClient::new(config.provider.to_client_config(model.as_deref()))
        .context("Failed to create chat client for the decision engine")?;
    info!("Decision engine model: {}", client.model());
    let engine = Arc::new(LlmDecisionEngine::new(Arc::new(client)));
    let transport = Arc::new(HubTransport::new(
        endpoint,
        config.transport.space.clone(),
        MODERATOR,
    ));
    let source = DirectoryRosterSource::new(agents_dir);

    let mut moderator = ModerateUseCase::from_source(transport, engine, &source);
    if let Some(logger) = transcript(config) {
        moderator = moderator.with_conversation_logger(logger);
    }
    info!(
        "Moderator starting with {} assistant(s) from {}",
        moderator.roster().len(),
        source.dir().display()
    );

    moderator.run_until_cancelled(shutdown_token()).await?;
    Ok(())
}

async fn run_assistant(
    config: &FileConfig,
    assistant_id: Option<String>,
    description: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let raw_id = assistant_id
        .or_else(|| config.assistant.id.clone())
        .context("An assistant id is required (--assistant-id or [assistant] id)")?;
    let identity = ParticipantId::assistant(&raw_id)?;
    let description = description.unwrap_or_else(|| config.assistant.description.clone());
    let endpoint = endpoint.unwrap_or_else(|| config.transport.endpoint.clone());
    // Budget issues were already reported by validate()
    let (window, _) = config.assistant.to_context_window();

    let client = ChatClient::new(config.provider.to_client_config(model.as_deref()))
        .context("Failed to create chat client for the assistant")?;
    info!("Assistant {} using model {}", identity, client.model());
    let responder = Arc::new(LlmResponder::new(Arc::new(client), description));
    let transport = Arc::new(HubTransport::new(
        endpoint,
        config.transport.space.clone(),
        identity.as_str(),
    ));

    let mut assistant =
        AssistantUseCase::new(transport, responder, identity).with_context_window(window);
    if let Some(logger) = transcript(config) {
        assistant = assistant.with_conversation_logger(logger);
    }

    assistant.run_until_cancelled(shutdown_token()).await?;
    Ok(())
}

/// Returns `true` when interrupted with Ctrl-C.
async fn run_user_proxy(config: &FileConfig, endpoint: Option<String>) -> Result<bool> {
    let endpoint = endpoint.unwrap_or_else(|| config.transport.endpoint.clone());

    let console = Arc::new(ConsoleOperator::new(ConsoleFormatter::new()));
    let transport = Arc::new(HubTransport::new(
        endpoint,
        config.transport.space.clone(),
        USER_PROXY,
    ));
    let mut proxy = UserProxyUseCase::new(transport, console.clone());
    if let Some(logger) = transcript(config) {
        proxy = proxy.with_conversation_logger(logger);
    }

    console.welcome();
    tokio::select! {
        result = proxy.run() => {
            result?;
            Ok(false)
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
            info!("Interrupted");
            Ok(true)
        }
    }
}
