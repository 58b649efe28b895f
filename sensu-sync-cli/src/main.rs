use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sensu_sync::resources::{handler_set, pipe_handler, socket_handler};
use sensu_sync::{Client, Credentials, DesiredState, Document};

#[derive(Parser)]
#[command(name = "sensu-sync")]
#[command(about = "Declarative state synchronization for Sensu Go resources")]
struct Cli {
    /// Sensu backend API URL
    #[arg(long, env = "SENSU_BACKEND_URL", default_value = "http://localhost:8080")]
    url: String,

    /// Namespace the resources live in
    #[arg(long, env = "SENSU_NAMESPACE", default_value = "default")]
    namespace: String,

    /// API key; takes precedence over user/password
    #[arg(long, env = "SENSU_API_KEY")]
    api_key: Option<String>,

    /// Username for basic authentication
    #[arg(long, env = "SENSU_USER", default_value = "admin")]
    user: String,

    /// Password for basic authentication
    #[arg(long, env = "SENSU_PASSWORD", default_value = "P@ssw0rd!")]
    password: String,

    /// Compute and report the change without applying it
    #[arg(long)]
    check: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum State {
    Present,
    Absent,
}

impl From<State> for DesiredState {
    fn from(state: State) -> Self {
        match state {
            State::Present => DesiredState::Present,
            State::Absent => DesiredState::Absent,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Tcp,
    Udp,
}

impl From<Kind> for socket_handler::SocketKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Tcp => socket_handler::SocketKind::Tcp,
            Kind::Udp => socket_handler::SocketKind::Udp,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Manage a handler set (a named group of event handlers)
    HandlerSet {
        /// Object name
        name: String,

        /// Desired state
        #[arg(long, value_enum, default_value = "present")]
        state: State,

        /// Comma-separated event handlers the set fans out to;
        /// an empty string clears the list
        #[arg(long)]
        handlers: Option<String>,
    },

    /// Manage a pipe handler (event data piped into a command)
    PipeHandler {
        /// Object name
        name: String,

        /// Desired state
        #[arg(long, value_enum, default_value = "present")]
        state: State,

        /// Command the event data is piped into
        #[arg(long)]
        command: Option<String>,

        /// Execution timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Comma-separated event filters, applied in order
        #[arg(long)]
        filters: Option<String>,

        /// Mutator applied to event data before the command runs
        #[arg(long)]
        mutator: Option<String>,

        /// Comma-separated KEY=VALUE environment entries
        #[arg(long)]
        env_vars: Option<String>,

        /// Comma-separated runtime assets required by the handler
        #[arg(long)]
        runtime_assets: Option<String>,
    },

    /// Manage a TCP or UDP socket handler
    SocketHandler {
        /// Object name
        name: String,

        /// Desired state
        #[arg(long, value_enum, default_value = "present")]
        state: State,

        /// Socket flavor
        #[arg(long, value_enum, default_value = "tcp")]
        kind: Kind,

        /// Host the socket connects to
        #[arg(long)]
        host: Option<String>,

        /// Port the socket connects to
        #[arg(long)]
        port: Option<u16>,

        /// Execution timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Comma-separated event filters, applied in order
        #[arg(long)]
        filters: Option<String>,
    },
}

/// Split a comma-separated flag value. `None` means the field stays
/// unmanaged; an empty string means an explicitly empty list.
fn parse_list(raw: Option<String>) -> Option<Vec<String>> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(String::from)
            .collect()
    })
}

async fn run(cli: Cli) -> sensu_sync::Result<(bool, Option<Document>)> {
    let credentials = match cli.api_key {
        Some(key) => Credentials::ApiKey(key),
        None => Credentials::Basic {
            user: cli.user,
            password: cli.password,
        },
    };
    let client = Client::connect(&cli.url, &cli.namespace, credentials).await?;

    match cli.command {
        Commands::HandlerSet {
            name,
            state,
            handlers,
        } => {
            debug!(name = %name, check = cli.check, "reconciling handler set");
            handler_set::converge(
                &client,
                state.into(),
                handler_set::Params {
                    name,
                    handlers: parse_list(handlers),
                },
                cli.check,
            )
            .await
        }
        Commands::PipeHandler {
            name,
            state,
            command,
            timeout,
            filters,
            mutator,
            env_vars,
            runtime_assets,
        } => {
            debug!(name = %name, check = cli.check, "reconciling pipe handler");
            pipe_handler::converge(
                &client,
                state.into(),
                pipe_handler::Params {
                    name,
                    command,
                    timeout,
                    filters: parse_list(filters),
                    mutator,
                    env_vars: parse_list(env_vars),
                    runtime_assets: parse_list(runtime_assets),
                },
                cli.check,
            )
            .await
        }
        Commands::SocketHandler {
            name,
            state,
            kind,
            host,
            port,
            timeout,
            filters,
        } => {
            debug!(name = %name, check = cli.check, "reconciling socket handler");
            socket_handler::converge(
                &client,
                state.into(),
                socket_handler::Params {
                    name,
                    kind: kind.into(),
                    host,
                    port,
                    timeout,
                    filters: parse_list(filters),
                },
                cli.check,
            )
            .await
        }
    }
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sensu_sync=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok((changed, object)) => {
            let result = json!({
                "changed": changed,
                "object": object,
            });
            println!("{result:#}");
        }
        Err(error) => {
            let failure = json!({
                "failed": true,
                "msg": error.to_string(),
            });
            eprintln!("{failure}");
            std::process::exit(1);
        }
    }
}
