//! WDP command-line tool.
//!
//! WebDriver wire protocol inspection and a demo remote end.
//!
//! # Commands
//!
//! - `encode` - Encode a command as an HTTP request
//! - `decode-response` - Decode an HTTP response body
//! - `commands` - List the command registry of a dialect
//! - `serve` - Start a demo remote end that echoes commands

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use wdp::{
    config::Config,
    http::HttpResponse,
    protocol::{names, Command, Dialect, Response, SessionId},
    routing::{BodyLoggingFilter, Filter, LoggingFilter, Route},
    server::{CommandRoute, Server, ServerConfig},
    VERSION,
};

#[derive(Parser)]
#[command(name = "wdp")]
#[command(version = VERSION)]
#[command(about = "WebDriver wire protocol layer", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/wdp/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a command (JSON: {"sessionId", "name", "parameters"}) as an HTTP request
    Encode {
        /// Command JSON (or - for stdin)
        input: Option<String>,

        /// Wire dialect (w3c, legacy)
        #[arg(short, long, default_value = "w3c")]
        dialect: Dialect,
    },

    /// Decode an HTTP response body into a response
    DecodeResponse {
        /// Response body (or - for stdin)
        input: Option<String>,

        /// Wire dialect (w3c, legacy, auto)
        #[arg(short, long, default_value = "auto")]
        dialect: String,

        /// HTTP status of the response
        #[arg(short, long, default_value = "200")]
        status: u16,
    },

    /// List the commands a dialect can encode and decode
    Commands {
        /// Wire dialect (w3c, legacy)
        #[arg(short, long, default_value = "w3c")]
        dialect: Dialect,
    },

    /// Start a demo remote end that echoes every command
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Bind to all interfaces
        #[arg(long)]
        bind_all: bool,

        /// Wire dialect (w3c, legacy)
        #[arg(short, long)]
        dialect: Option<Dialect>,

        /// Also mount every route under this prefix (e.g. /wd/hub)
        #[arg(long)]
        prefix: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_default()?,
    };
    let config = file_config.merge(Config::from_env());
    init_logging(&config.logging.level, cli.json_logs || config.logging.json);

    match cli.command {
        Commands::Encode { input, dialect } => cmd_encode(input, dialect),
        Commands::DecodeResponse {
            input,
            dialect,
            status,
        } => cmd_decode_response(input, &dialect, status),
        Commands::Commands { dialect } => cmd_commands(dialect),
        Commands::Serve {
            port,
            host,
            bind_all,
            dialect,
            prefix,
        } => {
            let mut section = config.server;
            if let Some(port) = port {
                section.port = port;
            }
            if let Some(host) = host {
                section.host = host;
            }
            if let Some(dialect) = dialect {
                section.dialect = dialect;
            }

            let mut server_config = ServerConfig::from_section(&section)?;
            if bind_all {
                server_config = server_config.bind_all();
            }
            cmd_serve(server_config, prefix, config.content.memory_threshold)
        },
    }
}

fn init_logging(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn cmd_encode(input: Option<String>, dialect: Dialect) -> anyhow::Result<()> {
    let command: Command = serde_json::from_str(&read_input(input)?)?;
    let request = dialect.command_codec().encode(&command)?;

    println!("{} {}", request.method, request.uri);
    for (name, value) in request.headers.iter() {
        println!("{name}: {value}");
    }
    if !request.content.is_empty() {
        println!();
        println!("{}", request.utf8_string());
    }
    Ok(())
}

fn cmd_decode_response(input: Option<String>, dialect: &str, status: u16) -> anyhow::Result<()> {
    let body = read_input(input)?;

    let dialect = if dialect.eq_ignore_ascii_case("auto") {
        let detected = serde_json::from_str::<Value>(&body)
            .map(|value| Dialect::detect(&value))
            .unwrap_or_default();
        tracing::info!("Detected dialect: {detected}");
        detected
    } else {
        dialect.parse()?
    };

    let http = HttpResponse::new(status).with_content(body);
    let response = dialect.response_codec().decode(&http)?;

    let rendered = json!({
        "dialect": dialect.as_str(),
        "sessionId": response.session_id,
        "status": response.status,
        "state": response.state,
        "success": response.is_success(),
        "value": response.value.to_json(),
    });
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

fn cmd_commands(dialect: Dialect) -> anyhow::Result<()> {
    let codec = dialect.command_codec();
    let registry = codec.registry();

    println!("{} commands ({dialect}):", registry.len());
    for (name, spec) in registry.iter() {
        println!("  {:<36} {:<6} {}", name, spec.method(), spec);
    }

    let aliases = registry.aliases();
    if !aliases.is_empty() {
        println!();
        println!("Aliases:");
        for (alias, target) in aliases {
            println!("  {alias:<36} -> {target}");
        }
    }
    Ok(())
}

fn cmd_serve(
    config: ServerConfig,
    prefix: Option<String>,
    memory_threshold: usize,
) -> anyhow::Result<()> {
    let dialect = config.dialect;
    let status = Route::get("/status")?.to_handler(move |_: &wdp::HttpRequest| {
        HttpResponse::new(200).with_json(&json!({
            "value": {
                "ready": true,
                "message": format!("wdp {VERSION} ready ({dialect})"),
            }
        }))
    });
    let commands = CommandRoute::new(dialect, echo).into_route();

    let mut root = Route::combine([commands, status]);
    if let Some(prefix) = prefix {
        root = Route::combine([root.clone(), Route::prefix(prefix).to(root)]);
    }
    let app = LoggingFilter::new()
        .and_then(BodyLoggingFilter::new(memory_threshold))
        .and_finally_route(root);

    tracing::info!("Starting demo WebDriver server on {} ({dialect})", config.addr);

    let server = Server::new(config, app);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.run())?;
    Ok(())
}

/// Demo command handler: opens fake sessions and echoes everything else
fn echo(command: Command) -> Response {
    match command.name.as_str() {
        names::NEW_SESSION => {
            let session_id = SessionId::random();
            let capabilities = command
                .parameter("capabilities")
                .cloned()
                .unwrap_or_else(|| json!({}));
            Response::success(json!({
                "sessionId": session_id.as_str(),
                "capabilities": capabilities,
            }))
            .with_session_id(session_id.as_str())
        },
        _ => Response::success(json!({
            "command": command.name,
            "parameters": command.parameters,
        })),
    }
}

fn read_input(input: Option<String>) -> anyhow::Result<String> {
    match input {
        Some(s) if s != "-" => Ok(s),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        },
    }
}
