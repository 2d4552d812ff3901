use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::execute;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::Notify;
use tonic::transport::Server;
use tonic_health::server::{HealthReporter, health_reporter};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use user_directory::proto::user_service_server::UserServiceServer;
use user_directory::{AuthInterceptor, DirectoryService, ServerConfig, UserRegistry};

type DirectoryServer = UserServiceServer<DirectoryService>;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Token-authenticated user directory server", long_about = None)]
#[command(version)]
struct Args {
    /// Host to bind to (overrides configuration)
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on (overrides configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Shared secret every call must present (overrides configuration)
    #[arg(long, env = "DIRECTORY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable the Prometheus metrics endpoint
    #[arg(long)]
    metrics: bool,

    /// Run without the interactive console
    #[arg(long)]
    headless: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Status,
    Users,
    Help,
    Quit,
}

impl Command {
    fn from_line(line: &str) -> Option<Result<Self, String>> {
        let word = line.split_whitespace().next()?;
        let command = match word {
            "/status" => Self::Status,
            "/users" => Self::Users,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => return Some(Err(format!("Unknown command: {other} (try /help)"))),
        };
        Some(Ok(command))
    }
}

fn say(color: Color, text: &str) {
    let mut stdout = io::stdout();
    execute!(stdout, SetForegroundColor(color), Print(text), ResetColor).ok();
    println!();
}

const HELP: &str = "/status  server address, TLS, metrics and user count
/users   stored user count
/help    this text
/quit    graceful shutdown";

/// Layers CLI overrides on top of the loaded configuration.
///
/// A configuration file or environment that fails to parse is an error; the
/// server never substitutes the built-in token for one the operator set.
fn load_config(args: &Args) -> Result<ServerConfig, user_directory::Error> {
    let mut config = ServerConfig::from_env()?;

    if let Some(host) = &args.host {
        config.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(token) = &args.token {
        config.auth.token.clone_from(token);
    }
    if args.metrics {
        config.metrics.enabled = true;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config(&args).and_then(|config| {
        config.validate()?;
        Ok(config)
    });
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Refusing to start: {e}");
            return Err(e.into());
        }
    };

    let addr = config.addr()?;
    let tls = config.tls.load()?;
    let tls_enabled = tls.is_some();

    if config.metrics.enabled {
        let metrics_addr = config.metrics.addr()?;
        if let Err(e) = metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()
        {
            error!("Failed to start metrics server: {e}");
        } else {
            info!("Metrics server started on {metrics_addr}");
        }
    }

    let registry = UserRegistry::new();
    let service = DirectoryService::new(registry.clone());
    let gate = AuthInterceptor::new(config.auth.token.clone());

    let (mut health_reporter, health_service) = health_reporter();
    health_reporter.set_serving::<DirectoryServer>().await;

    let on_off = |enabled: bool| if enabled { "on" } else { "off" };
    info!(
        %addr,
        tls = on_off(tls_enabled),
        metrics = on_off(config.metrics.enabled),
        "Directory server starting"
    );

    let mut builder = Server::builder();
    if let Some(tls) = tls {
        builder = builder.tls_config(tls)?;
    }

    let quit = Arc::new(Notify::new());
    let router = builder
        .add_service(health_service)
        .add_service(UserServiceServer::with_interceptor(service, gate));
    let server_handle = tokio::spawn(router.serve_with_shutdown(
        addr,
        shutdown_signal(health_reporter, Arc::clone(&quit)),
    ));

    if args.headless {
        info!("Console disabled; stop with Ctrl+C or SIGTERM");
    } else {
        let status = format!(
            "address {addr}, TLS {}, metrics {}",
            on_off(tls_enabled),
            on_off(config.metrics.enabled)
        );
        run_console(&status, &registry, &quit).await;
    }

    server_handle.await??;
    info!("Server shutdown complete");
    Ok(())
}

async fn run_console(status: &str, registry: &UserRegistry, quit: &Notify) {
    say(Color::Yellow, "Type /help for available commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                say(Color::Red, &format!("Error reading input: {e}"));
                continue;
            }
        };

        match Command::from_line(&line) {
            None => {}
            Some(Err(msg)) => say(Color::Red, &msg),
            Some(Ok(Command::Status)) => {
                let users = registry.len().await;
                say(Color::Cyan, &format!("{status}, {users} stored users"));
            }
            Some(Ok(Command::Users)) => {
                say(Color::Cyan, &format!("{} stored users", registry.len().await));
            }
            Some(Ok(Command::Help)) => say(Color::White, HELP),
            Some(Ok(Command::Quit)) => {
                say(Color::Yellow, "Initiating graceful shutdown...");
                quit.notify_one();
                return;
            }
        }
    }
}

async fn shutdown_signal(mut health_reporter: HealthReporter, quit: Arc<Notify>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
        _ = quit.notified() => {
            info!("Shutdown requested via console");
        },
    }

    health_reporter.set_not_serving::<DirectoryServer>().await;

    info!("Initiating graceful shutdown (allowing in-flight requests to complete)");

    tokio::time::sleep(Duration::from_secs(2)).await;
}
