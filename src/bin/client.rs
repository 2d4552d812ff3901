use clap::{Parser, Subcommand};
use tonic::Request;
use tonic::transport::{ClientTlsConfig, Endpoint};
use user_directory::proto::user_service_client::UserServiceClient;
use user_directory::proto::{CreateUserRequest, GetUserRequest, GreetUserRequest, User};
use user_directory::{DEFAULT_TOKEN, TokenInterceptor};

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "User directory client", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:6000")]
    server: String,

    /// Shared secret presented as `token` metadata
    #[arg(short, long, env = "DIRECTORY_TOKEN", default_value = DEFAULT_TOKEN, hide_env_values = true)]
    token: String,

    /// Connect over TLS using the system trust roots
    #[arg(long)]
    tls: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Create {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        role: String,
    },

    Get {
        #[arg(short, long)]
        user: String,
    },

    Greet {
        #[arg(short, long)]
        user: String,

        #[arg(short, long, default_value = "hello")]
        greeting: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut endpoint = Endpoint::from_shared(cli.server.clone())?;
    if cli.tls {
        endpoint = endpoint.tls_config(ClientTlsConfig::new().with_native_roots())?;
    }
    let channel = endpoint.connect().await?;
    let mut client = UserServiceClient::with_interceptor(channel, TokenInterceptor::new(&cli.token)?);

    match cli.command {
        Commands::Create { user, role } => {
            println!("Creating user '{user}'...");

            let request = Request::new(CreateUserRequest {
                user: Some(User {
                    username: user.clone(),
                    role,
                }),
            });

            if let Err(status) = client.create_user(request).await {
                eprintln!("Failed: {}", status.message());
                std::process::exit(1);
            }
            println!("Success: user '{user}' stored");
        }

        Commands::Get { user } => {
            let request = Request::new(GetUserRequest { username: user });

            match client.get_user(request).await {
                Ok(response) => {
                    let found = response.into_inner();
                    println!("{}: {}", found.username, found.role);
                }
                Err(status) => {
                    eprintln!("Failed: {}", status.message());
                    std::process::exit(1);
                }
            }
        }

        Commands::Greet { user, greeting } => {
            let request = Request::new(GreetUserRequest {
                username: user,
                greeting,
            });

            match client.greet_user(request).await {
                Ok(response) => println!("{}", response.into_inner().greeting),
                Err(status) => {
                    eprintln!("Failed: {}", status.message());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
