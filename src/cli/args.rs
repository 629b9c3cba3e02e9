use clap::Parser;
use std::env;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Serve a record registry (name + email) over a token-gated REST API",
    long_about = "A small daemon that keeps name/email records in SQLite and exposes \
                  create, list, get, update and delete operations over HTTP.",
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,

    #[arg(
        long,
        default_value = ".rolodex/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: String,

    #[arg(
        long = "log-file",
        env = "ROLODEX_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long = "api-listen",
        env = "ROLODEX_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:8084",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[arg(
        long = "api-secret",
        env = "ROLODEX_API_SECRET",
        value_name = "SECRET",
        help = "Shared secret the anti-forgery token is derived from; a random \
                per-session secret is generated when omitted"
    )]
    pub api_secret: Option<String>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();

    Cli::parse()
}
