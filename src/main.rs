use std::process::ExitCode;

use clap::{Parser, Subcommand};

use username_dev::check::{Client, ClientConfig, DEFAULT_BASE_URL};
use username_dev::report::{exit_code, render_json, render_text};

const API_KEY_VAR: &str = "USERNAME_DEV_API_KEY";

#[derive(Parser)]
#[command(
    name = "username-dev",
    version,
    about = "Official CLI for username.dev, the complete solution for username governance",
    after_help = "Requires an API key in the USERNAME_DEV_API_KEY environment variable. \
                  Get one at https://app.username.dev/dashboard\n\n\
                  Exit codes: 0 available, 1 reserved or any error."
)]
struct Cli {
    /// API base URL
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check if a username is reserved or available
    Check {
        /// The username to check
        #[arg(allow_hyphen_values = true)]
        username: String,

        /// Output raw JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Check { username, json } => run_check(&cli.base_url, &username, json),
    }
}

fn run_check(base_url: &str, username: &str, json: bool) -> ExitCode {
    let api_key = match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!(
                "Error: API key missing. Set {API_KEY_VAR} environment variable \
                 or get one at https://app.username.dev/dashboard"
            );
            return ExitCode::from(1);
        }
    };

    let config = ClientConfig::new(api_key).with_base_url(base_url);
    let result = Client::new(config).and_then(|client| client.check(username));

    match result {
        Ok(result) => {
            if json {
                match render_json(&result) {
                    Ok(out) => println!("{out}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        return ExitCode::from(1);
                    }
                }
            } else {
                print!("{}", render_text(username, &result));
            }
            ExitCode::from(exit_code(&result))
        }
        Err(e) => {
            log::debug!("check failed: {e:?}");
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}
