//! `sockhttp [METHOD] URL`: send one request and print the response.

use std::process::ExitCode;
use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser};
use sockhttp_core::{ClientConfig, ConfigError, GetArgsPolicy, HttpClient, Params, Response};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sockhttp",
    version,
    about = "Send a GET or POST over a raw TCP socket",
    arg_required_else_help = true
)]
struct Cli {
    /// `METHOD URL`, or just `URL` for a GET
    #[arg(value_name = "[METHOD] URL", num_args = 1..=2, required = true)]
    target: Vec<String>,

    /// Form field for POST bodies (repeatable)
    #[arg(short = 'd', long = "data", value_name = "KEY=VALUE", value_parser = parse_pair)]
    data: Vec<(String, String)>,

    /// Connect, read and write timeout in milliseconds
    #[arg(long = "timeout-ms", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,

    /// Bytes per socket read
    #[arg(long = "chunk-size", value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    chunk_size: Option<usize>,

    /// Fail GET requests that carry --data instead of ignoring it
    #[arg(long = "reject-get-args", action = ArgAction::SetTrue)]
    reject_get_args: bool,

    /// Print the response as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,
}

impl Cli {
    /// With a single positional argument the method defaults to GET.
    fn method_and_url(&self) -> (&str, &str) {
        match self.target.as_slice() {
            [method, url] => (method.as_str(), url.as_str()),
            [url, ..] => ("GET", url.as_str()),
            [] => ("GET", ""),
        }
    }

    fn params(&self) -> Option<Params> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.data.iter().cloned().collect())
    }

    /// Environment settings first, then command-line overrides.
    fn config(&self, base: ClientConfig) -> ClientConfig {
        let mut config = base;
        if let Some(ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        if let Some(size) = self.chunk_size {
            config = config.with_chunk_size(size);
        }
        if self.reject_get_args {
            config = config.with_get_args(GetArgsPolicy::Reject);
        }
        config
    }
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn execute(cli: &Cli, env: Result<ClientConfig, ConfigError>) -> Result<Response, ConfigError> {
    let client = HttpClient::with_config(cli.config(env?));
    let (method, url) = cli.method_and_url();
    let params = cli.params();
    debug!(
        method,
        url,
        config = ?client.config(),
        fields = params.as_ref().map_or(0, |p| p.len()),
        "executing"
    );
    Ok(client.command(url, method, params.as_ref()))
}

fn render(response: &Response, json: bool) -> String {
    if !json {
        return response.to_string();
    }
    serde_json::to_string_pretty(response).unwrap_or_default()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match execute(&cli, ClientConfig::from_env()) {
        Ok(response) => {
            println!("{}", render(&response, cli.json));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("sockhttp: {err}");
            ExitCode::FAILURE
        }
    }
}
