//! Operator CLI: inspect and test a TOML route table.

use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use route_trie::config::{build_router, load_config};
use route_trie::{walk, Method, Resolution, RouteContext};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect and test a compiled route table", long_about = None)]
struct Cli {
    /// Path to the TOML route table
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every compiled route
    Routes {
        /// Emit JSON instead of aligned text
        #[arg(long)]
        json: bool,
    },
    /// Check whether an exact route template is registered
    Check { pattern: String },
    /// Resolve a method and path against the table
    Match { method: String, path: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_trie=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let mux = build_router(&config)?;

    match cli.command {
        Commands::Routes { json } => {
            let mut entries = Vec::new();
            let _: Result<(), Infallible> = walk(&mux, |method, pattern, target, _mw| {
                entries.push((method, pattern.to_string(), target.clone()));
                Ok(())
            });
            if json {
                let dump: Vec<_> = entries
                    .iter()
                    .map(|(method, pattern, target)| {
                        json!({
                            "method": method,
                            "pattern": pattern,
                            "target": target,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&dump)?);
            } else {
                for (method, pattern, target) in &entries {
                    println!("{:8} {:40} -> {}", method.as_str(), pattern, target);
                }
            }
        }
        Commands::Check { pattern } => {
            if mux.has_pattern(&pattern) {
                println!("registered: {pattern}");
            } else {
                println!("not registered: {pattern}");
                std::process::exit(1);
            }
        }
        Commands::Match { method, path } => {
            let method = Method::from_str(&method)?;
            let mut ctx = RouteContext::new();
            match mux.resolve(&mut ctx, method, &path) {
                Resolution::Found { handler } => {
                    println!("{} {} -> {}", method, ctx.matched_pattern(), handler);
                    for (key, value) in ctx.param_keys().iter().zip(ctx.param_values()) {
                        println!("  {key} = {value}");
                    }
                }
                Resolution::MethodNotAllowed { allowed, .. } => {
                    let allowed: Vec<_> = allowed.iter().map(Method::as_str).collect();
                    println!("method not allowed; allowed: {}", allowed.join(", "));
                    std::process::exit(2);
                }
                Resolution::NotFound { .. } => {
                    println!("no route");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
