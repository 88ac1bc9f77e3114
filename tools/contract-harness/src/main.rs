//! Contract harness. Sends the HTTP assertions under `contracts/http/`
//! against a running forms service and reports pass/fail.
//!
//! # Usage
//!
//! ```bash
//! # Run every fixture against a local service
//! cargo run -p contract-harness -- --base-url http://localhost:3120
//!
//! # Restrict to one service directory
//! cargo run -p contract-harness -- --base-url http://localhost:3120 --service forms
//! ```
//!
//! Exits 0 when all assertions pass, 1 when any fail.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod fixture;
mod reporter;
mod runner;

use fixture::Fixture;
use reporter::Reporter;
use runner::Runner;

#[derive(Parser)]
#[command(about = "Run HTTP contract assertions against a live forms service")]
struct Args {
    /// Base URL of the service (e.g. http://localhost:3120)
    #[arg(long)]
    base_url: String,

    /// Run only fixtures under this contracts/http/ subdirectory
    #[arg(long)]
    service: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let workspace_root = workspace_root();
    let fixtures: Vec<Fixture> = fixture::load_all(&workspace_root, args.service.as_deref())?;

    if fixtures.is_empty() {
        eprintln!("No fixtures found.");
        return Ok(());
    }

    println!(
        "Running {} fixture(s) against {}",
        fixtures.len(),
        args.base_url
    );
    println!();

    let runner = Runner::new(&args.base_url);
    let mut reporter = Reporter::new();

    for f in &fixtures {
        let result = runner.run(f).await;
        reporter.record(f, result);
    }

    reporter.print_summary();

    if reporter.all_passed() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

/// Walk up from this crate's manifest dir to the workspace root, which is
/// the directory holding `Cargo.lock`.
fn workspace_root() -> PathBuf {
    let start = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    start
        .ancestors()
        .find(|p| p.join("Cargo.lock").exists())
        .unwrap_or(&start)
        .to_path_buf()
}
