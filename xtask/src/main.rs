use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for ripple")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the wave step and paint benchmarks
    Bench,
}

const BENCHES: &[(&str, &str)] = &[
    ("ripple-kernel", "bench_wave_step"),
    ("ripple-render", "bench_paint"),
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_doc()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Doc => run_doc()?,
        Commands::Build => cargo(&["build", "--workspace"])?,
        Commands::Bench => {
            for (package, bench) in BENCHES {
                cargo(&["bench", "-p", package, "--bench", bench])?;
            }
        }
    }

    Ok(())
}

/// Run `cargo <args>` and fail if it exits unsuccessfully.
fn cargo(args: &[&str]) -> Result<()> {
    let line = args.join(" ");
    println!("==> Running cargo {line}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {line} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo(&["fmt", "--all", "--", "--check"])
}

fn run_clippy() -> Result<()> {
    cargo(&[
        "clippy",
        "--workspace",
        "--all-targets",
        "--",
        "-D",
        "warnings",
    ])
}

fn run_tests() -> Result<()> {
    cargo(&["test", "--workspace"])
}

fn run_doc() -> Result<()> {
    cargo(&["doc", "--workspace", "--no-deps"])
}
