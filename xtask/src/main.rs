use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for hillrun")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc, smoke
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
    /// Drive the default script headlessly and verify replay
    Smoke,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_doc()?;
            run_smoke()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Doc => run_doc()?,
        Commands::Build => run_cargo("build", &["build", "--workspace"])?,
        Commands::Smoke => run_smoke()?,
    }

    Ok(())
}

fn run_cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {label}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {label} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    run_cargo("fmt --check", &["fmt", "--all", "--", "--check"])
}

fn run_clippy() -> Result<()> {
    run_cargo(
        "clippy",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )
}

fn run_tests() -> Result<()> {
    run_cargo("test", &["test", "--workspace"])
}

fn run_doc() -> Result<()> {
    run_cargo("doc", &["doc", "--workspace", "--no-deps"])
}

fn run_smoke() -> Result<()> {
    run_cargo(
        "run (drive)",
        &["run", "-q", "-p", "hillrun-cli", "--", "drive", "--every", "60"],
    )?;
    run_cargo(
        "run (replay)",
        &["run", "-q", "-p", "hillrun-cli", "--", "replay"],
    )?;
    run_cargo(
        "run (terrain)",
        &["run", "-q", "-p", "hillrun-cli", "--", "terrain", "--rows", "32", "--cols", "32"],
    )
}
