use anyhow::{Context, Result};
use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::Command;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo nextest with default configuration
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Review pending insta snapshots of the overlay markup
    Snapshots {
        /// Accept every pending snapshot without prompting
        #[arg(long)]
        accept: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, release } => run_nextest(profile, release)?,
        Commands::Snapshots { accept } => run_snapshots(accept)?,
    }
    Ok(())
}

fn run_nextest(profile: Option<String>, release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("nextest").arg("run");
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if release {
        cmd.arg("--release");
    }
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("cargo nextest run failed");
    }
    Ok(())
}

fn run_snapshots(accept: bool) -> Result<()> {
    let metadata = MetadataCommand::new()
        .no_deps()
        .exec()
        .context("failed to read workspace metadata")?;
    let root = metadata.workspace_root.into_std_path_buf();

    let pending = pending_snapshots(&root);
    if pending.is_empty() {
        println!("no pending snapshots under {}", root.display());
        return Ok(());
    }
    for path in &pending {
        println!("pending: {}", path.display());
    }

    let mut cmd = Command::new("cargo");
    cmd.current_dir(&root)
        .arg("insta")
        .arg(if accept { "accept" } else { "review" });
    let status = cmd.status().context("failed to launch cargo insta")?;
    if !status.success() {
        anyhow::bail!("cargo insta exited with {status}");
    }
    Ok(())
}

fn pending_snapshots(root: &std::path::Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != "target" && entry.file_name() != ".git")
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.ends_with(".snap.new"))
        })
        .map(|entry| entry.into_path())
        .collect()
}
