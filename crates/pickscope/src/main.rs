use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use pickscope::domain::model::{EventOrigin, NodeId};
use pickscope::domain::ports::PageDom;
use pickscope::infra::config::Config;
use pickscope::infra::local::LocalOverlay;
use pickscope::infra::page::PageTree;
use pickscope::ui::app::UiApp;

#[derive(Parser)]
#[command(name = "pickscope")]
#[command(author, version, about = "Pick a page element and scope a blocking rule for it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick elements interactively in the terminal
    Tui {
        /// Page description in JSON
        #[arg(long)]
        page: PathBuf,
        /// Page location reported to the rule constructor
        #[arg(long)]
        location: Option<String>,
    },
    /// Open the scope menu for a node, apply widen/narrow moves and print each rule
    Derive {
        #[arg(long)]
        page: PathBuf,
        /// Document-order index of the picked node
        #[arg(long)]
        node: usize,
        /// Moves to apply: `+` widens, `-` narrows
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        moves: String,
        #[arg(long)]
        location: Option<String>,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Serialize)]
struct DeriveStep<'a> {
    step: usize,
    position: Option<isize>,
    target: Option<NodeId>,
    tag: Option<&'a str>,
    rule: Option<&'a str>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;
    pickscope::init(&config.logging.filter);

    match cli.command {
        Commands::Tui { page, location } => {
            if let Some(location) = location {
                config.page.location = location;
            }
            let tree = PageTree::load(&page)?;
            let mut app = UiApp::new(LocalOverlay::new(tree, &config)?);
            app.run()
        }
        Commands::Derive {
            page,
            node,
            moves,
            location,
        } => {
            if let Some(location) = location {
                config.page.location = location;
            }
            run_derive(&page, node, &moves, &config)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pickscope", &mut io::stdout());
            Ok(())
        }
    }
}

fn run_derive(page: &Path, node: usize, moves: &str, config: &Config) -> Result<()> {
    let tree = PageTree::load(page)?;
    let node = tree.node(node)?;
    let mut overlay = LocalOverlay::new(tree, config)?;
    overlay
        .show_scope_menu(node)
        .with_context(|| format!("failed to open scope menu for {node}"))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_step(&mut out, &overlay, 0)?;
    for (index, step) in moves.chars().enumerate() {
        let class = match step {
            '+' => "adg-plus",
            '-' => "adg-minus",
            other => bail!("unknown move '{other}', expected '+' or '-'"),
        };
        overlay.click(class, EventOrigin::UserEvent)?;
        print_step(&mut out, &overlay, index + 1)?;
    }
    Ok(())
}

fn print_step(out: &mut impl Write, overlay: &LocalOverlay, step: usize) -> Result<()> {
    let session = overlay.host().session();
    let target = session.current_target();
    let line = DeriveStep {
        step,
        position: session.scope().map(|scope| scope.position),
        target,
        tag: target.and_then(|target| overlay.tree().tag_name(target)),
        rule: session.derived_rule(),
    };
    serde_json::to_writer(&mut *out, &line)?;
    writeln!(out)?;
    Ok(())
}
