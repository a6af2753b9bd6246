#![forbid(unsafe_code)]
//! Ledger tree explorer - interactive TUI and one-shot query CLI

use clap::{Parser, Subcommand};
use colored::*;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fabtree::cli::{print_tree, tx_summary_table};
use fabtree::client::ExplorerClient;
use fabtree::config::load_config;
use fabtree::models::Block;
use fabtree::tree::block_tree;
use fabtree::ui::{self, App, SearchMode};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "Explore ledger blocks as an expandable tree", long_about = None)]
struct Cli {
    /// Query backend endpoint (overrides config.toml)
    #[arg(long)]
    endpoint: Option<String>,

    /// Print the tree as JSON instead of rendering it
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one block by number and print its tree
    Block { number: u64 },
    /// Fetch the block containing a transaction id
    Tx { id: String },
    /// Fetch the blocks touching a write-set key
    Key { key: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config()?;
    let endpoint = cli
        .endpoint
        .unwrap_or_else(|| config.explorer.endpoint.clone());
    let client = ExplorerClient::new(&endpoint)?;

    match cli.command {
        Some(command) => {
            tracing_subscriber::fmt::init();
            run_once(&client, command, cli.json).await
        }
        None => run_tui(client).await,
    }
}

async fn run_once(
    client: &ExplorerClient,
    command: Commands,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let blocks = match command {
        Commands::Block { number } => client.by_blocknum(number).await?,
        Commands::Tx { id } => client.by_txid(&id).await?,
        Commands::Key { key } => client.by_key(&key).await?,
    };

    let tree = block_tree(&blocks);

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    println!();
    println!(
        "{}",
        format!("🌳 {} from {}", summary(&blocks), client.endpoint())
            .bright_green()
            .bold()
    );
    println!();
    print_tree(&tree);

    let tx_count: usize = blocks.iter().map(|b| b.txs.len()).sum();
    if tx_count > 0 {
        println!();
        println!("{}", "📊 Transactions".bright_blue().bold());
        println!("{}", tx_summary_table(&blocks));
    }

    Ok(())
}

fn summary(blocks: &[Block]) -> String {
    match blocks {
        [block] => format!("Block {}", block.blocknum),
        _ => format!("{} blocks", blocks.len()),
    }
}

async fn run_tui(client: ExplorerClient) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let result = event_loop(&mut terminal, &mut app, &client).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &ExplorerClient,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Esc => {
                if app.error.is_some() {
                    app.dismiss_error();
                } else {
                    return Ok(());
                }
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(());
            }
            KeyCode::Tab => {
                app.mode = app.mode.next();
            }
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Enter => {
                if app.error.is_some() {
                    app.dismiss_error();
                } else {
                    search(app, client).await;
                }
            }
            KeyCode::Char(' ') => app.toggle_selected(),
            KeyCode::Up => app.move_up(),
            KeyCode::Down => app.move_down(),
            KeyCode::Left => {
                app.step_block(-1);
                search(app, client).await;
            }
            KeyCode::Right => {
                app.step_block(1);
                search(app, client).await;
            }
            KeyCode::Char(c) => {
                app.input.push(c);
            }
            _ => {}
        }
    }
}

/// Run the current search and install the result (or the first error) in the
/// app state. The tree is cleared up front so a failed fetch never shows a
/// stale result behind the error modal.
async fn search(app: &mut App, client: &ExplorerClient) {
    let query = app.input.trim().to_string();
    if query.is_empty() {
        return;
    }

    app.clear_tree();

    let result = match app.mode {
        SearchMode::BlockNum => match query.parse::<u64>() {
            Ok(n) => {
                app.input = n.to_string();
                client.by_blocknum(n).await
            }
            Err(_) => {
                app.set_error(format!("'{}' is not a block number", query));
                return;
            }
        },
        SearchMode::TxId => client.by_txid(&query).await,
        SearchMode::Key => client.by_key(&query).await,
    };

    match result {
        Ok(blocks) => {
            let tx_count: usize = blocks.iter().map(|b| b.txs.len()).sum();
            app.status = match blocks.as_slice() {
                [block] => format!("Block {} | {} txs", block.blocknum, tx_count),
                other => format!("{} blocks | {} txs", other.len(), tx_count),
            };
            app.set_tree(block_tree(&blocks));
        }
        Err(e) => app.set_error(e.to_string()),
    }
}
