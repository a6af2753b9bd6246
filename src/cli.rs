//! Shared helpers for the fabtree command-line binaries

use crate::config::Config;
use crate::error::Result;
use crate::models::Block;
use crate::tree::TreeNode;
use crate::wallet::Wallet;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

/// Open the wallet configured in `config.toml`, defaulting to
/// `~/.fabtree/wallet` when no path is set.
pub fn open_wallet(config: &Config) -> Result<Wallet> {
    if config.wallet.path.is_empty() {
        Wallet::open(Wallet::default_dir())
    } else {
        Wallet::open(&config.wallet.path)
    }
}

/// Print a tree with folder/leaf glyphs and indentation.
pub fn print_tree(node: &TreeNode) {
    print_tree_at(node, 0);
}

fn print_tree_at(node: &TreeNode, depth: usize) {
    let indent = "  ".repeat(depth);
    if node.is_folder() {
        println!(
            "{}{} {}",
            indent,
            "▼".bright_cyan(),
            node.name.as_str().bright_cyan().bold()
        );
        for child in &node.children {
            print_tree_at(child, depth + 1);
        }
    } else {
        println!("{}{}", indent, node.name);
    }
}

/// Transaction summary table for one-shot query output.
pub fn tx_summary_table(blocks: &[Block]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Block")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Tx ID")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Validation")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Writes")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Date")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
        ]);

    for block in blocks {
        for tx in &block.txs {
            let valid = tx.validationcode == 0;
            table.add_row(vec![
                Cell::new(format!("#{}", block.blocknum)).fg(TableColor::White),
                Cell::new(format_hash(&tx.txid)).fg(TableColor::White),
                Cell::new(if valid {
                    "✅ VALID".to_string()
                } else {
                    format!("❌ code {}", tx.validationcode)
                })
                .fg(if valid {
                    TableColor::Green
                } else {
                    TableColor::Red
                }),
                Cell::new(tx.kv.len()).fg(TableColor::White),
                Cell::new(format_timestamp_short(tx.time)).fg(TableColor::Grey),
            ]);
        }
    }
    table
}

pub fn format_hash(hash: &str) -> String {
    if hash.len() > 20 {
        format!("{}...{}", &hash[..10], &hash[hash.len() - 10..])
    } else {
        hash.to_string()
    }
}

pub fn format_timestamp_short(timestamp: i64) -> String {
    use chrono::DateTime;

    if let Some(dt) = DateTime::from_timestamp(timestamp, 0) {
        dt.format("%m/%d %H:%M").to_string()
    } else {
        "Invalid".to_string()
    }
}

/// Red error box used by the one-shot binaries.
pub fn print_error_box(message: &str) {
    eprintln!("{}", "╔══════════════════════════════════════════╗".red());
    eprintln!("{}", format!("║  ❌ {:<37} ║", truncate(message, 37)).red().bold());
    eprintln!("{}", "╚══════════════════════════════════════════╝".red());
}

fn truncate(message: &str, width: usize) -> String {
    if message.chars().count() > width {
        let cut: String = message.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hashes_are_untouched() {
        assert_eq!(format_hash("abcd"), "abcd");
    }

    #[test]
    fn long_hashes_are_elided() {
        let hash = "af589062d2e699c9b0ba36e831609876f0ebae99";
        let short = format_hash(hash);
        assert!(short.starts_with("af589062d2"));
        assert!(short.ends_with("76f0ebae99"));
        assert!(short.contains("..."));
    }

    #[test]
    fn timestamps_render_or_report_invalid() {
        assert_eq!(format_timestamp_short(0), "01/01 00:00");
        assert_eq!(format_timestamp_short(i64::MAX), "Invalid");
    }
}
