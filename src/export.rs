use crate::board::Board;
use crate::render;
use chrono::Utc;
use eyre::{Context, Result, eyre};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Configuration required to run the export.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
pub struct ExportConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub quiet: bool,
}

/// The main entry point for the business logic.
///
/// One sequential pass: load the export, walk active lists in board order,
/// write one directory per list and one file per card. Re-running over an
/// existing tree is safe (directories are created idempotently, files are
/// overwritten), but files from lists or cards removed in a newer export are
/// not cleaned up.
pub fn run(config: &ExportConfig) -> Result<()> {
    if !config.quiet {
        println!(
            "Reading Trello export JSON {}...",
            config.input_path.display()
        );
    }

    if !config.input_path.exists() {
        return Err(eyre!(
            "Could not find {}.\nUse --input to point at a board export JSON file.",
            config.input_path.display()
        ));
    }

    let board = Board::load(&config.input_path)?;

    let cards_by_list = board.cards_by_list();
    let labels = board.label_display();

    for (folder_idx, list) in board.active_lists().iter().enumerate() {
        let folder_name = format!("{:02}___{}", folder_idx, sanitize_filename(&list.name));
        let list_dir = config.output_dir.join(folder_name);
        fs::create_dir_all(&list_dir)
            .wrap_err_with(|| format!("Failed to create directory: {}", list_dir.display()))?;

        if !config.quiet {
            println!("  Processing List: {}", list.name);
        }

        // Every active list has an entry, the id came from a card.
        let mut cards = cards_by_list
            .get(list.id.as_str())
            .cloned()
            .unwrap_or_default();
        cards.sort_by(|a, b| a.pos.total_cmp(&b.pos));

        for (i, card) in cards.iter().enumerate() {
            let file_path = list_dir.join(format!("{}.md", card.id_short));
            let md_file = File::create(&file_path)
                .wrap_err_with(|| format!("Failed to create: {}", file_path.display()))?;
            let mut writer = BufWriter::new(md_file);

            let items = board.checklist_items_for(&card.id);
            render::write_card_markdown(&mut writer, card, &labels, i + 1, &items, Utc::now())
                .wrap_err_with(|| format!("Failed to write: {}", file_path.display()))?;
            writer
                .flush()
                .wrap_err_with(|| format!("Failed to flush: {}", file_path.display()))?;
        }
    }

    if !config.quiet {
        let shown = std::path::absolute(&config.output_dir)
            .unwrap_or_else(|_| config.output_dir.clone());
        println!("Converted Trello to Markdown at {}", shown.display());
    }

    Ok(())
}

/// Sanitize a list name for use as a directory segment.
///
/// Strips the characters Windows forbids in filenames, swaps spaces for
/// underscores, trims stray hyphens and whitespace, and lowercases. Card
/// filenames never pass through here since they are numeric short ids.
fn sanitize_filename(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();
    stripped
        .trim_matches(|c: char| c == '-' || c.is_whitespace())
        .to_lowercase()
}
