//! # trello-md-export
//!
//! A CLI tool that converts a [Trello](https://trello.com) board export into a
//! directory of local Markdown files, one per card.
//!
//! ## What it does
//!
//! Trello lets you download a board as a single JSON document containing its
//! lists, cards, labels and checklists. This tool reads that document and
//! writes a note-vault-friendly tree: one directory per list that still holds
//! cards (numbered in board order, e.g. `00___to_do/`), and inside it one
//! `<card number>.md` file per card with a YAML frontmatter block carrying the
//! card's metadata (title, labels, due date, checklist, Trello ids and
//! timestamps) followed by the card description as the note body.
//!
//! The export file is only read — nothing is sent back to Trello.
//!
//! ## Re-running
//!
//! Runs are one-shot and overwrite-safe: directories are created idempotently
//! and card files are rewritten in place, so converting a fresh export over an
//! existing vault just updates it. Files for cards or lists that no longer
//! exist in the newer export are left behind untouched.
//!
//! ## Usage
//!
//! ```sh
//! # Convert an export into a vault directory
//! trello-md-export --input board.json --output ~/notes/kanban
//!
//! # With defaults (./tmp/trello_export.json -> ./tmp/kanban)
//! trello-md-export
//! ```
//!
//! Preferences can be persisted in `~/.config/trello-md-export/config.toml`.
//!
//! ## Compatibility
//!
//! Reads the standard board export shape (`lists`, `cards`, `labels`,
//! `checklists`); unknown keys are ignored, so newer export fields are
//! harmless. If Trello changes the shape of the keys this tool relies on,
//! please [open an issue](https://github.com/egemengol/trello-md-export/issues).
