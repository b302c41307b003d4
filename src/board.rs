//! Type definitions for the Trello board export format.
//!
//! A board export is a single JSON document downloaded from Trello
//! (`https://trello.com/b/<id>.json`) with top-level arrays `lists`, `cards`,
//! `labels` and `checklists`. Only the keys this tool consumes are modelled;
//! everything else in the export is ignored during decoding.
//!
//! Field notes:
//! - `pos` is Trello's fractional ordering key (a float, not an index).
//! - `idShort` is the small per-board card number shown in card URLs. Exports
//!   carry it as a JSON number, but some third-party dumps stringify it, so
//!   both forms are accepted.
//! - `dateClosed` / `dateCompleted` are null for open cards.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use eyre::{Context, Result};
use serde::{Deserialize, Deserializer};

/// The root of a board export. Read once, never mutated.
#[derive(Debug, Deserialize)]
pub struct Board {
    pub lists: Vec<List>,
    pub cards: Vec<Card>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub checklists: Vec<Checklist>,
}

/// A column on the board. Maps to one output directory when active.
#[derive(Debug, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
    pub pos: f64,
}

/// A card. Maps to one output Markdown file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub id_short: i64,
    pub id_list: String,
    #[serde(default)]
    pub id_labels: Vec<String>,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub due: Option<String>,
    pub url: String,
    #[serde(default)]
    pub date_closed: Option<String>,
    #[serde(default)]
    pub date_last_activity: Option<String>,
    #[serde(default)]
    pub date_completed: Option<String>,
    pub pos: f64,
}

#[derive(Debug, Deserialize)]
pub struct Label {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl Label {
    /// Text shown for this label: the name, or the bare color for unnamed labels.
    pub fn display(&self) -> &str {
        if self.name.is_empty() {
            &self.color
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id_card: String,
    #[serde(default)]
    pub check_items: Vec<ChecklistItem>,
}

#[derive(Debug, Deserialize)]
pub struct ChecklistItem {
    pub name: String,
    pub state: String,
    pub pos: f64,
}

impl ChecklistItem {
    pub fn is_done(&self) -> bool {
        self.state == "complete"
    }
}

/// Accept `42` or `"42"`, reject anything else with the offending value in the error.
fn number_or_numeric_string<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse::<i64>().map_err(|_| {
            serde::de::Error::custom(format!("idShort is not numeric: {:?}", s))
        }),
    }
}

impl Board {
    /// Read and decode a board export file.
    ///
    /// The caller is expected to have checked that the path exists (so the
    /// missing-file case gets its own user-facing message); any read or decode
    /// failure here is propagated with the path attached.
    pub fn load(path: &Path) -> Result<Board> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read export: {}", path.display()))?;
        serde_json::from_str(&content)
            .wrap_err_with(|| format!("Failed to decode export: {}", path.display()))
    }

    /// Lists referenced by at least one card, ascending by `pos`.
    ///
    /// Lists nobody points at produce no output at all. The sort is stable, so
    /// lists sharing a `pos` keep their order from the export.
    pub fn active_lists(&self) -> Vec<&List> {
        let active_ids: HashSet<&str> = self.cards.iter().map(|c| c.id_list.as_str()).collect();
        let mut lists: Vec<&List> = self
            .lists
            .iter()
            .filter(|l| active_ids.contains(l.id.as_str()))
            .collect();
        lists.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        lists
    }

    /// Cards partitioned by their owning list, in export order.
    pub fn cards_by_list(&self) -> HashMap<&str, Vec<&Card>> {
        let mut map: HashMap<&str, Vec<&Card>> = HashMap::new();
        for card in &self.cards {
            map.entry(card.id_list.as_str()).or_default().push(card);
        }
        map
    }

    /// Label id → display text, for resolving a card's `idLabels`.
    pub fn label_display(&self) -> HashMap<&str, &str> {
        self.labels
            .iter()
            .map(|l| (l.id.as_str(), l.display()))
            .collect()
    }

    /// All checklist items belonging to one card, flattened across its
    /// checklists and sorted ascending by item `pos`.
    pub fn checklist_items_for(&self, card_id: &str) -> Vec<&ChecklistItem> {
        let mut items: Vec<&ChecklistItem> = self
            .checklists
            .iter()
            .filter(|cl| cl.id_card == card_id)
            .flat_map(|cl| cl.check_items.iter())
            .collect();
        items.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        items
    }
}
