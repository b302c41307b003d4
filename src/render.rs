//! Renders one card as a Markdown document: a YAML frontmatter block with a
//! fixed field order, then a heading and the raw card description.
//!
//! The frontmatter is assembled by hand instead of going through a YAML
//! serializer. The output contract fixes both the exact field order and the
//! escaping rule for user-supplied strings, and downstream vaults parse these
//! files as-is, so the emitter stays in full control of every byte.

use std::collections::HashMap;
use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::board::{Card, ChecklistItem};

/// Escape a string for embedding in a double-quoted YAML scalar.
///
/// Empty input yields the bare empty-string token `""`. Otherwise backslashes
/// are escaped before quotes (the reverse order would double-escape), embedded
/// newlines collapse to a single space, and carriage returns are dropped.
pub fn escape_yaml_string(val: &str) -> String {
    if val.is_empty() {
        return "\"\"".to_string();
    }
    let escaped = val
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
        .replace('\r', "");
    format!("\"{}\"", escaped)
}

/// Make text safe for display inside a `[[File|Text]]` wiki link by swapping
/// square brackets for parens.
///
/// Not called by the export pipeline today; kept for vault post-processing
/// alongside the other sanitizers.
#[allow(dead_code)]
pub fn sanitize_link_text(text: &str) -> String {
    text.replace('[', "(").replace(']', ")").trim().to_string()
}

fn yaml_opt(val: Option<&str>) -> &str {
    val.unwrap_or("null")
}

/// Write the full Markdown document for one card.
///
/// `list_order` is the card's 1-based rank within its list. `created` is the
/// conversion timestamp; it deliberately records when the export ran, since
/// the Trello export carries no creation date for cards.
pub fn write_card_markdown<W: Write>(
    writer: &mut W,
    card: &Card,
    labels: &HashMap<&str, &str>,
    list_order: usize,
    checklist_items: &[&ChecklistItem],
    created: DateTime<Utc>,
) -> std::io::Result<()> {
    writeln!(writer, "---")?;
    writeln!(writer, "title: {}", escape_yaml_string(&card.name))?;
    writeln!(writer, "id: {}", card.id_short)?;
    writeln!(
        writer,
        "created: {}",
        created.to_rfc3339_opts(SecondsFormat::Micros, false)
    )?;
    writeln!(writer, "list_order: {}", list_order)?;

    // Unknown label ids are silently dropped; the key is omitted when nothing resolves.
    let resolved: Vec<&str> = card
        .id_labels
        .iter()
        .filter_map(|id| labels.get(id.as_str()).copied())
        .collect();
    if !resolved.is_empty() {
        writeln!(writer, "labels:")?;
        for label in resolved {
            writeln!(writer, "  - {}", escape_yaml_string(label))?;
        }
    }

    // An empty due string is treated the same as an absent one.
    if let Some(due) = card.due.as_deref().filter(|d| !d.is_empty()) {
        writeln!(writer, "due: {}", due)?;
    }

    if !checklist_items.is_empty() {
        writeln!(writer, "checklist:")?;
        for item in checklist_items {
            writeln!(
                writer,
                "  - {{ desc: {}, done: {} }}",
                escape_yaml_string(&item.name),
                item.is_done()
            )?;
        }
    }

    writeln!(writer, "trello_data:")?;
    writeln!(writer, "  id: {}", card.id)?;
    writeln!(writer, "  url: {}", card.url)?;
    writeln!(writer, "  date_closed: {}", yaml_opt(card.date_closed.as_deref()))?;
    writeln!(
        writer,
        "  date_last_activity: {}",
        yaml_opt(card.date_last_activity.as_deref())
    )?;
    writeln!(
        writer,
        "  date_completed: {}",
        yaml_opt(card.date_completed.as_deref())
    )?;
    writeln!(writer, "---")?;
    writeln!(writer)?;

    // Body: heading plus the description verbatim, trailing newline guaranteed.
    writeln!(writer, "# {}", card.name)?;
    writeln!(writer)?;
    writeln!(writer, "{}", card.desc)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn card(json: &str) -> Card {
        serde_json::from_str(json).expect("test card should decode")
    }

    fn minimal_card() -> Card {
        card(
            r#"{
                "id": "C1", "idShort": 42, "idList": "L1", "name": "Buy milk",
                "desc": "2%", "idLabels": [], "pos": 1, "url": "http://x",
                "dateClosed": null, "dateLastActivity": "2020-01-01", "dateCompleted": null
            }"#,
        )
    }

    fn render(card: &Card, labels: &HashMap<&str, &str>, items: &[&ChecklistItem]) -> String {
        let mut buf = Vec::new();
        let created = DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        write_card_markdown(&mut buf, card, labels, 1, items, created).unwrap();
        String::from_utf8(buf).unwrap()
    }

    /// Everything between the `---` fences, as parsed YAML.
    fn frontmatter(doc: &str) -> Value {
        let inner = doc
            .strip_prefix("---\n")
            .and_then(|rest| rest.split_once("\n---\n"))
            .map(|(fm, _)| fm)
            .expect("document should have a frontmatter block");
        serde_yaml::from_str(inner).expect("frontmatter should be valid YAML")
    }

    #[test]
    fn escape_handles_empty_backslash_quote_and_newlines() {
        assert_eq!(escape_yaml_string(""), "\"\"");
        assert_eq!(escape_yaml_string("plain"), "\"plain\"");
        assert_eq!(escape_yaml_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(escape_yaml_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(escape_yaml_string("one\ntwo\r\nthree"), "\"one two three\"");
    }

    #[test]
    fn escape_round_trips_through_yaml_reader() {
        for original in ["back\\slash", "quo\"te", "mixed \\\" both", "tab\tkept"] {
            let yaml = format!("v: {}", escape_yaml_string(original));
            let parsed: Value = serde_yaml::from_str(&yaml).unwrap();
            assert_eq!(parsed["v"].as_str().unwrap(), original);
        }
        // CR is dropped and LF becomes a space rather than surviving.
        let yaml = format!("v: {}", escape_yaml_string("a\r\nb"));
        let parsed: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["v"].as_str().unwrap(), "a b");
    }

    #[test]
    fn link_text_swaps_brackets_and_trims() {
        assert_eq!(sanitize_link_text("  [task] name "), "(task) name");
    }

    #[test]
    fn minimal_card_matches_expected_document() {
        let doc = render(&minimal_card(), &HashMap::new(), &[]);
        assert!(doc.starts_with("---\ntitle: \"Buy milk\"\nid: 42\ncreated: "));
        assert!(doc.contains("\nlist_order: 1\n"));
        assert!(!doc.contains("\nlabels:"));
        assert!(!doc.contains("\ndue:"));
        assert!(!doc.contains("\nchecklist:"));
        assert!(doc.contains(
            "trello_data:\n  id: C1\n  url: http://x\n  date_closed: null\n  date_last_activity: 2020-01-01\n  date_completed: null\n---\n"
        ));
        assert!(doc.ends_with("---\n\n# Buy milk\n\n2%\n"));
    }

    #[test]
    fn created_is_iso8601_with_utc_offset() {
        let doc = render(&minimal_card(), &HashMap::new(), &[]);
        assert!(doc.contains("created: 2024-06-01T12:00:00.000000+00:00"));
    }

    #[test]
    fn due_is_emitted_raw_only_when_present() {
        let mut c = minimal_card();
        c.due = Some("2024-01-01".to_string());
        let doc = render(&c, &HashMap::new(), &[]);
        assert!(doc.contains("\ndue: 2024-01-01\n"));

        c.due = Some(String::new());
        let doc = render(&c, &HashMap::new(), &[]);
        assert!(!doc.contains("\ndue:"));
    }

    #[test]
    fn labels_resolve_in_card_order_skipping_unknown_ids() {
        let mut c = minimal_card();
        c.id_labels = vec!["lbl2".into(), "missing".into(), "lbl1".into()];
        let labels = HashMap::from([("lbl1", "Urgent"), ("lbl2", "green")]);
        let doc = render(&c, &labels, &[]);
        assert!(doc.contains("labels:\n  - \"green\"\n  - \"Urgent\"\ntrello_data:"));
    }

    #[test]
    fn checklist_items_render_as_inline_mappings() {
        let items: Vec<ChecklistItem> = serde_json::from_str(
            r#"[
                {"name": "Task \"A\"", "state": "complete", "pos": 1},
                {"name": "Task B", "state": "incomplete", "pos": 2}
            ]"#,
        )
        .unwrap();
        let refs: Vec<&ChecklistItem> = items.iter().collect();
        let doc = render(&minimal_card(), &HashMap::new(), &refs);
        assert!(doc.contains("checklist:\n  - { desc: \"Task \\\"A\\\"\", done: true }\n  - { desc: \"Task B\", done: false }\n"));

        let fm = frontmatter(&doc);
        let checklist = fm["checklist"].as_sequence().unwrap();
        assert_eq!(checklist[0]["desc"].as_str().unwrap(), "Task \"A\"");
        assert_eq!(checklist[0]["done"].as_bool(), Some(true));
        assert_eq!(checklist[1]["done"].as_bool(), Some(false));
    }

    #[test]
    fn frontmatter_parses_with_a_standard_yaml_reader() {
        let mut c = minimal_card();
        c.name = "Tricky \"name\" with \\ and\nnewline".to_string();
        c.due = Some("2024-01-01T00:00:00.000Z".to_string());
        let doc = render(&c, &HashMap::new(), &[]);

        let fm = frontmatter(&doc);
        assert_eq!(
            fm["title"].as_str().unwrap(),
            "Tricky \"name\" with \\ and newline"
        );
        assert_eq!(fm["id"].as_i64(), Some(42));
        assert_eq!(fm["list_order"].as_i64(), Some(1));
        assert!(fm["trello_data"]["date_closed"].is_null());
        assert_eq!(fm["trello_data"]["id"].as_str(), Some("C1"));
    }
}
