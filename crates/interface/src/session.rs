//! Command session - executes parsed commands against one owned store

use serde_json::json;
use signet_core::{DocumentId, OutputFormat, SignatureRecord};
use signet_storage::BoxedSignatureStore;
use tracing::debug;

use crate::command::{Command, HELP_TEXT};

/// What the caller should do after a command ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text (may be empty) and keep reading
    Continue(String),
    Exit,
}

/// Owns a store and renders command results
#[derive(Debug)]
pub struct CommandSession {
    store: BoxedSignatureStore,
    format: OutputFormat,
}

impl CommandSession {
    pub fn new(store: BoxedSignatureStore, format: OutputFormat) -> Self {
        Self { store, format }
    }

    pub fn store(&self) -> &BoxedSignatureStore {
        &self.store
    }

    pub fn execute(&mut self, command: Command) -> Outcome {
        debug!(?command, "Executing command");
        let text = match command {
            Command::Set {
                row_id,
                payload,
                section_id,
                document_id,
            } => {
                self.store
                    .set_signature(row_id.clone(), payload, section_id, document_id);
                match self.format {
                    OutputFormat::Text => format!("set {}", row_id),
                    OutputFormat::Json => json!({ "set": row_id }).to_string(),
                }
            }
            Command::Get(row_id) => {
                let record = self.store.get_signature(&row_id);
                match (self.format, record) {
                    (OutputFormat::Text, Some(record)) => render_record(&record),
                    (OutputFormat::Text, None) => format!("{}: not found", row_id),
                    (OutputFormat::Json, record) => json!(record).to_string(),
                }
            }
            Command::Has(row_id) => {
                let signed = self.store.has_signature(&row_id);
                match self.format {
                    OutputFormat::Text => signed.to_string(),
                    OutputFormat::Json => json!({ "rowId": row_id, "signed": signed }).to_string(),
                }
            }
            Command::Clear(row_id) => {
                self.store.clear_signature(&row_id);
                match self.format {
                    OutputFormat::Text => format!("cleared {}", row_id),
                    OutputFormat::Json => json!({ "cleared": row_id }).to_string(),
                }
            }
            Command::ClearAll => {
                let removed = self.store.len();
                self.store.clear_all_signatures();
                self.render_removed("all", removed)
            }
            Command::Section(section_id) => {
                let mut records: Vec<SignatureRecord> = self
                    .store
                    .get_signatures_for_section(section_id)
                    .into_values()
                    .collect();
                records.sort_by(|a, b| a.row_id.cmp(&b.row_id));
                self.render_records(&records)
            }
            Command::ClearDocument(document_id) => {
                let before = self.store.len();
                self.store.clear_signatures_for_document(&document_id);
                let removed = before - self.store.len();
                self.render_removed(&format!("document {}", document_id), removed)
            }
            Command::List => {
                let records = self.store.snapshot();
                self.render_records(&records)
            }
            Command::Count => match self.format {
                OutputFormat::Text => self.store.len().to_string(),
                OutputFormat::Json => json!({ "count": self.store.len() }).to_string(),
            },
            Command::Help => HELP_TEXT.to_string(),
            Command::Exit => return Outcome::Exit,
        };
        Outcome::Continue(text)
    }

    fn render_records(&self, records: &[SignatureRecord]) -> String {
        match self.format {
            OutputFormat::Text if records.is_empty() => "(none)".to_string(),
            OutputFormat::Text => records
                .iter()
                .map(render_record)
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Json => json!(records).to_string(),
        }
    }

    fn render_removed(&self, scope: &str, removed: usize) -> String {
        match self.format {
            OutputFormat::Text => format!("cleared {} ({} removed)", scope, removed),
            OutputFormat::Json => json!({ "cleared": scope, "removed": removed }).to_string(),
        }
    }
}

fn render_record(record: &SignatureRecord) -> String {
    let section = record
        .section_id
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    // Text ids are quoted so "7" and 7 stay distinguishable.
    let document = match &record.document_id {
        Some(DocumentId::Number(n)) => n.to_string(),
        Some(DocumentId::Text(s)) => format!("{:?}", s),
        None => "-".to_string(),
    };
    format!(
        "{} payload={:?} section={} document={} captured_at={}",
        record.row_id,
        record.encoded_payload,
        section,
        document,
        record.captured_at.to_rfc3339()
    )
}
