//! Indexed signature storage
//!
//! Same observable behavior as [`MemorySignatureStore`](crate::MemorySignatureStore),
//! but keeps secondary indexes from section and document to rows so group
//! reads and document clears touch only the matching rows.

use signet_core::{
    Clock, DocumentId, RowId, SectionId, SignatureMap, SignatureRecord, SystemClock,
};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::debug;

use crate::trait_::{capture_time, SignatureStorage};

#[derive(Debug)]
pub struct IndexedSignatureStore {
    signatures: HashMap<RowId, SignatureRecord>,
    by_section: HashMap<SectionId, HashSet<RowId>>,
    by_document: HashMap<DocumentId, HashSet<RowId>>,
    clock: Box<dyn Clock>,
}

impl Default for IndexedSignatureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexedSignatureStore {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock<C: Clock + 'static>(clock: C) -> Self {
        Self {
            signatures: HashMap::new(),
            by_section: HashMap::new(),
            by_document: HashMap::new(),
            clock: Box::new(clock),
        }
    }

    fn index(&mut self, record: &SignatureRecord) {
        if let Some(section_id) = record.section_id {
            self.by_section
                .entry(section_id)
                .or_default()
                .insert(record.row_id.clone());
        }
        if let Some(document_id) = &record.document_id {
            self.by_document
                .entry(document_id.clone())
                .or_default()
                .insert(record.row_id.clone());
        }
    }

    fn unindex(&mut self, record: &SignatureRecord) {
        if let Some(section_id) = record.section_id {
            remove_from_bucket(&mut self.by_section, &section_id, &record.row_id);
        }
        if let Some(document_id) = &record.document_id {
            remove_from_bucket(&mut self.by_document, document_id, &record.row_id);
        }
    }

    #[cfg(test)]
    fn bucket_counts(&self) -> (usize, usize) {
        (self.by_section.len(), self.by_document.len())
    }
}

/// Remove `row_id` from the bucket at `key`, dropping the bucket once empty
fn remove_from_bucket<K: Eq + Hash>(
    index: &mut HashMap<K, HashSet<RowId>>,
    key: &K,
    row_id: &RowId,
) {
    if let Some(rows) = index.get_mut(key) {
        rows.remove(row_id);
        if rows.is_empty() {
            index.remove(key);
        }
    }
}

impl SignatureStorage for IndexedSignatureStore {
    fn set_signature(
        &mut self,
        row_id: RowId,
        encoded_payload: String,
        section_id: Option<SectionId>,
        document_id: Option<DocumentId>,
    ) {
        let previous = self.signatures.remove(&row_id);
        let captured_at = capture_time(previous.as_ref(), self.clock.now());
        if let Some(previous) = &previous {
            self.unindex(previous);
        }

        debug!(row = %row_id, ?section_id, ?document_id, "Signature set");
        let record = SignatureRecord {
            row_id: row_id.clone(),
            encoded_payload,
            captured_at,
            section_id,
            document_id,
        };
        self.index(&record);
        self.signatures.insert(row_id, record);
    }

    fn peek_signature(&self, row_id: &RowId) -> Option<&SignatureRecord> {
        self.signatures.get(row_id)
    }

    fn clear_signature(&mut self, row_id: &RowId) {
        if let Some(record) = self.signatures.remove(row_id) {
            self.unindex(&record);
            debug!(row = %row_id, "Signature cleared");
        }
    }

    fn clear_all_signatures(&mut self) {
        debug!(count = self.signatures.len(), "All signatures cleared");
        self.signatures.clear();
        self.by_section.clear();
        self.by_document.clear();
    }

    fn get_signatures_for_section(&self, section_id: SectionId) -> SignatureMap {
        let Some(rows) = self.by_section.get(&section_id) else {
            return SignatureMap::new();
        };
        rows.iter()
            .filter_map(|row_id| {
                self.signatures
                    .get(row_id)
                    .map(|record| (row_id.clone(), record.clone()))
            })
            .collect()
    }

    fn clear_signatures_for_document(&mut self, document_id: &DocumentId) {
        let Some(rows) = self.by_document.remove(document_id) else {
            return;
        };
        let removed = rows.len();
        for row_id in rows {
            if let Some(record) = self.signatures.remove(&row_id) {
                if let Some(section_id) = record.section_id {
                    remove_from_bucket(&mut self.by_section, &section_id, &row_id);
                }
            }
        }
        debug!(document = %document_id, removed, "Document signatures cleared");
    }

    fn len(&self) -> usize {
        self.signatures.len()
    }

    fn snapshot(&self) -> Vec<SignatureRecord> {
        let mut records: Vec<SignatureRecord> = self.signatures.values().cloned().collect();
        records.sort_by(|a, b| a.row_id.cmp(&b.row_id));
        records
    }
}
