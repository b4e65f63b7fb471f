//! In-memory signature storage
//!
//! One map from row to record; section and document operations scan it.

use signet_core::{
    Clock, DocumentId, RowId, SectionId, SignatureMap, SignatureRecord, SystemClock,
};
use std::collections::HashMap;
use tracing::debug;

use crate::trait_::{capture_time, SignatureStorage};

/// In-memory signature storage
#[derive(Debug)]
pub struct MemorySignatureStore {
    signatures: HashMap<RowId, SignatureRecord>,
    clock: Box<dyn Clock>,
}

impl Default for MemorySignatureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySignatureStore {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock<C: Clock + 'static>(clock: C) -> Self {
        Self {
            signatures: HashMap::new(),
            clock: Box::new(clock),
        }
    }
}

impl SignatureStorage for MemorySignatureStore {
    fn set_signature(
        &mut self,
        row_id: RowId,
        encoded_payload: String,
        section_id: Option<SectionId>,
        document_id: Option<DocumentId>,
    ) {
        let captured_at = capture_time(self.signatures.get(&row_id), self.clock.now());
        debug!(row = %row_id, ?section_id, ?document_id, "Signature set");
        let record = SignatureRecord {
            row_id: row_id.clone(),
            encoded_payload,
            captured_at,
            section_id,
            document_id,
        };
        self.signatures.insert(row_id, record);
    }

    fn peek_signature(&self, row_id: &RowId) -> Option<&SignatureRecord> {
        self.signatures.get(row_id)
    }

    fn clear_signature(&mut self, row_id: &RowId) {
        if self.signatures.remove(row_id).is_some() {
            debug!(row = %row_id, "Signature cleared");
        }
    }

    fn clear_all_signatures(&mut self) {
        debug!(count = self.signatures.len(), "All signatures cleared");
        self.signatures.clear();
    }

    fn get_signatures_for_section(&self, section_id: SectionId) -> SignatureMap {
        self.signatures
            .iter()
            .filter(|(_, record)| record.in_section(section_id))
            .map(|(row_id, record)| (row_id.clone(), record.clone()))
            .collect()
    }

    fn clear_signatures_for_document(&mut self, document_id: &DocumentId) {
        let before = self.signatures.len();
        self.signatures.retain(|_, record| !record.in_document(document_id));
        debug!(
            document = %document_id,
            removed = before - self.signatures.len(),
            "Document signatures cleared"
        );
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
