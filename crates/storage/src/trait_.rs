//! Signature storage trait definition
//!
//! Abstract interface for in-progress signature capture

use chrono::{DateTime, Utc};
use signet_core::{DocumentId, RowId, SectionId, SignatureMap, SignatureRecord};
use std::fmt;

/// Storage trait for captured signatures.
///
/// Every operation is total: an unknown row or an empty group is reported as
/// `None` or an empty map, never as an error.
pub trait SignatureStorage: fmt::Debug {
    /// Create or fully replace the record for `row_id`, stamping the capture time.
    fn set_signature(
        &mut self,
        row_id: RowId,
        encoded_payload: String,
        section_id: Option<SectionId>,
        document_id: Option<DocumentId>,
    );

    /// Borrow the current record for `row_id`
    fn peek_signature(&self, row_id: &RowId) -> Option<&SignatureRecord>;

    fn get_signature(&self, row_id: &RowId) -> Option<SignatureRecord> {
        self.peek_signature(row_id).cloned()
    }

    /// True only when a record exists and its payload is non-empty.
    ///
    /// An empty payload still shows up in `get_signature`.
    fn has_signature(&self, row_id: &RowId) -> bool {
        self.peek_signature(row_id)
            .is_some_and(SignatureRecord::is_signed)
    }

    fn clear_signature(&mut self, row_id: &RowId);

    fn clear_all_signatures(&mut self);

    fn get_signatures_for_section(&self, section_id: SectionId) -> SignatureMap;

    /// Drop every record tagged with `document_id`; untagged records stay.
    fn clear_signatures_for_document(&mut self, document_id: &DocumentId);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records ordered by row id
    fn snapshot(&self) -> Vec<SignatureRecord>;

    fn row_ids(&self) -> Vec<RowId> {
        self.snapshot().into_iter().map(|record| record.row_id).collect()
    }
}

/// Boxed store as handed to the command layer
pub type BoxedSignatureStore = Box<dyn SignatureStorage>;

/// Capture time for a write: never earlier than the record it replaces.
pub(crate) fn capture_time(
    previous: Option<&SignatureRecord>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    match previous {
        Some(record) if record.captured_at > now => record.captured_at,
        _ => now,
    }
}
