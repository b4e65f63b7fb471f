//! Signature record and its identifiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a single signable row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub String);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Grouping tag for rows that belong to the same area of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub i64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SectionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(SectionId)
    }
}

/// Grouping tag for rows that belong to the same submission unit.
///
/// Documents may be keyed by number or by string. The two forms never compare
/// equal, so `Number(7)` and `Text("7")` are different documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Number(i64),
    Text(String),
}

impl DocumentId {
    /// Interpret a free-form token: integers become `Number`, the rest `Text`.
    ///
    /// A token wrapped in double quotes is always `Text`, so `"007"` stays a string.
    pub fn parse(token: &str) -> Self {
        if let Some(inner) = token
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            return DocumentId::Text(inner.to_string());
        }
        match token.parse::<i64>() {
            Ok(n) => DocumentId::Number(n),
            Err(_) => DocumentId::Text(token.to_string()),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Number(n) => write!(f, "{}", n),
            DocumentId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for DocumentId {
    fn from(value: i64) -> Self {
        DocumentId::Number(value)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        DocumentId::Text(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        DocumentId::Text(value)
    }
}

/// A captured signature and the groups it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRecord {
    pub row_id: RowId,
    /// Opaque payload (usually base64 stroke or image data)
    pub encoded_payload: String,
    /// Stamped by the store on write
    pub captured_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<DocumentId>,
}

impl SignatureRecord {
    /// An empty payload counts as "not signed".
    pub fn is_signed(&self) -> bool {
        !self.encoded_payload.is_empty()
    }

    pub fn in_section(&self, section_id: SectionId) -> bool {
        self.section_id == Some(section_id)
    }

    pub fn in_document(&self, document_id: &DocumentId) -> bool {
        self.document_id.as_ref() == Some(document_id)
    }
}

/// Records keyed by row, as returned by group-filtered reads
pub type SignatureMap = HashMap<RowId, SignatureRecord>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(section: Option<i64>, document: Option<DocumentId>) -> SignatureRecord {
        SignatureRecord {
            row_id: RowId::from("r1"),
            encoded_payload: "abc".to_string(),
            captured_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            section_id: section.map(SectionId),
            document_id: document,
        }
    }

    #[test]
    fn test_document_id_parse() {
        assert_eq!(DocumentId::parse("42"), DocumentId::Number(42));
        assert_eq!(DocumentId::parse("-3"), DocumentId::Number(-3));
        assert_eq!(DocumentId::parse("docA"), DocumentId::Text("docA".to_string()));
        assert_eq!(DocumentId::parse("4x"), DocumentId::Text("4x".to_string()));
    }

    #[test]
    fn test_document_id_parse_quoted_text() {
        assert_eq!(DocumentId::parse("007"), DocumentId::Number(7));
        assert_eq!(DocumentId::parse("\"007\""), DocumentId::Text("007".to_string()));
        assert_eq!(DocumentId::parse("\"docA\""), DocumentId::Text("docA".to_string()));
        assert_eq!(DocumentId::parse("\""), DocumentId::Text("\"".to_string()));
    }

    #[test]
    fn test_document_id_forms_are_distinct() {
        assert_ne!(DocumentId::Number(7), DocumentId::Text("7".to_string()));
    }

    #[test]
    fn test_section_id_from_str() {
        assert_eq!(" 12 ".parse::<SectionId>().unwrap(), SectionId(12));
        assert!("twelve".parse::<SectionId>().is_err());
    }

    #[test]
    fn test_is_signed() {
        let mut rec = record(None, None);
        assert!(rec.is_signed());
        rec.encoded_payload.clear();
        assert!(!rec.is_signed());
    }

    #[test]
    fn test_group_membership() {
        let rec = record(Some(1), Some(DocumentId::from("docA")));
        assert!(rec.in_section(SectionId(1)));
        assert!(!rec.in_section(SectionId(2)));
        assert!(rec.in_document(&DocumentId::from("docA")));
        assert!(!rec.in_document(&DocumentId::from("docB")));

        let bare = record(None, None);
        assert!(!bare.in_section(SectionId(1)));
        assert!(!bare.in_document(&DocumentId::from("docA")));
    }

    #[test]
    fn test_record_json_shape() {
        let rec = record(Some(3), Some(DocumentId::Number(9)));
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["rowId"], "r1");
        assert_eq!(value["encodedPayload"], "abc");
        assert_eq!(value["sectionId"], 3);
        assert_eq!(value["documentId"], 9);

        let bare = serde_json::to_value(record(None, None)).unwrap();
        assert!(bare.get("sectionId").is_none());
        assert!(bare.get("documentId").is_none());
    }

    #[test]
    fn test_document_id_untagged_deserialize() {
        let n: DocumentId = serde_json::from_str("5").unwrap();
        let t: DocumentId = serde_json::from_str("\"docA\"").unwrap();
        assert_eq!(n, DocumentId::Number(5));
        assert_eq!(t, DocumentId::Text("docA".to_string()));
    }
}
