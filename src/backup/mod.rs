//! Backup document codec.
//!
//! The full product+entry state is serialized as one pretty-printed JSON
//! document, the unit of backup and restore. The content API carries
//! documents in a base64 envelope, so the codec also handles the transport
//! encoding. The document is ephemeral: it exists only as the payload
//! exchanged with the remote, never stored locally.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Entry, Product};

/// The serialized snapshot exchanged with the remote store.
#[derive(Debug, Serialize)]
pub struct BackupDocument {
    pub products: Vec<Product>,
    pub entries: Vec<Entry>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Decode-side view of the document. Either array may be absent (restored
/// as empty) and unknown fields are ignored, so older or hand-edited
/// backups still restore.
#[derive(Debug, Deserialize)]
struct DocumentFields {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    entries: Vec<Entry>,
}

#[derive(Debug)]
pub enum CodecError {
    /// Payload is not valid JSON, not an object, or carries ill-typed
    /// product/entry records.
    MalformedDocument(String),
    Serialize(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::MalformedDocument(e) => write!(f, "Malformed backup document: {}", e),
            CodecError::Serialize(e) => write!(f, "Failed to serialize backup document: {}", e),
        }
    }
}

impl std::error::Error for CodecError {}

/// Serializes the full state as a deterministic, human-readable document.
pub fn encode(products: Vec<Product>, entries: Vec<Entry>) -> Result<String, CodecError> {
    let document = BackupDocument {
        products,
        entries,
        updated_at: Utc::now(),
    };
    serde_json::to_string_pretty(&document).map_err(|e| CodecError::Serialize(e.to_string()))
}

/// Inverse of [`encode`]. Produces records to be re-inserted into the
/// local store; the store may reassign identifiers on insertion.
pub fn decode(text: &str) -> Result<(Vec<Product>, Vec<Entry>), CodecError> {
    let fields: DocumentFields =
        serde_json::from_str(text).map_err(|e| CodecError::MalformedDocument(e.to_string()))?;
    Ok((fields.products, fields.entries))
}

/// Wraps a document in the binary-safe envelope the content API requires.
pub fn to_transport(document: &str) -> String {
    BASE64.encode(document.as_bytes())
}

/// Unwraps a transport envelope. The content API interleaves newlines in
/// its base64 output, so whitespace is stripped first.
pub fn from_transport(envelope: &str) -> Result<String, CodecError> {
    let compact: String = envelope.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| CodecError::MalformedDocument(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CodecError::MalformedDocument(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_state() -> (Vec<Product>, Vec<Entry>) {
        let products = vec![
            Product {
                id: 1,
                name: "Coffee".to_string(),
                price: 2.5,
            },
            Product {
                id: 2,
                name: "Tea".to_string(),
                price: 1.75,
            },
        ];
        let entries = vec![Entry {
            id: 1,
            product_id: 1,
            product_name: "Coffee".to_string(),
            quantity: 3.0,
            total: 7.5,
            timestamp: Utc.with_ymd_and_hms(2026, 8, 20, 9, 30, 0).unwrap(),
        }];
        (products, entries)
    }

    #[test]
    fn test_roundtrip_preserves_fields() {
        let (products, entries) = sample_state();

        let document = encode(products.clone(), entries.clone()).unwrap();
        let (decoded_products, decoded_entries) = decode(&document).unwrap();

        assert_eq!(decoded_products, products);
        assert_eq!(decoded_entries, entries);
    }

    #[test]
    fn test_roundtrip_empty_state() {
        let document = encode(vec![], vec![]).unwrap();
        let (products, entries) = decode(&document).unwrap();
        assert!(products.is_empty());
        assert!(entries.is_empty());
    }

    #[test]
    fn test_roundtrip_dangling_product_reference() {
        // Entry whose product no longer exists in the catalog.
        let entries = vec![Entry {
            id: 5,
            product_id: 99,
            product_name: "Discontinued".to_string(),
            quantity: 1.0,
            total: 3.0,
            timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }];

        let document = encode(vec![], entries.clone()).unwrap();
        let (products, decoded) = decode(&document).unwrap();

        assert!(products.is_empty());
        assert_eq!(decoded, entries);
        assert_eq!(decoded[0].product_name, "Discontinued");
    }

    #[test]
    fn test_decode_missing_entries_field_yields_empty() {
        let (products, entries) =
            decode(r#"{"products": [{"id": 1, "name": "Coffee", "price": 2.5}]}"#).unwrap();
        assert_eq!(products.len(), 1);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_decode_missing_products_field_yields_empty() {
        let (products, entries) = decode(r#"{"entries": []}"#).unwrap();
        assert!(products.is_empty());
        assert!(entries.is_empty());
    }

    #[test]
    fn test_decode_tolerates_unknown_fields() {
        let (products, _) = decode(
            r#"{"products": [], "entries": [], "updatedAt": "2026-08-20T09:30:00Z", "extra": 42}"#,
        )
        .unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        assert!(matches!(
            decode("not json at all"),
            Err(CodecError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(matches!(
            decode("[1, 2, 3]"),
            Err(CodecError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_decode_rejects_ill_typed_products() {
        assert!(matches!(
            decode(r#"{"products": "nope", "entries": []}"#),
            Err(CodecError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_transport_roundtrip() {
        let (products, entries) = sample_state();
        let document = encode(products, entries).unwrap();

        let envelope = to_transport(&document);
        assert_eq!(from_transport(&envelope).unwrap(), document);
    }

    #[test]
    fn test_from_transport_strips_newlines() {
        let envelope = to_transport("{\"products\": []}");
        // The content API wraps base64 at 60 columns.
        let wrapped = format!("{}\n{}", &envelope[..8], &envelope[8..]);
        assert_eq!(from_transport(&wrapped).unwrap(), "{\"products\": []}");
    }

    #[test]
    fn test_from_transport_rejects_invalid_base64() {
        assert!(matches!(
            from_transport("!!! not base64 !!!"),
            Err(CodecError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_encode_is_pretty_printed() {
        let document = encode(sample_state().0, vec![]).unwrap();
        assert!(document.contains('\n'));
        assert!(document.contains("\"updatedAt\""));
    }
}
