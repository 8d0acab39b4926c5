//! JSON reader: top-level arrays fan out into one document per element.

use super::{stem, Document, DocumentParser};
use crate::error::ReaderError;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const NAME: &str = "JsonReader";

/// Each payload is the compact serialisation of its value.
pub struct JsonReader;

impl DocumentParser for JsonReader {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parse(&self, path: &Path) -> Result<Vec<Document>, ReaderError> {
        let file = File::open(path).map_err(|e| ReaderError::io(NAME, e))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ReaderError::malformed(NAME, e))?;

        let base = stem(path);
        let items = match value {
            Value::Array(items) => items,
            other => vec![other],
        };

        Ok(items
            .iter()
            .enumerate()
            .map(|(i, item)| Document::new(format!("{base}_{}", i + 1), item.to_string()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(name: &str, body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn object_is_single_document() {
        let (_dir, path) = write("summary.json", r#"{ "revenue": 120, "currency": "USD" }"#);
        let docs = JsonReader.parse(&path).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "summary_1");
        let parsed: Value = serde_json::from_str(docs[0].content.as_deref().unwrap()).unwrap();
        assert_eq!(parsed["revenue"], 120);
    }

    #[test]
    fn array_fans_out_in_order() {
        let (_dir, path) = write("rows.json", r#"[{"q":1},{"q":2},"note"]"#);
        let docs = JsonReader.parse(&path).unwrap();
        let payloads: Vec<_> = docs.iter().map(|d| d.content.clone().unwrap()).collect();
        assert_eq!(payloads, vec![r#"{"q":1}"#, r#"{"q":2}"#, r#""note""#]);
    }

    #[test]
    fn syntax_error_is_malformed() {
        let (_dir, path) = write("broken.json", "{ revenue: ");
        assert!(matches!(
            JsonReader.parse(&path),
            Err(ReaderError::Malformed { .. })
        ));
    }
}
