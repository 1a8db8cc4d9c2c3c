//! Fallback answer boundary for queries no rule resolves.
//!
//! The retrieval and generation internals live behind [`ContextAnswerer`];
//! this module only prepares the dataset as retrievable context and defines
//! the boundary contract. The engine passes the provider's answer through
//! verbatim and propagates its errors unmodified.

use crate::dataset::Dataset;
use crate::error::Result;

/// A blocking provider that answers a query given retrieved text context.
///
/// Implementations typically embed the context documents, retrieve the
/// closest ones to the query, and prompt a generative model. None of that
/// is this crate's concern: the call has no timeout or cancellation
/// contract here, so a wrapping host should impose its own.
pub trait ContextAnswerer: Send + Sync {
    fn answer(&self, query: &str, context: &[String]) -> Result<String>;
}

/// Serialize a dataset into CSV text documents for retrieval.
///
/// Each document repeats the header and carries at most `rows_per_document`
/// rows; the list is capped at `max_documents`, dropping trailing rows
/// beyond the cap.
pub fn dataset_documents(
    dataset: &Dataset,
    rows_per_document: usize,
    max_documents: usize,
) -> Vec<String> {
    let header = dataset.csv_header();
    let rows = dataset.csv_rows();

    let mut documents: Vec<String> = rows
        .chunks(rows_per_document.max(1))
        .map(|chunk| {
            let mut doc = header.clone();
            for row in chunk {
                doc.push('\n');
                doc.push_str(row);
            }
            doc
        })
        .collect();
    if documents.is_empty() {
        // A dataset with no rows still yields its header as context.
        documents.push(header);
    }

    documents.truncate(max_documents.max(1));
    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn dataset(rows: usize) -> Dataset {
        Dataset::new(vec![Column::numbers(
            "Revenue",
            (0..rows).map(|i| i as f64),
        )])
        .unwrap()
    }

    #[test]
    fn test_documents_repeat_header_and_chunk_rows() {
        let docs = dataset_documents(&dataset(5), 2, 10);
        assert_eq!(docs.len(), 3);
        for doc in &docs {
            assert!(doc.starts_with("Revenue\n"));
        }
        assert_eq!(docs[0], "Revenue\n0\n1");
        assert_eq!(docs[2], "Revenue\n4");
    }

    #[test]
    fn test_document_cap() {
        let docs = dataset_documents(&dataset(100), 10, 4);
        assert_eq!(docs.len(), 4);
    }

    #[test]
    fn test_empty_dataset_yields_header_document() {
        let ds = Dataset::new(vec![Column::numbers("Revenue", [])]).unwrap();
        let docs = dataset_documents(&ds, 50, 4);
        assert_eq!(docs, vec!["Revenue".to_string()]);
    }
}
