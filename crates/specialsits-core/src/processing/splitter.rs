use crate::error::{Result, SpecialSitsError};
use crate::models::{Chunk, ChunkId, Document};

/// Splits normalized documents into fixed-size overlapping chunks.
///
/// Boundaries are char-based. Consecutive chunks of one document share
/// `overlap` chars so that concepts spanning a boundary stay retrievable from
/// at least one chunk.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    /// Maximum chars per chunk
    pub chunk_size: usize,
    /// Char overlap between consecutive chunks
    pub overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self { chunk_size: 2000, overlap: 300 }
    }
}

impl TextSplitter {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(SpecialSitsError::ConfigInvalid {
                key: "chunk_size".to_string(),
                reason: "chunk_size must be positive".to_string(),
            });
        }

        if overlap >= chunk_size {
            return Err(SpecialSitsError::ConfigInvalid {
                key: "chunk_overlap".to_string(),
                reason: format!(
                    "overlap ({}) must be less than chunk_size ({})",
                    overlap, chunk_size
                ),
            });
        }

        Ok(Self { chunk_size, overlap })
    }

    /// Split a batch of documents, in order. Chunk ids are deterministic in
    /// the document's position and the chunk's position within it.
    pub fn split(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .enumerate()
            .flat_map(|(doc_index, doc)| self.split_document(doc_index as u64, doc))
            .collect()
    }

    fn split_document(&self, doc_index: u64, document: &Document) -> Vec<Chunk> {
        let chars: Vec<char> = document.content.chars().collect();
        let stride = self.chunk_size - self.overlap;

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0u64;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(Chunk {
                id: ChunkId::from_positions(doc_index, chunk_index),
                source: document.source.clone(),
                content: chars[start..end].iter().collect(),
                offset: start,
            });
            chunk_index += 1;

            if end == chars.len() {
                break;
            }
            start += stride;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn doc(content: &str) -> Document {
        Document::new("test.html", content)
    }

    /// Drop each chunk's leading overlap (except the first) and concatenate.
    fn reconstruct(chunks: &[Chunk], overlap: usize) -> String {
        let mut text = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                text.push_str(&chunk.content);
            } else {
                text.extend(chunk.content.chars().skip(overlap));
            }
        }
        text
    }

    #[test]
    fn rejects_overlap_not_less_than_size() {
        assert!(TextSplitter::new(100, 100).is_err());
        assert!(TextSplitter::new(0, 0).is_err());
        assert!(TextSplitter::new(100, 30).is_ok());
    }

    #[test]
    fn short_document_is_one_chunk() {
        let splitter = TextSplitter::new(100, 10).unwrap();
        let chunks = splitter.split(&[doc("short text")]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "short text");
        assert_eq!(chunks[0].offset, 0);
    }

    #[test]
    fn empty_document_yields_no_chunks() {
        let splitter = TextSplitter::default();
        assert!(splitter.split(&[doc("")]).is_empty());
    }

    #[test]
    fn chunks_overlap_by_configured_amount() {
        let splitter = TextSplitter::new(10, 4).unwrap();
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = splitter.split(&[doc(text)]);

        for pair in chunks.windows(2) {
            let tail: String = pair[0].content.chars().skip(pair[0].content.chars().count() - 4).collect();
            let head: String = pair[1].content.chars().take(4).collect();
            assert_eq!(tail, head);
        }
        assert_eq!(reconstruct(&chunks, 4), text);
    }

    #[test]
    fn every_chunk_traces_to_its_document() {
        let splitter = TextSplitter::new(5, 1).unwrap();
        let docs = vec![doc("first document text"), Document::new("other.html", "second text")];
        let chunks = splitter.split(&docs);

        assert!(chunks.iter().any(|c| c.source == "test.html"));
        assert!(chunks.iter().any(|c| c.source == "other.html"));
        for chunk in &chunks {
            let parent = docs.iter().find(|d| d.source == chunk.source).unwrap();
            let span: String = parent
                .content
                .chars()
                .skip(chunk.offset)
                .take(chunk.content.chars().count())
                .collect();
            assert_eq!(span, chunk.content);
        }
    }

    proptest! {
        #[test]
        fn reconstruction_and_size_bound(
            text in "\\PC{0,300}",
            (size, overlap) in (2usize..40).prop_flat_map(|s| (Just(s), 0..s)),
        ) {
            let splitter = TextSplitter::new(size, overlap).unwrap();
            let chunks = splitter.split(&[doc(&text)]);

            for chunk in &chunks {
                prop_assert!(chunk.content.chars().count() <= size);
            }
            prop_assert_eq!(reconstruct(&chunks, overlap), text);
        }
    }
}
