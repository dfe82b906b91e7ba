//! LanceDB-backed chunk store.
//!
//! Implements `ChunkStore` from `docent-core` over a single `chunks`
//! table. The connection is opened at (and persists under) the
//! configured index directory; a run that finds rows already present
//! serves retrieval from them without re-embedding.

use std::path::PathBuf;
use std::sync::Arc;

use arrow_array::{
    FixedSizeListArray, Float32Array, Int32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field};
use futures_util::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use uuid::Uuid;

use docent_core::index::store::{ChunkStore, VectorHit};
use docent_types::document::Chunk;
use docent_types::error::IndexError;

use super::schema::{CHUNK_TABLE, chunk_table_schema};

/// LanceDB chunk store rooted at the index directory.
pub struct LanceChunkStore {
    db: lancedb::Connection,
    base_path: PathBuf,
    dimension: i32,
    embedding_model: String,
}

impl LanceChunkStore {
    /// Open or create the store at the given directory.
    pub async fn new(
        base_path: PathBuf,
        dimension: usize,
        embedding_model: &str,
    ) -> Result<Self, IndexError> {
        std::fs::create_dir_all(&base_path)
            .map_err(|e| IndexError::Storage(format!("cannot create index dir: {e}")))?;

        let uri = base_path
            .to_str()
            .ok_or_else(|| {
                IndexError::Storage(format!(
                    "index path contains invalid UTF-8: {}",
                    base_path.display()
                ))
            })?
            .to_string();

        let db = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| IndexError::Storage(format!("cannot open index: {e}")))?;

        Ok(Self {
            db,
            base_path,
            dimension: dimension as i32,
            embedding_model: embedding_model.to_string(),
        })
    }

    /// Directory holding the LanceDB dataset.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Check if the chunk table exists.
    pub async fn table_exists(&self) -> bool {
        self.db.open_table(CHUNK_TABLE).execute().await.is_ok()
    }

    /// Open the chunk table, creating it empty if needed.
    async fn ensure_table(&self) -> Result<lancedb::Table, IndexError> {
        match self.db.open_table(CHUNK_TABLE).execute().await {
            Ok(table) => Ok(table),
            Err(lancedb::Error::TableNotFound { .. }) => {
                let schema = Arc::new(chunk_table_schema(self.dimension));
                self.db
                    .create_empty_table(CHUNK_TABLE, schema)
                    .execute()
                    .await
                    .map_err(|e| IndexError::Storage(format!("cannot create chunk table: {e}")))
            }
            Err(e) => Err(IndexError::Storage(format!("cannot open chunk table: {e}"))),
        }
    }

    /// Build an Arrow RecordBatch from chunks and their embeddings.
    fn build_record_batch(
        &self,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> Result<RecordBatch, IndexError> {
        let schema = Arc::new(chunk_table_schema(self.dimension));

        let id_array = StringArray::from(
            chunks.iter().map(|c| c.id.to_string()).collect::<Vec<_>>(),
        );
        let document_id_array = StringArray::from(
            chunks
                .iter()
                .map(|c| c.document_id.to_string())
                .collect::<Vec<_>>(),
        );
        let ordinal_array =
            Int32Array::from(chunks.iter().map(|c| c.ordinal as i32).collect::<Vec<_>>());
        let source_array = StringArray::from(
            chunks.iter().map(|c| c.source.clone()).collect::<Vec<_>>(),
        );
        let text_array =
            StringArray::from(chunks.iter().map(|c| c.text.clone()).collect::<Vec<_>>());
        let model_array = StringArray::from(vec![self.embedding_model.clone(); chunks.len()]);

        let values = Float32Array::from(
            embeddings
                .iter()
                .flat_map(|v| v.iter().copied())
                .collect::<Vec<f32>>(),
        );
        let field = Arc::new(Field::new("item", DataType::Float32, true));
        let vector_array = FixedSizeListArray::new(field, self.dimension, Arc::new(values), None);

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(id_array),
                Arc::new(document_id_array),
                Arc::new(ordinal_array),
                Arc::new(source_array),
                Arc::new(text_array),
                Arc::new(model_array),
                Arc::new(vector_array),
            ],
        )
        .map_err(|e| IndexError::Storage(format!("cannot build record batch: {e}")))
    }

    /// Parse Arrow RecordBatch rows back into chunks.
    ///
    /// Columns are read by name so the decode survives the `_distance`
    /// column LanceDB appends to search results.
    fn record_batch_to_chunks(batch: &RecordBatch) -> Result<Vec<Chunk>, IndexError> {
        let num_rows = batch.num_rows();
        if num_rows == 0 {
            return Ok(Vec::new());
        }

        let string_col = |name: &str| -> Result<&StringArray, IndexError> {
            batch
                .column_by_name(name)
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| IndexError::Storage(format!("missing column '{name}'")))
        };

        let id_col = string_col("id")?;
        let document_id_col = string_col("document_id")?;
        let source_col = string_col("source")?;
        let text_col = string_col("text")?;
        let ordinal_col = batch
            .column_by_name("ordinal")
            .and_then(|c| c.as_any().downcast_ref::<Int32Array>())
            .ok_or_else(|| IndexError::Storage("missing column 'ordinal'".to_string()))?;

        let mut chunks = Vec::with_capacity(num_rows);
        for i in 0..num_rows {
            let id = Uuid::parse_str(id_col.value(i))
                .map_err(|e| IndexError::Storage(format!("corrupt chunk id: {e}")))?;
            let document_id = Uuid::parse_str(document_id_col.value(i))
                .map_err(|e| IndexError::Storage(format!("corrupt document id: {e}")))?;

            chunks.push(Chunk {
                id,
                document_id,
                ordinal: ordinal_col.value(i) as u32,
                source: source_col.value(i).to_string(),
                text: text_col.value(i).to_string(),
            });
        }

        Ok(chunks)
    }
}

impl ChunkStore for LanceChunkStore {
    async fn add(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<(), IndexError> {
        if chunks.is_empty() {
            return Ok(());
        }
        if chunks.len() != embeddings.len() {
            return Err(IndexError::Storage(format!(
                "{} chunks with {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }
        for embedding in embeddings {
            if embedding.len() != self.dimension as usize {
                return Err(IndexError::DimensionMismatch {
                    expected: self.dimension as usize,
                    actual: embedding.len(),
                });
            }
        }

        let table = self.ensure_table().await?;
        let batch = self.build_record_batch(chunks, embeddings)?;
        let schema = batch.schema();
        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);

        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| IndexError::Storage(format!("cannot add chunks: {e}")))?;

        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<VectorHit>, IndexError> {
        if !self.table_exists().await {
            return Ok(Vec::new());
        }

        let table = self.ensure_table().await?;
        let results = table
            .vector_search(query_embedding)
            .map_err(|e| IndexError::Storage(format!("vector search setup failed: {e}")))?
            .distance_type(lancedb::DistanceType::Cosine)
            .limit(limit)
            .execute()
            .await
            .map_err(|e| IndexError::Storage(format!("vector search failed: {e}")))?;

        let batches: Vec<RecordBatch> = results
            .try_collect()
            .await
            .map_err(|e| IndexError::Storage(format!("cannot collect search results: {e}")))?;

        let mut hits: Vec<VectorHit> = Vec::new();
        for batch in &batches {
            if batch.num_rows() == 0 {
                continue;
            }

            // The _distance column is appended by LanceDB vector search
            let distance_col = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>());

            let chunks = Self::record_batch_to_chunks(batch)?;
            for (i, chunk) in chunks.into_iter().enumerate() {
                let distance = distance_col.map_or(0.0, |d| d.value(i));
                hits.push(VectorHit { chunk, distance });
            }
        }

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit);
        Ok(hits)
    }

    async fn all_chunks(&self) -> Result<Vec<Chunk>, IndexError> {
        if !self.table_exists().await {
            return Ok(Vec::new());
        }

        let table = self.ensure_table().await?;
        let results = table
            .query()
            .execute()
            .await
            .map_err(|e| IndexError::Storage(format!("cannot scan chunk table: {e}")))?;

        let batches: Vec<RecordBatch> = results
            .try_collect()
            .await
            .map_err(|e| IndexError::Storage(format!("cannot collect chunks: {e}")))?;

        let mut chunks = Vec::new();
        for batch in &batches {
            chunks.extend(Self::record_batch_to_chunks(batch)?);
        }

        // Stable corpus order for the keyword index and the status view.
        chunks.sort_by(|a, b| {
            a.document_id
                .cmp(&b.document_id)
                .then(a.ordinal.cmp(&b.ordinal))
        });
        Ok(chunks)
    }

    async fn count(&self) -> Result<u64, IndexError> {
        if !self.table_exists().await {
            return Ok(0);
        }

        let table = self.ensure_table().await?;
        let count = table
            .count_rows(None)
            .await
            .map_err(|e| IndexError::Storage(format!("cannot count chunks: {e}")))?;
        Ok(count as u64)
    }

    async fn clear(&self) -> Result<(), IndexError> {
        match self.db.drop_table(CHUNK_TABLE, &[]).await {
            Ok(()) => Ok(()),
            Err(lancedb::Error::TableNotFound { .. }) => Ok(()),
            Err(e) => Err(IndexError::Storage(format!("cannot drop chunk table: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_types::document::{Document, DocumentSource};

    const DIM: usize = 4;

    async fn store(dir: &std::path::Path) -> LanceChunkStore {
        LanceChunkStore::new(dir.to_path_buf(), DIM, "test-embed")
            .await
            .expect("failed to open store")
    }

    fn corpus() -> (Vec<Chunk>, Vec<Vec<f32>>) {
        let doc = Document::new(DocumentSource::Fallback, "corpus");
        let chunks = vec![
            Chunk::new(doc.id, 0, "corpus", "the robots compete"),
            Chunk::new(doc.id, 1, "corpus", "the menu rotates weekly"),
            Chunk::new(doc.id, 2, "corpus", "the final was in holland"),
        ];
        let embeddings = vec![
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0],
        ];
        (chunks, embeddings)
    }

    #[tokio::test]
    async fn test_empty_store_counts_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.all_chunks().await.unwrap().is_empty());
        assert!(store.search(&[1.0, 0.0, 0.0, 0.0], 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_then_count_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;
        let (chunks, embeddings) = corpus();

        store.add(&chunks, &embeddings).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 3);

        let read_back = store.all_chunks().await.unwrap();
        assert_eq!(read_back.len(), 3);
        // Ordered by ordinal within the document
        assert_eq!(read_back[0].ordinal, 0);
        assert_eq!(read_back[2].text, "the final was in holland");
    }

    #[tokio::test]
    async fn test_search_returns_nearest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;
        let (chunks, embeddings) = corpus();
        store.add(&chunks, &embeddings).await.unwrap();

        let hits = store.search(&[0.0, 1.0, 0.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.id, chunks[1].id);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[tokio::test]
    async fn test_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = store(dir.path()).await;
            let (chunks, embeddings) = corpus();
            store.add(&chunks, &embeddings).await.unwrap();
        }

        let reopened = store(dir.path()).await;
        assert_eq!(reopened.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;
        let (chunks, embeddings) = corpus();
        store.add(&chunks, &embeddings).await.unwrap();

        store.clear().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);

        // Second clear on a missing table must also succeed
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_add_rejects_wrong_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;
        let (chunks, _) = corpus();
        let bad = vec![vec![1.0, 0.0]; chunks.len()];

        let err = store.add(&chunks, &bad).await.unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_add_rejects_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;
        let (chunks, mut embeddings) = corpus();
        embeddings.pop();

        let err = store.add(&chunks, &embeddings).await.unwrap_err();
        assert!(matches!(err, IndexError::Storage(_)));
    }
}
