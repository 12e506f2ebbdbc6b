//! Tantivy-based search index module.
//!
//! Full-text product lookup for the order form, with the name weighted
//! above category and subtitle. Only active products are indexed.

use std::path::Path;
use std::sync::Arc;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, Occur, QueryParser};
use tantivy::schema::{Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::Product;

const BOOST_NAME: f32 = 10.0;
const BOOST_CATEGORY: f32 = 5.0;
const BOOST_SUB: f32 = 3.0;

/// Search hit with relevance score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub product_id: String,
    pub score: f32,
}

struct SearchFields {
    product_id: Field,
    name: Field,
    sub: Field,
    category: Field,
}

/// Tantivy search index for products.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl SearchIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        let mut schema_builder = Schema::builder();
        let product_id = schema_builder.add_text_field("product_id", STRING | STORED);
        let name = schema_builder.add_text_field("name", TEXT | STORED);
        let sub = schema_builder.add_text_field("sub", TEXT);
        let category = schema_builder.add_text_field("category", TEXT);
        let schema = schema_builder.build();

        let fields = SearchFields {
            product_id,
            name,
            sub,
            category,
        };

        let index = Index::open_in_dir(index_path)
            .or_else(|_| Index::create_in_dir(index_path, schema.clone()))
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer(15_000_000)
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields,
        })
    }

    /// Rebuild the entire index from the catalogue.
    pub async fn rebuild(&self, products: &[Product]) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        writer.delete_all_documents()?;

        let mut indexed = 0;
        for product in products.iter().filter(|p| p.is_active) {
            writer.add_document(self.create_document(product))?;
            indexed += 1;
        }

        writer.commit()?;
        self.reader.reload()?;

        tracing::info!("Search index rebuilt with {} products", indexed);
        Ok(())
    }

    /// Index or re-index one product. Inactive products are dropped from the index.
    pub async fn index_product(&self, product: &Product) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        let term = tantivy::Term::from_field_text(self.fields.product_id, &product.id);
        writer.delete_term(term);

        if product.is_active {
            writer.add_document(self.create_document(product))?;
        }
        writer.commit()?;

        self.reader.reload()?;

        Ok(())
    }

    /// Remove a product from the index.
    pub async fn remove_product(&self, product_id: &str) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        let term = tantivy::Term::from_field_text(self.fields.product_id, product_id);
        writer.delete_term(term);
        writer.commit()?;

        self.reader.reload()?;

        Ok(())
    }

    /// Search for products matching the query.
    pub fn search(
        &self,
        query_str: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SearchResult>, AppError> {
        if query_str.trim().is_empty() {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();

        let field_queries = [
            (self.fields.name, BOOST_NAME),
            (self.fields.category, BOOST_CATEGORY),
            (self.fields.sub, BOOST_SUB),
        ];

        // Lenient parsing so catalogue names like "BPC-157" never fail the request
        let mut subqueries: Vec<(Occur, Box<dyn tantivy::query::Query>)> = Vec::new();
        for (field, boost) in field_queries {
            let field_parser = QueryParser::for_index(&self.index, vec![field]);
            let (field_query, _errors) = field_parser.parse_query_lenient(query_str);
            subqueries.push((Occur::Should, Box::new(BoostQuery::new(field_query, boost))));
        }
        let combined_query = BooleanQuery::new(subqueries);

        let top_docs = searcher
            .search(&combined_query, &TopDocs::with_limit(limit + offset))
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let results: Vec<SearchResult> = top_docs
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let product_id = doc.get_first(self.fields.product_id)?.as_str()?.to_string();
                Some(SearchResult { product_id, score })
            })
            .collect();

        Ok(results)
    }

    fn create_document(&self, product: &Product) -> TantivyDocument {
        doc!(
            self.fields.product_id => product.id.clone(),
            self.fields.name => product.name.clone(),
            self.fields.sub => product.sub.clone(),
            self.fields.category => product.category.clone()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StockStatus;
    use tempfile::TempDir;

    fn create_test_product(id: &str, name: &str, category: &str, is_active: bool) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            sub: "Lyophilized".to_string(),
            category: category.to_string(),
            price: 45.0,
            cost_price: 0.0,
            stock_quantity: 10,
            low_stock_threshold: 5,
            is_active,
            order: 0,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            profit_margin: 0.0,
            stock_status: StockStatus::InStock,
        }
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        let products = vec![
            create_test_product("1", "Semaglutide", "Weight Loss", true),
            create_test_product("2", "Thymosin Alpha", "Immune", true),
        ];
        index.rebuild(&products).await.unwrap();

        let results = index.search("semaglutide", 10, 0).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].product_id, "1");

        let results = index.search("immune", 10, 0).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product_id, "2");
    }

    #[tokio::test]
    async fn test_inactive_products_not_indexed() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        let mut product = create_test_product("1", "Tesamorelin", "", true);
        index.index_product(&product).await.unwrap();
        assert_eq!(index.search("tesamorelin", 10, 0).unwrap().len(), 1);

        product.is_active = false;
        index.index_product(&product).await.unwrap();
        assert!(index.search("tesamorelin", 10, 0).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_product() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        index
            .rebuild(&[create_test_product("1", "Ipamorelin", "", true)])
            .await
            .unwrap();
        index.remove_product("1").await.unwrap();

        assert!(index.search("ipamorelin", 10, 0).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        let results = index.search("   ", 10, 0).unwrap();
        assert!(results.is_empty());
    }
}
