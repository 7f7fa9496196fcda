pub mod error;
pub mod extractor;
pub mod models;
pub mod query;
pub mod resolver;
pub mod stores;
pub mod sync;
pub mod tokenize;
pub mod traits;

pub use error::{ExtractError, GraphError};
pub use extractor::{detect_kind, FileExtractor, TextExtractor};
pub use models::{DocumentKind, SentenceMatch, SyncOptions, SyncReport};
pub use query::QueryEngine;
pub use resolver::{default_worker_count, first_containing_sentence, resolve_keywords};
pub use stores::Neo4jStore;
pub use sync::{discover_files, sync_folder};
pub use tokenize::{collect_keywords, split_sentences};
pub use traits::GraphStore;
