#![forbid(unsafe_code)]

pub mod catalog;
pub mod keys;
pub mod repository;
pub mod sqlite;

pub use catalog::{CatalogDocument, CatalogEntry, InMemoryCatalog, QuizCatalog};
pub use keys::{QuizRecordKind, parse_record_key, record_key};
pub use repository::{InMemoryRecordStore, LocalRecordStore, Storage, StorageError};
