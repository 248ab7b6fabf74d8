//! Read access to the remote document collection.

pub mod firestore;

pub use firestore::FirestoreStore;
use futures_util::future::BoxFuture;
use serde_json::{Map, Value};

use crate::error::ServiceResult;

/// A stored document: its id plus plain JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Document collection reader.
pub trait DocumentStore: Send + Sync {
    /// Returns every document of `collection` in store order.
    fn list_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, ServiceResult<Vec<Document>>>;
}
