//! `fdbk list`: the home screen's table, printed once.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::{Cell, ContentArrangement, Table};
use fdbk_core::auth::{AuthService, FirebaseAuth, SessionCache};
use fdbk_core::config::Config;
use fdbk_core::feedback::{FeedbackList, FeedbackRecord, FeedbackView, SortOrder};
use fdbk_core::store::{DocumentStore, FirestoreStore};

const EMPTY_MESSAGE: &str = "Nenhum feedback encontrado.";

pub async fn run(config: &Config, order: SortOrder, search: &str, page: usize) -> Result<()> {
    let firebase = FirebaseAuth::from_config(&config.firebase, Some(SessionCache::new()))?;
    if firebase.current_session().is_none() {
        anyhow::bail!("Not signed in. Run `fdbk login --email <EMAIL>` first.");
    }
    let auth: Arc<dyn AuthService> = Arc::new(firebase);
    let store = FirestoreStore::from_config(&config.firebase, auth)?;

    let collection = &config.firebase.collection;
    let documents = store
        .list_all(collection)
        .await
        .with_context(|| format!("load collection '{collection}'"))?;
    tracing::debug!(count = documents.len(), %collection, "fetched documents");

    let mut list = FeedbackList::new();
    list.replace(documents.iter().map(FeedbackRecord::from_document).collect());
    list.set_order(order);
    list.set_search(search);
    while list.current_page() < page {
        if !list.next_page() {
            let total = list.view().displayed_total_pages();
            anyhow::bail!("Page {page} does not exist (last page is {total})");
        }
    }

    let view = list.view();
    println!("{}", render_table(&view));
    println!("{}", view.page_label());
    Ok(())
}

fn render_table(view: &FeedbackView) -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["Data", "Nome", "Comentário", "Nota"]);

    if view.rows.is_empty() {
        table.add_row([Cell::new(""), Cell::new(""), Cell::new(EMPTY_MESSAGE), Cell::new("")]);
    }
    for record in &view.rows {
        let date = record.created_at.map_or_else(
            || "-".to_string(),
            |at| at.with_timezone(&Local).format("%d/%m/%Y").to_string(),
        );
        table.add_row([
            Cell::new(date),
            Cell::new(&record.user_name),
            Cell::new(&record.comment),
            Cell::new(record.rating),
        ]);
    }
    table
}
