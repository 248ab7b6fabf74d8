//! Feedback records and the sorted, filtered, paginated view over them.

mod list;
mod record;

pub use list::{FeedbackList, FeedbackView, PAGE_SIZE, SortOrder, filter, page, sort, total_pages};
pub use record::FeedbackRecord;
