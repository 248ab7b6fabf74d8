use fdbk_core::feedback::FeedbackList;

use crate::forms::TextField;

/// Home screen state.
#[derive(Debug, Default)]
pub struct HomeState {
    pub list: FeedbackList,
    pub search: TextField,
    pub search_focused: bool,
    /// True once the first load result (success or failure) arrived.
    pub loaded_once: bool,
}

impl HomeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the search box text into the list.
    pub fn sync_search(&mut self) {
        self.list.set_search(self.search.value());
    }
}
