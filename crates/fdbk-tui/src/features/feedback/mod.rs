//! Home screen: the feedback table with search, ordering and paging.

mod render;
mod state;
mod update;

pub use render::render_home;
pub use state::HomeState;
pub use update::{FEEDBACK_LOAD_FAILED, handle_feedback_loaded, handle_home_key, handle_home_paste, handle_signed_out, start_load};
