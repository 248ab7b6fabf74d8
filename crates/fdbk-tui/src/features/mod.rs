//! Feature slices for the TUI (state/update/render per slice).

pub mod feedback;
pub mod forms;
pub mod toast;
