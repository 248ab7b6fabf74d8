//! Cross-slice state mutations.
//!
//! Feature reducers and overlays return these mutations to request changes
//! outside their own slice. The main reducer applies them in order.

use fdbk_core::feedback::SortOrder;

use crate::route::Route;
use crate::toast::Toast;

#[derive(Debug)]
pub enum StateMutation {
    Navigate { route: Route, replace: bool },
    Back,
    Toast(Toast),
    Feedback(FeedbackMutation),
}

/// Feedback list mutations requested by other slices.
#[derive(Debug)]
pub enum FeedbackMutation {
    SetOrder(SortOrder),
}
