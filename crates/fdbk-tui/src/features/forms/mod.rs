//! Login and registration forms.

mod field;
mod render;
mod state;
mod update;

pub use field::TextField;
pub use render::render_form;
pub use state::{CredentialForm, FieldId, Focus, FormKind};
pub use update::{
    LOGIN_FAILED, LOGIN_SUCCESS, REGISTER_FAILED, REGISTER_SUCCESS, handle_form_key,
    handle_form_paste, handle_register_result, handle_sign_in_result,
};
