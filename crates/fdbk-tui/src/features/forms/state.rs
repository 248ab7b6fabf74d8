use fdbk_core::validation::{self, FieldErrors};

use super::TextField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Name,
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FieldId),
    Submit,
}

const LOGIN_FOCUS: [Focus; 3] = [
    Focus::Field(FieldId::Email),
    Focus::Field(FieldId::Password),
    Focus::Submit,
];

const REGISTER_FOCUS: [Focus; 4] = [
    Focus::Field(FieldId::Name),
    Focus::Field(FieldId::Email),
    Focus::Field(FieldId::Password),
    Focus::Submit,
];

/// Credential form state.
///
/// The login form checks a field every time it changes. The registration form
/// checks everything on submit and, after the first submit, re-checks a field
/// whenever it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialForm {
    pub kind: FormKind,
    pub name: TextField,
    pub email: TextField,
    pub password: TextField,
    focus: usize,
    pub errors: FieldErrors,
    submitted: bool,
}

impl CredentialForm {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            name: TextField::default(),
            email: TextField::default(),
            password: TextField::default(),
            focus: 0,
            errors: FieldErrors::default(),
            submitted: false,
        }
    }

    pub fn login() -> Self {
        Self::new(FormKind::Login)
    }

    pub fn register() -> Self {
        Self::new(FormKind::Register)
    }

    fn focus_order(&self) -> &'static [Focus] {
        match self.kind {
            FormKind::Login => &LOGIN_FOCUS,
            FormKind::Register => &REGISTER_FOCUS,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.focus_order().iter().filter_map(|f| match f {
            Focus::Field(id) => Some(*id),
            Focus::Submit => None,
        })
    }

    pub fn focused(&self) -> Focus {
        self.focus_order()
            .get(self.focus)
            .copied()
            .unwrap_or(Focus::Submit)
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.focus_order().len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.focus_order().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn field(&self, id: FieldId) -> &TextField {
        match id {
            FieldId::Name => &self.name,
            FieldId::Email => &self.email,
            FieldId::Password => &self.password,
        }
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut TextField {
        match id {
            FieldId::Name => &mut self.name,
            FieldId::Email => &mut self.email,
            FieldId::Password => &mut self.password,
        }
    }

    pub fn error(&self, id: FieldId) -> Option<&'static str> {
        match id {
            FieldId::Name => self.errors.name,
            FieldId::Email => self.errors.email,
            FieldId::Password => self.errors.password,
        }
    }

    fn check_field(&self, id: FieldId) -> Option<&'static str> {
        match id {
            FieldId::Name => validation::validate_name(self.name.value()),
            FieldId::Email => validation::validate_email(self.email.value()),
            FieldId::Password => validation::validate_password(self.password.value()),
        }
    }

    /// Re-checks a field after it changed, when this form's timing asks for it.
    pub fn on_edit(&mut self, id: FieldId) {
        if self.kind == FormKind::Login || self.submitted {
            let message = self.check_field(id);
            match id {
                FieldId::Name => self.errors.name = message,
                FieldId::Email => self.errors.email = message,
                FieldId::Password => self.errors.password = message,
            }
        }
    }

    /// Validates every field and records the messages.
    ///
    /// # Errors
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&mut self) -> Result<(), FieldErrors> {
        self.submitted = true;
        let result = match self.kind {
            FormKind::Login => {
                validation::validate_login(self.email.value(), self.password.value())
            }
            FormKind::Register => validation::validate_registration(
                self.name.value(),
                self.email.value(),
                self.password.value(),
            ),
        };
        self.errors = result.clone().err().unwrap_or_default();
        result
    }
}
