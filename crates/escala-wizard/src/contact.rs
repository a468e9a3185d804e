//! Inline validation state for the contact screen.

use escala_core::{InputError, QuizAnswers, validate_email, validate_phone};

/// Outcome of the most recent validation run on each checked field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactErrors {
    pub phone: Option<InputError>,
    pub email: Option<InputError>,
}

impl ContactErrors {
    /// Re-run both validators against the current answers.
    pub fn revalidate(&mut self, answers: &QuizAnswers) -> bool {
        self.phone = validate_phone(&answers.phone_number).err();
        self.email = validate_email(&answers.email_address).err();
        self.is_clear()
    }

    pub fn is_clear(&self) -> bool {
        self.phone.is_none() && self.email.is_none()
    }

    /// Submit is offered once every field is filled and the last checks passed.
    pub fn submit_enabled(&self, answers: &QuizAnswers) -> bool {
        !answers.full_name.is_empty()
            && !answers.email_address.is_empty()
            && !answers.phone_number.is_empty()
            && self.is_clear()
    }
}
