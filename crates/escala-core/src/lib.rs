//! Core types for the Escala quiz: answers, lookup tables, result calculator, input masks.

pub mod answers;
pub mod calculator;
pub mod contact;
pub mod input;

pub use answers::{ConversionTier, PracticeArea, QuizAnswers, RevenueBand};
pub use calculator::{
    DEFAULT_COST_PER_LEAD, DerivedResults, compute_results, cost_per_lead, estimate,
};
pub use contact::{contact_link, first_name};
pub use input::{
    InputError, format_currency, format_currency_input, format_phone, parse_currency_input,
    validate_email, validate_phone,
};
