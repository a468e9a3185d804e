//! Quiz state machine.
//!
//! [`Wizard::handle`] is the single transition function: it takes the event
//! raised by the visitor (or by the loading timer), checks the guard for the
//! current screen, updates the answers and returns the side effect the driver
//! must carry out. A rejected event leaves the wizard untouched.

use escala_core::{
    ConversionTier, DerivedResults, PracticeArea, QuizAnswers, RevenueBand, compute_results,
    format_currency_input, format_phone, parse_currency_input, validate_email, validate_phone,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::contact::ContactErrors;
use crate::step::{Screen, Step};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Welcome screen call to action.
    Start,
    ChooseArea(PracticeArea),
    /// Raw text typed into the ad-spend field.
    EditAdSpend(String),
    /// Raw text typed into the contract-value field.
    EditContractValue(String),
    /// "Continuar" on a currency screen.
    Continue,
    ChooseConversion(ConversionTier),
    ChooseRevenue(RevenueBand),
    /// Raised by the driver once the loading task finishes.
    LoadingFinished,
    EditName(String),
    EditEmail(String),
    EditPhone(String),
    Submit,
    Back,
    /// Recovery action on the unknown-step screen.
    Reset,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ChooseArea(_) => "choose-area",
            Self::EditAdSpend(_) => "edit-ad-spend",
            Self::EditContractValue(_) => "edit-contract-value",
            Self::Continue => "continue",
            Self::ChooseConversion(_) => "choose-conversion",
            Self::ChooseRevenue(_) => "choose-revenue",
            Self::LoadingFinished => "loading-finished",
            Self::EditName(_) => "edit-name",
            Self::EditEmail(_) => "edit-email",
            Self::EditPhone(_) => "edit-phone",
            Self::Submit => "submit",
            Self::Back => "back",
            Self::Reset => "reset",
        }
    }
}

/// Work the driver must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// The loading screen was entered; start a `LoadingTask` and raise
    /// [`Event::LoadingFinished`] when it completes.
    StartLoading,
    /// Contact details passed validation; send the webhook and show results.
    Submitted(Box<Submission>),
}

/// Snapshot handed to the webhook sender and the results view.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub answers: QuizAnswers,
    pub results: DerivedResults,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("{event} is not accepted on the {screen} screen")]
    NotAccepted { screen: String, event: &'static str },
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error("contact details are incomplete or invalid")]
    ContactInvalid,
}

/// Session state for one visitor: current screen, answers and field state.
#[derive(Debug, Clone)]
pub struct Wizard {
    screen: Screen,
    answers: QuizAnswers,
    ad_spend_display: String,
    contract_value_display: String,
    contact_errors: ContactErrors,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Open the wizard at an arbitrary step index, as the results route does.
    ///
    /// Indices past the last step land on the recovery screen.
    pub fn starting_at(index: usize) -> Self {
        Self {
            screen: Screen::from_index(index),
            answers: QuizAnswers::new(),
            ad_spend_display: String::new(),
            contract_value_display: String::new(),
            contact_errors: ContactErrors::default(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Current step, or `None` on the recovery screen.
    pub fn step(&self) -> Option<Step> {
        match self.screen {
            Screen::Step(step) => Some(step),
            Screen::Unknown(_) => None,
        }
    }

    pub fn answers(&self) -> &QuizAnswers {
        &self.answers
    }

    /// Formatted ad-spend field contents.
    pub fn ad_spend_display(&self) -> &str {
        &self.ad_spend_display
    }

    /// Formatted contract-value field contents.
    pub fn contract_value_display(&self) -> &str {
        &self.contract_value_display
    }

    pub fn contact_errors(&self) -> &ContactErrors {
        &self.contact_errors
    }

    /// Whether "Continuar" is enabled on the current currency screen.
    pub fn continue_enabled(&self) -> bool {
        match self.step() {
            Some(Step::AdSpend) => self.answers.monthly_ad_spend > 0,
            Some(Step::ContractValue) => self.answers.average_contract_value > 0,
            _ => false,
        }
    }

    /// Whether the contact screen's submit control is enabled.
    pub fn submit_enabled(&self) -> bool {
        self.step() == Some(Step::ContactInfo) && self.contact_errors.submit_enabled(&self.answers)
    }

    /// Metrics for the current answers, computed fresh on each call.
    pub fn results(&self) -> DerivedResults {
        compute_results(&self.answers)
    }

    /// Apply an event to the current screen.
    pub fn handle(&mut self, event: Event) -> Result<Effect, WizardError> {
        let step = match (self.screen, &event) {
            (Screen::Unknown(index), Event::Reset) => {
                info!(index, "resetting from unknown step");
                self.screen = Screen::Step(Step::Welcome);
                return Ok(Effect::None);
            }
            (Screen::Unknown(_), _) => return Err(self.reject(&event)),
            (Screen::Step(step), _) => step,
        };

        let effect = match (step, event) {
            (Step::Welcome, Event::Start) => self.advance(step),
            (Step::PracticeArea, Event::ChooseArea(area)) => {
                self.answers.practice_area = Some(area);
                self.advance(step)
            }
            (Step::AdSpend, Event::EditAdSpend(raw)) => {
                self.ad_spend_display = format_currency_input(&raw);
                self.answers.monthly_ad_spend = parse_currency_input(&raw);
                Effect::None
            }
            (Step::ContractValue, Event::EditContractValue(raw)) => {
                self.contract_value_display = format_currency_input(&raw);
                self.answers.average_contract_value = parse_currency_input(&raw);
                Effect::None
            }
            (Step::AdSpend | Step::ContractValue, Event::Continue) => {
                if !self.continue_enabled() {
                    return Err(WizardError::ZeroAmount);
                }
                self.advance(step)
            }
            (Step::ConversionRate, Event::ChooseConversion(tier)) => {
                self.answers.conversion_rate = Some(tier);
                self.advance(step)
            }
            (Step::CurrentRevenue, Event::ChooseRevenue(band)) => {
                self.answers.current_monthly_revenue = Some(band);
                self.screen = Screen::Step(Step::Loading);
                debug!(band = band.label(), "entering loading screen");
                Effect::StartLoading
            }
            (Step::Loading, Event::LoadingFinished) => self.advance(step),
            (Step::ContactInfo, Event::EditName(name)) => {
                self.answers.full_name = name;
                Effect::None
            }
            (Step::ContactInfo, Event::EditEmail(email)) => {
                self.contact_errors.email = validate_email(&email).err();
                self.answers.email_address = email;
                Effect::None
            }
            (Step::ContactInfo, Event::EditPhone(raw)) => {
                let formatted = format_phone(&raw);
                self.contact_errors.phone = validate_phone(&formatted).err();
                self.answers.phone_number = formatted;
                Effect::None
            }
            (Step::ContactInfo, Event::Submit) => self.submit()?,
            (_, Event::Back) => match step.previous() {
                Some(prev) => {
                    self.screen = Screen::Step(prev);
                    Effect::None
                }
                None => return Err(self.reject(&Event::Back)),
            },
            (_, event) => return Err(self.reject(&event)),
        };
        Ok(effect)
    }

    fn advance(&mut self, from: Step) -> Effect {
        if let Some(next) = from.next() {
            debug!(from = %from, to = %next, "step advanced");
            self.screen = Screen::Step(next);
        }
        Effect::None
    }

    fn submit(&mut self) -> Result<Effect, WizardError> {
        if !self.contact_errors.submit_enabled(&self.answers) {
            return Err(WizardError::ContactInvalid);
        }
        if !self.contact_errors.revalidate(&self.answers) {
            return Err(WizardError::ContactInvalid);
        }
        self.screen = Screen::Step(Step::Results);
        let submission = Submission {
            answers: self.answers.clone(),
            results: self.results(),
        };
        info!(
            missed_revenue = submission.results.missed_revenue,
            "quiz submitted"
        );
        Ok(Effect::Submitted(Box::new(submission)))
    }

    fn reject(&self, event: &Event) -> WizardError {
        WizardError::NotAccepted {
            screen: self.screen.to_string(),
            event: event.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escala_core::InputError;

    /// Drive a fresh wizard to the contact screen with the reference answers.
    fn at_contact_screen() -> Wizard {
        let mut w = Wizard::new();
        w.handle(Event::Start).unwrap();
        w.handle(Event::ChooseArea(PracticeArea::Previdenciario)).unwrap();
        w.handle(Event::EditAdSpend("3000".into())).unwrap();
        w.handle(Event::Continue).unwrap();
        w.handle(Event::EditContractValue("R$ 4.500".into())).unwrap();
        w.handle(Event::Continue).unwrap();
        w.handle(Event::ChooseConversion(ConversionTier::Boa)).unwrap();
        assert_eq!(
            w.handle(Event::ChooseRevenue(RevenueBand::From11kTo30k)),
            Ok(Effect::StartLoading)
        );
        assert_eq!(w.step(), Some(Step::Loading));
        w.handle(Event::LoadingFinished).unwrap();
        assert_eq!(w.step(), Some(Step::ContactInfo));
        w
    }

    #[test]
    fn full_walkthrough_submits_results() {
        let mut w = at_contact_screen();
        w.handle(Event::EditName("Ana Souza".into())).unwrap();
        w.handle(Event::EditEmail("ana@souza.adv.br".into())).unwrap();
        w.handle(Event::EditPhone("11987654321".into())).unwrap();
        assert!(w.submit_enabled());

        let Effect::Submitted(submission) = w.handle(Event::Submit).unwrap() else {
            panic!("expected submission");
        };
        assert_eq!(w.step(), Some(Step::Results));
        assert_eq!(submission.answers.phone_number, "(11) 98765-4321");
        assert_eq!(submission.results.estimated_leads, 136);
        assert_eq!(submission.results.missed_revenue, 128_500);
    }

    #[test]
    fn currency_screen_blocks_continue_at_zero() {
        let mut w = Wizard::starting_at(2);
        assert!(!w.continue_enabled());
        assert_eq!(w.handle(Event::Continue), Err(WizardError::ZeroAmount));

        w.handle(Event::EditAdSpend("R$ ".into())).unwrap();
        assert_eq!(w.ad_spend_display(), "");
        assert_eq!(w.handle(Event::Continue), Err(WizardError::ZeroAmount));

        w.handle(Event::EditAdSpend("0".into())).unwrap();
        assert_eq!(w.ad_spend_display(), "R$\u{a0}0");
        assert_eq!(w.handle(Event::Continue), Err(WizardError::ZeroAmount));

        w.handle(Event::EditAdSpend("12000".into())).unwrap();
        assert_eq!(w.ad_spend_display(), "R$\u{a0}12.000");
        assert_eq!(w.handle(Event::Continue), Ok(Effect::None));
        assert_eq!(w.step(), Some(Step::ContractValue));
    }

    #[test]
    fn back_keeps_entered_data() {
        let mut w = Wizard::starting_at(2);
        w.handle(Event::EditAdSpend("3000".into())).unwrap();
        w.handle(Event::Continue).unwrap();
        w.handle(Event::Back).unwrap();
        assert_eq!(w.step(), Some(Step::AdSpend));
        assert_eq!(w.answers().monthly_ad_spend, 3000);
        assert_eq!(w.ad_spend_display(), "R$\u{a0}3.000");
        w.handle(Event::Back).unwrap();
        w.handle(Event::Back).unwrap();
        assert_eq!(w.step(), Some(Step::Welcome));
    }

    #[test]
    fn back_rejected_outside_question_screens() {
        for index in [0, 6, 7, 8] {
            let mut w = Wizard::starting_at(index);
            assert!(matches!(
                w.handle(Event::Back),
                Err(WizardError::NotAccepted { event: "back", .. })
            ));
            assert_eq!(w.screen().index(), index);
        }
    }

    #[test]
    fn events_for_other_screens_are_rejected() {
        let mut w = Wizard::new();
        let err = w
            .handle(Event::ChooseArea(PracticeArea::Criminal))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "choose-area is not accepted on the welcome screen"
        );
        assert_eq!(w.answers().practice_area, None);
        assert!(w.handle(Event::LoadingFinished).is_err());
        assert!(w.handle(Event::Reset).is_err());
    }

    #[test]
    fn loading_screen_ignores_input() {
        let mut w = Wizard::starting_at(6);
        assert!(w.handle(Event::Submit).is_err());
        assert!(w.handle(Event::EditName("x".into())).is_err());
        assert_eq!(w.step(), Some(Step::Loading));
    }

    #[test]
    fn invalid_phone_blocks_submit_with_inline_error() {
        let mut w = at_contact_screen();
        w.handle(Event::EditName("Ana".into())).unwrap();
        w.handle(Event::EditEmail("ana@souza.adv.br".into())).unwrap();
        w.handle(Event::EditPhone("1198765".into())).unwrap();
        assert_eq!(w.answers().phone_number, "(11) 98765");
        assert_eq!(w.contact_errors().phone, Some(InputError::Phone));
        assert!(!w.submit_enabled());
        assert_eq!(w.handle(Event::Submit), Err(WizardError::ContactInvalid));
        assert_eq!(w.step(), Some(Step::ContactInfo));

        w.handle(Event::EditPhone("(11) 98765-4321".into())).unwrap();
        assert!(w.submit_enabled());
        assert!(matches!(w.handle(Event::Submit), Ok(Effect::Submitted(_))));
    }

    #[test]
    fn invalid_email_surfaces_error_and_clears_when_fixed() {
        let mut w = at_contact_screen();
        w.handle(Event::EditEmail("ana@souza".into())).unwrap();
        assert_eq!(w.contact_errors().email, Some(InputError::Email));
        w.handle(Event::EditEmail("ana@souza.com".into())).unwrap();
        assert_eq!(w.contact_errors().email, None);
    }

    #[test]
    fn empty_name_blocks_submit() {
        let mut w = at_contact_screen();
        w.handle(Event::EditEmail("ana@souza.com".into())).unwrap();
        w.handle(Event::EditPhone("11987654321".into())).unwrap();
        assert_eq!(w.handle(Event::Submit), Err(WizardError::ContactInvalid));
    }

    #[test]
    fn unknown_step_recovers_via_reset_only() {
        let mut w = Wizard::starting_at(42);
        assert_eq!(w.screen(), Screen::Unknown(42));
        assert_eq!(w.step(), None);
        assert!(w.handle(Event::Start).is_err());
        assert_eq!(w.handle(Event::Reset), Ok(Effect::None));
        assert_eq!(w.step(), Some(Step::Welcome));
    }

    #[test]
    fn results_route_computes_from_empty_answers() {
        let w = Wizard::starting_at(8);
        assert_eq!(w.step(), Some(Step::Results));
        let r = w.results();
        assert_eq!(r.cost_per_lead, escala_core::DEFAULT_COST_PER_LEAD);
        assert_eq!(r.missed_revenue, 0);
    }
}
