//! The nine quiz screens, in order.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Welcome,
    PracticeArea,
    AdSpend,
    ContractValue,
    ConversionRate,
    CurrentRevenue,
    /// Transient; advances on its own once progress completes.
    Loading,
    ContactInfo,
    /// Terminal for the wizard; routing takes over from here.
    Results,
}

impl Step {
    pub const ALL: [Step; 9] = [
        Self::Welcome,
        Self::PracticeArea,
        Self::AdSpend,
        Self::ContractValue,
        Self::ConversionRate,
        Self::CurrentRevenue,
        Self::Loading,
        Self::ContactInfo,
        Self::Results,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Following screen in index order.
    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Back navigation is offered on the question screens only.
    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::PracticeArea
            | Self::AdSpend
            | Self::ContractValue
            | Self::ConversionRate
            | Self::CurrentRevenue => Self::from_index(self.index() - 1),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::PracticeArea => "practice-area",
            Self::AdSpend => "ad-spend",
            Self::ContractValue => "contract-value",
            Self::ConversionRate => "conversion-rate",
            Self::CurrentRevenue => "current-revenue",
            Self::Loading => "loading",
            Self::ContactInfo => "contact-info",
            Self::Results => "results",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the visitor currently sees: a known step, or the recovery screen for
/// an index outside 0–8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Step(Step),
    Unknown(usize),
}

impl Screen {
    pub fn from_index(index: usize) -> Self {
        Step::from_index(index).map_or(Self::Unknown(index), Self::Step)
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Step(step) => step.index(),
            Self::Unknown(index) => *index,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(step) => step.fmt(f),
            Self::Unknown(index) => write!(f, "unknown step {index}"),
        }
    }
}
