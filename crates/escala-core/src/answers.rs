//! Quiz answers and the fixed option sets offered on each screen.
//!
//! Every selectable answer is one of a closed set of values: practice areas
//! key the cost-per-lead table, conversion tiers map to a fixed fraction and
//! revenue bands map to a representative monthly revenue. Labels are the
//! strings shown to visitors and sent to the webhook.

use serde::{Serialize, Serializer};

/// Legal practice area, keyed into the cost-per-lead table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PracticeArea {
    Previdenciario,
    BancarioConsumidor,
    Trabalhista,
    Familia,
    Criminal,
    Tributario,
    Empresarial,
    Outros,
}

impl PracticeArea {
    /// All areas in the order they are offered.
    pub const ALL: [PracticeArea; 8] = [
        Self::Previdenciario,
        Self::BancarioConsumidor,
        Self::Trabalhista,
        Self::Familia,
        Self::Criminal,
        Self::Tributario,
        Self::Empresarial,
        Self::Outros,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Previdenciario => "PREVIDENCIÁRIO",
            Self::BancarioConsumidor => "BANCÁRIO/CONSUMIDOR",
            Self::Trabalhista => "TRABALHISTA",
            Self::Familia => "FAMÍLIA",
            Self::Criminal => "CRIMINAL",
            Self::Tributario => "TRIBUTÁRIO",
            Self::Empresarial => "EMPRESARIAL",
            Self::Outros => "OUTROS",
        }
    }

    /// Average ad spend needed to generate one lead in this area.
    pub fn cost_per_lead(&self) -> f64 {
        match self {
            Self::Previdenciario => 22.06,
            Self::BancarioConsumidor => 33.12,
            Self::Trabalhista => 25.0,
            Self::Familia => 57.94,
            Self::Criminal => 87.35,
            Self::Tributario => 56.71,
            Self::Empresarial => 64.76,
            Self::Outros => 22.06,
        }
    }

    /// Look up an area by display label, ignoring case (accented letters
    /// included) and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_uppercase();
        Self::ALL.into_iter().find(|a| a.label() == wanted)
    }
}

impl Serialize for PracticeArea {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Self-reported lead-to-contract quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionTier {
    Excelente,
    Boa,
    Ruim,
}

impl ConversionTier {
    pub const ALL: [ConversionTier; 3] = [Self::Excelente, Self::Boa, Self::Ruim];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excelente => "Excelente",
            Self::Boa => "Boa",
            Self::Ruim => "Ruim",
        }
    }

    /// Fraction of leads that become signed contracts.
    pub fn rate(&self) -> f64 {
        match self {
            Self::Excelente => 0.35,
            Self::Boa => 0.24,
            Self::Ruim => 0.12,
        }
    }

    /// Case-insensitive label lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label.trim()))
    }
}

/// Current monthly revenue band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevenueBand {
    UpTo10k,
    From11kTo30k,
    From31kTo50k,
    From51kTo70k,
    From71kTo100k,
    Above100k,
}

impl RevenueBand {
    pub const ALL: [RevenueBand; 6] = [
        Self::UpTo10k,
        Self::From11kTo30k,
        Self::From31kTo50k,
        Self::From51kTo70k,
        Self::From71kTo100k,
        Self::Above100k,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::UpTo10k => "Até 10 mil",
            Self::From11kTo30k => "De 11 mil à 30 mil",
            Self::From31kTo50k => "De 31 mil à 50 mil",
            Self::From51kTo70k => "De 51 mil à 70 mil",
            Self::From71kTo100k => "De 71 mil à 100 mil",
            Self::Above100k => "Acima de 100 mil",
        }
    }

    /// Representative monthly revenue used by the calculator.
    pub fn value(&self) -> u64 {
        match self {
            Self::UpTo10k => 10_000,
            Self::From11kTo30k => 20_000,
            Self::From31kTo50k => 40_000,
            Self::From51kTo70k => 60_000,
            Self::From71kTo100k => 85_000,
            Self::Above100k => 120_000,
        }
    }

    pub fn from_value(value: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.value() == value)
    }
}

/// Answers collected over one quiz session.
///
/// Starts empty; unselected choices serialise as `""` / `0` on the wire,
/// matching what the webhook receiver expects from a partially filled quiz.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuizAnswers {
    #[serde(rename = "area", serialize_with = "area_or_empty")]
    pub practice_area: Option<PracticeArea>,
    #[serde(rename = "investimento")]
    pub monthly_ad_spend: u64,
    #[serde(rename = "ticket")]
    pub average_contract_value: u64,
    #[serde(rename = "taxa_conversao", serialize_with = "rate_or_zero")]
    pub conversion_rate: Option<ConversionTier>,
    #[serde(rename = "faturamento_atual", serialize_with = "revenue_or_zero")]
    pub current_monthly_revenue: Option<RevenueBand>,
    #[serde(rename = "nome")]
    pub full_name: String,
    #[serde(rename = "whatsapp")]
    pub phone_number: String,
    #[serde(rename = "email")]
    pub email_address: String,
}

impl QuizAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversion fraction, `0.0` until a tier is chosen.
    pub fn conversion_fraction(&self) -> f64 {
        self.conversion_rate.map_or(0.0, |t| t.rate())
    }

    /// Current revenue, `0` until a band is chosen.
    pub fn current_revenue(&self) -> u64 {
        self.current_monthly_revenue.map_or(0, |b| b.value())
    }
}

fn area_or_empty<S: Serializer>(area: &Option<PracticeArea>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(area.map_or("", |a| a.label()))
}

fn rate_or_zero<S: Serializer>(tier: &Option<ConversionTier>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(tier.map_or(0.0, |t| t.rate()))
}

fn revenue_or_zero<S: Serializer>(band: &Option<RevenueBand>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(band.map_or(0, |b| b.value()))
}
