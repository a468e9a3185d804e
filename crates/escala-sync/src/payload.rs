//! JSON document posted to the webhook when a visitor submits the quiz.

use chrono::{DateTime, SecondsFormat, Utc};
use escala_attribution::AttributionParams;
use escala_core::QuizAnswers;
use serde::Serialize;
use url::Url;

/// Answers, attribution and page context flattened into one object.
///
/// The timestamp is added when the body goes out, see [`WebhookPayload::stamped`].
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    #[serde(flatten)]
    pub answers: QuizAnswers,
    #[serde(flatten)]
    pub attribution: AttributionParams,
    pub url: String,
}

/// Wire body: the payload followed by `timestamp`.
#[derive(Debug, Serialize)]
pub struct StampedPayload<'a> {
    #[serde(flatten)]
    pub payload: &'a WebhookPayload,
    /// ISO 8601, millisecond precision, UTC.
    pub timestamp: String,
}

impl WebhookPayload {
    pub fn new(answers: QuizAnswers, attribution: AttributionParams, page: &Url) -> Self {
        Self {
            answers,
            attribution,
            url: page.to_string(),
        }
    }

    /// Body stamped with `at`.
    pub fn stamped(&self, at: DateTime<Utc>) -> StampedPayload<'_> {
        StampedPayload {
            payload: self,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Body stamped with the current time.
    pub fn stamped_now(&self) -> StampedPayload<'_> {
        self.stamped(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use escala_core::{ConversionTier, PracticeArea, RevenueBand};

    fn answers() -> QuizAnswers {
        QuizAnswers {
            practice_area: Some(PracticeArea::Previdenciario),
            monthly_ad_spend: 3000,
            average_contract_value: 4500,
            conversion_rate: Some(ConversionTier::Boa),
            current_monthly_revenue: Some(RevenueBand::From11kTo30k),
            full_name: "Ana Souza".into(),
            phone_number: "(11) 98765-4321".into(),
            email_address: "ana@souza.adv.br".into(),
        }
    }

    #[test]
    fn payload_flattens_answers_and_attribution() {
        let page = Url::parse("https://quiz.digge.com.br/?utm_source=google&fbclid=z").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 12, 30, 5).unwrap();
        let payload = WebhookPayload::new(answers(), AttributionParams::from_url(&page), &page);
        let json = serde_json::to_value(payload.stamped(at)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "area": "PREVIDENCIÁRIO",
                "investimento": 3000,
                "ticket": 4500,
                "taxa_conversao": 0.24,
                "faturamento_atual": 20000,
                "nome": "Ana Souza",
                "whatsapp": "(11) 98765-4321",
                "email": "ana@souza.adv.br",
                "utm_source": "google",
                "url": "https://quiz.digge.com.br/?utm_source=google&fbclid=z",
                "timestamp": "2026-10-16T12:30:05.000Z",
            })
        );
    }

    #[test]
    fn payload_without_attribution_has_no_utm_keys() {
        let page = Url::parse("https://quiz.digge.com.br/").unwrap();
        let payload = WebhookPayload::new(answers(), AttributionParams::from_url(&page), &page);
        let body = payload.stamped_now();
        let json = serde_json::to_value(&body).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.keys().any(|k| k.starts_with("utm_")));
        assert!(body.timestamp.ends_with('Z'));
    }
}
