//! Outbound contact link and the results-page greeting.

/// WhatsApp number the results page sends visitors to.
pub const CONTACT_NUMBER: &str = "5511963443866";

/// Message pre-filled in the chat.
pub const CONTACT_MESSAGE: &str =
    "Ola, preenchi o Quiz e quero conhecer mais detalhes sobre a Assessoria em Marketing Jurídico da Digge";

/// Name used in the greeting when the visitor left theirs blank.
pub const FALLBACK_NAME: &str = "Advogado";

/// Deep link opening a chat with the pre-filled message.
pub fn contact_link() -> String {
    format!(
        "https://wa.me/{CONTACT_NUMBER}?text={}",
        urlencoding::encode(CONTACT_MESSAGE)
    )
}

/// First space-separated word of a full name, or [`FALLBACK_NAME`] when empty.
pub fn first_name(full_name: &str) -> &str {
    if full_name.is_empty() {
        return FALLBACK_NAME;
    }
    full_name.split(' ').next().unwrap_or(full_name)
}
