//! Campaign-tracking parameters read from the page address.

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

/// Query parameters recognised as campaign attribution.
pub const UTM_KEYS: [&str; 5] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
];

/// Attribution values captured once from the page address.
///
/// Serialises as a flat object so it can be merged into a larger payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributionParams(BTreeMap<String, String>);

impl AttributionParams {
    /// Extract the recognised keys from `page`'s query string.
    ///
    /// The first occurrence of a key wins; absent and empty values are omitted.
    pub fn from_url(page: &Url) -> Self {
        let mut params = BTreeMap::new();
        for key in UTM_KEYS {
            let value = page
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned());
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                params.insert(key.to_string(), value);
            }
        }
        Self(params)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
