use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Canonical record for one restaurant, independent of which extraction tier produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: Address,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coordinates: Coordinates,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub review_count: Option<u64>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cuisines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_second: Option<String>,
    /// Day name to `"<opens> – <closes>"`; only present when the page carried a schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<BTreeMap<String, String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RestaurantRecord {
    /// A record can be aggregated only when it carries a non-empty name.
    pub fn is_valid(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub full: Option<String>,
}

impl Address {
    /// Build an address from its parts, synthesizing `full` as
    /// `"{street}, {city}, {state} {postalCode}"`. Missing parts are dropped
    /// along with their separators; with no parts at all `full` stays unset.
    pub fn from_parts(
        street: Option<String>,
        city: Option<String>,
        state: Option<String>,
        postal_code: Option<String>,
    ) -> Self {
        let present = |part: &Option<String>| {
            part.as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
        };
        let region = [present(&state), present(&postal_code)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let full = [present(&street), present(&city), Some(region)]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            street,
            city,
            state,
            postal_code,
            full: Some(full).filter(|f| !f.is_empty()),
        }
    }

    /// Address known only as a single caption line
    pub fn from_full(full: Option<String>) -> Self {
        Self {
            full,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
}

/// Numbers in page data and older record files arrive either as JSON numbers
/// or as numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::String(s) => s.trim().parse::<f64>().ok(),
        }
        .filter(|n| n.is_finite())
    }

    pub(crate) fn as_u64(&self) -> Option<u64> {
        match self {
            NumberOrString::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as u64),
            NumberOrString::Number(_) => None,
            NumberOrString::String(s) => s.trim().parse::<u64>().ok(),
        }
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_u64()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
