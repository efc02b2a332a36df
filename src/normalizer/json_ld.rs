use crate::error::HarvestError;
use crate::model::{Address, Coordinates, NumberOrString, RestaurantRecord};
use crate::page::Page;
use html_escape::decode_html_entities;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::convert::TryFrom;

/// schema.org types accepted as a food establishment
const ESTABLISHMENT_TYPES: [&str; 2] = ["FoodEstablishment", "Restaurant"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonLdRestaurant {
    name: Option<String>,
    address: Option<AddressType>,
    telephone: Option<String>,
    geo: Option<GeoCoordinates>,
    aggregate_rating: Option<AggregateRating>,
    price_range: Option<String>,
    serves_cuisine: Option<ServesCuisine>,
    opening_hours_specification: Option<OpeningHoursSpecifications>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AddressType {
    Postal(PostalAddress),
    String(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostalAddress {
    street_address: Option<String>,
    address_locality: Option<String>,
    address_region: Option<String>,
    postal_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeoCoordinates {
    latitude: Option<NumberOrString>,
    longitude: Option<NumberOrString>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateRating {
    rating_value: Option<NumberOrString>,
    review_count: Option<NumberOrString>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServesCuisine {
    String(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OpeningHoursSpecifications {
    Single(OpeningHoursSpecification),
    Multiple(Vec<OpeningHoursSpecification>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpeningHoursSpecification {
    day_of_week: Option<DayOfWeek>,
    opens: Option<String>,
    closes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DayOfWeek {
    String(String),
    Multiple(Vec<String>),
}

impl TryFrom<&Value> for JsonLdRestaurant {
    type Error = serde_json::Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value.clone())
    }
}

impl JsonLdRestaurant {
    /// Direct field mapping into the canonical record. Website, features,
    /// description and cuisine tags are not part of the block and stay unset.
    pub(crate) fn into_record(self) -> RestaurantRecord {
        let address = match self.address {
            Some(AddressType::Postal(postal)) => Address::from_parts(
                text(postal.street_address),
                text(postal.address_locality),
                text(postal.address_region),
                text(postal.postal_code),
            ),
            Some(AddressType::String(full)) => Address::from_full(text(Some(full))),
            None => Address::default(),
        };

        let coordinates = self
            .geo
            .map(|geo| Coordinates {
                latitude: geo.latitude.and_then(|v| v.as_f64()),
                longitude: geo.longitude.and_then(|v| v.as_f64()),
            })
            .unwrap_or_default();

        let (rating, review_count) = match self.aggregate_rating {
            Some(agg) => (
                agg.rating_value.and_then(|v| v.as_f64()),
                agg.review_count.and_then(|v| v.as_u64()),
            ),
            None => (None, None),
        };

        let cuisines = match self.serves_cuisine {
            Some(ServesCuisine::String(s)) => text(Some(s)).into_iter().collect(),
            Some(ServesCuisine::Multiple(v)) => {
                v.into_iter().filter_map(|s| text(Some(s))).collect()
            }
            None => Vec::new(),
        };

        let opening_hours = self.opening_hours_specification.map(|specs| {
            let specs = match specs {
                OpeningHoursSpecifications::Single(spec) => vec![spec],
                OpeningHoursSpecifications::Multiple(specs) => specs,
            };
            opening_hours(specs)
        });

        RestaurantRecord {
            name: text(self.name),
            address,
            phone: text(self.telephone),
            coordinates,
            rating,
            review_count,
            price_range: text(self.price_range),
            cuisines,
            opening_hours,
            ..Default::default()
        }
    }
}

fn opening_hours(specs: Vec<OpeningHoursSpecification>) -> BTreeMap<String, String> {
    let mut hours: BTreeMap<String, String> = BTreeMap::new();
    for spec in specs {
        let days = match spec.day_of_week {
            Some(DayOfWeek::String(day)) => vec![day],
            Some(DayOfWeek::Multiple(days)) => days,
            None => continue,
        };
        let span = format!(
            "{} – {}",
            spec.opens.as_deref().unwrap_or("").trim(),
            spec.closes.as_deref().unwrap_or("").trim()
        );
        for day in days {
            let day = clean_day(&day);
            if day.is_empty() {
                continue;
            }
            // split shifts (lunch and dinner) arrive as separate entries for one day
            hours
                .entry(day)
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&span);
                })
                .or_insert_with(|| span.clone());
        }
    }
    hours
}

fn clean_day(day: &str) -> String {
    day.trim()
        .trim_start_matches("https://schema.org/")
        .trim_start_matches("http://schema.org/")
        .to_string()
}

/// Entity-decoded, trimmed text; empty values count as absent
fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| decode_html_symbols(&v).trim().to_string())
        .filter(|v| !v.is_empty())
}

fn decode_html_symbols(text: &str) -> String {
    // entities are sometimes encoded twice in the embedded block
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

fn is_establishment_type(value: &Value) -> bool {
    let matches = |t: &str| {
        ESTABLISHMENT_TYPES
            .iter()
            .any(|accepted| t.eq_ignore_ascii_case(accepted))
    };
    match value.get("@type") {
        Some(Value::String(t)) => matches(t),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(matches),
        _ => false,
    }
}

fn find_establishment(json_ld: &Value) -> Option<&Value> {
    if let Some(items) = json_ld.as_array() {
        items.iter().find(|item| is_establishment_type(item))
    } else if is_establishment_type(json_ld) {
        Some(json_ld)
    } else if let Some(graph) = json_ld.get("@graph") {
        graph
            .as_array()
            .and_then(|items| items.iter().find(|item| is_establishment_type(item)))
    } else {
        None
    }
}

/// A block that fails to parse counts as ours only if its raw text carries an
/// `"@type": "<establishment>"` pair (or an `@type` array starting with one).
/// The type name showing up as any other value does not count.
fn declares_establishment(raw: &str) -> bool {
    raw.match_indices("\"@type\"").any(|(at, key)| {
        let rest = raw[at + key.len()..].trim_start();
        let Some(rest) = rest.strip_prefix(':') else {
            return false;
        };
        let rest = rest.trim_start();
        let rest = rest.strip_prefix('[').map(str::trim_start).unwrap_or(rest);
        let Some(value) = rest.strip_prefix('"') else {
            return false;
        };
        let value = value.split('"').next().unwrap_or("");
        ESTABLISHMENT_TYPES
            .iter()
            .any(|accepted| value.eq_ignore_ascii_case(accepted))
    })
}

/// Locate and decode the food-establishment block.
///
/// Returns `Ok(None)` when the page carries no such block, and
/// [`HarvestError::MalformedStructuredData`] when one is present but unreadable.
pub(crate) fn extract<P>(page: &P, selector: &str) -> Result<Option<JsonLdRestaurant>, HarvestError>
where
    P: Page + ?Sized,
{
    let scripts = page.query_all(selector)?;
    debug!("JsonLd: found {} structured-data blocks", scripts.len());

    for (index, script) in scripts.iter().enumerate() {
        let raw = script.text.trim();
        match serde_json::from_str::<Value>(raw) {
            Ok(json_ld) => {
                let Some(establishment) = find_establishment(&json_ld) else {
                    debug!("JsonLd: block {} is not a food establishment", index);
                    continue;
                };
                return JsonLdRestaurant::try_from(establishment)
                    .map(Some)
                    .map_err(|e| {
                        HarvestError::MalformedStructuredData(format!(
                            "establishment block {index} on {}: {e}",
                            page.url()
                        ))
                    });
            }
            Err(e) if declares_establishment(raw) => {
                return Err(HarvestError::MalformedStructuredData(format!(
                    "block {index} on {} does not parse: {e}",
                    page.url()
                )));
            }
            Err(e) => {
                debug!("JsonLd: skipping unparsable block {}: {}", index, e);
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_establishment_in_graph_and_arrays() {
        let graph = json!({
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "WebSite", "name": "Site"},
                {"@type": "Restaurant", "name": "Graph Place"}
            ]
        });
        assert_eq!(find_establishment(&graph).unwrap()["name"], "Graph Place");

        let array = json!([
            {"@type": "BreadcrumbList"},
            {"@type": ["LocalBusiness", "FoodEstablishment"], "name": "Array Place"}
        ]);
        assert_eq!(find_establishment(&array).unwrap()["name"], "Array Place");

        let other = json!({"@type": "Organization", "name": "Nope"});
        assert!(find_establishment(&other).is_none());
    }

    #[test]
    fn test_type_match_is_case_insensitive() {
        assert!(is_establishment_type(&json!({"@type": "foodestablishment"})));
        assert!(!is_establishment_type(&json!({"@type": 3})));
    }

    #[test]
    fn test_opening_hours_merge_and_clean_days() {
        let value = json!({
            "@type": "FoodEstablishment",
            "name": "Hours",
            "openingHoursSpecification": [
                {"dayOfWeek": "https://schema.org/Monday", "opens": "11:30", "closes": "15:00"},
                {"dayOfWeek": "Monday", "opens": "18:00", "closes": "23:00"},
                {"dayOfWeek": ["Saturday", "Sunday"], "opens": "12:00", "closes": "00:00"}
            ]
        });
        let record = JsonLdRestaurant::try_from(&value).unwrap().into_record();
        let hours = record.opening_hours.unwrap();

        assert_eq!(hours["Monday"], "11:30 – 15:00, 18:00 – 23:00");
        assert_eq!(hours["Saturday"], "12:00 – 00:00");
        assert_eq!(hours["Sunday"], "12:00 – 00:00");
        assert_eq!(hours.len(), 3);
    }

    #[test]
    fn test_single_opening_hours_object() {
        let value = json!({
            "@type": "FoodEstablishment",
            "name": "Single",
            "openingHoursSpecification": {"dayOfWeek": "Friday", "opens": "19:00", "closes": "02:00"}
        });
        let record = JsonLdRestaurant::try_from(&value).unwrap().into_record();
        assert_eq!(record.opening_hours.unwrap()["Friday"], "19:00 – 02:00");
    }

    #[test]
    fn test_string_fields_are_decoded_and_empty_is_absent() {
        let value = json!({
            "@type": "FoodEstablishment",
            "name": "Caf&amp;eacute; &amp; Bar",
            "telephone": "",
            "priceRange": "  ",
            "servesCuisine": "Brasileira"
        });
        let record = JsonLdRestaurant::try_from(&value).unwrap().into_record();
        assert_eq!(record.name.as_deref(), Some("Café & Bar"));
        assert_eq!(record.phone, None);
        assert_eq!(record.price_range, None);
        assert_eq!(record.cuisines, vec!["Brasileira"]);
        assert!(record.opening_hours.is_none());
    }

    #[test]
    fn test_partial_and_missing_address_share_one_rule() {
        let partial = json!({
            "@type": "FoodEstablishment",
            "name": "Partial",
            "address": {"streetAddress": "Rua X", "addressLocality": ""}
        });
        let record = JsonLdRestaurant::try_from(&partial).unwrap().into_record();
        assert_eq!(record.address.full.as_deref(), Some("Rua X"));
        assert_eq!(record.address.city, None);

        let empty = json!({"@type": "FoodEstablishment", "name": "Empty", "address": {}});
        let record = JsonLdRestaurant::try_from(&empty).unwrap().into_record();
        assert_eq!(record.address.full, None);

        let missing = json!({"@type": "FoodEstablishment", "name": "Missing"});
        let record = JsonLdRestaurant::try_from(&missing).unwrap().into_record();
        assert_eq!(record.address, Address::default());
    }

    #[test]
    fn test_declares_establishment() {
        assert!(declares_establishment(r#"{"@type":"FoodEstablishment", "name": }"#));
        assert!(declares_establishment(r#"{ "@type" :  "Restaurant", "name": }"#));
        assert!(declares_establishment(r#"{"@type": ["Restaurant", "LocalBusiness"], }"#));
        assert!(!declares_establishment(r#"{"@type":"Organization", }"#));
        assert!(!declares_establishment(
            r#"{"@type":"BreadcrumbList","itemListElement":[{"name":"Restaurant"},]}"#
        ));
        assert!(!declares_establishment(r#"{"@type":"RestaurantChain", }"#));
    }
}
