//! Cuisine tags shown next to the restaurant name.
//!
//! The tag row mixes cuisines with the price tier and multi-word labels
//! ("Frutos do Mar", "Opções vegetarianas"); only single-word, non-price tags
//! are kept as cuisines.

fn is_price_tier(tag: &str) -> bool {
    !tag.is_empty() && tag.chars().all(|c| c == '$')
}

/// Keep single-word tags that are not a price tier, in page order.
pub fn filter_cuisine_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.as_ref().trim())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| !tag.chars().any(char::is_whitespace) && !is_price_tier(tag))
        .map(str::to_string)
        .collect()
}

/// First and second cuisine among the filtered tags
pub fn primary_and_second<S: AsRef<str>>(tags: &[S]) -> (Option<String>, Option<String>) {
    let mut cuisines = filter_cuisine_tags(tags).into_iter();
    (cuisines.next(), cuisines.next())
}
