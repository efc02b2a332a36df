use restaurant_harvest::config::SelectorConfig;
use restaurant_harvest::normalizer::{filter_cuisine_tags, primary_and_second};
use restaurant_harvest::{HarvestError, HtmlPage, RecordNormalizer};

const PAGE_URL: &str = "https://www.tripadvisor.com.br/Restaurant_Review-g304560-d1-Reviews-Casa.html";

fn detail_page(head: &str, body: &str) -> HtmlPage {
    let html = format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Restaurant</title>
            {head}
        </head>
        <body>
            {body}
        </body>
        </html>
        "#
    );
    HtmlPage::from_html(PAGE_URL, html)
}

fn json_ld(block: &str) -> String {
    format!(r#"<script type="application/ld+json">{block}</script>"#)
}

const MARKUP: &str = r##"
    <h1 class="biGQs _P fiohW hzzSG CIuBz">Heading Name</h1>
    <a data-automation="restaurantsMapLinkOnName" href="#map"><span> Caption Address 1 </span></a>
    <a href="tel:+558130000000">+55 81 3000-0000</a>
    <a data-automation="restaurantsWebsiteButton" href="https://casa.example/">Site</a>
    <span class="bTeln"><span class="AWdfh">$$ - $$$</span></span>
    <span class="bTeln"><span class="AWdfh">Italiana</span></span>
    <span class="bTeln"><span class="AWdfh">Pizza</span></span>
    <span class="bTeln"><span class="AWdfh">$$</span></span>
    <span class="bTeln"><span class="AWdfh">Frutos do Mar</span></span>
    <div class="pZUbB avBIb AWdfh">Forno a lenha desde 1987.</div>
    <div class="iPiKu f e Q1 RpLvz">
        <div class="rREKL">
            <span class="biGQs _P pZUbB avBIb AWdfh"> Reservas </span>
            <span class="biGQs _P pZUbB avBIb AWdfh"></span>
            <span class="biGQs _P pZUbB avBIb AWdfh">Wi-Fi gratuito</span>
        </div>
    </div>
"##;

const FULL_BLOCK: &str = r#"
{
    "@context": "https://schema.org",
    "@type": "FoodEstablishment",
    "name": "Casa do Forno",
    "address": {
        "@type": "PostalAddress",
        "streetAddress": "Rua da Aurora 100",
        "addressLocality": "Recife",
        "addressRegion": "PE",
        "postalCode": "50050-000"
    },
    "telephone": "+55 81 3333-4444",
    "geo": {"@type": "GeoCoordinates", "latitude": -8.0631, "longitude": -34.8711},
    "aggregateRating": {"@type": "AggregateRating", "ratingValue": "4.5", "reviewCount": "1287"},
    "priceRange": "$$ - $$$",
    "servesCuisine": ["Italiana", "Pizza", "Mediterrânea"],
    "openingHoursSpecification": [
        {"@type": "OpeningHoursSpecification", "dayOfWeek": "Monday", "opens": "11:30", "closes": "23:00"},
        {"@type": "OpeningHoursSpecification", "dayOfWeek": "Tuesday", "opens": "11:30", "closes": "23:00"}
    ]
}
"#;

fn normalizer() -> RecordNormalizer {
    RecordNormalizer::new(SelectorConfig::default())
}

#[test]
fn test_structured_fixture_maps_every_field() {
    let page = detail_page(&json_ld(FULL_BLOCK), MARKUP);
    let record = normalizer().normalize(&page).unwrap();

    assert_eq!(record.name.as_deref(), Some("Casa do Forno"));
    assert_eq!(record.address.street.as_deref(), Some("Rua da Aurora 100"));
    assert_eq!(record.address.city.as_deref(), Some("Recife"));
    assert_eq!(record.address.state.as_deref(), Some("PE"));
    assert_eq!(record.address.postal_code.as_deref(), Some("50050-000"));
    assert_eq!(
        record.address.full.as_deref(),
        Some("Rua da Aurora 100, Recife, PE 50050-000")
    );
    assert_eq!(record.phone.as_deref(), Some("+55 81 3333-4444"));
    assert_eq!(record.website.as_deref(), Some("https://casa.example/"));
    assert_eq!(record.coordinates.latitude, Some(-8.0631));
    assert_eq!(record.coordinates.longitude, Some(-34.8711));
    assert_eq!(record.rating, Some(4.5));
    assert_eq!(record.review_count, Some(1287));
    assert_eq!(record.price_range.as_deref(), Some("$$ - $$$"));
    assert_eq!(record.cuisines, vec!["Italiana", "Pizza", "Mediterrânea"]);

    let hours = record.opening_hours.as_ref().unwrap();
    assert_eq!(hours.len(), 2);
    assert_eq!(hours["Monday"], "11:30 – 23:00");
    assert_eq!(hours["Tuesday"], "11:30 – 23:00");

    // markup-only fields
    assert_eq!(record.features, vec!["Reservas", "Wi-Fi gratuito"]);
    assert_eq!(record.description.as_deref(), Some("Forno a lenha desde 1987."));
    assert_eq!(record.cuisine_primary.as_deref(), Some("Italiana"));
    assert_eq!(record.cuisine_second.as_deref(), Some("Pizza"));
}

#[test]
fn test_structured_data_takes_precedence_over_markup() {
    let page = detail_page(&json_ld(FULL_BLOCK), MARKUP);
    let record = normalizer().normalize(&page).unwrap();

    assert_ne!(record.name.as_deref(), Some("Heading Name"));
    assert_ne!(record.address.full.as_deref(), Some("Caption Address 1"));
    assert_ne!(record.phone.as_deref(), Some("+55 81 3000-0000"));
}

#[test]
fn test_fallback_without_structured_block() {
    let body = r##"
        <h1 class="biGQs _P fiohW hzzSG CIuBz"> Bar do Cais </h1>
        <a data-automation="restaurantsMapLinkOnName" href="#map"><span>Cais da Alfândega, Recife</span></a>
        <a href="tel:+558132221111"> +55 81 3222-1111 </a>
        <a data-automation="restaurantsWebsiteButton" href="https://cais.example/">Site</a>
        <div class="pZUbB avBIb AWdfh">Petiscos à beira do rio.</div>
        <div class="iPiKu f e Q1 RpLvz"><div class="rREKL">
            <span class="biGQs _P pZUbB avBIb AWdfh">Mesas ao ar livre</span>
        </div></div>
    "##;
    let page = detail_page("", body);
    let record = normalizer().normalize(&page).unwrap();

    assert_eq!(record.name.as_deref(), Some("Bar do Cais"));
    assert_eq!(
        record.address.full.as_deref(),
        Some("Cais da Alfândega, Recife")
    );
    assert_eq!(record.phone.as_deref(), Some("+55 81 3222-1111"));
    assert_eq!(record.features, vec!["Mesas ao ar livre"]);
    assert_eq!(record.description.as_deref(), Some("Petiscos à beira do rio."));

    assert_eq!(record.address.street, None);
    assert_eq!(record.address.city, None);
    assert_eq!(record.address.state, None);
    assert_eq!(record.address.postal_code, None);
    assert_eq!(record.website, None);
    assert_eq!(record.coordinates.latitude, None);
    assert_eq!(record.coordinates.longitude, None);
    assert_eq!(record.rating, None);
    assert_eq!(record.review_count, None);
    assert_eq!(record.price_range, None);
    assert!(record.cuisines.is_empty());
    assert!(record.opening_hours.is_none());
    assert_eq!(record.cuisine_primary, None);
    assert_eq!(record.cuisine_second, None);
}

#[test]
fn test_empty_page_yields_empty_record() {
    let page = detail_page("", "<p>nothing here</p>");
    let record = normalizer().normalize(&page).unwrap();

    assert_eq!(record.name, None);
    assert_eq!(record.address.full, None);
    assert_eq!(record.phone, None);
    assert!(record.features.is_empty());
    assert_eq!(record.description, None);
    assert!(!record.is_valid());
}

#[test]
fn test_malformed_establishment_block_is_a_hard_failure() {
    let broken = r#"{"@context": "https://schema.org", "@type":"FoodEstablishment", "name": "Casa", "#;
    let page = detail_page(&json_ld(broken), MARKUP);

    let err = normalizer().normalize(&page).unwrap_err();
    assert!(matches!(err, HarvestError::MalformedStructuredData(_)));
}

#[test]
fn test_establishment_with_wrong_shape_is_a_hard_failure() {
    let block = r#"{"@type": "Restaurant", "name": {"first": "Casa"}}"#;
    let page = detail_page(&json_ld(block), MARKUP);

    let err = normalizer().normalize(&page).unwrap_err();
    assert!(matches!(err, HarvestError::MalformedStructuredData(_)));
}

#[test]
fn test_unrelated_blocks_fall_back_to_markup() {
    let head = format!(
        "{}{}",
        json_ld(r#"{"@type": "Organization", "name": "Review Site"}"#),
        json_ld(r#"{"@type": "BreadcrumbList", "#)
    );
    let page = detail_page(&head, MARKUP);
    let record = normalizer().normalize(&page).unwrap();

    assert_eq!(record.name.as_deref(), Some("Heading Name"));
    assert_eq!(record.address.full.as_deref(), Some("Caption Address 1"));
    assert_eq!(record.rating, None);
}

#[test]
fn test_broken_block_naming_restaurant_as_a_value_falls_back() {
    let broken = r#"{"@type":"BreadcrumbList","itemListElement":[{"name":"Restaurant"},]}"#;
    let page = detail_page(
        &json_ld(broken),
        r#"<h1 class="biGQs _P fiohW hzzSG CIuBz">Casa</h1>"#,
    );

    let record = normalizer().normalize(&page).unwrap();
    assert_eq!(record.name.as_deref(), Some("Casa"));
    assert_eq!(record.rating, None);
}

#[test]
fn test_establishment_found_among_several_blocks() {
    let head = format!(
        "{}{}",
        json_ld(r#"{"@type": "WebSite", "name": "Review Site"}"#),
        json_ld(r#"{"@graph": [{"@type": "Restaurant", "name": "Graph Grill"}]}"#)
    );
    let page = detail_page(&head, "");
    let record = normalizer().normalize(&page).unwrap();

    assert_eq!(record.name.as_deref(), Some("Graph Grill"));
    assert_eq!(record.website, None);
    assert_eq!(record.address.full, None);
    assert!(record.opening_hours.is_none());
}

#[test]
fn test_custom_selectors() {
    let selectors = SelectorConfig {
        heading: "h1.name".to_string(),
        phone_link: "span.phone".to_string(),
        ..SelectorConfig::default()
    };
    let page = detail_page("", r#"<h1 class="name">Custom</h1><span class="phone">123</span>"#);
    let record = RecordNormalizer::new(selectors).normalize(&page).unwrap();

    assert_eq!(record.name.as_deref(), Some("Custom"));
    assert_eq!(record.phone.as_deref(), Some("123"));
}

#[test]
fn test_cuisine_filter_example() {
    let tags = ["Italiana", "Pizza", "$$", "Frutos do Mar"];
    assert_eq!(filter_cuisine_tags(&tags), vec!["Italiana", "Pizza"]);

    let (primary, second) = primary_and_second(&tags);
    assert_eq!(primary.as_deref(), Some("Italiana"));
    assert_eq!(second.as_deref(), Some("Pizza"));
}
