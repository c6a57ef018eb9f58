//! HTML rendering for the dashboard pages

use axum::response::Html;
use url::Url;

use shared::{Measurement, Place, PlaceKey};
use crate::core::aggregator::Summary;
use crate::types::{CountryListing, DashboardView, RefreshReport};

const NO_DATA: &str = "*No data*";

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Path of the records page for a place, percent-encoded
pub fn record_href(key: &PlaceKey) -> String {
    let segment = format!("{}-{}", key.country, key.city);
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return format!("/{segment}");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(&segment);
    }
    url.path().to_string()
}

fn format_stat(summary: Option<&Summary>, pick: fn(&Summary) -> f64) -> String {
    summary
        .map(|s| format!("{:.2}", pick(s)))
        .unwrap_or_else(|| NO_DATA.to_string())
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title} | OpenAQ Dashboard</title>
</head>
<body>
  <nav><a href="/">Dashboard</a> | <a href="/cities">Cities</a> | <a href="/refresh">Refresh data</a></nav>
  <h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        body = body
    ))
}

fn measurement_list(measurements: &[Measurement]) -> String {
    if measurements.is_empty() {
        return "  <p>No measurements.</p>\n".to_string();
    }
    let items: String = measurements
        .iter()
        .map(|m| format!("    <li>{}</li>\n", escape_html(&m.to_string())))
        .collect();
    format!("  <ul class=\"records\">\n{items}  </ul>\n")
}

/// Main dashboard page for one place
pub fn dashboard_page(view: &DashboardView) -> Html<String> {
    let current = view.place.key();
    let options: String = view
        .places
        .iter()
        .map(|key| {
            let composite = escape_html(&key.composite());
            let selected = if *key == current { " selected" } else { "" };
            format!("      <option value=\"{composite}\"{selected}>{composite}</option>\n")
        })
        .collect();

    let body = format!(
        r#"  <form method="post" action="/">
    <select name="place">
{options}    </select>
    <input type="text" name="value" value="{threshold}">
    <button type="submit">Update</button>
  </form>
  <table class="stats">
    <tr><th>City average</th><td>{average}</td></tr>
    <tr><th>City standard deviation</th><td>{std}</td></tr>
    <tr><th>Country average</th><td>{country_avg}</td></tr>
    <tr><th>Country places with data</th><td>{country_places}</td></tr>
    <tr><th>Country standard deviation</th><td>{country_std}</td></tr>
  </table>
  <h2>Measurements at or above {threshold}</h2>
{records}  <p><a href="{href}">All records for {city}</a></p>
"#,
        options = options,
        threshold = view.threshold,
        average = format_stat(view.place_summary.as_ref(), |s| s.mean),
        std = format_stat(view.place_summary.as_ref(), |s| s.std_dev),
        country_avg = format_stat(view.country_summary.as_ref(), |s| s.mean),
        country_std = format_stat(view.country_summary.as_ref(), |s| s.std_dev),
        country_places = view.country_places,
        records = measurement_list(&view.filtered),
        href = escape_html(&record_href(&current)),
        city = escape_html(&view.place.city),
    );

    layout(&format!("{}, {}", view.place.city, view.place.country), &body)
}

/// Shown when the requested place is not in the store yet
pub fn not_loaded_page(requested: &PlaceKey) -> Html<String> {
    let body = format!(
        "  <p>No data loaded yet for {}.</p>\n  <p><a href=\"/refresh\">Load data from OpenAQ</a></p>\n",
        escape_html(&requested.composite())
    );
    layout("No data loaded", &body)
}

pub fn error_page(message: &str) -> Html<String> {
    let body = format!(
        "  <p class=\"error\">{}</p>\n  <p><a href=\"/\">Back to the dashboard</a></p>\n",
        escape_html(message)
    );
    layout("Error", &body)
}

pub fn refresh_page(report: &RefreshReport) -> Html<String> {
    let body = format!(
        "  <p>Data refreshed at {}.</p>\n  <p>Loaded {} places with {} measurements ({} sampled cities, {} excluded city entries).</p>\n",
        report.completed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.places,
        report.measurements,
        report.sampled,
        report.excluded_entries
    );
    layout("Data refreshed", &body)
}

pub fn cities_page(listings: &[CountryListing]) -> Html<String> {
    if listings.is_empty() {
        return layout("Cities", "  <p>No data loaded yet.</p>\n");
    }

    let mut body = String::from("  <ul class=\"countries\">\n");
    for listing in listings {
        body.push_str(&format!("    <li>{}\n      <ul>\n", escape_html(&listing.country)));
        for city in &listing.cities {
            let key = PlaceKey::new(listing.country.clone(), city.clone());
            body.push_str(&format!(
                "        <li><a href=\"{}\">{}</a></li>\n",
                escape_html(&record_href(&key)),
                escape_html(city)
            ));
        }
        body.push_str("      </ul>\n    </li>\n");
    }
    body.push_str("  </ul>\n");

    layout("Cities", &body)
}

pub fn records_page(place: &Place, measurements: &[Measurement]) -> Html<String> {
    let body = format!(
        "  <p>{} measurements</p>\n{}",
        measurements.len(),
        measurement_list(measurements)
    );
    layout(&format!("Records for {}, {}", place.city, place.country), &body)
}
