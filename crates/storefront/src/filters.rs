//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the URL of main.css, content-hashed when the build produced one.
///
/// Usage in templates: `{{ ""|css_url }}`
#[askama::filter_fn]
pub fn css_url(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(hashed_asset_url("css", "main", env!("CSS_HASH")))
}

/// Returns the URL of app.js, content-hashed when the build produced one.
///
/// Usage in templates: `{{ ""|js_url }}`
#[askama::filter_fn]
pub fn js_url(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(hashed_asset_url("js", "app", env!("JS_HASH")))
}

fn hashed_asset_url(kind: &str, stem: &str, hash: &str) -> String {
    if hash.is_empty() {
        format!("/static/{kind}/{stem}.{kind}")
    } else {
        format!("/static/{kind}/derived/{stem}.{hash}.{kind}")
    }
}
