//! Custom Askama template filters.

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(
    _value: impl std::fmt::Display,
    _env: &dyn askama::Values,
) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash of `main.css`, computed at build time.
///
/// Usage in templates: `/static/css/main.css?v={{ ""|css_hash }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn css_hash(
    _value: impl std::fmt::Display,
    _env: &dyn askama::Values,
) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}
