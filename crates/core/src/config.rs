//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the gateway and
//! controller. Nothing below the binaries reads environment variables while handling a user
//! action.

use crate::constants::DEFAULT_API_BASE_URL;
use crate::{ClinicError, ClinicResult};
use clinic_types::AnalyticsWindow;
use url::Url;

/// Client configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    analytics_window: AnalyticsWindow,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// The base URL is validated with [`validate_base_url`] and stored without a trailing slash.
    pub fn new(base_url: &str, analytics_window: AnalyticsWindow) -> ClinicResult<Self> {
        Ok(Self {
            base_url: validate_base_url(base_url)?,
            analytics_window,
        })
    }

    /// Gateway origin, never ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Analytics window shown on first load.
    pub fn analytics_window(&self) -> AnalyticsWindow {
        self.analytics_window
    }

    /// Joins a gateway path (which must start with `/`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Validate a gateway origin.
///
/// The value must parse as an `http` or `https` URL with a host and no query or fragment.
/// Surrounding whitespace and trailing slashes are removed so paths can be appended directly.
///
/// # Errors
///
/// Returns [`ClinicError::Config`] if the value is blank, malformed, hostless or uses another
/// scheme.
pub fn validate_base_url(raw: &str) -> ClinicResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClinicError::Config("base URL cannot be empty".into()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| ClinicError::Config(format!("invalid base URL {trimmed}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClinicError::Config(format!(
            "base URL must use http or https: {trimmed}"
        )));
    }

    // The URL parser recovers a host from inputs like `http:///x`, so the authority is checked
    // as written.
    let authority = trimmed
        .split_once("://")
        .map(|(_, rest)| rest.split(['/', '?', '#']).next().unwrap_or_default())
        .unwrap_or_default();
    if authority.is_empty() || url.host_str().map_or(true, str::is_empty) {
        return Err(ClinicError::Config(format!("base URL has no host: {trimmed}")));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ClinicError::Config(format!(
            "base URL cannot carry a query or fragment: {trimmed}"
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_owned())
}

/// Resolve the base URL from an optional raw value.
///
/// If `value` is `None` or blank, returns [`DEFAULT_API_BASE_URL`].
pub fn base_url_from_env_value(value: Option<String>) -> ClinicResult<String> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(v) => validate_base_url(&v),
        None => Ok(DEFAULT_API_BASE_URL.to_owned()),
    }
}

/// Parse the default analytics window from an optional raw value.
///
/// If `value` is `None` or blank, returns the default window (14 days).
pub fn analytics_window_from_env_value(value: Option<String>) -> ClinicResult<AnalyticsWindow> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value
        .map(|v| v.parse::<AnalyticsWindow>())
        .transpose()
        .map_err(|e| ClinicError::Config(e.to_string()))?;

    Ok(parsed.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_removed() {
        let cfg = ClientConfig::new("http://localhost:8000/", AnalyticsWindow::Week).unwrap();
        assert_eq!(cfg.base_url(), "http://localhost:8000");
        assert_eq!(cfg.endpoint("/patients/"), "http://localhost:8000/patients/");
        assert_eq!(cfg.analytics_window(), AnalyticsWindow::Week);
    }

    #[test]
    fn rejects_blank_and_foreign_schemes() {
        assert!(matches!(validate_base_url("   "), Err(ClinicError::Config(_))));
        assert!(matches!(
            validate_base_url("ftp://clinic.example"),
            Err(ClinicError::Config(_))
        ));
        assert!(matches!(validate_base_url("https://"), Err(ClinicError::Config(_))));
    }

    #[test]
    fn rejects_missing_or_malformed_hosts() {
        for raw in [
            "http:///patients",
            "http://exa mple.com",
            "http://:8000",
            "https://?x",
            "localhost:8000",
            "http://clinic.example/?page=2",
        ] {
            assert!(
                matches!(validate_base_url(raw), Err(ClinicError::Config(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn keeps_port_and_path_prefix() {
        assert_eq!(
            validate_base_url(" http://127.0.0.1:8000 ").unwrap(),
            "http://127.0.0.1:8000"
        );
        assert_eq!(
            validate_base_url("https://clinic.example/api/").unwrap(),
            "https://clinic.example/api"
        );
    }

    #[test]
    fn env_values_fall_back_to_defaults() {
        assert_eq!(base_url_from_env_value(None).unwrap(), DEFAULT_API_BASE_URL);
        assert_eq!(
            base_url_from_env_value(Some(" ".into())).unwrap(),
            DEFAULT_API_BASE_URL
        );
        assert_eq!(
            base_url_from_env_value(Some("https://api.clinic.example/".into())).unwrap(),
            "https://api.clinic.example"
        );
        assert_eq!(
            analytics_window_from_env_value(None).unwrap(),
            AnalyticsWindow::Fortnight
        );
        assert_eq!(
            analytics_window_from_env_value(Some("30".into())).unwrap(),
            AnalyticsWindow::Month
        );
        assert!(analytics_window_from_env_value(Some("90".into())).is_err());
    }
}
