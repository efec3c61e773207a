//! `Emulation` domain types: viewport, geolocation, timezone and locale
//! overrides, the CDP counterpart of BiDi's `browsingContext.setViewport`
//! and `emulation` commands.

use serde::Serialize;

/// Parameters for `Emulation.setDeviceMetricsOverride`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDeviceMetricsOverrideParams {
    /// Overriding viewport width in pixels; `0` disables the override.
    pub width: i32,
    /// Overriding viewport height in pixels; `0` disables the override.
    pub height: i32,
    /// Overriding device scale factor; `0` disables the override.
    pub device_scale_factor: f64,
    /// Whether to emulate a mobile device.
    pub mobile: bool,
}

/// Parameters for `Emulation.clearDeviceMetricsOverride`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ClearDeviceMetricsOverrideParams {}

/// Parameters for `Emulation.setGeolocationOverride`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetGeolocationOverrideParams {
    /// Latitude in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Accuracy in meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl SetGeolocationOverrideParams {
    /// Creates an override with exact coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            accuracy: Some(1.0),
        }
    }
}

/// Parameters for `Emulation.setGeolocationOverride` emulating a position-unavailable error.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SetGeolocationUnavailableParams {}

/// Parameters for `Emulation.clearGeolocationOverride`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ClearGeolocationOverrideParams {}

/// Parameters for `Emulation.setTimezoneOverride`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTimezoneOverrideParams {
    /// IANA timezone id; an empty string disables the override.
    pub timezone_id: String,
}

/// Parameters for `Emulation.setLocaleOverride`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetLocaleOverrideParams {
    /// ICU locale identifier; absent disables the override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Parameters for `Emulation.setUserAgentOverride`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUserAgentOverrideParams {
    /// User-Agent string to report.
    pub user_agent: String,
    /// Accept-Language header value to report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_language: Option<String>,
    /// `navigator.platform` value to report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// Parameters for `Emulation.setScriptExecutionDisabled`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScriptExecutionDisabledParams {
    /// Whether script execution should be disabled in the target.
    pub value: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_metrics_override_serializes_all_required_fields() {
        let params = SetDeviceMetricsOverrideParams {
            width: 800,
            height: 600,
            device_scale_factor: 1.0,
            mobile: false,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["width"], 800);
        assert_eq!(json["mobile"], false);
    }

    #[test]
    fn geolocation_override_new_sets_default_accuracy() {
        let params = SetGeolocationOverrideParams::new(51.5, -0.12);
        assert_eq!(params.accuracy, Some(1.0));
    }

    #[test]
    fn locale_override_clears_when_locale_absent() {
        let params = SetLocaleOverrideParams::default();
        let json = serde_json::to_value(&params).unwrap();
        assert!(json.as_object().unwrap().is_empty());
    }
}
