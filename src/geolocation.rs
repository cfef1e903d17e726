//! Single-shot access to the device position.
//!
//! Position sources report through [`PositionCallbacks`], which may be called
//! any number of times; [`fetch_current_location`] resolves with the first
//! report and drops the rest.

use std::sync::{Arc, Mutex};

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("User denied the request for Geolocation.")]
    PermissionDenied,
    #[error("Location information is unavailable.")]
    PositionUnavailable,
    #[error("The request to get user location timed out.")]
    Timeout,
    #[error("An unknown error occurred.")]
    Unknown,
    #[error("Geolocation is not supported by this browser.")]
    Unsupported,
}

impl GeolocationError {
    /// Maps the numeric error codes used by browser position errors.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            2 => GeolocationError::PositionUnavailable,
            3 => GeolocationError::Timeout,
            _ => GeolocationError::Unknown,
        }
    }
}

type PositionResult = Result<Coordinate, GeolocationError>;

/// Success and error callbacks handed to a position source for one request.
#[derive(Clone)]
pub struct PositionCallbacks {
    sender: Arc<Mutex<Option<oneshot::Sender<PositionResult>>>>,
}

impl PositionCallbacks {
    fn channel() -> (Self, oneshot::Receiver<PositionResult>) {
        let (tx, rx) = oneshot::channel();
        let callbacks = Self {
            sender: Arc::new(Mutex::new(Some(tx))),
        };
        (callbacks, rx)
    }

    pub fn success(&self, coordinate: Coordinate) {
        self.resolve(Ok(coordinate));
    }

    pub fn failure(&self, error: GeolocationError) {
        self.resolve(Err(error));
    }

    /// Whether the request has not been answered yet.
    pub fn is_pending(&self) -> bool {
        self.sender
            .lock()
            .expect("position callbacks lock poisoned")
            .is_some()
    }

    fn resolve(&self, result: PositionResult) {
        let sender = self
            .sender
            .lock()
            .expect("position callbacks lock poisoned")
            .take();
        match sender {
            Some(tx) => {
                let _ = tx.send(result);
            }
            None => debug!(?result, "ignoring position report for a settled request"),
        }
    }
}

/// A host capability able to report the current device position.
pub trait GeolocationProvider {
    fn is_supported(&self) -> bool {
        true
    }

    /// Starts a request; the provider reports through `callbacks`.
    fn get_current_position(&self, callbacks: PositionCallbacks);
}

/// Requests the current position once.
pub async fn fetch_current_location<P>(provider: &P) -> Result<Coordinate, GeolocationError>
where
    P: GeolocationProvider + ?Sized,
{
    if !provider.is_supported() {
        return Err(GeolocationError::Unsupported);
    }
    let (callbacks, rx) = PositionCallbacks::channel();
    provider.get_current_position(callbacks);
    rx.await.unwrap_or(Err(GeolocationError::Unknown))
}

/// Always reports the same coordinate.
pub struct StaticGeolocation {
    coordinate: Coordinate,
}

impl StaticGeolocation {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

impl GeolocationProvider for StaticGeolocation {
    fn get_current_position(&self, callbacks: PositionCallbacks) {
        callbacks.success(self.coordinate);
    }
}

/// A host without any position capability.
pub struct UnsupportedGeolocation;

impl GeolocationProvider for UnsupportedGeolocation {
    fn is_supported(&self) -> bool {
        false
    }

    fn get_current_position(&self, _callbacks: PositionCallbacks) {}
}

/// What a browser page sends back after asking for its position.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionReport {
    Position { lat: f64, lng: f64 },
    Error { code: u16 },
    Unsupported,
}

/// Bridges a remote browser's geolocation API into a [`GeolocationProvider`].
///
/// The pending request is kept until the page posts a [`PositionReport`].
#[derive(Clone, Default)]
pub struct BrowserGeolocation {
    pending: Arc<Mutex<Option<PositionCallbacks>>>,
}

impl BrowserGeolocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards a report to the outstanding request. Returns `false` when no
    /// request is waiting for an answer.
    pub fn report(&self, report: PositionReport) -> bool {
        let pending = self
            .pending
            .lock()
            .expect("browser geolocation lock poisoned")
            .clone();
        let Some(callbacks) = pending else {
            return false;
        };
        let accepted = callbacks.is_pending();
        match report {
            PositionReport::Position { lat, lng } => callbacks.success(Coordinate::new(lat, lng)),
            PositionReport::Error { code } => callbacks.failure(GeolocationError::from_code(code)),
            PositionReport::Unsupported => callbacks.failure(GeolocationError::Unsupported),
        }
        accepted
    }
}

impl GeolocationProvider for BrowserGeolocation {
    fn get_current_position(&self, callbacks: PositionCallbacks) {
        *self
            .pending
            .lock()
            .expect("browser geolocation lock poisoned") = Some(callbacks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fires its callbacks several times, like a watch-style position source.
    struct RepeatingGeolocation {
        reports: Vec<PositionResult>,
    }

    impl GeolocationProvider for RepeatingGeolocation {
        fn get_current_position(&self, callbacks: PositionCallbacks) {
            for report in &self.reports {
                match report {
                    Ok(coordinate) => callbacks.success(*coordinate),
                    Err(error) => callbacks.failure(*error),
                }
            }
        }
    }

    struct SilentGeolocation;

    impl GeolocationProvider for SilentGeolocation {
        fn get_current_position(&self, _callbacks: PositionCallbacks) {}
    }

    #[test]
    fn messages_match_error_kinds() {
        assert_eq!(
            GeolocationError::PermissionDenied.to_string(),
            "User denied the request for Geolocation."
        );
        assert_eq!(
            GeolocationError::PositionUnavailable.to_string(),
            "Location information is unavailable."
        );
        assert_eq!(
            GeolocationError::Timeout.to_string(),
            "The request to get user location timed out."
        );
        assert_eq!(
            GeolocationError::Unknown.to_string(),
            "An unknown error occurred."
        );
        assert_eq!(
            GeolocationError::Unsupported.to_string(),
            "Geolocation is not supported by this browser."
        );
    }

    #[test]
    fn codes_map_to_kinds() {
        assert_eq!(GeolocationError::from_code(1), GeolocationError::PermissionDenied);
        assert_eq!(GeolocationError::from_code(2), GeolocationError::PositionUnavailable);
        assert_eq!(GeolocationError::from_code(3), GeolocationError::Timeout);
        assert_eq!(GeolocationError::from_code(0), GeolocationError::Unknown);
        assert_eq!(GeolocationError::from_code(99), GeolocationError::Unknown);
    }

    #[tokio::test]
    async fn static_provider_resolves() {
        let provider = StaticGeolocation::new(Coordinate::new(12.9716, 77.5946));
        let coordinate = fetch_current_location(&provider).await.unwrap();
        assert_eq!(coordinate, Coordinate::new(12.9716, 77.5946));
    }

    #[tokio::test]
    async fn missing_capability_is_rejected() {
        let result = fetch_current_location(&UnsupportedGeolocation).await;
        assert_eq!(result, Err(GeolocationError::Unsupported));
    }

    #[tokio::test]
    async fn first_report_wins() {
        let provider = RepeatingGeolocation {
            reports: vec![
                Err(GeolocationError::Timeout),
                Ok(Coordinate::new(1.0, 2.0)),
                Ok(Coordinate::new(3.0, 4.0)),
            ],
        };
        let result = fetch_current_location(&provider).await;
        assert_eq!(result, Err(GeolocationError::Timeout));
    }

    #[tokio::test]
    async fn dropped_callbacks_fail_as_unknown() {
        let result = fetch_current_location(&SilentGeolocation).await;
        assert_eq!(result, Err(GeolocationError::Unknown));
    }

    #[tokio::test]
    async fn browser_bridge_accepts_only_the_first_report() {
        let bridge = BrowserGeolocation::new();
        assert!(!bridge.report(PositionReport::Error { code: 1 }));

        let waiting = bridge.clone();
        let fetch = tokio::spawn(async move { fetch_current_location(&waiting).await });
        while bridge.pending.lock().unwrap().is_none() {
            tokio::task::yield_now().await;
        }

        assert!(bridge.report(PositionReport::Error { code: 1 }));
        assert!(!bridge.report(PositionReport::Position { lat: 1.0, lng: 2.0 }));
        assert_eq!(
            fetch.await.unwrap(),
            Err(GeolocationError::PermissionDenied)
        );
    }

    #[test]
    fn reports_deserialize_from_page_payloads() {
        let position: PositionReport =
            serde_json::from_str(r#"{"kind":"position","lat":12.9,"lng":77.5}"#).unwrap();
        assert_eq!(position, PositionReport::Position { lat: 12.9, lng: 77.5 });
        let error: PositionReport = serde_json::from_str(r#"{"kind":"error","code":3}"#).unwrap();
        assert_eq!(error, PositionReport::Error { code: 3 });
        let unsupported: PositionReport =
            serde_json::from_str(r#"{"kind":"unsupported"}"#).unwrap();
        assert_eq!(unsupported, PositionReport::Unsupported);
    }
}
