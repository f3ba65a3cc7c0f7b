//! HTTP-backed providers, sources and stores.
//!
//! Everything here is the network edge of the trait seams defined elsewhere:
//! the forecast provider, the ICS fetcher, the document source, the resource
//! store and the geocoder. All requests are blocking with a bounded timeout;
//! a render pass would rather degrade than hang.

use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::assets::store::{ResourceStore, validate_resource_name};
use crate::content::calendar::CalendarProvider;
use crate::content::weather::{WeatherProvider, WeatherReport, report_from_response};
use crate::foundation::error::{InkframeError, InkframeResult};
use crate::model::Design;
use crate::sync::DocumentSource;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A blocking HTTP client with a bounded per-request timeout.
pub fn http_client(timeout: Duration) -> InkframeResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| InkframeError::source(format!("http client build failed: {e}")))
}

/// Quick reachability probe for the internet at large, independent of the
/// document source. A TCP connect to a well-known public resolver stands in
/// for a ping.
pub fn check_internet(timeout: Duration) -> bool {
    let addr: SocketAddr = ([1, 1, 1, 1], 443).into();
    TcpStream::connect_timeout(&addr, timeout).is_ok()
}

/// Forecasts from the open-meteo public API.
pub struct OpenMeteoProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl OpenMeteoProvider {
    pub fn new() -> InkframeResult<Self> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            base_url: "https://api.open-meteo.com".to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl WeatherProvider for OpenMeteoProvider {
    fn forecast(&self, latitude: f64, longitude: f64) -> InkframeResult<WeatherReport> {
        let response = self
            .client
            .get(format!("{}/v1/forecast", self.base_url))
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                (
                    "hourly",
                    "temperature_2m,weathercode,precipitation".to_string(),
                ),
                (
                    "daily",
                    "weathercode,temperature_2m_max,temperature_2m_min,sunrise,sunset".to_string(),
                ),
                ("current_weather", "true".to_string()),
                ("forecast_days", "4".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .map_err(|e| InkframeError::source(format!("forecast request failed: {e}")))?
            .error_for_status()
            .map_err(|e| InkframeError::source(format!("forecast request rejected: {e}")))?
            .json()
            .map_err(|e| InkframeError::source(format!("forecast response unparsable: {e}")))?;
        report_from_response(&response)
    }
}

/// ICS feeds over HTTP.
pub struct HttpCalendarProvider {
    client: reqwest::blocking::Client,
}

impl HttpCalendarProvider {
    pub fn new() -> InkframeResult<Self> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
        })
    }
}

impl CalendarProvider for HttpCalendarProvider {
    fn fetch_ics(&self, url: &str) -> InkframeResult<String> {
        self.client
            .get(url)
            .send()
            .map_err(|e| InkframeError::source(format!("calendar request failed: {e}")))?
            .error_for_status()
            .map_err(|e| InkframeError::source(format!("calendar request rejected: {e}")))?
            .text()
            .map_err(|e| InkframeError::source(format!("calendar body unreadable: {e}")))
    }
}

/// Designs served by the authoritative signage server.
pub struct HttpDocumentSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpDocumentSource {
    pub fn new(base_url: impl Into<String>) -> InkframeResult<Self> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            base_url: base_url.into(),
        })
    }

    fn fetch(&self, url: String) -> InkframeResult<Design> {
        let json = self
            .client
            .get(url)
            .send()
            .map_err(|e| InkframeError::source(format!("design request failed: {e}")))?
            .error_for_status()
            .map_err(|e| InkframeError::source(format!("design request rejected: {e}")))?
            .text()
            .map_err(|e| InkframeError::source(format!("design body unreadable: {e}")))?;
        Design::from_json(&json)
    }
}

impl DocumentSource for HttpDocumentSource {
    fn load_active(&self) -> InkframeResult<Design> {
        self.fetch(format!("{}/design", self.base_url))
    }

    fn load_by_name(&self, name: &str) -> InkframeResult<Design> {
        self.fetch(format!("{}/get_design_by_name?name={name}", self.base_url))
    }
}

/// Fonts and images served by the signage server, with an optional write-
/// through disk cache so a replica keeps its resources across outages.
pub struct HttpResourceStore {
    client: reqwest::blocking::Client,
    base_url: String,
    cache_dir: Option<PathBuf>,
}

impl HttpResourceStore {
    pub fn new(base_url: impl Into<String>, cache_dir: Option<PathBuf>) -> InkframeResult<Self> {
        if let Some(dir) = &cache_dir {
            std::fs::create_dir_all(dir).map_err(|e| {
                InkframeError::source(format!(
                    "cannot create cache dir '{}': {e}",
                    dir.display()
                ))
            })?;
        }
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            base_url: base_url.into(),
            cache_dir,
        })
    }

    fn get(&self, class: &str, name: &str) -> InkframeResult<Option<Vec<u8>>> {
        validate_resource_name(name)?;
        match self.fetch(class, name) {
            Ok(found) => Ok(found),
            Err(e) => match self.read_cache(name) {
                Some(bytes) => {
                    tracing::info!(resource = name, "serving resource from cache");
                    Ok(Some(bytes))
                }
                None => Err(e),
            },
        }
    }

    fn fetch(&self, class: &str, name: &str) -> InkframeResult<Option<Vec<u8>>> {
        let response = self
            .client
            .get(format!("{}/{class}/{name}", self.base_url))
            .send()
            .map_err(|e| InkframeError::source(format!("resource request failed: {e}")))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let bytes = response
            .error_for_status()
            .map_err(|e| InkframeError::source(format!("resource request rejected: {e}")))?
            .bytes()
            .map_err(|e| InkframeError::source(format!("resource body unreadable: {e}")))?
            .to_vec();
        self.write_cache(name, &bytes);
        Ok(Some(bytes))
    }

    fn read_cache(&self, name: &str) -> Option<Vec<u8>> {
        let dir = self.cache_dir.as_ref()?;
        std::fs::read(dir.join(name)).ok()
    }

    fn write_cache(&self, name: &str, bytes: &[u8]) {
        let Some(dir) = &self.cache_dir else {
            return;
        };
        if let Err(e) = std::fs::write(dir.join(name), bytes) {
            tracing::warn!(resource = name, error = %e, "resource cache write failed");
        }
    }
}

impl ResourceStore for HttpResourceStore {
    fn get_font(&self, name: &str) -> InkframeResult<Option<Vec<u8>>> {
        self.get("font", name)
    }

    fn get_image(&self, name: &str) -> InkframeResult<Option<Vec<u8>>> {
        self.get("image", name)
    }
}

/// One match from a place-name search.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GeocodeHit {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

/// Place-name to coordinates lookup against the Nominatim public API.
pub struct NominatimGeocoder {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new() -> InkframeResult<Self> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            base_url: "https://nominatim.openstreetmap.org".to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn search(&self, query: &str) -> InkframeResult<Vec<GeocodeHit>> {
        let json = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json")])
            // Nominatim's usage policy requires an identifying agent.
            .header(reqwest::header::USER_AGENT, "inkframe/0.1")
            .send()
            .map_err(|e| InkframeError::source(format!("geocode request failed: {e}")))?
            .error_for_status()
            .map_err(|e| InkframeError::source(format!("geocode request rejected: {e}")))?
            .text()
            .map_err(|e| InkframeError::source(format!("geocode body unreadable: {e}")))?;
        parse_geocode_hits(&json)
    }
}

/// Parse a Nominatim search response, keeping at most the first ten hits.
pub fn parse_geocode_hits(json: &str) -> InkframeResult<Vec<GeocodeHit>> {
    let mut hits: Vec<GeocodeHit> = serde_json::from_str(json)
        .map_err(|e| InkframeError::source(format!("geocode response unparsable: {e}")))?;
    hits.truncate(10);
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocode_hits_parse_and_truncate() {
        let one = r#"[{"display_name": "Berlin, Deutschland", "lat": "52.52", "lon": "13.40", "class": "place"}]"#;
        let hits = parse_geocode_hits(one).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].display_name, "Berlin, Deutschland");
        assert_eq!(hits[0].lat, "52.52");

        let many: Vec<String> = (0..15)
            .map(|i| format!(r#"{{"display_name": "p{i}", "lat": "0", "lon": "0"}}"#))
            .collect();
        let json = format!("[{}]", many.join(","));
        assert_eq!(parse_geocode_hits(&json).unwrap().len(), 10);
    }

    #[test]
    fn geocode_garbage_is_an_error() {
        assert!(parse_geocode_hits("not json").is_err());
    }
}
