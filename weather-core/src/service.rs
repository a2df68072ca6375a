use std::sync::Arc;

use crate::{
    Cep, Config, WeatherReply,
    error::ForecastError,
    provider::{
        PostalLookup, WeatherProvider, http_client, postal_lookup_from_config,
        weather_provider_from_config,
    },
};

/// Postal code → locality → current temperature.
///
/// Each step runs only after the previous one succeeded; the first failure
/// ends the request.
#[derive(Debug, Clone)]
pub struct WeatherService {
    postal: Arc<dyn PostalLookup>,
    weather: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(postal: Arc<dyn PostalLookup>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { postal, weather }
    }

    /// Wire ViaCEP and WeatherAPI clients from config over one shared HTTP client.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = http_client(&config.http)?;
        let weather = weather_provider_from_config(config, http.clone())?;
        let postal = postal_lookup_from_config(config, http);

        Ok(Self::new(Arc::from(postal), Arc::from(weather)))
    }

    pub async fn weather_by_cep(&self, raw_cep: Option<&str>) -> Result<WeatherReply, ForecastError> {
        let cep = Cep::parse(raw_cep)?;
        let locality = self.postal.lookup(&cep).await?;
        let current = self.weather.current(&locality).await?;

        Ok(WeatherReply::from(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CurrentWeather, Locality,
        error::{PostalLookupError, WeatherFetchError},
    };
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct FakePostal {
        missing: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PostalLookup for FakePostal {
        async fn lookup(&self, cep: &Cep) -> Result<Locality, PostalLookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.missing {
                return Err(PostalLookupError::NotFound(cep.to_string()));
            }
            Ok(Locality { city: "São Paulo".into(), state: "SP".into() })
        }
    }

    #[derive(Debug)]
    enum FakeWeather {
        Reading(f64),
        Down,
        Garbled,
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn current(&self, _: &Locality) -> Result<CurrentWeather, WeatherFetchError> {
            match self {
                FakeWeather::Reading(c) => Ok(CurrentWeather { temperature_c: *c }),
                FakeWeather::Down => Err(WeatherFetchError::Status(StatusCode::BAD_GATEWAY)),
                FakeWeather::Garbled => Err(WeatherFetchError::Parse(
                    serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
                )),
            }
        }
    }

    fn service(postal: Arc<FakePostal>, weather: FakeWeather) -> WeatherService {
        WeatherService::new(postal, Arc::new(weather))
    }

    #[tokio::test]
    async fn invalid_cep_never_reaches_lookup() {
        let postal = Arc::new(FakePostal::default());
        let svc = service(postal.clone(), FakeWeather::Reading(20.0));

        let err = svc.weather_by_cep(Some("0100")).await.unwrap_err();

        assert!(matches!(err, ForecastError::InvalidFormat(_)));
        assert_eq!(postal.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn lookup_failure_stops_pipeline() {
        let postal = Arc::new(FakePostal { missing: true, ..Default::default() });
        let svc = service(postal, FakeWeather::Reading(20.0));

        let err = svc.weather_by_cep(Some("99999999")).await.unwrap_err();
        assert!(matches!(err, ForecastError::LookupFailed(_)));
    }

    #[tokio::test]
    async fn weather_failures_map_to_their_kind() {
        let svc = service(Arc::default(), FakeWeather::Down);
        let err = svc.weather_by_cep(Some("01001000")).await.unwrap_err();
        assert!(matches!(err, ForecastError::WeatherUnavailable(_)));

        let svc = service(Arc::default(), FakeWeather::Garbled);
        let err = svc.weather_by_cep(Some("01001000")).await.unwrap_err();
        assert!(matches!(err, ForecastError::WeatherParse(_)));
    }

    #[tokio::test]
    async fn reading_is_converted_and_truncated() {
        let svc = service(Arc::default(), FakeWeather::Reading(22.5));
        let reply = svc.weather_by_cep(Some("01001000")).await.expect("reply");

        assert_eq!(reply.temp_c, 22.5);
        assert_eq!(reply.temp_f, 72.5);
        assert!((reply.temp_k - 295.65).abs() <= 0.01);
    }

    #[test]
    fn from_config_requires_api_key() {
        let err = WeatherService::from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }
}
