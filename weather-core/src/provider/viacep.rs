use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use crate::{Cep, Locality, error::PostalLookupError};

use super::{PostalLookup, join_url, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";

#[derive(Debug, Clone)]
pub struct ViaCepClient {
    base_url: String,
    http: Client,
}

impl ViaCepClient {
    pub fn new(base_url: String, http: Client) -> Self {
        Self { base_url, http }
    }

    fn lookup_url(&self, cep: &Cep) -> String {
        join_url(&self.base_url, &format!("{cep}/json/"))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViaCepResponse {
    localidade: Option<String>,
    uf: Option<String>,
    #[serde(deserialize_with = "flag")]
    erro: bool,
}

/// ViaCEP has reported `erro` both as a JSON boolean and as the string `"true"`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(s)) => s.eq_ignore_ascii_case("true"),
        None => false,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[async_trait]
impl PostalLookup for ViaCepClient {
    async fn lookup(&self, cep: &Cep) -> Result<Locality, PostalLookupError> {
        let url = self.lookup_url(cep);
        tracing::info!(%url, "querying postal lookup service");

        let res = self.http.get(&url).send().await.map_err(PostalLookupError::Transport)?;

        let status = res.status();
        tracing::debug!(%status, "postal lookup status");

        let body = res.text().await.map_err(PostalLookupError::Transport)?;

        if !status.is_success() {
            tracing::debug!(body = %truncate_body(&body), "postal lookup rejected request");
            return Err(PostalLookupError::Status(status));
        }

        let parsed: ViaCepResponse =
            serde_json::from_str(&body).map_err(PostalLookupError::Parse)?;

        if parsed.erro {
            return Err(PostalLookupError::NotFound(cep.to_string()));
        }

        match (non_empty(parsed.localidade), non_empty(parsed.uf)) {
            (Some(city), Some(state)) => Ok(Locality { city, state }),
            _ => Err(PostalLookupError::Incomplete(cep.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cep() -> Cep {
        "01001000".parse().expect("valid cep")
    }

    async fn lookup_with(template: ResponseTemplate) -> Result<Locality, PostalLookupError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/01001000/json/"))
            .respond_with(template)
            .mount(&server)
            .await;

        ViaCepClient::new(server.uri(), Client::new()).lookup(&cep()).await
    }

    #[tokio::test]
    async fn resolves_city_and_state() {
        let locality = lookup_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cep": "01001-000",
            "localidade": "São Paulo",
            "uf": "SP",
            "erro": false
        })))
        .await
        .expect("lookup succeeds");

        assert_eq!(locality, Locality { city: "São Paulo".into(), state: "SP".into() });
    }

    #[tokio::test]
    async fn erro_flag_is_not_found() {
        let err = lookup_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "erro": true
        })))
        .await
        .unwrap_err();

        assert!(matches!(err, PostalLookupError::NotFound(_)));
    }

    #[tokio::test]
    async fn erro_flag_as_string_is_not_found() {
        let err = lookup_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "erro": "true"
        })))
        .await
        .unwrap_err();

        assert!(matches!(err, PostalLookupError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_fields_are_incomplete() {
        let err = lookup_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "localidade": "",
            "uf": "SP",
            "erro": false
        })))
        .await
        .unwrap_err();

        assert!(matches!(err, PostalLookupError::Incomplete(_)));
    }

    #[tokio::test]
    async fn padded_fields_are_passed_through_untouched() {
        let locality = lookup_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "localidade": " São Paulo ",
            "uf": "SP",
            "erro": false
        })))
        .await
        .expect("lookup succeeds");

        assert_eq!(locality.city, " São Paulo ");
    }

    #[tokio::test]
    async fn whitespace_only_fields_are_not_empty() {
        let locality = lookup_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "localidade": " ",
            "uf": "SP",
            "erro": false
        })))
        .await
        .expect("only empty strings count as missing");

        assert_eq!(locality.city, " ");
    }

    #[tokio::test]
    async fn non_json_body_is_parse_error() {
        let err = lookup_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .await
            .unwrap_err();

        assert!(matches!(err, PostalLookupError::Parse(_)));
    }

    #[tokio::test]
    async fn bad_request_status_is_reported() {
        let err = lookup_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
            .await
            .unwrap_err();

        assert!(matches!(err, PostalLookupError::Status(s) if s.as_u16() == 400));
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let client = ViaCepClient::new("http://127.0.0.1:1".into(), Client::new());
        let err = client.lookup(&cep()).await.unwrap_err();

        assert!(matches!(err, PostalLookupError::Transport(_)));
    }
}
