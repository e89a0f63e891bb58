//! HTTP API client for the bracket-hosting service.

use super::errors::{ApiError, ApiResult};
use super::retry::RetryPolicy;
use crate::config::ClientConfig;
use crate::tournament::models::{
    NewParticipant, NewTournament, Participant, ParticipantEnvelope, ParticipantId, Tournament,
    TournamentEnvelope, TournamentUpdate,
};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// API client for communicating with the bracket service.
///
/// Every call goes through the configured [`RetryPolicy`]. Tournaments can
/// be addressed by numeric id or by URL slug wherever a `&str` id is taken.
pub struct ChallongeClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl ChallongeClient {
    /// Create a new API client
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.http_timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            http,
            retry: config.retry,
        })
    }

    /// Underlying HTTP client, shared with roster downloads
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Retry policy applied to every call
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// List every tournament visible to the API key
    pub async fn list_tournaments(&self) -> ApiResult<Vec<Tournament>> {
        let envelopes: Vec<TournamentEnvelope> =
            self.request(Method::GET, "tournaments", &[], None).await?;
        Ok(envelopes.into_iter().map(|e| e.tournament).collect())
    }

    /// Fetch one tournament, optionally with its participants embedded
    pub async fn get_tournament(
        &self,
        tournament_id: &str,
        include_participants: bool,
    ) -> ApiResult<Tournament> {
        let query = [(
            "include_participants",
            if include_participants { "1" } else { "0" }.to_string(),
        )];
        let envelope: TournamentEnvelope = self
            .request(
                Method::GET,
                &format!("tournaments/{}", tournament_id),
                &query,
                None,
            )
            .await?;
        Ok(envelope.tournament)
    }

    /// Create a tournament
    pub async fn create_tournament(&self, tournament: &NewTournament) -> ApiResult<Tournament> {
        let body = json!({ "tournament": tournament });
        let envelope: TournamentEnvelope = self
            .request(Method::POST, "tournaments", &[], Some(body))
            .await?;
        Ok(envelope.tournament)
    }

    /// Apply a partial update to a tournament
    pub async fn update_tournament(
        &self,
        tournament_id: &str,
        update: &TournamentUpdate,
    ) -> ApiResult<Tournament> {
        let body = json!({ "tournament": update });
        let envelope: TournamentEnvelope = self
            .request(
                Method::PUT,
                &format!("tournaments/{}", tournament_id),
                &[],
                Some(body),
            )
            .await?;
        Ok(envelope.tournament)
    }

    /// Delete a tournament and everything attached to it
    pub async fn delete_tournament(&self, tournament_id: &str) -> ApiResult<()> {
        self.execute(
            Method::DELETE,
            &format!("tournaments/{}", tournament_id),
            &[],
            None,
        )
        .await
        .map(drop)
    }

    /// List the participants of a tournament
    pub async fn list_participants(&self, tournament_id: &str) -> ApiResult<Vec<Participant>> {
        let envelopes: Vec<ParticipantEnvelope> = self
            .request(
                Method::GET,
                &format!("tournaments/{}/participants", tournament_id),
                &[],
                None,
            )
            .await?;
        Ok(envelopes.into_iter().map(|e| e.participant).collect())
    }

    /// Add several participants in one request
    pub async fn bulk_add_participants(
        &self,
        tournament_id: &str,
        names: &[String],
    ) -> ApiResult<Vec<Participant>> {
        let participants: Vec<NewParticipant> = names
            .iter()
            .map(|name| NewParticipant { name: name.clone() })
            .collect();
        let body = json!({ "participants": participants });

        let envelopes: Vec<ParticipantEnvelope> = self
            .request(
                Method::POST,
                &format!("tournaments/{}/participants/bulk_add", tournament_id),
                &[],
                Some(body),
            )
            .await?;
        Ok(envelopes.into_iter().map(|e| e.participant).collect())
    }

    /// Remove one participant
    pub async fn delete_participant(
        &self,
        tournament_id: &str,
        participant_id: ParticipantId,
    ) -> ApiResult<()> {
        self.execute(
            Method::DELETE,
            &format!("tournaments/{}/participants/{}", tournament_id, participant_id),
            &[],
            None,
        )
        .await
        .map(drop)
    }

    /// Shuffle the seeds of every participant
    pub async fn randomize_participants(&self, tournament_id: &str) -> ApiResult<Vec<Participant>> {
        let envelopes: Vec<ParticipantEnvelope> = self
            .request(
                Method::POST,
                &format!("tournaments/{}/participants/randomize", tournament_id),
                &[],
                None,
            )
            .await?;
        Ok(envelopes.into_iter().map(|e| e.participant).collect())
    }

    /// Execute a call with retries and decode the JSON answer
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ApiResult<T> {
        let text = self.execute(method, endpoint, query, body).await?;
        serde_json::from_str(&text).map_err(|error| ApiError::Decode {
            endpoint: endpoint.to_string(),
            error,
        })
    }

    /// Execute a call with retries and return the raw body
    async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ApiResult<String> {
        let label = format!("{} {}", method, endpoint);
        let method = &method;
        let body = body.as_ref();
        self.retry
            .run(&label, move || {
                self.send_once(method.clone(), endpoint, query, body)
            })
            .await
    }

    /// One attempt, no retry.
    ///
    /// The API key travels as a query parameter on GET and inside the JSON
    /// body otherwise. `body` is what the caller asked to send; the key is
    /// added to a copy so error reports never contain it.
    async fn send_once(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> ApiResult<String> {
        let url = format!("{}/{}.json", self.base_url, endpoint);
        log::debug!("{} {}", method, endpoint);

        let mut builder = self.http.request(method.clone(), &url).query(query);
        if method == Method::GET {
            builder = builder.query(&[("api_key", self.api_key.as_str())]);
        } else {
            let mut payload = body.cloned().unwrap_or_else(|| json!({}));
            if let Value::Object(map) = &mut payload {
                map.insert("api_key".to_string(), Value::String(self.api_key.clone()));
            }
            builder = builder.json(&payload);
        }

        let transport = |error: reqwest::Error| ApiError::Transport {
            method: method.clone(),
            endpoint: endpoint.to_string(),
            error,
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(ApiError::from_response(
                method.clone(),
                endpoint,
                status,
                text,
                body,
            ));
        }

        Ok(text)
    }
}
