use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde_json::{Value, json};

use super::auth::{self, LoginSession};
use super::constants::{self, headers};
use super::query::{QueryResponse, Record};
use super::resilience::{RetryConfig, RetryPolicy};
use super::session::{InsertResult, PlatformSession, SessionError};
use crate::auth::Credentials;
use crate::config::ApiSettings;

/// Salesforce REST client bound to one logged-in session
#[derive(Clone)]
pub struct SalesforceClient {
    http_client: reqwest::Client,
    session: LoginSession,
    api_version: String,
    retry_policy: RetryPolicy,
}

impl SalesforceClient {
    /// Build the pooled HTTP client shared by login and REST calls
    pub fn http_client(settings: &ApiSettings) -> Result<reqwest::Client, SessionError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(constants::USER_AGENT)
            .build()?;
        Ok(client)
    }

    /// Log in with username, password and security token
    pub async fn login(credentials: &Credentials, settings: &ApiSettings) -> Result<Self, SessionError> {
        let http_client = Self::http_client(settings)?;
        let retry_policy = RetryPolicy::new(RetryConfig::with_max_attempts(settings.max_retries));

        let login_host = constants::login_host(settings.sandbox);
        let session = retry_policy
            .execute(|| auth::login(&http_client, credentials, login_host, &settings.version))
            .await?;

        Ok(Self::with_session(http_client, session, settings.version.clone(), retry_policy))
    }

    /// Create a client from an existing session
    pub fn with_session(
        http_client: reqwest::Client,
        session: LoginSession,
        api_version: String,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            http_client,
            session,
            api_version,
            retry_policy,
        }
    }

    pub fn instance_url(&self) -> &str {
        &self.session.instance_url
    }

    async fn fetch_page(&self, url: &str) -> Result<QueryResponse, SessionError> {
        self.retry_policy
            .execute(|| async {
                let response = self
                    .http_client
                    .get(url)
                    .bearer_auth(&self.session.session_id)
                    .header("Accept", headers::CONTENT_TYPE_JSON)
                    .send()
                    .await?;
                let body = Self::read_json(response).await?;
                QueryResponse::from_json(body)
            })
            .await
    }

    /// Read a JSON body, turning error statuses into `SessionError::Api`
    async fn read_json(response: reqwest::Response) -> Result<Value, SessionError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Self::api_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| SessionError::Decode(format!("{}: {}", e, text)))
    }

    /// Error payloads are `[{"errorCode": ..., "message": ...}]`
    fn api_error(status: u16, body: &str) -> SessionError {
        let first = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.as_array().and_then(|a| a.first().cloned()));

        let field = |name: &str| {
            first
                .as_ref()
                .and_then(|e| e.get(name))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        SessionError::Api {
            status,
            code: field("errorCode").unwrap_or_else(|| "UNKNOWN_ERROR".to_string()),
            message: field("message").unwrap_or_else(|| body.to_string()),
        }
    }
}

#[async_trait]
impl PlatformSession for SalesforceClient {
    async fn query(&self, soql: &str) -> Result<Vec<Record>, SessionError> {
        debug!("SOQL: {}", soql);
        let url = constants::query_url(&self.session.instance_url, &self.api_version, soql);

        let mut page = self.fetch_page(&url).await?;
        let mut records = std::mem::take(&mut page.records);

        while page.has_more() {
            let next = match page.next_records_url.as_deref() {
                Some(path) => format!("{}{}", self.session.instance_url, path),
                None => break,
            };
            debug!("Fetching next page: {}", next);
            page = self.fetch_page(&next).await?;
            records.append(&mut page.records);
        }

        debug!("Query returned {} records", records.len());
        Ok(records)
    }

    async fn insert(&self, sobject: &str, records: &[Value]) -> Result<Vec<InsertResult>, SessionError> {
        let endpoint = constants::composite_sobjects_endpoint(&self.session.instance_url, &self.api_version);

        let records: Vec<Value> = records
            .iter()
            .map(|record| {
                let mut record = record.clone();
                if let Value::Object(fields) = &mut record {
                    fields.insert("attributes".to_string(), json!({ "type": sobject }));
                }
                record
            })
            .collect();

        info!("Inserting {} {} records", records.len(), sobject);
        let payload = json!({ "allOrNone": false, "records": records });

        // Not retried: a timed-out insert may still have created records
        let response = self
            .http_client
            .post(&endpoint)
            .bearer_auth(&self.session.session_id)
            .header("Content-Type", headers::CONTENT_TYPE_JSON)
            .header("Accept", headers::CONTENT_TYPE_JSON)
            .json(&payload)
            .send()
            .await?;

        let body = Self::read_json(response).await?;
        debug!("Insert response: {}", body);

        let results: Vec<InsertResult> =
            serde_json::from_value(body).map_err(|e| SessionError::Decode(e.to_string()))?;

        if results.len() != records.len() {
            return Err(SessionError::UnexpectedResultCount {
                expected: records.len(),
                actual: results.len(),
            });
        }

        Ok(results)
    }

    fn instance_host(&self) -> &str {
        &self.session.instance_host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_payload() {
        let body = r#"[{"message":"sObject type 'Producr' is not supported.","errorCode":"INVALID_TYPE"}]"#;
        match SalesforceClient::api_error(400, body) {
            SessionError::Api { status, code, message } => {
                assert_eq!(status, 400);
                assert_eq!(code, "INVALID_TYPE");
                assert!(message.contains("Producr"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_api_error_without_json_body() {
        match SalesforceClient::api_error(502, "Bad Gateway") {
            SessionError::Api { code, message, .. } => {
                assert_eq!(code, "UNKNOWN_ERROR");
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
