//! Username/password login through the partner SOAP API
//!
//! The security token is appended to the password, which is what the
//! platform expects for logins from outside a trusted IP range.

use log::{debug, info};
use quick_xml::escape::escape;
use reqwest::Url;

use super::constants::{self, headers};
use super::session::SessionError;
use crate::auth::Credentials;

/// Session details returned by a successful login
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSession {
    pub session_id: String,
    /// Scheme and host of the org instance, e.g. `https://acme.my.salesforce.com`
    pub instance_url: String,
    pub instance_host: String,
}

/// SOAP envelope for the partner `login` call
pub fn login_envelope(credentials: &Credentials) -> String {
    let password = format!("{}{}", credentials.password, credentials.token);
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8" ?>"#,
            r#"<env:Envelope xmlns:xsd="http://www.w3.org/2001/XMLSchema" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
            r#"xmlns:env="http://schemas.xmlsoap.org/soap/envelope/" "#,
            r#"xmlns:urn="urn:partner.soap.sforce.com">"#,
            "<env:Header><urn:CallOptions><urn:client>{client}</urn:client></urn:CallOptions></env:Header>",
            "<env:Body><urn:login><urn:username>{username}</urn:username>",
            "<urn:password>{password}</urn:password></urn:login></env:Body>",
            "</env:Envelope>"
        ),
        client = escape(constants::USER_AGENT),
        username = escape(credentials.username.as_str()),
        password = escape(password.as_str()),
    )
}

/// Parse the login response body, successful or fault
pub fn parse_login_response(body: &str) -> Result<LoginSession, SessionError> {
    let document = roxmltree::Document::parse(body)
        .map_err(|e| SessionError::Decode(format!("login response is not valid XML: {}", e)))?;

    let text_of = |name: &str| {
        document
            .descendants()
            .find(|node| node.is_element() && node.tag_name().name() == name)
            .and_then(|node| node.text())
            .map(|text| text.trim().to_string())
    };

    if let Some(fault) = text_of("faultstring") {
        return Err(SessionError::Authentication(fault));
    }

    let session_id = text_of("sessionId")
        .ok_or_else(|| SessionError::Decode("login response has no sessionId".to_string()))?;
    let server_url = text_of("serverUrl")
        .ok_or_else(|| SessionError::Decode("login response has no serverUrl".to_string()))?;

    let url = Url::parse(&server_url)
        .map_err(|e| SessionError::Decode(format!("invalid serverUrl '{}': {}", server_url, e)))?;
    let instance_host = url
        .host_str()
        .ok_or_else(|| SessionError::Decode(format!("serverUrl '{}' has no host", server_url)))?
        .to_string();

    Ok(LoginSession {
        session_id,
        instance_url: url.origin().ascii_serialization(),
        instance_host,
    })
}

/// Log in and return the session to use for REST calls
pub async fn login(
    http: &reqwest::Client,
    credentials: &Credentials,
    login_host: &str,
    version: &str,
) -> Result<LoginSession, SessionError> {
    let url = constants::soap_login_endpoint(login_host, version);
    info!("Logging in to {} as {}", login_host, credentials.username);

    let response = http
        .post(&url)
        .header("Content-Type", headers::CONTENT_TYPE_SOAP)
        .header("SOAPAction", headers::SOAP_ACTION_LOGIN)
        .body(login_envelope(credentials))
        .send()
        .await?;

    let status = response.status();
    debug!("Login response status: {}", status);
    let body = response.text().await?;

    // Faults come back as 500 with a SOAP body, so parse before checking status
    match parse_login_response(&body) {
        Ok(session) => {
            info!("Logged in to instance {}", session.instance_host);
            Ok(session)
        }
        Err(SessionError::Decode(_)) if !status.is_success() => Err(SessionError::Api {
            status: status.as_u16(),
            code: "LOGIN_FAILED".to_string(),
            message: body,
        }),
        Err(e) => Err(e),
    }
}
