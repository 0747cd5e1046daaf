//! Checks against a real sandbox org. Credentials come from `.env` in the
//! crate root; run with `cargo test --test live -- --ignored`.

use std::path::Path;

use anyhow::Result;

use salesforce_seed::api::{PlatformSession, QueryBuilder, SalesforceClient, SessionError};
use salesforce_seed::auth::Credentials;
use salesforce_seed::config::ApiSettings;

async fn client() -> Result<SalesforceClient> {
    let credentials = Credentials::from_env_file(Path::new(".env"))?;
    Ok(SalesforceClient::login(&credentials, &ApiSettings::default()).await?)
}

#[tokio::test]
#[ignore]
async fn test_login_and_query_record_types() -> Result<()> {
    let client = client().await?;
    assert!(client.instance_url().starts_with("https://"));
    assert!(client.instance_host().ends_with(".salesforce.com"));

    let soql = QueryBuilder::id_and_name("RecordType").limit(5).to_soql();
    let records = client.query(&soql).await?;
    assert!(records.len() <= 5);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_bad_password_is_an_authentication_error() -> Result<()> {
    let mut credentials = Credentials::from_env_file(Path::new(".env"))?;
    credentials.password.push_str("-wrong");

    match SalesforceClient::login(&credentials, &ApiSettings::default()).await {
        Err(SessionError::Authentication(_)) => Ok(()),
        Err(other) => panic!("expected an authentication error, got {other}"),
        Ok(_) => panic!("login with a wrong password succeeded"),
    }
}
