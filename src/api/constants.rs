//! API constants and endpoint helpers for the Salesforce REST and SOAP APIs

/// Default REST/SOAP API version
pub const DEFAULT_API_VERSION: &str = "59.0";

/// Login host for sandbox orgs
pub const SANDBOX_LOGIN_HOST: &str = "test.salesforce.com";

/// Login host for production and developer orgs
pub const PRODUCTION_LOGIN_HOST: &str = "login.salesforce.com";

/// Upper bound on records in one composite sobjects request
pub const MAX_RECORDS_PER_REQUEST: usize = 100;

pub const USER_AGENT: &str = concat!("salesforce-seed/", env!("CARGO_PKG_VERSION"));

/// Standard headers for Salesforce requests
pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    pub const CONTENT_TYPE_SOAP: &str = "text/xml; charset=UTF-8";

    /// SOAPAction header value for the partner login call
    pub const SOAP_ACTION_LOGIN: &str = "login";
}

pub fn login_host(sandbox: bool) -> &'static str {
    if sandbox {
        SANDBOX_LOGIN_HOST
    } else {
        PRODUCTION_LOGIN_HOST
    }
}

/// Partner SOAP endpoint used for username/password login
pub fn soap_login_endpoint(login_host: &str, version: &str) -> String {
    format!("https://{}/services/Soap/u/{}", login_host, version)
}

/// Base REST path with version, e.g. `/services/data/v59.0`
pub fn api_path(version: &str) -> String {
    format!("/services/data/v{}", version)
}

pub fn query_endpoint(instance_url: &str, version: &str) -> String {
    format!("{}{}/query", instance_url, api_path(version))
}

/// Query endpoint with the SOQL text URL-encoded into `q`
pub fn query_url(instance_url: &str, version: &str, soql: &str) -> String {
    format!("{}?q={}", query_endpoint(instance_url, version), urlencoding::encode(soql))
}

/// sObject Collections endpoint for multi-record create
pub fn composite_sobjects_endpoint(instance_url: &str, version: &str) -> String {
    format!("{}{}/composite/sobjects", instance_url, api_path(version))
}
