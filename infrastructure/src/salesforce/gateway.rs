//! Salesforce CRM Gateway implementation

use super::error::{Result, SalesforceError};
use super::protocol::soap_endpoint;
use super::session::SalesforceSession;
use super::soap::{login_envelope, parse_login_response};
use async_trait::async_trait;
use eforce_application::ports::crm_gateway::{CrmGateway, CrmSession, GatewayError};
use eforce_domain::{AccessToken, Credentials, OrgId, Session};
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use tracing::{info, trace};

/// Default API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "58.0";

/// CRM Gateway implementation for Salesforce (SOAP login, REST data calls)
pub struct SalesforceGateway {
    client: reqwest::Client,
    api_version: String,
}

impl SalesforceGateway {
    /// Create a new gateway with its own HTTP client
    pub fn new(api_version: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("eforce/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, api_version))
    }

    /// Create a gateway with an existing client (for testing)
    pub fn with_client(client: reqwest::Client, api_version: impl Into<String>) -> Self {
        Self {
            client,
            api_version: api_version.into(),
        }
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    async fn soap_login(&self, credentials: &Credentials) -> Result<SalesforceSession> {
        let endpoint = soap_endpoint(credentials.login_url(), &self.api_version);
        let response = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=UTF-8")
            .header("SOAPAction", "login")
            .body(login_envelope(
                credentials.username(),
                &credentials.combined_password(),
            ))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        trace!("POST {} -> {}", endpoint, status);

        let result = match parse_login_response(&body) {
            Err(SalesforceError::MissingElement(_) | SalesforceError::Xml(_))
                if !status.is_success() =>
            {
                return Err(SalesforceError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            other => other?,
        };

        let org_id = OrgId::new(&result.organization_id)
            .map_err(|_| SalesforceError::MissingElement("organizationId"))?;
        let session = Session::new(
            org_id,
            result.user_id.as_str(),
            result.instance_url(),
            AccessToken::new(result.session_id.as_str()),
        );
        info!(
            "Logged in to {} as {} (org {})",
            session.instance_url(),
            credentials.username(),
            session.org_id()
        );

        Ok(SalesforceSession::new(
            self.client.clone(),
            session,
            self.api_version.clone(),
        ))
    }
}

#[async_trait]
impl CrmGateway for SalesforceGateway {
    async fn login(
        &self,
        credentials: &Credentials,
    ) -> std::result::Result<Arc<dyn CrmSession>, GatewayError> {
        let session = self.soap_login(credentials).await?;
        Ok(Arc::new(session))
    }
}
