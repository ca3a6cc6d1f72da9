//! Salesforce session management.
//!
//! Provides [`SalesforceSession`] which implements [`CrmSession`] for one
//! logged-in organization: REST calls for query/search/describe and the SOAP
//! `logout` call.

use super::error::{Result, SalesforceError};
use super::limit::{LIMIT_INFO_HEADER, parse_limit_info};
use super::protocol::{describe_url, query_url, rest_error, search_url, soap_endpoint};
use super::soap::{logout_envelope, parse_logout_response};
use async_trait::async_trait;
use eforce_application::ports::crm_gateway::{CrmSession, GatewayError};
use eforce_domain::{
    LimitInfo, QueryResult, SObjectDescribe, SObjectName, SearchResult, Session, SoqlQuery,
    SoslSearch,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use serde::de::DeserializeOwned;
use std::sync::Mutex;
use tracing::{debug, trace};

/// An authenticated connection to one organization.
///
/// Keeps the limit usage reported by the most recent response so it can be
/// attached to the next envelope.
pub struct SalesforceSession {
    client: reqwest::Client,
    session: Session,
    api_version: String,
    limit_info: Mutex<Option<LimitInfo>>,
}

impl SalesforceSession {
    pub fn new(client: reqwest::Client, session: Session, api_version: impl Into<String>) -> Self {
        Self {
            client,
            session,
            api_version: api_version.into(),
            limit_info: Mutex::new(None),
        }
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn record_limits(&self, headers: &HeaderMap) {
        let Some(info) = headers
            .get(LIMIT_INFO_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_limit_info)
        else {
            return;
        };
        if let Ok(mut slot) = self.limit_info.lock() {
            *slot = Some(info);
        }
    }

    /// Authenticated GET returning a JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, q: Option<&str>) -> Result<T> {
        let mut request = self
            .client
            .get(url)
            .bearer_auth(self.session.access_token().expose())
            .header(ACCEPT, "application/json");
        if let Some(q) = q {
            request = request.query(&[("q", q)]);
        }

        let response = request.send().await?;
        self.record_limits(response.headers());
        let status = response.status();
        let body = response.text().await?;
        trace!("GET {} -> {}: {}", url, status, body);

        if !status.is_success() {
            return Err(rest_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn soap_logout(&self) -> Result<()> {
        let endpoint = soap_endpoint(self.session.instance_url(), &self.api_version);
        let response = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=UTF-8")
            .header("SOAPAction", "logout")
            .body(logout_envelope(self.session.access_token().expose()))
            .send()
            .await?;
        self.record_limits(response.headers());
        let status = response.status();
        let body = response.text().await?;
        trace!("POST {} -> {}: {}", endpoint, status, body);

        match parse_logout_response(&body) {
            Err(SalesforceError::MissingElement(_) | SalesforceError::Xml(_))
                if !status.is_success() =>
            {
                Err(SalesforceError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
            other => other,
        }
    }
}

#[async_trait]
impl CrmSession for SalesforceSession {
    fn session(&self) -> &Session {
        &self.session
    }

    fn limit_info(&self) -> Option<LimitInfo> {
        self.limit_info.lock().ok().and_then(|slot| *slot)
    }

    async fn logout(&self) -> std::result::Result<(), GatewayError> {
        debug!("Logging out of {}", self.session.org_id());
        Ok(self.soap_logout().await?)
    }

    async fn query(&self, soql: &SoqlQuery) -> std::result::Result<QueryResult, GatewayError> {
        let url = query_url(self.session.instance_url(), &self.api_version);
        Ok(self.get_json(&url, Some(soql.as_str())).await?)
    }

    async fn search(&self, sosl: &SoslSearch) -> std::result::Result<SearchResult, GatewayError> {
        let url = search_url(self.session.instance_url(), &self.api_version);
        Ok(self.get_json(&url, Some(sosl.as_str())).await?)
    }

    async fn describe(
        &self,
        sobject: &SObjectName,
    ) -> std::result::Result<SObjectDescribe, GatewayError> {
        let url = describe_url(
            self.session.instance_url(),
            &self.api_version,
            sobject.as_str(),
        );
        Ok(self.get_json(&url, None).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::salesforce::test_support::{StubResponse, serve};
    use eforce_domain::{AccessToken, OrgId};

    fn session_at(url: &str) -> SalesforceSession {
        SalesforceSession::new(
            reqwest::Client::new(),
            Session::new(
                OrgId::new("00DACME").unwrap(),
                "005000000000001",
                url,
                AccessToken::new("00D!token"),
            ),
            "58.0",
        )
    }

    #[tokio::test]
    async fn test_query_sends_bearer_and_records_limits() {
        let (url, server) = serve(vec![StubResponse::new(
            200,
            r#"{"totalSize":1,"done":true,"records":[{"attributes":{"type":"Account"},"Id":"001A"}]}"#,
        )
        .header("Sforce-Limit-Info", "api-usage=12/15000")])
        .await;
        let session = session_at(&url);
        assert!(session.limit_info().is_none());

        let result = session
            .query(&SoqlQuery::new("SELECT Id FROM Account").unwrap())
            .await
            .unwrap();

        assert_eq!(result.total_size, 1);
        assert_eq!(result.records[0]["Id"], "001A");
        assert_eq!(
            session.limit_info(),
            Some(LimitInfo::with_api_usage(12, 15000))
        );

        let request = server.await.unwrap().remove(0).to_lowercase();
        assert!(request.starts_with("get /services/data/v58.0/query?q=select+id+from+account "));
        assert!(request.contains("authorization: bearer 00d!token"));
    }

    #[tokio::test]
    async fn test_search_and_describe_paths() {
        let (url, server) = serve(vec![
            StubResponse::new(200, r#"{"searchRecords":[{"Id":"001A"},{"Id":"003B"}]}"#),
            StubResponse::new(
                200,
                r#"{"name":"Account","fields":[{"name":"Id"},{"name":"Name"}]}"#,
            ),
        ])
        .await;
        let session = session_at(&url);

        let found = session
            .search(&SoslSearch::new("FIND {Acme}").unwrap())
            .await
            .unwrap();
        assert_eq!(found.search_records.len(), 2);

        let describe = session
            .describe(&SObjectName::new("Account").unwrap())
            .await
            .unwrap();
        assert_eq!(describe.field_names().collect::<Vec<_>>(), ["Id", "Name"]);

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("GET /services/data/v58.0/search?q="));
        assert!(requests[1].starts_with("GET /services/data/v58.0/sobjects/Account/describe "));
    }

    #[tokio::test]
    async fn test_rest_error_becomes_api_error() {
        let (url, _server) = serve(vec![StubResponse::new(
            400,
            r#"[{"message":"unexpected token: FORM","errorCode":"MALFORMED_QUERY"}]"#,
        )])
        .await;

        let err = session_at(&url)
            .query(&SoqlQuery::new("SELECT Id FORM Account").unwrap())
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::api("MALFORMED_QUERY", "unexpected token: FORM"));
    }

    #[tokio::test]
    async fn test_logout_posts_session_header() {
        let (url, server) = serve(vec![StubResponse::new(
            200,
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body><logoutResponse/></soapenv:Body></soapenv:Envelope>"#,
        )])
        .await;

        session_at(&url).logout().await.unwrap();

        let request = server.await.unwrap().remove(0);
        assert!(request.starts_with("POST /services/Soap/u/58.0 "));
        assert!(request.contains("<urn:sessionId>00D!token</urn:sessionId>"));
    }

    #[tokio::test]
    async fn test_logout_html_error_page() {
        let (url, _server) =
            serve(vec![StubResponse::new(503, "<html>maintenance</html>")]).await;

        let err = session_at(&url).logout().await.unwrap_err();
        assert_eq!(err.error_code(), "UNEXPECTED_RESPONSE");
    }
}
