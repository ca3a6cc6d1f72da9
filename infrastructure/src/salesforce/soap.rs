//! SOAP envelopes for the partner API `login` and `logout` calls
//!
//! Only the handful of elements the adapter needs are read back, using a
//! pull parser over the response body. Faults are detected in the same pass.

use super::error::{Result, SalesforceError};
use quick_xml::Reader;
use quick_xml::escape::{escape, resolve_predefined_entity};
use quick_xml::events::{BytesRef, Event};
use std::collections::HashMap;

const ENVELOPE_OPEN: &str = concat!(
    r#"<?xml version="1.0" encoding="utf-8"?>"#,
    r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" "#,
    r#"xmlns:urn="urn:partner.soap.sforce.com">"#
);
const ENVELOPE_CLOSE: &str = "</soapenv:Envelope>";

/// Body of a `login` call. Values are XML-escaped.
pub fn login_envelope(username: &str, password: &str) -> String {
    format!(
        "{ENVELOPE_OPEN}<soapenv:Body><urn:login>\
         <urn:username>{}</urn:username>\
         <urn:password>{}</urn:password>\
         </urn:login></soapenv:Body>{ENVELOPE_CLOSE}",
        escape(username),
        escape(password)
    )
}

/// Body of a `logout` call for the given session.
pub fn logout_envelope(session_id: &str) -> String {
    format!(
        "{ENVELOPE_OPEN}<soapenv:Header><urn:SessionHeader>\
         <urn:sessionId>{}</urn:sessionId>\
         </urn:SessionHeader></soapenv:Header>\
         <soapenv:Body><urn:logout/></soapenv:Body>{ENVELOPE_CLOSE}",
        escape(session_id)
    )
}

/// Fields of a successful `loginResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub session_id: String,
    pub server_url: String,
    pub user_id: String,
    pub organization_id: String,
}

impl LoginResult {
    /// Scheme and host of `serverUrl`, which is where REST calls go.
    pub fn instance_url(&self) -> &str {
        match self.server_url.find("/services/") {
            Some(idx) => &self.server_url[..idx],
            None => self.server_url.trim_end_matches('/'),
        }
    }
}

pub fn parse_login_response(xml: &str) -> Result<LoginResult> {
    let mut fields = extract(
        xml,
        &[
            "faultcode",
            "faultstring",
            "sessionId",
            "serverUrl",
            "userId",
            "organizationId",
        ],
    )?;
    check_fault(&mut fields)?;

    let mut take = |name: &'static str| {
        fields
            .remove(name)
            .filter(|v| !v.is_empty())
            .ok_or(SalesforceError::MissingElement(name))
    };
    Ok(LoginResult {
        session_id: take("sessionId")?,
        server_url: take("serverUrl")?,
        user_id: take("userId")?,
        organization_id: take("organizationId")?,
    })
}

pub fn parse_logout_response(xml: &str) -> Result<()> {
    let mut fields = extract(xml, &["faultcode", "faultstring", "logoutResponse"])?;
    check_fault(&mut fields)?;
    if fields.contains_key("logoutResponse") {
        Ok(())
    } else {
        Err(SalesforceError::MissingElement("logoutResponse"))
    }
}

fn check_fault(fields: &mut HashMap<&'static str, String>) -> Result<()> {
    let Some(raw_code) = fields.remove("faultcode") else {
        return Ok(());
    };
    // "sf:INVALID_LOGIN" -> "INVALID_LOGIN"
    let code = raw_code
        .rsplit_once(':')
        .map_or(raw_code.as_str(), |(_, c)| c)
        .to_string();
    let raw_message = fields.remove("faultstring").unwrap_or_default();
    let message = raw_message
        .strip_prefix(&format!("{}: ", code))
        .unwrap_or(&raw_message)
        .to_string();
    Err(SalesforceError::Fault { code, message })
}

/// Collect the trimmed text of the first occurrence of each wanted element,
/// matched by local name. Elements that are present but empty map to "".
fn extract(
    xml: &str,
    wanted: &[&'static str],
) -> Result<HashMap<&'static str, String>> {
    let mut reader = Reader::from_str(xml);
    let mut found: HashMap<&'static str, String> = HashMap::new();
    let mut current: Option<&'static str> = None;

    let lookup = |local: &[u8], found: &HashMap<&'static str, String>| {
        wanted
            .iter()
            .copied()
            .find(|w| w.as_bytes() == local && !found.contains_key(w))
    };

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                current = lookup(e.local_name().as_ref(), &found);
                if let Some(name) = current {
                    found.insert(name, String::new());
                }
            }
            Event::Empty(e) => {
                if let Some(name) = lookup(e.local_name().as_ref(), &found) {
                    found.insert(name, String::new());
                }
            }
            Event::End(_) => {
                if let Some(name) = current.take()
                    && let Some(value) = found.get_mut(name)
                {
                    *value = value.trim().to_string();
                }
            }
            Event::Text(t) => {
                if let Some(value) = current.and_then(|name| found.get_mut(name)) {
                    value.push_str(&t.decode().map_err(xml_error)?);
                }
            }
            Event::GeneralRef(r) => {
                if let Some(value) = current.and_then(|name| found.get_mut(name)) {
                    value.push_str(&resolve_reference(&r)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(found)
}

fn resolve_reference(r: &BytesRef<'_>) -> Result<String> {
    if let Some(ch) = r.resolve_char_ref().map_err(xml_error)? {
        return Ok(ch.to_string());
    }
    let name = r.decode().map_err(xml_error)?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| SalesforceError::Xml(format!("unknown entity &{};", name)))
}

fn xml_error(e: impl std::fmt::Display) -> SalesforceError {
    SalesforceError::Xml(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_OK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com">
  <soapenv:Body>
    <loginResponse>
      <result>
        <metadataServerUrl>https://acme.my.salesforce.com/services/Soap/m/58.0/00DACME</metadataServerUrl>
        <passwordExpired>false</passwordExpired>
        <sandbox>false</sandbox>
        <serverUrl>https://acme.my.salesforce.com/services/Soap/u/58.0/00DACME</serverUrl>
        <sessionId>00DACME!AQ4AQ&amp;token</sessionId>
        <userId>005000000000001</userId>
        <userInfo>
          <organizationId>00DACME</organizationId>
          <organizationName>Acme &amp; Co</organizationName>
          <userId>005000000000001</userId>
        </userInfo>
      </result>
    </loginResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

    const LOGIN_FAULT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:sf="urn:fault.partner.soap.sforce.com">
  <soapenv:Body>
    <soapenv:Fault>
      <faultcode>sf:INVALID_LOGIN</faultcode>
      <faultstring>INVALID_LOGIN: Invalid username, password, security token; or user locked out.</faultstring>
    </soapenv:Fault>
  </soapenv:Body>
</soapenv:Envelope>"#;

    #[test]
    fn test_login_envelope_escapes_values() {
        let body = login_envelope("a<b>@acme.com", "p&ss\"TOKEN");
        assert!(body.contains("<urn:username>a&lt;b&gt;@acme.com</urn:username>"));
        assert!(body.contains("<urn:password>p&amp;ss&quot;TOKEN</urn:password>"));
        assert!(body.ends_with("</soapenv:Envelope>"));
    }

    #[test]
    fn test_logout_envelope_carries_session_header() {
        let body = logout_envelope("00D!abc");
        assert!(body.contains("<urn:SessionHeader><urn:sessionId>00D!abc</urn:sessionId>"));
        assert!(body.contains("<urn:logout/>"));
    }

    #[test]
    fn test_parse_login_response() {
        let result = parse_login_response(LOGIN_OK).unwrap();
        assert_eq!(result.session_id, "00DACME!AQ4AQ&token");
        assert_eq!(result.user_id, "005000000000001");
        assert_eq!(result.organization_id, "00DACME");
        assert_eq!(result.instance_url(), "https://acme.my.salesforce.com");
    }

    #[test]
    fn test_parse_login_fault() {
        match parse_login_response(LOGIN_FAULT) {
            Err(SalesforceError::Fault { code, message }) => {
                assert_eq!(code, "INVALID_LOGIN");
                assert_eq!(
                    message,
                    "Invalid username, password, security token; or user locked out."
                );
            }
            other => panic!("expected fault, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_login_missing_session() {
        let xml = "<Envelope><Body><loginResponse><result><serverUrl>https://x</serverUrl></result></loginResponse></Body></Envelope>";
        assert!(matches!(
            parse_login_response(xml),
            Err(SalesforceError::MissingElement("sessionId"))
        ));
    }

    #[test]
    fn test_parse_logout_response() {
        let ok = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body><logoutResponse/></soapenv:Body></soapenv:Envelope>"#;
        assert!(parse_logout_response(ok).is_ok());

        let fault = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body><soapenv:Fault><faultcode>sf:INVALID_SESSION_ID</faultcode><faultstring>INVALID_SESSION_ID: Invalid Session ID found in SessionHeader</faultstring></soapenv:Fault></soapenv:Body></soapenv:Envelope>"#;
        assert!(matches!(
            parse_logout_response(fault),
            Err(SalesforceError::Fault { ref code, .. }) if code == "INVALID_SESSION_ID"
        ));
    }

    #[test]
    fn test_non_xml_body_is_rejected() {
        assert!(parse_login_response("<html><body>Service Unavailable").is_err());
    }
}
