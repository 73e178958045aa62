//! Lookup attempts against the Slovak business registries.
//!
//! Primary source is the Register organizácií of the Statistical Office
//! (registeruz.sk, free and official). An optional commercial source
//! (FinStat-style API, Bearer key) can be queried as a secondary tier.
//! Every attempt reports an explicit [`LookupOutcome`]; network failures are
//! classified, never raised.

use std::io;

use serde::Deserialize;

use super::IcoRecord;

/// Result of a single registry lookup attempt.
#[derive(Debug)]
pub enum LookupOutcome {
    Found(IcoRecord),
    /// Non-200 response or an empty payload: the id is not registered
    NotFound,
    Timeout,
    TransportError(String),
}

/// Unit record as returned by the registeruz.sk public API.
#[derive(Debug, Deserialize)]
struct RegistryUnit {
    #[serde(rename = "nazovUJ")]
    name: Option<String>,
    #[serde(rename = "obchodneMeno")]
    trade_name: Option<String>,
    ulica: Option<String>,
    mesto: Option<String>,
    psc: Option<String>,
    #[serde(rename = "pravnaForma")]
    legal_form: Option<String>,
    dic: Option<String>,
    #[serde(rename = "icDph")]
    ic_dph: Option<String>,
    stav: Option<String>,
    #[serde(rename = "datumZapisu")]
    registered: Option<String>,
}

impl RegistryUnit {
    fn address(&self) -> Option<String> {
        let parts: Vec<&str> = [self.ulica.as_deref(), self.mesto.as_deref(), self.psc.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Query the official register. The payload is a JSON array of units; an
/// empty array or a non-200 status means "not registered".
pub fn lookup_registry(agent: &ureq::Agent, base_url: &str, ico: &str) -> LookupOutcome {
    let url = format!("{base_url}/cruz-public/api/uctovnej-jednotky");
    let raw = match agent.get(&url).query("ico", ico).call() {
        Ok(response) => match response.into_json::<serde_json::Value>() {
            Ok(raw) => raw,
            Err(err) => return LookupOutcome::TransportError(err.to_string()),
        },
        Err(err) => return classify_error(err),
    };

    let units: Vec<RegistryUnit> = match serde_json::from_value(raw.clone()) {
        Ok(units) => units,
        Err(err) => return LookupOutcome::TransportError(err.to_string()),
    };

    let unit = match units.into_iter().next() {
        Some(unit) => unit,
        None => return LookupOutcome::NotFound,
    };

    LookupOutcome::Found(IcoRecord {
        ico: ico.to_string(),
        valid: true,
        source: Some("registeruz.sk".to_string()),
        company_name: unit.name.clone().or_else(|| unit.trade_name.clone()),
        address: unit.address(),
        legal_form: unit.legal_form.clone(),
        dic: unit.dic.clone(),
        ic_dph: unit.ic_dph.clone(),
        status: unit.stav.clone(),
        registered: unit.registered.clone(),
        error: None,
        raw: Some(raw),
    })
}

/// Detail record as returned by the commercial API.
#[derive(Debug, Deserialize)]
struct SecondaryDetail {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "LegalForm")]
    legal_form: Option<String>,
    #[serde(rename = "Address")]
    address: Option<String>,
    #[serde(rename = "Dic")]
    dic: Option<String>,
    #[serde(rename = "IcDph")]
    ic_dph: Option<String>,
    #[serde(rename = "Status")]
    status: Option<String>,
    #[serde(rename = "Created")]
    created: Option<String>,
}

/// Query the commercial secondary source.
pub fn lookup_secondary(
    agent: &ureq::Agent,
    base_url: &str,
    api_key: &str,
    ico: &str,
) -> LookupOutcome {
    let raw = match agent
        .get(base_url)
        .query("ico", ico)
        .set("Authorization", &format!("Bearer {api_key}"))
        .call()
    {
        Ok(response) => match response.into_json::<serde_json::Value>() {
            Ok(raw) => raw,
            Err(err) => return LookupOutcome::TransportError(err.to_string()),
        },
        Err(err) => return classify_error(err),
    };

    let detail: SecondaryDetail = match serde_json::from_value(raw.clone()) {
        Ok(detail) => detail,
        Err(err) => return LookupOutcome::TransportError(err.to_string()),
    };

    LookupOutcome::Found(IcoRecord {
        ico: ico.to_string(),
        valid: true,
        source: Some("finstat.sk".to_string()),
        company_name: detail.name.clone(),
        address: detail.address.clone(),
        legal_form: detail.legal_form.clone(),
        dic: detail.dic.clone(),
        ic_dph: detail.ic_dph.clone(),
        status: detail.status.clone(),
        registered: detail.created.clone(),
        error: None,
        raw: Some(raw),
    })
}

fn classify_error(err: ureq::Error) -> LookupOutcome {
    match err {
        // Absence of a record is not a distinguishable error class upstream
        ureq::Error::Status(_, _) => LookupOutcome::NotFound,
        ureq::Error::Transport(transport) => {
            if is_timeout(&transport) {
                LookupOutcome::Timeout
            } else {
                LookupOutcome::TransportError(transport.to_string())
            }
        }
    }
}

/// Walk the error source chain for an io timeout. Error message text is
/// locale and implementation dependent, the io kind is not.
fn is_timeout(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return matches!(
                io_err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            );
        }
        source = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(5))
            .build()
    }

    #[test]
    fn registry_maps_first_unit() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/cruz-public/api/uctovnej-jednotky?ico=12345678")
            .with_status(200)
            .with_body(
                r#"[{
                    "nazovUJ": "Example s.r.o.",
                    "ulica": "Hlavná 1",
                    "mesto": "Bratislava",
                    "psc": "81101",
                    "pravnaForma": "112",
                    "dic": "2020000000",
                    "icDph": "SK2020000000",
                    "stav": "AKTÍVNA",
                    "datumZapisu": "2010-01-01"
                }]"#,
            )
            .create();

        let outcome = lookup_registry(&agent(), &server.url(), "12345678");
        let record = match outcome {
            LookupOutcome::Found(record) => record,
            other => panic!("expected Found, got {other:?}"),
        };
        assert_eq!(record.company_name.as_deref(), Some("Example s.r.o."));
        assert_eq!(record.address.as_deref(), Some("Hlavná 1, Bratislava, 81101"));
        assert_eq!(record.source.as_deref(), Some("registeruz.sk"));
        assert_eq!(record.status.as_deref(), Some("AKTÍVNA"));
        assert!(record.raw.is_some());
    }

    #[test]
    fn registry_falls_back_to_trade_name() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/cruz-public/api/uctovnej-jednotky?ico=12345678")
            .with_status(200)
            .with_body(r#"[{"obchodneMeno": "Trade Name"}]"#)
            .create();

        match lookup_registry(&agent(), &server.url(), "12345678") {
            LookupOutcome::Found(record) => {
                assert_eq!(record.company_name.as_deref(), Some("Trade Name"));
                assert_eq!(record.address, None);
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn empty_payload_is_not_found() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/cruz-public/api/uctovnej-jednotky?ico=12345678")
            .with_status(200)
            .with_body("[]")
            .create();

        assert!(matches!(
            lookup_registry(&agent(), &server.url(), "12345678"),
            LookupOutcome::NotFound
        ));
    }

    #[test]
    fn non_200_is_not_found() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/cruz-public/api/uctovnej-jednotky?ico=12345678")
            .with_status(404)
            .create();

        assert!(matches!(
            lookup_registry(&agent(), &server.url(), "12345678"),
            LookupOutcome::NotFound
        ));
    }

    #[test]
    fn malformed_payload_is_transport_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/cruz-public/api/uctovnej-jednotky?ico=12345678")
            .with_status(200)
            .with_body("not json")
            .create();

        assert!(matches!(
            lookup_registry(&agent(), &server.url(), "12345678"),
            LookupOutcome::TransportError(_)
        ));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("request failed")]
    struct FailedRequest(#[source] io::Error);

    #[test]
    fn timeout_detection_uses_io_kind_not_message_text() {
        // Localized message without the English phrase
        let timed_out = FailedRequest(io::Error::new(
            io::ErrorKind::TimedOut,
            "Zeitüberschreitung der Verbindung",
        ));
        assert!(is_timeout(&timed_out));

        // English phrase in the message, but not a timeout
        let refused = FailedRequest(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "proxy said: upstream timed out",
        ));
        assert!(!is_timeout(&refused));
    }

    #[test]
    fn secondary_maps_detail_fields() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/?ico=12345678")
            .match_header("Authorization", "Bearer test-key")
            .with_status(200)
            .with_body(
                r#"{
                    "Name": "Example s.r.o.",
                    "LegalForm": "s.r.o.",
                    "Address": "Hlavná 1, Bratislava",
                    "Dic": "2020000000",
                    "IcDph": "SK2020000000",
                    "Status": "active",
                    "Created": "2010-01-01"
                }"#,
            )
            .create();

        match lookup_secondary(&agent(), &server.url(), "test-key", "12345678") {
            LookupOutcome::Found(record) => {
                assert_eq!(record.source.as_deref(), Some("finstat.sk"));
                assert_eq!(record.company_name.as_deref(), Some("Example s.r.o."));
                assert_eq!(record.registered.as_deref(), Some("2010-01-01"));
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }
}
