use crate::core::adapter::BidderAdapter;
use crate::core::adapter::encoding::ResponseDecoder;
use crate::core::adapter::hooks::TimeoutData;
use crate::core::adapter::request::PARAM_REQUEST_ID;
use crate::core::models::bid::{AuctionContext, BidRequest};
use crate::core::models::response::BidResponse;
use crate::core::models::server::{ServerRequest, ServerResponse};
use crate::core::models::sync::{SyncOptions, UserSync};
use crate::core::query::QueryString;
use anyhow::{Context, Error};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// A recorded auction to play through the adapter. Canned vendor
/// bodies are keyed by bid id. A bid with no entry times out, a
/// `null` entry is an empty body and a string is sent as raw text
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplaySession {
    pub context: AuctionContext,
    pub bids: Vec<BidRequest>,
    pub responses: HashMap<String, Value>,
    pub sync_options: SyncOptions,
    /// Reported to the timeout hook, in milliseconds
    pub timeout: u64,
}

impl ReplaySession {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session {}", path.display()))?;

        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse session {}", path.display()))
    }
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub rejected: Vec<String>,
    pub requests: Vec<ServerRequest>,
    pub bids: Vec<BidResponse>,
    pub timed_out: Vec<String>,
    pub syncs: Vec<UserSync>,
}

/// Turns a canned body into the bytes a host would have received
/// and decodes them. An undecodable body counts as no content
fn decode_canned(request_id: &str, canned: &Value) -> Result<ServerResponse, Error> {
    let raw = match canned {
        Value::Null => Bytes::new(),
        Value::String(text) => Bytes::from(text.clone()),
        body => Bytes::from(serde_json::to_vec(body)?),
    };

    Ok(ResponseDecoder::decode(&raw).unwrap_or_else(|e| {
        warn!("Discarding response for {}: {}", request_id, e);
        ServerResponse::empty()
    }))
}

/// Plays the host's part: filter, build, answer each request from
/// the session, interpret, then collect user syncs
pub fn run<A: BidderAdapter>(adapter: &A, session: &ReplaySession) -> Result<ReplayReport, Error> {
    let mut report = ReplayReport::default();

    let (valid, rejected): (Vec<&BidRequest>, Vec<&BidRequest>) =
        session.bids.iter().partition(|bid| adapter.is_valid(bid));
    report.rejected = rejected.iter().map(|bid| bid.bid_id.clone()).collect();

    let valid: Vec<BidRequest> = valid.into_iter().cloned().collect();
    report.requests = adapter.build_requests(&valid, &session.context)?;

    let mut responses = Vec::with_capacity(report.requests.len());
    let mut timeouts = Vec::new();

    for (bid, request) in valid.iter().zip(report.requests.iter()) {
        let request_id = QueryString::parse(&request.data)
            .get_required_string(PARAM_REQUEST_ID)?
            .to_string();

        let response = match session.responses.get(&request_id) {
            Some(canned) => decode_canned(&request_id, canned)?,
            None => {
                debug!("No canned response for {}, timing out", request_id);
                timeouts.push(TimeoutData {
                    bidder: adapter.code().to_string(),
                    bid_id: request_id,
                    ad_unit_code: bid.ad_unit_code.clone(),
                    auction_id: bid.auction_id.clone(),
                    timeout: session.timeout,
                });
                continue;
            }
        };

        let bids = adapter.interpret_response(&response, request);
        for bid in &bids {
            adapter.on_set_targeting(bid);
            adapter.on_bid_won(bid);
        }

        report.bids.extend(bids);
        responses.push(response);
    }

    if !timeouts.is_empty() {
        warn!("{} requests timed out", timeouts.len());
        adapter.on_timeout(&timeouts);
        report.timed_out = timeouts.into_iter().map(|t| t.bid_id).collect();
    }

    report.syncs = adapter.user_syncs(&session.sync_options, &responses);

    info!(
        "Replayed {} bids for {}: {} rejected, {} sent, {} filled, {} timed out",
        session.bids.len(),
        adapter.code(),
        report.rejected.len(),
        report.requests.len(),
        report.bids.len(),
        report.timed_out.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::adapter::FluxAdapter;
    use crate::core::models::sync::SyncKind;
    use serde_json::json;

    fn session() -> ReplaySession {
        serde_json::from_value(json!({
            "context": {"referer": "https://example.com/", "userAgent": "test-ua", "topFrame": true},
            "bids": [
                {"bidId": "ok-banner", "params": {"placementId": 1234567}},
                {"bidId": "ok-native", "params": {"placementId": "7654321", "currency": "USD"}, "nativeParams": {}},
                {"bidId": "bad-currency", "params": {"placementId": 1, "currency": "EUR"}},
                {"bidId": "no-placement", "params": {}},
                {"bidId": "slow", "params": {"placementId": 555}},
                {"bidId": "empty", "params": {"placementId": 556}},
                {"bidId": "garbled", "params": {"placementId": 557}}
            ],
            "responses": {
                "ok-banner": {"1234567": {"requestid": "ok-banner", "price": 0.092, "adm": "<div/>", "width": 300, "height": 250}},
                "ok-native": {"7654321": {"requestid": "ok-native", "price": 1.2, "title": "t", "trackings": ["https://t.example.com/i"]}},
                "empty": null,
                "garbled": "<html>502 Bad Gateway</html>"
            },
            "timeout": 1000
        }))
        .unwrap()
    }

    #[test]
    fn test_replay_session() {
        let report = run(&FluxAdapter::default(), &session()).unwrap();

        assert_eq!(report.rejected, vec!["bad-currency", "no-placement"]);
        assert_eq!(report.requests.len(), 5);
        assert_eq!(report.bids.len(), 2);
        assert_eq!(report.bids[0].request_id.as_deref(), Some("ok-banner"));
        assert!(report.bids[0].is_banner());
        assert!(report.bids[1].native().is_some());
        assert_eq!(report.timed_out, vec!["slow"]);
        assert_eq!(report.syncs.len(), 1);
        assert_eq!(report.syncs[0].kind, SyncKind::Image);
    }

    #[test]
    fn test_raw_text_body() {
        let json_text = decode_canned("r1", &json!(r#"{"9": {"price": 2.0}}"#)).unwrap();
        assert!(json_text.body.unwrap().contains("9"));

        assert_eq!(decode_canned("r1", &json!("  ")).unwrap(), ServerResponse::empty());
        assert_eq!(decode_canned("r1", &json!("oops")).unwrap(), ServerResponse::empty());
        assert_eq!(decode_canned("r1", &Value::Null).unwrap(), ServerResponse::empty());
    }

    #[test]
    fn test_replay_empty_session() {
        let report = run(&FluxAdapter::default(), &ReplaySession::default()).unwrap();

        assert!(report.requests.is_empty());
        assert!(report.bids.is_empty());
        assert_eq!(report.syncs.len(), 1);
    }

    #[test]
    fn test_load_missing_session() {
        assert!(ReplaySession::load(Path::new("/nonexistent/flux-session.json")).is_err());
    }

    #[test]
    fn test_load_demo_session() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/session.json");
        let session = ReplaySession::load(&path).unwrap();
        let report = run(&FluxAdapter::default(), &session).unwrap();

        assert!(!report.bids.is_empty());
    }
}
