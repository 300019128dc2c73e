//! The flux bidder adapter: validation, vendor request building and
//! response interpretation behind the capability surface a host
//! auction expects from a bidder.

pub mod encoding;
pub mod hooks;
pub mod request;
pub mod response;
pub mod sync;
pub mod validate;

use crate::app::config::BidderSettings;
use crate::core::models::bid::{AuctionContext, BidRequest, MediaType};
use crate::core::models::response::BidResponse;
use crate::core::models::server::{ServerRequest, ServerResponse};
use crate::core::models::sync::{SyncOptions, UserSync};
use anyhow::Error;
use hooks::LifecycleHooks;
use rand::Rng;

const SUPPORTED_MEDIA_TYPES: [MediaType; 2] = [MediaType::Banner, MediaType::Native];

/// What a host needs from a bidder to register and drive it
pub trait BidderAdapter: LifecycleHooks + Send + Sync {
    fn code(&self) -> &str;

    fn supported_media_types(&self) -> &[MediaType];

    fn is_valid(&self, bid: &BidRequest) -> bool;

    /// One request per bid, in input order
    fn build_requests(
        &self,
        bids: &[BidRequest],
        context: &AuctionContext,
    ) -> Result<Vec<ServerRequest>, Error>;

    fn interpret_response(
        &self,
        response: &ServerResponse,
        request: &ServerRequest,
    ) -> Vec<BidResponse>;

    fn user_syncs(&self, options: &SyncOptions, responses: &[ServerResponse]) -> Vec<UserSync>;
}

/// Adapter for the flux ad server. Holds only immutable
/// settings so one instance can serve every auction
#[derive(Debug, Clone, Default)]
pub struct FluxAdapter {
    settings: BidderSettings,
}

impl FluxAdapter {
    pub fn new(settings: BidderSettings) -> Self {
        Self { settings }
    }

    #[allow(dead_code)]
    pub fn settings(&self) -> &BidderSettings {
        &self.settings
    }

    /// Same as ['BidderAdapter::build_requests'] with an explicit
    /// randomness source for the cache buster
    pub fn build_requests_with_rng<R: Rng>(
        &self,
        bids: &[BidRequest],
        context: &AuctionContext,
        rng: &mut R,
    ) -> Result<Vec<ServerRequest>, Error> {
        request::build_requests(bids, context, &self.settings, rng)
    }
}

impl LifecycleHooks for FluxAdapter {}

impl BidderAdapter for FluxAdapter {
    fn code(&self) -> &str {
        &self.settings.code
    }

    fn supported_media_types(&self) -> &[MediaType] {
        &SUPPORTED_MEDIA_TYPES
    }

    fn is_valid(&self, bid: &BidRequest) -> bool {
        validate::is_valid(bid)
    }

    fn build_requests(
        &self,
        bids: &[BidRequest],
        context: &AuctionContext,
    ) -> Result<Vec<ServerRequest>, Error> {
        self.build_requests_with_rng(bids, context, &mut rand::rng())
    }

    fn interpret_response(
        &self,
        response: &ServerResponse,
        request: &ServerRequest,
    ) -> Vec<BidResponse> {
        response::interpret_response(response, request)
    }

    fn user_syncs(&self, options: &SyncOptions, responses: &[ServerResponse]) -> Vec<UserSync> {
        sync::user_syncs(&self.settings.cookie_sync_url, options, responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::adapter::hooks::TimeoutData;
    use crate::core::models::bid::{BidParamsBuilder, BidRequestBuilder, NativeParams};
    use crate::core::models::sync::SyncKind;
    use crate::core::models::vendor::VendorResponse;
    use crate::core::query::QueryString;
    use serde_json::json;

    fn bid(bid_id: &str, placement_id: u64, native: bool) -> BidRequest {
        let mut bid = BidRequestBuilder::default()
            .bid_id(bid_id)
            .params(
                BidParamsBuilder::default()
                    .placement_id(placement_id)
                    .build()
                    .unwrap(),
            )
            .sizes(vec![[300, 250]])
            .build()
            .unwrap();

        if native {
            bid.native_params = Some(NativeParams::default());
        }

        bid
    }

    #[test]
    fn test_capabilities() {
        let adapter = FluxAdapter::default();
        assert_eq!(adapter.code(), "AdCurrent");
        assert_eq!(
            adapter.supported_media_types(),
            &[MediaType::Banner, MediaType::Native]
        );
    }

    #[test]
    fn test_host_flow_end_to_end() {
        let adapter = FluxAdapter::default();
        let mut invalid = bid("b0", 1, false);
        invalid.params.currency = Some("EUR".into());

        let bids = vec![invalid, bid("b1", 1234567, false), bid("b2", 7654321, true)];
        let valid: Vec<BidRequest> = bids.into_iter().filter(|b| adapter.is_valid(b)).collect();
        assert_eq!(valid.len(), 2);

        let context = AuctionContext {
            referer: Some("https://example.com/".into()),
            ..Default::default()
        };
        let requests = adapter.build_requests(&valid, &context).unwrap();
        assert_eq!(requests.len(), 2);

        let body: VendorResponse = serde_json::from_value(json!({
            "1234567": {"requestid": "b1", "price": 0.5, "cur": "JPY", "adm": "<a/>", "width": 300, "height": 250},
            "7654321": {"requestid": "b2", "price": 0.7, "cur": "USD", "title": "t", "landingURL": "https://x.y/"}
        }))
        .unwrap();
        let response = ServerResponse::new(body);

        let banner = adapter.interpret_response(&response, &requests[0]);
        let native = adapter.interpret_response(&response, &requests[1]);

        assert_eq!(banner.len(), 1);
        assert_eq!(banner[0].request_id.as_deref(), Some("b1"));
        assert!(banner[0].is_banner());

        assert_eq!(native.len(), 1);
        assert_eq!(native[0].request_id.as_deref(), Some("b2"));
        assert_eq!(
            native[0].native().unwrap().click_url.as_deref(),
            Some("https%3A%2F%2Fx.y%2F")
        );

        let syncs = adapter.user_syncs(&SyncOptions::default(), &[response]);
        assert_eq!(syncs.len(), 1);
        assert_eq!(syncs[0].kind, SyncKind::Image);

        adapter.on_timeout(&[TimeoutData::default()]);
        adapter.on_set_targeting(&native[0]);
        adapter.on_bid_won(&native[0]);
    }

    #[test]
    fn test_round_trip_recovers_placement() {
        let adapter = FluxAdapter::default();
        let requests = adapter
            .build_requests(&[bid("b1", 42, false), bid("b2", 43, true)], &AuctionContext::default())
            .unwrap();

        for (req, placement) in requests.iter().zip(["42", "43"]) {
            let query = QueryString::parse(&req.data);
            assert_eq!(query.get_string(request::PARAM_PLACEMENT_ID), Some(placement));

            let body: VendorResponse =
                serde_json::from_value(json!({ placement: {"price": 1.0} })).unwrap();
            assert_eq!(
                adapter
                    .interpret_response(&ServerResponse::new(body), req)
                    .len(),
                1
            );
        }
    }

    #[test]
    fn test_custom_settings() {
        let settings = crate::app::config::BidderSettingsBuilder::default()
            .code("FluxStage")
            .banner_endpoint("https://stage.example.com/banner")
            .cookie_sync_url("https://stage.example.com/sync")
            .build()
            .unwrap();
        let adapter = FluxAdapter::new(settings);

        assert_eq!(adapter.code(), "FluxStage");
        let requests = adapter
            .build_requests(&[bid("b1", 1, false)], &AuctionContext::default())
            .unwrap();
        assert_eq!(requests[0].url, "https://stage.example.com/banner");
        assert_eq!(
            adapter.user_syncs(&SyncOptions::default(), &[])[0].url,
            "https://stage.example.com/sync"
        );
        assert_eq!(adapter.settings().native_endpoint, crate::app::config::DEFAULT_NATIVE_ENDPOINT);
    }
}
