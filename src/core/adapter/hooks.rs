use crate::core::models::response::BidResponse;
use serde::{Deserialize, Serialize};

/// Reported by the host for a bid that didn't answer in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeoutData {
    pub bidder: String,
    pub bid_id: String,
    pub ad_unit_code: Option<String>,
    pub auction_id: Option<String>,
    /// Auction timeout in milliseconds
    pub timeout: u64,
}

/// Host lifecycle callbacks. Every hook defaults to doing nothing
pub trait LifecycleHooks {
    fn on_timeout(&self, _timeouts: &[TimeoutData]) {}

    fn on_bid_won(&self, _bid: &BidResponse) {}

    fn on_set_targeting(&self, _bid: &BidResponse) {}
}
