use crate::app::config::BidderSettings;
use crate::core::models::bid::{AuctionContext, BidRequest};
use crate::core::models::server::{HttpMethod, ServerRequest};
use crate::core::query::QueryString;
use anyhow::Error;
use rand::Rng;
use tracing::{debug, trace};

/// Exclusive upper bound of the `cb` cache buster
pub const CACHE_BUSTER_MAX: i64 = 99_999_999_999;

pub const PARAM_PLACEMENT_ID: &str = "placementid";
pub const PARAM_REQUEST_ID: &str = "requestid";

const NATIVE_API_VERSION: &str = "1.1.0";

/// Builds the vendor GET request for one bid. Param order is fixed
/// so the encoded string is stable apart from the cache buster
pub fn build_request<R: Rng>(
    bid: &BidRequest,
    context: &AuctionContext,
    settings: &BidderSettings,
    rng: &mut R,
) -> Result<ServerRequest, Error> {
    let placement_id = bid
        .params
        .placement_id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();
    let currency = bid
        .params
        .currency
        .as_deref()
        .unwrap_or(&settings.default_currency);
    let referer = context.referer.as_deref().unwrap_or("");
    let adtk = if context.limit_ad_tracking { "0" } else { "1" };

    let mut query = QueryString::new();
    query
        .add_string(PARAM_PLACEMENT_ID, &placement_id)?
        .add_string("cur", currency)?
        .add_string("ua", &context.user_agent)?
        .add_string("adtk", adtk)?
        .add_string("loc", referer)?
        .add_int("topframe", context.top_frame as i64)?
        .add_opt_int("sw", context.viewport.map(|v| v.width as i64))?
        .add_opt_int("sh", context.viewport.map(|v| v.height as i64))?
        .add_int("cb", rng.random_range(0..CACHE_BUSTER_MAX))?
        .add_int("tpaf", 1)?
        .add_int("cks", 1)?
        .add_string(PARAM_REQUEST_ID, &bid.bid_id)?
        .add_string("referer", referer)?;

    let url = if bid.is_native() {
        // tkf asks the vendor to return tracker urls
        query
            .add_int("tkf", 1)?
            .add_string("ad_track", "1")?
            .add_string("apiv", NATIVE_API_VERSION)?;
        &settings.native_endpoint
    } else {
        &settings.banner_endpoint
    };

    query.finalize();
    let data = query.encode()?;

    trace!("Built request for bid {}: {}?{}", bid.bid_id, url, data);

    Ok(ServerRequest {
        method: HttpMethod::Get,
        url: url.clone(),
        data,
    })
}

/// Builds one request per bid, preserving input order
pub fn build_requests<R: Rng>(
    bids: &[BidRequest],
    context: &AuctionContext,
    settings: &BidderSettings,
    rng: &mut R,
) -> Result<Vec<ServerRequest>, Error> {
    let requests = bids
        .iter()
        .map(|bid| build_request(bid, context, settings, rng))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Built {} vendor requests", requests.len());

    Ok(requests)
}
