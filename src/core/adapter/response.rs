use crate::core::adapter::request::PARAM_PLACEMENT_ID;
use crate::core::models::response::{BID_TTL_SECS, BidMedia, BidResponse, NativeBid, NativeImage};
use crate::core::models::server::{ServerRequest, ServerResponse};
use crate::core::models::vendor::{VendorAd, VendorBid, VendorImage};
use crate::core::query::{QueryString, encode_uri_component};
use tracing::{debug, warn};

/// Flux bids are always reported net of fees
const NET_REVENUE: bool = true;

fn native_image(image: VendorImage) -> NativeImage {
    NativeImage {
        url: image.url,
        width: image.width,
        height: image.height,
    }
}

fn normalize(bid: VendorBid) -> BidResponse {
    let (pricing, ad) = bid.classify();

    let media = match ad {
        VendorAd::Native(native) => BidMedia::Native {
            native: NativeBid {
                title: native.title,
                body: native.description,
                cta: native.cta,
                sponsored_by: native.advertiser,
                click_url: native.landing_url.as_deref().map(encode_uri_component),
                impression_trackers: native.trackings,
                image: native.screenshots.map(native_image),
                icon: native.icon.map(native_image),
            },
        },
        VendorAd::Banner(banner) => BidMedia::Banner {
            ad: banner.adm,
            width: banner.width,
            height: banner.height,
        },
    };

    BidResponse {
        request_id: pricing.requestid,
        cpm: pricing.price,
        creative_id: pricing.creative_id,
        currency: pricing.cur,
        net_revenue: NET_REVENUE,
        ttl: BID_TTL_SECS,
        media,
    }
}

/// Unpacks a vendor response into at most one bid.
///
/// The placement is read back from the originating request's own
/// query string, never from auction state, so a response can only
/// ever fill the request that produced it.
///
/// # Behavior
/// Returns an empty list when there is no body or no entry for the
/// placement. A present entry always gives exactly one bid, with
/// missing or wrongly typed fields left out.
pub fn interpret_response(response: &ServerResponse, request: &ServerRequest) -> Vec<BidResponse> {
    let query = QueryString::parse(&request.data);

    let placement_id = match query.get_string(PARAM_PLACEMENT_ID) {
        Some(id) => id,
        None => {
            warn!("Request to {} carries no placement id", request.url);
            return Vec::new();
        }
    };

    let body = match &response.body {
        Some(body) => body,
        None => {
            debug!("Empty response for placement {}", placement_id);
            return Vec::new();
        }
    };

    let bid = match body.bid(placement_id) {
        Some(bid) => bid,
        None => {
            debug!("No fill for placement {}", placement_id);
            return Vec::new();
        }
    };

    let bid_response = normalize(bid);
    debug!(
        "Placement {} filled, cpm {:?} {}",
        placement_id,
        bid_response.cpm,
        if bid_response.is_banner() { "banner" } else { "native" }
    );

    vec![bid_response]
}
