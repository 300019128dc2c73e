use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumString};

/// Media formats the adapter can bid on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaType {
    Banner,
    Native,
}

/// Currencies the vendor will price in. Anything else
/// is rejected at validation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString)]
pub enum Currency {
    #[strum(serialize = "USD")]
    Usd,
    #[strum(serialize = "JPY")]
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Usd, Currency::Jpy];
}

/// Vendor assigned placement key. Hosts send it either as
/// a json number or a string, so both are accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlacementId {
    Numeric(u64),
    Text(String),
}

impl PlacementId {
    /// True for values the vendor treats as unset, e.g. 0 or ""
    pub fn is_blank(&self) -> bool {
        match self {
            PlacementId::Numeric(id) => *id == 0,
            PlacementId::Text(id) => id.is_empty(),
        }
    }
}

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementId::Numeric(id) => write!(f, "{}", id),
            PlacementId::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for PlacementId {
    fn from(id: u64) -> Self {
        PlacementId::Numeric(id)
    }
}

impl From<&str> for PlacementId {
    fn from(id: &str) -> Self {
        PlacementId::Text(id.to_string())
    }
}

/// Vendor specific params attached to a bid by the publisher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Builder)]
#[serde(default, rename_all = "camelCase")]
#[builder(default, setter(into, strip_option))]
pub struct BidParams {
    pub placement_id: Option<PlacementId>,
    /// Raw currency code, validated against ['Currency']
    pub currency: Option<String>,
}

/// Requirements for a single native asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Builder)]
#[serde(default)]
#[builder(default)]
pub struct AssetRequirement {
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<u32>,
}

/// Native capability declared on an ad unit. Its presence
/// alone routes the bid to the native endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Builder)]
#[serde(default, rename_all = "camelCase")]
#[builder(default, setter(strip_option))]
pub struct NativeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<AssetRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<AssetRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<AssetRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<AssetRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsored_by: Option<AssetRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_url: Option<AssetRequirement>,
}

/// One ad slot's participation in an auction, owned by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Builder)]
#[serde(default, rename_all = "camelCase")]
#[builder(default)]
pub struct BidRequest {
    #[builder(setter(into))]
    pub bid_id: String,
    pub params: BidParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(strip_option))]
    pub native_params: Option<NativeParams>,
    pub sizes: Vec<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    pub ad_unit_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    pub bidder_request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    pub auction_id: Option<String>,
}

impl BidRequest {
    pub fn is_native(&self) -> bool {
        self.native_params.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Browsing context shared by every bid in one build cycle. The
/// caller captures it once; nothing in the adapter reads globals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Builder)]
#[serde(default, rename_all = "camelCase")]
#[builder(default)]
pub struct AuctionContext {
    /// Page referer, if the host could determine one
    #[builder(setter(into, strip_option))]
    pub referer: Option<String>,
    /// Vendor limited ad tracking flag, inverted into `adtk`
    pub limit_ad_tracking: bool,
    #[builder(setter(strip_option))]
    pub viewport: Option<Viewport>,
    /// Page renders in its own top level browsing context
    pub top_frame: bool,
    #[builder(setter(into))]
    pub user_agent: String,
}
