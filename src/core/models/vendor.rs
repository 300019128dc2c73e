use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_with::{DefaultOnError, serde_as};
use std::collections::HashMap;
use tracing::warn;

/// Strings pass through, numbers and booleans are rendered as text.
/// Anything else is dropped
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Image or icon attached to a native vendor ad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VendorImage {
    #[serde(deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    pub width: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub height: Option<u32>,
}

/// Impression trackers arrive either as one url or a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Trackings {
    One(String),
    Many(Vec<String>),
}

impl Trackings {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Trackings::One(url) => vec![url],
            Trackings::Many(urls) => urls,
        }
    }
}

/// Raw per placement entry exactly as the vendor sends it.
/// Every field is optional and a field of the wrong type is
/// dropped on its own, so a present entry always decodes
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VendorBid {
    #[serde(deserialize_with = "lenient_string")]
    pub requestid: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(rename = "creativeId", deserialize_with = "lenient_string")]
    pub creative_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub cur: Option<String>,
    // banner
    #[serde(deserialize_with = "lenient_string")]
    pub adm: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    pub width: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub height: Option<u32>,
    // native
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub cta: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub advertiser: Option<String>,
    #[serde(rename = "landingURL", deserialize_with = "lenient_string")]
    pub landing_url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub trackings: Option<Trackings>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub screenshots: Option<VendorImage>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub icon: Option<VendorImage>,
    /// Set when the entry carries a `title` key, whatever its value
    #[serde(skip)]
    pub has_title: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BannerAd {
    pub adm: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeAd {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cta: Option<String>,
    pub advertiser: Option<String>,
    pub landing_url: Option<String>,
    pub trackings: Vec<String>,
    pub screenshots: Option<VendorImage>,
    pub icon: Option<VendorImage>,
}

/// Creative part of a vendor entry, split by format
#[derive(Debug, Clone, PartialEq)]
pub enum VendorAd {
    Banner(BannerAd),
    Native(NativeAd),
}

/// Pricing part of a vendor entry, shared by both formats
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VendorPricing {
    pub requestid: Option<String>,
    pub price: Option<f64>,
    pub creative_id: Option<String>,
    pub cur: Option<String>,
}

impl VendorBid {
    /// Splits the entry into pricing and creative. A `title` key
    /// makes it native no matter which endpoint served it
    pub fn classify(self) -> (VendorPricing, VendorAd) {
        let pricing = VendorPricing {
            requestid: self.requestid,
            price: self.price,
            creative_id: self.creative_id,
            cur: self.cur,
        };

        let ad = if self.has_title {
            VendorAd::Native(NativeAd {
                title: self.title,
                description: self.description,
                cta: self.cta,
                advertiser: self.advertiser,
                landing_url: self.landing_url,
                trackings: self.trackings.map(Trackings::into_vec).unwrap_or_default(),
                screenshots: self.screenshots,
                icon: self.icon,
            })
        } else {
            VendorAd::Banner(BannerAd {
                adm: self.adm,
                width: self.width,
                height: self.height,
            })
        };

        (pricing, ad)
    }
}

/// Vendor response body, keyed by placement id. Entries stay raw
/// until looked up so one bad placement can't spoil the others
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct VendorResponse(HashMap<String, Value>);

#[allow(dead_code)]
impl VendorResponse {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, placement_id: &str) -> bool {
        self.0.contains_key(placement_id)
    }

    /// Decodes the entry for a placement, `None` when the vendor
    /// had no fill for it.
    ///
    /// A present entry always yields a bid. Fields of the wrong type
    /// are left out and an entry that isn't an object has no fields
    pub fn bid(&self, placement_id: &str) -> Option<VendorBid> {
        let entry = self.0.get(placement_id)?;

        let mut bid = match entry {
            Value::Object(_) => serde_json::from_value(entry.clone()).unwrap_or_else(|e| {
                warn!("Bad vendor entry for placement {}: {}", placement_id, e);
                VendorBid::default()
            }),
            _ => {
                warn!("Vendor entry for placement {} is not an object", placement_id);
                VendorBid::default()
            }
        };
        bid.has_title = entry.get("title").is_some();

        Some(bid)
    }
}
