use serde::{Deserialize, Serialize};

/// Seconds a flux bid stays usable
pub const BID_TTL_SECS: u32 = 700;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeBid {
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsored_by: Option<String>,
    /// Landing url, already uri component encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_url: Option<String>,
    pub impression_trackers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<NativeImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<NativeImage>,
}

/// The creative payload of a bid, exactly one format per bid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mediaType", rename_all = "lowercase")]
pub enum BidMedia {
    Banner {
        #[serde(skip_serializing_if = "Option::is_none")]
        ad: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    Native {
        native: NativeBid,
    },
}

/// A bid normalized into the shape the host auction understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidResponse {
    pub request_id: Option<String>,
    pub cpm: Option<f64>,
    pub creative_id: Option<String>,
    pub currency: Option<String>,
    pub net_revenue: bool,
    pub ttl: u32,
    #[serde(flatten)]
    pub media: BidMedia,
}

impl BidResponse {
    #[allow(dead_code)]
    pub fn native(&self) -> Option<&NativeBid> {
        match &self.media {
            BidMedia::Native { native } => Some(native),
            BidMedia::Banner { .. } => None,
        }
    }

    pub fn is_banner(&self) -> bool {
        matches!(self.media, BidMedia::Banner { .. })
    }
}
