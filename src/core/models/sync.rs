use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Kind of deployment for a user sync URL, e.g. img or iframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SyncKind {
    /// User sync deployed as a single img pixel
    Image,
    /// User sync deployed as an iframe, can contain multiple downstream syncs
    Iframe,
}

/// A user sync pixel the host should drop on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSync {
    #[serde(rename = "type")]
    pub kind: SyncKind,
    pub url: String,
}

/// Which sync kinds the publisher allows. The vendor only
/// offers an image pixel so this is informational
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncOptions {
    pub pixel_enabled: bool,
    pub iframe_enabled: bool,
}
