use crate::core::models::vendor::VendorResponse;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, AsRefStr, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

/// Describes one call the host should make to the vendor. The
/// params live in `data` as an encoded query string and come
/// back untouched alongside the vendor response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRequest {
    pub method: HttpMethod,
    pub url: String,
    pub data: String,
}

#[allow(dead_code)]
impl ServerRequest {
    /// Endpoint and query joined, for hosts that want one url
    pub fn full_url(&self) -> String {
        if self.data.is_empty() {
            return self.url.clone();
        }

        let sep = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.url, sep, self.data)
    }
}

/// A completed vendor call handed back by the host. A missing
/// body means the vendor answered without content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ServerResponse {
    pub body: Option<VendorResponse>,
}

impl ServerResponse {
    pub fn new(body: VendorResponse) -> Self {
        Self { body: Some(body) }
    }

    pub fn empty() -> Self {
        Self { body: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url() {
        let req = ServerRequest {
            method: HttpMethod::Get,
            url: "https://example.com/banner".into(),
            data: "placementid=1&cur=JPY".into(),
        };
        assert_eq!(req.full_url(), "https://example.com/banner?placementid=1&cur=JPY");

        let req = ServerRequest {
            data: String::new(),
            ..req
        };
        assert_eq!(req.full_url(), "https://example.com/banner");
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(serde_json::to_string(&HttpMethod::Get).unwrap(), "\"GET\"");
    }
}
