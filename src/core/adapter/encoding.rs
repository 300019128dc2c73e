use crate::core::models::server::ServerResponse;
use crate::core::models::vendor::VendorResponse;
use anyhow::anyhow;
use bytes::Bytes;

pub struct ResponseDecoder;

impl ResponseDecoder {
    fn decode_json(bytes: &Bytes) -> Result<VendorResponse, anyhow::Error> {
        serde_json::from_slice(bytes.as_ref())
            .map_err(|e| anyhow!("Failed decoding vendor json response: {}", e))
    }

    /// Decodes a raw vendor body for the host. An empty or
    /// whitespace body is a valid no fill, not an error
    pub fn decode(bytes: &Bytes) -> Result<ServerResponse, anyhow::Error> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ServerResponse::empty());
        }

        Ok(ServerResponse::new(Self::decode_json(bytes)?))
    }
}
