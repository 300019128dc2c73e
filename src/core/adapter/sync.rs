use crate::core::models::server::ServerResponse;
use crate::core::models::sync::{SyncKind, SyncOptions, UserSync};
use tracing::trace;

/// The vendor only runs one image pixel, so the result never
/// depends on the publisher's options or on what was bid
pub fn user_syncs(
    cookie_sync_url: &str,
    options: &SyncOptions,
    responses: &[ServerResponse],
) -> Vec<UserSync> {
    trace!(
        "User syncs requested, pixel {} iframe {} after {} responses",
        options.pixel_enabled,
        options.iframe_enabled,
        responses.len()
    );

    vec![UserSync {
        kind: SyncKind::Image,
        url: cookie_sync_url.to_string(),
    }]
}
