use crate::core::models::bid::{BidRequest, Currency};
use tracing::{trace, warn};

/// Decides if a bid carries enough vendor data to be worth sending.
///
/// # Behavior
/// - A missing or blank placement id fails silently
/// - A currency other than those in ['Currency'] fails and is
///   reported as a warning, since it is a publisher setup error
/// - No currency at all is fine, the default is applied later
pub fn is_valid(bid: &BidRequest) -> bool {
    match &bid.params.placement_id {
        Some(id) if !id.is_blank() => {}
        _ => {
            trace!("Bid {} missing placement id", bid.bid_id);
            return false;
        }
    }

    if let Some(currency) = &bid.params.currency {
        if currency.parse::<Currency>().is_err() {
            warn!(
                "Invalid currency type {} on bid {}, we support only {}",
                currency,
                bid.bid_id,
                Currency::ALL
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" and ")
            );
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::bid::{BidParamsBuilder, BidRequestBuilder, PlacementId};
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).to_string()
        }
    }

    fn with_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let out = tracing::subscriber::with_default(subscriber, f);
        (out, logs.text())
    }

    fn bid(placement_id: Option<PlacementId>, currency: Option<&str>) -> BidRequest {
        let mut params = BidParamsBuilder::default();
        if let Some(id) = placement_id {
            params.placement_id(id);
        }
        if let Some(cur) = currency {
            params.currency(cur);
        }

        BidRequestBuilder::default()
            .bid_id("bidId12345")
            .params(params.build().unwrap())
            .sizes(vec![[300, 250]])
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_without_currency() {
        assert!(is_valid(&bid(Some(1234567u64.into()), None)));
    }

    #[test]
    fn test_valid_with_supported_currency() {
        assert!(is_valid(&bid(Some(1234567u64.into()), Some("JPY"))));
        assert!(is_valid(&bid(Some(1234567u64.into()), Some("USD"))));
    }

    #[test]
    fn test_invalid_without_placement() {
        assert!(!is_valid(&bid(None, None)));
        assert!(!is_valid(&bid(None, Some("USD"))));
    }

    #[test]
    fn test_invalid_with_blank_placement() {
        assert!(!is_valid(&bid(Some(0u64.into()), None)));
        assert!(!is_valid(&bid(Some("".into()), None)));
    }

    #[test]
    fn test_whitespace_placement_is_valid() {
        assert!(is_valid(&bid(Some(" ".into()), None)));
    }

    #[test]
    fn test_unsupported_currency_fails_and_warns() {
        let (valid, logs) = with_logs(|| is_valid(&bid(Some(1234567u64.into()), Some("EUR"))));

        assert!(!valid);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("Invalid currency type EUR"));
        assert!(logs.contains("USD and JPY"));
    }

    #[test]
    fn test_missing_placement_does_not_warn() {
        let (valid, logs) = with_logs(|| is_valid(&bid(None, None)));

        assert!(!valid);
        assert!(logs.is_empty());
    }

    #[test]
    fn test_currency_case_sensitive() {
        let (valid, logs) = with_logs(|| is_valid(&bid(Some("abc".into()), Some("jpy"))));

        assert!(!valid);
        assert!(logs.contains("jpy"));
    }
}
