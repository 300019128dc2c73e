use anyhow::{Result, anyhow, bail};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::form_urlencoded;

/// Everything `encodeURIComponent` escapes, plus `'`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// Encodes a value the way browsers' `encodeURIComponent` does,
/// except that `'` is always escaped to `%27`. Spaces become `%20`
/// and `+` is escaped, so decoding is unambiguous.
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// An ordered query string builder with finalization semantics.
///
/// Pairs keep insertion order, so the encoded string is stable for a
/// given sequence of `add_*` calls. Once finalized no further pairs
/// can be added and the string can be extracted with `encode()`.
///
/// # Example
/// ```
/// let mut query = QueryString::new();
/// query.add_string("placementid", "1234567")?
///      .add_int("topframe", 1)?;
/// query.finalize();
/// let data = query.encode()?; // placementid=1234567&topframe=1
/// ```
#[derive(Clone, Debug, Default)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
    finalized: bool,
}

#[allow(dead_code)]
impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an encoded query string into a finalized QueryString.
    ///
    /// Anything up to and including a `?` is ignored, so both a bare
    /// query and a full url are accepted. Values are percent decoded.
    pub fn parse(data: &str) -> Self {
        let query = match data.find('?') {
            Some(idx) => &data[idx + 1..],
            None => data,
        };

        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Self {
            pairs,
            finalized: true,
        }
    }

    /// Adds a string parameter.
    ///
    /// # Errors
    /// Returns an error if the query has already been finalized.
    pub fn add_string(&mut self, key: &str, value: &str) -> Result<&mut Self> {
        if self.finalized {
            bail!("Cannot add parameters to a finalized QueryString");
        }
        self.pairs.push((key.to_string(), value.to_string()));
        Ok(self)
    }

    /// Adds an integer parameter.
    ///
    /// # Errors
    /// Returns an error if the query has already been finalized.
    pub fn add_int(&mut self, key: &str, value: i64) -> Result<&mut Self> {
        self.add_string(key, &value.to_string())
    }

    /// Adds an optional integer, written as an empty value when absent
    ///
    /// # Errors
    /// Returns an error if the query has already been finalized.
    pub fn add_opt_int(&mut self, key: &str, value: Option<i64>) -> Result<&mut Self> {
        match value {
            Some(value) => self.add_int(key, value),
            None => self.add_string(key, ""),
        }
    }

    /// Gets the first value for a key, `None` if the key is missing
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Gets an integer parameter.
    ///
    /// Returns `Ok(Some(value))` if the parameter exists and is a valid integer,
    /// `Ok(None)` if the parameter is missing,
    /// `Err` if the parameter exists but cannot be parsed as an integer.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        match self.get_string(key) {
            Some(v) => {
                let parsed = v.parse::<i64>().map_err(|e| {
                    anyhow!(
                        "Failed to parse '{}' as integer for key '{}': {}",
                        v,
                        key,
                        e
                    )
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Gets a required string parameter.
    ///
    /// Returns `Err` if the parameter is missing.
    pub fn get_required_string(&self, key: &str) -> Result<&str> {
        self.get_string(key)
            .ok_or_else(|| anyhow!("Missing required parameter: {}", key))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Finalizes the query, preventing any further mutations.
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    /// Returns the encoded `k=v&k=v` string, no leading `?`.
    ///
    /// # Errors
    /// Returns an error if the query has not been finalized.
    pub fn encode(&self) -> Result<String> {
        if !self.finalized {
            bail!("QueryString must be finalized before calling encode()");
        }

        Ok(self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode_uri_component(k), encode_uri_component(v)))
            .collect::<Vec<_>>()
            .join("&"))
    }
}
