//! Outbound URL construction and pagination cursor arithmetic.
//!
//! # Responsibilities
//! - Forward only `$`-prefixed (SoQL) parameters upstream
//! - Advance the `$limit`/`$offset` cursor for the next page
//! - Decide whether the next page stays under the configured ceiling

use std::collections::BTreeMap;

use thiserror::Error;
use url::Url;

use crate::config::{PaginationConfig, UpstreamConfig};

/// Page size used when the request carries no `$limit`.
pub const DEFAULT_LIMIT: u64 = 1000;

/// Offset used when the request carries no `$offset`.
pub const DEFAULT_OFFSET: u64 = 0;

pub const LIMIT_PARAM: &str = "$limit";
pub const OFFSET_PARAM: &str = "$offset";

/// Errors raised while interpreting inbound query parameters.
#[derive(Debug, Error)]
pub enum ParameterError {
    /// `$limit` or `$offset` was present but not a non-negative integer.
    #[error("parameter {name} must be a non-negative integer, got {value:?}")]
    NotAnInteger { name: &'static str, value: String },

    /// A base URL could not be turned into an absolute URL.
    #[error("invalid base url {base:?}: {source}")]
    InvalidBase {
        base: String,
        #[source]
        source: url::ParseError,
    },
}

/// Query parameters keyed by name, iterated in sorted key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw `application/x-www-form-urlencoded` query string.
    /// A repeated key keeps its last value.
    pub fn from_query(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self(pairs)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Position into the upstream dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub limit: u64,
    pub offset: u64,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl PageCursor {
    /// Read the cursor from `$limit`/`$offset`, falling back to the defaults
    /// only when a parameter is absent.
    pub fn from_params(params: &QueryParams) -> Result<Self, ParameterError> {
        Ok(Self {
            limit: parse_count(params, LIMIT_PARAM)?.unwrap_or(DEFAULT_LIMIT),
            offset: parse_count(params, OFFSET_PARAM)?.unwrap_or(DEFAULT_OFFSET),
        })
    }

    /// The cursor of the following page.
    pub fn advance(self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }

    /// One past the last row this cursor covers.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.limit)
    }

    /// True while the page ends at or before `ceiling`.
    pub fn within(&self, ceiling: u64) -> bool {
        self.end() <= ceiling
    }
}

fn parse_count(params: &QueryParams, name: &'static str) -> Result<Option<u64>, ParameterError> {
    params
        .get(name)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| ParameterError::NotAnInteger {
                name,
                value: raw.to_string(),
            })
        })
        .transpose()
}

/// Build `host + path + ?query` keeping only `$`-prefixed parameters.
///
/// A path already on `host` is kept as a prefix, so a proxy mounted under
/// `/geo` links to `/geo/resource/...`. The `$` sigil stays literal; the rest
/// of each key and every value are percent-encoded. Pairs are emitted in key
/// order.
pub fn build_url(host: &str, path: &str, params: &QueryParams) -> Result<Url, ParameterError> {
    let mut url = Url::parse(host).map_err(|source| ParameterError::InvalidBase {
        base: host.to_string(),
        source,
    })?;
    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);

    let query = params
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix('$').map(|name| {
                format!("${}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
        })
        .collect::<Vec<_>>()
        .join("&");

    url.set_query(if query.is_empty() { None } else { Some(&query) });
    Ok(url)
}

/// Copy `params` with `$limit`/`$offset` set to the following page.
pub fn build_next_page_params(params: &QueryParams) -> Result<QueryParams, ParameterError> {
    let next = PageCursor::from_params(params)?.advance();
    let mut next_params = params.clone();
    next_params.insert(LIMIT_PARAM, next.limit.to_string());
    next_params.insert(OFFSET_PARAM, next.offset.to_string());
    Ok(next_params)
}

/// Query construction bound to the startup configuration.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    target_host: String,
    ceiling: u64,
}

impl QueryBuilder {
    pub fn new(upstream: &UpstreamConfig, pagination: &PaginationConfig) -> Self {
        Self {
            target_host: upstream.target_host.clone(),
            ceiling: pagination.ceiling,
        }
    }

    /// URL fetched from the upstream API for an inbound `path` and query.
    pub fn upstream_url(&self, path: &str, params: &QueryParams) -> Result<Url, ParameterError> {
        build_url(&self.target_host, path, params)
    }

    /// URL advertised in `Next-Page`, or `None` once the next page would
    /// cross the ceiling.
    pub fn next_page_url(
        &self,
        base: &str,
        path: &str,
        params: &QueryParams,
    ) -> Result<Option<Url>, ParameterError> {
        let next_params = build_next_page_params(params)?;
        let next = PageCursor::from_params(&next_params)?;
        if !next.within(self.ceiling) {
            tracing::debug!(
                offset = next.offset,
                limit = next.limit,
                ceiling = self.ceiling,
                "Pagination exhausted"
            );
            return Ok(None);
        }
        build_url(base, path, &next_params).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    fn builder(ceiling: u64) -> QueryBuilder {
        let upstream = UpstreamConfig {
            target_host: "https://data.cityofnewyork.us".into(),
            ..UpstreamConfig::default()
        };
        QueryBuilder::new(&upstream, &PaginationConfig { ceiling })
    }

    #[test]
    fn test_next_page_defaults() {
        let next = build_next_page_params(&QueryParams::new()).unwrap();
        assert_eq!(next.get("$limit"), Some("1000"));
        assert_eq!(next.get("$offset"), Some("1000"));
    }

    #[test]
    fn test_next_page_advances_offset_by_limit() {
        let next = build_next_page_params(&params(&[("$limit", "50"), ("$offset", "100")])).unwrap();
        assert_eq!(next.get("$limit"), Some("50"));
        assert_eq!(next.get("$offset"), Some("150"));
    }

    #[test]
    fn test_next_page_keeps_other_params() {
        let next = build_next_page_params(&params(&[("$where", "agency='NYPD'"), ("foo", "bar")])).unwrap();
        assert_eq!(next.get("$where"), Some("agency='NYPD'"));
        assert_eq!(next.get("foo"), Some("bar"));
    }

    #[test]
    fn test_malformed_limit_is_rejected() {
        let err = build_next_page_params(&params(&[("$limit", "ten")])).unwrap_err();
        assert!(matches!(err, ParameterError::NotAnInteger { name: "$limit", .. }));

        let err = build_next_page_params(&params(&[("$offset", "-5")])).unwrap_err();
        assert!(matches!(err, ParameterError::NotAnInteger { name: "$offset", .. }));
    }

    #[test]
    fn test_build_url_filters_non_soql_params() {
        let url = build_url(
            "https://data.cityofnewyork.us",
            "/resource/erm2-nwe9.json",
            &params(&[("$limit", "10"), ("foo", "bar")]),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://data.cityofnewyork.us/resource/erm2-nwe9.json?$limit=10"
        );
    }

    #[test]
    fn test_build_url_encodes_values() {
        let url = build_url(
            "https://data.cityofnewyork.us",
            "/resource/erm2-nwe9.json",
            &params(&[("$where", "agency = 'NYPD' & borough"), ("$order", "created_date DESC")]),
        )
        .unwrap();
        let query = url.query().unwrap();
        assert_eq!(
            query,
            "$order=created_date%20DESC&$where=agency%20%3D%20%27NYPD%27%20%26%20borough"
        );
    }

    #[test]
    fn test_build_url_without_soql_params_has_no_query() {
        let url = build_url("http://localhost:8080", "/resource/x.json", &params(&[("foo", "bar")])).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/resource/x.json");
    }

    #[test]
    fn test_build_url_keeps_base_path_prefix() {
        let url = build_url("https://maps.example.org/geo/", "/resource/x.json", &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "https://maps.example.org/geo/resource/x.json");

        let root = build_url("https://maps.example.org/geo", "/", &QueryParams::new()).unwrap();
        assert_eq!(root.path(), "/geo/");
    }

    #[test]
    fn test_next_page_under_mounted_prefix() {
        let next = builder(10_000)
            .next_page_url("https://maps.example.org/geo", "/resource/x.json", &QueryParams::new())
            .unwrap()
            .unwrap();
        assert_eq!(
            next.as_str(),
            "https://maps.example.org/geo/resource/x.json?$limit=1000&$offset=1000"
        );
    }

    #[test]
    fn test_build_url_rejects_relative_host() {
        let err = build_url("not a host", "/", &QueryParams::new()).unwrap_err();
        assert!(matches!(err, ParameterError::InvalidBase { .. }));
    }

    #[test]
    fn test_ceiling_is_inclusive() {
        let qb = builder(5000);

        // next page: offset 4000, limit 1000 -> ends at 5000
        let at_ceiling = qb
            .next_page_url("http://proxy", "/r.json", &params(&[("$limit", "1000"), ("$offset", "3000")]))
            .unwrap();
        assert_eq!(
            at_ceiling.unwrap().as_str(),
            "http://proxy/r.json?$limit=1000&$offset=4000"
        );

        // next page ends at 5001
        let past_ceiling = qb
            .next_page_url("http://proxy", "/r.json", &params(&[("$limit", "1000"), ("$offset", "3001")]))
            .unwrap();
        assert!(past_ceiling.is_none());
    }

    #[test]
    fn test_upstream_url_uses_target_host() {
        let url = builder(10_000)
            .upstream_url("/resource/erm2-nwe9.json", &params(&[("$offset", "20")]))
            .unwrap();
        assert_eq!(url.host_str(), Some("data.cityofnewyork.us"));
        assert_eq!(url.query(), Some("$offset=20"));
    }

    #[test]
    fn test_from_query_decodes_and_last_wins() {
        let parsed = QueryParams::from_query(Some("$where=a%20%3D%201&$limit=5&$limit=7&x=%24y"));
        assert_eq!(parsed.get("$where"), Some("a = 1"));
        assert_eq!(parsed.get("$limit"), Some("7"));
        assert_eq!(parsed.get("x"), Some("$y"));
        assert!(QueryParams::from_query(None).is_empty());
    }

    #[test]
    fn test_cursor_end_saturates() {
        let cursor = PageCursor { limit: u64::MAX, offset: 1 };
        assert_eq!(cursor.end(), u64::MAX);
        assert!(!cursor.within(10_000));
    }
}
