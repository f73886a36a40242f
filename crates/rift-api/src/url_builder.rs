//! URL resolution: region + method key + parameters to a full request URL.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

use url::Url;
use url::form_urlencoded;

use crate::error::{ApiError, Result};
use crate::region::Region;
use crate::registry::MethodRegistry;

/// Default host template; `{region}` is replaced with the region id.
pub const DEFAULT_HOST_TEMPLATE: &str = "https://{region}.api.riotgames.com";

const REGION_PLACEHOLDER: &str = "{region}";

/// Values for the `{name}` placeholders of a path template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(BTreeMap<String, String>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        self.0.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// A single query parameter value; arrays encode as repeated keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    Many(Vec<String>),
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, QueryValue)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, QueryValue)> {
        self.0.iter()
    }

    /// Flattened `(key, value)` pairs in wire order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(key, value)| {
            let values: Vec<&str> = match value {
                QueryValue::Single(v) => vec![v.as_str()],
                QueryValue::Many(vs) => vs.iter().map(String::as_str).collect(),
            };
            values.into_iter().map(move |v| (key.as_str(), v))
        })
    }

    /// `application/x-www-form-urlencoded` serialization, without the `?`.
    /// Spaces become `+`.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Builds request URLs from the method registry and a host template.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    host_template: String,
    registry: Arc<MethodRegistry>,
}

impl Default for UrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HOST_TEMPLATE)
    }
}

impl UrlBuilder {
    /// Builder over the built-in method catalog.
    ///
    /// A template without `{region}` is accepted and used as-is.
    pub fn new(host_template: impl Into<String>) -> Self {
        Self {
            host_template: host_template.into(),
            registry: MethodRegistry::builtin(),
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry: Arc<MethodRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn host_template(&self) -> &str {
        &self.host_template
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Scheme and host for a region.
    pub fn host(&self, region: Region) -> String {
        self.host_template
            .replace(REGION_PLACEHOLDER, region.as_str())
    }

    /// Resolve a method call to its full URL. Performs no I/O.
    pub fn resolve(
        &self,
        region: Region,
        method_key: &str,
        path_params: &PathParams,
        query: Option<&QueryParams>,
    ) -> Result<String> {
        let template = self.registry.resolve(method_key)?;
        let segments = substitute(method_key, template, path_params)?;

        let mut url = Url::parse(&self.host(region))?;
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::Config(format!(
                    "host template '{}' cannot carry a path",
                    self.host_template
                ))
            })?
            .pop_if_empty()
            .extend(segments.iter().map(String::as_str));

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }

        Ok(url.into())
    }
}

/// Fill placeholders segment by segment. Values are returned raw; the
/// caller percent-encodes each segment. A segment that comes out as `.` or
/// `..` is rejected, since URL normalization would drop it.
fn substitute(method_key: &str, template: &str, params: &PathParams) -> Result<Vec<String>> {
    template
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut out = String::with_capacity(segment.len());
            let mut rest = segment;
            while let Some(open) = rest.find('{') {
                let Some(close) = rest[open..].find('}') else {
                    break;
                };
                let name = &rest[open + 1..open + close];
                let value = params.get(name).ok_or_else(|| ApiError::MissingPathParam {
                    method: method_key.to_string(),
                    name: name.to_string(),
                })?;
                out.push_str(&rest[..open]);
                out.push_str(value);
                rest = &rest[open + close + 1..];
            }
            out.push_str(rest);
            if out == "." || out == ".." {
                return Err(ApiError::InvalidArgument(format!(
                    "path segment '{out}' in {method_key} would change the resource"
                )));
            }
            Ok(out)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::registry::{RegistryError, methods};
    use pretty_assertions::assert_eq;

    fn builder() -> UrlBuilder {
        UrlBuilder::default()
    }

    #[test]
    fn test_resolve_summoner_by_name() {
        let url = builder()
            .resolve(
                Region::Euw1,
                methods::summoner::GET_BY_SUMMONER_NAME,
                &PathParams::new().with("summonerName", "Demos"),
                None,
            )
            .expect("resolve");
        assert_eq!(
            url,
            "https://euw1.api.riotgames.com/lol/summoner/v4/summoners/by-name/Demos"
        );
    }

    #[test]
    fn test_resolve_multiple_params_on_cluster() {
        let url = builder()
            .resolve(
                Region::Europe,
                methods::account::GET_BY_RIOT_ID,
                &PathParams::new()
                    .with("gameName", "Demos")
                    .with("tagLine", "EUW"),
                None,
            )
            .expect("resolve");
        assert_eq!(
            url,
            "https://europe.api.riotgames.com/riot/account/v1/accounts/by-riot-id/Demos/EUW"
        );
    }

    #[test]
    fn test_path_values_are_segment_encoded() {
        let url = builder()
            .resolve(
                Region::Na1,
                methods::summoner::GET_BY_SUMMONER_NAME,
                &PathParams::new().with("summonerName", "a b/c?d#e"),
                None,
            )
            .expect("resolve");
        assert_eq!(
            url,
            "https://na1.api.riotgames.com/lol/summoner/v4/summoners/by-name/a%20b%2Fc%3Fd%23e"
        );
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        for name in [".", ".."] {
            let err = builder()
                .resolve(
                    Region::Euw1,
                    methods::summoner::GET_BY_SUMMONER_NAME,
                    &PathParams::new().with("summonerName", name),
                    None,
                )
                .expect_err("dot segment");
            assert!(matches!(err, ApiError::InvalidArgument(_)));
        }

        let url = builder()
            .resolve(
                Region::Euw1,
                methods::summoner::GET_BY_SUMMONER_NAME,
                &PathParams::new().with("summonerName", "..."),
                None,
            )
            .expect("three dots are an ordinary name");
        assert!(url.ends_with("/by-name/..."));
    }

    #[test]
    fn test_missing_path_param() {
        let err = builder()
            .resolve(
                Region::Euw1,
                methods::account::GET_BY_RIOT_ID,
                &PathParams::new().with("gameName", "Demos"),
                None,
            )
            .expect_err("tagLine is missing");
        match err {
            ApiError::MissingPathParam { method, name } => {
                assert_eq!(method, methods::account::GET_BY_RIOT_ID);
                assert_eq!(name, "tagLine");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_registry_errors_surface() {
        let err = builder()
            .resolve(Region::Euw1, "SUMMONER", &PathParams::new(), None)
            .expect_err("namespace key");
        assert!(matches!(
            err,
            ApiError::Registry(RegistryError::NotALeaf(_))
        ));

        let err = builder()
            .resolve(Region::Euw1, "SUMMONER.NOPE", &PathParams::new(), None)
            .expect_err("unknown key");
        assert!(matches!(
            err,
            ApiError::Registry(RegistryError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_query_repeat_key_encoding() {
        let query = QueryParams::new()
            .with("queue", 420u32)
            .with("ids", vec!["a", "b c"])
            .with("type", "ranked&more");
        assert_eq!(query.encode(), "queue=420&ids=a&ids=b+c&type=ranked%26more");

        let url = builder()
            .resolve(
                Region::Europe,
                methods::match_v5::GET_IDS_BY_PUUID,
                &PathParams::new().with("puuid", "p-1"),
                Some(&query),
            )
            .expect("resolve");
        assert_eq!(
            url,
            "https://europe.api.riotgames.com/lol/match/v5/matches/by-puuid/p-1/ids?queue=420&ids=a&ids=b+c&type=ranked%26more"
        );
    }

    #[test]
    fn test_empty_query_adds_no_question_mark() {
        let url = builder()
            .resolve(
                Region::Euw1,
                methods::champion::GET_CHAMPION_ROTATIONS,
                &PathParams::new(),
                Some(&QueryParams::new()),
            )
            .expect("resolve");
        assert_eq!(url, "https://euw1.api.riotgames.com/lol/platform/v3/champion-rotations");
    }

    #[test]
    fn test_host_template_without_region() {
        let url = UrlBuilder::new("http://127.0.0.1:8080")
            .resolve(
                Region::Kr,
                methods::champion::GET_CHAMPION_ROTATIONS,
                &PathParams::new(),
                None,
            )
            .expect("resolve");
        assert_eq!(url, "http://127.0.0.1:8080/lol/platform/v3/champion-rotations");
    }

    #[test]
    fn test_custom_registry() {
        let registry = MethodRegistry::empty()
            .with_method("STATUS.GET_PLATFORM_DATA", "/lol/status/v4/platform-data")
            .expect("valid key");
        let url = UrlBuilder::default()
            .with_registry(Arc::new(registry))
            .resolve(Region::Euw1, "STATUS.GET_PLATFORM_DATA", &PathParams::new(), None)
            .expect("resolve");
        assert_eq!(url, "https://euw1.api.riotgames.com/lol/status/v4/platform-data");
    }
}
