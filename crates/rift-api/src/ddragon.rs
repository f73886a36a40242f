//! Data Dragon static asset client
//!
//! Data Dragon serves versioned game data (champions, items, runes...) from
//! a CDN with no token and no rate limits, so these calls bypass the
//! scheduler and the response cache and go straight through the transport.

use std::fmt;
use std::str::FromStr;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::transport::HttpClient;

pub const DEFAULT_DDRAGON_HOST: &str = "https://ddragon.leagueoflegends.com";

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ApiError;

            fn from_str(s: &str) -> Result<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| {
                        ApiError::InvalidArgument(format!(
                            concat!("unknown ", stringify!($name), " '{}'"),
                            s
                        ))
                    })
            }
        }
    };
}

string_enum! {
    /// Language of localized asset data.
    Locale {
        CsCz => "cs_CZ",
        ElGr => "el_GR",
        PlPl => "pl_PL",
        RoRo => "ro_RO",
        HuHu => "hu_HU",
        EnGb => "en_GB",
        DeDe => "de_DE",
        EsEs => "es_ES",
        ItIt => "it_IT",
        FrFr => "fr_FR",
        JaJp => "ja_JP",
        KoKr => "ko_KR",
        EsMx => "es_MX",
        EsAr => "es_AR",
        PtBr => "pt_BR",
        EnUs => "en_US",
        EnAu => "en_AU",
        RuRu => "ru_RU",
        TrTr => "tr_TR",
        MsMy => "ms_MY",
        EnPh => "en_PH",
        EnSg => "en_SG",
        ThTh => "th_TH",
        VnVn => "vn_VN",
        IdId => "id_ID",
        ZhMy => "zh_MY",
        ZhCn => "zh_CN",
        ZhTw => "zh_TW",
    }
}

string_enum! {
    /// Realm whose live versions `realm` reports.
    Realm {
        Na => "na",
        Euw => "euw",
        Eune => "eune",
        Br => "br",
        Jp => "jp",
        Kr => "kr",
        Oce => "oce",
        Lan => "lan",
        Las => "las",
        Ru => "ru",
        Tr => "tr",
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::EnGb
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::Euw
    }
}

/// Data Dragon client.
///
/// Versioned lookups take an optional version; `None` resolves the latest
/// published one first (one extra request).
#[derive(Debug, Clone)]
pub struct DDragon {
    host: String,
    locale: Locale,
    realm: Realm,
    http: HttpClient,
}

impl DDragon {
    /// Client for the public CDN over the shared transport.
    pub fn new() -> Result<Self> {
        Ok(Self::with_http(DEFAULT_DDRAGON_HOST, HttpClient::new()?))
    }

    pub fn with_http(host: impl Into<String>, http: HttpClient) -> Self {
        let host: String = host.into();
        Self {
            host: host.trim_end_matches('/').to_string(),
            locale: Locale::default(),
            realm: Realm::default(),
            http,
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn with_realm(mut self, realm: Realm) -> Self {
        self.realm = realm;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn realm_default(&self) -> Realm {
        self.realm
    }

    /// Every published version, newest first.
    pub async fn versions_all(&self) -> Result<Vec<String>> {
        self.fetch("/api/versions.json").await
    }

    pub async fn versions_latest(&self) -> Result<String> {
        self.versions_all()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::EmptyResponse(format!("{}/api/versions.json", self.host)))
    }

    pub async fn champions(&self, locale: Option<Locale>, version: Option<&str>) -> Result<Value> {
        self.data(locale, version, "champion.json").await
    }

    /// Full record for one champion; `name` is the data key, e.g. `MonkeyKing`.
    pub async fn champion_by_name(
        &self,
        name: &str,
        locale: Option<Locale>,
        version: Option<&str>,
    ) -> Result<Value> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "champion name is required".to_string(),
            ));
        }
        self.data(locale, version, &format!("champion/{name}.json"))
            .await
    }

    /// Live versions of each asset kind on a realm.
    pub async fn realm(&self, realm: Option<Realm>) -> Result<Value> {
        let realm = realm.unwrap_or(self.realm);
        self.fetch(&format!("/realms/{realm}.json")).await
    }

    pub async fn items(&self, locale: Option<Locale>, version: Option<&str>) -> Result<Value> {
        self.data(locale, version, "item.json").await
    }

    pub async fn runes_reforged(
        &self,
        locale: Option<Locale>,
        version: Option<&str>,
    ) -> Result<Value> {
        self.data(locale, version, "runesReforged.json").await
    }

    pub async fn summoner_spells(
        &self,
        locale: Option<Locale>,
        version: Option<&str>,
    ) -> Result<Value> {
        self.data(locale, version, "summoner.json").await
    }

    pub async fn profile_icons(
        &self,
        locale: Option<Locale>,
        version: Option<&str>,
    ) -> Result<Value> {
        self.data(locale, version, "profileicon.json").await
    }

    pub async fn maps(&self, locale: Option<Locale>, version: Option<&str>) -> Result<Value> {
        self.data(locale, version, "map.json").await
    }

    async fn data(&self, locale: Option<Locale>, version: Option<&str>, file: &str) -> Result<Value> {
        let version = match version {
            Some(v) => v.to_string(),
            None => self.versions_latest().await?,
        };
        let locale = locale.unwrap_or(self.locale);
        self.fetch(&format!("/cdn/{version}/data/{locale}/{file}"))
            .await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.host);
        debug!(url = %url, "ddragon fetch");

        let response = self
            .http
            .inner()
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::HttpStatus { status, body });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Locale::default().as_str(), "en_GB");
        assert_eq!(Realm::default().to_string(), "euw");
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("EN_us".parse::<Locale>().expect("locale"), Locale::EnUs);
        assert_eq!("EUNE".parse::<Realm>().expect("realm"), Realm::Eune);
        assert!("xx_XX".parse::<Locale>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&Locale::ZhTw).expect("json"),
            "\"zh_TW\""
        );
        let realm: Realm = serde_json::from_str("\"oce\"").expect("realm");
        assert_eq!(realm, Realm::Oce);
    }

    #[test]
    fn test_host_trailing_slash_trimmed() {
        let dd = DDragon::with_http("http://localhost:9/", HttpClient::new().expect("http"));
        assert_eq!(dd.host(), "http://localhost:9");
    }

    #[tokio::test]
    async fn test_empty_champion_name_rejected_without_request() {
        // Port 9 is never contacted; validation fails first.
        let dd = DDragon::with_http("http://127.0.0.1:9", HttpClient::new().expect("http"));
        let err = dd
            .champion_by_name("  ", None, Some("1.0.0"))
            .await
            .expect_err("empty name");
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }
}
