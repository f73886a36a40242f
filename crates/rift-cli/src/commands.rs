//! Command handlers. Each returns the JSON value to print.

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Subcommand};
use serde_json::{Value, json};

use rift_api::registry::Lookup;
use rift_api::{
    ClientConfig, DDragon, Locale, Method, MethodRegistry, PathParams, QueryParams, QueryValue,
    Realm, Region, RequestOptions, RiotApi,
};

#[derive(Args)]
pub struct RequestArgs {
    /// Routing id, e.g. euw1 or europe
    region: String,

    /// Method key, e.g. SUMMONER.GET_BY_SUMMONER_NAME
    method_key: String,

    /// Path parameter as name=value (repeatable)
    #[arg(short = 'p', long = "path", value_parser = parse_pair)]
    path: Vec<(String, String)>,

    /// Query parameter as key=value; repeating a key sends an array
    #[arg(short = 'q', long = "query", value_parser = parse_pair)]
    query: Vec<(String, String)>,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// JSON request body
    #[arg(long)]
    body: Option<String>,

    /// Scheduling priority, 0 (highest) to 9
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=9))]
    priority: Option<u8>,

    /// Job id shown in logs
    #[arg(long)]
    id: Option<String>,
}

#[derive(Subcommand)]
pub enum DDragonCommand {
    /// All published versions, newest first
    Versions,

    /// Newest published version
    Latest,

    /// Champion summary list
    Champions(AssetArgs),

    /// Full data for one champion
    Champion {
        /// Data key, e.g. Ahri or MonkeyKing
        name: String,

        #[command(flatten)]
        asset: AssetArgs,
    },

    /// Live versions on a realm
    Realm {
        /// Realm id; defaults to euw
        realm: Option<String>,
    },

    Items(AssetArgs),

    Runes(AssetArgs),

    Spells(AssetArgs),

    Icons(AssetArgs),

    Maps(AssetArgs),
}

#[derive(Args)]
pub struct AssetArgs {
    /// Locale such as en_US; defaults to en_GB
    #[arg(short, long)]
    locale: Option<String>,

    /// Data version; defaults to the newest
    #[arg(short = 'V', long = "data-version")]
    data_version: Option<String>,
}

impl AssetArgs {
    fn locale(&self) -> Result<Option<Locale>> {
        self.locale
            .as_deref()
            .map(str::parse::<Locale>)
            .transpose()
            .map_err(Into::into)
    }
}

pub async fn request(token: Option<String>, debug: bool, args: RequestArgs) -> Result<Value> {
    let token = token.ok_or_else(|| anyhow!("an API token is required (--token or RIFT_API_TOKEN)"))?;
    let region: Region = args.region.parse()?;

    let mut config = ClientConfig::from_env().context("reading RIFT_* configuration")?;
    config.debug |= debug;
    let api = RiotApi::new(token, config)?;

    let method = Method::from_bytes(args.method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method '{}'", args.method))?;
    let body = args
        .body
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("request body is not valid JSON")?;

    let path_params: PathParams = args.path.into_iter().collect();
    let query = group_query(args.query);

    let options = RequestOptions {
        id: args.id,
        priority: args.priority,
        params: (!query.is_empty()).then_some(query),
        body,
        method: Some(method),
        ..RequestOptions::default()
    };

    tracing::debug!(%region, method = %args.method_key, "sending request");
    Ok(api
        .request(region, &args.method_key, &path_params, options)
        .await?)
}

pub fn methods(namespace: Option<&str>) -> Result<Value> {
    let registry = MethodRegistry::builtin();

    let prefix = match namespace {
        Some(ns) => {
            let ns = ns.trim().to_ascii_uppercase();
            match registry.lookup(&ns) {
                Lookup::Namespace => Some(format!("{ns}.")),
                Lookup::Template(_) => bail!("{ns} is a method, not a namespace"),
                Lookup::NotFound => bail!("unknown namespace {ns}"),
            }
        }
        None => None,
    };

    let listing: serde_json::Map<String, Value> = registry
        .keys()
        .filter(|key| prefix.as_deref().is_none_or(|p| key.starts_with(p)))
        .filter_map(|key| {
            registry
                .resolve(key)
                .ok()
                .map(|template| (key.to_string(), json!(template)))
        })
        .collect();
    Ok(Value::Object(listing))
}

pub async fn ddragon(command: DDragonCommand) -> Result<Value> {
    let dd = DDragon::new()?;

    let value = match command {
        DDragonCommand::Versions => json!(dd.versions_all().await?),
        DDragonCommand::Latest => json!(dd.versions_latest().await?),
        DDragonCommand::Champions(asset) => {
            dd.champions(asset.locale()?, asset.data_version.as_deref())
                .await?
        }
        DDragonCommand::Champion { name, asset } => {
            dd.champion_by_name(&name, asset.locale()?, asset.data_version.as_deref())
                .await?
        }
        DDragonCommand::Realm { realm } => {
            let realm = realm.as_deref().map(str::parse::<Realm>).transpose()?;
            dd.realm(realm).await?
        }
        DDragonCommand::Items(asset) => {
            dd.items(asset.locale()?, asset.data_version.as_deref())
                .await?
        }
        DDragonCommand::Runes(asset) => {
            dd.runes_reforged(asset.locale()?, asset.data_version.as_deref())
                .await?
        }
        DDragonCommand::Spells(asset) => {
            dd.summoner_spells(asset.locale()?, asset.data_version.as_deref())
                .await?
        }
        DDragonCommand::Icons(asset) => {
            dd.profile_icons(asset.locale()?, asset.data_version.as_deref())
                .await?
        }
        DDragonCommand::Maps(asset) => {
            dd.maps(asset.locale()?, asset.data_version.as_deref())
                .await?
        }
    };
    Ok(value)
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

/// Repeated keys collapse into one array parameter at the first key's place.
fn group_query(pairs: Vec<(String, String)>) -> QueryParams {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in pairs {
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => grouped.push((key, vec![value])),
        }
    }
    grouped
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                QueryValue::Single(values.remove(0))
            } else {
                QueryValue::Many(values)
            };
            (key, value)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("summonerName=Demos").expect("pair"),
            ("summonerName".to_string(), "Demos".to_string())
        );
        assert_eq!(
            parse_pair("q=a=b").expect("pair"),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_pair("novalue").is_err());
        assert!(parse_pair("=x").is_err());
    }

    #[test]
    fn test_group_query_repeats_become_arrays() {
        let query = group_query(vec![
            ("ids".to_string(), "1".to_string()),
            ("queue".to_string(), "420".to_string()),
            ("ids".to_string(), "2".to_string()),
        ]);
        assert_eq!(query.encode(), "ids=1&ids=2&queue=420");
    }

    #[test]
    fn test_methods_listing() {
        let all = methods(None).expect("all");
        assert!(all.get("SUMMONER.GET_BY_PUUID").is_some());

        let league = methods(Some("league")).expect("league");
        let keys: Vec<&String> = league.as_object().expect("object").keys().collect();
        assert!(keys.iter().all(|k| k.starts_with("LEAGUE.")));
        assert!(!keys.is_empty());

        assert!(methods(Some("NOPE")).is_err());
        assert!(methods(Some("SUMMONER.GET_BY_PUUID")).is_err());
    }
}
