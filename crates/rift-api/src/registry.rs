//! Method registry: dotted method keys to URL path templates.
//!
//! Keys have the form `NAMESPACE.OPERATION` and map to a path template with
//! `{name}` placeholders. The key space is flat; a key that is only a prefix
//! of registered keys (for example `SUMMONER`) is a namespace, not a method.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown method key '{0}'")]
    UnknownMethod(String),

    #[error("method key '{0}' names a namespace, not an endpoint")]
    NotALeaf(String),

    #[error("invalid method key '{0}': expected NAMESPACE.OPERATION")]
    InvalidKey(String),
}

/// Result of looking a key up in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Template(&'a str),
    Namespace,
    NotFound,
}

/// Method key constants, grouped by namespace.
pub mod methods {
    pub mod account {
        pub const GET_BY_PUUID: &str = "ACCOUNT.GET_BY_PUUID";
        pub const GET_BY_RIOT_ID: &str = "ACCOUNT.GET_BY_RIOT_ID";
        pub const GET_ACTIVE_SHARD_FOR_PLAYER: &str = "ACCOUNT.GET_ACTIVE_SHARD_FOR_PLAYER";
    }

    pub mod champion_mastery {
        pub const GET_ALL_CHAMPIONS: &str = "CHAMPION_MASTERY.GET_ALL_CHAMPIONS";
        pub const GET_CHAMPION_MASTERY: &str = "CHAMPION_MASTERY.GET_CHAMPION_MASTERY";
        pub const GET_CHAMPION_MASTERY_SCORE: &str = "CHAMPION_MASTERY.GET_CHAMPION_MASTERY_SCORE";
    }

    pub mod champion {
        pub const GET_CHAMPION_ROTATIONS: &str = "CHAMPION.GET_CHAMPION_ROTATIONS";
    }

    pub mod clash {
        pub const GET_PLAYERS_BY_SUMMONER: &str = "CLASH.GET_PLAYERS_BY_SUMMONER";
        pub const GET_TEAM: &str = "CLASH.GET_TEAM";
        pub const GET_TOURNAMENTS: &str = "CLASH.GET_TOURNAMENTS";
        pub const GET_TOURNAMENT: &str = "CLASH.GET_TOURNAMENT";
        pub const GET_TOURNAMENT_TEAM: &str = "CLASH.GET_TOURNAMENT_TEAM";
    }

    pub mod league_exp {
        pub const GET_LEAGUE_ENTRIES: &str = "LEAGUE_EXP.GET_LEAGUE_ENTRIES";
    }

    pub mod league {
        pub const GET_CHALLENGER_BY_QUEUE: &str = "LEAGUE.GET_CHALLENGER_BY_QUEUE";
        pub const GET_ENTRIES_BY_SUMMONER: &str = "LEAGUE.GET_ENTRIES_BY_SUMMONER";
        pub const GET_ALL_ENTRIES: &str = "LEAGUE.GET_ALL_ENTRIES";
        pub const GET_GRANDMASTER_BY_QUEUE: &str = "LEAGUE.GET_GRANDMASTER_BY_QUEUE";
        pub const GET_LEAGUE_BY_ID: &str = "LEAGUE.GET_LEAGUE_BY_ID";
        pub const GET_MASTER_BY_QUEUE: &str = "LEAGUE.GET_MASTER_BY_QUEUE";
    }

    pub mod lor_match {
        pub const GET_MATCH_IDS_BY_PUUID: &str = "LOR_MATCH.GET_MATCH_IDS_BY_PUUID";
        pub const GET_MATCH_BY_ID: &str = "LOR_MATCH.GET_MATCH_BY_ID";
    }

    pub mod lor_ranked {
        pub const GET_MASTER_TIER: &str = "LOR_RANKED.GET_MASTER_TIER";
    }

    pub mod match_v4 {
        pub const GET_IDS_BY_TOURNAMENT_CODE: &str = "MATCH.GET_IDS_BY_TOURNAMENT_CODE";
        pub const GET_MATCH_BY_ID: &str = "MATCH.GET_MATCH_BY_ID";
        pub const GET_MATCH_BY_ID_AND_TOURNAMENT_CODE: &str =
            "MATCH.GET_MATCH_BY_ID_AND_TOURNAMENT_CODE";
        pub const GET_MATCHLIST_BY_ACCOUNT: &str = "MATCH.GET_MATCHLIST_BY_ACCOUNT";
        pub const GET_TIMELINE_BY_MATCH_ID: &str = "MATCH.GET_TIMELINE_BY_MATCH_ID";
    }

    pub mod match_v5 {
        pub const GET_IDS_BY_PUUID: &str = "MATCH_V5.GET_IDS_BY_PUUID";
        pub const GET_MATCH_BY_ID: &str = "MATCH_V5.GET_MATCH_BY_ID";
        pub const GET_MATCH_TIMELINE_BY_ID: &str = "MATCH_V5.GET_MATCH_TIMELINE_BY_ID";
    }

    pub mod spectator {
        pub const GET_GAME_BY_SUMMONER_ID: &str = "SPECTATOR.GET_GAME_BY_SUMMONER_ID";
        pub const GET_FEATURED_GAMES: &str = "SPECTATOR.GET_FEATURED_GAMES";
    }

    pub mod summoner {
        pub const GET_BY_ACCOUNT_ID: &str = "SUMMONER.GET_BY_ACCOUNT_ID";
        pub const GET_BY_SUMMONER_NAME: &str = "SUMMONER.GET_BY_SUMMONER_NAME";
        pub const GET_BY_PUUID: &str = "SUMMONER.GET_BY_PUUID";
        pub const GET_BY_SUMMONER_ID: &str = "SUMMONER.GET_BY_SUMMONER_ID";
        pub const GET_BY_ACCESS_TOKEN: &str = "SUMMONER.GET_BY_ACCESS_TOKEN";
    }

    pub mod tft_league {
        pub const GET_CHALLENGER: &str = "TFT_LEAGUE.GET_CHALLENGER";
        pub const GET_ENTRIES_BY_SUMMONER: &str = "TFT_LEAGUE.GET_ENTRIES_BY_SUMMONER";
        pub const GET_ALL_ENTRIES: &str = "TFT_LEAGUE.GET_ALL_ENTRIES";
        pub const GET_GRANDMASTER: &str = "TFT_LEAGUE.GET_GRANDMASTER";
        pub const GET_LEAGUE_BY_ID: &str = "TFT_LEAGUE.GET_LEAGUE_BY_ID";
        pub const GET_MASTER: &str = "TFT_LEAGUE.GET_MASTER";
    }

    pub mod tft_match {
        pub const GET_MATCH_IDS_BY_PUUID: &str = "TFT_MATCH.GET_MATCH_IDS_BY_PUUID";
        pub const GET_MATCH_BY_ID: &str = "TFT_MATCH.GET_MATCH_BY_ID";
    }

    pub mod tft_summoner {
        pub const GET_BY_ACCOUNT_ID: &str = "TFT_SUMMONER.GET_BY_ACCOUNT_ID";
        pub const GET_BY_SUMMONER_NAME: &str = "TFT_SUMMONER.GET_BY_SUMMONER_NAME";
        pub const GET_BY_PUUID: &str = "TFT_SUMMONER.GET_BY_PUUID";
        pub const GET_BY_SUMMONER_ID: &str = "TFT_SUMMONER.GET_BY_SUMMONER_ID";
    }

    pub mod third_party_code {
        pub const GET_BY_SUMMONER_ID: &str = "THIRD_PARTY_CODE.GET_BY_SUMMONER_ID";
    }

    pub mod tournament_stub {
        pub const POST_CREATE_CODES: &str = "TOURNAMENT_STUB.POST_CREATE_CODES";
        pub const GET_LOBBY_EVENTS_BY_TOURNAMENT_CODE: &str =
            "TOURNAMENT_STUB.GET_LOBBY_EVENTS_BY_TOURNAMENT_CODE";
        pub const POST_CREATE_PROVIDER: &str = "TOURNAMENT_STUB.POST_CREATE_PROVIDER";
        pub const POST_CREATE_TOURNAMENT: &str = "TOURNAMENT_STUB.POST_CREATE_TOURNAMENT";
    }

    pub mod tournament {
        pub const POST_CREATE_CODES: &str = "TOURNAMENT.POST_CREATE_CODES";
        pub const GET_TOURNAMENT_BY_CODE: &str = "TOURNAMENT.GET_TOURNAMENT_BY_CODE";
        pub const PUT_TOURNAMENT_CODE: &str = "TOURNAMENT.PUT_TOURNAMENT_CODE";
        pub const GET_LOBBY_EVENTS_BY_TOURNAMENT_CODE: &str =
            "TOURNAMENT.GET_LOBBY_EVENTS_BY_TOURNAMENT_CODE";
        pub const POST_CREATE_PROVIDER: &str = "TOURNAMENT.POST_CREATE_PROVIDER";
        pub const POST_CREATE_TOURNAMENT: &str = "TOURNAMENT.POST_CREATE_TOURNAMENT";
    }

    pub mod val_content {
        pub const GET_CONTENT: &str = "VAL_CONTENT.GET_CONTENT";
    }

    pub mod val_match {
        pub const GET_MATCH_BY_ID: &str = "VAL_MATCH.GET_MATCH_BY_ID";
        pub const GET_MATCHLIST_BY_PUUID: &str = "VAL_MATCH.GET_MATCHLIST_BY_PUUID";
        pub const GET_RECENT_MATCHES_BY_QUEUE: &str = "VAL_MATCH.GET_RECENT_MATCHES_BY_QUEUE";
    }
}

const BUILTIN_METHODS: &[(&str, &str)] = &[
    ("ACCOUNT.GET_BY_PUUID", "/riot/account/v1/accounts/by-puuid/{puuid}"),
    ("ACCOUNT.GET_BY_RIOT_ID", "/riot/account/v1/accounts/by-riot-id/{gameName}/{tagLine}"),
    (
        "ACCOUNT.GET_ACTIVE_SHARD_FOR_PLAYER",
        "/riot/account/v1/active-shards/by-game/{game}/by-puuid/{puuid}",
    ),
    (
        "CHAMPION_MASTERY.GET_ALL_CHAMPIONS",
        "/lol/champion-mastery/v4/champion-masteries/by-summoner/{summonerId}",
    ),
    (
        "CHAMPION_MASTERY.GET_CHAMPION_MASTERY",
        "/lol/champion-mastery/v4/champion-masteries/by-summoner/{summonerId}/by-champion/{championId}",
    ),
    (
        "CHAMPION_MASTERY.GET_CHAMPION_MASTERY_SCORE",
        "/lol/champion-mastery/v4/scores/by-summoner/{summonerId}",
    ),
    ("CHAMPION.GET_CHAMPION_ROTATIONS", "/lol/platform/v3/champion-rotations"),
    ("CLASH.GET_PLAYERS_BY_SUMMONER", "/lol/clash/v1/players/by-summoner/{summonerId}"),
    ("CLASH.GET_TEAM", "/lol/clash/v1/teams/{teamId}"),
    ("CLASH.GET_TOURNAMENTS", "/lol/clash/v1/tournaments"),
    ("CLASH.GET_TOURNAMENT", "/lol/clash/v1/tournaments/{tournamentId}"),
    ("CLASH.GET_TOURNAMENT_TEAM", "/lol/clash/v1/tournaments/by-team/{teamId}"),
    ("LEAGUE_EXP.GET_LEAGUE_ENTRIES", "/lol/league-exp/v4/entries/{queue}/{tier}/{division}"),
    ("LEAGUE.GET_CHALLENGER_BY_QUEUE", "/lol/league/v4/challengerleagues/by-queue/{queue}"),
    ("LEAGUE.GET_ENTRIES_BY_SUMMONER", "/lol/league/v4/entries/by-summoner/{summonerId}"),
    ("LEAGUE.GET_ALL_ENTRIES", "/lol/league/v4/entries/{queue}/{tier}/{division}"),
    ("LEAGUE.GET_GRANDMASTER_BY_QUEUE", "/lol/league/v4/grandmasterleagues/by-queue/{queue}"),
    ("LEAGUE.GET_LEAGUE_BY_ID", "/lol/league/v4/leagues/{leagueId}"),
    ("LEAGUE.GET_MASTER_BY_QUEUE", "/lol/league/v4/masterleagues/by-queue/{queue}"),
    ("LOR_MATCH.GET_MATCH_IDS_BY_PUUID", "/lor/match/v1/matches/by-puuid/{puuid}/ids"),
    ("LOR_MATCH.GET_MATCH_BY_ID", "/lor/match/v1/matches/{matchId}"),
    ("LOR_RANKED.GET_MASTER_TIER", "/lor/ranked/v1/leaderboards"),
    (
        "MATCH.GET_IDS_BY_TOURNAMENT_CODE",
        "/lol/match/v4/matches/by-tournament-code/{tournamentCode}/ids",
    ),
    ("MATCH.GET_MATCH_BY_ID", "/lol/match/v4/matches/{matchId}"),
    (
        "MATCH.GET_MATCH_BY_ID_AND_TOURNAMENT_CODE",
        "/lol/match/v4/matches/{matchId}/by-tournament-code/{tournamentCode}",
    ),
    ("MATCH.GET_MATCHLIST_BY_ACCOUNT", "/lol/match/v4/matchlists/by-account/{accountId}"),
    ("MATCH.GET_TIMELINE_BY_MATCH_ID", "/lol/match/v4/timelines/by-match/{matchId}"),
    ("MATCH_V5.GET_IDS_BY_PUUID", "/lol/match/v5/matches/by-puuid/{puuid}/ids"),
    ("MATCH_V5.GET_MATCH_BY_ID", "/lol/match/v5/matches/{matchId}"),
    ("MATCH_V5.GET_MATCH_TIMELINE_BY_ID", "/lol/match/v5/matches/{matchId}/timeline"),
    (
        "SPECTATOR.GET_GAME_BY_SUMMONER_ID",
        "/lol/spectator/v4/active-games/by-summoner/{summonerId}",
    ),
    ("SPECTATOR.GET_FEATURED_GAMES", "/lol/spectator/v4/featured-games"),
    ("SUMMONER.GET_BY_ACCOUNT_ID", "/lol/summoner/v4/summoners/by-account/{accountId}"),
    ("SUMMONER.GET_BY_SUMMONER_NAME", "/lol/summoner/v4/summoners/by-name/{summonerName}"),
    ("SUMMONER.GET_BY_PUUID", "/lol/summoner/v4/summoners/by-puuid/{puuid}"),
    ("SUMMONER.GET_BY_SUMMONER_ID", "/lol/summoner/v4/summoners/{summonerId}"),
    ("SUMMONER.GET_BY_ACCESS_TOKEN", "/lol/summoner/v4/summoners/me"),
    ("TFT_LEAGUE.GET_CHALLENGER", "/tft/league/v1/challenger"),
    ("TFT_LEAGUE.GET_ENTRIES_BY_SUMMONER", "/tft/league/v1/entries/by-summoner/{summonerId}"),
    ("TFT_LEAGUE.GET_ALL_ENTRIES", "/tft/league/v1/entries/{tier}/{division}"),
    ("TFT_LEAGUE.GET_GRANDMASTER", "/tft/league/v1/grandmaster"),
    ("TFT_LEAGUE.GET_LEAGUE_BY_ID", "/tft/league/v1/leagues/{leagueId}"),
    ("TFT_LEAGUE.GET_MASTER", "/tft/league/v1/master"),
    ("TFT_MATCH.GET_MATCH_IDS_BY_PUUID", "/tft/match/v1/matches/by-puuid/{puuid}/ids"),
    ("TFT_MATCH.GET_MATCH_BY_ID", "/tft/match/v1/matches/{matchId}"),
    ("TFT_SUMMONER.GET_BY_ACCOUNT_ID", "/tft/summoner/v1/summoners/by-account/{accountId}"),
    ("TFT_SUMMONER.GET_BY_SUMMONER_NAME", "/tft/summoner/v1/summoners/by-name/{summonerName}"),
    ("TFT_SUMMONER.GET_BY_PUUID", "/tft/summoner/v1/summoners/by-puuid/{puuid}"),
    ("TFT_SUMMONER.GET_BY_SUMMONER_ID", "/tft/summoner/v1/summoners/{summonerId}"),
    (
        "THIRD_PARTY_CODE.GET_BY_SUMMONER_ID",
        "/lol/platform/v4/third-party-code/by-summoner/{summonerId}",
    ),
    ("TOURNAMENT_STUB.POST_CREATE_CODES", "/lol/tournament-stub/v4/codes"),
    (
        "TOURNAMENT_STUB.GET_LOBBY_EVENTS_BY_TOURNAMENT_CODE",
        "/lol/tournament-stub/v4/lobby-events/by-code/{tournamentCode}",
    ),
    ("TOURNAMENT_STUB.POST_CREATE_PROVIDER", "/lol/tournament-stub/v4/providers"),
    ("TOURNAMENT_STUB.POST_CREATE_TOURNAMENT", "/lol/tournament-stub/v4/tournaments"),
    ("TOURNAMENT.POST_CREATE_CODES", "/lol/tournament/v4/codes"),
    ("TOURNAMENT.GET_TOURNAMENT_BY_CODE", "/lol/tournament/v4/codes/{tournamentCode}"),
    ("TOURNAMENT.PUT_TOURNAMENT_CODE", "/lol/tournament/v4/codes/{tournamentCode}"),
    (
        "TOURNAMENT.GET_LOBBY_EVENTS_BY_TOURNAMENT_CODE",
        "/lol/tournament/v4/lobby-events/by-code/{tournamentCode}",
    ),
    ("TOURNAMENT.POST_CREATE_PROVIDER", "/lol/tournament/v4/providers"),
    ("TOURNAMENT.POST_CREATE_TOURNAMENT", "/lol/tournament/v4/tournaments"),
    ("VAL_CONTENT.GET_CONTENT", "/val/content/v1/contents"),
    ("VAL_MATCH.GET_MATCH_BY_ID", "/val/match/v1/matches/{matchId}"),
    ("VAL_MATCH.GET_MATCHLIST_BY_PUUID", "/val/match/v1/matchlists/by-puuid/{puuid}"),
    (
        "VAL_MATCH.GET_RECENT_MATCHES_BY_QUEUE",
        "/val/match/v1/recent-matches/by-queue/{queue}",
    ),
];

static BUILTIN: LazyLock<Arc<MethodRegistry>> = LazyLock::new(|| {
    Arc::new(MethodRegistry {
        entries: BUILTIN_METHODS
            .iter()
            .map(|(key, template)| ((*key).to_string(), (*template).to_string()))
            .collect(),
    })
});

/// Flat lookup table from method key to path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRegistry {
    entries: BTreeMap<String, String>,
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::builtin().as_ref().clone()
    }
}

impl MethodRegistry {
    /// Shared instance of the built-in catalog.
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Registry with no methods at all.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register (or replace) a method.
    pub fn with_method(
        mut self,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        let key = key.into();
        if !is_valid_key(&key) {
            return Err(RegistryError::InvalidKey(key));
        }
        self.entries.insert(key, template.into());
        Ok(self)
    }

    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        if let Some(template) = self.entries.get(key) {
            return Lookup::Template(template);
        }

        // BTreeMap ordering puts every "KEY.*" entry right after "KEY."
        let prefix = format!("{key}.");
        match self.entries.range(prefix.clone()..).next() {
            Some((next, _)) if !key.is_empty() && next.starts_with(&prefix) => Lookup::Namespace,
            _ => Lookup::NotFound,
        }
    }

    pub fn resolve(&self, key: &str) -> Result<&str, RegistryError> {
        match self.lookup(key) {
            Lookup::Template(template) => Ok(template),
            Lookup::Namespace => Err(RegistryError::NotALeaf(key.to_string())),
            Lookup::NotFound => Err(RegistryError::UnknownMethod(key.to_string())),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn is_valid_key(key: &str) -> bool {
    let mut parts = key.split('.');
    let valid_part = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    };
    parts.clone().count() >= 2 && parts.all(valid_part)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let registry = MethodRegistry::builtin();
        assert_eq!(
            registry.resolve(methods::summoner::GET_BY_SUMMONER_NAME),
            Ok("/lol/summoner/v4/summoners/by-name/{summonerName}")
        );
        assert_eq!(
            registry.lookup(methods::match_v5::GET_MATCH_TIMELINE_BY_ID),
            Lookup::Template("/lol/match/v5/matches/{matchId}/timeline")
        );
    }

    #[test]
    fn test_namespace_is_not_a_leaf() {
        let registry = MethodRegistry::builtin();
        assert_eq!(registry.lookup("SUMMONER"), Lookup::Namespace);
        assert_eq!(
            registry.resolve("SUMMONER"),
            Err(RegistryError::NotALeaf("SUMMONER".to_string()))
        );
    }

    #[test]
    fn test_unknown_key() {
        let registry = MethodRegistry::builtin();
        assert_eq!(registry.lookup("SUMMONER.GET_BY_NOTHING"), Lookup::NotFound);
        assert_eq!(registry.lookup(""), Lookup::NotFound);
        // Prefix of a namespace name is not a namespace
        assert_eq!(registry.lookup("SUMMON"), Lookup::NotFound);
        assert!(matches!(
            registry.resolve("NOPE.NOPE"),
            Err(RegistryError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_every_constant_is_registered() {
        let registry = MethodRegistry::builtin();
        let keys = [
            methods::account::GET_BY_PUUID,
            methods::account::GET_BY_RIOT_ID,
            methods::account::GET_ACTIVE_SHARD_FOR_PLAYER,
            methods::champion_mastery::GET_ALL_CHAMPIONS,
            methods::champion_mastery::GET_CHAMPION_MASTERY,
            methods::champion_mastery::GET_CHAMPION_MASTERY_SCORE,
            methods::champion::GET_CHAMPION_ROTATIONS,
            methods::clash::GET_PLAYERS_BY_SUMMONER,
            methods::clash::GET_TEAM,
            methods::clash::GET_TOURNAMENTS,
            methods::clash::GET_TOURNAMENT,
            methods::clash::GET_TOURNAMENT_TEAM,
            methods::league_exp::GET_LEAGUE_ENTRIES,
            methods::league::GET_CHALLENGER_BY_QUEUE,
            methods::league::GET_ENTRIES_BY_SUMMONER,
            methods::league::GET_ALL_ENTRIES,
            methods::league::GET_GRANDMASTER_BY_QUEUE,
            methods::league::GET_LEAGUE_BY_ID,
            methods::league::GET_MASTER_BY_QUEUE,
            methods::lor_match::GET_MATCH_IDS_BY_PUUID,
            methods::lor_match::GET_MATCH_BY_ID,
            methods::lor_ranked::GET_MASTER_TIER,
            methods::match_v4::GET_IDS_BY_TOURNAMENT_CODE,
            methods::match_v4::GET_MATCH_BY_ID,
            methods::match_v4::GET_MATCH_BY_ID_AND_TOURNAMENT_CODE,
            methods::match_v4::GET_MATCHLIST_BY_ACCOUNT,
            methods::match_v4::GET_TIMELINE_BY_MATCH_ID,
            methods::match_v5::GET_IDS_BY_PUUID,
            methods::match_v5::GET_MATCH_BY_ID,
            methods::match_v5::GET_MATCH_TIMELINE_BY_ID,
            methods::spectator::GET_GAME_BY_SUMMONER_ID,
            methods::spectator::GET_FEATURED_GAMES,
            methods::summoner::GET_BY_ACCOUNT_ID,
            methods::summoner::GET_BY_SUMMONER_NAME,
            methods::summoner::GET_BY_PUUID,
            methods::summoner::GET_BY_SUMMONER_ID,
            methods::summoner::GET_BY_ACCESS_TOKEN,
            methods::tft_league::GET_CHALLENGER,
            methods::tft_league::GET_ENTRIES_BY_SUMMONER,
            methods::tft_league::GET_ALL_ENTRIES,
            methods::tft_league::GET_GRANDMASTER,
            methods::tft_league::GET_LEAGUE_BY_ID,
            methods::tft_league::GET_MASTER,
            methods::tft_match::GET_MATCH_IDS_BY_PUUID,
            methods::tft_match::GET_MATCH_BY_ID,
            methods::tft_summoner::GET_BY_ACCOUNT_ID,
            methods::tft_summoner::GET_BY_SUMMONER_NAME,
            methods::tft_summoner::GET_BY_PUUID,
            methods::tft_summoner::GET_BY_SUMMONER_ID,
            methods::third_party_code::GET_BY_SUMMONER_ID,
            methods::tournament_stub::POST_CREATE_CODES,
            methods::tournament_stub::GET_LOBBY_EVENTS_BY_TOURNAMENT_CODE,
            methods::tournament_stub::POST_CREATE_PROVIDER,
            methods::tournament_stub::POST_CREATE_TOURNAMENT,
            methods::tournament::POST_CREATE_CODES,
            methods::tournament::GET_TOURNAMENT_BY_CODE,
            methods::tournament::PUT_TOURNAMENT_CODE,
            methods::tournament::GET_LOBBY_EVENTS_BY_TOURNAMENT_CODE,
            methods::tournament::POST_CREATE_PROVIDER,
            methods::tournament::POST_CREATE_TOURNAMENT,
            methods::val_content::GET_CONTENT,
            methods::val_match::GET_MATCH_BY_ID,
            methods::val_match::GET_MATCHLIST_BY_PUUID,
            methods::val_match::GET_RECENT_MATCHES_BY_QUEUE,
        ];
        for key in keys {
            assert!(registry.contains(key), "{key} missing from registry");
        }
        assert_eq!(registry.len(), keys.len());
    }

    #[test]
    fn test_custom_method_registration() {
        let registry = MethodRegistry::empty()
            .with_method("STATUS.GET_PLATFORM_DATA", "/lol/status/v4/platform-data")
            .expect("valid key");
        assert_eq!(
            registry.resolve("STATUS.GET_PLATFORM_DATA"),
            Ok("/lol/status/v4/platform-data")
        );
        assert_eq!(registry.lookup("STATUS"), Lookup::Namespace);
    }

    #[test]
    fn test_invalid_key_rejected() {
        for key in ["STATUS", "status.get", "STATUS..GET", ".GET", "STATUS.GET-X"] {
            assert_eq!(
                MethodRegistry::empty().with_method(key, "/x"),
                Err(RegistryError::InvalidKey(key.to_string()))
            );
        }
    }
}
