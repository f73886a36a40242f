//! Typed helpers for the most used endpoints
//!
//! Each helper fills in the method key, path parameters and a readable job id
//! of the form `{region}.{namespace}.{operation}.{args...}`, then goes through
//! [`RiotApi::request`] like any other call, so caching and rate limiting
//! apply unchanged.
//!
//! ```rust,no_run
//! use rift_api::{ClientConfig, Region, RiotApi};
//!
//! # async fn run() -> rift_api::Result<()> {
//! let api = RiotApi::new("RGAPI-00000000", ClientConfig::default())?;
//! let account = api.account().by_riot_id(Region::Europe, "Demos", "EUW").await?;
//! let ids = api
//!     .match_v5()
//!     .ids_by_puuid(Region::Europe, &account.puuid, &Default::default())
//!     .await?;
//! println!("{} matches", ids.len());
//! # Ok(())
//! # }
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{RequestOptions, RiotApi};
use crate::dto::{
    AccountDto, ActiveShardDto, ChampionInfoDto, LeagueEntryDto, LeagueListDto, SummonerDto,
};
use crate::error::Result;
use crate::region::Region;
use crate::registry::methods;
use crate::url_builder::{PathParams, QueryParams};

/// Account lookups get ahead of ordinary traffic.
const ACCOUNT_PRIORITY: u8 = 4;

impl RiotApi {
    pub fn account(&self) -> AccountApi<'_> {
        AccountApi { api: self }
    }

    pub fn summoner(&self) -> SummonerApi<'_> {
        SummonerApi { api: self }
    }

    pub fn champion(&self) -> ChampionApi<'_> {
        ChampionApi { api: self }
    }

    pub fn league(&self) -> LeagueApi<'_> {
        LeagueApi { api: self }
    }

    pub fn match_v5(&self) -> MatchV5Api<'_> {
        MatchV5Api { api: self }
    }

    pub fn champion_mastery(&self) -> ChampionMasteryApi<'_> {
        ChampionMasteryApi { api: self }
    }

    pub fn clash(&self) -> ClashApi<'_> {
        ClashApi { api: self }
    }

    pub fn spectator(&self) -> SpectatorApi<'_> {
        SpectatorApi { api: self }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        region: Region,
        method_key: &str,
        path_params: PathParams,
        options: RequestOptions,
    ) -> Result<T> {
        self.request(region, method_key, &path_params, options).await
    }
}

fn job(id: String) -> RequestOptions {
    RequestOptions {
        id: Some(id),
        ..RequestOptions::default()
    }
}

/// `riot/account/v1`; regions are routing clusters.
#[derive(Debug, Clone, Copy)]
pub struct AccountApi<'a> {
    api: &'a RiotApi,
}

impl AccountApi<'_> {
    pub async fn by_puuid(&self, region: Region, puuid: &str) -> Result<AccountDto> {
        self.api
            .call(
                region,
                methods::account::GET_BY_PUUID,
                PathParams::new().with("puuid", puuid),
                RequestOptions {
                    priority: Some(ACCOUNT_PRIORITY),
                    ..job(format!("{region}.account.getByPUUID.{puuid}"))
                },
            )
            .await
    }

    pub async fn by_riot_id(
        &self,
        region: Region,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto> {
        self.api
            .call(
                region,
                methods::account::GET_BY_RIOT_ID,
                PathParams::new()
                    .with("gameName", game_name)
                    .with("tagLine", tag_line),
                RequestOptions {
                    priority: Some(ACCOUNT_PRIORITY),
                    ..job(format!(
                        "{region}.account.getByRiotId.{game_name}.{tag_line}"
                    ))
                },
            )
            .await
    }

    /// `game` is `val` or `lor`.
    pub async fn active_shard(
        &self,
        region: Region,
        game: &str,
        puuid: &str,
    ) -> Result<ActiveShardDto> {
        self.api
            .call(
                region,
                methods::account::GET_ACTIVE_SHARD_FOR_PLAYER,
                PathParams::new().with("game", game).with("puuid", puuid),
                job(format!(
                    "{region}.account.getActiveShardForPlayer.{game}.{puuid}"
                )),
            )
            .await
    }
}

/// `lol/summoner/v4` on platform shards.
#[derive(Debug, Clone, Copy)]
pub struct SummonerApi<'a> {
    api: &'a RiotApi,
}

impl SummonerApi<'_> {
    pub async fn by_name(&self, region: Region, summoner_name: &str) -> Result<SummonerDto> {
        self.api
            .call(
                region,
                methods::summoner::GET_BY_SUMMONER_NAME,
                PathParams::new().with("summonerName", summoner_name),
                job(format!("{region}.summoner.getBySummonerName.{summoner_name}")),
            )
            .await
    }

    pub async fn by_puuid(&self, region: Region, puuid: &str) -> Result<SummonerDto> {
        self.api
            .call(
                region,
                methods::summoner::GET_BY_PUUID,
                PathParams::new().with("puuid", puuid),
                job(format!("{region}.summoner.getByPUUID.{puuid}")),
            )
            .await
    }

    pub async fn by_account_id(&self, region: Region, account_id: &str) -> Result<SummonerDto> {
        self.api
            .call(
                region,
                methods::summoner::GET_BY_ACCOUNT_ID,
                PathParams::new().with("accountId", account_id),
                job(format!("{region}.summoner.getByAccountId.{account_id}")),
            )
            .await
    }

    pub async fn by_summoner_id(&self, region: Region, summoner_id: &str) -> Result<SummonerDto> {
        self.api
            .call(
                region,
                methods::summoner::GET_BY_SUMMONER_ID,
                PathParams::new().with("summonerId", summoner_id),
                job(format!("{region}.summoner.getBySummonerId.{summoner_id}")),
            )
            .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChampionApi<'a> {
    api: &'a RiotApi,
}

impl ChampionApi<'_> {
    /// Current free-to-play rotation.
    pub async fn rotations(&self, region: Region) -> Result<ChampionInfoDto> {
        self.api
            .call(
                region,
                methods::champion::GET_CHAMPION_ROTATIONS,
                PathParams::new(),
                job(format!("{region}.champion.getRotations")),
            )
            .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LeagueApi<'a> {
    api: &'a RiotApi,
}

impl LeagueApi<'_> {
    pub async fn entries_by_summoner(
        &self,
        region: Region,
        summoner_id: &str,
    ) -> Result<Vec<LeagueEntryDto>> {
        self.api
            .call(
                region,
                methods::league::GET_ENTRIES_BY_SUMMONER,
                PathParams::new().with("summonerId", summoner_id),
                job(format!("{region}.league.getEntriesBySummonerId.{summoner_id}")),
            )
            .await
    }

    /// `queue` is a ranked queue name such as `RANKED_SOLO_5x5`.
    pub async fn challenger(&self, region: Region, queue: &str) -> Result<LeagueListDto> {
        self.apex(region, methods::league::GET_CHALLENGER_BY_QUEUE, "getChallengerByQueue", queue)
            .await
    }

    pub async fn grandmaster(&self, region: Region, queue: &str) -> Result<LeagueListDto> {
        self.apex(
            region,
            methods::league::GET_GRANDMASTER_BY_QUEUE,
            "getGrandmasterByQueue",
            queue,
        )
        .await
    }

    pub async fn master(&self, region: Region, queue: &str) -> Result<LeagueListDto> {
        self.apex(region, methods::league::GET_MASTER_BY_QUEUE, "getMasterByQueue", queue)
            .await
    }

    async fn apex(
        &self,
        region: Region,
        method_key: &str,
        operation: &str,
        queue: &str,
    ) -> Result<LeagueListDto> {
        self.api
            .call(
                region,
                method_key,
                PathParams::new().with("queue", queue),
                job(format!("{region}.league.{operation}.{queue}")),
            )
            .await
    }
}

/// Filters for match id listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchIdsQuery {
    pub queue: Option<u32>,
    /// `ranked`, `normal`, `tourney` or `tutorial`
    pub match_type: Option<String>,
    pub start: Option<u32>,
    pub count: Option<u32>,
}

impl MatchIdsQuery {
    fn to_params(&self) -> Option<QueryParams> {
        let mut params = QueryParams::new();
        if let Some(queue) = self.queue {
            params.push("queue", queue);
        }
        if let Some(match_type) = &self.match_type {
            params.push("type", match_type.as_str());
        }
        if let Some(start) = self.start {
            params.push("start", start);
        }
        if let Some(count) = self.count {
            params.push("count", count);
        }
        (!params.is_empty()).then_some(params)
    }
}

/// `lol/match/v5`; regions are routing clusters. Match payloads are
/// returned as raw JSON.
#[derive(Debug, Clone, Copy)]
pub struct MatchV5Api<'a> {
    api: &'a RiotApi,
}

impl MatchV5Api<'_> {
    pub async fn ids_by_puuid(
        &self,
        region: Region,
        puuid: &str,
        query: &MatchIdsQuery,
    ) -> Result<Vec<String>> {
        self.api
            .call(
                region,
                methods::match_v5::GET_IDS_BY_PUUID,
                PathParams::new().with("puuid", puuid),
                RequestOptions {
                    params: query.to_params(),
                    ..job(format!("{region}.matchv5.getIdsByPuuid.{puuid}"))
                },
            )
            .await
    }

    pub async fn by_id(&self, region: Region, match_id: &str) -> Result<Value> {
        self.api
            .call(
                region,
                methods::match_v5::GET_MATCH_BY_ID,
                PathParams::new().with("matchId", match_id),
                job(format!("{region}.matchv5.getMatchById.{match_id}")),
            )
            .await
    }

    pub async fn timeline(&self, region: Region, match_id: &str) -> Result<Value> {
        self.api
            .call(
                region,
                methods::match_v5::GET_MATCH_TIMELINE_BY_ID,
                PathParams::new().with("matchId", match_id),
                job(format!("{region}.matchv5.getMatchTimelineById.{match_id}")),
            )
            .await
    }
}

/// `lol/champion-mastery/v4`; payloads are returned as raw JSON.
#[derive(Debug, Clone, Copy)]
pub struct ChampionMasteryApi<'a> {
    api: &'a RiotApi,
}

impl ChampionMasteryApi<'_> {
    pub async fn all(&self, region: Region, summoner_id: &str) -> Result<Value> {
        self.api
            .call(
                region,
                methods::champion_mastery::GET_ALL_CHAMPIONS,
                PathParams::new().with("summonerId", summoner_id),
                job(format!(
                    "{region}.championMastery.getAllChampions.{summoner_id}"
                )),
            )
            .await
    }

    pub async fn by_champion(
        &self,
        region: Region,
        summoner_id: &str,
        champion_id: u32,
    ) -> Result<Value> {
        self.api
            .call(
                region,
                methods::champion_mastery::GET_CHAMPION_MASTERY,
                PathParams::new()
                    .with("summonerId", summoner_id)
                    .with("championId", champion_id),
                job(format!(
                    "{region}.championMastery.getChampionMastery.{summoner_id}.{champion_id}"
                )),
            )
            .await
    }

    /// Sum of mastery levels across champions.
    pub async fn score(&self, region: Region, summoner_id: &str) -> Result<u32> {
        self.api
            .call(
                region,
                methods::champion_mastery::GET_CHAMPION_MASTERY_SCORE,
                PathParams::new().with("summonerId", summoner_id),
                job(format!(
                    "{region}.championMastery.getChampionMasteryScore.{summoner_id}"
                )),
            )
            .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClashApi<'a> {
    api: &'a RiotApi,
}

impl ClashApi<'_> {
    pub async fn players_by_summoner(&self, region: Region, summoner_id: &str) -> Result<Value> {
        self.api
            .call(
                region,
                methods::clash::GET_PLAYERS_BY_SUMMONER,
                PathParams::new().with("summonerId", summoner_id),
                job(format!("{region}.clash.getPlayersBySummoner.{summoner_id}")),
            )
            .await
    }

    pub async fn team(&self, region: Region, team_id: &str) -> Result<Value> {
        self.api
            .call(
                region,
                methods::clash::GET_TEAM,
                PathParams::new().with("teamId", team_id),
                job(format!("{region}.clash.getTeam.{team_id}")),
            )
            .await
    }

    /// Active and upcoming tournaments.
    pub async fn tournaments(&self, region: Region) -> Result<Value> {
        self.api
            .call(
                region,
                methods::clash::GET_TOURNAMENTS,
                PathParams::new(),
                job(format!("{region}.clash.getTournaments")),
            )
            .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpectatorApi<'a> {
    api: &'a RiotApi,
}

impl SpectatorApi<'_> {
    /// Live game for a summoner; a summoner not in game answers 404.
    pub async fn active_game(&self, region: Region, summoner_id: &str) -> Result<Value> {
        self.api
            .call(
                region,
                methods::spectator::GET_GAME_BY_SUMMONER_ID,
                PathParams::new().with("summonerId", summoner_id),
                job(format!("{region}.spectator.getGameBySummonerId.{summoner_id}")),
            )
            .await
    }

    pub async fn featured_games(&self, region: Region) -> Result<Value> {
        self.api
            .call(
                region,
                methods::spectator::GET_FEATURED_GAMES,
                PathParams::new(),
                job(format!("{region}.spectator.getFeaturedGames")),
            )
            .await
    }
}
