//! Response shapes for the typed endpoint helpers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveShardDto {
    pub puuid: String,
    pub game: String,
    pub active_shard: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    /// Encrypted summoner id
    pub id: String,
    pub account_id: String,
    pub puuid: String,
    #[serde(default)]
    pub name: Option<String>,
    pub profile_icon_id: i64,
    /// Epoch milliseconds of the last name, level or icon change
    pub revision_date: i64,
    pub summoner_level: i64,
}

/// Free champion rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionInfoDto {
    pub max_new_player_level: i32,
    pub free_champion_ids_for_new_players: Vec<i64>,
    pub free_champion_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniSeriesDto {
    pub losses: i32,
    pub progress: String,
    pub target: i32,
    pub wins: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    pub league_id: String,
    pub summoner_id: String,
    #[serde(default)]
    pub summoner_name: Option<String>,
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: i32,
    pub wins: i32,
    pub losses: i32,
    pub hot_streak: bool,
    pub veteran: bool,
    pub fresh_blood: bool,
    pub inactive: bool,
    #[serde(default)]
    pub mini_series: Option<MiniSeriesDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueItemDto {
    pub summoner_id: String,
    #[serde(default)]
    pub summoner_name: Option<String>,
    pub rank: String,
    pub league_points: i32,
    pub wins: i32,
    pub losses: i32,
    pub hot_streak: bool,
    pub veteran: bool,
    pub fresh_blood: bool,
    pub inactive: bool,
    #[serde(default)]
    pub mini_series: Option<MiniSeriesDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueListDto {
    pub league_id: String,
    pub tier: String,
    pub name: String,
    pub queue: String,
    pub entries: Vec<LeagueItemDto>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summoner_from_wire() {
        let summoner: SummonerDto = serde_json::from_value(json!({
            "id": "sid",
            "accountId": "aid",
            "puuid": "p",
            "name": "Demos",
            "profileIconId": 4,
            "revisionDate": 1_600_000_000_000_i64,
            "summonerLevel": 300
        }))
        .expect("summoner");
        assert_eq!(summoner.name.as_deref(), Some("Demos"));
        assert_eq!(summoner.summoner_level, 300);
    }

    #[test]
    fn test_league_entry_without_series() {
        let entry: LeagueEntryDto = serde_json::from_value(json!({
            "leagueId": "l",
            "summonerId": "s",
            "queueType": "RANKED_SOLO_5x5",
            "tier": "GOLD",
            "rank": "II",
            "leaguePoints": 42,
            "wins": 10,
            "losses": 9,
            "hotStreak": false,
            "veteran": false,
            "freshBlood": true,
            "inactive": false
        }))
        .expect("entry");
        assert!(entry.mini_series.is_none());
        assert!(entry.summoner_name.is_none());
        assert_eq!(entry.league_points, 42);
    }

    #[test]
    fn test_account_optional_riot_id() {
        let account: AccountDto =
            serde_json::from_value(json!({"puuid": "p"})).expect("account");
        assert_eq!(account.game_name, None);
    }
}
