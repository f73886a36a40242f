//! Routing identifiers for the Riot web API.
//!
//! Riot partitions its API across three families of hosts, all of the form
//! `https://{id}.api.riotgames.com`:
//! - platform shards for League of Legends / TFT (`euw1`, `na1`, ...)
//! - regional clusters for cross-shard services (`americas`, `europe`, ...)
//! - Valorant shards (`eu`, `ap`, ...)
//!
//! The lowercase id doubles as the rate-limit partition key and as part of
//! every cache key, since it is embedded in the resolved URL.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// API routing target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Brazil
    Br1,
    /// Europe Nordic & East
    Eun1,
    /// Europe West
    Euw1,
    /// Japan
    Jp1,
    /// Korea (LoL platform and Valorant shard)
    Kr,
    /// Latin America North
    La1,
    /// Latin America South
    La2,
    /// North America
    Na1,
    /// Oceania
    Oc1,
    /// Turkey
    Tr1,
    /// Russia
    Ru,
    /// Philippines
    Ph2,
    /// Singapore
    Sg2,
    /// Thailand
    Th2,
    /// Taiwan
    Tw2,
    /// Vietnam
    Vn2,
    /// Americas routing cluster
    Americas,
    /// Asia routing cluster
    Asia,
    /// Europe routing cluster
    Europe,
    /// South-East Asia routing cluster
    Sea,
    /// Valorant Asia-Pacific
    Ap,
    /// Valorant Brazil
    Br,
    /// Valorant Europe
    Eu,
    /// Valorant Latin America
    Latam,
    /// Valorant North America
    Na,
    /// Valorant esports
    Esports,
}

impl Region {
    pub const ALL: [Self; 26] = [
        Self::Br1,
        Self::Eun1,
        Self::Euw1,
        Self::Jp1,
        Self::Kr,
        Self::La1,
        Self::La2,
        Self::Na1,
        Self::Oc1,
        Self::Tr1,
        Self::Ru,
        Self::Ph2,
        Self::Sg2,
        Self::Th2,
        Self::Tw2,
        Self::Vn2,
        Self::Americas,
        Self::Asia,
        Self::Europe,
        Self::Sea,
        Self::Ap,
        Self::Br,
        Self::Eu,
        Self::Latam,
        Self::Na,
        Self::Esports,
    ];

    /// Wire id substituted into the host template.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Br1 => "br1",
            Self::Eun1 => "eun1",
            Self::Euw1 => "euw1",
            Self::Jp1 => "jp1",
            Self::Kr => "kr",
            Self::La1 => "la1",
            Self::La2 => "la2",
            Self::Na1 => "na1",
            Self::Oc1 => "oc1",
            Self::Tr1 => "tr1",
            Self::Ru => "ru",
            Self::Ph2 => "ph2",
            Self::Sg2 => "sg2",
            Self::Th2 => "th2",
            Self::Tw2 => "tw2",
            Self::Vn2 => "vn2",
            Self::Americas => "americas",
            Self::Asia => "asia",
            Self::Europe => "europe",
            Self::Sea => "sea",
            Self::Ap => "ap",
            Self::Br => "br",
            Self::Eu => "eu",
            Self::Latam => "latam",
            Self::Na => "na",
            Self::Esports => "esports",
        }
    }

    /// Whether this is one of the cross-shard routing clusters.
    pub fn is_cluster(&self) -> bool {
        matches!(
            self,
            Self::Americas | Self::Asia | Self::Europe | Self::Sea
        )
    }

    /// Routing cluster serving a LoL platform shard.
    ///
    /// Account and match-v5 endpoints live on clusters rather than shards.
    /// Anything without a known mapping falls back to `Americas`.
    pub fn cluster(&self) -> Self {
        match self {
            Self::Na1 | Self::Br1 | Self::La1 | Self::La2 => Self::Americas,
            Self::Kr | Self::Jp1 => Self::Asia,
            Self::Euw1 | Self::Eun1 | Self::Tr1 | Self::Ru => Self::Europe,
            Self::Oc1 | Self::Ph2 | Self::Sg2 | Self::Th2 | Self::Tw2 | Self::Vn2 => Self::Sea,
            cluster if cluster.is_cluster() => *cluster,
            _ => Self::Americas,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|region| region.as_str() == wanted)
            .ok_or_else(|| ApiError::InvalidArgument(format!("unknown region '{s}'")))
    }
}
