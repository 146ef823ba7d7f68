//! Data Transfer Objects for the HTTP API.
//!
//! Bets are returned as HAL resources: the record's own fields plus a
//! `_links` object whose `self`, `update` and `delete` entries all point at
//! the bet's item URL.

use serde::{Deserialize, Serialize};

use crate::api::{Bet, BetId};

/// Path of the bet collection.
pub const BETS_PATH: &str = "/bets";

/// Item URL for a bet.
pub fn bet_href(id: BetId) -> String {
    format!("{}/{}", BETS_PATH, id)
}

/// A HAL link object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// Links attached to every bet resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub update: Link,
    pub delete: Link,
}

impl BetLinks {
    pub fn for_bet(id: BetId) -> Self {
        let href = bet_href(id);
        Self {
            self_link: Link::new(href.clone()),
            update: Link::new(href.clone()),
            delete: Link::new(href),
        }
    }
}

/// HAL envelope for a single bet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetResource {
    #[serde(flatten)]
    pub bet: Bet,
    #[serde(rename = "_links")]
    pub links: BetLinks,
}

impl From<Bet> for BetResource {
    fn from(bet: Bet) -> Self {
        let links = BetLinks::for_bet(bet.id);
        Self { bet, links }
    }
}

/// Plain `{"detail": "..."}` message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Crate version
    pub version: String,
    /// Database connection status
    pub database: String,
}
