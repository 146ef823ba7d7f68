//! Public API surface for the bet service.
//!
//! Domain types shared by the repository layer and the HTTP layer.
//! All types derive Serialize/Deserialize for JSON serialization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bet identifier (database primary key, assigned by the store).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BetId(pub i32);

impl BetId {
    pub fn new(value: i32) -> Self {
        BetId(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for BetId {
    fn from(value: i32) -> Self {
        BetId(value)
    }
}

/// A stored bet record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub id: BetId,
    /// Bettor identifier (not checked against any player table)
    pub player_id: i32,
    /// Wagered-on game identifier (not checked against any game table)
    pub game_id: i32,
    /// Stake amount; sign is not constrained
    pub amount: f64,
}

impl Bet {
    /// Build the stored record for `id` from a validated payload.
    pub fn from_payload(id: BetId, payload: &BetPayload) -> Self {
        Self {
            id,
            player_id: payload.player_id,
            game_id: payload.game_id,
            amount: payload.amount,
        }
    }

    /// The mutable part of the record.
    pub fn payload(&self) -> BetPayload {
        BetPayload {
            player_id: self.player_id,
            game_id: self.game_id,
            amount: self.amount,
        }
    }
}

/// Validated input for creating or fully replacing a bet.
///
/// Obtained from request bodies through [`crate::validation::parse_bet_payload`]
/// or built directly with [`BetPayload::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetPayload {
    pub player_id: i32,
    pub game_id: i32,
    pub amount: f64,
}

impl BetPayload {
    /// Create a payload, rejecting a non-finite amount.
    pub fn new(player_id: i32, game_id: i32, amount: f64) -> Result<Self, String> {
        if !amount.is_finite() {
            return Err(format!("amount must be a finite number, got {}", amount));
        }
        Ok(Self {
            player_id,
            game_id,
            amount,
        })
    }
}
