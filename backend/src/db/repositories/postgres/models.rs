use diesel::prelude::*;

use super::schema::bets;
use crate::api::{Bet, BetId, BetPayload};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BetRow {
    pub id: i32,
    pub player_id: i32,
    pub game_id: i32,
    pub amount: f64,
}

impl From<BetRow> for Bet {
    fn from(row: BetRow) -> Self {
        Bet {
            id: BetId(row.id),
            player_id: row.player_id,
            game_id: row.game_id,
            amount: row.amount,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bets)]
pub struct NewBetRow {
    pub player_id: i32,
    pub game_id: i32,
    pub amount: f64,
}

impl From<&BetPayload> for NewBetRow {
    fn from(payload: &BetPayload) -> Self {
        NewBetRow {
            player_id: payload.player_id,
            game_id: payload.game_id,
            amount: payload.amount,
        }
    }
}

/// Full-replace changeset: every mutable column is always written.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bets)]
pub struct BetChangeset {
    pub player_id: i32,
    pub game_id: i32,
    pub amount: f64,
}

impl From<&BetPayload> for BetChangeset {
    fn from(payload: &BetPayload) -> Self {
        BetChangeset {
            player_id: payload.player_id,
            game_id: payload.game_id,
            amount: payload.amount,
        }
    }
}
