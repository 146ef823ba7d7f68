//! Request input validation.
//!
//! Request bodies and path parameters are checked field by field before any
//! repository call is made. Every problem found is reported as a [`FieldError`]
//! whose `loc` names where it occurred (`["body", "amount"]`, `["path", "bet_id"]`).
//!
//! Coercion follows the usual lax JSON API rules:
//! - integers accept JSON integers, integral floats (`2.0`), integral numeric
//!   strings (`"2"`, `"2.0"`) and booleans (`true` is 1)
//! - floats accept any JSON number, numeric strings and booleans
//! - integers must fit in 32 bits (the width of the `bets` columns)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::{BetId, BetPayload};

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Location of the offending value, starting with `body` or `path`
    pub loc: Vec<String>,
    /// Human-readable message
    pub msg: String,
    /// Machine-readable error kind
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new<I, S>(loc: I, msg: impl Into<String>, kind: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            loc: loc.into_iter().map(Into::into).collect(),
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    fn missing(field: &str) -> Self {
        Self::new(["body", field], "Field required", "missing")
    }

    fn int_parsing(loc: [&str; 2]) -> Self {
        Self::new(loc, "Input should be a valid integer", "int_parsing")
    }

    fn int_range(loc: [&str; 2]) -> Self {
        Self::new(
            loc,
            format!("Input should be between {} and {}", i32::MIN, i32::MAX),
            "int_range",
        )
    }

    fn float_parsing(field: &str) -> Self {
        Self::new(["body", field], "Input should be a valid number", "float_parsing")
    }
}

/// Parse and validate a JSON request body into a [`BetPayload`].
///
/// All fields are checked; on failure every problem is returned, not just the first.
pub fn parse_bet_payload(body: &[u8]) -> Result<BetPayload, Vec<FieldError>> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        vec![FieldError::new(
            ["body"],
            format!("JSON decode error: {}", e),
            "json_invalid",
        )]
    })?;

    let Value::Object(map) = value else {
        return Err(vec![FieldError::new(
            ["body"],
            "Input should be a valid dictionary or object",
            "model_attributes_type",
        )]);
    };

    let mut errors = Vec::new();
    let player_id = int_field(&map, "playerId", &mut errors);
    let game_id = int_field(&map, "gameId", &mut errors);
    let amount = float_field(&map, "amount", &mut errors);

    match (player_id, game_id, amount) {
        (Some(player_id), Some(game_id), Some(amount)) if errors.is_empty() => {
            BetPayload::new(player_id, game_id, amount)
                .map_err(|msg| vec![FieldError::new(["body", "amount"], msg, "finite_number")])
        }
        _ => Err(errors),
    }
}

/// Parse a bet id from its path segment.
pub fn parse_bet_id(raw: &str) -> Result<BetId, FieldError> {
    let loc = ["path", "bet_id"];
    match raw.trim().parse::<i64>() {
        Ok(v) => i32::try_from(v)
            .map(BetId::new)
            .map_err(|_| FieldError::int_range(loc)),
        Err(_) => Err(FieldError::int_parsing(loc)),
    }
}

fn int_field(map: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> Option<i32> {
    let loc = ["body", field];
    let Some(value) = map.get(field) else {
        errors.push(FieldError::missing(field));
        return None;
    };

    let wide = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };

    let Some(wide) = wide else {
        errors.push(FieldError::int_parsing(loc));
        return None;
    };

    match i32::try_from(wide) {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(FieldError::int_range(loc));
            None
        }
    }
}

/// The value of `f` as an integer, if it has no fractional part.
///
/// Magnitudes beyond `i64` saturate, so they still fail the 32-bit range check.
fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

fn float_field(map: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> Option<f64> {
    let Some(value) = map.get(field) else {
        errors.push(FieldError::missing(field));
        return None;
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    match parsed.filter(|f| f.is_finite()) {
        Some(v) => Some(v),
        None => {
            errors.push(FieldError::float_parsing(field));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(errors: &[FieldError]) -> Vec<(String, String)> {
        errors
            .iter()
            .map(|e| (e.loc.join("."), e.kind.clone()))
            .collect()
    }

    #[test]
    fn test_valid_payload() {
        let payload = parse_bet_payload(br#"{"playerId":1,"gameId":2,"amount":10.5}"#).unwrap();
        assert_eq!(payload, BetPayload::new(1, 2, 10.5).unwrap());
    }

    #[test]
    fn test_integer_amount_is_accepted_as_float() {
        let payload = parse_bet_payload(br#"{"playerId":1,"gameId":2,"amount":10}"#).unwrap();
        assert_eq!(payload.amount, 10.0);
    }

    #[test]
    fn test_lax_coercion() {
        let payload =
            parse_bet_payload(br#"{"playerId":"4","gameId":5.0,"amount":"2.5"}"#).unwrap();
        assert_eq!(payload, BetPayload::new(4, 5, 2.5).unwrap());
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let errors = parse_bet_payload(br#"{"gameId":2}"#).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                ("body.playerId".to_string(), "missing".to_string()),
                ("body.amount".to_string(), "missing".to_string()),
            ]
        );
    }

    #[test]
    fn test_wrong_types() {
        let errors =
            parse_bet_payload(br#"{"playerId":"abc","gameId":1.5,"amount":[1]}"#).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                ("body.playerId".to_string(), "int_parsing".to_string()),
                ("body.gameId".to_string(), "int_parsing".to_string()),
                ("body.amount".to_string(), "float_parsing".to_string()),
            ]
        );

        let errors =
            parse_bet_payload(br#"{"playerId":"4.5","gameId":null,"amount":{}}"#).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_booleans_coerce_to_numbers() {
        let payload =
            parse_bet_payload(br#"{"playerId":true,"gameId":2,"amount":false}"#).unwrap();
        assert_eq!(payload, BetPayload::new(1, 2, 0.0).unwrap());

        let payload =
            parse_bet_payload(br#"{"playerId":false,"gameId":true,"amount":true}"#).unwrap();
        assert_eq!(payload, BetPayload::new(0, 1, 1.0).unwrap());
    }

    #[test]
    fn test_integral_numeric_strings_are_integers() {
        let payload =
            parse_bet_payload(br#"{"playerId":"4.0","gameId":" 7 ","amount":"1e1"}"#).unwrap();
        assert_eq!(payload, BetPayload::new(4, 7, 10.0).unwrap());

        let errors =
            parse_bet_payload(br#"{"playerId":"1e20","gameId":1,"amount":1}"#).unwrap_err();
        assert_eq!(errors[0].kind, "int_range");
    }

    #[test]
    fn test_integer_out_of_range() {
        let errors =
            parse_bet_payload(br#"{"playerId":3000000000,"gameId":1,"amount":1}"#).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, "int_range");
    }

    #[test]
    fn test_non_object_and_malformed_body() {
        let errors = parse_bet_payload(b"[1,2,3]").unwrap_err();
        assert_eq!(errors[0].kind, "model_attributes_type");

        let errors = parse_bet_payload(b"{not json").unwrap_err();
        assert_eq!(errors[0].kind, "json_invalid");
        assert_eq!(errors[0].loc, vec!["body".to_string()]);

        let errors = parse_bet_payload(b"").unwrap_err();
        assert_eq!(errors[0].kind, "json_invalid");
    }

    #[test]
    fn test_parse_bet_id() {
        assert_eq!(parse_bet_id("42").unwrap(), BetId::new(42));
        assert_eq!(parse_bet_id("-1").unwrap(), BetId::new(-1));
        assert_eq!(parse_bet_id("abc").unwrap_err().kind, "int_parsing");
        assert_eq!(parse_bet_id("99999999999").unwrap_err().kind, "int_range");
    }
}
