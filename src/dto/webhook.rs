use serde::Serialize;
use utoipa::ToSchema;

use crate::{dao::models::format_number, state::game::GameSnapshot};

/// Body of `POST /webhook/update_game`. Every figure travels as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GameUpdatePayload {
    /// Game (sheet) name.
    pub game: String,
    /// Team one balance, as text.
    pub team1_balance: String,
    /// Team two balance, as text.
    pub team2_balance: String,
    /// Team one ticket total, as text.
    pub team1_tickets: String,
    /// Team two ticket total, as text.
    pub team2_tickets: String,
}

impl From<&GameSnapshot> for GameUpdatePayload {
    fn from(snapshot: &GameSnapshot) -> Self {
        Self {
            game: snapshot.game.clone(),
            team1_balance: format_number(snapshot.team1_balance),
            team2_balance: format_number(snapshot.team2_balance),
            team1_tickets: format_number(snapshot.team1_tickets),
            team2_tickets: format_number(snapshot.team2_tickets),
        }
    }
}

/// Body of `POST /webhook/update_sheets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetListPayload<'a> {
    /// Every game name, in workbook order.
    pub sheet_names: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_list_shape() {
        let names = vec!["Ring Toss".to_string(), "Darts".to_string()];
        let body = serde_json::to_string(&SheetListPayload {
            sheet_names: &names,
        })
        .unwrap();
        assert_eq!(body, r#"{"sheet_names":["Ring Toss","Darts"]}"#);
    }

    #[test]
    fn game_update_sends_strings() {
        let snapshot = GameSnapshot {
            game: "Darts".into(),
            team1_balance: 440.0,
            team2_balance: -20.5,
            team1_tickets: 15.0,
            team2_tickets: 0.0,
        };
        let body = serde_json::to_value(GameUpdatePayload::from(&snapshot)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "game": "Darts",
                "team1_balance": "440",
                "team2_balance": "-20.5",
                "team1_tickets": "15",
                "team2_tickets": "0",
            })
        );
    }
}
