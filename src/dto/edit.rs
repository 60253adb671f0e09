use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{CellRef, CellValue},
    error::SyncError,
    services::sync_service::EditOutcome,
    state::game::EditEvent,
};

/// Location of the edited cell, either in A1 notation or as 1-based coordinates.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CellLocation {
    /// A1 notation, e.g. `"D1"`.
    A1(String),
    /// Row and column as reported by the host.
    Coordinates {
        /// 1-based row.
        row: u32,
        /// 1-based column.
        column: u32,
    },
}

impl TryFrom<CellLocation> for CellRef {
    type Error = SyncError;

    fn try_from(value: CellLocation) -> Result<Self, Self::Error> {
        match value {
            CellLocation::A1(address) => Ok(address.parse()?),
            CellLocation::Coordinates { row, column } => Ok(CellRef::from_coordinates(row, column)?),
        }
    }
}

/// Edit notification pushed by the host workbook.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct EditEventRequest {
    /// Sheet (game) that was edited.
    #[validate(length(min = 1, message = "sheet name must not be empty"))]
    pub sheet: String,
    /// Edited cell.
    pub cell: CellLocation,
    /// New raw value: boolean, number, text or null.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub value: CellValue,
    /// Previous raw value, when known.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub old_value: Option<CellValue>,
}

impl TryFrom<EditEventRequest> for EditEvent {
    type Error = SyncError;

    fn try_from(request: EditEventRequest) -> Result<Self, Self::Error> {
        Ok(EditEvent {
            sheet: request.sheet,
            cell: request.cell.try_into()?,
            value: request.value,
            old_value: request.old_value,
        })
    }
}

/// Result of processing an edit notification.
#[derive(Debug, Serialize, ToSchema)]
pub struct EditResponse {
    /// `ignored`, `unchanged`, `published` or `publish_failed`.
    pub outcome: String,
    /// Whether the edit touches a balance.
    pub affects_balance: bool,
    /// Whether the edit touches the ticket totals.
    pub affects_tickets: bool,
    /// Delivery error when the dashboard could not be reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<EditOutcome> for EditResponse {
    fn from(outcome: EditOutcome) -> Self {
        let (outcome, relevance, error) = match outcome {
            EditOutcome::Ignored => ("ignored", Default::default(), None),
            EditOutcome::Unchanged { relevance } => ("unchanged", relevance, None),
            EditOutcome::Published { relevance, .. } => ("published", relevance, None),
            EditOutcome::PublishFailed {
                relevance, error, ..
            } => ("publish_failed", relevance, Some(error.to_string())),
        };

        Self {
            outcome: outcome.to_string(),
            affects_balance: relevance.affects_balance,
            affects_tickets: relevance.affects_tickets,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::col;

    fn parse(json: &str) -> EditEventRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn accepts_a1_addresses() {
        let request = parse(r#"{ "sheet": "Darts", "cell": "d1", "value": true }"#);
        assert!(request.validate().is_ok());

        let edit = EditEvent::try_from(request).unwrap();
        assert_eq!(edit.cell, CellRef::new(col::D, 1));
        assert_eq!(edit.value, CellValue::Bool(true));
        assert_eq!(edit.old_value, None);
    }

    #[test]
    fn accepts_coordinates_and_old_values() {
        let request = parse(
            r#"{ "sheet": "Darts", "cell": { "row": 23, "column": 5 }, "value": "3", "old_value": "" }"#,
        );
        let edit = EditEvent::try_from(request).unwrap();
        assert_eq!(edit.cell, CellRef::new(col::E, 23));
        assert_eq!(edit.old_value, Some(CellValue::from("")));
    }

    #[test]
    fn missing_value_means_cleared_cell() {
        let edit = EditEvent::try_from(parse(r#"{ "sheet": "Darts", "cell": "E23" }"#)).unwrap();
        assert_eq!(edit.value, CellValue::Empty);
    }

    #[test]
    fn rejects_bad_cells_and_empty_sheets() {
        let request = parse(r#"{ "sheet": "Darts", "cell": "23E", "value": 1 }"#);
        assert!(matches!(
            EditEvent::try_from(request),
            Err(SyncError::InvalidInput(_))
        ));

        let request = parse(r#"{ "sheet": "Darts", "cell": { "row": 0, "column": 1 } }"#);
        assert!(EditEvent::try_from(request).is_err());

        let request = parse(r#"{ "sheet": "", "cell": "A1" }"#);
        assert!(request.validate().is_err());
    }
}
