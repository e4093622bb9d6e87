use dm_upgrade::{Board, EntityRole, SchemaVersion, Status, Tone};
use serde::Serialize;

/// JSON view of an evaluated board, as served by `GET /api/board`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardReport {
    pub snapshot_version: SchemaVersion,
    /// `true` when no entity needs attention.
    pub all_ok: bool,
    pub entities: Vec<EntityReport>,
}

/// One card in a [`BoardReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityReport {
    pub name: String,
    pub role: EntityRole,
    pub version: SchemaVersion,
    pub status: Status,
    pub tone: Tone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BoardReport {
    /// Evaluate `board` and collect the result.
    pub fn from_board(board: &Board) -> Self {
        let entities: Vec<EntityReport> = board
            .assess()
            .into_iter()
            .map(|card| EntityReport {
                status: card.verdict.status(),
                tone: card.verdict.tone(),
                message: card.verdict.message(),
                name: card.name,
                role: card.role,
                version: card.version,
            })
            .collect();

        Self {
            snapshot_version: board.snapshot().version,
            all_ok: entities.iter().all(|e| e.status == Status::Ok),
            entities,
        }
    }

    /// Entities that are not [`Status::Ok`].
    pub fn problems(&self) -> impl Iterator<Item = &EntityReport> {
        self.entities.iter().filter(|e| e.status != Status::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_json_shape() {
        let mut board = Board::default();
        board.set_snapshot_version(2);
        let report = BoardReport::from_board(&board);
        assert!(!report.all_ok);
        assert_eq!(report.problems().count(), 4);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["snapshot_version"], 2);
        assert_eq!(json["entities"][0]["role"], "database");
        assert_eq!(json["entities"][0]["status"], "OK");
        assert!(json["entities"][0].get("message").is_none());
        assert_eq!(json["entities"][2]["name"], "Bidder");
        assert_eq!(json["entities"][2]["status"], "OUTDATED");
        assert_eq!(json["entities"][2]["tone"], "warning_strong");
        assert_eq!(
            json["entities"][2]["message"],
            "Service will fail to start: Schema Version is smaller than Snap's Schema Version (2)"
        );
    }
}
