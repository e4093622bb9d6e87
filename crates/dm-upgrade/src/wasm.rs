//! WebAssembly bindings for dm-upgrade.
//!
//! Enable with the `wasm` feature:
//!
//! ```toml
//! [dependencies]
//! dm-upgrade = { version = "0.1", features = ["wasm"] }
//! ```
//!
//! Lets a browser page keep the board client-side while using the same rule
//! as the CLI and the dev server.

use wasm_bindgen::prelude::*;

use crate::{parse_version, EntityRole, SchemaVersion};

// ── Board ───────────────────────────────────────────────────────────

/// A version board for use from JavaScript.
#[wasm_bindgen(js_name = Board)]
pub struct WasmBoard {
    inner: crate::Board,
}

#[wasm_bindgen(js_class = Board)]
impl WasmBoard {
    /// Create the stock board: Postgres, Snap and four services at v1.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: crate::Board::default(),
        }
    }

    /// Replace the database version.
    #[wasm_bindgen(js_name = setDatabaseVersion)]
    pub fn set_database_version(&mut self, version: SchemaVersion) {
        self.inner.set_database_version(version);
    }

    /// Replace the snapshot version.
    #[wasm_bindgen(js_name = setSnapshotVersion)]
    pub fn set_snapshot_version(&mut self, version: SchemaVersion) {
        self.inner.set_snapshot_version(version);
    }

    /// Replace the version of the service at `index`.
    #[wasm_bindgen(js_name = setServiceVersion)]
    pub fn set_service_version(
        &mut self,
        index: usize,
        version: SchemaVersion,
    ) -> Result<(), JsError> {
        self.inner
            .set_service_version(index, version)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Parse `text` and, if valid, replace the service version at `index`.
    ///
    /// Throws and leaves the board unchanged on invalid text.
    #[wasm_bindgen(js_name = editService)]
    pub fn edit_service(&mut self, index: usize, text: &str) -> Result<(), JsError> {
        let version = parse_version(text).map_err(|e| JsError::new(&e.to_string()))?;
        self.set_service_version(index, version)
    }

    /// Card names in display order.
    pub fn names(&self) -> Box<[JsValue]> {
        self.inner
            .assess()
            .iter()
            .map(|card| JsValue::from_str(&card.name))
            .collect::<Vec<_>>()
            .into_boxed_slice()
    }

    /// Card statuses (`OK`, `OUTDATED`, `INCONSISTENT`) in display order.
    pub fn statuses(&self) -> Box<[JsValue]> {
        self.inner
            .assess()
            .iter()
            .map(|card| JsValue::from_str(&card.verdict.status().to_string()))
            .collect::<Vec<_>>()
            .into_boxed_slice()
    }

    /// Card messages in display order; `undefined` where there is none.
    pub fn messages(&self) -> Box<[JsValue]> {
        self.inner
            .assess()
            .iter()
            .map(|card| match card.verdict.message() {
                Some(msg) => JsValue::from_str(&msg),
                None => JsValue::UNDEFINED,
            })
            .collect::<Vec<_>>()
            .into_boxed_slice()
    }
}

impl Default for WasmBoard {
    fn default() -> Self {
        Self::new()
    }
}

// ── Rule ────────────────────────────────────────────────────────────

/// Classify a service or the database against the snapshot version.
///
/// Returns `OK`, `OUTDATED` or `INCONSISTENT`.
#[wasm_bindgen(js_name = evaluate)]
pub fn wasm_evaluate(
    version: SchemaVersion,
    snapshot_version: SchemaVersion,
    ignore_version_check: bool,
    is_database: bool,
) -> String {
    let role = if is_database {
        EntityRole::Database
    } else {
        EntityRole::Service
    };
    crate::evaluate(version, snapshot_version, ignore_version_check, role)
        .status()
        .to_string()
}
