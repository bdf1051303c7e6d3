//! Actions with automatic category inference

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{CatalogPage, DetailRecord, SortKey};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Kick off the first page fetch
    Init,

    // ===== Catalog category =====
    /// Result: one listing batch fetched and indexed
    PageDidLoad(CatalogPage),

    /// Result: listing fetch failed; previous entries stay in place
    PageDidError(String),

    /// Advance to the next page (no upper bound; an empty page just renders empty)
    PageNext,

    /// Back one page; inert at page 0
    PagePrev,

    // ===== Sort category =====
    SortCycle,
    SortSet(SortKey),

    // ===== Search category =====
    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    // ===== Selection category =====
    /// Move the grid cursor by a signed delta, clamped to the visible range
    SelectionMove(i16),

    // ===== Detail category =====
    /// Navigate the detail view to an id (from the grid or prev/next)
    DetailOpen(u32),

    /// Sequential navigation: inert at id 1
    DetailPrev,

    /// Sequential navigation: unbounded; past the end the read resolves not-found
    DetailNext,

    /// Return to the catalog, discarding the record
    DetailClose,

    DetailDidLoad(DetailRecord),
    DetailDidError { id: u32, error: String },

    /// Result: species read finished; `None` means no English entry existed
    SpeciesDidLoad(Option<String>),

    /// Species read failed; non-terminal, a fallback description is shown
    SpeciesDidError(String),

    Quit,
}
