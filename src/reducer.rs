//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, View};

/// Shown when the species read fails outright. A species payload that merely
/// lacks an English entry leaves the description empty instead.
pub const DESCRIPTION_FALLBACK: &str = "Description not available.";

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.catalog = DataResource::Loading;
            state.message = None;
            DispatchResult::changed_with(Effect::LoadPage {
                page_index: state.page_index,
            })
        }

        // ===== Catalog =====
        Action::PageDidLoad(page) => {
            // Wholesale replacement: the new page's entries are the entry
            // set, whatever was loaded before. Applied in arrival order, so
            // a slower stale response overwrites a newer one.
            state.catalog = DataResource::Loaded(page);
            state.page_loading = false;
            state.clamp_selection();
            DispatchResult::changed()
        }

        Action::PageDidError(error) => {
            // The previous entries stay in place; a first load that failed
            // keeps its loading placeholder. Only the status line reports it.
            state.page_loading = false;
            state.message = Some(format!("Page error: {error}"));
            DispatchResult::changed()
        }

        Action::PageNext => {
            state.page_index += 1;
            start_page_fetch(state)
        }

        Action::PagePrev => {
            if state.page_index == 0 {
                return DispatchResult::unchanged();
            }
            state.page_index -= 1;
            start_page_fetch(state)
        }

        // ===== Sort =====
        Action::SortCycle => {
            state.sort = state.sort.cycle();
            state.selected = 0;
            DispatchResult::changed()
        }

        Action::SortSet(key) => {
            if state.sort == key {
                return DispatchResult::unchanged();
            }
            state.sort = key;
            state.selected = 0;
            DispatchResult::changed()
        }

        // ===== Search =====
        Action::SearchStart => {
            state.search.active = true;
            state.search.query.clear();
            state.selected = 0;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            state.selected = 0;
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            state.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            state.selected = 0;
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            state.search.query.pop();
            state.selected = 0;
            DispatchResult::changed()
        }

        // ===== Selection =====
        Action::SelectionMove(delta) => {
            let index = (state.selected as i16 + delta).max(0);
            if !state.set_selected_index(index as usize) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        // ===== Detail =====
        Action::DetailOpen(id) => {
            if id == 0 {
                return DispatchResult::unchanged();
            }
            open_detail(state, id)
        }

        Action::DetailPrev => {
            // Floor: at id 1 previous is a no-op - no transition, no fetch.
            if state.detail_id <= 1 {
                return DispatchResult::unchanged();
            }
            open_detail(state, state.detail_id - 1)
        }

        Action::DetailNext => {
            // No ceiling: past the highest valid id the detail read fails
            // and the view resolves to not-found.
            open_detail(state, state.detail_id + 1)
        }

        Action::DetailClose => {
            state.view = View::Catalog;
            state.detail = DataResource::Empty;
            state.description.clear();
            DispatchResult::changed()
        }

        Action::DetailDidLoad(record) => {
            state.detail = DataResource::Loaded(record);
            DispatchResult::changed()
        }

        Action::DetailDidError { id: _, error } => {
            // Network failure and an invalid id surface the same way.
            state.detail = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::SpeciesDidLoad(text) => {
            // No English entry means an empty description, not an error.
            state.description = text.unwrap_or_default();
            DispatchResult::changed()
        }

        Action::SpeciesDidError(_) => {
            // Non-terminal: the record's found/not-found state is untouched.
            state.description = DESCRIPTION_FALLBACK.to_string();
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn start_page_fetch(state: &mut AppState) -> DispatchResult<Effect> {
    if state.catalog.is_loaded() {
        // Keep showing the current grid while the switch is in flight.
        state.page_loading = true;
    } else {
        state.catalog = DataResource::Loading;
    }
    state.selected = 0;
    state.message = None;
    DispatchResult::changed_with(Effect::LoadPage {
        page_index: state.page_index,
    })
}

fn open_detail(state: &mut AppState, id: u32) -> DispatchResult<Effect> {
    if state.detail_id == id && !state.detail.is_empty() {
        // The record for this id is live (loading or resolved) - entering it
        // again must not re-trigger the fetch pair.
        if state.view == View::Detail {
            return DispatchResult::unchanged();
        }
        state.view = View::Detail;
        return DispatchResult::changed();
    }

    state.view = View::Detail;
    state.detail_id = id;
    state.detail = DataResource::Loading;
    state.description.clear();
    DispatchResult::changed_with_many(vec![
        Effect::LoadDetail { id },
        Effect::LoadSpecies { id },
    ])
}
