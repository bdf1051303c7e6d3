//! Application state - single source of truth

use std::cmp::Ordering;
use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

/// Entries per catalog page. The listing endpoint is queried with this limit
/// and ids are derived from it, so it is a fixed constant rather than a knob.
pub const PAGE_SIZE: u32 = 40;

/// One listed item in the paginated grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    pub id: u32,
    pub name: String,
    pub sprite_url: String,
}

/// The most recently completed listing fetch, keyed by id.
///
/// A page always replaces the previous one wholesale; entries from two pages
/// never coexist. Ids within a page are contiguous, so id order equals
/// listing order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogPage {
    pub page_index: u32,
    pub entries: BTreeMap<u32, CatalogEntry>,
}

/// Catalog ordering choices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SortKey {
    #[default]
    IdAsc,
    IdDesc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    /// Parse a key string. Unknown keys yield `None`, which the pipeline
    /// treats as "no reordering" rather than an error.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "id-asc" => Some(SortKey::IdAsc),
            "id-desc" => Some(SortKey::IdDesc),
            "name-asc" => Some(SortKey::NameAsc),
            "name-desc" => Some(SortKey::NameDesc),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::IdAsc => "id ↑",
            SortKey::IdDesc => "id ↓",
            SortKey::NameAsc => "name ↑",
            SortKey::NameDesc => "name ↓",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            SortKey::IdAsc => SortKey::IdDesc,
            SortKey::IdDesc => SortKey::NameAsc,
            SortKey::NameAsc => SortKey::NameDesc,
            SortKey::NameDesc => SortKey::IdAsc,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

/// Per-stat base value on the detail page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatValue {
    pub name: String,
    pub value: u16,
}

/// Full attribute set for a single item, replaced wholesale on navigation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetailRecord {
    pub id: u32,
    pub name: String,
    /// Decimetres, as reported upstream.
    pub height: u16,
    /// Hectograms, as reported upstream.
    pub weight: u16,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<StatValue>,
    pub artwork_url: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum View {
    #[default]
    Catalog,
    Detail,
}

/// Derive the visible, ordered subset of a page. Pure; never mutates the
/// entry set, so it is safe to call on every render.
///
/// Filtering is a case-insensitive substring match against the name (empty
/// query matches everything). `None` for the sort key means pass-through:
/// entries stay in id order, which is listing order.
pub fn visible_entries<'a>(
    page: &'a CatalogPage,
    query: &str,
    sort: Option<SortKey>,
) -> Vec<&'a CatalogEntry> {
    let needle = query.trim().to_lowercase();
    let mut entries: Vec<&CatalogEntry> = page
        .entries
        .values()
        .filter(|entry| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
        .collect();

    match sort {
        Some(SortKey::IdAsc) => entries.sort_by_key(|entry| entry.id),
        Some(SortKey::IdDesc) => entries.sort_by_key(|entry| std::cmp::Reverse(entry.id)),
        Some(SortKey::NameAsc) => entries.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
        Some(SortKey::NameDesc) => entries.sort_by(|a, b| locale_cmp(&b.name, &a.name)),
        None => {}
    }
    entries
}

/// Locale-style name comparison: accent-insensitive primary pass, code-point
/// tiebreak. For the catalog's alphabet (lowercase ASCII plus `é`) this
/// matches what locale string comparison produces for accented names.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(name: &str) -> String {
    name.chars()
        .map(|ch| match ch {
            'é' | 'É' => 'e',
            _ => ch.to_ascii_lowercase(),
        })
        .collect()
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Which screen is showing: catalog grid or one item's detail page
    #[debug(section = "Route", label = "View", debug_fmt)]
    pub view: View,

    /// Current page number (0-based); offset into the listing is derived
    #[debug(section = "Catalog", label = "Page")]
    pub page_index: u32,

    /// Listing lifecycle: Empty → Loading → Loaded (Failed is unused: a
    /// failed page fetch leaves the previous state in place)
    #[debug(section = "Catalog", label = "Entries", debug_fmt)]
    pub catalog: DataResource<CatalogPage>,

    /// A page switch is in flight; the current grid stays visible meanwhile
    #[debug(section = "Catalog", label = "Switching")]
    pub page_loading: bool,

    /// Live filter text and whether the search field is capturing input
    #[debug(section = "Catalog", label = "Search", debug_fmt)]
    pub search: SearchState,

    /// Catalog ordering
    #[debug(section = "Catalog", label = "Sort", debug_fmt)]
    pub sort: SortKey,

    /// Cursor into the visible (filtered + sorted) sequence
    #[debug(skip)]
    pub selected: usize,

    /// Id the detail view is navigated to
    #[debug(section = "Detail", label = "Id")]
    pub detail_id: u32,

    /// Detail lifecycle: Loading → Loaded (found) | Failed (not found)
    #[debug(section = "Detail", label = "Record", debug_fmt)]
    pub detail: DataResource<DetailRecord>,

    /// Sanitized flavor text for the current id; empty until resolved
    #[debug(skip)]
    pub description: String,

    /// Transient status line (fetch errors land here)
    #[debug(section = "Status", label = "Message", debug_fmt)]
    pub message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::Catalog,
            page_index: 0,
            catalog: DataResource::Empty,
            page_loading: false,
            search: SearchState::default(),
            sort: SortKey::default(),
            selected: 0,
            detail_id: 0,
            detail: DataResource::Empty,
            description: String::new(),
            message: None,
        }
    }
}

impl AppState {
    /// The visible, ordered entries of the current page.
    pub fn visible(&self) -> Vec<&CatalogEntry> {
        match self.catalog.data() {
            Some(page) => visible_entries(page, &self.search.query, Some(self.sort)),
            None => Vec::new(),
        }
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.visible().get(self.selected).copied()
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
            return false;
        }
        let bounded = index.min(len - 1);
        if bounded != self.selected {
            self.selected = bounded;
            return true;
        }
        false
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, name: &str) -> (u32, CatalogEntry) {
        (
            id,
            CatalogEntry {
                id,
                name: name.to_string(),
                sprite_url: format!("sprites/{id}.png"),
            },
        )
    }

    fn page(entries: &[(u32, &str)]) -> CatalogPage {
        CatalogPage {
            page_index: 0,
            entries: entries.iter().map(|(id, name)| entry(*id, name)).collect(),
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        let page = page(&[(1, "bulbasaur"), (2, "ivysaur"), (3, "venusaur")]);
        let visible = visible_entries(&page, "", Some(SortKey::IdAsc));
        assert_eq!(visible.len(), 3);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let page = page(&[(4, "charmander"), (5, "charmeleon"), (7, "squirtle")]);
        let visible = visible_entries(&page, "CHAR", Some(SortKey::NameAsc));
        let names: Vec<&str> = visible.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["charmander", "charmeleon"]);
    }

    #[test]
    fn id_desc_is_strictly_decreasing() {
        let page = page(&[(1, "bulbasaur"), (2, "ivysaur"), (3, "venusaur")]);
        let visible = visible_entries(&page, "", Some(SortKey::IdDesc));
        let ids: Vec<u32> = visible.iter().map(|e| e.id).collect();
        assert_eq!(ids, [3, 2, 1]);
    }

    #[test]
    fn name_sort_treats_accents_like_locale_compare() {
        // é sorts with e, after the bare letter, not after 'z'
        let page = page(&[(669, "flabébé"), (668, "pyroar"), (1, "bulbasaur")]);
        let visible = visible_entries(&page, "", Some(SortKey::NameAsc));
        let names: Vec<&str> = visible.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["bulbasaur", "flabébé", "pyroar"]);
    }

    #[test]
    fn accent_fold_breaks_ties_on_code_points() {
        assert_eq!(locale_cmp("flabebe", "flabébé"), Ordering::Less);
        assert_eq!(locale_cmp("flabébé", "flabebe"), Ordering::Greater);
        assert_eq!(locale_cmp("pikachu", "pikachu"), Ordering::Equal);
    }

    #[test]
    fn unknown_sort_key_is_pass_through() {
        assert_eq!(SortKey::parse("height-asc"), None);
        assert_eq!(SortKey::parse("name-asc"), Some(SortKey::NameAsc));

        let page = page(&[(41, "zubat"), (42, "golbat"), (43, "oddish")]);
        let visible = visible_entries(&page, "", None);
        // No reordering: id order, which is listing order
        let ids: Vec<u32> = visible.iter().map(|e| e.id).collect();
        assert_eq!(ids, [41, 42, 43]);
    }

    #[test]
    fn pipeline_does_not_mutate_entries() {
        let page = page(&[(2, "ivysaur"), (1, "bulbasaur")]);
        let before = page.clone();
        let _ = visible_entries(&page, "saur", Some(SortKey::NameDesc));
        assert_eq!(page, before);
    }

    #[test]
    fn selection_clamps_to_visible_range() {
        let mut state = AppState {
            catalog: DataResource::Loaded(page(&[(1, "bulbasaur"), (2, "ivysaur")])),
            ..Default::default()
        };
        assert!(state.set_selected_index(5));
        assert_eq!(state.selected, 1);
        assert!(!state.set_selected_index(1));

        state.search.query = "nothing-matches".into();
        state.clamp_selection();
        assert_eq!(state.selected, 0);
    }
}
