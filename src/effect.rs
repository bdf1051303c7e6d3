//! Effects - side effects declared by the reducer

/// Side effects that can be triggered by actions. Each one is a single
/// outbound read; the runtime gives every request its own task key, so
/// nothing in flight is ever cancelled by a newer request.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch and index one listing page
    LoadPage { page_index: u32 },
    /// Fetch the detail record for an id
    LoadDetail { id: u32 },
    /// Fetch the English flavor text for an id
    LoadSpecies { id: u32 },
}
