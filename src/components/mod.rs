pub mod catalog_view;
pub mod detail_view;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use catalog_view::{CatalogView, CatalogViewProps};
pub use detail_view::{DetailView, DetailViewProps};

/// Upstream names are lowercase and hyphenated; show them capitalized.
pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => "".to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Zero-padded id badge, `#001` style.
pub fn id_badge(id: u32) -> String {
    format!("#{id:03}")
}
