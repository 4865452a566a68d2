//! Built-in page document.

/// Default page template, used when no `--in` document is given and written
/// out verbatim by `--tmpl-out`.
pub const DEFAULT_PAGE_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/default-page.tmpl"));
