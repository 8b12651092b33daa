mod versionable;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Versionable)]
// ============================================================================

/// Derive macro that exposes a struct's named fields as versioned attributes.
///
/// Generates an implementation of `versioned_rust::Versionable`: the type
/// name, the identity accessor, the property list with inferred attribute
/// kinds, and JSON-valued read/write accessors used for diffing and revert.
///
/// # Usage
///
/// ```ignore
/// #[derive(Versionable)]
/// #[versionable(type_name = "Article", id = "id")]
/// struct Article {
///     id: String,
///     title: String,
///     body: Option<String>,
///     #[versionable(skip)]
///     cached_html: String,
/// }
/// ```
///
/// Struct-level options (all optional):
/// - `type_name = "..."`: the versionable type tag, defaults to the struct name
/// - `id = "field"`: the identity field, defaults to `id`
///
/// Field-level `#[versionable(skip)]` (or `#[serde(skip)]`) hides a field.
/// The identity field is never a property.
#[proc_macro_derive(Versionable, attributes(versionable))]
pub fn derive_versionable(input: TokenStream) -> TokenStream {
    versionable::derive_versionable(input)
}
