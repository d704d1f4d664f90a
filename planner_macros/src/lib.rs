mod attrs;
mod expand;

use proc_macro::TokenStream;

/// Attach a cached JSON Schema handle to a named-field struct.
///
/// The struct must also derive `schemars::JsonSchema`. Doc comments on the
/// struct and its fields are copied into the schema metadata so they can be
/// shown to upstream models.
///
/// ```ignore
/// #[derive(Deserialize, JsonSchema)]
/// #[completion_schema(name = "Itinerary")]
/// pub struct ItineraryRecord { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::completion_schema(attr, item)
}
