extern crate proc_macro;

use proc_macro2::TokenStream;
use quote::quote;

/// Determines what crate name should be used to refer to the talaria core:
/// crate::... or talaria::... depending.
pub fn talaria_crate_path() -> TokenStream {
    let is_internal = std::env::var("CARGO_CRATE_NAME")
        .map(|pkg_name| pkg_name == "talaria")
        .unwrap_or_default();

    #[cfg(doctest)]
    let is_internal = false;

    match is_internal {
        true => quote!(crate),
        false => quote!(talaria),
    }
}
