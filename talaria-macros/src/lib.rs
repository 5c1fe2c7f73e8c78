//! Defines the Talaria runtime macros.

#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

extern crate proc_macro;

use proc_macro::TokenStream;

mod helpers;
mod runtime_macro;

/// Macro definition for the Talaria runtime.
///
/// This macro should be used once only in a project.
/// This macro requires `tokio` as a dependency (re-exported as `talaria::utils::tokio`).
///
/// _Executes the entire function inside a multi-thread tokio runtime and waits for all
/// subsequently and dynamically created tasks (using `task::run`) before returning._
///
/// # Example
/// ```
/// # use talaria::utils::tokio;
/// #[talaria_macros::runtime]
/// async fn main() {
///     // whatever
/// }
/// ```
#[proc_macro_attribute]
pub fn runtime(_: TokenStream, item: TokenStream) -> TokenStream {
    runtime_macro::runtime_macro(item, false)
}

/// Same as `#[talaria_macros::runtime]` but for tests.
///
/// The test flavor runs on a current-thread runtime with the tokio clock paused: sleeps and
/// intervals auto-advance virtual time, so timing-sensitive assertions are deterministic.
/// Tests are serialized with `#[serial_test::serial]`; `serial_test` must therefore be
/// available as a dev-dependency of the consuming crate.
#[proc_macro_attribute]
pub fn test(_: TokenStream, item: TokenStream) -> TokenStream {
    runtime_macro::runtime_macro(item, true)
}
