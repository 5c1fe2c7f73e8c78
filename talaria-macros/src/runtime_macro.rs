use proc_macro::TokenStream;

use quote::quote;
use syn::{parse_macro_input, ItemFn, ReturnType, Stmt};

use crate::helpers::talaria_crate_path;

/// See `#[talaria_macros::runtime]` for details.
pub fn runtime_macro(item: TokenStream, test: bool) -> TokenStream {
    let talaria = talaria_crate_path();

    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(item as ItemFn);

    // Destructure the input ItemFn
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;

    // Extract the block's statements
    let mut stmts = block.stmts;

    // Check if the function has an explicit return type
    let has_return_type = match &sig.output {
        ReturnType::Default => false,
        ReturnType::Type(_, ty) => !matches!(&**ty, syn::Type::Tuple(tuple) if tuple.elems.is_empty()),
    };

    // Extract the last statement if it's an expression (potential return value)
    let return_expr = if has_return_type {
        match stmts.pop() {
            Some(Stmt::Expr(expr, ..)) => Some(expr),
            Some(stmt) => {
                stmts.push(stmt);
                None
            }
            None => None,
        }
    } else {
        None
    };

    // Define the #[tokio::main] / #[tokio::test] tokio macro attribute.
    // The test flavor pauses the tokio clock: virtual time auto-advances, making
    // timing-based assertions deterministic.
    let tokio_main_attr = match test {
        true => quote! {
            #[#talaria::utils::tokio::test(flavor = "current_thread", start_paused = true)]
            #[::serial_test::serial]
        },
        _ => quote! {#[#talaria::utils::tokio::main]},
    };

    // Generate the function body
    let mut body = vec![quote! {
        // Insert custom code before the original function body
        #talaria::utils::task::begin_runtime();
    }];

    // Insert the original function body statements
    // Check all "line-by-line" content within the body
    body.extend(stmts.into_iter().map(|stmt| match stmt {
        // In the case of an expression, we want to remove a null return "()" from the body
        // since it will be added later as a return_expr.
        Stmt::Expr(ref exp, _) => match exp {
            syn::Expr::Tuple(tuple) if tuple.elems.is_empty() => quote!(),
            _ => quote! { #stmt },
        },
        _ => quote! { #stmt },
    }));

    // Insert custom code after the original function body:
    // wait for all dynamically spawned tasks to complete, then close the runtime.
    body.push(quote! {
        #talaria::utils::task::wait_for_tasks().await;
        #talaria::utils::task::end_runtime();
    });

    // Add the return expression if there is one
    if let Some(return_stmt) = return_expr {
        body.push(quote! { #return_stmt });
    }

    // Generate the expanded function
    let expanded = quote! {
        #tokio_main_attr
        #(#attrs)*
        #vis #sig {
            #(#body)*
        }
    };

    // Return the generated TokenStream
    TokenStream::from(expanded)
}

#[cfg(doctest)]
mod doctests {
    //! Rust doesn't provide a standard way to test for failure to compile, but Rustdoc does. So tests like
    //! that can be put here.
    //!
    //! ```
    //! // Confirm that the file exists.
    //! include_bytes!("../tests/compile_fail/incorrect_runtime.rs");
    //! ```
    //! ```compile_fail
    //! // Including the file as code is enough to cause a compilation failure.
    //! include!("../tests/compile_fail/incorrect_runtime.rs");
    //! fn main() {}
    //! ```
}
