extern crate talaria_macros;

// The runtime attribute only accepts an async function.
#[talaria_macros::runtime]
fn incorrect_runtime_function() {
    println!("This function is not async");
}
