//! Macros for tql
//!
//! Provides `template!`, which splits a SQL template literal into its
//! skeleton and interpolated values at compile time.

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod template;

/// Split a string literal into a `tql::Template`.
///
/// # Example
///
/// ```ignore
/// let user_id = 1234;
/// let t = tql::template!("SELECT * FROM users WHERE id = {} AND org = {org}", user_id);
/// ```
///
/// # Holes
///
/// - `{}` - the next positional argument
/// - `{name}` - the variable `name` from the surrounding scope
/// - `{{` / `}}` - literal `{` / `}`
#[proc_macro]
pub fn template(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as template::TemplateInput);
    template::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
