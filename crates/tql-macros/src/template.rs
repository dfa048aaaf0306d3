use proc_macro2::{Span, TokenStream};
use std::collections::HashMap;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Error, Expr, Ident, LitStr, Result, Token};

pub(crate) struct TemplateInput {
    lit: LitStr,
    args: Punctuated<Expr, Token![,]>,
}

impl Parse for TemplateInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let lit: LitStr = input.parse()?;
        let args = if input.is_empty() {
            Punctuated::new()
        } else {
            input.parse::<Token![,]>()?;
            Punctuated::parse_terminated(input)?
        };
        Ok(Self { lit, args })
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum Hole {
    Positional,
    Named(String),
}

/// Split `template` into `holes.len() + 1` literal segments and the holes between them.
pub(crate) fn split(template: &str) -> std::result::Result<(Vec<String>, Vec<Hole>), String> {
    let mut segments = Vec::new();
    let mut holes = Vec::new();
    let mut current = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                current.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                current.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => return Err("unclosed `{` in template (use `{{` for a literal brace)".into()),
                    }
                }
                let name = name.trim();
                if name.is_empty() {
                    holes.push(Hole::Positional);
                } else if is_ident(name) {
                    holes.push(Hole::Named(name.to_string()));
                } else {
                    return Err(format!(
                        "invalid template hole `{{{name}}}`: expected `{{}}` or `{{identifier}}`"
                    ));
                }
                segments.push(std::mem::take(&mut current));
            }
            '}' => {
                return Err("unmatched `}` in template (use `}}` for a literal brace)".into());
            }
            c => current.push(c),
        }
    }
    segments.push(current);
    Ok((segments, holes))
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') || s == "_" {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

pub(crate) fn expand(input: TemplateInput) -> Result<TokenStream> {
    let span = input.lit.span();
    let (segments, holes) = split(&input.lit.value()).map_err(|msg| Error::new(span, msg))?;

    let positional = holes.iter().filter(|h| **h == Hole::Positional).count();
    if positional != input.args.len() {
        return Err(Error::new(
            span,
            format!(
                "template has {positional} `{{}}` hole(s) but {} argument(s) were given",
                input.args.len()
            ),
        ));
    }

    let mut remaining: HashMap<String, usize> = HashMap::new();
    for hole in &holes {
        if let Hole::Named(name) = hole {
            *remaining.entry(name.clone()).or_insert(0) += 1;
        }
    }

    let mut args = input.args.into_iter();
    let mut values = Vec::with_capacity(holes.len());
    for hole in holes {
        let value = match hole {
            Hole::Positional => match args.next() {
                Some(expr) => quote! { #expr },
                None => return Err(Error::new(span, "missing template argument")),
            },
            Hole::Named(name) => {
                // The literal's span resolves the name at the call site.
                let ident = Ident::new(&name, span);
                let left = remaining.entry(name).or_insert(0);
                *left -= 1;
                // Only the last use may move the variable.
                if *left > 0 {
                    quote! { ::core::clone::Clone::clone(&#ident) }
                } else {
                    quote! { #ident }
                }
            }
        };
        values.push(value);
    }

    let segments = segments.iter().map(|s| LitStr::new(s, Span::call_site()));
    Ok(quote! {
        ::tql::Template::__from_macro(
            &[#(#segments),*],
            ::std::vec![#(::tql::Arg::from(#values)),*],
        )
    })
}
