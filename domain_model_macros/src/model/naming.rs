//! Names derived from the target struct and its fields.

use heck::ToSnakeCase;
use syn::ext::IdentExt;
use syn::{Attribute, Expr, ExprLit, Ident, Lit, LitStr, Token};

/// Table name for a struct: the snake_case name with a plural suffix.
pub(crate) fn table_name_for(struct_name: &str) -> String {
    pluralise(&struct_name.to_snake_case())
}

fn pluralise(word: &str) -> String {
    const SIBILANT: [&str; 5] = ["s", "x", "z", "ch", "sh"];
    if SIBILANT.iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix('y')
        && stem.chars().last().is_some_and(|c| !"aeiou".contains(c))
    {
        return format!("{stem}ies");
    }
    format!("{word}s")
}

/// `set_<field>`, dropping any raw identifier prefix.
pub(crate) fn setter_name(field: &Ident) -> String {
    format!("set_{}", field.unraw())
}

/// The getter keeps the field name, raw prefix included.
pub(crate) fn getter_name(field: &Ident) -> String {
    field.to_string()
}

/// Column a declared field serialises to: its serde `rename` when present,
/// otherwise the field name without any raw prefix.
pub(crate) fn column_name(field: &Ident, attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("serde"))
        .find_map(serde_rename)
        .unwrap_or_else(|| field.unraw().to_string())
}

/// `rename = "..."` or `rename(deserialize = "...")` inside one `#[serde]`.
fn serde_rename(attr: &Attribute) -> Option<String> {
    let mut rename = None;
    let parsed = attr.parse_nested_meta(|meta| {
        let is_rename = meta.path.is_ident("rename");
        if meta.input.peek(Token![=]) {
            let value = meta.value()?;
            if is_rename {
                rename = Some(value.parse::<LitStr>()?.value());
            } else {
                value.parse::<Expr>()?;
            }
        } else if meta.input.peek(syn::token::Paren) {
            meta.parse_nested_meta(|nested| {
                if nested.input.peek(Token![=]) {
                    let value = nested.value()?.parse::<Expr>()?;
                    if is_rename
                        && nested.path.is_ident("deserialize")
                        && let Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) = value
                    {
                        rename = Some(lit.value());
                    }
                }
                Ok(())
            })?;
        }
        Ok(())
    });
    parsed.ok().and(rename)
}
