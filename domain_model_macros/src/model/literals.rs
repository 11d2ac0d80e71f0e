//! Literal parsing helpers for `#[domain_model(...)]` options.

use syn::meta::ParseNestedMeta;
use syn::{Lit, LitStr};

/// Parses the literal after `key =` using `extractor`.
///
/// The error names the key and the expected literal kind so a misspelt
/// value points at the exact option.
fn parse_lit<T, F>(meta: &ParseNestedMeta, key: &str, expected: &str, extractor: F) -> syn::Result<T>
where
    F: FnOnce(Lit) -> Option<T>,
{
    let lit = meta.value()?.parse::<Lit>()?;
    let span = lit.span();
    extractor(lit).ok_or_else(|| syn::Error::new(span, format!("{key} must be a {expected}")))
}

pub(crate) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    parse_lit(meta, key, "string", |lit| match lit {
        Lit::Str(s) => Some(s),
        _ => None,
    })
}

/// Parses a non-empty string literal.
pub(crate) fn non_empty_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    let s = lit_str(meta, key)?;
    if s.value().trim().is_empty() {
        return Err(syn::Error::new(s.span(), format!("{key} must not be empty")));
    }
    Ok(s)
}

/// Parses `key = true|false`; a bare `key` means `true`.
pub(crate) fn flag(meta: &ParseNestedMeta, key: &str) -> syn::Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        parse_lit(meta, key, "boolean", |lit| match lit {
            Lit::Bool(b) => Some(b.value),
            _ => None,
        })
    } else {
        Ok(true)
    }
}

/// Parses `key = T` where `T` is either written directly or quoted.
pub(crate) fn parsed_or_quoted<T: syn::parse::Parse>(meta: &ParseNestedMeta) -> syn::Result<T> {
    let value = meta.value()?;
    if value.peek(LitStr) {
        value.parse::<LitStr>()?.parse()
    } else {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{Attribute, Type, parse_quote};

    fn visit(attr: &Attribute, mut check: impl FnMut(&ParseNestedMeta) -> syn::Result<()>) -> syn::Result<()> {
        attr.parse_nested_meta(|meta| check(&meta))
    }

    #[test]
    fn lit_str_rejects_other_literals() {
        let attr: Attribute = parse_quote!(#[domain_model(table_name = 5)]);
        let err = visit(&attr, |meta| lit_str(meta, "table_name").map(drop)).unwrap_err();
        assert_eq!(err.to_string(), "table_name must be a string");
    }

    #[test]
    fn non_empty_str_rejects_blank_values() {
        let attr: Attribute = parse_quote!(#[domain_model(table_name = "  ")]);
        let err = visit(&attr, |meta| non_empty_str(meta, "table_name").map(drop)).unwrap_err();
        assert_eq!(err.to_string(), "table_name must not be empty");
    }

    #[test]
    fn flag_accepts_bare_and_explicit_forms() {
        let attr: Attribute = parse_quote!(#[domain_model(a, b = false)]);
        let mut seen = Vec::new();
        visit(&attr, |meta| {
            seen.push(flag(meta, "x")?);
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![true, false]);
    }

    #[test]
    fn parsed_or_quoted_reads_both_forms() {
        let attr: Attribute = parse_quote!(#[domain_model(a = u32, b = "Option<u8>")]);
        let mut seen: Vec<Type> = Vec::new();
        visit(&attr, |meta| {
            seen.push(parsed_or_quoted(meta)?);
            Ok(())
        })
        .unwrap();
        let expected: Vec<Type> = vec![parse_quote!(u32), parse_quote!(Option<u8>)];
        assert_eq!(seen, expected);
    }
}
