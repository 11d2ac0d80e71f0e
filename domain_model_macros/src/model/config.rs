//! Reads the `#[domain_model(...)]` arguments into a resolved [`Configuration`].
//!
//! Every option is looked up once here so handlers only ever see typed
//! values. Unknown keys are rejected: a misspelt `primary_class` would
//! otherwise silently fall back to the default key type and generate a model
//! that maps the wrong column type.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{Ident, Path, Type, parse_quote};

use super::literals::{flag, non_empty_str, parsed_or_quoted};

/// Resolved generator options for one target struct.
#[derive(Clone, Debug)]
pub(crate) struct Configuration {
    pub primary_field_name: Ident,
    pub primary_column_name: String,
    pub primary_class: Type,
    pub fluent_setters: bool,
    pub table_name: Option<String>,
    pub crate_path: Option<Path>,
    pub validator: Option<Path>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            primary_field_name: Ident::new("id", proc_macro2::Span::call_site()),
            primary_column_name: "id".to_owned(),
            primary_class: parse_quote!(i64),
            fluent_setters: false,
            table_name: None,
            crate_path: None,
            validator: None,
        }
    }
}

impl Configuration {
    /// Tokens naming the runtime crate, `::domain_model` unless overridden.
    pub(crate) fn runtime_path(&self) -> TokenStream {
        self.crate_path
            .as_ref()
            .map_or_else(|| quote! { ::domain_model }, |path| quote! { #path })
    }
}

#[derive(Default)]
struct RawOptions {
    primary_field_name: Option<Ident>,
    primary_column_name: Option<String>,
    primary_class: Option<Type>,
    fluent_setters: Option<bool>,
    table_name: Option<String>,
    crate_path: Option<Path>,
    validator: Option<Path>,
}

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &syn::meta::ParseNestedMeta, key: &str) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error(format!("duplicate domain_model option `{key}`")));
    }
    *slot = Some(value);
    Ok(())
}

impl RawOptions {
    fn apply(&mut self, meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
        let Some(key) = meta.path.get_ident().map(ToString::to_string) else {
            return Err(meta.error("expected a domain_model option name"));
        };
        match key.as_str() {
            "primary_field_name" => {
                let lit = non_empty_str(meta, &key)?;
                let ident = syn::parse_str::<Ident>(&lit.value()).map_err(|_| {
                    syn::Error::new(lit.span(), "primary_field_name must be a valid identifier")
                })?;
                set_once(&mut self.primary_field_name, ident, meta, &key)
            }
            "primary_column_name" => {
                let lit = non_empty_str(meta, &key)?;
                set_once(&mut self.primary_column_name, lit.value(), meta, &key)
            }
            "primary_class" => {
                let ty = parsed_or_quoted::<Type>(meta)?;
                set_once(&mut self.primary_class, ty, meta, &key)
            }
            "fluent_setters" => {
                let value = flag(meta, &key)?;
                set_once(&mut self.fluent_setters, value, meta, &key)
            }
            "table_name" => {
                let lit = non_empty_str(meta, &key)?;
                set_once(&mut self.table_name, lit.value(), meta, &key)
            }
            "crate" => {
                let path = parsed_or_quoted::<Path>(meta)?;
                set_once(&mut self.crate_path, path, meta, &key)
            }
            "validator" => {
                let path = parsed_or_quoted::<Path>(meta)?;
                set_once(&mut self.validator, path, meta, &key)
            }
            other => Err(meta.error(format!("unknown domain_model option `{other}`"))),
        }
    }

    fn resolve(self) -> Configuration {
        let defaults = Configuration::default();
        Configuration {
            primary_field_name: self.primary_field_name.unwrap_or(defaults.primary_field_name),
            primary_column_name: self.primary_column_name.unwrap_or(defaults.primary_column_name),
            primary_class: self.primary_class.unwrap_or(defaults.primary_class),
            fluent_setters: self.fluent_setters.unwrap_or(defaults.fluent_setters),
            table_name: self.table_name,
            crate_path: self.crate_path,
            validator: self.validator,
        }
    }
}

/// Parses the attribute arguments.
///
/// # Errors
///
/// Returns a spanned error for unknown or repeated keys and for values that
/// are not the expected literal, type or path.
pub(crate) fn read(args: TokenStream) -> syn::Result<Configuration> {
    let mut options = RawOptions::default();
    syn::meta::parser(|meta| options.apply(&meta)).parse2(args)?;
    Ok(options.resolve())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_arguments_resolve_to_defaults() {
        let config = read(TokenStream::new()).expect("defaults");
        assert_eq!(config.primary_field_name, "id");
        assert_eq!(config.primary_column_name, "id");
        assert_eq!(config.primary_class, parse_quote!(i64));
        assert!(!config.fluent_setters);
        assert!(config.table_name.is_none());
        assert_eq!(config.runtime_path().to_string(), ":: domain_model");
    }

    #[test]
    fn reads_every_option() {
        let config = read(quote! {
            primary_field_name = "order_id",
            primary_column_name = "ORDER_ID",
            primary_class = u64,
            fluent_setters = true,
            table_name = "sales_orders",
            crate = "dm",
            validator = rules::check_order,
        })
        .expect("config");
        assert_eq!(config.primary_field_name, "order_id");
        assert_eq!(config.primary_column_name, "ORDER_ID");
        assert_eq!(config.primary_class, parse_quote!(u64));
        assert!(config.fluent_setters);
        assert_eq!(config.table_name.as_deref(), Some("sales_orders"));
        assert_eq!(config.runtime_path().to_string(), "dm");
        assert_eq!(config.validator, Some(parse_quote!(rules::check_order)));
    }

    #[test]
    fn quoted_primary_class_is_parsed_as_a_type() {
        let config = read(quote!(primary_class = "uuid::Uuid")).expect("config");
        assert_eq!(config.primary_class, parse_quote!(uuid::Uuid));
    }

    #[test]
    fn bare_fluent_setters_flag_enables_fluent_setters() {
        let config = read(quote!(fluent_setters)).expect("config");
        assert!(config.fluent_setters);
    }

    #[rstest]
    #[case::unknown_key(quote!(primary_klass = i64), "unknown domain_model option `primary_klass`")]
    #[case::not_an_identifier(quote!(primary_field_name = "order id"), "primary_field_name must be a valid identifier")]
    #[case::keyword(quote!(primary_field_name = "type"), "primary_field_name must be a valid identifier")]
    #[case::wrong_literal(quote!(fluent_setters = "yes"), "fluent_setters must be a boolean")]
    #[case::empty_column(quote!(primary_column_name = ""), "primary_column_name must not be empty")]
    #[case::duplicate(quote!(table_name = "a", table_name = "b"), "duplicate domain_model option `table_name`")]
    fn rejects_malformed_options(#[case] args: TokenStream, #[case] message: &str) {
        let err = read(args).expect_err("malformed configuration");
        assert_eq!(err.to_string(), message);
    }
}
