//! Unit tests for the full expansion pipeline.

use crate::model::testing::{HANDLERS, TargetDeclaration, read_configuration, render, run_pipeline};
use crate::model::{BuilderStateError, Configuration, GenerationError, GeneratedMember, Namespace, expand};
use anyhow::{Context, Result, anyhow, ensure};
use proc_macro2::TokenStream;
use quote::quote;
use rstest::{fixture, rstest};
use syn::{File, ImplItemFn, Item, ItemImpl, ItemStruct, parse_quote};

#[fixture]
fn order() -> ItemStruct {
    parse_quote! {
        #[derive(Debug, Default)]
        pub struct Order {
            amount: f64,
            status: String,
        }
    }
}

fn augment(args: TokenStream, item: ItemStruct) -> Result<(Configuration, TargetDeclaration)> {
    let config = read_configuration(args)?;
    let target = TargetDeclaration::from_struct(item)?;
    let augmented = run_pipeline(&config, target)?;
    Ok((config, augmented))
}

fn names(target: &TargetDeclaration, namespace: Namespace) -> Vec<String> {
    target
        .members()
        .iter()
        .filter(|member| member.namespace() == namespace)
        .map(GeneratedMember::name)
        .collect()
}

fn method<'a>(target: &'a TargetDeclaration, name: &str) -> Result<&'a ImplItemFn> {
    target
        .members()
        .iter()
        .find_map(|member| match member {
            GeneratedMember::Method(item) if item.sig.ident == name => Some(item),
            _ => None,
        })
        .ok_or_else(|| anyhow!("method `{name}` was not generated"))
}

fn same(actual: &ImplItemFn, expected: &ImplItemFn) -> Result<()> {
    ensure!(
        actual == expected,
        "generated {} != expected {}",
        quote!(#actual),
        quote!(#expected)
    );
    Ok(())
}

#[test]
fn handlers_run_in_a_fixed_order() {
    let order: Vec<&str> = HANDLERS.iter().map(|(name, _)| *name).collect();
    assert_eq!(order.len(), 23);
    assert_eq!(order.first(), Some(&"accessor_pairs"));
    assert_eq!(order.get(1), Some(&"primary_key"));
    assert_eq!(order.last(), Some(&"model_trait"));
}

#[rstest]
fn order_receives_every_member_in_injection_order(order: ItemStruct) -> Result<()> {
    let (_, target) = augment(TokenStream::new(), order)?;
    let expected = [
        "set_amount",
        "amount",
        "set_status",
        "status",
        "set_id",
        "id",
        "TABLE_NAME",
        "create_query",
        "create_persistence",
        "save",
        "create",
        "create_all",
        "update",
        "update_where",
        "destroy",
        "destroy_where",
        "execute",
        "query",
        "query_with",
        "query_by_sql",
        "query_first_with",
        "query_first",
        "count",
        "validate",
        "new_instance_from",
        "raw_attribute",
        "set_raw_attribute",
        "raw_attributes",
    ];
    ensure!(
        names(&target, Namespace::Associated) == expected,
        "unexpected members {:?}",
        names(&target, Namespace::Associated)
    );
    ensure!(names(&target, Namespace::Field) == ["id", "raw_attributes"], "unexpected fields");
    ensure!(names(&target, Namespace::Item) == ["DomainModel"], "unexpected items");
    ensure!(target.fields().len() == 2, "declared fields must be left alone");
    Ok(())
}

#[rstest]
fn plain_setters_return_unit(order: ItemStruct) -> Result<()> {
    let (_, target) = augment(TokenStream::new(), order)?;
    same(
        method(&target, "set_amount")?,
        &parse_quote! {
            #[doc = " Sets `amount`."]
            pub fn set_amount(&mut self, amount: f64) {
                self.amount = amount;
            }
        },
    )?;
    same(
        method(&target, "status")?,
        &parse_quote! {
            #[doc = " Returns `status`."]
            pub fn status(&self) -> &String {
                &self.status
            }
        },
    )
}

#[rstest]
fn fluent_setters_return_the_receiver(order: ItemStruct) -> Result<()> {
    let (_, target) = augment(quote!(fluent_setters = true), order)?;
    same(
        method(&target, "set_amount")?,
        &parse_quote! {
            #[doc = " Sets `amount`."]
            pub fn set_amount(&mut self, amount: f64) -> &mut Self {
                self.amount = amount;
                self
            }
        },
    )?;
    let set_id = method(&target, "set_id")?;
    ensure!(
        set_id.sig.output == parse_quote!(-> &mut Self),
        "primary key setter must be fluent too"
    );
    Ok(())
}

#[rstest]
fn primary_key_follows_the_configuration(order: ItemStruct) -> Result<()> {
    let (_, target) = augment(
        quote!(primary_field_name = "order_id", primary_column_name = "ORDER_ID", primary_class = u64),
        order,
    )?;
    let field = target
        .members()
        .iter()
        .find_map(|member| match member {
            GeneratedMember::Field(field) if field.ident.as_ref().is_some_and(|i| i == "order_id") => Some(field),
            _ => None,
        })
        .context("primary key field")?;
    ensure!(field.ty == parse_quote!(u64), "primary key type");
    let mapping: syn::Attribute = parse_quote!(#[serde(rename = "ORDER_ID", default)]);
    ensure!(field.attrs == vec![mapping], "column mapping attribute");
    same(
        method(&target, "order_id")?,
        &parse_quote! {
            #[doc = " Returns `order_id`."]
            pub fn order_id(&self) -> &u64 {
                &self.order_id
            }
        },
    )?;
    let destroy = method(&target, "destroy")?;
    let id_param = destroy.sig.inputs.first().context("destroy parameter")?;
    ensure!(*id_param == parse_quote!(id: u64), "destroy takes the primary class");
    Ok(())
}

#[rstest]
fn table_name_constant_resolves_through_the_runtime(order: ItemStruct) -> Result<()> {
    let (_, target) = augment(TokenStream::new(), order)?;
    let constant = target
        .members()
        .iter()
        .find_map(|member| match member {
            GeneratedMember::Const(item) => Some(item),
            _ => None,
        })
        .context("TABLE_NAME")?;
    let expected: syn::ImplItemConst = parse_quote! {
        #[doc = " Table this model is stored in."]
        pub const TABLE_NAME: &'static str = <::domain_model::Tables>::table_name::<Self>();
    };
    ensure!(*constant == expected, "unexpected constant {}", quote!(#constant));
    Ok(())
}

#[rstest]
fn factory_accessors_use_the_registry(order: ItemStruct) -> Result<()> {
    let (_, target) = augment(TokenStream::new(), order)?;
    same(
        method(&target, "create_query")?,
        &parse_quote! {
            #[doc = " Creates a query over this model's table."]
            pub fn create_query() -> ::domain_model::Query<Self> {
                let query_factory: ::domain_model::QueryFactory =
                    <::domain_model::Databases>::query_factory();
                query_factory.create_query::<Self>()
            }
        },
    )
}

#[rstest]
fn save_borrows_the_model_mutably(order: ItemStruct) -> Result<()> {
    let (_, target) = augment(TokenStream::new(), order)?;
    same(
        method(&target, "save")?,
        &parse_quote! {
            #[doc = " Inserts or updates this model, keeping the generated key after an insert."]
            pub fn save(&mut self, skip_validation: bool)
                -> ::core::result::Result<(), ::domain_model::StorageError>
            {
                let persistence: ::domain_model::Persistence<Self> = <Self>::create_persistence();
                persistence.save(self, skip_validation)
            }
        },
    )
}

#[rstest]
fn update_where_takes_two_raw_strings(order: ItemStruct) -> Result<()> {
    let (_, target) = augment(TokenStream::new(), order)?;
    same(
        method(&target, "update_where")?,
        &parse_quote! {
            #[doc = " Applies the raw `updates` clause to every row matching `predicate`."]
            pub fn update_where(updates: &str, predicate: &str)
                -> ::core::result::Result<u64, ::domain_model::StorageError>
            {
                let persistence: ::domain_model::Persistence<Self> = <Self>::create_persistence();
                persistence.update_where(updates, predicate)
            }
        },
    )
}

#[rstest]
fn query_with_narrows_then_forwards_relations(order: ItemStruct) -> Result<()> {
    let (_, target) = augment(TokenStream::new(), order)?;
    same(
        method(&target, "query_with")?,
        &parse_quote! {
            #[doc = " Loads every row matching `predicate` and preloads `relations` into raw attributes."]
            pub fn query_with(
                predicate: &str,
                relations: &[::domain_model::Relation],
                params: &[::domain_model::Value]
            ) -> ::core::result::Result<::std::vec::Vec<Self>, ::domain_model::StorageError> {
                let mut query: ::domain_model::Query<Self> = <Self>::create_query();
                query.filter(predicate, params);
                query.execute(relations)
            }
        },
    )
}

#[rstest]
fn query_first_returns_an_option(order: ItemStruct) -> Result<()> {
    let (_, target) = augment(TokenStream::new(), order)?;
    let first = method(&target, "query_first")?;
    ensure!(
        first.sig.output
            == parse_quote!(
                -> ::core::result::Result<::core::option::Option<Self>, ::domain_model::StorageError>
            ),
        "query_first must return Option<Self>"
    );
    Ok(())
}

#[rstest]
fn validate_returns_violations_instead_of_failing(order: ItemStruct) -> Result<()> {
    let (_, target) = augment(TokenStream::new(), order)?;
    same(
        method(&target, "validate")?,
        &parse_quote! {
            #[doc = " Checks this model against its validation rules without failing."]
            pub fn validate(&self) -> ::std::vec::Vec<::domain_model::Violation> {
                match <::domain_model::Tables>::validate(self, true) {
                    ::core::result::Result::Ok(violations) => violations,
                    ::core::result::Result::Err(failure) => failure.into_violations(),
                }
            }
        },
    )
}

#[rstest]
fn model_trait_carries_table_and_validator(order: ItemStruct) -> Result<()> {
    let (_, target) = augment(
        quote!(table_name = "sales", validator = rules::check_order),
        order,
    )?;
    let item: &ItemImpl = target
        .members()
        .iter()
        .find_map(|member| match member {
            GeneratedMember::TraitImpl { item, .. } => Some(item),
            _ => None,
        })
        .context("trait impl")?;
    let rendered = quote!(#item).to_string();
    ensure!(rendered.contains("const TABLE : & 'static str = \"sales\""), "table: {rendered}");
    ensure!(rendered.contains("const MODEL_NAME : & 'static str = \"Order\""), "name: {rendered}");
    ensure!(rendered.contains("rules :: check_order (self)"), "validator: {rendered}");
    Ok(())
}

#[rstest]
fn derived_table_name_is_plural_snake_case() -> Result<()> {
    let (_, target) = augment(TokenStream::new(), parse_quote!(struct OrderLine { qty: u32 }))?;
    let rendered = target
        .members()
        .iter()
        .find_map(|member| match member {
            GeneratedMember::TraitImpl { item, .. } => Some(quote!(#item).to_string()),
            _ => None,
        })
        .context("trait impl")?;
    ensure!(rendered.contains("\"order_lines\""), "table: {rendered}");
    ensure!(!rendered.contains("fn violations"), "no validator configured");
    Ok(())
}

#[rstest]
fn model_trait_maps_field_names_to_columns() -> Result<()> {
    let (_, target) = augment(
        quote!(primary_field_name = "code", primary_column_name = "CODE"),
        parse_quote! {
            struct Product {
                #[serde(rename = "label")]
                name: String,
                #[transient]
                rank: u32,
                r#type: String,
            }
        },
    )?;
    let rendered = target
        .members()
        .iter()
        .find_map(|member| match member {
            GeneratedMember::TraitImpl { item, .. } => Some(quote!(#item).to_string()),
            _ => None,
        })
        .context("trait impl")?;
    let expected = "const COLUMNS : & 'static [(& 'static str , & 'static str)] = \
        & [(\"name\" , \"label\") , (\"type\" , \"type\") , (\"code\" , \"CODE\")]";
    ensure!(rendered.contains(expected), "columns: {rendered}");
    Ok(())
}

#[rstest]
#[case::primary_key(parse_quote!(struct Order { id: i64 }), "primary_key", "id")]
#[case::raw_attributes(
    parse_quote!(struct Order { raw_attributes: String }),
    "raw_attributes",
    "raw_attributes"
)]
fn declared_fields_block_injected_ones(
    #[case] item: ItemStruct,
    #[case] handler: &str,
    #[case] field: &str,
) -> Result<()> {
    let config = Configuration::default();
    let target = TargetDeclaration::from_struct(item)?;
    let Err(GenerationError::Handler { handler: failed, source }) = run_pipeline(&config, target) else {
        return Err(anyhow!("collision must abort the pass"));
    };
    ensure!(failed == handler, "failed in {failed}");
    ensure!(
        source
            == BuilderStateError::DuplicateMember {
                name: field.to_owned(),
                namespace: Namespace::Field,
            },
        "unexpected error {source}"
    );
    Ok(())
}

#[rstest]
#[case::count("count")]
#[case::save("save")]
#[case::validate("validate")]
fn fields_named_like_generated_methods_are_rejected(#[case] name: &str) -> Result<()> {
    let field = syn::Ident::new(name, proc_macro2::Span::call_site());
    let target = TargetDeclaration::from_struct(parse_quote!(struct Tally { #field: u64 }))?;
    let Err(GenerationError::Handler { handler, source }) = run_pipeline(&Configuration::default(), target) else {
        return Err(anyhow!("`{name}` must collide with the generated method"));
    };
    ensure!(handler == name, "failed in {handler}");
    ensure!(
        source
            == BuilderStateError::DuplicateMember {
                name: name.to_owned(),
                namespace: Namespace::Associated,
            },
        "unexpected error {source}"
    );
    Ok(())
}

#[rstest]
fn rendered_output_is_a_struct_an_impl_and_a_trait_impl(order: ItemStruct) -> Result<()> {
    let (config, target) = augment(TokenStream::new(), order)?;
    let file: File = syn::parse2(render(&target, &config.runtime_path()))?;
    let [Item::Struct(model), Item::Impl(inherent), Item::Impl(wiring)] = file.items.as_slice() else {
        return Err(anyhow!("unexpected items: {}", file.items.len()));
    };
    ensure!(model.fields.len() == 4, "declared plus injected fields");
    ensure!(inherent.trait_.is_none(), "inherent impl first");
    ensure!(inherent.items.len() == 28, "every associated member");
    ensure!(wiring.trait_.is_some(), "trait impl last");
    let serde_crate: syn::Attribute = parse_quote!(#[serde(crate = ":: domain_model :: __private :: serde")]);
    ensure!(model.attrs.contains(&serde_crate), "serde crate path");
    Ok(())
}

#[test]
fn transient_fields_keep_accessors_but_skip_serde() -> Result<()> {
    let (config, target) = augment(
        TokenStream::new(),
        parse_quote! {
            struct Order {
                amount: f64,
                #[transient]
                cached_total: f64,
            }
        },
    )?;
    method(&target, "cached_total")?;
    method(&target, "set_cached_total")?;
    let file: File = syn::parse2(render(&target, &config.runtime_path()))?;
    let Some(Item::Struct(model)) = file.items.first() else {
        return Err(anyhow!("struct first"));
    };
    let cached = model
        .fields
        .iter()
        .find(|field| field.ident.as_ref().is_some_and(|i| i == "cached_total"))
        .context("cached_total")?;
    let skip: syn::Attribute = parse_quote!(#[serde(skip)]);
    ensure!(cached.attrs == vec![skip], "transient marker replaced by serde(skip)");
    Ok(())
}

#[test]
fn generic_models_keep_their_parameters() -> Result<()> {
    let (config, target) = augment(
        TokenStream::new(),
        parse_quote!(struct Tagged<T> where T: Clone { tag: T }),
    )?;
    let file: File = syn::parse2(render(&target, &config.runtime_path()))?;
    let Some(Item::Impl(inherent)) = file.items.get(1) else {
        return Err(anyhow!("inherent impl"));
    };
    ensure!(inherent.generics.params.len() == 1, "impl generics");
    ensure!(inherent.generics.where_clause.is_some(), "where clause");
    Ok(())
}

#[rstest]
fn augmenting_twice_is_rejected(order: ItemStruct) -> Result<()> {
    let (config, target) = augment(TokenStream::new(), order)?;
    let file: File = syn::parse2(render(&target, &config.runtime_path()))?;
    let Some(Item::Struct(model)) = file.items.first() else {
        return Err(anyhow!("struct first"));
    };
    let again = TargetDeclaration::from_struct(model.clone())?;
    let Err(GenerationError::Handler { handler, source }) = run_pipeline(&config, again) else {
        return Err(anyhow!("second pass must fail"));
    };
    ensure!(handler == "primary_key", "failed in {handler}");
    ensure!(
        matches!(source, BuilderStateError::DuplicateMember { ref name, .. } if name == "id"),
        "unexpected error {source}"
    );
    Ok(())
}

#[rstest]
#[case::tuple(quote!(struct Pair(u8, u8);), "domain models require named fields")]
#[case::enumeration(quote!(enum Status { Open }), "expected `struct`")]
fn expand_rejects_other_shapes(#[case] input: TokenStream, #[case] message: &str) -> Result<()> {
    let err = expand(TokenStream::new(), input)
        .err()
        .context("non-struct input must fail")?;
    ensure!(err.to_string() == message, "unexpected message {err}");
    Ok(())
}

#[test]
fn handler_failures_name_the_handler() -> Result<()> {
    let err = expand(TokenStream::new(), quote!(struct Order { id: i64 }))
        .err()
        .context("collision must fail")?;
    ensure!(
        err.to_string()
            == "domain_model: primary_key handler failed: generated field `id` collides with an existing one",
        "unexpected message {err}"
    );
    Ok(())
}
