//! The declaration under construction and the capability object used to
//! build nodes for it.
//!
//! [`TreeFactory`] is handed to every builder explicitly instead of living in
//! global state, so passes over different structs never share anything. It
//! owns the [`TargetDeclaration`] for the duration of the pass and is the only
//! way to add members to it.

use std::fmt;

use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::ext::IdentExt;
use syn::{
    Attribute, Expr, Field, FieldMutability, Fields, Generics, Ident, ImplItemConst, ImplItemFn,
    ItemImpl, ItemStruct, Type, Visibility, parse_quote,
};

use super::config::Configuration;
use super::error::BuilderStateError;

/// Helper attribute excluding a declared field from persistence.
pub(crate) const TRANSIENT_ATTR: &str = "transient";

/// A field declared by the user, captured before any handler runs.
#[derive(Clone, Debug)]
pub(crate) struct FieldDeclaration {
    pub ident: Ident,
    pub ty: Type,
    pub vis: Visibility,
    pub attrs: Vec<Attribute>,
    pub transient: bool,
}

impl FieldDeclaration {
    fn from_field(field: &Field) -> syn::Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "domain models require named fields"))?;
        let transient = field.attrs.iter().any(|a| a.path().is_ident(TRANSIENT_ATTR));
        let attrs = field
            .attrs
            .iter()
            .filter(|a| !a.path().is_ident(TRANSIENT_ATTR))
            .cloned()
            .collect();
        Ok(Self {
            ident,
            ty: field.ty.clone(),
            vis: field.vis.clone(),
            attrs,
            transient,
        })
    }
}

impl ToTokens for FieldDeclaration {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Self {
            ident,
            ty,
            vis,
            attrs,
            transient,
        } = self;
        let skip = transient.then(|| quote! { #[serde(skip)] });
        tokens.extend(quote! {
            #(#attrs)*
            #skip
            #vis #ident: #ty
        });
    }
}

/// Which member names a generated item competes with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Namespace {
    /// Struct fields.
    Field,
    /// Associated consts and methods of the inherent impl.
    Associated,
    /// Companion items such as trait impls, keyed by trait name.
    Item,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Field => "field",
            Self::Associated => "associated item",
            Self::Item => "item",
        })
    }
}

/// A finished declaration ready to be injected.
#[derive(Clone, Debug)]
pub(crate) enum GeneratedMember {
    Field(Field),
    Const(ImplItemConst),
    Method(ImplItemFn),
    /// A trait implementation emitted next to the struct.
    TraitImpl { name: String, item: ItemImpl },
}

impl GeneratedMember {
    pub(crate) fn name(&self) -> String {
        match self {
            Self::Field(field) => field
                .ident
                .as_ref()
                .map(|ident| ident.unraw().to_string())
                .unwrap_or_default(),
            Self::Const(item) => item.ident.unraw().to_string(),
            Self::Method(item) => item.sig.ident.unraw().to_string(),
            Self::TraitImpl { name, .. } => name.clone(),
        }
    }

    pub(crate) const fn namespace(&self) -> Namespace {
        match self {
            Self::Field(_) => Namespace::Field,
            Self::Const(_) | Self::Method(_) => Namespace::Associated,
            Self::TraitImpl { .. } => Namespace::Item,
        }
    }
}

/// The struct being augmented.
#[derive(Clone, Debug)]
pub(crate) struct TargetDeclaration {
    item: ItemStruct,
    fields: Vec<FieldDeclaration>,
    members: Vec<GeneratedMember>,
}

impl TargetDeclaration {
    /// Captures the struct and snapshots its declared fields.
    ///
    /// # Errors
    ///
    /// Tuple structs are rejected because accessors are named after fields.
    pub(crate) fn from_struct(item: ItemStruct) -> syn::Result<Self> {
        let fields = match &item.fields {
            Fields::Named(named) => named
                .named
                .iter()
                .map(FieldDeclaration::from_field)
                .collect::<syn::Result<Vec<_>>>()?,
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &item.fields,
                    "domain models require named fields",
                ));
            }
        };
        Ok(Self {
            item,
            fields,
            members: Vec::new(),
        })
    }

    pub(crate) const fn ident(&self) -> &Ident {
        &self.item.ident
    }

    pub(crate) const fn generics(&self) -> &Generics {
        &self.item.generics
    }

    pub(crate) const fn item(&self) -> &ItemStruct {
        &self.item
    }

    pub(crate) fn fields(&self) -> &[FieldDeclaration] {
        &self.fields
    }

    pub(crate) fn members(&self) -> &[GeneratedMember] {
        &self.members
    }

    fn collides(&self, name: &str, namespace: Namespace) -> bool {
        let declared = namespace == Namespace::Field
            && self.fields.iter().any(|f| f.ident.unraw() == name);
        declared
            || self
                .members
                .iter()
                .any(|m| m.namespace() == namespace && m.name() == name)
    }
}

/// What a generated call is invoked on.
#[derive(Clone, Debug)]
pub(crate) enum CallTarget {
    /// A local variable or parameter: `name.method(..)`.
    Local(Ident),
    /// A field of the receiver: `self.name.method(..)`.
    Field(Ident),
    /// An associated function: `<Type>::method(..)`.
    Owner(Type),
}

impl CallTarget {
    pub(crate) fn local(name: &str) -> Self {
        Self::Local(ident(name))
    }

    pub(crate) fn field(name: &str) -> Self {
        Self::Field(ident(name))
    }
}

/// One parameter of a generated method.
#[derive(Clone, Debug)]
pub(crate) struct Parameter {
    pub name: Ident,
    pub ty: Type,
    pub variadic: bool,
}

/// Builds an identifier, accepting the `r#` prefix for raw identifiers.
pub(crate) fn ident(name: &str) -> Ident {
    format_ident!("{}", name)
}

/// Tree construction capability for one pass.
pub(crate) struct TreeFactory<'c> {
    config: &'c Configuration,
    runtime: TokenStream,
    target: TargetDeclaration,
}

impl<'c> TreeFactory<'c> {
    pub(crate) fn new(config: &'c Configuration, target: TargetDeclaration) -> Self {
        Self {
            config,
            runtime: config.runtime_path(),
            target,
        }
    }

    pub(crate) const fn config(&self) -> &'c Configuration {
        self.config
    }

    /// Tokens naming the runtime crate.
    pub(crate) const fn runtime(&self) -> &TokenStream {
        &self.runtime
    }

    pub(crate) const fn target(&self) -> &TargetDeclaration {
        &self.target
    }

    /// The immutable snapshot of declared fields.
    pub(crate) fn fields(&self) -> &[FieldDeclaration] {
        self.target.fields()
    }

    /// A type exported by the runtime crate, e.g. `Query`.
    pub(crate) fn type_ref(&self, name: &str) -> Type {
        let runtime = &self.runtime;
        let name = ident(name);
        parse_quote!(#runtime::#name)
    }

    /// The target itself, as seen from inside its impl blocks.
    pub(crate) fn self_type_ref(&self) -> Type {
        parse_quote!(Self)
    }

    /// `&str`, the shape of every predicate and raw SQL parameter.
    pub(crate) fn str_ref(&self) -> Type {
        parse_quote!(&str)
    }

    pub(crate) fn var_ref(&self, name: &str) -> Expr {
        let name = ident(name);
        parse_quote!(#name)
    }

    /// `self.name`.
    pub(crate) fn field_ref(&self, name: &Ident) -> Expr {
        parse_quote!(self.#name)
    }

    /// Parameterises a path type: `base<args..>`.
    pub(crate) fn generic_type(&self, base: &Type, args: &[Type]) -> Type {
        parse_quote!(#base<#(#args),*>)
    }

    /// An owned sequence, used for returned collections.
    pub(crate) fn array_type(&self, elem: &Type) -> Type {
        self.generic_type(&parse_quote!(::std::vec::Vec), std::slice::from_ref(elem))
    }

    /// A borrowed sequence, used for array parameters.
    pub(crate) fn slice_type(&self, elem: &Type) -> Type {
        parse_quote!(&[#elem])
    }

    /// A trailing parameter standing in for variadic arguments.
    pub(crate) fn variadic_param(&self, name: &str, elem: &Type) -> Parameter {
        Parameter {
            name: ident(name),
            ty: self.slice_type(elem),
            variadic: true,
        }
    }

    pub(crate) fn invoke(&self, target: &CallTarget, method: &str, args: &[Expr]) -> Expr {
        self.invoke_generic(target, method, &[], args)
    }

    /// A call with explicit generic arguments: `target.method::<G>(args)`.
    pub(crate) fn invoke_generic(
        &self,
        target: &CallTarget,
        method: &str,
        generics: &[Type],
        args: &[Expr],
    ) -> Expr {
        let method = ident(method);
        let turbofish = (!generics.is_empty()).then(|| quote! { ::<#(#generics),*> });
        match target {
            CallTarget::Local(name) => parse_quote!(#name.#method #turbofish (#(#args),*)),
            CallTarget::Field(name) => parse_quote!(self.#name.#method #turbofish (#(#args),*)),
            CallTarget::Owner(ty) => parse_quote!(<#ty>::#method #turbofish (#(#args),*)),
        }
    }

    /// A private struct field carrying `attrs`.
    pub(crate) fn new_field(&self, name: &Ident, ty: Type, attrs: Vec<Attribute>) -> GeneratedMember {
        GeneratedMember::Field(Field {
            attrs,
            vis: Visibility::Inherited,
            mutability: FieldMutability::None,
            ident: Some(name.clone()),
            colon_token: Some(syn::token::Colon::default()),
            ty,
        })
    }

    /// A public associated constant.
    pub(crate) fn new_const(&self, name: &str, ty: &Type, init: &Expr, doc: &str) -> GeneratedMember {
        let name = ident(name);
        let doc = format!(" {doc}");
        GeneratedMember::Const(parse_quote! {
            #[doc = #doc]
            pub const #name: #ty = #init;
        })
    }

    /// Appends `member` to the target.
    ///
    /// # Errors
    ///
    /// Fails with [`BuilderStateError::DuplicateMember`] when a member with
    /// the same name already exists in the same namespace. Injected fields
    /// are also checked against the declared ones.
    pub(crate) fn inject(&mut self, member: GeneratedMember) -> Result<(), BuilderStateError> {
        let name = member.name();
        let namespace = member.namespace();
        if self.target.collides(&name, namespace) {
            return Err(BuilderStateError::DuplicateMember { name, namespace });
        }
        self.target.members.push(member);
        Ok(())
    }

    pub(crate) fn into_target(self) -> TargetDeclaration {
        self.target
    }
}
