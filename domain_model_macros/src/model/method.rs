//! Single-use assembly of generated methods.
//!
//! A [`MethodAssembler`] collects documentation, parameters, an optional
//! failure type, body statements and exactly one tail expression, then turns
//! them into an [`ImplItemFn`]. Structural mistakes (a missing tail on a
//! non-unit method, a parameter after the variadic one, a second failure
//! type) are reported as [`BuilderStateError`] values from `finish` so a
//! broken handler aborts the pass instead of emitting code that fails later
//! with a less useful rustc error.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Expr, ImplItemFn, Stmt, Type, parse_quote};

use super::error::BuilderStateError;
use super::phase::Phase;
use super::tree::{CallTarget, GeneratedMember, Parameter, TreeFactory, ident};

const BUILDER: &str = "MethodAssembler";

/// How a generated method receives `self`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Receiver {
    Static,
    Shared,
    Exclusive,
}

/// Visibility and receiver of a generated method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Modifiers {
    pub public: bool,
    pub receiver: Receiver,
}

impl Modifiers {
    pub(crate) const PUBLIC_STATIC: Self = Self::new(true, Receiver::Static);
    pub(crate) const PUBLIC_SHARED: Self = Self::new(true, Receiver::Shared);
    pub(crate) const PUBLIC_EXCLUSIVE: Self = Self::new(true, Receiver::Exclusive);

    pub(crate) const fn new(public: bool, receiver: Receiver) -> Self {
        Self { public, receiver }
    }

    /// The same receiver without `pub`, as required inside trait impls.
    pub(crate) const fn inherited(self) -> Self {
        Self::new(false, self.receiver)
    }

    fn receiver_tokens(self) -> TokenStream {
        match self.receiver {
            Receiver::Static => TokenStream::new(),
            Receiver::Shared => quote!(&self,),
            Receiver::Exclusive => quote!(&mut self,),
        }
    }
}

#[derive(Default)]
struct MethodState {
    docs: Vec<String>,
    return_type: Option<Type>,
    failure: Option<Type>,
    parameters: Vec<Parameter>,
    misplaced_variadic: Option<String>,
    statements: Vec<Stmt>,
    tail: Option<Expr>,
}

pub(crate) struct MethodAssembler<'t, 'c> {
    tree: &'t TreeFactory<'c>,
    state: Phase<MethodState>,
}

impl<'t, 'c> MethodAssembler<'t, 'c> {
    pub(crate) fn new(tree: &'t TreeFactory<'c>) -> Self {
        Self {
            tree,
            state: Phase::Building(MethodState::default()),
        }
    }

    fn state(&mut self) -> Result<&mut MethodState, BuilderStateError> {
        self.state.building(BUILDER)
    }

    /// Adds one line of rustdoc.
    pub(crate) fn doc(&mut self, text: &str) -> Result<&mut Self, BuilderStateError> {
        self.state()?.docs.push(format!(" {text}"));
        Ok(self)
    }

    pub(crate) fn return_type(&mut self, ty: Type) -> Result<&mut Self, BuilderStateError> {
        self.state()?.return_type = Some(ty);
        Ok(self)
    }

    pub(crate) fn return_generic(&mut self, base: &Type, args: &[Type]) -> Result<&mut Self, BuilderStateError> {
        let ty = self.tree.generic_type(base, args);
        self.return_type(ty)
    }

    fn push_parameter(&mut self, parameter: Parameter) -> Result<&mut Self, BuilderStateError> {
        let state = self.state()?;
        if state.misplaced_variadic.is_none()
            && let Some(variadic) = state.parameters.iter().find(|p| p.variadic)
        {
            state.misplaced_variadic = Some(variadic.name.to_string());
        }
        state.parameters.push(parameter);
        Ok(self)
    }

    pub(crate) fn add_parameter(&mut self, name: &str, ty: Type) -> Result<&mut Self, BuilderStateError> {
        self.push_parameter(Parameter {
            name: ident(name),
            ty,
            variadic: false,
        })
    }

    /// Adds a borrowed-slice parameter.
    pub(crate) fn add_array_parameter(&mut self, name: &str, elem: &Type) -> Result<&mut Self, BuilderStateError> {
        let ty = self.tree.slice_type(elem);
        self.add_parameter(name, ty)
    }

    /// Adds the trailing variadic parameter. Nothing may follow it.
    pub(crate) fn add_variadic_parameter(&mut self, name: &str, elem: &Type) -> Result<&mut Self, BuilderStateError> {
        let parameter = self.tree.variadic_param(name, elem);
        self.push_parameter(parameter)
    }

    /// Declares the error type; the signature becomes `Result<R, E>`.
    pub(crate) fn throws_failure(&mut self, ty: Type) -> Result<&mut Self, BuilderStateError> {
        let state = self.state()?;
        if state.failure.is_some() {
            return Err(BuilderStateError::FailureAlreadySet);
        }
        state.failure = Some(ty);
        Ok(self)
    }

    pub(crate) fn add_statements(&mut self, statements: Vec<Stmt>) -> Result<&mut Self, BuilderStateError> {
        self.state()?.statements.extend(statements);
        Ok(self)
    }

    /// Sets the tail expression.
    pub(crate) fn returns(&mut self, expr: Expr) -> Result<&mut Self, BuilderStateError> {
        let state = self.state()?;
        if state.tail.is_some() {
            return Err(BuilderStateError::ReturnAlreadySet);
        }
        state.tail = Some(expr);
        Ok(self)
    }

    /// Makes a single forwarding call the tail expression.
    pub(crate) fn return_forward(
        &mut self,
        target: &CallTarget,
        method: &str,
        args: &[Expr],
    ) -> Result<&mut Self, BuilderStateError> {
        self.return_forward_generic(target, method, &[], args)
    }

    pub(crate) fn return_forward_generic(
        &mut self,
        target: &CallTarget,
        method: &str,
        generics: &[Type],
        args: &[Expr],
    ) -> Result<&mut Self, BuilderStateError> {
        let call = self.tree.invoke_generic(target, method, generics, args);
        self.returns(call)
    }

    /// Freezes the assembler and renders the function item.
    ///
    /// # Errors
    ///
    /// Fails when called twice, when a parameter follows the variadic one, or
    /// when a return or failure type is declared without a tail expression.
    pub(crate) fn finish_fn(&mut self, name: &str, modifiers: Modifiers) -> Result<ImplItemFn, BuilderStateError> {
        let state = self.state.freeze(BUILDER)?;
        if let Some(parameter) = state.misplaced_variadic {
            return Err(BuilderStateError::VariadicNotLast {
                method: name.to_owned(),
                parameter,
            });
        }
        let returns_value = state.return_type.is_some() || state.failure.is_some();
        if returns_value && state.tail.is_none() {
            return Err(BuilderStateError::MissingReturn {
                method: name.to_owned(),
            });
        }

        let output = match (state.return_type, state.failure) {
            (Some(ty), Some(failure)) => quote!(-> ::core::result::Result<#ty, #failure>),
            (None, Some(failure)) => quote!(-> ::core::result::Result<(), #failure>),
            (Some(ty), None) => quote!(-> #ty),
            (None, None) => TokenStream::new(),
        };
        let docs = &state.docs;
        let vis = modifiers.public.then(|| quote!(pub));
        let receiver = modifiers.receiver_tokens();
        let params = state.parameters.iter().map(|Parameter { name, ty, .. }| quote!(#name: #ty));
        let statements = &state.statements;
        let tail = &state.tail;
        let name = ident(name);
        Ok(parse_quote! {
            #(#[doc = #docs])*
            #vis fn #name(#receiver #(#params),*) #output {
                #(#statements)*
                #tail
            }
        })
    }

    pub(crate) fn finish(&mut self, name: &str, modifiers: Modifiers) -> Result<GeneratedMember, BuilderStateError> {
        self.finish_fn(name, modifiers).map(GeneratedMember::Method)
    }
}
