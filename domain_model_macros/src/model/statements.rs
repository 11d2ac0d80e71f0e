//! Ordered statement lists for generated method bodies.

use syn::{Expr, Ident, Stmt, Type, parse_quote};

use super::error::BuilderStateError;
use super::phase::Phase;
use super::tree::{CallTarget, TreeFactory};

const BUILDER: &str = "StatementSequenceBuilder";

/// Accumulates statements until [`finish`](Self::finish) freezes it.
pub(crate) struct StatementSequenceBuilder<'t, 'c> {
    tree: &'t TreeFactory<'c>,
    statements: Phase<Vec<Stmt>>,
}

impl<'t, 'c> StatementSequenceBuilder<'t, 'c> {
    pub(crate) const fn new(tree: &'t TreeFactory<'c>) -> Self {
        Self {
            tree,
            statements: Phase::Building(Vec::new()),
        }
    }

    fn push(&mut self, stmt: Stmt) -> Result<&mut Self, BuilderStateError> {
        self.statements.building(BUILDER)?.push(stmt);
        Ok(self)
    }

    /// `let name: ty = <owner>::method(args);`
    pub(crate) fn declare_local(
        &mut self,
        ty: &Type,
        name: &str,
        owner: &Type,
        method: &str,
        args: &[Expr],
    ) -> Result<&mut Self, BuilderStateError> {
        let init = self.tree.invoke(&CallTarget::Owner(owner.clone()), method, args);
        self.declare_initialized(ty, name, &init, false)
    }

    /// `let mut name: ty = <owner>::method(args);`
    pub(crate) fn declare_local_mut(
        &mut self,
        ty: &Type,
        name: &str,
        owner: &Type,
        method: &str,
        args: &[Expr],
    ) -> Result<&mut Self, BuilderStateError> {
        let init = self.tree.invoke(&CallTarget::Owner(owner.clone()), method, args);
        self.declare_initialized(ty, name, &init, true)
    }

    /// `let [mut] name: ty = init;`
    pub(crate) fn declare_initialized(
        &mut self,
        ty: &Type,
        name: &str,
        init: &Expr,
        mutable: bool,
    ) -> Result<&mut Self, BuilderStateError> {
        let name = super::tree::ident(name);
        let stmt: Stmt = if mutable {
            parse_quote!(let mut #name: #ty = #init;)
        } else {
            parse_quote!(let #name: #ty = #init;)
        };
        self.push(stmt)
    }

    /// `target.method(args);`
    pub(crate) fn call_statement(
        &mut self,
        target: &CallTarget,
        method: &str,
        args: &[Expr],
    ) -> Result<&mut Self, BuilderStateError> {
        let call = self.tree.invoke(target, method, args);
        self.push(parse_quote!(#call;))
    }

    /// `target.method(args)?;`
    pub(crate) fn try_call_statement(
        &mut self,
        target: &CallTarget,
        method: &str,
        args: &[Expr],
    ) -> Result<&mut Self, BuilderStateError> {
        let call = self.tree.invoke(target, method, args);
        self.push(parse_quote!(#call?;))
    }

    /// `self.field = value;`
    pub(crate) fn assign_field(&mut self, field: &Ident, value: &Expr) -> Result<&mut Self, BuilderStateError> {
        let place = self.tree.field_ref(field);
        self.push(parse_quote!(#place = #value;))
    }

    pub(crate) fn finish(&mut self) -> Result<Vec<Stmt>, BuilderStateError> {
        self.statements.freeze(BUILDER)
    }
}
