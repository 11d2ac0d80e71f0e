//! The factory-and-forward shape shared by the CRUD and query handlers.
//!
//! Every such method obtains a handle from a factory keyed by `Self`, binds
//! it to a local, optionally narrows it with the caller's predicate, and
//! forwards its own parameters to exactly one call as the tail expression.

use syn::{Expr, Type};

use crate::model::error::BuilderStateError;
use crate::model::method::{MethodAssembler, Modifiers};
use crate::model::statements::StatementSequenceBuilder;
use crate::model::tree::{CallTarget, TreeFactory};

/// How a forwarded parameter is declared.
pub(super) enum Shape {
    Plain(Type),
    Array(Type),
    Variadic(Type),
}

/// A local bound to `<owner>::factory()` before the forwarded call.
pub(super) struct Handle {
    name: &'static str,
    ty: Type,
    owner: Type,
    factory: &'static str,
}

impl Handle {
    /// `let query: Query<Self> = Self::create_query();`
    pub(super) fn query(tree: &TreeFactory<'_>) -> Self {
        Self {
            name: "query",
            ty: tree.generic_type(&tree.type_ref("Query"), &[tree.self_type_ref()]),
            owner: tree.self_type_ref(),
            factory: "create_query",
        }
    }

    /// `let persistence: Persistence<Self> = Self::create_persistence();`
    pub(super) fn persistence(tree: &TreeFactory<'_>) -> Self {
        Self {
            name: "persistence",
            ty: tree.generic_type(&tree.type_ref("Persistence"), &[tree.self_type_ref()]),
            owner: tree.self_type_ref(),
            factory: "create_persistence",
        }
    }

    /// A runtime factory obtained from the `Databases` registry.
    pub(super) fn registry(tree: &TreeFactory<'_>, name: &'static str, ty: &str) -> Self {
        Self {
            name,
            ty: tree.type_ref(ty),
            owner: tree.type_ref("Databases"),
            factory: name,
        }
    }

    pub(super) fn target(&self) -> CallTarget {
        CallTarget::local(self.name)
    }
}

pub(super) struct Forward {
    name: &'static str,
    doc: &'static str,
    modifiers: Modifiers,
    params: Vec<(&'static str, Shape)>,
    handle: Option<Handle>,
    narrow: bool,
    returns: Option<Type>,
    fails: bool,
}

impl Forward {
    pub(super) const fn new(name: &'static str, doc: &'static str, modifiers: Modifiers) -> Self {
        Self {
            name,
            doc,
            modifiers,
            params: Vec::new(),
            handle: None,
            narrow: false,
            returns: None,
            fails: false,
        }
    }

    pub(super) fn param(mut self, name: &'static str, shape: Shape) -> Self {
        self.params.push((name, shape));
        self
    }

    pub(super) fn params(mut self, params: impl IntoIterator<Item = (&'static str, Shape)>) -> Self {
        self.params.extend(params);
        self
    }

    pub(super) fn through(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Narrows the handle with `filter(predicate, params)` first.
    pub(super) fn narrowed(mut self) -> Self {
        self.narrow = true;
        self
    }

    pub(super) fn returning(mut self, ty: Type) -> Self {
        self.returns = Some(ty);
        self
    }

    /// Declares `StorageError` as the failure type.
    pub(super) fn fallible(mut self) -> Self {
        self.fails = true;
        self
    }

    /// Assembles the method with `target.method::<generics>(args)` as its
    /// tail and injects it.
    pub(super) fn emit(
        self,
        tree: &mut TreeFactory<'_>,
        target: &CallTarget,
        method: &str,
        generics: &[Type],
        args: &[Expr],
    ) -> Result<(), BuilderStateError> {
        let member = {
            let view: &TreeFactory<'_> = tree;
            let mut statements = StatementSequenceBuilder::new(view);
            if let Some(handle) = &self.handle {
                if self.narrow {
                    statements.declare_local_mut(&handle.ty, handle.name, &handle.owner, handle.factory, &[])?;
                    statements.call_statement(&handle.target(), "filter", &[
                        view.var_ref("predicate"),
                        view.var_ref("params"),
                    ])?;
                } else {
                    statements.declare_local(&handle.ty, handle.name, &handle.owner, handle.factory, &[])?;
                }
            }

            let mut assembler = MethodAssembler::new(view);
            assembler.doc(self.doc)?;
            for (name, shape) in self.params {
                match shape {
                    Shape::Plain(ty) => assembler.add_parameter(name, ty)?,
                    Shape::Array(elem) => assembler.add_array_parameter(name, &elem)?,
                    Shape::Variadic(elem) => assembler.add_variadic_parameter(name, &elem)?,
                };
            }
            if let Some(ty) = self.returns {
                assembler.return_type(ty)?;
            }
            if self.fails {
                assembler.throws_failure(view.type_ref("StorageError"))?;
            }
            assembler
                .add_statements(statements.finish()?)?
                .return_forward_generic(target, method, generics, args)?;
            assembler.finish(self.name, self.modifiers)?
        };
        tree.inject(member)
    }
}

/// `predicate: &str` and `params: &[Value]`, the narrowing pair.
pub(super) fn predicate_params(tree: &TreeFactory<'_>) -> [(&'static str, Shape); 2] {
    [
        ("predicate", Shape::Plain(tree.str_ref())),
        ("params", Shape::Variadic(tree.type_ref("Value"))),
    ]
}

/// Expressions referring to the named locals, in order.
pub(super) fn vars(tree: &TreeFactory<'_>, names: &[&str]) -> Vec<Expr> {
    names.iter().map(|name| tree.var_ref(name)).collect()
}
