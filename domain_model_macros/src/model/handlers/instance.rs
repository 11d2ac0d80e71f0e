//! `validate` and `new_instance_from`.

use syn::{Expr, Type, parse_quote};

use crate::model::error::BuilderStateError;
use crate::model::method::{MethodAssembler, Modifiers};
use crate::model::statements::StatementSequenceBuilder;
use crate::model::tree::{CallTarget, TreeFactory};

/// Runs the validation rules silently and returns the violations found.
pub(crate) fn validate(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let member = {
        let tables = CallTarget::Owner(tree.type_ref("Tables"));
        let outcome = tree.invoke(&tables, "validate", &[parse_quote!(self), parse_quote!(true)]);
        let violation = tree.type_ref("Violation");
        let mut method = MethodAssembler::new(tree);
        method
            .doc("Checks this model against its validation rules without failing.")?
            .return_generic(&parse_quote!(::std::vec::Vec), &[violation])?
            .returns(parse_quote! {
                match #outcome {
                    ::core::result::Result::Ok(violations) => violations,
                    ::core::result::Result::Err(failure) => failure.into_violations(),
                }
            })?;
        method.finish("validate", Modifiers::PUBLIC_SHARED)?
    };
    tree.inject(member)
}

/// Builds a fresh instance and populates it from a property map.
pub(crate) fn new_instance_from(tree: &mut TreeFactory<'_>) -> Result<(), BuilderStateError> {
    let member = {
        let beans = CallTarget::Owner(tree.type_ref("Beans"));
        let model = tree.self_type_ref();
        let value = tree.type_ref("Value");
        let properties: Type = parse_quote!(&::std::collections::HashMap<::std::string::String, #value>);
        let fresh = tree.invoke_generic(&beans, "create_new_instance", std::slice::from_ref(&model), &[]);
        let bean = tree.var_ref("bean");

        let mut body = StatementSequenceBuilder::new(tree);
        body.declare_initialized(&model, "bean", &fresh, true)?
            .try_call_statement(&beans, "populate", &[
                parse_quote!(&mut #bean),
                tree.var_ref("properties"),
                tree.var_ref("underscore_keys"),
            ])?;

        let ok: Expr = parse_quote!(::core::result::Result::Ok(#bean));
        let mut method = MethodAssembler::new(tree);
        method
            .doc("Creates an instance from `properties`, keyed by column or field name.")?
            .doc("")?
            .doc("Keys are matched as written when `underscore_keys` is set and converted")?
            .doc("from camelCase otherwise; unmatched keys become raw attributes.")?
            .add_parameter("properties", properties)?
            .add_parameter("underscore_keys", parse_quote!(bool))?
            .return_type(model)?
            .throws_failure(tree.type_ref("StorageError"))?
            .add_statements(body.finish()?)?
            .returns(ok)?;
        method.finish("new_instance_from", Modifiers::PUBLIC_STATIC)?
    };
    tree.inject(member)
}
