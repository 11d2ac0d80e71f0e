//! Expansion of `#[domain_model]`.

mod config;
mod error;
mod handlers;
mod literals;
mod method;
mod naming;
mod phase;
mod pipeline;
mod render;
mod statements;
mod tree;

use proc_macro2::TokenStream;
use syn::ItemStruct;

use config::read as read_configuration;
use pipeline::run as run_pipeline;
use render::render;
use tree::TargetDeclaration;

#[cfg(test)]
pub(crate) use {
    config::Configuration,
    error::{BuilderStateError, GenerationError},
    tree::{GeneratedMember, Namespace},
};
#[cfg(test)]
pub(crate) mod testing {
    pub(crate) use super::config::read as read_configuration;
    pub(crate) use super::pipeline::{HANDLERS, run as run_pipeline};
    pub(crate) use super::render::render;
    pub(crate) use super::tree::TargetDeclaration;
}

/// Reads the options, augments the struct and renders the result.
///
/// # Errors
///
/// Returns a spanned error for malformed options, for anything other than a
/// struct with named fields, and for the first handler that fails.
pub(crate) fn expand(args: TokenStream, input: TokenStream) -> syn::Result<TokenStream> {
    let config = read_configuration(args)?;
    let item: ItemStruct = syn::parse2(input)?;
    let span = item.ident.span();
    let target = TargetDeclaration::from_struct(item)?;
    let augmented = run_pipeline(&config, target).map_err(|err| err.into_syn_error(span))?;
    Ok(render(&augmented, &config.runtime_path()))
}
