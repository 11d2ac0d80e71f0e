//! A model whose runtime paths go through a renamed import.

use ::domain_model as dm;

use dm::{DomainModel, domain_model};

/// Verifies that `#[domain_model(crate = "dm")]` routes every generated path
/// through the alias.
#[domain_model(crate = "dm", table_name = "aliases")]
#[derive(Debug, Default)]
struct Aliased {
    label: String,
}

fn main() {
    let mut model = Aliased::default();
    model.set_label("hello".to_owned());
    let _: &String = model.label();
    let _: &str = Aliased::TABLE_NAME;
    let _: &str = <Aliased as DomainModel>::MODEL_NAME;
    let _: dm::Query<Aliased> = Aliased::create_query();
    let _: Vec<dm::Violation> = model.validate();
}
