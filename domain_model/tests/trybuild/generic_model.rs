//! A generic model with a configured key type.

use domain_model::{DomainModel, domain_model};

#[domain_model(primary_class = u64)]
#[derive(Debug, Default)]
struct Tagged<T> {
    label: String,
    payload: T,
}

fn main() {
    let mut tagged = Tagged::<u32>::default();
    tagged.set_payload(3);
    tagged.set_id(1);
    let _: &u32 = tagged.payload();
    let _: &str = Tagged::<u32>::TABLE_NAME;
    assert!(tagged.is_persisted());
    let _: domain_model::StorageResult<u64> = Tagged::<u32>::count("", &[]);
}
