//! A unit struct gains only the generated members.

use domain_model::domain_model;

#[domain_model]
#[derive(Debug, Default)]
struct Marker;

fn main() {
    let mut marker = Marker::default();
    marker.set_id(5);
    assert_eq!(*marker.id(), 5);
    assert_eq!(Marker::TABLE_NAME, "markers");
}
