//! Models and fixtures shared by the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use domain_model::domain_model;
use rstest::fixture;
use test_helpers::RecordingExecutor;
use test_helpers::database::{self, DatabaseGuard};

pub mod rules {
    //! Validation rules for [`Order`](super::Order).

    use domain_model::Violation;

    /// Rejects negative amounts and blank statuses.
    pub fn check_order(order: &super::Order) -> Vec<Violation> {
        let mut violations = Vec::new();
        if *order.amount() < 0 {
            violations.push(Violation::new("amount", "must not be negative"));
        }
        if order.status().trim().is_empty() {
            violations.push(Violation::new("status", "must not be blank"));
        }
        violations
    }
}

/// A sales order with a validator.
#[domain_model(validator = rules::check_order)]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Order {
    amount: i64,
    status: String,
}

/// A line of an [`Order`], used as a relation target.
#[domain_model]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OrderLine {
    order_id: i64,
    sku: String,
}

/// A model exercising every option except the validator.
#[domain_model(
    fluent_setters = true,
    primary_field_name = "code",
    primary_column_name = "CODE",
    primary_class = String,
    table_name = "catalogue"
)]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Product {
    name: String,
    unit_price: i64,
    #[transient]
    cached_rank: u32,
}

/// A model with no columns besides its primary key.
#[domain_model]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Marker;

/// A model with a floating-point column and a renamed one.
#[domain_model]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Invoice {
    order_amount: f64,
    #[serde(rename = "customer")]
    customer_name: String,
}

/// Builds a valid, unsaved order.
pub fn order(amount: i64, status: &str) -> Order {
    let mut order = Order::default();
    order.set_amount(amount);
    order.set_status(status.to_owned());
    order
}

/// A recording executor installed for the lifetime of the value.
pub struct Backend {
    pub executor: Arc<RecordingExecutor>,
    _guard: DatabaseGuard,
}

#[fixture]
pub fn backend() -> Backend {
    let executor = Arc::new(RecordingExecutor::new());
    let guard = database::install(executor.clone());
    Backend {
        executor,
        _guard: guard,
    }
}
