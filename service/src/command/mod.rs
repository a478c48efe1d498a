//! [`Command`] definition.

pub mod create_expense;
pub mod create_property;
pub mod create_tenant;
pub mod create_unit;
pub mod delete_expense;
pub mod delete_payment;
pub mod delete_property;
pub mod delete_tenant;
pub mod delete_unit;
pub mod record_payment;
pub mod update_expense;
pub mod update_payment;
pub mod update_property;
pub mod update_tenant;
pub mod update_unit;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_expense::CreateExpense, create_property::CreateProperty,
    create_tenant::CreateTenant, create_unit::CreateUnit,
    delete_expense::DeleteExpense, delete_payment::DeletePayment,
    delete_property::DeleteProperty, delete_tenant::DeleteTenant,
    delete_unit::DeleteUnit, record_payment::RecordPayment,
    update_expense::UpdateExpense, update_payment::UpdatePayment,
    update_property::UpdateProperty, update_tenant::UpdateTenant,
    update_unit::UpdateUnit,
};
