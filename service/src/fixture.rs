//! Domain fixtures for tests.

use common::{Amount, Date, DateTime};

use crate::domain::{
    expense,
    payment::{self, MonthsCovered, Period},
    property, tenant, unit, Expense, Payment, Property, Tenant, Unit,
};

/// Parses the provided `YYYY-MM-DD` string into a [`Date`].
pub(crate) fn date(s: &str) -> Date {
    Date::parse(s).unwrap()
}

/// Parses the provided string into an [`Amount`].
pub(crate) fn amount(s: &str) -> Amount {
    s.parse().unwrap()
}

pub(crate) fn property(name: &str) -> Property {
    Property {
        id: property::Id::new(),
        code: property::Code::new("SV").unwrap(),
        name: property::Name::new(name).unwrap(),
        address: property::Address::new("12 Kampala Rd").unwrap(),
        description: None,
        created_at: DateTime::now().coerce(),
    }
}

pub(crate) fn unit(property: &Property, name: &str) -> Unit {
    Unit {
        id: unit::Id::new(),
        property_id: property.id,
        code: unit::Code::new("A-1").unwrap(),
        name: unit::Name::new(name).unwrap(),
        rent_amount: amount("1200"),
        status: unit::Status::Vacant,
        created_at: DateTime::now().coerce(),
    }
}

pub(crate) fn tenant(unit: &Unit, name: &str, start_date: &str) -> Tenant {
    Tenant {
        id: tenant::Id::new(),
        unit_id: unit.id,
        name: tenant::Name::new(name).unwrap(),
        email: tenant::Email::new("jane@example.com").unwrap(),
        phone: tenant::Phone::new("+256 700 000000").unwrap(),
        start_date: date(start_date),
        status: tenant::Status::Active,
        created_at: DateTime::now().coerce(),
    }
}

pub(crate) fn payment(tenant: &Tenant, start: &str, end: &str) -> Payment {
    Payment {
        id: payment::Id::new(),
        tenant_id: tenant.id,
        unit_id: tenant.unit_id,
        amount: amount("1200"),
        payment_date: date(start),
        months_covered: MonthsCovered::new(1).unwrap(),
        period: Period {
            start: date(start),
            end: date(end),
        },
        method: None,
        reference: None,
        notes: None,
        status: payment::Status::Completed,
        receipt_sent: false,
        created_at: DateTime::now().coerce(),
    }
}

pub(crate) fn expense(property: &Property, on: &str) -> Expense {
    Expense {
        id: expense::Id::new(),
        property_id: property.id,
        description: expense::Description::new("Roof repair").unwrap(),
        amount: amount("350"),
        category: expense::Category::new("Repairs").unwrap(),
        date: date(on),
        notes: None,
        created_at: DateTime::now().coerce(),
    }
}
