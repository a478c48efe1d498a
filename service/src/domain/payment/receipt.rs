//! [`Receipt`] definitions.

use std::fmt::Write as _;

use common::{money::Currency, Date, Money};

use crate::domain::{tenant, Payment, Property, Tenant, Unit};

use super::{MonthsCovered, Period};

/// Notification confirming a recorded [`Payment`] to its [`Tenant`].
#[derive(Clone, Debug)]
pub struct Receipt {
    /// [`tenant::Email`] to deliver this [`Receipt`] to.
    pub recipient: tenant::Email,

    /// Name of the [`Tenant`] who paid.
    pub tenant_name: String,

    /// Number this [`Receipt`] is issued under.
    pub number: String,

    /// [`Date`] the [`Payment`] was made.
    pub payment_date: Date,

    /// Name of the [`Property`] the [`Payment`] is made for.
    pub property_name: String,

    /// Name of the [`Unit`] the [`Payment`] is made for.
    pub unit_name: String,

    /// Code of the [`Unit`] the [`Payment`] is made for.
    pub unit_code: String,

    /// [`Period`] the [`Payment`] covers.
    pub period: Period,

    /// Number of months the [`Payment`] covers.
    pub months_covered: MonthsCovered,

    /// Paid [`Money`].
    pub amount: Money,
}

impl Receipt {
    /// Subject line of [`Receipt`] messages.
    pub const SUBJECT: &'static str =
        "Payment Receipt - Rental Management System";

    /// Issues a new [`Receipt`] for the provided [`Payment`], rendering its
    /// amount in the provided [`Currency`].
    #[must_use]
    pub fn new(
        payment: &Payment,
        tenant: &Tenant,
        unit: &Unit,
        property: &Property,
        currency: Currency,
    ) -> Self {
        Self {
            recipient: tenant.email.clone(),
            tenant_name: tenant.name.to_string(),
            number: payment.receipt_number(),
            payment_date: payment.payment_date,
            property_name: property.name.to_string(),
            unit_name: unit.name.to_string(),
            unit_code: unit.code.to_string(),
            period: payment.period,
            months_covered: payment.months_covered,
            amount: payment.amount.in_currency(currency),
        }
    }

    /// Renders this [`Receipt`] as an HTML document.
    #[must_use]
    pub fn to_html(&self) -> String {
        let Self {
            recipient: _,
            tenant_name,
            number,
            payment_date,
            property_name,
            unit_name,
            unit_code,
            period,
            months_covered,
            amount,
        } = self;

        let rows = [
            ("Receipt Number", escape(number)),
            ("Payment Date", payment_date.to_long_string()),
            ("Property", escape(property_name)),
            ("Unit", format!("{} ({})", escape(unit_name), escape(unit_code))),
            (
                "Period",
                format!(
                    "{} - {}",
                    period.start.to_long_string(),
                    period.end.to_long_string(),
                ),
            ),
            ("Months Covered", format!("{months_covered} month(s)")),
        ];

        let mut html = String::with_capacity(4096);
        html.push_str(HEAD);
        _ = write!(
            html,
            "<p>Dear {},</p>\
             <p>Thank you for your payment. This is to confirm that we have \
                received your rent payment.</p>\
             <div class=\"receipt-details\">",
            escape(tenant_name),
        );
        for (label, value) in rows {
            _ = write!(
                html,
                "<div class=\"detail-row\">\
                   <span class=\"detail-label\">{label}:</span>\
                   <span>{value}</span>\
                 </div>",
            );
        }
        _ = write!(
            html,
            "<div class=\"detail-row\">\
               <span class=\"detail-label\">Amount Paid:</span>\
               <span class=\"amount\">{}</span>\
             </div>",
            escape(&amount.to_localized_string()),
        );
        html.push_str(TAIL);
        html
    }
}

/// Opening part of the [`Receipt`] HTML document.
const HEAD: &str = "<!DOCTYPE html>\
<html>\
<head>\
<meta charset=\"utf-8\">\
<style>\
body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }\
.container { max-width: 600px; margin: 0 auto; padding: 20px; }\
.header { background-color: #1e3a8a; color: white; padding: 20px; \
          text-align: center; }\
.content { background-color: #f9fafb; padding: 20px; \
           border: 1px solid #e5e7eb; }\
.receipt-details { background-color: white; padding: 15px; margin: 15px 0; \
                   border-radius: 5px; }\
.detail-row { display: flex; justify-content: space-between; \
              padding: 8px 0; border-bottom: 1px solid #e5e7eb; }\
.detail-label { font-weight: bold; color: #1e3a8a; }\
.amount { font-size: 24px; color: #10b981; font-weight: bold; }\
.footer { text-align: center; margin-top: 20px; color: #6b7280; \
          font-size: 12px; }\
</style>\
</head>\
<body>\
<div class=\"container\">\
<div class=\"header\"><h1>Payment Receipt</h1></div>\
<div class=\"content\">";

/// Closing part of the [`Receipt`] HTML document.
const TAIL: &str = "</div>\
<p>If you have any questions about this payment, please contact us.</p>\
<p>Best regards,<br>Rental Management Team</p>\
</div>\
<div class=\"footer\">\
<p>This is an automated receipt. Please do not reply to this email.</p>\
</div>\
</div>\
</body>\
</html>";

/// Escapes the provided `text` for embedding into HTML.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod spec {
    use common::money::Currency;

    use crate::{
        domain::{payment, tenant, Payment, Property, Tenant, Unit},
        fixture::{self, amount, date},
    };

    use super::Receipt;

    fn sample() -> (Payment, Tenant, Unit, Property) {
        let property = fixture::property("Sunset Villas");
        let unit = fixture::unit(&property, "Apartment <1>");
        let mut tenant = fixture::tenant(&unit, "Jane & John", "2024-01-15");
        tenant.email = tenant::Email::new("jane@example.com").unwrap();
        let mut payment = fixture::payment(&tenant, "2024-02-15", "2024-04-14");
        payment.amount = amount("2400.5");
        payment.payment_date = date("2024-02-16");
        payment.months_covered = payment::MonthsCovered::new(2).unwrap();
        (payment, tenant, unit, property)
    }

    #[test]
    fn renders_payment_details() {
        let (payment, tenant, unit, property) = sample();
        let receipt =
            Receipt::new(&payment, &tenant, &unit, &property, Currency::Usd);
        let html = receipt.to_html();

        assert_eq!(receipt.recipient.to_string(), "jane@example.com");
        assert!(html.contains("Dear Jane &amp; John,"));
        assert!(html.contains(&payment.id.to_string()));
        assert!(html.contains("February 16, 2024"));
        assert!(html.contains("Sunset Villas"));
        assert!(html.contains("Apartment &lt;1&gt; (A-1)"));
        assert!(html.contains("February 15, 2024 - April 14, 2024"));
        assert!(html.contains("2 month(s)"));
        assert!(html.contains("$2,400.50"));
    }

    #[test]
    fn prefers_reference_as_number() {
        let (mut payment, tenant, unit, property) = sample();
        payment.reference = Some(payment::Reference::new("BANK-42").unwrap());

        let receipt =
            Receipt::new(&payment, &tenant, &unit, &property, Currency::Ugx);

        assert_eq!(receipt.number, "BANK-42");
        assert!(receipt.to_html().contains("UGX 2,401"));
    }

    #[test]
    fn renders_shillings_in_upper_case() {
        let (mut payment, tenant, unit, property) = sample();
        payment.amount = amount("1500000");

        let html =
            Receipt::new(&payment, &tenant, &unit, &property, Currency::Ugx)
                .to_html();

        assert!(html.contains("UGX 1,500,000"));
    }
}
