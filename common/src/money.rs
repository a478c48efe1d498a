//! [`Money`]-related definitions.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, str::FromStr};

use derive_more::{Display, Into};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use rust_decimal::{prelude::ToPrimitive as _, Decimal, RoundingStrategy};

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Formats this [`Money`] for humans, grouping thousands and rounding to
    /// the minor units of its [`Currency`].
    ///
    /// ```rust
    /// # use common::money::{Currency, Money};
    /// let money = Money {
    ///     amount: "1234.5".parse().unwrap(),
    ///     currency: Currency::Usd,
    /// };
    /// assert_eq!(money.to_localized_string(), "$1,234.50");
    /// ```
    #[must_use]
    pub fn to_localized_string(&self) -> String {
        let Self { amount, currency } = self;
        let scale = currency.minor_units();
        let rounded = amount
            .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);

        let digits = rounded.abs().trunc().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        if scale > 0 {
            let fract = rounded.abs().fract();
            let fract = format!("{fract:.prec$}", prec = scale as usize);
            grouped.push_str(fract.trim_start_matches('0'));
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        match currency.symbol() {
            Some(symbol) => format!("{sign}{symbol}{grouped}"),
            None => format!("{sign}{currency} {grouped}"),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        match amount.is_integer().then(|| amount.to_i128()).flatten() {
            Some(int) => write!(f, "{int}{currency}"),
            None => write!(f, "{amount}{currency}"),
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    #[case = "UPPERCASE"]
    enum Currency {
        #[doc = "US Dollar."]
        Usd = 1,

        #[doc = "Euro."]
        Eur = 2,

        #[doc = "Ugandan Shilling."]
        Ugx = 3,
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Usd
    }
}

impl Currency {
    /// Returns the number of minor units (decimal places) this [`Currency`]
    /// is displayed with.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::Usd | Self::Eur => 2,
            Self::Ugx => 0,
        }
    }

    /// Returns the symbol this [`Currency`] is prefixed with, if it has one.
    #[must_use]
    pub const fn symbol(self) -> Option<&'static str> {
        match self {
            Self::Usd => Some("$"),
            Self::Eur => Some("€"),
            Self::Ugx => None,
        }
    }
}

/// Strictly positive amount of money, in a [`Currency`] defined elsewhere.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new [`Amount`] if the given `amount` is positive.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount > Decimal::ZERO).then_some(Self(amount))
    }

    /// Attaches the provided [`Currency`] to this [`Amount`].
    #[must_use]
    pub fn in_currency(self, currency: Currency) -> Money {
        Money {
            amount: self.0,
            currency,
        }
    }
}

impl FromStr for Amount {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s).map_err(|_| "invalid amount")?;
        Self::new(amount).ok_or("amount must be positive")
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Amount {
    accepts!(NUMERIC);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        Decimal::from_sql(ty, raw).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Amount {
    accepts!(NUMERIC);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Amount, Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn money(amount: &str, currency: Currency) -> Money {
        Money {
            amount: decimal(amount),
            currency,
        }
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("123.45USD").unwrap(),
            money("123.45", Currency::Usd),
        );
        assert_eq!(
            Money::from_str("123.45EUR").unwrap(),
            money("123.45", Currency::Eur),
        );
        assert_eq!(
            Money::from_str("150000UGX").unwrap(),
            money("150000", Currency::Ugx),
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Us").is_err());
        assert!(Money::from_str("123.45Usdollar").is_err());

        assert!(Money::from_str("123.00USD").is_ok());
        assert!(Money::from_str("123USD").is_ok());
    }

    #[test]
    fn to_string() {
        assert_eq!(money("123.45", Currency::Usd).to_string(), "123.45USD");
        assert_eq!(money("123.00", Currency::Eur).to_string(), "123EUR");
        assert_eq!(money("123", Currency::Ugx).to_string(), "123UGX");
    }

    #[test]
    fn to_localized_string() {
        assert_eq!(
            money("1200", Currency::Usd).to_localized_string(),
            "$1,200.00",
        );
        assert_eq!(
            money("1234567.891", Currency::Usd).to_localized_string(),
            "$1,234,567.89",
        );
        assert_eq!(
            money("0.005", Currency::Usd).to_localized_string(),
            "$0.01",
        );
        assert_eq!(
            money("999.5", Currency::Eur).to_localized_string(),
            "€999.50",
        );
        assert_eq!(
            money("1500000", Currency::Ugx).to_localized_string(),
            "UGX 1,500,000",
        );
        assert_eq!(
            money("250.5", Currency::Ugx).to_localized_string(),
            "UGX 251",
        );
        assert_eq!(
            money("-42", Currency::Usd).to_localized_string(),
            "-$42.00",
        );
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(Amount::new(decimal("0.01")).is_some());
        assert!(Amount::new(Decimal::ZERO).is_none());
        assert!(Amount::new(decimal("-5")).is_none());

        assert_eq!(
            Amount::from_str("1200.50").unwrap().in_currency(Currency::Usd),
            money("1200.50", Currency::Usd),
        );
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("0").is_err());
    }
}
