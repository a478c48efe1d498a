//! Read entities definitions.

pub mod dashboard;
pub mod expense;
pub mod payment;
pub mod property;
pub mod schedule;
pub mod tenant;
pub mod unit;

use derive_more::{Display, From, Into};
use serde::Serialize;

/// Number of entities related to some other one.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct Count(i64);

impl PartialEq<i64> for Count {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}
