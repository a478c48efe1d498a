//! [`Handler`] abstractions.

use std::future::Future;

/// Asynchronous operation accepting `Args` and resolving into a [`Result`].
///
/// Commands, queries, databases and mailers all are [`Handler`]s of their
/// own `Args`, so a single type may handle many different operations, each
/// with its own `Ok` and `Err`.
pub trait Handler<Args = ()> {
    /// Type of a successful result of handling the `Args`.
    type Ok;

    /// Type of an error of handling the `Args`.
    type Err;

    /// Handles the provided `Args`.
    ///
    /// # Errors
    ///
    /// If handling the `Args` fails.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
