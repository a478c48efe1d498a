//! [`Command`] for deleting a [`Payment`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{payment, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Payment`].
#[derive(Clone, Copy, Debug)]
pub struct DeletePayment {
    /// ID of the [`Payment`] to be deleted.
    pub payment_id: payment::Id,
}

impl<Db, M> Command<DeletePayment> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Payment>, payment::Id>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Payment, payment::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeletePayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeletePayment { payment_id } = cmd;

        self.database()
            .execute(Select(By::<Option<Payment>, _>::new(payment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PaymentNotExists(payment_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        self.database()
            .execute(Delete(By::<Payment, _>::new(payment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`DeletePayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Payment`] doesn't exist.
    #[display("`Payment(id: {_0})` does not exist")]
    #[from(ignore)]
    PaymentNotExists(#[error(not(source))] payment::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::payment,
        fake::{self, Memory, Outbox},
        Command as _,
    };

    use super::{DeletePayment, ExecutionError};

    #[tokio::test]
    async fn errors_on_unknown_payment() {
        let db = Memory::default();
        let svc = fake::service(&db, &Outbox::default());
        let id = payment::Id::new();

        let err = svc
            .execute(DeletePayment { payment_id: id })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PaymentNotExists(i) if *i == id,
        ));
    }
}
