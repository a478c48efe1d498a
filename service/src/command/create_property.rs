//! [`Command`] for creating a new [`Property`].

use common::{operations::Insert, DateTime};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::property::{Address, Code, Description, Name};
use crate::{
    domain::{property, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Property`].
#[derive(Clone, Debug)]
pub struct CreateProperty {
    /// [`Code`] of a new [`Property`].
    pub code: property::Code,

    /// [`Name`] of a new [`Property`].
    pub name: property::Name,

    /// [`Address`] of a new [`Property`].
    pub address: property::Address,

    /// [`Description`] of a new [`Property`].
    pub description: Option<property::Description>,
}

impl<Db, M> Command<CreateProperty> for Service<Db, M>
where
    Db: Database<Insert<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateProperty {
            code,
            name,
            address,
            description,
        } = cmd;

        let property = Property {
            id: property::Id::new(),
            code,
            name,
            address,
            description,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(property.clone()))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(property)
    }
}

/// Error of [`CreateProperty`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use crate::{
        domain::property,
        fake::{self, Memory, Outbox},
        Command as _,
    };

    use super::CreateProperty;

    #[tokio::test]
    async fn stores_property() {
        let db = Memory::default();
        let svc = fake::service(&db, &Outbox::default());

        let property = svc
            .execute(CreateProperty {
                code: property::Code::new("SV").unwrap(),
                name: property::Name::new("Sunset Villas").unwrap(),
                address: property::Address::new("12 Kampala Rd").unwrap(),
                description: None,
            })
            .await
            .unwrap();

        let state = db.state();
        assert_eq!(state.properties.len(), 1);
        assert_eq!(state.properties[0].id, property.id);
        assert_eq!(state.properties[0].name.to_string(), "Sunset Villas");
    }
}
