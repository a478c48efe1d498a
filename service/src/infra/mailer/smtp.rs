//! SMTP [`Mailer`] implementation.

use std::time;

use common::operations::Deliver;
use derive_more::{Debug, Display, Error as StdError, From};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport as _, Message, Tokio1Executor,
};
use secrecy::{ExposeSecret as _, SecretString};
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::{domain::payment::Receipt, infra::mailer};
#[cfg(doc)]
use crate::infra::Mailer;

/// [`Smtp`] configuration.
#[derive(Debug, SmartDefault)]
pub struct Config {
    /// Host of the SMTP server.
    #[default("localhost".to_owned())]
    pub host: String,

    /// Port of the SMTP server.
    #[default(1025)]
    pub port: u16,

    /// User to authenticate on the SMTP server as, if any.
    pub user: Option<String>,

    /// Password to authenticate on the SMTP server with.
    pub password: Option<SecretString>,

    /// Address the mails are sent from.
    #[default("noreply@rentalms.com".to_owned())]
    pub from: String,

    /// Indicator whether the connection to the SMTP server should be secured
    /// with TLS.
    pub tls: bool,

    /// Timeout of SMTP server operations.
    #[default(time::Duration::from_secs(10))]
    pub timeout: time::Duration,
}

/// SMTP [`Mailer`] client.
#[derive(Clone, Debug)]
pub struct Smtp {
    /// Underlying SMTP transport.
    #[debug(skip)]
    transport: AsyncSmtpTransport<Tokio1Executor>,

    /// [`Mailbox`] the mails are sent from.
    from: Mailbox,
}

impl Smtp {
    /// Creates a new [`Smtp`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the [`Config`] describes an invalid sender or server.
    pub fn new(conf: &Config) -> Result<Self, Traced<mailer::Error>> {
        let from = conf
            .from
            .parse::<Mailbox>()
            .map_err(|_| mailer::Error::InvalidAddress(conf.from.clone()))
            .map_err(tracerr::wrap!())?;

        let mut builder = if conf.tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&conf.host)
                .map_err(tracerr::from_and_wrap!(=> Error))
                .map_err(tracerr::map_from)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&conf.host)
        }
        .port(conf.port)
        .timeout(Some(conf.timeout));
        if let (Some(user), Some(password)) = (&conf.user, &conf.password) {
            builder = builder.credentials(Credentials::new(
                user.clone(),
                password.expose_secret().to_owned(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

impl mailer::Mailer<Deliver<Receipt>> for Smtp {
    type Ok = ();
    type Err = Traced<mailer::Error>;

    async fn execute(
        &self,
        Deliver(receipt): Deliver<Receipt>,
    ) -> Result<Self::Ok, Self::Err> {
        let to = receipt
            .recipient
            .to_string()
            .parse::<Mailbox>()
            .map_err(|_| {
                mailer::Error::InvalidAddress(receipt.recipient.to_string())
            })
            .map_err(tracerr::wrap!())?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(Receipt::SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(receipt.to_html())
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        log::debug!(
            "receipt `{}` delivered: {}",
            receipt.number,
            response.code(),
        );

        Ok(())
    }
}

/// [`Smtp`] delivery error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to build a mail message.
    #[display("failed to build message: {_0}")]
    Message(lettre::error::Error),

    /// SMTP transport failed.
    #[display("SMTP transport failed: {_0}")]
    Transport(lettre::transport::smtp::Error),
}
