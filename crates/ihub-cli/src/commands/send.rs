//! `ihub send ...`

use anyhow::Context;
use clap::Args;
use ihub_core::activity::TestMessage;
use ihub_core::hub::Hub;

use super::Output;
use super::logs::print_receipt;

#[derive(Debug, Clone, Args)]
pub struct SendArgs {
    /// Code of the provider to send through.
    #[arg(long)]
    pub provider: String,

    /// Phone number, chat id, email address or device token.
    #[arg(long)]
    pub recipient: String,

    /// Message text.
    #[arg(long)]
    pub message: String,

    /// Subject line for email providers.
    #[arg(long)]
    pub subject: Option<String>,
}

impl SendArgs {
    pub async fn run(self, hub: &mut Hub, output: Output) -> anyhow::Result<()> {
        let message = TestMessage::new(&self.provider, self.recipient, self.message, self.subject)?;

        let receipt = hub
            .send_test(&message)
            .await
            .with_context(|| format!("failed to send through {}", message.provider))?;
        print_receipt(output, &receipt)
    }
}

#[cfg(test)]
mod tests {
    use ihub_core::ErrorKind;
    use ihub_core::directory::RawProvider;
    use ihub_test::MockDirectory;

    use super::*;

    fn args(provider: &str, recipient: &str) -> SendArgs {
        SendArgs {
            provider: provider.to_owned(),
            recipient: recipient.to_owned(),
            message: "ping".to_owned(),
            subject: None,
        }
    }

    #[tokio::test]
    async fn blank_recipient_is_refused_locally() {
        let backend = MockDirectory::new();
        let mut hub = Hub::new(ihub_core::HubServices::from_backend(backend.clone()));

        let error = args("ek_sms", " ")
            .run(&mut hub, Output::default())
            .await
            .unwrap_err();

        let error = error.downcast::<ihub_core::Error>().unwrap();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn message_is_sent_through_normalized_code() {
        let backend = MockDirectory::new().with_providers([RawProvider {
            provider_code: "ek_sms".to_owned(),
            ..RawProvider::default()
        }]);
        let mut hub = Hub::new(ihub_core::HubServices::from_backend(backend.clone()));

        args("EK_SMS", "+79990000000")
            .run(&mut hub, Output::new(true))
            .await
            .unwrap();

        assert_eq!(backend.logs()[0].provider, "ek_sms");
        assert!(!hub.dialogs().saving);
    }
}
