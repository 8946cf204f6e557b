//! `ihub logs ...`

use anyhow::Context;
use clap::{Args, Subcommand};
use ihub_core::activity::{DEFAULT_LOG_LIMIT, DispatchReceipt, MessageDetails, MessageLogEntry};
use ihub_core::hub::Hub;

use super::{Output, or_none};

#[derive(Debug, Clone, Subcommand)]
pub enum LogsCommand {
    /// List recent messages, newest first.
    List(ListArgs),

    /// Show one message with its delivery attempts.
    Show {
        /// Message identifier.
        message_id: String,
    },

    /// Request one more delivery attempt for a message.
    Retry {
        /// Message identifier.
        message_id: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Number of entries to fetch, between 1 and 100.
    #[arg(long, short = 'n', default_value_t = DEFAULT_LOG_LIMIT)]
    pub limit: u32,
}

impl LogsCommand {
    pub async fn run(self, hub: &mut Hub, output: Output) -> anyhow::Result<()> {
        match self {
            Self::List(args) => {
                hub.refresh_logs(args.limit)
                    .await
                    .context("failed to list messages")?;
                print_entries(output, &hub.activity().logs)
            }
            Self::Show { message_id } => {
                let details = hub
                    .open_log_details(&message_id)
                    .await
                    .with_context(|| format!("failed to load message {message_id}"))?;
                print_details(output, details)
            }
            Self::Retry { message_id } => {
                let receipt = hub
                    .retry_message(&message_id)
                    .await
                    .with_context(|| format!("failed to retry message {message_id}"))?;
                print_receipt(output, &receipt)
            }
        }
    }
}

/// Prints log entries as a table.
pub(super) fn print_entries(output: Output, entries: &[MessageLogEntry]) -> anyhow::Result<()> {
    if output.is_json() {
        return output.json(entries);
    }

    let rows = entries
        .iter()
        .map(|entry| {
            vec![
                entry.message_id.clone(),
                entry.provider.clone(),
                entry.recipient.clone(),
                entry.status.to_string(),
                format!("{}/{}", entry.attempts, entry.max_attempts),
                or_none(entry.response_time_ms.map(|ms| format!("{ms:.0} ms"))),
                or_none(entry.created_at),
            ]
        })
        .collect::<Vec<_>>();
    output.table(
        &["ID", "PROVIDER", "RECIPIENT", "STATUS", "ATTEMPTS", "RESPONSE", "CREATED"],
        &rows,
    );
    Ok(())
}

fn print_details(output: Output, details: &MessageDetails) -> anyhow::Result<()> {
    if output.is_json() {
        return output.json(details);
    }

    let entry = &details.entry;
    println!("Message:   {}", entry.message_id);
    println!("Provider:  {}", entry.provider);
    println!("Recipient: {}", entry.recipient);
    println!("Status:    {}", entry.status);
    println!("Attempts:  {}/{}", entry.attempts, entry.max_attempts);
    println!("Created:   {}", or_none(entry.created_at));
    if !details.message_text.is_empty() {
        println!("Text:      {}", details.message_text);
    }
    for (key, value) in &details.extra {
        println!("{key}: {value}");
    }

    if details.delivery_attempts.is_empty() {
        return Ok(());
    }

    println!();
    let rows = details
        .delivery_attempts
        .iter()
        .map(|attempt| {
            vec![
                attempt.attempt_number.to_string(),
                attempt.status.clone(),
                or_none(attempt.response_code),
                or_none(attempt.duration_ms.map(|ms| format!("{ms:.0} ms"))),
                or_none(attempt.error_message.clone()),
                or_none(attempt.attempted_at),
            ]
        })
        .collect::<Vec<_>>();
    output.table(
        &["#", "STATUS", "CODE", "DURATION", "ERROR", "AT"],
        &rows,
    );
    Ok(())
}

/// Prints the outcome of a retry or a test dispatch.
pub(super) fn print_receipt(output: Output, receipt: &DispatchReceipt) -> anyhow::Result<()> {
    if output.is_json() {
        return output.json(receipt);
    }

    println!(
        "Message {}: {}",
        receipt.message_id,
        or_none(receipt.status)
    );
    if let Some(attempts) = receipt.attempts {
        println!("Attempts: {attempts}");
    }
    if let Some(message) = &receipt.message {
        println!("{message}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ihub_core::ErrorKind;
    use ihub_core::activity::MessageStatus;
    use ihub_test::MockDirectory;

    use super::*;

    fn entry(id: &str, status: MessageStatus) -> MessageLogEntry {
        MessageLogEntry {
            message_id: id.to_owned(),
            provider: "ek_sms".to_owned(),
            status,
            attempts: 1,
            max_attempts: 3,
            ..MessageLogEntry::default()
        }
    }

    #[tokio::test]
    async fn retry_reloads_the_log() {
        let backend = MockDirectory::new().with_logs([entry("msg_1", MessageStatus::Failed)]);
        let mut hub = Hub::new(ihub_core::HubServices::from_backend(backend.clone()));

        let command = LogsCommand::Retry {
            message_id: "msg_1".to_owned(),
        };
        command.run(&mut hub, Output::default()).await.unwrap();

        assert_eq!(hub.activity().logs[0].status, MessageStatus::Delivered);
        assert_eq!(backend.calls(), ["retry_message", "list_logs"]);
    }

    #[tokio::test]
    async fn unknown_message_is_reported() {
        let backend = MockDirectory::new();
        let mut hub = Hub::new(ihub_core::HubServices::from_backend(backend));

        let command = LogsCommand::Show {
            message_id: "msg_404".to_owned(),
        };
        let error = command.run(&mut hub, Output::new(true)).await.unwrap_err();

        assert!(error.to_string().contains("msg_404"));
        let error = error.downcast::<ihub_core::Error>().unwrap();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }
}
