//! Subcommands and their output.

mod dashboard;
mod keys;
mod logs;
mod providers;
mod send;

use anyhow::Context;
use clap::Subcommand;
use ihub_core::hub::Hub;
use serde::Serialize;

pub use self::dashboard::DashboardArgs;
pub use self::keys::KeysCommand;
pub use self::logs::LogsCommand;
pub use self::providers::ProvidersCommand;
pub use self::send::SendArgs;

/// Placeholder printed for absent values.
const NONE: &str = "-";

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List, register, configure and delete provider connections.
    #[command(subcommand)]
    Providers(ProvidersCommand),

    /// Inspect and retry messages.
    #[command(subcommand)]
    Logs(LogsCommand),

    /// Send a test message through a provider.
    Send(SendArgs),

    /// List API keys.
    #[command(subcommand)]
    Keys(KeysCommand),

    /// Show aggregate figures over providers and recent messages.
    Dashboard(DashboardArgs),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Providers(_) => "providers",
            Self::Logs(_) => "logs",
            Self::Send(_) => "send",
            Self::Keys(_) => "keys",
            Self::Dashboard(_) => "dashboard",
        }
    }

    /// Runs the command against an operator session.
    pub async fn run(self, hub: &mut Hub, output: Output) -> anyhow::Result<()> {
        tracing::debug!(
            target: crate::TRACING_TARGET_COMMAND,
            command = self.name(),
            "Running command"
        );

        match self {
            Self::Providers(command) => command.run(hub, output).await,
            Self::Logs(command) => command.run(hub, output).await,
            Self::Send(args) => args.run(hub, output).await,
            Self::Keys(command) => command.run(hub, output).await,
            Self::Dashboard(args) => args.run(hub, output).await,
        }
    }
}

/// How results are printed on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(self) -> bool {
        self.json
    }

    /// Prints `value` as pretty JSON.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(value).context("failed to encode output")?;
        println!("{text}");
        Ok(())
    }

    /// Prints a line of text, or `{ "message": line }` in JSON mode.
    pub fn message(self, line: &str) -> anyhow::Result<()> {
        if self.json {
            return self.json(&serde_json::json!({ "message": line }));
        }
        println!("{line}");
        Ok(())
    }

    /// Prints rows under a header with left-aligned columns.
    pub fn table(self, header: &[&str], rows: &[Vec<String>]) {
        print!("{}", render_table(header, rows));
    }
}

fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = header.iter().map(|title| title.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut text = render_line(header.iter().copied(), &widths);
    for row in rows {
        text.push_str(&render_line(row.iter().map(String::as_str), &widths));
    }
    text
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>();
    format!("{}\n", padded.join("  ").trim_end())
}

/// Formats an optional value, printing a placeholder when absent.
fn or_none<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NONE.to_owned(), |value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_columns_are_aligned() {
        let rows = [
            vec!["ek_email".to_owned(), "configured".to_owned()],
            vec!["ek_whatsapp_main".to_owned(), "error".to_owned()],
        ];
        let text = render_table(&["CODE", "STATUS"], &rows);

        assert_eq!(
            text,
            "CODE              STATUS\n\
             ek_email          configured\n\
             ek_whatsapp_main  error\n"
        );
    }

    #[tokio::test]
    async fn read_only_commands_accept_an_empty_backend() {
        let mut hub = Hub::new(ihub_test::create_mock_services());

        let commands = [
            Command::Providers(ProvidersCommand::List),
            Command::Providers(ProvidersCommand::Types),
            Command::Keys(KeysCommand::List),
            Command::Dashboard(DashboardArgs { limit: 10 }),
        ];
        for command in commands {
            command.run(&mut hub, Output::new(true)).await.unwrap();
        }

        assert!(hub.directory().records.is_empty());
        assert_eq!(hub.dashboard().total_requests, 0);
    }

    #[test]
    fn absent_values_print_a_placeholder() {
        assert_eq!(or_none(None::<u64>), "-");
        assert_eq!(or_none(Some(151)), "151");
    }
}
