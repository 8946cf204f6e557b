//! `ihub providers ...`

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use ihub_core::hub::Hub;
use ihub_core::provider::{
    CredentialField, FieldValues, ImportReport, ProviderCode, ProviderType, missing_fields,
};
use serde_json::json;
use strum::IntoEnumIterator;

use super::{Output, or_none};
use crate::TRACING_TARGET_COMMAND;

#[derive(Debug, Clone, Subcommand)]
pub enum ProvidersCommand {
    /// List registered providers.
    List,

    /// List provider types and the credential fields each requires.
    Types,

    /// Register a provider.
    Add(AddArgs),

    /// Replace the stored credentials of a provider.
    Configure(ConfigureArgs),

    /// Delete a provider.
    Delete(DeleteArgs),
}

/// Credential values given on the command line or read from a file.
#[derive(Debug, Clone, Default, Args)]
pub struct CredentialArgs {
    /// Credential field as `name=value`, e.g. `wappi_token=...`. Repeatable.
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(CredentialField, String)>,

    /// Read credentials from a service-account JSON or a `.p8` key file.
    ///
    /// Fields given with `--field` take precedence over imported ones.
    #[arg(long = "import", value_name = "FILE")]
    pub import: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Human-readable name.
    #[arg(long)]
    pub name: String,

    /// Provider code; lowercased, characters outside `[a-z0-9_]` are dropped.
    #[arg(long)]
    pub code: String,

    /// Provider type, e.g. `whatsapp_business` or `yandex_postbox`.
    #[arg(long = "type", value_name = "TYPE")]
    pub provider_type: ProviderType,

    #[command(flatten)]
    pub credentials: CredentialArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ConfigureArgs {
    /// Code of a registered provider.
    pub code: String,

    #[command(flatten)]
    pub credentials: CredentialArgs,
}

#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    /// Code of a registered provider.
    pub code: String,

    /// Delete without asking for confirmation.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Parses a `name=value` credential argument.
fn parse_field(input: &str) -> Result<(CredentialField, String), String> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{input}'"))?;
    let field = name
        .trim()
        .parse::<CredentialField>()
        .map_err(|_| format!("unknown credential field '{}'", name.trim()))?;
    Ok((field, value.to_owned()))
}

impl ProvidersCommand {
    pub async fn run(self, hub: &mut Hub, output: Output) -> anyhow::Result<()> {
        match self {
            Self::List => list(hub, output).await,
            Self::Types => types(output),
            Self::Add(args) => add(hub, output, args).await,
            Self::Configure(args) => configure(hub, output, args).await,
            Self::Delete(args) => delete(hub, output, args).await,
        }
    }
}

async fn list(hub: &mut Hub, output: Output) -> anyhow::Result<()> {
    hub.refresh_providers()
        .await
        .context("failed to list providers")?;
    let records = &hub.directory().records;

    if output.is_json() {
        return output.json(records);
    }

    let rows = records
        .iter()
        .map(|record| {
            vec![
                record.code.to_string(),
                record.name.clone(),
                record.provider_type.to_string(),
                record.connection_status.to_string(),
                if record.has_stored_config { "yes" } else { "no" }.to_owned(),
                or_none(record.last_attempt_at),
            ]
        })
        .collect::<Vec<_>>();
    output.table(
        &["CODE", "NAME", "TYPE", "STATUS", "CONFIG", "LAST ATTEMPT"],
        &rows,
    );
    Ok(())
}

fn types(output: Output) -> anyhow::Result<()> {
    if output.is_json() {
        let types = ProviderType::iter()
            .map(|provider_type| {
                json!({
                    "type": provider_type,
                    "label": provider_type.label(),
                    "group": provider_type.credential_group().to_string(),
                    "fields": provider_type.required_fields(),
                })
            })
            .collect::<Vec<_>>();
        return output.json(&types);
    }

    let rows = ProviderType::iter()
        .map(|provider_type| {
            let fields = provider_type
                .required_fields()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            vec![
                provider_type.to_string(),
                provider_type.label().to_owned(),
                if fields.is_empty() {
                    super::NONE.to_owned()
                } else {
                    fields.join(", ")
                },
            ]
        })
        .collect::<Vec<_>>();
    output.table(&["TYPE", "LABEL", "FIELDS"], &rows);
    Ok(())
}

/// Reports an import outcome; a rejected import is not fatal.
fn report_import(report: &ImportReport) {
    match report {
        ImportReport::Applied(fields) => tracing::info!(
            target: TRACING_TARGET_COMMAND,
            fields = ?fields,
            "Credentials imported"
        ),
        ImportReport::Rejected(diagnostic) => eprintln!("Warning: import skipped: {diagnostic}"),
    }
}

/// Fails with the list of required fields that are still empty.
fn require_fields(provider_type: ProviderType, values: &FieldValues) -> anyhow::Result<()> {
    let missing = missing_fields(provider_type, values);
    if missing.is_empty() {
        return Ok(());
    }

    let names = missing.iter().map(ToString::to_string).collect::<Vec<_>>();
    bail!(
        "{provider_type} providers require {}; missing: {}",
        provider_type.credential_group(),
        names.join(", ")
    )
}

async fn add(hub: &mut Hub, output: Output, args: AddArgs) -> anyhow::Result<()> {
    hub.open_add();

    if let Some(path) = &args.credentials.import {
        let report = hub.import_into_add_draft(path).await;
        report_import(&report);
    }

    let draft = hub.add_draft_mut();
    draft.name = args.name;
    draft.set_code(&args.code);
    draft.provider_type = Some(args.provider_type);
    for (field, value) in args.credentials.fields {
        draft.set_field(field, value);
    }

    let code = draft.code().to_owned();
    if code.is_empty() {
        bail!("provider code '{}' is empty after normalization", args.code);
    }
    require_fields(args.provider_type, &draft.fields)?;

    hub.submit_add_draft()
        .await
        .with_context(|| format!("failed to create provider {code}"))?;

    output.message(&format!("Provider {code} created"))
}

async fn configure(hub: &mut Hub, output: Output, args: ConfigureArgs) -> anyhow::Result<()> {
    hub.refresh_providers()
        .await
        .context("failed to list providers")?;

    let code = ProviderCode::from_wire(args.code);
    hub.open_config(&code)?;

    if let Some(path) = &args.credentials.import {
        let report = hub.import_into_config_draft(path).await;
        report_import(&report);
    }

    let draft = hub
        .config_draft_mut()
        .context("configuration form is not open")?;
    for (field, value) in args.credentials.fields {
        draft.set_field(field, value);
    }
    require_fields(draft.provider_type, &draft.fields)?;

    hub.save_config()
        .await
        .with_context(|| format!("failed to configure provider {code}"))?;

    output.message(&format!("Provider {code} configured"))
}

async fn delete(hub: &mut Hub, output: Output, args: DeleteArgs) -> anyhow::Result<()> {
    let code = ProviderCode::from_wire(args.code);
    hub.request_delete(&code);

    if !args.yes {
        hub.cancel_delete();
        bail!("refusing to delete provider {code} without --yes");
    }

    hub.confirm_delete()
        .await
        .with_context(|| format!("failed to delete provider {code}"))?;

    output.message(&format!("Provider {code} deleted"))
}
