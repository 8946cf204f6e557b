//! `ihub keys ...`

use anyhow::Context;
use clap::Subcommand;
use ihub_core::activity::ApiKey;
use ihub_core::hub::Hub;
use jiff::Timestamp;
use serde_json::{Value, json};

use super::{Output, or_none};

#[derive(Debug, Clone, Subcommand)]
pub enum KeysCommand {
    /// List API keys with all but their last four characters masked.
    List,
}

impl KeysCommand {
    pub async fn run(self, hub: &mut Hub, output: Output) -> anyhow::Result<()> {
        match self {
            Self::List => {
                hub.refresh_keys()
                    .await
                    .context("failed to list API keys")?;
                print_keys(output, &hub.activity().keys, Timestamp::now())
            }
        }
    }
}

fn print_keys(output: Output, keys: &[ApiKey], now: Timestamp) -> anyhow::Result<()> {
    if output.is_json() {
        let keys = keys.iter().map(|key| masked_json(key, now)).collect::<Vec<_>>();
        return output.json(&keys);
    }

    let rows = keys
        .iter()
        .map(|key| {
            vec![
                key.id.clone(),
                key.name.clone(),
                key.masked_key(),
                state(key, now).to_owned(),
                or_none(key.last_used_at),
                or_none(key.expires_at),
            ]
        })
        .collect::<Vec<_>>();
    output.table(&["ID", "NAME", "KEY", "STATE", "LAST USED", "EXPIRES"], &rows);
    Ok(())
}

fn state(key: &ApiKey, now: Timestamp) -> &'static str {
    match (key.is_active, key.is_expired(now)) {
        (_, true) => "expired",
        (true, false) => "active",
        (false, false) => "inactive",
    }
}

/// Describes a key for JSON output; the raw key is never included.
fn masked_json(key: &ApiKey, now: Timestamp) -> Value {
    json!({
        "id": key.id,
        "name": key.name,
        "key": key.masked_key(),
        "created_at": key.created_at,
        "last_used_at": key.last_used_at,
        "expires_at": key.expires_at,
        "is_active": key.is_active,
        "state": state(key, now),
    })
}
