//! HTTP verb mapping of registry revisions.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Selects which HTTP verbs the registry uses for create and update.
///
/// Listing is always `GET` and deletion always `DELETE ?provider_code=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RegistryDialect {
    /// `POST` creates, `PATCH` updates.
    #[default]
    Rest,
    /// `PUT` creates, `POST` updates, as deployed by older registries.
    Legacy,
}
