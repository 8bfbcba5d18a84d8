//! Logger identity attached to every emitted line

use serde::{Deserialize, Serialize};

/// Identity fields carried by a logger.
///
/// Every field is optional; present fields are copied onto each emitted
/// record. An identity only changes through a refresh, which also rotates
/// the trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub app_name: Option<String>,
    pub correlation: Option<String>,
    pub session: Option<String>,
    pub user_id: Option<String>,
    pub identifier: Option<String>,
}

impl Identity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_correlation(mut self, correlation: impl Into<String>) -> Self {
        self.correlation = Some(correlation.into());
        self
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Return a copy with the truthy fields of `update` applied.
    ///
    /// Fields that are `None` or empty in the update keep their current value.
    pub fn merged(&self, update: &IdentityUpdate) -> Self {
        Self {
            app_name: pick(&update.app_name, &self.app_name),
            correlation: pick(&update.correlation, &self.correlation),
            session: pick(&update.session, &self.session),
            user_id: pick(&update.user_id, &self.user_id),
            identifier: pick(&update.identifier, &self.identifier),
        }
    }
}

fn pick(update: &Option<String>, current: &Option<String>) -> Option<String> {
    match update {
        Some(value) if !value.is_empty() => Some(value.clone()),
        _ => current.clone(),
    }
}

/// Partial identity used by `Logger::refresh_instance`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUpdate {
    pub app_name: Option<String>,
    pub correlation: Option<String>,
    pub session: Option<String>,
    pub user_id: Option<String>,
    pub identifier: Option<String>,
}

impl IdentityUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn correlation(mut self, correlation: impl Into<String>) -> Self {
        self.correlation = Some(correlation.into());
        self
    }

    pub fn session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}
