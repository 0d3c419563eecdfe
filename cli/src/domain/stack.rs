//! Stack details and service orchestrator status reports.

use serde::{Deserialize, Serialize};
use svcmgr_common::{Entity, ServiceState};

/// Stack state reported when resource creation failed.
pub const CREATE_FAILED: &str = "CREATE_FAILED";

/// Body returned by the `deploy` action when `init` was never called.
pub const NOT_INITIALISED_SENTINEL: &str = "Please initialize SO with token and tenant first.";

const NOT_DEPLOYED: &str = "Stack is not deployed atm.";
const DEPLOYING: &str = "Stack is currently being deployed...";

/// One output of a deployed stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackOutput {
    pub output_key: String,
    pub output_value: serde_json::Value,
}

/// Deployment details of a stack, as returned by the design endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackDetails {
    pub state: String,
    #[serde(default)]
    pub output: Vec<StackOutput>,
}

impl StackDetails {
    /// Service state this stack state maps to.
    #[must_use]
    pub fn service_state(&self) -> ServiceState {
        if self.state == CREATE_FAILED {
            ServiceState::Failed
        } else {
            ServiceState::Active
        }
    }

    /// Project the details onto `entity`: set the service state and copy every
    /// output pair verbatim. Repeated keys resolve to the last value.
    pub fn apply_to(&self, entity: &mut Entity) {
        entity.set_service_state(self.service_state());
        for out in &self.output {
            entity
                .attributes
                .insert(out.output_key.clone(), attribute_value(&out.output_value));
        }
    }
}

/// Render an output value as an attribute string. Strings are kept verbatim.
#[must_use]
pub fn attribute_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// State reported by a running service orchestrator's status endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteState {
    NotDeployed,
    Deploying,
    Ready(StackDetails),
    Unknown(String),
}

impl RemoteState {
    /// Interpret a status body.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        let trimmed = body.trim();
        match trimmed {
            NOT_DEPLOYED => Self::NotDeployed,
            DEPLOYING => Self::Deploying,
            _ => serde_json::from_str::<StackDetails>(trimmed)
                .map_or_else(|_| Self::Unknown(trimmed.to_owned()), Self::Ready),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotDeployed => "not_deployed",
            Self::Deploying => "deploying",
            Self::Ready(_) => "ready",
            Self::Unknown(_) => "unknown",
        }
    }
}
