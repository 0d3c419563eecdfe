use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attributes::SERVICE_STATE;

/// Resource type descriptor of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kind {
    /// Short type name, e.g. `epc`.
    pub term: String,
    /// Category scheme the term belongs to.
    pub scheme: String,
    /// Collection path of this kind, e.g. `/epc_service/`.
    pub location: String,
}

/// Value of the `mcn.service.state` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Init,
    Deploying,
    Provisioning,
    Active,
    Destroying,
    Failed,
}

impl ServiceState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Deploying => "deploying",
            Self::Provisioning => "provisioning",
            Self::Active => "active",
            Self::Destroying => "destroying",
            Self::Failed => "failed",
        }
    }

    /// Parse an attribute value. Unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "init" => Some(Self::Init),
            "deploying" => Some(Self::Deploying),
            "provisioning" => Some(Self::Provisioning),
            "active" => Some(Self::Active),
            "destroying" => Some(Self::Destroying),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of one entity through deploy and dispose.
///
/// Deploy walks `New → ProvisioningStarted → Provisioned → CodeDistributed →
/// RemoteInitialized → RemoteActive`. Dispose walks `Disposing → Disposed`.
/// Any step that fails moves the entity to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    #[default]
    New,
    ProvisioningStarted,
    Provisioned,
    CodeDistributed,
    RemoteInitialized,
    RemoteActive,
    Disposing,
    Disposed,
    Failed,
}

impl LifecyclePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::ProvisioningStarted => "provisioning_started",
            Self::Provisioned => "provisioned",
            Self::CodeDistributed => "code_distributed",
            Self::RemoteInitialized => "remote_initialized",
            Self::RemoteActive => "remote_active",
            Self::Disposing => "disposing",
            Self::Disposed => "disposed",
            Self::Failed => "failed",
        }
    }

    /// Name of the step that runs while the entity sits in this phase.
    #[must_use]
    pub const fn pending_step(self) -> &'static str {
        match self {
            Self::New => "ensure_ssh_key",
            Self::ProvisioningStarted => "create_container",
            Self::Provisioned => "distribute_bundle",
            Self::CodeDistributed => "remote_init",
            Self::RemoteInitialized => "remote_deploy",
            Self::Disposing => "dispose",
            Self::RemoteActive | Self::Disposed | Self::Failed => "none",
        }
    }

    /// Whether an entity in this phase may still own a container or stack.
    #[must_use]
    pub const fn holds_instance(self) -> bool {
        !matches!(self, Self::New | Self::Disposed | Self::Failed)
    }

    /// Whether `self → next` is a defined transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use LifecyclePhase::{
            CodeDistributed, Disposed, Disposing, Failed, New, Provisioned, ProvisioningStarted,
            RemoteActive, RemoteInitialized,
        };
        match (self, next) {
            (New, ProvisioningStarted)
            | (ProvisioningStarted, Provisioned)
            | (Provisioned, CodeDistributed)
            | (CodeDistributed, RemoteInitialized)
            | (RemoteInitialized, RemoteActive)
            | (Disposing, Disposed) => true,
            (Disposing | Disposed, Disposing) => false,
            (_, Disposing) => true,
            (Disposed | Failed, Failed) => false,
            (_, Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid lifecycle transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: LifecyclePhase,
    pub to: LifecyclePhase,
}

/// Transient data accumulated while an entity moves through its lifecycle.
///
/// None of this is sent to the cloud controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityExtras {
    /// Host of the running service instance, derived from its git URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Stack identifier returned by the instance's `deploy` action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    #[serde(default)]
    pub phase: LifecyclePhase,
    /// Step that was running when the entity entered `Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<String>,
}

impl EntityExtras {
    /// Move to `next`, rejecting undefined transitions.
    pub fn advance(&mut self, next: LifecyclePhase) -> Result<(), TransitionError> {
        if !self.phase.can_transition_to(next) {
            return Err(TransitionError {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }

    /// Record a failure of the step pending in the current phase.
    ///
    /// Returns `false` when the current phase cannot fail (already terminal).
    pub fn fail(&mut self) -> bool {
        let step = self.phase.pending_step();
        if self.advance(LifecyclePhase::Failed).is_err() {
            return false;
        }
        self.failed_step = Some(step.to_owned());
        true
    }
}

/// The resource record representing one service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Resource path, rewritten once the container exists.
    pub identifier: String,
    pub kind: Kind,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub extras: EntityExtras,
}

impl Entity {
    #[must_use]
    pub fn new(identifier: impl Into<String>, kind: Kind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            attributes: BTreeMap::new(),
            extras: EntityExtras::default(),
        }
    }

    /// Current `mcn.service.state`, if set to a known value.
    #[must_use]
    pub fn service_state(&self) -> Option<ServiceState> {
        self.attributes
            .get(SERVICE_STATE)
            .and_then(|v| ServiceState::parse(v))
    }

    pub fn set_service_state(&mut self, state: ServiceState) {
        self.attributes
            .insert(SERVICE_STATE.to_owned(), state.as_str().to_owned());
    }
}
