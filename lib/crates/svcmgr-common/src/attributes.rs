//! Well-known entity attribute keys.

/// Raw identifier of the container resource created for the entity.
pub const OCCI_CORE_ID: &str = "occi.core.id";

/// Lifecycle marker reported to the entity's owner.
pub const SERVICE_STATE: &str = "mcn.service.state";

/// Git push URL attribute returned by the cloud controller for an app.
pub const OCCI_APP_REPO: &str = "occi.app.repo";

/// Name attribute sent when creating an app container.
pub const OCCI_APP_NAME: &str = "occi.app.name";

/// Public key name attribute.
pub const OCCI_KEY_NAME: &str = "occi.key.name";

/// Public key material attribute.
pub const OCCI_KEY_CONTENT: &str = "occi.key.content";
