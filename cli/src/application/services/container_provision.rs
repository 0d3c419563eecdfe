//! Application service: container provisioning use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use rand::Rng;
use svcmgr_common::{Entity, OCCI_CORE_ID, attributes::OCCI_APP_REPO};

use crate::application::ports::CloudController;
use crate::domain::container::{
    container_id, entity_identifier, generate_app_name, location_path,
};
use crate::domain::error::LifecycleError;
use crate::domain::occi::decode_attributes;

/// A freshly created app container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedContainer {
    pub name: String,
    /// Controller path of the container, e.g. `/app/abc123`.
    pub app_path: String,
    /// Git URL the service code is pushed to.
    pub repo_uri: String,
}

/// Create the app container that will host the service instance.
///
/// Rewrites `entity.identifier` under the kind's collection and records the
/// raw container id as `occi.core.id`. This call blocks until the controller
/// has finished creating the container.
///
/// # Errors
///
/// - [`LifecycleError::Provisioning`] when the controller returns no
///   location, or the container's attributes lack a repository URI.
/// - Transport errors from the controller.
pub async fn create_container(
    controller: &impl CloudController,
    entity: &mut Entity,
    rng: &mut impl Rng,
) -> Result<ProvisionedContainer> {
    let name = generate_app_name(rng);
    tracing::info!(app_name = %name, "creating app container");

    let location = controller
        .create_app(&name)
        .await
        .context("creating app container")?
        .map(|l| l.trim().to_owned())
        .filter(|l| !l.is_empty())
        .ok_or_else(|| {
            LifecycleError::provisioning(format!("controller returned no location for '{name}'"))
        })?;
    let app_path = location_path(&location)?;

    entity.identifier = entity_identifier(&app_path, &entity.kind);
    entity
        .attributes
        .insert(OCCI_CORE_ID.to_owned(), container_id(&app_path));

    let header = controller
        .app_attribute_header(&app_path)
        .await
        .context("reading app container attributes")?
        .ok_or_else(|| {
            LifecycleError::provisioning(format!("no attributes returned for {app_path}"))
        })?;
    let attrs = decode_attributes(&header).map_err(|e| {
        LifecycleError::provisioning(format!("malformed attributes for {app_path}: {e}"))
    })?;
    let repo_uri = attrs
        .get(OCCI_APP_REPO)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| {
            LifecycleError::provisioning(format!("no {OCCI_APP_REPO} attribute for {app_path}"))
        })?;

    tracing::debug!(%app_path, %repo_uri, "app container ready");
    Ok(ProvisionedContainer {
        name,
        app_path,
        repo_uri,
    })
}
