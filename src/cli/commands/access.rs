use std::sync::Arc;

use anyhow::Context;
use axum::http::Method;
use clap::{Args, Subcommand};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::access::{allowed_methods, AccessFixture, AccessGate, GatePolicy, MemoryAccessStore, ResourceRef};
use crate::auth::Identity;
use crate::cli::utils::{output_error, output_fields, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AccessCommands {
    #[command(about = "Check a request against a fixture file, offline")]
    Check {
        #[arg(long, help = "JSON fixture with projects, data_models, entities and members")]
        fixture: std::path::PathBuf,
        #[arg(long, help = "Caller user id")]
        user: Uuid,
        #[arg(long, help = "Caller is a superuser")]
        superuser: bool,
        #[command(flatten)]
        resource: ResourceArgs,
        #[arg(long, default_value = "GET", help = "HTTP method of the request")]
        method: String,
    },

    #[command(about = "Ask a running server for the caller's role on a resource")]
    Probe {
        #[arg(long, help = "Server base URL, e.g. http://localhost:3000")]
        server: String,
        #[arg(long, env = "MODELER_TOKEN", help = "Bearer token")]
        token: String,
        #[command(flatten)]
        resource: ResourceArgs,
    },
}

/// Exactly one resource to check.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ResourceArgs {
    #[arg(long)]
    pub project: Option<Uuid>,
    #[arg(long)]
    pub model: Option<Uuid>,
    #[arg(long)]
    pub entity: Option<Uuid>,
}

impl ResourceArgs {
    pub fn resource(&self) -> anyhow::Result<ResourceRef> {
        match (self.project, self.model, self.entity) {
            (Some(id), None, None) => Ok(ResourceRef::Project(id)),
            (None, Some(id), None) => Ok(ResourceRef::DataModel(id)),
            (None, None, Some(id)) => Ok(ResourceRef::Entity(id)),
            _ => anyhow::bail!("exactly one of --project, --model or --entity is required"),
        }
    }
}

/// URL path segment for a resource kind, as served under /api/access.
fn path_kind(resource: &ResourceRef) -> &'static str {
    match resource {
        ResourceRef::Project(_) => "project",
        ResourceRef::DataModel(_) => "model",
        ResourceRef::Entity(_) => "entity",
    }
}

/// Probe endpoint for a resource, appended to any path the server URL has.
fn access_url(server: &str, resource: &ResourceRef) -> anyhow::Result<url::Url> {
    let mut url = url::Url::parse(server).with_context(|| format!("invalid server URL '{}'", server))?;
    let id = resource.id().to_string();
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("server URL '{}' cannot have a path", server))?
        .pop_if_empty()
        .extend(["api", "access", path_kind(resource), id.as_str()]);
    Ok(url)
}

pub async fn handle(cmd: AccessCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AccessCommands::Check { fixture, user, superuser, resource, method } => {
            let content = std::fs::read_to_string(&fixture)
                .with_context(|| format!("reading fixture {}", fixture.display()))?;
            let fixture: AccessFixture = serde_json::from_str(&content).context("parsing fixture")?;
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .with_context(|| format!("invalid HTTP method '{}'", method))?;

            let identity = Identity { id: user, is_superuser: superuser };
            check(fixture, identity, resource.resource()?, method, output_format).await
        }
        AccessCommands::Probe { server, token, resource } => {
            probe(&server, &token, resource.resource()?, output_format).await
        }
    }
}

async fn check(
    fixture: AccessFixture,
    identity: Identity,
    resource: ResourceRef,
    method: Method,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let gate = AccessGate::new(Arc::new(MemoryAccessStore::from_fixture(fixture)));

    match gate.authorize(Some(&identity), resource, &method, GatePolicy::MethodTable).await {
        Ok(permit) => {
            output_success(
                &output_format,
                &format!("{} {} allowed as {}", method, resource, permit.role),
                Some(json!({
                    "allowed": true,
                    "role": permit.role,
                    "project_id": permit.project_id,
                    "allowed_methods": allowed_methods(permit.role),
                })),
            )?;
            output_fields(
                &output_format,
                &[
                    ("project", permit.project_id.to_string()),
                    ("allowed methods", allowed_methods(permit.role).join(", ")),
                ],
            );
            Ok(())
        }
        Err(err) => {
            output_error(&output_format, &err.to_string(), Some(err.kind()))?;
            anyhow::bail!("{} {} denied", method, resource)
        }
    }
}

async fn probe(server: &str, token: &str, resource: ResourceRef, output_format: OutputFormat) -> anyhow::Result<()> {
    let url = access_url(server, &resource)?;

    let response = reqwest::Client::new()
        .get(url.clone())
        .bearer_auth(token)
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?;

    let status = response.status();
    let body: Value = response.json().await.context("server returned a non-JSON body")?;

    if !status.is_success() {
        let message = body["message"].as_str().unwrap_or("request failed");
        output_error(&output_format, message, body["code"].as_str())?;
        anyhow::bail!("server answered {}", status);
    }

    let data = body.get("data").cloned().unwrap_or(Value::Null);
    let role = data["role"].as_str().unwrap_or("unknown").to_string();
    output_success(&output_format, &format!("{} role: {}", resource, role), Some(data.clone()))?;

    let methods = data["allowed_methods"]
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", "))
        .unwrap_or_default();
    output_fields(&output_format, &[("allowed methods", methods)]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_args_map_to_resource_refs() {
        let id = Uuid::new_v4();
        let args = ResourceArgs { project: None, model: Some(id), entity: None };
        assert_eq!(args.resource().unwrap(), ResourceRef::DataModel(id));
        assert_eq!(path_kind(&ResourceRef::DataModel(id)), "model");

        let none = ResourceArgs { project: None, model: None, entity: None };
        assert!(none.resource().is_err());
    }

    #[test]
    fn access_url_keeps_the_server_path() {
        let id = Uuid::new_v4();
        let entity = ResourceRef::Entity(id);

        assert_eq!(
            access_url("http://localhost:3000", &entity).unwrap().as_str(),
            format!("http://localhost:3000/api/access/entity/{}", id)
        );
        assert_eq!(
            access_url("https://example.com/modeler", &entity).unwrap().as_str(),
            format!("https://example.com/modeler/api/access/entity/{}", id)
        );
        assert_eq!(
            access_url("https://example.com/modeler/", &ResourceRef::Project(id)).unwrap().as_str(),
            format!("https://example.com/modeler/api/access/project/{}", id)
        );

        assert!(access_url("not a url", &entity).is_err());
        assert!(access_url("mailto:ops@example.com", &entity).is_err());
    }

    #[tokio::test]
    async fn check_uses_fixture_membership() {
        let (project, model, viewer) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let fixture: AccessFixture = serde_json::from_value(json!({
            "projects": [{ "id": project, "created_by": Uuid::new_v4() }],
            "data_models": [{ "id": model, "project_id": project }],
            "members": [{ "project_id": project, "user_id": viewer, "role": "viewer" }]
        }))
        .unwrap();

        let identity = Identity::user(viewer);
        let resource = ResourceRef::DataModel(model);
        assert!(check(fixture.clone(), identity, resource, Method::GET, OutputFormat::Json).await.is_ok());
        assert!(check(fixture, identity, resource, Method::PATCH, OutputFormat::Json).await.is_err());
    }
}
