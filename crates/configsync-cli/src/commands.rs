//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use configsync_core::{load_config_from_file, store_config_to_file};
use configsync_proto::Project;
use configsync_raft::{
    shared_config, AdminValidator, AllowAll, ConfigApplier, HttpForwarder, LocalLog,
    ProjectQuota, SyncConfig, SyncManager,
};

/// Re-encode a config file, picking both encodings from the extensions.
pub fn convert(input: &Path, output: &Path) -> anyhow::Result<()> {
    let config = load_config_from_file(input)
        .with_context(|| format!("loading {}", input.display()))?;
    store_config_to_file(&config, output)
        .with_context(|| format!("storing {}", output.display()))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        projects = config.project_count(),
        "converted config file"
    );
    Ok(())
}

/// List `(id, name)` of every project in a config file.
pub fn list_projects(path: &Path) -> anyhow::Result<Vec<(String, String)>> {
    let config = load_config_from_file(path)?;
    Ok(config
        .projects
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect())
}

/// Start a single-node sync manager over a config file.
///
/// Applied changes are written back to the same file.
pub fn single_node(path: &Path, max_projects: Option<usize>) -> anyhow::Result<SyncManager> {
    let initial = load_config_from_file(path)
        .with_context(|| format!("loading {}", path.display()))?;

    let config = SyncConfig::default();
    let document = shared_config(initial);
    let applier = ConfigApplier::new(document.clone()).with_persist_path(path);
    let log = Arc::new(LocalLog::new(&config.advertise_addr, applier));
    let forwarder = Arc::new(HttpForwarder::new(&config)?);
    let validator: Arc<dyn AdminValidator> = match max_projects {
        Some(max) => Arc::new(ProjectQuota::new(max)),
        None => Arc::new(AllowAll),
    };

    let manager = SyncManager::new(config, log, forwarder, validator).with_document(document);
    tracing::debug!(
        path = %path.display(),
        cluster_size = manager.get_cluster_size(),
        "single-node sync manager ready"
    );
    Ok(manager)
}

/// Read one project through the sync manager.
pub async fn get_project(path: &Path, project_id: &str) -> anyhow::Result<Project> {
    let manager = single_node(path, None)?;
    Ok(manager.get_config(project_id).await?)
}

/// Create or replace a project from a JSON file.
pub async fn set_project(
    path: &Path,
    project_file: &Path,
    token: &str,
    max_projects: Option<usize>,
) -> anyhow::Result<()> {
    let data = std::fs::read(project_file)
        .with_context(|| format!("reading {}", project_file.display()))?;
    let project: Project = serde_json::from_slice(&data)
        .with_context(|| format!("parsing {}", project_file.display()))?;
    let id = project.id.clone();

    let manager = single_node(path, max_projects)?;
    manager.set_project_config(token, project).await?;

    tracing::info!(project = %id, "project stored");
    Ok(())
}

/// Delete a project.
pub async fn delete_project(path: &Path, project_id: &str, token: &str) -> anyhow::Result<()> {
    let manager = single_node(path, None)?;
    manager.delete_config(token, project_id).await?;

    tracing::info!(project = %project_id, "project deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use configsync_proto::Config;

    fn write_config(dir: &Path, name: &str, projects: &[&str]) -> std::path::PathBuf {
        let path = dir.join(name);
        let config = Config {
            projects: projects.iter().map(|id| Project::new(*id, *id)).collect(),
            ..Default::default()
        };
        store_config_to_file(&config, &path).unwrap();
        path
    }

    #[test]
    fn test_convert_yaml_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_config(dir.path(), "config.yaml", &["a", "b"]);
        let output = dir.path().join("config.json");

        convert(&input, &output).unwrap();

        assert_eq!(
            load_config_from_file(&output).unwrap(),
            load_config_from_file(&input).unwrap()
        );
    }

    #[test]
    fn test_convert_rejects_unknown_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_config(dir.path(), "config.yaml", &["a"]);

        assert!(convert(&input, &dir.path().join("config.toml")).is_err());
    }

    #[test]
    fn test_list_projects() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "config.json", &["a", "b"]);

        let projects = list_projects(&path).unwrap();
        assert_eq!(
            projects,
            vec![("a".to_string(), "a".to_string()), ("b".to_string(), "b".to_string())]
        );
    }

    #[tokio::test]
    async fn test_set_get_delete_project() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "config.yaml", &[]);
        let project_file = dir.path().join("shop.json");
        std::fs::write(&project_file, r#"{"id":"shop","name":"Shop"}"#).unwrap();

        set_project(&path, &project_file, "", None).await.unwrap();
        assert_eq!(get_project(&path, "shop").await.unwrap().name, "Shop");

        delete_project(&path, "shop", "").await.unwrap();
        assert!(get_project(&path, "shop").await.is_err());
    }

    #[tokio::test]
    async fn test_set_project_respects_quota() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "config.json", &["a"]);
        let project_file = dir.path().join("b.json");
        std::fs::write(&project_file, r#"{"id":"b"}"#).unwrap();

        let err = set_project(&path, &project_file, "", Some(1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("upgrade"));
        assert_eq!(list_projects(&path).unwrap().len(), 1);
    }
}
