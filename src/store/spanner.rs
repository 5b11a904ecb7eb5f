use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::mutation::insert_or_update;
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use std::sync::Arc;

use super::{KvStore, StoreResult};
use crate::config::SpannerConfig;

/// One row per key; the service only ever writes `url_list`.
const TABLE: &str = "tv_list_records";

/// Shareable Spanner-backed key-value store
#[derive(Clone)]
pub struct SpannerStore {
    inner: Arc<Client>,
}

impl SpannerStore {
    /// Connect to Spanner after making sure the record table exists
    ///
    /// The gcloud-spanner library picks up `SPANNER_EMULATOR_HOST` from the
    /// environment and targets the emulator when it is set. Instances are
    /// only created on the emulator.
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        let paths = SpannerPaths::new(config);
        provision(config, &paths).await?;

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&paths.database, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!("Successfully connected to Spanner database: {}", paths.database);

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Insert or replace the value stored under `key`, stamping `updated_at`
    async fn upsert(&self, key: &str, value: &str) -> Result<()> {
        let mutation = insert_or_update(
            TABLE,
            &["id", "data", "updated_at"],
            &[&key.to_string(), &value.to_string(), &CommitTimestamp::new()],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .with_context(|| format!("Failed to write '{}' to {}", key, TABLE))?;

        tracing::debug!("Upserted {} bytes under key: {}", value.len(), key);
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        let mut statement = Statement::new(&format!("SELECT data FROM {} WHERE id = @id", TABLE));
        statement.add_param("id", &key.to_string());

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .with_context(|| format!("Failed to read '{}' from {}", key, TABLE))?;

        match result_set.next().await? {
            Some(row) => {
                let data: String = row.column_by_name("data")?;
                tracing::debug!("Read value under key: {}", key);
                Ok(Some(data))
            }
            None => {
                tracing::debug!("No value under key: {}", key);
                Ok(None)
            }
        }
    }

    /// Run `SELECT 1` to prove the session pool can reach the database
    async fn ping(&self) -> Result<()> {
        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(Statement::new("SELECT 1"))
            .await
            .context("Failed to execute health check query")?;

        match result_set.next().await? {
            Some(_) => Ok(()),
            None => Err(anyhow!("Health check query returned no results")),
        }
    }
}

#[async_trait]
impl KvStore for SpannerStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read(key).await?)
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        Ok(self.upsert(key, value).await?)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(self.ping().await?)
    }
}

/// Fully qualified resource names derived from the configuration
struct SpannerPaths {
    project: String,
    instance: String,
    database: String,
}

impl SpannerPaths {
    fn new(config: &SpannerConfig) -> Self {
        let project = format!("projects/{}", config.project);
        let instance = format!("{}/instances/{}", project, config.instance);
        let database = format!("{}/databases/{}", instance, config.database);
        Self {
            project,
            instance,
            database,
        }
    }
}

fn table_ddl() -> String {
    format!(
        "CREATE TABLE {} (\n    \
         id STRING(64) NOT NULL,\n    \
         data JSON NOT NULL,\n    \
         updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),\n\
         ) PRIMARY KEY (id)",
        TABLE
    )
}

/// Whether a DDL statement returned by Spanner creates the record table
fn declares_table(statement: &str) -> bool {
    let Some(rest) = statement.trim_start().strip_prefix("CREATE TABLE") else {
        return false;
    };
    let name = rest
        .trim_start()
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    name.trim_matches('`') == TABLE
}

/// Instance config to create a missing instance with, emulator only
fn emulator_instance_config(config: &SpannerConfig, paths: &SpannerPaths) -> Result<String> {
    if config.emulator_host.is_none() {
        return Err(anyhow!("instance not found")).with_context(|| {
            format!(
                "Spanner instance {} does not exist; create it before starting the service",
                paths.instance
            )
        });
    }
    Ok(format!("{}/instanceConfigs/emulator-config", paths.project))
}

async fn provision(config: &SpannerConfig, paths: &SpannerPaths) -> Result<()> {
    let admin = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    ensure_instance(&admin, config, paths).await?;
    if create_database_if_missing(&admin, paths).await? {
        // Created together with the table
        return Ok(());
    }
    ensure_table(&admin, paths).await
}

async fn ensure_instance(admin: &AdminClient, config: &SpannerConfig, paths: &SpannerPaths) -> Result<()> {
    let request = GetInstanceRequest {
        name: paths.instance.clone(),
        field_mask: None,
    };

    match admin.instance().get_instance(request, None).await {
        Ok(_) => Ok(()),
        Err(status) if status.code() == Code::NotFound => {
            let instance_config = emulator_instance_config(config, paths)?;
            tracing::info!("Creating emulator instance: {}", paths.instance);

            let request = CreateInstanceRequest {
                parent: paths.project.clone(),
                instance_id: config.instance.clone(),
                instance: Some(Instance {
                    name: paths.instance.clone(),
                    config: instance_config,
                    display_name: config.instance.clone(),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            admin
                .instance()
                .create_instance(request, None)
                .await
                .context("Failed to start instance creation")?
                .wait(None)
                .await
                .context("Failed to create instance")?;
            Ok(())
        }
        Err(status) => Err(status).with_context(|| format!("Failed to look up instance {}", paths.instance)),
    }
}

/// Create the database with the record table in one step; `true` if it was missing
async fn create_database_if_missing(admin: &AdminClient, paths: &SpannerPaths) -> Result<bool> {
    let request = GetDatabaseRequest {
        name: paths.database.clone(),
    };

    match admin.database().get_database(request, None).await {
        Ok(_) => Ok(false),
        Err(status) if status.code() == Code::NotFound => {
            let database_id = paths
                .database
                .rsplit('/')
                .next()
                .context("Invalid database path")?;
            tracing::info!("Creating database {} with table {}", paths.database, TABLE);

            let request = CreateDatabaseRequest {
                parent: paths.instance.clone(),
                create_statement: format!("CREATE DATABASE `{}`", database_id),
                extra_statements: vec![table_ddl()],
                ..Default::default()
            };

            admin
                .database()
                .create_database(request, None)
                .await
                .context("Failed to start database creation")?
                .wait(None)
                .await
                .context("Failed to create database")?;
            Ok(true)
        }
        Err(status) => Err(status).with_context(|| format!("Failed to look up database {}", paths.database)),
    }
}

async fn ensure_table(admin: &AdminClient, paths: &SpannerPaths) -> Result<()> {
    let request = GetDatabaseDdlRequest {
        database: paths.database.clone(),
    };

    let statements = admin
        .database()
        .get_database_ddl(request, None)
        .await
        .context("Failed to get database DDL")?
        .into_inner()
        .statements;

    if statements.iter().any(|stmt| declares_table(stmt)) {
        tracing::debug!("Table {} present", TABLE);
        return Ok(());
    }

    tracing::info!("Creating table {} in {}", TABLE, paths.database);
    let request = UpdateDatabaseDdlRequest {
        database: paths.database.clone(),
        statements: vec![table_ddl()],
        ..Default::default()
    };

    admin
        .database()
        .update_database_ddl(request, None)
        .await
        .with_context(|| format!("Failed to start creating table {}", TABLE))?
        .wait(None)
        .await
        .with_context(|| format!("Failed to create table {}", TABLE))?;
    Ok(())
}
