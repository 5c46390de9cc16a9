//! `graft` - build, check and submit relation-mutation documents.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use graft_cli::watch::{SchemaWatcher, EMPTY_SCHEMA};
use graft_cli::{demo, render, section};
use graft_client::{Client, ClientConfig, HttpTransport};
use graft_mutation::{Action, Normalizer};
use graft_registry::Registry;
use serde_json::Value as Json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Relation-mutation documents for a document-style data API")]
struct Args {
    /// Config file (defaults to ./graft.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log requests and retries
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Base URL of the data API, overrides config and GRAFT_BASE_URL
    #[arg(long, global = true)]
    host: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical form of a document
    Normalize {
        file: PathBuf,
        /// create, get, update, or a predefined query name
        #[arg(long)]
        action: Option<String>,
        /// Check names and types against a schema document
        #[arg(long, requires = "entity")]
        schema: Option<PathBuf>,
        /// Entity type of the document's root
        #[arg(long, requires = "schema")]
        entity: Option<String>,
    },
    /// Check a schema document, locally or with the server
    Validate {
        schema: PathBuf,
        /// Upload to the server's validate endpoint instead of checking locally
        #[arg(long)]
        remote: bool,
    },
    /// Upload a schema and create its endpoint
    Apply { namespace: String, schema: PathBuf },
    /// Apply a schema, then apply it again on every write to the file
    Watch { namespace: String, schema: PathBuf },
    Create { entity: String, file: PathBuf },
    Get { entity: String, file: PathBuf },
    Update { entity: String, file: PathBuf },
    /// Call a predefined query
    Query { name: String, file: PathBuf },
    /// Replay the demonstration sequence against the configured endpoint
    Demo {
        /// Schema to push instead of the built-in one
        #[arg(long)]
        schema: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_target(false)
        .init();

    match args.command {
        Command::Normalize {
            ref file,
            ref action,
            ref schema,
            ref entity,
        } => normalize(file, action.as_deref(), schema.as_deref(), entity.as_deref()),
        Command::Validate { ref schema, remote } => {
            let source = read(schema)?;
            if remote {
                let client = connect(&load_config(&args)?)?;
                client
                    .validate_schema(&source)
                    .await
                    .with_context(|| format!("server rejected {}", schema.display()))?;
            } else {
                Registry::from_schema_str(&source)
                    .with_context(|| format!("invalid schema {}", schema.display()))?;
            }
            println!("No errors found!");
            Ok(())
        }
        Command::Apply {
            ref namespace,
            ref schema,
        } => {
            let client = connect(&namespaced(&args, namespace)?)?;
            apply_schema(&client, schema).await.map(|_| ())
        }
        Command::Watch {
            ref namespace,
            ref schema,
        } => watch(&args, namespace, schema).await,
        Command::Create {
            ref entity,
            ref file,
        } => submit(&args, entity, Action::Create, file).await,
        Command::Get {
            ref entity,
            ref file,
        } => submit(&args, entity, Action::Get, file).await,
        Command::Update {
            ref entity,
            ref file,
        } => submit(&args, entity, Action::Update, file).await,
        Command::Query { ref name, ref file } => {
            submit(&args, name, Action::Query(name.clone()), file).await
        }
        Command::Demo { ref schema } => {
            let schema = match schema {
                Some(path) => read(path)?,
                None => demo::SCHEMA.to_string(),
            };
            run_demo(&args, &schema).await
        }
    }
}

fn normalize(
    file: &Path,
    action: Option<&str>,
    schema: Option<&Path>,
    entity: Option<&str>,
) -> Result<()> {
    let doc = read_json(file)?;
    let registry = match schema {
        Some(path) => Some(Registry::from_schema_str(&read(path)?)?),
        None => None,
    };
    let normalizer = match (&registry, entity) {
        (Some(registry), Some(entity)) => Normalizer::with_schema(registry, entity)?,
        _ => Normalizer::new(),
    };
    let normalized = match action {
        Some(action) => normalizer.normalize_for(&Action::parse(action), &doc)?,
        None => normalizer.normalize(&doc)?,
    };
    println!("{}", render(&normalized));
    Ok(())
}

/// Upload a schema file and report the endpoint.
async fn apply_schema(client: &Client<HttpTransport>, path: &Path) -> Result<String> {
    let schema = read(path)?;
    match client.push_schema(&schema).await {
        Ok(endpoint) => {
            info!("Endpoint created at {}", endpoint);
            Ok(endpoint)
        }
        Err(e) => {
            error!("Failed to apply schema!");
            Err(e.into())
        }
    }
}

async fn watch(args: &Args, namespace: &str, path: &Path) -> Result<()> {
    let client = connect(&namespaced(args, namespace)?)?;
    if path.exists() {
        if let Err(e) = apply_schema(&client, path).await {
            error!("{:#}", e);
        }
    } else {
        std::fs::write(path, EMPTY_SCHEMA)
            .with_context(|| format!("failed to create {}", path.display()))?;
    }

    let watcher = SchemaWatcher::new(path)
        .with_context(|| format!("failed to watch {}", path.display()))?;
    info!("Watching {}", path.display());
    let client = &client;
    watcher
        .run(move || async move {
            if let Err(e) = apply_schema(client, path).await {
                error!("{:#}", e);
            }
        })
        .await;
    Ok(())
}

async fn submit(args: &Args, target: &str, action: Action, file: &Path) -> Result<()> {
    let client = connect(&load_config(args)?)?;
    let doc = read_json(file)?;
    let body = match &action {
        Action::Create => client.create(target, &doc).await?,
        Action::Get => client.get(target, &doc).await?,
        Action::Update => client.update(target, &doc).await?,
        Action::Query(name) => client.query(name, &doc).await?,
    };
    println!("{}", render(&body));
    Ok(())
}

async fn run_demo(args: &Args, schema: &str) -> Result<()> {
    let client = connect(&load_config(args)?)?;
    let steps = demo::steps().context("built-in demo payloads")?;

    let endpoint = client.push_schema(schema).await?;
    info!("Endpoint created at {}", endpoint);

    for step in &steps {
        if let Some(label) = step.section {
            println!("{}", section(label));
        }
        let body = step
            .send(&client)
            .await
            .with_context(|| format!("{} {}", step.action, demo::ENTITY))?;
        println!("{}", render(&body));
    }
    Ok(())
}

/// File, then environment, then command line.
fn load_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::load_from(path)?.with_env(|key| std::env::var(key).ok())?,
        None => ClientConfig::load()?,
    };
    if let Some(host) = &args.host {
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            bail!("--host must start with http:// or https://");
        }
        config.base_url = host.clone();
    }
    Ok(config)
}

fn namespaced(args: &Args, namespace: &str) -> Result<ClientConfig> {
    let mut config = load_config(args)?;
    config.namespace = namespace.to_string();
    Ok(config)
}

fn connect(config: &ClientConfig) -> Result<Client<HttpTransport>> {
    let transport = HttpTransport::new(config.timeout())?;
    Ok(Client::new(transport, config))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_json(path: &Path) -> Result<Json> {
    let text = read(path)?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}
