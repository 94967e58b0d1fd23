//! CLI entry point for the ontograph ontology repository.
//!
//! Every command prints its result to stdout as JSON; logs go to stderr.

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use ontograph_core::config::{OntographConfig, StoreBackend};
use ontograph_core::{PropertyMap, PropertyValue};
use ontograph_graph::{GraphClient, GraphConfig, MemoryStore};
use ontograph_ontology::demo::seed_animal_taxonomy;
use ontograph_ontology::{ObjectUpdate, OntologyRepository, StoreHandle};

#[derive(Parser)]
#[command(name = "ontograph")]
#[command(about = "Manage a class/property/instance ontology stored in a property graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Override the configured store backend.
    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,

    /// Config file prefix (default: ontograph).
    #[arg(short, long, default_value = "ontograph", global = true)]
    config: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Neo4j,
    Memory,
}

#[derive(Subcommand)]
enum Command {
    /// Export every class signature and every object.
    Ontology,
    /// List root classes (classes without a parent class).
    Roots,
    /// Create a class.
    CreateClass {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Parent class uri.
        #[arg(long)]
        parent: Option<String>,
    },
    /// Show a class.
    GetClass { uri: String },
    /// List the parents of a class.
    ClassParents { uri: String },
    /// List everything linked into a class: subclasses, instances, attributes.
    ClassChildren { uri: String },
    /// List the instances of a class.
    ClassObjects { uri: String },
    /// Overwrite a class's title and description.
    UpdateClass {
        uri: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a class and its whole subtree.
    DeleteClass { uri: String },
    /// Add a parent to a class.
    AddParent {
        uri: String,
        #[arg(long)]
        parent: String,
    },
    /// Declare a datatype property on a class.
    AddAttribute {
        class_uri: String,
        #[arg(long)]
        title: String,
    },
    /// Declare an object property on a class.
    AddObjectAttribute {
        class_uri: String,
        #[arg(long)]
        title: String,
        /// Uri of the class allowed as target.
        #[arg(long)]
        range: String,
    },
    /// Delete a datatype property.
    DeleteAttribute { uri: String },
    /// Delete an object property.
    DeleteObjectAttribute { uri: String },
    /// Show the inherited signature of a class.
    Signature { uri: String },
    /// Create an instance of a class.
    CreateObject {
        class_uri: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Datatype value as key=value (repeatable).
        #[arg(long = "prop")]
        props: Vec<String>,
        /// Object-property value as label=uri (repeatable).
        #[arg(long = "link")]
        links: Vec<String>,
    },
    /// Show an object.
    GetObject { uri: String },
    /// Partially update an object; links are added, never replaced.
    UpdateObject {
        uri: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "prop")]
        props: Vec<String>,
        #[arg(long = "link")]
        links: Vec<String>,
    },
    /// Delete an object.
    DeleteObject { uri: String },
    /// Link an object to a target with a labeled edge.
    Connect {
        object_uri: String,
        #[arg(long)]
        label: String,
        #[arg(long)]
        target: String,
    },
    /// Remove a single relationship by id.
    Disconnect { arc_id: i64 },
    /// Seed a sample animal taxonomy and print the resulting ontology.
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = OntographConfig::load(&cli.config)?;
    if let Some(backend) = cli.backend {
        config.store.backend = match backend {
            Backend::Neo4j => StoreBackend::Neo4j,
            Backend::Memory => StoreBackend::Memory,
        };
    }

    let repo = OntologyRepository::new(open_store(&config).await?);

    match cli.command {
        Command::Ontology => emit(&repo.get_ontology().await?),
        Command::Roots => emit(&repo.get_ontology_parent_classes().await?),
        Command::CreateClass {
            title,
            description,
            parent,
        } => emit(
            &repo
                .create_class(&title, &description, parent.as_deref())
                .await?,
        ),
        Command::GetClass { uri } => emit(&repo.get_class(&uri).await?),
        Command::ClassParents { uri } => emit(&repo.get_class_parents(&uri).await?),
        Command::ClassChildren { uri } => emit(&repo.get_class_children(&uri).await?),
        Command::ClassObjects { uri } => emit(&repo.get_class_objects(&uri).await?),
        Command::UpdateClass {
            uri,
            title,
            description,
        } => emit(&repo.update_class(&uri, &title, &description).await?),
        Command::DeleteClass { uri } => emit(&repo.delete_class(&uri).await?),
        Command::AddParent { uri, parent } => emit(&repo.add_class_parent(&parent, &uri).await?),
        Command::AddAttribute { class_uri, title } => {
            emit(&repo.add_class_attribute(&class_uri, &title).await?)
        }
        Command::AddObjectAttribute {
            class_uri,
            title,
            range,
        } => emit(
            &repo
                .add_class_object_attribute(&class_uri, &title, &range)
                .await?,
        ),
        Command::DeleteAttribute { uri } => emit(&repo.delete_class_attribute(&uri).await?),
        Command::DeleteObjectAttribute { uri } => {
            emit(&repo.delete_class_object_attribute(&uri).await?)
        }
        Command::Signature { uri } => emit(&repo.collect_signature(&uri).await?),
        Command::CreateObject {
            class_uri,
            title,
            description,
            props,
            links,
        } => {
            let properties = parse_props(&props)?;
            let links = parse_links(&links)?;
            emit(
                &repo
                    .create_object(&class_uri, &title, &description, properties, &links)
                    .await?,
            )
        }
        Command::GetObject { uri } => emit(&repo.get_object(&uri).await?),
        Command::UpdateObject {
            uri,
            title,
            description,
            props,
            links,
        } => {
            let update = ObjectUpdate {
                title,
                description,
                properties: parse_props(&props)?,
                new_connections: parse_links(&links)?,
            };
            emit(&repo.update_object(&uri, update).await?)
        }
        Command::DeleteObject { uri } => emit(&repo.delete_object(&uri).await?),
        Command::Connect {
            object_uri,
            label,
            target,
        } => emit(&repo.connect(&object_uri, &label, &target).await?),
        Command::Disconnect { arc_id } => emit(&repo.disconnect(arc_id).await?),
        Command::Demo => {
            let seeded = seed_animal_taxonomy(&repo).await?;
            emit(&serde_json::json!({
                "seeded": seeded,
                "ontology": repo.get_ontology().await?,
            }))
        }
    }
}

async fn open_store(config: &OntographConfig) -> anyhow::Result<StoreHandle> {
    match config.store.backend {
        StoreBackend::Neo4j => {
            let client = GraphClient::connect(&GraphConfig::from(&config.neo4j)).await?;
            client.ensure_uri_constraints().await?;
            Ok(Arc::new(client))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; nothing will be persisted");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_props(raw: &[String]) -> anyhow::Result<PropertyMap> {
    let mut properties = PropertyMap::new();
    for assignment in raw {
        let (key, value) = PropertyValue::parse_assignment(assignment)?;
        properties.insert(key, value);
    }
    Ok(properties)
}

fn parse_links(raw: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    raw.iter()
        .map(|link| match link.split_once('=') {
            Some((label, uri)) if !label.is_empty() && !uri.is_empty() => {
                Ok((label.to_string(), uri.to_string()))
            }
            _ => anyhow::bail!("Invalid link '{link}': expected label=uri"),
        })
        .collect()
}
