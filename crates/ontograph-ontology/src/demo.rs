//! Sample animal taxonomy, seeded by the `demo` command.

use serde::Serialize;

use ontograph_core::{PropertyMap, PropertyValue};

use crate::error::Result;
use crate::repository::OntologyRepository;

/// Uris of the seeded entities.
#[derive(Debug, Clone, Serialize)]
pub struct DemoTaxonomy {
    pub animal: String,
    pub mammal: String,
    pub bird: String,
    pub dog: String,
    pub cat: String,
    pub eagle: String,
    pub rex: String,
    pub murka: String,
}

/// Build a three-level hierarchy with attributes at every level and two
/// instances linked to each other.
pub async fn seed_animal_taxonomy(repo: &OntologyRepository) -> Result<DemoTaxonomy> {
    let animal = repo
        .create_class("Animal", "Base class for all animals", None)
        .await?;
    let mammal = repo
        .create_class("Mammal", "Warm-blooded vertebrates", Some(animal.as_str()))
        .await?;
    let bird = repo
        .create_class("Bird", "Feathered vertebrates", Some(animal.as_str()))
        .await?;
    let dog = repo.create_class("Dog", "Domestic dog", Some(mammal.as_str())).await?;
    let cat = repo.create_class("Cat", "Domestic cat", Some(mammal.as_str())).await?;
    let eagle = repo.create_class("Eagle", "Bird of prey", Some(bird.as_str())).await?;

    for title in ["legs", "habitat", "lifespan"] {
        repo.add_class_attribute(&animal, title).await?;
    }
    repo.add_class_attribute(&mammal, "diet").await?;
    repo.add_class_attribute(&bird, "wingspan").await?;
    repo.add_class_attribute(&dog, "size").await?;
    repo.add_class_attribute(&cat, "fur").await?;

    repo.add_class_object_attribute(&animal, "hasParent", &animal)
        .await?;
    repo.add_class_object_attribute(&dog, "trainedBy", &animal)
        .await?;

    let murka = repo
        .create_object(
            &cat,
            "Murka",
            "A tabby cat",
            properties(&[("legs", PropertyValue::Integer(4)), ("fur", "tabby".into())]),
            &[],
        )
        .await?;
    let rex = repo
        .create_object(
            &dog,
            "Rex",
            "A german shepherd",
            properties(&[("legs", PropertyValue::Integer(4)), ("size", "large".into())]),
            &[("trainedBy".to_string(), murka.clone())],
        )
        .await?;

    tracing::info!(root = %animal, "Demo taxonomy seeded");
    Ok(DemoTaxonomy {
        animal,
        mammal,
        bird,
        dog,
        cat,
        eagle,
        rex,
        murka,
    })
}

fn properties(pairs: &[(&str, PropertyValue)]) -> PropertyMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
