//! # Property-Based Tests
//!
//! Verification tests using proptest.
//!
//! These tests ensure identity, uniqueness, and round-trip invariants
//! hold under arbitrary creation sequences.

use edifice_core::{Id, InteractionStyle, Model, model_from_bytes, model_to_bytes};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// A short human-ish name. Collisions are likely on purpose.
fn name_strategy() -> impl Strategy<Value = String> {
    "[A-E][a-z]{0,3}"
}

/// Build a model from arbitrary name sequences: people, systems, one
/// container per system, and relationships between people and systems.
fn arbitrary_model(
    people: &[String],
    systems: &[String],
    links: &[(usize, usize)],
) -> Model {
    let mut model = Model::new();
    let mut person_ids = Vec::new();
    for name in people {
        if let Some(id) = model.add_person(name, "") {
            person_ids.push(id);
        }
    }
    let mut system_ids = Vec::new();
    for name in systems {
        if let Some(id) = model.add_software_system(name, "") {
            model
                .add_container(&id, "Main", "", "Rust")
                .expect("fresh system has no containers");
            system_ids.push(id);
        }
    }
    for &(p, s) in links {
        if person_ids.is_empty() || system_ids.is_empty() {
            continue;
        }
        let source = &person_ids[p % person_ids.len()];
        let destination = &system_ids[s % system_ids.len()];
        model
            .add_relationship(source, destination, "uses", "", InteractionStyle::Synchronous)
            .expect("endpoints exist");
    }
    model
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// No two people and no two software systems ever share a name,
    /// regardless of the creation sequence.
    #[test]
    fn names_stay_unique_per_scope(
        people in vec(name_strategy(), 0..20),
        systems in vec(name_strategy(), 0..20)
    ) {
        let model = arbitrary_model(&people, &systems, &[]);

        let person_names: Vec<&str> = model.people().map(|e| e.name.as_str()).collect();
        let unique: BTreeSet<&str> = person_names.iter().copied().collect();
        prop_assert_eq!(person_names.len(), unique.len());

        let system_names: Vec<&str> = model.software_systems().map(|e| e.name.as_str()).collect();
        let unique: BTreeSet<&str> = system_names.iter().copied().collect();
        prop_assert_eq!(system_names.len(), unique.len());
    }

    /// A colliding creation yields no new element and leaves the
    /// existing one unchanged.
    #[test]
    fn collision_leaves_existing_untouched(name in name_strategy()) {
        let mut model = Model::new();
        let first = model.add_person(&name, "original").expect("create");
        prop_assert_eq!(model.add_person(&name, "imposter"), None);

        let existing = model.element(&first).expect("lookup");
        prop_assert_eq!(existing.description.as_str(), "original");
        prop_assert_eq!(model.element_count(), 1);
    }

    /// Generated ids are unique across elements and relationships.
    #[test]
    fn ids_unique_across_the_model(
        people in vec(name_strategy(), 0..15),
        systems in vec(name_strategy(), 0..15),
        links in vec((0usize..15, 0usize..15), 0..30)
    ) {
        let model = arbitrary_model(&people, &systems, &links);

        let all_ids: Vec<&Id> = model
            .elements()
            .map(|e| &e.id)
            .chain(model.relationships().map(|r| &r.id))
            .collect();
        let unique: BTreeSet<&Id> = all_ids.iter().copied().collect();
        prop_assert_eq!(all_ids.len(), unique.len());
    }

    /// The persisted form round-trips through bytes: same elements, same
    /// relationships, same bytes on re-serialization.
    #[test]
    fn persisted_roundtrip_is_lossless(
        people in vec(name_strategy(), 0..10),
        systems in vec(name_strategy(), 0..10),
        links in vec((0usize..10, 0usize..10), 0..20)
    ) {
        let model = arbitrary_model(&people, &systems, &links);

        let bytes = model_to_bytes(&model).expect("serialize");
        let restored = model_from_bytes(&bytes).expect("deserialize");

        prop_assert_eq!(restored.element_count(), model.element_count());
        prop_assert_eq!(restored.relationship_count(), model.relationship_count());
        prop_assert_eq!(model_to_bytes(&restored).expect("re-serialize"), bytes);
    }

    /// Ids minted after hydration never collide with hydrated ids.
    #[test]
    fn fresh_ids_exceed_hydrated_ids(
        people in vec(name_strategy(), 1..10),
        systems in vec(name_strategy(), 1..10)
    ) {
        let model = arbitrary_model(&people, &systems, &[(0, 0)]);
        let highest = model
            .elements()
            .map(|e| e.id.numeric().unwrap_or(0))
            .chain(model.relationships().map(|r| r.id.numeric().unwrap_or(0)))
            .max()
            .unwrap_or(0);

        let bytes = model_to_bytes(&model).expect("serialize");
        let mut restored = model_from_bytes(&bytes).expect("deserialize");
        let fresh = restored.add_person("ZZZ-fresh", "").expect("create");
        prop_assert!(fresh.numeric().expect("decimal id") > highest);
    }

    /// Derivation run twice creates nothing on the second pass.
    #[test]
    fn derivation_is_idempotent(
        people in vec(name_strategy(), 0..8),
        systems in vec(name_strategy(), 1..8),
        links in vec((0usize..8, 0usize..8), 0..15)
    ) {
        let mut model = arbitrary_model(&people, &systems, &links);
        model.derive_implicit_relationships().expect("first pass");
        let count_after_first = model.relationship_count();

        let second = model.derive_implicit_relationships().expect("second pass");
        prop_assert!(second.is_empty());
        prop_assert_eq!(model.relationship_count(), count_after_first);
    }
}
