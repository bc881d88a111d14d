//! # Implicit Relationship Deriver
//!
//! Propagates low-level relationships up the containment hierarchy. If a
//! component in one system uses a component in another, the containers
//! and systems that own them are related too; this pass materializes
//! those higher-level edges so coarse views of the graph stay connected.
//!
//! The pass is idempotent: every derived edge is a direct relationship
//! afterwards, so a second invocation finds all candidate pairs already
//! connected and creates nothing.

use crate::{Id, Model, ModelError};
use std::collections::{BTreeMap, BTreeSet};

/// Description and technology contributions accumulated for one derived
/// (source, destination) pair. Multiple original relationships can map to
/// the same pair; only an unambiguous single candidate is carried over.
#[derive(Debug, Default)]
struct Candidates {
    descriptions: BTreeSet<String>,
    technologies: BTreeSet<String>,
}

impl Candidates {
    /// The single candidate if the set is unambiguous, otherwise empty.
    fn single(set: &BTreeSet<String>) -> &str {
        if set.len() == 1 {
            set.iter().next().map_or("", String::as_str)
        } else {
            ""
        }
    }
}

impl Model {
    /// Derive implicit relationships across ancestor chains.
    ///
    /// For every existing relationship (src, dst), every pair from
    /// `({src} ∪ ancestors(src)) × ({dst} ∪ ancestors(dst))` becomes a
    /// candidate, except self-pairs, pairs within two containment levels
    /// of each other, and pairs already directly connected. Candidates
    /// are accumulated first and created afterwards, so every skip check
    /// runs against the pre-derivation graph.
    ///
    /// Returns the ids of the relationships actually created.
    pub fn derive_implicit_relationships(&mut self) -> Result<Vec<Id>, ModelError> {
        let originals: Vec<(Id, Id, String, String)> = self
            .relationships()
            .map(|r| {
                (
                    r.source.clone(),
                    r.destination.clone(),
                    r.description.clone(),
                    r.technology.clone(),
                )
            })
            .collect();

        let mut candidates: BTreeMap<(Id, Id), Candidates> = BTreeMap::new();
        for (src, dst, description, technology) in &originals {
            let mut sources = vec![src.clone()];
            sources.extend(self.ancestors(src));
            let mut destinations = vec![dst.clone()];
            destinations.extend(self.ancestors(dst));

            for s in &sources {
                for d in &destinations {
                    if s == d
                        || self.within_two_levels(s, d)
                        || self.has_relationship_between(s, d)
                    {
                        continue;
                    }
                    let entry = candidates.entry((s.clone(), d.clone())).or_default();
                    entry.descriptions.insert(description.clone());
                    entry.technologies.insert(technology.clone());
                }
            }
        }

        let mut created = Vec::new();
        for ((s, d), c) in &candidates {
            let id = self.add_relationship(
                s,
                d,
                Candidates::single(&c.descriptions),
                Candidates::single(&c.technologies),
                crate::InteractionStyle::Synchronous,
            )?;
            if let Some(id) = id {
                created.push(id);
            }
        }
        Ok(created)
    }

    /// Whether one element is the parent or grandparent of the other.
    ///
    /// Propagation is suppressed only up to two containment levels; a
    /// great-grandparent is NOT excluded.
    fn within_two_levels(&self, a: &Id, b: &Id) -> bool {
        let near = |of: &Id, target: &Id| self.ancestors(of).iter().take(2).any(|p| p == target);
        near(a, b) || near(b, a)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InteractionStyle;

    /// Two systems, each with one container holding one component, plus
    /// one component-to-component relationship ("uses", "HTTP").
    struct TwoSystems {
        model: Model,
        s1: Id,
        c1: Id,
        comp1: Id,
        s2: Id,
        c2: Id,
        comp2: Id,
    }

    fn two_systems() -> TwoSystems {
        let mut model = Model::new();
        let s1 = model.add_software_system("S1", "").expect("create");
        let c1 = model.add_container(&s1, "C1", "", "").expect("create");
        let comp1 = model.add_component(&c1, "Comp1", "", "").expect("create");
        let s2 = model.add_software_system("S2", "").expect("create");
        let c2 = model.add_container(&s2, "C2", "", "").expect("create");
        let comp2 = model.add_component(&c2, "Comp2", "", "").expect("create");
        model
            .add_relationship(&comp1, &comp2, "uses", "HTTP", InteractionStyle::Synchronous)
            .expect("add")
            .expect("created");
        TwoSystems {
            model,
            s1,
            c1,
            comp1,
            s2,
            c2,
            comp2,
        }
    }

    #[test]
    fn derives_the_eight_edge_closure() {
        let mut f = two_systems();
        let created = f.model.derive_implicit_relationships().expect("derive");
        assert_eq!(created.len(), 8);

        let expected = [
            (&f.comp1, &f.c2),
            (&f.comp1, &f.s2),
            (&f.c1, &f.comp2),
            (&f.c1, &f.c2),
            (&f.c1, &f.s2),
            (&f.s1, &f.comp2),
            (&f.s1, &f.c2),
            (&f.s1, &f.s2),
        ];
        for (s, d) in expected {
            assert!(
                f.model.has_relationship_between(s, d),
                "missing derived edge {s} -> {d}"
            );
        }
        // 1 original + 8 derived, nothing else.
        assert_eq!(f.model.relationship_count(), 9);
    }

    #[test]
    fn derived_edges_carry_the_single_candidate() {
        let mut f = two_systems();
        f.model.derive_implicit_relationships().expect("derive");

        let edge = f
            .model
            .outgoing(&f.s1)
            .find(|r| r.destination == f.s2)
            .expect("derived edge");
        assert_eq!(edge.description, "uses");
        assert_eq!(edge.technology, "HTTP");
    }

    #[test]
    fn ambiguous_candidates_collapse_to_empty() {
        let mut f = two_systems();
        // A second component pair with a different description maps the
        // same (S1, S2) pair to two candidate descriptions.
        let comp1b = f
            .model
            .add_component(&f.c1, "Comp1b", "", "")
            .expect("create");
        let comp2b = f
            .model
            .add_component(&f.c2, "Comp2b", "", "")
            .expect("create");
        f.model
            .add_relationship(&comp1b, &comp2b, "notifies", "AMQP", InteractionStyle::Asynchronous)
            .expect("add")
            .expect("created");

        f.model.derive_implicit_relationships().expect("derive");
        let edge = f
            .model
            .outgoing(&f.s1)
            .find(|r| r.destination == f.s2)
            .expect("derived edge");
        assert_eq!(edge.description, "");
        assert_eq!(edge.technology, "");
    }

    #[test]
    fn derivation_is_idempotent() {
        let mut f = two_systems();
        let first = f.model.derive_implicit_relationships().expect("derive");
        assert_eq!(first.len(), 8);
        let second = f.model.derive_implicit_relationships().expect("derive");
        assert!(second.is_empty());
        assert_eq!(f.model.relationship_count(), 9);
    }

    #[test]
    fn nothing_derived_within_one_container() {
        let mut model = Model::new();
        let s1 = model.add_software_system("S1", "").expect("create");
        let c1 = model.add_container(&s1, "C1", "", "").expect("create");
        let a = model.add_component(&c1, "A", "", "").expect("create");
        let b = model.add_component(&c1, "B", "", "").expect("create");
        model
            .add_relationship(&a, &b, "calls", "", InteractionStyle::Synchronous)
            .expect("add")
            .expect("created");

        // Every candidate pair is a self-pair or within two containment
        // levels of an endpoint.
        let created = model.derive_implicit_relationships().expect("derive");
        assert!(created.is_empty());
        assert_eq!(model.relationship_count(), 1);
    }

    #[test]
    fn existing_direct_edges_are_not_rederived() {
        let mut f = two_systems();
        // The system-level edge already exists, with its own description.
        f.model
            .add_relationship(&f.s1, &f.s2, "depends on", "", InteractionStyle::Synchronous)
            .expect("add")
            .expect("created");

        let created = f.model.derive_implicit_relationships().expect("derive");
        assert_eq!(created.len(), 7);

        let edges: Vec<_> = f
            .model
            .outgoing(&f.s1)
            .filter(|r| r.destination == f.s2)
            .collect();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].description, "depends on");
    }
}
