//! Phase dependency resolution
//!
//! Derives the dependency DAG over phase numbers and checks it.
//! Every rule only ever points at a lower-numbered phase, so cycles cannot
//! arise from [`resolve_dependencies`]; [`find_cycles`] still verifies it.

use ppe_core::{Domain, DynamicPhase, PlanningError};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Resolve dependencies in place
///
/// Rules, per phase in ascending number:
/// 1. phase 1 has no dependencies;
/// 2. every other phase depends on phase 1;
/// 3. a feature's dependency name selects an earlier phase with that name or
///    domain;
/// 4. phases outside setup/database depend on an earlier database phase;
/// 5. admin, ui-role and analytics phases depend on an earlier auth phase.
///
/// Dependencies already declared by the builder are kept. The result is
/// deduplicated and sorted, and `dependency_names` is filled to match.
pub fn resolve_dependencies(phases: &mut [DynamicPhase]) {
    phases.sort_by_key(|p| p.phase_number);

    let index: Vec<(u32, String, Domain)> = phases
        .iter()
        .map(|p| (p.phase_number, p.name.clone(), p.domain))
        .collect();
    let first_of = |domain: Domain| {
        index
            .iter()
            .find(|(_, _, d)| *d == domain)
            .map(|(n, _, _)| *n)
    };
    let database = first_of(Domain::Database);
    let auth = first_of(Domain::Auth);

    for phase in phases.iter_mut() {
        let number = phase.phase_number;
        if number == 1 {
            phase.dependencies.clear();
            phase.dependency_names.clear();
            continue;
        }

        let mut deps: BTreeSet<u32> = phase.dependencies.iter().copied().collect();
        deps.insert(1);

        for dep_name in phase.feature_details.iter().flat_map(|f| &f.dependency_names) {
            deps.extend(
                index
                    .iter()
                    .filter(|(n, name, domain)| {
                        *n < number && (name == dep_name || domain.as_str() == dep_name)
                    })
                    .map(|(n, _, _)| *n),
            );
        }

        if !matches!(phase.domain, Domain::Setup | Domain::Database) {
            if let Some(db) = database.filter(|db| *db < number) {
                deps.insert(db);
            }
        }

        if phase.domain.requires_auth_phase() {
            if let Some(auth) = auth.filter(|a| *a < number) {
                deps.insert(auth);
            }
        }

        phase.dependency_names = deps
            .iter()
            .filter_map(|d| index.iter().find(|(n, _, _)| n == d).map(|(_, name, _)| name.clone()))
            .collect();
        phase.dependencies = deps.into_iter().collect();

        tracing::debug!(phase = number, deps = ?phase.dependencies, "resolved dependencies");
    }
}

/// Find phases involved in dependency cycles
///
/// Depth-first search with a recursion stack; each back-edge reports the
/// phase it points into. Returns phase numbers in discovery order.
#[must_use]
pub fn find_cycles(phases: &[DynamicPhase]) -> Vec<u32> {
    fn dfs(
        node: u32,
        adjacency: &BTreeMap<u32, Vec<u32>>,
        visiting: &mut HashSet<u32>,
        visited: &mut HashSet<u32>,
        cycles: &mut Vec<u32>,
    ) {
        if visited.contains(&node) {
            return;
        }
        visiting.insert(node);

        if let Some(neighbors) = adjacency.get(&node) {
            for &neighbor in neighbors {
                if visiting.contains(&neighbor) {
                    if !cycles.contains(&neighbor) {
                        cycles.push(neighbor);
                    }
                } else {
                    dfs(neighbor, adjacency, visiting, visited, cycles);
                }
            }
        }

        visiting.remove(&node);
        visited.insert(node);
    }

    let adjacency: BTreeMap<u32, Vec<u32>> = phases
        .iter()
        .map(|p| (p.phase_number, p.dependencies.clone()))
        .collect();

    let mut visiting = HashSet::new();
    let mut visited = HashSet::new();
    let mut cycles = Vec::new();

    for &node in adjacency.keys() {
        dfs(node, &adjacency, &mut visiting, &mut visited, &mut cycles);
    }

    cycles
}

/// Fail on the first cycle found
///
/// # Errors
/// Returns [`PlanningError::CycleDetected`] naming the phase
pub fn check_acyclic(phases: &[DynamicPhase]) -> Result<(), PlanningError> {
    match find_cycles(phases).first() {
        Some(&phase) => Err(PlanningError::CycleDetected { phase }),
        None => Ok(()),
    }
}

/// Order in which phases can run, dependencies first
///
/// # Errors
/// Returns [`PlanningError::CycleDetected`] if the graph is cyclic
pub fn execution_order(phases: &[DynamicPhase]) -> Result<Vec<u32>, PlanningError> {
    let mut graph: DiGraphMap<u32, ()> = DiGraphMap::new();
    for phase in phases {
        graph.add_node(phase.phase_number);
    }
    for phase in phases {
        for &dep in &phase.dependencies {
            graph.add_edge(dep, phase.phase_number, ());
        }
    }

    toposort(&graph, None).map_err(|cycle| PlanningError::CycleDetected {
        phase: cycle.node_id(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppe_core::{Complexity, FeatureClassification, Priority};
    use pretty_assertions::assert_eq;

    fn phase(number: u32, name: &str, domain: Domain) -> DynamicPhase {
        DynamicPhase::new(number, name, "", domain)
    }

    fn needing(names: &[&str]) -> FeatureClassification {
        FeatureClassification {
            name: "Gallery".into(),
            description: String::new(),
            priority: Priority::Medium,
            domain: Domain::Feature,
            complexity: Complexity::Simple,
            token_estimate: 1000,
            requires_own_phase: false,
            suggested_phase_name: "Gallery".into(),
            dependency_names: names.iter().map(|s| (*s).to_string()).collect(),
            keywords: Vec::new(),
        }
    }

    fn sample() -> Vec<DynamicPhase> {
        vec![
            phase(1, "Project Setup", Domain::Setup),
            phase(2, "Database Schema", Domain::Database),
            phase(3, "Authentication System", Domain::Auth),
            phase(4, "File Storage", Domain::Storage),
            phase(5, "Core Features", Domain::Feature).with_features(vec![needing(&[
                "Authentication System",
                "File Storage",
                "Search System",
            ])]),
            phase(6, "Admin Panel", Domain::Admin),
            phase(7, "Polish & Documentation", Domain::Polish).depends_on(6),
        ]
    }

    #[test]
    fn resolves_rules() {
        let mut phases = sample();
        resolve_dependencies(&mut phases);

        assert!(phases[0].dependencies.is_empty());
        assert_eq!(phases[1].dependencies, vec![1]);
        assert_eq!(phases[2].dependencies, vec![1, 2]);
        // unknown "Search System" is ignored
        assert_eq!(phases[4].dependencies, vec![1, 2, 3, 4]);
        assert_eq!(phases[5].dependencies, vec![1, 2, 3]);
        assert_eq!(phases[6].dependencies, vec![1, 2, 6]);
        assert_eq!(
            phases[5].dependency_names,
            vec!["Project Setup", "Database Schema", "Authentication System"]
        );
    }

    #[test]
    fn dependencies_are_strictly_lower() {
        let mut phases = sample();
        resolve_dependencies(&mut phases);
        for p in &phases {
            assert!(p.dependencies.iter().all(|d| *d < p.phase_number));
        }
    }

    #[test]
    fn later_phases_are_not_depended_on() {
        // auth phase after admin must not be picked up
        let mut phases = vec![
            phase(1, "Project Setup", Domain::Setup),
            phase(2, "Admin Panel", Domain::Admin),
            phase(3, "Authentication System", Domain::Auth),
        ];
        resolve_dependencies(&mut phases);
        assert_eq!(phases[1].dependencies, vec![1]);
    }

    #[test]
    fn matches_dependency_by_domain_name() {
        let mut phases = vec![
            phase(1, "Project Setup", Domain::Setup),
            phase(2, "Uploads", Domain::Storage),
            phase(3, "Core Features", Domain::Feature).with_features(vec![needing(&["storage"])]),
        ];
        resolve_dependencies(&mut phases);
        assert_eq!(phases[2].dependencies, vec![1, 2]);
    }

    #[test]
    fn resolved_plan_is_acyclic() {
        let mut phases = sample();
        resolve_dependencies(&mut phases);
        assert!(find_cycles(&phases).is_empty());
        assert!(check_acyclic(&phases).is_ok());

        let order = execution_order(&phases).unwrap();
        assert_eq!(order.len(), 7);
        let position = |n: u32| order.iter().position(|o| *o == n).unwrap();
        for p in &phases {
            for dep in &p.dependencies {
                assert!(position(*dep) < position(p.phase_number));
            }
        }
    }

    #[test]
    fn detects_injected_cycle() {
        let mut phases = vec![
            phase(1, "Project Setup", Domain::Setup),
            phase(2, "A", Domain::Feature).depends_on(3),
            phase(3, "B", Domain::Feature).depends_on(2),
        ];
        assert_eq!(find_cycles(&phases), vec![2]);
        assert!(matches!(
            check_acyclic(&phases),
            Err(PlanningError::CycleDetected { phase: 2 })
        ));
        assert!(execution_order(&phases).is_err());

        phases[2].dependencies.clear();
        assert!(find_cycles(&phases).is_empty());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let phases = vec![phase(1, "Project Setup", Domain::Setup).depends_on(1)];
        assert_eq!(find_cycles(&phases), vec![1]);
    }
}
