//! End-to-end scenarios for the diff/patch/emit pipeline, covering the
//! concrete inputs-to-outputs cases this crate is built against.

use ag_graph::model::{Graph, Properties, Value, Vertex};
use ag_graph::mutation::Patch;
use pretty_assertions::assert_eq;

fn vertex(ident: &str, label: &str) -> Vertex {
    let mut props = Properties::new();
    props.set_ident(ident);
    Vertex::new(label, props).unwrap()
}

#[test]
fn add_single_vertex_emits_create_with_ident() {
    let g0 = Graph::new("g");
    let mut g1 = Graph::new("g");
    let mut props = Properties::new();
    props.set_ident("gomez");
    props.insert("name", Value::from("Gomez"));
    g1.add_vertex("Person", props).unwrap();

    let patch = Patch::diff(g0, g1).unwrap();
    assert_eq!(patch.mutations.len(), 1);
    assert!(patch.mutations[0].is_vertex() && patch.mutations[0].is_addition());

    let cypher = patch.to_cypher_statements().unwrap()[0].to_cypher();
    assert!(cypher.contains("CREATE (n:Person {"));
    assert!(cypher.contains("'gomez'"));
}

#[test]
fn remove_one_edge_emits_delete_matching_both_endpoints() {
    let mut g0 = Graph::new("g");
    g0.add_vertex_instance(vertex("a", "Person")).unwrap();
    g0.add_vertex_instance(vertex("b", "Person")).unwrap();
    let mut edge_props = Properties::new();
    edge_props.set_ident("e1");
    g0.add_edge("KNOWS", "a", "b", edge_props).unwrap();

    let mut g1 = g0.deepcopy();
    g1.remove_edge("e1");

    let patch = Patch::diff(g0, g1).unwrap();
    assert_eq!(patch.mutations.len(), 1);
    assert!(patch.mutations[0].is_edge() && patch.mutations[0].is_removal());

    let cypher = patch.to_cypher_statements().unwrap()[0].to_cypher();
    assert!(cypher.contains("MATCH ()-[e:KNOWS {"));
    assert!(cypher.contains("'a'"));
    assert!(cypher.contains("'b'"));
    assert!(cypher.ends_with("DELETE e"));
}

/// Builds the five-vertex, nine-edge Addams family graph used as the
/// baseline for the ten-mutation mixed-change scenario.
fn addams_family() -> Graph {
    let mut g = Graph::new("addams");
    for (ident, label) in [
        ("gomez", "Person"),
        ("morticia", "Person"),
        ("wednesday", "Person"),
        ("pugsley", "Person"),
        ("grandmama", "Person"),
    ] {
        g.add_vertex_instance(vertex(ident, label)).unwrap();
    }

    let edges = [
        ("e1", "MARRIED_TO", "gomez", "morticia"),
        ("e2", "PARENT_OF", "gomez", "wednesday"),
        ("e3", "PARENT_OF", "gomez", "pugsley"),
        ("e4", "PARENT_OF", "morticia", "wednesday"),
        ("e5", "PARENT_OF", "morticia", "pugsley"),
        ("e6", "PARENT_OF", "grandmama", "gomez"),
        ("e7", "SIBLING_OF", "wednesday", "pugsley"),
        ("e8", "KNOWS", "pugsley", "wednesday"),
        ("e9", "KNOWS", "wednesday", "gomez"),
    ];
    for (ident, label, start, end) in edges {
        let mut props = Properties::new();
        props.set_ident(ident);
        g.add_edge(label, start, end, props).unwrap();
    }
    g
}

#[test]
fn addams_family_mixed_change_emits_exactly_ten_mutations_in_phase_order() {
    let g0 = addams_family();
    let mut g1 = g0.deepcopy();

    g1.remove_vertex("grandmama");
    g1.remove_edge("e6");
    g1.remove_edge("e9");

    let mut robot_props = Properties::new();
    robot_props.set_ident("robot1");
    g1.add_vertex("Robot", robot_props).unwrap();
    let mut knows_since = Properties::new();
    knows_since.insert("since", Value::Int(2025));
    g1.add_edge("KNOWS", "robot1", "morticia", knows_since).unwrap();

    g1.get_vertex_by_ident("gomez"); // sanity: still present before mutation
    g1.vertices
        .get_by_ident_mut("gomez")
        .unwrap()
        .properties
        .insert("nickname", Value::from("G-Man"));

    g1.edges
        .get_by_ident_mut("e1")
        .unwrap()
        .properties
        .insert("strained", Value::Bool(true));

    let mut ghost_props = Properties::new();
    ghost_props.set_ident("ghost1");
    g1.add_vertex("Ghost", ghost_props).unwrap();
    g1.add_edge("HAUNTS", "ghost1", "gomez", Properties::new()).unwrap();

    g1.vertices
        .get_by_ident_mut("morticia")
        .unwrap()
        .properties
        .insert("age", Value::Int(99));

    let patch = Patch::diff(g0, g1).unwrap();
    assert_eq!(patch.mutations.len(), 10, "expected exactly ten mutations");

    // Phase order: edge removals, vertex removals, vertex additions,
    // vertex updates, edge additions, edge updates.
    let edge_removals = &patch.mutations[0..2];
    assert!(edge_removals.iter().all(|m| m.is_edge() && m.is_removal()));

    let vertex_removals = &patch.mutations[2..3];
    assert!(vertex_removals.iter().all(|m| m.is_vertex() && m.is_removal()));

    let vertex_additions = &patch.mutations[3..5];
    assert!(vertex_additions.iter().all(|m| m.is_vertex() && m.is_addition()));

    let vertex_updates = &patch.mutations[5..7];
    assert!(vertex_updates.iter().all(|m| m.is_vertex() && m.is_update()));

    let edge_additions = &patch.mutations[7..9];
    assert!(edge_additions.iter().all(|m| m.is_edge() && m.is_addition()));

    let edge_updates = &patch.mutations[9..10];
    assert!(edge_updates.iter().all(|m| m.is_edge() && m.is_update()));

    let statements = patch.to_cypher_statements().unwrap();
    let composite: String = statements
        .iter()
        .map(|s| s.to_cypher())
        .collect::<Vec<_>>()
        .join(" ;; ");

    for expected in [
        "DETACH DELETE",
        "DELETE e",
        "CREATE (n:Robot",
        ":KNOWS",
        "2025",
        "nickname",
        "strained: true",
        "CREATE (n:Ghost",
        ":HAUNTS",
        "age: 99",
    ] {
        assert!(composite.contains(expected), "missing {expected:?} in:\n{composite}");
    }
}

#[test]
fn agtype_round_trip_preserves_graph_content() {
    let mut g = Graph::new("roundtrip");
    g.add_vertex_instance(vertex("a", "Person")).unwrap();
    g.add_vertex_instance(vertex("b", "Person")).unwrap();
    let mut edge_props = Properties::new();
    edge_props.set_ident("e1");
    g.add_edge("KNOWS", "a", "b", edge_props).unwrap();

    let records = g.to_agtype_records();
    let restored = Graph::from_agtype_records("roundtrip", records).unwrap();

    assert_eq!(g.vertices.len(), restored.vertices.len());
    assert_eq!(g.edges.len(), restored.edges.len());
    assert_eq!(
        g.get_vertex_by_ident("a").unwrap().label,
        restored.get_vertex_by_ident("a").unwrap().label
    );
    assert_eq!(
        g.get_edge_by_ident("e1").unwrap().properties,
        restored.get_edge_by_ident("e1").unwrap().properties
    );
}

#[test]
fn query_cache_invalidated_on_add_and_remove() {
    let mut g = Graph::new("g");
    g.add_vertex_instance(vertex("a", "Human")).unwrap();
    g.add_vertex_instance(vertex("b", "Human")).unwrap();

    let baseline: Vec<String> = g
        .vertices_query()
        .label("Human")
        .all()
        .into_iter()
        .map(|v| v.ident().to_string())
        .collect();
    assert_eq!(baseline.len(), 2);

    g.add_vertex_instance(vertex("newperson", "Human")).unwrap();
    let with_addition: Vec<String> = g
        .vertices_query()
        .label("Human")
        .all()
        .into_iter()
        .map(|v| v.ident().to_string())
        .collect();
    assert_eq!(with_addition.len(), 3);
    assert!(with_addition.contains(&"newperson".to_string()));

    g.remove_vertex("newperson");
    let after_removal: Vec<String> = g
        .vertices_query()
        .label("Human")
        .all()
        .into_iter()
        .map(|v| v.ident().to_string())
        .collect();
    assert_eq!(after_removal.len(), 2);
}

#[test]
fn upsert_edge_fallback_keeps_original_ident_and_merges_properties() {
    let mut g = Graph::new("g");
    g.add_vertex_instance(vertex("a", "Person")).unwrap();
    g.add_vertex_instance(vertex("b", "Person")).unwrap();
    let mut old_props = Properties::new();
    old_props.set_ident("e_old");
    g.add_edge("KNOWS", "a", "b", old_props).unwrap();

    let mut incoming_props = Properties::new();
    incoming_props.set_ident("e_new");
    incoming_props.insert("weight", Value::Int(5));
    let incoming = ag_graph::model::Edge::new_with_endpoints("KNOWS", "a", "b", incoming_props).unwrap();
    g.upsert_edge(incoming).unwrap();

    assert_eq!(g.edges.len(), 1);
    let merged = g.get_edge_by_ident("e_old").expect("ident stays e_old");
    assert_eq!(merged.get("weight"), Some(&Value::Int(5)));
    assert!(g.get_edge_by_ident("e_new").is_none());
}
