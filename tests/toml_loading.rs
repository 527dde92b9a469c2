//! Loading diagram descriptions from TOML

use std::fs;

use flowchart_layout::{
    build_from_file, build_from_toml, AnchorName, BuildError, Diagram, LayoutDirection,
    LayoutError, LoadError, Point, Side,
};
use pretty_assertions::assert_eq;

const FLOWCHART: &str = r#"
[config]
gridSize = 10
nodeSpacing = 60
levelSpacing = 100

[[nodes]]
id = "start"
text = "Start"
width = 120
height = 40

[[nodes]]
id = "check"
text = "Valid?"
width = 120
height = 40
tint = "warning"

[[nodes]]
id = "done"
text = "Done"
width = 120
height = 40
position = { x = 400, y = 190 }

[[connections]]
from = "start"
to = "check"

[[connections]]
from = "check"
to = "done"
fromAnchor = "right"
toAnchor = "left"
label = "yes"
labelMinDistanceFromEnds = 10
"#;

#[test]
fn test_load_flowchart_description() {
    let diagram = Diagram::from_toml_str(FLOWCHART).unwrap();
    assert_eq!(diagram.nodes.len(), 3);
    assert_eq!(diagram.nodes[1].tint.as_deref(), Some("warning"));
    assert_eq!(diagram.nodes[2].position, Some(Point::new(400.0, 190.0)));
    assert_eq!(diagram.connections[1].from_anchor, AnchorName::Right);
    assert_eq!(diagram.connections[1].to_anchor, AnchorName::Left);
    assert_eq!(diagram.connections[1].label_min_distance_from_ends, Some(10.0));
    assert_eq!(diagram.config.layout_direction, LayoutDirection::Vertical);
    assert_eq!(diagram.config.node_padding, 25.0);
}

#[test]
fn test_build_flowchart_description() {
    let model = build_from_toml(FLOWCHART).unwrap();
    assert_eq!(model.node_position("start"), Some(Point::new(50.0, 50.0)));
    assert_eq!(model.node_position("check"), Some(Point::new(50.0, 190.0)));
    assert_eq!(model.node_position("done"), Some(Point::new(400.0, 190.0)));

    let path = &model.connection_paths[1];
    assert_eq!(path.from_side, Side::Right);
    assert_eq!(path.to_side, Side::Left);
    assert_eq!(
        path.waypoints,
        vec![Point::new(170.0, 210.0), Point::new(400.0, 210.0)]
    );

    let label = model.label_for(1).unwrap();
    assert_eq!(label.text, "yes");
    assert_eq!(label.position, Point::new(285.0, 210.0));
    assert!(!label.clearance_met);
}

#[test]
fn test_build_from_file() {
    let path = std::env::temp_dir().join(format!(
        "flowchart-layout-{}-description.toml",
        std::process::id()
    ));
    fs::write(&path, FLOWCHART).unwrap();
    let model = build_from_file(&path);
    fs::remove_file(&path).unwrap();

    assert_eq!(model.unwrap().connection_paths.len(), 2);
}

#[test]
fn test_missing_required_field() {
    let result = Diagram::from_toml_str(
        r#"
        [[nodes]]
        id = "a"
        width = 10
        "#,
    );
    let err = result.unwrap_err();
    assert!(matches!(err, LoadError::Toml(_)));
    assert!(err.to_string().contains("height"));
}

#[test]
fn test_unknown_anchor_name() {
    let result = build_from_toml(
        r#"
        [[nodes]]
        id = "a"
        width = 10
        height = 10

        [[nodes]]
        id = "b"
        width = 10
        height = 10

        [[connections]]
        from = "a"
        to = "b"
        fromAnchor = "middle"
        "#,
    );
    assert!(matches!(result, Err(BuildError::Load(LoadError::Toml(_)))));
}

#[test]
fn test_duplicate_ids_rejected() {
    let result = build_from_toml(
        r#"
        [[nodes]]
        id = "a"
        width = 10
        height = 10

        [[nodes]]
        id = "a"
        width = 20
        height = 20
        "#,
    );
    match result {
        Err(BuildError::Layout(LayoutError::DuplicateNode { id })) => assert_eq!(id, "a"),
        other => panic!("expected duplicate node error, got {other:?}"),
    }
}

#[test]
fn test_invalid_config_rejected() {
    let result = build_from_toml(
        r#"
        [config]
        gridSize = -4
        "#,
    );
    let err = result.unwrap_err();
    assert!(matches!(err, BuildError::Layout(LayoutError::InvalidConfig { .. })));
    assert!(err.to_string().contains("gridSize"));
}
