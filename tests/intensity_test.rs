//! Tests for CategoryIntensityMapper and color conversion working together

use rstest::{fixture, rstest};

use treeshade::domain::{
    annotate, build_ranges, hex_to_rgb, CategoryIntensityMapper, CategoryRange, DomainError,
    OutputRange, Rgb, TreeNode,
};
use treeshade::util::testing;

#[fixture]
fn root() -> TreeNode {
    testing::init_test_setup();
    TreeNode::internal(
        "Root",
        vec![
            TreeNode::internal(
                "Action",
                vec![
                    TreeNode::leaf("Game1", Some("Action"), 10.0),
                    TreeNode::leaf("Game2", Some("Action"), 30.0),
                ],
            ),
            TreeNode::internal(
                "Puzzle",
                vec![
                    TreeNode::leaf("Tetris", Some("Puzzle"), 30.26),
                    TreeNode::leaf("Dr. Mario", Some("Puzzle"), 10.0),
                    TreeNode::leaf("Picross", Some("Puzzle"), 2.5),
                ],
            ),
            TreeNode::internal(
                "Solo",
                vec![TreeNode::leaf("Only", Some("Solo"), 4.0)],
            ),
        ],
    )
}

#[rstest]
fn given_scenario_when_building_ranges_then_min_max_per_category(root: TreeNode) {
    let ranges = build_ranges(root.children());
    assert_eq!(ranges["Action"], CategoryRange { min: 10.0, max: 30.0 });
    assert_eq!(ranges["Puzzle"], CategoryRange { min: 2.5, max: 30.26 });
    assert_eq!(ranges["Solo"], CategoryRange { min: 4.0, max: 4.0 });
}

#[rstest]
fn given_scenario_when_mapping_then_endpoints_are_exact(root: TreeNode) {
    let output = OutputRange::new(0.6, 0.8).unwrap();
    let mapper = CategoryIntensityMapper::from_categories(root.children(), output);
    assert_eq!(mapper.intensity_of("Action", 10.0).unwrap(), 0.6);
    assert_eq!(mapper.intensity_of("Action", 30.0).unwrap(), 0.8);
    assert_eq!(mapper.intensity_of("Puzzle", 2.5).unwrap(), 0.6);
    assert_eq!(mapper.intensity_of("Puzzle", 30.26).unwrap(), 0.8);
}

#[rstest]
#[case(OutputRange { start: 0.6, end: 0.8 })]
#[case(OutputRange { start: 0.8, end: 0.6 })]
#[case(OutputRange { start: 0.0, end: 1.0 })]
fn given_any_output_when_mapping_leaves_then_within_bounds(root: TreeNode, #[case] output: OutputRange) {
    let mapper = CategoryIntensityMapper::from_categories(root.children(), output);
    let (low, high) = (output.start.min(output.end), output.start.max(output.end));
    for category in root.children() {
        for leaf in category.children() {
            let value = mapper
                .intensity_of(category.name(), leaf.value().unwrap())
                .unwrap();
            assert!(value.is_finite());
            assert!((low..=high).contains(&value), "{} out of [{}, {}]", value, low, high);
        }
    }
}

#[rstest]
fn given_single_child_category_when_mapping_then_defined_midpoint(root: TreeNode) {
    let mapper = CategoryIntensityMapper::from_categories(root.children(), OutputRange::default());
    let value = mapper.intensity_of("Solo", 4.0).unwrap();
    assert!(!value.is_nan());
    assert!((value - 0.7).abs() < 1e-12);
    // any other value still resolves to the midpoint
    assert!((mapper.intensity_of("Solo", 99.0).unwrap() - 0.7).abs() < 1e-12);
}

#[rstest]
fn given_annotated_tree_when_building_mapper_then_matches_raw_ranges(root: TreeNode) {
    let tree = annotate(&root).unwrap();
    let from_tree = CategoryIntensityMapper::from_tree(&tree, OutputRange::default());
    let from_raw = CategoryIntensityMapper::from_categories(root.children(), OutputRange::default());
    assert_eq!(from_tree.ranges(), from_raw.ranges());
}

#[rstest]
fn given_unregistered_category_when_mapping_then_unknown_category(root: TreeNode) {
    let mapper = CategoryIntensityMapper::from_categories(root.children(), OutputRange::default());
    match mapper.intensity_of("Racing", 5.0) {
        Err(DomainError::UnknownCategory(name)) => assert_eq!(name, "Racing"),
        other => panic!("expected UnknownCategory, got {:?}", other),
    }
}

#[rstest]
fn given_palette_color_and_intensity_when_composing_then_rgba() {
    let mapper = CategoryIntensityMapper::from_categories(
        &[TreeNode::internal(
            "Action",
            vec![
                TreeNode::leaf("a", Some("Action"), 1.0),
                TreeNode::leaf("b", Some("Action"), 2.0),
            ],
        )],
        OutputRange::new(0.8, 0.6).unwrap(),
    );
    let base = hex_to_rgb("#9e0142").unwrap();
    assert_eq!(base, Rgb::new(158, 1, 66));
    let fill = base.with_alpha(mapper.intensity_of("Action", 1.0).unwrap());
    assert_eq!(fill.to_string(), "rgba(158,1,66,0.8)");
}

#[rstest]
#[case("#FF0000")]
#[case("ff0000")]
#[case("FF0000")]
fn given_red_in_any_form_when_parsing_then_same_rgb(#[case] hex: &str) {
    assert_eq!(hex_to_rgb(hex), Some(Rgb { r: 255, g: 0, b: 0 }));
}
