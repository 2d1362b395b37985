pub mod generate_anchors;
