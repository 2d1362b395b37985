pub mod processing;
pub mod rcnn;

pub use processing::generate_anchors::{
    generate_anchors, generate_anchors_dense, generate_anchors_fpn, AnchorConfig, Config,
};
pub use rcnn::anchors::anchors;
