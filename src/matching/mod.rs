pub(crate) mod assignment;
pub(crate) mod iou;
