pub(crate) mod grid;
pub(crate) mod groups;
pub(crate) mod kmeans;
