pub(crate) mod graph;
pub(crate) mod node;
pub(crate) mod pair;
