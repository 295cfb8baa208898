pub(crate) mod section;
pub(crate) mod target;
pub(crate) mod timeline;
pub(crate) mod trigger;
