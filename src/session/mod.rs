pub(crate) mod app;
pub(crate) mod render_loop;
pub(crate) mod resize;
