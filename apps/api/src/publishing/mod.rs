// Publishing: pushes assembled LaTeX sources to the remote content store.

pub mod locks;
pub mod publisher;

pub use publisher::Publisher;
