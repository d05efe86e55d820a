// Resume rendering pipeline: load → assemble → validate → publish → compile → classify.

pub mod handlers;
pub mod pipeline;
pub mod store;
