pub mod connector;
pub mod contentful;
pub mod sync;
