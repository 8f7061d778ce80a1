pub mod hash;
pub mod resource;
