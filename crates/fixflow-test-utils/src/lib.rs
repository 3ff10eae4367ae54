pub mod fixtures;
pub mod lattice;
