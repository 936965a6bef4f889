mod feeler;

pub use feeler::*;
