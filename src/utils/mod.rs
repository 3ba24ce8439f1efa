pub mod bitio;
pub mod hash;
pub mod io;
