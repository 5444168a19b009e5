mod io;

pub use io::{Args, enumerate_input_files};
pub use clap::Parser;
