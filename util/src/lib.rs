mod timer;
pub use timer::Timer;

mod errors;
pub use errors::Errors;

mod names;
pub use names::{append_suffix, strip_name_suffix, NameError};

#[derive(thiserror::Error, Debug)]
#[error("Filesystem path is not valid UTF-8")]
pub struct PathEncodingError;
