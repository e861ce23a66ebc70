mod kind;
pub use kind::{StageKind, StageSet};

mod layout;
pub use layout::Layout;

mod spec;
pub use spec::{spec, Arg, Bindings, InputRoot, StageSpec};

mod tuning;
pub use tuning::{Knob, Tuning};

mod unit;
pub use unit::{derive, WorkUnit};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unknown stage \"{0}\" (expected one of: conformers, docking, optimize, eis, eb)")]
    UnknownStage(String),
    #[error("Receptor directory {0:?} has no usable base name")]
    NoReceptorSetName(std::path::PathBuf),
    #[error("Stage {0} needs a receptor context, but none was resolved")]
    MissingContext(StageKind),
    #[error("Stage {0} has no side output in its naming convention")]
    MissingSideOutput(StageKind),
    #[error(transparent)]
    Name(#[from] util::NameError),
    #[error(transparent)]
    Encoding(#[from] util::PathEncodingError),
}
