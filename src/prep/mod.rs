/// Pick the receptor context for a unit from its docking score file.
mod best_receptor;
pub use best_receptor::best_receptor;

/// Turn a work unit into a command line.
mod invocation_builder;
pub use invocation_builder::InvocationBuilder;
