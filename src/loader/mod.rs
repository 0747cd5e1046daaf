//! Dependency-ordered record creation
//!
//! A run is a fixed sequence of stages. Each stage creates one entity kind
//! and may publish a name to id map that later stages use to fill in their
//! foreign keys.

pub mod batch;
pub mod error;
pub mod execute;
pub mod linker;
pub mod pipeline;
pub mod records;
pub mod reference;
pub mod report;
pub mod resolver;
pub mod stage;

pub use batch::{DEFAULT_BATCH_SIZE, insert_in_batches};
pub use error::{PipelineError, StageError, error_chain};
pub use execute::{LoadContext, LoadOptions, StageOutput, UserMode, execute};
pub use linker::{created_ids, link_created};
pub use pipeline::Pipeline;
pub use reference::{Reference, ReferenceMap};
pub use report::{ConsoleReporter, Reporter, RunSummary, StageReport, stage_line};
pub use stage::{DeclaredMaps, MapKey, STANDARD_STAGES, StageDef, StageId};
