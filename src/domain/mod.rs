//! Domain layer: structures, cost catalog and the sort engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod complexity;
pub mod element;
pub mod error;
pub mod sort;
pub mod state;
pub mod structures;

pub use complexity::{algorithm_info, AlgorithmInfo, Complexity};
pub use element::Element;
pub use error::{DomainError, DomainResult};
pub use sort::{Algorithm, SortRun, Step, StepKind};
pub use state::{SavedState, SerializedNode, Structures};
pub use structures::{Operation, Outcome, Structure, StructureKind};
