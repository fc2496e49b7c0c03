//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::application::services::Difficulty;
use crate::domain::{Algorithm, Operation, StructureKind};

/// Data structure workbench and step-animated sort visualizer with an AI tutor
#[derive(Parser, Debug)]
#[command(name = "dsviz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: $XDG_CONFIG_HOME/dsviz/dsviz.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Data directory, overrides the configured one
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show items of one or all structures
    Show {
        /// array, stack, queue, linked-list or bst
        kind: Option<StructureKind>,
    },

    /// Perform an operation and save the result
    Op {
        kind: StructureKind,
        /// push, pop, enqueue, dequeue, add, remove, insert or search
        operation: Operation,
        /// Operand for value-consuming operations
        value: Option<String>,
    },

    /// Reset a structure to empty
    Clear { kind: StructureKind },

    /// List supported operations with their cost
    Ops { kind: StructureKind },

    /// Show complexity of a structure's operations
    Complexity {
        kind: StructureKind,
        operation: Option<Operation>,
    },

    /// List sort algorithms
    Algorithms,

    /// Animate a sort in the terminal (Ctrl-C cancels)
    Sort {
        /// bubble, quick or merge
        #[arg(short, long, default_value = "bubble")]
        algorithm: Algorithm,
        /// Speed percent 1-100
        #[arg(short, long)]
        speed: Option<u32>,
        /// Number of random values (10-50)
        #[arg(short = 'n', long, conflicts_with = "values")]
        size: Option<usize>,
        /// Explicit values instead of a random array
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        values: Option<Vec<u32>>,
    },

    /// Save, load and list named sessions
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Ask the AI tutor a question
    Ask {
        /// Give the tutor the state of this structure as context
        #[arg(long, conflicts_with = "algorithm")]
        structure: Option<StructureKind>,
        /// Frame the question around this algorithm
        #[arg(long)]
        algorithm: Option<Algorithm>,
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Focused tutor prompts
    Tutor {
        #[command(subcommand)]
        command: TutorCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Save all structures under a name (overwrites)
    Save { name: String },
    /// Replace all structures with a saved session
    Load { name: String },
    /// Delete a saved session
    Delete { name: String },
    /// List saved sessions
    List,
}

#[derive(Subcommand, Debug)]
pub enum TutorCommands {
    /// Explain an operation on a structure
    Explain {
        kind: StructureKind,
        operation: Operation,
        /// Extra context for the explanation
        #[arg(long)]
        context: Option<String>,
    },
    /// Get a hint, not a solution
    Hint {
        kind: StructureKind,
        #[arg(required = true, num_args = 1..)]
        problem: Vec<String>,
    },
    /// Explain an algorithm's time complexity
    Why {
        algorithm: Algorithm,
    },
    /// Get feedback on an answer
    Review {
        topic: String,
        #[arg(required = true, num_args = 1..)]
        answer: Vec<String>,
    },
    /// Generate a practice problem
    Practice {
        kind: StructureKind,
        /// easy, medium or hard
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented template config
    Template,
    /// Show config file location
    Path,
}
