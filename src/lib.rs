//! # parsum - parallel reduction over operation files
//!
//! Each input file starts with an operation code followed by a list of
//! numbers:
//!
//! | code | operation      | result |
//! |------|----------------|--------|
//! | 1    | sum            | Σx     |
//! | 2    | product        | Πx     |
//! | 3    | sum of squares | Σx²    |
//!
//! A fixed pool of worker threads reduces every file and adds the partial
//! results into one shared total. The total is written to an output file and
//! then re-checked by a sequential pass that shares nothing with the pool.
//!
//! ## Quick Start
//!
//! ```bash
//! # Reduce in_1.dat .. in_10.dat in ./data with 4 threads, write ./data/out.dat
//! parsum run ./data 4
//!
//! # Re-check an existing out.dat
//! parsum verify ./data
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use parsum::config::ParsumConfig;
//! use parsum::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::new("data", ParsumConfig::default())?;
//! let summary = pipeline.process(4, None)?;
//! let report = pipeline.verify()?;
//! println!("total {} (expected {})", summary.total, report.expected);
//! # Ok::<(), parsum::ReduceError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod operation;
pub mod output;
pub mod parallel;
pub mod pipeline;
pub mod tasks;
pub mod verify;

pub use error::ReduceError;
pub use operation::OperationKind;
