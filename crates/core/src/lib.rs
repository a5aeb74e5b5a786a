#![forbid(unsafe_code)]

//! Domain model and pure logic for the quiz scoring core: question and
//! answer types, local closed-form grading, and weak-area extraction.
//! Everything requiring I/O (grading oracle, question generation, progress
//! persistence) lives in the `services` and `storage` crates.

pub mod grader;
pub mod model;
pub mod time;
pub mod weakness;

pub use grader::{ClosedFormOutcome, grade_answer};
pub use time::Clock;
pub use weakness::{WeaknessReport, extract};
