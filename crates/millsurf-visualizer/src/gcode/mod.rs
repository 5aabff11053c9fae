//! G-code motion parsing
//!
//! This module provides:
//! - Word tokenization (comments, compact and spaced forms)
//! - Modal machine state (motion, distance and unit groups)
//! - The program parser producing motion segments

pub mod parser;
pub mod state;
pub mod words;

pub use parser::{parse_program, GcodeParser, ParseStats, ParsedProgram};
pub use state::{
    AxisWords, Block, BlockOutcome, DistanceMode, MachineState, MotionMode, MotionWord, UnitMode,
};
pub use words::{strip_comments, tokenize, Word};
