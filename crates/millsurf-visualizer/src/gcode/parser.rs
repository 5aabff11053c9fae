//! G-code motion program parser
//!
//! Turns program text into an ordered list of [`MotionSegment`]s. Each line is
//! tokenized into a [`Block`], then [`MachineState::advance`] is folded over
//! the blocks in file order.
//!
//! Only straight moves (G0/G1) produce segments. Arc (G2/G3) and probing
//! (G38.x) lines are skipped without moving the tool, so the next straight
//! move starts from the arc's start point and cuts a direct line from there.
//! Controller command lines such as `$H` or `#100=5` are ignored.

use millsurf_core::{MotionKind, MotionSegment, ParseError};
use tracing::{debug, trace, warn};

use super::state::{
    AxisWords, Block, BlockOutcome, DistanceMode, MachineState, MotionMode, MotionWord, UnitMode,
};
use super::words::tokenize;

/// Meaning of a single G word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GWord {
    Motion(MotionWord),
    Distance(DistanceMode),
    Units(UnitMode),
    /// Non-modal code that reads axis words as parameters
    ConsumesAxes,
    Other,
}

fn classify_g(value: f64) -> GWord {
    // Work in tenths so G38.2 and G92.1 are matched exactly
    let code = (value * 10.0).round() as i64;
    match code {
        0 => GWord::Motion(MotionWord::Set(MotionMode::Rapid)),
        10 => GWord::Motion(MotionWord::Set(MotionMode::Linear)),
        20 => GWord::Motion(MotionWord::Set(MotionMode::ArcClockwise)),
        30 => GWord::Motion(MotionWord::Set(MotionMode::ArcCounterClockwise)),
        382..=385 => GWord::Motion(MotionWord::Set(MotionMode::Probe)),
        800 => GWord::Motion(MotionWord::Cancel),
        200 => GWord::Units(UnitMode::Inches),
        210 => GWord::Units(UnitMode::Millimeters),
        900 => GWord::Distance(DistanceMode::Absolute),
        910 => GWord::Distance(DistanceMode::Incremental),
        40 | 100 | 280 | 300 | 530 | 920..=923 => GWord::ConsumesAxes,
        _ => GWord::Other,
    }
}

impl Block {
    /// Tokenize one line
    ///
    /// `G`, `X`, `Y` and `Z` values are parsed strictly. Other words (feed,
    /// spindle, line numbers, arc offsets) are accepted and ignored.
    pub fn parse(line_number: usize, line: &str) -> Result<Self, ParseError> {
        let mut block = Block {
            line_number,
            ..Default::default()
        };
        let mut axes = AxisWords::default();

        for word in tokenize(line_number, line)? {
            match word.letter {
                'G' => match classify_g(word.number(line_number)?) {
                    GWord::Motion(motion) => block.motion = Some(motion),
                    GWord::Distance(distance) => block.distance = Some(distance),
                    GWord::Units(units) => block.units = Some(units),
                    GWord::ConsumesAxes => block.axes_consumed = true,
                    GWord::Other => {}
                },
                'X' => axes.x = Some(word.number(line_number)?),
                'Y' => axes.y = Some(word.number(line_number)?),
                'Z' => axes.z = Some(word.number(line_number)?),
                _ => {}
            }
        }

        block.axes = axes;
        Ok(block)
    }
}

/// Counters collected while parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Lines read, including blank and comment lines
    pub lines: usize,
    pub rapid_segments: usize,
    pub linear_segments: usize,
    /// Lines skipped because their motion mode is not rendered (arcs, probes)
    pub unsupported_lines: usize,
}

impl ParseStats {
    pub fn segments(&self) -> usize {
        self.rapid_segments + self.linear_segments
    }
}

/// Result of parsing a whole program
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedProgram {
    pub segments: Vec<MotionSegment>,
    pub stats: ParseStats,
    /// Machine state after the last line
    pub final_state: MachineState,
}

/// G-code parser producing motion segments
#[derive(Debug, Clone, Copy, Default)]
pub struct GcodeParser {
    initial_state: MachineState,
}

impl GcodeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known position or modal setup instead of the power-on state
    pub fn with_initial_state(initial_state: MachineState) -> Self {
        Self { initial_state }
    }

    /// Parse a whole program
    ///
    /// Fails on the first malformed line; an empty program yields no segments.
    pub fn parse(&self, source: &str) -> Result<ParsedProgram, ParseError> {
        debug!("Starting G-code parse, input size: {} bytes", source.len());

        let (final_state, segments, stats) = source.lines().enumerate().try_fold(
            (self.initial_state, Vec::new(), ParseStats::default()),
            |(state, mut segments, mut stats), (index, line)| {
                let block = Block::parse(index + 1, line)?;
                let (state, outcome) = state.advance(&block);
                stats.lines += 1;
                match outcome {
                    BlockOutcome::Segment(segment) => {
                        match segment.kind {
                            MotionKind::Rapid => stats.rapid_segments += 1,
                            MotionKind::Linear => stats.linear_segments += 1,
                        }
                        segments.push(segment);
                    }
                    BlockOutcome::Unsupported => {
                        trace!("Line {}: unsupported motion {:?}, skipped", block.line_number, state.motion);
                        stats.unsupported_lines += 1;
                    }
                    BlockOutcome::NoMotion => {}
                }
                Ok::<_, ParseError>((state, segments, stats))
            },
        )?;

        if stats.unsupported_lines > 0 {
            warn!(
                "Skipped {} arc/probe lines; only straight moves are simulated",
                stats.unsupported_lines
            );
        }
        debug!(
            "Parse complete: {} lines, G0={}, G1={}, total segments={}",
            stats.lines,
            stats.rapid_segments,
            stats.linear_segments,
            segments.len()
        );

        Ok(ParsedProgram {
            segments,
            stats,
            final_state,
        })
    }
}

/// Parse a program with the default parser and return only its segments
pub fn parse_program(source: &str) -> Result<Vec<MotionSegment>, ParseError> {
    GcodeParser::new().parse(source).map(|program| program.segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use millsurf_core::Point3;

    fn seg(start: (f64, f64, f64), end: (f64, f64, f64), kind: MotionKind) -> MotionSegment {
        MotionSegment::new(
            Point3::new(start.0, start.1, start.2),
            Point3::new(end.0, end.1, end.2),
            kind,
        )
    }

    #[test]
    fn test_empty_program() {
        let program = GcodeParser::new().parse("").unwrap();
        assert!(program.segments.is_empty());
        assert_eq!(program.stats, ParseStats::default());
    }

    #[test]
    fn test_modal_axes_and_motion() {
        let gcode = "G0 X0 Y0 Z5\nG1 Z-1 F300\nX10\nY4\nG0 Z5";
        let segments = parse_program(gcode).unwrap();
        assert_eq!(
            segments,
            vec![
                seg((0.0, 0.0, 5.0), (0.0, 0.0, -1.0), MotionKind::Linear),
                seg((0.0, 0.0, -1.0), (10.0, 0.0, -1.0), MotionKind::Linear),
                seg((10.0, 0.0, -1.0), (10.0, 4.0, -1.0), MotionKind::Linear),
                seg((10.0, 4.0, -1.0), (10.0, 4.0, 5.0), MotionKind::Rapid),
            ]
        );
    }

    #[test]
    fn test_leading_zero_codes_and_compact_form() {
        let segments = parse_program("G00Z1\nG01X2.5Y-1Z-0.5").unwrap();
        assert_eq!(
            segments,
            vec![seg((0.0, 0.0, 1.0), (2.5, -1.0, -0.5), MotionKind::Linear)]
        );
    }

    #[test]
    fn test_axes_before_any_motion_word_are_ignored() {
        let program = GcodeParser::new().parse("X5 Y5 Z1\nG1 X1").unwrap();
        assert!(program.segments.is_empty());
        assert_eq!(program.final_state.position(), None);
    }

    #[test]
    fn test_repeated_position_yields_no_segment() {
        let segments = parse_program("G0 X1 Y1 Z1\nG1 X1 Y1 Z1\nG1 X1").unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_feed_and_spindle_words_ignored() {
        let segments = parse_program("M3 S12000\nG0 Z1\nG1 X5 F1000 S12000 M8").unwrap();
        assert_eq!(
            segments,
            vec![seg((0.0, 0.0, 1.0), (5.0, 0.0, 1.0), MotionKind::Linear)]
        );
    }

    #[test]
    fn test_arc_lines_are_skipped() {
        let gcode = "G0 X0 Y0 Z1\nG2 X10 Y0 I5 J0\nX0 Y0 I-5 J0\nG1 X5";
        let program = GcodeParser::new().parse(gcode).unwrap();
        assert_eq!(program.stats.unsupported_lines, 2);
        assert_eq!(
            program.segments,
            vec![seg((0.0, 0.0, 1.0), (5.0, 0.0, 1.0), MotionKind::Linear)]
        );
    }

    #[test]
    fn test_controller_command_lines_are_ignored() {
        let segments = parse_program("$H\nG0 Z1\nG1 X5").unwrap();
        assert_eq!(
            segments,
            vec![seg((0.0, 0.0, 1.0), (5.0, 0.0, 1.0), MotionKind::Linear)]
        );

        let gcode = "#100=5\n#<depth> = -1\n$$\nG0 Z1\nG1 X2";
        let program = GcodeParser::new().parse(gcode).unwrap();
        assert_eq!(program.segments.len(), 1);
        assert_eq!(program.stats.unsupported_lines, 0);
    }

    #[test]
    fn test_axis_consuming_codes_do_not_move() {
        let gcode = "G0 Z2\nG28 Z0\nG92 X0 Y0\nG4 P1\nG1 X3";
        let segments = parse_program(gcode).unwrap();
        assert_eq!(
            segments,
            vec![seg((0.0, 0.0, 2.0), (3.0, 0.0, 2.0), MotionKind::Linear)]
        );
    }

    #[test]
    fn test_malformed_number_reports_line() {
        let err = parse_program("G0 Z1\n\nG1 X1.2.3").unwrap_err();
        assert_eq!(err.line_number(), 3);
        assert!(matches!(err, ParseError::InvalidNumber { letter: 'X', .. }));

        let err = parse_program("G1 Y").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingValue {
                line_number: 1,
                letter: 'Y'
            }
        );
    }

    #[test]
    fn test_initial_state_override() {
        let start = MachineState {
            z: Some(10.0),
            motion: Some(MotionMode::Rapid),
            ..Default::default()
        };
        let segments = GcodeParser::with_initial_state(start).parse("Z0").unwrap();
        assert_eq!(
            segments.segments,
            vec![seg((0.0, 0.0, 10.0), (0.0, 0.0, 0.0), MotionKind::Rapid)]
        );
    }

    #[test]
    fn test_classify_g_codes() {
        assert_eq!(classify_g(1.0), GWord::Motion(MotionWord::Set(MotionMode::Linear)));
        assert_eq!(classify_g(38.2), GWord::Motion(MotionWord::Set(MotionMode::Probe)));
        assert_eq!(classify_g(92.1), GWord::ConsumesAxes);
        assert_eq!(classify_g(17.0), GWord::Other);
    }
}
