//! XYZ trajectory extraction engine
//!
//! An XYZ file is a sequence of frames: an atom count line, a free-text
//! comment line, then one `symbol x y z` line per atom in Ångström. Every
//! completed frame is appended as one geometry snapshot.

use super::engine::{EngineCore, EngineState, Extractor, Section, tokens};
use super::stats::ParseResult;
use crate::constants::{MAX_ATOMIC_NUMBER, MAX_FRAME_ATOMS};
use crate::normalizer::{atomic_number, parse_integer, parse_real};
use crate::schema::{Attribute, AttributeValue, Geometry};
use tracing::debug;

#[derive(Debug, Default)]
enum FrameState {
    #[default]
    AwaitingCount,
    Comment {
        expected: usize,
    },
    Atoms {
        expected: usize,
        numbers: Vec<u32>,
        geometry: Geometry,
    },
}

/// XYZ extractor
#[derive(Debug, Default)]
pub struct XyzExtractor {
    core: EngineCore,
    state: FrameState,
    frames: usize,
}

impl XyzExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    fn await_count(&mut self, line: &str) -> EngineState {
        let columns = tokens(line);
        let Some(first) = columns.first() else {
            return EngineState::AwaitingMarker;
        };

        match parse_integer(first).map(usize::try_from) {
            Ok(Ok(count)) if columns.len() == 1 && count > MAX_FRAME_ATOMS => {
                self.core.fail(
                    Section::XyzFrame,
                    format!("frame declares {count} atoms, more than {MAX_FRAME_ATOMS}"),
                );
                EngineState::BlockFailed(Section::XyzFrame)
            }
            Ok(Ok(count)) if columns.len() == 1 && count > 0 => {
                self.state = FrameState::Comment { expected: count };
                EngineState::Reading(Section::XyzFrame)
            }
            _ => {
                debug!("Skipping non-frame line {}", self.core.line());
                EngineState::AwaitingMarker
            }
        }
    }

    fn read_atom(
        &mut self,
        line: &str,
        expected: usize,
        mut numbers: Vec<u32>,
        mut geometry: Geometry,
    ) -> EngineState {
        match parse_atom(line) {
            Ok((z, xyz)) => {
                numbers.push(z);
                geometry.push(xyz);
            }
            Err(reason) => {
                self.core.fail(
                    Section::XyzFrame,
                    format!(
                        "atom {} of {}: {}",
                        numbers.len() + 1,
                        expected,
                        reason
                    ),
                );
                // The offending line may open the next frame
                self.await_count(line);
                return EngineState::BlockFailed(Section::XyzFrame);
            }
        }

        if numbers.len() < expected {
            self.state = FrameState::Atoms {
                expected,
                numbers,
                geometry,
            };
            return EngineState::Reading(Section::XyzFrame);
        }

        self.frames += 1;
        self.core.commit(
            Section::XyzFrame,
            vec![
                (Attribute::AtomicNumbers, AttributeValue::Integers(numbers)),
                (Attribute::AtomCount, AttributeValue::Count(expected)),
                (
                    Attribute::AtomCoordinates,
                    AttributeValue::Geometries(vec![geometry]),
                ),
            ],
        );
        EngineState::BlockComplete(Section::XyzFrame)
    }
}

impl Extractor for XyzExtractor {
    fn feed(&mut self, line: &str) -> EngineState {
        self.core.next_line();

        match std::mem::take(&mut self.state) {
            FrameState::AwaitingCount => self.await_count(line),
            FrameState::Comment { expected } => {
                let comment = line.trim();
                if self.frames == 0 && !comment.is_empty() {
                    self.core.commit(
                        Section::Title,
                        vec![(Attribute::Title, AttributeValue::Text(comment.to_string()))],
                    );
                }
                self.state = FrameState::Atoms {
                    expected,
                    numbers: Vec::new(),
                    geometry: Vec::new(),
                };
                EngineState::Reading(Section::XyzFrame)
            }
            FrameState::Atoms {
                expected,
                numbers,
                geometry,
            } => self.read_atom(line, expected, numbers, geometry),
        }
    }

    fn finish(mut self) -> ParseResult {
        match std::mem::take(&mut self.state) {
            FrameState::AwaitingCount => {}
            FrameState::Comment { expected } => self.core.fail(
                Section::XyzFrame,
                format!("input ended before the comment line of a {expected}-atom frame"),
            ),
            FrameState::Atoms {
                expected, numbers, ..
            } => self.core.fail(
                Section::XyzFrame,
                format!(
                    "input ended after {} of {} atom lines",
                    numbers.len(),
                    expected
                ),
            ),
        }
        debug!("Read {} XYZ frames", self.frames);
        self.core.into_result()
    }
}

fn parse_atom(line: &str) -> Result<(u32, [f64; 3]), String> {
    let columns = tokens(line);
    if columns.len() < 4 {
        return Err(format!("expected 'symbol x y z', found '{}'", line.trim()));
    }

    let z = atomic_number(columns[0])
        .or_else(|| {
            // Some programs write the atomic number instead of the symbol
            parse_integer(columns[0])
                .ok()
                .filter(|z| (1..=MAX_ATOMIC_NUMBER as i64).contains(z))
                .map(|z| z as u32)
        })
        .ok_or_else(|| format!("unknown element '{}'", columns[0]))?;

    let mut xyz = [0.0; 3];
    for (slot, token) in xyz.iter_mut().zip(&columns[1..4]) {
        *slot = parse_real(token).map_err(|e| e.to_string())?;
    }
    Ok((z, xyz))
}
