//! Molden format extraction engine
//!
//! Molden files are a sequence of bracketed sections. Each recognized marker
//! opens one block handler; the handler consumes lines until its own terminal
//! condition and then commits. A terminating line that belongs to the next
//! section (for example `[GTO]` right after the last atom line) is handed
//! back to marker recognition in the same call, so no line is lost and no
//! line is read twice.
//!
//! ```text
//! [Atoms] AU
//! O     1    8         0.0000000000       -2.1471232980        0.0512679900
//! [GTO]
//!   1 0
//!  s    2 1.00
//!   0.5484671660D+04  0.1831074430D-02
//!   0.8252349460D+03  0.1395017220D-01
//!
//! ```

use super::engine::{EngineCore, EngineState, Extractor, Section, is_section_header, tokens};
use super::stats::ParseResult;
use crate::constants::{MAX_BASIS_FUNCTIONS, MAX_SHELL_PRIMITIVES, molden_markers};
use crate::normalizer::{
    canonical_shell_label, canonical_symmetry, parse_integer, parse_real, parse_reals,
    strip_orbital_index, units,
};
use crate::schema::{
    AngularConvention, Attribute, AttributeValue, Primitive, Shell, ShellLabel, SpinChannel,
    basis_dimension,
};
use tracing::{debug, info};

/// Outcome of feeding one line to an open block
#[derive(Debug)]
enum Step {
    /// Line consumed, block still open
    Continue,
    /// Line consumed, block finished
    Complete,
    /// Line not consumed; block finished and the line goes to marker recognition
    Redispatch,
    /// Grammar violated; block abandoned and the line goes to marker recognition
    Fail(String),
}

/// Molden extractor
#[derive(Debug)]
pub struct MoldenExtractor {
    core: EngineCore,
    block: Block,
    convention: Option<AngularConvention>,
}

#[derive(Debug, Default)]
enum Block {
    #[default]
    Idle,
    Title(Vec<String>),
    Atoms(AtomsBlock),
    Gto(GtoBlock),
    Mo(MoBlock),
    Freq(Vec<f64>),
    Int(Vec<f64>),
    FrCoord,
    FrNormCoord(NormalModeBlock),
    GeoConv(GeoConvBlock),
}

impl Block {
    fn section(&self) -> Option<Section> {
        match self {
            Block::Idle => None,
            Block::Title(_) => Some(Section::Title),
            Block::Atoms(_) => Some(Section::Atoms),
            Block::Gto(_) => Some(Section::Gto),
            Block::Mo(_) => Some(Section::Mo),
            Block::Freq(_) => Some(Section::Freq),
            Block::Int(_) => Some(Section::Int),
            Block::FrCoord => Some(Section::FrCoord),
            Block::FrNormCoord(_) => Some(Section::FrNormCoord),
            Block::GeoConv(_) => Some(Section::GeoConv),
        }
    }

    fn step(&mut self, line: &str) -> Step {
        match self {
            Block::Idle => Step::Redispatch,
            Block::Title(lines) => {
                if is_section_header(line) {
                    return Step::Redispatch;
                }
                let text = line.trim();
                if !text.is_empty() {
                    lines.push(text.to_string());
                }
                Step::Continue
            }
            Block::Atoms(block) => block.step(line),
            Block::Gto(block) => block.step(line),
            Block::Mo(block) => block.step(line),
            Block::Freq(values) | Block::Int(values) => step_first_column(values, line),
            Block::FrCoord => {
                if is_section_header(line) {
                    Step::Redispatch
                } else {
                    Step::Continue
                }
            }
            Block::FrNormCoord(block) => block.step(line),
            Block::GeoConv(block) => block.step(line),
        }
    }
}

impl Default for MoldenExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MoldenExtractor {
    pub fn new() -> Self {
        Self {
            core: EngineCore::new(),
            block: Block::Idle,
            convention: None,
        }
    }

    /// Recognize a section marker and open its block
    fn dispatch(&mut self, line: &str) -> EngineState {
        let lowered = line.to_lowercase();

        if lowered.contains(molden_markers::MOLDEN_FORMAT) {
            info!("Found Molden format marker, parsing");
            return EngineState::AwaitingMarker;
        }

        let block = if lowered.contains(molden_markers::TITLE) {
            Block::Title(Vec::new())
        } else if lowered.contains(molden_markers::ATOMS) {
            let angstrom = lowered.contains(molden_markers::ANGSTROM_UNIT);
            Block::Atoms(AtomsBlock::new(angstrom))
        } else if lowered.contains(molden_markers::GTO) {
            Block::Gto(GtoBlock::default())
        } else if lowered.contains(molden_markers::MO) {
            Block::Mo(MoBlock::default())
        } else if lowered.contains(molden_markers::FREQ) {
            Block::Freq(Vec::new())
        } else if lowered.contains(molden_markers::INT) {
            Block::Int(Vec::new())
        } else if lowered.contains(molden_markers::FR_COORD) {
            Block::FrCoord
        } else if lowered.contains(molden_markers::FR_NORM_COORD) {
            Block::FrNormCoord(NormalModeBlock::default())
        } else if lowered.contains(molden_markers::GEOCONV) {
            Block::GeoConv(GeoConvBlock::default())
        } else if let Some(flag) = molden_markers::ANGULAR_FLAGS
            .iter()
            .find(|flag| lowered.contains(**flag))
        {
            self.apply_angular_flag(flag);
            return EngineState::AwaitingMarker;
        } else {
            if is_section_header(line) {
                debug!("Skipping unsupported section: {}", line.trim());
            }
            return EngineState::AwaitingMarker;
        };

        let Some(section) = block.section() else {
            return EngineState::AwaitingMarker;
        };
        debug!("Opening {} block at line {}", section.name(), self.core.line());
        self.block = block;
        EngineState::Reading(section)
    }

    fn apply_angular_flag(&mut self, flag: &str) {
        let convention = self.convention.get_or_insert_with(AngularConvention::default);
        match flag {
            "[5d]" | "[5d7f]" => {
                convention.spherical_d = true;
                convention.spherical_f = true;
            }
            "[5d10f]" => {
                convention.spherical_d = true;
                convention.spherical_f = false;
            }
            "[7f]" => convention.spherical_f = true,
            "[9g]" => convention.spherical_g = true,
            _ => {}
        }
        debug!("Angular convention now {:?}", convention);
    }

    /// Close the open block, committing its values
    fn commit_block(&mut self) {
        let block = std::mem::take(&mut self.block);
        let Some(section) = block.section() else {
            return;
        };

        let values = match block {
            Block::Idle | Block::FrCoord => return,
            Block::Title(lines) => {
                if lines.is_empty() {
                    return;
                }
                Ok(vec![(Attribute::Title, AttributeValue::Text(lines.join(" ")))])
            }
            Block::Atoms(block) => block.into_values(),
            Block::Gto(block) => block.into_values(),
            Block::Mo(block) => {
                let convention = self.convention.unwrap_or_default();
                let width = self
                    .core
                    .schema
                    .basis_shells()
                    .map(|groups| basis_dimension(groups, &convention));
                block.into_values(width)
            }
            Block::Freq(values) => Ok(reals_value(Attribute::VibrationalFrequencies, values)),
            Block::Int(values) => Ok(reals_value(Attribute::VibrationalIntensities, values)),
            Block::FrNormCoord(block) => block.into_values(),
            Block::GeoConv(block) => Ok(block.into_values()),
        };

        match values {
            Ok(values) if values.is_empty() => {
                debug!("{} block held no data", section.name());
            }
            Ok(values) => self.core.commit(section, values),
            Err(reason) => self.core.fail(section, reason),
        }
    }

    /// Close the open block at end of input
    fn finish_block(&mut self) {
        if let Block::Gto(block) = &self.block {
            if let Err(reason) = block.check_complete() {
                self.block = Block::Idle;
                self.core.fail(Section::Gto, reason);
                return;
            }
        }
        self.commit_block();
    }
}

impl Extractor for MoldenExtractor {
    fn feed(&mut self, line: &str) -> EngineState {
        self.core.next_line();

        let Some(section) = self.block.section() else {
            return self.dispatch(line);
        };

        match self.block.step(line) {
            Step::Continue => EngineState::Reading(section),
            Step::Complete => {
                self.commit_block();
                EngineState::BlockComplete(section)
            }
            Step::Redispatch => {
                self.commit_block();
                match self.dispatch(line) {
                    EngineState::AwaitingMarker => EngineState::BlockComplete(section),
                    opened => opened,
                }
            }
            Step::Fail(reason) => {
                self.block = Block::Idle;
                self.core.fail(section, reason);
                self.dispatch(line);
                EngineState::BlockFailed(section)
            }
        }
    }

    fn finish(mut self) -> ParseResult {
        self.finish_block();

        if let Some(convention) = self.convention {
            self.core.commit(
                Section::AngularFlags,
                vec![(
                    Attribute::AngularConvention,
                    AttributeValue::Convention(convention),
                )],
            );
        }

        self.core.into_result()
    }
}

fn reals_value(attribute: Attribute, values: Vec<f64>) -> Vec<(Attribute, AttributeValue)> {
    if values.is_empty() {
        Vec::new()
    } else {
        vec![(attribute, AttributeValue::Reals(values))]
    }
}

/// One value per line taken from the first column, ended by a blank line or a marker
fn step_first_column(values: &mut Vec<f64>, line: &str) -> Step {
    if is_section_header(line) {
        return Step::Redispatch;
    }
    let Some(first) = line.split_whitespace().next() else {
        return Step::Complete;
    };
    match parse_real(first) {
        Ok(value) => {
            values.push(value);
            Step::Continue
        }
        Err(e) => Step::Fail(e.to_string()),
    }
}

// =============================================================================
// [Atoms]
// =============================================================================

#[derive(Debug)]
struct AtomsBlock {
    angstrom: bool,
    atomic_numbers: Vec<u32>,
    coordinates: Vec<[f64; 3]>,
}

impl AtomsBlock {
    fn new(angstrom: bool) -> Self {
        Self {
            angstrom,
            atomic_numbers: Vec::new(),
            coordinates: Vec::new(),
        }
    }

    /// `name  seq  Z  x  y  z`; the block ends at a marker or a line with fewer than two tokens
    fn step(&mut self, line: &str) -> Step {
        let columns = tokens(line);
        if columns.len() <= 1 || is_section_header(line) {
            return Step::Redispatch;
        }
        if columns.len() < 6 {
            return Step::Fail(format!(
                "atom record has {} columns, expected 6: '{}'",
                columns.len(),
                line.trim()
            ));
        }

        // The atom name column is free text; the nuclear charge is authoritative
        let atomic_number = match parse_integer(columns[2]).map(u32::try_from) {
            Ok(Ok(z)) => z,
            Ok(Err(_)) => return Step::Fail(format!("nuclear charge '{}' out of range", columns[2])),
            Err(e) => return Step::Fail(e.to_string()),
        };

        let mut xyz = [0.0; 3];
        for (slot, token) in xyz.iter_mut().zip(&columns[3..6]) {
            match parse_real(token) {
                Ok(value) => *slot = value,
                Err(e) => return Step::Fail(e.to_string()),
            }
        }
        if !self.angstrom {
            xyz = units::triple_bohr_to_angstrom(xyz);
        }

        self.atomic_numbers.push(atomic_number);
        self.coordinates.push(xyz);
        Step::Continue
    }

    fn into_values(self) -> Result<Vec<(Attribute, AttributeValue)>, String> {
        if self.atomic_numbers.is_empty() {
            return Ok(Vec::new());
        }
        let count = self.atomic_numbers.len();
        Ok(vec![
            (
                Attribute::AtomicNumbers,
                AttributeValue::Integers(self.atomic_numbers),
            ),
            (Attribute::AtomCount, AttributeValue::Count(count)),
            (
                Attribute::AtomCoordinates,
                AttributeValue::Geometries(vec![self.coordinates]),
            ),
        ])
    }
}

// =============================================================================
// [GTO]
// =============================================================================

/// Sub-states of the basis-set block
#[derive(Debug, Default)]
enum GtoState {
    /// Expecting `<atom sequence number> 0`, a blank line or the next marker
    #[default]
    AwaitingAtomGroup,
    /// Expecting `<label> <primitive count> [scale]` or the blank line ending the atom
    ReadingShell,
    /// Expecting `exponent coefficient [coefficient]` lines until `expected` are read
    ReadingPrimitive {
        label: ShellLabel,
        expected: usize,
        primitives: Vec<Primitive>,
    },
    /// Second blank line seen; the per-atom grouping is final
    BlockComplete,
}

#[derive(Debug, Default)]
struct GtoBlock {
    state: GtoState,
    groups: Vec<Vec<Shell>>,
    current: Vec<Shell>,
}

impl GtoBlock {
    fn step(&mut self, line: &str) -> Step {
        match std::mem::take(&mut self.state) {
            GtoState::AwaitingAtomGroup => self.await_atom_group(line),
            GtoState::ReadingShell => self.read_shell(line),
            GtoState::ReadingPrimitive {
                label,
                expected,
                primitives,
            } => self.read_primitive(line, label, expected, primitives),
            GtoState::BlockComplete => {
                self.state = GtoState::BlockComplete;
                Step::Redispatch
            }
        }
    }

    fn await_atom_group(&mut self, line: &str) -> Step {
        if is_section_header(line) {
            self.state = GtoState::BlockComplete;
            return Step::Redispatch;
        }

        let columns = tokens(line);
        if columns.is_empty() {
            if self.groups.is_empty() {
                // Blank lines before the first atom group carry no structure
                return Step::Continue;
            }
            self.state = GtoState::BlockComplete;
            return Step::Complete;
        }

        match parse_integer(columns[0]) {
            Ok(sequence) if sequence >= 1 => {
                self.current = Vec::new();
                self.state = GtoState::ReadingShell;
                Step::Continue
            }
            _ => Step::Fail(format!(
                "expected an atom sequence number, found '{}'",
                line.trim()
            )),
        }
    }

    fn read_shell(&mut self, line: &str) -> Step {
        let columns = tokens(line);
        if columns.is_empty() {
            self.close_group();
            self.state = GtoState::AwaitingAtomGroup;
            return Step::Continue;
        }
        if is_section_header(line) {
            self.close_group();
            self.state = GtoState::BlockComplete;
            return Step::Redispatch;
        }
        if columns.len() < 2 {
            return Step::Fail(format!("shell record needs a label and a primitive count: '{}'", line.trim()));
        }

        let label = match canonical_shell_label(columns[0]) {
            Ok(label) => label,
            Err(e) => return Step::Fail(e.to_string()),
        };
        let expected = match parse_integer(columns[1]).map(usize::try_from) {
            Ok(Ok(count)) if (1..=MAX_SHELL_PRIMITIVES).contains(&count) => count,
            Ok(_) => {
                return Step::Fail(format!(
                    "shell {label} declares {} primitives, expected 1 to {MAX_SHELL_PRIMITIVES}",
                    columns[1]
                ));
            }
            Err(e) => return Step::Fail(e.to_string()),
        };

        self.state = GtoState::ReadingPrimitive {
            label,
            expected,
            primitives: Vec::new(),
        };
        Step::Continue
    }

    fn read_primitive(
        &mut self,
        line: &str,
        label: ShellLabel,
        expected: usize,
        mut primitives: Vec<Primitive>,
    ) -> Step {
        let values = match parse_reals(line) {
            Ok(values) => values,
            Err(e) => {
                return Step::Fail(format!(
                    "primitive {} of {} in {label} shell: {e}",
                    primitives.len() + 1,
                    expected
                ));
            }
        };

        let wanted = 1 + label.coefficient_count();
        if values.len() != wanted {
            return Step::Fail(format!(
                "primitive {} of {} in {label} shell has {} columns, expected {}",
                primitives.len() + 1,
                expected,
                values.len(),
                wanted
            ));
        }

        primitives.push(Primitive {
            exponent: values[0],
            coefficients: values[1..].to_vec(),
        });

        if primitives.len() == expected {
            self.current.push(Shell { label, primitives });
            self.state = GtoState::ReadingShell;
        } else {
            self.state = GtoState::ReadingPrimitive {
                label,
                expected,
                primitives,
            };
        }
        Step::Continue
    }

    fn close_group(&mut self) {
        self.groups.push(std::mem::take(&mut self.current));
    }

    /// End of input is only acceptable between records
    fn check_complete(&self) -> Result<(), String> {
        match &self.state {
            GtoState::ReadingPrimitive {
                label,
                expected,
                primitives,
            } => Err(format!(
                "input ended inside {label} shell after {} of {} primitives",
                primitives.len(),
                expected
            )),
            _ => Ok(()),
        }
    }

    fn into_values(mut self) -> Result<Vec<(Attribute, AttributeValue)>, String> {
        self.check_complete()?;
        if matches!(self.state, GtoState::ReadingShell) {
            self.close_group();
        }
        if self.groups.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![(Attribute::BasisShells, AttributeValue::Basis(self.groups))])
    }
}

// =============================================================================
// [MO]
// =============================================================================

#[derive(Debug)]
struct OrbitalRecord {
    symmetry: Option<String>,
    energy: Option<f64>,
    spin: SpinChannel,
    occupation: Option<f64>,
    coefficients: Vec<(usize, f64)>,
}

impl OrbitalRecord {
    fn new() -> Self {
        Self {
            symmetry: None,
            energy: None,
            spin: SpinChannel::Alpha,
            occupation: None,
            coefficients: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct MoBlock {
    orbitals: Vec<OrbitalRecord>,
    current: Option<OrbitalRecord>,
}

impl MoBlock {
    fn step(&mut self, line: &str) -> Step {
        if is_section_header(line) {
            return Step::Redispatch;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Step::Continue;
        }

        if let Some((key, value)) = trimmed.split_once('=') {
            return self.read_header(key.trim(), value.trim());
        }

        let columns = tokens(trimmed);
        if columns.len() != 2 {
            return Step::Fail(format!(
                "coefficient record has {} columns, expected 2: '{}'",
                columns.len(),
                trimmed
            ));
        }
        let Some(orbital) = self.current.as_mut() else {
            return Step::Fail("coefficient record before any orbital header".to_string());
        };
        let index = match parse_integer(columns[0]).map(usize::try_from) {
            Ok(Ok(index)) if (1..=MAX_BASIS_FUNCTIONS).contains(&index) => index,
            Ok(_) => {
                return Step::Fail(format!(
                    "basis function index {} out of range 1 to {MAX_BASIS_FUNCTIONS}",
                    columns[0]
                ));
            }
            Err(e) => return Step::Fail(e.to_string()),
        };
        match parse_real(columns[1]) {
            Ok(value) => {
                orbital.coefficients.push((index, value));
                Step::Continue
            }
            Err(e) => Step::Fail(e.to_string()),
        }
    }

    fn read_header(&mut self, key: &str, value: &str) -> Step {
        // A header after coefficients starts the next orbital
        let starts_new = self
            .current
            .as_ref()
            .is_none_or(|orbital| !orbital.coefficients.is_empty());
        if starts_new {
            if let Some(done) = self.current.take() {
                self.orbitals.push(done);
            }
            self.current = Some(OrbitalRecord::new());
        }
        let Some(orbital) = self.current.as_mut() else {
            return Step::Continue;
        };

        match key.to_ascii_lowercase().as_str() {
            "sym" => {
                let label = strip_orbital_index(value);
                orbital.symmetry = Some(canonical_symmetry(label));
            }
            "ene" => match parse_real(value) {
                Ok(energy) => orbital.energy = Some(energy),
                Err(e) => return Step::Fail(e.to_string()),
            },
            "spin" => {
                orbital.spin = if value.to_ascii_lowercase().starts_with("beta") {
                    SpinChannel::Beta
                } else {
                    SpinChannel::Alpha
                };
            }
            "occup" => match parse_real(value) {
                Ok(occupation) => orbital.occupation = Some(occupation),
                Err(e) => return Step::Fail(e.to_string()),
            },
            other => debug!("Ignoring MO header key '{}'", other),
        }
        Step::Continue
    }

    fn into_values(
        mut self,
        basis_width: Option<usize>,
    ) -> Result<Vec<(Attribute, AttributeValue)>, String> {
        if let Some(done) = self.current.take() {
            self.orbitals.push(done);
        }
        if self.orbitals.is_empty() {
            return Ok(Vec::new());
        }

        let max_index = self
            .orbitals
            .iter()
            .flat_map(|orbital| orbital.coefficients.iter().map(|(index, _)| *index))
            .max()
            .unwrap_or(0);
        let width = basis_width.unwrap_or(max_index);
        if max_index > width {
            return Err(format!(
                "coefficient index {max_index} exceeds basis dimension {width}"
            ));
        }

        let channel_count = if self
            .orbitals
            .iter()
            .any(|orbital| orbital.spin == SpinChannel::Beta)
        {
            2
        } else {
            1
        };

        let mut energies = vec![Vec::new(); channel_count];
        let mut symmetries = vec![Vec::new(); channel_count];
        let mut occupations = vec![Vec::new(); channel_count];
        let mut coefficients = vec![Vec::new(); channel_count];
        let mut all_symmetries = true;
        let mut all_occupations = true;

        for (number, orbital) in self.orbitals.into_iter().enumerate() {
            let channel = orbital.spin.index();
            let energy = orbital
                .energy
                .ok_or_else(|| format!("orbital {} has no Ene= entry", number + 1))?;
            energies[channel].push(units::hartree_to_ev(energy));

            match orbital.symmetry {
                Some(symmetry) => symmetries[channel].push(symmetry),
                None => all_symmetries = false,
            }
            match orbital.occupation {
                Some(occupation) => occupations[channel].push(occupation),
                None => all_occupations = false,
            }

            let mut row = vec![0.0; width];
            for (index, value) in orbital.coefficients {
                row[index - 1] = value;
            }
            coefficients[channel].push(row);
        }

        let mut values = vec![
            (Attribute::OrbitalEnergies, AttributeValue::SpinReals(energies)),
            (
                Attribute::OrbitalCoefficients,
                AttributeValue::SpinMatrices(coefficients),
            ),
        ];
        if all_symmetries {
            values.push((
                Attribute::OrbitalSymmetries,
                AttributeValue::SpinLabels(symmetries),
            ));
        }
        if all_occupations {
            values.push((
                Attribute::OrbitalOccupations,
                AttributeValue::SpinReals(occupations),
            ));
        }
        Ok(values)
    }
}

// =============================================================================
// [FR-NORM-COORD]
// =============================================================================

#[derive(Debug, Default)]
struct NormalModeBlock {
    modes: Vec<Vec<[f64; 3]>>,
}

impl NormalModeBlock {
    fn step(&mut self, line: &str) -> Step {
        if is_section_header(line) {
            return Step::Redispatch;
        }
        let columns = tokens(line);
        if columns.is_empty() {
            return Step::Continue;
        }
        if columns[0].eq_ignore_ascii_case("vibration") {
            self.modes.push(Vec::new());
            return Step::Continue;
        }

        let Some(mode) = self.modes.last_mut() else {
            return Step::Fail("displacement record before any 'vibration' header".to_string());
        };
        if columns.len() != 3 {
            return Step::Fail(format!(
                "displacement record has {} columns, expected 3",
                columns.len()
            ));
        }
        let mut xyz = [0.0; 3];
        for (slot, token) in xyz.iter_mut().zip(&columns) {
            match parse_real(token) {
                Ok(value) => *slot = value,
                Err(e) => return Step::Fail(e.to_string()),
            }
        }
        mode.push(units::triple_bohr_to_angstrom(xyz));
        Step::Continue
    }

    fn into_values(self) -> Result<Vec<(Attribute, AttributeValue)>, String> {
        if self.modes.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![(
            Attribute::VibrationalDisplacements,
            AttributeValue::Displacements(self.modes),
        )])
    }
}

// =============================================================================
// [GEOCONV]
// =============================================================================

#[derive(Debug, Default)]
struct GeoConvBlock {
    in_energy: bool,
    energies: Vec<f64>,
}

impl GeoConvBlock {
    fn step(&mut self, line: &str) -> Step {
        if is_section_header(line) {
            return Step::Redispatch;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Step::Continue;
        }

        match parse_real(trimmed) {
            Ok(value) => {
                if self.in_energy {
                    self.energies.push(units::hartree_to_ev(value));
                }
            }
            // Any keyword line (energy, max-force, rms-step, ...) opens a sub-block
            Err(_) => self.in_energy = trimmed.eq_ignore_ascii_case("energy"),
        }
        Step::Continue
    }

    fn into_values(self) -> Vec<(Attribute, AttributeValue)> {
        reals_value(Attribute::StepEnergies, self.energies)
    }
}
