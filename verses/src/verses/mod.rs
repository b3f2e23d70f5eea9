//! Verse animation modules and their factory

pub mod condensate;
pub mod decoherence;
pub mod double_slit;
pub mod entanglement;
pub mod quantum_dice;
pub mod quantum_field;
pub mod qubit;
pub mod string_vibration;
pub mod uncertainty;
pub mod vacuum_fluctuation;
pub mod wave_function;

pub use condensate::Condensate;
pub use decoherence::Decoherence;
pub use double_slit::DoubleSlit;
pub use entanglement::Entanglement;
pub use quantum_dice::QuantumDice;
pub use quantum_field::QuantumField;
pub use qubit::{QubitVerse, StateClass};
pub use string_vibration::StringVibration;
pub use uncertainty::Uncertainty;
pub use vacuum_fluctuation::VacuumFluctuation;
pub use wave_function::WaveFunction;

use crate::animation::VerseAnimation;

/// Which animation a verse shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerseKind {
    DoubleSlit,
    QuantumField,
    VacuumFluctuation,
    WaveFunction,
    Uncertainty,
    QuantumDice,
    Entanglement,
    Qubit,
    Decoherence,
    Condensate,
    StringVibration,
}

impl VerseKind {
    pub const ALL: [VerseKind; 11] = [
        VerseKind::DoubleSlit,
        VerseKind::QuantumField,
        VerseKind::VacuumFluctuation,
        VerseKind::WaveFunction,
        VerseKind::Uncertainty,
        VerseKind::QuantumDice,
        VerseKind::Entanglement,
        VerseKind::Qubit,
        VerseKind::Decoherence,
        VerseKind::Condensate,
        VerseKind::StringVibration,
    ];

    /// Fresh animation seeded from the OS
    pub fn create(self) -> Box<dyn VerseAnimation> {
        match self {
            VerseKind::DoubleSlit => Box::new(DoubleSlit::new()),
            VerseKind::QuantumField => Box::new(QuantumField::new()),
            VerseKind::VacuumFluctuation => Box::new(VacuumFluctuation::new()),
            VerseKind::WaveFunction => Box::new(WaveFunction::new()),
            VerseKind::Uncertainty => Box::new(Uncertainty::new()),
            VerseKind::QuantumDice => Box::new(QuantumDice::new()),
            VerseKind::Entanglement => Box::new(Entanglement::new()),
            VerseKind::Qubit => Box::new(QubitVerse::new()),
            VerseKind::Decoherence => Box::new(Decoherence::new()),
            VerseKind::Condensate => Box::new(Condensate::new()),
            VerseKind::StringVibration => Box::new(StringVibration::new()),
        }
    }

    /// Fresh animation with a fixed seed, for reproducible runs
    pub fn create_seeded(self, seed: u64) -> Box<dyn VerseAnimation> {
        match self {
            VerseKind::DoubleSlit => Box::new(DoubleSlit::with_seed(seed)),
            VerseKind::QuantumField => Box::new(QuantumField::with_seed(seed)),
            VerseKind::VacuumFluctuation => Box::new(VacuumFluctuation::with_seed(seed)),
            VerseKind::WaveFunction => Box::new(WaveFunction::with_seed(seed)),
            VerseKind::Uncertainty => Box::new(Uncertainty::with_seed(seed)),
            VerseKind::QuantumDice => Box::new(QuantumDice::with_seed(seed)),
            VerseKind::Entanglement => Box::new(Entanglement::with_seed(seed)),
            VerseKind::Qubit => Box::new(QubitVerse::with_seed(seed)),
            VerseKind::Decoherence => Box::new(Decoherence::with_seed(seed)),
            VerseKind::Condensate => Box::new(Condensate::with_seed(seed)),
            VerseKind::StringVibration => Box::new(StringVibration::new()),
        }
    }
}
