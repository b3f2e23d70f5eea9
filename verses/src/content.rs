//! Static verse metadata
//!
//! Verse texts are paraphrases of Nagarjuna's Mūlamadhyamakakārikā. Each
//! verse names the animation that illustrates it.

use crate::verses::VerseKind;

/// Equation entry with label and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

pub struct VerseInfo {
    pub chapter: u32,
    pub number: u32,
    pub title: &'static str,
    pub original_text: &'static str,
    pub concept: &'static str,
    pub parallel: &'static str,
    pub rationale: &'static str,
    pub example: &'static str,
    pub equations: &'static [Equation],
    pub kind: VerseKind,
}

pub struct Chapter {
    pub number: u32,
    pub title: &'static str,
    pub verses: &'static [VerseInfo],
}

/// Every chapter in display order
pub const CATALOGUE: &[Chapter] = &[
    Chapter {
        number: 1,
        title: "Examination of Conditions",
        verses: CHAPTER_1,
    },
    Chapter {
        number: 24,
        title: "Examination of the Noble Truths",
        verses: CHAPTER_24,
    },
];

/// Verses of all chapters in navigation order
pub fn flatten(catalogue: &'static [Chapter]) -> Vec<&'static VerseInfo> {
    catalogue.iter().flat_map(|c| c.verses.iter()).collect()
}

pub fn chapter_title(catalogue: &[Chapter], number: u32) -> Option<&'static str> {
    catalogue.iter().find(|c| c.number == number).map(|c| c.title)
}

// ============================================
// Chapter 1: Examination of Conditions
// ============================================

pub const CHAPTER_1: &[VerseInfo] = &[
    VerseInfo {
        chapter: 1,
        number: 1,
        title: "No Arising From the Four Extremes",
        original_text: "Not from itself, not from another, not from both, and not without a cause: \
            nothing anywhere has ever arisen.",
        concept: "Things do not arise with a nature fixed in advance by themselves, by something \
            else, by both together or by nothing.",
        parallel: "Whether a quantum shows a wave pattern or a particle pattern is not settled \
            inside the quantum alone; it depends on the whole experimental arrangement.",
        rationale: "The double slit makes the dependence visible: change only the question asked \
            of the quantum and the answer changes with it.",
        example: "Switch which-path observation on and the interference fringes collapse into two \
            bands.",
        equations: &[
            Equation {
                name: "Two-Slit Intensity",
                formula: "I(y) = I₀ cos²(π d y / λL) sinc²(π a y / λL)",
                description: "Fringes under the single-slit envelope",
            },
            Equation {
                name: "Fringe Spacing",
                formula: "Δy = λL / d",
                description: "Narrower slit gap, wider fringes",
            },
        ],
        kind: VerseKind::DoubleSlit,
    },
    VerseInfo {
        chapter: 1,
        number: 2,
        title: "The Four Conditions",
        original_text: "There are four conditions: the cause, the object, the immediately \
            preceding, and the dominant. A fifth there is not.",
        concept: "Whatever appears is described through the conditions it leans on, never as a \
            free-standing thing.",
        parallel: "In field theory a particle is an excitation of a field that fills all of space, \
            not a separate object placed into it.",
        rationale: "Watching excitations swell out of the field and sink back shows particles as \
            conditions of the field rather than things in it.",
        example: "Raise the field energy and more excitations ripple across the sheet.",
        equations: &[
            Equation {
                name: "Klein-Gordon",
                formula: "(∂²/∂t² − ∇² + m²) φ = 0",
                description: "Free scalar field",
            },
            Equation {
                name: "Field Quanta",
                formula: "E = ℏω (n + ½)",
                description: "Energy of n excitations of one mode",
            },
        ],
        kind: VerseKind::QuantumField,
    },
    VerseInfo {
        chapter: 1,
        number: 3,
        title: "No Essence in Conditions",
        original_text: "The own-nature of things is not found in their conditions. Where there is \
            no own-nature, there is no other-nature either.",
        concept: "Searching the conditions for a thing's essence finds nothing that could be \
            carried over into the thing.",
        parallel: "The vacuum has no particles in it, yet particle pairs keep appearing and \
            vanishing; empty space is not a container of hidden things.",
        rationale: "Virtual pairs make the point that 'empty' does not mean 'inert'.",
        example: "Turn up the fluctuation rate and watch pairs borrow energy and give it back.",
        equations: &[
            Equation {
                name: "Energy-Time Relation",
                formula: "ΔE · Δt ≳ ℏ/2",
                description: "How long a borrowed energy can last",
            },
            Equation {
                name: "Zero-Point Energy",
                formula: "E₀ = ½ ℏω",
                description: "Lowest energy of each vacuum mode",
            },
        ],
        kind: VerseKind::VacuumFluctuation,
    },
    VerseInfo {
        chapter: 1,
        number: 4,
        title: "Activity and Conditions",
        original_text: "Activity does not possess conditions, nor is there activity without them. \
            Conditions are neither without activity nor do they possess it.",
        concept: "A process and what conditions it cannot be split into an owner and a possession.",
        parallel: "The wave function does not carry a position around; a position shows up only in \
            the act of measuring.",
        rationale: "Collapsing a spread-out packet into a single spot shows that position belongs \
            to the measurement event, not to the packet.",
        example: "Press Measure: the packet contracts to one place, sampled from |ψ|².",
        equations: &[
            Equation {
                name: "Gaussian Packet",
                formula: "ψ(x) ∝ e^(−(x−x₀)²/4σ²) e^(ikx)",
                description: "Localized wave with momentum k",
            },
            Equation {
                name: "Born Rule",
                formula: "P(x) = |ψ(x)|²",
                description: "Probability density of a position outcome",
            },
        ],
        kind: VerseKind::WaveFunction,
    },
    VerseInfo {
        chapter: 1,
        number: 5,
        title: "What Makes a Condition",
        original_text: "Because these arise dependent on those, those are called conditions. So \
            long as these have not arisen, how are those not non-conditions?",
        concept: "Being a condition is a relation, not a property something holds on its own.",
        parallel: "Position and momentum are complementary: sharpening one blurs the other, so \
            neither is a fixed property waiting to be read.",
        rationale: "The phase-space cloud squeezes one way as it stretches the other, and the \
            product never drops below the floor.",
        example: "Drag the observation dial and watch Δx and Δp trade places.",
        equations: &[
            Equation {
                name: "Heisenberg",
                formula: "Δx · Δp ≥ ℏ/2",
                description: "Lower bound on joint spread",
            },
            Equation {
                name: "Squeezing",
                formula: "Δx = √(ℏ/2) eʳ,  Δp = √(ℏ/2) e⁻ʳ",
                description: "Minimum-uncertainty states",
            },
        ],
        kind: VerseKind::Uncertainty,
    },
    VerseInfo {
        chapter: 1,
        number: 6,
        title: "Neither Existent nor Non-existent",
        original_text: "A condition suits neither what exists nor what does not. For the \
            non-existent, of what would it be the condition? For the existent, what would it add?",
        concept: "Production cannot be pinned on a result that is either already there or not \
            there at all.",
        parallel: "The die's face is neither present before it lands nor absent afterwards; it \
            comes about in the landing.",
        rationale: "A roll is a short, open-ended transient that resolves into one outcome among \
            weighted possibilities.",
        example: "Roll repeatedly and build up the outcome histogram; tilt the odds with the bias \
            slider.",
        equations: &[
            Equation {
                name: "Outcome Probability",
                formula: "P(k) = w_k / Σ w_j",
                description: "Weighted faces",
            },
            Equation {
                name: "Relative Frequency",
                formula: "n_k / N → P(k)",
                description: "Histogram converges with many rolls",
            },
        ],
        kind: VerseKind::QuantumDice,
    },
    VerseInfo {
        chapter: 1,
        number: 7,
        title: "No Producing Cause",
        original_text: "When neither the existent, the non-existent, nor both are established, how \
            could anyone speak of a cause that produces?",
        concept: "Without independently established things there is nothing for a producing cause \
            to act on.",
        parallel: "Entangled particles have no individual spin, only a definite relation between \
            them.",
        rationale: "Measuring one spin settles the other without either having carried a value \
            beforehand.",
        example: "Measure the pair at different analyser angles and compare the correlation with \
            −cos θ.",
        equations: &[
            Equation {
                name: "Singlet State",
                formula: "|Ψ⁻⟩ = (|↑↓⟩ − |↓↑⟩)/√2",
                description: "Total spin zero",
            },
            Equation {
                name: "Correlation",
                formula: "E(θ) = −cos θ",
                description: "Expected product of outcomes",
            },
        ],
        kind: VerseKind::Entanglement,
    },
    VerseInfo {
        chapter: 1,
        number: 8,
        title: "Objects Without Support",
        original_text: "An existent thing is said to have no object. If a thing has no object, \
            what would an object be for?",
        concept: "Perception and its object are set up together; neither stands as a support for \
            the other.",
        parallel: "A qubit is not secretly 0 or 1. Its answer depends on the basis in which it is \
            asked.",
        rationale: "The Bloch sphere shows a continuum of states between the poles that only \
            measurement forces into one.",
        example: "Set P(|1⟩) to 0.5 for a superposition, then press Measure and watch the arrow \
            jump to a pole.",
        equations: &[
            Equation {
                name: "Qubit State",
                formula: "|ψ⟩ = α|0⟩ + β|1⟩",
                description: "Superposition of basis states",
            },
            Equation {
                name: "Bloch Sphere",
                formula: "|ψ⟩ = cos(θ/2)|0⟩ + e^(iφ) sin(θ/2)|1⟩",
                description: "Geometric representation",
            },
            Equation {
                name: "Hadamard",
                formula: "H = (1/√2)[[1, 1], [1, −1]]",
                description: "Creates equal superposition",
            },
        ],
        kind: VerseKind::Qubit,
    },
];

// ============================================
// Chapter 24: Examination of the Noble Truths
// ============================================

pub const CHAPTER_24: &[VerseInfo] = &[
    VerseInfo {
        chapter: 24,
        number: 18,
        title: "Dependent Arising Is Emptiness",
        original_text: "Whatever arises dependently is called emptiness. That is a dependent \
            designation, and it is itself the middle way.",
        concept: "Emptiness is not a void behind things but the fact that they arise dependently.",
        parallel: "Quantum coherence is not a private property; it is shared with and leaks into \
            the environment.",
        rationale: "As the oscillators lose their common phase, the interference they could show \
            fades away.",
        example: "Lower coherence or couple to the environment and watch the fringe visibility \
            drop.",
        equations: &[
            Equation {
                name: "Density Matrix Decay",
                formula: "ρ₀₁(t) = ρ₀₁(0) e^(−t/T₂)",
                description: "Off-diagonal terms vanish",
            },
            Equation {
                name: "Fringe Visibility",
                formula: "V = |⟨e^(iφ)⟩|",
                description: "Mean phasor of the ensemble",
            },
        ],
        kind: VerseKind::Decoherence,
    },
    VerseInfo {
        chapter: 24,
        number: 19,
        title: "Nothing Non-empty",
        original_text: "There is nothing that has not arisen dependently. Therefore there is \
            nothing that is not empty.",
        concept: "No exception exists: every thing lacks a standalone nature.",
        parallel: "In a condensate, individual atoms give up their separate identity and share one \
            quantum state.",
        rationale: "Cooling shows individuality as a matter of conditions: warm, the atoms are \
            many; cold, they act as one.",
        example: "Press Cool and watch the atoms gather into a single glowing cluster.",
        equations: &[
            Equation {
                name: "Bose-Einstein Distribution",
                formula: "n(E) = 1 / (e^((E−μ)/kT) − 1)",
                description: "Occupation of energy levels",
            },
            Equation {
                name: "Critical Temperature",
                formula: "T_c ∝ n^(2/3) ℏ² / m k",
                description: "Onset of condensation",
            },
        ],
        kind: VerseKind::Condensate,
    },
    VerseInfo {
        chapter: 24,
        number: 20,
        title: "Emptiness Makes Change Possible",
        original_text: "If all this were not empty there would be no arising and no ceasing, and \
            the four noble truths would not hold for you.",
        concept: "Because nothing is fixed, change, and so freedom from suffering, is possible.",
        parallel: "In string pictures the same string shows up as different particles depending on \
            how it vibrates.",
        rationale: "Switching harmonics changes what appears without changing what is there.",
        example: "Pick a harmonic and pluck: the pattern rings out and settles back.",
        equations: &[
            Equation {
                name: "Standing Wave",
                formula: "y(x,t) = A sin(nπx/L) cos(ωₙt)",
                description: "Mode n of a fixed string",
            },
            Equation {
                name: "Harmonics",
                formula: "fₙ = n f₁",
                description: "Integer multiples of the fundamental",
            },
        ],
        kind: VerseKind::StringVibration,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_animation_appears_once() {
        let verses = flatten(CATALOGUE);
        assert_eq!(verses.len(), VerseKind::ALL.len());
        for kind in VerseKind::ALL {
            assert_eq!(verses.iter().filter(|v| v.kind == kind).count(), 1);
        }
    }

    #[test]
    fn verse_numbers_match_their_chapter() {
        for chapter in CATALOGUE {
            assert!(chapter.verses.iter().all(|v| v.chapter == chapter.number));
        }
        assert_eq!(chapter_title(CATALOGUE, 24), Some("Examination of the Noble Truths"));
    }
}
