//! Quantum Verses
//!
//! Interactive quantum-mechanics visualizations, each paired with a verse of
//! Nagarjuna's Mūlamadhyamakakārikā:
//! - Double slit, quantum field and vacuum fluctuations
//! - Wave packets, uncertainty and quantum dice
//! - Entanglement and the Bloch-sphere qubit
//! - Decoherence, condensation and string vibration

pub mod animation;
pub mod color;
pub mod config;
pub mod content;
pub mod controls;
pub mod error;
pub mod host;
pub mod panel_ui;
pub mod particles;
pub mod quantum;
pub mod renderer;
pub mod scene;
pub mod shapes;
pub mod verses;

pub use animation::{Countdown, FrameClock, Stage, Tween, VerseAnimation, VerseContext};
pub use config::{AppConfig, Cli};
pub use content::{Chapter, VerseInfo, CATALOGUE};
pub use controls::{Control, ControlEvent, ControlPanel, Slider};
pub use error::{VerseError, VerseResult};
pub use host::SceneHost;
pub use particles::{Particle, ParticlePool};
pub use scene::{Geometry, ObjectId, Scene};
pub use verses::VerseKind;
