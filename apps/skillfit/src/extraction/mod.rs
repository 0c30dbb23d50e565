//! Text → structured signals: skills, project statements, identity fields and
//! keyword flags. Everything here is pure and synchronous.

pub mod chunker;
pub mod profile;
pub mod projects;
pub mod skills;

pub use profile::{CandidateProfile, ProfileSignals};
pub use projects::{ProjectDetector, ProjectStatement};
pub use skills::SkillExtractor;
