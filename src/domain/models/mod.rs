pub mod config;
pub mod enforcement;
pub mod regulation_event;
pub mod regulation_state;
pub mod strictness;

pub use config::{Config, DatabaseConfig, LoggingConfig, RegulationConfig, SessionConfig};
pub use enforcement::{BehaviorCheck, BehaviorEnforcement, Capability, PolicyDecision};
pub use regulation_event::{EventType, RegulationEvent};
pub use regulation_state::{
    clamp_trust_score, net_impact, Recalculation, RegulationState, SubjectKey, WindowCounters,
};
pub use strictness::{StrictnessLevel, StrictnessLevelConfig, LEVEL_CONFIGS, MAX_TRUST_SCORE};
