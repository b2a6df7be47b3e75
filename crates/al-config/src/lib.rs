//! Abstraction Layer daemon configuration.
//!
//! - CLI-required fields (AL MAC, managed interfaces, ...) plus an optional
//!   TOML document's registrar/timing knobs, merged into `AlConfig`.
//! - `SharedConfig`: immutable config + `RwLock`-guarded runtime state,
//!   cheaply cloneable across the AL thread and its adapters.

pub mod al_config;
pub mod toml_config;

pub use al_config::{
    AlConfig, AlRuntimeState, AuthMode, Band, DuplicateWindowConfig, EncrMode, MultiApRoles,
    RegistrarBssConfig, SharedConfig, Timings,
};
