pub mod backend;
pub mod cli;
pub mod command;
pub mod config;
pub mod control;
pub mod controller;
pub mod diagnostics;
pub mod executor;
pub mod formatter;
pub mod location;
pub mod locator;
pub mod script;
pub mod selector;
pub mod variables;
pub mod waiter;

pub use backend::{Backend, BackendError, ElementHandle, HighlightStyle, NavigationResult};
pub use config::ReplayConfig;
pub use control::{RunControl, RunSignal, RunState};
pub use controller::{Controller, ControllerError};
pub use diagnostics::{Diagnostics, RunEvent};
pub use executor::{Interpreter, RunReport};
pub use script::{CommandRecord, Script, ScriptError};
pub use selector::{Selector, SelectorKind};
pub use variables::{VarValue, VariableStore, substitute};
