pub mod answers;
pub mod commands;
mod error;
pub mod identity;
pub mod input;
pub mod output;
pub mod render;
mod shell;
pub mod wizard;

pub use error::CliError;
pub use input::{CliMode, LineSource, ScriptInput};
pub use shell::{run_cli, REFERRAL_ENV, SCRIPT_ENV};
pub use wizard::{WizardOutcome, WizardShell};
