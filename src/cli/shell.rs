use std::{env, io};

use tracing::info;
use uuid::Uuid;
use will_config::{default_data_root, Config, ConfigManager, Theme};
use will_core::{
    Catalog, Collaborators, ComplexityThresholds, CoreError, EntryRequest, IdentityProvider,
    ReferralCode, WizardEntry,
};
use will_storage_json::{JsonProgressStore, JsonWillRecordStore, OutboxDispatcher, StoragePaths};

use crate::cli::{
    identity::EnvIdentity,
    input::{CliMode, InteractiveInput, LineSource, ScriptInput},
    output::{self, OutputPreferences},
    wizard::{WizardOutcome, WizardShell},
    CliError,
};
use crate::utils::build_info;

/// Set to read answers from stdin, one per line, without a line editor.
pub const SCRIPT_ENV: &str = "MYWILL_CLI_SCRIPT";
/// Partner referral code attached to submitted wills.
pub const REFERRAL_ENV: &str = "MYWILL_REFERRAL";

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    version: bool,
    help: bool,
    list: bool,
    show_config: bool,
    edit: Option<Uuid>,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, CliError> {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--version" | "-V" => parsed.version = true,
                "--help" | "-h" => parsed.help = true,
                "--list" => parsed.list = true,
                "--config" => parsed.show_config = true,
                "--edit" => {
                    let raw = args.next().ok_or_else(|| {
                        CliError::InvalidArguments("--edit needs a will id".into())
                    })?;
                    let id = Uuid::parse_str(&raw).map_err(|_| {
                        CliError::InvalidArguments(format!("`{}` is not a will id", raw))
                    })?;
                    parsed.edit = Some(id);
                }
                other => {
                    return Err(CliError::InvalidArguments(format!(
                        "unknown argument `{}` (try --help)",
                        other
                    )))
                }
            }
        }
        Ok(parsed)
    }
}

const USAGE: &str = "\
Usage: mywill_cli [--edit <will-id> | --list | --config | --version]

Without arguments the wizard resumes saved progress or starts a new will.
  --edit <will-id>  edit a stored will you own (needs MYWILL_USER)
  --list            list your stored wills
  --config          show the config file location and the settings in effect
  --version         print build information";

pub fn run_cli() -> Result<(), CliError> {
    let args = CliArgs::parse(env::args().skip(1))?;
    if args.version {
        println!("{}", build_info::current().summary());
        return Ok(());
    }
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let manager = ConfigManager::with_base_dir(default_data_root())?;
    let config = manager.load_or_init()?;
    crate::init_with_filter(config.log_filter.as_deref());
    if args.show_config {
        for line in config_lines(&manager, &config) {
            println!("{}", line);
        }
        return Ok(());
    }

    let mode = if env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    output::set_preferences(OutputPreferences {
        plain: config.accessibility.plain_output || mode == CliMode::Script,
        high_contrast: config.accessibility.high_contrast,
        icons: config.theme == Theme::Iconic,
    });

    let paths = StoragePaths::under(&config.resolve_data_root());
    let progress = JsonProgressStore::new(paths.progress_root.clone())?;
    let records = JsonWillRecordStore::with_retention(&paths, config.record_backup_retention)?;
    let dispatcher = OutboxDispatcher::new(paths.outbox_root.clone())?;
    let identity = EnvIdentity::from_env();

    if args.list {
        return list_records(&records, &identity);
    }

    let collaborators = Collaborators {
        progress: &progress,
        records: &records,
        identity: &identity,
        dispatcher: &dispatcher,
    };
    let request = match args.edit {
        Some(id) => EntryRequest::EditRecord(id),
        None => EntryRequest::Resume,
    };
    let catalog = Catalog::standard();
    let hydrated = WizardEntry::open(request, catalog, &collaborators)?;
    let thresholds = ComplexityThresholds {
        complex_assets_skip: config.complex_assets_skip_threshold,
        high_value_estate: config.high_value_estate_threshold,
    };
    let input: Box<dyn LineSource> = match mode {
        CliMode::Script => Box::new(ScriptInput::new(io::stdin().lock())),
        CliMode::Interactive => Box::new(InteractiveInput::new()?),
    };
    let referral = env::var(REFERRAL_ENV)
        .ok()
        .filter(|code| !code.trim().is_empty())
        .map(ReferralCode::new);

    let mut shell = WizardShell::from_hydrated(hydrated, catalog, thresholds, input, collaborators)
        .with_referral(referral);
    match shell.run()? {
        WizardOutcome::Submitted(record) => info!(record = %record.id, "wizard finished"),
        WizardOutcome::Exited => info!("wizard exited"),
    }
    Ok(())
}

fn config_lines(manager: &ConfigManager, config: &Config) -> Vec<String> {
    vec![
        format!("config file:        {}", manager.config_path().display()),
        format!("data directory:     {}", config.resolve_data_root().display()),
        format!("locale / currency:  {} / {}", config.locale, config.currency),
        format!(
            "skip complex assets below {}{}",
            config.currency_symbol, config.complex_assets_skip_threshold
        ),
        format!(
            "refer estates above       {}{}",
            config.currency_symbol, config.high_value_estate_threshold
        ),
        format!("record backups kept: {}", config.record_backup_retention),
        format!("theme:              {}", config.theme),
    ]
}

fn list_records(records: &JsonWillRecordStore, identity: &EnvIdentity) -> Result<(), CliError> {
    let user = identity
        .current_identity()
        .ok_or(CoreError::Unauthenticated)?;
    let wills = records.list_records_for(&user.id)?;
    if wills.is_empty() {
        output::info("You have no stored wills.");
        return Ok(());
    }
    for will in wills {
        output::info(format!(
            "{}  {:<9}  {}  {}",
            will.id,
            will.status,
            will.updated_at.format("%Y-%m-%d %H:%M"),
            will.full_name
        ));
    }
    Ok(())
}
