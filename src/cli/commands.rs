use shell_words::split;
use strsim::levenshtein;
use will_core::Preset;
use will_domain::SectionKey;

/// Every command the wizard prompt understands, for completion and help.
pub const COMMAND_NAMES: &[&str] = &[
    ":back",
    ":skip",
    ":save",
    ":goto",
    ":preset",
    ":equal",
    ":remaining",
    ":share",
    ":remove",
    ":continue",
    ":review",
    ":submit",
    ":help",
    ":quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardCommand {
    Back,
    Skip,
    Save,
    Goto(SectionKey),
    Preset(Preset),
    Equal,
    Remaining,
    /// 1-based position in the additional beneficiary list.
    Share { position: usize, percent: u32 },
    Remove { position: usize },
    Continue,
    Review,
    Submit { payment_reference: String },
    Help,
    Quit,
}

/// Lines starting with `:` are commands; anything else is an answer.
pub fn is_command(line: &str) -> bool {
    line.trim_start().starts_with(':')
}

pub fn parse_command(line: &str) -> Result<WizardCommand, String> {
    let tokens = split(line.trim()).map_err(|err| err.to_string())?;
    let Some((name, args)) = tokens.split_first() else {
        return Err("empty command".into());
    };
    let name = name.to_ascii_lowercase();
    let command = match name.as_str() {
        ":back" | ":b" => WizardCommand::Back,
        ":skip" => WizardCommand::Skip,
        ":save" => WizardCommand::Save,
        ":goto" | ":edit" => WizardCommand::Goto(parse_section(single(&name, args)?)?),
        ":preset" => WizardCommand::Preset(single(&name, args)?.parse()?),
        ":equal" => WizardCommand::Equal,
        ":remaining" => WizardCommand::Remaining,
        ":share" => match args {
            [position, percent] => WizardCommand::Share {
                position: parse_position(position)?,
                percent: parse_percent(percent)?,
            },
            _ => return Err("usage: :share <number> <percent>".into()),
        },
        ":remove" => WizardCommand::Remove {
            position: parse_position(single(&name, args)?)?,
        },
        ":continue" => WizardCommand::Continue,
        ":review" => WizardCommand::Review,
        ":submit" => WizardCommand::Submit {
            payment_reference: single(&name, args)?.to_string(),
        },
        ":help" | ":h" => WizardCommand::Help,
        ":quit" | ":q" | ":exit" => WizardCommand::Quit,
        other => return Err(unknown_with_suggestion("command", other, COMMAND_NAMES)),
    };
    Ok(command)
}

fn single<'a>(name: &str, args: &'a [String]) -> Result<&'a str, String> {
    match args {
        [value] => Ok(value.as_str()),
        _ => Err(format!("{} takes exactly one argument", name)),
    }
}

pub fn parse_section(raw: &str) -> Result<SectionKey, String> {
    raw.parse::<SectionKey>().map_err(|_| {
        let names: Vec<&str> = SectionKey::ALL.iter().map(|key| key.as_str()).collect();
        unknown_with_suggestion("section", raw, &names)
    })
}

pub fn parse_percent(raw: &str) -> Result<u32, String> {
    let value: u32 = raw
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("`{}` is not a whole percentage", raw))?;
    if value > 100 {
        return Err("a share cannot be more than 100%".into());
    }
    Ok(value)
}

fn parse_position(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err(format!("`{}` is not a list position", raw)),
    }
}

fn unknown_with_suggestion(kind: &str, input: &str, known: &[&str]) -> String {
    let needle = input.to_ascii_lowercase();
    let best = known
        .iter()
        .map(|name| (levenshtein(name, &needle), *name))
        .min_by_key(|(distance, _)| *distance);
    match best {
        Some((distance, name)) if distance <= 3 => {
            format!("Unknown {} `{}`. Did you mean `{}`?", kind, input, name)
        }
        _ => format!("Unknown {} `{}`", kind, input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            parse_command(":goto beneficiaries"),
            Ok(WizardCommand::Goto(SectionKey::Beneficiaries))
        );
        assert_eq!(
            parse_command(":preset 33/33/33"),
            Ok(WizardCommand::Preset(Preset::ThreeWay))
        );
        assert_eq!(
            parse_command(":share 2 40%"),
            Ok(WizardCommand::Share {
                position: 2,
                percent: 40
            })
        );
        assert_eq!(
            parse_command(":submit \"pay 42\""),
            Ok(WizardCommand::Submit {
                payment_reference: "pay 42".into()
            })
        );
    }

    #[test]
    fn suggests_close_section_names() {
        let err = parse_command(":goto executers").unwrap_err();
        assert_eq!(err, "Unknown section `executers`. Did you mean `executors`?");
    }

    #[test]
    fn suggests_close_commands() {
        let err = parse_command(":sive").unwrap_err();
        assert_eq!(err, "Unknown command `:sive`. Did you mean `:save`?");
    }

    #[test]
    fn rejects_out_of_range_shares() {
        assert!(parse_command(":share 1 140").is_err());
        assert!(parse_command(":share 0 10").is_err());
    }
}
