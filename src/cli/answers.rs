use will_core::{FieldDescriptor, FieldKind, SelectOption};
use will_domain::{parse_currency_amount, Address, DateParts, FieldValue};

use crate::cli::commands::parse_percent;

/// Typed in place of an answer to blank an optional field.
pub const CLEAR_ANSWER: &str = "-";

/// Turns a typed answer into a value for `field`. Blank input is handled by
/// the caller and never reaches here.
pub fn parse_answer(field: &FieldDescriptor, raw: &str) -> Result<FieldValue, String> {
    let raw = raw.trim();
    if raw == CLEAR_ANSWER {
        return Ok(FieldValue::Empty);
    }
    match &field.kind {
        FieldKind::Text | FieldKind::LongText => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Email => {
            if raw.contains('@') && !raw.starts_with('@') && !raw.ends_with('@') {
                Ok(FieldValue::Text(raw.to_string()))
            } else {
                Err(format!("`{}` does not look like an email address", raw))
            }
        }
        FieldKind::YesNo | FieldKind::Checkbox => parse_flag(raw).map(FieldValue::Flag),
        FieldKind::Select(options) => parse_choice(options, raw),
        FieldKind::Currency => parse_currency_amount(raw)
            .map(|_| FieldValue::Text(raw.to_string()))
            .ok_or_else(|| format!("`{}` is not an amount, try e.g. 250000 or £250,000", raw)),
        FieldKind::Percentage => parse_percent(raw).map(FieldValue::Percentage),
        FieldKind::DateParts => DateParts::parse(raw)
            .map(FieldValue::Date)
            .ok_or_else(|| format!("`{}` is not a date, use DD/MM/YYYY", raw)),
        FieldKind::Address => parse_address(raw).map(FieldValue::Address),
        FieldKind::RepeatableList => Err("lists are entered one item per line".into()),
    }
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "x" => Ok(true),
        "n" | "no" | "false" => Ok(false),
        _ => Err(format!("Please answer yes or no, not `{}`", raw)),
    }
}

fn parse_choice(options: &[SelectOption], raw: &str) -> Result<FieldValue, String> {
    let by_index = raw
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| options.get(index));
    let matched = by_index.or_else(|| {
        options.iter().find(|option| {
            option.value.eq_ignore_ascii_case(raw) || option.label.eq_ignore_ascii_case(raw)
        })
    });
    match matched {
        Some(option) => Ok(FieldValue::Choice(option.value.to_string())),
        None => Err(format!(
            "`{}` is not one of the options (1-{})",
            raw,
            options.len()
        )),
    }
}

/// `line 1, city, postcode` or `line 1, line 2, city, postcode`.
fn parse_address(raw: &str) -> Result<Address, String> {
    let parts: Vec<String> = raw.split(',').map(|part| part.trim().to_string()).collect();
    let address = match parts.as_slice() {
        [line1, city, postcode] => Address {
            line1: line1.clone(),
            line2: String::new(),
            city: city.clone(),
            postcode: postcode.clone(),
        },
        [line1, line2, city, postcode] => Address {
            line1: line1.clone(),
            line2: line2.clone(),
            city: city.clone(),
            postcode: postcode.clone(),
        },
        _ => return Err("Use: line 1, [line 2,] city, postcode".into()),
    };
    Ok(address)
}

/// The current value as shown next to a prompt; `None` when nothing is set.
pub fn describe(field: &FieldDescriptor, value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Empty => None,
        FieldValue::Text(text) if text.trim().is_empty() => None,
        FieldValue::Text(text) => Some(text.clone()),
        FieldValue::Flag(flag) => match field.kind {
            FieldKind::Checkbox if !flag => None,
            _ => Some(if *flag { "yes" } else { "no" }.to_string()),
        },
        FieldValue::Choice(choice) => Some(match &field.kind {
            FieldKind::Select(options) => options
                .iter()
                .find(|option| option.value == choice.as_str())
                .map(|option| option.label.to_string())
                .unwrap_or_else(|| choice.clone()),
            _ => choice.clone(),
        }),
        FieldValue::Percentage(share) => Some(format!("{}%", share)),
        FieldValue::Date(parts) => parts.composed(),
        FieldValue::Address(address) if address.is_empty() => None,
        FieldValue::Address(address) => Some(address.to_string()),
        FieldValue::Items(0) => None,
        FieldValue::Items(count) => Some(format!("{} entered", count)),
    }
}

/// Placeholder-style hint for the expected input format.
pub fn input_hint(field: &FieldDescriptor) -> Option<String> {
    if let Some(placeholder) = field.placeholder {
        return Some(placeholder.to_string());
    }
    match &field.kind {
        FieldKind::YesNo | FieldKind::Checkbox => Some("y/n".into()),
        FieldKind::DateParts => Some("DD/MM/YYYY".into()),
        FieldKind::Address => Some("line 1, [line 2,] city, postcode".into()),
        FieldKind::Percentage => Some("0-100".into()),
        FieldKind::Select(options) => Some(
            options
                .iter()
                .enumerate()
                .map(|(index, option)| format!("{}) {}", index + 1, option.label))
                .collect::<Vec<_>>()
                .join("  "),
        ),
        FieldKind::Text
        | FieldKind::LongText
        | FieldKind::Email
        | FieldKind::Currency
        | FieldKind::RepeatableList => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use will_core::Catalog;
    use will_domain::FieldId;

    fn field(id: FieldId) -> FieldDescriptor {
        Catalog::standard()
            .sections()
            .iter()
            .flat_map(|section| section.steps.iter())
            .flat_map(|step| step.fields.iter())
            .find(|field| field.id == id)
            .cloned()
            .expect("field in catalog")
    }

    #[test]
    fn selects_accept_index_value_or_label() {
        let marital = field(FieldId::MaritalStatus);
        let by_label = parse_answer(&marital, "in a civil partnership").unwrap();
        let FieldValue::Choice(value) = &by_label else {
            panic!("expected a choice, got {:?}", by_label);
        };
        assert_eq!(parse_answer(&marital, value).unwrap(), by_label);
        assert_eq!(
            parse_answer(&marital, "1").unwrap(),
            FieldValue::Choice(
                match &marital.kind {
                    FieldKind::Select(options) => options[0].value,
                    _ => unreachable!(),
                }
                .to_string()
            )
        );
        assert!(parse_answer(&marital, "99").is_err());
    }

    #[test]
    fn addresses_need_three_or_four_parts() {
        let address = field(FieldId::Address);
        let FieldValue::Address(parsed) =
            parse_answer(&address, "1 High St, Flat 2, Leeds, LS1 1AA").unwrap()
        else {
            panic!("expected an address");
        };
        assert_eq!(parsed.line2, "Flat 2");
        assert_eq!(parsed.postcode, "LS1 1AA");
        assert!(parse_answer(&address, "1 High St, Leeds").is_err());
    }

    #[test]
    fn typed_values_are_checked() {
        assert_eq!(
            parse_answer(&field(FieldId::DateOfBirth), "07/03/1961").unwrap(),
            FieldValue::Date(DateParts::new(7, 3, 1961))
        );
        assert!(parse_answer(&field(FieldId::DateOfBirth), "31/02/1961").is_err());
        assert_eq!(
            parse_answer(&field(FieldId::EstateValue), "£325,000").unwrap(),
            FieldValue::Text("£325,000".into())
        );
        assert!(parse_answer(&field(FieldId::EstateValue), "lots").is_err());
        assert_eq!(
            parse_answer(&field(FieldId::OwnsProperty), "Yes").unwrap(),
            FieldValue::Flag(true)
        );
        assert_eq!(
            parse_answer(&field(FieldId::PartnerName), CLEAR_ANSWER).unwrap(),
            FieldValue::Empty
        );
    }

    #[test]
    fn unchecked_boxes_read_as_unset() {
        let sound_mind = field(FieldId::SoundMind);
        assert_eq!(describe(&sound_mind, &FieldValue::Flag(false)), None);
        assert_eq!(
            describe(&sound_mind, &FieldValue::Flag(true)).as_deref(),
            Some("yes")
        );
    }
}
