//! Text layout for wizard screens. Builders return lines so they can be
//! tested; the `show_*` functions print them through the output helpers.

use will_core::{
    AllocationTracker, ComplexityReason, ReviewSummary, StepDescriptor, StepValidation,
    WizardEngine,
};
use will_domain::{Beneficiaries, SectionKey};

use crate::cli::output;

/// Heading, progress line and guidance for the current step.
pub fn step_header_lines(engine: &WizardEngine<'_>, step: &StepDescriptor) -> Vec<String> {
    let catalog = engine.catalog();
    let cursor = engine.cursor();
    let steps_in_section = catalog.step_count(cursor.section);
    let mut lines = Vec::new();
    if let Some((number, count)) = catalog.section_position(cursor.section) {
        lines.push(format!(
            "Section {} of {}: {}",
            number,
            count,
            cursor.section.title()
        ));
    }
    lines.push(format!(
        "Step {} of {} ({}% complete)",
        cursor.step + 1,
        steps_in_section,
        catalog.progress_percent(cursor)
    ));
    lines.push(step.description.to_string());
    if let Some(help) = step.help {
        lines.push(format!("Help: {}", help));
    }
    if let Some(skip) = &step.skip {
        lines.push(format!("Type :skip for \"{}\"", skip.label));
    }
    lines
}

pub fn show_step_header(engine: &WizardEngine<'_>, step: &StepDescriptor) {
    output::section(step.title);
    for line in step_header_lines(engine, step) {
        output::info(line);
    }
}

/// Main plus additional shares with the running total.
pub fn allocation_lines(beneficiaries: &Beneficiaries) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(main) = &beneficiaries.main_beneficiary {
        let name = if main.full_name.trim().is_empty() {
            "Main beneficiary"
        } else {
            main.full_name.as_str()
        };
        lines.push(format!("   {:<28} {:>3}%", name, beneficiaries.main_percentage()));
    }
    for (index, extra) in beneficiaries.additional_beneficiaries.iter().enumerate() {
        lines.push(format!(
            "{:>2} {:<28} {:>3}%",
            index + 1,
            format!("{} ({})", extra.full_name, extra.relationship),
            extra.percentage
        ));
    }
    let total = AllocationTracker::total(beneficiaries);
    lines.push(format!("   {:<28} {:>3}%", "Total", total));
    let unallocated = AllocationTracker::unallocated(beneficiaries);
    if unallocated > 0 {
        lines.push(format!("   {}% not yet allocated", unallocated));
    }
    lines
}

pub fn show_allocation(beneficiaries: &Beneficiaries) {
    for line in allocation_lines(beneficiaries) {
        output::info(line);
    }
}

pub fn show_validation(validation: &StepValidation) {
    for message in validation.messages() {
        output::warning(message);
    }
}

pub fn show_complexity(reasons: &[ComplexityReason]) {
    output::section("Your estate may need specialist advice");
    for reason in reasons {
        output::warning(format!("- {}", reason));
    }
    output::info("You can continue with this will, but a solicitor may be better placed to help.");
    output::info("Type :continue to carry on, or change your answers.");
}

pub fn review_lines(summary: &ReviewSummary) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .sections
        .iter()
        .map(|section| {
            let status = if section.is_complete() {
                "complete".to_string()
            } else {
                format!("{} step(s) need attention", section.pending.len())
            };
            format!("{:<14} {}", section.key.title(), status)
        })
        .collect();
    lines.push(format!("Estate allocated: {}%", summary.allocation_total));
    lines
}

pub fn show_review(summary: &ReviewSummary) {
    output::section("Review your will");
    for line in review_lines(summary) {
        output::info(line);
    }
    if summary.is_complete() {
        output::success("Everything is ready. Type :submit <payment reference> to finish.");
    } else {
        for line in summary.outstanding() {
            output::warning(line);
        }
        if let Some(section) = summary.first_incomplete_section() {
            output::info(format!("Type :goto {} to fix it.", section.as_str()));
        }
    }
    if summary.is_under_allocated() {
        output::warning("Less than 100% of your estate has been given away.");
    }
}

pub fn help_lines(stage_review: bool) -> Vec<String> {
    let sections: Vec<&str> = SectionKey::ALL.iter().map(|key| key.as_str()).collect();
    let mut lines = vec![
        "Answer each question and press Enter; a blank answer keeps the current value.".into(),
        "Type - to clear an optional answer.".into(),
        ":back                go to the previous step".into(),
        ":skip                skip an optional step".into(),
        ":save                save your progress".into(),
        format!(":goto <section>      jump to {}", sections.join(", ")),
    ];
    if stage_review {
        lines.push(":submit <reference>  pay and submit your will".into());
    } else {
        lines.extend([
            ":preset <split>      50/50, 33/33/33, 25x4, 60/40, 70/30, 80/20".into(),
            ":equal               share the estate equally".into(),
            ":remaining           give what is left to the first beneficiary".into(),
            ":share <n> <percent> set an additional beneficiary's share".into(),
            ":remove <n>          remove an additional beneficiary".into(),
            ":continue            carry on past the specialist advice notice".into(),
            ":review              see what is left to do".into(),
        ]);
    }
    lines.push(":quit                leave the wizard".into());
    lines
}

pub fn show_help(stage_review: bool) {
    output::section("Commands");
    for line in help_lines(stage_review) {
        output::info(line);
    }
}
