use uuid::Uuid;
use will_core::{
    AllocationNotice, Catalog, Collaborators, ComplexityThresholds, CoreError, FieldDescriptor,
    HydratedWizard, HydrationSource, PaymentConfirmation, ReferralCode, ReviewSummary, Stage,
    SubmissionRequest, SubmissionService, Transition, WizardEngine,
};
use will_domain::{FieldId, MaritalStatus, WillRecord};

use crate::cli::{
    answers::{describe, input_hint, parse_answer},
    commands::{is_command, parse_command, WizardCommand},
    input::{CliMode, LineSource},
    output, render, CliError,
};

/// How a wizard run ended.
#[derive(Debug)]
pub enum WizardOutcome {
    Submitted(WillRecord),
    Exited,
}

/// What the driver loop does after handling one interaction.
enum Flow {
    /// Render the current stage again.
    Continue,
    Quit,
    Submitted(WillRecord),
}

/// Result of prompting for one field.
enum Answer {
    Done,
    Command(WizardCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Children,
    Beneficiaries,
    Gifts,
}

impl ListKind {
    fn for_field(id: FieldId) -> Option<Self> {
        match id {
            FieldId::Children => Some(ListKind::Children),
            FieldId::AdditionalBeneficiaries => Some(ListKind::Beneficiaries),
            FieldId::SpecificGifts => Some(ListKind::Gifts),
            _ => None,
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            ListKind::Children => "Child's full name (blank to finish): ",
            ListKind::Beneficiaries => "Name, relationship (blank to finish): ",
            ListKind::Gifts => "Gift, recipient (blank to finish): ",
        }
    }
}

/// Drives a [`WizardEngine`] from a line-oriented input source.
pub struct WizardShell<'a> {
    engine: WizardEngine<'a>,
    input: Box<dyn LineSource + 'a>,
    collaborators: Collaborators<'a>,
    record_id: Option<Uuid>,
    referral: Option<ReferralCode>,
    unsaved: bool,
}

impl<'a> WizardShell<'a> {
    pub fn new(
        engine: WizardEngine<'a>,
        input: Box<dyn LineSource + 'a>,
        collaborators: Collaborators<'a>,
    ) -> Self {
        Self {
            engine,
            input,
            collaborators,
            record_id: None,
            referral: None,
            unsaved: false,
        }
    }

    /// Builds the shell from entry hydration, keeping the record id for submission.
    pub fn from_hydrated(
        hydrated: HydratedWizard,
        catalog: &'a Catalog,
        thresholds: ComplexityThresholds,
        input: Box<dyn LineSource + 'a>,
        collaborators: Collaborators<'a>,
    ) -> Self {
        match hydrated.source {
            HydrationSource::Fresh => output::info("Starting a new will."),
            HydrationSource::LocalSnapshot => output::info("Resuming where you left off."),
            HydrationSource::RemoteRecord(id) => output::info(format!("Editing will {}.", id)),
        }
        for warning in &hydrated.warnings {
            output::warning(warning);
        }
        let record_id = hydrated.record_id();
        let mut shell = Self::new(hydrated.into_engine(catalog, thresholds), input, collaborators);
        shell.record_id = record_id;
        shell
    }

    pub fn with_referral(mut self, referral: Option<ReferralCode>) -> Self {
        self.referral = referral;
        self
    }

    pub fn engine(&self) -> &WizardEngine<'a> {
        &self.engine
    }

    pub fn run(&mut self) -> Result<WizardOutcome, CliError> {
        loop {
            let flow = match self.engine.stage() {
                Stage::Exited => return Ok(WizardOutcome::Exited),
                Stage::Review => self.review()?,
                Stage::InProgress if self.engine.is_interstitial_pending() => {
                    self.interstitial()?
                }
                Stage::InProgress => self.step()?,
            };
            match flow {
                Flow::Continue => {}
                Flow::Quit => return Ok(WizardOutcome::Exited),
                Flow::Submitted(record) => return Ok(WizardOutcome::Submitted(record)),
            }
        }
    }

    fn step(&mut self) -> Result<Flow, CliError> {
        let Some(step) = self.engine.current_step() else {
            return Ok(Flow::Quit);
        };
        render::show_step_header(&self.engine, step);

        for field in &step.fields {
            if !self.is_relevant(field.id) {
                continue;
            }
            let answer = match ListKind::for_field(field.id) {
                Some(list) => self.collect_list(list)?,
                None => self.ask_field(field)?,
            };
            if let Answer::Command(command) = answer {
                return self.handle_command(command);
            }
        }

        let transition = self.engine.advance();
        Ok(report(transition))
    }

    /// Follow-up questions only asked when an earlier answer calls for them.
    fn is_relevant(&self, field: FieldId) -> bool {
        let personal = &self.engine.form().personal;
        match field {
            FieldId::PartnerName => matches!(
                personal.marital_status,
                Some(MaritalStatus::Married | MaritalStatus::CivilPartnership)
            ),
            FieldId::Children => personal.has_children == Some(true),
            _ => true,
        }
    }

    fn ask_field(&mut self, field: &FieldDescriptor) -> Result<Answer, CliError> {
        if field.id == FieldId::MainBeneficiaryPercentage
            && !self.engine.form().beneficiaries.additional_beneficiaries.is_empty()
        {
            render::show_allocation(&self.engine.form().beneficiaries);
        }
        loop {
            let prompt = self.field_prompt(field);
            let Some(line) = self.input.read_line(&output::prompt_label(prompt))? else {
                return Ok(Answer::Command(WizardCommand::Quit));
            };
            let trimmed = line.trim();
            if is_command(trimmed) {
                match parse_command(trimmed) {
                    Ok(command) => return Ok(Answer::Command(command)),
                    Err(message) => {
                        output::warning(message);
                        continue;
                    }
                }
            }
            if trimmed.is_empty() {
                return Ok(Answer::Done);
            }
            let value = match parse_answer(field, trimmed) {
                Ok(value) => value,
                Err(message) => {
                    output::warning(message);
                    continue;
                }
            };
            match self.engine.assign(field.id, value) {
                Ok(notice) => {
                    self.unsaved = true;
                    if let Some(notice) = notice {
                        output::notice(&notice);
                    }
                    return Ok(Answer::Done);
                }
                Err(err) => output::warning(err),
            }
        }
    }

    fn field_prompt(&self, field: &FieldDescriptor) -> String {
        let mut prompt = field.label.to_string();
        if !field.required {
            prompt.push_str(" (optional)");
        }
        if let Some(hint) = input_hint(field) {
            prompt.push_str(&format!(" [{}]", hint));
        }
        if let Some(current) = describe(field, &self.engine.form().value(field.id)) {
            prompt.push_str(&format!(" <{}>", current));
        }
        prompt.push_str(": ");
        prompt
    }

    fn collect_list(&mut self, list: ListKind) -> Result<Answer, CliError> {
        self.show_list(list);
        loop {
            let Some(line) = self.input.read_line(&output::prompt_label(list.prompt()))? else {
                return Ok(Answer::Command(WizardCommand::Quit));
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return Ok(Answer::Done);
            }
            if is_command(trimmed) {
                match parse_command(trimmed) {
                    Ok(WizardCommand::Remove { position }) => {
                        self.remove_entry(list, position);
                        self.show_list(list);
                    }
                    Ok(command) if is_allocation(&command) => {
                        self.allocate(command);
                    }
                    Ok(command) => return Ok(Answer::Command(command)),
                    Err(message) => output::warning(message),
                }
                continue;
            }
            self.add_entry(list, trimmed);
        }
    }

    fn add_entry(&mut self, list: ListKind, raw: &str) {
        if list == ListKind::Children {
            self.engine.form_mut().personal.add_child(raw);
            self.unsaved = true;
            return;
        }
        let Some((first, second)) = split_pair(raw) else {
            output::warning(match list {
                ListKind::Gifts => "Use: gift, recipient",
                _ => "Use: name, relationship",
            });
            return;
        };
        match list {
            ListKind::Beneficiaries => {
                let (_, notice) = self.engine.add_beneficiary(first, second);
                if let Some(notice) = notice {
                    output::notice(&notice);
                }
                render::show_allocation(&self.engine.form().beneficiaries);
            }
            ListKind::Gifts => {
                self.engine.form_mut().beneficiaries.add_gift(first, second);
            }
            ListKind::Children => {}
        }
        self.unsaved = true;
    }

    fn remove_entry(&mut self, list: ListKind, position: usize) {
        let index = position - 1;
        let removed = match list {
            ListKind::Children => {
                let id = self.engine.form().personal.children.get(index).map(|child| child.id);
                id.and_then(|id| self.engine.form_mut().personal.remove_child(id))
                    .map(|child| child.full_name)
            }
            ListKind::Gifts => {
                let id = self
                    .engine
                    .form()
                    .beneficiaries
                    .specific_gifts
                    .get(index)
                    .map(|gift| gift.id);
                id.and_then(|id| self.engine.form_mut().beneficiaries.remove_gift(id))
                    .map(|gift| gift.description)
            }
            ListKind::Beneficiaries => self.remove_beneficiary(position),
        };
        match removed {
            Some(name) => {
                self.unsaved = true;
                output::info(format!("Removed {}.", name));
            }
            None => output::warning(format!("There is no entry number {}.", position)),
        }
    }

    fn remove_beneficiary(&mut self, position: usize) -> Option<String> {
        let beneficiary = self
            .engine
            .form()
            .beneficiaries
            .additional_beneficiaries
            .get(position - 1)
            .map(|beneficiary| (beneficiary.id, beneficiary.full_name.clone()))?;
        self.engine.remove_beneficiary(beneficiary.0).ok()?;
        Some(beneficiary.1)
    }

    fn show_list(&self, list: ListKind) {
        let form = self.engine.form();
        match list {
            ListKind::Children => {
                for (index, child) in form.personal.children.iter().enumerate() {
                    output::info(format!("{:>2} {}", index + 1, child.full_name));
                }
            }
            ListKind::Beneficiaries => render::show_allocation(&form.beneficiaries),
            ListKind::Gifts => {
                for (index, gift) in form.beneficiaries.specific_gifts.iter().enumerate() {
                    output::info(format!(
                        "{:>2} {} to {}",
                        index + 1,
                        gift.description,
                        gift.recipient
                    ));
                }
            }
        }
    }

    /// Applies an allocation command and shows the resulting shares.
    fn allocate(&mut self, command: WizardCommand) {
        let notice: Option<AllocationNotice> = match command {
            WizardCommand::Preset(preset) => self.engine.apply_preset(preset),
            WizardCommand::Equal => {
                self.engine.distribute_equally();
                None
            }
            WizardCommand::Remaining => self.engine.distribute_remaining(),
            WizardCommand::Share { position, percent } => {
                let id = self
                    .engine
                    .form()
                    .beneficiaries
                    .additional_beneficiaries
                    .get(position - 1)
                    .map(|beneficiary| beneficiary.id);
                let Some(id) = id else {
                    output::warning(format!("There is no beneficiary number {}.", position));
                    return;
                };
                match self.engine.set_beneficiary_percentage(id, percent) {
                    Ok(notice) => notice,
                    Err(err) => {
                        output::error(err);
                        return;
                    }
                }
            }
            _ => return,
        };
        self.unsaved = true;
        if let Some(notice) = notice {
            output::notice(&notice);
        }
        render::show_allocation(&self.engine.form().beneficiaries);
    }

    fn handle_command(&mut self, command: WizardCommand) -> Result<Flow, CliError> {
        let flow = match command {
            WizardCommand::Back => report(self.engine.retreat()),
            WizardCommand::Skip => report(self.engine.skip()),
            WizardCommand::Continue => report(self.engine.continue_anyway()),
            WizardCommand::Goto(section) => report(self.engine.jump_to(section)?),
            WizardCommand::Save => {
                self.save();
                Flow::Continue
            }
            WizardCommand::Remove { position } => {
                self.remove_entry(ListKind::Beneficiaries, position);
                Flow::Continue
            }
            command @ (WizardCommand::Preset(_)
            | WizardCommand::Equal
            | WizardCommand::Remaining
            | WizardCommand::Share { .. }) => {
                self.allocate(command);
                Flow::Continue
            }
            WizardCommand::Review => {
                let summary = ReviewSummary::build(self.engine.form(), self.engine.catalog());
                render::show_review(&summary);
                Flow::Continue
            }
            WizardCommand::Submit { .. } => {
                output::warning("Finish every section before submitting; type :review to check.");
                Flow::Continue
            }
            WizardCommand::Help => {
                render::show_help(self.engine.stage() == Stage::Review);
                Flow::Continue
            }
            WizardCommand::Quit => self.quit()?,
        };
        Ok(flow)
    }

    fn interstitial(&mut self) -> Result<Flow, CliError> {
        if self
            .input
            .confirm("Continue with this will anyway?", false)?
        {
            return Ok(report(self.engine.continue_anyway()));
        }
        self.engine.dismiss_interstitial();
        output::info("You can change your answers, or type :continue at any time.");
        Ok(Flow::Continue)
    }

    fn review(&mut self) -> Result<Flow, CliError> {
        let summary = ReviewSummary::build(self.engine.form(), self.engine.catalog());
        render::show_review(&summary);
        loop {
            let Some(line) = self.input.read_line(&output::prompt_label("review: "))? else {
                return self.quit();
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let command = match parse_command(trimmed) {
                Ok(command) => command,
                Err(message) => {
                    output::warning(message);
                    continue;
                }
            };
            match command {
                WizardCommand::Submit { payment_reference } => {
                    return Ok(self.submit(payment_reference))
                }
                WizardCommand::Back
                | WizardCommand::Goto(_)
                | WizardCommand::Save
                | WizardCommand::Help
                | WizardCommand::Review
                | WizardCommand::Quit => return self.handle_command(command),
                _ => output::warning("Use :submit, :goto, :back or :quit on the review screen."),
            }
        }
    }

    fn submit(&mut self, payment_reference: String) -> Flow {
        let request = SubmissionRequest {
            form: self.engine.form(),
            record_id: self.record_id,
            payment: PaymentConfirmation::confirmed(payment_reference),
            referral: self.referral.clone(),
        };
        match SubmissionService::finalize(request, self.engine.catalog(), &self.collaborators) {
            Ok(record) => {
                self.unsaved = false;
                output::success(format!("Your will has been submitted. Reference: {}", record.id));
                Flow::Submitted(record)
            }
            Err(CoreError::IncompleteWill(outstanding)) => {
                output::error("Your will is not complete yet:");
                for line in outstanding {
                    output::warning(line);
                }
                Flow::Continue
            }
            Err(err) => {
                output::error(format!("Submission failed: {}", err));
                if let Some(record) = err.stored_record() {
                    self.record_id = Some(record);
                    output::info("Your payment is recorded. Type :submit <reference> again to retry.");
                }
                Flow::Continue
            }
        }
    }

    fn save(&mut self) {
        match self.engine.save_progress(self.collaborators.progress) {
            Ok(_) => {
                self.unsaved = false;
                output::success("Progress saved");
            }
            Err(err) => output::error(format!("Could not save progress: {}", err)),
        }
    }

    fn quit(&mut self) -> Result<Flow, CliError> {
        if self.unsaved
            && self.input.mode() == CliMode::Interactive
            && self
                .input
                .confirm("Save your progress before leaving?", true)?
        {
            self.save();
        }
        Ok(Flow::Quit)
    }
}

fn report(transition: Transition) -> Flow {
    match transition {
        Transition::Moved(_) | Transition::ExitToReview => Flow::Continue,
        Transition::Blocked(validation) => {
            render::show_validation(&validation);
            Flow::Continue
        }
        Transition::ComplexityInterstitial(reasons) => {
            render::show_complexity(&reasons);
            Flow::Continue
        }
        Transition::ExitWizard => {
            output::info("Leaving the will wizard.");
            Flow::Quit
        }
    }
}

fn is_allocation(command: &WizardCommand) -> bool {
    matches!(
        command,
        WizardCommand::Preset(_)
            | WizardCommand::Equal
            | WizardCommand::Remaining
            | WizardCommand::Share { .. }
    )
}

/// `first, second` with both halves present.
fn split_pair(raw: &str) -> Option<(String, String)> {
    let (first, second) = raw.split_once(',')?;
    let (first, second) = (first.trim(), second.trim());
    if first.is_empty() || second.is_empty() {
        return None;
    }
    Some((first.to_string(), second.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_need_both_halves() {
        assert_eq!(
            split_pair(" Ana Ruiz , Niece "),
            Some(("Ana Ruiz".into(), "Niece".into()))
        );
        assert_eq!(split_pair("Ana Ruiz"), None);
        assert_eq!(split_pair("Ana Ruiz, "), None);
    }

    #[test]
    fn list_fields_map_to_their_kind() {
        assert_eq!(
            ListKind::for_field(FieldId::SpecificGifts),
            Some(ListKind::Gifts)
        );
        assert_eq!(ListKind::for_field(FieldId::FullName), None);
    }
}
