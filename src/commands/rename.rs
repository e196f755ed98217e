//! Rename subcommand: preview, confirm, commit.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::cli::RenameArgs;
use crate::fs_ops::rename::{apply_plan, build_plan, EntryAction, RenameCounts, RenamePlan};
use crate::fs_ops::NameTransform;
use crate::output;
use crate::selector::FileSelector;

pub struct RenameCmd {
    selector: FileSelector,
    transform: NameTransform,
    skip_preview: bool,
}

impl RenameCmd {
    pub fn new(args: &RenameArgs) -> Result<Self> {
        let transform = NameTransform::new(&args.re_pattern, &args.substitute)
            .with_context(|| format!("Invalid pattern '{}'", args.re_pattern))?;
        Ok(Self {
            selector: args.selection.selector(),
            transform,
            skip_preview: args.skip_preview,
        })
    }

    pub fn run(&self) -> Result<()> {
        let files = self.selector.collect()?;
        if files.is_empty() {
            output::print_user("Nothing to process.");
            return Ok(());
        }

        if !self.skip_preview {
            let plan = build_plan(&files, &self.transform)?;
            output::print_user("Preview:");
            print_plan(&plan);
            print_summary(&plan.counts());
            output::print_rule();
            if !output::confirm("If you want to rename for real, give me a \"yes\" or \"y\" now!")? {
                output::print_user("Will not rename for now. See you soon.");
                return Ok(());
            }
        }

        // Fresh plan against live disk state for the commit pass.
        let plan = build_plan(&files, &self.transform)?;
        print_plan(&plan);
        let counts = apply_plan(&plan)?;
        print_summary(&counts);
        Ok(())
    }
}

fn print_plan(plan: &RenamePlan) {
    for entry in &plan.entries {
        let name = entry
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match entry.action {
            EntryAction::Rename => {
                let target = entry
                    .resolved
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if entry.had_conflict {
                    output::print_user(&format!(
                        "{name} -> {target} {}",
                        "(name conflict resolved)".yellow()
                    ));
                } else {
                    output::print_user(&format!("{name} -> {target}"));
                }
            }
            EntryAction::BadCharacters => {
                let chars: String = entry.illegal.iter().collect();
                output::print_user(&format!(
                    "{name} -> {} {}",
                    entry.proposed,
                    format!("(skipped: illegal characters '{chars}')").red()
                ));
            }
            EntryAction::NoOp => {
                output::print_user(&format!("{name} (unchanged)"));
            }
        }
    }
}

fn print_summary(counts: &RenameCounts) {
    output::print_user(&format!(
        "Renamed {} of {} files ({} conflicts resolved, {} unchanged).",
        counts.renames, counts.total, counts.conflicts, counts.no_ops
    ));
    if counts.bad_characters > 0 {
        output::print_warn(&format!(
            "{} out of {} files not renamed due to illegal characters.",
            counts.bad_characters, counts.total
        ));
    }
}
