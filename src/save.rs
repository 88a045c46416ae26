//! Numbered save slots and the append-only save-details log.
//!
//! Each plot kind saves into its own folder (`Saved Simple Plots`,
//! `Saved Log Plots`). Files are named `<stem> - #<n>.png`, where `n` is the
//! first ordinal, counting from 1, with no existing file. Every save appends a
//! block to `<KIND>_PLOT_DETAILS.txt` in the same folder.

use crate::models::{PlotKind, VariablePair};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const RECORD_RULE: &str = "------------------------------------------------------";

impl PlotKind {
    /// `Simple` or `Log`, as used in folder and file names.
    pub fn save_name(self) -> &'static str {
        match self {
            PlotKind::Simple => "Simple",
            PlotKind::Logged => "Log",
        }
    }

    /// Folder this kind saves into, relative to the save root.
    pub fn dir_name(self) -> String {
        format!("Saved {} Plots", self.save_name())
    }

    /// Name of the save-details log inside [`PlotKind::dir_name`].
    pub fn details_file(self) -> String {
        format!("{}_PLOT_DETAILS.txt", self.save_name().to_uppercase())
    }
}

/// How a saved figure is labelled in its file name and log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveLabel {
    pub kind: PlotKind,
    pub count: usize,
    pub is_default: bool,
}

impl SaveLabel {
    pub fn new(kind: PlotKind, count: usize, is_default: bool) -> Self {
        Self {
            kind,
            count,
            is_default,
        }
    }

    /// `Default` for the default pair set, otherwise the pair count and kind (`2 Simple`).
    pub fn tag(&self) -> String {
        if self.is_default {
            "Default".to_string()
        } else {
            format!("{} {}", self.count, self.kind.save_name())
        }
    }

    pub fn plural(&self) -> &'static str {
        if self.count > 1 { "s" } else { "" }
    }

    /// File name without the ordinal, e.g. `Default Simple Plots` or `1 Log Plot`.
    pub fn file_stem(&self) -> String {
        let head = if self.is_default {
            format!("Default {}", self.kind.save_name())
        } else {
            self.tag()
        };
        format!("{head} Plot{}", self.plural())
    }

    pub fn file_name(&self, ordinal: u32) -> String {
        format!("{} - #{ordinal}.png", self.file_stem())
    }
}

/// First ordinal from 1 upward whose file does not exist in `dir`.
///
/// Gaps are filled: if `#2` of `#1..#3` was deleted, the next slot is `#2`.
pub fn next_free_slot(dir: &Path, label: &SaveLabel) -> u32 {
    let mut n = 1;
    while dir.join(label.file_name(n)).exists() {
        n += 1;
    }
    n
}

/// A completed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPlot {
    pub path: PathBuf,
    pub ordinal: u32,
    pub record: String,
}

/// Log block for one save.
pub fn record_text(
    label: &SaveLabel,
    ordinal: u32,
    pairs: &[VariablePair],
    emphasis: Option<&str>,
    when: NaiveDateTime,
) -> String {
    let emph = emphasis
        .map(|e| format!("{} emphasized -", e.replace('_', " ")))
        .unwrap_or_default();
    let vars: Vec<String> = pairs.iter().map(ToString::to_string).collect();
    format!(
        "{} - #{ordinal} - {emph}\n{}\n- Figure Created on {}\n{RECORD_RULE}\n",
        label.file_stem(),
        vars.join("\n"),
        when.format("%d-%m-%Y at %H:%M:%S"),
    )
}

/// Pick the next free slot in `target_dir`, write the figure there with `render`,
/// then append a record to the kind's details log.
///
/// `target_dir` is created when missing; failing to create it is returned as an error.
pub fn allocate_and_record<F>(
    kind: PlotKind,
    pairs: &[VariablePair],
    is_default: bool,
    target_dir: &Path,
    emphasis: Option<&str>,
    render: F,
) -> Result<SavedPlot>
where
    F: FnOnce(&Path) -> Result<()>,
{
    fs::create_dir_all(target_dir)
        .with_context(|| format!("could not create {}", target_dir.display()))?;

    let label = SaveLabel::new(kind, pairs.len(), is_default);
    let ordinal = next_free_slot(target_dir, &label);
    let path = target_dir.join(label.file_name(ordinal));
    render(&path)?;

    let record = record_text(&label, ordinal, pairs, emphasis, Local::now().naive_local());
    let log_path = target_dir.join(kind.details_file());
    let mut details = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("could not open {}", log_path.display()))?;
    details.write_all(record.as_bytes())?;

    log::info!("saved {} to {}", label.file_stem(), path.display());
    Ok(SavedPlot {
        path,
        ordinal,
        record,
    })
}

/// Result of removing a save folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(PathBuf),
    /// Nothing to delete; carries the message shown to the user.
    Missing(String),
}

/// Remove the save folder of `kind` under `root`, with everything in it.
pub fn delete_save_dir(root: &Path, kind: PlotKind) -> io::Result<DeleteOutcome> {
    let dir = root.join(kind.dir_name());
    match fs::remove_dir_all(&dir) {
        Ok(()) => Ok(DeleteOutcome::Deleted(dir)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(DeleteOutcome::Missing(format!(
            "No '{}' folder exists in the current directory, and so could not be deleted.",
            kind.dir_name()
        ))),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn labels() {
        let d = SaveLabel::new(PlotKind::Simple, 3, true);
        assert_eq!(d.tag(), "Default");
        assert_eq!(d.file_name(1), "Default Simple Plots - #1.png");

        let two = SaveLabel::new(PlotKind::Simple, 2, false);
        assert_eq!(two.tag(), "2 Simple");
        assert_eq!(two.file_stem(), "2 Simple Plots");

        let one = SaveLabel::new(PlotKind::Logged, 1, false);
        assert_eq!(one.plural(), "");
        assert_eq!(one.file_name(7), "1 Log Plot - #7.png");
    }

    #[test]
    fn record_layout() {
        let when = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap();
        let label = SaveLabel::new(PlotKind::Logged, 1, false);
        let text = record_text(
            &label,
            3,
            &[VariablePair::new("CerebrumVolume", "CerebellumVolume")],
            Some("Homo_sapiens"),
            when,
        );
        assert_eq!(
            text,
            "1 Log Plot - #3 - Homo sapiens emphasized -\n\
             (CerebrumVolume, CerebellumVolume)\n\
             - Figure Created on 05-03-2024 at 14:07:09\n\
             ------------------------------------------------------\n"
        );
    }

    #[test]
    fn dir_and_log_names() {
        assert_eq!(PlotKind::Simple.dir_name(), "Saved Simple Plots");
        assert_eq!(PlotKind::Logged.dir_name(), "Saved Log Plots");
        assert_eq!(PlotKind::Simple.details_file(), "SIMPLE_PLOT_DETAILS.txt");
        assert_eq!(PlotKind::Logged.details_file(), "LOG_PLOT_DETAILS.txt");
    }
}
