use clap::{Args, Parser, Subcommand};
use gymlog_model::aggregate::{find_autofill_source, DEFAULT_HISTOGRAM_DAYS};
use gymlog_model::{Entry, EntryPatch, Load, LoadUnit, RemoteId, SetDraft};
use gymlog_sheets::SheetsConfig;
use gymlog_sync::{EngineConfig, FileDraftStore};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "gymlog")]
#[command(about = "Workout log kept in a spreadsheet", version)]
pub struct Cli {
    /// Base URL of the sheet proxy.
    #[arg(long, env = "GYMLOG_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Per-call timeout for the sheet proxy.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Where the set in progress is kept between runs.
    #[arg(long, env = "GYMLOG_DRAFT_FILE", global = true)]
    pub draft_file: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

impl Cli {
    pub fn sheets_config(&self) -> SheetsConfig {
        let mut config = SheetsConfig::default();
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }
        config
    }

    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(secs) = self.timeout_secs {
            config.remote_timeout = Duration::from_secs(secs);
        }
        config
    }

    pub fn draft_path(&self) -> PathBuf {
        self.draft_file
            .clone()
            .unwrap_or_else(FileDraftStore::default_path)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the modifiers and verbs exercise names are built from.
    Menu,
    /// Show the log grouped by day, most recent first.
    Days {
        /// Extra pages of older days to show.
        #[arg(long, default_value_t = 0)]
        more: usize,
    },
    /// Log a set. Flags are merged over today's saved draft.
    Add(AddArgs),
    /// Change fields of a saved set.
    Edit {
        row: RemoteId,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Remove a saved set.
    Delete { row: RemoteId },
    /// Print today's sets as plain text.
    Today,
    /// Print the activity heatmap.
    Heatmap {
        #[arg(long, default_value_t = DEFAULT_HISTOGRAM_DAYS)]
        days: usize,
    },
    /// Show or discard the set in progress.
    Draft {
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct AddArgs {
    /// Verb to select; repeat for combined movements. Replaces the saved
    /// selection and autofills from the last matching set.
    #[arg(long = "verb")]
    pub verbs: Vec<String>,
    #[arg(long = "modifier")]
    pub modifiers: Vec<String>,
    /// Weight in kg, or seconds with --seconds.
    #[arg(long)]
    pub load: Option<f64>,
    /// Treat the load as a duration.
    #[arg(long)]
    pub seconds: bool,
    #[arg(long)]
    pub reps: Option<u32>,
    /// Reps in reserve.
    #[arg(long)]
    pub effort: Option<f64>,
    /// Rest before the next set, in seconds.
    #[arg(long)]
    pub rest: Option<u32>,
    #[arg(long)]
    pub note: Option<String>,
}

impl AddArgs {
    /// Merges the flags into `draft`. A new verb selection pulls the
    /// measured fields from the most recent matching set first, so explicit
    /// flags always win.
    pub fn merge_into(&self, draft: &mut SetDraft, log: &[Entry]) {
        if !self.verbs.is_empty() {
            draft.verbs = self.verbs.clone();
            if let Some(source) = find_autofill_source(log, &draft.verbs) {
                draft.apply_autofill(source);
            }
        }
        if !self.modifiers.is_empty() {
            draft.modifiers = self.modifiers.clone();
        }
        if let Some(load) = self.load {
            draft.load_value = Some(load);
            draft.load_unit = LoadUnit::Weight;
        }
        if self.seconds {
            draft.load_unit = LoadUnit::Duration;
        }
        if let Some(reps) = self.reps {
            draft.reps = Some(reps);
        }
        if let Some(effort) = self.effort {
            draft.effort = Some(effort);
        }
        if let Some(rest) = self.rest {
            draft.rest_seconds = Some(rest);
        }
        if let Some(note) = &self.note {
            draft.note = Some(note.clone());
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// Full exercise name.
    #[arg(long)]
    pub exercise: Option<String>,
    #[arg(long)]
    pub load: Option<f64>,
    #[arg(long, requires = "load")]
    pub seconds: bool,
    #[arg(long)]
    pub reps: Option<u32>,
    #[arg(long)]
    pub effort: Option<f64>,
    #[arg(long, conflicts_with = "clear_rest")]
    pub rest: Option<u32>,
    #[arg(long)]
    pub clear_rest: bool,
    #[arg(long, conflicts_with = "clear_note")]
    pub note: Option<String>,
    #[arg(long)]
    pub clear_note: bool,
}

impl EditArgs {
    pub fn to_patch(&self) -> EntryPatch {
        EntryPatch {
            exercise_name: self.exercise.clone(),
            load: self.load.map(|value| {
                if self.seconds {
                    Load::seconds(value)
                } else {
                    Load::kg(value)
                }
            }),
            reps: self.reps,
            effort: self.effort,
            rest_seconds: if self.clear_rest {
                Some(None)
            } else {
                self.rest.map(Some)
            },
            note: if self.clear_note {
                Some(None)
            } else {
                self.note.clone().map(Some)
            },
        }
    }
}
