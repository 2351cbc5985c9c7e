//! Command execution against a running sync engine.

use crate::cli::{AddArgs, Cli, Command, EditArgs};
use crate::render;
use anyhow::{bail, Context, Result};
use gymlog_model::aggregate::{
    bucket_by_day, day_report, rolling_histogram, visible_buckets, DEFAULT_THRESHOLDS,
};
use gymlog_model::{Clock, EntryId, Menu, RemoteId, SetDraft, SystemClock};
use gymlog_sheets::SheetsClient;
use gymlog_sync::{
    create_sync_engine, persist_draft, restore_draft, DraftStore, FileDraftStore, LogHandle,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything a command needs.
struct Session {
    handle: LogHandle,
    clock: Arc<dyn Clock>,
    drafts: FileDraftStore,
}

pub async fn run(cli: Cli) -> Result<()> {
    let client =
        SheetsClient::new(cli.sheets_config()).context("failed to set up the sheet client")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (handle, engine) = create_sync_engine(Arc::new(client), clock.clone(), cli.engine_config());
    let task = tokio::spawn(engine.run());

    let session = Session {
        handle,
        clock,
        drafts: FileDraftStore::new(cli.draft_path()),
    };
    debug!("draft file at {}", session.drafts.path().display());

    let result = session.dispatch(cli.cmd).await;

    let _ = session.handle.shutdown().await;
    let _ = task.await;
    result
}

impl Session {
    async fn dispatch(&self, cmd: Command) -> Result<()> {
        if !matches!(cmd, Command::Draft { .. }) {
            self.handle
                .load()
                .await
                .context("could not load the log from the sheet")?;
        }

        match cmd {
            Command::Menu => {
                println!("{}", render::menu(&self.handle.snapshot().menu));
                Ok(())
            }
            Command::Days { more } => self.days(more),
            Command::Add(args) => self.add(args).await,
            Command::Edit { row, fields } => self.edit(row, fields).await,
            Command::Delete { row } => self.delete(row).await,
            Command::Today => self.today(),
            Command::Heatmap { days } => self.heatmap(days),
            Command::Draft { clear } => self.draft(clear),
        }
    }

    fn days(&self, more: usize) -> Result<()> {
        let snapshot = self.handle.snapshot();
        let buckets = bucket_by_day(&snapshot.entries, self.clock.as_ref());
        let visible = visible_buckets(&buckets, more);

        if visible.is_empty() {
            println!("no sets logged yet");
            return Ok(());
        }
        println!("{}", render::days(visible, self.clock.as_ref()));
        let hidden = buckets.len() - visible.len();
        if hidden > 0 {
            println!("... {hidden} earlier days (--more {})", more + 1);
        }
        Ok(())
    }

    async fn add(&self, args: AddArgs) -> Result<()> {
        let snapshot = self.handle.snapshot();
        let mut draft = restore_draft(&self.drafts, self.clock.as_ref())
            .context("could not read the saved draft")?
            .unwrap_or_default();
        args.merge_into(&mut draft, &snapshot.entries);
        warn_off_menu(&draft, &snapshot.menu);

        // Saved before the append so a failed write keeps the form.
        persist_draft(&self.drafts, self.clock.as_ref(), &draft)
            .context("could not save the draft")?;

        let outcome = self.handle.append(draft.clone()).await?;
        let at = outcome
            .persisted
            .map(|id| id.to_string())
            .unwrap_or_else(|| "a pending row".to_string());
        println!(
            "logged {} set {} at {at}",
            draft.exercise_name(),
            outcome.set_number
        );
        Ok(())
    }

    async fn edit(&self, row: RemoteId, fields: EditArgs) -> Result<()> {
        let patch = fields.to_patch();
        if patch.is_empty() {
            bail!("nothing to change; pass at least one field flag");
        }
        let entry = self.handle.update(EntryId::Remote(row), patch).await?;
        println!("{}", render::entry_line(&entry, self.clock.as_ref()));
        Ok(())
    }

    async fn delete(&self, row: RemoteId) -> Result<()> {
        self.handle.delete(EntryId::Remote(row)).await?;
        println!("deleted row {row}; later rows have moved up");
        Ok(())
    }

    fn today(&self) -> Result<()> {
        let snapshot = self.handle.snapshot();
        let report = day_report(&snapshot.entries, self.clock.today(), self.clock.as_ref());
        if report.is_empty() {
            println!("no sets logged today");
        } else {
            println!("{report}");
        }
        Ok(())
    }

    fn heatmap(&self, days: usize) -> Result<()> {
        let snapshot = self.handle.snapshot();
        let histogram =
            rolling_histogram(&snapshot.entries, days, &DEFAULT_THRESHOLDS, self.clock.as_ref());
        println!("{}", render::heatmap(&histogram));
        Ok(())
    }

    fn draft(&self, clear: bool) -> Result<()> {
        if clear {
            self.drafts.clear().context("could not remove the draft")?;
            println!("draft cleared");
            return Ok(());
        }
        match restore_draft(&self.drafts, self.clock.as_ref())? {
            Some(draft) => println!("{}", render::draft(&draft)),
            None => println!("no draft for today"),
        }
        Ok(())
    }
}

fn warn_off_menu(draft: &SetDraft, menu: &Menu) {
    if menu.is_empty() {
        return;
    }
    for verb in draft.verbs.iter().filter(|v| !menu.has_verb(v)) {
        warn!("verb {verb:?} is not on the menu");
    }
    for modifier in draft.modifiers.iter().filter(|m| !menu.has_modifier(m)) {
        warn!("modifier {modifier:?} is not on the menu");
    }
}
