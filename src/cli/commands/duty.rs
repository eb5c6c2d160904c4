//! Duty rotation preview

use std::path::Path;

use idir::api::DutyPreviewData;
use idir::core::ports::{FuneralRepository, MemberRepository};
use idir::core::services::{assign_duties, build_roster};
use idir::output::{DutyPreviewResult, OutputMode};

use super::{load_config, open_store};

/// Print the duties the next funeral would receive; nothing is saved
pub fn duty_preview(config: Option<&Path>, mode: OutputMode) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let store = open_store(&config)?;

    let state = store.rotation_state()?;
    let roster = build_roster(&MemberRepository::list(store.as_ref())?);
    let plan = assign_duties(
        &roster,
        state.last_assigned_id,
        &state.pending_carry_over,
        &config.rotation_policy(),
    );

    DutyPreviewResult(DutyPreviewData {
        start_after_id: state.last_assigned_id,
        carry_over: state.pending_carry_over.into_iter().collect(),
        plan,
    })
    .render(mode);
    Ok(())
}
