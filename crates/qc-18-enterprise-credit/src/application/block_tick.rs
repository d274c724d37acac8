//! Per-block hook: tally raised orders, then complete accepted ones.

use super::approval::ApprovalEngine;
use crate::domain::{EnterpriseError, Result, TickReport};
use crate::ports::BlockHook;
use crate::store::{LockedBalanceLedger, ModuleContext};
use tracing::{error, info};

/// Drives the two block-start phases in a single frame.
#[derive(Clone)]
pub struct BlockTickProcessor {
    ctx: ModuleContext,
    engine: ApprovalEngine,
    locked: LockedBalanceLedger,
    audit_after_tick: bool,
}

impl BlockTickProcessor {
    /// Create a processor. With `audit_after_tick` the conservation audit
    /// runs before the tick commits.
    pub fn new(ctx: ModuleContext, audit_after_tick: bool) -> Self {
        Self {
            engine: ApprovalEngine::new(ctx.clone()),
            locked: LockedBalanceLedger::new(ctx.clone()),
            ctx,
            audit_after_tick,
        }
    }

    /// Run both phases. Tally always precedes completion.
    pub fn run(&self, now: u64) -> Result<TickReport> {
        let report = self.ctx.atomically(|| {
            let tally = self.engine.tally_decisions(now)?;
            let completion = self.engine.complete_accepted(now)?;

            if self.audit_after_tick {
                let (msg, broken) = self.locked.audit()?;
                if broken {
                    error!(block_time = now, "{}", msg);
                    return Err(EnterpriseError::InvariantViolation(msg));
                }
            }

            Ok(TickReport {
                completed: completion.completed,
                skipped: tally.skipped + completion.skipped,
                ..tally
            })
        })?;

        info!(
            block_time = now,
            accepted = report.accepted,
            rejected = report.rejected,
            stale_rejected = report.stale_rejected,
            still_raised = report.still_raised,
            completed = report.completed,
            skipped = report.skipped,
            "Enterprise block tick complete"
        );
        Ok(report)
    }
}

impl BlockHook for BlockTickProcessor {
    fn on_block_start(&self, now: u64) -> Result<TickReport> {
        self.run(now)
    }
}
