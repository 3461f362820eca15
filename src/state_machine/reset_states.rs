// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::{debug, warn};

use crate::{
    client::{client::AtaClient, common::ScsiTransport},
    control_block::{
        request_sense_ext::request_sense_ext_request,
        reset_write_pointer::{ResetTarget, reset_write_pointer_request},
    },
    error::{Result, ZacError},
    models::{
        ata_registers::{AtaRegisterSnapshot, decode_ata_registers},
        outcome::{Outcome, classify},
        sense_data::{SenseResult, decode_sense},
    },
    state_machine::common::{StateMachine, StateMachineCtx, Transition},
};

/// Everything learned while resetting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetReport {
    pub target: ResetTarget,
    /// Sense of RESET WRITE POINTER itself.
    pub sense: SenseResult,
    /// Registers read back by REQUEST SENSE DATA EXT, when it was issued.
    pub registers: Option<AtaRegisterSnapshot>,
    /// Triple the outcome was decided on.
    pub final_sense: SenseResult,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub struct ResetCtx<'c, T> {
    client: &'c mut AtaClient<T>,
    pub target: ResetTarget,

    sense: Option<SenseResult>,
    report: Option<ResetReport>,
    state: Option<ResetStates>,
}

impl<'c, T: ScsiTransport> ResetCtx<'c, T> {
    pub fn new(client: &'c mut AtaClient<T>, target: ResetTarget) -> Self {
        Self {
            client,
            target,
            sense: None,
            report: None,
            state: Some(ResetStates::Issue(Issue)),
        }
    }

    fn issue_reset(&mut self) -> Result<Outcome> {
        let req = reset_write_pointer_request(self.target, self.client.cfg.transport.reset_timeout);
        let done = self.client.submit_ata_command(&req, &mut [])?;

        let s = decode_sense(&done.sense)?;
        let outcome = classify(s);
        debug!(reset = ?self.target, ?s, ?outcome, "RESET WRITE POINTER sense");

        self.sense = Some(s);
        if outcome == Outcome::Success {
            self.report = Some(ResetReport {
                target: self.target,
                sense: s,
                registers: None,
                final_sense: s,
                outcome,
            });
        }
        Ok(outcome)
    }

    /// Read the deferred sense back through the ATA registers.
    fn diagnose(&mut self) -> Result<()> {
        let first = self.sense.ok_or(ZacError::Internal("reset was not issued"))?;
        let first_outcome = classify(first);

        let req = request_sense_ext_request(self.client.cfg.transport.reset_timeout);
        let done = self.client.submit_ata_command(&req, &mut [])?;

        let registers = match decode_ata_registers(&done.sense) {
            Ok(regs) => {
                debug!(?regs, "REQUEST SENSE DATA EXT registers");
                Some(regs)
            },
            Err(e) if first_outcome == Outcome::AtaInfoAvailable => return Err(e.into()),
            Err(e) => {
                warn!("could not decode REQUEST SENSE DATA EXT registers: {e}");
                None
            },
        };

        let final_sense = match (first_outcome, registers) {
            (Outcome::AtaInfoAvailable, Some(regs)) => regs.sense_triple(),
            _ => first,
        };
        let outcome = classify(final_sense);
        debug!(?final_sense, ?outcome, "RESET WRITE POINTER outcome");

        self.report = Some(ResetReport {
            target: self.target,
            sense: first,
            registers,
            final_sense,
            outcome,
        });
        Ok(())
    }
}

#[derive(Debug)]
pub struct Issue;
#[derive(Debug)]
pub struct Diagnose;

#[derive(Debug)]
pub enum ResetStates {
    Issue(Issue),
    Diagnose(Diagnose),
}

type ResetStepOut = Transition<ResetStates, Result<()>>;

impl<T: ScsiTransport> StateMachine<ResetCtx<'_, T>, ResetStepOut> for Issue {
    fn step(&self, ctx: &mut ResetCtx<'_, T>) -> ResetStepOut {
        match ctx.issue_reset() {
            Ok(Outcome::Success) => Transition::Done(Ok(())),
            Ok(_) => Transition::Next(ResetStates::Diagnose(Diagnose), Ok(())),
            Err(e) => Transition::Done(Err(e)),
        }
    }
}

impl<T: ScsiTransport> StateMachine<ResetCtx<'_, T>, ResetStepOut> for Diagnose {
    fn step(&self, ctx: &mut ResetCtx<'_, T>) -> ResetStepOut {
        Transition::Done(ctx.diagnose())
    }
}

impl<T: ScsiTransport> StateMachineCtx<ResetCtx<'_, T>, ResetReport> for ResetCtx<'_, T> {
    /// Runs the exchange and returns the report, whatever the drive decided.
    /// Use [`ResetReport::outcome`] to tell success from refusal.
    fn execute(&mut self) -> Result<ResetReport> {
        debug!(reset = ?self.target, "Loop RESET WRITE POINTER");

        loop {
            let state = self
                .state
                .take()
                .ok_or(ZacError::Internal("state must be set ResetCtx"))?;
            let tr = match state {
                ResetStates::Issue(s) => s.step(self),
                ResetStates::Diagnose(s) => s.step(self),
            };

            match tr {
                Transition::Next(next, r) => {
                    r?;
                    self.state = Some(next);
                },
                Transition::Done(r) => {
                    r?;
                    return self
                        .report
                        .take()
                        .ok_or(ZacError::Internal("no reset report in ctx"));
                },
            }
        }
    }
}
