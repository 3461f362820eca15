// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::error::Result;

pub enum Transition<S, R> {
    Next(S, R),
    Done(R),
}

/// One phase of a command exchange. Steps block on the transport.
pub trait StateMachine<Ctx, Resp>: Sized {
    fn step(&self, ctx: &mut Ctx) -> Resp;
}

pub trait StateMachineCtx<Ctx, Out = ()>: Sized {
    fn execute(&mut self) -> Result<Out>;
}
