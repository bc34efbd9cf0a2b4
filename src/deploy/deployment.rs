// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: Carries the target slot id and a running report of what was delivered.

use std::marker::PhantomData;

use crate::types::DeployId;

use super::state::{Activated, Resolved};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub id: DeployId,
    pub secrets: usize,
    pub function_bytes: usize,
    pub statics: usize,
}

/// A deployment in progress, parameterized by its current state.
///
/// Each phase method consumes the deployment and returns it in the next
/// state, so phases can only run in order and a failed phase leaves nothing
/// to continue from.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) report: DeployReport,
    pub(crate) _state: PhantomData<S>,
}

impl Deployment<Resolved> {
    /// Start a run against the slot `id`.
    pub fn new(id: DeployId) -> Self {
        Deployment {
            report: DeployReport {
                id,
                secrets: 0,
                function_bytes: 0,
                statics: 0,
            },
            _state: PhantomData,
        }
    }
}

impl<S> Deployment<S> {
    /// The slot this run deploys to.
    pub fn id(&self) -> &DeployId {
        &self.report.id
    }

    pub(crate) fn transition<T>(self) -> Deployment<T> {
        Deployment {
            report: self.report,
            _state: PhantomData,
        }
    }
}

impl Deployment<Activated> {
    /// Finish the deployment, returning its report.
    pub fn finish(self) -> DeployReport {
        self.report
    }
}
