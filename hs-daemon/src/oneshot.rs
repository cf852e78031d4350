//! One-shot runner
//!
//! open, collect, close, then exactly one line: the snapshot if every step
//! succeeded, otherwise the first error.

use std::io::Write;
use tracing::{error, info};

use hs_core::{collect_snapshot, HardwareProvider, Result};
use hs_protocol::{Response, Snapshot};

use crate::output::write_response;
use crate::session::ProviderSession;
use crate::ExitStatus;

fn open_and_collect<P>(session: &mut ProviderSession<'_, P>) -> Result<Snapshot>
where
    P: HardwareProvider + ?Sized,
{
    session.open()?;
    collect_snapshot(session.provider())
}

pub fn run_once<P, W>(provider: &mut P, mut output: W) -> ExitStatus
where
    P: HardwareProvider + ?Sized,
    W: Write,
{
    let mut session = ProviderSession::new(provider);
    let collected = open_and_collect(&mut session);
    let closed = session.close();

    let result = match (collected, closed) {
        (Ok(snapshot), Ok(())) => Ok(snapshot),
        (Err(e), _) | (Ok(_), Err(e)) => Err(e),
    };

    let (response, status) = match result {
        Ok(snapshot) => {
            info!("Collected {} records", snapshot.record_count());
            (Response::from(snapshot), ExitStatus::Success)
        }
        Err(e) => {
            error!("{}", e);
            (Response::from(&e), ExitStatus::Failure)
        }
    };

    match write_response(&mut output, &response) {
        Ok(()) => status,
        Err(e) => {
            error!("Output channel closed: {}", e);
            ExitStatus::Failure
        }
    }
}
