//! Scoped provider acquisition
//!
//! A [`ProviderSession`] owns the obligation to close the provider. It closes
//! exactly once: explicitly through [`ProviderSession::close`], or on drop if
//! the caller never got that far (early return, failed open, panic unwind).

use tracing::warn;

use hs_core::{HardwareProvider, HwsenseError, Result};

pub struct ProviderSession<'a, P: HardwareProvider + ?Sized> {
    provider: &'a mut P,
    closed: bool,
}

impl<'a, P: HardwareProvider + ?Sized> ProviderSession<'a, P> {
    pub fn new(provider: &'a mut P) -> Self {
        Self {
            provider,
            closed: false,
        }
    }

    /// Open the provider. Whatever the backend reports, the error comes back
    /// as [`HwsenseError::ProviderOpen`].
    pub fn open(&mut self) -> Result<()> {
        self.provider.open().map_err(|e| match e {
            HwsenseError::ProviderOpen(_) => e,
            other => HwsenseError::open(other.to_string()),
        })
    }

    pub fn provider(&mut self) -> &mut P {
        &mut *self.provider
    }

    /// Close the provider; later calls (and the drop) are no-ops
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.provider.close()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<'a, P: HardwareProvider + ?Sized> Drop for ProviderSession<'a, P> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("provider close on drop failed: {}", e);
        }
    }
}
