// SPDX-License-Identifier: GPL-3.0-only

//! Notices shown to the user

use crate::backends::Notifier;
use crate::capture::Notice;
use tracing::warn;

/// Prints notices to stderr
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, notice: Notice) {
        warn!(?notice, "Notice raised");
        eprintln!("{}", notice.message());
    }
}
