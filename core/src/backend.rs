//! Traits for backends.

use crate::error::Result;
use crate::platform::{Platform, Toolkit};

/// A backend implementation, e.g. GTK or WPF.
///
/// A backend describes itself, loads whatever native library it needs, and populates a
/// [`Platform`] with one handler factory per widget it implements.
pub trait Backend {
    /// Identifier used for explicit selection, e.g. `"gtk"`.
    fn id(&self) -> &str;

    /// The toolkit family, from which the platform's capability queries derive.
    fn toolkit(&self) -> Toolkit;

    /// Loads the native toolkit.
    ///
    /// Must fail (or may panic) if the toolkit is unavailable on this machine. Called once
    /// before [`add_to`](Backend::add_to), and by [`Platform::is_valid`].
    fn load(&self) -> Result<()> {
        Ok(())
    }

    /// Registers a handler factory for every supported widget.
    fn add_to(&self, platform: &mut Platform);
}
