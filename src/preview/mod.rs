//! Document surfaces.
//!
//! A surface receives the rewritten, self-contained document and returns a
//! handle; dropping the handle releases whatever the surface allocated.
//!
//! | Surface           | Handle     | Release                      |
//! |-------------------|------------|------------------------------|
//! | `TempFileSurface` | `TempPath` | deletes the temporary file   |
//! | `WriteSurface`    | `()`       | none, the output file stays  |

mod lease;
mod surface;

pub use lease::PreviewLease;
pub use surface::{TempFileSurface, WriteSurface};

use std::io;

/// Sink for rendered documents.
pub trait PreviewSurface {
    /// Resource kept alive until the grace delay has passed.
    type Handle: Send + 'static;

    /// Present `document`; `name` is the file name it came from.
    fn open(&self, document: &str, name: &str) -> io::Result<Self::Handle>;
}
