pub use anyhow::{Context, Error, Result, anyhow, bail};
pub use log::{debug, error, info, trace, warn};
