//! Command execution implementations.

use super::convert;
use super::Commands;

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Convert {
                input,
                output,
                skip_type,
                skip_land,
                strict,
                verbose,
            } => convert::execute(
                input,
                output.as_deref(),
                skip_type,
                skip_land,
                *strict,
                *verbose,
            ),
        }
    }
}
