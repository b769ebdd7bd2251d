use anyhow::Result;

use crate::SAMPLE_SNIPPET;

use super::super::CommandOutput;

pub struct SampleController;

impl SampleController {
    pub fn new() -> Self {
        Self
    }

    pub async fn sample(&self) -> Result<CommandOutput> {
        Ok(CommandOutput::ok(SAMPLE_SNIPPET))
    }
}

impl Default for SampleController {
    fn default() -> Self {
        Self::new()
    }
}
