use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::RetraceResult;

/// How the driver picks a result out of the alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Only accept an alternative that consumed the whole input
    #[serde(default = "default_true")]
    pub require_complete: bool,

    /// Stop after examining this many alternatives, unlimited when absent
    #[serde(default)]
    pub max_alternatives: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            require_complete: default_true(),
            max_alternatives: None,
        }
    }
}

impl ParseOptions {
    /// Accept the first alternative regardless of what it leaves unconsumed.
    pub fn partial() -> Self {
        Self {
            require_complete: false,
            ..Self::default()
        }
    }

    pub fn with_max_alternatives(mut self, limit: usize) -> Self {
        self.max_alternatives = Some(limit);
        self
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> RetraceResult<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let options = serde_json::from_reader(reader)?;
        Ok(options)
    }

    pub fn from_json(json: &str) -> RetraceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_true() -> bool {
    true
}
