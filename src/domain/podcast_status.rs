use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PodcastStatus {
    Processing,
    Success,
    Failed,
}

impl PodcastStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PodcastStatus::Processing => "PROCESSING",
            PodcastStatus::Success => "SUCCESS",
            PodcastStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PodcastStatus::Success | PodcastStatus::Failed)
    }
}

impl FromStr for PodcastStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROCESSING" => Ok(PodcastStatus::Processing),
            "SUCCESS" => Ok(PodcastStatus::Success),
            "FAILED" => Ok(PodcastStatus::Failed),
            _ => Err(format!("Invalid podcast status: {}", s)),
        }
    }
}

impl fmt::Display for PodcastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
