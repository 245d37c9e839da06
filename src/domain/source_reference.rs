use std::fmt;
use std::str::FromStr;

/// What kind of material a podcast is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Url,
    RawText,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Url => "URL",
            SourceKind::RawText => "RAW_TEXT",
        }
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "URL" => Ok(SourceKind::Url),
            "RAW_TEXT" | "RAWTEXT" | "TEXT" => Ok(SourceKind::RawText),
            _ => Err(format!("Invalid source kind: {}", s)),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    pub kind: SourceKind,
    pub value: String,
}

impl SourceReference {
    pub fn url(value: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Url,
            value: value.into(),
        }
    }

    pub fn raw_text(value: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::RawText,
            value: value.into(),
        }
    }
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}
