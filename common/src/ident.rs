use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

// The suffix group must stay non-greedy: a greedy match absorbs the trailing
// run number whenever the last suffix token ends in digits ("_numjobs16_3").
static SUMMARY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<mode>[^_]+)_(?P<blocksize>[^_]+)_(?P<driver>[^_]+)_(?P<disk>[^_]+)(?P<suffix>.*?)(?:_(?P<number>\d+))?\.json$",
    )
    .unwrap()
});

static BW_LOG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<mode>[^_]+)_(?P<blocksize>[^_]+)_(?P<driver>[^_]+)_(?P<disk>[^_]+)(?P<suffix>.*?)(?:_(?P<number>\d+))?_bw\.1\.log$",
    )
    .unwrap()
});

/// Access pattern of a run, the first field of every result filename.
/// Variants are declared in wire-token order, so sorted iteration visits
/// randread first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    Randread,
    Seqread,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Randread => "randread",
            Mode::Seqread => "seqread",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two result formats fio leaves behind: a JSON summary per run and a
/// per-job bandwidth log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Summary,
    BwLog,
}

impl FileKind {
    /// Trailing literal appended on encode. Bandwidth logs carry the fio job
    /// index as a fixed part of the name.
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Summary => ".json",
            FileKind::BwLog => "_bw.1.log",
        }
    }

    /// Coarse listing filter applied before a full parse is attempted.
    pub fn filter_suffix(&self) -> &'static str {
        match self {
            FileKind::Summary => ".json",
            FileKind::BwLog => ".log",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("filename {0:?} does not match the result naming scheme")]
    Pattern(String),
    #[error("unknown access mode {mode:?} in {filename:?}")]
    UnknownMode { filename: String, mode: String },
    #[error("run number out of range in {0:?}")]
    RunNumber(String),
}

/// Structured identity of one result file: every field the benchmark harness
/// bakes into the filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId {
    pub mode: Mode,
    pub block_size: String,
    pub driver: String,
    pub disk: String,
    /// Auxiliary options such as "_numjobs16". Empty for plain runs,
    /// otherwise starts with its own separator.
    pub suffix: String,
    /// Trial counter for repeated runs, absent when a run was not repeated.
    pub number: Option<u32>,
}

impl RunId {
    /// Filename stem shared by all trials of this identity.
    pub fn group_label(&self) -> String {
        format!(
            "{}_{}_{}_{}{}",
            self.mode, self.block_size, self.driver, self.disk, self.suffix
        )
    }

    pub fn filename(&self, kind: FileKind) -> String {
        let mut name = self.group_label();
        if let Some(number) = self.number {
            name.push_str(&format!("_{number}"));
        }
        name.push_str(kind.extension());
        name
    }

    pub fn parse(filename: &str, kind: FileKind) -> Result<Self, ParseError> {
        let pattern = match kind {
            FileKind::Summary => &SUMMARY_PATTERN,
            FileKind::BwLog => &BW_LOG_PATTERN,
        };
        let caps = pattern
            .captures(filename)
            .ok_or_else(|| ParseError::Pattern(filename.to_owned()))?;

        let mode = match &caps["mode"] {
            "randread" => Mode::Randread,
            "seqread" => Mode::Seqread,
            other => {
                return Err(ParseError::UnknownMode {
                    filename: filename.to_owned(),
                    mode: other.to_owned(),
                });
            }
        };
        let number = caps
            .name("number")
            .map(|m| {
                m.as_str()
                    .parse()
                    .map_err(|_| ParseError::RunNumber(filename.to_owned()))
            })
            .transpose()?;

        Ok(Self {
            mode,
            block_size: caps["blocksize"].to_owned(),
            driver: caps["driver"].to_owned(),
            disk: caps["disk"].to_owned(),
            suffix: caps["suffix"].to_owned(),
            number,
        })
    }

    /// Same identity pinned to a specific trial.
    pub fn with_number(&self, number: Option<u32>) -> Self {
        Self {
            number,
            ..self.clone()
        }
    }
}
