use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;

// @module: SRT loading, parsing and persistence

// @const: SRT timing line, tolerating '.' as millisecond separator
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d+):(\d{2}):(\d{2})[,.](\d{3})")
        .expect("timestamp regex is valid")
});

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number (1-based, as written in the file)
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text, may span several lines
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: impl Into<String>) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: text.into(),
        }
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();
        if parts.len() != 4 {
            return Err(SubtitleError::Parse(format!("Invalid timestamp format: {}", timestamp)));
        }

        let mut values = [0u64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.parse()
                .map_err(|_| SubtitleError::Parse(format!("Invalid timestamp component in {}", timestamp)))?;
        }
        let [hours, minutes, seconds, millis] = values;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(SubtitleError::Parse(format!("Invalid time components in timestamp: {}", timestamp)));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        // A blank line would end the block early
        for line in self.text.lines().filter(|line| !line.trim().is_empty()) {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

/// Ordered cue list loaded from, or destined for, an SRT file
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// File the cues were read from
    pub source_file: PathBuf,

    /// Cues in display order
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create an empty collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Wrap already parsed entries
    pub fn from_entries(source_file: PathBuf, entries: Vec<SubtitleEntry>) -> Self {
        SubtitleCollection { source_file, entries }
    }

    /// Load an SRT file, decoding as UTF-8 and retrying once with `fallback_encoding`
    pub fn load<P: AsRef<Path>>(path: P, fallback_encoding: &str) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let fallback = resolve_encoding(fallback_encoding)?;
        let bytes = fs::read(path)?;

        let content = decode_bytes(&bytes, fallback).ok_or_else(|| SubtitleError::Decode {
            path: path.to_path_buf(),
            encoding: fallback.name().to_string(),
        })?;

        let entries = Self::parse_srt_string(&content)?;
        debug!("Loaded {} cues from {:?}", entries.len(), path);

        Ok(Self::from_entries(path.to_path_buf(), entries))
    }

    /// Parse SRT format string into subtitle entries
    ///
    /// Blocks without a timing line are skipped with a warning. Cues keep
    /// file order and are renumbered from 1.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
        let mut entries: Vec<SubtitleEntry> = Vec::new();
        let mut block: Vec<&str> = Vec::new();

        for line in normalized.lines().chain(std::iter::once("")) {
            if !line.trim().is_empty() {
                block.push(line);
                continue;
            }
            if block.is_empty() {
                continue;
            }

            match Self::parse_block(&block) {
                Some((start_ms, end_ms, text)) => {
                    entries.push(SubtitleEntry::new(entries.len() + 1, start_ms, end_ms, text));
                }
                None => warn!("Skipping SRT block without timing line: {:?}", block.first()),
            }
            block.clear();
        }

        if entries.is_empty() {
            return Err(SubtitleError::Parse("No valid subtitle entries were found in the SRT content".to_string()));
        }

        let out_of_order = entries.windows(2)
            .filter(|pair| pair[1].start_time_ms < pair[0].start_time_ms)
            .count();
        if out_of_order > 0 {
            warn!("Found {} cues starting before their predecessor", out_of_order);
        }

        Ok(entries)
    }

    // Counter line is optional; the timing line is either first or second.
    fn parse_block(block: &[&str]) -> Option<(u64, u64, String)> {
        let timing_at = block.iter().take(2).position(|line| TIMESTAMP_REGEX.is_match(line))?;
        let caps = TIMESTAMP_REGEX.captures(block[timing_at])?;

        let start_ms = Self::captures_to_ms(&caps, 1)?;
        let end_ms = Self::captures_to_ms(&caps, 5)?;
        let text = block[timing_at + 1..]
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n");

        Some((start_ms, end_ms, text))
    }

    fn captures_to_ms(caps: &regex::Captures, start_idx: usize) -> Option<u64> {
        let field = |offset: usize| -> Option<u64> {
            caps.get(start_idx + offset)?.as_str().parse().ok()
        };
        Some(field(0)? * 3_600_000 + field(1)? * 60_000 + field(2)? * 1_000 + field(3)?)
    }

    /// Render the collection in SRT syntax
    pub fn to_srt_string(&self) -> String {
        self.entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Persist the collection with the given encoding
    pub fn save<P: AsRef<Path>>(&self, path: P, encoding: &'static Encoding) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let collapsed = self.entries.iter()
            .filter(|entry| entry.text.lines().any(|line| line.trim().is_empty()))
            .count();
        if collapsed > 0 {
            warn!("Removed blank lines inside {} cues so they stay one SRT block each", collapsed);
        }

        let content = self.to_srt_string();
        let (bytes, used, had_unmappable) = encoding.encode(&content);
        if had_unmappable {
            warn!("Some characters cannot be represented in {}, written as numeric references", used.name());
        }

        fs::write(path, bytes)?;
        Ok(())
    }

    /// Write subtitles to an SRT file as UTF-8
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<(), SubtitleError> {
        self.save(path, UTF_8)
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}

/// Look up an encoding by its WHATWG label (e.g. "windows-1251", "cp1251")
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, SubtitleError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| SubtitleError::UnknownEncoding(label.to_string()))
}

/// Decode as UTF-8 (BOM stripped), falling back to `fallback` when that fails
pub fn decode_bytes(bytes: &[u8], fallback: &'static Encoding) -> Option<String> {
    let without_bom = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(without_bom) {
        Ok(text) => Some(text.to_string()),
        Err(_) => {
            debug!("UTF-8 decode failed, retrying with {}", fallback.name());
            fallback
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned)
        }
    }
}
