use super::LyricsDocument;

/// Fixed spacing between consecutive synthetic timestamps
pub const LINE_INTERVAL_SECS: u32 = 5;

/// One timed subtitle line
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleLine {
    pub timestamp_secs: f64,
    pub text: String,
}

/// Synthetic timeline for plain lyrics. Not an alignment: line `i` sits at `i * 5` seconds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubtitleTrack {
    pub lines: Vec<SubtitleLine>,
}

impl SubtitleTrack {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render as LRC text, one `[mm:ss.xx]text` line per entry
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{}{}", format_timestamp(line.timestamp_secs), line.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Map every non-blank lyric line to an increasing 5-second offset from zero
pub fn generate(document: &LyricsDocument) -> SubtitleTrack {
    let lines = document
        .lines()
        .iter()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, text)| SubtitleLine {
            timestamp_secs: f64::from(index as u32 * LINE_INTERVAL_SECS),
            text: text.clone(),
        })
        .collect();

    SubtitleTrack { lines }
}

/// `[mm:ss.xx]` with hundredths
fn format_timestamp(seconds: f64) -> String {
    let total_hundredths = (seconds * 100.0).round() as u64;
    let minutes = total_hundredths / 6000;
    let secs = (total_hundredths % 6000) / 100;
    let hundredths = total_hundredths % 100;
    format!("[{:02}:{:02}.{:02}]", minutes, secs, hundredths)
}
