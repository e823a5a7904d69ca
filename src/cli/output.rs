//! Output formatting for CLI commands
//!
//! Provides utilities for formatting command output in human-readable
//! or JSON formats. Supports colored output (respects NO_COLOR env var).

use crate::core::types::Chunk;

/// Color scheme for CLI output
pub mod colors {
    use colored::{ColoredString, Colorize};

    /// Style for labels/headers
    pub fn label(s: &str) -> ColoredString {
        s.bold()
    }

    /// Style for document ids
    pub fn document_id(s: &str) -> ColoredString {
        s.cyan()
    }

    /// Style for file paths
    pub fn file_path(s: &str) -> ColoredString {
        s.blue()
    }

    /// Style for numbers/counts
    pub fn number(s: &str) -> ColoredString {
        s.yellow()
    }

    pub fn content_type(s: &str) -> ColoredString {
        s.magenta()
    }

    pub fn tag(s: &str) -> ColoredString {
        s.green()
    }

    /// Style for success messages
    pub fn success(s: &str) -> ColoredString {
        s.green()
    }

    /// Style for warning messages
    pub fn warning(s: &str) -> ColoredString {
        s.yellow()
    }

    /// Style for error messages
    pub fn error(s: &str) -> ColoredString {
        s.red().bold()
    }

    /// Style for dim/secondary text
    pub fn dim(s: &str) -> ColoredString {
        s.dimmed()
    }
}

/// Format bytes into human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{:.1} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{b} B"),
    }
}

/// Format duration into human-readable string
pub fn format_duration(secs: f64) -> String {
    if secs >= 60.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs - (mins * 60.0);
        format!("{mins:.0}m {remaining_secs:.1}s")
    } else if secs >= 1.0 {
        format!("{secs:.2}s")
    } else {
        let ms = secs * 1000.0;
        format!("{ms:.0}ms")
    }
}

/// Format relative time (e.g., "2h ago", "3d ago")
pub fn format_relative_time(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    let duration = chrono::Utc::now().signed_duration_since(*timestamp);

    if duration.num_seconds() < 0 {
        return "in the future".to_string();
    }

    let (days, hours, mins) = (
        duration.num_days(),
        duration.num_hours(),
        duration.num_minutes(),
    );

    if days > 0 {
        format!("{days}d ago")
    } else if hours > 0 {
        format!("{hours}h ago")
    } else if mins > 0 {
        format!("{mins}m ago")
    } else {
        "just now".to_string()
    }
}

/// First `max_lines` lines of `text`, each cut to `max_width` chars
pub fn preview_lines(text: &str, max_lines: usize, max_width: usize) -> Vec<String> {
    text.lines()
        .take(max_lines)
        .map(|line| {
            if line.chars().count() > max_width {
                let cut: String = line.chars().take(max_width.saturating_sub(3)).collect();
                format!("{cut}...")
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Print one chunk as a header line plus an indented preview
pub fn print_chunk(rank: usize, chunk: &Chunk, show_content: bool) {
    let meta = &chunk.metadata;
    let tags: Vec<String> = meta.tags.iter().map(|t| format!("#{t}")).collect();

    println!(
        "[{}] {} {} {} {} {}",
        colors::number(&rank.to_string()),
        colors::document_id(&chunk.id),
        colors::dim(&format!("lines {}-{}", meta.start_line, meta.end_line)),
        colors::content_type(meta.content_type.as_str()),
        colors::tag(&tags.join(" ")),
        colors::dim(&format!("modified {}", format_relative_time(&meta.modified_at)))
    );

    if show_content {
        for line in preview_lines(&chunk.content, 5, 100) {
            println!("    {}", colors::dim(&line));
        }
        println!();
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{}", colors::success(message));
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{}: {}", colors::warning("Warning"), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{}: {}", colors::error("Error"), message);
}

/// Print a header/title
pub fn print_header(title: &str) {
    println!("{}", colors::label(title));
}
