//! Terminal rendering for odc-core types.
//!
//! Extension traits that add colored output to core types using owo_colors.

use odc_core::dashboard::RecordRef;
use odc_core::upcoming::Upcoming;
use odc_core::{
    DayCard, Event, EventStatus, Formation, FormationStatus, Occurrence, OccurrenceCount,
    OccurrenceKind, OccurrenceSource, SkippedRecord,
};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for OccurrenceKind {
    fn render(&self) -> String {
        match self {
            OccurrenceKind::Formation => "formation".cyan().to_string(),
            OccurrenceKind::Event => "event".magenta().to_string(),
        }
    }
}

impl Render for EventStatus {
    fn render(&self) -> String {
        let label = self.label();
        match self {
            EventStatus::Open => label.green().to_string(),
            EventStatus::Full => label.yellow().to_string(),
            EventStatus::Cancelled => label.red().to_string(),
            EventStatus::Postponed => label.dimmed().to_string(),
        }
    }
}

impl Render for FormationStatus {
    fn render(&self) -> String {
        match self {
            FormationStatus::Active => self.label().green().to_string(),
            FormationStatus::Inactive => self.label().dimmed().to_string(),
        }
    }
}

impl Render for Occurrence {
    fn render(&self) -> String {
        let status = match &self.source {
            OccurrenceSource::Formation { status, .. } => status.render(),
            OccurrenceSource::Event { status, .. } => status.render(),
        };
        let details = format!(
            "{} · {} · {}",
            self.category_label(),
            self.location,
            self.participants_summary()
        );

        format!(
            "{} {} [{}] {}\n      {}",
            self.time_range().dimmed(),
            self.display_title().bold(),
            self.kind().render(),
            status,
            details.dimmed()
        )
    }
}

impl Render for DayCard {
    fn render(&self) -> String {
        let day = format!(
            "{:<5} {:>2} {:<8}",
            self.weekday_label(),
            self.day_of_month(),
            self.month_label
        );
        let count = self.count.to_string();
        let count = match self.count {
            OccurrenceCount::None => count.dimmed().to_string(),
            _ => count.to_string(),
        };

        if self.is_today {
            format!("{} {}", day.bold().green(), count)
        } else {
            format!("{} {}", day, count)
        }
    }
}

impl Render for Upcoming {
    fn render(&self) -> String {
        format!(
            "{} {} {} {}",
            self.date.format("%a %-d %b").to_string().bold(),
            self.occurrence.display_title(),
            format!("({})", self.occurrence.city).dimmed(),
            self.occurrence.kind().render()
        )
    }
}

impl Render for RecordRef<'_> {
    fn render(&self) -> String {
        let date = self
            .start_date()
            .map(|d| d.format("%a %-d %b %Y").to_string())
            .unwrap_or_else(|| "no date".to_string());
        format!(
            "{} {} {}",
            self.title().bold(),
            format!("({}, {})", self.city(), date).dimmed(),
            self.kind().render()
        )
    }
}

impl Render for SkippedRecord {
    fn render(&self) -> String {
        format!(
            "{} {} {}: {}",
            "!".yellow(),
            self.kind.render(),
            self.record_id,
            self.reason
        )
    }
}

fn date_span(start: Option<chrono::NaiveDate>, end: Option<chrono::NaiveDate>) -> String {
    match (start, end) {
        (Some(s), Some(e)) if s != e => format!("{} → {}", s, e),
        (Some(s), _) => s.to_string(),
        (None, _) => "no date".to_string(),
    }
}

impl Render for Formation {
    fn render(&self) -> String {
        format!(
            "{} {} {}\n      {} · {} · {}/{} · {}",
            self.title.bold(),
            format!("[{}]", self.category.label()).cyan(),
            self.status.render(),
            date_span(self.date_start, self.date_end),
            self.city,
            self.current_participants,
            self.max_participants,
            self.id.dimmed()
        )
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let price = if self.price == 0 {
            "free".to_string()
        } else {
            format!("{} MAD", self.price)
        };
        format!(
            "{} {} {}\n      {} · {} · {} · {}",
            self.title.bold(),
            format!("[{}]", self.category).magenta(),
            self.status.render(),
            date_span(self.date_start, None),
            self.city,
            price,
            self.id.dimmed()
        )
    }
}
