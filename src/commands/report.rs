use chrono::{DateTime, Datelike, Local, NaiveTime, TimeZone, Utc};
use clap::{Args, Subcommand};

use crate::db::Store;

/// Daily and monthly totals
#[derive(Args)]
pub struct ReportCommand {
    #[command(subcommand)]
    pub command: ReportSubcommand,
}

#[derive(Subcommand)]
pub enum ReportSubcommand {
    /// Entries and total for the current day
    Today,

    /// Total since the first of the current month
    Month,
}

/// First instant of the day containing `now`, in the local timezone.
/// Entries stamped exactly at the boundary are included in the window.
pub fn start_of_day(now: DateTime<Local>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .unwrap_or(now)
        .with_timezone(&Utc)
}

/// First instant of the month containing `now`, in the local timezone.
pub fn start_of_month(now: DateTime<Local>) -> DateTime<Utc> {
    let first = now
        .date_naive()
        .with_day(1)
        .unwrap_or_else(|| now.date_naive())
        .and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&first)
        .earliest()
        .unwrap_or(now)
        .with_timezone(&Utc)
}

impl ReportCommand {
    pub async fn run(&self, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ReportSubcommand::Today => {
                let cutoff = start_of_day(Local::now());
                let entries = store.entries().list_since(cutoff).await?;

                if entries.is_empty() {
                    println!("No entries today");
                    return Ok(());
                }

                for entry in &entries {
                    println!("#{:<5} {}", entry.id, entry);
                }
                let total: f64 = entries.iter().map(|e| e.total).sum();
                println!("\nToday's total: {:.2}", total);
                Ok(())
            }

            ReportSubcommand::Month => {
                let cutoff = start_of_month(Local::now());
                let total = store.entries().total_since(cutoff).await?;
                println!("Month total: {:.2}", total);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_start_of_day_is_local_midnight() {
        let now = Local::now();
        let cutoff = start_of_day(now).with_timezone(&Local);

        assert_eq!(cutoff.date_naive(), now.date_naive());
        assert_eq!(cutoff.hour(), 0);
        assert_eq!(cutoff.minute(), 0);
        assert_eq!(cutoff.second(), 0);
        assert!(cutoff <= now);
    }

    #[test]
    fn test_start_of_month_is_first_day() {
        let now = Local::now();
        let cutoff = start_of_month(now).with_timezone(&Local);

        assert_eq!(cutoff.day(), 1);
        assert_eq!(cutoff.month(), now.month());
        assert_eq!(cutoff.hour(), 0);
        assert!(cutoff <= now);
    }

    #[test]
    fn test_start_of_month_not_after_start_of_day() {
        let now = Local::now();
        assert!(start_of_month(now) <= start_of_day(now));
    }
}
