//! Schema CLI for walletd.
//!
//! `migration [up|down|fresh|refresh|reset|status] [steps]`, against
//! `WALLETD_DATABASE_URL` (or `DATABASE_URL`), defaulting to the local
//! `walletd.db` used by the sample settings. `down` rolls back one migration
//! unless told otherwise.

use sea_orm::Database;
use sea_orm_migration::prelude::*;

const USAGE: &str = "usage: migration [up|down|fresh|refresh|reset|status] [steps]";

fn database_url() -> String {
    std::env::var("WALLETD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| "sqlite:./walletd.db?mode=rwc".to_string())
}

fn usage() -> ! {
    eprintln!("{USAGE}");
    std::process::exit(2)
}

/// Command and optional step count; `None` on a malformed step count.
fn parse_args(mut args: impl Iterator<Item = String>) -> Option<(String, Option<u32>)> {
    let command = args.next().unwrap_or_else(|| "up".to_string());
    let steps = match args.next() {
        Some(raw) => Some(raw.parse::<u32>().ok()?),
        None => None,
    };
    Some((command, steps))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some((command, steps)) = parse_args(std::env::args().skip(1)) else {
        usage()
    };

    let db = Database::connect(database_url()).await?;

    match (command.as_str(), steps) {
        ("up", steps) => migration::Migrator::up(&db, steps).await?,
        ("down", steps) => migration::Migrator::down(&db, steps.or(Some(1))).await?,
        ("fresh", None) => migration::Migrator::fresh(&db).await?,
        ("refresh", None) => migration::Migrator::refresh(&db).await?,
        ("reset", None) => migration::Migrator::reset(&db).await?,
        ("status", None) => migration::Migrator::status(&db).await?,
        _ => usage(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> impl Iterator<Item = String> {
        raw.iter().map(|arg| ToString::to_string(arg)).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn no_arguments_means_up() {
        assert_eq!(parse_args(args(&[])), Some(("up".to_string(), None)));
    }

    #[test]
    fn step_count_is_parsed() {
        assert_eq!(
            parse_args(args(&["down", "2"])),
            Some(("down".to_string(), Some(2)))
        );
    }

    #[test]
    fn malformed_step_count_is_rejected() {
        assert_eq!(parse_args(args(&["up", "all"])), None);
    }
}
