//! Interactive numbered menu.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use intellifactory_core::detector::DetectionThresholds;
use intellifactory_db::DbPool;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::cli::{DEFAULT_EXPORT_LIMIT, DEFAULT_EXPORT_PATH, DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT};
use crate::{anomalies, report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    List,
    Search,
    Export,
    Clear,
    Detect,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::List),
            "2" => Some(MenuChoice::Search),
            "3" => Some(MenuChoice::Export),
            "4" => Some(MenuChoice::Clear),
            "5" => Some(MenuChoice::Detect),
            "0" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

const MENU: &str = "
Anomaly Detector
1. View recent anomalies
2. Search anomalies by machine
3. Export anomalies to CSV
4. Clear all anomalies
5. Run anomaly detection on a CSV file
0. Exit";

/// Run the menu until the operator exits or stdin closes.
///
/// Errors from a single action are printed and the menu continues.
pub async fn run(pool: &DbPool, thresholds: &DetectionThresholds) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("{MENU}");
        let Some(input) = prompt(&mut lines, "Enter your choice: ").await? else {
            break;
        };

        let result = match MenuChoice::parse(&input) {
            Some(MenuChoice::List) => anomalies::list(pool, DEFAULT_LIST_LIMIT).await,
            Some(MenuChoice::Search) => match prompt(&mut lines, "Enter machine ID: ").await? {
                Some(machine_id) if !machine_id.is_empty() => {
                    anomalies::search(pool, &machine_id, DEFAULT_SEARCH_LIMIT).await
                }
                _ => Ok(()),
            },
            Some(MenuChoice::Export) => {
                let output = PathBuf::from(DEFAULT_EXPORT_PATH);
                anomalies::export(pool, &output, DEFAULT_EXPORT_LIMIT)
                    .await
                    .map(|_| ())
            }
            Some(MenuChoice::Clear) => anomalies::clear(pool).await.map(|_| ()),
            Some(MenuChoice::Detect) => match prompt(&mut lines, "Enter path to CSV file: ").await? {
                Some(path) if !path.is_empty() => {
                    report::detect(pool, &PathBuf::from(path), thresholds, false).await
                }
                _ => Ok(()),
            },
            Some(MenuChoice::Exit) => break,
            None => {
                println!("Invalid choice. Try again.");
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "Menu action failed");
            println!("Error: {e:#}");
        }
    }

    println!("Goodbye!");
    Ok(())
}

async fn prompt(
    lines: &mut Lines<BufReader<Stdin>>,
    label: &str,
) -> anyhow::Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush().context("failed to flush stdout")?;
    let line = lines.next_line().await.context("failed to read stdin")?;
    Ok(line.map(|l| l.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbered_choices() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::List));
        assert_eq!(MenuChoice::parse(" 5 "), Some(MenuChoice::Detect));
        assert_eq!(MenuChoice::parse("0"), Some(MenuChoice::Exit));
    }

    #[test]
    fn rejects_unknown_choices() {
        assert_eq!(MenuChoice::parse("9"), None);
        assert_eq!(MenuChoice::parse("list"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }
}
