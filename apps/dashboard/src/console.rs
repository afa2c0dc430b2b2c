//! # Console Front End
//!
//! Line-oriented stand-in for the dashboard page.
//!
//! ## Commands
//! ```text
//! add <YYYY-MM-DD> <montant>   save (or replace) the day's sales
//! del <YYYY-MM-DD>             delete the day's record
//! day <YYYY-MM-DD>             select a date and show its record
//! preview <montant>            live split for an amount
//! show                         totals and the 12 months of the year
//! weeks                        weekly chart buckets
//! quarters                     T1..T4 net totals with shares
//! recent                       last 10 records, newest first
//! export                       write the annual PDF report
//! json                         full dashboard as JSON
//! help                         this list
//! quit                         leave
//! ```
//!
//! Command errors are printed inline and the loop keeps going.

use std::fmt::Write as _;

use chrono::NaiveDate;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};
use ventes_core::calendar::format_date_fr;
use ventes_core::{format_amount, Dashboard, SaleRecord};
use ventes_report::ReportOptions;

use crate::commands::{dashboard, report, sale};
use crate::state::SalesState;

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { date: String, amount: String },
    Delete { date: String },
    Day { date: String },
    Preview { amount: String },
    Show,
    Weeks,
    Quarters,
    Recent,
    Export,
    Json,
    Help,
    Quit,
}

/// Parses a console line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = parts.collect();

    let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("add" | "ajouter", [date, amount]) => Command::Add {
            date: date.to_string(),
            amount: amount.to_string(),
        },
        // An empty amount still goes through validation for its message.
        ("add" | "ajouter", [date]) => Command::Add {
            date: date.to_string(),
            amount: String::new(),
        },
        ("del" | "delete" | "supprimer", [date]) => Command::Delete {
            date: date.to_string(),
        },
        ("day" | "jour", [date]) => Command::Day {
            date: date.to_string(),
        },
        ("preview", [amount]) => Command::Preview {
            amount: amount.to_string(),
        },
        ("show", []) => Command::Show,
        ("weeks", []) => Command::Weeks,
        ("quarters", []) => Command::Quarters,
        ("recent", []) => Command::Recent,
        ("export", []) => Command::Export,
        ("json", []) => Command::Json,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit" | "q", []) => Command::Quit,
        (verb, _) => return Err(format!("Commande inconnue ou incomplète : {verb} (tapez help)")),
    };
    Ok(Some(command))
}

/// The dashboard driven from text lines.
#[derive(Debug)]
pub struct Console {
    state: SalesState,
    report: ReportOptions,
}

impl Console {
    pub fn new(state: SalesState, report: ReportOptions) -> Self {
        Console { state, report }
    }

    pub fn state(&self) -> &SalesState {
        &self.state
    }

    /// Runs one command and returns what to print.
    ///
    /// `today` stamps exported reports.
    pub async fn execute(&self, command: Command, today: NaiveDate) -> String {
        match command {
            Command::Add { date, amount } => {
                self.state.set_amount_text(amount.as_str());
                match sale::add_daily_sale(&self.state, &date, &amount).await {
                    Ok(record) => format!("Enregistré : {}", render_record(&record)),
                    Err(e) => e.message,
                }
            }
            Command::Delete { date } => match sale::delete_daily_sale(&self.state, &date).await {
                Ok(()) => format!("Supprimé : {date}"),
                Err(e) => e.message,
            },
            Command::Day { date } => match sale::get_sale_for_date(&self.state, &date) {
                Ok(Some(record)) => format!("{}\nTotal enregistré", render_record(&record)),
                Ok(None) => "Aucune vente pour cette date".to_string(),
                Err(e) => e.message,
            },
            Command::Preview { amount } => {
                let split = sale::preview(&amount);
                format!(
                    "Honoraire: {} → Vente nette: {}",
                    format_amount(split.honoraire_amount),
                    format_amount(split.net_amount)
                )
            }
            Command::Show => render_summary(&dashboard::get_dashboard(&self.state)),
            Command::Weeks => render_weeks(&dashboard::get_dashboard(&self.state)),
            Command::Quarters => render_quarters(&dashboard::get_dashboard(&self.state)),
            Command::Recent => render_recent(&dashboard::get_dashboard(&self.state)),
            Command::Export => match report::export_report(&self.state, &self.report, today).await {
                Ok(response) => format!("Rapport enregistré : {}", response.path.display()),
                Err(e) => e.message,
            },
            Command::Json => serde_json::to_string_pretty(&dashboard::get_dashboard(&self.state))
                .unwrap_or_else(|e| e.to_string()),
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        }
    }
}

const HELP: &str = "\
add <AAAA-MM-JJ> <montant>   enregistrer les ventes du jour
del <AAAA-MM-JJ>             supprimer un jour
day <AAAA-MM-JJ>             afficher un jour
preview <montant>            aperçu honoraire / net
show                         totaux et mois de l'année
weeks                        ventes par semaine
quarters                     répartition par trimestre
recent                       ventes récentes
export                       exporter le rapport PDF
json                         tableau de bord en JSON
quit                         quitter";

/// Reads commands from `input` until `quit` or end of input.
pub async fn run_console<R, W>(
    console: &Console,
    mut input: R,
    mut output: W,
    today: impl Fn() -> NaiveDate,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(b"Ventes - tapez help\n> ").await?;
    output.flush().await?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line).await? == 0 {
            debug!("Console input closed");
            break;
        }

        let text = match parse_command(&line) {
            Ok(None) => String::new(),
            Ok(Some(Command::Quit)) => {
                info!("Console quit");
                break;
            }
            Ok(Some(command)) => console.execute(command, today()).await,
            Err(message) => message,
        };

        if !text.is_empty() {
            output.write_all(text.as_bytes()).await?;
            output.write_all(b"\n").await?;
        }
        output.write_all(b"> ").await?;
        output.flush().await?;
    }

    output.write_all(b"\n").await?;
    output.flush().await
}

// =============================================================================
// Rendering
// =============================================================================

fn render_record(record: &SaleRecord) -> String {
    format!(
        "{}  {} brut  {} honoraire  {} net",
        format_date_fr(record.date),
        format_amount(record.amount),
        format_amount(record.honoraire_amount),
        format_amount(record.net_amount)
    )
}

fn render_summary(dashboard: &Dashboard) -> String {
    let totals = &dashboard.totals;
    let mut out = String::new();
    let _ = writeln!(out, "Total Ventes Brutes   {}", format_amount(totals.total));
    let _ = writeln!(out, "Total Honoraires      {}", format_amount(totals.honoraire_total));
    let _ = writeln!(out, "Total Ventes Nettes   {}", format_amount(totals.net_total));
    let _ = writeln!(out, "Jours avec Ventes     {}", totals.days_with_sales);
    if dashboard.quarantined > 0 {
        let _ = writeln!(out, "Entrées ignorées      {}", dashboard.quarantined);
    }

    let _ = writeln!(out, "\nRésumé mensuel {}", dashboard.year);
    for month in &dashboard.monthly {
        let _ = writeln!(
            out,
            "{:<10} {:>14} {:>14} {:>14} {:>4}",
            month.month,
            format_amount(month.total),
            format_amount(month.honoraire_total),
            format_amount(month.net_total),
            month.days
        );
    }

    let _ = write!(out, "\nVentes du {}: ", format_date_fr(dashboard.selected_date));
    match &dashboard.selected_sale {
        Some(record) => out.push_str(&render_record(record)),
        None => out.push_str("aucune"),
    }
    out
}

fn render_weeks(dashboard: &Dashboard) -> String {
    if dashboard.weekly.is_empty() {
        return "Aucune donnée disponible pour afficher le graphique hebdomadaire".to_string();
    }
    dashboard
        .weekly
        .iter()
        .map(|w| {
            format!(
                "{:<10} {:>14} brut {:>14} net",
                w.week,
                format_amount(w.gross),
                format_amount(w.net)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_quarters(dashboard: &Dashboard) -> String {
    if !dashboard.has_quarterly_data {
        return "Aucune donnée disponible".to_string();
    }
    dashboard
        .quarterly
        .iter()
        .map(|q| format!("{}  {:>14}  {:.0}%", q.name, format_amount(q.value), q.percent))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_recent(dashboard: &Dashboard) -> String {
    if dashboard.recent.is_empty() {
        return "Aucune vente enregistrée".to_string();
    }
    dashboard
        .recent
        .iter()
        .map(render_record)
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ventes_core::RawSaleRecord;
    use ventes_db::{Database, DbConfig, RecordStore, SqliteRecordStore};

    use super::*;
    use crate::error::{MSG_INVALID_AMOUNT, MSG_REQUIRED};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    async fn console(entries: &[(&str, f64)]) -> Console {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = Arc::new(SqliteRecordStore::new(db));
        for (key, amount) in entries {
            store
                .upsert("ventes/", key, &RawSaleRecord::derived(*amount))
                .await
                .unwrap();
        }
        let state = SalesState::start(store, "ventes/", 2025, today()).await.unwrap();
        Console::new(state, ReportOptions::default())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command("add 2025-03-15 100"),
            Ok(Some(Command::Add {
                date: "2025-03-15".to_string(),
                amount: "100".to_string()
            }))
        );
        assert_eq!(
            parse_command("ADD 2025-03-15"),
            Ok(Some(Command::Add {
                date: "2025-03-15".to_string(),
                amount: String::new()
            }))
        );
        assert_eq!(
            parse_command("del 2025-03-15"),
            Ok(Some(Command::Delete {
                date: "2025-03-15".to_string()
            }))
        );
        assert_eq!(parse_command("show"), Ok(Some(Command::Show)));
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn test_parse_rejects_unknown_and_incomplete() {
        assert!(parse_command("bogus").is_err());
        assert!(parse_command("del").is_err());
        assert!(parse_command("show extra").is_err());
    }

    #[tokio::test]
    async fn test_add_prints_inline_messages() {
        let console = console(&[]).await;

        let out = console
            .execute(parse_command("add 2025-03-15").unwrap().unwrap(), today())
            .await;
        assert_eq!(out, MSG_REQUIRED);

        let out = console
            .execute(parse_command("add 2025-03-15 abc").unwrap().unwrap(), today())
            .await;
        assert_eq!(out, MSG_INVALID_AMOUNT);
        assert_eq!(console.state().amount_text(), "abc");

        let out = console
            .execute(parse_command("add 2025-03-15 100").unwrap().unwrap(), today())
            .await;
        assert_eq!(
            out,
            "Enregistré : 15/03/2025  100.00 $ brut  20.00 $ honoraire  80.00 $ net"
        );
        assert_eq!(console.state().amount_text(), "");
    }

    #[tokio::test]
    async fn test_views_render() {
        let console = console(&[("2025-01-05", 100.0), ("2025-03-15", 50.0)]).await;

        let show = console.execute(Command::Show, today()).await;
        assert!(show.contains("Total Ventes Brutes   150.00 $"));
        assert!(show.contains("Jours avec Ventes     2"));
        assert!(show.contains("Janvier"));
        assert!(show.contains("Ventes du 15/03/2025: 15/03/2025"));

        let recent = console.execute(Command::Recent, today()).await;
        assert!(recent.starts_with("15/03/2025"));

        let quarters = console.execute(Command::Quarters, today()).await;
        assert!(quarters.starts_with("T1"));
        assert!(quarters.contains("100%"));

        let day = console
            .execute(Command::Day { date: "2025-02-01".to_string() }, today())
            .await;
        assert_eq!(day, "Aucune vente pour cette date");
    }

    #[tokio::test]
    async fn test_empty_views() {
        let console = console(&[]).await;
        assert_eq!(
            console.execute(Command::Weeks, today()).await,
            "Aucune donnée disponible pour afficher le graphique hebdomadaire"
        );
        assert_eq!(
            console.execute(Command::Quarters, today()).await,
            "Aucune donnée disponible"
        );
        assert_eq!(
            console.execute(Command::Recent, today()).await,
            "Aucune vente enregistrée"
        );
    }

    #[tokio::test]
    async fn test_preview_line() {
        let console = console(&[]).await;
        let out = console
            .execute(Command::Preview { amount: "100".to_string() }, today())
            .await;
        assert_eq!(out, "Honoraire: 20.00 $ → Vente nette: 80.00 $");
    }

    #[tokio::test]
    async fn test_run_console_until_quit() {
        let console = console(&[]).await;
        let input: &[u8] = b"help\nbogus\n\npreview 10\nquit\nshow\n";
        let mut output = Vec::new();

        run_console(&console, input, &mut output, today).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("exporter le rapport PDF"));
        assert!(text.contains("Commande inconnue"));
        assert!(text.contains("Vente nette: 8.00 $"));
        assert!(!text.contains("Total Ventes Brutes"));
    }
}
