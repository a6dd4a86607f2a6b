use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::application::{BetbookService, LoadReports};
use crate::domain::{
    BetFilter, BetStatus, BetType, NewBet, NewTransaction, Sport, TransactionType, format_amount,
    parse_amount,
};
use crate::io::Exporter;

/// Betbook - Sports Betting Ledger
#[derive(Parser)]
#[command(name = "betbook")]
#[command(about = "A local-first ledger for sports bets and the bank that funds them")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "betbook.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Bet management commands
    #[command(subcommand)]
    Bet(BetCommands),

    /// Bank (deposits and withdrawals) commands
    #[command(subcommand)]
    Bank(BankCommands),

    /// Show betting statistics
    Stats {
        /// Only bets on this sport
        #[arg(long)]
        sport: Option<String>,

        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: bets, transactions, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Delete every bet and every transaction
    Reset {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum BetCommands {
    /// Record a new pending bet
    Add {
        /// Stake (e.g., "50.00" or "50")
        amount: String,

        /// Decimal odd (at least 1.01)
        #[arg(short, long)]
        odd: String,

        /// Sport: soccer, basketball, tennis, volleyball, other
        #[arg(short, long)]
        sport: String,

        /// Bet type: single, multiple, system
        #[arg(short = 't', long = "type", default_value = "single")]
        bet_type: String,

        /// Date of the event (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Mark a pending bet as won
    Won {
        /// Bet ID
        id: String,
    },

    /// Mark a pending bet as lost
    Lost {
        /// Bet ID
        id: String,
    },

    /// Delete a bet
    Delete {
        /// Bet ID
        id: String,
    },

    /// List bets
    List {
        /// Filter by status: pending, won, lost
        #[arg(long)]
        status: Option<String>,

        /// Filter by sport
        #[arg(long)]
        sport: Option<String>,

        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Only settled bets (history)
        #[arg(long)]
        settled: bool,
    },

    /// Delete every bet
    Clear,
}

#[derive(Subcommand)]
pub enum BankCommands {
    /// Record a deposit into the betting bank
    Deposit {
        /// Amount (e.g., "500" or "500.00")
        amount: String,

        /// Date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Record a withdrawal from the betting bank
    Withdraw {
        /// Amount (e.g., "100" or "100.00")
        amount: String,

        /// Date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List transactions, newest first
    List,

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Delete every transaction
    Clear,

    /// Show deposits, withdrawals, balance and profit
    Summary,
}

impl Cli {
    async fn open(&self) -> Result<BetbookService> {
        let (service, reports) = BetbookService::connect(&self.database)
            .await
            .with_context(|| {
                format!(
                    "Failed to open '{}'. Run 'betbook init' first",
                    self.database
                )
            })?;
        print_load_warnings(&reports);
        Ok(service)
    }

    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                let (_, reports) = BetbookService::init(&self.database).await?;
                print_load_warnings(&reports);
                println!("Database initialized: {}", self.database);
            }

            Commands::Bet(ref bet_cmd) => {
                let service = self.open().await?;
                run_bet_command(&service, bet_cmd).await?;
            }

            Commands::Bank(ref bank_cmd) => {
                let service = self.open().await?;
                run_bank_command(&service, bank_cmd).await?;
            }

            Commands::Stats {
                ref sport,
                ref from,
                ref to,
                ref format,
            } => {
                let service = self.open().await?;
                let filter = BetFilter {
                    sport: sport.as_deref().map(parse_sport).transpose()?,
                    from_date: from.as_deref().map(parse_date).transpose()?,
                    to_date: to.as_deref().map(parse_end_date).transpose()?,
                    ..Default::default()
                };
                run_stats_command(&service, &filter, format)?;
            }

            Commands::Export {
                ref export_type,
                ref output,
            } => {
                let service = self.open().await?;
                run_export_command(&service, export_type, output.as_deref())?;
            }

            Commands::Reset { yes } => {
                if !yes {
                    bail!("Refusing to delete all data without --yes");
                }
                let service = self.open().await?;
                let summary = service.reset_all().await?;
                println!(
                    "Deleted {} bet(s) and {} transaction(s)",
                    summary.bets_removed, summary.transactions_removed
                );
            }
        }

        Ok(())
    }
}

fn print_load_warnings(reports: &LoadReports) {
    for report in [&reports.bets, &reports.bank] {
        if let Some(reason) = &report.corrupt {
            eprintln!("warning: '{}' was unreadable ({}); starting empty", report.key, reason);
        }
        for rejected in &report.rejected {
            eprintln!(
                "warning: dropped stored record #{} from '{}': {}",
                rejected.index, report.key, rejected.reason
            );
        }
    }
}

async fn run_bet_command(service: &BetbookService, cmd: &BetCommands) -> Result<()> {
    let ledger = service.bets();

    match cmd {
        BetCommands::Add {
            amount,
            odd,
            sport,
            bet_type,
            date,
            description,
        } => {
            let amount = parse_amount(amount).context("Invalid amount format. Use '50.00' or '50'")?;
            let odd = parse_amount(odd).context("Invalid odd format. Use '1.85'")?;
            let sport = parse_sport(sport)?;
            let bet_type = BetType::from_str(bet_type)
                .ok_or_else(|| anyhow::anyhow!("Invalid bet type: {}", bet_type))?;
            let date = match date {
                Some(date_str) => parse_date(date_str)?,
                None => Utc::now(),
            };

            let mut new_bet = NewBet::new(sport, bet_type, odd, amount, date);
            if let Some(desc) = description {
                new_bet = new_bet.with_description(desc.clone());
            }

            let bet = ledger.add_bet(new_bet).await?;
            println!(
                "Recorded bet: {} @ {} on {} ({})",
                format_amount(bet.amount),
                bet.odd,
                bet.sport,
                bet.id
            );
        }

        BetCommands::Won { id } => {
            let bet = ledger.update_bet_status(id, BetStatus::Won).await?;
            println!(
                "Bet {} won: payout {} (profit {})",
                bet.id,
                format_amount(bet.payout()),
                format_amount(bet.profit())
            );
        }

        BetCommands::Lost { id } => {
            let bet = ledger.update_bet_status(id, BetStatus::Lost).await?;
            println!("Bet {} lost: {}", bet.id, format_amount(bet.profit()));
        }

        BetCommands::Delete { id } => {
            let bet = ledger.delete_bet(id).await?;
            println!("Deleted bet: {}", bet.id);
        }

        BetCommands::List {
            status,
            sport,
            from,
            to,
            settled,
        } => {
            let filter = BetFilter {
                sport: sport.as_deref().map(parse_sport).transpose()?,
                status: status
                    .as_deref()
                    .map(|s| {
                        BetStatus::from_str(s).ok_or_else(|| anyhow::anyhow!("Invalid status: {}", s))
                    })
                    .transpose()?,
                from_date: from.as_deref().map(parse_date).transpose()?,
                to_date: to.as_deref().map(parse_end_date).transpose()?,
                settled_only: *settled,
            };

            let mut bets = ledger.filter_bets(&filter);
            bets.sort_by(|a, b| b.date.cmp(&a.date));

            if bets.is_empty() {
                println!("No bets found.");
            } else {
                println!(
                    "{:<36} {:<12} {:<11} {:<9} {:>7} {:>10} {:<8} DESCRIPTION",
                    "ID", "DATE", "SPORT", "TYPE", "ODD", "AMOUNT", "STATUS"
                );
                println!("{}", "-".repeat(110));
                for bet in &bets {
                    println!(
                        "{:<36} {:<12} {:<11} {:<9} {:>7.2} {:>10} {:<8} {}",
                        bet.id,
                        bet.date.format("%Y-%m-%d"),
                        bet.sport,
                        bet.bet_type,
                        bet.odd,
                        format_amount(bet.amount),
                        bet.status,
                        truncate(bet.description.as_deref().unwrap_or(""), 30)
                    );
                }
            }
        }

        BetCommands::Clear => {
            let removed = ledger.clear_bets().await?;
            println!("Deleted {} bet(s)", removed);
        }
    }
    Ok(())
}

async fn run_bank_command(service: &BetbookService, cmd: &BankCommands) -> Result<()> {
    let bank = service.bank();

    match cmd {
        BankCommands::Deposit {
            amount,
            date,
            description,
        }
        | BankCommands::Withdraw {
            amount,
            date,
            description,
        } => {
            let kind = if matches!(cmd, BankCommands::Deposit { .. }) {
                TransactionType::Deposit
            } else {
                TransactionType::Withdrawal
            };
            let amount = parse_amount(amount).context("Invalid amount format. Use '50.00' or '50'")?;
            let date = match date {
                Some(date_str) => parse_date(date_str)?,
                None => Utc::now(),
            };

            let mut new_tx = NewTransaction::new(kind, amount, date);
            if let Some(desc) = description {
                new_tx = new_tx.with_description(desc.clone());
            }

            let tx = bank.add_transaction(new_tx).await?;
            println!(
                "Recorded {}: {} ({})",
                tx.kind.as_str().to_lowercase(),
                format_amount(tx.amount),
                tx.id
            );
        }

        BankCommands::List => {
            let transactions = bank.transactions_newest_first();
            if transactions.is_empty() {
                println!("No transactions found.");
            } else {
                println!(
                    "{:<36} {:<12} {:<10} {:>10} DESCRIPTION",
                    "ID", "DATE", "TYPE", "AMOUNT"
                );
                println!("{}", "-".repeat(84));
                for tx in &transactions {
                    println!(
                        "{:<36} {:<12} {:<10} {:>10} {}",
                        tx.id,
                        tx.date.format("%Y-%m-%d"),
                        tx.kind,
                        format_amount(tx.signed_amount()),
                        truncate(tx.description.as_deref().unwrap_or(""), 30)
                    );
                }
            }
        }

        BankCommands::Delete { id } => {
            let tx = bank.delete_transaction(id).await?;
            println!("Deleted transaction: {}", tx.id);
        }

        BankCommands::Clear => {
            let removed = bank.clear_transactions().await?;
            println!("Deleted {} transaction(s)", removed);
        }

        BankCommands::Summary => {
            let stats = bank.get_stats();
            println!("Deposits:    {:>12}", format_amount(stats.total_deposits));
            println!("Withdrawals: {:>12}", format_amount(stats.total_withdrawals));
            println!("Balance:     {:>12}", format_amount(stats.total_balance));
            println!("Profit:      {:>12}", format_amount(stats.total_profit));
        }
    }
    Ok(())
}

fn run_stats_command(service: &BetbookService, filter: &BetFilter, format: &str) -> Result<()> {
    let report = service.statistics_report(filter);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "table" => {
            let stats = &report.stats;
            println!("Bets:      {}", stats.total_bets);
            println!("Won:       {}", stats.total_won);
            println!("Lost:      {}", stats.total_lost);
            println!("Win rate:  {:.1}%", stats.win_rate);
            println!("Staked:    {}", format_amount(stats.total_amount));
            println!("Winnings:  {}", format_amount(stats.total_winnings));
            println!("Profit:    {}", format_amount(stats.profit));
            println!("Avg odd:   {:.2}", report.average_odd);

            if !report.sport_distribution.is_empty() {
                println!();
                println!("{:<12} {:>6}", "SPORT", "BETS");
                for entry in &report.sport_distribution {
                    println!("{:<12} {:>6}", entry.sport, entry.count);
                }
            }

            if !report.profit_over_time.is_empty() {
                println!();
                println!("{:<12} {:>10} {:>12}", "DATE", "PROFIT", "CUMULATIVE");
                for point in &report.profit_over_time {
                    println!(
                        "{:<12} {:>10} {:>12}",
                        point.date,
                        format_amount(point.profit),
                        format_amount(point.cumulative)
                    );
                }
            }
        }
        other => bail!("Unknown format '{}'. Use table or json", other),
    }
    Ok(())
}

fn run_export_command(
    service: &BetbookService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    let writer: Box<dyn std::io::Write> = match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file '{}'", path))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    let exporter = Exporter::new(service);
    let count = match export_type {
        "bets" => exporter.export_bets_csv(writer)?,
        "transactions" => exporter.export_transactions_csv(writer)?,
        "full" => {
            let snapshot = exporter.export_full_json(writer)?;
            snapshot.bets.len() + snapshot.transactions.len()
        }
        other => bail!(
            "Unknown export type '{}'. Use bets, transactions or full",
            other
        ),
    };

    if output.is_some() {
        eprintln!("Exported {} record(s)", count);
    }
    Ok(())
}

fn parse_sport(input: &str) -> Result<Sport> {
    Sport::from_str(input).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid sport '{}'. Use soccer, basketball, tennis, volleyball or other",
            input
        )
    })
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    let naive_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", date_str))?;

    let naive_datetime = naive_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid date"))?;

    Ok(naive_datetime.and_utc())
}

/// Upper bound of a day-granular range: the last instant of that day.
fn parse_end_date(date_str: &str) -> Result<DateTime<Utc>> {
    let start = parse_date(date_str)?;
    Ok(start + chrono::Duration::days(1) - chrono::Duration::nanoseconds(1))
}
