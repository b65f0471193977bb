use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{AppError, LedgerService, ProfitSummary};
use crate::domain::{
    InventoryItem, ItemId, NewItem, PartnerShare, Pricing, format_amount, parse_amount,
};
use crate::storage::{Backend, StoreConfig};

/// Partsledger - point-of-sale ledger for a parts-reselling business
#[derive(Parser)]
#[command(name = "partsledger")]
#[command(about = "Track parts inventory, record sales and split profit between two partners")]
#[command(version)]
pub struct Cli {
    /// Store location (defaults to partsledger.db, or data/inventory.csv for the csv backend)
    #[arg(short, long, global = true, env = "PARTSLEDGER_STORE")]
    pub store: Option<PathBuf>,

    /// Storage backend: sqlite or csv
    #[arg(short, long, global = true, env = "PARTSLEDGER_BACKEND", default_value = "sqlite")]
    pub backend: Backend,

    /// Partner A's share of the profit in percent; partner B gets the rest
    #[arg(
        long,
        global = true,
        env = "PARTSLEDGER_PARTNER_SHARE",
        default_value_t = PartnerShare::DEFAULT_PERCENT,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub partner_share: u8,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty inventory store
    Init,

    /// Add a new part to the inventory
    Add {
        /// Part name
        name: String,

        /// Buying price per unit in the source currency (e.g., "100" or "99.50")
        #[arg(long)]
        buying: String,

        /// Shipping cost per unit in the source currency
        #[arg(long, default_value = "0")]
        shipping: String,

        /// Conversion rate from source to target currency
        #[arg(short, long, default_value = "280")]
        rate: String,

        /// Profit margin in percent
        #[arg(short, long, default_value = "20")]
        margin: String,

        /// Units in stock
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List parts in the inventory
    List {
        /// Only show parts with stock left
        #[arg(long)]
        in_stock: bool,
    },

    /// Show detailed information about a part
    Show {
        /// Item ID (or a unique prefix)
        id: String,
    },

    /// Record the sale of one or more units
    Sell {
        /// Item ID (or a unique prefix)
        id: String,

        /// Number of units sold
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },

    /// Delete a part (does nothing if it doesn't exist)
    Delete {
        /// Item ID (or a unique prefix)
        id: String,
    },

    /// Remove every part from the inventory
    Reset {
        /// Confirm that all rows should be removed
        #[arg(long)]
        yes: bool,
    },

    /// Quote cost, selling price and profit for a unit without storing anything
    Price {
        /// Buying price per unit in the source currency
        #[arg(long)]
        buying: String,

        /// Shipping cost per unit in the source currency
        #[arg(long, default_value = "0")]
        shipping: String,

        /// Conversion rate from source to target currency
        #[arg(short, long, default_value = "280")]
        rate: String,

        /// Profit margin in percent
        #[arg(short, long, default_value = "20")]
        margin: String,
    },

    /// Show total profit and the partner split
    Summary {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export the inventory to CSV or JSON
    Export {
        /// What to export: inventory (csv), full (json)
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::with_default_path(self.backend, self.store.clone())
    }

    pub async fn run(self) -> Result<()> {
        let config = self.store_config();
        let share = PartnerShare::new(self.partner_share)?;

        match self.command {
            Commands::Init => {
                let service = LedgerService::open(&config).await?;
                let count = service.snapshot().await?.len();
                println!(
                    "Inventory ready: {} ({}, {} items)",
                    config.path.display(),
                    config.backend,
                    count
                );
            }

            Commands::Add {
                name,
                buying,
                shipping,
                rate,
                margin,
                quantity,
                description,
            } => {
                let pricing = parse_pricing(&buying, &shipping, &rate, &margin)?;
                let mut new_item = NewItem::new(name, pricing, quantity);
                if let Some(desc) = description {
                    new_item = new_item.with_description(desc);
                }

                let service = LedgerService::open(&config).await?;
                let item = service.add_item(new_item).await?;
                println!(
                    "Added {} x{} at {} per unit ({})",
                    item.name,
                    item.quantity,
                    format_amount(item.selling_price()),
                    item.id
                );
            }

            Commands::List { in_stock } => {
                let service = LedgerService::open(&config).await?;
                print_items(&service.list_items(in_stock).await?);
            }

            Commands::Show { id } => {
                let service = LedgerService::open(&config).await?;
                let item_id = resolve_required(&service, &id).await?;
                print_item_details(&service.get_item(item_id).await?);
            }

            Commands::Sell { id, quantity } => {
                let service = LedgerService::open(&config).await?;
                let item_id = resolve_required(&service, &id).await?;

                let result = match service.sell(item_id, quantity).await {
                    Ok(result) => result,
                    Err(AppError::Ledger(crate::domain::LedgerError::InsufficientStock {
                        available,
                        requested,
                        ..
                    })) => {
                        anyhow::bail!(
                            "Not enough stock: {} available, {} requested",
                            available,
                            requested
                        );
                    }
                    Err(e) => return Err(e.into()),
                };

                println!(
                    "Sold {} x{}: profit {} ({} per unit), {} left",
                    result.item.name,
                    result.sale.quantity,
                    format_amount(result.sale.profit),
                    format_amount(result.sale.unit_profit),
                    result.sale.remaining
                );
            }

            Commands::Delete { id } => {
                let service = LedgerService::open(&config).await?;
                let removed = match service.resolve_id(&id).await? {
                    Some(item_id) => service.delete_item(item_id).await?,
                    None => None,
                };

                match removed {
                    Some(item) => println!("Deleted {} ({})", item.name, item.id),
                    None => println!("No item matching '{}', nothing deleted", id),
                }
            }

            Commands::Reset { yes } => {
                if !yes {
                    anyhow::bail!("Reset removes every item. Re-run with --yes to confirm");
                }
                let service = LedgerService::open(&config).await?;
                let removed = service.reset().await?;
                println!("Inventory reset: {} items removed", removed);
            }

            Commands::Price {
                buying,
                shipping,
                rate,
                margin,
            } => {
                let pricing = parse_pricing(&buying, &shipping, &rate, &margin)?;
                println!("Base cost:     {:>15}", format_amount(pricing.base_cost()));
                println!("Selling price: {:>15}", format_amount(pricing.selling_price()));
                println!("Unit profit:   {:>15}", format_amount(pricing.unit_profit()));
            }

            Commands::Summary { format } => {
                let service = LedgerService::open(&config).await?;
                let summary = service.profit_summary(share).await?;
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
                    "table" => print_summary(&summary),
                    _ => anyhow::bail!("Invalid format '{}'. Valid: table, json", format),
                }
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = LedgerService::open(&config).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

fn parse_pricing(buying: &str, shipping: &str, rate: &str, margin: &str) -> Result<Pricing> {
    let buying = parse_amount(buying).context("Invalid buying price")?;
    let shipping = parse_amount(shipping).context("Invalid shipping price")?;
    let rate = parse_amount(rate).context("Invalid conversion rate")?;
    let margin = parse_amount(margin).context("Invalid profit margin")?;
    Ok(Pricing::new(buying, shipping, rate, margin)?)
}

async fn resolve_required(service: &LedgerService, reference: &str) -> Result<ItemId> {
    service
        .resolve_id(reference)
        .await?
        .ok_or_else(|| AppError::ItemNotFound(reference.to_string()).into())
}

fn short_id(id: &ItemId) -> String {
    id.to_string()[..8].to_string()
}

fn print_items(items: &[InventoryItem]) {
    if items.is_empty() {
        println!("No parts in inventory yet.");
        return;
    }

    println!(
        "{:<8} {:<24} {:>6} {:>6} {:>14} {:>14}",
        "ID", "NAME", "STOCK", "SOLD", "PRICE", "PROFIT"
    );
    println!("{}", "-".repeat(77));
    for item in items {
        println!(
            "{:<8} {:<24} {:>6} {:>6} {:>14} {:>14}",
            short_id(&item.id),
            truncate(&item.name, 24),
            item.quantity,
            item.sold,
            format_amount(item.selling_price()),
            format_amount(item.total_profit)
        );
    }
}

fn print_item_details(item: &InventoryItem) {
    let pricing = item.pricing();

    println!("Part: {}", item.name);
    println!("  ID:              {}", item.id);
    if !item.description.is_empty() {
        println!("  Description:     {}", item.description);
    }
    println!("  State:           {}", item.state());
    println!();
    println!("  Buying price:    {}", format_amount(item.buying_price));
    println!("  Shipping price:  {}", format_amount(item.shipping_price));
    println!("  Conversion rate: {}", item.conversion_rate);
    println!("  Profit margin:   {}%", item.profit_margin);
    println!("  Base cost:       {}", format_amount(pricing.base_cost()));
    println!("  Selling price:   {}", format_amount(pricing.selling_price()));
    println!("  Unit profit:     {}", format_amount(pricing.unit_profit()));
    println!();
    println!("  In stock:        {}", item.quantity);
    println!("  Sold:            {}", item.sold);
    println!("  Total profit:    {}", format_amount(item.total_profit));
}

fn print_summary(summary: &ProfitSummary) {
    let a = summary.share.partner_a_percent();
    let b = summary.share.partner_b_percent();

    println!("Partner Profit Summary");
    println!();
    println!("Total profit:        {:>15}", format_amount(summary.total_profit));
    println!(
        "Partner A ({:>3}%):    {:>15}",
        a,
        format_amount(summary.split.partner_a)
    );
    println!(
        "Partner B ({:>3}%):    {:>15}",
        b,
        format_amount(summary.split.partner_b)
    );

    if summary.items.is_empty() {
        return;
    }

    println!();
    println!(
        "{:<24} {:>6} {:>14} {:>14} {:>14}",
        "PART",
        "SOLD",
        "PROFIT",
        format!("A ({}%)", a),
        format!("B ({}%)", b)
    );
    println!("{}", "-".repeat(76));
    for item in &summary.items {
        println!(
            "{:<24} {:>6} {:>14} {:>14} {:>14}",
            truncate(&item.name, 24),
            item.sold,
            format_amount(item.total_profit),
            format_amount(item.split.partner_a),
            format_amount(item.split.partner_b)
        );
    }
}

enum ExportKind {
    Inventory,
    Full,
}

fn parse_export_kind(export_type: &str) -> Result<ExportKind> {
    match export_type {
        "inventory" => Ok(ExportKind::Inventory),
        "full" => Ok(ExportKind::Full),
        _ => anyhow::bail!(
            "Invalid export type '{}'. Valid types: inventory, full",
            export_type
        ),
    }
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    // Must fail before File::create truncates the output
    let kind = parse_export_kind(export_type)?;
    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match kind {
        ExportKind::Inventory => {
            let count = exporter.export_inventory_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} items", count);
            }
        }
        ExportKind::Full => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full inventory: {} items, total profit {}",
                    snapshot.items.len(),
                    format_amount(snapshot.total_profit)
                );
            }
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
