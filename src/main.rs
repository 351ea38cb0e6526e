use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::fs;
use tracing::{info, warn};

use oms_catalog::config::Config;
use oms_catalog::logging;
use oms_catalog::mock;
use oms_catalog::pipeline::processing::assemble::assemble;
use oms_catalog::pipeline::processing::filter::FilterCriteria;
use oms_catalog::pipeline::processing::normalize::normalize_product;
use oms_catalog::pipeline::processing::sort::SortKey;
use oms_catalog::storage::{load_raw_records, InMemoryRepository, ProductRepository};

#[derive(Parser)]
#[command(name = "oms_catalog")]
#[command(about = "Product catalog admin core: normalize, filter, and page raw product data")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a mock raw product dataset
    Seed {
        /// Number of products to generate (defaults to config)
        #[arg(long)]
        count: Option<usize>,
        #[arg(long, default_value = "products.json")]
        output: String,
    },
    /// Render one page of the product list
    List {
        #[arg(long, default_value = "products.json")]
        input: String,
        /// Case-insensitive match against product name or code
        #[arg(long)]
        search: Option<String>,
        /// Group id or group display name
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        /// Comma-separated supplier names
        #[arg(long)]
        suppliers: Option<String>,
        /// Only products with a concrete shipping policy
        #[arg(long)]
        with_shipping_policy: bool,
        /// Inclusive lower bound, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// Inclusive upper bound, YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
        /// One of: newest, oldest, price_asc, price_desc
        #[arg(long)]
        sort: Option<String>,
        /// 0-based page index
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Show one product with its variants
    Show {
        #[arg(long, default_value = "products.json")]
        input: String,
        id: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let config = Config::load_or_default();
    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { count, output } => {
            let count = count.unwrap_or(config.mock.product_count);
            let products = mock::generate_products(count);
            fs::write(&output, serde_json::to_string_pretty(&products)?)?;
            info!("Seeded {} mock products into {}", count, output);
            println!("✅ Wrote {} mock products to {}", count, output);
        }
        Commands::List {
            input,
            search,
            group,
            brand,
            suppliers,
            with_shipping_policy,
            from,
            to,
            sort,
            page,
            page_size,
        } => {
            let repository = load_repository(&input)?;

            let criteria = FilterCriteria {
                search_text: search,
                group,
                brand,
                suppliers: parse_suppliers(suppliers.as_deref()),
                only_with_shipping_policy: with_shipping_policy,
                date_from: parse_day(from.as_deref())?,
                date_to: parse_day(to.as_deref())?,
            };

            let sort_key = resolve_sort(sort.as_deref(), &config);
            let page_size = page_size.unwrap_or(config.display.page_size);

            let raw_records = repository.list()?;
            let vm = assemble(&raw_records, &criteria, sort_key, page, page_size);

            println!(
                "\n📦 Products (showing {}–{} of {})",
                vm.range_start, vm.range_end, vm.total
            );
            for record in &vm.visible {
                println!(
                    "   {:<8} {:<24} {:>9.0}원  margin {:>8.0}원  {:<12} {}",
                    record.code,
                    record.name,
                    record.selling_price.unwrap_or(0.0),
                    record.margin_amount,
                    record.group_name.as_deref().unwrap_or("-"),
                    record.created_at.as_deref().unwrap_or("-"),
                );
            }

            if !vm.warnings.is_empty() {
                warn!("{} data-quality warnings in listing", vm.warnings.len());
                println!("\n⚠️  Data-quality warnings:");
                for warning in &vm.warnings {
                    println!("   - {}", warning);
                }
            }
        }
        Commands::Show { input, id } => {
            let repository = load_repository(&input)?;

            match repository.get(&id)? {
                Some(raw) => match normalize_product(&raw) {
                    Some(normalized) => {
                        let record = normalized.record;
                        println!("\n📦 {} ({})", record.name, record.code);
                        println!("   id:       {}", record.id);
                        println!(
                            "   group:    {} / {}",
                            record.group_id.as_deref().unwrap_or("-"),
                            record.group_name.as_deref().unwrap_or("-")
                        );
                        println!(
                            "   price:    {:.0}원 (margin {:.0}원)",
                            record.selling_price.unwrap_or(0.0),
                            record.margin_amount
                        );
                        println!("   variants:");
                        for variant in &record.variants {
                            println!(
                                "     {:<14} stock {:>4}  {}",
                                variant.id,
                                variant.stock,
                                variant.extra_fields.get("color").and_then(|v| v.as_str()).unwrap_or("-"),
                            );
                        }
                        for warning in &normalized.warnings {
                            println!("   ⚠️  {}", warning);
                        }
                    }
                    None => println!("⚠️  Record {} is not a usable product record", id),
                },
                None => println!("⚠️  No product with id {}", id),
            }
        }
    }

    Ok(())
}

fn load_repository(path: &str) -> anyhow::Result<InMemoryRepository> {
    let records = load_raw_records(path)?;
    info!("Loaded {} raw records from {}", records.len(), path);
    Ok(InMemoryRepository::with_records(records))
}

fn parse_suppliers(raw: Option<&str>) -> HashSet<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_day(raw: Option<&str>) -> anyhow::Result<Option<chrono::NaiveDate>> {
    raw.map(|s| {
        chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("invalid date '{}': {}", s, e))
    })
    .transpose()
}

fn resolve_sort(requested: Option<&str>, config: &Config) -> SortKey {
    if let Some(value) = requested {
        match SortKey::parse(value) {
            Some(key) => return key,
            None => warn!("Unknown sort key '{}', falling back to config", value),
        }
    }
    SortKey::parse(&config.display.default_sort).unwrap_or_default()
}
