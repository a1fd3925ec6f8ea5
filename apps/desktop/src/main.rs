use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{load_settings, CatalogClient};
use shared::domain::{Category, CategoryFilter, Product, ProductDraft, ProductId, SortOrder};

#[derive(Parser, Debug)]
#[command(about = "Product catalog manager over a REST repository")]
struct Args {
    /// API root, e.g. http://localhost:5000/api. Overrides catalog.toml and
    /// environment settings.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List products, optionally narrowed by search text and category.
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        category: Option<Category>,
        /// Price order: asc or desc.
        #[arg(long, default_value = "asc")]
        order: SortOrder,
    },
    /// Create a product.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        category: Category,
        #[arg(long)]
        description: Option<String>,
    },
    /// Replace an existing product's fields.
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        category: Category,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a product by id.
    Remove { id: String },
    /// Show a single product by id.
    Show { id: String },
    /// Probe the repository's health endpoint.
    Health,
}

fn print_row(product: &Product) {
    println!(
        "{:<28} {:>10.2}  {:<14} {}",
        product.name,
        product.price,
        product.category.label(),
        product.id
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }
    let client = CatalogClient::connect(&settings)?;

    match args.command {
        Command::List {
            search,
            category,
            order,
        } => {
            client.refresh().await?;
            client.set_search(search).await;
            client
                .set_category(match category {
                    Some(category) => CategoryFilter::Only(category),
                    None => CategoryFilter::All,
                })
                .await;
            let visible = client.set_sort(order).await;
            if visible.is_empty() {
                println!("No products match.");
            }
            for product in &visible {
                print_row(product);
            }
        }
        Command::Add {
            name,
            price,
            category,
            description,
        } => {
            let created = client
                .create(ProductDraft {
                    name,
                    price,
                    category,
                    description,
                })
                .await?;
            println!("Created {} ({})", created.name, created.id);
        }
        Command::Update {
            id,
            name,
            price,
            category,
            description,
        } => {
            let updated = client
                .update(
                    &ProductId::new(id),
                    ProductDraft {
                        name,
                        price,
                        category,
                        description,
                    },
                )
                .await?;
            println!("Updated {} ({})", updated.name, updated.id);
        }
        Command::Remove { id } => {
            let id = ProductId::new(id);
            client.delete(&id).await?;
            println!("Removed {id}");
        }
        Command::Show { id } => {
            let product = client.get(&ProductId::new(id)).await?;
            print_row(&product);
            if let Some(description) = &product.description {
                println!("  {description}");
            }
            if let Some(created_at) = product.created_at {
                println!("  created {created_at}");
            }
            if let Some(updated_at) = product.updated_at {
                println!("  updated {updated_at}");
            }
        }
        Command::Health => {
            let health = client.health().await?;
            println!(
                "{} (environment: {}, at {})",
                health.message, health.environment, health.timestamp
            );
        }
    }

    Ok(())
}
