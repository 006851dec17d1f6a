mod commands;

use clap::Parser;
use colored::Colorize;
use commands::{CartCommands, Cli, Commands, ConfigCommands, FavCommands, ThemeCommands};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use supreme_core::native::FileStorage;
use supreme_core::ui::PanelContent;
use supreme_core::{
    format_price, Catalog, Category, CoreError, ExecuteStatus, FavoriteChange, Product, ResultsSink,
    SearchOutcome, Settings, Storefront, StorefrontEvent,
};

const CONFIG_ENV: &str = "SUPREME_CONFIG_PATH";
const DEFAULT_CONFIG: &str = "supreme.toml";

type Shop = Storefront<FileStorage>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(error) = handle_command(cli).await {
        eprintln!("{} {}", "ERROR:".red(), error);
        std::process::exit(1);
    }
}

async fn handle_command(cli: Cli) -> Result<(), CoreError> {
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command, &cli);
    }

    let settings = load_config(&cli)?;
    let mut shop = open_storefront(&cli, settings)?;
    let result = match &cli.command {
        Commands::Products { category, json } => list_products(&shop, category.as_deref(), *json),
        Commands::Show { id } => show_product(&shop, id),
        Commands::Search { query, json } => run_search(&mut shop, query, *json).await,
        Commands::Suggest { query } => suggest(&shop, query.as_deref().unwrap_or("")),
        Commands::Cart { command } => handle_cart_command(&mut shop, command),
        Commands::Fav { command } => handle_fav_command(&mut shop, command),
        Commands::Theme { command } => handle_theme_command(&mut shop, command),
        Commands::Config { .. } => Ok(()),
    };
    shop.teardown();
    result
}

/// `--config`, then `SUPREME_CONFIG_PATH`, then `supreme.toml` if present.
/// An explicitly named file must exist; otherwise defaults apply.
fn config_path(cli: &Cli) -> Option<(PathBuf, bool)> {
    if let Some(path) = &cli.config {
        return Some((path.clone(), true));
    }
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some((PathBuf::from(path), true));
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG);
    fallback.exists().then_some((fallback, false))
}

fn load_config(cli: &Cli) -> Result<Settings, CoreError> {
    let settings = match config_path(cli) {
        Some((path, explicit)) => {
            if explicit && !path.exists() {
                return Err(CoreError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading config from {}", path.display());
            Settings::from_file(&path.to_string_lossy())?
        }
        None => {
            debug!("No config file, using defaults");
            Settings::default()
        }
    };
    settings.validate()?;
    Ok(settings)
}

fn open_storefront(cli: &Cli, settings: Settings) -> Result<Shop, CoreError> {
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.data_dir));
    info!("Using data directory {}", data_dir.display());
    let store = Arc::new(FileStorage::new(data_dir));
    // The terminal has no colour-scheme preference to follow
    Storefront::init(store, settings, Arc::new(Catalog::seeded()), false)
}

fn find_product<'a>(shop: &'a Shop, id: &str) -> Result<&'a Product, CoreError> {
    shop.catalog()
        .get_by_id(id)
        .ok_or_else(|| CoreError::NotFound(format!("product {}", id)))
}

// Catalog

fn print_product_line(product: &Product) {
    let mut price = format_price(product.price).green().to_string();
    if let Some(original) = product.original_price {
        price = format!("{} {}", format_price(original).dimmed().strikethrough(), price);
    }
    let badge = product
        .badge
        .map(|b| format!(" [{}]", b.label()).yellow().to_string())
        .unwrap_or_default();
    println!(
        "  {:<12} {:<40} {}{}",
        product.id.dimmed(),
        product.name,
        price,
        badge
    );
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CoreError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list_products(shop: &Shop, category: Option<&str>, json: bool) -> Result<(), CoreError> {
    let products: Vec<&Product> = match category {
        Some(name) => {
            let category = Category::parse(name)
                .ok_or_else(|| CoreError::InvalidInput(format!("Unknown category: {}", name)))?;
            shop.catalog().get_by_category(category)
        }
        None => shop.catalog().get_all().iter().collect(),
    };
    if json {
        return print_json(&products);
    }

    let mut current = None;
    for product in products {
        if current != Some(product.category) {
            current = Some(product.category);
            println!("{}", product.category.label().bold());
        }
        print_product_line(product);
    }
    Ok(())
}

fn show_product(shop: &Shop, id: &str) -> Result<(), CoreError> {
    let product = find_product(shop, id)?;
    println!("{}", product.name.bold());
    println!("  Marca:      {}", product.brand);
    println!("  Categoria:  {}", product.category.label());
    match product.original_price {
        Some(original) => println!(
            "  Preço:      {} {}",
            format_price(original).dimmed().strikethrough(),
            format_price(product.price).green()
        ),
        None => println!("  Preço:      {}", format_price(product.price).green()),
    }
    if let Some(badge) = product.badge {
        println!("  Selo:       {}", badge.label().yellow());
    }
    println!(
        "  Avaliação:  {:.1} ({} avaliações)",
        product.rating, product.reviews
    );
    if shop.favorites().is_favorite(&product.id) {
        println!("  {}", "♥ Favorito".red());
    }
    println!();
    println!("{}", product.description);
    Ok(())
}

// Search

/// Prints delivered results straight to the terminal
struct TerminalSink {
    json: bool,
}

impl ResultsSink for TerminalSink {
    fn deliver(&mut self, query: &str, results: &[Product]) {
        if self.json {
            match serde_json::to_string_pretty(results) {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("{} {}", "ERROR:".red(), e),
            }
            return;
        }
        println!("{}", format!("Resultados para \"{}\"", query).bold());
        println!("{} produto(s) encontrado(s)", results.len());
        for product in results {
            print_product_line(product);
        }
    }
}

async fn run_search(shop: &mut Shop, query: &str, json: bool) -> Result<(), CoreError> {
    shop.set_results_sink(Box::new(TerminalSink { json }));
    if let ExecuteStatus::TooShort { message } = shop.execute_search(query) {
        return Err(CoreError::InvalidInput(message));
    }
    info!("Buscando...");

    // Drive the storefront clock until the search task has fired
    while shop.search().is_loading() {
        let Some(due) = shop.next_due_in() else {
            break;
        };
        tokio::time::sleep(due).await;
        for event in shop.advance(due) {
            if let StorefrontEvent::NoResults { .. } = event {
                print_empty_state(shop, json)?;
            }
        }
    }
    Ok(())
}

fn print_empty_state(shop: &Shop, json: bool) -> Result<(), CoreError> {
    if json {
        return print_json::<[Product]>(&[]);
    }
    if let Some(PanelContent::Outcome(SearchOutcome::Empty { query, hints })) = shop.search_box().content() {
        println!("Nenhum resultado encontrado para \"{}\"", query);
        println!("Tente buscar por:");
        for hint in hints {
            println!("  - {}", hint);
        }
    }
    Ok(())
}

fn suggest(shop: &Shop, query: &str) -> Result<(), CoreError> {
    let suggestions = shop.search().suggest(query);
    println!("{}", suggestions.title.bold());
    if suggestions.products.is_empty() {
        println!("  (nenhuma sugestão)");
    }
    for product in &suggestions.products {
        print_product_line(product);
    }
    Ok(())
}

// Cart

fn handle_cart_command(shop: &mut Shop, command: &CartCommands) -> Result<(), CoreError> {
    match command {
        CartCommands::Add { id } => {
            let quantity = shop.add_to_cart(id)?;
            let name = find_product(shop, id)?.name.clone();
            println!("{} {} (x{})", "Adicionado!".green(), name, quantity);
        }
        CartCommands::Remove { id } => report_change(shop.remove_from_cart(id), id)?,
        CartCommands::Set { id, quantity } => report_change(shop.set_quantity(id, *quantity), id)?,
        CartCommands::Inc { id } => report_change(shop.increment(id), id)?,
        CartCommands::Dec { id } => report_change(shop.decrement(id), id)?,
        CartCommands::Clear => {
            shop.clear_cart();
            println!("Carrinho esvaziado");
        }
        CartCommands::Show { json } => return show_cart(shop, *json),
    }
    print_totals(shop);
    Ok(())
}

fn report_change(changed: bool, id: &str) -> Result<(), CoreError> {
    if changed {
        Ok(())
    } else {
        Err(CoreError::NotFound(format!("cart line {}", id)))
    }
}

fn print_totals(shop: &Shop) {
    let summary = shop.cart().summary();
    println!(
        "{} item(s), total {}",
        summary.count,
        format_price(summary.total).green()
    );
}

fn show_cart(shop: &Shop, json: bool) -> Result<(), CoreError> {
    if json {
        return print_json(&serde_json::json!({
            "items": shop.cart().items(),
            "summary": shop.cart().summary(),
        }));
    }
    let items = shop.cart().items();
    if items.is_empty() {
        println!("Seu carrinho está vazio");
        return Ok(());
    }
    for item in items {
        println!(
            "  {:<12} {:<40} {:>3} x {} = {}",
            item.id.dimmed(),
            item.name,
            item.quantity,
            format_price(item.price),
            format_price(item.line_total()).green()
        );
    }
    let summary = shop.cart().summary();
    println!("  Subtotal: {}", format_price(summary.subtotal));
    println!("  Total:    {}", format_price(summary.total).green().bold());
    Ok(())
}

// Favorites

fn handle_fav_command(shop: &mut Shop, command: &FavCommands) -> Result<(), CoreError> {
    match command {
        FavCommands::Toggle { id } => {
            let change = shop.toggle_favorite(id)?;
            let icon = match change {
                FavoriteChange::Added => "♥".red(),
                FavoriteChange::Removed => "♡".normal(),
            };
            println!("{} {}", icon, change.message());
        }
        FavCommands::List => {
            println!("{}", shop.favorites().summary_message());
            for id in shop.favorites().list() {
                match shop.catalog().get_by_id(id) {
                    Some(product) => print_product_line(product),
                    None => println!("  {:<12} {}", id.dimmed(), "(fora do catálogo)".dimmed()),
                }
            }
        }
        FavCommands::Clear => {
            shop.clear_favorites();
            println!("{}", shop.favorites().summary_message());
        }
    }
    Ok(())
}

// Theme

fn handle_theme_command(shop: &mut Shop, command: &ThemeCommands) -> Result<(), CoreError> {
    let theme = match command {
        ThemeCommands::Show => shop.theme(),
        ThemeCommands::Toggle => shop.toggle_theme(),
        ThemeCommands::Set { theme } => shop.set_theme((*theme).into()),
    };
    println!("{}", theme);
    Ok(())
}

// Config

fn handle_config_command(command: &ConfigCommands, cli: &Cli) -> Result<(), CoreError> {
    match command {
        ConfigCommands::Init { output, force } => init_config(output, *force),
        ConfigCommands::Show => {
            let settings = load_config(cli)?;
            print!("{}", settings.to_toml()?);
            Ok(())
        }
    }
}

fn init_config(output: &Path, force: bool) -> Result<(), CoreError> {
    if output.exists() && !force {
        return Err(CoreError::Config(format!(
            "{} already exists (use --force to overwrite)",
            output.display()
        )));
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Settings::default().save_to_file(&output.to_string_lossy())?;
    println!("Wrote default settings to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use supreme_core::Theme;
    use tempfile::TempDir;

    fn cli_for(dir: &TempDir, args: &[&str]) -> Cli {
        let data = dir.path().join("data");
        let mut argv = vec!["supreme", "--data-dir", data.to_str().unwrap()];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    fn shop_for(dir: &TempDir) -> Shop {
        let cli = cli_for(dir, &["cart", "show"]);
        open_storefront(&cli, Settings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_cart_commands_persist_between_runs() {
        let dir = TempDir::new().unwrap();
        handle_command(cli_for(&dir, &["cart", "add", "whey-1"])).await.unwrap();
        handle_command(cli_for(&dir, &["cart", "add", "whey-1"])).await.unwrap();
        handle_command(cli_for(&dir, &["cart", "inc", "whey-1"])).await.unwrap();

        let shop = shop_for(&dir);
        assert_eq!(shop.cart().quantity_of("whey-1"), Some(3));
    }

    #[tokio::test]
    async fn test_unknown_ids_fail() {
        let dir = TempDir::new().unwrap();
        let err = handle_command(cli_for(&dir, &["cart", "add", "nope"])).await;
        assert!(matches!(err, Err(CoreError::NotFound(_))));
        let err = handle_command(cli_for(&dir, &["cart", "remove", "whey-1"])).await;
        assert!(matches!(err, Err(CoreError::NotFound(_))));
        let err = handle_command(cli_for(&dir, &["show", "nope"])).await;
        assert!(matches!(err, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_short_search_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = handle_command(cli_for(&dir, &["search", "a"])).await;
        assert!(matches!(err, Err(CoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_search_completes_after_latency() {
        let dir = TempDir::new().unwrap();
        let mut shop = shop_for(&dir);
        run_search(&mut shop, "growth", false).await.unwrap();
        assert!(!shop.search().is_loading());
        assert_eq!(shop.last_results().map(|(_, p)| p.len()), Some(4));
    }

    #[tokio::test]
    async fn test_theme_and_favorites_persist() {
        let dir = TempDir::new().unwrap();
        handle_command(cli_for(&dir, &["theme", "set", "dark"])).await.unwrap();
        handle_command(cli_for(&dir, &["fav", "toggle", "pre-2"])).await.unwrap();

        let shop = shop_for(&dir);
        assert_eq!(shop.theme(), Theme::Dark);
        assert!(shop.favorites().is_favorite("pre-2"));
    }

    #[tokio::test]
    async fn test_config_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("supreme.toml");
        init_config(&path, false).unwrap();
        assert!(init_config(&path, false).is_err());
        init_config(&path, true).unwrap();

        let path_str = path.to_str().unwrap();
        let cli = cli_for(&dir, &["--config", path_str, "config", "show"]);
        let settings = load_config(&cli).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        let cli = cli_for(&dir, &["--config", missing.to_str().unwrap(), "products"]);
        assert!(matches!(load_config(&cli), Err(CoreError::Config(_))));
    }
}
