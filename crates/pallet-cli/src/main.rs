use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use pallet_core::{Item, PackRequest, Packer, PalletSpec};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "palletize")]
#[command(about = "Pallet Packer - Calculate how many pallets an order needs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack an order onto pallets
    Pack {
        /// Input file (YAML or JSON): a pack request, or an order catalog
        #[arg(short, long)]
        input: PathBuf,

        /// Order code to select when the input is a catalog
        #[arg(long)]
        order: Option<String>,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate SVG visualization from a pack result
    Generate {
        /// Input result file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Catalog file mapping order codes to item lines. Stands in for the
/// warehouse spreadsheet the orders come from.
#[derive(Debug, Deserialize)]
struct OrderCatalog {
    #[serde(default)]
    pallet: Option<PalletSpec>,
    orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
struct Order {
    code: String,
    items: Vec<Item>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack {
            input,
            order,
            output,
        } => {
            pack_command(input, order, output)?;
        }
        Commands::Generate { input, output } => {
            generate_command(input, output)?;
        }
    }

    Ok(())
}

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
    let ext = path.extension().and_then(|s| s.to_str());
    let parsed = if ext == Some("yaml") || ext == Some("yml") {
        serde_yaml::from_str(content)?
    } else {
        serde_json::from_str(content)?
    };
    Ok(parsed)
}

/// Resolves the pack request: either the file is a flat request, or it
/// is a catalog and `--order` picks one order out of it.
fn load_request(input: &Path, order: Option<String>) -> Result<PackRequest> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Cannot read {}", input.display()))?;

    match order {
        None => parse_file(input, &content),
        Some(code) => {
            let catalog: OrderCatalog = parse_file(input, &content)?;
            let order = catalog
                .orders
                .into_iter()
                .find(|o| o.code == code);
            match order {
                Some(order) => Ok(PackRequest {
                    pallet: catalog.pallet.unwrap_or_default(),
                    items: order.items,
                }),
                None => bail!("Order '{}' not found in {}", code, input.display()),
            }
        }
    }
}

fn pack_command(input: PathBuf, order: Option<String>, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔍 Loading order...".bright_blue());

    let request = load_request(&input, order)?;

    println!(
        "  {} catalog lines",
        request.items.len().to_string().bright_white().bold()
    );
    println!(
        "  pallet {}x{}x{} cm, max {} kg",
        request.pallet.width,
        request.pallet.height,
        request.pallet.depth,
        request.pallet.max_weight
    );
    println!();

    println!("{}", "🚀 Packing...".bright_blue());

    let packer = Packer::new(request)?;
    let result = packer.pack()?;

    println!();
    println!("{}", "✅ Packing complete!".bright_green().bold());
    println!();

    println!("{}", "📦 Pallets:".bright_yellow().bold());
    for layout in &result.layouts {
        println!(
            "  Pallet {} — {} units, {:.1} kg",
            layout.pallet_number.to_string().bright_white().bold(),
            layout.placements.len(),
            layout.placed_weight
        );
        for p in &layout.placements {
            println!(
                "    • {} at ({}, {}, {}) size {}x{}x{}",
                p.item_name.bright_white(),
                p.x,
                p.y,
                p.z,
                p.width,
                p.height,
                p.depth
            );
        }
    }

    if !result.rejected.is_empty() {
        println!();
        println!("{}", "⚠️  Not placed:".bright_red().bold());
        for rejected in &result.rejected {
            println!(
                "    • {} (unit {}): {:?}",
                rejected.item_name.bright_white(),
                rejected.unit,
                rejected.reason
            );
        }
    }

    println!();
    println!(
        "  Total pallets: {}",
        result
            .summary
            .total_pallets
            .to_string()
            .bright_white()
            .bold()
    );
    println!(
        "  Volume utilization: {:.1}%",
        result.summary.volume_utilization_percentage
    );
    println!("  Placed weight: {:.1} kg", result.summary.placed_weight);
    println!();

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        let json = serde_json::to_string_pretty(&result)?;
        println!("{}", json);
    }

    Ok(())
}

fn generate_command(input: PathBuf, output: PathBuf) -> Result<()> {
    println!("{}", "🔍 Loading result...".bright_blue());

    let content = std::fs::read_to_string(&input)?;
    let result: pallet_core::PackResult = serde_json::from_str(&content)?;

    println!("{}", "🎨 Generating SVG...".bright_blue());

    let svg = generate_simple_svg(&result)?;

    std::fs::write(&output, svg)?;

    println!();
    println!(
        "{} Saved SVG to {}",
        "✅".bright_green(),
        output.display().to_string().bright_white()
    );

    Ok(())
}

/// Draws each pallet top-down (x = width, y = depth); boxes are painted
/// floor first so stacked units overlay the ones beneath them.
fn generate_simple_svg(result: &pallet_core::PackResult) -> Result<String> {
    use std::fmt::Write;

    let mut svg = String::new();
    let margin = 20.0;
    let scale = 2.0;
    let pallet_spacing = 40.0;

    let pallet = &result.pallet;
    let total_depth: f64 = result.layouts.len() as f64 * (pallet.depth + pallet_spacing);

    let svg_width = (pallet.width / scale) + (2.0 * margin);
    let svg_height = (total_depth / scale) + (2.0 * margin);

    writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        svg_width, svg_height, svg_width, svg_height
    )?;
    writeln!(
        &mut svg,
        r##"  <rect width="100%" height="100%" fill="#f5f5f5"/>"##
    )?;

    let mut y_offset = margin;

    for layout in &result.layouts {
        let x = margin;
        let pallet_width = pallet.width / scale;
        let pallet_depth = pallet.depth / scale;

        writeln!(
            &mut svg,
            r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#fff" stroke="#333" stroke-width="2"/>"##,
            x, y_offset, pallet_width, pallet_depth
        )?;

        writeln!(
            &mut svg,
            r##"  <text x="{}" y="{}" font-family="Arial" font-size="14" fill="#333">Pallet #{} ({:.0} kg)</text>"##,
            x,
            y_offset - 5.0,
            layout.pallet_number,
            layout.placed_weight
        )?;

        let mut stacked: Vec<_> = layout.placements.iter().collect();
        stacked.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));

        for placement in stacked {
            let px = x + (placement.x / scale);
            let py = y_offset + (placement.z / scale);
            let pw = placement.width / scale;
            let pd = placement.depth / scale;

            writeln!(
                &mut svg,
                r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#4CAF50" stroke="#2E7D32" stroke-width="1" opacity="0.7"/>"##,
                px, py, pw, pd
            )?;

            writeln!(
                &mut svg,
                r##"  <text x="{}" y="{}" font-family="Arial" font-size="10" fill="#fff" text-anchor="middle">{}</text>"##,
                px + pw / 2.0,
                py + pd / 2.0 + 3.0,
                placement.item_name
            )?;
        }

        y_offset += pallet_depth + pallet_spacing;
    }

    writeln!(&mut svg, "</svg>")?;

    Ok(svg)
}
