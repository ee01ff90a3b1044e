// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polycsg CLI

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use polycsg::{
    compile_products, CompileConfig, CompiledProducts, ConsoleSink, CsgProducts, MeshProvider,
    SceneNode,
};
use serde::Serialize;
use std::path::Path;

#[derive(Parser)]
#[command(name = "polycsg")]
#[command(about = "Polycsg - compiles boolean scene descriptions into render products", long_about = None)]
struct Cli {
    /// Input scene JSON file
    #[arg(value_name = "FILE")]
    input: String,

    /// Config file (defaults to polycsg.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Override the normalization term limit
    #[arg(short, long)]
    term_limit: Option<usize>,

    /// Emit the product summary as JSON instead of the report
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ProductSummary {
    chain: Vec<String>,
}

#[derive(Serialize)]
struct CategorySummary {
    products: Vec<ProductSummary>,
}

#[derive(Serialize)]
struct CompileSummary {
    root: Option<CategorySummary>,
    highlights: Option<CategorySummary>,
    background: Option<CategorySummary>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CompileConfig::from_file(path)?,
        None => CompileConfig::load()?,
    };
    if let Some(limit) = cli.term_limit {
        config.term_limit = limit;
    }

    let source = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read scene file: {}", cli.input))?;
    let scene: SceneNode = serde_json::from_str(&source)
        .with_context(|| format!("Failed to parse scene file: {}", cli.input))?;

    let provider = MeshProvider::new();
    let sink = ConsoleSink;
    let compiled = compile_products(&scene, &provider, &config, &sink);

    if cli.json {
        let summary = summarize(&compiled);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        report(&cli.input, &compiled);
    }

    Ok(())
}

fn summarize(compiled: &CompiledProducts) -> CompileSummary {
    fn category(products: &Option<CsgProducts>) -> Option<CategorySummary> {
        products.as_ref().map(|set| CategorySummary {
            products: set
                .iter()
                .map(|product| ProductSummary {
                    chain: product
                        .chain
                        .iter()
                        .map(|entry| format!("{} {}", entry.op.symbol(), entry.leaf.label))
                        .map(|step| step.trim().to_string())
                        .collect(),
                })
                .collect(),
        })
    }

    CompileSummary {
        root: category(&compiled.root_products),
        highlights: category(&compiled.highlights_products),
        background: category(&compiled.background_products),
    }
}

fn report(input: &str, compiled: &CompiledProducts) {
    let name = Path::new(input)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| input.to_string());

    println!("\n{}", "━".repeat(80).bright_black());
    println!("{} {}", "Compiled:".bold(), name.cyan());
    println!("{}", "━".repeat(80).bright_black());

    print_category("Model", &compiled.root_products);
    print_category("Highlights", &compiled.highlights_products);
    print_category("Background", &compiled.background_products);

    println!("{}", "━".repeat(80).bright_black());
}

fn print_category(label: &str, products: &Option<CsgProducts>) {
    match products {
        Some(set) => {
            println!(
                "\n{} {}",
                format!("{}:", label).bold(),
                format!("{} products", set.size()).cyan()
            );
            for product in set.iter() {
                println!("  {}", product.to_string().bright_black());
            }
        }
        None => {
            println!("\n{} {}", format!("{}:", label).bold(), "none".bright_black());
        }
    }
}
